//! Identity registry for the anime quiz server.
//!
//! Maps an ephemeral connection handle ([`ConnectionId`]) to a stable
//! user identity ([`User`]: id + display name).
//!
//! # How it fits in the stack
//!
//! ```text
//! Lobby Layer (above)  ← resolves "who is acting" before any lobby change
//!     ↕
//! Identity Layer (this crate)  ← one User per registered connection
//!     ↕
//! Protocol Layer (below)  ← provides UserId, ConnectionId
//! ```
//!
//! Reconnection is not supported: a connection that drops takes its user
//! with it, and a returning client registers again as a new user.
//!
//! [`ConnectionId`]: animequiz_protocol::ConnectionId

mod error;
mod registry;
mod user;

pub use error::SessionError;
pub use registry::UserRegistry;
pub use user::User;
