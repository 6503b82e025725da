//! # AnimeQuiz
//!
//! Real-time multiplayer anime guessing game server.
//!
//! Players register a display name, gather in lobbies of up to four, and
//! pool their favourite titles. When a round starts the server draws a
//! random sequence from the pool and reveals one item every cadence
//! period; players type the title of the live item and everyone in the
//! lobby sees the updated scoreboard.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use animequiz::prelude::*;
//!
//! # async fn start() -> Result<(), AnimeQuizError> {
//! let server = AnimeQuizServer::builder()
//!     .config(ServerConfig::from_env()?)
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod hub;
mod server;

pub use config::{Fanout, ServerConfig};
pub use error::AnimeQuizError;
pub use hub::{Hub, HubCommand, HubHandle, Outbound};
pub use server::{AnimeQuizServer, AnimeQuizServerBuilder};

/// Everything needed to run a server or drive a hub.
pub mod prelude {
    pub use crate::{
        AnimeQuizError, AnimeQuizServer, AnimeQuizServerBuilder, Fanout, Hub, HubHandle,
        ServerConfig,
    };
    pub use animequiz_lobby::{LobbyConfig, MemoryStore, MirrorHandle, MirrorStore};
    pub use animequiz_protocol::{
        ClientEvent, ConnectionId, Item, LobbyId, PlayerEntry, PlayerResult, RawItem,
        ServerEvent, UserId,
    };
    pub use animequiz_round::RevealConfig;
}
