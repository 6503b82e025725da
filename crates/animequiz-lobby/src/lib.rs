//! Lobby management for the anime quiz server.
//!
//! A lobby seats up to four players who share one item pool and one
//! timed round. All state lives in a [`LobbyDirectory`], which is owned
//! by a single task and mutated sequentially; no locks are involved.
//!
//! # Key types
//!
//! - [`LobbyDirectory`]: create/join/leave lobbies, drive rounds, score answers
//! - [`ItemPool`]: validated, title-deduplicated item list
//! - [`Lobby`] / [`Player`]: a lobby's seats, pool, and reveal history
//! - [`MirrorStore`] / [`MirrorHandle`]: write-behind persistence mirror
//! - [`LobbyConfig`]: seat limit and submission rules

mod config;
mod directory;
mod error;
mod lobby;
mod mirror;
mod pool;
mod scorer;

pub use config::LobbyConfig;
pub use directory::{LeaveOutcome, LobbyDirectory};
pub use error::{ItemDefect, LobbyError};
pub use lobby::{Lobby, Player};
pub use mirror::{LOBBY_COLLECTION, MemoryStore, MirrorError, MirrorHandle, MirrorStore};
pub use pool::ItemPool;
pub use scorer::is_correct;
