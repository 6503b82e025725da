//! Error types for the lobby layer.

use std::fmt;

use animequiz_protocol::{LobbyId, UserId};
use animequiz_round::RoundError;

/// What is wrong with a submitted item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemDefect {
    MissingTitle,
    MissingImage,
}

impl fmt::Display for ItemDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTitle => write!(f, "missing title"),
            Self::MissingImage => write!(f, "missing image"),
        }
    }
}

/// Errors that can occur during lobby operations.
#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    /// The lobby does not exist (never created, or deleted when it emptied).
    #[error("lobby {0} not found")]
    NotFound(LobbyId),

    /// The lobby has no free seat.
    #[error("lobby {0} is full")]
    Full(LobbyId),

    /// The user is already seated in this lobby, or in another one.
    #[error("user {user} already in lobby {lobby}")]
    AlreadyInLobby { user: UserId, lobby: LobbyId },

    /// Another seated player already uses this display name.
    #[error("name {name:?} already taken in lobby {lobby}")]
    DuplicateName { name: String, lobby: LobbyId },

    /// The user is not seated in this lobby.
    #[error("user {user} not in lobby {lobby}")]
    NotInLobby { user: UserId, lobby: LobbyId },

    /// A submitted item is malformed; the whole submission was dropped.
    /// `index` is the position in the submitted list.
    #[error("item {index}: {defect}")]
    InvalidItem { index: usize, defect: ItemDefect },

    /// A lobby must reveal at least one item.
    #[error("reveal count must be at least 1, got {0}")]
    InvalidCapacity(usize),

    /// An answer arrived before anything was revealed.
    #[error("nothing revealed yet in lobby {0}")]
    NothingRevealed(LobbyId),

    /// The round refused to start.
    #[error("lobby {lobby}: {source}")]
    Round {
        lobby: LobbyId,
        #[source]
        source: RoundError,
    },
}
