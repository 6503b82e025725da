//! Error types for the identity layer.

use animequiz_protocol::{ConnectionId, UserId};

/// Errors that can occur while registering or resolving users.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No user is bound to this connection. The caller has not sent
    /// `registerUser` yet, or the user was already removed.
    #[error("no user registered on {0}")]
    UnknownConnection(ConnectionId),

    /// No user exists with this id.
    #[error("user {0} not found")]
    NotFound(UserId),

    /// The connection already has a user bound to it.
    #[error("{conn} is already registered as {user}")]
    AlreadyRegistered { conn: ConnectionId, user: UserId },
}
