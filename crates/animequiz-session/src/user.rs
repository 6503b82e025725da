//! The user record: who is behind a connection.

use animequiz_protocol::{ConnectionId, UserId};

/// A registered user.
///
/// Created by `registerUser` and destroyed when its connection closes.
/// `display_name` is not unique across the registry; lobbies enforce
/// uniqueness among their own players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub connection: ConnectionId,
    pub display_name: String,
}
