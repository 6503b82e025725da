//! The user registry: tracks which user sits behind which connection.
//!
//! # Concurrency note
//!
//! `UserRegistry` is a plain owned table, not a concurrent one. It is owned
//! by the hub task, which handles one event at a time, so no locking is
//! needed. Tests construct their own instance.

use std::collections::HashMap;

use animequiz_protocol::{ConnectionId, UserId};

use crate::{SessionError, User};

/// Registry of every user currently connected.
///
/// ```text
/// registerUser ──→ register() ──→ [bound to conn] ──→ disconnect ──→ remove()
/// ```
#[derive(Debug, Default)]
pub struct UserRegistry {
    users: HashMap<UserId, User>,
    /// Next id to hand out. Ids are never reused within one registry.
    next_id: u64,
}

impl UserRegistry {
    /// Creates an empty registry. The first user gets id 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh user and binds it to `connection`.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyRegistered`] if `connection` already
    /// has a user; connections are never rebound.
    pub fn register(
        &mut self,
        connection: ConnectionId,
        display_name: impl Into<String>,
    ) -> Result<UserId, SessionError> {
        if let Ok(existing) = self.resolve(connection) {
            return Err(SessionError::AlreadyRegistered {
                conn: connection,
                user: existing.id,
            });
        }

        let id = UserId(self.next_id);
        self.next_id += 1;
        let user = User {
            id,
            connection,
            display_name: display_name.into(),
        };
        tracing::info!(
            user_id = %id,
            conn_id = %connection,
            name = %user.display_name,
            "user registered"
        );
        self.users.insert(id, user);
        Ok(id)
    }

    /// Finds the user bound to `connection`.
    ///
    /// Linear scan: the registry is small and keyed by user id.
    ///
    /// # Errors
    /// Returns [`SessionError::UnknownConnection`] if nobody registered
    /// on this connection.
    pub fn resolve(&self, connection: ConnectionId) -> Result<&User, SessionError> {
        self.users
            .values()
            .find(|user| user.connection == connection)
            .ok_or(SessionError::UnknownConnection(connection))
    }

    /// Looks up a user by id.
    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    /// Returns the connection a user is bound to, if the user still exists.
    pub fn connection_of(&self, id: UserId) -> Option<ConnectionId> {
        self.users.get(&id).map(|user| user.connection)
    }

    /// Removes a user.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if the id is unknown.
    pub fn remove(&mut self, id: UserId) -> Result<User, SessionError> {
        let user = self.users.remove(&id).ok_or(SessionError::NotFound(id))?;
        tracing::info!(user_id = %id, conn_id = %user.connection, "user removed");
        Ok(user)
    }

    /// Returns the number of registered users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` if nobody is registered.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
