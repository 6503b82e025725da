//! Identity and item types shared by every layer.
//!
//! These travel on the wire and through the hub, so they are plain
//! serde types with stable JSON shapes.

use std::fmt;

use animequiz_transport::ConnectionId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A registered user, allocated by the identity registry.
///
/// Serialized as a plain number (`#[serde(transparent)]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

/// An opaque lobby token, e.g. `"k3j9x0q2a"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LobbyId(String);

impl LobbyId {
    /// Wraps an existing token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LobbyId {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}

impl From<String> for LobbyId {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl fmt::Display for LobbyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// A validated, guessable item.
///
/// `title` is the identity key inside a pool (case-sensitive); scoring
/// compares it case-insensitively. On the wire the image reference is
/// named `image`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    #[serde(rename = "image")]
    pub image_ref: String,
}

impl Item {
    /// Creates an item from a title and image reference.
    pub fn new(title: impl Into<String>, image_ref: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image_ref: image_ref.into(),
        }
    }
}

/// An item exactly as a client submitted it.
///
/// Both fields are optional so a malformed entry still decodes and can be
/// rejected by pool validation instead of failing the whole frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawItem {
    pub title: Option<String>,
    pub image: Option<String>,
}

impl RawItem {
    /// Shorthand for a well-formed submission.
    pub fn new(title: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            image: Some(image.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Recipient — who should receive a server event?
// ---------------------------------------------------------------------------

/// Fan-out target for a server event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// One connection.
    Connection(ConnectionId),
    /// Every seated player of a lobby (the lobby's room).
    Lobby(LobbyId),
    /// Every open connection.
    All,
}
