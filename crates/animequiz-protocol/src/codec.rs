//! Codec trait and implementations for serializing/deserializing events.
//!
//! The hub and the connection handler only talk about [`ClientEvent`] and
//! [`ServerEvent`](crate::events::ServerEvent) values; the codec is the
//! one place that knows how they look as text.
//!
//! [`ClientEvent`]: crate::ClientEvent

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode events to text frames and decode frames back.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into a text frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes a received frame back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or do not
    /// match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ## Example
///
/// ```rust
/// use animequiz_protocol::{ClientEvent, Codec, JsonCodec, StartGame, LobbyId};
///
/// let codec = JsonCodec;
/// let event = ClientEvent::StartGame(StartGame { lobby_id: LobbyId::from("abc") });
///
/// let text = codec.encode(&event).unwrap();
/// assert_eq!(text, r#"{"event":"startGame","data":{"lobbyId":"abc"}}"#);
///
/// let decoded: ClientEvent = codec.decode(text.as_bytes()).unwrap();
/// assert_eq!(decoded, event);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
