//! Unified error type for the anime quiz server.

use animequiz_lobby::LobbyError;
use animequiz_protocol::ProtocolError;
use animequiz_session::SessionError;
use animequiz_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates `From` impls, so
/// `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum AnimeQuizError {
    /// A transport-level error (connection, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// An identity error (unregistered connection, duplicate registration).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A lobby-level error (not found, full, duplicate name, ...).
    #[error(transparent)]
    Lobby(#[from] LobbyError),

    /// The configuration could not be loaded or has a bad value.
    #[error("invalid configuration: {0}")]
    Config(#[from] figment::Error),

    /// The event hub has stopped.
    #[error("event hub closed")]
    HubClosed,
}

#[cfg(test)]
mod tests {
    use animequiz_protocol::LobbyId;
    use animequiz_transport::ConnectionId;

    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let quiz_err: AnimeQuizError = err.into();
        assert!(matches!(quiz_err, AnimeQuizError::Transport(_)));
        assert!(quiz_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let quiz_err: AnimeQuizError = err.into();
        assert!(matches!(quiz_err, AnimeQuizError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::UnknownConnection(ConnectionId::new(3));
        let quiz_err: AnimeQuizError = err.into();
        assert!(matches!(quiz_err, AnimeQuizError::Session(_)));
    }

    #[test]
    fn test_from_lobby_error() {
        let err = LobbyError::NotFound(LobbyId::from("abc"));
        let quiz_err: AnimeQuizError = err.into();
        assert!(matches!(quiz_err, AnimeQuizError::Lobby(_)));
        assert!(quiz_err.to_string().contains("abc"));
    }

    #[test]
    fn test_from_figment_error() {
        let err = figment::Error::from(String::from("missing field `port`"));
        let quiz_err: AnimeQuizError = err.into();
        assert!(matches!(quiz_err, AnimeQuizError::Config(_)));
        assert!(quiz_err.to_string().contains("port"));
    }
}
