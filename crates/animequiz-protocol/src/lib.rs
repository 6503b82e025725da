//! Wire protocol for the anime quiz server.
//!
//! - **Types** ([`UserId`], [`LobbyId`], [`Item`], [`RawItem`], [`Recipient`]) —
//!   identities and the guessable items that flow through every layer.
//! - **Events** ([`ClientEvent`], [`ServerEvent`]) — the named events a
//!   client and the server exchange, as `{"event": .., "data": ..}` frames.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how events become text.
//! - **Errors** ([`ProtocolError`]).
//!
//! ```text
//! Transport (frames) → Protocol (events) → Hub (registry, lobbies, rounds)
//! ```

mod codec;
mod error;
mod events;
mod types;

pub use animequiz_transport::ConnectionId;
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use events::{
    ClientEvent, CreateLobby, DisconnectFromLobby, GameStarted, JoinLobby,
    LobbyCreated, LobbyRemoved, PlayerEntry, PlayerResult, PlayersList,
    RegisterUser, RevealedItem, SendResults, ServerEvent, StartGame,
    UserRegistered,
};
pub use types::{Item, LobbyId, RawItem, Recipient, UserId};
