//! Named events exchanged between clients and the server.
//!
//! Every frame is adjacently tagged:
//!
//! ```text
//! {"event": "joinLobby", "data": {"lobbyId": "k3j9x0q2a", "animeList": [...]}}
//! ```
//!
//! Payload field names are camelCase to match the browser client.

use serde::{Deserialize, Serialize};

use crate::{LobbyId, RawItem, UserId};

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// Everything a client can ask the server to do.
///
/// A socket closing is the implicit `disconnect`; it has no frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    RegisterUser(RegisterUser),
    CreateLobby(CreateLobby),
    JoinLobby(JoinLobby),
    DisconnectFromLobby(DisconnectFromLobby),
    StartGame(StartGame),
    SendResults(SendResults),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterUser {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLobby {
    pub name: String,
    /// Number of items to reveal in a game.
    pub nb: usize,
    #[serde(default)]
    pub anime_list: Vec<RawItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinLobby {
    pub lobby_id: LobbyId,
    #[serde(default)]
    pub anime_list: Vec<RawItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectFromLobby {
    pub lobby_id: LobbyId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGame {
    pub lobby_id: LobbyId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResults {
    pub lobby_id: LobbyId,
    pub username: String,
    pub answer: String,
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// Everything the server pushes to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    UserRegistered(UserRegistered),
    LobbyCreated(LobbyCreated),
    UpdatePlayersList(PlayersList),
    RemoveLobby(LobbyRemoved),
    GameStarted(GameStarted),
    SendAnime(RevealedItem),
    GameResults(Vec<PlayerResult>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegistered {
    pub user_id: UserId,
    pub username: String,
}

/// A seated player as listed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub id: UserId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyCreated {
    pub id: LobbyId,
    pub name: String,
    pub host: PlayerEntry,
    pub nb: usize,
    pub players: Vec<PlayerEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayersList {
    pub lobby_id: LobbyId,
    pub players: Vec<PlayerEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyRemoved {
    pub lobby_id: LobbyId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStarted {
    pub lobby_id: LobbyId,
    /// Length of the reveal sequence.
    pub length: usize,
}

/// One reveal: the item plus its 1-based position in the sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedItem {
    pub title: String,
    pub image: String,
    pub length: usize,
    pub index: usize,
}

/// One scoreboard row. `answer` is omitted for players who have not
/// answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResult {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub is_correct: bool,
}
