//! A single lobby: seated players, the item pool, and the round.

use animequiz_protocol::{Item, LobbyId, PlayerEntry, PlayerResult, UserId};
use animequiz_round::{Round, RoundPhase};
use serde_json::{Value, json};

use crate::{ItemPool, LobbyError};

/// A seated player and their most recent answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub user_id: UserId,
    pub display_name: String,
    pub last_answer: Option<String>,
    pub last_answer_correct: Option<bool>,
}

impl Player {
    pub fn new(user_id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            last_answer: None,
            last_answer_correct: None,
        }
    }

    /// The `{id, name}` pair used in player lists.
    pub fn entry(&self) -> PlayerEntry {
        PlayerEntry {
            id: self.user_id,
            name: self.display_name.clone(),
        }
    }

    /// Scoreboard row. Players who have not answered score `false`.
    pub fn result(&self) -> PlayerResult {
        PlayerResult {
            username: self.display_name.clone(),
            answer: self.last_answer.clone(),
            is_correct: self.last_answer_correct.unwrap_or(false),
        }
    }

    pub(crate) fn clear_answer(&mut self) {
        self.last_answer = None;
        self.last_answer_correct = None;
    }
}

/// A named group of seated players sharing one item pool and one round.
///
/// Invariants upheld by [`crate::LobbyDirectory`]:
/// - `1 <= players.len() <= max_players` while the lobby exists
/// - no two players share a user id or a display name
/// - `sent_items` is a prefix of the current round's sequence
#[derive(Debug)]
pub struct Lobby {
    pub(crate) id: LobbyId,
    pub(crate) name: String,
    pub(crate) host: PlayerEntry,
    pub(crate) capacity: usize,
    pub(crate) players: Vec<Player>,
    pub(crate) pool: ItemPool,
    pub(crate) sent_items: Vec<Item>,
    pub(crate) round: Round<Item>,
}

impl Lobby {
    pub(crate) fn new(
        id: LobbyId,
        name: String,
        host: Player,
        capacity: usize,
        pool: ItemPool,
    ) -> Self {
        Self {
            id,
            name,
            host: host.entry(),
            capacity,
            players: vec![host],
            pool,
            sent_items: Vec::new(),
            round: Round::new(),
        }
    }

    pub fn id(&self) -> &LobbyId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The creator. Kept even after the creator leaves.
    pub fn host(&self) -> &PlayerEntry {
        &self.host
    }

    /// Number of items a round reveals (`nb`).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn pool(&self) -> &ItemPool {
        &self.pool
    }

    /// Items revealed so far in the current round, in reveal order.
    pub fn sent_items(&self) -> &[Item] {
        &self.sent_items
    }

    /// The most recently revealed item, the one answers are scored against.
    pub fn live_item(&self) -> Option<&Item> {
        self.sent_items.last()
    }

    pub fn round_phase(&self) -> RoundPhase {
        self.round.phase()
    }

    pub fn has_player(&self, user_id: UserId) -> bool {
        self.players.iter().any(|p| p.user_id == user_id)
    }

    pub fn player_entries(&self) -> Vec<PlayerEntry> {
        self.players.iter().map(Player::entry).collect()
    }

    /// One row per seated player, in seat order.
    pub fn scoreboard(&self) -> Vec<PlayerResult> {
        self.players.iter().map(Player::result).collect()
    }

    /// Seats a player after checking identity, name, and capacity.
    pub(crate) fn seat(&mut self, player: Player, max_players: usize) -> Result<(), LobbyError> {
        if self.has_player(player.user_id) {
            return Err(LobbyError::AlreadyInLobby {
                user: player.user_id,
                lobby: self.id.clone(),
            });
        }
        if self
            .players
            .iter()
            .any(|p| p.display_name == player.display_name)
        {
            return Err(LobbyError::DuplicateName {
                name: player.display_name,
                lobby: self.id.clone(),
            });
        }
        if self.players.len() >= max_players {
            return Err(LobbyError::Full(self.id.clone()));
        }
        self.players.push(player);
        Ok(())
    }

    pub(crate) fn unseat(&mut self, user_id: UserId) -> Option<Player> {
        let pos = self.players.iter().position(|p| p.user_id == user_id)?;
        Some(self.players.remove(pos))
    }

    /// First seated player with this display name.
    pub(crate) fn player_named_mut(&mut self, display_name: &str) -> Option<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| p.display_name == display_name)
    }

    pub(crate) fn clear_answers(&mut self) {
        self.players.iter_mut().for_each(Player::clear_answer);
    }

    /// Full record written to the persistence mirror.
    pub fn document(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "host": self.host,
            "nb": self.capacity,
            "players": self.player_entries(),
            "sentAnimes": self.sent_items,
            "animeList": self.pool.items(),
        })
    }

    pub(crate) fn players_patch(&self) -> Value {
        json!({ "players": self.player_entries() })
    }

    pub(crate) fn sent_items_patch(&self) -> Value {
        json!({ "sentAnimes": self.sent_items })
    }
}
