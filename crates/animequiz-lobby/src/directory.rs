//! Lobby directory: creates, tracks, and tears down lobbies.

use std::collections::HashMap;

use animequiz_protocol::{ConnectionId, Item, LobbyId, PlayerEntry, PlayerResult, RawItem, UserId};
use animequiz_round::{Reveal, RevealTimer, RoundPlan};
use animequiz_session::UserRegistry;
use rand::Rng;

use crate::lobby::Player;
use crate::scorer;
use crate::{ItemPool, Lobby, LobbyConfig, LobbyError, MirrorHandle};

/// Length of a generated lobby id.
const LOBBY_ID_LEN: usize = 9;

const LOBBY_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Result of removing a player from a lobby.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// Other players remain; this is the updated seat list.
    Remaining(Vec<PlayerEntry>),
    /// The lobby emptied and was deleted, cancelling any running round.
    Deleted,
}

/// All active lobbies.
///
/// A user is seated in at most one lobby at a time. Every committed
/// mutation is mirrored through the [`MirrorHandle`] afterwards; the
/// mirror never affects the outcome of an operation.
#[derive(Debug)]
pub struct LobbyDirectory {
    lobbies: HashMap<LobbyId, Lobby>,
    config: LobbyConfig,
    mirror: MirrorHandle,
}

impl LobbyDirectory {
    pub fn new(config: LobbyConfig, mirror: MirrorHandle) -> Self {
        Self {
            lobbies: HashMap::new(),
            config,
            mirror,
        }
    }

    pub fn get(&self, id: &LobbyId) -> Option<&Lobby> {
        self.lobbies.get(id)
    }

    pub fn len(&self) -> usize {
        self.lobbies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lobbies.is_empty()
    }

    /// The lobby a user is currently seated in, if any.
    pub fn lobby_of(&self, user_id: UserId) -> Option<&LobbyId> {
        self.lobbies
            .values()
            .find(|lobby| lobby.has_player(user_id))
            .map(Lobby::id)
    }

    /// Creates a lobby with the owner as its only player and host.
    ///
    /// A malformed `items` submission does not block creation: the
    /// contribution is dropped whole and the lobby starts with an empty
    /// pool.
    ///
    /// # Errors
    /// - [`LobbyError::InvalidCapacity`] if `capacity` is zero.
    /// - [`LobbyError::AlreadyInLobby`] if the owner is already seated.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        owner: UserId,
        owner_name: impl Into<String>,
        capacity: usize,
        items: &[RawItem],
    ) -> Result<&Lobby, LobbyError> {
        if capacity == 0 {
            return Err(LobbyError::InvalidCapacity(capacity));
        }
        if let Some(current) = self.lobby_of(owner) {
            return Err(LobbyError::AlreadyInLobby {
                user: owner,
                lobby: current.clone(),
            });
        }

        let pool = ItemPool::build(items, self.config.skip_leading_item).unwrap_or_else(|e| {
            tracing::warn!(user_id = %owner, error = %e, "item list dropped on create");
            ItemPool::new()
        });

        let id = self.fresh_id();
        let lobby = Lobby::new(
            id.clone(),
            name.into(),
            Player::new(owner, owner_name),
            capacity,
            pool,
        );
        tracing::info!(
            lobby_id = %id,
            user_id = %owner,
            capacity,
            pool = lobby.pool().len(),
            "lobby created"
        );
        self.mirror.set(id.as_str(), lobby.document());

        Ok(&*self.lobbies.entry(id).or_insert(lobby))
    }

    /// Seats a user and merges their item contribution into the pool.
    ///
    /// A malformed contribution is dropped whole; the join still succeeds.
    ///
    /// # Errors
    /// - [`LobbyError::NotFound`] for an unknown lobby.
    /// - [`LobbyError::AlreadyInLobby`] if the user is seated here or in
    ///   another lobby.
    /// - [`LobbyError::DuplicateName`] if the display name is taken here.
    /// - [`LobbyError::Full`] at `max_players`.
    pub fn join(
        &mut self,
        id: &LobbyId,
        user_id: UserId,
        display_name: impl Into<String>,
        items: &[RawItem],
    ) -> Result<&Lobby, LobbyError> {
        if !self.lobbies.contains_key(id) {
            return Err(LobbyError::NotFound(id.clone()));
        }
        if let Some(current) = self.lobby_of(user_id) {
            return Err(LobbyError::AlreadyInLobby {
                user: user_id,
                lobby: current.clone(),
            });
        }

        let max_players = self.config.max_players;
        let skip_leading = self.config.skip_leading_item;
        let lobby = self
            .lobbies
            .get_mut(id)
            .ok_or_else(|| LobbyError::NotFound(id.clone()))?;

        lobby.seat(Player::new(user_id, display_name), max_players)?;
        match lobby.pool.extend(items, skip_leading) {
            Ok(added) => tracing::debug!(lobby_id = %id, %user_id, added, "pool extended"),
            Err(e) => {
                tracing::warn!(lobby_id = %id, %user_id, error = %e, "item list dropped on join")
            }
        }
        tracing::info!(lobby_id = %id, %user_id, players = lobby.players().len(), "player joined");

        let mut patch = lobby.players_patch();
        patch["animeList"] = serde_json::json!(lobby.pool.items());
        self.mirror.update(id.as_str(), patch);

        Ok(&*lobby)
    }

    /// Removes a user from a lobby, deleting the lobby when it empties.
    ///
    /// # Errors
    /// - [`LobbyError::NotFound`] for an unknown lobby.
    /// - [`LobbyError::NotInLobby`] if the user is not seated there.
    pub fn leave(&mut self, id: &LobbyId, user_id: UserId) -> Result<LeaveOutcome, LobbyError> {
        let lobby = self
            .lobbies
            .get_mut(id)
            .ok_or_else(|| LobbyError::NotFound(id.clone()))?;

        lobby.unseat(user_id).ok_or_else(|| LobbyError::NotInLobby {
            user: user_id,
            lobby: id.clone(),
        })?;
        tracing::info!(lobby_id = %id, %user_id, players = lobby.players().len(), "player left");

        if lobby.players().is_empty() {
            // Dropping the lobby drops its round and aborts the timer.
            self.lobbies.remove(id);
            self.mirror.delete(id.as_str());
            tracing::info!(lobby_id = %id, "lobby deleted");
            return Ok(LeaveOutcome::Deleted);
        }

        self.mirror.update(id.as_str(), lobby.players_patch());
        Ok(LeaveOutcome::Remaining(lobby.player_entries()))
    }

    /// Applies [`leave`](Self::leave) for whichever lobby seats the user
    /// registered on `connection`. Used when a connection closes.
    ///
    /// Returns `None` if the connection has no user or the user is not
    /// seated anywhere.
    pub fn leave_by_connection(
        &mut self,
        registry: &UserRegistry,
        connection: ConnectionId,
    ) -> Option<(LobbyId, LeaveOutcome)> {
        let user_id = registry.resolve(connection).ok()?.id;
        let lobby_id = self.lobby_of(user_id)?.clone();
        match self.leave(&lobby_id, user_id) {
            Ok(outcome) => Some((lobby_id, outcome)),
            Err(e) => {
                tracing::warn!(%connection, error = %e, "leave on disconnect failed");
                None
            }
        }
    }

    /// Draws a fresh reveal sequence for a lobby's round.
    ///
    /// Clears `sent_items` and every player's answer. The caller is
    /// expected to [`arm_round`](Self::arm_round) with a timer for the
    /// returned plan.
    ///
    /// # Errors
    /// - [`LobbyError::NotFound`] for an unknown lobby.
    /// - [`LobbyError::Round`] if the round is running or the pool is
    ///   smaller than the lobby's capacity.
    pub fn start_round<R>(&mut self, id: &LobbyId, rng: &mut R) -> Result<RoundPlan, LobbyError>
    where
        R: Rng + ?Sized,
    {
        let lobby = self
            .lobbies
            .get_mut(id)
            .ok_or_else(|| LobbyError::NotFound(id.clone()))?;

        let plan = lobby
            .round
            .schedule(lobby.pool.items(), lobby.capacity, rng)
            .map_err(|source| LobbyError::Round {
                lobby: id.clone(),
                source,
            })?;

        lobby.sent_items.clear();
        lobby.clear_answers();
        tracing::info!(lobby_id = %id, epoch = plan.epoch, length = plan.length, "round started");
        Ok(plan)
    }

    /// Hands the reveal timer to the lobby's round, which owns it from
    /// now on.
    ///
    /// # Errors
    /// Returns [`LobbyError::NotFound`] if the lobby is gone; the timer
    /// is dropped.
    pub fn arm_round(&mut self, id: &LobbyId, timer: RevealTimer) -> Result<(), LobbyError> {
        let lobby = self
            .lobbies
            .get_mut(id)
            .ok_or_else(|| LobbyError::NotFound(id.clone()))?;
        lobby.round.arm(timer);
        Ok(())
    }

    /// Handles a reveal tick: reveals the next item of the lobby's round
    /// and records it as sent.
    ///
    /// Returns `Ok(None)` for a stale tick (older epoch, or the round is
    /// no longer running).
    ///
    /// # Errors
    /// Returns [`LobbyError::NotFound`] if the lobby was deleted since
    /// the tick was scheduled.
    pub fn reveal_next(
        &mut self,
        id: &LobbyId,
        epoch: u64,
    ) -> Result<Option<Reveal<Item>>, LobbyError> {
        let reset_answers = self.config.reset_answers_each_reveal;
        let lobby = self
            .lobbies
            .get_mut(id)
            .ok_or_else(|| LobbyError::NotFound(id.clone()))?;

        let Some(reveal) = lobby.round.reveal_next(epoch) else {
            return Ok(None);
        };

        lobby.sent_items.push(reveal.item.clone());
        if reset_answers {
            lobby.clear_answers();
        }
        tracing::info!(
            lobby_id = %id,
            index = reveal.index,
            length = reveal.length,
            title = %reveal.item.title,
            "item revealed"
        );
        self.mirror.update(id.as_str(), lobby.sent_items_patch());

        Ok(Some(reveal))
    }

    /// Scores an answer against the lobby's live item and returns the
    /// scoreboard.
    ///
    /// # Errors
    /// - [`LobbyError::NotFound`] for an unknown lobby.
    /// - [`LobbyError::NothingRevealed`] before the first reveal.
    pub fn submit_answer(
        &mut self,
        id: &LobbyId,
        display_name: &str,
        answer: &str,
    ) -> Result<Vec<PlayerResult>, LobbyError> {
        let lobby = self
            .lobbies
            .get_mut(id)
            .ok_or_else(|| LobbyError::NotFound(id.clone()))?;
        scorer::record_answer(lobby, display_name, answer)
    }

    /// A random id not currently in use.
    fn fresh_id(&self) -> LobbyId {
        let mut rng = rand::rng();
        loop {
            let token: String = (0..LOBBY_ID_LEN)
                .map(|_| {
                    let i = rng.random_range(0..LOBBY_ID_ALPHABET.len());
                    char::from(LOBBY_ID_ALPHABET[i])
                })
                .collect();
            let id = LobbyId::from(token);
            if !self.lobbies.contains_key(&id) {
                return id;
            }
        }
    }
}
