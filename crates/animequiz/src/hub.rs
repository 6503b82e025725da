//! Event hub: the single task that owns all game state.
//!
//! Connection handlers, reveal timers, and the accept loop talk to the hub
//! through one command queue. The hub processes commands strictly one at
//! a time, so the user registry and lobby directory need no locks and no
//! handler ever observes another half-way through.
//!
//! Failed requests are logged and dropped; nothing is sent back to the
//! requesting client.

use std::collections::HashMap;

use animequiz_lobby::{LeaveOutcome, LobbyDirectory, LobbyError, MirrorHandle};
use animequiz_protocol::{
    ClientEvent, ConnectionId, CreateLobby, DisconnectFromLobby, GameStarted, JoinLobby,
    LobbyCreated, LobbyId, LobbyRemoved, PlayersList, Recipient, RegisterUser, RevealedItem,
    SendResults, ServerEvent, StartGame, UserRegistered,
};
use animequiz_round::{RevealConfig, RevealTimer};
use animequiz_session::UserRegistry;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;

use crate::{AnimeQuizError, Fanout, ServerConfig};

/// Channel the hub uses to push events to one connection's writer.
pub type Outbound = mpsc::UnboundedSender<ServerEvent>;

/// Commands processed by the hub, in arrival order.
#[derive(Debug, Clone)]
pub enum HubCommand {
    /// A connection opened; `outbound` delivers events to it.
    Connected {
        connection: ConnectionId,
        outbound: Outbound,
    },

    /// A decoded client event.
    Event {
        connection: ConnectionId,
        event: ClientEvent,
    },

    /// A connection closed. Implicitly leaves its lobby.
    Disconnected { connection: ConnectionId },

    /// A reveal timer fired for round `epoch` of a lobby.
    Reveal { lobby_id: LobbyId, epoch: u64 },
}

/// Cheap-to-clone handle for sending commands to the hub.
#[derive(Debug, Clone)]
pub struct HubHandle {
    sender: mpsc::UnboundedSender<HubCommand>,
}

impl HubHandle {
    /// Registers a connection's outbound channel.
    pub fn connected(
        &self,
        connection: ConnectionId,
        outbound: Outbound,
    ) -> Result<(), AnimeQuizError> {
        self.send(HubCommand::Connected {
            connection,
            outbound,
        })
    }

    /// Forwards a client event.
    pub fn event(
        &self,
        connection: ConnectionId,
        event: ClientEvent,
    ) -> Result<(), AnimeQuizError> {
        self.send(HubCommand::Event { connection, event })
    }

    /// Reports a closed connection.
    pub fn disconnected(&self, connection: ConnectionId) -> Result<(), AnimeQuizError> {
        self.send(HubCommand::Disconnected { connection })
    }

    fn send(&self, command: HubCommand) -> Result<(), AnimeQuizError> {
        self.sender
            .send(command)
            .map_err(|_| AnimeQuizError::HubClosed)
    }
}

/// State owned by the hub task.
pub struct Hub {
    registry: UserRegistry,
    lobbies: LobbyDirectory,
    connections: HashMap<ConnectionId, Outbound>,
    fanout: Fanout,
    reveal: RevealConfig,
    rng: StdRng,
    // Weak, so the hub stops once every handle and timer is gone.
    commands: mpsc::WeakUnboundedSender<HubCommand>,
}

impl Hub {
    /// Spawns the hub task and returns a handle to it.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(config: &ServerConfig, mirror: MirrorHandle) -> HubHandle {
        Self::spawn_with_rng(config, mirror, StdRng::from_os_rng())
    }

    /// Like [`spawn`](Self::spawn) with a caller-chosen reveal-order RNG.
    pub fn spawn_with_rng(config: &ServerConfig, mirror: MirrorHandle, rng: StdRng) -> HubHandle {
        let (sender, receiver) = mpsc::unbounded_channel();
        let hub = Self::new(config, mirror, rng, sender.downgrade());
        tokio::spawn(hub.run(receiver));
        HubHandle { sender }
    }

    fn new(
        config: &ServerConfig,
        mirror: MirrorHandle,
        rng: StdRng,
        commands: mpsc::WeakUnboundedSender<HubCommand>,
    ) -> Self {
        Self {
            registry: UserRegistry::new(),
            lobbies: LobbyDirectory::new(config.lobby.clone(), mirror),
            connections: HashMap::new(),
            fanout: config.fanout,
            reveal: config.reveal.clone(),
            rng,
            commands,
        }
    }

    async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<HubCommand>) {
        tracing::info!(fanout = %self.fanout, "hub started");

        while let Some(command) = receiver.recv().await {
            self.handle(command);
        }

        tracing::info!("hub stopped");
    }

    fn handle(&mut self, command: HubCommand) {
        match command {
            HubCommand::Connected {
                connection,
                outbound,
            } => {
                tracing::debug!(%connection, "connection opened");
                self.connections.insert(connection, outbound);
            }
            HubCommand::Event { connection, event } => {
                if let Err(e) = self.handle_event(connection, event) {
                    tracing::warn!(%connection, error = %e, "request dropped");
                }
            }
            HubCommand::Disconnected { connection } => self.handle_disconnect(connection),
            HubCommand::Reveal { lobby_id, epoch } => self.handle_reveal(&lobby_id, epoch),
        }
    }

    fn handle_event(
        &mut self,
        connection: ConnectionId,
        event: ClientEvent,
    ) -> Result<(), AnimeQuizError> {
        match event {
            ClientEvent::RegisterUser(RegisterUser { name }) => {
                let user_id = self.registry.register(connection, name.clone())?;
                tracing::info!(%connection, %user_id, name = %name, "user registered");
                self.dispatch(
                    Recipient::Connection(connection),
                    ServerEvent::UserRegistered(UserRegistered {
                        user_id,
                        username: name,
                    }),
                );
            }

            ClientEvent::CreateLobby(CreateLobby {
                name,
                nb,
                anime_list,
            }) => {
                let user = self.registry.resolve(connection)?;
                let lobby = self.lobbies.create(
                    name,
                    user.id,
                    user.display_name.clone(),
                    nb,
                    &anime_list,
                )?;
                let event = ServerEvent::LobbyCreated(LobbyCreated {
                    id: lobby.id().clone(),
                    name: lobby.name().to_owned(),
                    host: lobby.host().clone(),
                    nb: lobby.capacity(),
                    players: lobby.player_entries(),
                });
                let recipient = match self.fanout {
                    Fanout::Global => Recipient::All,
                    Fanout::Lobby => Recipient::Connection(connection),
                };
                self.dispatch(recipient, event);
            }

            ClientEvent::JoinLobby(JoinLobby {
                lobby_id,
                anime_list,
            }) => {
                let user = self.registry.resolve(connection)?;
                let lobby = self.lobbies.join(
                    &lobby_id,
                    user.id,
                    user.display_name.clone(),
                    &anime_list,
                )?;
                let players = lobby.player_entries();
                self.dispatch(
                    self.membership_recipient(&lobby_id),
                    ServerEvent::UpdatePlayersList(PlayersList { lobby_id, players }),
                );
            }

            ClientEvent::DisconnectFromLobby(DisconnectFromLobby { lobby_id }) => {
                let user_id = self.registry.resolve(connection)?.id;
                let outcome = self.lobbies.leave(&lobby_id, user_id)?;
                self.announce_leave(connection, lobby_id, outcome);
            }

            ClientEvent::StartGame(StartGame { lobby_id }) => {
                self.start_game(lobby_id)?;
            }

            ClientEvent::SendResults(SendResults {
                lobby_id,
                username,
                answer,
            }) => {
                let board = self.lobbies.submit_answer(&lobby_id, &username, &answer)?;
                self.dispatch(Recipient::Lobby(lobby_id), ServerEvent::GameResults(board));
            }
        }
        Ok(())
    }

    fn start_game(&mut self, lobby_id: LobbyId) -> Result<(), AnimeQuizError> {
        let Some(commands) = self.commands.upgrade() else {
            return Err(AnimeQuizError::HubClosed);
        };
        let plan = self.lobbies.start_round(&lobby_id, &mut self.rng)?;

        let timer = RevealTimer::spawn(
            &self.reveal,
            plan.length,
            commands,
            HubCommand::Reveal {
                lobby_id: lobby_id.clone(),
                epoch: plan.epoch,
            },
        );
        self.lobbies.arm_round(&lobby_id, timer)?;

        self.dispatch(
            Recipient::Lobby(lobby_id.clone()),
            ServerEvent::GameStarted(GameStarted {
                lobby_id,
                length: plan.length,
            }),
        );
        Ok(())
    }

    fn handle_reveal(&mut self, lobby_id: &LobbyId, epoch: u64) {
        match self.lobbies.reveal_next(lobby_id, epoch) {
            Ok(Some(reveal)) => {
                let event = ServerEvent::SendAnime(RevealedItem {
                    title: reveal.item.title,
                    image: reveal.item.image_ref,
                    length: reveal.length,
                    index: reveal.index,
                });
                self.dispatch(Recipient::Lobby(lobby_id.clone()), event);
            }
            Ok(None) => {}
            Err(LobbyError::NotFound(_)) => {
                tracing::debug!(lobby_id = %lobby_id, epoch, "reveal for deleted lobby ignored");
            }
            Err(e) => tracing::warn!(lobby_id = %lobby_id, error = %e, "reveal failed"),
        }
    }

    fn handle_disconnect(&mut self, connection: ConnectionId) {
        self.connections.remove(&connection);

        if let Some((lobby_id, outcome)) = self
            .lobbies
            .leave_by_connection(&self.registry, connection)
        {
            self.announce_leave(connection, lobby_id, outcome);
        }

        if let Ok(user_id) = self.registry.resolve(connection).map(|user| user.id) {
            if let Err(e) = self.registry.remove(user_id) {
                tracing::warn!(%connection, error = %e, "user removal failed");
            }
        }
        tracing::debug!(%connection, "connection closed");
    }

    fn announce_leave(&self, connection: ConnectionId, lobby_id: LobbyId, outcome: LeaveOutcome) {
        match outcome {
            LeaveOutcome::Remaining(players) => {
                self.dispatch(
                    self.membership_recipient(&lobby_id),
                    ServerEvent::UpdatePlayersList(PlayersList { lobby_id, players }),
                );
            }
            LeaveOutcome::Deleted => {
                let recipient = match self.fanout {
                    Fanout::Global => Recipient::All,
                    Fanout::Lobby => Recipient::Connection(connection),
                };
                self.dispatch(recipient, ServerEvent::RemoveLobby(LobbyRemoved { lobby_id }));
            }
        }
    }

    fn membership_recipient(&self, lobby_id: &LobbyId) -> Recipient {
        match self.fanout {
            Fanout::Global => Recipient::All,
            Fanout::Lobby => Recipient::Lobby(lobby_id.clone()),
        }
    }

    /// Resolves a recipient to connections and queues the event on each.
    fn dispatch(&self, recipient: Recipient, event: ServerEvent) {
        match recipient {
            Recipient::Connection(connection) => self.send_to(connection, event),
            Recipient::Lobby(lobby_id) => {
                let Some(lobby) = self.lobbies.get(&lobby_id) else {
                    tracing::debug!(lobby_id = %lobby_id, "dispatch to missing lobby");
                    return;
                };
                for player in lobby.players() {
                    if let Some(connection) = self.registry.connection_of(player.user_id) {
                        self.send_to(connection, event.clone());
                    }
                }
            }
            Recipient::All => {
                for connection in self.connections.keys() {
                    self.send_to(*connection, event.clone());
                }
            }
        }
    }

    fn send_to(&self, connection: ConnectionId, event: ServerEvent) {
        if let Some(outbound) = self.connections.get(&connection) {
            if outbound.send(event).is_err() {
                tracing::debug!(%connection, "outbound channel closed");
            }
        }
    }
}
