//! `AnimeQuizServer` builder and accept loop.
//!
//! Ties the layers together: transport → codec → hub.

use animequiz_lobby::MirrorHandle;
use animequiz_protocol::{Codec, JsonCodec};
use animequiz_transport::{Transport, WebSocketTransport};

use crate::handler::handle_connection;
use crate::{AnimeQuizError, Hub, HubHandle, ServerConfig};

/// Builder for configuring and starting an anime quiz server.
///
/// # Example
///
/// ```rust,no_run
/// use animequiz::prelude::*;
///
/// # async fn start() -> Result<(), AnimeQuizError> {
/// let server = AnimeQuizServer::builder()
///     .bind("127.0.0.1:4001")
///     .mirror(MirrorHandle::spawn(MemoryStore::new()))
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct AnimeQuizServerBuilder {
    bind_addr: Option<String>,
    config: ServerConfig,
    mirror: MirrorHandle,
}

impl AnimeQuizServerBuilder {
    /// Creates a new builder with default settings and no mirror.
    pub fn new() -> Self {
        Self {
            bind_addr: None,
            config: ServerConfig::default(),
            mirror: MirrorHandle::disabled(),
        }
    }

    /// Sets the address to bind to, overriding the config's host and port.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = Some(addr.to_string());
        self
    }

    /// Sets the server configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the persistence mirror lobby changes are written to.
    pub fn mirror(mut self, mirror: MirrorHandle) -> Self {
        self.mirror = mirror;
        self
    }

    /// Binds the listener and starts the hub.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build(self) -> Result<AnimeQuizServer<JsonCodec>, AnimeQuizError> {
        let addr = self
            .bind_addr
            .unwrap_or_else(|| self.config.bind_addr());
        let transport = WebSocketTransport::bind(&addr).await?;
        let hub = Hub::spawn(&self.config, self.mirror);

        Ok(AnimeQuizServer {
            transport,
            hub,
            codec: JsonCodec,
        })
    }
}

impl Default for AnimeQuizServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound anime quiz server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct AnimeQuizServer<C: Codec> {
    transport: WebSocketTransport,
    hub: HubHandle,
    codec: C,
}

impl AnimeQuizServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> AnimeQuizServerBuilder {
        AnimeQuizServerBuilder::new()
    }
}

impl<C> AnimeQuizServer<C>
where
    C: Codec + Clone,
{
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop, spawning a handler task per connection.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), AnimeQuizError> {
        tracing::info!(addr = ?self.local_addr().ok(), "anime quiz server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let hub = self.hub.clone();
                    let codec = self.codec.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, hub, codec).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
