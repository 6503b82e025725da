//! Per-connection handler: decode frames in, encode events out.
//!
//! Each accepted connection gets a reader loop (this task) and a writer
//! task. The reader decodes client frames and forwards them to the hub;
//! the writer drains the connection's outbound channel. A reveal pushed
//! by the hub therefore never waits behind a pending read.

use std::sync::Arc;

use animequiz_protocol::{ClientEvent, Codec, ServerEvent};
use animequiz_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::mpsc;

use crate::{AnimeQuizError, HubHandle};

/// Reports the connection as closed when the reader exits, however it
/// exits.
struct DisconnectGuard {
    connection: ConnectionId,
    hub: HubHandle,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        if self.hub.disconnected(self.connection).is_err() {
            tracing::debug!(connection = %self.connection, "hub gone before disconnect");
        }
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C>(
    conn: WebSocketConnection,
    hub: HubHandle,
    codec: C,
) -> Result<(), AnimeQuizError>
where
    C: Codec + Clone,
{
    let conn = Arc::new(conn);
    let connection = conn.id();
    tracing::debug!(%connection, "handling new connection");

    let (outbound, events) = mpsc::unbounded_channel();
    hub.connected(connection, outbound)?;
    let _guard = DisconnectGuard {
        connection,
        hub: hub.clone(),
    };

    tokio::spawn(write_events(Arc::clone(&conn), events, codec.clone()));

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%connection, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%connection, error = %e, "recv error");
                break;
            }
        };

        let event: ClientEvent = match codec.decode(&data) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(%connection, error = %e, "failed to decode frame");
                continue;
            }
        };
        hub.event(connection, event)?;
    }

    // _guard drops here → the hub sees the disconnect.
    Ok(())
}

/// Writes every event the hub queues for this connection. Ends when the
/// hub drops the sender (after the disconnect) or the socket fails.
async fn write_events<C: Codec>(
    conn: Arc<WebSocketConnection>,
    mut events: mpsc::UnboundedReceiver<ServerEvent>,
    codec: C,
) {
    let connection = conn.id();

    while let Some(event) = events.recv().await {
        let text = match codec.encode(&event) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(%connection, error = %e, "failed to encode event");
                continue;
            }
        };
        if let Err(e) = conn.send(&text).await {
            tracing::debug!(%connection, error = %e, "send failed, writer stopping");
            break;
        }
    }
}
