use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::protocol::{ClientMessage, ServerMessage};
use crate::server::GameServer;

/// Outbound queue depth per connection. A consumer that falls this far
/// behind starts losing frames rather than stalling rooms.
const OUTBOUND_QUEUE_CAPACITY: usize = 64;

/// Drive one WebSocket session: an outbound pump draining the mpsc queue
/// into the sink, and an inbound loop parsing frames and dispatching them
/// to the orchestrator. Either side ending tears the session down and
/// starts the forfeit clock if the player was seated.
pub async fn handle_socket(socket: WebSocket, server: Arc<GameServer>, addr: SocketAddr) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<Arc<ServerMessage>>(OUTBOUND_QUEUE_CAPACITY);

    let conn_id = server.connections().register(tx);
    info!(%conn_id, client_addr = %addr, "WebSocket connection established");

    let send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let text = match serde_json::to_string(&*message) {
                Ok(text) => text,
                Err(err) => {
                    warn!(error = %err, "Failed to serialize outbound frame");
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    let server_recv = Arc::clone(&server);
    let receive_task = tokio::spawn(async move {
        let max_size = server_recv.config().max_message_size;
        while let Some(frame) = stream.next().await {
            let frame = match frame {
                Ok(frame) => frame,
                Err(err) => {
                    debug!(%conn_id, error = %err, "WebSocket error");
                    break;
                }
            };
            match frame {
                Message::Text(text) => {
                    if text.len() > max_size {
                        warn!(%conn_id, size = text.len(), max = max_size, "Frame exceeds size limit");
                        server_recv.send_to_conn(
                            conn_id,
                            ServerMessage::Error {
                                message: format!(
                                    "Message too large ({} bytes, max {} bytes)",
                                    text.len(),
                                    max_size
                                ),
                                error_code: None,
                            },
                        );
                        continue;
                    }
                    let message = match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(message) => message,
                        Err(err) => {
                            debug!(%conn_id, error = %err, "Rejected malformed client frame");
                            server_recv.send_to_conn(
                                conn_id,
                                ServerMessage::Error {
                                    message: "Invalid message format".to_string(),
                                    error_code: None,
                                },
                            );
                            continue;
                        }
                    };
                    server_recv.handle_client_message(conn_id, message).await;
                }
                Message::Close(_) => {
                    info!(%conn_id, "WebSocket connection closed");
                    break;
                }
                // Binary payloads are not part of this protocol; pings are
                // answered by the transport layer.
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = send_task => {}
        _ = receive_task => {}
    }

    server.handle_disconnect(conn_id).await;
}
