//! Realtime event bridge.
//!
//! One WebSocket connection per authenticated session. Inbound frames are
//! translated into `ServerEvent`s and forwarded over a channel; the owner
//! of the comment/notification state applies them on its own event loop.
//! The bridge never touches stores directly: it and the optimistic REST
//! path are two independent writers whose patches are all replace-by-id or
//! append-with-dedup, so no locking is needed; whichever patch lands last
//! wins, and every mutating REST call still ends in a full reload.
//!
//! Frames are JSON with a `type` discriminator:
//! - client -> server: `{"type":"join","taskId":...}` / `{"type":"leave",...}`
//! - server -> client: `comment_added` / `comment_updated` (a comment with
//!   `type` added), `comment_deleted` (`{"type":...,"_id":...,"taskId":...}`),
//!   `notification` (a notification with `type` added).
//!
//! Disconnects reconnect silently after a fixed delay, re-joining every
//! tracked room.

use std::collections::HashSet;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::Message;

use crate::error::{Error, Result};
use crate::model::{Comment, Notification};

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Connection lifecycle, observable by UIs for a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// An inbound event, already parsed into domain types.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    CommentAdded(Comment),
    CommentUpdated(Comment),
    CommentDeleted { comment_id: String, task_id: String },
    Notification(Notification),
}

/// Room membership command from the owning view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomCommand {
    Join(String),
    Leave(String),
}

/// Caller's side of the bridge: receives events, controls room membership.
pub struct RealtimeHandle {
    pub events: mpsc::UnboundedReceiver<ServerEvent>,
    commands: mpsc::UnboundedSender<RoomCommand>,
    state: watch::Receiver<ConnectionState>,
}

impl RealtimeHandle {
    /// Scope comment events to a task's room. Must be paired with `leave`
    /// when the view goes away so stale updates cannot leak into it.
    pub fn join(&self, task_id: impl Into<String>) {
        let _ = self.commands.send(RoomCommand::Join(task_id.into()));
    }

    pub fn leave(&self, task_id: impl Into<String>) {
        let _ = self.commands.send(RoomCommand::Leave(task_id.into()));
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.state.borrow()
    }
}

/// The connection side of the bridge. Run it in a spawned task.
pub struct RealtimeBridge {
    url: String,
    token: String,
    rooms: HashSet<String>,
    events: mpsc::UnboundedSender<ServerEvent>,
    commands: mpsc::UnboundedReceiver<RoomCommand>,
    state: watch::Sender<ConnectionState>,
}

/// Create a bridge plus its handle.
pub fn bridge(url: impl Into<String>, token: impl Into<String>) -> (RealtimeBridge, RealtimeHandle) {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);

    (
        RealtimeBridge {
            url: url.into(),
            token: token.into(),
            rooms: HashSet::new(),
            events: event_tx,
            commands: command_rx,
            state: state_tx,
        },
        RealtimeHandle {
            events: event_rx,
            commands: command_tx,
            state: state_rx,
        },
    )
}

impl RealtimeBridge {
    /// Connect and relay until the handle is dropped. Reconnects silently
    /// after `RECONNECT_DELAY` on any transport failure.
    pub async fn run(mut self) {
        loop {
            match self.connect_and_relay().await {
                Ok(()) => {
                    let _ = self.state.send(ConnectionState::Disconnected);
                    return;
                }
                Err(err) => {
                    let _ = self.state.send(ConnectionState::Disconnected);
                    tracing::debug!(error = %err, "realtime connection lost, reconnecting");
                    tokio::time::sleep(RECONNECT_DELAY).await;
                }
            }
        }
    }

    async fn connect_and_relay(&mut self) -> Result<()> {
        let _ = self.state.send(ConnectionState::Connecting);

        let mut request = self.url.as_str().into_client_request()?;
        let bearer = format!("Bearer {}", self.token)
            .parse()
            .map_err(|_| Error::InvalidArgument("token is not a valid header value".to_string()))?;
        request.headers_mut().insert(AUTHORIZATION, bearer);

        let (ws_stream, _response) = connect_async(request).await?;
        let (mut write, mut read) = ws_stream.split();
        let _ = self.state.send(ConnectionState::Connected);

        // Re-establish room membership after a reconnect.
        for task_id in &self.rooms {
            write
                .send(Message::Text(room_frame("join", task_id)))
                .await?;
        }

        loop {
            tokio::select! {
                command = self.commands.recv() => {
                    match command {
                        Some(RoomCommand::Join(task_id)) => {
                            if self.rooms.insert(task_id.clone()) {
                                write.send(Message::Text(room_frame("join", &task_id))).await?;
                            }
                        }
                        Some(RoomCommand::Leave(task_id)) => {
                            if self.rooms.remove(&task_id) {
                                write.send(Message::Text(room_frame("leave", &task_id))).await?;
                            }
                        }
                        // Handle dropped: clean shutdown.
                        None => {
                            let _ = write.send(Message::Close(None)).await;
                            return Ok(());
                        }
                    }
                }
                frame = read.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            match parse_frame(&text) {
                                Ok(Some(event)) => {
                                    if self.events.send(event).is_err() {
                                        return Ok(());
                                    }
                                }
                                Ok(None) => {}
                                Err(err) => {
                                    tracing::debug!(error = %err, "ignoring malformed realtime frame");
                                }
                            }
                        }
                        Some(Ok(Message::Ping(payload))) => {
                            write.send(Message::Pong(payload)).await?;
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            return Err(Error::OperationFailed(
                                "server closed realtime connection".to_string(),
                            ));
                        }
                        Some(Err(err)) => return Err(err.into()),
                        Some(Ok(_)) => {}
                    }
                }
            }
        }
    }
}

fn room_frame(kind: &str, task_id: &str) -> String {
    serde_json::json!({ "type": kind, "taskId": task_id }).to_string()
}

/// Parse one inbound frame. Unknown event types are skipped, not errors;
/// the server may grow new kinds.
pub fn parse_frame(text: &str) -> Result<Option<ServerEvent>> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let kind = value.get("type").and_then(|k| k.as_str()).unwrap_or("");

    let event = match kind {
        "comment_added" => Some(ServerEvent::CommentAdded(serde_json::from_value(
            value.clone(),
        )?)),
        "comment_updated" => Some(ServerEvent::CommentUpdated(serde_json::from_value(
            value.clone(),
        )?)),
        "comment_deleted" => {
            let comment_id = value
                .get("_id")
                .and_then(|id| id.as_str())
                .ok_or_else(|| {
                    Error::UnexpectedResponse("comment_deleted frame had no _id".to_string())
                })?
                .to_string();
            let task_id = value
                .get("taskId")
                .and_then(|id| id.as_str())
                .unwrap_or_default()
                .to_string();
            Some(ServerEvent::CommentDeleted { comment_id, task_id })
        }
        "notification" => Some(ServerEvent::Notification(serde_json::from_value(
            value.clone(),
        )?)),
        _ => None,
    };

    Ok(event)
}
