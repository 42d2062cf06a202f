//! WebSocket event hub: registers connected subscribers and fans out trap
//! and polling events to all of them.
//!
//! Grounded on `original_source/websocket/hub.go`: the register/unregister/
//! broadcast channel trio becomes a `RwLock<HashMap<ClientId, Sender>>`
//! guarding per-client bounded (256) queues - Rust's shared-state
//! concurrency makes the Go version's dedicated actor loop unnecessary, but
//! every timing constant (60s read deadline, 54s ping interval, 10s write
//! deadline, 512-byte read limit) is carried over unchanged. The handshake
//! (`device_id`/`router_id`/`olt_id`/`switch_id` alias, required `vendor`,
//! `token` checked against [`crate::auth::AuthService`]) is `ServeWS`'s query
//! parameter resolution, modeled here as [`ClientHandshake::from_query`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use log::{info, warn};
use serde::Serialize;
use tokio::sync::{mpsc, RwLock};

use crate::auth::AuthService;
use crate::error::HandshakeError;
use crate::polling::engine::SnmpMetricMessage;
use crate::snmp::trap::TrapEvent;

const CLIENT_BUFFER: usize = 256;
const READ_DEADLINE: Duration = Duration::from_secs(60);
const PING_INTERVAL: Duration = Duration::from_secs(54);
const WRITE_DEADLINE: Duration = Duration::from_secs(10);
const READ_LIMIT: usize = 512;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HubEvent {
    Trap(TrapEvent),
    Metric(SnmpMetricMessage),
}

/// A connected client's identity, resolved from the upgrade request's query
/// parameters. Not currently used to filter broadcasts (neither is the
/// original's `GetClientsByDevice` wired into `Broadcast`), but kept on the
/// connection for logging, matching `Client.deviceID`/`Client.vendor`.
pub struct ClientHandshake {
    pub device_id: String,
    pub vendor: String,
}

impl ClientHandshake {
    pub fn from_query(
        device_id: Option<&str>,
        router_id: Option<&str>,
        olt_id: Option<&str>,
        switch_id: Option<&str>,
        vendor: Option<&str>,
        token: Option<&str>,
        auth: &dyn AuthService,
    ) -> Result<Self, HandshakeError> {
        let device_id = device_id
            .or(router_id)
            .or(olt_id)
            .or(switch_id)
            .filter(|s| !s.is_empty())
            .ok_or(HandshakeError::MissingDeviceId)?;
        let vendor = vendor.filter(|s| !s.is_empty()).ok_or(HandshakeError::MissingVendor)?;
        auth.validate_token(token.unwrap_or_default())?;
        Ok(ClientHandshake { device_id: device_id.to_string(), vendor: vendor.to_string() })
    }
}

pub struct EventHub {
    clients: RwLock<HashMap<u64, mpsc::Sender<Message>>>,
    next_id: AtomicU64,
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHub {
    pub fn new() -> Self {
        EventHub {
            clients: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }

    /// Applies the same 512-byte read limit `readPump` sets via
    /// `conn.SetReadLimit`, at the one place axum exposes it: upgrade time.
    pub fn configure_upgrade(upgrade: WebSocketUpgrade) -> WebSocketUpgrade {
        upgrade.max_message_size(READ_LIMIT)
    }

    pub async fn broadcast_trap(&self, event: TrapEvent) {
        self.broadcast(&HubEvent::Trap(event)).await;
    }

    pub async fn broadcast_metric(&self, message: SnmpMetricMessage) {
        self.broadcast(&HubEvent::Metric(message)).await;
    }

    /// Mirrors the `broadcast` channel case in `Hub.Run`: on a full or
    /// closed client queue, the client is dropped rather than blocking the
    /// whole broadcast.
    async fn broadcast(&self, event: &HubEvent) {
        let payload = match serde_json::to_string(event) {
            Ok(p) => p,
            Err(err) => {
                warn!("failed to serialize hub event: {err}");
                return;
            }
        };

        let mut dead = Vec::new();
        {
            let clients = self.clients.read().await;
            for (id, sender) in clients.iter() {
                if sender.try_send(Message::Text(payload.clone())).is_err() {
                    dead.push(*id);
                }
            }
        }
        if !dead.is_empty() {
            let mut clients = self.clients.write().await;
            for id in dead {
                clients.remove(&id);
            }
        }
    }

    /// Takes ownership of an upgraded socket and drives it until
    /// disconnect, removing it from the registry on exit - the `register`/
    /// `writePump`/`readPump`/`unregister` quartet collapsed into one task
    /// per client.
    pub async fn handle_socket(self: Arc<Self>, socket: WebSocket, handshake: ClientHandshake) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(CLIENT_BUFFER);
        self.clients.write().await.insert(id, tx);
        info!("client connected for device {} ({})", handshake.device_id, handshake.vendor);

        let (sink, stream) = socket.split();
        let writer = tokio::spawn(Self::write_pump(sink, rx));
        Self::read_pump(stream).await;

        writer.abort();
        self.clients.write().await.remove(&id);
        info!("client disconnected for device {}", handshake.device_id);
    }

    async fn write_pump(mut sink: SplitSink<WebSocket, Message>, mut rx: mpsc::Receiver<Message>) {
        let mut ping = tokio::time::interval(PING_INTERVAL);
        loop {
            tokio::select! {
                msg = rx.recv() => {
                    let Some(msg) = msg else { break };
                    if tokio::time::timeout(WRITE_DEADLINE, sink.send(msg)).await.is_err() {
                        break;
                    }
                }
                _ = ping.tick() => {
                    if tokio::time::timeout(WRITE_DEADLINE, sink.send(Message::Ping(Vec::new()))).await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    async fn read_pump(mut stream: SplitStream<WebSocket>) {
        loop {
            match tokio::time::timeout(READ_DEADLINE, stream.next()).await {
                Ok(Some(Ok(Message::Close(_)))) | Ok(None) | Err(_) => break,
                Ok(Some(Ok(_))) => continue,
                Ok(Some(Err(err))) => {
                    warn!("websocket read error: {err}");
                    break;
                }
            }
        }
    }
}
