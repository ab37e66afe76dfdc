//! WebSocket Ledger Server
//!
//! Async WebSocket server. Each connection gets its own task; replies go out
//! through a per-connection sender task fed by an mpsc channel.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc, OwnedSemaphorePermit, RwLock, Semaphore};
use tokio::time::{interval, timeout};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, instrument, warn};

use crate::network::protocol::{ClientMessage, ErrorCode, ServerMessage};
use crate::network::service::LedgerService;
use crate::render::SpeckleTuning;

/// How often idle connections are swept.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Over-limit connections being told to go away at any one time.
/// Anything past this is dropped without a handshake.
const MAX_PENDING_REJECTS: usize = 64;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub bind_addr: SocketAddr,
    /// Maximum concurrent connections.
    pub max_connections: usize,
    /// Connections silent for longer than this are dropped.
    pub idle_timeout: Duration,
    /// Time allowed for the WebSocket upgrade.
    pub handshake_timeout: Duration,
    /// Speckle parameters used for every render.
    pub speckle_tuning: SpeckleTuning,
    /// Server version string.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            max_connections: 256,
            idle_timeout: Duration::from_secs(300),
            handshake_timeout: Duration::from_secs(10),
            speckle_tuning: SpeckleTuning::default(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Ledger server errors.
#[derive(Debug, thiserror::Error)]
pub enum LedgerServerError {
    /// Failed to bind to address.
    #[error("Failed to bind: {0}")]
    BindFailed(#[from] std::io::Error),
}

/// Connected client state.
struct ConnectedClient {
    /// Last activity.
    last_activity: Instant,
    /// Closes the connection task when the client goes idle.
    kick: mpsc::Sender<()>,
}

type ClientMap = Arc<RwLock<BTreeMap<SocketAddr, ConnectedClient>>>;

/// The ledger server.
pub struct LedgerServer {
    /// Server configuration.
    config: ServerConfig,
    /// Request handler.
    service: LedgerService,
    /// Connected clients.
    clients: ClientMap,
    /// Caps concurrent rejection handshakes.
    reject_permits: Arc<Semaphore>,
    /// Shutdown signal.
    shutdown_tx: broadcast::Sender<()>,
}

impl LedgerServer {
    /// Create a server around an existing service.
    pub fn new(config: ServerConfig, service: LedgerService) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            service,
            clients: Arc::new(RwLock::new(BTreeMap::new())),
            reject_permits: Arc::new(Semaphore::new(MAX_PENDING_REJECTS)),
            shutdown_tx,
        }
    }

    /// Request handler.
    pub fn service(&self) -> &LedgerService {
        &self.service
    }

    /// Bind the configured address and serve until shutdown.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<(), LedgerServerError> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        self.serve(listener).await
    }

    /// Serve connections from an already bound listener until shutdown.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), LedgerServerError> {
        info!(
            "Egg tracker v{} listening on {}",
            self.config.version,
            listener.local_addr()?
        );

        let cleanup_clients = self.clients.clone();
        let idle_timeout = self.config.idle_timeout;
        let cleanup_handle = tokio::spawn(async move {
            Self::run_cleanup_loop(cleanup_clients, idle_timeout).await;
        });

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            let clients_count = self.clients.read().await.len();
                            if clients_count >= self.config.max_connections {
                                warn!("Connection limit reached, rejecting {}", addr);
                                match self.reject_permits.clone().try_acquire_owned() {
                                    Ok(permit) => {
                                        Self::reject(stream, addr, permit, self.config.handshake_timeout);
                                    }
                                    Err(_) => debug!("Too many pending rejects, dropping {}", addr),
                                }
                                continue;
                            }

                            info!("New connection from {}", addr);
                            self.handle_connection(stream, addr).await;
                        }
                        Err(e) => {
                            error!("Accept error: {}", e);
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        cleanup_handle.abort();

        Ok(())
    }

    /// Tell an over-limit client why it is being turned away, then close.
    fn reject(
        stream: TcpStream,
        addr: SocketAddr,
        permit: OwnedSemaphorePermit,
        handshake_timeout: Duration,
    ) {
        tokio::spawn(async move {
            let _permit = permit;
            let mut ws = match timeout(handshake_timeout, accept_async(stream)).await {
                Ok(Ok(ws)) => ws,
                Ok(Err(e)) => {
                    debug!("Handshake with rejected client {} failed: {}", addr, e);
                    return;
                }
                Err(_) => {
                    debug!("Handshake with rejected client {} timed out", addr);
                    return;
                }
            };
            let overloaded = ServerMessage::error(ErrorCode::ServerOverloaded, "Too many connections");
            if let Ok(text) = overloaded.to_json() {
                let _ = ws.send(Message::Text(text)).await;
            }
            let _ = ws.close(None).await;
        });
    }

    /// Register a new connection and spawn its task.
    ///
    /// The client entry is removed when the task ends, however it ends.
    async fn handle_connection(&self, stream: TcpStream, addr: SocketAddr) {
        let clients = self.clients.clone();
        let service = self.service.clone();
        let shutdown_rx = self.shutdown_tx.subscribe();
        let handshake_timeout = self.config.handshake_timeout;
        let (kick_tx, kick_rx) = mpsc::channel::<()>(1);

        // Registered before the task starts so the limit check sees it.
        clients.write().await.insert(
            addr,
            ConnectedClient {
                last_activity: Instant::now(),
                kick: kick_tx,
            },
        );

        tokio::spawn(async move {
            let connection = tokio::spawn(Self::run_connection(
                stream,
                addr,
                clients.clone(),
                service,
                shutdown_rx,
                kick_rx,
                handshake_timeout,
            ));

            if let Err(e) = connection.await {
                error!("Connection task for {} failed: {}", addr, e);
            }

            clients.write().await.remove(&addr);
            info!("Client {} cleaned up", addr);
        });
    }

    /// Drive one WebSocket connection until it closes.
    async fn run_connection(
        stream: TcpStream,
        addr: SocketAddr,
        clients: ClientMap,
        service: LedgerService,
        mut shutdown_rx: broadcast::Receiver<()>,
        mut kick_rx: mpsc::Receiver<()>,
        handshake_timeout: Duration,
    ) {
        let ws_stream = match timeout(handshake_timeout, accept_async(stream)).await {
            Ok(Ok(ws)) => ws,
            Ok(Err(e)) => {
                error!("WebSocket handshake failed for {}: {}", addr, e);
                return;
            }
            Err(_) => {
                warn!("WebSocket handshake timed out for {}", addr);
                return;
            }
        };

        let (mut ws_sender, mut ws_receiver) = ws_stream.split();
        let (msg_tx, mut msg_rx) = mpsc::channel::<ServerMessage>(64);

        // Spawn message sender task
        let sender_task = tokio::spawn(async move {
            while let Some(msg) = msg_rx.recv().await {
                let text = match msg.to_json() {
                    Ok(t) => t,
                    Err(e) => {
                        error!("Failed to serialize message: {}", e);
                        continue;
                    }
                };
                if ws_sender.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
            let _ = ws_sender.close().await;
        });

        // Handle incoming messages
        loop {
            tokio::select! {
                msg = ws_receiver.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            {
                                let mut clients = clients.write().await;
                                if let Some(client) = clients.get_mut(&addr) {
                                    client.last_activity = Instant::now();
                                }
                            }

                            let reply = match ClientMessage::from_json(&text) {
                                Ok(request) => service.handle(request).await,
                                Err(e) => {
                                    debug!("Invalid message from {}: {}", addr, e);
                                    ServerMessage::error(
                                        ErrorCode::InvalidInput,
                                        format!("Invalid message format: {e}"),
                                    )
                                }
                            };
                            let _ = msg_tx.send(reply).await;
                        }
                        Some(Ok(Message::Binary(_))) => {
                            let _ = msg_tx.send(ServerMessage::error(
                                ErrorCode::InvalidInput,
                                "Binary frames are not supported",
                            )).await;
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            debug!("Client {} disconnected", addr);
                            break;
                        }
                        Some(Err(e)) => {
                            error!("WebSocket error for {}: {}", addr, e);
                            break;
                        }
                        // Ping/pong frames are answered by tungstenite.
                        _ => {}
                    }
                }
                _ = kick_rx.recv() => {
                    info!("Closing idle client {}", addr);
                    break;
                }
                _ = shutdown_rx.recv() => {
                    let _ = msg_tx.send(ServerMessage::Shutdown {
                        reason: "Server shutting down".to_string(),
                    }).await;
                    break;
                }
            }
        }

        // Dropping the channel lets the sender task flush and close.
        drop(msg_tx);
        let _ = sender_task.await;
    }

    /// Periodically drop clients that have been silent too long.
    async fn run_cleanup_loop(clients: ClientMap, idle_timeout: Duration) {
        let period = CLEANUP_INTERVAL.min(idle_timeout).max(Duration::from_secs(1));
        let mut interval = interval(period);

        loop {
            interval.tick().await;

            let now = Instant::now();
            let idle: Vec<_> = {
                let clients = clients.read().await;
                clients
                    .iter()
                    .filter(|(_, c)| now.duration_since(c.last_activity) > idle_timeout)
                    .map(|(addr, c)| (*addr, c.kick.clone()))
                    .collect()
            };

            for (addr, kick) in idle {
                debug!("Client {} idle for over {:?}", addr, idle_timeout);
                let _ = kick.try_send(());
            }
        }
    }

    /// Shutdown the server.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Get active connection count.
    pub async fn connection_count(&self) -> usize {
        self.clients.read().await.len()
    }
}
