//! Lobby, per-match serialization and connection handling.
//!
//! Every match lives behind one `tokio::sync::Mutex`. A connection task
//! routes each inbound message while holding that lock and pushes the
//! resulting envelopes into the recipients' outbound queues, so two
//! participants' moves never interleave and each recipient sees messages in
//! the order they were admitted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, info};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};

use crate::config::ServerConfig;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::router::{Envelope, MatchRouter};
use crate::session::{PlayerId, SessionState};
use crate::transport::tcp::ServerTcp;
use crate::transport::Transport;

/// A match together with the live connections of its participants.
#[derive(Default)]
pub struct MatchRoom {
    router: MatchRouter,
    connections: HashMap<PlayerId, mpsc::UnboundedSender<ServerMessage>>,
}

pub type SharedMatch = Arc<Mutex<MatchRoom>>;

impl MatchRoom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only access to the match state, for tests and tooling.
    pub fn router(&self) -> &MatchRouter {
        &self.router
    }

    /// Whether `id` still has a live connection. Used by tests and tooling.
    pub fn is_connected(&self, id: &PlayerId) -> bool {
        self.connections.contains_key(id)
    }

    /// Route one inbound message and queue the replies.
    pub fn handle(&mut self, sender: &PlayerId, msg: ClientMessage) {
        let envelopes = self.router.route(sender, msg);
        self.deliver(envelopes);
    }

    fn deliver(&self, envelopes: Vec<Envelope>) {
        for Envelope { to, message } in envelopes {
            match self.connections.get(&to) {
                Some(tx) => {
                    if tx.send(message).is_err() {
                        debug!("outbound queue for {} is closed", to);
                    }
                }
                None => debug!("dropping {:?} for disconnected {}", message, to),
            }
        }
    }
}

/// A participant's place in a match, handed out by [`Lobby::admit`].
pub struct Seat {
    pub id: PlayerId,
    pub room: SharedMatch,
    pub outbox: mpsc::UnboundedReceiver<ServerMessage>,
}

/// Pairs incoming connections into two-player matches.
pub struct Lobby {
    open: Mutex<Option<SharedMatch>>,
    next_id: AtomicU64,
}

impl Default for Lobby {
    fn default() -> Self {
        Self::new()
    }
}

impl Lobby {
    pub fn new() -> Self {
        Self {
            open: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Seat a new participant in the open match, creating one if needed.
    pub async fn admit(&self) -> anyhow::Result<Seat> {
        let id = PlayerId::new(format!("Player{}", self.next_id.fetch_add(1, Ordering::SeqCst)));
        let (tx, outbox) = mpsc::unbounded_channel();

        let mut open = self.open.lock().await;
        let room = open
            .take()
            .unwrap_or_else(|| Arc::new(Mutex::new(MatchRoom::new())));
        {
            let mut guard = room.lock().await;
            guard.connections.insert(id.clone(), tx);
            let envelopes = match guard.router.join(id.clone()) {
                Ok(envelopes) => envelopes,
                Err(e) => {
                    guard.connections.remove(&id);
                    return Err(anyhow::anyhow!("{} could not join: {}", id, e));
                }
            };
            guard.deliver(envelopes);
            if !guard.router.session().is_full() {
                *open = Some(Arc::clone(&room));
            }
        }
        Ok(Seat { id, room, outbox })
    }

    /// Drop a participant's live connection. The match itself carries on;
    /// a match still forming with nobody left in it is discarded.
    pub async fn release(&self, id: &PlayerId, room: &SharedMatch) {
        let mut open = self.open.lock().await;
        let mut guard = room.lock().await;
        guard.connections.remove(id);
        let notices = guard.router.leave(id);
        guard.deliver(notices);

        let abandoned = guard.connections.is_empty()
            && guard.router.session().state() == SessionState::Forming;
        if abandoned && open.as_ref().is_some_and(|o| Arc::ptr_eq(o, room)) {
            info!("discarding abandoned match of {}", id);
            *open = None;
        }
    }

    /// Seat a new connection and serve it until its transport fails or
    /// closes.
    pub async fn serve_connection<T>(&self, transport: T) -> anyhow::Result<()>
    where
        T: Transport<ServerMessage, ClientMessage>,
    {
        let seat = self.admit().await?;
        self.serve_seat(seat, transport).await
    }

    /// Serve an already admitted participant over `transport`, releasing the
    /// seat when the transport goes away.
    pub async fn serve_seat<T>(&self, seat: Seat, mut transport: T) -> anyhow::Result<()>
    where
        T: Transport<ServerMessage, ClientMessage>,
    {
        let Seat {
            id,
            room,
            mut outbox,
        } = seat;
        let result = pump(&id, &room, &mut transport, &mut outbox).await;
        self.release(&id, &room).await;
        result
    }
}

/// Shuttle messages between one transport and its match until the
/// transport fails.
async fn pump<T>(
    id: &PlayerId,
    room: &SharedMatch,
    transport: &mut T,
    outbox: &mut mpsc::UnboundedReceiver<ServerMessage>,
) -> anyhow::Result<()>
where
    T: Transport<ServerMessage, ClientMessage>,
{
    loop {
        tokio::select! {
            inbound = transport.recv() => {
                let msg = inbound?;
                room.lock().await.handle(id, msg);
            }
            Some(msg) = outbox.recv() => {
                transport.send(msg).await?;
            }
        }
    }
}

/// Bind to `config.bind` and serve matches until the listener fails.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&config.bind).await?;
    info!("listening on {}", listener.local_addr()?);
    serve(listener, config).await
}

/// Accept connections on an already bound listener.
pub async fn serve(listener: TcpListener, config: ServerConfig) -> anyhow::Result<()> {
    let lobby = Arc::new(Lobby::new());
    loop {
        let (stream, addr) = listener.accept().await?;
        info!("connection from {}", addr);
        let transport = ServerTcp::with_limits(stream, config.max_frame_size, config.send_timeout);
        let lobby = Arc::clone(&lobby);
        tokio::spawn(async move {
            if let Err(e) = lobby.serve_connection(transport).await {
                info!("connection from {} closed: {}", addr, e);
            }
        });
    }
}
