//! TCP plumbing around the world task.
//!
//! One accept loop per listener, one reader and one writer task per
//! connection, and a single world task owning all state. Connection tasks
//! never touch the world directly; they trade [`WorldEvent`]s and an
//! outbound frame channel with it, so decoding and socket stalls stay off
//! the tick path.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use taiga_shared::{
    config::GameConfig,
    wire::{self, ClientMsg, FramedConn, FramedListener, ServerMsg},
};

use crate::world::World;

/// Requests the connection tasks hand to the world task.
pub enum WorldEvent {
    /// A new connection wants a slot. The reply carries `None` when the
    /// server is full.
    Connect {
        tx: mpsc::UnboundedSender<Bytes>,
        reply: oneshot::Sender<Option<u32>>,
    },
    Message { slot: u32, msg: ClientMsg },
    Disconnect { slot: u32 },
}

pub struct GameServer {
    cfg: GameConfig,
    listeners: Vec<FramedListener>,
    events_tx: mpsc::UnboundedSender<WorldEvent>,
    events_rx: mpsc::UnboundedReceiver<WorldEvent>,
}

impl GameServer {
    /// Binds every configured listen address.
    pub async fn bind(cfg: GameConfig) -> Result<Self> {
        anyhow::ensure!(
            !cfg.listen_addrs.is_empty(),
            "no listen addresses configured"
        );
        let mut listeners = Vec::with_capacity(cfg.listen_addrs.len());
        for addr in &cfg.listen_addrs {
            let addr: SocketAddr = addr
                .parse()
                .with_context(|| format!("parse listen addr {addr}"))?;
            let listener = FramedListener::bind(addr).await?;
            info!(addr = %listener.local_addr()?, "listening");
            listeners.push(listener);
        }
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Ok(Self {
            cfg,
            listeners,
            events_tx,
            events_rx,
        })
    }

    pub fn local_addrs(&self) -> Result<Vec<SocketAddr>> {
        self.listeners.iter().map(FramedListener::local_addr).collect()
    }

    /// Runs the accept loops and the world task. Returns only when every
    /// event source is gone, which in practice means never.
    pub async fn run(self) -> Result<()> {
        let Self {
            cfg,
            listeners,
            events_tx,
            events_rx,
        } = self;
        for listener in listeners {
            tokio::spawn(accept_loop(listener, events_tx.clone()));
        }
        drop(events_tx);
        run_world(cfg, events_rx).await
    }
}

/// Binds a single ephemeral loopback port, ignoring `cfg.listen_addrs`.
/// For tests; the returned address is the one to connect to.
pub async fn bind_ephemeral(mut cfg: GameConfig) -> Result<(GameServer, SocketAddr)> {
    cfg.listen_addrs = vec!["127.0.0.1:0".into()];
    let server = GameServer::bind(cfg).await?;
    let addr = server.local_addrs()?[0];
    Ok((server, addr))
}

/// The world task: ticks on a fixed interval and drains intent events in
/// between. Both run on one task, so they never observe each other
/// half-applied.
async fn run_world(cfg: GameConfig, mut events: mpsc::UnboundedReceiver<WorldEvent>) -> Result<()> {
    let mut world = World::new(cfg);
    let mut ticker = tokio::time::interval(world.cfg().tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_tick = Instant::now();

    loop {
        tokio::select! {
            now = ticker.tick() => {
                // Wall-clock delta, not the nominal interval: a stalled
                // runtime must not slow the simulation down.
                let delta_ms = now.duration_since(last_tick).as_secs_f32() * 1000.0;
                last_tick = now;
                world.advance(delta_ms);
            }
            event = events.recv() => match event {
                Some(WorldEvent::Connect { tx, reply }) => {
                    let slot = world.connect(tx);
                    let _ = reply.send(slot);
                }
                Some(WorldEvent::Message { slot, msg }) => world.apply(slot, msg),
                Some(WorldEvent::Disconnect { slot }) => world.disconnect(slot),
                None => break,
            },
        }
    }
    Ok(())
}

async fn accept_loop(listener: FramedListener, events: mpsc::UnboundedSender<WorldEvent>) {
    loop {
        match listener.accept().await {
            Ok((conn, peer)) => {
                tokio::spawn(serve_connection(conn, peer, events.clone()));
            }
            Err(e) => {
                warn!(error = %e, "accept failed");
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        }
    }
}

/// Per-connection lifecycle: claim a slot, pump frames both ways, and end
/// with exactly one `Disconnect` whatever the exit path.
async fn serve_connection(
    conn: FramedConn,
    peer: SocketAddr,
    events: mpsc::UnboundedSender<WorldEvent>,
) {
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let (reply_tx, reply_rx) = oneshot::channel();
    let connect = WorldEvent::Connect {
        tx: out_tx,
        reply: reply_tx,
    };
    if events.send(connect).is_err() {
        return;
    }
    let Ok(slot) = reply_rx.await else {
        return;
    };

    let Some(slot) = slot else {
        debug!(%peer, "turning connection away, server full");
        let mut conn = conn;
        let _ = conn
            .send_server(&ServerMsg::Disconnect {
                reason: "server is full".into(),
            })
            .await;
        return;
    };
    info!(session = slot, %peer, "connected");

    let (mut reader, writer) = conn.into_inner().into_split();
    tokio::spawn(write_loop(writer, out_rx));

    // Frames that fail to decode are dropped; only transport faults and
    // oversized frames end the connection.
    loop {
        match wire::read_frame(&mut reader).await {
            Ok(payload) => match ClientMsg::decode_payload(&payload) {
                Ok(Some(msg)) => {
                    if events.send(WorldEvent::Message { slot, msg }).is_err() {
                        break;
                    }
                }
                Ok(None) => trace!(session = slot, "frame with unknown tag dropped"),
                Err(e) => debug!(session = slot, error = %e, "malformed frame dropped"),
            },
            Err(e) => {
                debug!(session = slot, %peer, error = %e, "read ended");
                break;
            }
        }
    }

    let _ = events.send(WorldEvent::Disconnect { slot });
    info!(session = slot, %peer, "disconnected");
}

/// Drains outbound frames onto the socket. Ends when the world frees the
/// slot and drops the sending half.
async fn write_loop(mut writer: OwnedWriteHalf, mut frames: mpsc::UnboundedReceiver<Bytes>) {
    while let Some(frame) = frames.recv().await {
        if let Err(e) = writer.write_all(&frame).await {
            debug!(error = %e, "write failed");
            break;
        }
    }
}
