//! Scripted load driver for a running server.
//!
//! Connects a handful of bot sessions that register and then wander on a
//! slowly turning heading with the attack button held. Reports how many
//! frames each bot received before disconnecting.
//!
//! Usage:
//!   cargo run -p taiga_tests --bin bot_runner -- [addr] [bots] [seconds]

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;
use tracing::info;

use taiga_shared::wire::{self, ClientMsg, FramedConn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let addr: SocketAddr = args
        .get(1)
        .map(String::as_str)
        .unwrap_or("127.0.0.1:5000")
        .parse()
        .context("parse server address")?;
    let bots: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(4);
    let seconds: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(10);

    info!(%addr, bots, seconds, "starting bot run");

    let mut handles = Vec::new();
    for n in 0..bots {
        handles.push(tokio::spawn(run_bot(addr, n, Duration::from_secs(seconds))));
    }
    for (n, handle) in handles.into_iter().enumerate() {
        match handle.await? {
            Ok(frames) => info!(bot = n, frames, "bot finished"),
            Err(e) => info!(bot = n, error = %e, "bot failed"),
        }
    }
    Ok(())
}

/// One scripted session. The read half runs on its own task so socket
/// reads never block the input cadence.
async fn run_bot(addr: SocketAddr, n: usize, duration: Duration) -> Result<u64> {
    let conn = FramedConn::connect(addr).await.context("connect")?;
    let (mut reader, mut writer) = conn.into_inner().into_split();

    let counter = tokio::spawn(async move {
        let mut frames = 0u64;
        while wire::read_frame(&mut reader).await.is_ok() {
            frames += 1;
        }
        frames
    });

    let register = ClientMsg::Register {
        name: format!("bot-{n}"),
        skin: (n % 6) as i64,
    };
    writer.write_all(&register.encode_frame()?).await?;

    let deadline = tokio::time::Instant::now() + duration;
    let mut heading = n as f32;
    while tokio::time::Instant::now() < deadline {
        heading += 0.4;
        writer
            .write_all(&ClientMsg::Move(Some(heading)).encode_frame()?)
            .await?;
        writer
            .write_all(
                &ClientMsg::Attack {
                    attacking: true,
                    placing_angle: None,
                }
                .encode_frame()?,
            )
            .await?;
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    // Dropping the write half sends the FIN that winds the whole
    // connection down, server side included.
    drop(writer);
    Ok(counter.await?)
}
