//! Standalone server binary.
//!
//! Usage:
//!   cargo run -p taiga_server -- [--config server.json] [--addr 127.0.0.1:5000]
//!       [--max-players 50] [--tick-ms 9] [--seed 1234]
//!
//! A config file, when given, replaces the built-in defaults; flags after it
//! override individual fields.

use std::env;

use anyhow::Context;
use taiga_server::server::GameServer;
use taiga_shared::config::GameConfig;
use tracing::info;

fn parse_args() -> anyhow::Result<GameConfig> {
    let mut cfg = GameConfig::default();
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                let raw = std::fs::read_to_string(&args[i + 1])
                    .with_context(|| format!("read config file {}", args[i + 1]))?;
                cfg = GameConfig::from_json_str(&raw)
                    .with_context(|| format!("parse config file {}", args[i + 1]))?;
                i += 2;
            }
            "--addr" if i + 1 < args.len() => {
                cfg.listen_addrs = vec![args[i + 1].clone()];
                i += 2;
            }
            "--max-players" if i + 1 < args.len() => {
                cfg.max_players = args[i + 1].parse().unwrap_or(cfg.max_players);
                i += 2;
            }
            "--tick-ms" if i + 1 < args.len() => {
                cfg.tick_ms = args[i + 1].parse().unwrap_or(cfg.tick_ms);
                i += 2;
            }
            "--seed" if i + 1 < args.len() => {
                cfg.world_seed = args[i + 1].parse().ok();
                i += 2;
            }
            _ => i += 1,
        }
    }
    Ok(cfg)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cfg = parse_args()?;
    info!(
        addrs = ?cfg.listen_addrs,
        max_players = cfg.max_players,
        tick_ms = cfg.tick_ms,
        "starting server"
    );

    let server = GameServer::bind(cfg).await.context("bind server")?;
    server.run().await
}
