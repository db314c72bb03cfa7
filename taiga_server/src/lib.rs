//! `taiga_server`
//!
//! Server-side systems:
//! - Fixed timestep simulation over a slot table of sessions
//! - Procedural world layout and per-session reveal tracking
//! - Alliance registry and membership packets
//! - Receives intent messages, broadcasts state snapshots
//!
//! Networking model:
//! - TCP with length-prefixed JSON frames
//! - A single world task; connection tasks only enqueue events

pub mod clan;
pub mod interest;
pub mod server;
pub mod session;
pub mod world;
pub mod worldgen;

pub use server::GameServer;
