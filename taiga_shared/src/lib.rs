//! `taiga_shared`
//!
//! Libraries shared by the game server, its tests and future clients.
//!
//! Design goals:
//! - Deterministic and modular where practical.
//! - Clear separation of concerns (wire, math, config, entities).
//! - No `unsafe`.

pub mod config;
pub mod entity;
pub mod math;
pub mod wire;

pub mod prelude {
    //! Commonly used exports.

    pub use crate::config::*;
    pub use crate::entity::*;
    pub use crate::math::*;
    pub use crate::wire::*;
}
