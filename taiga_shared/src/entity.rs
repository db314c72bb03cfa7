//! Static world entities and id allocation.
//!
//! Resources (trees, bushes, rocks, gold ore) are generated once at startup
//! and never move; clients learn about them lazily through the interest
//! query. Players are not entities in this sense, they live in session slots.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Resource kind, with its wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Tree,
    Bush,
    Rock,
    Gold,
}

impl ResourceKind {
    /// Numeric code used in object-spawn messages.
    pub fn code(self) -> u8 {
        match self {
            ResourceKind::Tree => 0,
            ResourceKind::Bush => 1,
            ResourceKind::Rock => 2,
            ResourceKind::Gold => 3,
        }
    }
}

/// An immobile map resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldEntity {
    pub id: u32,
    pub pos: Vec2,
    /// Visual rotation, radians.
    pub angle: f32,
    /// Collision/render radius.
    pub size: f32,
    pub kind: ResourceKind,
}

/// Monotonic id source. Wraps on overflow instead of panicking.
#[derive(Debug, Clone)]
pub struct IdCounter {
    next: u32,
}

impl IdCounter {
    pub fn starting_at(first: u32) -> Self {
        Self { next: first }
    }

    pub fn next(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }
}
