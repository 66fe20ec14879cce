//! Events flowing into and out of the radar.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::types::{EnemyId, LootKey};

/// A loot item as announced by the host's loot registry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LootItem {
    pub key: LootKey,
    /// World position at the time of the announcement.
    pub position: Vec3,
}

/// Change to the host's loot roster, delivered through a `ChangeNotifier`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LootEvent {
    /// Item added to the world (dropped, spawned, revealed).
    Added { key: LootKey, item: LootItem },
    /// Item removed from the world (picked up, destroyed).
    Removed { key: LootKey },
    /// The whole loot roster was replaced; the index must be rebuilt.
    Reloaded,
}

/// Tracker-level changes reported alongside each frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RadarEvent {
    /// A new roster entity is now tracked.
    EnemyAcquired { id: EnemyId },
    /// A tracked enemy died.
    EnemyDied { id: EnemyId },
    /// Loot passed the price threshold and was indexed.
    LootTracked { key: LootKey, price: u32 },
    /// Loot was priced below the threshold and discarded.
    LootRejected { key: LootKey, price: u32 },
    /// Tracked loot was removed by the host.
    LootRemoved { key: LootKey },
    /// The loot index was rebuilt from the loot source.
    LootIndexRebuilt { tracked: usize },
    /// Loot tracking was switched off and the index released.
    LootIndexCleared,
}

impl LootEvent {
    /// Key of the affected item, if the event concerns a single item.
    pub fn key(&self) -> Option<LootKey> {
        match self {
            LootEvent::Added { key, .. } | LootEvent::Removed { key } => Some(*key),
            LootEvent::Reloaded => None,
        }
    }
}
