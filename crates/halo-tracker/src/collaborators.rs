//! Interfaces to the host engine.
//!
//! The radar never talks to the game directly. Everything it reads about the
//! world, every change notification it receives and every drawing call it
//! makes goes through these traits, so the tracker runs headless in tests
//! and in the demo host.

use std::sync::mpsc::Sender;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use halo_core::config::{ConfigKey, ConfigValue, RadarConfig};
use halo_core::enums::Faction;
use halo_core::events::{LootEvent, LootItem};
use halo_core::state::{DiscLayout, RadarFrame};
use halo_core::types::{BlipId, EnemyId, LootKey, Observer};

use crate::combat::CombatSignals;

/// Handle returned by `subscribe`, used to cancel the subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

/// Read access to the host's mobile entities.
pub trait WorldRoster {
    /// Identity of the local observer inside the roster.
    fn observer_id(&self) -> Option<EnemyId>;

    /// Observer pose for this tick. `None` while the observer is not spawned.
    fn observer(&self) -> Option<Observer>;

    /// Number of roster entities, the observer included. Must be cheap.
    fn roster_len(&self) -> usize;

    /// Every roster identity, the observer included.
    fn roster_ids(&self) -> Vec<EnemyId>;

    fn position(&self, id: EnemyId) -> Option<Vec3>;

    fn is_alive(&self, id: EnemyId) -> bool;

    /// AI combat memory. `None` for entities without an AI controller.
    fn combat_signals(&self, id: EnemyId) -> Option<CombatSignals>;

    fn faction(&self, id: EnemyId) -> Faction;
}

/// Read access to the host's loot registry.
pub trait LootSource {
    /// Every loot item currently in the world.
    fn loot_items(&self) -> Vec<LootItem>;

    /// Current position of one item.
    fn position_of(&self, key: LootKey) -> Option<Vec3>;

    /// Best trader offer for one item. `None` when no trader buys it.
    fn best_offer(&self, key: LootKey) -> Option<u32>;
}

/// Delivers loot roster changes.
pub trait ChangeNotifier {
    fn subscribe(&mut self, tx: Sender<LootEvent>) -> SubscriptionId;

    /// Cancel a subscription. Unknown ids are ignored.
    fn unsubscribe(&mut self, id: SubscriptionId);
}

/// Owns the live settings and announces changes by key.
pub trait ConfigSource {
    fn current(&self) -> RadarConfig;

    /// Apply one change and notify every subscriber.
    fn set(&mut self, value: ConfigValue);

    fn subscribe(&mut self, tx: Sender<ConfigKey>) -> SubscriptionId;

    fn unsubscribe(&mut self, id: SubscriptionId);
}

/// Rendering collaborator. Owns the blip sprites and draws each frame.
pub trait BlipSink {
    /// Current drawable extent of the disc.
    fn disc_layout(&self) -> DiscLayout;

    /// Create the sprite for a newly tracked entity.
    fn spawn_blip(&mut self, id: BlipId);

    /// Release the sprite of an entity that is no longer tracked.
    fn destroy_blip(&mut self, id: BlipId);

    /// Draw one finished frame.
    fn present(&mut self, frame: &RadarFrame);
}

/// Everything the engine needs from the host besides the renderer.
pub trait RadarHost: WorldRoster + LootSource + ChangeNotifier + ConfigSource {}

impl<T> RadarHost for T where T: WorldRoster + LootSource + ChangeNotifier + ConfigSource {}

/// A sink that draws nothing. Useful for batch runs and benchmarks.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink {
    pub layout: DiscLayout,
}

impl BlipSink for NullSink {
    fn disc_layout(&self) -> DiscLayout {
        self.layout
    }

    fn spawn_blip(&mut self, _id: BlipId) {}

    fn destroy_blip(&mut self, _id: BlipId) {}

    fn present(&mut self, _frame: &RadarFrame) {}
}
