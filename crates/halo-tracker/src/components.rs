//! ECS components for tracked entities.
//!
//! Every tracked entity carries a `BlipState` plus exactly one of
//! `EnemyBlip` or `LootBlip`. `TrackedEntity` is the owned sum of the two,
//! used when spawning and when handing an entity out of the world.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use halo_core::enums::*;
use halo_core::types::{BlipId, EnemyId, LootKey};

/// A roster entity other than the observer. Never despawned within a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyBlip {
    pub id: EnemyId,
    pub life: LifeState,
    pub in_combat: bool,
    pub faction: Faction,
    /// World position read on the last scan.
    pub position: Vec3,
    /// Position relative to the observer, as of the last scan.
    pub offset: Vec3,
    /// Set once a scan has read a position for this enemy.
    pub located: bool,
}

/// A loot item priced at or above the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LootBlip {
    pub key: LootKey,
    pub price: u32,
    /// World position snapshot.
    pub position: Vec3,
    /// Planar point the item is stored under in the spatial index.
    pub indexed_at: Vec2,
    /// Position relative to the observer, as of the last scan.
    pub offset: Vec3,
}

/// Per-entity drawable state, rewritten by the systems each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BlipState {
    pub visible: bool,
    pub category: BlipCategory,
    pub height: HeightBand,
    pub disc_position: Vec2,
    pub alpha: f32,
}

/// Owned tracked entity of either population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TrackedEntity {
    Enemy(EnemyBlip),
    Loot(LootBlip),
}

/// What the projection systems need to know about a tracked entity.
pub trait Projectable {
    fn blip_id(&self) -> BlipId;

    /// Observer-relative offset used for range and projection.
    fn offset(&self) -> Vec3;

    /// Blip variant for the given height band.
    fn category(&self, height: HeightBand) -> BlipCategory;

    /// Colour key for the renderer. `None` for entities without allegiance.
    fn faction(&self) -> Option<Faction> {
        None
    }
}

impl EnemyBlip {
    pub fn new(id: EnemyId, faction: Faction) -> Self {
        Self {
            id,
            life: LifeState::Alive,
            in_combat: true,
            faction,
            position: Vec3::ZERO,
            offset: Vec3::ZERO,
            located: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life == LifeState::Alive
    }
}

impl LootBlip {
    /// A loot entity indexed at its announced position.
    pub fn new(key: LootKey, price: u32, position: Vec3) -> Self {
        Self {
            key,
            price,
            position,
            indexed_at: halo_core::types::planar(position),
            offset: Vec3::ZERO,
        }
    }
}

impl Projectable for EnemyBlip {
    fn blip_id(&self) -> BlipId {
        BlipId::Enemy(self.id)
    }

    fn offset(&self) -> Vec3 {
        self.offset
    }

    fn category(&self, height: HeightBand) -> BlipCategory {
        match self.life {
            LifeState::Alive => BlipCategory::for_enemy(height),
            LifeState::Dead => BlipCategory::Dead,
        }
    }

    fn faction(&self) -> Option<Faction> {
        Some(self.faction)
    }
}

impl Projectable for LootBlip {
    fn blip_id(&self) -> BlipId {
        BlipId::Loot(self.key)
    }

    fn offset(&self) -> Vec3 {
        self.offset
    }

    fn category(&self, _height: HeightBand) -> BlipCategory {
        BlipCategory::Loot
    }
}

impl Projectable for TrackedEntity {
    fn blip_id(&self) -> BlipId {
        match self {
            TrackedEntity::Enemy(e) => e.blip_id(),
            TrackedEntity::Loot(l) => l.blip_id(),
        }
    }

    fn offset(&self) -> Vec3 {
        match self {
            TrackedEntity::Enemy(e) => e.offset(),
            TrackedEntity::Loot(l) => l.offset(),
        }
    }

    fn category(&self, height: HeightBand) -> BlipCategory {
        match self {
            TrackedEntity::Enemy(e) => e.category(height),
            TrackedEntity::Loot(l) => l.category(height),
        }
    }

    fn faction(&self) -> Option<Faction> {
        match self {
            TrackedEntity::Enemy(e) => e.faction(),
            TrackedEntity::Loot(l) => l.faction(),
        }
    }
}
