//! Enumeration types used throughout the radar.

use serde::{Deserialize, Serialize};

/// Life state of a tracked enemy. Transitions only from `Alive` to `Dead`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeState {
    #[default]
    Alive,
    Dead,
}

/// Outcome of a loot "added" notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LootPhase {
    /// Priced at or above the threshold and present in the index.
    Tracked,
    /// Priced below the threshold or without a usable position; never indexed.
    Rejected,
}

/// Vertical position of an entity relative to the observer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeightBand {
    #[default]
    Level,
    Above,
    Below,
}

/// Discrete blip variant chosen by the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlipCategory {
    #[default]
    PlayerLevel,
    PlayerAbove,
    PlayerBelow,
    Dead,
    Loot,
}

/// Allegiance of a roster entity. The renderer maps it to a colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// Regular AI-controlled scavenger.
    Scav,
    /// Boss, follower or any other special AI role.
    Boss,
    Bear,
    Usec,
    #[default]
    Unknown,
}

impl BlipCategory {
    /// Category for a living enemy in the given height band.
    pub fn for_enemy(band: HeightBand) -> Self {
        match band {
            HeightBand::Level => BlipCategory::PlayerLevel,
            HeightBand::Above => BlipCategory::PlayerAbove,
            HeightBand::Below => BlipCategory::PlayerBelow,
        }
    }
}
