//! Fundamental identifiers and geometric types.
//!
//! World space follows the host engine convention: x = East, y = Up,
//! z = North. The radar works on the horizontal (x, z) plane.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Identity of a mobile roster entity (the observer included).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

/// Stable loot identity assigned by the host's loot registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LootKey(pub i32);

/// Handle used by the rendering collaborator to address one blip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id")]
pub enum BlipId {
    Enemy(EnemyId),
    Loot(LootKey),
}

/// Pose of the local observer for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    /// World position of the observer's feet.
    pub position: Vec3,
    /// Orientation of the radar's reference frame (usually the camera yaw).
    pub orientation: Quat,
}

/// Frame clock for the radar tick driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameTime {
    /// Number of ticks processed since the session started.
    pub frame: u64,
    /// Host time of this tick in seconds.
    pub now_secs: f32,
}

impl Observer {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Observer position projected onto the horizontal plane.
    pub fn planar_position(&self) -> Vec2 {
        planar(self.position)
    }

    /// Offset of a world point relative to the observer.
    pub fn offset_to(&self, world: Vec3) -> Vec3 {
        world - self.position
    }
}

impl Default for Observer {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY)
    }
}

/// Project a world position onto the horizontal (x, z) plane.
pub fn planar(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Squared horizontal distance of an offset (vertical component ignored).
pub fn planar_length_squared(offset: Vec3) -> f32 {
    offset.x * offset.x + offset.z * offset.z
}

impl BlipId {
    pub fn is_loot(&self) -> bool {
        matches!(self, BlipId::Loot(_))
    }
}

impl FrameTime {
    /// Advance to the next tick at the given host time.
    pub fn advance(&mut self, now_secs: f32) {
        self.frame += 1;
        self.now_secs = now_secs;
    }
}
