//! Frame snapshot: the complete drawable radar state produced each tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::RadarEvent;
use crate::types::{BlipId, FrameTime};

/// Complete radar state handed to the rendering collaborator after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RadarFrame {
    pub time: FrameTime,
    /// Whether this tick ran a full scan (positions re-projected).
    pub scanned: bool,
    /// Bearing of the reference frame's forward direction (degrees).
    /// Blips are counter-rotated by this amount.
    pub frame_bearing_deg: f32,
    pub hud: HudPlacement,
    /// Per-blip updates: hides first, then visible enemies, then visible loot.
    pub updates: Vec<BlipUpdate>,
    pub events: Vec<RadarEvent>,
    pub tracked_enemies: u32,
    pub tracked_loot: u32,
}

/// Drawable state of one visible blip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlipView {
    pub id: BlipId,
    pub category: BlipCategory,
    pub height: HeightBand,
    /// Faction for enemies; `None` for loot.
    pub faction: Option<Faction>,
    /// Offset from the disc centre in drawable units.
    pub disc_position: Vec2,
    /// Fade multiplier in [0, 1].
    pub alpha: f32,
    /// Uniform scale of the blip sprite.
    pub size: f32,
}

/// One instruction for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BlipUpdate {
    /// Draw the blip with this state.
    Show(BlipView),
    /// Make the blip fully transparent. Sent once when a blip stops being visible.
    Hide { id: BlipId },
}

/// HUD placement derived from the size and offset settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HudPlacement {
    pub offset: Vec2,
    pub scale: f32,
}

/// Drawable extent of the radar disc, supplied by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscLayout {
    /// Unscaled size of the blip container rectangle.
    pub size: Vec2,
    /// Current local scale of the container.
    pub scale: Vec2,
}

impl BlipUpdate {
    pub fn id(&self) -> BlipId {
        match self {
            BlipUpdate::Show(view) => view.id,
            BlipUpdate::Hide { id } => *id,
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, BlipUpdate::Show(_))
    }
}

impl RadarFrame {
    /// Visible blips in this frame.
    pub fn visible(&self) -> impl Iterator<Item = &BlipView> {
        self.updates.iter().filter_map(|u| match u {
            BlipUpdate::Show(view) => Some(view),
            BlipUpdate::Hide { .. } => None,
        })
    }

    /// Blips that were told to go transparent this frame.
    pub fn hidden(&self) -> impl Iterator<Item = BlipId> + '_ {
        self.updates.iter().filter_map(|u| match u {
            BlipUpdate::Hide { id } => Some(*id),
            BlipUpdate::Show(_) => None,
        })
    }

    /// Find the visible state of one blip.
    pub fn view(&self, id: BlipId) -> Option<&BlipView> {
        self.visible().find(|v| v.id == id)
    }
}

impl DiscLayout {
    pub fn new(size: Vec2, scale: Vec2) -> Self {
        Self { size, scale }
    }

    /// Radius of the circular area blips may occupy.
    pub fn radius(&self) -> f32 {
        let scaled = self.size * self.scale;
        scaled.x.min(scaled.y) * crate::constants::DISC_RADIUS_FACTOR
    }
}

impl Default for DiscLayout {
    fn default() -> Self {
        Self::new(Vec2::splat(256.0), Vec2::ONE)
    }
}
