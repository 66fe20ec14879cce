//! Snapshot system: queries the ECS world and builds a complete `RadarFrame`.
//!
//! This system is read-only. It never modifies the world.

use glam::Vec2;
use hecs::World;

use halo_core::events::RadarEvent;
use halo_core::state::*;
use halo_core::types::BlipId;

use crate::components::{BlipState, EnemyBlip, LootBlip, Projectable};
use crate::context::TickContext;
use crate::projection::frame_bearing;

/// Build the frame for this tick.
///
/// Updates are ordered hides first, then visible enemies by id, then visible
/// loot by key.
pub fn build_frame(
    world: &World,
    ctx: &TickContext<'_>,
    hides: Vec<BlipId>,
    events: Vec<RadarEvent>,
    tracked_enemies: usize,
    tracked_loot: usize,
) -> RadarFrame {
    let config = ctx.config;
    let size = config.blip_scale();

    let mut updates: Vec<BlipUpdate> = hides.into_iter().map(|id| BlipUpdate::Hide { id }).collect();
    updates.extend(build_views::<EnemyBlip>(world, size).into_iter().map(BlipUpdate::Show));
    updates.extend(build_views::<LootBlip>(world, size).into_iter().map(BlipUpdate::Show));

    RadarFrame {
        time: ctx.time,
        scanned: ctx.scan,
        frame_bearing_deg: frame_bearing(ctx.observer.orientation).to_degrees(),
        hud: HudPlacement {
            offset: Vec2::new(config.offset_x, config.offset_y),
            scale: config.radar_size,
        },
        updates,
        events,
        tracked_enemies: tracked_enemies as u32,
        tracked_loot: tracked_loot as u32,
    }
}

/// Visible blips of one population, sorted by id.
fn build_views<T>(world: &World, size: f32) -> Vec<BlipView>
where
    T: Projectable + hecs::Component,
{
    let mut views: Vec<BlipView> = world
        .query::<(&T, &BlipState)>()
        .iter()
        .filter(|(_, (_, state))| state.visible)
        .map(|(_, (blip, state))| BlipView {
            id: blip.blip_id(),
            category: state.category,
            height: state.height,
            faction: blip.faction(),
            disc_position: state.disc_position,
            alpha: state.alpha,
            size,
        })
        .collect();

    views.sort_by_key(|v| v.id);
    views
}
