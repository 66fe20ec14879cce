//! Loot scan: which tracked loot is within radar range this scan.
//!
//! Only the spatial index is consulted; loot outside the query circle is
//! never touched. Items that drop out of the result are queued for a single
//! hide update.

use std::collections::{BTreeMap, BTreeSet};

use hecs::{Entity, World};
use tracing::trace;

use halo_core::types::{BlipId, LootKey};
use halo_index::Quadtree;

use crate::components::{BlipState, LootBlip, Projectable};
use crate::context::TickContext;
use crate::projection::{height_band, project};
use crate::tracker::IndexedLoot;

/// Refresh loot visibility from a range query around the observer.
pub fn scan(
    world: &mut World,
    index: Option<&Quadtree<IndexedLoot>>,
    loot: &BTreeMap<LootKey, Entity>,
    visible: &mut BTreeSet<LootKey>,
    ctx: &TickContext<'_>,
    to_hide: &mut Vec<BlipId>,
) {
    let hits: BTreeMap<LootKey, Entity> = match index {
        Some(index) => index
            .query_range(ctx.observer.planar_position(), ctx.config.radar_range)
            .into_iter()
            .map(|hit| (hit.key, hit.entity))
            .collect(),
        None => BTreeMap::new(),
    };

    for key in visible.iter().filter(|key| !hits.contains_key(key)) {
        let Some(&entity) = loot.get(key) else {
            continue;
        };
        if let Ok(mut state) = world.get::<&mut BlipState>(entity) {
            state.visible = false;
        }
        to_hide.push(BlipId::Loot(*key));
    }

    let params = ctx.projection();
    for &entity in hits.values() {
        if let Ok((blip, state)) = world.query_one_mut::<(&mut LootBlip, &mut BlipState)>(entity) {
            blip.offset = ctx.offset_to(blip.position);
            state.visible = true;
            state.height = height_band(blip.offset.y, ctx.config.height_threshold);
            state.category = blip.category(state.height);
            state.disc_position = project(blip.offset, ctx.observer.orientation, &params);
        }
    }

    trace!(in_range = hits.len(), was = visible.len(), "loot scan");
    *visible = hits.into_keys().collect();
}

/// Apply this tick's fade to every visible loot blip.
pub fn fade(world: &mut World, alpha: f32) {
    for (_entity, (_blip, state)) in world.query_mut::<(&LootBlip, &mut BlipState)>() {
        if state.visible {
            state.alpha = alpha;
        }
    }
}
