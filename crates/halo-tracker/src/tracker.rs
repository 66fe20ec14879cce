//! Entity tracker: the live sets of tracked enemies and loot.
//!
//! `EntityTracker` owns the hecs world holding every tracked entity, the
//! key maps into it, and the loot spatial index. Every loot entity in the
//! world has exactly one entry in the index under the point recorded in its
//! `LootBlip::indexed_at`; the two are only ever changed together.
//!
//! Enemies are acquired by roster diff and never removed within a session.
//! Loot is added and removed by notification, or rebuilt wholesale from the
//! loot source.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;
use hecs::{Entity, World};
use tracing::{debug, info, trace, warn};

use halo_core::constants::{LOOT_INDEX_MIN_HALF_EXTENT, LOOT_INDEX_PADDING};
use halo_core::enums::LootPhase;
use halo_core::events::{LootItem, RadarEvent};
use halo_core::state::RadarFrame;
use halo_core::types::{planar, BlipId, EnemyId, LootKey};
use halo_index::{Keyed, Quadtree, Rect};

use crate::collaborators::{BlipSink, LootSource, WorldRoster};
use crate::components::{BlipState, EnemyBlip, LootBlip, TrackedEntity};
use crate::context::TickContext;
use crate::systems;

/// Payload stored in the loot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexedLoot {
    pub key: LootKey,
    pub entity: Entity,
}

impl Keyed for IndexedLoot {
    type Key = LootKey;

    fn key(&self) -> LootKey {
        self.key
    }
}

/// Owns every tracked entity and the loot index.
pub struct EntityTracker {
    world: World,
    enemies: BTreeMap<EnemyId, Entity>,
    loot: BTreeMap<LootKey, Entity>,
    /// `None` until the first loot item is indexed.
    index: Option<Quadtree<IndexedLoot>>,
    visible_loot: BTreeSet<LootKey>,
    /// Loot added by notification whose position is re-read on the next scan.
    pending_refresh: Vec<LootKey>,
    to_hide: Vec<BlipId>,
    events: Vec<RadarEvent>,
}

impl Default for EntityTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityTracker {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            enemies: BTreeMap::new(),
            loot: BTreeMap::new(),
            index: None,
            visible_loot: BTreeSet::new(),
            pending_refresh: Vec::new(),
            to_hide: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Read-only access to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    pub fn loot_count(&self) -> usize {
        self.loot.len()
    }

    /// Payloads currently in the loot index.
    pub fn indexed_count(&self) -> usize {
        self.index.as_ref().map_or(0, Quadtree::count)
    }

    pub fn index(&self) -> Option<&Quadtree<IndexedLoot>> {
        self.index.as_ref()
    }

    /// Owned copy of one tracked entity.
    pub fn entity(&self, id: BlipId) -> Option<TrackedEntity> {
        match id {
            BlipId::Enemy(id) => {
                let entity = *self.enemies.get(&id)?;
                let blip = self.world.get::<&EnemyBlip>(entity).ok()?;
                Some(TrackedEntity::Enemy(*blip))
            }
            BlipId::Loot(key) => {
                let entity = *self.loot.get(&key)?;
                let blip = self.world.get::<&LootBlip>(entity).ok()?;
                Some(TrackedEntity::Loot(*blip))
            }
        }
    }

    /// Drawable state of one tracked entity.
    pub fn blip_state(&self, id: BlipId) -> Option<BlipState> {
        let entity = match id {
            BlipId::Enemy(id) => *self.enemies.get(&id)?,
            BlipId::Loot(key) => *self.loot.get(&key)?,
        };
        self.world.get::<&BlipState>(entity).ok().map(|state| *state)
    }

    pub fn is_visible(&self, id: BlipId) -> bool {
        self.blip_state(id).is_some_and(|state| state.visible)
    }

    /// Drain the events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<RadarEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Loot lifecycle ---

    /// Discard all loot and rebuild the index from the loot source.
    ///
    /// Items priced below `threshold` are skipped. The index bounds enclose
    /// every accepted item with padding. Returns the number of items tracked.
    pub fn rebuild_loot(
        &mut self,
        source: &dyn LootSource,
        threshold: u32,
        sink: &mut dyn BlipSink,
    ) -> usize {
        self.release_loot(sink);

        let mut accepted: BTreeMap<LootKey, (LootItem, u32)> = BTreeMap::new();
        let mut rejected = 0usize;
        for item in source.loot_items() {
            if !item.position.is_finite() {
                warn!(key = item.key.0, "loot item has no usable position");
                continue;
            }
            let price = source.best_offer(item.key).unwrap_or(0);
            if price < threshold {
                rejected += 1;
                continue;
            }
            if accepted.insert(item.key, (item, price)).is_some() {
                warn!(key = item.key.0, "duplicate loot key in source; keeping the last");
            }
        }

        let bounds = Rect::enclosing(accepted.values().map(|(item, _)| planar(item.position)))
            .map(|r| r.padded(LOOT_INDEX_PADDING, LOOT_INDEX_MIN_HALF_EXTENT));
        self.index = bounds.map(Quadtree::new);

        for (key, (item, price)) in accepted {
            self.spawn_loot(LootBlip::new(key, price, item.position), sink);
        }

        let tracked = self.loot.len();
        info!(tracked, rejected, threshold, ?bounds, "loot index rebuilt");
        self.events.push(RadarEvent::LootIndexRebuilt { tracked });
        tracked
    }

    /// Stop tracking loot: destroy every loot blip and release the index.
    pub fn clear_loot(&mut self, sink: &mut dyn BlipSink) {
        let released = self.release_loot(sink);
        info!(released, "loot tracking cleared");
        self.events.push(RadarEvent::LootIndexCleared);
    }

    /// Handle an "added" notification.
    ///
    /// An unpriced item counts as price 0. Re-adding a tracked key replaces
    /// the old entry. The item is indexed at its announced position and its
    /// position is re-read from the loot source on the next scan.
    pub fn add_loot(
        &mut self,
        item: LootItem,
        price: Option<u32>,
        threshold: u32,
        sink: &mut dyn BlipSink,
    ) -> LootPhase {
        if !item.position.is_finite() {
            warn!(key = item.key.0, "loot announced without a usable position");
            return LootPhase::Rejected;
        }

        if self.loot.contains_key(&item.key) {
            warn!(key = item.key.0, "loot key already tracked; replacing");
            self.remove_loot(item.key, sink);
        }

        let price = price.unwrap_or(0);
        if price < threshold {
            debug!(key = item.key.0, price, threshold, "loot rejected");
            self.events.push(RadarEvent::LootRejected {
                key: item.key,
                price,
            });
            return LootPhase::Rejected;
        }

        self.spawn_loot(LootBlip::new(item.key, price, item.position), sink);
        self.pending_refresh.push(item.key);

        debug!(key = item.key.0, price, "loot tracked");
        self.events.push(RadarEvent::LootTracked {
            key: item.key,
            price,
        });
        LootPhase::Tracked
    }

    /// Handle a "removed" notification. Unknown keys are ignored.
    pub fn remove_loot(&mut self, key: LootKey, sink: &mut dyn BlipSink) -> bool {
        let Some(entity) = self.loot.remove(&key) else {
            trace!(key = key.0, "stale loot removal ignored");
            return false;
        };

        let indexed_at = self.world.get::<&LootBlip>(entity).map(|blip| blip.indexed_at).ok();
        if let (Some(index), Some(point)) = (self.index.as_mut(), indexed_at) {
            if !index.remove(point, &key) {
                warn!(key = key.0, ?point, "tracked loot was missing from the index");
            }
        }
        if self.world.despawn(entity).is_err() {
            warn!(key = key.0, "tracked loot had no entity");
        }

        let id = BlipId::Loot(key);
        self.visible_loot.remove(&key);
        self.pending_refresh.retain(|k| *k != key);
        self.to_hide.retain(|hidden| *hidden != id);
        sink.destroy_blip(id);

        debug!(key = key.0, "loot removed");
        self.events.push(RadarEvent::LootRemoved { key });
        true
    }

    // --- Per-tick updates ---

    /// Acquire new enemies (scan ticks only) and update every enemy.
    pub fn refresh_enemies(
        &mut self,
        roster: &dyn WorldRoster,
        ctx: &TickContext<'_>,
        sink: &mut dyn BlipSink,
    ) {
        if ctx.scan {
            systems::roster::run(
                &mut self.world,
                &mut self.enemies,
                roster,
                sink,
                &mut self.events,
            );
        }
        systems::enemies::run(&mut self.world, roster, ctx, &mut self.to_hide, &mut self.events);
    }

    /// Re-evaluate which loot is within range. Does nothing off scan ticks.
    pub fn refresh_loot(&mut self, source: &dyn LootSource, ctx: &TickContext<'_>) {
        if !ctx.scan {
            return;
        }
        self.apply_pending_refresh(source);
        systems::loot::scan(
            &mut self.world,
            self.index.as_ref(),
            &self.loot,
            &mut self.visible_loot,
            ctx,
            &mut self.to_hide,
        );
    }

    /// Finish the tick: apply the fade and hand out the frame.
    pub fn build_frame(&mut self, ctx: &TickContext<'_>) -> RadarFrame {
        systems::loot::fade(&mut self.world, ctx.alpha());
        let hides = std::mem::take(&mut self.to_hide);
        let events = self.take_events();
        systems::snapshot::build_frame(
            &self.world,
            ctx,
            hides,
            events,
            self.enemies.len(),
            self.loot.len(),
        )
    }

    /// Destroy every blip and forget every entity.
    pub fn shutdown(&mut self, sink: &mut dyn BlipSink) {
        for id in self.enemies.keys() {
            sink.destroy_blip(BlipId::Enemy(*id));
        }
        for key in self.loot.keys() {
            sink.destroy_blip(BlipId::Loot(*key));
        }
        info!(
            enemies = self.enemies.len(),
            loot = self.loot.len(),
            "tracker shut down"
        );
        *self = Self::new();
    }

    // --- Internals ---

    fn spawn_loot(&mut self, blip: LootBlip, sink: &mut dyn BlipSink) {
        let key = blip.key;
        let point = blip.indexed_at;
        let entity = self.world.spawn((blip, BlipState::default()));
        self.loot.insert(key, entity);
        self.index_insert(point, IndexedLoot { key, entity });
        sink.spawn_blip(BlipId::Loot(key));
    }

    /// Insert into the index, growing it first if the point lies outside.
    fn index_insert(&mut self, point: Vec2, payload: IndexedLoot) {
        if let Some(index) = self.index.as_mut() {
            if index.insert(point, payload) {
                return;
            }
        }

        let target = Rect::from_min_max(point, point);
        let bounds = match &self.index {
            Some(index) => index.bounds().union(&target),
            None => target,
        }
        .padded(LOOT_INDEX_PADDING, LOOT_INDEX_MIN_HALF_EXTENT);

        let mut grown = Quadtree::new(bounds);
        if let Some(old) = self.index.take() {
            for (p, item) in old.iter() {
                if !grown.insert(p, *item) {
                    warn!(key = item.key.0, point = ?p, "indexed loot lost during regrowth");
                }
            }
        }
        if !grown.insert(point, payload) {
            warn!(key = payload.key.0, ?point, "loot point outside the regrown index");
        }
        debug!(?bounds, indexed = grown.count(), "loot index regrown");
        self.index = Some(grown);
    }

    /// Re-read positions of loot added by notification and move their index
    /// entries to match.
    fn apply_pending_refresh(&mut self, source: &dyn LootSource) {
        for key in std::mem::take(&mut self.pending_refresh) {
            let Some(&entity) = self.loot.get(&key) else {
                continue;
            };
            let fresh = source.position_of(key).filter(|p| p.is_finite());

            let moved = {
                let Ok(mut blip) = self.world.get::<&mut LootBlip>(entity) else {
                    continue;
                };
                match fresh {
                    Some(position) if planar(position) != blip.indexed_at => {
                        let old = blip.indexed_at;
                        blip.position = position;
                        blip.indexed_at = planar(position);
                        Some((old, blip.indexed_at))
                    }
                    Some(position) => {
                        blip.position = position;
                        None
                    }
                    None => None,
                }
            };

            if let Some((old, new)) = moved {
                if let Some(index) = self.index.as_mut() {
                    index.remove(old, &key);
                }
                self.index_insert(new, IndexedLoot { key, entity });
                trace!(key = key.0, ?old, ?new, "loot position refreshed");
            }
        }
    }

    /// Despawn all loot and drop the index without recording an event.
    fn release_loot(&mut self, sink: &mut dyn BlipSink) -> usize {
        let released = self.loot.len();
        for (key, entity) in std::mem::take(&mut self.loot) {
            let _ = self.world.despawn(entity);
            sink.destroy_blip(BlipId::Loot(key));
        }
        self.index = None;
        self.visible_loot.clear();
        self.pending_refresh.clear();
        self.to_hide.retain(|id| !id.is_loot());
        released
    }
}
