//! Roster diff: start tracking roster entities seen for the first time.

use std::collections::BTreeMap;

use hecs::{Entity, World};
use tracing::debug;

use halo_core::events::RadarEvent;
use halo_core::types::{BlipId, EnemyId};

use crate::collaborators::{BlipSink, WorldRoster};
use crate::components::{BlipState, EnemyBlip};

/// Acquire every untracked roster entity. Returns the number acquired.
///
/// The roster always contains the observer, so a roster of `tracked + 1`
/// entities means nothing new has arrived and the full walk is skipped.
pub fn run(
    world: &mut World,
    enemies: &mut BTreeMap<EnemyId, Entity>,
    roster: &dyn WorldRoster,
    sink: &mut dyn BlipSink,
    events: &mut Vec<RadarEvent>,
) -> usize {
    if roster.roster_len() == enemies.len() + 1 {
        return 0;
    }

    let observer = roster.observer_id();
    let mut acquired = 0;
    for id in roster.roster_ids() {
        if Some(id) == observer || enemies.contains_key(&id) {
            continue;
        }
        let faction = roster.faction(id);
        let entity = world.spawn((EnemyBlip::new(id, faction), BlipState::default()));
        enemies.insert(id, entity);
        sink.spawn_blip(BlipId::Enemy(id));
        events.push(RadarEvent::EnemyAcquired { id });
        debug!(id = id.0, ?faction, "enemy acquired");
        acquired += 1;
    }
    acquired
}
