//! Enemy update: scan-time reprojection plus per-frame life and visibility.
//!
//! On scan ticks each enemy's position is re-read, its offset, height band
//! and disc position recomputed and its combat state reclassified. An enemy
//! whose position has never been read counts as out of range. Every
//! tick the life state, visibility and fade are refreshed from the cached
//! scan data.

use hecs::World;
use tracing::{debug, trace};

use halo_core::config::RadarConfig;
use halo_core::enums::LifeState;
use halo_core::events::RadarEvent;
use halo_core::types::BlipId;

use crate::collaborators::WorldRoster;
use crate::combat::is_in_combat;
use crate::components::{BlipState, EnemyBlip, Projectable};
use crate::context::TickContext;
use crate::projection::{height_band, project};

/// Run the enemy update over every tracked enemy.
pub fn run(
    world: &mut World,
    roster: &dyn WorldRoster,
    ctx: &TickContext<'_>,
    to_hide: &mut Vec<BlipId>,
    events: &mut Vec<RadarEvent>,
) {
    let config = ctx.config;
    let params = ctx.projection();
    let alpha = ctx.alpha();

    for (_entity, (enemy, state)) in world.query_mut::<(&mut EnemyBlip, &mut BlipState)>() {
        if ctx.scan {
            if let Some(position) = roster.position(enemy.id) {
                enemy.position = position;
                enemy.located = true;
            }
            if enemy.is_alive() {
                let signals = roster.combat_signals(enemy.id);
                enemy.in_combat = is_in_combat(signals.as_ref(), ctx.time.now_secs);
            }
            if enemy.located {
                enemy.offset = ctx.offset_to(enemy.position);
                state.height = height_band(enemy.offset.y, config.height_threshold);
                state.disc_position = project(enemy.offset, ctx.observer.orientation, &params);
            } else {
                trace!(id = enemy.id.0, "enemy position not yet known");
            }
        }

        if enemy.is_alive() && !roster.is_alive(enemy.id) {
            enemy.life = LifeState::Dead;
            events.push(RadarEvent::EnemyDied { id: enemy.id });
            debug!(id = enemy.id.0, "enemy died");
        }

        let in_range = enemy.located && ctx.in_range(enemy.offset);
        let visible = is_visible(enemy, in_range, config);
        if state.visible && !visible {
            to_hide.push(enemy.blip_id());
            trace!(id = enemy.id.0, "enemy left the display");
        }
        state.visible = visible;
        state.category = enemy.category(state.height);
        state.alpha = alpha;
    }
}

/// Display rule for one enemy.
///
/// Dead enemies need the corpse setting; living enemies need to be in combat
/// when the combat filter is on.
pub fn is_visible(enemy: &EnemyBlip, in_range: bool, config: &RadarConfig) -> bool {
    let alive = enemy.is_alive();
    in_range && (alive || config.show_corpses) && (!alive || !config.combat_filter || enemy.in_combat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::enums::Faction;
    use halo_core::types::EnemyId;

    #[test]
    fn test_visibility_rule() {
        let mut config = RadarConfig::default();
        let mut enemy = EnemyBlip::new(EnemyId(2), Faction::Scav);
        enemy.in_combat = false;

        assert!(is_visible(&enemy, true, &config));
        assert!(!is_visible(&enemy, false, &config), "out of range");

        config.combat_filter = true;
        assert!(!is_visible(&enemy, true, &config), "calm enemy filtered");
        enemy.in_combat = true;
        assert!(is_visible(&enemy, true, &config));

        enemy.life = LifeState::Dead;
        enemy.in_combat = false;
        assert!(is_visible(&enemy, true, &config), "combat filter ignores corpses");
        config.show_corpses = false;
        assert!(!is_visible(&enemy, true, &config));
    }
}
