//! Combat classification of roster entities.
//!
//! Pure function over the AI's combat memory. No ECS access.

use serde::{Deserialize, Serialize};

use halo_core::constants::COMBAT_RECENCY_WINDOW_SECS;

/// Snapshot of an AI controller's combat memory. Timestamps are host seconds;
/// `None` means the event never happened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatSignals {
    /// The AI reports a peaceful state.
    pub peaceful: bool,
    /// The AI senses immediate danger nearby.
    pub close_danger: bool,
    pub last_hit_taken: Option<f32>,
    pub enemy_acquired: Option<f32>,
    pub enemy_last_seen: Option<f32>,
    pub under_fire: Option<f32>,
}

/// Whether an entity counts as in combat at `now_secs`.
///
/// Entities without an AI controller (human players) are always in combat.
pub fn is_in_combat(signals: Option<&CombatSignals>, now_secs: f32) -> bool {
    let Some(signals) = signals else {
        return true;
    };
    if !signals.peaceful || signals.close_danger {
        return true;
    }
    [
        signals.last_hit_taken,
        signals.enemy_acquired,
        signals.enemy_last_seen,
        signals.under_fire,
    ]
    .into_iter()
    .flatten()
    .any(|t| now_secs - t < COMBAT_RECENCY_WINDOW_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calm() -> CombatSignals {
        CombatSignals {
            peaceful: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_ai_is_in_combat() {
        assert!(is_in_combat(None, 100.0));
    }

    #[test]
    fn test_calm_ai_is_not_in_combat() {
        assert!(!is_in_combat(Some(&calm()), 100.0));
    }

    #[test]
    fn test_non_peaceful_state_is_combat() {
        let s = CombatSignals {
            peaceful: false,
            ..Default::default()
        };
        assert!(is_in_combat(Some(&s), 100.0));
    }

    #[test]
    fn test_close_danger_is_combat() {
        let s = CombatSignals {
            close_danger: true,
            ..calm()
        };
        assert!(is_in_combat(Some(&s), 100.0));
    }

    #[test]
    fn test_recent_signal_window() {
        let s = CombatSignals {
            under_fire: Some(80.0),
            ..calm()
        };
        assert!(is_in_combat(Some(&s), 100.0), "20s ago is recent");
        assert!(is_in_combat(Some(&s), 109.9));
        assert!(!is_in_combat(Some(&s), 110.0), "exactly 30s ago has expired");

        let s = CombatSignals {
            enemy_last_seen: Some(10.0),
            last_hit_taken: Some(95.0),
            ..calm()
        };
        assert!(is_in_combat(Some(&s), 100.0), "any one recent signal suffices");
    }
}
