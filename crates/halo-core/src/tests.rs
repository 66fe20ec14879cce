#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use crate::commands::RadarCommand;
    use crate::config::{ConfigKey, ConfigValue, RadarConfig};
    use crate::enums::*;
    use crate::error::RadarError;
    use crate::events::{LootEvent, LootItem, RadarEvent};
    use crate::state::{BlipUpdate, BlipView, DiscLayout, RadarFrame};
    use crate::types::{BlipId, EnemyId, LootKey, Observer};

    fn view(id: BlipId) -> BlipView {
        BlipView {
            id,
            category: BlipCategory::PlayerLevel,
            height: HeightBand::Level,
            faction: Some(Faction::Scav),
            disc_position: Vec2::new(1.0, 2.0),
            alpha: 0.5,
            size: 3.0,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = RadarConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.enable_loot, "Loot tracking is opt-in");
        assert!(config.show_corpses);
    }

    #[test]
    fn test_config_partial_toml_uses_defaults() {
        let config = RadarConfig::from_toml_str("radar_range = 200.0\nenable_loot = true\n").unwrap();
        assert_eq!(config.radar_range, 200.0);
        assert!(config.enable_loot);
        assert_eq!(config.scan_interval, RadarConfig::default().scan_interval);
    }

    #[test]
    fn test_config_rejects_non_positive_range() {
        let err = RadarConfig::from_toml_str("radar_range = 0.0").unwrap_err();
        assert!(
            matches!(err, RadarError::InvalidSetting { ref key, .. } if key == "RadarRange"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_config_rejects_malformed_toml() {
        let err = RadarConfig::from_toml_str("radar_range = \"far\"").unwrap_err();
        assert!(matches!(err, RadarError::Config(_)));
    }

    #[test]
    fn test_config_set_returns_key() {
        let mut config = RadarConfig::default();
        let key = config.set(ConfigValue::LootThreshold(500));
        assert_eq!(key, ConfigKey::LootThreshold);
        assert_eq!(config.loot_threshold, 500);
        assert!(key.affects_loot_index());
        assert!(!ConfigKey::RadarRange.affects_loot_index());
        assert!(ConfigKey::ScanInterval.affects_pulse());
    }

    #[test]
    fn test_pulse_interval_floor() {
        let mut config = RadarConfig::default();
        config.scan_interval = 0.25;
        assert_eq!(config.pulse_interval(), 1.0);
        config.scan_interval = 2.5;
        assert_eq!(config.pulse_interval(), 2.5);
    }

    #[test]
    fn test_disc_layout_radius_uses_smaller_side() {
        let layout = DiscLayout::new(Vec2::new(200.0, 100.0), Vec2::new(1.0, 2.0));
        // scaled = (200, 200) → 200 * 0.68
        assert!((layout.radius() - 136.0).abs() < 1e-4);
        let layout = DiscLayout::new(Vec2::new(200.0, 100.0), Vec2::ONE);
        assert!((layout.radius() - 68.0).abs() < 1e-4);
    }

    #[test]
    fn test_observer_planar_and_offset() {
        let obs = Observer::new(Vec3::new(1.0, 5.0, 2.0), glam::Quat::IDENTITY);
        assert_eq!(obs.planar_position(), Vec2::new(1.0, 2.0));
        assert_eq!(obs.offset_to(Vec3::new(4.0, 5.0, 6.0)), Vec3::new(3.0, 0.0, 4.0));
    }

    #[test]
    fn test_enemy_category_by_band() {
        assert_eq!(BlipCategory::for_enemy(HeightBand::Level), BlipCategory::PlayerLevel);
        assert_eq!(BlipCategory::for_enemy(HeightBand::Above), BlipCategory::PlayerAbove);
        assert_eq!(BlipCategory::for_enemy(HeightBand::Below), BlipCategory::PlayerBelow);
    }

    #[test]
    fn test_frame_visible_and_hidden_split() {
        let frame = RadarFrame {
            updates: vec![
                BlipUpdate::Show(view(BlipId::Enemy(EnemyId(1)))),
                BlipUpdate::Hide {
                    id: BlipId::Loot(LootKey(7)),
                },
                BlipUpdate::Show(view(BlipId::Loot(LootKey(8)))),
            ],
            ..Default::default()
        };
        assert_eq!(frame.visible().count(), 2);
        assert_eq!(frame.hidden().collect::<Vec<_>>(), vec![BlipId::Loot(LootKey(7))]);
        assert!(frame.view(BlipId::Loot(LootKey(8))).is_some());
        assert!(frame.view(BlipId::Loot(LootKey(7))).is_none());
    }

    /// Frames are shipped to out-of-process renderers as JSON.
    #[test]
    fn test_frame_serde() {
        let frame = RadarFrame {
            scanned: true,
            updates: vec![BlipUpdate::Show(view(BlipId::Enemy(EnemyId(3))))],
            events: vec![
                RadarEvent::EnemyAcquired { id: EnemyId(3) },
                RadarEvent::LootTracked {
                    key: LootKey(-4),
                    price: 90_000,
                },
            ],
            tracked_enemies: 1,
            ..Default::default()
        };
        let json = serde_json::to_string(&frame).unwrap();
        let back: RadarFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(json, serde_json::to_string(&back).unwrap());
        assert_eq!(back.updates, frame.updates);
    }

    #[test]
    fn test_loot_event_and_command_serde() {
        let event = LootEvent::Added {
            key: LootKey(12),
            item: LootItem {
                key: LootKey(12),
                position: Vec3::new(1.0, 0.0, -3.0),
            },
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: LootEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
        assert_eq!(back.key(), Some(LootKey(12)));
        assert_eq!(LootEvent::Reloaded.key(), None);

        let command = RadarCommand::SetConfig {
            value: ConfigValue::EnableLoot(true),
        };
        let json = serde_json::to_string(&command).unwrap();
        let back: RadarCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(json, serde_json::to_string(&back).unwrap());
    }
}
