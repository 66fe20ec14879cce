//! Deterministic synthetic host world.
//!
//! Stands in for the game engine: an observer walking a slow circle, enemies
//! on a random walk that occasionally die or join, and loot that is dropped
//! and picked up over time. All randomness comes from a seeded
//! `ChaCha8Rng`, so a given seed always replays the same session.

use std::collections::BTreeMap;
use std::sync::mpsc::Sender;

use glam::{Quat, Vec3};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use halo_core::config::{ConfigKey, ConfigValue, RadarConfig};
use halo_core::enums::Faction;
use halo_core::events::{LootEvent, LootItem};
use halo_core::types::{EnemyId, LootKey, Observer};
use halo_tracker::collaborators::{
    ChangeNotifier, ConfigSource, LootSource, SubscriptionId, WorldRoster,
};
use halo_tracker::combat::CombatSignals;

const OBSERVER_ID: EnemyId = EnemyId(0);

/// Radius of the circle the observer walks (meters).
const OBSERVER_ORBIT: f32 = 60.0;
/// Observer angular speed (radians per second).
const OBSERVER_TURN_RATE: f32 = 0.05;
/// Enemy walking speed (meters per second).
const ENEMY_SPEED: f32 = 1.5;

// Per-second event rates.
const TURN_RATE: f64 = 0.3;
const DEATH_RATE: f64 = 0.004;
const JOIN_RATE: f64 = 0.02;
const SKIRMISH_RATE: f64 = 0.05;
const DROP_RATE: f64 = 0.4;
const PICKUP_RATE: f64 = 0.3;

const FACTIONS: [Faction; 6] = [
    Faction::Scav,
    Faction::Scav,
    Faction::Scav,
    Faction::Boss,
    Faction::Bear,
    Faction::Usec,
];

/// Population parameters for a demo world.
#[derive(Debug, Clone, Copy)]
pub struct WorldParams {
    pub seed: u64,
    pub enemies: usize,
    pub loot: usize,
    /// Half-width of the square map (meters).
    pub extent: f32,
}

#[derive(Debug, Clone)]
struct DemoEnemy {
    position: Vec3,
    heading: Vec3,
    alive: bool,
    faction: Faction,
    /// `None` for human players.
    signals: Option<CombatSignals>,
}

#[derive(Debug, Clone, Copy)]
struct DemoLoot {
    position: Vec3,
    price: Option<u32>,
}

/// A synthetic host implementing every collaborator the radar reads from.
pub struct DemoWorld {
    rng: ChaCha8Rng,
    extent: f32,
    now_secs: f32,
    observer_angle: f32,
    observer: Observer,
    enemies: BTreeMap<EnemyId, DemoEnemy>,
    loot: BTreeMap<LootKey, DemoLoot>,
    next_enemy: u32,
    next_loot: i32,
    config: RadarConfig,
    loot_subs: Vec<(SubscriptionId, Sender<LootEvent>)>,
    config_subs: Vec<(SubscriptionId, Sender<ConfigKey>)>,
    next_subscription: u64,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            seed: 42,
            enemies: 24,
            loot: 200,
            extent: 300.0,
        }
    }
}

impl DemoWorld {
    pub fn new(params: WorldParams, config: RadarConfig) -> Self {
        let mut world = Self {
            rng: ChaCha8Rng::seed_from_u64(params.seed),
            extent: params.extent,
            now_secs: 0.0,
            observer_angle: 0.0,
            observer: Observer::default(),
            enemies: BTreeMap::new(),
            loot: BTreeMap::new(),
            next_enemy: OBSERVER_ID.0 + 1,
            next_loot: 0,
            config,
            loot_subs: Vec::new(),
            config_subs: Vec::new(),
            next_subscription: 0,
        };
        world.place_observer();
        for _ in 0..params.enemies {
            world.spawn_enemy();
        }
        for _ in 0..params.loot {
            world.spawn_loot();
        }
        world
    }

    /// Host time in seconds.
    pub fn now_secs(&self) -> f32 {
        self.now_secs
    }

    pub fn living_enemies(&self) -> usize {
        self.enemies.values().filter(|e| e.alive).count()
    }

    pub fn loot_len(&self) -> usize {
        self.loot.len()
    }

    /// Advance the world by `dt` seconds, broadcasting loot changes.
    pub fn step(&mut self, dt: f32) {
        self.now_secs += dt;
        self.observer_angle += OBSERVER_TURN_RATE * dt;
        self.place_observer();

        let now = self.now_secs;
        let extent = self.extent;
        let rate = |per_sec: f64| (per_sec * dt as f64).clamp(0.0, 1.0);

        for enemy in self.enemies.values_mut().filter(|e| e.alive) {
            if self.rng.gen_bool(rate(TURN_RATE)) {
                enemy.heading = random_heading(&mut self.rng);
            }
            enemy.position += enemy.heading * ENEMY_SPEED * dt;
            enemy.position.x = enemy.position.x.clamp(-extent, extent);
            enemy.position.z = enemy.position.z.clamp(-extent, extent);

            if let Some(signals) = enemy.signals.as_mut() {
                if self.rng.gen_bool(rate(SKIRMISH_RATE)) {
                    signals.under_fire = Some(now);
                    signals.enemy_last_seen = Some(now);
                }
            }
            if self.rng.gen_bool(rate(DEATH_RATE)) {
                enemy.alive = false;
            }
        }

        if self.rng.gen_bool(rate(JOIN_RATE)) {
            let id = self.spawn_enemy();
            debug!(?id, "enemy joined");
        }

        if self.rng.gen_bool(rate(DROP_RATE)) {
            let (key, item) = self.spawn_loot();
            self.broadcast_loot(LootEvent::Added { key, item });
        }

        if self.rng.gen_bool(rate(PICKUP_RATE)) {
            let keys: Vec<LootKey> = self.loot.keys().copied().collect();
            if let Some(&key) = keys.choose(&mut self.rng) {
                self.loot.remove(&key);
                self.broadcast_loot(LootEvent::Removed { key });
            }
        }
    }

    fn place_observer(&mut self) {
        let angle = self.observer_angle;
        self.observer = Observer::new(
            Vec3::new(angle.cos(), 0.0, angle.sin()) * OBSERVER_ORBIT,
            Quat::from_rotation_y(-angle),
        );
    }

    fn spawn_enemy(&mut self) -> EnemyId {
        let id = EnemyId(self.next_enemy);
        self.next_enemy += 1;

        let faction = *FACTIONS.choose(&mut self.rng).unwrap_or(&Faction::Unknown);
        let signals = match faction {
            Faction::Bear | Faction::Usec => None,
            _ => Some(CombatSignals {
                peaceful: self.rng.gen_bool(0.7),
                ..Default::default()
            }),
        };
        let height = self.rng.gen_range(-4.0..12.0);
        let position = self.random_point(height);
        let heading = random_heading(&mut self.rng);
        self.enemies.insert(
            id,
            DemoEnemy {
                position,
                heading,
                alive: true,
                faction,
                signals,
            },
        );
        id
    }

    fn spawn_loot(&mut self) -> (LootKey, LootItem) {
        let key = LootKey(self.next_loot);
        self.next_loot += 1;

        let height = self.rng.gen_range(0.0..6.0);
        let position = self.random_point(height);
        let price = if self.rng.gen_bool(0.8) {
            Some(self.rng.gen_range(0..80_000))
        } else {
            None
        };
        self.loot.insert(key, DemoLoot { position, price });
        (key, LootItem { key, position })
    }

    fn random_point(&mut self, height: f32) -> Vec3 {
        Vec3::new(
            self.rng.gen_range(-self.extent..self.extent),
            height,
            self.rng.gen_range(-self.extent..self.extent),
        )
    }

    fn broadcast_loot(&mut self, event: LootEvent) {
        self.loot_subs.retain(|(id, tx)| {
            let delivered = tx.send(event).is_ok();
            if !delivered {
                warn!(?id, "loot subscriber gone; dropping subscription");
            }
            delivered
        });
    }

    fn alloc_subscription(&mut self) -> SubscriptionId {
        self.next_subscription += 1;
        SubscriptionId(self.next_subscription)
    }
}

fn random_heading(rng: &mut ChaCha8Rng) -> Vec3 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    Vec3::new(angle.cos(), 0.0, angle.sin())
}

impl WorldRoster for DemoWorld {
    fn observer_id(&self) -> Option<EnemyId> {
        Some(OBSERVER_ID)
    }

    fn observer(&self) -> Option<Observer> {
        Some(self.observer)
    }

    fn roster_len(&self) -> usize {
        self.enemies.len() + 1
    }

    fn roster_ids(&self) -> Vec<EnemyId> {
        std::iter::once(OBSERVER_ID)
            .chain(self.enemies.keys().copied())
            .collect()
    }

    fn position(&self, id: EnemyId) -> Option<Vec3> {
        self.enemies.get(&id).map(|e| e.position)
    }

    fn is_alive(&self, id: EnemyId) -> bool {
        self.enemies.get(&id).is_some_and(|e| e.alive)
    }

    fn combat_signals(&self, id: EnemyId) -> Option<CombatSignals> {
        self.enemies.get(&id).and_then(|e| e.signals)
    }

    fn faction(&self, id: EnemyId) -> Faction {
        self.enemies.get(&id).map_or(Faction::Unknown, |e| e.faction)
    }
}

impl LootSource for DemoWorld {
    fn loot_items(&self) -> Vec<LootItem> {
        self.loot
            .iter()
            .map(|(key, loot)| LootItem {
                key: *key,
                position: loot.position,
            })
            .collect()
    }

    fn position_of(&self, key: LootKey) -> Option<Vec3> {
        self.loot.get(&key).map(|l| l.position)
    }

    fn best_offer(&self, key: LootKey) -> Option<u32> {
        self.loot.get(&key).and_then(|l| l.price)
    }
}

impl ChangeNotifier for DemoWorld {
    fn subscribe(&mut self, tx: Sender<LootEvent>) -> SubscriptionId {
        let id = self.alloc_subscription();
        self.loot_subs.push((id, tx));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.loot_subs.retain(|(sub, _)| *sub != id);
    }
}

impl ConfigSource for DemoWorld {
    fn current(&self) -> RadarConfig {
        self.config.clone()
    }

    fn set(&mut self, value: ConfigValue) {
        let key = self.config.set(value);
        debug!(?value, "setting changed");
        self.config_subs.retain(|(id, tx)| {
            let delivered = tx.send(key).is_ok();
            if !delivered {
                warn!(?id, "config subscriber gone; dropping subscription");
            }
            delivered
        });
    }

    fn subscribe(&mut self, tx: Sender<ConfigKey>) -> SubscriptionId {
        let id = self.alloc_subscription();
        self.config_subs.push((id, tx));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.config_subs.retain(|(sub, _)| *sub != id);
    }
}
