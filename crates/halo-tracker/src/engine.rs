//! Radar engine: the tick driver.
//!
//! `RadarEngine` owns the entity tracker and the session's subscriptions,
//! processes host commands, drains change notifications and produces one
//! `RadarFrame` per tick. Completely headless: the host and the renderer are
//! passed in on every call.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver};

use tracing::{debug, info, trace, warn};

use halo_core::commands::RadarCommand;
use halo_core::config::{ConfigKey, RadarConfig};
use halo_core::error::{RadarError, Result};
use halo_core::events::{LootEvent, LootItem};
use halo_core::state::RadarFrame;
use halo_core::types::FrameTime;

use crate::collaborators::{BlipSink, ChangeNotifier, ConfigSource, RadarHost, SubscriptionId};
use crate::context::TickContext;
use crate::tracker::EntityTracker;

/// Subscriptions held for the lifetime of one session.
struct Session {
    loot_subscription: SubscriptionId,
    config_subscription: SubscriptionId,
    loot_rx: Receiver<LootEvent>,
    config_rx: Receiver<ConfigKey>,
}

/// The radar engine. Owns the tracker and all per-session state.
pub struct RadarEngine {
    tracker: EntityTracker,
    config: RadarConfig,
    time: FrameTime,
    last_scan: Option<f32>,
    session: Option<Session>,
    paused: bool,
    command_queue: VecDeque<RadarCommand>,
}

impl Default for RadarEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RadarEngine {
    pub fn new() -> Self {
        Self {
            tracker: EntityTracker::new(),
            config: RadarConfig::default(),
            time: FrameTime::default(),
            last_scan: None,
            session: None,
            paused: false,
            command_queue: VecDeque::new(),
        }
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: RadarCommand) {
        self.command_queue.push_back(command);
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Settings in effect for the current session.
    pub fn config(&self) -> &RadarConfig {
        &self.config
    }

    pub fn time(&self) -> FrameTime {
        self.time
    }

    pub fn tracker(&self) -> &EntityTracker {
        &self.tracker
    }

    /// Start a tracking session.
    ///
    /// Fails if the observer is not spawned or the host's settings are
    /// invalid; no subscription is left behind in that case. A running
    /// session is stopped first.
    pub fn start<H: RadarHost>(&mut self, host: &mut H, sink: &mut dyn BlipSink) -> Result<()> {
        if self.session.is_some() {
            self.stop(host, sink);
        }

        let observer = host
            .observer()
            .ok_or_else(|| RadarError::SessionInit("observer is not spawned".into()))?;
        let config = host.current();
        config.validate()?;

        let (loot_tx, loot_rx) = mpsc::channel();
        let (config_tx, config_rx) = mpsc::channel();
        let loot_subscription = ChangeNotifier::subscribe(host, loot_tx);
        let config_subscription = ConfigSource::subscribe(host, config_tx);

        self.tracker = EntityTracker::new();
        self.config = config;
        self.time = FrameTime::default();
        self.last_scan = None;
        self.paused = false;
        self.session = Some(Session {
            loot_subscription,
            config_subscription,
            loot_rx,
            config_rx,
        });

        if self.config.enable_loot {
            self.tracker.rebuild_loot(&*host, self.config.loot_threshold, sink);
        }

        info!(
            position = ?observer.position,
            range = self.config.radar_range,
            loot = self.config.enable_loot,
            "radar session started"
        );
        Ok(())
    }

    /// End the session: unsubscribe, destroy every blip and clear all state.
    pub fn stop<H: RadarHost>(&mut self, host: &mut H, sink: &mut dyn BlipSink) {
        let Some(session) = self.session.take() else {
            return;
        };
        ChangeNotifier::unsubscribe(host, session.loot_subscription);
        ConfigSource::unsubscribe(host, session.config_subscription);
        self.tracker.shutdown(sink);
        self.last_scan = None;
        info!(frames = self.time.frame, "radar session stopped");
    }

    /// Advance by one host tick and return the resulting frame.
    ///
    /// The frame is also handed to `sink`. Without a running session, while
    /// paused, or while the observer is missing, an empty frame is returned
    /// and nothing is presented.
    pub fn tick<H: RadarHost>(
        &mut self,
        host: &mut H,
        sink: &mut dyn BlipSink,
        now_secs: f32,
    ) -> RadarFrame {
        self.process_commands(host, sink);

        if self.session.is_none() || self.paused {
            return self.empty_frame();
        }

        self.time.advance(now_secs);
        self.drain_config(host, sink);
        self.drain_loot_events(host, sink);

        let Some(observer) = host.observer() else {
            warn!(frame = self.time.frame, "observer unavailable; skipping tick");
            return self.empty_frame();
        };

        let scan = self
            .last_scan
            .map_or(true, |last| now_secs - last >= self.config.scan_interval);
        if scan {
            self.last_scan = Some(now_secs);
        }
        let since_scan = self.last_scan.map_or(0.0, |last| (now_secs - last).max(0.0));

        let ctx = TickContext {
            observer,
            time: self.time,
            scan,
            since_scan,
            config: &self.config,
            disc_radius: sink.disc_layout().radius(),
        };

        self.tracker.refresh_enemies(&*host, &ctx, sink);
        if self.config.enable_loot {
            self.tracker.refresh_loot(&*host, &ctx);
        }

        let frame = self.tracker.build_frame(&ctx);
        sink.present(&frame);
        frame
    }

    fn empty_frame(&self) -> RadarFrame {
        RadarFrame {
            time: self.time,
            ..Default::default()
        }
    }

    /// Process all queued commands.
    fn process_commands<H: RadarHost>(&mut self, host: &mut H, sink: &mut dyn BlipSink) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command, host, sink);
        }
    }

    /// Handle a single host command.
    fn handle_command<H: RadarHost>(
        &mut self,
        command: RadarCommand,
        host: &mut H,
        sink: &mut dyn BlipSink,
    ) {
        match command {
            RadarCommand::SetConfig { value } => {
                ConfigSource::set(host, value);
            }
            RadarCommand::RestartSession => {
                if let Err(error) = self.start(host, sink) {
                    warn!(%error, "session restart failed");
                }
            }
            RadarCommand::Pause => {
                if self.session.is_some() {
                    self.paused = true;
                }
            }
            RadarCommand::Resume => {
                self.paused = false;
            }
        }
    }

    /// Apply setting changes announced since the last tick.
    ///
    /// The loot index is rebuilt (or released) only when the loot switch or
    /// the threshold changed; everything else takes effect on the next scan.
    /// Loot settings are compared against the last accepted config, so a
    /// change announced alongside a rejected batch still applies once the
    /// host's settings validate again.
    fn drain_config<H: RadarHost>(&mut self, host: &mut H, sink: &mut dyn BlipSink) {
        let Some(session) = &self.session else {
            return;
        };
        let keys: Vec<ConfigKey> = session.config_rx.try_iter().collect();
        if keys.is_empty() {
            return;
        }

        let config = host.current();
        if let Err(error) = config.validate() {
            warn!(%error, ?keys, "ignoring invalid settings");
            return;
        }

        let was_tracking_loot = self.config.enable_loot;
        let previous_threshold = self.config.loot_threshold;
        self.config = config;
        debug!(?keys, "settings changed");

        let loot_changed = keys.iter().any(ConfigKey::affects_loot_index)
            || was_tracking_loot != self.config.enable_loot
            || previous_threshold != self.config.loot_threshold;
        if loot_changed {
            if self.config.enable_loot {
                self.tracker.rebuild_loot(&*host, self.config.loot_threshold, sink);
            } else if was_tracking_loot {
                self.tracker.clear_loot(sink);
            }
        }
    }

    /// Apply loot notifications in arrival order.
    fn drain_loot_events<H: RadarHost>(&mut self, host: &mut H, sink: &mut dyn BlipSink) {
        let Some(session) = &self.session else {
            return;
        };
        let events: Vec<LootEvent> = session.loot_rx.try_iter().collect();
        if events.is_empty() {
            return;
        }
        if !self.config.enable_loot {
            trace!(dropped = events.len(), "loot tracking off; notifications dropped");
            return;
        }

        let threshold = self.config.loot_threshold;
        for event in events {
            match event {
                LootEvent::Added { key, item } => {
                    let price = host.best_offer(key);
                    self.tracker
                        .add_loot(LootItem { key, ..item }, price, threshold, sink);
                }
                LootEvent::Removed { key } => {
                    self.tracker.remove_loot(key, sink);
                }
                LootEvent::Reloaded => {
                    self.tracker.rebuild_loot(&*host, threshold, sink);
                }
            }
        }
    }
}
