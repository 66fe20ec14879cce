//! Headless renderer that reports what it would draw through `tracing`.

use std::collections::BTreeSet;

use tracing::{debug, trace, warn};

use halo_core::state::{DiscLayout, RadarFrame};
use halo_core::types::BlipId;
use halo_tracker::collaborators::BlipSink;

/// A `BlipSink` that keeps track of live sprite handles and logs frames.
#[derive(Debug, Default)]
pub struct TracingSink {
    layout: DiscLayout,
    live: BTreeSet<BlipId>,
    presented: u64,
}

impl TracingSink {
    pub fn new(layout: DiscLayout) -> Self {
        Self {
            layout,
            ..Default::default()
        }
    }

    /// Sprite handles currently alive.
    pub fn live_blips(&self) -> usize {
        self.live.len()
    }

    pub fn frames_presented(&self) -> u64 {
        self.presented
    }
}

impl BlipSink for TracingSink {
    fn disc_layout(&self) -> DiscLayout {
        self.layout
    }

    fn spawn_blip(&mut self, id: BlipId) {
        if !self.live.insert(id) {
            warn!(?id, "sprite spawned twice");
        }
        trace!(?id, "sprite spawned");
    }

    fn destroy_blip(&mut self, id: BlipId) {
        if !self.live.remove(&id) {
            warn!(?id, "destroying unknown sprite");
        }
        trace!(?id, "sprite destroyed");
    }

    fn present(&mut self, frame: &RadarFrame) {
        self.presented += 1;
        if frame.scanned {
            debug!(
                frame = frame.time.frame,
                visible = frame.visible().count(),
                hidden = frame.hidden().count(),
                enemies = frame.tracked_enemies,
                loot = frame.tracked_loot,
                bearing = frame.frame_bearing_deg,
                "scan presented"
            );
        }
    }
}
