//! Per-tick observer and timing context.
//!
//! Built once by the engine at the top of each tick and passed by reference
//! into every system, so no system reads the host or the clock on its own.

use glam::Vec3;

use halo_core::config::RadarConfig;
use halo_core::types::{planar_length_squared, FrameTime, Observer};

use crate::projection::{self, ProjectionParams};

/// Everything a system needs to know about the current tick.
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    pub observer: Observer,
    pub time: FrameTime,
    /// Whether this tick runs a full scan.
    pub scan: bool,
    /// Seconds since the most recent scan (0 on scan ticks).
    pub since_scan: f32,
    pub config: &'a RadarConfig,
    /// Radius of the drawable disc for this tick.
    pub disc_radius: f32,
}

impl<'a> TickContext<'a> {
    pub fn projection(&self) -> ProjectionParams {
        ProjectionParams {
            range: self.config.radar_range,
            distance_scale: self.config.distance_scale,
            disc_radius: self.disc_radius,
        }
    }

    /// Observer-relative offset of a world point.
    pub fn offset_to(&self, world: Vec3) -> Vec3 {
        self.observer.offset_to(world)
    }

    /// Planar range test against the configured radar range.
    pub fn in_range(&self, offset: Vec3) -> bool {
        let range = self.config.radar_range;
        planar_length_squared(offset) <= range * range
    }

    /// Fade multiplier for blips drawn this tick.
    pub fn alpha(&self) -> f32 {
        projection::fade_alpha(self.since_scan, self.config.scan_interval)
    }
}
