//! Projection of world offsets onto the radar disc.
//!
//! All functions here are stateless. Distances are compressed with a power
//! curve so nearby contacts spread out while far ones bunch up at the rim:
//!
//! ```text
//! magnitude = (planar / range) ^ (0.4 + scale² / 2)
//! bearing   = atan2(x, z) - atan2(f.x, f.z)
//! disc      = (sin bearing, cos bearing) * magnitude * disc_radius
//! ```
//!
//! where `f` is the reference frame's forward vector.

use glam::{Quat, Vec2, Vec3};

use halo_core::constants::*;
use halo_core::enums::HeightBand;

/// Parameters shared by every projection in one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParams {
    pub range: f32,
    pub distance_scale: f32,
    pub disc_radius: f32,
}

/// Bearing of the frame's forward direction on the horizontal plane (radians,
/// clockwise from +Z).
pub fn frame_bearing(orientation: Quat) -> f32 {
    let forward = orientation * Vec3::Z;
    forward.x.atan2(forward.z)
}

/// Exponent of the distance compression curve.
pub fn distance_exponent(distance_scale: f32) -> f32 {
    DISTANCE_EXPONENT_BASE + distance_scale * distance_scale / 2.0
}

/// Map a world-relative offset to a disc offset from the centre.
///
/// The result lies within `disc_radius` of the origin. Offsets beyond the
/// range land on the rim. A non-positive or non-finite range maps everything
/// to the centre.
pub fn project(offset: Vec3, orientation: Quat, params: &ProjectionParams) -> Vec2 {
    if !(params.range.is_finite() && params.range > 0.0) {
        return Vec2::ZERO;
    }

    let planar = (offset.x * offset.x + offset.z * offset.z).sqrt();
    let normalized = (planar / params.range).clamp(0.0, 1.0);
    let magnitude = normalized.powf(distance_exponent(params.distance_scale));

    let bearing = offset.x.atan2(offset.z) - frame_bearing(orientation);
    let (sin, cos) = bearing.sin_cos();
    Vec2::new(sin, cos) * magnitude * params.disc_radius
}

/// Vertical band of an entity relative to the observer.
pub fn height_band(vertical_offset: f32, height_threshold: f32) -> HeightBand {
    let band = OBSERVER_HEIGHT * HEIGHT_BAND_FACTOR * height_threshold;
    if vertical_offset > band {
        HeightBand::Above
    } else if vertical_offset < -band {
        HeightBand::Below
    } else {
        HeightBand::Level
    }
}

/// Fade multiplier for a blip `since_scan` seconds after the last scan.
///
/// Short scan intervals disable the fade entirely.
pub fn fade_alpha(since_scan: f32, scan_interval: f32) -> f32 {
    if scan_interval <= FADE_MIN_SCAN_INTERVAL_SECS {
        return 1.0;
    }
    let ratio = since_scan / scan_interval;
    (1.0 - ratio * ratio).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn params() -> ProjectionParams {
        ProjectionParams {
            range: 100.0,
            distance_scale: 0.0,
            disc_radius: 50.0,
        }
    }

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_dead_ahead_is_up() {
        // scale 0 -> exponent 0.4; 100/100 -> magnitude 1
        let p = project(Vec3::new(0.0, 0.0, 100.0), Quat::IDENTITY, &params());
        assert!(approx(p, Vec2::new(0.0, 50.0)), "got {p}");
    }

    #[test]
    fn test_east_is_right() {
        let p = project(Vec3::new(100.0, 0.0, 0.0), Quat::IDENTITY, &params());
        assert!(approx(p, Vec2::new(50.0, 0.0)), "got {p}");
    }

    #[test]
    fn test_rotation_relative_bearing() {
        // Facing east: an entity to the east is dead ahead.
        let facing_east = Quat::from_rotation_y(FRAC_PI_2);
        assert!((frame_bearing(facing_east) - FRAC_PI_2).abs() < 1e-5);
        let p = project(Vec3::new(100.0, 0.0, 0.0), facing_east, &params());
        assert!(approx(p, Vec2::new(0.0, 50.0)), "got {p}");
    }

    #[test]
    fn test_distance_compression() {
        let mut params = params();
        params.distance_scale = 1.0; // exponent 0.9
        let p = project(Vec3::new(0.0, 0.0, 25.0), Quat::IDENTITY, &params);
        let expected = 0.25f32.powf(0.9) * 50.0;
        assert!((p.length() - expected).abs() < 1e-3);

        params.distance_scale = 0.0; // exponent 0.4 spreads near contacts out
        let q = project(Vec3::new(0.0, 0.0, 25.0), Quat::IDENTITY, &params);
        assert!(q.length() > p.length());
    }

    #[test]
    fn test_out_of_range_clamps_to_rim() {
        let p = project(Vec3::new(0.0, 0.0, 500.0), Quat::IDENTITY, &params());
        assert!((p.length() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_vertical_offset_ignored() {
        let flat = project(Vec3::new(30.0, 0.0, 40.0), Quat::IDENTITY, &params());
        let high = project(Vec3::new(30.0, 80.0, 40.0), Quat::IDENTITY, &params());
        assert!(approx(flat, high));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(project(Vec3::ZERO, Quat::IDENTITY, &params()), Vec2::ZERO);
        let mut zero_range = params();
        zero_range.range = 0.0;
        assert_eq!(project(Vec3::new(5.0, 0.0, 5.0), Quat::IDENTITY, &zero_range), Vec2::ZERO);
    }

    #[test]
    fn test_height_bands() {
        // 1.8 * 1.5 * 1.0 = 2.7
        assert_eq!(height_band(2.6, 1.0), HeightBand::Level);
        assert_eq!(height_band(-2.6, 1.0), HeightBand::Level);
        assert_eq!(height_band(2.8, 1.0), HeightBand::Above);
        assert_eq!(height_band(-2.8, 1.0), HeightBand::Below);
        assert_eq!(height_band(2.8, 2.0), HeightBand::Level);
    }

    #[test]
    fn test_fade() {
        assert_eq!(fade_alpha(0.0, 2.0), 1.0);
        assert!((fade_alpha(1.0, 2.0) - 0.75).abs() < 1e-6);
        assert_eq!(fade_alpha(2.0, 2.0), 0.0);
        assert_eq!(fade_alpha(3.0, 2.0), 0.0, "clamped after the interval");
        assert_eq!(fade_alpha(0.7, 0.8), 1.0, "short intervals never fade");
    }
}
