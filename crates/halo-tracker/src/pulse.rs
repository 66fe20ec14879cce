//! Disc pulse animation.
//!
//! A sweep that rotates from 360° down to 0° once per pulse interval and
//! then starts over. It is independent of scanning; the host drives it from
//! its own timer.

use halo_core::constants::PULSE_MIN_INTERVAL_SECS;

/// Sweep state of the pulse overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseAnimation {
    interval: f32,
    elapsed: f32,
    enabled: bool,
}

impl PulseAnimation {
    pub fn new(interval: f32, enabled: bool) -> Self {
        Self {
            interval: interval.max(PULSE_MIN_INTERVAL_SECS),
            elapsed: 0.0,
            enabled,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Change the period. The sweep restarts from the top.
    pub fn set_interval(&mut self, interval: f32) {
        self.interval = interval.max(PULSE_MIN_INTERVAL_SECS);
        self.elapsed = 0.0;
    }

    /// Switch the overlay on or off. Enabling restarts the sweep.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled && !self.enabled {
            self.elapsed = 0.0;
        }
        self.enabled = enabled;
    }

    /// Advance by `dt` seconds and return the sweep rotation in degrees, or
    /// `None` while disabled.
    pub fn advance(&mut self, dt: f32) -> Option<f32> {
        if !self.enabled {
            return None;
        }
        self.elapsed = (self.elapsed + dt.max(0.0)) % self.interval;
        Some(self.rotation_deg())
    }

    /// Current rotation: 360 at the start of a sweep, approaching 0 at the end.
    pub fn rotation_deg(&self) -> f32 {
        360.0 * (1.0 - self.elapsed / self.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_floor() {
        assert_eq!(PulseAnimation::new(0.2, true).interval(), 1.0);
        assert_eq!(PulseAnimation::new(3.0, true).interval(), 3.0);
    }

    #[test]
    fn test_sweep_runs_down_and_wraps() {
        let mut pulse = PulseAnimation::new(2.0, true);
        assert_eq!(pulse.rotation_deg(), 360.0);
        let r = pulse.advance(0.5).unwrap();
        assert!((r - 270.0).abs() < 1e-3, "quarter sweep, got {r}");
        let r = pulse.advance(1.0).unwrap();
        assert!((r - 90.0).abs() < 1e-3, "got {r}");
        let r = pulse.advance(1.0).unwrap();
        assert!((r - 270.0).abs() < 1e-3, "wrapped to the next sweep, got {r}");
    }

    #[test]
    fn test_disabled_pulse_is_silent() {
        let mut pulse = PulseAnimation::new(1.0, false);
        assert_eq!(pulse.advance(0.3), None);
        pulse.set_enabled(true);
        let r = pulse.advance(0.25).unwrap();
        assert!((r - 270.0).abs() < 1e-3);
    }

    #[test]
    fn test_interval_change_restarts() {
        let mut pulse = PulseAnimation::new(2.0, true);
        pulse.advance(1.0);
        pulse.set_interval(4.0);
        assert_eq!(pulse.rotation_deg(), 360.0);
    }
}
