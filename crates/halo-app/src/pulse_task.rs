//! Pulse sweep thread.
//!
//! Runs the disc pulse animation on its own timer, independent of the radar
//! loop. The only shared state is the published `PulseSettings`, the output
//! rotation and a stop flag.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::debug;

use halo_core::constants::TICK_RATE;
use halo_tracker::pulse::PulseAnimation;

use crate::state::PulseSettings;

/// Animation step period.
const PULSE_STEP: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Handle to a running pulse thread. Stops the thread on drop.
pub struct PulseTask {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl PulseTask {
    /// Spawn the pulse thread.
    ///
    /// `settings` is polled every step; `rotation` receives the sweep angle
    /// (`None` while the pulse is disabled).
    pub fn spawn(
        settings: Arc<Mutex<PulseSettings>>,
        rotation: Arc<Mutex<Option<f32>>>,
    ) -> io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let handle = std::thread::Builder::new()
            .name("halo-pulse".into())
            .spawn(move || run_pulse(&settings, &rotation, &thread_stop))?;
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Signal the thread to stop and wait for it.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for PulseTask {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn read_settings(settings: &Mutex<PulseSettings>) -> Option<PulseSettings> {
    settings.lock().ok().map(|s| *s)
}

fn run_pulse(
    settings: &Mutex<PulseSettings>,
    rotation: &Mutex<Option<f32>>,
    stop: &AtomicBool,
) {
    let Some(mut current) = read_settings(settings) else {
        return;
    };
    let mut animation = PulseAnimation::new(current.interval, current.enabled);
    let mut last = Instant::now();

    while !stop.load(Ordering::Relaxed) {
        if let Some(latest) = read_settings(settings) {
            if latest != current {
                debug!(interval = latest.interval, enabled = latest.enabled, "pulse settings changed");
                if latest.interval != current.interval {
                    animation.set_interval(latest.interval);
                }
                animation.set_enabled(latest.enabled);
                current = latest;
            }
        }

        let now = Instant::now();
        let angle = animation.advance((now - last).as_secs_f32());
        last = now;
        if let Ok(mut lock) = rotation.lock() {
            *lock = angle;
        }

        std::thread::sleep(PULSE_STEP);
    }
}
