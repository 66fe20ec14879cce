//! State shared between the main thread, the radar loop and the pulse thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use halo_core::commands::RadarCommand;
use halo_core::config::RadarConfig;
use halo_core::state::RadarFrame;

/// Commands sent from the main thread to the radar loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// A radar command to forward to the engine.
    Radar(RadarCommand),
    /// Stop the session and shut the loop thread down.
    Shutdown,
}

/// Pulse settings published by the radar loop, read by the pulse thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseSettings {
    pub interval: f32,
    pub enabled: bool,
}

/// Shared application state.
///
/// `mpsc::Sender` is not `Sync`, so it lives behind a `Mutex`. The latest
/// frame and pulse rotation are `Arc`-shared with the worker threads.
pub struct AppState {
    /// Channel to the radar loop. `None` until the loop is spawned.
    pub command_tx: Mutex<Option<mpsc::Sender<LoopCommand>>>,
    /// Latest frame, updated by the radar loop after each tick.
    pub latest_frame: Arc<Mutex<Option<RadarFrame>>>,
    /// Current sweep rotation in degrees, `None` while the pulse is off.
    pub pulse_rotation: Arc<Mutex<Option<f32>>>,
    pub running: Mutex<bool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_frame: Arc::new(Mutex::new(None)),
            pulse_rotation: Arc::new(Mutex::new(None)),
            running: Mutex::new(false),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward a command to the radar loop. Returns `false` when no loop is
    /// running or the loop has already exited.
    pub fn send(&self, command: LoopCommand) -> bool {
        let Ok(guard) = self.command_tx.lock() else {
            return false;
        };
        guard.as_ref().is_some_and(|tx| tx.send(command).is_ok())
    }

    /// Copy of the latest frame, if any tick has completed.
    pub fn latest_frame(&self) -> Option<RadarFrame> {
        self.latest_frame.lock().ok().and_then(|frame| frame.clone())
    }
}

impl PulseSettings {
    pub fn from_config(config: &RadarConfig) -> Self {
        Self {
            interval: config.pulse_interval(),
            enabled: config.enable_pulse,
        }
    }
}
