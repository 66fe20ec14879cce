//! Commands sent from the host UI to the radar loop.
//!
//! Commands are queued and applied at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::config::ConfigValue;

/// All actions the host can request of a running radar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RadarCommand {
    /// Change one setting; the change is broadcast to config subscribers.
    SetConfig { value: ConfigValue },
    /// Stop the tracking session and start a fresh one.
    RestartSession,
    /// Stop producing frames without ending the session.
    Pause,
    /// Resume producing frames.
    Resume,
}
