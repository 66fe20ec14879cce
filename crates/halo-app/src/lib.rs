//! HALO headless demo host.
//!
//! Wires the radar engine to a deterministic synthetic world, a tracing
//! renderer, a fixed-rate loop thread and the pulse sweep thread.

pub mod demo_world;
pub mod game_loop;
pub mod pulse_task;
pub mod sink;
pub mod state;

pub use halo_core as core;
