//! Tracking and projection engine for the HALO radar.
//!
//! Owns the hecs ECS world of tracked entities, diffs it against the host
//! each tick and produces `RadarFrame`s for the renderer.

pub mod collaborators;
pub mod combat;
pub mod components;
pub mod context;
pub mod engine;
pub mod projection;
pub mod pulse;
pub mod systems;
pub mod tracker;

pub use engine::RadarEngine;
pub use halo_core as core;
pub use tracker::EntityTracker;
