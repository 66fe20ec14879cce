//! Spatial index for the HALO radar.
//!
//! Circle and rectangle primitives plus a bucketed point quadtree
//! supporting incremental insert, keyed removal and radius queries.

pub use halo_core as core;

pub mod geometry;
pub mod quadtree;

// Re-export key types for convenience.
pub use geometry::{Circle, Rect};
pub use quadtree::{Keyed, Quadtree};
