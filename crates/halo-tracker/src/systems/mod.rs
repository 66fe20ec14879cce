//! ECS systems run by the tracker each tick.
//!
//! Systems are plain functions over `&mut World` (or `&World` when read-only).
//! They keep no state of their own; everything lives in components or is
//! passed in by the tracker.

pub mod enemies;
pub mod loot;
pub mod roster;
pub mod snapshot;
