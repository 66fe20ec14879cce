//! Core types and definitions for the HALO radar overlay.
//!
//! This crate defines the vocabulary shared across all other crates:
//! identifiers, constants, configuration, events, frame snapshots and
//! the error type. It has no dependency on the ECS or any host engine.

pub mod commands;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;

pub use error::{RadarError, Result};

#[cfg(test)]
mod tests;
