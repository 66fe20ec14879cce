//! Error type shared by all radar crates.
//!
//! Geometry and indexing never fail; only session start-up and
//! configuration loading surface errors to the caller.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RadarError {
    #[error("Radar session could not start: {0}")]
    SessionInit(String),

    #[error("Invalid setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RadarError>;
