//! Radar constants and tuning parameters.

// --- Spatial index ---

/// Payloads a quadtree leaf holds before it subdivides.
pub const QUADTREE_BUCKET_CAP: usize = 10;

/// Default maximum quadtree depth. Leaves at this depth grow past the bucket cap.
pub const QUADTREE_MAX_DEPTH: u32 = 4;

/// Fraction of the loot extent added on every side of the index bounds.
pub const LOOT_INDEX_PADDING: f32 = 0.1;

/// Minimum half-extent of the loot index bounds (meters).
/// Keeps the bounds non-degenerate for a single item or a line of items.
pub const LOOT_INDEX_MIN_HALF_EXTENT: f32 = 50.0;

// --- Combat classification ---

/// Window (seconds) in which a past combat signal still counts as active.
pub const COMBAT_RECENCY_WINDOW_SECS: f32 = 30.0;

// --- Projection ---

/// Minimum exponent of the distance compression curve.
pub const DISTANCE_EXPONENT_BASE: f32 = 0.4;

/// Fraction of the drawable disc extent usable for blips.
pub const DISC_RADIUS_FACTOR: f32 = 0.68;

/// Observer eye height used for the vertical band test (meters).
pub const OBSERVER_HEIGHT: f32 = 1.8;

/// Multiple of the observer height that still counts as "level".
pub const HEIGHT_BAND_FACTOR: f32 = 1.5;

/// Blip scale multiplier applied to the configured blip size.
pub const BLIP_SIZE_FACTOR: f32 = 3.0;

// --- Timing ---

/// Scan intervals at or below this value disable the fade (seconds).
pub const FADE_MIN_SCAN_INTERVAL_SECS: f32 = 0.8;

/// Shortest period of the pulse sweep animation (seconds).
pub const PULSE_MIN_INTERVAL_SECS: f32 = 1.0;

/// Host tick rate used by the demo loop (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per host tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Configuration defaults ---

pub const DEFAULT_RADAR_RANGE: f32 = 128.0;
pub const DEFAULT_SCAN_INTERVAL_SECS: f32 = 1.0;
pub const DEFAULT_LOOT_THRESHOLD: u32 = 30_000;
pub const DEFAULT_DISTANCE_SCALE: f32 = 0.7;
pub const DEFAULT_HEIGHT_THRESHOLD: f32 = 1.0;
pub const DEFAULT_BLIP_SIZE: f32 = 1.0;
pub const DEFAULT_RADAR_SIZE: f32 = 1.0;
