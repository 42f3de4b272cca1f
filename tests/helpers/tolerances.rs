//! Tolerance constants for transport testing.

/// Beat positions derived from exact microsecond anchors.
pub const BEAT_EPSILON: f64 = 1e-9;

/// Beat positions read back through a rounded host time.
pub const ROUNDED_BEAT_EPSILON: f64 = 1e-4;

/// Click amplitude comparisons (f32 output vs f64 reference).
pub const CLICK_EPSILON: f32 = 1e-3;

/// Silence threshold (~-80dB).
/// Values below this are considered silent.
pub const SILENCE_THRESHOLD: f32 = 0.0001;
