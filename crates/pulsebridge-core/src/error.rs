//! Error types for pulsebridge-core.
//!
//! Only control-side operations are fallible. The audio callback path never
//! returns a `Result`.

use std::time::Duration;
use thiserror::Error;

/// Error type for pulsebridge-core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid tempo: {0}. Must be between 20.0 and 999.0 BPM")]
    InvalidTempo(f64),

    #[error("Invalid quantum: {0}. Must be a positive number of beats")]
    InvalidQuantum(f64),

    #[error("Invalid swing: {0}. Must be between 0.0 and 4.0")]
    InvalidSwing(f64),

    #[error("Invalid latency: {0:?}. Must be at most 10 s")]
    InvalidLatency(Duration),

    #[error("Invalid sample rate: {0}. Must be between 8000 and 384000 Hz")]
    InvalidSampleRate(f64),

    #[error("Invalid buffer size: {0}. Must be between 1 and 8192 frames")]
    InvalidBufferSize(usize),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Backend session is closed")]
    SessionClosed,
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
