//! Engine configuration.

use crate::backend::SlotId;
use crate::clock::Micros;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const MIN_TEMPO: f64 = 20.0;
pub const MAX_TEMPO: f64 = 999.0;
pub const MAX_SWING: f64 = 4.0;
pub const MAX_LATENCY: Duration = Duration::from_secs(10);

/// Configuration for the transport bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub sample_rate: f64,
    /// Frames per device callback. Also determines the output latency
    /// compensation applied to the device host time.
    pub buffer_size: usize,
    /// Initial tempo of the local timeline.
    pub tempo: f64,
    pub quantum: f64,
    /// Backend slot the scheduler emits into.
    pub slot: SlotId,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100.0,
            buffer_size: 512,
            tempo: 120.0,
            quantum: 4.0,
            slot: SlotId::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        validate_sample_rate(self.sample_rate)?;
        validate_buffer_size(self.buffer_size)?;
        validate_tempo(self.tempo)?;
        validate_quantum(self.quantum)?;
        Ok(())
    }

    /// Device output latency in microseconds for one buffer.
    pub fn output_latency_us(&self) -> i64 {
        (1e6 * self.buffer_size as f64 / self.sample_rate).round() as i64
    }
}

pub fn validate_sample_rate(sample_rate: f64) -> Result<()> {
    if !(8000.0..=384000.0).contains(&sample_rate) {
        return Err(Error::InvalidSampleRate(sample_rate));
    }
    Ok(())
}

pub fn validate_buffer_size(buffer_size: usize) -> Result<()> {
    if !(1..=8192).contains(&buffer_size) {
        return Err(Error::InvalidBufferSize(buffer_size));
    }
    Ok(())
}

pub fn validate_tempo(bpm: f64) -> Result<()> {
    if !(MIN_TEMPO..=MAX_TEMPO).contains(&bpm) {
        return Err(Error::InvalidTempo(bpm));
    }
    Ok(())
}

pub fn validate_quantum(quantum: f64) -> Result<()> {
    if !quantum.is_finite() || quantum <= 0.0 {
        return Err(Error::InvalidQuantum(quantum));
    }
    Ok(())
}

pub fn validate_swing(swing: f64) -> Result<()> {
    if !(0.0..=MAX_SWING).contains(&swing) {
        return Err(Error::InvalidSwing(swing));
    }
    Ok(())
}

/// Check a user latency and convert it to microseconds.
pub fn validate_latency(latency: Duration) -> Result<Micros> {
    if latency > MAX_LATENCY {
        return Err(Error::InvalidLatency(latency));
    }
    Ok(latency.as_micros() as Micros)
}
