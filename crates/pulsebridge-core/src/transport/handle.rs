//! Fluent control handle for the transport.

use super::TransportStatus;
use crate::config::{validate_latency, validate_quantum, validate_swing, validate_tempo};
use crate::control::ControlStateBuffer;
use crate::event::PerformanceEvent;
use crate::Result;
use std::sync::Arc;
use std::time::Duration;

/// Fluent API handle for transport control.
///
/// Created via `engine.transport()`. Setters block briefly on the control
/// lock; the audio thread picks changes up on its next callback.
///
/// # Example
/// ```ignore
/// engine.transport()
///     .tempo(128.0)?
///     .quantum(4.0)?
///     .swing(0.3)?
///     .events(pattern)
///     .start(true);
/// ```
#[derive(Clone)]
pub struct TransportHandle {
    control: Arc<ControlStateBuffer>,
    status: Arc<TransportStatus>,
}

impl TransportHandle {
    pub fn new(control: Arc<ControlStateBuffer>, status: Arc<TransportStatus>) -> Self {
        Self { control, status }
    }

    /// Request a tempo change in BPM (20 to 999).
    pub fn tempo(self, bpm: f64) -> Result<Self> {
        validate_tempo(bpm)?;
        self.control.request_tempo(bpm);
        tracing::debug!(bpm, "tempo requested");
        Ok(self)
    }

    /// Tempo observed by the audio thread on its last callback.
    pub fn get_tempo(&self) -> f64 {
        self.status.tempo()
    }

    pub fn quantum(self, quantum: f64) -> Result<Self> {
        validate_quantum(quantum)?;
        self.control.set_quantum(quantum);
        tracing::debug!(quantum, "quantum set");
        Ok(self)
    }

    pub fn get_quantum(&self) -> f64 {
        self.control.quantum()
    }

    /// Output latency the timeline leads by (at most 10 s).
    pub fn latency(self, latency: Duration) -> Result<Self> {
        let micros = validate_latency(latency)?;
        self.control.set_latency(micros);
        tracing::debug!(latency_us = micros, "latency set");
        Ok(self)
    }

    pub fn get_latency(&self) -> Duration {
        Duration::from_micros(self.control.latency().max(0) as u64)
    }

    /// Off-beat delay in quarter-beat fractions (0 to 4).
    pub fn swing(self, swing: f64) -> Result<Self> {
        validate_swing(swing)?;
        self.control.set_swing(swing);
        tracing::debug!(swing, "swing set");
        Ok(self)
    }

    pub fn get_swing(&self) -> f64 {
        self.control.swing()
    }

    /// Replace the per-quarter-beat event list.
    pub fn events(self, events: Vec<PerformanceEvent>) -> Self {
        let count = events.len();
        self.control.set_events(events);
        tracing::debug!(count, "events replaced");
        self
    }

    pub fn get_events(&self) -> Vec<PerformanceEvent> {
        self.control.events()
    }

    /// Request playback, optionally with the metronome click.
    pub fn start(self, metronome: bool) -> Self {
        self.control.request_start(metronome);
        tracing::debug!(metronome, "start requested");
        self
    }

    pub fn stop(self) -> Self {
        self.control.request_stop();
        tracing::debug!("stop requested");
        self
    }

    pub fn metronome_enabled(&self) -> bool {
        self.control.metronome_enabled()
    }

    /// Playing state as of the audio thread's last callback.
    pub fn is_playing(&self) -> bool {
        self.status.is_playing()
    }

    /// Beat at the start of the last rendered buffer.
    pub fn current_beat(&self) -> f64 {
        self.status.beat()
    }
}
