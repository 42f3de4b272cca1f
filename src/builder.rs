//! Builder for configuring and constructing a `PulseEngine`.

use crate::core::{
    BackendConfig, BackendSession, ClockPeer, ControlStateBuffer, EngineConfig, LocalClock,
    SlotId, SynthBackend, TransportHandle, TransportReconciler,
};
use crate::core::config::validate_latency;
use crate::{PulseEngine, Result};
use std::sync::Arc;
use std::time::Duration;

/// The clock and backend are supplied at build time. The backend is opened
/// with the configured sample rate and slot, and closed when the engine is
/// closed or dropped.
///
/// # Example
///
/// ```ignore
/// use pulsebridge::prelude::*;
///
/// let mut engine = PulseEngine::builder()
///     .sample_rate(48000.0)
///     .buffer_size(256)
///     .tempo(120.0)
///     .build_local(Arc::new(CaptureBackend::new()))?;
///
/// engine.transport().start(true);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PulseEngineBuilder {
    config: EngineConfig,
    latency: Duration,
    tempo_set: bool,
}

impl PulseEngineBuilder {
    /// Start from a JSON-encoded [`EngineConfig`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        Ok(Self::default().config(config))
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self.tempo_set = true;
        self
    }

    /// Default: 44100
    pub fn sample_rate(mut self, sample_rate: f64) -> Self {
        self.config.sample_rate = sample_rate;
        self
    }

    /// Default: 512
    pub fn buffer_size(mut self, frames: usize) -> Self {
        self.config.buffer_size = frames;
        self
    }

    /// Initial tempo. With an external clock this is applied on the first
    /// callback.
    pub fn tempo(mut self, bpm: f64) -> Self {
        self.config.tempo = bpm;
        self.tempo_set = true;
        self
    }

    /// Default: 4
    pub fn quantum(mut self, quantum: f64) -> Self {
        self.config.quantum = quantum;
        self
    }

    /// Extra output latency on top of one device buffer. At most 10 s;
    /// larger values fail at build time.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn slot(mut self, slot: SlotId) -> Self {
        self.config.slot = slot;
        self
    }

    /// Build on an in-process [`LocalClock`] started at the configured tempo.
    ///
    /// The clock counts host time from its own epoch. Pass
    /// `engine.clock().now()` (or a device time on the same base) to
    /// [`PulseEngine::process`]; otherwise [`PulseEngine::state`] reads the
    /// timeline on a different time base than the audio thread.
    pub fn build_local<B: SynthBackend>(self, backend: Arc<B>) -> Result<PulseEngine<LocalClock, B>> {
        self.config.validate()?;
        let clock = Arc::new(LocalClock::new(self.config.tempo));
        Self {
            tempo_set: false,
            ..self
        }
        .build(clock, backend)
    }

    pub fn build<C: ClockPeer, B: SynthBackend>(
        self,
        clock: Arc<C>,
        backend: Arc<B>,
    ) -> Result<PulseEngine<C, B>> {
        self.config.validate()?;
        validate_latency(self.latency)?;

        let session = BackendSession::open(
            backend,
            &BackendConfig {
                sample_rate: self.config.sample_rate,
                channels: 2,
                slot: self.config.slot,
            },
        )?;

        let control = Arc::new(ControlStateBuffer::new(self.config.quantum));
        let reconciler =
            TransportReconciler::new(clock, Arc::clone(&control), session, &self.config);
        let transport = TransportHandle::new(control, Arc::clone(reconciler.status()));

        let transport = transport.latency(self.latency)?;
        if self.tempo_set {
            transport.clone().tempo(self.config.tempo)?;
        }

        tracing::info!(
            sample_rate = self.config.sample_rate,
            buffer_size = self.config.buffer_size,
            quantum = self.config.quantum,
            "pulse engine built"
        );

        Ok(PulseEngine::new(reconciler, transport))
    }
}
