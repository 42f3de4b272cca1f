//! PulseEngine that wires the clock, control handle and backend together

use crate::core::{
    BackendSession, ClockPeer, Micros, SynthBackend, TransportHandle, TransportReconciler,
    TransportState,
};
use crate::core::config::{validate_buffer_size, validate_sample_rate};
use crate::Result;
use std::sync::Arc;

/// Transport bridge engine.
///
/// `process` belongs to the audio thread. Clone [`transport`](Self::transport)
/// for the control thread before moving the engine into the audio callback.
///
/// # Example
///
/// ```ignore
/// use pulsebridge::prelude::*;
///
/// let mut engine = PulseEngine::builder().build_local(backend)?;
/// let transport = engine.transport();
///
/// transport.clone().tempo(128.0)?.events(pattern).start(true);
///
/// // audio callback
/// engine.process(device_host_time, frames, &mut output);
/// ```
pub struct PulseEngine<C: ClockPeer, B: SynthBackend> {
    reconciler: TransportReconciler<C, B>,
    transport: TransportHandle,
}

impl<C: ClockPeer, B: SynthBackend> PulseEngine<C, B> {
    pub(crate) fn new(reconciler: TransportReconciler<C, B>, transport: TransportHandle) -> Self {
        Self {
            reconciler,
            transport,
        }
    }

    /// Create a new engine builder
    pub fn builder() -> crate::PulseEngineBuilder {
        crate::PulseEngineBuilder::default()
    }

    /// Control handle (cheap to clone).
    pub fn transport(&self) -> TransportHandle {
        self.transport.clone()
    }

    /// Render one device buffer.
    ///
    /// `device_host_time` is the host time the device reported for this
    /// callback, on the same base as [`ClockPeer::now`] of the engine's clock.
    /// One buffer of output latency is added before the reconciler runs.
    pub fn process(&mut self, device_host_time: Micros, frames: usize, output: &mut [f32]) {
        let host_time = device_host_time.saturating_add(self.reconciler.output_latency());
        self.reconciler.process(host_time, frames, output);
    }

    /// Tempo and phase at the clock's current host time.
    pub fn state(&self) -> TransportState {
        TransportState::capture(self.reconciler.clock().as_ref(), self.transport.get_quantum())
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    pub fn sample_rate(&self) -> f64 {
        self.reconciler.sample_rate()
    }

    pub fn buffer_size(&self) -> usize {
        self.reconciler.buffer_size()
    }

    /// Apply a new device sample rate. Call only while the stream is stopped.
    pub fn set_sample_rate(&mut self, sample_rate: f64) -> Result<()> {
        validate_sample_rate(sample_rate)?;
        self.reconciler.set_sample_rate(sample_rate);
        tracing::debug!(sample_rate, "sample rate changed");
        Ok(())
    }

    /// Apply a new device buffer size. Call only while the stream is stopped.
    pub fn set_buffer_size(&mut self, frames: usize) -> Result<()> {
        validate_buffer_size(frames)?;
        self.reconciler.set_buffer_size(frames);
        tracing::debug!(frames, "buffer size changed");
        Ok(())
    }

    /// Device output latency added to every callback.
    pub fn output_latency(&self) -> Micros {
        self.reconciler.output_latency()
    }

    pub fn clock(&self) -> &Arc<C> {
        self.reconciler.clock()
    }

    pub fn session(&self) -> &BackendSession<B> {
        self.reconciler.session()
    }

    /// Close the backend session. Later callbacks render silence.
    pub fn close(&self) {
        self.reconciler.session().close();
    }
}
