//! Real-time transport bridge between a shared beat clock and a synthesis
//! backend.
//!
//! # Primary API
//!
//! - [`TransportReconciler`]: audio-callback entry point
//! - [`TransportHandle`]: control-thread start/stop/tempo/swing/events
//! - [`ControlStateBuffer`]: lock handoff between the two threads
//! - [`EventScheduler`] / [`MetronomeSynthesizer`]: per-buffer output
//! - [`ClockPeer`] / [`Timeline`] and [`SynthBackend`]: collaborator seams
//!
//! # Example
//!
//! ```ignore
//! use pulsebridge_core::*;
//!
//! let clock = Arc::new(LocalClock::new(120.0));
//! let control = Arc::new(ControlStateBuffer::new(4.0));
//! let session = BackendSession::open(backend, &BackendConfig::default())?;
//! let mut reconciler = TransportReconciler::new(clock, control.clone(), session, &config);
//!
//! // audio thread
//! reconciler.process(host_time, frames, &mut output);
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::{EngineConfig, MAX_LATENCY, MAX_SWING, MAX_TEMPO, MIN_TEMPO};

pub mod event;
pub use event::{PerformanceEvent, TriggerPhase, NOTE_OFF};

pub mod control;
pub use control::{ControlRequest, ControlStateBuffer, EngineSnapshot};

pub mod clock;
pub use clock::{ClockPeer, LocalClock, LocalTimeline, Micros, Timeline};

pub mod backend;
pub use backend::{
    BackendCall, BackendConfig, BackendEvent, BackendSession, CaptureBackend, EventBatch,
    EventTime, SlotId, SynthBackend,
};

pub mod transport;
pub use transport::{
    BufferWindow, EventScheduler, MetronomeSynthesizer, TransportHandle, TransportReconciler,
    TransportState, TransportStatus,
};

pub(crate) mod lockfree;
pub use lockfree::{AtomicDouble, AtomicFlag};

pub use std::sync::Arc;
