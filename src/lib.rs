//! # PulseBridge - Real-time Transport Bridge
//!
//! Keeps a synthesis backend in step with a shared beat clock from inside the
//! audio callback.
//!
//! ## Architecture
//!
//! PulseBridge is an umbrella crate over:
//! - **pulsebridge-core** - control handoff, quarter-beat event scheduling,
//!   metronome click, per-callback transport reconciliation, and the clock and
//!   backend seams
//!
//! ## Quick Start
//!
//! ```ignore
//! use pulsebridge::prelude::*;
//!
//! let mut engine = PulseEngine::builder()
//!     .sample_rate(48000.0)
//!     .buffer_size(256)
//!     .build_local(Arc::new(CaptureBackend::new()))?;
//!
//! engine
//!     .transport()
//!     .tempo(124.0)?
//!     .swing(0.3)?
//!     .events(vec![PerformanceEvent::new(0, 60, 100, 1)])
//!     .start(true);
//!
//! // From the audio callback
//! engine.process(host_time, frames, &mut output);
//! ```

/// Re-export of pulsebridge-core for direct access
pub use pulsebridge_core as core;

pub use pulsebridge_core::{
    // Backend seam
    BackendCall,
    BackendConfig,
    BackendEvent,
    BackendSession,
    CaptureBackend,
    // Clock seam
    ClockPeer,
    ControlStateBuffer,
    EngineConfig,
    EngineSnapshot,
    EventTime,
    LocalClock,
    LocalTimeline,
    Micros,
    // Events
    PerformanceEvent,
    SlotId,
    SynthBackend,
    Timeline,
    // Transport
    TransportHandle,
    TransportState,
    TriggerPhase,
    NOTE_OFF,
};

pub mod error;
pub use error::{Error, Result};

mod builder;
mod engine;

pub use builder::PulseEngineBuilder;
pub use engine::PulseEngine;

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{PulseEngine, PulseEngineBuilder};

    pub use crate::core::{
        CaptureBackend, ClockPeer, LocalClock, PerformanceEvent, SynthBackend, Timeline,
        TransportHandle, TransportState, TriggerPhase,
    };

    pub use std::sync::Arc;
    pub use std::time::Duration;
}
