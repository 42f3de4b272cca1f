//! Transport bridge between the control thread, the clock peer and the
//! synthesis backend.
//!
//! [`TransportReconciler::process`] is called from the audio callback. It
//! drives the [`EventScheduler`] and the [`MetronomeSynthesizer`] from the
//! timeline it committed for that buffer.

mod handle;
mod metronome;
mod reconciler;
mod scheduler;
mod status;

pub use handle::TransportHandle;
pub use metronome::{MetronomeSynthesizer, CLICK_DURATION, HIGH_TONE, LOW_TONE};
pub use reconciler::TransportReconciler;
pub use scheduler::EventScheduler;
pub use status::TransportStatus;

use crate::clock::{ClockPeer, Micros, Timeline};

/// The span of host time and backend ticks covered by one buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferWindow {
    /// Effective host time of the first frame.
    pub begin: Micros,
    pub frames: usize,
    /// Backend tick counter at `begin`.
    pub begin_ticks: u32,
}

impl BufferWindow {
    /// Host time just past the last frame.
    #[inline]
    pub fn end(&self, micros_per_sample: f64) -> Micros {
        self.begin
            .saturating_add((self.frames as f64 * micros_per_sample).round() as Micros)
    }
}

/// Transport state as seen from the control thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportState {
    pub tempo: f64,
    /// Raw beat during count-in (negative), otherwise phase within the quantum.
    pub phase: f64,
}

impl TransportState {
    /// Read the app-side timeline at the clock's current time.
    pub fn capture<C: ClockPeer>(clock: &C, quantum: f64) -> Self {
        let now = clock.now();
        let timeline = clock.capture_app_timeline();
        let beat = timeline.beat_at_time(now, quantum);
        let phase = if beat < 0.0 {
            beat
        } else {
            timeline.phase_at_time(now, quantum)
        };
        Self {
            tempo: timeline.tempo(),
            phase,
        }
    }
}
