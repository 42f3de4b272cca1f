//! Clock peer seam.
//!
//! A clock peer owns the shared mapping between host time and beat position.
//! The audio thread captures a [`Timeline`] copy once per callback, mutates it,
//! and commits it back.

mod local;

pub use local::{LocalClock, LocalTimeline};

/// Host time in microseconds.
pub type Micros = i64;

/// A captured, mutable copy of the session timeline.
///
/// Queries are pure functions of `(time, quantum)`.
pub trait Timeline: Clone + Send {
    fn tempo(&self) -> f64;

    /// Change the tempo from `at` onward.
    fn set_tempo(&mut self, bpm: f64, at: Micros);

    fn is_playing(&self) -> bool;

    fn set_is_playing(&mut self, playing: bool, at: Micros);

    /// Re-anchor so that `beat` falls on the time recorded by the last
    /// `set_is_playing` call. No-op while stopped.
    fn request_beat_at_start_playing_time(&mut self, beat: f64, quantum: f64);

    fn beat_at_time(&self, time: Micros, quantum: f64) -> f64;

    /// Phase within `[0, quantum)`.
    fn phase_at_time(&self, time: Micros, quantum: f64) -> f64;

    fn time_at_beat(&self, beat: f64, quantum: f64) -> Micros;
}

/// Source and sink of session timelines.
pub trait ClockPeer: Send + Sync {
    type Timeline: Timeline;

    /// Capture from the audio thread. Must not block.
    fn capture_audio_timeline(&self) -> Self::Timeline;

    /// Publish an audio-thread timeline. Must not block.
    fn commit_audio_timeline(&self, timeline: Self::Timeline);

    /// Capture from a non-audio thread.
    fn capture_app_timeline(&self) -> Self::Timeline;

    /// Current host time.
    fn now(&self) -> Micros;
}
