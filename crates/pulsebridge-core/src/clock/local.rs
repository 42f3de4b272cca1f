//! In-process clock for a single peer.

use super::{ClockPeer, Micros, Timeline};
use crate::config::{MAX_TEMPO, MIN_TEMPO};
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::Instant;

/// Linear beat/time mapping with a play state.
///
/// `beat(t) = beat_origin + (t - time_origin) * tempo / 60e6`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTimeline {
    tempo: f64,
    beat_origin: f64,
    time_origin: Micros,
    is_playing: bool,
    /// Time recorded by the last `set_is_playing`.
    playing_time: Micros,
}

impl LocalTimeline {
    pub fn new(tempo: f64) -> Self {
        Self {
            tempo: tempo.clamp(MIN_TEMPO, MAX_TEMPO),
            beat_origin: 0.0,
            time_origin: 0,
            is_playing: false,
            playing_time: 0,
        }
    }

    /// Move the anchor so that `beat` falls on `time`.
    pub fn force_beat_at_time(&mut self, beat: f64, time: Micros) {
        self.beat_origin = beat;
        self.time_origin = time;
    }

    pub fn playing_time(&self) -> Micros {
        self.playing_time
    }

    #[inline]
    fn micros_per_beat(&self) -> f64 {
        60e6 / self.tempo
    }
}

impl Default for LocalTimeline {
    fn default() -> Self {
        Self::new(120.0)
    }
}

impl Timeline for LocalTimeline {
    fn tempo(&self) -> f64 {
        self.tempo
    }

    fn set_tempo(&mut self, bpm: f64, at: Micros) {
        // Re-anchor at `at` so the beat position is continuous across the change
        let beat = self.beat_at_time(at, 1.0);
        self.beat_origin = beat;
        self.time_origin = at;
        self.tempo = bpm.clamp(MIN_TEMPO, MAX_TEMPO);
    }

    fn is_playing(&self) -> bool {
        self.is_playing
    }

    fn set_is_playing(&mut self, playing: bool, at: Micros) {
        self.is_playing = playing;
        self.playing_time = at;
    }

    fn request_beat_at_start_playing_time(&mut self, beat: f64, _quantum: f64) {
        if self.is_playing {
            self.force_beat_at_time(beat, self.playing_time);
        }
    }

    fn beat_at_time(&self, time: Micros, _quantum: f64) -> f64 {
        self.beat_origin + (time - self.time_origin) as f64 / self.micros_per_beat()
    }

    fn phase_at_time(&self, time: Micros, quantum: f64) -> f64 {
        self.beat_at_time(time, quantum).rem_euclid(quantum)
    }

    fn time_at_beat(&self, beat: f64, _quantum: f64) -> Micros {
        self.time_origin + ((beat - self.beat_origin) * self.micros_per_beat()).round() as Micros
    }
}

/// Single-peer clock backed by the process monotonic clock.
///
/// The committed timeline lives in an `ArcSwap`, so capture and commit never
/// take a lock. Every commit allocates a fresh `Arc`, so a reconciler driving
/// this clock allocates and frees once per callback. A peer with stricter
/// real-time needs should implement [`ClockPeer`] over preallocated storage.
///
/// Host times passed to the reconciler must come from [`ClockPeer::now`] for
/// control-side queries to agree with the audio timeline.
#[derive(Debug)]
pub struct LocalClock {
    timeline: ArcSwap<LocalTimeline>,
    epoch: Instant,
}

impl LocalClock {
    pub fn new(tempo: f64) -> Self {
        Self {
            timeline: ArcSwap::from_pointee(LocalTimeline::new(tempo)),
            epoch: Instant::now(),
        }
    }

    /// Commit from a non-audio thread.
    pub fn commit_app_timeline(&self, timeline: LocalTimeline) {
        self.timeline.store(Arc::new(timeline));
    }
}

impl Default for LocalClock {
    fn default() -> Self {
        Self::new(120.0)
    }
}

impl ClockPeer for LocalClock {
    type Timeline = LocalTimeline;

    fn capture_audio_timeline(&self) -> LocalTimeline {
        **self.timeline.load()
    }

    fn commit_audio_timeline(&self, timeline: LocalTimeline) {
        self.timeline.store(Arc::new(timeline));
    }

    fn capture_app_timeline(&self) -> LocalTimeline {
        **self.timeline.load()
    }

    fn now(&self) -> Micros {
        self.epoch.elapsed().as_micros() as Micros
    }
}
