//! Control-thread staging area drained by the audio thread.
//!
//! Writers always take the lock. The audio thread only ever uses `try_lock`
//! and skips the update on contention; one-shot requests stay set on the
//! writer side until a drain succeeds, so a skipped drain defers them by one
//! callback.

use crate::clock::Micros;
use crate::config::MAX_LATENCY;
use crate::event::PerformanceEvent;
use parking_lot::Mutex;

/// Fields written by the control thread.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlRequest {
    /// Pending tempo change; `0.0` means none.
    pub requested_tempo: f64,
    pub request_start: bool,
    pub request_stop: bool,
    pub quantum: f64,
    /// Output latency compensation in microseconds.
    pub latency: Micros,
    pub swing: f64,
    pub events: Vec<PerformanceEvent>,
    pub metronome: bool,
}

impl Default for ControlRequest {
    fn default() -> Self {
        Self {
            requested_tempo: 0.0,
            request_start: false,
            request_stop: false,
            quantum: 4.0,
            latency: 0,
            swing: 0.0,
            events: Vec::new(),
            metronome: false,
        }
    }
}

/// Audio-thread copy of the control state for one callback.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSnapshot {
    pub requested_tempo: f64,
    pub request_start: bool,
    pub request_stop: bool,
    pub quantum: f64,
    pub latency: Micros,
    pub swing: f64,
    pub events: Vec<PerformanceEvent>,
    pub metronome: bool,
}

impl Default for EngineSnapshot {
    fn default() -> Self {
        let request = ControlRequest::default();
        Self {
            requested_tempo: request.requested_tempo,
            request_start: request.request_start,
            request_stop: request.request_stop,
            quantum: request.quantum,
            latency: request.latency,
            swing: request.swing,
            events: request.events,
            metronome: request.metronome,
        }
    }
}

impl EngineSnapshot {
    /// Neutralize tempo/start/stop; persistent settings are kept.
    #[inline]
    pub fn clear_one_shots(&mut self) {
        self.requested_tempo = 0.0;
        self.request_start = false;
        self.request_stop = false;
    }

    #[inline]
    pub fn has_one_shots(&self) -> bool {
        self.requested_tempo > 0.0 || self.request_start || self.request_stop
    }
}

/// Mutex-guarded [`ControlRequest`] with a non-blocking reader.
#[derive(Debug, Default)]
pub struct ControlStateBuffer {
    shared: Mutex<ControlRequest>,
}

impl ControlStateBuffer {
    pub fn new(quantum: f64) -> Self {
        Self {
            shared: Mutex::new(ControlRequest {
                quantum,
                ..Default::default()
            }),
        }
    }

    /// Mutate the staged request under the lock (control thread only).
    pub fn stage<R>(&self, f: impl FnOnce(&mut ControlRequest) -> R) -> R {
        let mut request = self.shared.lock();
        f(&mut request)
    }

    /// Read the staged request under the lock (control thread only).
    pub fn read<R>(&self, f: impl FnOnce(&ControlRequest) -> R) -> R {
        let request = self.shared.lock();
        f(&request)
    }

    pub fn request_tempo(&self, bpm: f64) {
        self.stage(|r| r.requested_tempo = bpm);
    }

    pub fn request_start(&self, metronome: bool) {
        self.stage(|r| {
            r.request_start = true;
            r.metronome = metronome;
        });
    }

    pub fn request_stop(&self) {
        self.stage(|r| r.request_stop = true);
    }

    pub fn set_quantum(&self, quantum: f64) {
        self.stage(|r| r.quantum = quantum);
    }

    /// Clamped to `0..=MAX_LATENCY` so the audio thread's time arithmetic
    /// stays in range.
    pub fn set_latency(&self, latency: Micros) {
        let latency = latency.clamp(0, MAX_LATENCY.as_micros() as Micros);
        self.stage(|r| r.latency = latency);
    }

    pub fn set_swing(&self, swing: f64) {
        self.stage(|r| r.swing = swing);
    }

    /// Replace the event list. The previous list is freed after the lock is
    /// released so the critical section stays O(1).
    pub fn set_events(&self, events: Vec<PerformanceEvent>) {
        let previous = self.stage(|r| core::mem::replace(&mut r.events, events));
        drop(previous);
    }

    pub fn quantum(&self) -> f64 {
        self.read(|r| r.quantum)
    }

    pub fn latency(&self) -> Micros {
        self.read(|r| r.latency)
    }

    pub fn swing(&self) -> f64 {
        self.read(|r| r.swing)
    }

    pub fn events(&self) -> Vec<PerformanceEvent> {
        self.read(|r| r.events.clone())
    }

    pub fn metronome_enabled(&self) -> bool {
        self.read(|r| r.metronome)
    }

    /// Whether any tempo/start/stop request is still waiting for the audio thread.
    pub fn has_pending_requests(&self) -> bool {
        self.read(|r| r.requested_tempo > 0.0 || r.request_start || r.request_stop)
    }

    /// Drain into `snapshot` without blocking (audio thread).
    ///
    /// On success every field is copied, the staged one-shot fields are reset
    /// and `true` is returned. On contention only the one-shot fields of
    /// `snapshot` are neutralized; its persistent settings from the previous
    /// drain stay in place. The event list is copied with `clone_from`, which
    /// reuses the snapshot's allocation once its capacity has grown.
    pub fn drain_into(&self, snapshot: &mut EngineSnapshot) -> bool {
        let Some(mut shared) = self.shared.try_lock() else {
            snapshot.clear_one_shots();
            return false;
        };

        snapshot.requested_tempo = shared.requested_tempo;
        shared.requested_tempo = 0.0;

        snapshot.request_start = shared.request_start;
        shared.request_start = false;

        snapshot.request_stop = shared.request_stop;
        shared.request_stop = false;

        snapshot.quantum = shared.quantum;
        snapshot.latency = shared.latency;
        snapshot.swing = shared.swing;
        snapshot.events.clone_from(&shared.events);
        snapshot.metronome = shared.metronome;

        true
    }

    /// Convenience wrapper around [`drain_into`](Self::drain_into) starting
    /// from a default snapshot.
    pub fn drain(&self) -> EngineSnapshot {
        let mut snapshot = EngineSnapshot::default();
        self.drain_into(&mut snapshot);
        snapshot
    }
}
