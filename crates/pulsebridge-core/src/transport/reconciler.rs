//! Audio-callback entry point.
//!
//! Per callback: drain control state, capture the timeline, apply start/stop
//! and tempo, commit, then schedule events, render the backend and mix the
//! metronome. Nothing on this path blocks or returns an error.

use super::{BufferWindow, EventScheduler, MetronomeSynthesizer, TransportStatus};
use crate::backend::{BackendSession, SynthBackend};
use crate::clock::{ClockPeer, Micros, Timeline};
use crate::config::EngineConfig;
use crate::control::{ControlStateBuffer, EngineSnapshot};
use std::sync::Arc;

/// Owns the per-callback sequencing between control, clock and backend.
pub struct TransportReconciler<C: ClockPeer, B: SynthBackend> {
    clock: Arc<C>,
    control: Arc<ControlStateBuffer>,
    session: BackendSession<B>,
    status: Arc<TransportStatus>,
    scheduler: EventScheduler,
    metronome: MetronomeSynthesizer,
    snapshot: EngineSnapshot,
    /// Playing state seen on the previous callback.
    is_playing: bool,
    sample_rate: f64,
    buffer_size: usize,
}

impl<C: ClockPeer, B: SynthBackend> TransportReconciler<C, B> {
    pub fn new(
        clock: Arc<C>,
        control: Arc<ControlStateBuffer>,
        session: BackendSession<B>,
        config: &EngineConfig,
    ) -> Self {
        let snapshot = EngineSnapshot {
            quantum: config.quantum,
            ..Default::default()
        };
        Self {
            clock,
            control,
            session,
            status: Arc::new(TransportStatus::new()),
            scheduler: EventScheduler::new(config.sample_rate),
            metronome: MetronomeSynthesizer::new(config.sample_rate),
            snapshot,
            is_playing: false,
            sample_rate: config.sample_rate,
            buffer_size: config.buffer_size,
        }
    }

    /// Must not be called concurrently with [`process`](Self::process).
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.scheduler.set_sample_rate(sample_rate);
        self.metronome.set_sample_rate(sample_rate);
    }

    /// Must not be called concurrently with [`process`](Self::process).
    pub fn set_buffer_size(&mut self, buffer_size: usize) {
        self.buffer_size = buffer_size;
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Latency of one device buffer in microseconds.
    pub fn output_latency(&self) -> Micros {
        (1e6 * self.buffer_size as f64 / self.sample_rate).round() as Micros
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn status(&self) -> &Arc<TransportStatus> {
        &self.status
    }

    pub fn session(&self) -> &BackendSession<B> {
        &self.session
    }

    pub fn clock(&self) -> &Arc<C> {
        &self.clock
    }

    /// The snapshot used by the last callback.
    pub fn snapshot(&self) -> &EngineSnapshot {
        &self.snapshot
    }

    /// Render one buffer of `frames` interleaved stereo frames.
    ///
    /// `host_time` is the host time at which the first frame reaches the
    /// output; the user latency from the control state is added on top.
    pub fn process(&mut self, host_time: Micros, frames: usize, output: &mut [f32]) {
        self.control.drain_into(&mut self.snapshot);
        let quantum = self.snapshot.quantum;
        let host_time = host_time.saturating_add(self.snapshot.latency);

        let mut timeline = self.clock.capture_audio_timeline();

        // Stop wins when both were requested in the same window
        if self.snapshot.request_stop {
            timeline.set_is_playing(false, host_time);
        } else if self.snapshot.request_start {
            timeline.set_is_playing(true, host_time);
        }

        if !self.is_playing && timeline.is_playing() {
            // Beat 0 lands on the instant playback starts
            timeline.request_beat_at_start_playing_time(0.0, quantum);
            self.is_playing = true;
        } else if self.is_playing && !timeline.is_playing() {
            self.is_playing = false;
        }

        if self.snapshot.requested_tempo > 0.0 {
            timeline.set_tempo(self.snapshot.requested_tempo, host_time);
        }

        self.clock.commit_audio_timeline(timeline.clone());

        let window = BufferWindow {
            begin: host_time,
            frames,
            begin_ticks: self.session.ticks(),
        };

        let active = self.is_playing && self.session.is_open();

        if active {
            self.scheduler.schedule(
                &self.session,
                &timeline,
                quantum,
                self.snapshot.swing,
                &self.snapshot.events,
                &window,
            );
        }

        self.session.render(output, frames, window.begin_ticks);

        if active && self.snapshot.metronome {
            self.metronome.render(&timeline, quantum, &window, output);
        }

        self.status.publish(
            self.is_playing,
            timeline.tempo(),
            timeline.beat_at_time(host_time, quantum),
        );
    }
}
