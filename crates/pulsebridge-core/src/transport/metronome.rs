//! Fallback metronome click mixed straight into the output buffer.

use super::BufferWindow;
use crate::clock::{Micros, Timeline};
use std::f64::consts::PI;

/// Click on the first beat of each quantum.
pub const HIGH_TONE: f64 = 1567.98;
/// Click on every other beat.
pub const LOW_TONE: f64 = 1108.73;
/// Click length in seconds.
pub const CLICK_DURATION: f64 = 0.1;

/// Cosine click synthesizer.
///
/// A click starts whenever the beat phase wraps; it sounds for
/// [`CLICK_DURATION`] seconds with amplitude
/// `cos(2π·t·f) · (1 - sin(5π·t))`.
#[derive(Debug, Clone)]
pub struct MetronomeSynthesizer {
    micros_per_sample: f64,
    last_click: Micros,
}

impl MetronomeSynthesizer {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            micros_per_sample: 1e6 / sample_rate,
            last_click: 0,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.micros_per_sample = 1e6 / sample_rate;
    }

    /// Host time of the most recent click.
    pub fn last_click(&self) -> Micros {
        self.last_click
    }

    /// Add the click to an interleaved stereo buffer of `window.frames` frames.
    pub fn render<T: Timeline>(
        &mut self,
        timeline: &T,
        quantum: f64,
        window: &BufferWindow,
        output: &mut [f32],
    ) {
        let sample_step = self.micros_per_sample.round() as Micros;

        for (i, frame) in output.chunks_exact_mut(2).take(window.frames).enumerate() {
            let host_time = window.begin + (i as f64 * self.micros_per_sample).round() as Micros;
            let amplitude = self.amplitude_at(timeline, quantum, host_time, sample_step);
            frame[0] += amplitude;
            frame[1] += amplitude;
        }
    }

    fn amplitude_at<T: Timeline>(
        &mut self,
        timeline: &T,
        quantum: f64,
        host_time: Micros,
        sample_step: Micros,
    ) -> f32 {
        // Negative beats are count-in and stay silent
        if timeline.beat_at_time(host_time, quantum) < 0.0 {
            return 0.0;
        }

        if timeline.phase_at_time(host_time, 1.0)
            < timeline.phase_at_time(host_time - sample_step, 1.0)
        {
            self.last_click = host_time;
        }

        let elapsed = (host_time - self.last_click) as f64 / 1e6;
        if elapsed >= CLICK_DURATION {
            return 0.0;
        }

        let freq = if timeline.phase_at_time(host_time, quantum).floor() == 0.0 {
            HIGH_TONE
        } else {
            LOW_TONE
        };

        ((2.0 * PI * elapsed * freq).cos() * (1.0 - (5.0 * PI * elapsed).sin())) as f32
    }
}
