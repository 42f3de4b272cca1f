//! Quarter-beat event scheduling.
//!
//! Walks the quarter-beat grid of the committed timeline over one buffer and
//! emits the user event list as tick-stamped backend events.

use super::BufferWindow;
use crate::backend::{BackendEvent, BackendSession, EventBatch, SynthBackend};
use crate::clock::{Micros, Timeline};
use crate::event::{PerformanceEvent, TriggerPhase};

/// Quarter-beat offset of the 1/32-beat follow-up.
const THIRTY_SECOND_OFFSET: f64 = 0.5;
/// Quarter-beat offsets of the two 1/24-beat follow-ups.
const TRIPLET_OFFSETS: [f64; 2] = [2.0 / 3.0, 4.0 / 3.0];

/// Converts the event list into backend events for one buffer.
#[derive(Debug, Clone)]
pub struct EventScheduler {
    micros_per_sample: f64,
}

impl EventScheduler {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            micros_per_sample: 1e6 / sample_rate,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.micros_per_sample = 1e6 / sample_rate;
    }

    /// Emit one locked batch per quarter-beat starting inside `window`.
    ///
    /// Quarter-beats before `window.begin` were handled by an earlier call
    /// and are skipped. Returns the number of batches emitted.
    pub fn schedule<T: Timeline, B: SynthBackend>(
        &self,
        session: &BackendSession<B>,
        timeline: &T,
        quantum: f64,
        swing: f64,
        events: &[PerformanceEvent],
        window: &BufferWindow,
    ) -> usize {
        let end = window.end(self.micros_per_sample);
        let ticks_per_second = f64::from(session.ticks_per_second());
        let to_ticks = |time: Micros| -> u32 {
            let offset = ((time - window.begin) as f64 * ticks_per_second / 1e6).round();
            window.begin_ticks.wrapping_add(offset as u32)
        };

        let mut batches = 0;
        let mut beat = (timeline.beat_at_time(window.begin, quantum) * 4.0).max(0.0) as i64;
        loop {
            let quarter = beat as f64;
            let time_at_beat = timeline.time_at_beat(quarter / 4.0, quantum);
            if time_at_beat >= end {
                break;
            }

            if time_at_beat >= window.begin && !events.is_empty() {
                // Odd quarter-beats are the swung off-beats
                let primary = if beat % 2 == 1 {
                    timeline.time_at_beat((quarter + swing) / 4.0, quantum)
                } else {
                    time_at_beat
                };

                let batch = session.batch();

                batch.at(to_ticks(primary));
                for event in events {
                    batch.send(&BackendEvent {
                        track: event.track,
                        note: event.note(),
                        velocity: event.velocity,
                        module: event.module,
                        ctl: event.extra0,
                        ctl_value: event.extra1,
                    });
                }

                let at = timeline.time_at_beat((quarter + THIRTY_SECOND_OFFSET) / 4.0, quantum);
                batch.at(to_ticks(at));
                send_follow_ups(&batch, events, TriggerPhase::ThirtySecond);

                for offset in TRIPLET_OFFSETS {
                    let at = timeline.time_at_beat((quarter + offset) / 4.0, quantum);
                    batch.at(to_ticks(at));
                    send_follow_ups(&batch, events, TriggerPhase::DoubleTriplet);
                }

                drop(batch);
                batches += 1;
            }

            beat += 1;
        }

        batches
    }
}

fn send_follow_ups<B: SynthBackend>(
    batch: &EventBatch<'_, B>,
    events: &[PerformanceEvent],
    phase: TriggerPhase,
) {
    for event in events
        .iter()
        .filter(|e| e.trigger() == phase && e.has_valid_note())
    {
        batch.send(&BackendEvent::new(
            event.track,
            event.note(),
            event.velocity,
            event.module,
        ));
    }
}
