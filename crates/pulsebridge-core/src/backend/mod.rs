//! Synthesis backend seam.
//!
//! The backend is an external engine that renders audio and accepts
//! tick-stamped events. All methods take `&self`; implementations handle their
//! own synchronization.

mod capture;
mod session;

pub use capture::{BackendCall, CaptureBackend};
pub use session::{BackendSession, EventBatch};

use crate::Result;
use serde::{Deserialize, Serialize};

/// Identifier of a backend slot (an independent song/instrument context).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SlotId(pub u32);

/// Parameters the backend is opened with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub sample_rate: f64,
    /// Interleaved output channels.
    pub channels: usize,
    pub slot: SlotId,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100.0,
            channels: 2,
            slot: SlotId::default(),
        }
    }
}

/// Timestamp applied to subsequent `send_event` calls on a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTime {
    /// Absolute backend tick.
    At(u32),
    /// Apply events as soon as they arrive.
    Immediate,
}

/// A single note/controller message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackendEvent {
    pub track: i32,
    pub note: i32,
    pub velocity: i32,
    pub module: i32,
    pub ctl: i32,
    pub ctl_value: i32,
}

impl BackendEvent {
    pub fn new(track: i32, note: i32, velocity: i32, module: i32) -> Self {
        Self {
            track,
            note,
            velocity,
            module,
            ctl: 0,
            ctl_value: 0,
        }
    }

    pub fn with_ctl(mut self, ctl: i32, ctl_value: i32) -> Self {
        self.ctl = ctl;
        self.ctl_value = ctl_value;
        self
    }
}

/// External synthesis engine.
pub trait SynthBackend: Send + Sync {
    fn open(&self, config: &BackendConfig) -> Result<()>;

    fn close(&self);

    /// Tick counter at the start of the next render.
    fn ticks(&self) -> u32;

    fn ticks_per_second(&self) -> u32;

    /// Acquire exclusive access to `slot` for a burst of events.
    fn lock_slot(&self, slot: SlotId);

    fn unlock_slot(&self, slot: SlotId);

    fn set_event_time(&self, slot: SlotId, time: EventTime);

    fn send_event(&self, slot: SlotId, event: &BackendEvent);

    /// Render `frames` interleaved frames into `output`.
    fn render(&self, slot: SlotId, output: &mut [f32], frames: usize, ticks: u32);

    fn set_volume(&self, volume: i32);
}
