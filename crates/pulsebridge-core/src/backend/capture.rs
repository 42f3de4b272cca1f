//! Recording backend for offline inspection.

use super::{BackendConfig, BackendEvent, EventTime, SlotId, SynthBackend};
use crate::lockfree::AtomicDouble;
use crate::{Error, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Open(BackendConfig),
    Close,
    LockSlot(SlotId),
    UnlockSlot(SlotId),
    SetEventTime(SlotId, EventTime),
    SendEvent(SlotId, BackendEvent),
    Render {
        slot: SlotId,
        frames: usize,
        ticks: u32,
    },
    SetVolume(i32),
}

/// Backend that records every call, renders silence and advances its tick
/// counter by the rendered duration.
#[derive(Debug)]
pub struct CaptureBackend {
    calls: Mutex<Vec<BackendCall>>,
    ticks: AtomicU32,
    ticks_per_second: u32,
    sample_rate: AtomicDouble,
    open_error: Mutex<Option<String>>,
}

impl CaptureBackend {
    pub const DEFAULT_TICKS_PER_SECOND: u32 = 50_000;

    pub fn new() -> Self {
        Self::with_ticks_per_second(Self::DEFAULT_TICKS_PER_SECOND)
    }

    pub fn with_ticks_per_second(ticks_per_second: u32) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            ticks: AtomicU32::new(0),
            ticks_per_second,
            sample_rate: AtomicDouble::new(44100.0),
            open_error: Mutex::new(None),
        }
    }

    /// Make the next `open` fail with `Error::Backend(message)`.
    pub fn fail_next_open(&self, message: impl Into<String>) {
        *self.open_error.lock() = Some(message.into());
    }

    pub fn set_ticks(&self, ticks: u32) {
        self.ticks.store(ticks, Ordering::Release);
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().clone()
    }

    pub fn take_calls(&self) -> Vec<BackendCall> {
        std::mem::take(&mut *self.calls.lock())
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    /// Every sent event paired with the event time in effect when it was sent.
    pub fn sent_events(&self) -> Vec<(EventTime, BackendEvent)> {
        let mut time = EventTime::Immediate;
        let mut sent = Vec::new();
        for call in self.calls.lock().iter() {
            match call {
                BackendCall::SetEventTime(_, t) => time = *t,
                BackendCall::SendEvent(_, event) => sent.push((time, *event)),
                _ => {}
            }
        }
        sent
    }

    /// Number of `lock_slot` calls, i.e. emitted batches.
    pub fn batch_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, BackendCall::LockSlot(_)))
            .count()
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().push(call);
    }
}

impl Default for CaptureBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SynthBackend for CaptureBackend {
    fn open(&self, config: &BackendConfig) -> Result<()> {
        if let Some(message) = self.open_error.lock().take() {
            return Err(Error::Backend(message));
        }
        self.sample_rate.set(config.sample_rate);
        self.record(BackendCall::Open(config.clone()));
        Ok(())
    }

    fn close(&self) {
        self.record(BackendCall::Close);
    }

    fn ticks(&self) -> u32 {
        self.ticks.load(Ordering::Acquire)
    }

    fn ticks_per_second(&self) -> u32 {
        self.ticks_per_second
    }

    fn lock_slot(&self, slot: SlotId) {
        self.record(BackendCall::LockSlot(slot));
    }

    fn unlock_slot(&self, slot: SlotId) {
        self.record(BackendCall::UnlockSlot(slot));
    }

    fn set_event_time(&self, slot: SlotId, time: EventTime) {
        self.record(BackendCall::SetEventTime(slot, time));
    }

    fn send_event(&self, slot: SlotId, event: &BackendEvent) {
        self.record(BackendCall::SendEvent(slot, *event));
    }

    fn render(&self, slot: SlotId, output: &mut [f32], frames: usize, ticks: u32) {
        output.fill(0.0);
        let elapsed = (frames as f64 * self.ticks_per_second as f64 / self.sample_rate.get()).round();
        self.ticks
            .store(ticks.wrapping_add(elapsed as u32), Ordering::Release);
        self.record(BackendCall::Render {
            slot,
            frames,
            ticks,
        });
    }

    fn set_volume(&self, volume: i32) {
        self.record(BackendCall::SetVolume(volume));
    }
}
