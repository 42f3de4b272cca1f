//! Owned backend lifecycle and bracketed event emission.

use super::{BackendConfig, BackendEvent, EventTime, SlotId, SynthBackend};
use crate::lockfree::AtomicFlag;
use crate::{Error, Result};
use std::sync::Arc;

/// An opened backend bound to one slot.
///
/// Closing is idempotent and also happens on drop.
pub struct BackendSession<B: SynthBackend> {
    backend: Arc<B>,
    slot: SlotId,
    open: AtomicFlag,
}

impl<B: SynthBackend> BackendSession<B> {
    pub fn open(backend: Arc<B>, config: &BackendConfig) -> Result<Self> {
        backend.open(config)?;
        tracing::info!(
            slot = config.slot.0,
            sample_rate = config.sample_rate,
            "backend session opened"
        );
        Ok(Self {
            backend,
            slot: config.slot,
            open: AtomicFlag::new(true),
        })
    }

    pub fn close(&self) {
        if self.open.swap(false) {
            self.backend.close();
            tracing::info!(slot = self.slot.0, "backend session closed");
        }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn slot(&self) -> SlotId {
        self.slot
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    #[inline]
    pub fn ticks(&self) -> u32 {
        self.backend.ticks()
    }

    #[inline]
    pub fn ticks_per_second(&self) -> u32 {
        self.backend.ticks_per_second()
    }

    /// Lock the slot for a burst of timestamped events.
    #[inline]
    pub fn batch(&self) -> EventBatch<'_, B> {
        EventBatch::new(self)
    }

    /// Render into `output`, or write silence once the session is closed.
    #[inline]
    pub fn render(&self, output: &mut [f32], frames: usize, ticks: u32) {
        if self.is_open() {
            self.backend.render(self.slot, output, frames, ticks);
        } else {
            output.fill(0.0);
        }
    }

    pub fn set_volume(&self, volume: i32) -> Result<()> {
        if !self.is_open() {
            return Err(Error::SessionClosed);
        }
        self.backend.set_volume(volume);
        tracing::debug!(volume, "backend volume set");
        Ok(())
    }
}

impl<B: SynthBackend> Drop for BackendSession<B> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<B: SynthBackend> std::fmt::Debug for BackendSession<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendSession")
            .field("slot", &self.slot)
            .field("open", &self.is_open())
            .finish()
    }
}

/// Slot lock held for one batch of events.
///
/// Dropping the batch resets event timing to [`EventTime::Immediate`] and
/// unlocks the slot.
pub struct EventBatch<'a, B: SynthBackend> {
    session: &'a BackendSession<B>,
}

impl<'a, B: SynthBackend> EventBatch<'a, B> {
    fn new(session: &'a BackendSession<B>) -> Self {
        session.backend.lock_slot(session.slot);
        Self { session }
    }

    /// Stamp subsequent sends with `ticks`.
    #[inline]
    pub fn at(&self, ticks: u32) {
        self.session
            .backend
            .set_event_time(self.session.slot, EventTime::At(ticks));
    }

    #[inline]
    pub fn send(&self, event: &BackendEvent) {
        self.session.backend.send_event(self.session.slot, event);
    }
}

impl<B: SynthBackend> Drop for EventBatch<'_, B> {
    fn drop(&mut self) {
        let backend = &self.session.backend;
        backend.set_event_time(self.session.slot, EventTime::Immediate);
        backend.unlock_slot(self.session.slot);
    }
}
