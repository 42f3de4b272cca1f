//! Transport state published by the audio thread.

use crate::lockfree::{AtomicDouble, AtomicFlag};

/// Lock-free view of the reconciler's last callback.
#[derive(Debug, Default)]
pub struct TransportStatus {
    playing: AtomicFlag,
    tempo: AtomicDouble,
    beat: AtomicDouble,
}

impl TransportStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Audio thread only.
    #[inline]
    pub(crate) fn publish(&self, playing: bool, tempo: f64, beat: f64) {
        self.playing.set(playing);
        self.tempo.set(tempo);
        self.beat.set(beat);
    }

    pub fn is_playing(&self) -> bool {
        self.playing.get()
    }

    pub fn tempo(&self) -> f64 {
        self.tempo.get()
    }

    /// Beat at the start of the last rendered buffer.
    pub fn beat(&self) -> f64 {
        self.beat.get()
    }
}
