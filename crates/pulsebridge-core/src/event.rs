//! Beat-quantized performance events.
//!
//! Each event is a 6-field record handed to the synthesis backend on every
//! quarter-beat. The second field packs a note number in its low byte and a
//! [`TriggerPhase`] selector in the bits above it.

use serde::{Deserialize, Serialize};

/// Note value the backend interprets as "note off".
pub const NOTE_OFF: i32 = 128;

/// When follow-up (retrigger) events fire relative to the primary event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerPhase {
    /// Primary event only.
    #[default]
    None,
    /// One retrigger half a quarter-beat later (1/32 of a beat).
    ThirtySecond,
    /// Two retriggers at 2/3 and 4/3 of a quarter-beat (1/24-beat grid).
    DoubleTriplet,
    /// Unrecognized selector; never produces follow-ups.
    Unknown(i32),
}

impl TriggerPhase {
    pub fn from_bits(bits: i32) -> Self {
        match bits {
            0 => TriggerPhase::None,
            1 => TriggerPhase::ThirtySecond,
            2 => TriggerPhase::DoubleTriplet,
            other => TriggerPhase::Unknown(other),
        }
    }

    pub fn bits(self) -> i32 {
        match self {
            TriggerPhase::None => 0,
            TriggerPhase::ThirtySecond => 1,
            TriggerPhase::DoubleTriplet => 2,
            TriggerPhase::Unknown(bits) => bits,
        }
    }
}

/// One entry of the user event list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerformanceEvent {
    pub track: i32,
    /// Note in the low byte, trigger selector above it.
    pub encoded_tone: i32,
    pub velocity: i32,
    pub module: i32,
    pub extra0: i32,
    pub extra1: i32,
}

impl PerformanceEvent {
    pub fn new(track: i32, encoded_tone: i32, velocity: i32, module: i32) -> Self {
        Self {
            track,
            encoded_tone,
            velocity,
            module,
            extra0: 0,
            extra1: 0,
        }
    }

    pub fn with_extras(mut self, extra0: i32, extra1: i32) -> Self {
        self.extra0 = extra0;
        self.extra1 = extra1;
        self
    }

    /// Pack a note number and trigger phase into the encoded tone field.
    pub fn encode_tone(note: u8, phase: TriggerPhase) -> i32 {
        (phase.bits() << 8) | i32::from(note)
    }

    #[inline]
    pub fn note(&self) -> i32 {
        self.encoded_tone & 0xff
    }

    #[inline]
    pub fn trigger(&self) -> TriggerPhase {
        TriggerPhase::from_bits(self.encoded_tone >> 8)
    }

    /// Whether the low byte is a playable note (excludes "no tone" and note-off).
    #[inline]
    pub fn has_valid_note(&self) -> bool {
        let note = self.note();
        note > 0 && note < NOTE_OFF
    }
}

impl From<(i32, i32, i32, i32, i32, i32)> for PerformanceEvent {
    fn from(t: (i32, i32, i32, i32, i32, i32)) -> Self {
        Self {
            track: t.0,
            encoded_tone: t.1,
            velocity: t.2,
            module: t.3,
            extra0: t.4,
            extra1: t.5,
        }
    }
}
