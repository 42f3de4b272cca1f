//! Control-to-audio state handoff.

mod buffer;

pub use buffer::{ControlRequest, ControlStateBuffer, EngineSnapshot};
