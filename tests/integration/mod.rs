//! Integration test modules for PulseBridge
//!
//! - engine: build, configuration, lifecycle
//! - transport: start/stop, tempo and latency handling
//! - scheduling: backend events produced while playing
//! - metronome: click output mixed into the buffer

pub mod metronome;
pub mod transport;
