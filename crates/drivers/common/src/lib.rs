//! Driver implementations that do not touch the OS.

pub mod recording;

pub use recording::{RecordingBackend, RecordingConfig};
