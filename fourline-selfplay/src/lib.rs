//! FOURLINE Selfplay - training-data generation through engine-vs-engine play
//!
//! This crate drives two MCTS searches against each other and captures one
//! training record per move decision, plus the stream reader/writer for
//! the on-disk record format.

pub mod recorder;
pub mod stream;

// Re-exports
pub use recorder::{GameOutcome, SelfPlayConfig, SelfPlayRecorder};
pub use stream::{append_records, read_records};
