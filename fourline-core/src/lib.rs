//! FOURLINE Core - Connect-Four game engine and feature codec
//!
//! This crate provides the shared foundation for the search and learning
//! crates:
//! - Board state, legal moves and four-in-a-row detection
//! - Board validation for externally supplied positions
//! - Training-record stream format and the board -> feature-row codec

pub mod board;
pub mod codec;

// Re-exports
pub use board::{GameError, GameState, COLS, CONNECT, ROWS};
pub use codec::{attribute_names, state_features, CodecError, TrainingRecord, FEATURES, PLANE};
