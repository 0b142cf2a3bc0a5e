//! Core module - pure game logic with no external dependencies
//!
//! Board rules, puzzle generation, and session lifecycle. Nothing in here
//! touches I/O or the wire format.

pub mod board;
pub mod generator;
pub mod rng;
pub mod session;

// Re-export commonly used types
pub use board::{Board, Cell};
pub use generator::{generate, placement_allowed, Puzzle};
pub use rng::SimpleRng;
pub use session::{GameSession, HintOutcome, SessionConfig, SetOutcome};
