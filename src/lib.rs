//! Sudoku over a serial link.
//!
//! The engine owns the full game state and speaks a fixed-frame binary
//! protocol: 5-byte command frames in, 6-byte status frames (or an 84-byte
//! field frame) out, each closed by an XOR checksum.
//!
//! `core` holds the board, generator, and session rules; `link` holds the
//! frame codec, dispatcher, and the synchronous serve loop.

pub mod core;
pub mod link;
pub mod logger;
pub mod types;
