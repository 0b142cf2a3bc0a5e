//! Link module - wire protocol and serve loop
//!
//! Frame codec, command dispatch, and the synchronous serial server.
//! This is the only part of the crate that knows about bytes on a wire.

pub mod dispatcher;
pub mod frame;
pub mod server;

// Re-export the protocol surface
pub use dispatcher::Dispatcher;
pub use frame::{Command, CommandFrame, OutFrame, Reply};
pub use server::{open_serial, serve, StdioLink};
