//! Domain layer: pure input-handling logic with no I/O dependencies.
//!
//! - [`geometry`] maps viewport coordinates onto canvas pixels.
//! - [`input`] holds the pointer capture state machine and keyboard events.

pub mod geometry;
pub mod input;
