//! Application layer for webdisplay-client.
//!
//! The application layer knows *what* a display session does with each event
//! and delegates *how* (sockets, image decoding, pixels) to the
//! infrastructure layer through traits.
//!
//! # Responsibilities
//!
//! - Tracking the session lifecycle (attached, connected, disconnected)
//! - Turning inbound binary messages into frame updates
//! - Painting decoded frames into the drawing context
//! - Turning local input into outbound commands, and refusing them while the
//!   socket is not open
//!
//! # What does NOT belong here?
//!
//! - Opening sockets or spawning tasks (infrastructure)
//! - PNG decoding (infrastructure, behind [`frame_decode::FrameDecoder`])

pub mod display_host;
pub mod display_session;
pub mod frame_decode;

pub use display_host::{Canvas, DisplayHost, DrawingContext};
pub use display_session::{DisplaySession, InboundMessage, LocalInput, SessionError};
pub use frame_decode::{DecodeError, DecodedFrame, FrameDecoder};
