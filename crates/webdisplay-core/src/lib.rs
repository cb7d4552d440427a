//! # webdisplay-core
//!
//! Shared library for the web display client containing the wire protocol
//! codec and the input-handling domain logic.
//!
//! It has zero dependencies on OS APIs, async runtimes, or network sockets.
//!
//! # Architecture overview (for beginners)
//!
//! A *web display* is a remote framebuffer: a display host renders an
//! application into an off-screen buffer and streams the regions that change
//! ("dirty rectangles") to a viewer as PNG images.  The viewer paints each
//! region onto its canvas and sends pointer and keyboard events back as short
//! text commands.
//!
//! This crate (`webdisplay-core`) is the shared foundation.  It defines:
//!
//! - **`protocol`** – How bytes travel over the socket.  Inbound frame
//!   updates are a 16-byte dirty-rectangle header followed by an image;
//!   outbound commands are space-separated text such as `MOUSEDOWN 200 200`.
//!
//! - **`domain`** – Pure input logic with no I/O.  Coordinate translation from
//!   the viewport into canvas pixels, and the two-state pointer capture
//!   machine that decides which pointer events become commands.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `webdisplay_core::DirtyRect` instead of `webdisplay_core::protocol::messages::DirtyRect`.
pub use domain::geometry::{BoundingBox, CanvasGeometry, CanvasPoint, ViewportPoint};
pub use domain::input::{
    KeyEvent, KeyEventKind, PointerCapture, PointerEvent, PointerEventKind, PointerState,
};
pub use protocol::codec::{decode_frame, encode_frame, ProtocolError};
pub use protocol::messages::{DirtyRect, FrameUpdate, InputCommand};
