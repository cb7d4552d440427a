//! webdisplay-client library crate.
//!
//! A viewer for the web display protocol: it connects to a display host over
//! WebSocket, paints the dirty-rectangle updates it receives onto a canvas,
//! and forwards local pointer and keyboard input back as text commands.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Display host (binary frames ↓, text commands ↑ over WebSocket)
//!         ↕
//! [webdisplay-client]
//!   ├── domain/           SessionConfig, SessionSnapshot
//!   ├── application/      DisplaySession state, host-surface and decoder traits
//!   └── infrastructure/
//!         ├── connection/ WebSocket event loop (tokio-tungstenite)
//!         ├── decoder/    PNG frame decoder (image)
//!         ├── canvas/     In-memory framebuffer canvas + test doubles
//!         └── input_script/ Line-based local input source
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain`, `webdisplay-core` and the `image`
//!   pixel buffer type only; the seams to the outside world are traits
//!   (`DisplayHost`, `FrameDecoder`).
//! - `infrastructure` implements those traits and owns every socket.

/// Domain layer: configuration and snapshot types (no I/O).
pub mod domain;

/// Application layer: the display session and its collaborator traits.
pub mod application;

/// Infrastructure layer: socket loop, decoder, canvases, input source.
pub mod infrastructure;
