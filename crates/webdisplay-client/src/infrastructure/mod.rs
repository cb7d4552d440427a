//! Infrastructure layer for the display client.
//!
//! - [`connection`]: the WebSocket session loop (`tokio-tungstenite`).
//! - [`decoder`]: PNG decoding on blocking worker threads (`image`).
//! - [`canvas`]: an in-memory framebuffer canvas, plus recording doubles.
//! - [`input_script`]: line-based local input read from stdin.

pub mod canvas;
pub mod connection;
pub mod decoder;
pub mod input_script;

pub use connection::run_session;
pub use decoder::PngFrameDecoder;
