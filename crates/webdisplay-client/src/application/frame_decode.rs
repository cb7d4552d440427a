//! Asynchronous frame decoding seam.
//!
//! Decoding a PNG is the only step of the paint pipeline that takes real CPU
//! time, so the session never does it inline.  The connection loop hands each
//! [`FrameUpdate`] to a [`FrameDecoder`] on its own task and paints the
//! [`DecodedFrame`] when that task finishes.  Tasks finish in whatever order
//! they finish; a later update for the same region simply overwrites an older
//! one.

use async_trait::async_trait;
use image::RgbaImage;
use thiserror::Error;
use webdisplay_core::{DirtyRect, FrameUpdate};

/// Why a frame could not be turned into pixels.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload is not a valid image of the supported format.
    #[error("failed to decode image for {rect}: {reason}")]
    Image { rect: DirtyRect, reason: String },

    /// The decode task panicked or was aborted.
    #[error("decode task failed: {0}")]
    TaskFailed(String),
}

/// A frame whose payload has been decoded to RGBA pixels.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    /// Destination rectangle from the frame header.
    pub rect: DirtyRect,
    /// Decoded pixels, at whatever size the payload was encoded.
    pub image: RgbaImage,
}

/// Decodes frame payloads into pixels.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FrameDecoder: Send + Sync {
    /// Decodes one frame.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the payload cannot be decoded.  The caller
    /// drops the frame and keeps the session running.
    async fn decode(&self, frame: FrameUpdate) -> Result<DecodedFrame, DecodeError>;
}
