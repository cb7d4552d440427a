//! PNG frame decoder.
//!
//! Decoding is CPU-bound, so [`PngFrameDecoder`] moves each payload onto
//! Tokio's blocking thread pool with `spawn_blocking`.  The connection loop
//! keeps multiplexing socket traffic and input while decodes run.

use async_trait::async_trait;
use image::ImageFormat;
use tracing::trace;
use webdisplay_core::FrameUpdate;

use crate::application::frame_decode::{DecodeError, DecodedFrame, FrameDecoder};

/// Decodes frame payloads as PNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngFrameDecoder;

impl PngFrameDecoder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FrameDecoder for PngFrameDecoder {
    async fn decode(&self, frame: FrameUpdate) -> Result<DecodedFrame, DecodeError> {
        tokio::task::spawn_blocking(move || decode_png(frame))
            .await
            .map_err(|e| DecodeError::TaskFailed(e.to_string()))?
    }
}

/// Decodes one frame synchronously on the calling thread.
///
/// # Errors
///
/// Returns [`DecodeError::Image`] if the payload is not a valid PNG.
pub fn decode_png(frame: FrameUpdate) -> Result<DecodedFrame, DecodeError> {
    let rect = frame.rect;
    let image = image::load_from_memory_with_format(&frame.payload, ImageFormat::Png)
        .map_err(|e| DecodeError::Image {
            rect,
            reason: e.to_string(),
        })?
        .to_rgba8();

    trace!(
        "decoded {}x{} image for {rect}",
        image.width(),
        image.height()
    );
    Ok(DecodedFrame { rect, image })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
