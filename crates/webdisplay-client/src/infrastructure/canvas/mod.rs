//! In-memory framebuffer canvas.
//!
//! [`FramebufferCanvas`] is the display surface the binary paints into.  It
//! owns an RGBA pixel buffer at the canvas's logical resolution and a
//! bounding box describing where (and how large) the canvas is shown on
//! screen.  When the two sizes differ, pointer coordinates are scaled exactly
//! as they would be for a CSS-scaled `<canvas>` element.
//!
//! Drawing follows 2D-canvas `drawImage(img, x, y, w, h)` semantics: the
//! source image is resized to the destination rectangle and composited
//! source-over.  Pixels that fall outside the buffer are clipped.

pub mod mock;

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tracing::trace;
use webdisplay_core::{BoundingBox, CanvasGeometry, DirtyRect};

use crate::application::display_host::{Canvas, DisplayHost, DrawingContext};

// ── Host ──────────────────────────────────────────────────────────────────────

/// A set of canvases addressable by id.
#[derive(Default)]
pub struct FramebufferHost {
    canvases: HashMap<String, Arc<FramebufferCanvas>>,
}

impl FramebufferHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `canvas` under `id`, replacing any previous canvas with that id.
    pub fn with_canvas(mut self, id: impl Into<String>, canvas: Arc<FramebufferCanvas>) -> Self {
        self.canvases.insert(id.into(), canvas);
        self
    }
}

impl DisplayHost for FramebufferHost {
    fn find_canvas(&self, canvas_id: &str) -> Option<Arc<dyn Canvas>> {
        self.canvases
            .get(canvas_id)
            .map(|canvas| Arc::clone(canvas) as Arc<dyn Canvas>)
    }
}

// ── Canvas ────────────────────────────────────────────────────────────────────

/// A canvas backed by an RGBA buffer.
pub struct FramebufferCanvas {
    pixels: Arc<Mutex<RgbaImage>>,
    bbox: Mutex<BoundingBox>,
}

impl FramebufferCanvas {
    /// Creates a transparent canvas displayed unscaled at the viewport origin.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: Arc::new(Mutex::new(RgbaImage::new(width, height))),
            bbox: Mutex::new(CanvasGeometry::unscaled(width, height).bbox),
        }
    }

    /// Sets where the canvas is displayed.
    pub fn with_bounding_box(self, bbox: BoundingBox) -> Self {
        self.set_bounding_box(bbox);
        self
    }

    /// Moves or resizes the displayed canvas.
    pub fn set_bounding_box(&self, bbox: BoundingBox) {
        *self.bbox.lock().unwrap_or_else(PoisonError::into_inner) = bbox;
    }

    /// Logical resolution in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .dimensions()
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        let pixels = self.pixels.lock().unwrap_or_else(PoisonError::into_inner);
        pixels.get_pixel_checked(x, y).copied()
    }

    /// Writes the current framebuffer to `path` as a PNG file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or encoding fails.
    pub fn save_png(&self, path: &Path) -> anyhow::Result<()> {
        let pixels = self.pixels.lock().unwrap_or_else(PoisonError::into_inner);
        pixels
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("failed to save framebuffer to {}", path.display()))
    }
}

impl Canvas for FramebufferCanvas {
    fn geometry(&self) -> CanvasGeometry {
        let (logical_width, logical_height) = self.dimensions();
        CanvasGeometry {
            logical_width,
            logical_height,
            bbox: *self.bbox.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    fn context_2d(&self) -> Option<Box<dyn DrawingContext>> {
        Some(Box::new(FramebufferContext {
            pixels: Arc::clone(&self.pixels),
        }))
    }
}

// ── Drawing context ───────────────────────────────────────────────────────────

/// 2D drawing context sharing the canvas's pixel buffer.
pub struct FramebufferContext {
    pixels: Arc<Mutex<RgbaImage>>,
}

impl DrawingContext for FramebufferContext {
    fn draw_image(&mut self, image: &RgbaImage, dest: DirtyRect) {
        if dest.is_empty() || image.width() == 0 || image.height() == 0 {
            trace!("skipping zero-area draw at {dest}");
            return;
        }

        let mut target = self.pixels.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(visible) = clip_to_buffer(dest, target.width(), target.height()) else {
            trace!("skipping off-canvas draw at {dest}");
            return;
        };

        // Only the part of the source that lands inside the buffer is
        // resized, so the scratch buffer never exceeds the canvas size.
        let (src_x, src_w) = source_span(
            visible.left - dest.left,
            visible.right - dest.left,
            dest.width(),
            image.width(),
        );
        let (src_y, src_h) = source_span(
            visible.top - dest.top,
            visible.bottom - dest.top,
            dest.height(),
            image.height(),
        );
        let region = imageops::crop_imm(image, src_x, src_y, src_w, src_h).to_image();
        let (x, y) = (i64::from(visible.left), i64::from(visible.top));

        if region.dimensions() == (visible.width(), visible.height()) {
            imageops::overlay(&mut *target, &region, x, y);
        } else {
            let scaled = imageops::resize(
                &region,
                visible.width(),
                visible.height(),
                FilterType::Triangle,
            );
            imageops::overlay(&mut *target, &scaled, x, y);
        }
    }
}

/// Intersects `dest` with a `width` x `height` buffer anchored at the origin.
fn clip_to_buffer(dest: DirtyRect, width: u32, height: u32) -> Option<DirtyRect> {
    let visible = DirtyRect::new(
        dest.left.min(width),
        dest.top.min(height),
        dest.right.min(width),
        dest.bottom.min(height),
    );
    (!visible.is_empty()).then_some(visible)
}

/// Maps the destination span `[start, end)` (relative to the rectangle's
/// origin, `dest_len` long) onto a source axis of `src_len` pixels.
///
/// Returns `(offset, len)` with `len >= 1`, rounded outwards.
fn source_span(start: u32, end: u32, dest_len: u32, src_len: u32) -> (u32, u32) {
    let (dest_len, src_len) = (u64::from(dest_len), u64::from(src_len));
    let first = (u64::from(start) * src_len / dest_len).min(src_len - 1);
    let last = (u64::from(end) * src_len).div_ceil(dest_len).clamp(first + 1, src_len);
    // Both values are bounded by `src_len`, which came from a u32.
    (first as u32, (last - first) as u32)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    #[test]
    fn test_new_canvas_is_unscaled_at_origin() {
        let canvas = FramebufferCanvas::new(800, 600);
        assert_eq!(canvas.geometry(), CanvasGeometry::unscaled(800, 600));
    }

    #[test]
    fn test_geometry_follows_bounding_box_changes() {
        // Arrange
        let canvas = FramebufferCanvas::new(800, 600);
        let bbox = BoundingBox {
            left: 10.0,
            top: 10.0,
            width: 400.0,
            height: 300.0,
        };

        // Act
        canvas.set_bounding_box(bbox);

        // Assert
        let geometry = canvas.geometry();
        assert_eq!(geometry.bbox, bbox);
        assert_eq!((geometry.logical_width, geometry.logical_height), (800, 600));
    }

    #[test]
    fn test_draw_same_size_image_at_offset() {
        // Arrange
        let canvas = FramebufferCanvas::new(10, 10);
        let mut ctx = canvas.context_2d().unwrap();
        let img = RgbaImage::from_pixel(2, 2, RED);

        // Act
        ctx.draw_image(&img, DirtyRect::new(3, 4, 5, 6));

        // Assert
        assert_eq!(canvas.pixel(3, 4), Some(RED));
        assert_eq!(canvas.pixel(4, 5), Some(RED));
        assert_eq!(canvas.pixel(2, 4), Some(CLEAR));
        assert_eq!(canvas.pixel(5, 6), Some(CLEAR));
    }

    #[test]
    fn test_draw_scales_image_to_destination() {
        // A single pixel stretched over a 4x3 destination fills all of it.
        let canvas = FramebufferCanvas::new(8, 8);
        let mut ctx = canvas.context_2d().unwrap();
        let img = RgbaImage::from_pixel(1, 1, RED);

        ctx.draw_image(&img, DirtyRect::new(0, 0, 4, 3));

        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(canvas.pixel(x, y), Some(RED), "pixel ({x},{y})");
            }
        }
        assert_eq!(canvas.pixel(4, 0), Some(CLEAR));
        assert_eq!(canvas.pixel(0, 3), Some(CLEAR));
    }

    #[test]
    fn test_draw_clips_at_buffer_edge() {
        let canvas = FramebufferCanvas::new(4, 4);
        let mut ctx = canvas.context_2d().unwrap();
        let img = RgbaImage::from_pixel(4, 4, RED);

        ctx.draw_image(&img, DirtyRect::new(2, 2, 6, 6));

        assert_eq!(canvas.pixel(3, 3), Some(RED));
        assert_eq!(canvas.pixel(1, 1), Some(CLEAR));
    }

    #[test]
    fn test_oversized_rectangle_is_clipped_without_huge_allocation() {
        // Arrange: a rectangle billions of pixels wide over an 8x8 buffer.
        let canvas = FramebufferCanvas::new(8, 8);
        let mut ctx = canvas.context_2d().unwrap();
        let img = RgbaImage::from_pixel(1, 1, RED);

        // Act
        ctx.draw_image(&img, DirtyRect::new(0, 0, u32::MAX, u32::MAX));

        // Assert: the visible part is painted, nothing aborts.
        assert_eq!(canvas.pixel(0, 0), Some(RED));
        assert_eq!(canvas.pixel(7, 7), Some(RED));
    }

    #[test]
    fn test_partially_visible_scaled_draw_uses_matching_source_region() {
        // A red|blue 2x1 image stretched over 16x8: only the red half is on
        // an 8x8 canvas.
        let canvas = FramebufferCanvas::new(8, 8);
        let mut ctx = canvas.context_2d().unwrap();
        let mut img = RgbaImage::from_pixel(2, 1, RED);
        img.put_pixel(1, 0, Rgba([0, 0, 255, 255]));

        ctx.draw_image(&img, DirtyRect::new(0, 0, 16, 8));

        assert_eq!(canvas.pixel(0, 0), Some(RED));
        assert_eq!(canvas.pixel(7, 7), Some(RED));
    }

    #[test]
    fn test_off_canvas_draw_is_skipped() {
        let canvas = FramebufferCanvas::new(4, 4);
        let mut ctx = canvas.context_2d().unwrap();
        let img = RgbaImage::from_pixel(2, 2, RED);

        ctx.draw_image(&img, DirtyRect::new(100, 100, 200, 200));

        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(canvas.pixel(x, y), Some(CLEAR));
            }
        }
    }

    #[test]
    fn test_source_span_maps_visible_part_proportionally() {
        // Unclipped: whole source.
        assert_eq!(source_span(0, 100, 100, 50), (0, 50));
        // Right half of a 2x upscale.
        assert_eq!(source_span(50, 100, 100, 50), (25, 25));
        // Tiny visible slice of a huge rectangle still takes one pixel.
        assert_eq!(source_span(0, 8, u32::MAX, 1), (0, 1));
    }

    #[test]
    fn test_zero_area_draw_is_skipped() {
        let canvas = FramebufferCanvas::new(4, 4);
        let mut ctx = canvas.context_2d().unwrap();
        let img = RgbaImage::from_pixel(1, 1, RED);

        ctx.draw_image(&img, DirtyRect::new(1, 1, 1, 3));

        assert_eq!(canvas.pixel(1, 1), Some(CLEAR));
    }

    #[test]
    fn test_host_finds_registered_canvas_only() {
        let host = FramebufferHost::new().with_canvas("screen", Arc::new(FramebufferCanvas::new(2, 2)));

        assert!(host.find_canvas("screen").is_some());
        assert!(host.find_canvas("other").is_none());
    }

    #[test]
    fn test_save_png_writes_readable_file() {
        // Arrange
        let canvas = FramebufferCanvas::new(3, 2);
        canvas
            .context_2d()
            .unwrap()
            .draw_image(&RgbaImage::from_pixel(3, 2, RED), DirtyRect::new(0, 0, 3, 2));
        let path = std::env::temp_dir().join(format!("webdisplay-{}.png", uuid::Uuid::new_v4()));

        // Act
        canvas.save_png(&path).unwrap();

        // Assert
        let reloaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(reloaded.dimensions(), (3, 2));
        assert_eq!(reloaded.get_pixel(2, 1), &RED);
        std::fs::remove_file(&path).ok();
    }
}
