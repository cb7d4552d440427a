//! Traits describing the environment a session paints into.
//!
//! A browser page would implement these with DOM lookups and a 2D canvas
//! context; the binary implements them with an in-memory framebuffer
//! (`infrastructure::canvas`), and tests use recording doubles.

use std::sync::Arc;

use image::RgbaImage;
use webdisplay_core::{CanvasGeometry, DirtyRect};

/// Looks up canvases by identifier.
pub trait DisplayHost {
    /// Returns the canvas with the given id, or `None` if there is none.
    fn find_canvas(&self, canvas_id: &str) -> Option<Arc<dyn Canvas>>;
}

/// A display element with a pixel grid and an on-screen position.
pub trait Canvas: Send + Sync {
    /// Logical resolution plus the displayed bounding box.
    ///
    /// Queried on every pointer event since the element may move or resize.
    fn geometry(&self) -> CanvasGeometry;

    /// Acquires a 2D drawing context, or `None` if the canvas cannot provide one.
    fn context_2d(&self) -> Option<Box<dyn DrawingContext>>;
}

/// A 2D drawing surface.
pub trait DrawingContext: Send {
    /// Draws `image` into `dest`, scaling it to the rectangle's size.
    fn draw_image(&mut self, image: &RgbaImage, dest: DirtyRect);
}
