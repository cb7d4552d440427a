//! Recording display host for tests.
//!
//! [`RecordingCanvas`] stores every `draw_image` call instead of touching
//! pixels, so assertions can check exactly where a session painted and with
//! what source size.  Its geometry can be changed between events to simulate
//! an element that moves or resizes.
//!
//! ```ignore
//! let canvas = Arc::new(RecordingCanvas::new(CanvasGeometry::unscaled(800, 600)));
//! let host = RecordingHost::new().with_canvas("webdisplay", Arc::clone(&canvas));
//!
//! session.attach(&host)?;
//! session.paint(decoded);
//!
//! assert_eq!(canvas.draws()[0].dest, DirtyRect::new(0, 0, 100, 50));
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use image::RgbaImage;
use webdisplay_core::{CanvasGeometry, DirtyRect};

use crate::application::display_host::{Canvas, DisplayHost, DrawingContext};

/// One recorded `draw_image` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub dest: DirtyRect,
    /// Width and height of the source image.
    pub image_size: (u32, u32),
}

/// Host holding recording canvases.
#[derive(Default)]
pub struct RecordingHost {
    canvases: HashMap<String, Arc<RecordingCanvas>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvas(mut self, id: impl Into<String>, canvas: Arc<RecordingCanvas>) -> Self {
        self.canvases.insert(id.into(), canvas);
        self
    }
}

impl DisplayHost for RecordingHost {
    fn find_canvas(&self, canvas_id: &str) -> Option<Arc<dyn Canvas>> {
        self.canvases
            .get(canvas_id)
            .map(|canvas| Arc::clone(canvas) as Arc<dyn Canvas>)
    }
}

/// Canvas that records draws.
pub struct RecordingCanvas {
    geometry: Mutex<CanvasGeometry>,
    draws: Arc<Mutex<Vec<DrawCall>>>,
    has_context: bool,
}

impl RecordingCanvas {
    pub fn new(geometry: CanvasGeometry) -> Self {
        Self {
            geometry: Mutex::new(geometry),
            draws: Arc::new(Mutex::new(Vec::new())),
            has_context: true,
        }
    }

    /// Makes `context_2d` return `None`.
    pub fn without_context(mut self) -> Self {
        self.has_context = false;
        self
    }

    pub fn set_geometry(&self, geometry: CanvasGeometry) {
        *self.geometry.lock().unwrap_or_else(PoisonError::into_inner) = geometry;
    }

    /// All draws so far, in call order.
    pub fn draws(&self) -> Vec<DrawCall> {
        self.draws
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Canvas for RecordingCanvas {
    fn geometry(&self) -> CanvasGeometry {
        *self.geometry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn context_2d(&self) -> Option<Box<dyn DrawingContext>> {
        if !self.has_context {
            return None;
        }
        Some(Box::new(RecordingContext {
            draws: Arc::clone(&self.draws),
        }))
    }
}

struct RecordingContext {
    draws: Arc<Mutex<Vec<DrawCall>>>,
}

impl DrawingContext for RecordingContext {
    fn draw_image(&mut self, image: &RgbaImage, dest: DirtyRect) {
        self.draws
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(DrawCall {
                dest,
                image_size: image.dimensions(),
            });
    }
}
