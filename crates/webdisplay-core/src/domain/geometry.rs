//! Viewport-to-canvas coordinate translation.
//!
//! A canvas has two sizes: its *logical* resolution (the pixel grid the
//! display host renders into) and its *displayed* size (how large the element
//! is drawn on screen, e.g. after CSS scaling).  Pointer events arrive in
//! viewport coordinates, so translating them takes two steps:
//!
//! 1. Subtract the top-left corner of the canvas bounding box.
//! 2. Scale by `logical / displayed` on each axis.
//!
//! The result is truncated toward zero.

use serde::{Deserialize, Serialize};

/// A point in viewport coordinates (fractional, as delivered by pointer events).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportPoint {
    pub x: f64,
    pub y: f64,
}

impl ViewportPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanvasPoint {
    pub x: i32,
    pub y: i32,
}

/// Where the canvas element sits in the viewport and how large it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Everything needed to translate a viewport point onto a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasGeometry {
    /// Logical resolution, width in pixels.
    pub logical_width: u32,
    /// Logical resolution, height in pixels.
    pub logical_height: u32,
    /// Displayed bounding box in viewport coordinates.
    pub bbox: BoundingBox,
}

impl CanvasGeometry {
    /// Geometry for a canvas displayed at its logical size with its top-left
    /// corner at the viewport origin.
    pub fn unscaled(width: u32, height: u32) -> Self {
        Self {
            logical_width: width,
            logical_height: height,
            bbox: BoundingBox {
                left: 0.0,
                top: 0.0,
                width: f64::from(width),
                height: f64::from(height),
            },
        }
    }

    /// Horizontal scale factor (`logical / displayed`).
    ///
    /// A collapsed element (zero or negative displayed width) scales by 1.
    pub fn scale_x(&self) -> f64 {
        axis_scale(self.logical_width, self.bbox.width)
    }

    /// Vertical scale factor (`logical / displayed`).
    pub fn scale_y(&self) -> f64 {
        axis_scale(self.logical_height, self.bbox.height)
    }

    /// Translates a viewport point into canvas pixels.
    ///
    /// ```rust
    /// use webdisplay_core::{BoundingBox, CanvasGeometry, CanvasPoint, ViewportPoint};
    ///
    /// let geometry = CanvasGeometry {
    ///     logical_width: 800,
    ///     logical_height: 600,
    ///     bbox: BoundingBox { left: 10.0, top: 10.0, width: 400.0, height: 300.0 },
    /// };
    /// let p = geometry.to_canvas(ViewportPoint::new(110.0, 110.0));
    /// assert_eq!(p, CanvasPoint { x: 200, y: 200 });
    /// ```
    pub fn to_canvas(&self, point: ViewportPoint) -> CanvasPoint {
        let x = (point.x - self.bbox.left) * self.scale_x();
        let y = (point.y - self.bbox.top) * self.scale_y();
        // `as` truncates toward zero and saturates at the i32 range.
        CanvasPoint {
            x: x as i32,
            y: y as i32,
        }
    }
}

fn axis_scale(logical: u32, displayed: f64) -> f64 {
    if displayed > 0.0 {
        f64::from(logical) / displayed
    } else {
        1.0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
