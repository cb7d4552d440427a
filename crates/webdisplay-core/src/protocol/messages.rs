//! All web display protocol message types.
//!
//! There are exactly two directions and two shapes on the wire:
//!
//! - **Host → viewer**: binary frame updates ([`FrameUpdate`]): a dirty
//!   rectangle header followed by a complete PNG image.
//! - **Viewer → host**: UTF-8 text commands ([`InputCommand`]) such as
//!   `MOUSEMOVE 12 34`.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Protocol constants ────────────────────────────────────────────────────────

/// Size of the dirty-rectangle header that starts every frame update.
pub const DIRTY_RECT_HEADER_SIZE: usize = 16;

/// Command verbs understood by the display host.
pub mod verbs {
    pub const MOUSE_DOWN: &str = "MOUSEDOWN";
    pub const MOUSE_UP: &str = "MOUSEUP";
    pub const MOUSE_MOVE: &str = "MOUSEMOVE";
    pub const KEY_DOWN: &str = "KEYDOWN";
    pub const KEY_UP: &str = "KEYUP";
}

// ── Dirty rectangle ───────────────────────────────────────────────────────────

/// The region of the remote screen that changed and must be repainted.
///
/// Bounds are half-open: `right` and `bottom` are exclusive, so the region
/// covers `right - left` columns and `bottom - top` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirtyRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl DirtyRect {
    /// Creates a rectangle from its four bounds.
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Destination width in canvas pixels (`right - left`).
    ///
    /// Saturates to 0 for an inverted rectangle; the codec never produces one.
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    /// Destination height in canvas pixels (`bottom - top`).
    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Returns `true` when `right < left` or `bottom < top`.
    pub fn is_inverted(&self) -> bool {
        self.right < self.left || self.bottom < self.top
    }

    /// Returns `true` when the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

impl fmt::Display for DirtyRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

// ── Frame update ──────────────────────────────────────────────────────────────

/// One inbound binary message: a dirty rectangle plus the image covering it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameUpdate {
    /// The region to repaint.
    pub rect: DirtyRect,
    /// Encoded still image (PNG) for exactly that region.  Opaque to the codec.
    pub payload: Vec<u8>,
}

// ── Input commands ────────────────────────────────────────────────────────────

/// All outbound commands the viewer can send to the display host.
///
/// The wire representation is produced by the [`fmt::Display`] impl and parsed
/// back by the `FromStr` impl in [`crate::protocol::codec`].
///
/// ```rust
/// use webdisplay_core::InputCommand;
///
/// let cmd = InputCommand::Press { x: 200, y: 200 };
/// assert_eq!(cmd.to_string(), "MOUSEDOWN 200 200");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputCommand {
    /// Primary pointer button pressed at canvas point (x, y).
    Press { x: i32, y: i32 },
    /// Primary pointer button released at canvas point (x, y).
    Release { x: i32, y: i32 },
    /// Pointer dragged to canvas point (x, y) while pressed.
    Move { x: i32, y: i32 },
    /// Key pressed.
    KeyDown { code: i32 },
    /// Key released.
    KeyUp { code: i32 },
}

impl InputCommand {
    /// The wire verb for this command.
    pub fn verb(&self) -> &'static str {
        match self {
            InputCommand::Press { .. } => verbs::MOUSE_DOWN,
            InputCommand::Release { .. } => verbs::MOUSE_UP,
            InputCommand::Move { .. } => verbs::MOUSE_MOVE,
            InputCommand::KeyDown { .. } => verbs::KEY_DOWN,
            InputCommand::KeyUp { .. } => verbs::KEY_UP,
        }
    }

    /// Returns `true` for the three pointer verbs.
    pub fn is_pointer(&self) -> bool {
        matches!(
            self,
            InputCommand::Press { .. } | InputCommand::Release { .. } | InputCommand::Move { .. }
        )
    }
}

impl fmt::Display for InputCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputCommand::Press { x, y }
            | InputCommand::Release { x, y }
            | InputCommand::Move { x, y } => write!(f, "{} {} {}", self.verb(), x, y),
            InputCommand::KeyDown { code } | InputCommand::KeyUp { code } => {
                write!(f, "{} {}", self.verb(), code)
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
