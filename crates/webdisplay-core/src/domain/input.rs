//! Local input events and the pointer capture state machine.
//!
//! # Pointer capture
//!
//! ```text
//!            down (emit MOUSEDOWN)
//!   ┌──────┐ ───────────────────▶ ┌─────────┐
//!   │ Idle │                      │ Pressed │ ◀── move (emit MOUSEMOVE)
//!   └──────┘ ◀─────────────────── └─────────┘
//!    ▲    │    up (emit MOUSEUP)
//!    └────┘
//!     move (nothing)
//! ```
//!
//! Down and up always emit, whatever the current state.  There is no terminal
//! state, and nothing but a pointer-up returns the machine to idle; losing the
//! connection leaves it where it is.

use serde::{Deserialize, Serialize};

use crate::domain::geometry::{CanvasGeometry, ViewportPoint};
use crate::protocol::messages::InputCommand;

// ── Pointer events ────────────────────────────────────────────────────────────

/// The three pointer event kinds the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerEventKind {
    Down,
    Up,
    Move,
}

/// A pointer event as delivered by the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    /// Position in viewport coordinates.
    pub position: ViewportPoint,
}

impl PointerEvent {
    pub fn down(x: f64, y: f64) -> Self {
        Self {
            kind: PointerEventKind::Down,
            position: ViewportPoint::new(x, y),
        }
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self {
            kind: PointerEventKind::Up,
            position: ViewportPoint::new(x, y),
        }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self {
            kind: PointerEventKind::Move,
            position: ViewportPoint::new(x, y),
        }
    }
}

/// Whether the primary pointer button is currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointerState {
    #[default]
    Idle,
    Pressed,
}

/// Turns pointer events into pointer commands.
#[derive(Debug, Clone, Default)]
pub struct PointerCapture {
    state: PointerState,
}

impl PointerCapture {
    /// Creates a capture in the [`PointerState::Idle`] state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> PointerState {
        self.state
    }

    /// Returns `true` while a press is active.
    pub fn is_pressed(&self) -> bool {
        self.state == PointerState::Pressed
    }

    /// Applies one pointer event and returns the command to send, if any.
    ///
    /// Moves in the idle state return `None`; every other event returns a
    /// command carrying the translated canvas coordinates.
    pub fn handle(&mut self, geometry: &CanvasGeometry, event: PointerEvent) -> Option<InputCommand> {
        match event.kind {
            PointerEventKind::Down => {
                self.state = PointerState::Pressed;
                let p = geometry.to_canvas(event.position);
                Some(InputCommand::Press { x: p.x, y: p.y })
            }
            PointerEventKind::Up => {
                self.state = PointerState::Idle;
                let p = geometry.to_canvas(event.position);
                Some(InputCommand::Release { x: p.x, y: p.y })
            }
            PointerEventKind::Move => {
                if !self.is_pressed() {
                    return None;
                }
                let p = geometry.to_canvas(event.position);
                Some(InputCommand::Move { x: p.x, y: p.y })
            }
        }
    }
}

// ── Keyboard events ───────────────────────────────────────────────────────────

/// Key pressed or released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyEventKind {
    Down,
    Up,
}

/// A keyboard event carrying the host's key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    pub code: i32,
}

impl KeyEvent {
    /// Key events are forwarded unconditionally.
    pub fn to_command(self) -> InputCommand {
        match self.kind {
            KeyEventKind::Down => InputCommand::KeyDown { code: self.code },
            KeyEventKind::Up => InputCommand::KeyUp { code: self.code },
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
