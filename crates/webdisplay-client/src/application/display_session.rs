//! The display session: one socket, one canvas, one pointer.
//!
//! [`DisplaySession`] holds every piece of mutable state a viewer has and
//! exposes one method per event the outside world can deliver:
//!
//! | Event                    | Method                          |
//! |--------------------------|---------------------------------|
//! | initialisation           | [`DisplaySession::attach`]      |
//! | socket open              | [`DisplaySession::on_open`]     |
//! | socket message           | [`DisplaySession::on_message`]  |
//! | image decode finished    | [`DisplaySession::paint`]       |
//! | image decode failed      | [`DisplaySession::on_decode_failed`] |
//! | local pointer / key      | [`DisplaySession::on_input`]    |
//! | command written          | [`DisplaySession::on_command_sent`] |
//! | socket close             | [`DisplaySession::on_close`]    |
//!
//! The session performs no I/O.  The infrastructure connection loop owns the
//! socket, calls these methods from a single task, and sends whatever
//! commands they return.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;
use webdisplay_core::{
    decode_frame, FrameUpdate, InputCommand, KeyEvent, PointerCapture, PointerEvent, PointerState,
};

use crate::application::display_host::{Canvas, DisplayHost, DrawingContext};
use crate::application::frame_decode::{DecodeError, DecodedFrame};
use crate::domain::config::SessionConfig;
use crate::domain::snapshot::{SessionSnapshot, SessionStatus};

// ── Error type ────────────────────────────────────────────────────────────────

/// Failures a session reports to its embedder.
///
/// None of these end the session on their own.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    /// No canvas with the configured id exists.
    #[error("canvas {0:?} not found")]
    CanvasNotFound(String),

    /// The canvas exists but cannot provide a 2D drawing context.
    #[error("canvas {0:?} has no 2D drawing context")]
    NoDrawingContext(String),

    /// Input arrived before [`DisplaySession::attach`] succeeded.
    #[error("session is not attached to a canvas")]
    NotAttached,

    /// A command was produced while the socket was not open.  It is dropped,
    /// not queued.
    #[error("session is not connected; refused to send {0}")]
    NotConnected(InputCommand),
}

// ── Events ────────────────────────────────────────────────────────────────────

/// A socket message, independent of the WebSocket library in use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    Binary(Vec<u8>),
    Text(String),
}

/// A local input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocalInput {
    Pointer(PointerEvent),
    Key(KeyEvent),
}

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    frames_received: u64,
    frames_painted: u64,
    frames_dropped: u64,
    commands_sent: u64,
    commands_rejected: u64,
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Client-side state for one connection to a display host.
pub struct DisplaySession {
    id: Uuid,
    config: SessionConfig,
    status: SessionStatus,
    canvas: Option<Arc<dyn Canvas>>,
    context: Option<Box<dyn DrawingContext>>,
    pointer: PointerCapture,
    counters: Counters,
}

impl DisplaySession {
    /// Creates a detached session.  Nothing is looked up or opened yet.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            status: SessionStatus::Detached,
            canvas: None,
            context: None,
            pointer: PointerCapture::new(),
            counters: Counters::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Returns `true` between [`on_open`](Self::on_open) and
    /// [`on_close`](Self::on_close).
    pub fn is_connected(&self) -> bool {
        self.status == SessionStatus::Connected
    }

    pub fn pointer_state(&self) -> PointerState {
        self.pointer.state()
    }

    /// Acquires the configured canvas and its 2D drawing context.
    ///
    /// Must succeed before the socket is opened.
    ///
    /// # Errors
    ///
    /// - [`SessionError::CanvasNotFound`] if `host` has no such canvas.
    /// - [`SessionError::NoDrawingContext`] if the canvas refuses a context.
    ///
    /// The session stays detached on error.
    pub fn attach(&mut self, host: &dyn DisplayHost) -> Result<(), SessionError> {
        let canvas_id = &self.config.canvas_id;
        let canvas = host
            .find_canvas(canvas_id)
            .ok_or_else(|| SessionError::CanvasNotFound(canvas_id.clone()))?;
        let context = canvas
            .context_2d()
            .ok_or_else(|| SessionError::NoDrawingContext(canvas_id.clone()))?;

        self.canvas = Some(canvas);
        self.context = Some(context);
        self.status = SessionStatus::Attached;
        info!("session {}: attached to canvas {canvas_id:?}", self.id);
        Ok(())
    }

    /// Socket opened.
    pub fn on_open(&mut self) {
        info!("session {}: connected to {}", self.id, self.config.ws_url());
        self.status = SessionStatus::Connected;
    }

    /// Socket closed, by the peer or by a network failure.
    ///
    /// Terminal.  The pointer state is left as is: a press that was active
    /// when the socket closed stays active, and no release is sent.
    pub fn on_close(&mut self) {
        if self.status != SessionStatus::Disconnected {
            info!("session {}: disconnected", self.id);
        }
        self.status = SessionStatus::Disconnected;
    }

    /// Handles one inbound socket message.
    ///
    /// Returns the frame update to decode, or `None` if the message was
    /// logged and dropped (text message, short buffer, bad rectangle, empty
    /// payload).
    pub fn on_message(&mut self, message: InboundMessage) -> Option<FrameUpdate> {
        match message {
            InboundMessage::Binary(bytes) => match decode_frame(&bytes) {
                Ok(frame) => {
                    self.counters.frames_received += 1;
                    debug!(
                        "session {}: frame update {} ({} payload bytes)",
                        self.id,
                        frame.rect,
                        frame.payload.len()
                    );
                    Some(frame)
                }
                Err(e) => {
                    self.counters.frames_dropped += 1;
                    warn!("session {}: dropping malformed frame: {e}", self.id);
                    None
                }
            },
            InboundMessage::Text(text) => {
                self.counters.frames_dropped += 1;
                info!("session {}: got unknown data: {text}", self.id);
                None
            }
        }
    }

    /// Draws a decoded frame at its rectangle, scaled to the rectangle's size.
    ///
    /// Paints are accepted after the socket has closed so that decodes that
    /// were in flight still land on the canvas.
    pub fn paint(&mut self, frame: DecodedFrame) {
        match self.context.as_mut() {
            Some(context) => {
                context.draw_image(&frame.image, frame.rect);
                self.counters.frames_painted += 1;
                debug!("session {}: painted {}", self.id, frame.rect);
            }
            None => {
                self.counters.frames_dropped += 1;
                warn!(
                    "session {}: no drawing context; dropping frame {}",
                    self.id, frame.rect
                );
            }
        }
    }

    /// Records a failed decode.  The canvas is left untouched.
    pub fn on_decode_failed(&mut self, error: DecodeError) {
        self.counters.frames_dropped += 1;
        warn!("session {}: dropping frame: {error}", self.id);
    }

    /// Handles one local input event.
    ///
    /// Returns the command to send, or `Ok(None)` when the event produces
    /// nothing (a move with no active press).  The caller reports a
    /// successful write with [`on_command_sent`](Self::on_command_sent).
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotAttached`] for pointer input before `attach`.
    /// - [`SessionError::NotConnected`] when a command was produced but the
    ///   socket is not open.  Pointer state still changes in that case.
    pub fn on_input(&mut self, input: LocalInput) -> Result<Option<InputCommand>, SessionError> {
        let command = match input {
            LocalInput::Pointer(event) => {
                let canvas = self.canvas.as_ref().ok_or(SessionError::NotAttached)?;
                let geometry = canvas.geometry();
                match self.pointer.handle(&geometry, event) {
                    Some(command) => command,
                    None => return Ok(None),
                }
            }
            LocalInput::Key(event) => event.to_command(),
        };

        if !self.is_connected() {
            self.counters.commands_rejected += 1;
            return Err(SessionError::NotConnected(command));
        }

        Ok(Some(command))
    }

    /// Records that `command` was written to the socket.
    pub fn on_command_sent(&mut self, command: &InputCommand) {
        self.counters.commands_sent += 1;
        debug!("session {}: sent {command}", self.id);
    }

    /// Point-in-time summary of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            url: self.config.ws_url(),
            status: self.status,
            pointer: self.pointer.state(),
            frames_received: self.counters.frames_received,
            frames_painted: self.counters.frames_painted,
            frames_dropped: self.counters.frames_dropped,
            commands_sent: self.counters.commands_sent,
            commands_rejected: self.counters.commands_rejected,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
