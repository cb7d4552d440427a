//! Point-in-time view of a display session.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use webdisplay_core::PointerState;

/// Lifecycle stage of a display session.
///
/// ```text
/// Detached ──attach──▶ Attached ──open──▶ Connected ──close──▶ Disconnected
///                         └───────────────close (connect failed)──────┘
/// ```
///
/// `Disconnected` is terminal: a new session must be constructed to reconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Constructed, no canvas acquired yet.
    Detached,
    /// Canvas and drawing context acquired, socket not open yet.
    Attached,
    /// Socket open.
    Connected,
    /// Socket closed.
    Disconnected,
}

/// Serializable summary of a session, used for logging and the `--json` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub url: String,
    pub status: SessionStatus,
    pub pointer: PointerState,
    /// Binary messages that carried a well-formed frame header.
    pub frames_received: u64,
    /// Frames drawn into the context.
    pub frames_painted: u64,
    /// Inbound messages discarded: non-binary, bad header, or failed decode.
    pub frames_dropped: u64,
    /// Commands successfully written to the socket.
    pub commands_sent: u64,
    /// Commands refused because the session was not connected.
    pub commands_rejected: u64,
}
