//! WebSocket connection loop for one display session.
//!
//! [`run_session`] opens `ws://{host}:{port}/{app}` and then drives the
//! [`DisplaySession`] from a single task:
//!
//! ```text
//!                  ┌──────────────── tokio::select! ────────────────┐
//!  socket frame ──▶│ on_message ──▶ spawn decode ──▶ JoinSet         │
//!  decode done  ──▶│ paint / on_decode_failed                        │
//!  local input  ──▶│ on_input ──▶ send Text command                  │
//!  shutdown     ──▶│ send Close, stop                                │
//!                  └─────────────────────────────────────────────────┘
//! ```
//!
//! Because only this task touches the session, no locks guard the connected
//! flag, the pointer flag or the drawing context.  Decodes are spawned as
//! independent tasks, so paints land in completion order.  When the socket
//! closes, decodes already in flight are awaited and painted before the
//! function returns.
//!
//! There is no reconnect and no timeout on the connection attempt.  A failed
//! connection attempt is handled like an immediate close.

use std::sync::Arc;

use anyhow::ensure;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinSet};
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};
use tracing::{debug, info, warn};

use crate::application::{
    DecodeError, DecodedFrame, DisplaySession, FrameDecoder, InboundMessage, LocalInput,
    SessionError,
};
use crate::domain::{SessionSnapshot, SessionStatus};

// ── Public API ────────────────────────────────────────────────────────────────

/// Connects `session` and runs it until the socket closes or `shutdown` is
/// set to `true`.
///
/// `inputs` carries local pointer and key events.  When its sender is
/// dropped the session keeps running and only listens to the socket.
///
/// Returns the final [`SessionSnapshot`].  The session status is always
/// [`SessionStatus::Disconnected`] on return.
///
/// # Errors
///
/// Returns an error if `session` has not been attached to a canvas.
/// Network failures are not errors; they end the session normally.
pub async fn run_session(
    mut session: DisplaySession,
    decoder: Arc<dyn FrameDecoder>,
    mut inputs: mpsc::Receiver<LocalInput>,
    mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<SessionSnapshot> {
    ensure!(
        session.status() == SessionStatus::Attached,
        SessionError::NotAttached
    );

    let url = session.config().ws_url();
    let session_id = session.id();
    info!("session {session_id}: connecting to {url}");

    let ws_stream = match connect_async(url.as_str()).await {
        Ok((stream, _response)) => stream,
        Err(e) => {
            warn!("session {session_id}: connection to {url} failed: {e}");
            session.on_close();
            return Ok(session.snapshot());
        }
    };
    session.on_open();

    let (mut ws_tx, mut ws_rx) = ws_stream.split();
    let mut decodes: JoinSet<Result<DecodedFrame, DecodeError>> = JoinSet::new();
    let mut inputs_open = true;

    loop {
        tokio::select! {
            incoming = ws_rx.next() => match incoming {
                Some(Ok(WsMessage::Binary(bytes))) => {
                    if let Some(frame) = session.on_message(InboundMessage::Binary(bytes)) {
                        let decoder = Arc::clone(&decoder);
                        decodes.spawn(async move { decoder.decode(frame).await });
                    }
                }
                Some(Ok(WsMessage::Text(text))) => {
                    session.on_message(InboundMessage::Text(text));
                }
                // Keep reading so tungstenite can flush its close reply; the
                // stream ends right after.
                Some(Ok(WsMessage::Close(frame))) => {
                    debug!("session {session_id}: peer sent close: {frame:?}");
                }
                // Ping/Pong are answered by tungstenite itself.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("session {session_id}: socket error: {e}");
                    break;
                }
                None => break,
            },

            Some(joined) = decodes.join_next(), if !decodes.is_empty() => {
                finish_decode(&mut session, joined);
            }

            input = inputs.recv(), if inputs_open => match input {
                Some(input) => match session.on_input(input) {
                    Ok(Some(command)) => {
                        if let Err(e) = ws_tx.send(WsMessage::Text(command.to_string())).await {
                            warn!("session {session_id}: send of {command} failed: {e}");
                            break;
                        }
                        session.on_command_sent(&command);
                    }
                    Ok(None) => {}
                    Err(e) => warn!("session {session_id}: {e}"),
                },
                None => {
                    debug!("session {session_id}: local input closed");
                    inputs_open = false;
                }
            },

            Ok(()) = shutdown.changed() => {
                if *shutdown.borrow() {
                    info!("session {session_id}: shutdown requested; closing socket");
                    if let Err(e) = ws_tx.send(WsMessage::Close(None)).await {
                        debug!("session {session_id}: close frame not sent: {e}");
                    }
                    break;
                }
            }
        }
    }

    session.on_close();

    if !decodes.is_empty() {
        debug!(
            "session {session_id}: waiting for {} in-flight decode(s)",
            decodes.len()
        );
    }
    while let Some(joined) = decodes.join_next().await {
        finish_decode(&mut session, joined);
    }

    let snapshot = session.snapshot();
    info!(
        "session {session_id}: finished ({} frames painted, {} dropped, {} commands sent)",
        snapshot.frames_painted, snapshot.frames_dropped, snapshot.commands_sent
    );
    Ok(snapshot)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn finish_decode(
    session: &mut DisplaySession,
    joined: Result<Result<DecodedFrame, DecodeError>, JoinError>,
) {
    match joined {
        Ok(Ok(frame)) => session.paint(frame),
        Ok(Err(e)) => session.on_decode_failed(e),
        Err(e) => session.on_decode_failed(DecodeError::TaskFailed(e.to_string())),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
