//! Codec for web display protocol messages.
//!
//! Frame update wire format (host → viewer, binary):
//! ```text
//! [left:4][top:4][right:4][bottom:4][image:N]
//! ```
//! Header size: 16 bytes.  The four bounds are little-endian `u32`.  The image
//! is a complete PNG covering exactly the rectangle.
//!
//! Command wire format (viewer → host, text):
//! ```text
//! MOUSEDOWN <x> <y> | MOUSEUP <x> <y> | MOUSEMOVE <x> <y> | KEYDOWN <code> | KEYUP <code>
//! ```

use std::str::FromStr;

use thiserror::Error;
use tracing::trace;

use crate::protocol::messages::{
    verbs, DirtyRect, FrameUpdate, InputCommand, DIRTY_RECT_HEADER_SIZE,
};

/// Errors that can occur while decoding frames or parsing commands.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The byte slice is shorter than the dirty-rectangle header.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// The header declares `right < left` or `bottom < top`.
    #[error("inverted dirty rectangle: {0}")]
    InvertedRect(DirtyRect),

    /// The header is present but no image bytes follow it.
    #[error("frame update for {0} carries no image payload")]
    EmptyPayload(DirtyRect),

    /// The command verb is not one the host understands.
    #[error("unknown command verb: {0:?}")]
    UnknownCommand(String),

    /// The verb is known but its arguments are missing or not integers.
    #[error("malformed command: {0:?}")]
    MalformedCommand(String),
}

// ── Frame updates ─────────────────────────────────────────────────────────────

/// Decodes one binary frame update.
///
/// The whole buffer is one message: the first 16 bytes are the dirty
/// rectangle and everything after them is the image payload.
///
/// # Errors
///
/// - [`ProtocolError::InsufficientData`] if `bytes` is shorter than 16 bytes.
/// - [`ProtocolError::InvertedRect`] if the rectangle has negative extent.
/// - [`ProtocolError::EmptyPayload`] if nothing follows the header.
///
/// # Examples
///
/// ```rust
/// use webdisplay_core::protocol::{decode_frame, encode_frame};
/// use webdisplay_core::{DirtyRect, FrameUpdate};
///
/// let frame = FrameUpdate { rect: DirtyRect::new(0, 0, 100, 50), payload: vec![0x89, b'P'] };
/// let bytes = encode_frame(&frame);
/// assert_eq!(decode_frame(&bytes).unwrap(), frame);
/// ```
pub fn decode_frame(bytes: &[u8]) -> Result<FrameUpdate, ProtocolError> {
    if bytes.len() < DIRTY_RECT_HEADER_SIZE {
        return Err(ProtocolError::InsufficientData {
            needed: DIRTY_RECT_HEADER_SIZE,
            available: bytes.len(),
        });
    }

    let rect = DirtyRect {
        left: read_u32_le(bytes, 0),
        top: read_u32_le(bytes, 4),
        right: read_u32_le(bytes, 8),
        bottom: read_u32_le(bytes, 12),
    };

    if rect.is_inverted() {
        return Err(ProtocolError::InvertedRect(rect));
    }

    let payload = &bytes[DIRTY_RECT_HEADER_SIZE..];
    if payload.is_empty() {
        return Err(ProtocolError::EmptyPayload(rect));
    }

    trace!("decoded frame header {rect} with {} payload bytes", payload.len());

    Ok(FrameUpdate {
        rect,
        payload: payload.to_vec(),
    })
}

/// Encodes a frame update into its binary wire form.
///
/// The viewer never sends frames; this exists for display hosts, test
/// fixtures, and benchmarks.
pub fn encode_frame(frame: &FrameUpdate) -> Vec<u8> {
    let mut buf = Vec::with_capacity(DIRTY_RECT_HEADER_SIZE + frame.payload.len());
    buf.extend_from_slice(&frame.rect.left.to_le_bytes());
    buf.extend_from_slice(&frame.rect.top.to_le_bytes());
    buf.extend_from_slice(&frame.rect.right.to_le_bytes());
    buf.extend_from_slice(&frame.rect.bottom.to_le_bytes());
    buf.extend_from_slice(&frame.payload);
    buf
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Parses a text command the way the display host does.
///
/// The verb is matched case-insensitively and must be followed by a space.
/// Arguments are whitespace-separated decimal integers; trailing tokens after
/// the required arguments are ignored.
///
/// ```rust
/// use webdisplay_core::InputCommand;
///
/// let cmd: InputCommand = "mousedown 5 6".parse().unwrap();
/// assert_eq!(cmd, InputCommand::Press { x: 5, y: 6 });
/// ```
impl FromStr for InputCommand {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (verb, args) = s
            .split_once(' ')
            .ok_or_else(|| ProtocolError::UnknownCommand(s.to_string()))?;

        let malformed = || ProtocolError::MalformedCommand(s.to_string());
        let mut tokens = args.split_whitespace();
        let mut next_i32 = || -> Result<i32, ProtocolError> {
            tokens
                .next()
                .and_then(|t| t.parse::<i32>().ok())
                .ok_or_else(malformed)
        };

        if verb.eq_ignore_ascii_case(verbs::MOUSE_DOWN) {
            let (x, y) = (next_i32()?, next_i32()?);
            Ok(InputCommand::Press { x, y })
        } else if verb.eq_ignore_ascii_case(verbs::MOUSE_UP) {
            let (x, y) = (next_i32()?, next_i32()?);
            Ok(InputCommand::Release { x, y })
        } else if verb.eq_ignore_ascii_case(verbs::MOUSE_MOVE) {
            let (x, y) = (next_i32()?, next_i32()?);
            Ok(InputCommand::Move { x, y })
        } else if verb.eq_ignore_ascii_case(verbs::KEY_DOWN) {
            Ok(InputCommand::KeyDown {
                code: parse_key_code(args).ok_or_else(malformed)?,
            })
        } else if verb.eq_ignore_ascii_case(verbs::KEY_UP) {
            Ok(InputCommand::KeyUp {
                code: parse_key_code(args).ok_or_else(malformed)?,
            })
        } else {
            Err(ProtocolError::UnknownCommand(verb.to_string()))
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn parse_key_code(args: &str) -> Option<i32> {
    args.split_whitespace().next()?.parse::<i32>().ok()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn header(l: u32, t: u32, r: u32, b: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        for v in [l, t, r, b] {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf
    }

    #[test]
    fn test_decode_frame_reads_little_endian_bounds() {
        // Arrange
        let mut bytes = header(1, 2, 300, 400);
        bytes.extend_from_slice(b"png");

        // Act
        let frame = decode_frame(&bytes).unwrap();

        // Assert
        assert_eq!(frame.rect, DirtyRect::new(1, 2, 300, 400));
        assert_eq!(frame.payload, b"png");
    }

    #[test]
    fn test_decode_frame_header_is_exactly_sixteen_bytes() {
        let mut bytes = header(0, 0, 100, 50);
        bytes.push(0xAB);
        let frame = decode_frame(&bytes).unwrap();
        assert_eq!(frame.payload, vec![0xAB]);
    }

    #[test]
    fn test_decode_frame_short_buffer_returns_insufficient_data() {
        for len in 0..DIRTY_RECT_HEADER_SIZE {
            let bytes = vec![0u8; len];
            assert_eq!(
                decode_frame(&bytes),
                Err(ProtocolError::InsufficientData {
                    needed: 16,
                    available: len
                })
            );
        }
    }

    #[test]
    fn test_decode_frame_header_only_returns_empty_payload() {
        let bytes = header(0, 0, 10, 10);
        assert_eq!(
            decode_frame(&bytes),
            Err(ProtocolError::EmptyPayload(DirtyRect::new(0, 0, 10, 10)))
        );
    }

    #[test]
    fn test_decode_frame_inverted_rect_is_rejected() {
        let mut bytes = header(50, 0, 10, 10);
        bytes.push(1);
        assert!(matches!(
            decode_frame(&bytes),
            Err(ProtocolError::InvertedRect(_))
        ));
    }

    #[test]
    fn test_encode_frame_layout() {
        let frame = FrameUpdate {
            rect: DirtyRect::new(0x01020304, 0, 0xFFFF_FFFF, 1),
            payload: vec![9, 9],
        };
        let bytes = encode_frame(&frame);
        assert_eq!(bytes.len(), 18);
        assert_eq!(&bytes[0..4], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&bytes[8..12], &[0xFF; 4]);
        assert_eq!(&bytes[16..], &[9, 9]);
    }

    #[test]
    fn test_parse_pointer_commands() {
        assert_eq!(
            "MOUSEDOWN 200 200".parse::<InputCommand>(),
            Ok(InputCommand::Press { x: 200, y: 200 })
        );
        assert_eq!(
            "MOUSEUP 1 2".parse::<InputCommand>(),
            Ok(InputCommand::Release { x: 1, y: 2 })
        );
        assert_eq!(
            "MOUSEMOVE -4 9".parse::<InputCommand>(),
            Ok(InputCommand::Move { x: -4, y: 9 })
        );
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "MouseMove 3 4".parse::<InputCommand>(),
            Ok(InputCommand::Move { x: 3, y: 4 })
        );
        assert_eq!(
            "keyup 17".parse::<InputCommand>(),
            Ok(InputCommand::KeyUp { code: 17 })
        );
    }

    #[test]
    fn test_parse_key_commands() {
        assert_eq!(
            "KEYDOWN 30".parse::<InputCommand>(),
            Ok(InputCommand::KeyDown { code: 30 })
        );
    }

    #[test]
    fn test_parse_accepts_negative_key_codes() {
        // The host reads key codes as signed decimals.
        assert_eq!(
            "KEYDOWN -1".parse::<InputCommand>(),
            Ok(InputCommand::KeyDown { code: -1 })
        );
        assert_eq!(
            "keyup -65".parse::<InputCommand>(),
            Ok(InputCommand::KeyUp { code: -65 })
        );
        assert_eq!(InputCommand::KeyUp { code: -65 }.to_string(), "KEYUP -65");
    }

    #[test]
    fn test_parse_ignores_trailing_tokens() {
        assert_eq!(
            "MOUSEDOWN 1 2 3".parse::<InputCommand>(),
            Ok(InputCommand::Press { x: 1, y: 2 })
        );
    }

    #[test]
    fn test_parse_missing_argument_is_malformed() {
        assert!(matches!(
            "MOUSEDOWN 1".parse::<InputCommand>(),
            Err(ProtocolError::MalformedCommand(_))
        ));
        assert!(matches!(
            "KEYDOWN x".parse::<InputCommand>(),
            Err(ProtocolError::MalformedCommand(_))
        ));
    }

    #[test]
    fn test_parse_unknown_verb() {
        assert_eq!(
            "SCROLL 1 2".parse::<InputCommand>(),
            Err(ProtocolError::UnknownCommand("SCROLL".to_string()))
        );
        assert!(matches!(
            "MOUSEDOWN".parse::<InputCommand>(),
            Err(ProtocolError::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_display_output_parses_back() {
        let cmd = InputCommand::Move { x: 640, y: 480 };
        assert_eq!(cmd.to_string().parse::<InputCommand>(), Ok(cmd));
    }
}
