//! Line-based local input.
//!
//! The binary has no window to capture pointer events from, so it reads them
//! as text, one event per line, in viewport coordinates:
//!
//! ```text
//! down 110 110
//! move 111.5 110
//! up 120 110
//! keydown 28
//! keyup 28
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.  Malformed lines are
//! logged and skipped.
//!
//! Reading is blocking.  The binary runs [`forward_lines`] on a plain OS
//! thread so a pending read on stdin never holds up runtime shutdown.

use std::io::BufRead;

use anyhow::Context;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use webdisplay_core::{KeyEvent, KeyEventKind, PointerEvent};

use crate::application::LocalInput;

/// Why an input line was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputLineError {
    #[error("unknown input verb {0:?}")]
    UnknownVerb(String),

    #[error("{verb}: expected {expected} argument(s), got {got}")]
    WrongArity {
        verb: String,
        expected: usize,
        got: usize,
    },

    #[error("{verb}: invalid argument {value:?}")]
    InvalidArgument { verb: String, value: String },
}

/// Parses one input line.
///
/// Returns `Ok(None)` for blank and comment lines.
///
/// # Errors
///
/// Returns [`InputLineError`] for an unknown verb, a wrong argument count, or
/// an argument that is not a number.
pub fn parse_input_line(line: &str) -> Result<Option<LocalInput>, InputLineError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut tokens = line.split_whitespace();
    let verb = tokens.next().unwrap_or_default().to_ascii_lowercase();
    let args: Vec<&str> = tokens.collect();

    let input = match verb.as_str() {
        "down" | "up" | "move" => {
            let [x, y] = expect_args::<2>(&verb, &args)?;
            let (x, y) = (parse_number::<f64>(&verb, x)?, parse_number::<f64>(&verb, y)?);
            let event = match verb.as_str() {
                "down" => PointerEvent::down(x, y),
                "up" => PointerEvent::up(x, y),
                _ => PointerEvent::moved(x, y),
            };
            LocalInput::Pointer(event)
        }
        "keydown" | "keyup" => {
            let [code] = expect_args::<1>(&verb, &args)?;
            let kind = if verb == "keydown" {
                KeyEventKind::Down
            } else {
                KeyEventKind::Up
            };
            LocalInput::Key(KeyEvent {
                kind,
                code: parse_number::<i32>(&verb, code)?,
            })
        }
        _ => return Err(InputLineError::UnknownVerb(verb)),
    };
    Ok(Some(input))
}

/// Reads lines from `reader` and forwards parsed events to `tx`.
///
/// Returns when the reader reaches end of input or the receiving side of
/// `tx` is dropped.  Must not be called from inside an async task.
///
/// # Errors
///
/// Returns an error only if reading from `reader` fails.
pub fn forward_lines<R: BufRead>(reader: R, tx: mpsc::Sender<LocalInput>) -> anyhow::Result<()> {
    for line in reader.lines() {
        let line = line.context("failed to read input line")?;
        match parse_input_line(&line) {
            Ok(Some(input)) => {
                if tx.blocking_send(input).is_err() {
                    debug!("input receiver closed; stopping input reader");
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => warn!("ignoring input line {line:?}: {e}"),
        }
    }
    Ok(())
}

fn expect_args<'a, const N: usize>(
    verb: &str,
    args: &[&'a str],
) -> Result<[&'a str; N], InputLineError> {
    <[&str; N]>::try_from(args).map_err(|_| InputLineError::WrongArity {
        verb: verb.to_string(),
        expected: N,
        got: args.len(),
    })
}

fn parse_number<T: std::str::FromStr>(verb: &str, value: &str) -> Result<T, InputLineError> {
    value.parse().map_err(|_| InputLineError::InvalidArgument {
        verb: verb.to_string(),
        value: value.to_string(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pointer_lines() {
        assert_eq!(
            parse_input_line("down 110 110"),
            Ok(Some(LocalInput::Pointer(PointerEvent::down(110.0, 110.0))))
        );
        assert_eq!(
            parse_input_line("  MOVE 1.5 2.25 "),
            Ok(Some(LocalInput::Pointer(PointerEvent::moved(1.5, 2.25))))
        );
        assert_eq!(
            parse_input_line("up 0 -3"),
            Ok(Some(LocalInput::Pointer(PointerEvent::up(0.0, -3.0))))
        );
    }

    #[test]
    fn test_parse_key_lines() {
        assert_eq!(
            parse_input_line("keydown 28"),
            Ok(Some(LocalInput::Key(KeyEvent {
                kind: KeyEventKind::Down,
                code: 28
            })))
        );
        assert_eq!(
            parse_input_line("keyup 28"),
            Ok(Some(LocalInput::Key(KeyEvent {
                kind: KeyEventKind::Up,
                code: 28
            })))
        );
    }

    #[test]
    fn test_parse_negative_key_code() {
        assert_eq!(
            parse_input_line("keyup -1"),
            Ok(Some(LocalInput::Key(KeyEvent {
                kind: KeyEventKind::Up,
                code: -1
            })))
        );
    }

    #[test]
    fn test_blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_input_line(""), Ok(None));
        assert_eq!(parse_input_line("   "), Ok(None));
        assert_eq!(parse_input_line("# drag test"), Ok(None));
    }

    #[test]
    fn test_malformed_lines_are_rejected() {
        assert_eq!(
            parse_input_line("click 1 2"),
            Err(InputLineError::UnknownVerb("click".to_string()))
        );
        assert_eq!(
            parse_input_line("down 1"),
            Err(InputLineError::WrongArity {
                verb: "down".to_string(),
                expected: 2,
                got: 1
            })
        );
        assert_eq!(
            parse_input_line("keydown enter"),
            Err(InputLineError::InvalidArgument {
                verb: "keydown".to_string(),
                value: "enter".to_string()
            })
        );
    }

    #[test]
    fn test_forward_lines_skips_bad_lines_and_keeps_order() {
        // Arrange
        let script: &[u8] = b"down 1 2\nbogus\n\nmove 3 4\nup 5 6\n";
        let (tx, mut rx) = mpsc::channel(8);

        // Act
        forward_lines(script, tx).unwrap();

        // Assert
        let mut received = Vec::new();
        while let Some(input) = rx.blocking_recv() {
            received.push(input);
        }
        assert_eq!(
            received,
            vec![
                LocalInput::Pointer(PointerEvent::down(1.0, 2.0)),
                LocalInput::Pointer(PointerEvent::moved(3.0, 4.0)),
                LocalInput::Pointer(PointerEvent::up(5.0, 6.0)),
            ]
        );
    }

    #[test]
    fn test_forward_lines_stops_when_receiver_is_gone() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let result = forward_lines(&b"down 1 1\ndown 2 2\n"[..], tx);

        assert!(result.is_ok());
    }
}
