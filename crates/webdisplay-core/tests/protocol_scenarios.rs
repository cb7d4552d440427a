//! Integration tests for the webdisplay-core protocol and input logic.
//!
//! These tests drive the public API the way the client session does: decode
//! an inbound frame, translate pointer events, and format the resulting
//! commands for the wire.

use webdisplay_core::{
    decode_frame, encode_frame, BoundingBox, CanvasGeometry, DirtyRect, FrameUpdate,
    InputCommand, PointerCapture, PointerEvent, ProtocolError,
};

fn scaled_geometry() -> CanvasGeometry {
    CanvasGeometry {
        logical_width: 800,
        logical_height: 600,
        bbox: BoundingBox {
            left: 10.0,
            top: 10.0,
            width: 400.0,
            height: 300.0,
        },
    }
}

#[test]
fn test_host_frame_bytes_decode_to_declared_rectangle() {
    // Arrange: bytes exactly as the host writes them (four LE u32 + image).
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&100u32.to_le_bytes());
    bytes.extend_from_slice(&50u32.to_le_bytes());
    bytes.extend_from_slice(b"\x89PNG\r\n\x1a\n");

    // Act
    let frame = decode_frame(&bytes).expect("valid frame must decode");

    // Assert
    assert_eq!(frame.rect, DirtyRect::new(0, 0, 100, 50));
    assert_eq!((frame.rect.width(), frame.rect.height()), (100, 50));
    assert_eq!(frame.payload.len(), 8);
}

#[test]
fn test_encoded_frame_is_accepted_by_decoder() {
    let frame = FrameUpdate {
        rect: DirtyRect::new(40, 30, 72, 62),
        payload: vec![1, 2, 3, 4],
    };
    let decoded = decode_frame(&encode_frame(&frame)).unwrap();
    assert_eq!(decoded, frame);
}

#[test]
fn test_truncated_header_never_panics() {
    let frame = FrameUpdate {
        rect: DirtyRect::new(1, 1, 2, 2),
        payload: vec![0xFF],
    };
    let bytes = encode_frame(&frame);
    for cut in 0..16 {
        assert!(matches!(
            decode_frame(&bytes[..cut]),
            Err(ProtocolError::InsufficientData { .. })
        ));
    }
}

#[test]
fn test_press_drag_release_produces_wire_commands_in_order() {
    // Arrange
    let geometry = scaled_geometry();
    let mut capture = PointerCapture::new();
    let events = [
        PointerEvent::moved(20.0, 20.0), // idle: suppressed
        PointerEvent::down(110.0, 110.0),
        PointerEvent::moved(111.0, 112.5),
        PointerEvent::up(120.0, 110.0),
        PointerEvent::moved(130.0, 130.0), // idle again: suppressed
    ];

    // Act
    let wire: Vec<String> = events
        .into_iter()
        .filter_map(|e| capture.handle(&geometry, e))
        .map(|c| c.to_string())
        .collect();

    // Assert
    assert_eq!(
        wire,
        vec!["MOUSEDOWN 200 200", "MOUSEMOVE 202 205", "MOUSEUP 220 200"]
    );
}

#[test]
fn test_wire_commands_parse_as_the_host_would() {
    let geometry = scaled_geometry();
    let mut capture = PointerCapture::new();
    let cmd = capture
        .handle(&geometry, PointerEvent::down(110.0, 110.0))
        .unwrap();

    let parsed: InputCommand = cmd.to_string().parse().unwrap();

    assert_eq!(parsed, InputCommand::Press { x: 200, y: 200 });
}
