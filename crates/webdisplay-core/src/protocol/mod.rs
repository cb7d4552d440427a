//! Protocol module containing message types and the frame/command codec.

pub mod codec;
pub mod messages;

pub use codec::{decode_frame, encode_frame, ProtocolError};
pub use messages::*;
