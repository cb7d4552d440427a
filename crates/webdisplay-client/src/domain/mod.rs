//! Domain layer for webdisplay-client.
//!
//! Plain data: how to reach the display host and what a session looked like
//! at a point in time.  Nothing here touches a socket or a canvas.

pub mod config;
pub mod snapshot;

pub use config::SessionConfig;
pub use snapshot::{SessionSnapshot, SessionStatus};
