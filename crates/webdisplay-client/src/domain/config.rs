//! Session configuration.
//!
//! [`SessionConfig`] holds the four parameters an embedder supplies when it
//! creates a display session.  There is no configuration file; the binary
//! fills the struct from CLI flags and environment variables.

use serde::{Deserialize, Serialize};

/// Default port of the display host.
pub const DEFAULT_PORT: u16 = 7788;

/// Everything needed to open one display session.
///
/// # Example
///
/// ```rust
/// use webdisplay_client::domain::SessionConfig;
///
/// let cfg = SessionConfig {
///     host: "10.0.0.5".to_string(),
///     port: 7788,
///     app_name: "cbplusui".to_string(),
///     canvas_id: "screen".to_string(),
/// };
/// assert_eq!(cfg.ws_url(), "ws://10.0.0.5:7788/cbplusui");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Hostname or IP address of the display host.
    pub host: String,
    /// TCP port of the display host's WebSocket listener.
    pub port: u16,
    /// Name of the remote application; becomes the URL path.
    pub app_name: String,
    /// Identifier of the canvas the session paints into.
    pub canvas_id: String,
}

impl SessionConfig {
    /// The socket URL: `ws://{host}:{port}/{app_name}`.
    ///
    /// No query string, no subprotocol, no TLS.
    pub fn ws_url(&self) -> String {
        format!("ws://{}:{}/{}", self.host, self.port, self.app_name)
    }
}

impl Default for SessionConfig {
    /// | Field     | Default        |
    /// |-----------|----------------|
    /// | host      | `127.0.0.1`    |
    /// | port      | `7788`         |
    /// | app_name  | `mguxdemo`     |
    /// | canvas_id | `webdisplay`   |
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            app_name: "mguxdemo".to_string(),
            canvas_id: "webdisplay".to_string(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port_is_7788() {
        assert_eq!(SessionConfig::default().port, 7788);
    }

    #[test]
    fn test_default_url() {
        assert_eq!(
            SessionConfig::default().ws_url(),
            "ws://127.0.0.1:7788/mguxdemo"
        );
    }

    #[test]
    fn test_url_uses_all_three_target_fields() {
        // Arrange
        let cfg = SessionConfig {
            host: "display.local".to_string(),
            port: 9001,
            app_name: "calc".to_string(),
            canvas_id: "ignored-in-url".to_string(),
        };

        // Act
        let url = cfg.ws_url();

        // Assert
        assert_eq!(url, "ws://display.local:9001/calc");
        assert!(!url.contains("ignored"));
    }
}
