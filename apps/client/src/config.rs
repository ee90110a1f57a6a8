//! Client configuration, read from the environment at startup.

use std::time::Duration;

/// Fallback backend URL for local development.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";

/// Default pause between recording an answer and advancing to the next
/// card. Purely UX pacing; the ordering guarantee (stats first, cursor
/// after the delay) holds for any duration.
pub const DEFAULT_ADVANCE_DELAY_MS: u64 = 1500;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub advance_delay: Duration,
}

impl Config {
    /// Read configuration from the environment (`BACKEND_URL`,
    /// `ADVANCE_DELAY_MS`), falling back to fixed defaults.
    pub fn from_env() -> Self {
        let backend_url =
            std::env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        let advance_delay_ms = std::env::var("ADVANCE_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_ADVANCE_DELAY_MS);

        Self {
            backend_url,
            advance_delay: Duration::from_millis(advance_delay_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            advance_delay: Duration::from_millis(DEFAULT_ADVANCE_DELAY_MS),
        }
    }
}
