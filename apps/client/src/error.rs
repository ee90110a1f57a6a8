//! Error handling for the study client.

use thiserror::Error;

/// Errors surfaced by the gateway client and study flow.
///
/// No call is retried automatically; every failure is terminal for that one
/// request and requires an explicit user-initiated retry.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Rejected locally before any network call (malformed API key, empty
    /// prompt or subject name).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Bad credentials, duplicate registration, or an expired/missing token.
    /// The caller clears its auth session and returns to the login view.
    #[error("Auth error: {0}")]
    Auth(String),

    /// Upstream card generation failed or returned zero cards. The prior
    /// deck is left untouched so the user can retry.
    #[error("Generation failed: {0}")]
    Generation(String),

    /// No cards are due or available for the requested subject.
    #[error("No cards available to study")]
    EmptyDeck,

    /// Progress report failed. Non-fatal: local stats are retained.
    #[error("Progress report failed: {0}")]
    ProgressReport(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error: {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    /// An operation was issued while a prior call on the same session was
    /// still outstanding.
    #[error("A request is already in progress")]
    Busy,
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
