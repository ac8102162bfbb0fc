// Error types for the HTTP layer. The session turns these into
// `anyhow` errors with context before they reach the user.

use thiserror::Error;

/// Failures of a listing or purchase request.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network-level failure: DNS, refused connection, timeout.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was not the expected JSON envelope.
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The listing envelope came back with a code other than 200.
    #[error("failed to fetch items, code: {code}")]
    ListingRejected { code: i64 },

    /// The API key cannot be sent as an HTTP header value.
    #[error("API key contains characters that are not allowed in a header")]
    InvalidApiKey,
}
