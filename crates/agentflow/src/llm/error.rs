//! LLM adapter error types.

use thiserror::Error;

/// Failure of one adapter call, distinguishable by reason.
///
/// The graph catches these as `GraphError::Llm`; the core adds no retry of
/// its own.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LlmError {
    /// Provider returned an error (e.g. 4xx/5xx or a business error).
    #[error("api error: {0}")]
    Api(String),

    /// Rate limited (e.g. 429).
    #[error("rate limit: {0}")]
    RateLimit(String),

    /// Authentication failed (e.g. 401/403).
    #[error("auth failed: {0}")]
    Auth(String),

    /// The request itself was invalid.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Network or connection failure.
    #[error("network error: {0}")]
    Network(String),

    /// The provider response could not be decoded.
    #[error("parsing failed: {0}")]
    Parsing(String),
}
