//! Error types for irverify-core.
//!
//! Collaborator failures (parser, verifier, config loading) are values, never panics.

/// Result type alias for collaborator operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors reported by the module parser, the verifier or the config layer.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Textual module could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Verifier found a structural problem in a module.
    #[error("verification failed: {0}")]
    Verify(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Creates a parse error.
    #[must_use]
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Creates a verification error.
    #[must_use]
    pub fn verify(msg: impl Into<String>) -> Self {
        Self::Verify(msg.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns true if this error describes the module itself rather than
    /// the environment (parse and verify failures).
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::Verify(_))
    }
}
