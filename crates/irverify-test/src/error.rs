//! Harness error types.

use irverify_core::{CoreError, ModuleId};

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Harness errors.
///
/// Contract violations ([`HarnessError::is_contract_violation`]) are misuse of
/// the harness API. The panicking entry points turn them into an immediate
/// test abort; everything else is a property of the module under test.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// A primary module was parsed while one already existed.
    #[error("parse_and_verify_module called when the test already has a primary module '{existing}'")]
    SecondPrimaryModule {
        /// Name of the primary module already owned by the harness.
        existing: String,
    },

    /// The harness was released without running teardown.
    #[error(
        "teardown was never called; fixtures that customize teardown must chain to the harness teardown"
    )]
    TeardownNeverCalled,

    /// Module id not owned by this harness.
    #[error("module {0} is not owned by this harness")]
    UnknownModule(ModuleId),

    /// Textual module could not be parsed.
    #[error("failed to parse module: {0}")]
    Parse(#[source] CoreError),

    /// Failures were recorded against the test case.
    #[error("{count} verification failure(s) recorded:\n{summary}")]
    FailuresRecorded {
        /// Number of failures.
        count: usize,
        /// One line per failure.
        summary: String,
    },

    /// Collaborator error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl HarnessError {
    /// Returns true if this error is a programming-contract violation.
    #[must_use]
    pub const fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::SecondPrimaryModule { .. } | Self::TeardownNeverCalled
        )
    }
}
