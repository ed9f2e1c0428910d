//! Test-recording side channel.
//!
//! Verification outcomes never abort the test on the spot. They are appended
//! here so several independent failures across modules show up in one run.

use std::fmt;

use irverify_core::ModuleId;
use serde::Serialize;

use crate::error::{HarnessError, Result};

/// When a verification ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationPhase {
    /// Right after parsing, at the call site.
    Immediate,
    /// Requested explicitly during the test body.
    OnDemand,
    /// During teardown.
    Teardown,
}

impl fmt::Display for VerificationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            Self::Immediate => "immediate",
            Self::OnDemand => "on-demand",
            Self::Teardown => "teardown",
        };
        f.write_str(phase)
    }
}

/// Kind of recorded failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    /// The verifier rejected a module.
    Verification {
        /// Verifier error detail.
        detail: String,
    },
    /// The verifier reported that it changed a module.
    UnexpectedMutation,
    /// Teardown ran more than once.
    DoubleTeardown,
}

/// Module a failure is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleRef {
    /// Module identity.
    pub id: ModuleId,
    /// Module name hint.
    pub name: String,
}

/// A single recorded test failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestFailure {
    /// What went wrong.
    #[serde(flatten)]
    pub kind: FailureKind,
    /// Module involved, if any.
    pub module: Option<ModuleRef>,
    /// When it was detected.
    pub phase: VerificationPhase,
}

impl fmt::Display for TestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let module = self
            .module
            .as_ref()
            .map(|m| format!("module '{}' ({})", m.name, m.id))
            .unwrap_or_default();
        match &self.kind {
            FailureKind::Verification { detail } => {
                write!(f, "[{}] verifier failed on {module}: {detail}", self.phase)
            }
            FailureKind::UnexpectedMutation => write!(
                f,
                "[{}] verifier should never mutate {module}; verification must be a no-op",
                self.phase
            ),
            FailureKind::DoubleTeardown => write!(
                f,
                "[{}] teardown called more than once; it should be called exactly once",
                self.phase
            ),
        }
    }
}

/// Ordered log of failures recorded against one test case.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FailureLog {
    failures: Vec<TestFailure>,
}

impl FailureLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            failures: Vec::new(),
        }
    }

    /// Records a failure.
    pub fn record(&mut self, failure: TestFailure) {
        tracing::warn!(phase = %failure.phase, "{failure}");
        self.failures.push(failure);
    }

    /// Returns all failures in recording order.
    #[must_use]
    pub fn failures(&self) -> &[TestFailure] {
        &self.failures
    }

    /// Number of recorded failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of unexpected-mutation failures.
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.count(|kind| matches!(kind, FailureKind::UnexpectedMutation))
    }

    /// Number of verifier-rejection failures.
    #[must_use]
    pub fn verification_count(&self) -> usize {
        self.count(|kind| matches!(kind, FailureKind::Verification { .. }))
    }

    /// Number of double-teardown failures.
    #[must_use]
    pub fn double_teardown_count(&self) -> usize {
        self.count(|kind| matches!(kind, FailureKind::DoubleTeardown))
    }

    fn count(&self, pred: impl Fn(&FailureKind) -> bool) -> usize {
        self.failures.iter().filter(|f| pred(&f.kind)).count()
    }

    /// Renders the log as JSON for diagnostics.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Converts the log into a pass/fail verdict.
    ///
    /// # Errors
    /// Returns [`HarnessError::FailuresRecorded`] if anything was recorded.
    pub fn check(&self) -> Result<()> {
        if self.failures.is_empty() {
            return Ok(());
        }
        let summary = self
            .failures
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        Err(HarnessError::FailuresRecorded {
            count: self.failures.len(),
            summary,
        })
    }
}
