//! irverify: auto-verifying test harness for compiler IR modules.
//!
//! # Quick Start
//!
//! ```rust
//! use irverify::prelude::*;
//! use irverify::core::mock::MockBackend;
//!
//! let harness = VerifyingTestHarness::new(MockBackend::new(), false, false);
//! run_verified(harness, |h| {
//!     h.create_module("m0");
//!     h.create_module("m1");
//! });
//! ```

pub use irverify_core as core;
pub use irverify_test as harness;

/// Prelude module for common imports.
pub mod prelude {
    pub use irverify_core::{
        CoreError, HarnessConfig, IrBackend, IrModule, ModuleConfig, ModuleId, Verifier,
        VerifierOptions,
    };
    pub use irverify_test::{
        FailureKind, FailureLog, HarnessError, VerifiedFixture, VerifyingTestHarness,
        init_test_logging, run_fixture, run_verified,
    };
}
