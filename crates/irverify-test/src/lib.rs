// Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # irverify-test
//!
//! Auto-verifying test harness for compiler IR modules.
//!
//! This crate provides:
//! - **Verifying harness**: owns every module a test creates and verifies
//!   each one exactly once at teardown
//! - **Failure log**: verifier rejections and unexpected mutations are
//!   recorded, not raised, so one run reports all of them
//! - **Fixtures**: helpers that guarantee teardown runs and fail the test on
//!   recorded failures
//!
//! Misuse of the harness (dropping it without teardown, parsing a second
//! primary module) panics immediately.
//!
//! ## Example
//!
//! ```rust
//! use irverify_core::IrModule;
//! use irverify_core::mock::MockBackend;
//! use irverify_test::{VerifyingTestHarness, run_verified};
//!
//! let harness = VerifyingTestHarness::new(MockBackend::new(), false, false);
//! run_verified(harness, |h| {
//!     h.parse_and_verify_module_default("HloModule add\nENTRY main {}");
//!     assert_eq!(h.primary().name(), "add");
//!     h.create_module("scratch");
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod failure;
pub mod fixture;
pub mod harness;
pub mod logging;
pub mod registry;

pub use error::{HarnessError, Result};
pub use failure::{FailureKind, FailureLog, ModuleRef, TestFailure, VerificationPhase};
pub use fixture::{VerifiedFixture, run_fixture, run_verified};
pub use harness::{HarnessState, VerifyingTestHarness, VerifyingTestHarnessBuilder};
pub use logging::init_test_logging;
pub use registry::{ModuleEntry, ModuleRegistry, Slot};
