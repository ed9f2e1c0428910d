//! Fixture lifecycle: construct, run the test body, tear down, report.
//!
//! The harness only records failures. These helpers are the test-framework
//! side of the contract: they guarantee teardown runs exactly once at the end
//! of the body and turn recorded failures into a failed test.

use irverify_core::IrBackend;

use crate::harness::VerifyingTestHarness;

/// A test fixture built around a [`VerifyingTestHarness`].
///
/// Fixtures may extend [`VerifiedFixture::tear_down`] with their own cleanup
/// but must still call [`VerifyingTestHarness::teardown`]; a fixture that
/// forgets is caught when the harness is dropped.
pub trait VerifiedFixture {
    /// Backend the fixture's harness uses.
    type Backend: IrBackend;

    /// The harness owned by this fixture.
    fn harness(&mut self) -> &mut VerifyingTestHarness<Self::Backend>;

    /// Per-test setup, run before the body.
    fn set_up(&mut self) {}

    /// Per-test teardown, run after the body.
    fn tear_down(&mut self) {
        self.harness().teardown();
    }
}

impl<B: IrBackend> VerifiedFixture for VerifyingTestHarness<B> {
    type Backend = B;

    fn harness(&mut self) -> &mut VerifyingTestHarness<B> {
        self
    }
}

/// Runs `body` against `fixture`, tears it down and fails the test if any
/// verification failure was recorded.
///
/// # Panics
/// Panics with the failure summary if the failure log is not empty.
#[track_caller]
#[allow(clippy::panic)] // Recorded failures fail the test here, at the end.
pub fn run_fixture<F, T>(mut fixture: F, body: impl FnOnce(&mut F) -> T) -> T
where
    F: VerifiedFixture,
{
    fixture.set_up();
    let output = body(&mut fixture);
    fixture.tear_down();

    if let Err(e) = fixture.harness().failures().check() {
        panic!("{e}");
    }
    output
}

/// Runs `body` against a bare harness. See [`run_fixture`].
///
/// # Panics
/// Panics with the failure summary if the failure log is not empty.
#[track_caller]
pub fn run_verified<B, T>(
    harness: VerifyingTestHarness<B>,
    body: impl FnOnce(&mut VerifyingTestHarness<B>) -> T,
) -> T
where
    B: IrBackend,
{
    run_fixture(harness, body)
}
