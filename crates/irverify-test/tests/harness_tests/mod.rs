//! Harness behavior, grouped by category:
//!
//! | Module | Claims |
//! |--------|--------|
//! | lifecycle | single teardown, drop contract, primary slot |
//! | ordering | every module verified once, primary first, creation order |
//! | outcomes | verifier errors and mutations are recorded, never fatal |
//! | scenarios | end-to-end test bodies through fixtures |

// Allow test-specific patterns that are denied in production code
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod lifecycle;
mod ordering;
mod outcomes;
