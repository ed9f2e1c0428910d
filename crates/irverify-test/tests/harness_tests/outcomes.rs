//! Outcomes: verifier errors and mutations fail the test case through the
//! failure log and never abort the process.

use irverify_core::mock::{MockBackend, VerifyOutcome};
use irverify_core::{IrModule, ModuleConfig};
use irverify_test::{FailureKind, VerificationPhase, VerifyingTestHarness};

#[test]
fn mutation_at_teardown_records_exactly_one_failure() {
    let backend = MockBackend::new().with_outcome("test_module", VerifyOutcome::Mutate);
    let mut h = VerifyingTestHarness::new(backend, false, false);
    let id = h.primary().id();

    let log = h.teardown();
    assert_eq!(log.len(), 1);
    assert_eq!(log.mutation_count(), 1);

    let failure = &log.failures()[0];
    assert_eq!(failure.kind, FailureKind::UnexpectedMutation);
    assert_eq!(failure.phase, VerificationPhase::Teardown);
    assert_eq!(failure.module.as_ref().map(|m| m.id), Some(id));
}

#[test]
fn verifier_error_detail_is_attached() {
    let backend = MockBackend::new().with_outcome(
        "m0",
        VerifyOutcome::Fail("instruction add has 3 operands, expected 2".into()),
    );
    let mut h = VerifyingTestHarness::new(backend, false, false);
    h.create_module("m0");

    let log = h.teardown();
    match &log.failures()[0].kind {
        FailureKind::Verification { detail } => {
            assert!(detail.contains("has 3 operands"));
        }
        other => panic!("unexpected failure kind: {other:?}"),
    }
}

#[test]
fn failures_across_modules_are_all_reported() {
    let backend = MockBackend::new()
        .with_outcome("a", VerifyOutcome::Fail("cycle".into()))
        .with_outcome("b", VerifyOutcome::Mutate)
        .with_outcome("c", VerifyOutcome::Fail("dead root".into()));
    let mut h = VerifyingTestHarness::new(backend.clone(), false, false);
    for name in ["a", "b", "ok", "c"] {
        h.create_module(name);
    }

    let log = h.teardown();
    assert_eq!(log.len(), 3);
    assert_eq!(log.verification_count(), 2);
    assert_eq!(log.mutation_count(), 1);
    assert_eq!(backend.verified_names(), vec!["a", "b", "ok", "c"]);
}

#[test]
fn immediate_verification_failure_is_recorded_not_raised() {
    let backend = MockBackend::new().with_outcome("bad", VerifyOutcome::Fail("bad shape".into()));
    let mut h = VerifyingTestHarness::new(backend, false, false);

    h.parse_and_verify_module("HloModule bad\nENTRY e {}", &ModuleConfig::default());
    assert_eq!(h.failures().len(), 1);
    assert_eq!(h.failures().failures()[0].phase, VerificationPhase::Immediate);

    let log = h.teardown();
    assert_eq!(log.len(), 2);
    assert_eq!(log.failures()[1].phase, VerificationPhase::Teardown);
}

#[test]
#[should_panic(expected = "failed to parse module")]
fn malformed_text_fails_at_call_site_before_teardown() {
    let mut h = VerifyingTestHarness::new(MockBackend::new(), false, false);
    h.on_teardown(|| panic!("teardown must not run"));
    h.parse_and_verify_module_default("<malformed text>");
}

#[test]
fn strictness_flags_change_outcomes() {
    let backend = MockBackend::new();

    let mut lenient = VerifyingTestHarness::new(backend.clone(), false, true);
    let m = lenient.create_module("m");
    m.layout_mismatch = true;
    m.mixed_precision = true;
    assert!(lenient.teardown().is_empty());

    let mut strict = VerifyingTestHarness::new(backend, true, false);
    let m = strict.create_module("m");
    m.layout_mismatch = true;
    m.mixed_precision = true;
    assert_eq!(strict.teardown().verification_count(), 1);
}

#[test]
fn failure_log_renders_as_json() {
    let backend = MockBackend::new().with_outcome("m0", VerifyOutcome::Mutate);
    let mut h = VerifyingTestHarness::new(backend, false, false);
    h.create_module("m0");

    let json = h.teardown().to_json().unwrap();
    assert!(json.contains("\"kind\": \"unexpected_mutation\""));
    assert!(json.contains("\"name\": \"m0\""));
}
