//! Lifecycle: Active -> TornDown, exactly once.

use std::panic::AssertUnwindSafe;

use irverify_core::mock::MockBackend;
use irverify_core::{IrModule, ModuleConfig};
use irverify_test::{HarnessError, HarnessState, VerifyingTestHarness};

fn harness(backend: &MockBackend) -> VerifyingTestHarness<MockBackend> {
    VerifyingTestHarness::new(backend.clone(), false, false)
}

#[test]
fn teardown_moves_active_to_torn_down() {
    let backend = MockBackend::new();
    let mut h = harness(&backend);
    assert_eq!(h.state(), HarnessState::Active);

    h.teardown();
    assert_eq!(h.state(), HarnessState::TornDown);
}

#[test]
fn repeated_teardown_records_one_failure_per_extra_call() {
    let backend = MockBackend::new();
    let mut h = harness(&backend);
    h.primary();
    h.create_module("m0");

    h.teardown();
    h.teardown();
    assert_eq!(h.failures().double_teardown_count(), 1);
    assert_eq!(backend.verify_calls().len(), 2);

    h.teardown();
    assert_eq!(h.failures().double_teardown_count(), 2);
    assert_eq!(backend.verify_calls().len(), 2);
    assert_eq!(h.state(), HarnessState::TornDown);
}

#[test]
#[should_panic(expected = "teardown was never called")]
fn dropping_active_harness_is_fatal() {
    let backend = MockBackend::new();
    let h = harness(&backend);
    drop(h);
}

#[test]
fn dropping_torn_down_harness_is_quiet() {
    let backend = MockBackend::new();
    let mut h = harness(&backend);
    h.create_module("m0");
    h.teardown();
    drop(h);
}

#[test]
fn dropping_active_harness_during_unwind_does_not_abort() {
    let backend = MockBackend::new();
    let result = std::panic::catch_unwind(AssertUnwindSafe(move || {
        let mut h = harness(&backend);
        h.create_module("m0");
        panic!("test body failed");
    }));

    let payload = result.unwrap_err();
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"test body failed"));
}

#[test]
fn primary_returns_same_instance() {
    let backend = MockBackend::new();
    let mut h = harness(&backend);

    let first = h.primary().id();
    h.create_module("m0");
    let second = h.primary().id();

    assert_eq!(first, second);
    assert_eq!(backend.created_count(), 2);
    h.teardown();
}

#[test]
fn second_primary_is_contract_violation() {
    let backend = MockBackend::new();
    let mut h = harness(&backend);
    h.parse_and_verify_module_default("HloModule first");

    let err = h
        .try_parse_and_verify_module("HloModule second", &ModuleConfig::default())
        .unwrap_err();

    assert!(matches!(
        &err,
        HarnessError::SecondPrimaryModule { existing } if existing == "first"
    ));
    assert!(err.is_contract_violation());
    assert_eq!(h.primary().name(), "first");
    h.teardown();
}

#[test]
#[should_panic(expected = "already has a primary module 'test_module'")]
fn parse_after_lazy_primary_panics() {
    let backend = MockBackend::new();
    let mut h = harness(&backend);
    h.primary();
    h.parse_and_verify_module_default("HloModule late");
}

#[test]
fn modules_created_after_teardown_are_not_verified() {
    let backend = MockBackend::new();
    let mut h = harness(&backend);
    h.teardown();

    h.create_module("late");
    h.teardown();

    assert!(backend.verify_calls().is_empty());
    assert_eq!(h.failures().double_teardown_count(), 1);
}
