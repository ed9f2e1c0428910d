//! Ordering: every owned module is verified exactly once at teardown,
//! primary first, then additional modules in creation order.

use irverify_core::mock::MockBackend;
use irverify_core::{IrModule, ModuleId};
use irverify_test::VerifyingTestHarness;
use proptest::prelude::*;

/// A step in a generated test body.
#[derive(Debug, Clone)]
enum Step {
    Create,
    TouchPrimary,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![3 => Just(Step::Create), 1 => Just(Step::TouchPrimary)]
}

proptest! {
    /// Any interleaving of create_module and primary() verifies each module
    /// once, primary first, the rest in creation order.
    #[test]
    fn teardown_order_matches_creation_order(steps in prop::collection::vec(step(), 0..24)) {
        let backend = MockBackend::new();
        let mut h = VerifyingTestHarness::new(backend.clone(), false, false);

        let mut created: Vec<ModuleId> = Vec::new();
        let mut primary: Option<ModuleId> = None;
        for (i, step) in steps.iter().enumerate() {
            match step {
                Step::Create => created.push(h.create_module(&format!("m{i}")).id()),
                Step::TouchPrimary => {
                    let id = h.primary().id();
                    prop_assert!(primary.is_none_or(|p| p == id));
                    primary = Some(id);
                }
            }
        }

        let log = h.teardown();
        prop_assert!(log.is_empty());

        let expected: Vec<ModuleId> = primary.into_iter().chain(created.iter().copied()).collect();
        let verified: Vec<ModuleId> = backend.verify_calls().iter().map(|c| c.module).collect();
        prop_assert_eq!(verified, expected);
    }

    /// Teardown called n times verifies once and records n - 1 failures.
    #[test]
    fn extra_teardowns_never_reverify(modules in 0usize..6, calls in 1usize..5) {
        let backend = MockBackend::new();
        let mut h = VerifyingTestHarness::new(backend.clone(), false, false);
        for i in 0..modules {
            h.create_module(&format!("m{i}"));
        }

        for _ in 0..calls {
            h.teardown();
        }

        prop_assert_eq!(backend.verify_calls().len(), modules);
        prop_assert_eq!(h.failures().double_teardown_count(), calls - 1);
    }
}

#[test]
fn two_named_modules_verified_in_order_with_no_failures() {
    let backend = MockBackend::new();
    let mut h = VerifyingTestHarness::new(backend.clone(), false, false);

    let m0 = h.create_module("m0").id();
    let m1 = h.create_module("m1").id();
    assert_ne!(m0, m1);

    let log = h.teardown();
    assert!(log.is_empty());
    assert_eq!(backend.verified_names(), vec!["m0", "m1"]);
    assert_eq!(backend.verify_count(m0), 1);
    assert_eq!(backend.verify_count(m1), 1);
}

#[test]
fn modules_iterate_in_verification_order() {
    let backend = MockBackend::new();
    let mut h = VerifyingTestHarness::new(backend, false, false);
    h.create_module("a");
    h.create_module("b");
    h.primary();

    let names: Vec<&str> = h.modules().map(|m| m.name()).collect();
    assert_eq!(names, vec!["test_module", "a", "b"]);
    assert_eq!(h.module_count(), 3);
    h.teardown();
}
