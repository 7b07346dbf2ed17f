// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Integration tests for single blowup steps.

mod common;

use common::{a1, matrix, BrokenNewtonEngine};
use nash_blowup::blowup::{step_for, NonNormalizedBlowup, NormalizedBlowup};
use nash_blowup::memo::MemoStore;
use nash_blowup::tree::NodeState;
use nash_blowup::{
    canonical_form, BlowupStep, CanonicalForm, Characteristic, ExactEngine, ExplorationBudget,
    GeneratorMatrix, NashError, ResolutionTree, ResolutionTreeBuilder, Variant,
};

fn children(step: &dyn BlowupStep, m: &GeneratorMatrix) -> Vec<CanonicalForm> {
    let engine = ExactEngine::new();
    let mut forms: Vec<CanonicalForm> = step
        .blowup(&engine, m)
        .unwrap()
        .iter()
        .map(|c| canonical_form(&engine, step.variant(), c).unwrap())
        .collect();
    forms.sort();
    forms.dedup();
    forms
}

#[test]
fn test_identity_is_a_fixed_point() {
    for dim in 2..=3 {
        for variant in [Variant::Cone, Variant::Semigroup] {
            let step = step_for(variant, Characteristic::Zero);
            let kids = children(step.as_ref(), &GeneratorMatrix::identity(dim));
            assert_eq!(kids, vec![CanonicalForm::identity(dim)], "{} dim {}", variant, dim);
        }
    }
}

#[test]
fn test_a1_resolves_in_one_step() {
    let kids = children(&NormalizedBlowup::default(), &a1());
    assert_eq!(kids, vec![CanonicalForm::identity(2)]);
}

#[test]
fn test_blowup_is_deterministic() {
    let engine = ExactEngine::new();
    let x = matrix(&[&[1, 0, 0], &[0, 1, 0], &[1, 1, 2]]);
    for variant in [Variant::Cone, Variant::Semigroup] {
        let step = step_for(variant, Characteristic::Zero);
        let first = step.blowup(&engine, &x).unwrap();
        let second = step.blowup(&engine, &x).unwrap();
        assert_eq!(first, second, "{}", variant);
    }
}

#[test]
fn test_prime_characteristic_changes_nothing_for_smooth_input() {
    for p in [2, 3] {
        let step = NonNormalizedBlowup::new(Characteristic::prime(p).unwrap());
        let kids = children(&step, &GeneratorMatrix::identity(2));
        assert_eq!(kids, vec![CanonicalForm::identity(2)]);
    }
}

#[test]
fn test_characteristic_two_keeps_a_singular_chart() {
    // The A1 semigroup in M. Its determinant-2 pair vanishes mod 2.
    let cusp = matrix(&[&[1, 0], &[1, 1], &[1, 2]]);
    let engine = ExactEngine::new();

    let zero = children(&NonNormalizedBlowup::new(Characteristic::Zero), &cusp);
    assert_eq!(zero, vec![CanonicalForm::identity(2)]);

    let two = children(
        &NonNormalizedBlowup::new(Characteristic::prime(2).unwrap()),
        &cusp,
    );
    let non_normal = canonical_form(
        &engine,
        Variant::Semigroup,
        &matrix(&[&[1, 0], &[1, 1], &[0, 2]]),
    )
    .unwrap();
    assert_eq!(two, vec![non_normal.clone()]);

    // The builder sees the same difference one level down.
    for (characteristic, expected) in [
        (Characteristic::Zero, CanonicalForm::identity(2)),
        (Characteristic::prime(2).unwrap(), non_normal),
    ] {
        let builder = ResolutionTreeBuilder::new(Box::new(NonNormalizedBlowup::new(characteristic)))
            .with_budget(ExplorationBudget::default().with_max_depth(1));
        let mut tree = ResolutionTree::new(Variant::Semigroup);
        let mut memo = MemoStore::new(Variant::Semigroup, characteristic);
        if let Err(err) = builder.explore(&cusp, &mut tree, &mut memo) {
            assert!(err.is_resource_exceeded(), "{}", err);
        }
        let root = tree
            .id(&canonical_form(&engine, Variant::Semigroup, &cusp).unwrap())
            .unwrap();
        let kids: Vec<&CanonicalForm> = tree.children(root).map(|c| tree.form(c)).collect();
        assert_eq!(kids, vec![&expected], "characteristic {}", characteristic);
    }
}

#[test]
fn test_invalid_input_is_reported() {
    let line = matrix(&[&[1, 0], &[-1, 0], &[0, 1]]);
    for variant in [Variant::Cone, Variant::Semigroup] {
        let err = step_for(variant, Characteristic::Zero)
            .blowup(&ExactEngine::new(), &line)
            .unwrap_err();
        assert!(matches!(err, NashError::InvalidInput(_)), "{}", err);
    }
}

#[test]
fn test_engine_failure_is_not_an_empty_result() {
    let engine = BrokenNewtonEngine::default();
    for variant in [Variant::Cone, Variant::Semigroup] {
        let err = step_for(variant, Characteristic::Zero)
            .blowup(&engine, &a1())
            .unwrap_err();
        assert!(matches!(err, NashError::ExternalComputation(_)), "{}", err);
    }
}

#[test]
fn test_engine_failure_leaves_node_unexpanded() {
    let builder = ResolutionTreeBuilder::new(Box::new(NormalizedBlowup::default()))
        .with_engine(Box::new(BrokenNewtonEngine::default()));
    let mut tree = ResolutionTree::new(Variant::Cone);
    let mut memo = MemoStore::new(Variant::Cone, Characteristic::Zero);

    let err = builder.explore(&a1(), &mut tree, &mut memo).unwrap_err();
    assert!(matches!(err, NashError::ExternalComputation(_)), "{}", err);
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.state(0), NodeState::Unexpanded);
    assert!(!tree.is_complete());
    assert!(memo.is_empty());

    // A working engine can pick up where the broken one stopped.
    let builder = ResolutionTreeBuilder::new(Box::new(NormalizedBlowup::default()));
    let exploration = builder.explore(&a1(), &mut tree, &mut memo).unwrap();
    assert_eq!(exploration.root, 0);
    assert!(tree.is_resolved(0));
    assert!(tree.is_complete());
}
