// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Known inputs on which iterated Nash blowups do not resolve.
//!
//! - A four-dimensional cone, given through the generators of its dual, that
//!   is a normalized blowup chart of itself.
//! - A three-dimensional semigroup that returns to itself after two
//!   non-normalized blowups.

mod common;

use common::matrix;
use nash_blowup::blowup::{cone_from_dual, NonNormalizedBlowup, NormalizedBlowup};
use nash_blowup::tree::{find_cycle, shortest_cycle_through};
use nash_blowup::{
    canonical_form, Characteristic, ExactEngine, ExplorationBudget, GeneratorMatrix, MemoStore,
    NashError, ResolutionTree, ResolutionTreeBuilder, Variant,
};

/// Columns generate `σ^∨`.
fn self_similar_dual() -> GeneratorMatrix {
    matrix(&[
        &[1, 0, 0, 0],
        &[0, 1, 0, 0],
        &[0, 0, 1, 0],
        &[0, 0, 0, 1],
        &[2, 3, -2, -1],
        &[1, 3, -1, -1],
    ])
}

fn returning_semigroup() -> GeneratorMatrix {
    matrix(&[
        &[1, 0, 0],
        &[0, 1, 0],
        &[0, 0, 1],
        &[-2, -1, 2],
        &[1, -1, 1],
        &[2, -2, 1],
    ])
}

/// The depth limit only cuts off the part of the graph these tests ignore.
fn accept_partial<T>(outcome: Result<T, NashError>) {
    if let Err(err) = outcome {
        assert!(err.is_resource_exceeded(), "{}", err);
    }
}

#[test]
fn test_cone_is_its_own_child() {
    let engine = ExactEngine::new();
    let root = cone_from_dual(&engine, &self_similar_dual()).unwrap();
    let builder = ResolutionTreeBuilder::new(Box::new(NormalizedBlowup::new(Characteristic::Zero)))
        .with_budget(ExplorationBudget::default().with_max_depth(1));
    let mut tree = ResolutionTree::new(Variant::Cone);
    let mut memo = MemoStore::new(Variant::Cone, Characteristic::Zero);

    accept_partial(builder.explore(&root, &mut tree, &mut memo));

    let form = canonical_form(&engine, Variant::Cone, &root).unwrap();
    let id = tree.id(&form).unwrap();
    assert!(tree.has_edge(id, id));
    assert_eq!(shortest_cycle_through(&tree, id), Some(vec![id]));
    assert_eq!(find_cycle(&tree, id), Some(vec![id]));
    assert!(memo.children(&form).unwrap().contains(&form));
}

#[test]
fn test_semigroup_returns_after_two_steps() {
    let root = returning_semigroup();
    let builder =
        ResolutionTreeBuilder::new(Box::new(NonNormalizedBlowup::new(Characteristic::Zero)))
            .with_budget(ExplorationBudget::default().with_max_depth(2));
    let mut tree = ResolutionTree::new(Variant::Semigroup);
    let mut memo = MemoStore::new(Variant::Semigroup, Characteristic::Zero);

    accept_partial(builder.explore(&root, &mut tree, &mut memo));

    let form = canonical_form(&ExactEngine::new(), Variant::Semigroup, &root).unwrap();
    let id = tree.id(&form).unwrap();
    let returning: Vec<_> = tree
        .children(id)
        .filter(|&child| child != id && tree.has_edge(child, id))
        .collect();
    assert!(!returning.is_empty());

    assert!(!tree.has_edge(id, id));
    let cycle = shortest_cycle_through(&tree, id).unwrap();
    assert_eq!(cycle.len(), 2);
    assert_eq!(cycle[0], id);
    assert!(returning.contains(&cycle[1]));
}
