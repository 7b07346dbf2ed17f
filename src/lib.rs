// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Iterated Nash blowups of affine toric varieties.
//!
//! A toric variety is given by an integer generator matrix: the rays of a
//! strongly convex cone (the normalized variant) or the generators of an affine
//! semigroup (the non-normalized variant). One Nash blowup step produces finitely
//! many charts, each again a cone or semigroup. Repeating the step builds a
//! directed graph that may resolve to smooth charts, revisit earlier charts, or
//! grow until a budget runs out.
//!
//! # Architecture
//!
//! - [`lattice`]: integer vectors, generator matrices and exact determinants.
//! - [`geometry`]: facets, Hilbert bases, minimal generators and Newton
//!   polyhedra behind the [`GeometryEngine`] trait.
//! - [`normal_form`]: the canonical form that identifies equivalent charts.
//! - [`blowup`]: the two blowup steps behind the [`BlowupStep`] trait.
//! - [`tree`], [`memo`] and [`engine`]: the resolution graph, the persistent
//!   memo of expansions, and the sequential and parallel explorers.
//!
//! # Example
//!
//! ```
//! use nash_blowup::blowup::{Characteristic, NormalizedBlowup};
//! use nash_blowup::{GeneratorMatrix, MemoStore, ResolutionTree, ResolutionTreeBuilder, Variant};
//!
//! let root = GeneratorMatrix::from_columns(2, vec![vec![1, 0], vec![1, 2]]).unwrap();
//! let builder = ResolutionTreeBuilder::new(Box::new(NormalizedBlowup::default()));
//! let mut tree = ResolutionTree::new(Variant::Cone);
//! let mut memo = MemoStore::new(Variant::Cone, Characteristic::Zero);
//!
//! let exploration = builder.explore(&root, &mut tree, &mut memo).unwrap();
//! assert!(tree.is_resolved(exploration.root));
//! ```

pub mod blowup;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod lattice;
pub mod memo;
pub mod normal_form;
pub mod tree;
pub mod validate;

// Re-export commonly used types
pub use blowup::{BlowupStep, Characteristic};
pub use config::ExplorationBudget;
pub use engine::{ParallelExplorer, ResolutionTreeBuilder};
pub use error::NashError;
pub use geometry::{ExactEngine, GeometryEngine};
pub use lattice::GeneratorMatrix;
pub use memo::MemoStore;
pub use normal_form::{canonical_form, CanonicalForm, Variant};
pub use tree::ResolutionTree;
