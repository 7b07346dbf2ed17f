// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Resolution tree builder.
//!
//! The builder repeatedly blows up, canonicalizes and records, driving an
//! explicit breadth-first worklist instead of recursion, so stack usage does not
//! depend on how deep the tree grows.
//!
//! # Node lifecycle
//!
//! `Unexpanded → Expanding → Expanded`. A node is expanded at most once: its
//! children are taken from the memo store when present, and otherwise computed,
//! canonicalized and recorded there. A child that is already in the graph only
//! gains an edge, which is how cycles and fixed points are represented. The
//! smooth representative is expanded with no children and marked terminal.
//!
//! # Budget
//!
//! Each call expands at most `max_nodes` nodes and leaves nodes at depth
//! `max_depth` unexpanded. Running out of either marks the tree incomplete and
//! returns `ResourceExceeded`; the tree and memo store keep everything found so
//! far, so a later call with a larger budget resumes where this one stopped.
//!
//! # Example
//!
//! ```
//! use nash_blowup::blowup::{Characteristic, NormalizedBlowup};
//! use nash_blowup::engine::ResolutionTreeBuilder;
//! use nash_blowup::lattice::GeneratorMatrix;
//! use nash_blowup::memo::MemoStore;
//! use nash_blowup::normal_form::Variant;
//! use nash_blowup::tree::ResolutionTree;
//!
//! let a1 = GeneratorMatrix::from_rows(vec![vec![1, 1], vec![0, 2]]).unwrap();
//! let builder = ResolutionTreeBuilder::new(Box::new(NormalizedBlowup::new(Characteristic::Zero)));
//! let mut tree = ResolutionTree::new(Variant::Cone);
//! let mut memo = MemoStore::new(Variant::Cone, Characteristic::Zero);
//!
//! let exploration = builder.explore(&a1, &mut tree, &mut memo).unwrap();
//! assert!(tree.is_resolved(exploration.root));
//! assert_eq!(tree.resolution_depth(exploration.root), Some(1));
//! ```

pub mod parallel;
pub mod statistics;

pub use parallel::{ParallelExploration, ParallelExplorer};
pub use statistics::{Counters, Statistics};

use crate::blowup::BlowupStep;
use crate::config::ExplorationBudget;
use crate::error::NashError;
use crate::geometry::{ExactEngine, GeometryEngine};
use crate::lattice::GeneratorMatrix;
use crate::memo::{Claim, MemoStore};
use crate::normal_form::{canonical_form, CanonicalForm};
use crate::tree::{NodeId, NodeState, ResolutionTree};
use std::collections::{HashSet, VecDeque};
use std::fmt;
use tracing::{debug, info, warn};

/// Which part of the budget ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetLimit {
    Nodes(usize),
    Depth(usize),
}

impl fmt::Display for BudgetLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetLimit::Nodes(n) => write!(f, "node budget of {} expansions", n),
            BudgetLimit::Depth(d) => write!(f, "depth limit of {}", d),
        }
    }
}

/// Outcome of a successful exploration.
#[derive(Debug, Clone)]
pub struct Exploration {
    pub root: NodeId,
    /// Nodes expanded by this call (memo hits excluded).
    pub expanded: usize,
    /// Nodes visited by this call.
    pub visited: usize,
    pub statistics: Statistics,
}

pub struct ResolutionTreeBuilder {
    step: Box<dyn BlowupStep>,
    engine: Box<dyn GeometryEngine>,
    budget: ExplorationBudget,
}

impl fmt::Debug for ResolutionTreeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionTreeBuilder")
            .field("step", &self.step)
            .field("engine", &self.engine.name())
            .field("budget", &self.budget)
            .finish()
    }
}

impl ResolutionTreeBuilder {
    pub fn new(step: Box<dyn BlowupStep>) -> Self {
        Self {
            step,
            engine: Box::new(ExactEngine::default()),
            budget: ExplorationBudget::default(),
        }
    }

    pub fn with_engine(mut self, engine: Box<dyn GeometryEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_budget(mut self, budget: ExplorationBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn budget(&self) -> ExplorationBudget {
        self.budget
    }

    /// Canonical form of `matrix` for this builder's variant.
    pub fn canonicalize(&self, matrix: &GeneratorMatrix) -> Result<CanonicalForm, NashError> {
        canonical_form(self.engine.as_ref(), self.step.variant(), matrix)
    }

    /// Canonical children of `form`, sorted and distinct.
    pub fn children_of(&self, form: &CanonicalForm) -> Result<Vec<CanonicalForm>, NashError> {
        Ok(expand_form(self.step.as_ref(), self.engine.as_ref(), form)?.0)
    }

    /// Explore from `root`, growing `tree` and `memo` in place.
    ///
    /// Fails with `InvalidInput` (before touching the tree) if `root` is not
    /// blowup-eligible or the tree or memo store belong to another variant.
    pub fn explore(
        &self,
        root: &GeneratorMatrix,
        tree: &mut ResolutionTree,
        memo: &mut MemoStore,
    ) -> Result<Exploration, NashError> {
        check_handles(self.step.as_ref(), tree, memo)?;
        let root_form = self.canonicalize(root)?;
        let terminal = CanonicalForm::identity(root_form.dim());
        let root_id = tree.insert(root_form);
        info!(
            variant = %self.step.variant(),
            characteristic = %self.step.characteristic(),
            root = %tree.form(root_id),
            max_nodes = self.budget.max_nodes,
            max_depth = self.budget.max_depth,
            "exploring"
        );

        let mut statistics = Statistics::new();
        let mut queue: VecDeque<(NodeId, usize)> = VecDeque::from([(root_id, 0)]);
        let mut seen: HashSet<NodeId> = HashSet::from([root_id]);
        let mut expanded = 0usize;
        let mut cut_off = false;

        while let Some((id, depth)) = queue.pop_front() {
            let form = tree.form(id).clone();
            if form == terminal {
                if !tree.node(id).terminal {
                    tree.mark_terminal(id);
                    memo.record(form, Vec::new());
                    statistics.increment(Counters::TerminalNodes);
                }
                continue;
            }

            if tree.state(id) != NodeState::Expanded {
                if depth >= self.budget.max_depth {
                    cut_off = true;
                    statistics.increment(Counters::DepthCutoffs);
                    continue;
                }
                let children = match memo.claim(&form) {
                    Claim::Done(children) => {
                        statistics.increment(Counters::MemoHits);
                        debug!(node = %form, children = children.len(), "memo hit");
                        children
                    }
                    Claim::Claimed | Claim::InProgress => {
                        if expanded >= self.budget.max_nodes {
                            memo.release(&form);
                            tree.set_complete(false);
                            warn!(expanded, "node budget exhausted");
                            return Err(NashError::ResourceExceeded {
                                limit: BudgetLimit::Nodes(self.budget.max_nodes),
                                expanded,
                            });
                        }
                        tree.set_state(id, NodeState::Expanding);
                        let (children, duplicates) =
                            match expand_form(self.step.as_ref(), self.engine.as_ref(), &form) {
                                Ok(result) => result,
                                Err(err) => {
                                    memo.release(&form);
                                    tree.set_state(id, NodeState::Unexpanded);
                                    tree.set_complete(false);
                                    warn!(node = %form, error = %err, "expansion failed");
                                    return Err(err);
                                }
                            };
                        expanded += 1;
                        statistics.increment(Counters::NodesExpanded);
                        statistics.add(Counters::DuplicateChildren, duplicates as u64);
                        debug!(node = %form, depth, children = children.len(), "expanded");
                        memo.record(form, children.clone());
                        children
                    }
                };
                attach_children(tree, id, children);
                statistics.add(
                    Counters::ChildrenProduced,
                    tree.children(id).count() as u64,
                );
            }

            for child in tree.children(id).collect::<Vec<_>>() {
                if seen.insert(child) {
                    queue.push_back((child, depth + 1));
                }
            }
        }

        let visited = seen.len();
        if cut_off {
            tree.set_complete(false);
            warn!(max_depth = self.budget.max_depth, "depth limit reached");
            return Err(NashError::ResourceExceeded {
                limit: BudgetLimit::Depth(self.budget.max_depth),
                expanded,
            });
        }
        let complete = tree
            .nodes()
            .all(|(_, node)| node.state == NodeState::Expanded);
        tree.set_complete(complete);
        info!(nodes = tree.len(), edges = tree.edge_count(), %statistics, "exploration finished");
        Ok(Exploration {
            root: root_id,
            expanded,
            visited,
            statistics,
        })
    }
}

/// Tree and memo store must have been built for the same blowup as `step`.
pub(crate) fn check_handles(
    step: &dyn BlowupStep,
    tree: &ResolutionTree,
    memo: &MemoStore,
) -> Result<(), NashError> {
    if tree.variant() != step.variant() {
        return Err(NashError::invalid(format!(
            "tree holds {} nodes but the blowup step is for {}",
            tree.variant(),
            step.variant()
        )));
    }
    memo.check_compatible(step.variant(), step.characteristic())
}

/// Blow up `form` and canonicalize the children. Returns the distinct children,
/// sorted, and how many duplicates were dropped.
pub(crate) fn expand_form(
    step: &dyn BlowupStep,
    engine: &dyn GeometryEngine,
    form: &CanonicalForm,
) -> Result<(Vec<CanonicalForm>, usize), NashError> {
    let raw = step.blowup(engine, form.matrix())?;
    let total = raw.len();
    let mut children = raw
        .iter()
        .map(|child| canonical_form(engine, step.variant(), child))
        .collect::<Result<Vec<_>, _>>()?;
    children.sort();
    children.dedup();
    let duplicates = total - children.len();
    Ok((children, duplicates))
}

/// Add `children` under `id` and mark it expanded.
pub(crate) fn attach_children(tree: &mut ResolutionTree, id: NodeId, children: Vec<CanonicalForm>) {
    for child in children {
        let child_id = tree.insert(child);
        tree.add_edge(id, child_id);
    }
    tree.set_state(id, NodeState::Expanded);
}
