// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Multi-worker exploration of one or more roots.
//!
//! Workers share the caller's tree and memo store behind one mutex and pop
//! nodes from a shared worklist. The blowup itself runs outside the lock; a
//! worker first claims the node's canonical form in the memo store, so each
//! form is expanded by at most one worker. Workers with nothing to do wait on a
//! condition variable until either new work appears or every worker is idle.

use super::{attach_children, check_handles, expand_form, BudgetLimit, Counters, Statistics};
use crate::blowup::BlowupStep;
use crate::config::ExplorationBudget;
use crate::error::NashError;
use crate::geometry::{ExactEngine, GeometryEngine};
use crate::lattice::GeneratorMatrix;
use crate::memo::{Claim, MemoStore};
use crate::normal_form::{canonical_form, CanonicalForm};
use crate::tree::{NodeId, NodeState, ResolutionTree};
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;
use tracing::{debug, info, warn};

/// Outcome of a successful parallel exploration.
#[derive(Debug, Clone)]
pub struct ParallelExploration {
    /// Node of every root, in input order.
    pub roots: Vec<NodeId>,
    pub expanded: usize,
    pub statistics: Statistics,
}

#[derive(Debug, Clone)]
pub struct ParallelExplorer {
    step: Arc<dyn BlowupStep>,
    engine: Arc<dyn GeometryEngine>,
    budget: ExplorationBudget,
    workers: usize,
}

/// Everything the workers share.
struct Shared<'a> {
    tree: &'a mut ResolutionTree,
    memo: &'a mut MemoStore,
    queue: VecDeque<(NodeId, usize)>,
    seen: HashSet<NodeId>,
    /// Workers currently running a blowup outside the lock.
    busy: usize,
    expanded: usize,
    cut_off: bool,
    stop: Option<NashError>,
    statistics: Statistics,
}

/// What a worker should do with a popped node.
enum Work {
    /// Nothing to compute; children (if any) are already in the tree.
    Done,
    Expand(NodeId, usize, CanonicalForm),
    /// Another worker is expanding this form; try again later.
    Defer(NodeId, usize),
}

impl ParallelExplorer {
    pub fn new(step: Arc<dyn BlowupStep>, workers: usize) -> Self {
        Self {
            step,
            engine: Arc::new(ExactEngine::default()),
            budget: ExplorationBudget::default(),
            workers: workers.max(1),
        }
    }

    pub fn with_engine(mut self, engine: Arc<dyn GeometryEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_budget(mut self, budget: ExplorationBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Explore every root into the shared `tree` and `memo`.
    ///
    /// Errors as for [`ResolutionTreeBuilder::explore`](super::ResolutionTreeBuilder::explore);
    /// the first failure stops all workers.
    pub fn explore(
        &self,
        roots: &[GeneratorMatrix],
        tree: &mut ResolutionTree,
        memo: &mut MemoStore,
    ) -> Result<ParallelExploration, NashError> {
        check_handles(self.step.as_ref(), tree, memo)?;
        let forms = roots
            .iter()
            .map(|m| canonical_form(self.engine.as_ref(), self.step.variant(), m))
            .collect::<Result<Vec<_>, _>>()?;
        let root_ids: Vec<NodeId> = forms.into_iter().map(|f| tree.insert(f)).collect();
        info!(
            roots = root_ids.len(),
            workers = self.workers,
            variant = %self.step.variant(),
            "parallel exploration"
        );

        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        for &id in &root_ids {
            if seen.insert(id) {
                queue.push_back((id, 0));
            }
        }
        let shared = Mutex::new(Shared {
            tree,
            memo,
            queue,
            seen,
            busy: 0,
            expanded: 0,
            cut_off: false,
            stop: None,
            statistics: Statistics::new(),
        });
        let wake = Condvar::new();

        thread::scope(|scope| {
            for worker in 0..self.workers {
                let shared = &shared;
                let wake = &wake;
                scope.spawn(move || self.work(worker, shared, wake));
            }
        });

        let shared = shared.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(err) = shared.stop {
            shared.tree.set_complete(false);
            return Err(err);
        }
        if shared.cut_off {
            shared.tree.set_complete(false);
            return Err(NashError::ResourceExceeded {
                limit: BudgetLimit::Depth(self.budget.max_depth),
                expanded: shared.expanded,
            });
        }
        let complete = shared
            .tree
            .nodes()
            .all(|(_, node)| node.state == NodeState::Expanded);
        shared.tree.set_complete(complete);
        info!(
            nodes = shared.tree.len(),
            statistics = %shared.statistics,
            "parallel exploration finished"
        );
        Ok(ParallelExploration {
            roots: root_ids,
            expanded: shared.expanded,
            statistics: shared.statistics,
        })
    }

    fn work(&self, worker: usize, shared: &Mutex<Shared<'_>>, wake: &Condvar) {
        let mut guard = lock(shared);
        loop {
            if guard.stop.is_some() {
                wake.notify_all();
                break;
            }
            let Some((id, depth)) = guard.queue.pop_front() else {
                if guard.busy == 0 {
                    wake.notify_all();
                    break;
                }
                guard = wake.wait(guard).unwrap_or_else(|poisoned| poisoned.into_inner());
                continue;
            };

            match self.triage(&mut guard, id, depth) {
                Work::Done => self.enqueue_children(&mut guard, id, depth),
                Work::Defer(id, depth) => {
                    guard.queue.push_back((id, depth));
                    guard = wake.wait(guard).unwrap_or_else(|poisoned| poisoned.into_inner());
                }
                Work::Expand(id, depth, form) => {
                    guard.busy += 1;
                    drop(guard);
                    let result = expand_form(self.step.as_ref(), self.engine.as_ref(), &form);
                    guard = lock(shared);
                    guard.busy -= 1;
                    match result {
                        Ok((children, duplicates)) => {
                            guard.expanded += 1;
                            guard.statistics.increment(Counters::NodesExpanded);
                            guard
                                .statistics
                                .add(Counters::DuplicateChildren, duplicates as u64);
                            guard
                                .statistics
                                .add(Counters::ChildrenProduced, children.len() as u64);
                            debug!(worker, node = %form, depth, children = children.len(), "expanded");
                            guard.memo.record(form, children.clone());
                            attach_children(&mut *guard.tree, id, children);
                            self.enqueue_children(&mut guard, id, depth);
                        }
                        Err(err) => {
                            warn!(worker, node = %form, error = %err, "expansion failed");
                            guard.memo.release(&form);
                            guard.tree.set_state(id, NodeState::Unexpanded);
                            if guard.stop.is_none() {
                                guard.stop = Some(err);
                            }
                        }
                    }
                    wake.notify_all();
                }
            }
        }
    }

    /// Decide, under the lock, what popped node `id` needs.
    fn triage(&self, shared: &mut Shared<'_>, id: NodeId, depth: usize) -> Work {
        let form = shared.tree.form(id).clone();
        if form.is_identity() {
            if !shared.tree.node(id).terminal {
                shared.tree.mark_terminal(id);
                shared.memo.record(form, Vec::new());
                shared.statistics.increment(Counters::TerminalNodes);
            }
            return Work::Done;
        }
        if shared.tree.state(id) == NodeState::Expanded {
            return Work::Done;
        }
        if depth >= self.budget.max_depth {
            shared.cut_off = true;
            shared.statistics.increment(Counters::DepthCutoffs);
            return Work::Done;
        }
        match shared.memo.claim(&form) {
            Claim::Done(children) => {
                shared.statistics.increment(Counters::MemoHits);
                shared
                    .statistics
                    .add(Counters::ChildrenProduced, children.len() as u64);
                attach_children(&mut *shared.tree, id, children);
                Work::Done
            }
            Claim::InProgress if shared.busy > 0 => Work::Defer(id, depth),
            Claim::Claimed | Claim::InProgress => {
                if shared.expanded + shared.busy >= self.budget.max_nodes {
                    shared.memo.release(&form);
                    warn!(expanded = shared.expanded, "node budget exhausted");
                    shared.stop = Some(NashError::ResourceExceeded {
                        limit: BudgetLimit::Nodes(self.budget.max_nodes),
                        expanded: shared.expanded,
                    });
                    return Work::Done;
                }
                shared.tree.set_state(id, NodeState::Expanding);
                Work::Expand(id, depth, form)
            }
        }
    }

    fn enqueue_children(&self, shared: &mut Shared<'_>, id: NodeId, depth: usize) {
        let children: Vec<NodeId> = shared.tree.children(id).collect();
        for child in children {
            if shared.seen.insert(child) {
                shared.queue.push_back((child, depth + 1));
            }
        }
    }
}

fn lock<'m, 'a>(shared: &'m Mutex<Shared<'a>>) -> MutexGuard<'m, Shared<'a>> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
