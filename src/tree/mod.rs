// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The resolution tree: a directed graph of canonical forms.
//!
//! Despite the name it is a general graph. Nodes are canonical forms, edges go
//! from a parent to each distinct canonical child, and a child that is already
//! present just gains an edge. Cycles therefore appear as back edges and fixed
//! points as self-loops. Nodes and edges are never removed.
//!
//! The tree is owned by the caller and mutated in place by the builder, so an
//! exploration that ran out of budget can be resumed on the same tree.

pub mod cycles;
pub mod export;

pub use cycles::{find_cycle, shortest_cycle_through};
pub use export::{ExportNode, TreeExport};

use crate::normal_form::{CanonicalForm, Variant};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, VecDeque};

pub type NodeId = usize;

/// Expansion state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeState {
    /// Discovered, children unknown.
    Unexpanded,
    /// Blowup in progress.
    Expanding,
    /// Every child has been recorded.
    Expanded,
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub form: CanonicalForm,
    pub state: NodeState,
    /// The smooth representative: expanded with no children.
    pub terminal: bool,
}

#[derive(Debug, Clone)]
pub struct ResolutionTree {
    variant: Variant,
    nodes: Vec<TreeNode>,
    index: HashMap<CanonicalForm, NodeId>,
    edges: Vec<BTreeSet<NodeId>>,
    complete: bool,
}

impl ResolutionTree {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            nodes: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            complete: true,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(BTreeSet::len).sum()
    }

    /// Add `form` if it is new. Returns its id either way.
    pub fn insert(&mut self, form: CanonicalForm) -> NodeId {
        if let Some(&id) = self.index.get(&form) {
            return id;
        }
        let id = self.nodes.len();
        self.index.insert(form.clone(), id);
        self.nodes.push(TreeNode {
            form,
            state: NodeState::Unexpanded,
            terminal: false,
        });
        self.edges.push(BTreeSet::new());
        id
    }

    pub fn id(&self, form: &CanonicalForm) -> Option<NodeId> {
        self.index.get(form).copied()
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    pub fn form(&self, id: NodeId) -> &CanonicalForm {
        &self.nodes[id].form
    }

    pub fn state(&self, id: NodeId) -> NodeState {
        self.nodes[id].state
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &TreeNode)> + '_ {
        self.nodes.iter().enumerate()
    }

    pub(crate) fn set_state(&mut self, id: NodeId, state: NodeState) {
        self.nodes[id].state = state;
    }

    /// Mark `id` as the smooth representative: expanded, no children.
    pub fn mark_terminal(&mut self, id: NodeId) {
        let node = &mut self.nodes[id];
        node.terminal = true;
        node.state = NodeState::Expanded;
    }

    /// Add the edge `parent -> child`. Returns false if it was already present.
    pub fn add_edge(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.edges[parent].insert(child)
    }

    pub fn has_edge(&self, parent: NodeId, child: NodeId) -> bool {
        self.edges[parent].contains(&child)
    }

    /// Children in ascending id order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.edges[id].iter().copied()
    }

    /// All edges, sorted.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .flat_map(|(parent, children)| children.iter().map(move |&child| (parent, child)))
    }

    /// False once an exploration ran out of budget and left nodes unexpanded.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub(crate) fn set_complete(&mut self, complete: bool) {
        self.complete = complete;
    }

    /// Nodes reachable from `root` (including it), in ascending id order.
    pub fn reachable_from(&self, root: NodeId) -> Vec<NodeId> {
        let mut seen = vec![false; self.nodes.len()];
        let mut queue = VecDeque::from([root]);
        seen[root] = true;
        while let Some(id) = queue.pop_front() {
            for child in self.children(id) {
                if !seen[child] {
                    seen[child] = true;
                    queue.push_back(child);
                }
            }
        }
        (0..self.nodes.len()).filter(|&id| seen[id]).collect()
    }

    /// Does some path from `root` reach the smooth representative?
    pub fn is_resolved(&self, root: NodeId) -> bool {
        self.reachable_from(root)
            .into_iter()
            .any(|id| self.nodes[id].terminal)
    }

    /// Reachable nodes whose children are not known yet.
    pub fn unresolved_leaves(&self, root: NodeId) -> Vec<NodeId> {
        self.reachable_from(root)
            .into_iter()
            .filter(|&id| self.nodes[id].state != NodeState::Expanded)
            .collect()
    }

    /// Length of a shortest path from `root` to a terminal node, if any.
    pub fn resolution_depth(&self, root: NodeId) -> Option<usize> {
        let mut depth = vec![None; self.nodes.len()];
        let mut queue = VecDeque::from([root]);
        depth[root] = Some(0);
        while let Some(id) = queue.pop_front() {
            let d = depth[id].unwrap_or(0);
            if self.nodes[id].terminal {
                return Some(d);
            }
            for child in self.children(id) {
                if depth[child].is_none() {
                    depth[child] = Some(d + 1);
                    queue.push_back(child);
                }
            }
        }
        None
    }
}
