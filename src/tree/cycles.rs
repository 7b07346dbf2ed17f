// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Read-only cycle queries.
//!
//! A cycle is returned as the list of nodes along it, starting anywhere, each
//! with an edge to the next and the last with an edge back to the first. A
//! fixed point is a cycle of length one.

use super::{NodeId, ResolutionTree};
use std::collections::VecDeque;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Finished,
}

/// Some directed cycle reachable from `root`, if there is one.
///
/// Iterative depth-first search, so deep graphs cannot overflow the stack.
pub fn find_cycle(tree: &ResolutionTree, root: NodeId) -> Option<Vec<NodeId>> {
    let mut mark = vec![Mark::Unvisited; tree.len()];
    // (node, its children, next child to try)
    let mut stack: Vec<(NodeId, Vec<NodeId>, usize)> = Vec::new();
    mark[root] = Mark::OnPath;
    stack.push((root, tree.children(root).collect(), 0));

    while let Some((node, children, next)) = stack.last_mut() {
        let Some(&child) = children.get(*next) else {
            mark[*node] = Mark::Finished;
            stack.pop();
            continue;
        };
        *next += 1;
        match mark[child] {
            Mark::OnPath => {
                let start = stack.iter().position(|(n, _, _)| *n == child)?;
                return Some(stack[start..].iter().map(|(n, _, _)| *n).collect());
            }
            Mark::Unvisited => {
                mark[child] = Mark::OnPath;
                stack.push((child, tree.children(child).collect(), 0));
            }
            Mark::Finished => {}
        }
    }
    None
}

/// A shortest cycle through `node`, if there is one.
pub fn shortest_cycle_through(tree: &ResolutionTree, node: NodeId) -> Option<Vec<NodeId>> {
    if tree.has_edge(node, node) {
        return Some(vec![node]);
    }
    let mut parent: Vec<Option<NodeId>> = vec![None; tree.len()];
    let mut queue = VecDeque::new();
    for child in tree.children(node) {
        parent[child] = Some(node);
        queue.push_back(child);
    }
    while let Some(current) = queue.pop_front() {
        if tree.has_edge(current, node) {
            let mut path = vec![current];
            let mut at = current;
            while let Some(p) = parent[at] {
                if p == node {
                    break;
                }
                path.push(p);
                at = p;
            }
            path.push(node);
            path.reverse();
            return Some(path);
        }
        for child in tree.children(current) {
            if child != node && parent[child].is_none() {
                parent[child] = Some(current);
                queue.push_back(child);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normal_form::{CanonicalForm, Variant};

    /// A graph on distinct dummy forms (identity matrices of growing dimension).
    fn graph(n: usize, edges: &[(NodeId, NodeId)]) -> ResolutionTree {
        let mut tree = ResolutionTree::new(Variant::Cone);
        for d in 1..=n {
            tree.insert(CanonicalForm::identity(d));
        }
        for &(a, b) in edges {
            tree.add_edge(a, b);
        }
        tree
    }

    #[test]
    fn test_acyclic() {
        let tree = graph(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        assert_eq!(find_cycle(&tree, 0), None);
        assert_eq!(shortest_cycle_through(&tree, 0), None);
    }

    #[test]
    fn test_self_loop() {
        let tree = graph(2, &[(0, 1), (1, 1)]);
        assert_eq!(find_cycle(&tree, 0), Some(vec![1]));
        assert_eq!(shortest_cycle_through(&tree, 1), Some(vec![1]));
        assert_eq!(shortest_cycle_through(&tree, 0), None);
    }

    #[test]
    fn test_two_cycle() {
        let tree = graph(3, &[(0, 1), (1, 2), (1, 0)]);
        assert_eq!(find_cycle(&tree, 0), Some(vec![0, 1]));
        assert_eq!(shortest_cycle_through(&tree, 0), Some(vec![0, 1]));
        assert_eq!(shortest_cycle_through(&tree, 1), Some(vec![1, 0]));
    }

    #[test]
    fn test_shortest_of_several() {
        // 0 -> 1 -> 2 -> 3 -> 0 and 0 -> 4 -> 0
        let tree = graph(5, &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 4), (4, 0)]);
        assert_eq!(shortest_cycle_through(&tree, 0), Some(vec![0, 4]));
        let cycle = find_cycle(&tree, 0).unwrap();
        assert_eq!(cycle[0], 0);
    }

    #[test]
    fn test_cycle_not_reachable_from_root() {
        let tree = graph(3, &[(1, 2), (2, 1)]);
        assert_eq!(find_cycle(&tree, 0), None);
        assert!(find_cycle(&tree, 1).is_some());
    }
}
