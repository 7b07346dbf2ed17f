// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Node list plus edge list, for consumers outside the crate.

use super::{NodeId, NodeState, ResolutionTree};
use crate::error::NashError;
use crate::normal_form::{CanonicalForm, Variant};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportNode {
    pub id: NodeId,
    pub matrix: CanonicalForm,
    pub state: NodeState,
    pub terminal: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeExport {
    pub variant: Variant,
    pub complete: bool,
    pub nodes: Vec<ExportNode>,
    /// `(parent, child)` pairs, sorted.
    pub edges: Vec<(NodeId, NodeId)>,
}

impl TreeExport {
    pub fn to_json(&self) -> Result<String, NashError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), NashError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Is any terminal node present?
    pub fn has_terminal(&self) -> bool {
        self.nodes.iter().any(|n| n.terminal)
    }
}

impl ResolutionTree {
    pub fn export(&self) -> TreeExport {
        TreeExport {
            variant: self.variant(),
            complete: self.is_complete(),
            nodes: self
                .nodes()
                .map(|(id, node)| ExportNode {
                    id,
                    matrix: node.form.clone(),
                    state: node.state,
                    terminal: node.terminal,
                })
                .collect(),
            edges: self.edges().collect(),
        }
    }
}
