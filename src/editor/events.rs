// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Change events reported by the editing surface.

use std::collections::BTreeSet;

use crate::model::{Diagram, EdgeId, NodeId, Position};

#[derive(Debug, Clone, PartialEq)]
pub enum NodeChange {
    /// A node moved. `dragging` is true for intermediate frames and false once the gesture ends.
    Position {
        id: NodeId,
        position: Position,
        dragging: bool,
    },
    Remove {
        id: NodeId,
    },
    Select {
        id: NodeId,
        selected: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeChange {
    Remove { id: EdgeId },
    Select { id: EdgeId, selected: bool },
}

/// A completed connect gesture from one node to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub source: NodeId,
    pub target: NodeId,
}

/// Elements currently selected on the surface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    nodes: BTreeSet<NodeId>,
    edges: BTreeSet<EdgeId>,
}

impl Selection {
    pub fn nodes(&self) -> &BTreeSet<NodeId> {
        &self.nodes
    }

    pub fn edges(&self) -> &BTreeSet<EdgeId> {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains(id)
    }

    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edges.contains(id)
    }

    pub(crate) fn set_node(&mut self, id: NodeId, selected: bool) {
        if selected {
            self.nodes.insert(id);
        } else {
            self.nodes.remove(&id);
        }
    }

    pub(crate) fn set_edge(&mut self, id: EdgeId, selected: bool) {
        if selected {
            self.edges.insert(id);
        } else {
            self.edges.remove(&id);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    /// Forgets elements that no longer exist in `diagram`.
    pub(crate) fn retain_existing(&mut self, diagram: &Diagram) {
        self.nodes.retain(|id| diagram.contains_node(id));
        self.edges.retain(|id| diagram.contains_edge(id));
    }
}
