// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations for a single diagram.
//!
//! A batch of ops is applied to a scratch copy and swapped in only when every op succeeds, so
//! callers never observe a half-applied batch. The returned delta lists the elements that
//! changed so the editor and the surface can refresh derived state.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::model::{Diagram, Edge, EdgeId, EdgeStyle, Node, NodeId, Position, ShapeKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    AddNode {
        kind: ShapeKind,
        position: Position,
        label: Option<String>,
    },
    MoveNode {
        node_id: NodeId,
        position: Position,
    },
    SetNodeLabel {
        node_id: NodeId,
        label: String,
    },
    /// Removes the node and every edge touching it.
    RemoveNode {
        node_id: NodeId,
    },
    AddEdge {
        source: NodeId,
        target: NodeId,
        style: Option<EdgeStyle>,
    },
    RemoveEdge {
        edge_id: EdgeId,
    },
    /// Resets the diagram to its initial state.
    Clear,
}

/// A reference to one element of a diagram.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementRef {
    Node(NodeId),
    Edge(EdgeId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub applied: usize,
    pub delta: Delta,
}

/// Minimal delta describing which elements changed as the result of applying ops.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<ElementRef>,
    pub removed: Vec<ElementRef>,
    pub updated: Vec<ElementRef>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }

    pub fn added_nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.added.iter().filter_map(|element| match element {
            ElementRef::Node(node_id) => Some(node_id),
            ElementRef::Edge(_) => None,
        })
    }

    pub fn added_edges(&self) -> impl Iterator<Item = &EdgeId> {
        self.added.iter().filter_map(|element| match element {
            ElementRef::Edge(edge_id) => Some(edge_id),
            ElementRef::Node(_) => None,
        })
    }

    pub fn removed_edges(&self) -> impl Iterator<Item = &EdgeId> {
        self.removed.iter().filter_map(|element| match element {
            ElementRef::Edge(edge_id) => Some(edge_id),
            ElementRef::Node(_) => None,
        })
    }

    pub fn removed_nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.removed.iter().filter_map(|element| match element {
            ElementRef::Node(node_id) => Some(node_id),
            ElementRef::Edge(_) => None,
        })
    }

    /// Folds a later delta into this one.
    pub fn merge(&mut self, later: Delta) {
        let mut builder = DeltaBuilder::from_delta(std::mem::take(self));
        for element in later.added {
            builder.record_added(element);
        }
        for element in later.removed {
            builder.record_removed(element);
        }
        for element in later.updated {
            builder.record_updated(element);
        }
        *self = builder.finish();
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: BTreeSet<ElementRef>,
    removed: BTreeSet<ElementRef>,
    updated: BTreeSet<ElementRef>,
}

impl DeltaBuilder {
    fn from_delta(delta: Delta) -> Self {
        Self {
            added: delta.added.into_iter().collect(),
            removed: delta.removed.into_iter().collect(),
            updated: delta.updated.into_iter().collect(),
        }
    }

    fn record_added(&mut self, element: ElementRef) {
        self.updated.remove(&element);
        if self.removed.remove(&element) {
            // Removed and re-added within one batch: the element was replaced.
            self.updated.insert(element);
            return;
        }
        self.added.insert(element);
    }

    fn record_removed(&mut self, element: ElementRef) {
        self.updated.remove(&element);
        if self.added.remove(&element) {
            return;
        }
        self.removed.insert(element);
    }

    fn record_updated(&mut self, element: ElementRef) {
        if self.added.contains(&element) || self.removed.contains(&element) {
            return;
        }
        self.updated.insert(element);
    }

    fn finish(self) -> Delta {
        Delta {
            added: self.added.into_iter().collect(),
            removed: self.removed.into_iter().collect(),
            updated: self.updated.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("node not found (id={node_id})")]
    NodeNotFound { node_id: NodeId },
    #[error("edge not found (id={edge_id})")]
    EdgeNotFound { edge_id: EdgeId },
    #[error("edge endpoint not found (id={node_id})")]
    MissingEndpoint { node_id: NodeId },
    #[error("an edge needs two distinct nodes (id={node_id})")]
    SelfLoop { node_id: NodeId },
    #[error("node id counter is exhausted (next={next_node_id})")]
    CounterExhausted { next_node_id: u64 },
}

pub fn apply_ops(diagram: &mut Diagram, ops: &[Op]) -> Result<ApplyResult, EditError> {
    if ops.is_empty() {
        return Ok(ApplyResult {
            applied: 0,
            delta: Delta::default(),
        });
    }

    let mut scratch = diagram.clone();
    let mut delta = DeltaBuilder::default();
    for op in ops {
        apply_op(&mut scratch, op, &mut delta)?;
    }

    *diagram = scratch;
    Ok(ApplyResult {
        applied: ops.len(),
        delta: delta.finish(),
    })
}

fn apply_op(diagram: &mut Diagram, op: &Op, delta: &mut DeltaBuilder) -> Result<(), EditError> {
    match op {
        Op::AddNode {
            kind,
            position,
            label,
        } => {
            let next_node_id = diagram.next_node_id();
            let node_id = diagram
                .allocate_node_id()
                .ok_or(EditError::CounterExhausted { next_node_id })?;
            let label = label
                .clone()
                .unwrap_or_else(|| kind.default_label(&node_id));
            diagram
                .nodes_mut()
                .push(Node::new(node_id.clone(), *kind, label, *position));
            delta.record_added(ElementRef::Node(node_id));
            Ok(())
        }
        Op::MoveNode { node_id, position } => {
            let Some(node) = diagram.node_mut(node_id) else {
                return Err(EditError::NodeNotFound {
                    node_id: node_id.clone(),
                });
            };
            node.set_position(*position);
            delta.record_updated(ElementRef::Node(node_id.clone()));
            Ok(())
        }
        Op::SetNodeLabel { node_id, label } => {
            let Some(node) = diagram.node_mut(node_id) else {
                return Err(EditError::NodeNotFound {
                    node_id: node_id.clone(),
                });
            };
            node.set_label(label.clone());
            delta.record_updated(ElementRef::Node(node_id.clone()));
            Ok(())
        }
        Op::RemoveNode { node_id } => {
            let before = diagram.nodes().len();
            diagram.nodes_mut().retain(|node| node.id() != node_id);
            if diagram.nodes().len() == before {
                return Err(EditError::NodeNotFound {
                    node_id: node_id.clone(),
                });
            }
            let removed_edge_ids = diagram
                .edges_touching(node_id)
                .map(|edge| edge.id().clone())
                .collect::<Vec<_>>();
            diagram.edges_mut().retain(|edge| !edge.touches(node_id));
            for edge_id in removed_edge_ids {
                delta.record_removed(ElementRef::Edge(edge_id));
            }
            delta.record_removed(ElementRef::Node(node_id.clone()));
            Ok(())
        }
        Op::AddEdge {
            source,
            target,
            style,
        } => {
            if source == target {
                return Err(EditError::SelfLoop {
                    node_id: source.clone(),
                });
            }
            for endpoint in [source, target] {
                if !diagram.contains_node(endpoint) {
                    return Err(EditError::MissingEndpoint {
                        node_id: endpoint.clone(),
                    });
                }
            }
            let edge_id = next_edge_id(diagram, source, target);
            let style = style.clone().unwrap_or_default();
            diagram.edges_mut().push(Edge::new_with(
                edge_id.clone(),
                source.clone(),
                target.clone(),
                style,
            ));
            delta.record_added(ElementRef::Edge(edge_id));
            Ok(())
        }
        Op::RemoveEdge { edge_id } => {
            let before = diagram.edges().len();
            diagram.edges_mut().retain(|edge| edge.id() != edge_id);
            if diagram.edges().len() == before {
                return Err(EditError::EdgeNotFound {
                    edge_id: edge_id.clone(),
                });
            }
            delta.record_removed(ElementRef::Edge(edge_id.clone()));
            Ok(())
        }
        Op::Clear => {
            for edge in diagram.edges() {
                delta.record_removed(ElementRef::Edge(edge.id().clone()));
            }
            for node in diagram.nodes() {
                delta.record_removed(ElementRef::Node(node.id().clone()));
            }
            *diagram = Diagram::initial();
            for node in diagram.nodes() {
                delta.record_added(ElementRef::Node(node.id().clone()));
            }
            Ok(())
        }
    }
}

/// Edge ids are derived from the endpoints; parallel edges get a numeric suffix.
pub(crate) fn next_edge_id(diagram: &Diagram, source: &NodeId, target: &NodeId) -> EdgeId {
    let base = format!("e{source}-{target}");
    let mut candidate = base.clone();
    let mut suffix = 2u32;
    while diagram.edges().iter().any(|edge| edge.id().as_str() == candidate) {
        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }
    // Endpoint ids are valid ids, so the derived id is non-empty and control-free.
    EdgeId::new(candidate).unwrap_or_else(|_| EdgeId::from_counter(u64::from(suffix)))
}
