// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use thiserror::Error;

use super::ids::{EdgeId, NodeId};
use super::shape::ShapeKind;

/// Largest distance from the origin, in surface pixels, an imported node may sit at.
pub const COORDINATE_LIMIT: f64 = 1.0e6;

/// Canvas coordinates in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rounds both axes to the nearest multiple of the grid step.
    pub fn snapped(self, grid: [f64; 2]) -> Self {
        fn snap(value: f64, step: f64) -> f64 {
            if step > 0.0 {
                (value / step).round() * step
            } else {
                value
            }
        }
        Self {
            x: snap(self.x, grid[0]),
            y: snap(self.y, grid[1]),
        }
    }

    /// Whether both axes are finite and within [`COORDINATE_LIMIT`] of the origin.
    pub fn is_placeable(self) -> bool {
        [self.x, self.y]
            .iter()
            .all(|v| v.is_finite() && v.abs() <= COORDINATE_LIMIT)
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    kind: ShapeKind,
    label: String,
    position: Position,
}

impl Node {
    pub fn new(id: NodeId, kind: ShapeKind, label: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            kind,
            label: label.into(),
            position,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrowMarker {
    pub kind: String,
    pub width: f64,
    pub height: f64,
    pub color: String,
}

/// Presentation attributes carried through import/export untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeStyle {
    pub line: String,
    pub animated: bool,
    pub stroke: String,
    pub stroke_width: f64,
    pub marker_end: ArrowMarker,
}

pub const EDGE_ACCENT_COLOR: &str = "#FF8A00";

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            line: "smoothstep".to_owned(),
            animated: false,
            stroke: EDGE_ACCENT_COLOR.to_owned(),
            stroke_width: 3.0,
            marker_end: ArrowMarker {
                kind: "arrowclosed".to_owned(),
                width: 30.0,
                height: 30.0,
                color: EDGE_ACCENT_COLOR.to_owned(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    id: EdgeId,
    source: NodeId,
    target: NodeId,
    style: EdgeStyle,
}

impl Edge {
    pub fn new(id: EdgeId, source: NodeId, target: NodeId) -> Self {
        Self::new_with(id, source, target, EdgeStyle::default())
    }

    pub fn new_with(id: EdgeId, source: NodeId, target: NodeId, style: EdgeStyle) -> Self {
        Self {
            id,
            source,
            target,
            style,
        }
    }

    pub fn id(&self) -> &EdgeId {
        &self.id
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn style(&self) -> &EdgeStyle {
        &self.style
    }

    pub fn touches(&self, node_id: &NodeId) -> bool {
        &self.source == node_id || &self.target == node_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagramError {
    #[error("duplicate node id {node_id}")]
    DuplicateNodeId { node_id: NodeId },
    #[error("duplicate edge id {edge_id}")]
    DuplicateEdgeId { edge_id: EdgeId },
    #[error("edge {edge_id} references missing node {node_id}")]
    DanglingEdge { edge_id: EdgeId, node_id: NodeId },
    #[error("node id counter {next_node_id} is not above the highest node id {highest}")]
    CounterBehind { next_node_id: u64, highest: u64 },
}

/// One question's editable flowchart: nodes, edges and the node id counter.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    next_node_id: u64,
}

pub const START_LABEL: &str = "Start";
pub const START_POSITION: Position = Position::new(250.0, 50.0);

impl Default for Diagram {
    fn default() -> Self {
        Self::initial()
    }
}

impl Diagram {
    /// A fresh canvas: one terminal `Start` node with id `1`.
    pub fn initial() -> Self {
        let start = Node::new(
            NodeId::from_counter(1),
            ShapeKind::Terminal,
            START_LABEL,
            START_POSITION,
        );
        Self {
            nodes: vec![start],
            edges: Vec::new(),
            next_node_id: 2,
        }
    }

    /// Assembles a diagram from untrusted parts, enforcing every structural invariant.
    pub fn from_parts(
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        next_node_id: u64,
    ) -> Result<Self, DiagramError> {
        let diagram = Self {
            nodes,
            edges,
            next_node_id,
        };
        diagram.validate()?;
        Ok(diagram)
    }

    pub fn validate(&self) -> Result<(), DiagramError> {
        let mut node_ids = BTreeSet::new();
        for node in &self.nodes {
            if !node_ids.insert(node.id()) {
                return Err(DiagramError::DuplicateNodeId {
                    node_id: node.id().clone(),
                });
            }
        }

        let mut edge_ids = BTreeSet::new();
        for edge in &self.edges {
            if !edge_ids.insert(edge.id()) {
                return Err(DiagramError::DuplicateEdgeId {
                    edge_id: edge.id().clone(),
                });
            }
            for endpoint in [edge.source(), edge.target()] {
                if !node_ids.contains(endpoint) {
                    return Err(DiagramError::DanglingEdge {
                        edge_id: edge.id().clone(),
                        node_id: endpoint.clone(),
                    });
                }
            }
        }

        if let Some(highest) = self.highest_counter_id() {
            if self.next_node_id <= highest {
                return Err(DiagramError::CounterBehind {
                    next_node_id: self.next_node_id,
                    highest,
                });
            }
        }

        Ok(())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn next_node_id(&self) -> u64 {
        self.next_node_id
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id() == node_id)
    }

    pub fn edge(&self, edge_id: &EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.id() == edge_id)
    }

    pub fn contains_node(&self, node_id: &NodeId) -> bool {
        self.node(node_id).is_some()
    }

    pub fn contains_edge(&self, edge_id: &EdgeId) -> bool {
        self.edge(edge_id).is_some()
    }

    pub fn edges_touching<'a>(&'a self, node_id: &'a NodeId) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |edge| edge.touches(node_id))
    }

    /// Highest node id that was issued by a counter, if any node carries one.
    pub fn highest_counter_id(&self) -> Option<u64> {
        self.nodes
            .iter()
            .filter_map(|node| node.id().counter_value())
            .max()
    }

    pub(crate) fn node_mut(&mut self, node_id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.id() == node_id)
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.nodes
    }

    pub(crate) fn edges_mut(&mut self) -> &mut Vec<Edge> {
        &mut self.edges
    }

    /// Hands out the next node id and advances the counter.
    /// Issues the next counter id, or `None` once the counter cannot advance past it.
    pub(crate) fn allocate_node_id(&mut self) -> Option<NodeId> {
        let next = self.next_node_id.checked_add(1)?;
        let id = NodeId::from_counter(self.next_node_id);
        self.next_node_id = next;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::{Diagram, DiagramError, Edge, Node, Position, ShapeKind, START_LABEL};
    use crate::model::{EdgeId, NodeId};

    fn node(id: &str) -> Node {
        Node::new(
            NodeId::new(id).expect("node id"),
            ShapeKind::Process,
            id,
            Position::default(),
        )
    }

    fn edge(id: &str, source: &str, target: &str) -> Edge {
        Edge::new(
            EdgeId::new(id).expect("edge id"),
            NodeId::new(source).expect("source id"),
            NodeId::new(target).expect("target id"),
        )
    }

    #[test]
    fn initial_diagram_has_single_start_node() {
        let diagram = Diagram::initial();
        assert_eq!(diagram.nodes().len(), 1);
        let start = &diagram.nodes()[0];
        assert_eq!(start.id().as_str(), "1");
        assert_eq!(start.kind(), ShapeKind::Terminal);
        assert_eq!(start.label(), START_LABEL);
        assert!(diagram.edges().is_empty());
        assert_eq!(diagram.next_node_id(), 2);
        diagram.validate().expect("initial diagram is valid");
    }

    #[test]
    fn allocate_node_id_stops_at_the_last_counter_value() {
        let mut diagram =
            Diagram::from_parts(vec![node("1")], Vec::new(), u64::MAX).expect("valid");
        assert_eq!(diagram.allocate_node_id(), None);
        assert_eq!(diagram.allocate_node_id(), None);
        assert_eq!(diagram.next_node_id(), u64::MAX);
    }

    #[test]
    fn placeable_positions_are_finite_and_bounded() {
        assert!(Position::new(-250.5, 1.0e6).is_placeable());
        for (x, y) in [(1.0e300, 0.0), (0.0, -2.0e6), (f64::NAN, 0.0), (f64::INFINITY, 0.0)] {
            assert!(!Position::new(x, y).is_placeable(), "({x}, {y})");
        }
    }

    #[test]
    fn allocate_node_id_never_repeats() {
        let mut diagram = Diagram::initial();
        let a = diagram.allocate_node_id().expect("id");
        let b = diagram.allocate_node_id().expect("id");
        assert_eq!(a.as_str(), "2");
        assert_eq!(b.as_str(), "3");
        assert_eq!(diagram.next_node_id(), 4);
    }

    #[test]
    fn from_parts_rejects_dangling_edges() {
        let err = Diagram::from_parts(vec![node("1")], vec![edge("e1", "1", "9")], 2).unwrap_err();
        assert_eq!(
            err,
            DiagramError::DanglingEdge {
                edge_id: EdgeId::new("e1").expect("edge id"),
                node_id: NodeId::new("9").expect("node id"),
            }
        );
    }

    #[test]
    fn from_parts_rejects_duplicate_ids() {
        let err = Diagram::from_parts(vec![node("1"), node("1")], Vec::new(), 2).unwrap_err();
        assert!(matches!(err, DiagramError::DuplicateNodeId { .. }));

        let err = Diagram::from_parts(
            vec![node("1"), node("2")],
            vec![edge("e", "1", "2"), edge("e", "2", "1")],
            3,
        )
        .unwrap_err();
        assert!(matches!(err, DiagramError::DuplicateEdgeId { .. }));
    }

    #[test]
    fn from_parts_rejects_counter_that_would_reissue_ids() {
        let err = Diagram::from_parts(vec![node("1"), node("5")], Vec::new(), 5).unwrap_err();
        assert_eq!(
            err,
            DiagramError::CounterBehind {
                next_node_id: 5,
                highest: 5
            }
        );
    }

    #[test]
    fn non_numeric_ids_do_not_constrain_the_counter() {
        let diagram = Diagram::from_parts(vec![node("start")], Vec::new(), 1).expect("valid");
        assert_eq!(diagram.highest_counter_id(), None);
    }

    #[test]
    fn snapped_rounds_to_grid() {
        let p = Position::new(22.0, 37.6).snapped([15.0, 15.0]);
        assert_eq!(p, Position::new(15.0, 45.0));
        let unchanged = Position::new(3.3, 4.4).snapped([0.0, 0.0]);
        assert_eq!(unchanged, Position::new(3.3, 4.4));
    }
}
