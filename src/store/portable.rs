// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The portable flowchart document.
//!
//! Shape on disk:
//!
//! ```json
//! { "questions": [ { "id": 1, "text": "...", "description": "...",
//!                    "canvas": { "nodes": [...], "edges": [...], "nodeIdCounter": 2 } } ] }
//! ```
//!
//! Node and edge records follow the graph-surface conventions of earlier exports
//! (`type`, `data.label`, `markerEnd`, `style.strokeWidth`), so files written by older editors
//! load unchanged. Unknown fields are ignored.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{DocumentStore, GatewayError, ValidationError};
use crate::model::{
    ArrowMarker, Diagram, Edge, EdgeId, EdgeStyle, Id, Node, NodeId, Position, Question, ShapeKind,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortableFile {
    pub questions: Vec<PortableQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortableQuestion {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub description: String,
    pub canvas: PortableCanvas,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortableCanvas {
    pub nodes: Vec<PortableNode>,
    pub edges: Vec<PortableEdge>,
    pub node_id_counter: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortableNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: PortableNodeData,
    pub position: PortablePosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortableNodeData {
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortablePosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortableEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_end: Option<PortableMarkerEnd>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<PortableEdgeStyle>,
}

/// `markerEnd` is either a bare marker name or a full marker record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortableMarkerEnd {
    Named(String),
    Full(PortableMarker),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortableMarker {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortableEdgeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
}

impl From<&Diagram> for PortableCanvas {
    fn from(diagram: &Diagram) -> Self {
        Self {
            nodes: diagram.nodes().iter().map(PortableNode::from).collect(),
            edges: diagram.edges().iter().map(PortableEdge::from).collect(),
            node_id_counter: diagram.next_node_id(),
        }
    }
}

impl From<&Node> for PortableNode {
    fn from(node: &Node) -> Self {
        let position = node.position();
        Self {
            id: node.id().to_string(),
            kind: node.kind().wire_name().to_owned(),
            data: PortableNodeData {
                label: node.label().to_owned(),
            },
            position: PortablePosition {
                x: position.x,
                y: position.y,
            },
        }
    }
}

impl From<&Edge> for PortableEdge {
    fn from(edge: &Edge) -> Self {
        let style = edge.style();
        Self {
            id: edge.id().to_string(),
            source: edge.source().to_string(),
            target: edge.target().to_string(),
            line: Some(style.line.clone()),
            animated: Some(style.animated),
            marker_end: Some(PortableMarkerEnd::Full(PortableMarker {
                kind: style.marker_end.kind.clone(),
                width: Some(style.marker_end.width),
                height: Some(style.marker_end.height),
                color: Some(style.marker_end.color.clone()),
            })),
            style: Some(PortableEdgeStyle {
                stroke_width: Some(style.stroke_width),
                stroke: Some(style.stroke.clone()),
            }),
        }
    }
}

impl PortableEdge {
    fn edge_style(&self) -> EdgeStyle {
        let mut style = EdgeStyle::default();
        if let Some(line) = &self.line {
            style.line = line.clone();
        }
        if let Some(animated) = self.animated {
            style.animated = animated;
        }
        match &self.marker_end {
            Some(PortableMarkerEnd::Named(kind)) => style.marker_end.kind = kind.clone(),
            Some(PortableMarkerEnd::Full(marker)) => {
                let defaults = style.marker_end.clone();
                style.marker_end = ArrowMarker {
                    kind: marker.kind.clone(),
                    width: marker.width.unwrap_or(defaults.width),
                    height: marker.height.unwrap_or(defaults.height),
                    color: marker.color.clone().unwrap_or(defaults.color),
                };
            }
            None => {}
        }
        if let Some(edge_style) = &self.style {
            if let Some(stroke_width) = edge_style.stroke_width {
                style.stroke_width = stroke_width;
            }
            if let Some(stroke) = &edge_style.stroke {
                style.stroke = stroke.clone();
            }
        }
        style
    }
}

/// Snapshots every slot together with its question metadata.
pub fn export_document(questions: &[Question], store: &DocumentStore) -> PortableFile {
    PortableFile {
        questions: questions
            .iter()
            .zip(store.diagrams())
            .map(|(question, diagram)| PortableQuestion {
                id: question.id,
                text: question.text.clone(),
                description: question.description.clone(),
                canvas: PortableCanvas::from(diagram),
            })
            .collect(),
    }
}

pub fn render_document(file: &PortableFile) -> Result<String, GatewayError> {
    let mut json = serde_json::to_string_pretty(file).map_err(GatewayError::Encode)?;
    json.push('\n');
    Ok(json)
}

/// Parses an exported document into one diagram per slot.
///
/// Nothing is returned unless the document has exactly `slot_count` questions and every canvas
/// satisfies the diagram invariants.
pub fn parse_document(src: &str, slot_count: usize) -> Result<Vec<Diagram>, ValidationError> {
    let value: serde_json::Value =
        serde_json::from_str(src).map_err(|source| ValidationError::Malformed { source })?;
    if !value
        .get("questions")
        .is_some_and(serde_json::Value::is_array)
    {
        return Err(ValidationError::MissingQuestions);
    }

    let file: PortableFile =
        serde_json::from_value(value).map_err(|source| ValidationError::Malformed { source })?;
    if file.questions.len() != slot_count {
        return Err(ValidationError::SlotCountMismatch {
            expected: slot_count,
            found: file.questions.len(),
        });
    }

    file.questions
        .into_iter()
        .enumerate()
        .map(|(index, question)| canvas_to_diagram(index, question.canvas))
        .collect()
}

fn canvas_to_diagram(index: usize, canvas: PortableCanvas) -> Result<Diagram, ValidationError> {
    let mut nodes = Vec::with_capacity(canvas.nodes.len());
    for node in canvas.nodes {
        let kind = node.kind.parse::<ShapeKind>().map_err(|source| {
            ValidationError::UnknownShape {
                index,
                node_id: node.id.clone(),
                source,
            }
        })?;
        let position = Position::new(node.position.x, node.position.y);
        if !position.is_placeable() {
            return Err(ValidationError::PositionOutOfRange {
                index,
                node_id: node.id,
                x: position.x,
                y: position.y,
            });
        }
        let node_id: NodeId = parse_id(index, "node id", node.id)?;
        nodes.push(Node::new(node_id, kind, node.data.label, position));
    }

    let mut edges = Vec::with_capacity(canvas.edges.len());
    for edge in canvas.edges {
        let style = edge.edge_style();
        let edge_id: EdgeId = parse_id(index, "edge id", edge.id)?;
        let source: NodeId = parse_id(index, "edge source", edge.source)?;
        let target: NodeId = parse_id(index, "edge target", edge.target)?;
        edges.push(Edge::new_with(edge_id, source, target, style));
    }

    Diagram::from_parts(nodes, edges, canvas.node_id_counter)
        .map_err(|source| ValidationError::InvalidDiagram { index, source })
}

fn parse_id<T>(index: usize, field: &'static str, value: String) -> Result<Id<T>, ValidationError> {
    Id::new(value.clone()).map_err(|source| ValidationError::InvalidId {
        index,
        field,
        value,
        source,
    })
}

pub fn read_document(path: &Path) -> Result<String, GatewayError> {
    let contents = fs::read_to_string(path).map_err(|source| GatewayError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path:% = path.display(), bytes = contents.len(); "read flowchart document");
    Ok(contents)
}

/// Writes `contents` next to `path` and renames it into place, so readers never see a partial
/// file.
pub fn write_document(path: &Path, contents: &[u8]) -> Result<(), GatewayError> {
    let io_err = |source: io::Error| GatewayError::Io {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let Some(file_name) = path.file_name() else {
        return Err(io_err(io::Error::other("path has no file name")));
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let tmp_path = parent.join(format!(
        ".{}.tmp-{}-{nanos}",
        file_name.to_string_lossy(),
        std::process::id()
    ));

    let result = (|| {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();
    if let Err(source) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_err(source));
    }

    info!(path:% = path.display(), bytes = contents.len(); "wrote flowchart document");
    Ok(())
}

#[cfg(test)]
mod tests;
