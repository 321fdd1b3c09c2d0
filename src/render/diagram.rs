// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use thiserror::Error;

use crate::model::{Diagram, Edge, Node, NodeId, ShapeKind};
use crate::ops::ElementRef;

use super::text::{canvas_to_string_trimmed, flatten_label, text_len, truncate_with_ellipsis};
use super::{
    clamp_highlight_index_to_text, AnnotatedRender, Canvas, CanvasError, HighlightIndex, LineSpan,
    RenderOptions,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("cell size must be positive")]
    InvalidCellSize,
    #[error("node position ({x}, {y}) cannot be placed on the text grid")]
    UnplaceablePosition { x: f64, y: f64 },
    #[error("drawing needs {width}x{height} cells, more than {} per side", MAX_GRID_SIDE)]
    TooLarge { width: usize, height: usize },
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

/// Largest grid width or height a single drawing may allocate.
pub const MAX_GRID_SIDE: usize = 4096;

const ARROW_DOWN: char = '▼';
const ARROW_UP: char = '▲';
const ARROW_RIGHT: char = '▶';
const ARROW_LEFT: char = '◀';

/// Cell rectangle occupied by a node; every node is three rows tall.
#[derive(Debug, Clone)]
struct NodeBox {
    left: usize,
    top: usize,
    right: usize,
    bottom: usize,
    label: String,
}

impl NodeBox {
    fn center_x(&self) -> usize {
        self.left + (self.right - self.left) / 2
    }

    fn middle_y(&self) -> usize {
        self.top + 1
    }

    fn spans(&self) -> Vec<LineSpan> {
        (self.top..=self.bottom)
            .map(|y| (y, self.left, self.right))
            .collect()
    }
}

pub fn render_diagram(diagram: &Diagram, options: RenderOptions) -> Result<String, RenderError> {
    Ok(render_diagram_annotated(diagram, options)?.text)
}

/// Renders the diagram and records which cells belong to each node and edge.
///
/// Edges are drawn first and nodes blank their own rectangle before drawing their outline, so a
/// node always stays readable when an edge is routed underneath it.
pub fn render_diagram_annotated(
    diagram: &Diagram,
    options: RenderOptions,
) -> Result<AnnotatedRender, RenderError> {
    if !(options.cell_width > 0.0 && options.cell_height > 0.0) {
        return Err(RenderError::InvalidCellSize);
    }
    if diagram.nodes().is_empty() {
        return Ok(AnnotatedRender {
            text: String::new(),
            highlight_index: HighlightIndex::new(),
        });
    }

    let boxes = layout_boxes(diagram.nodes(), options)?;
    let width = boxes.iter().map(|b| b.right).max().unwrap_or(0) + 1 + options.margin;
    let height = boxes.iter().map(|b| b.bottom).max().unwrap_or(0) + 1 + options.margin;
    if width > MAX_GRID_SIDE || height > MAX_GRID_SIDE {
        return Err(RenderError::TooLarge { width, height });
    }
    let mut canvas = Canvas::new(width, height)?;
    let mut highlight_index = HighlightIndex::new();

    for edge in diagram.edges() {
        let Some((source, target)) = endpoints(diagram, &boxes, edge) else {
            continue;
        };
        let spans = draw_edge(&mut canvas, source, target)?;
        if !spans.is_empty() {
            highlight_index.insert(ElementRef::Edge(edge.id().clone()), spans);
        }
    }

    for (node, node_box) in diagram.nodes().iter().zip(&boxes) {
        draw_node(&mut canvas, node.kind(), node_box)?;
        highlight_index.insert(ElementRef::Node(node.id().clone()), node_box.spans());
    }

    let text = canvas_to_string_trimmed(&canvas);
    clamp_highlight_index_to_text(&mut highlight_index, &text);
    Ok(AnnotatedRender {
        text,
        highlight_index,
    })
}

/// Cell offset of `distance` surface pixels, bounded so box arithmetic cannot overflow.
fn cell_offset(distance: f64, cell: f64) -> Option<usize> {
    let cells = (distance / cell).round();
    (cells.is_finite() && cells >= 0.0 && cells <= MAX_GRID_SIDE as f64).then_some(cells as usize)
}

fn layout_boxes(nodes: &[Node], options: RenderOptions) -> Result<Vec<NodeBox>, RenderError> {
    // Positions right of and below the surface origin keep their cells when other nodes move.
    let origin_x = nodes
        .iter()
        .map(|n| n.position().x)
        .fold(0.0_f64, f64::min);
    let origin_y = nodes
        .iter()
        .map(|n| n.position().y)
        .fold(0.0_f64, f64::min);

    nodes
        .iter()
        .map(|node| {
            let position = node.position();
            let unplaceable = || RenderError::UnplaceablePosition {
                x: position.x,
                y: position.y,
            };
            let left = cell_offset(position.x - origin_x, options.cell_width)
                .ok_or_else(unplaceable)?
                + options.margin;
            let top = cell_offset(position.y - origin_y, options.cell_height)
                .ok_or_else(unplaceable)?
                + options.margin;
            let label = truncate_with_ellipsis(&flatten_label(node.label()), options.max_label_len);
            let inner = text_len(&label);
            let width = match node.kind() {
                ShapeKind::Text => inner.max(1),
                ShapeKind::Process
                | ShapeKind::Decision
                | ShapeKind::Terminal
                | ShapeKind::InputOutput => inner + 4,
            };
            Ok(NodeBox {
                left,
                top,
                right: left + width - 1,
                bottom: top + 2,
                label,
            })
        })
        .collect()
}

fn endpoints<'a>(
    diagram: &Diagram,
    boxes: &'a [NodeBox],
    edge: &Edge,
) -> Option<(&'a NodeBox, &'a NodeBox)> {
    let index_of = |id: &NodeId| diagram.nodes().iter().position(|node| node.id() == id);
    let source = boxes.get(index_of(edge.source())?)?;
    let target = boxes.get(index_of(edge.target())?)?;
    Some((source, target))
}

fn draw_node(canvas: &mut Canvas, kind: ShapeKind, b: &NodeBox) -> Result<(), CanvasError> {
    for y in b.top..=b.bottom {
        canvas.write_str(b.left, y, &" ".repeat(b.right - b.left + 1))?;
    }

    let mid = b.middle_y();
    match kind {
        ShapeKind::Process => {
            canvas.draw_box(b.left, b.top, b.right, b.bottom)?;
        }
        ShapeKind::Terminal => {
            canvas.draw_hline(b.left + 1, b.right - 1, b.top)?;
            canvas.draw_hline(b.left + 1, b.right - 1, b.bottom)?;
            canvas.set(b.left, b.top, '╭')?;
            canvas.set(b.right, b.top, '╮')?;
            canvas.set(b.left, b.bottom, '╰')?;
            canvas.set(b.right, b.bottom, '╯')?;
            canvas.set(b.left, mid, '(')?;
            canvas.set(b.right, mid, ')')?;
        }
        ShapeKind::Decision => {
            canvas.draw_hline(b.left + 1, b.right - 1, b.top)?;
            canvas.draw_hline(b.left + 1, b.right - 1, b.bottom)?;
            canvas.set(b.left, b.top, '╱')?;
            canvas.set(b.right, b.top, '╲')?;
            canvas.set(b.left, b.bottom, '╲')?;
            canvas.set(b.right, b.bottom, '╱')?;
            canvas.set(b.left, mid, '<')?;
            canvas.set(b.right, mid, '>')?;
        }
        ShapeKind::InputOutput => {
            canvas.draw_hline(b.left + 1, b.right, b.top)?;
            canvas.draw_hline(b.left, b.right - 1, b.bottom)?;
            canvas.set(b.left, mid, '╱')?;
            canvas.set(b.right, mid, '╱')?;
        }
        ShapeKind::Text => {
            canvas.write_str(b.left, mid, &b.label)?;
            return Ok(());
        }
    }
    canvas.write_str(b.left + 2, mid, &b.label)
}

/// Routes an orthogonal connector between two node boxes and returns the cells it covers.
///
/// Vertical routing is preferred; side-by-side nodes get a horizontal connector. Nodes whose
/// rectangles touch or overlap get no connector.
fn draw_edge(
    canvas: &mut Canvas,
    source: &NodeBox,
    target: &NodeBox,
) -> Result<Vec<LineSpan>, CanvasError> {
    let mut path = Path::default();
    let (sx, tx) = (source.center_x(), target.center_x());

    if target.top > source.bottom + 1 {
        let (start, end) = (source.bottom + 1, target.top - 1);
        let mid = start + (end - start) / 2;
        path.vertical(canvas, sx, start, mid)?;
        path.horizontal(canvas, sx, tx, mid)?;
        path.vertical(canvas, tx, mid, end)?;
        canvas.set(tx, end, ARROW_DOWN)?;
    } else if target.bottom + 1 < source.top {
        let (start, end) = (source.top - 1, target.bottom + 1);
        let mid = end + (start - end) / 2;
        path.vertical(canvas, sx, mid, start)?;
        path.horizontal(canvas, sx, tx, mid)?;
        path.vertical(canvas, tx, end, mid)?;
        canvas.set(tx, end, ARROW_UP)?;
    } else if target.left > source.right + 1 {
        let (sy, ty) = (source.middle_y(), target.middle_y());
        let (start, end) = (source.right + 1, target.left - 1);
        let mid = start + (end - start) / 2;
        path.horizontal(canvas, start, mid, sy)?;
        path.vertical(canvas, mid, sy, ty)?;
        path.horizontal(canvas, mid, end, ty)?;
        canvas.set(end, ty, ARROW_RIGHT)?;
    } else if target.right + 1 < source.left {
        let (sy, ty) = (source.middle_y(), target.middle_y());
        let (start, end) = (source.left - 1, target.right + 1);
        let mid = end + (start - end) / 2;
        path.horizontal(canvas, mid, start, sy)?;
        path.vertical(canvas, mid, sy, ty)?;
        path.horizontal(canvas, end, mid, ty)?;
        canvas.set(end, ty, ARROW_LEFT)?;
    }

    Ok(path.spans)
}

#[derive(Debug, Default)]
struct Path {
    spans: Vec<LineSpan>,
}

impl Path {
    fn horizontal(
        &mut self,
        canvas: &mut Canvas,
        x0: usize,
        x1: usize,
        y: usize,
    ) -> Result<(), CanvasError> {
        canvas.draw_hline(x0, x1, y)?;
        self.spans.push((y, x0.min(x1), x0.max(x1)));
        Ok(())
    }

    fn vertical(
        &mut self,
        canvas: &mut Canvas,
        x: usize,
        y0: usize,
        y1: usize,
    ) -> Result<(), CanvasError> {
        canvas.draw_vline(x, y0, y1)?;
        self.spans
            .extend((y0.min(y1)..=y0.max(y1)).map(|y| (y, x, x)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{render_diagram, render_diagram_annotated, RenderError};
    use crate::model::{Diagram, NodeId, Position, ShapeKind};
    use crate::ops::{apply_ops, ElementRef, Op};
    use crate::render::RenderOptions;

    fn options() -> RenderOptions {
        RenderOptions {
            cell_width: 10.0,
            cell_height: 20.0,
            max_label_len: 24,
            margin: 0,
        }
    }

    fn single(kind: ShapeKind, label: &str) -> Diagram {
        let mut diagram = Diagram::initial();
        apply_ops(
            &mut diagram,
            &[
                Op::RemoveNode {
                    node_id: NodeId::from_counter(1),
                },
                Op::AddNode {
                    kind,
                    position: Position::new(0.0, 0.0),
                    label: Some(label.to_owned()),
                },
            ],
        )
        .expect("apply");
        diagram
    }

    #[test]
    fn every_shape_has_its_own_outline() {
        let cases = [
            (ShapeKind::Process, "┌─────┐\n│ abc │\n└─────┘"),
            (ShapeKind::Terminal, "╭─────╮\n( abc )\n╰─────╯"),
            (ShapeKind::Decision, "╱─────╲\n< abc >\n╲─────╱"),
            (ShapeKind::InputOutput, " ──────\n╱ abc ╱\n────── "),
            (ShapeKind::Text, "\nabc"),
        ];
        for (kind, expected) in cases {
            let rendered = render_diagram(&single(kind, "abc"), options()).expect("render");
            assert_eq!(rendered, expected.trim_end_matches(' '), "{kind}");
        }
    }

    #[test]
    fn vertical_edge_ends_in_arrow_above_target() {
        let mut diagram = single(ShapeKind::Process, "a");
        apply_ops(
            &mut diagram,
            &[
                Op::AddNode {
                    kind: ShapeKind::Process,
                    position: Position::new(0.0, 120.0),
                    label: Some("b".to_owned()),
                },
                Op::AddEdge {
                    source: NodeId::from_counter(2),
                    target: NodeId::from_counter(3),
                    style: None,
                },
            ],
        )
        .expect("apply");

        let rendered = render_diagram(&diagram, options()).expect("render");

        assert_eq!(
            rendered,
            "┌───┐\n│ a │\n└───┘\n  │\n  │\n  ▼\n┌───┐\n│ b │\n└───┘"
        );
    }

    #[test]
    fn upward_and_sideways_edges_use_matching_arrows() {
        let mut diagram = single(ShapeKind::Process, "a");
        apply_ops(
            &mut diagram,
            &[
                Op::AddNode {
                    kind: ShapeKind::Process,
                    position: Position::new(0.0, 120.0),
                    label: Some("b".to_owned()),
                },
                Op::AddNode {
                    kind: ShapeKind::Process,
                    position: Position::new(100.0, 120.0),
                    label: Some("c".to_owned()),
                },
                Op::AddEdge {
                    source: NodeId::from_counter(3),
                    target: NodeId::from_counter(2),
                    style: None,
                },
                Op::AddEdge {
                    source: NodeId::from_counter(3),
                    target: NodeId::from_counter(4),
                    style: None,
                },
            ],
        )
        .expect("apply");

        let rendered = render_diagram(&diagram, options()).expect("render");

        assert!(rendered.contains('▲'), "{rendered}");
        assert!(rendered.contains('▶'), "{rendered}");
    }

    #[test]
    fn highlight_index_covers_nodes_and_edges() {
        let mut diagram = single(ShapeKind::Process, "a");
        let result = apply_ops(
            &mut diagram,
            &[
                Op::AddNode {
                    kind: ShapeKind::Process,
                    position: Position::new(0.0, 120.0),
                    label: Some("b".to_owned()),
                },
                Op::AddEdge {
                    source: NodeId::from_counter(2),
                    target: NodeId::from_counter(3),
                    style: None,
                },
            ],
        )
        .expect("apply");
        let edge_id = result.delta.added_edges().next().cloned().expect("edge");

        let annotated = render_diagram_annotated(&diagram, options()).expect("render");

        assert_eq!(
            annotated
                .highlight_index
                .get(&ElementRef::Node(NodeId::from_counter(2))),
            Some(&vec![(0, 0, 4), (1, 0, 4), (2, 0, 4)])
        );
        assert_eq!(
            annotated.highlight_index.get(&ElementRef::Edge(edge_id)),
            Some(&vec![(3, 2, 2), (4, 2, 2), (4, 2, 2), (4, 2, 2), (5, 2, 2)])
        );
    }

    #[test]
    fn long_labels_are_truncated() {
        let diagram = single(ShapeKind::Text, "abcdefghij");
        let rendered = render_diagram(
            &diagram,
            RenderOptions {
                max_label_len: 4,
                ..options()
            },
        )
        .expect("render");
        assert_eq!(rendered, "\nabc…");
    }

    #[test]
    fn empty_diagram_renders_nothing() {
        let mut diagram = Diagram::initial();
        apply_ops(
            &mut diagram,
            &[Op::RemoveNode {
                node_id: NodeId::from_counter(1),
            }],
        )
        .expect("apply");
        assert_eq!(render_diagram(&diagram, options()).expect("render"), "");
    }

    #[test]
    fn zero_cell_size_is_rejected() {
        let err = render_diagram(
            &Diagram::initial(),
            RenderOptions {
                cell_width: 0.0,
                ..options()
            },
        )
        .unwrap_err();
        assert_eq!(err, RenderError::InvalidCellSize);
    }

    fn moved_to(x: f64) -> Diagram {
        let mut diagram = single(ShapeKind::Process, "a");
        apply_ops(
            &mut diagram,
            &[Op::MoveNode {
                node_id: NodeId::from_counter(2),
                position: Position::new(x, 0.0),
            }],
        )
        .expect("apply");
        diagram
    }

    #[test]
    fn far_away_positions_are_an_error_not_a_panic() {
        for x in [1e300, -1e300, f64::INFINITY, f64::NAN, 1.0e6] {
            let mut diagram = moved_to(x);
            apply_ops(
                &mut diagram,
                &[Op::AddNode {
                    kind: ShapeKind::Text,
                    position: Position::new(0.0, 0.0),
                    label: Some("b".to_owned()),
                }],
            )
            .expect("apply");

            let err = render_diagram(&diagram, options()).unwrap_err();
            assert!(
                matches!(err, RenderError::UnplaceablePosition { .. }),
                "{x}: {err:?}"
            );
        }
    }

    #[test]
    fn drawings_wider_than_the_grid_cap_are_rejected() {
        let err = render_diagram(&moved_to(40_950.0), options()).unwrap_err();
        assert_eq!(
            err,
            RenderError::TooLarge {
                width: 4100,
                height: 3
            }
        );
    }
}
