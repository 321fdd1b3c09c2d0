// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use super::{export_document, parse_document, read_document, render_document, write_document};
use crate::model::{default_questions, DiagramError, NodeId, Position, Question, ShapeKind};
use crate::ops::{apply_ops, Op};
use crate::render::{render_diagram, RenderError, RenderOptions};
use crate::store::{DocumentStore, GatewayError, ValidationError};

struct Ctx {
    questions: Vec<Question>,
    store: DocumentStore,
}

#[fixture]
fn ctx() -> Ctx {
    let questions = default_questions();
    let mut store = DocumentStore::new(questions.len()).expect("store");

    let mut diagram = store.get(0).expect("slot 0").clone();
    apply_ops(
        &mut diagram,
        &[
            Op::AddNode {
                kind: ShapeKind::Process,
                position: Position::new(412.5, 301.25),
                label: Some("n = n + 1".to_owned()),
            },
            Op::AddEdge {
                source: NodeId::from_counter(1),
                target: NodeId::from_counter(2),
                style: None,
            },
        ],
    )
    .expect("apply");
    store.update(0, diagram).expect("update");

    Ctx { questions, store }
}

#[rstest]
fn export_then_parse_reproduces_every_slot(ctx: Ctx) {
    let file = export_document(&ctx.questions, &ctx.store);
    let json = render_document(&file).expect("render");

    let diagrams = parse_document(&json, ctx.store.slot_count()).expect("parse");

    assert_eq!(diagrams.as_slice(), ctx.store.diagrams());
}

#[rstest]
fn export_carries_question_metadata_and_wire_names(ctx: Ctx) {
    let file = export_document(&ctx.questions, &ctx.store);
    let value: serde_json::Value =
        serde_json::from_str(&render_document(&file).expect("render")).expect("json");

    let first = &value["questions"][0];
    assert_eq!(first["id"], 1);
    assert_eq!(first["text"], ctx.questions[0].text.as_str());
    assert_eq!(first["canvas"]["nodeIdCounter"], 3);
    assert_eq!(first["canvas"]["nodes"][0]["type"], "circle");
    assert_eq!(first["canvas"]["nodes"][0]["data"]["label"], "Start");
    assert_eq!(first["canvas"]["nodes"][1]["type"], "rectangle");
    assert_eq!(first["canvas"]["edges"][0]["source"], "1");
    assert_eq!(first["canvas"]["edges"][0]["target"], "2");
    assert_eq!(first["canvas"]["edges"][0]["markerEnd"]["type"], "arrowclosed");
    assert_eq!(first["canvas"]["edges"][0]["style"]["strokeWidth"], 3.0);
}

#[test]
fn parse_accepts_minimal_edges_and_ignores_unknown_fields() {
    let src = r##"{
  "questions": [
    { "id": 1, "text": "q", "description": "d",
      "canvas": {
        "nodes": [
          { "id": "1", "type": "circle", "data": { "label": "Start" },
            "position": { "x": 250, "y": 50 }, "selected": true, "width": 120 },
          { "id": "2", "type": "diamond", "data": { "label": "x > 3?" },
            "position": { "x": 300, "y": 200 } }
        ],
        "edges": [
          { "id": "reactflow__edge-1-2", "source": "1", "target": "2", "markerEnd": "arrow" }
        ],
        "nodeIdCounter": 3
      }
    }
  ]
}"##;

    let diagrams = parse_document(src, 1).expect("parse");
    let diagram = &diagrams[0];
    assert_eq!(diagram.nodes().len(), 2);
    assert_eq!(diagram.nodes()[1].kind(), ShapeKind::Decision);
    let edge = &diagram.edges()[0];
    assert_eq!(edge.id().as_str(), "reactflow__edge-1-2");
    assert_eq!(edge.style().marker_end.kind, "arrow");
    assert_eq!(edge.style().stroke_width, 3.0);
}

#[rstest]
#[case::not_json("not json at all")]
#[case::no_questions(r#"{ "canvases": [] }"#)]
#[case::questions_not_a_list(r#"{ "questions": { "0": {} } }"#)]
fn parse_rejects_documents_without_question_list(#[case] src: &str) {
    let err = parse_document(src, 3).unwrap_err();
    assert!(
        matches!(
            err,
            ValidationError::Malformed { .. } | ValidationError::MissingQuestions
        ),
        "{err:?}"
    );
}

#[rstest]
fn parse_rejects_wrong_question_count(ctx: Ctx) {
    let file = export_document(&ctx.questions[..2], &ctx.store);
    let json = render_document(&file).expect("render");

    let err = parse_document(&json, 3).unwrap_err();

    assert!(matches!(
        err,
        ValidationError::SlotCountMismatch {
            expected: 3,
            found: 2
        }
    ));
}

#[test]
fn parse_rejects_unknown_shapes() {
    let src = r#"{ "questions": [ { "canvas": {
        "nodes": [ { "id": "1", "type": "hexagon", "data": { "label": "?" },
                     "position": { "x": 0, "y": 0 } } ],
        "edges": [], "nodeIdCounter": 2 } } ] }"#;

    let err = parse_document(src, 1).unwrap_err();
    assert!(matches!(err, ValidationError::UnknownShape { index: 0, .. }));
}

#[test]
fn parse_rejects_dangling_edges() {
    let src = r#"{ "questions": [ { "canvas": {
        "nodes": [ { "id": "1", "type": "circle", "data": { "label": "Start" },
                     "position": { "x": 0, "y": 0 } } ],
        "edges": [ { "id": "e1-9", "source": "1", "target": "9" } ],
        "nodeIdCounter": 2 } } ] }"#;

    let err = parse_document(src, 1).unwrap_err();
    let ValidationError::InvalidDiagram { index, source } = err else {
        panic!("expected InvalidDiagram, got {err:?}");
    };
    assert_eq!(index, 0);
    assert!(matches!(source, DiagramError::DanglingEdge { .. }));
}

#[rstest]
#[case::huge_x(r#"{ "x": 1e300, "y": 0 }"#)]
#[case::beyond_limit_y(r#"{ "x": 0, "y": -1000000.5 }"#)]
fn parse_rejects_positions_off_the_canvas(#[case] position: &str) {
    let src = format!(
        r#"{{ "questions": [ {{ "canvas": {{
        "nodes": [ {{ "id": "1", "type": "circle", "data": {{ "label": "Start" }},
                     "position": {position} }} ],
        "edges": [], "nodeIdCounter": 2 }} }} ] }}"#
    );

    let err = parse_document(&src, 1).unwrap_err();
    let ValidationError::PositionOutOfRange { index, node_id, .. } = err else {
        panic!("expected PositionOutOfRange, got {err:?}");
    };
    assert_eq!((index, node_id.as_str()), (0, "1"));
}

#[test]
fn extreme_imported_positions_fail_to_render_without_panicking() {
    let src = r#"{ "questions": [ { "canvas": {
        "nodes": [ { "id": "1", "type": "circle", "data": { "label": "Start" },
                     "position": { "x": -1000000, "y": 0 } },
                   { "id": "2", "type": "rectangle", "data": { "label": "far" },
                     "position": { "x": 1000000, "y": 1000000 } } ],
        "edges": [ { "id": "e1-2", "source": "1", "target": "2" } ],
        "nodeIdCounter": 3 } } ] }"#;

    let diagrams = parse_document(src, 1).expect("parse");
    let err = render_diagram(&diagrams[0], RenderOptions::default()).unwrap_err();
    assert!(matches!(err, RenderError::UnplaceablePosition { .. }), "{err:?}");
}

#[test]
fn parse_rejects_empty_ids() {
    let src = r#"{ "questions": [ { "canvas": {
        "nodes": [ { "id": "", "type": "circle", "data": { "label": "Start" },
                     "position": { "x": 0, "y": 0 } } ],
        "edges": [], "nodeIdCounter": 2 } } ] }"#;

    let err = parse_document(src, 1).unwrap_err();
    assert!(matches!(
        err,
        ValidationError::InvalidId {
            field: "node id",
            ..
        }
    ));
}

#[rstest]
fn write_then_read_round_trips_through_disk(ctx: Ctx) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("flowchart.json");
    let json = render_document(&export_document(&ctx.questions, &ctx.store)).expect("render");

    write_document(&path, json.as_bytes()).expect("write");
    let read_back = read_document(&path).expect("read");

    assert_eq!(read_back, json);
    let leftovers = std::fs::read_dir(dir.path())
        .expect("read dir")
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp-"))
        .count();
    assert_eq!(leftovers, 0);
}

#[test]
fn read_missing_file_reports_the_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing.json");

    let err = read_document(&path).unwrap_err();

    let GatewayError::Io { path: reported, .. } = err else {
        panic!("expected Io error, got {err:?}");
    };
    assert_eq!(reported, path);
}
