// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use flowdeck::config::EditorConfig;
use flowdeck::editor::{Editor, FixedJitter, NodeChange};
use flowdeck::model::{Diagram, NodeId, Position, Question, ShapeKind};
use flowdeck::ops::{apply_ops, ApplyResult, Op};
use flowdeck::render::{render_diagram, RenderOptions};

// Benchmark identity (keep stable):
// - Group names: `ops.apply`, `editor.mutation`, `render.text`.
// - Case IDs after the `/` stay stable so results remain comparable over time.
fn checksum_apply_result(result: &ApplyResult) -> u64 {
    let mut acc = result.applied as u64;
    for len in [
        result.delta.added.len(),
        result.delta.updated.len(),
        result.delta.removed.len(),
    ] {
        acc = acc.wrapping_mul(131).wrapping_add(len as u64);
    }
    acc
}

/// A diagram with `count` extra nodes laid out on a 10-wide grid.
fn grid_diagram(count: usize) -> Diagram {
    let mut diagram = Diagram::initial();
    let ops = (0..count)
        .map(|idx| Op::AddNode {
            kind: ShapeKind::ALL[idx % ShapeKind::ALL.len()],
            position: Position::new((idx % 10) as f64 * 180.0, (idx / 10) as f64 * 90.0 + 120.0),
            label: None,
        })
        .collect::<Vec<_>>();
    apply_ops(&mut diagram, &ops).expect("grid fixture");
    diagram
}

fn add_edge_ops(diagram: &Diagram, count: usize) -> Vec<Op> {
    let ids = diagram
        .nodes()
        .iter()
        .map(|node| node.id().clone())
        .collect::<Vec<_>>();
    assert!(ids.len() >= 2, "edge fixture needs >= 2 nodes");

    (0..count)
        .map(|idx| {
            let from = idx.wrapping_mul(7) % ids.len();
            let mut to = idx.wrapping_mul(7).wrapping_add(3) % ids.len();
            if to == from {
                to = (to + 1) % ids.len();
            }
            Op::AddEdge {
                source: ids[from].clone(),
                target: ids[to].clone(),
                style: None,
            }
        })
        .collect()
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("ops.apply");
    let template = grid_diagram(60);

    for (case, count) in [("edge_single", 1), ("edge_batch_10", 10), ("edge_batch_200", 200)] {
        let ops = add_edge_ops(&template, count);
        group.throughput(Throughput::Elements(ops.len() as u64));
        group.bench_function(case, |b| {
            b.iter_batched(
                || template.clone(),
                |mut diagram| {
                    let result = apply_ops(&mut diagram, black_box(&ops)).expect("apply_ops");
                    black_box(checksum_apply_result(&result))
                },
                BatchSize::SmallInput,
            )
        });
    }

    let mut wired = template.clone();
    apply_ops(&mut wired, &add_edge_ops(&template, 120)).expect("wire fixture");
    let remove_hub = [Op::RemoveNode {
        node_id: NodeId::from_counter(2),
    }];
    group.throughput(Throughput::Elements(1));
    group.bench_function("remove_node_cascade", |b| {
        b.iter_batched(
            || wired.clone(),
            |mut diagram| {
                let result =
                    apply_ops(&mut diagram, black_box(&remove_hub)).expect("apply_ops");
                black_box(checksum_apply_result(&result))
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_editor(c: &mut Criterion) {
    let mut group = c.benchmark_group("editor.mutation");
    let questions = (1..=10)
        .map(|id| Question::new(id, format!("Question {id}"), "bench"))
        .collect::<Vec<_>>();
    let new_editor = || {
        let mut editor =
            Editor::with_jitter(questions.clone(), EditorConfig::default(), FixedJitter(0.0))
                .expect("editor");
        for _ in 0..50 {
            editor.add_node(ShapeKind::Process).expect("add");
        }
        editor
    };

    group.bench_function("add_node", |b| {
        b.iter_batched(
            new_editor,
            |mut editor| black_box(editor.add_palette_node().expect("add")),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("drag_frames_then_drop", |b| {
        b.iter_batched(
            new_editor,
            |mut editor| {
                let id = NodeId::from_counter(2);
                for step in 0..30 {
                    let change = NodeChange::Position {
                        id: id.clone(),
                        position: Position::new(150.0 + step as f64, 150.0),
                        dragging: true,
                    };
                    editor.on_nodes_change(&[change]).expect("drag");
                }
                let release = NodeChange::Position {
                    id,
                    position: Position::new(180.0, 150.0),
                    dragging: false,
                };
                black_box(editor.on_nodes_change(&[release]).expect("drop"))
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("switch_question", |b| {
        b.iter_batched(
            new_editor,
            |mut editor| {
                while editor.next_question().expect("next") {}
                black_box(editor.active_index())
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render.text");
    for (case, count) in [("small", 5), ("medium_dense", 60)] {
        let mut diagram = grid_diagram(count);
        let edges = add_edge_ops(&diagram, count * 2);
        apply_ops(&mut diagram, &edges).expect("wire fixture");
        group.bench_function(case, |b| {
            b.iter(|| {
                let text = render_diagram(black_box(&diagram), RenderOptions::default())
                    .expect("render");
                black_box(text.len())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_apply, bench_editor, bench_render);
criterion_main!(benches);
