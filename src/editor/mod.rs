// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The active editing session over a [`DocumentStore`].
//!
//! [`Editor`] owns the store and a working copy of the active slot. Every mutation method applies
//! its ops to the working copy and writes the result back to the store before returning, so the
//! two are equal after each completed mutation. The only exception is an in-progress drag:
//! intermediate positions stay in the working copy until the drag ends.

use std::collections::BTreeSet;
use std::path::Path;

use log::{debug, info};
use thiserror::Error;

use crate::config::EditorConfig;
use crate::model::{Diagram, EdgeId, NodeId, Position, Question, ShapeKind};
use crate::ops::{apply_ops, next_edge_id, Delta, EditError, Op};
use crate::snapshot::{export_image, EncodingError, ImageEncoder, ImageExport, SurfaceChrome};
use crate::store::{
    export_document, parse_document, read_document, render_document, write_document,
    DocumentStore, GatewayError, PortableFile, StoreError, ValidationError,
};

mod events;
mod jitter;

pub use events::{Connection, EdgeChange, NodeChange, Selection};
pub use jitter::{FixedJitter, Jitter, RandomJitter};

/// A blocking yes/no prompt.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    EdgesRemoved(usize),
    NodesRemoved { nodes: usize, edges: usize },
    Declined,
    NothingSelected,
}

/// Surface pan offset in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
}

pub const CLEAR_PROMPT: &str = "Are you sure you want to clear this question's flowchart?";

pub struct Editor {
    questions: Vec<Question>,
    store: DocumentStore,
    active_index: usize,
    session: Diagram,
    selection: Selection,
    palette: ShapeKind,
    viewport: Viewport,
    settings: EditorConfig,
    jitter: Box<dyn Jitter>,
    dragging: BTreeSet<NodeId>,
}

impl Editor {
    /// One slot per question; the first slot starts active.
    pub fn new(questions: Vec<Question>, settings: EditorConfig) -> Result<Self, StoreError> {
        Self::with_jitter(questions, settings, RandomJitter::new())
    }

    pub fn with_jitter(
        questions: Vec<Question>,
        settings: EditorConfig,
        jitter: impl Jitter + 'static,
    ) -> Result<Self, StoreError> {
        let store = DocumentStore::new(questions.len())?;
        let session = store.get(0)?.clone();
        Ok(Self {
            questions,
            store,
            active_index: 0,
            session,
            selection: Selection::default(),
            palette: ShapeKind::default(),
            viewport: Viewport::default(),
            settings,
            jitter: Box::new(jitter),
            dragging: BTreeSet::new(),
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_question(&self) -> Option<&Question> {
        self.questions.get(self.active_index)
    }

    pub fn slot_count(&self) -> usize {
        self.store.slot_count()
    }

    /// The working copy of the active slot, including uncommitted drag positions.
    pub fn diagram(&self) -> &Diagram {
        &self.session
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn palette(&self) -> ShapeKind {
        self.palette
    }

    pub fn set_palette(&mut self, kind: ShapeKind) {
        self.palette = kind;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.viewport.x += dx;
        self.viewport.y += dy;
    }

    pub fn settings(&self) -> &EditorConfig {
        &self.settings
    }

    pub fn is_dragging(&self) -> bool {
        !self.dragging.is_empty()
    }

    /// Whether the working copy equals the stored slot.
    pub fn is_synchronized(&self) -> bool {
        self.store
            .get(self.active_index)
            .is_ok_and(|stored| *stored == self.session)
    }

    /// Makes slot `index` the active diagram.
    ///
    /// A drag still in progress on the previous slot is committed first.
    pub fn activate(&mut self, index: usize) -> Result<&Diagram, EditorError> {
        self.commit_drags()?;
        self.session = self.store.get(index)?.clone();
        self.active_index = index;
        self.selection.clear();
        info!(slot = index; "activated question");
        Ok(&self.session)
    }

    /// Moves to the next slot; returns `false` at the last one.
    pub fn next_question(&mut self) -> Result<bool, EditorError> {
        if self.active_index + 1 >= self.slot_count() {
            return Ok(false);
        }
        self.activate(self.active_index + 1)?;
        Ok(true)
    }

    /// Moves to the previous slot; returns `false` at the first one.
    pub fn previous_question(&mut self) -> Result<bool, EditorError> {
        let Some(index) = self.active_index.checked_sub(1) else {
            return Ok(false);
        };
        self.activate(index)?;
        Ok(true)
    }

    /// Adds a node of the palette's shape kind.
    pub fn add_palette_node(&mut self) -> Result<NodeId, EditorError> {
        self.add_node(self.palette)
    }

    /// Adds a node near the top-left corner of the viewport.
    pub fn add_node(&mut self, kind: ShapeKind) -> Result<NodeId, EditorError> {
        let position = self.spawn_position();
        let node_id = NodeId::from_counter(self.session.next_node_id());
        self.apply(&[Op::AddNode {
            kind,
            position,
            label: None,
        }])?;
        info!(slot = self.active_index, node_id:% = node_id, kind:% = kind; "added node");
        Ok(node_id)
    }

    fn spawn_position(&mut self) -> Position {
        let EditorConfig {
            spawn_offset,
            spawn_jitter,
            ..
        } = self.settings;
        let x = self.viewport.x.abs() + self.jitter.sample(spawn_jitter) + spawn_offset;
        let y = self.viewport.y.abs() + self.jitter.sample(spawn_jitter) + spawn_offset;
        self.snap(Position::new(x, y))
    }

    fn snap(&self, position: Position) -> Position {
        if self.settings.snap_to_grid {
            position.snapped(self.settings.snap_grid)
        } else {
            position
        }
    }

    pub fn set_node_label(
        &mut self,
        node_id: &NodeId,
        label: impl Into<String>,
    ) -> Result<(), EditorError> {
        self.apply(&[Op::SetNodeLabel {
            node_id: node_id.clone(),
            label: label.into(),
        }])?;
        debug!(slot = self.active_index, node_id:% = node_id; "relabelled node");
        Ok(())
    }

    /// Handles node changes from the surface.
    ///
    /// Drag frames move the node in the working copy only. The frame that ends the drag, and
    /// every other change, is applied and written back to the store.
    pub fn on_nodes_change(&mut self, changes: &[NodeChange]) -> Result<Delta, EditorError> {
        let mut ops = Vec::new();
        for change in changes {
            match change {
                NodeChange::Position {
                    id,
                    position,
                    dragging: true,
                } => {
                    let Some(node) = self.session.node_mut(id) else {
                        return Err(EditError::NodeNotFound {
                            node_id: id.clone(),
                        }
                        .into());
                    };
                    node.set_position(*position);
                    self.dragging.insert(id.clone());
                }
                NodeChange::Position {
                    id,
                    position,
                    dragging: false,
                } => ops.push(Op::MoveNode {
                    node_id: id.clone(),
                    position: self.snap(*position),
                }),
                NodeChange::Remove { id } => ops.push(Op::RemoveNode {
                    node_id: id.clone(),
                }),
                NodeChange::Select { id, selected } => {
                    if self.session.contains_node(id) {
                        self.selection.set_node(id.clone(), *selected);
                    }
                }
            }
        }

        if ops.is_empty() {
            return Ok(Delta::default());
        }
        self.apply(&ops)
    }

    pub fn on_edges_change(&mut self, changes: &[EdgeChange]) -> Result<Delta, EditorError> {
        let mut ops = Vec::new();
        for change in changes {
            match change {
                EdgeChange::Remove { id } => ops.push(Op::RemoveEdge {
                    edge_id: id.clone(),
                }),
                EdgeChange::Select { id, selected } => {
                    if self.session.contains_edge(id) {
                        self.selection.set_edge(id.clone(), *selected);
                    }
                }
            }
        }

        if ops.is_empty() {
            return Ok(Delta::default());
        }
        self.apply(&ops)
    }

    pub fn on_connect(&mut self, connection: &Connection) -> Result<EdgeId, EditorError> {
        let edge_id = next_edge_id(&self.session, &connection.source, &connection.target);
        self.apply(&[Op::AddEdge {
            source: connection.source.clone(),
            target: connection.target.clone(),
            style: None,
        }])?;
        info!(
            slot = self.active_index,
            edge_id:% = edge_id,
            source:% = connection.source,
            target:% = connection.target;
            "connected nodes",
        );
        Ok(edge_id)
    }

    /// Removes the listed nodes and their edges. Ids that are already gone are skipped.
    pub fn on_nodes_delete(&mut self, node_ids: &[NodeId]) -> Result<Delta, EditorError> {
        let ops = unique(node_ids)
            .filter(|id| self.session.contains_node(id))
            .map(|id| Op::RemoveNode {
                node_id: id.clone(),
            })
            .collect::<Vec<_>>();
        self.apply(&ops)
    }

    /// Removes the listed edges. Ids that are already gone are skipped.
    pub fn on_edges_delete(&mut self, edge_ids: &[EdgeId]) -> Result<Delta, EditorError> {
        let ops = unique(edge_ids)
            .filter(|id| self.session.contains_edge(id))
            .map(|id| Op::RemoveEdge {
                edge_id: id.clone(),
            })
            .collect::<Vec<_>>();
        self.apply(&ops)
    }

    /// Replaces the selection; unknown ids are ignored.
    pub fn on_selection_change(
        &mut self,
        nodes: impl IntoIterator<Item = NodeId>,
        edges: impl IntoIterator<Item = EdgeId>,
    ) {
        self.selection.clear();
        for id in nodes {
            self.selection.set_node(id, true);
        }
        for id in edges {
            self.selection.set_edge(id, true);
        }
        self.selection.retain_existing(&self.session);
    }

    /// Makes at most one node and one edge the whole selection.
    pub fn select_only(&mut self, node: Option<NodeId>, edge: Option<EdgeId>) {
        self.on_selection_change(node, edge);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Delete/Backspace: removes selected edges only, never nodes.
    pub fn handle_delete_key(&mut self) -> Result<DeleteOutcome, EditorError> {
        if self.selection.edges().is_empty() {
            return Ok(DeleteOutcome::NothingSelected);
        }
        self.remove_selected_edges()
    }

    /// The explicit "delete selected" action.
    ///
    /// Selected edges are removed without asking. Otherwise selected nodes are removed together
    /// with their edges, after `confirm` agrees.
    pub fn delete_selected(
        &mut self,
        confirm: &mut dyn Confirm,
    ) -> Result<DeleteOutcome, EditorError> {
        if !self.selection.edges().is_empty() {
            return self.remove_selected_edges();
        }
        let count = self.selection.nodes().len();
        if count == 0 {
            return Ok(DeleteOutcome::NothingSelected);
        }
        if !confirm.confirm(&format!("Delete {count} node(s)?")) {
            debug!(slot = self.active_index, nodes = count; "node deletion declined");
            return Ok(DeleteOutcome::Declined);
        }

        let node_ids = self.selection.nodes().iter().cloned().collect::<Vec<_>>();
        let delta = self.on_nodes_delete(&node_ids)?;
        self.selection.clear();
        let outcome = DeleteOutcome::NodesRemoved {
            nodes: delta.removed_nodes().count(),
            edges: delta.removed_edges().count(),
        };
        info!(slot = self.active_index, outcome:? = outcome; "deleted selection");
        Ok(outcome)
    }

    fn remove_selected_edges(&mut self) -> Result<DeleteOutcome, EditorError> {
        let edge_ids = self.selection.edges().iter().cloned().collect::<Vec<_>>();
        let delta = self.on_edges_delete(&edge_ids)?;
        self.selection.clear();
        let removed = delta.removed_edges().count();
        info!(slot = self.active_index, edges = removed; "deleted selected edges");
        Ok(DeleteOutcome::EdgesRemoved(removed))
    }

    /// Resets the active slot to the initial diagram after `confirm` agrees.
    pub fn clear(&mut self, confirm: &mut dyn Confirm) -> Result<bool, EditorError> {
        if !confirm.confirm(CLEAR_PROMPT) {
            return Ok(false);
        }
        self.apply(&[Op::Clear])?;
        self.selection.clear();
        info!(slot = self.active_index; "cleared question");
        Ok(true)
    }

    /// Applies `ops` to the working copy and writes it back to the store.
    ///
    /// Ends any drag in progress: dragged nodes are committed at their snapped positions in the
    /// same batch, ahead of `ops`.
    fn apply(&mut self, ops: &[Op]) -> Result<Delta, EditorError> {
        let mut batch = self.pending_drag_ops();
        batch.extend_from_slice(ops);
        let result = apply_ops(&mut self.session, &batch)?;
        self.dragging.clear();
        self.selection.retain_existing(&self.session);
        self.sync()?;
        debug!(
            slot = self.active_index,
            applied = result.applied,
            added = result.delta.added.len(),
            removed = result.delta.removed.len(),
            updated = result.delta.updated.len();
            "applied ops",
        );
        Ok(result.delta)
    }

    fn pending_drag_ops(&self) -> Vec<Op> {
        self.dragging
            .iter()
            .filter_map(|id| self.session.node(id))
            .map(|node| Op::MoveNode {
                node_id: node.id().clone(),
                position: self.snap(node.position()),
            })
            .collect()
    }

    fn commit_drags(&mut self) -> Result<(), EditorError> {
        if self.dragging.is_empty() {
            return Ok(());
        }
        debug!(
            slot = self.active_index,
            nodes = self.dragging.len();
            "committing unfinished drag",
        );
        self.apply(&[])?;
        Ok(())
    }

    fn sync(&mut self) -> Result<(), StoreError> {
        self.store.update(self.active_index, self.session.clone())
    }

    /// Snapshot of every slot with its question metadata.
    pub fn export_document(&self) -> PortableFile {
        export_document(&self.questions, &self.store)
    }

    pub fn export_json(&self) -> Result<String, GatewayError> {
        render_document(&self.export_document())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), GatewayError> {
        let json = self.export_json()?;
        write_document(path, json.as_bytes())
    }

    /// Replaces every slot from an exported document and re-activates the current slot.
    ///
    /// On any validation error nothing changes.
    pub fn import_str(&mut self, src: &str) -> Result<(), EditorError> {
        let diagrams = parse_document(src, self.slot_count())?;
        self.store.replace_all(diagrams)?;
        self.dragging.clear();
        self.session = self.store.get(self.active_index)?.clone();
        self.selection.clear();
        info!(slots = self.slot_count(), slot = self.active_index; "imported flowchart document");
        Ok(())
    }

    pub fn load_from(&mut self, path: &Path) -> Result<(), EditorError> {
        let src = read_document(path)?;
        self.import_str(&src)
    }

    /// Exports the active diagram as an image with the surface chrome hidden.
    pub fn export_image<C: SurfaceChrome + ?Sized>(
        &self,
        chrome: &mut C,
        encoder: &dyn ImageEncoder,
    ) -> Result<ImageExport, EncodingError> {
        export_image(&self.session, self.active_index, chrome, encoder)
    }
}

fn unique<T: Ord>(ids: &[T]) -> impl Iterator<Item = &T> {
    ids.iter().collect::<BTreeSet<_>>().into_iter()
}
