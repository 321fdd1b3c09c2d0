// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use log::debug;

use super::{StoreError, ValidationError};
use crate::model::Diagram;

/// Fixed-size collection of diagrams, one per question slot.
///
/// The slot count is chosen at construction and never changes; the index is the only key.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentStore {
    slots: Vec<Diagram>,
}

impl DocumentStore {
    /// Creates `slot_count` initial diagrams.
    pub fn new(slot_count: usize) -> Result<Self, StoreError> {
        if slot_count == 0 {
            return Err(StoreError::NoSlots);
        }
        Ok(Self {
            slots: vec![Diagram::initial(); slot_count],
        })
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn diagrams(&self) -> &[Diagram] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Result<&Diagram, StoreError> {
        self.slots.get(index).ok_or(StoreError::SlotOutOfRange {
            index,
            slot_count: self.slots.len(),
        })
    }

    /// Overwrites one slot.
    pub fn update(&mut self, index: usize, diagram: Diagram) -> Result<(), StoreError> {
        let slot_count = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(StoreError::SlotOutOfRange { index, slot_count })?;
        *slot = diagram;
        Ok(())
    }

    /// Replaces every slot at once. The store is untouched unless the whole input is accepted.
    pub fn replace_all(&mut self, diagrams: Vec<Diagram>) -> Result<(), ValidationError> {
        if diagrams.len() != self.slots.len() {
            return Err(ValidationError::SlotCountMismatch {
                expected: self.slots.len(),
                found: diagrams.len(),
            });
        }
        for (index, diagram) in diagrams.iter().enumerate() {
            diagram
                .validate()
                .map_err(|source| ValidationError::InvalidDiagram { index, source })?;
        }

        debug!(slots = diagrams.len(); "replacing all diagrams");
        self.slots = diagrams;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::DocumentStore;
    use crate::model::{Diagram, Edge, EdgeId, Node, NodeId, Position, ShapeKind};
    use crate::ops::{apply_ops, Op};
    use crate::store::{StoreError, ValidationError};

    #[fixture]
    fn store() -> DocumentStore {
        DocumentStore::new(3).expect("store")
    }

    fn edited() -> Diagram {
        let mut diagram = Diagram::initial();
        apply_ops(
            &mut diagram,
            &[Op::AddNode {
                kind: ShapeKind::Decision,
                position: Position::new(100.0, 200.0),
                label: None,
            }],
        )
        .expect("apply");
        diagram
    }

    #[rstest]
    fn new_store_holds_initial_diagrams(store: DocumentStore) {
        assert_eq!(store.slot_count(), 3);
        assert!(store.diagrams().iter().all(|d| *d == Diagram::initial()));
    }

    #[test]
    fn zero_slots_are_rejected() {
        assert_eq!(DocumentStore::new(0), Err(StoreError::NoSlots));
    }

    #[rstest]
    fn get_out_of_range_is_an_error(store: DocumentStore) {
        assert_eq!(
            store.get(3),
            Err(StoreError::SlotOutOfRange {
                index: 3,
                slot_count: 3
            })
        );
    }

    #[rstest]
    fn update_touches_only_one_slot(mut store: DocumentStore) {
        store.update(1, edited()).expect("update");
        assert_eq!(store.get(0).expect("slot 0"), &Diagram::initial());
        assert_eq!(store.get(1).expect("slot 1"), &edited());
        assert_eq!(store.get(2).expect("slot 2"), &Diagram::initial());
    }

    #[rstest]
    fn replace_all_with_wrong_length_leaves_store_unchanged(mut store: DocumentStore) {
        store.update(0, edited()).expect("update");
        let before = store.clone();

        let err = store
            .replace_all(vec![Diagram::initial(), Diagram::initial()])
            .unwrap_err();

        assert!(matches!(
            err,
            ValidationError::SlotCountMismatch {
                expected: 3,
                found: 2
            }
        ));
        assert_eq!(store, before);
    }

    #[rstest]
    fn replace_all_rejects_invalid_diagram_without_partial_writes(mut store: DocumentStore) {
        let before = store.clone();
        let broken = {
            let mut diagram = Diagram::initial();
            diagram.edges_mut().push(Edge::new(
                EdgeId::new("dangling").expect("edge id"),
                NodeId::from_counter(1),
                NodeId::from_counter(7),
            ));
            diagram
        };

        let err = store
            .replace_all(vec![edited(), edited(), broken])
            .unwrap_err();

        assert!(matches!(err, ValidationError::InvalidDiagram { index: 2, .. }));
        assert_eq!(store, before);
    }

    #[rstest]
    fn replace_all_swaps_every_slot(mut store: DocumentStore) {
        let mut custom = Diagram::initial();
        custom.nodes_mut().push(Node::new(
            NodeId::from_counter(2),
            ShapeKind::Text,
            "note",
            Position::default(),
        ));
        let custom = Diagram::from_parts(custom.nodes().to_vec(), Vec::new(), 3).expect("valid");

        store
            .replace_all(vec![custom.clone(), edited(), Diagram::initial()])
            .expect("replace");

        assert_eq!(store.get(0).expect("slot 0"), &custom);
        assert_eq!(store.get(1).expect("slot 1"), &edited());
    }
}
