// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Document storage and the portable file format.
//!
//! [`DocumentStore`] owns one diagram per question slot. The [`portable`] module converts the
//! whole store to and from the JSON export format and handles the file I/O around it.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::{DiagramError, IdError, ParseShapeKindError};

pub mod document_store;
pub mod portable;

pub use document_store::DocumentStore;
pub use portable::{
    export_document, parse_document, read_document, render_document, write_document,
    PortableCanvas, PortableEdge, PortableFile, PortableNode, PortableQuestion,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("a document store needs at least one slot")]
    NoSlots,
    #[error("slot {index} is out of range (slot count {slot_count})")]
    SlotOutOfRange { index: usize, slot_count: usize },
}

/// An imported document or replacement set that cannot be accepted as a whole.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("expected {expected} questions, found {found}")]
    SlotCountMismatch { expected: usize, found: usize },
    #[error("document has no `questions` list")]
    MissingQuestions,
    #[error("malformed flowchart document: {source}")]
    Malformed {
        #[source]
        source: serde_json::Error,
    },
    #[error("question {index}: invalid {field} `{value}`: {source}")]
    InvalidId {
        index: usize,
        field: &'static str,
        value: String,
        #[source]
        source: IdError,
    },
    #[error("question {index}: node {node_id}: {source}")]
    UnknownShape {
        index: usize,
        node_id: String,
        #[source]
        source: ParseShapeKindError,
    },
    #[error("question {index}: node {node_id} is placed outside the canvas at ({x}, {y})")]
    PositionOutOfRange {
        index: usize,
        node_id: String,
        x: f64,
        y: f64,
    },
    #[error("question {index}: {source}")]
    InvalidDiagram {
        index: usize,
        #[source]
        source: DiagramError,
    },
}

/// Failures of the file-backed import/export paths.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode flowchart document: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
