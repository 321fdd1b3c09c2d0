// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A diagram is one question's canvas: nodes with a closed set of shapes, edges between them,
//! and a node id counter that never hands out the same id twice.

pub mod diagram;
pub mod ids;
pub mod question;
pub mod shape;

pub use diagram::{
    ArrowMarker, Diagram, DiagramError, Edge, EdgeStyle, Node, Position, COORDINATE_LIMIT,
    EDGE_ACCENT_COLOR, START_LABEL, START_POSITION,
};
pub use ids::{EdgeId, Id, IdError, NodeId};
pub use question::{default_questions, Question};
pub use shape::{ParseShapeKindError, ShapeKind};
