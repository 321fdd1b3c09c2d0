// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::ids::NodeId;

/// The closed set of flowchart node shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ShapeKind {
    #[default]
    Process,
    Decision,
    Terminal,
    InputOutput,
    Text,
}

impl ShapeKind {
    /// Palette order.
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Process,
        ShapeKind::Decision,
        ShapeKind::Terminal,
        ShapeKind::InputOutput,
        ShapeKind::Text,
    ];

    /// The `type` string used in exported files.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Process => "rectangle",
            Self::Decision => "diamond",
            Self::Terminal => "circle",
            Self::InputOutput => "parallelogram",
            Self::Text => "text",
        }
    }

    pub fn palette_label(self) -> &'static str {
        match self {
            Self::Process => "Process",
            Self::Decision => "Decision",
            Self::Terminal => "Start/End",
            Self::InputOutput => "Input/Output",
            Self::Text => "Text",
        }
    }

    pub fn icon(self) -> char {
        match self {
            Self::Process => '▭',
            Self::Decision => '◆',
            Self::Terminal => '●',
            Self::InputOutput => '▱',
            Self::Text => 'T',
        }
    }

    /// Label given to a freshly added node, e.g. `Rectangle 2`.
    pub fn default_label(self, node_id: &NodeId) -> String {
        let wire = self.wire_name();
        let mut chars = wire.chars();
        let mut label = String::with_capacity(wire.len() + 1 + node_id.as_str().len());
        if let Some(first) = chars.next() {
            label.extend(first.to_uppercase());
        }
        label.push_str(chars.as_str());
        label.push(' ');
        label.push_str(node_id.as_str());
        label
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown node shape `{value}`")]
pub struct ParseShapeKindError {
    value: String,
}

impl ParseShapeKindError {
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl FromStr for ShapeKind {
    type Err = ParseShapeKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.wire_name() == s)
            .ok_or_else(|| ParseShapeKindError { value: s.to_owned() })
    }
}
