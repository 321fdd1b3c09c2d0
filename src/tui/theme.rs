// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::env;
use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};
use thiserror::Error;

use crate::model::ShapeKind;

pub(crate) const KIND_COLORS_ENV: &str = "FLOWDECK_KIND_COLORS";

#[derive(Debug, Clone, Default)]
pub(crate) struct TuiTheme {
    kind_overrides: BTreeMap<ShapeKind, Color>,
}

impl TuiTheme {
    /// Reads per-kind colour overrides from `FLOWDECK_KIND_COLORS`, e.g.
    /// `rectangle=#112233,diamond=red`.
    pub(crate) fn from_env() -> Result<Self, ThemeError> {
        match env::var(KIND_COLORS_ENV) {
            Ok(value) => Self::from_overrides(&value),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(env::VarError::NotUnicode(_)) => Err(ThemeError::InvalidEnv {
                name: KIND_COLORS_ENV,
                value: "<non-unicode>".to_owned(),
            }),
        }
    }

    pub(crate) fn from_overrides(value: &str) -> Result<Self, ThemeError> {
        let mut kind_overrides = BTreeMap::new();
        for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let invalid = || ThemeError::InvalidEnv {
                name: KIND_COLORS_ENV,
                value: entry.to_owned(),
            };
            let (kind, color) = entry.split_once('=').ok_or_else(invalid)?;
            let kind = ShapeKind::from_str(kind.trim()).map_err(|_| invalid())?;
            let color = Color::from_str(color.trim()).map_err(|_| invalid())?;
            kind_overrides.insert(kind, color);
        }
        Ok(Self { kind_overrides })
    }

    /// Minimap colour of a node kind.
    pub(crate) fn kind_color(&self, kind: ShapeKind) -> Color {
        if let Some(color) = self.kind_overrides.get(&kind) {
            return *color;
        }
        match kind {
            ShapeKind::Process => Color::Rgb(0x66, 0x7e, 0xea),
            ShapeKind::Decision => Color::Rgb(0xf5, 0x57, 0x6c),
            ShapeKind::Terminal => Color::Rgb(0x00, 0xf2, 0xfe),
            ShapeKind::InputOutput => Color::Rgb(0xfe, 0xe1, 0x40),
            ShapeKind::Text => Color::Rgb(0x66, 0x66, 0x66),
        }
    }

    pub(crate) fn panel_border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(Color::LightGreen)
        } else {
            Style::default()
        }
    }

    pub(crate) fn selection_style(&self) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn connect_source_style(&self) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn error_style(&self) -> Style {
        Style::default().fg(Color::Red)
    }
}

#[derive(Debug, Clone, Error)]
pub(crate) enum ThemeError {
    #[error("invalid env {name}={value}")]
    InvalidEnv { name: &'static str, value: String },
}
