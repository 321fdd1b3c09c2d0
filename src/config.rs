// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! TOML configuration.
//!
//! ```toml
//! [editor]
//! snap_to_grid = true
//! snap_grid = [15.0, 15.0]
//! spawn_offset = 150.0
//! spawn_jitter = 100.0
//!
//! [[questions]]
//! id = 1
//! text = "Question 1: ..."
//! description = "..."
//! ```
//!
//! Every field is optional. Without `[[questions]]` the built-in question set is used; the
//! number of questions fixes the number of diagram slots for the whole run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::model::{default_questions, Question};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    MissingFile { path: PathBuf },
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("config defines no questions")]
    NoQuestions,
    #[error("invalid editor setting `{field}`: {reason}")]
    InvalidEditor {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_questions")]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub editor: EditorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            questions: default_questions(),
            editor: EditorConfig::default(),
        }
    }
}

/// Placement rules for new and moved nodes.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub snap_to_grid: bool,
    /// Grid step in surface pixels, `[x, y]`.
    pub snap_grid: [f64; 2],
    /// Distance from the viewport corner at which new nodes appear.
    pub spawn_offset: f64,
    /// Upper bound (exclusive) of the random offset added to new nodes on each axis.
    pub spawn_jitter: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_to_grid: true,
            snap_grid: [15.0, 15.0],
            spawn_offset: 150.0,
            spawn_jitter: 100.0,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(
            path:% = path.display(),
            questions = config.questions.len();
            "loaded config",
        );
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn slot_count(&self) -> usize {
        self.questions.len()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.questions.is_empty() {
            return Err(ConfigError::NoQuestions);
        }
        let editor = &self.editor;
        if editor.snap_grid.iter().any(|step| !step.is_finite() || *step <= 0.0) {
            return Err(ConfigError::InvalidEditor {
                field: "snap_grid",
                reason: "grid steps must be positive",
            });
        }
        if !editor.spawn_offset.is_finite() {
            return Err(ConfigError::InvalidEditor {
                field: "spawn_offset",
                reason: "must be a finite number",
            });
        }
        if !editor.spawn_jitter.is_finite() || editor.spawn_jitter < 0.0 {
            return Err(ConfigError::InvalidEditor {
                field: "spawn_jitter",
                reason: "must be zero or positive",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::{Config, ConfigError, EditorConfig};
    use crate::model::default_questions;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml_str("").expect("config");
        assert_eq!(config, Config::default());
        assert_eq!(config.slot_count(), 3);
        assert_eq!(config.questions, default_questions());
    }

    #[test]
    fn questions_and_editor_settings_are_read() {
        let config = Config::from_toml_str(
            r#"
            [editor]
            snap_to_grid = false
            spawn_jitter = 0.0

            [[questions]]
            id = 7
            text = "Sum the digits"
            description = "Use a loop."
            "#,
        )
        .expect("config");

        assert_eq!(config.slot_count(), 1);
        assert_eq!(config.questions[0].id, 7);
        assert_eq!(
            config.editor,
            EditorConfig {
                snap_to_grid: false,
                spawn_jitter: 0.0,
                ..EditorConfig::default()
            }
        );
    }

    #[test]
    fn explicit_empty_question_list_is_rejected() {
        let err = Config::from_toml_str("questions = []").unwrap_err();
        assert!(matches!(err, ConfigError::NoQuestions));
    }

    #[test]
    fn non_positive_grid_is_rejected() {
        let err = Config::from_toml_str("[editor]\nsnap_grid = [0.0, 15.0]").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEditor {
                field: "snap_grid",
                ..
            }
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::from_toml_str("[editor]\nsnap = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "[editor]\nspawn_offset = 40.0").expect("write");

        let config = Config::load(file.path()).expect("load");

        assert_eq!(config.editor.spawn_offset, 40.0);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }
}
