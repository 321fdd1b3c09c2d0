// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Command-line interface.
//!
//! Without a subcommand the interactive editor opens on `flowchart.json` in the current
//! directory. `check` and `render` work on an export file without a terminal UI.

use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::info;

use crate::config::Config;
use crate::editor::Editor;
use crate::model::Diagram;
use crate::render::{render_diagram, RenderOptions};
use crate::store::{parse_document, read_document};

pub const DEFAULT_DOCUMENT: &str = "flowchart.json";

/// Multi-question flowchart editor.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Write logs to this file. The editor logs nowhere without it.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the interactive editor (default)
    Edit {
        /// Export file loaded on start (when present) and written by save
        #[arg(default_value = DEFAULT_DOCUMENT)]
        file: PathBuf,

        /// Directory receiving exported images
        #[arg(long, default_value = ".")]
        image_dir: PathBuf,
    },
    /// Validate an export file against the configured questions
    Check { file: PathBuf },
    /// Print the text rendering of one question's flowchart
    Render {
        file: PathBuf,

        /// One-based question number
        #[arg(short, long, default_value_t = 1)]
        question: usize,
    },
}

impl Args {
    /// The subcommand to run, `edit` when none was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or_else(|| Command::Edit {
            file: PathBuf::from(DEFAULT_DOCUMENT),
            image_dir: PathBuf::from("."),
        })
    }

    /// Whether the run takes over the terminal.
    pub fn is_interactive(&self) -> bool {
        matches!(self.command(), Command::Edit { .. })
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CliError {
    #[error("question {question} does not exist; the document has {count} question(s)")]
    QuestionOutOfRange { question: usize, count: usize },
}

pub fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match args.command() {
        Command::Edit { file, image_dir } => edit(config, file, image_dir),
        Command::Check { file } => {
            let diagrams = load_diagrams(&file, &config)?;
            let mut stdout = std::io::stdout().lock();
            write_summary(&mut stdout, &diagrams)?;
            Ok(())
        }
        Command::Render { file, question } => {
            let diagrams = load_diagrams(&file, &config)?;
            let text = render_question(&diagrams, question)?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}")?;
            Ok(())
        }
    }
}

fn edit(config: Config, file: PathBuf, image_dir: PathBuf) -> Result<(), Box<dyn Error>> {
    let mut editor = Editor::new(config.questions, config.editor)?;
    if file.exists() {
        editor.load_from(&file)?;
    }
    info!(path:% = file.display(), slots = editor.slot_count(); "opening editor");
    crate::tui::run(editor, file, image_dir)
}

fn load_diagrams(path: &Path, config: &Config) -> Result<Vec<Diagram>, Box<dyn Error>> {
    let src = read_document(path)?;
    let diagrams = parse_document(&src, config.slot_count())?;
    info!(path:% = path.display(), slots = diagrams.len(); "validated flowchart document");
    Ok(diagrams)
}

pub fn write_summary(out: &mut impl Write, diagrams: &[Diagram]) -> std::io::Result<()> {
    for (idx, diagram) in diagrams.iter().enumerate() {
        writeln!(
            out,
            "question {}: {} node(s), {} edge(s)",
            idx + 1,
            diagram.nodes().len(),
            diagram.edges().len()
        )?;
    }
    writeln!(out, "ok")
}

/// Renders the one-based `question` of `diagrams`.
pub fn render_question(diagrams: &[Diagram], question: usize) -> Result<String, Box<dyn Error>> {
    let diagram = question
        .checked_sub(1)
        .and_then(|idx| diagrams.get(idx))
        .ok_or(CliError::QuestionOutOfRange {
            question,
            count: diagrams.len(),
        })?;
    Ok(render_diagram(diagram, RenderOptions::default())?)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::Parser;

    use super::{render_question, write_summary, Args, CliError, Command, DEFAULT_DOCUMENT};
    use crate::model::Diagram;

    #[test]
    fn no_subcommand_means_edit_default_document() {
        let args = Args::parse_from(["flowdeck"]);

        assert_eq!(args.log_level, "info");
        assert!(args.is_interactive());
        assert_eq!(
            args.command(),
            Command::Edit {
                file: DEFAULT_DOCUMENT.into(),
                image_dir: ".".into(),
            }
        );
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let args = Args::parse_from([
            "flowdeck",
            "render",
            "out.json",
            "--question",
            "2",
            "--log-level",
            "debug",
            "--config",
            "flowdeck.toml",
        ]);

        assert_eq!(args.log_level, "debug");
        assert_eq!(args.config.as_deref(), Some(Path::new("flowdeck.toml")));
        assert!(!args.is_interactive());
        assert_eq!(
            args.command(),
            Command::Render {
                file: "out.json".into(),
                question: 2,
            }
        );
    }

    #[test]
    fn summary_lists_every_question() {
        let mut out = Vec::new();
        write_summary(&mut out, &[Diagram::initial(), Diagram::initial()]).expect("write");

        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "question 1: 1 node(s), 0 edge(s)\nquestion 2: 1 node(s), 0 edge(s)\nok\n"
        );
    }

    #[test]
    fn render_question_is_one_based() {
        let diagrams = [Diagram::initial()];

        assert!(render_question(&diagrams, 1)
            .expect("render")
            .contains("( Start )"));
        for question in [0, 2] {
            let err = render_question(&diagrams, question).unwrap_err();
            assert_eq!(
                err.downcast_ref::<CliError>(),
                Some(&CliError::QuestionOutOfRange { question, count: 1 })
            );
        }
    }
}
