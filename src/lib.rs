// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Flowdeck: a terminal flowchart editor with one independent canvas per question.
//!
//! [`editor::Editor`] keeps the active canvas and a [`store::DocumentStore`] of every slot in
//! step. [`store`] also holds the JSON export format, [`render`] the character-grid renderer used
//! by both the terminal surface and image export.

pub mod cli;
pub mod config;
pub mod editor;
pub mod model;
pub mod ops;
pub mod render;
pub mod snapshot;
pub mod store;
pub mod tui;
