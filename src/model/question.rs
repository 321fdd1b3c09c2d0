// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

/// Fixed metadata of a question slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
    pub description: String,
}

impl Question {
    pub fn new(id: u32, text: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            description: description.into(),
        }
    }
}

/// The question set used when no config file overrides it.
pub fn default_questions() -> Vec<Question> {
    vec![
        Question::new(
            1,
            "Question 1: A musical AI creates a \u{201c}melody pattern\u{201d} where each new note\u{2019}s frequency equals the sum of the previous two.",
            "Design a flowchart that uses recursion to generate the first N notes of this melody (Fibonacci pattern).",
        ),
        Question::new(
            2,
            "Question 2: Design a flowchart to simulate a robot moving across 10 tiles.",
            "The robot should skip tile 5 if it is blocked, but stop completely if an obstacle is detected on any other tile. tile_count = 10  For each tile (1 to 10), input the status: 0 \u{2192} No obstacle 1 \u{2192} Obstacle present",
        ),
        Question::new(
            3,
            "Question 3: Write a flowchart to find the largest of three numbers.",
            "Create a flowchart that takes three numbers as input and finds the largest one.",
        ),
    ]
}
