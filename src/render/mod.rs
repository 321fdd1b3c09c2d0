// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Text rendering for flowchart diagrams.
//!
//! Node positions are projected onto a character grid and every shape kind gets its own outline.
//! The annotated variant also returns a highlight index so the terminal surface can colour the
//! cells that belong to a selected node or edge.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::ops::ElementRef;

pub mod diagram;
mod text;

pub use diagram::{render_diagram, render_diagram_annotated, RenderError};

/// Projection and truncation settings for the text renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Surface pixels per character column.
    pub cell_width: f64,
    /// Surface pixels per character row.
    pub cell_height: f64,
    pub max_label_len: usize,
    /// Blank cells kept around the drawing.
    pub margin: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            cell_width: 10.0,
            cell_height: 20.0,
            max_label_len: 24,
            margin: 1,
        }
    }
}

/// `(y, x0, x1)` in character cells, inclusive, relative to the rendered lines.
pub type LineSpan = (usize, usize, usize);

pub type HighlightIndex = BTreeMap<ElementRef, Vec<LineSpan>>;

/// Rendered text plus the cells covered by each element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedRender {
    pub text: String,
    pub highlight_index: HighlightIndex,
}

/// Drops or shortens spans that fall outside the (trimmed) text.
pub(crate) fn clamp_highlight_index_to_text(highlight_index: &mut HighlightIndex, text: &str) {
    let line_lens = text.split('\n').map(text::text_len).collect::<Vec<_>>();

    highlight_index.retain(|_, spans| {
        spans.retain_mut(|(y, x0, x1)| {
            let Some(&len) = line_lens.get(*y) else {
                return false;
            };
            if len == 0 || *x0 >= len {
                return false;
            }
            *x1 = (*x1).min(len - 1);
            *x0 <= *x1
        });
        !spans.is_empty()
    });
}

pub const BOX_HORIZONTAL: char = '─';
pub const BOX_VERTICAL: char = '│';
pub const BOX_TOP_LEFT: char = '┌';
pub const BOX_TOP_RIGHT: char = '┐';
pub const BOX_BOTTOM_LEFT: char = '└';
pub const BOX_BOTTOM_RIGHT: char = '┘';
pub const BOX_TEE_RIGHT: char = '├';
pub const BOX_TEE_LEFT: char = '┤';
pub const BOX_TEE_DOWN: char = '┬';
pub const BOX_TEE_UP: char = '┴';
pub const BOX_CROSS: char = '┼';

/// Which sides of a cell a box-drawing stroke leaves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Strokes(u8);

impl Strokes {
    const NONE: Self = Self(0);
    const LEFT: Self = Self(1);
    const RIGHT: Self = Self(1 << 1);
    const UP: Self = Self(1 << 2);
    const DOWN: Self = Self(1 << 3);

    const fn or(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    fn has(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn of_char(ch: char) -> Option<Self> {
        let strokes = match ch {
            BOX_HORIZONTAL => Self::LEFT.or(Self::RIGHT),
            BOX_VERTICAL => Self::UP.or(Self::DOWN),
            BOX_TOP_LEFT => Self::RIGHT.or(Self::DOWN),
            BOX_TOP_RIGHT => Self::LEFT.or(Self::DOWN),
            BOX_BOTTOM_LEFT => Self::RIGHT.or(Self::UP),
            BOX_BOTTOM_RIGHT => Self::LEFT.or(Self::UP),
            BOX_TEE_RIGHT => Self::UP.or(Self::DOWN).or(Self::RIGHT),
            BOX_TEE_LEFT => Self::UP.or(Self::DOWN).or(Self::LEFT),
            BOX_TEE_DOWN => Self::LEFT.or(Self::RIGHT).or(Self::DOWN),
            BOX_TEE_UP => Self::LEFT.or(Self::RIGHT).or(Self::UP),
            BOX_CROSS => Self::LEFT.or(Self::RIGHT).or(Self::UP).or(Self::DOWN),
            _ => return None,
        };
        Some(strokes)
    }

    fn to_char(self) -> char {
        match self.0 {
            0 => ' ',
            1..=3 => BOX_HORIZONTAL,
            4 | 8 | 12 => BOX_VERTICAL,
            10 => BOX_TOP_LEFT,
            9 => BOX_TOP_RIGHT,
            6 => BOX_BOTTOM_LEFT,
            5 => BOX_BOTTOM_RIGHT,
            14 => BOX_TEE_RIGHT,
            13 => BOX_TEE_LEFT,
            11 => BOX_TEE_DOWN,
            7 => BOX_TEE_UP,
            _ => BOX_CROSS,
        }
    }
}

/// A bounds-checked character grid.
///
/// Plain characters overwrite whatever is in a cell. Box-drawing characters accumulate strokes
/// and are rendered as the junction that connects to their neighbours, so crossing edges turn
/// into `┼`, `├` and friends instead of hiding each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
    strokes: Vec<Strokes>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Result<Self, CanvasError> {
        let len = width
            .checked_mul(height)
            .ok_or(CanvasError::AreaOverflow { width, height })?;
        Ok(Self {
            width,
            height,
            cells: vec![' '; len],
            strokes: vec![Strokes::NONE; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Result<char, CanvasError> {
        let idx = self.index_of(x, y)?;
        Ok(self.glyph_at(x, y, idx))
    }

    pub fn set(&mut self, x: usize, y: usize, ch: char) -> Result<(), CanvasError> {
        let idx = self.index_of(x, y)?;
        match Strokes::of_char(ch) {
            Some(strokes) => self.strokes[idx] = self.strokes[idx].or(strokes),
            None => {
                self.cells[idx] = ch;
                self.strokes[idx] = Strokes::NONE;
            }
        }
        Ok(())
    }

    /// Writes `text` from `(x, y)` to the right, clipping at the right edge.
    pub fn write_str(&mut self, x: usize, y: usize, text: &str) -> Result<(), CanvasError> {
        if y >= self.height {
            return Err(self.out_of_bounds(x, y));
        }
        for (offset, ch) in text.chars().enumerate() {
            let cx = x + offset;
            if cx >= self.width {
                break;
            }
            self.set(cx, y, ch)?;
        }
        Ok(())
    }

    pub fn draw_hline(&mut self, x0: usize, x1: usize, y: usize) -> Result<(), CanvasError> {
        let (lo, hi) = (x0.min(x1), x0.max(x1));
        if y >= self.height || hi >= self.width {
            return Err(self.out_of_bounds(hi, y));
        }
        for x in lo..=hi {
            self.set(x, y, BOX_HORIZONTAL)?;
        }
        Ok(())
    }

    pub fn draw_vline(&mut self, x: usize, y0: usize, y1: usize) -> Result<(), CanvasError> {
        let (lo, hi) = (y0.min(y1), y0.max(y1));
        if x >= self.width || hi >= self.height {
            return Err(self.out_of_bounds(x, hi));
        }
        for y in lo..=hi {
            self.set(x, y, BOX_VERTICAL)?;
        }
        Ok(())
    }

    /// Draws a single-line box with corners at `(x0, y0)` and `(x1, y1)`.
    ///
    /// Nothing is drawn when any corner is out of bounds.
    pub fn draw_box(
        &mut self,
        x0: usize,
        y0: usize,
        x1: usize,
        y1: usize,
    ) -> Result<(), CanvasError> {
        let (left, right) = (x0.min(x1), x0.max(x1));
        let (top, bottom) = (y0.min(y1), y0.max(y1));
        if right >= self.width || bottom >= self.height {
            return Err(self.out_of_bounds(right, bottom));
        }
        if top == bottom {
            return self.draw_hline(left, right, top);
        }
        if left == right {
            return self.draw_vline(left, top, bottom);
        }

        for x in (left + 1)..right {
            self.set(x, top, BOX_HORIZONTAL)?;
            self.set(x, bottom, BOX_HORIZONTAL)?;
        }
        for y in (top + 1)..bottom {
            self.set(left, y, BOX_VERTICAL)?;
            self.set(right, y, BOX_VERTICAL)?;
        }
        self.set(left, top, BOX_TOP_LEFT)?;
        self.set(right, top, BOX_TOP_RIGHT)?;
        self.set(left, bottom, BOX_BOTTOM_LEFT)?;
        self.set(right, bottom, BOX_BOTTOM_RIGHT)
    }

    fn out_of_bounds(&self, x: usize, y: usize) -> CanvasError {
        CanvasError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    fn index_of(&self, x: usize, y: usize) -> Result<usize, CanvasError> {
        if x >= self.width || y >= self.height {
            return Err(self.out_of_bounds(x, y));
        }
        Ok(y * self.width + x)
    }

    fn glyph_at(&self, x: usize, y: usize, idx: usize) -> char {
        let strokes = self.strokes[idx];
        if strokes.is_empty() {
            return self.cells[idx];
        }
        let connected = self.connected_strokes(x, y, strokes);
        if connected.is_empty() {
            strokes.to_char()
        } else {
            connected.to_char()
        }
    }

    /// Keeps only the strokes that meet a matching stroke in the neighbouring cell.
    fn connected_strokes(&self, x: usize, y: usize, strokes: Strokes) -> Strokes {
        let neighbour = |nx: usize, ny: usize| self.strokes[ny * self.width + nx];
        let mut connected = Strokes::NONE;
        if strokes.has(Strokes::LEFT) && x > 0 && neighbour(x - 1, y).has(Strokes::RIGHT) {
            connected = connected.or(Strokes::LEFT);
        }
        if strokes.has(Strokes::RIGHT)
            && x + 1 < self.width
            && neighbour(x + 1, y).has(Strokes::LEFT)
        {
            connected = connected.or(Strokes::RIGHT);
        }
        if strokes.has(Strokes::UP) && y > 0 && neighbour(x, y - 1).has(Strokes::DOWN) {
            connected = connected.or(Strokes::UP);
        }
        if strokes.has(Strokes::DOWN)
            && y + 1 < self.height
            && neighbour(x, y + 1).has(Strokes::UP)
        {
            connected = connected.or(Strokes::DOWN);
        }
        connected
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::fmt::Write as _;

        for y in 0..self.height {
            if y > 0 {
                f.write_char('\n')?;
            }
            for x in 0..self.width {
                f.write_char(self.glyph_at(x, y, y * self.width + x))?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    #[error("canvas area overflow: {width}*{height}")]
    AreaOverflow { width: usize, height: usize },
    #[error("out of bounds: ({x},{y}) for {width}x{height} canvas")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}
