// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! The editing surface (ratatui + crossterm). Keys are translated into [`Editor`] calls; every
//! frame is drawn from the editor's working copy, so what is on screen is what gets exported.

use std::{
    error::Error,
    fmt, io,
    path::PathBuf,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use crate::editor::{Connection, DeleteOutcome, Editor, NodeChange, CLEAR_PROMPT};
use crate::model::{Diagram, EdgeId, NodeId, ShapeKind};
use crate::ops::ElementRef;
use crate::render::{render_diagram_annotated, LineSpan, RenderOptions};
use crate::snapshot::{save_image, ChromePart, SurfaceChrome, TextRasterEncoder};

mod theme;

use theme::TuiTheme;

const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const FOOTER_BRAND: &str = "flowdeck";
const HEADER_HEIGHT: u16 = 5;
const PALETTE_WIDTH: u16 = 20;
const SIDEBAR_WIDTH: u16 = 34;
/// Surface pixels per pan step.
const PAN_STEP: f64 = 50.0;
const NOTHING_SELECTED: &str = "No elements selected. Select a node or edge first.";

/// Runs the interactive editor until the user quits.
pub fn run(editor: Editor, document_path: PathBuf, image_dir: PathBuf) -> Result<(), Box<dyn Error>> {
    let theme = TuiTheme::from_env()?;
    let mut app = App::new(editor, document_path, image_dir, theme);
    let mut terminal = TerminalSession::new()?;

    while !app.should_quit {
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                _ => {}
            }
        }
    }

    info!(slot = app.editor.active_index(); "editor closed");
    Ok(())
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    let header_area = layout[0];
    let main_area = layout[1];
    let status_area = layout[2];

    render_question_header(frame, app, header_area);

    let sidebar_visible = app.chrome.minimap || app.chrome.panel;
    let mut columns = vec![Constraint::Length(PALETTE_WIDTH), Constraint::Min(0)];
    if sidebar_visible {
        columns.push(Constraint::Length(SIDEBAR_WIDTH));
    }
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(columns)
        .split(main_area);

    render_palette(frame, app, panes[0]);

    let mode_tail = match &app.mode {
        Mode::Connect { source } => Some(format!("— connect from {source}")),
        _ if app.editor.is_dragging() => Some("— dragging, Enter drops".to_owned()),
        _ => None,
    };
    let canvas_title = view_title("Canvas", mode_tail.as_deref());
    let viewport = app.editor.viewport();
    let scroll_x = (viewport.x.max(0.0) / app.render_options.cell_width) as u16;
    let scroll_y = (viewport.y.max(0.0) / app.render_options.cell_height) as u16;
    let canvas = Paragraph::new(app.canvas_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(canvas_title)
                .border_style(app.theme.panel_border_style(true)),
        )
        .scroll((scroll_y, scroll_x));
    frame.render_widget(canvas, panes[1]);

    if sidebar_visible {
        let sidebar = Layout::default()
            .direction(Direction::Vertical)
            .constraints(match (app.chrome.minimap, app.chrome.panel) {
                (true, true) => vec![Constraint::Percentage(45), Constraint::Percentage(55)],
                _ => vec![Constraint::Min(0)],
            })
            .split(panes[2]);
        let mut slots = sidebar.iter().copied();
        if app.chrome.minimap {
            if let Some(minimap_area) = slots.next() {
                render_minimap(frame, app, minimap_area);
            }
        }
        if app.chrome.panel {
            if let Some(tips_area) = slots.next() {
                render_tips(frame, tips_area);
            }
        }
    }

    let toast = match app.toast.take() {
        Some(toast) if toast.expires_at > Instant::now() => {
            let message = toast.message.clone();
            app.toast = Some(toast);
            Some(message)
        }
        _ => None,
    };
    let status = Paragraph::new(footer_help_line(app, toast.as_deref()));
    frame.render_widget(status, status_area);
    let brand = Paragraph::new(footer_brand_line()).alignment(Alignment::Right);
    frame.render_widget(brand, status_area);

    match &app.mode {
        Mode::Confirm { prompt, .. } => render_confirm(frame, prompt, main_area),
        Mode::EditLabel { buffer, .. } => render_label_editor(frame, buffer, main_area),
        Mode::Normal | Mode::Connect { .. } => {}
    }
}

// Extracted panel/header/footer rendering helpers.
include!("chrome.rs");

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Normal,
    /// Picking the target for an edge out of `source`.
    Connect {
        source: NodeId,
    },
    EditLabel {
        node_id: NodeId,
        buffer: String,
    },
    Confirm {
        prompt: String,
        action: ConfirmAction,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfirmAction {
    DeleteNodes,
    Clear,
}

/// Visibility of the surface decorations hidden during image export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChromeState {
    controls: bool,
    minimap: bool,
    panel: bool,
}

impl Default for ChromeState {
    fn default() -> Self {
        Self {
            controls: true,
            minimap: true,
            panel: true,
        }
    }
}

impl SurfaceChrome for ChromeState {
    fn is_visible(&self, part: ChromePart) -> bool {
        match part {
            ChromePart::Controls => self.controls,
            ChromePart::Minimap => self.minimap,
            ChromePart::Panel => self.panel,
        }
    }

    fn set_visible(&mut self, part: ChromePart, visible: bool) {
        match part {
            ChromePart::Controls => self.controls = visible,
            ChromePart::Minimap => self.minimap = visible,
            ChromePart::Panel => self.panel = visible,
        }
    }
}

struct App {
    editor: Editor,
    document_path: PathBuf,
    image_dir: PathBuf,
    theme: TuiTheme,
    render_options: RenderOptions,
    encoder: TextRasterEncoder,
    chrome: ChromeState,
    mode: Mode,
    /// Node that arrow keys drag and that Space toggles.
    cursor: Option<NodeId>,
    edge_cursor: Option<EdgeId>,
    toast: Option<Toast>,
    should_quit: bool,
}

impl App {
    fn new(editor: Editor, document_path: PathBuf, image_dir: PathBuf, theme: TuiTheme) -> Self {
        let render_options = RenderOptions::default();
        Self {
            editor,
            document_path,
            image_dir,
            theme,
            render_options,
            encoder: TextRasterEncoder::new(render_options),
            chrome: ChromeState::default(),
            mode: Mode::Normal,
            cursor: None,
            edge_cursor: None,
            toast: None,
            should_quit: false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.handle_key_code(key.code) {
            self.should_quit = true;
        }
    }

    /// Returns `true` when the key asks to quit.
    fn handle_key_code(&mut self, code: KeyCode) -> bool {
        let quit = match std::mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Normal => self.handle_normal_key(code),
            Mode::Connect { source } => {
                self.handle_connect_key(source, code);
                false
            }
            Mode::EditLabel { node_id, buffer } => {
                self.handle_label_key(node_id, buffer, code);
                false
            }
            Mode::Confirm { prompt, action } => {
                self.handle_confirm_key(prompt, action, code);
                false
            }
        };
        self.forget_missing_cursors();
        quit
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                self.editor.clear_selection();
                self.edge_cursor = None;
            }
            KeyCode::Char(digit @ '1'..='5') => {
                let idx = digit as usize - '1' as usize;
                if let Some(kind) = ShapeKind::ALL.get(idx).copied() {
                    self.editor.set_palette(kind);
                }
            }
            KeyCode::Char('a') => self.add_node(),
            KeyCode::Tab => self.cycle_node(true, true),
            KeyCode::BackTab => self.cycle_node(false, true),
            KeyCode::Char(' ') => self.toggle_cursor_selection(),
            KeyCode::Char('e') => self.cycle_edge(true),
            KeyCode::Char('E') => self.cycle_edge(false),
            KeyCode::Left => self.drag_cursor(-1.0, 0.0),
            KeyCode::Right => self.drag_cursor(1.0, 0.0),
            KeyCode::Up => self.drag_cursor(0.0, -1.0),
            KeyCode::Down => self.drag_cursor(0.0, 1.0),
            KeyCode::Enter => self.drop_cursor(),
            KeyCode::Delete | KeyCode::Backspace => self.delete_key(),
            KeyCode::Char('x') => self.request_delete_selected(),
            KeyCode::Char('C') => {
                self.mode = Mode::Confirm {
                    prompt: CLEAR_PROMPT.to_owned(),
                    action: ConfirmAction::Clear,
                };
            }
            KeyCode::Char('c') => match self.cursor.clone() {
                Some(source) => self.mode = Mode::Connect { source },
                None => self.set_toast("Select a source node first"),
            },
            KeyCode::Char('r') => self.start_rename(),
            KeyCode::Char('n') | KeyCode::Char(']') => self.switch_question(true),
            KeyCode::Char('p') | KeyCode::Char('[') => self.switch_question(false),
            KeyCode::Char('s') => self.save(),
            KeyCode::Char('o') => self.load(),
            KeyCode::Char('i') => self.export_image(),
            KeyCode::Char('m') => self.toggle_chrome(ChromePart::Minimap),
            KeyCode::Char('h') => self.toggle_chrome(ChromePart::Panel),
            KeyCode::Char('k') => self.toggle_chrome(ChromePart::Controls),
            KeyCode::Char('H') => self.editor.pan(-PAN_STEP, 0.0),
            KeyCode::Char('L') => self.editor.pan(PAN_STEP, 0.0),
            KeyCode::Char('K') => self.editor.pan(0.0, -PAN_STEP),
            KeyCode::Char('J') => self.editor.pan(0.0, PAN_STEP),
            _ => {}
        }
        false
    }

    fn handle_connect_key(&mut self, source: NodeId, code: KeyCode) {
        match code {
            KeyCode::Esc => {}
            KeyCode::Tab => {
                self.cycle_node(true, false);
                self.mode = Mode::Connect { source };
            }
            KeyCode::BackTab => {
                self.cycle_node(false, false);
                self.mode = Mode::Connect { source };
            }
            KeyCode::Enter => {
                let Some(target) = self.cursor.clone() else {
                    self.mode = Mode::Connect { source };
                    return;
                };
                match self.editor.on_connect(&Connection { source, target }) {
                    Ok(edge_id) => self.set_toast(format!("Connected {edge_id}")),
                    Err(err) => self.report("Connect failed", err),
                }
            }
            _ => self.mode = Mode::Connect { source },
        }
    }

    fn handle_label_key(&mut self, node_id: NodeId, mut buffer: String, code: KeyCode) {
        match code {
            KeyCode::Esc => return,
            KeyCode::Enter => {
                if let Err(err) = self.editor.set_node_label(&node_id, buffer) {
                    self.report("Rename failed", err);
                }
                return;
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(ch) => buffer.push(ch),
            _ => {}
        }
        self.mode = Mode::EditLabel { node_id, buffer };
    }

    fn handle_confirm_key(&mut self, prompt: String, action: ConfirmAction, code: KeyCode) {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => match action {
                ConfirmAction::DeleteNodes => {
                    match self.editor.delete_selected(&mut |_: &str| true) {
                        Ok(outcome) => self.announce_delete(outcome),
                        Err(err) => self.report("Delete failed", err),
                    }
                }
                ConfirmAction::Clear => match self.editor.clear(&mut |_: &str| true) {
                    Ok(_) => {
                        self.cursor = None;
                        self.set_toast("Flowchart cleared");
                    }
                    Err(err) => self.report("Clear failed", err),
                },
            },
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {}
            _ => self.mode = Mode::Confirm { prompt, action },
        }
    }

    fn add_node(&mut self) {
        match self.editor.add_palette_node() {
            Ok(node_id) => {
                self.editor.select_only(Some(node_id.clone()), None);
                self.cursor = Some(node_id);
            }
            Err(err) => self.report("Add failed", err),
        }
    }

    /// Moves the cursor to the next or previous node; `select` also makes it the selection.
    fn cycle_node(&mut self, forward: bool, select: bool) {
        let ids = self
            .editor
            .diagram()
            .nodes()
            .iter()
            .map(|node| node.id().clone())
            .collect::<Vec<_>>();
        let Some(next) = cycle(&ids, self.cursor.as_ref(), forward) else {
            return;
        };
        if select {
            self.editor.select_only(Some(next.clone()), None);
            self.edge_cursor = None;
        }
        self.cursor = Some(next);
    }

    fn cycle_edge(&mut self, forward: bool) {
        let ids = self
            .editor
            .diagram()
            .edges()
            .iter()
            .map(|edge| edge.id().clone())
            .collect::<Vec<_>>();
        let Some(next) = cycle(&ids, self.edge_cursor.as_ref(), forward) else {
            self.set_toast("No connections yet");
            return;
        };
        self.editor.select_only(None, Some(next.clone()));
        self.edge_cursor = Some(next);
    }

    fn toggle_cursor_selection(&mut self) {
        let Some(id) = self.cursor.clone() else {
            return;
        };
        let selected = !self.editor.selection().contains_node(&id);
        if let Err(err) = self
            .editor
            .on_nodes_change(&[NodeChange::Select { id, selected }])
        {
            self.report("Select failed", err);
        }
    }

    /// Moves the cursor node by one character cell as an in-progress drag.
    fn drag_cursor(&mut self, dx: f64, dy: f64) {
        let Some(id) = self.cursor.clone() else {
            self.set_toast("Select a node to move it");
            return;
        };
        let Some(node) = self.editor.diagram().node(&id) else {
            return;
        };
        let position = node.position().offset(
            dx * self.render_options.cell_width,
            dy * self.render_options.cell_height,
        );
        let change = NodeChange::Position {
            id,
            position,
            dragging: true,
        };
        if let Err(err) = self.editor.on_nodes_change(&[change]) {
            self.report("Move failed", err);
        }
    }

    fn drop_cursor(&mut self) {
        if !self.editor.is_dragging() {
            return;
        }
        let Some(id) = self.cursor.clone() else {
            return;
        };
        let Some(position) = self.editor.diagram().node(&id).map(|node| node.position()) else {
            return;
        };
        let change = NodeChange::Position {
            id,
            position,
            dragging: false,
        };
        if let Err(err) = self.editor.on_nodes_change(&[change]) {
            self.report("Move failed", err);
        }
    }

    fn delete_key(&mut self) {
        match self.editor.handle_delete_key() {
            Ok(DeleteOutcome::NothingSelected) => {}
            Ok(outcome) => self.announce_delete(outcome),
            Err(err) => self.report("Delete failed", err),
        }
    }

    /// Asks before removing nodes; selected edges go immediately.
    fn request_delete_selected(&mut self) {
        let mut asked = None::<String>;
        let result = self.editor.delete_selected(&mut |prompt: &str| {
            asked = Some(prompt.to_owned());
            false
        });
        match (result, asked) {
            (Ok(DeleteOutcome::Declined), Some(prompt)) => {
                self.mode = Mode::Confirm {
                    prompt,
                    action: ConfirmAction::DeleteNodes,
                };
            }
            (Ok(DeleteOutcome::NothingSelected), _) => self.set_toast(NOTHING_SELECTED),
            (Ok(outcome), _) => self.announce_delete(outcome),
            (Err(err), _) => self.report("Delete failed", err),
        }
    }

    fn announce_delete(&mut self, outcome: DeleteOutcome) {
        match outcome {
            DeleteOutcome::EdgesRemoved(edges) => {
                self.edge_cursor = None;
                self.set_toast(format!("Removed {edges} connection(s)"));
            }
            DeleteOutcome::NodesRemoved { nodes, edges } => {
                self.set_toast(format!("Removed {nodes} node(s) and {edges} connection(s)"));
            }
            DeleteOutcome::Declined | DeleteOutcome::NothingSelected => {}
        }
    }

    fn start_rename(&mut self) {
        let Some(node) = self
            .cursor
            .as_ref()
            .and_then(|id| self.editor.diagram().node(id))
        else {
            self.set_toast("Select a node to rename it");
            return;
        };
        self.mode = Mode::EditLabel {
            node_id: node.id().clone(),
            buffer: node.label().to_owned(),
        };
    }

    fn switch_question(&mut self, forward: bool) {
        let moved = if forward {
            self.editor.next_question()
        } else {
            self.editor.previous_question()
        };
        match moved {
            Ok(true) => {
                self.cursor = None;
                self.edge_cursor = None;
            }
            Ok(false) => {}
            Err(err) => self.report("Switch failed", err),
        }
    }

    fn save(&mut self) {
        match self.editor.save_to(&self.document_path) {
            Ok(()) => {
                info!(path:% = self.document_path.display(); "saved flowchart document");
                self.set_toast(format!("Saved {}", self.document_path.display()));
            }
            Err(err) => self.report("Save failed", err),
        }
    }

    fn load(&mut self) {
        match self.editor.load_from(&self.document_path) {
            Ok(()) => {
                self.cursor = None;
                self.edge_cursor = None;
                self.set_toast(format!("Loaded {}", self.document_path.display()));
            }
            Err(err) => self.report("Load failed", err),
        }
    }

    fn export_image(&mut self) {
        let export = match self.editor.export_image(&mut self.chrome, &self.encoder) {
            Ok(export) => export,
            Err(err) => {
                self.report("Failed to export image", err);
                return;
            }
        };
        match save_image(&self.image_dir, &export) {
            Ok(path) => self.set_toast(format!("Image saved to {}", path.display())),
            Err(err) => self.report("Failed to export image", err),
        }
    }

    fn toggle_chrome(&mut self, part: ChromePart) {
        let visible = self.chrome.is_visible(part);
        self.chrome.set_visible(part, !visible);
    }

    fn forget_missing_cursors(&mut self) {
        let diagram = self.editor.diagram();
        if self.cursor.as_ref().is_some_and(|id| !diagram.contains_node(id)) {
            self.cursor = None;
        }
        if self
            .edge_cursor
            .as_ref()
            .is_some_and(|id| !diagram.contains_edge(id))
        {
            self.edge_cursor = None;
        }
        let source_gone =
            matches!(&self.mode, Mode::Connect { source } if !diagram.contains_node(source));
        if source_gone {
            self.mode = Mode::Normal;
        }
    }

    fn report(&mut self, context: &str, err: impl fmt::Display) {
        warn!(context, err:% = err; "editor action failed");
        self.set_toast(format!("{context}: {err}"));
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(3),
        });
    }

    fn connect_source(&self) -> Option<&NodeId> {
        match &self.mode {
            Mode::Connect { source } => Some(source),
            _ => None,
        }
    }

    /// The rendered diagram with selection, cursor and connect source highlighted.
    fn canvas_text(&self) -> Text<'static> {
        let render = match render_diagram_annotated(self.editor.diagram(), self.render_options) {
            Ok(render) => render,
            Err(err) => {
                return Text::from(Line::styled(
                    format!("render failed: {err}"),
                    self.theme.error_style(),
                ))
            }
        };

        let mut styles_by_line = render
            .text
            .split('\n')
            .map(|line| vec![None::<Style>; line.chars().count()])
            .collect::<Vec<_>>();
        let selection = self.editor.selection();
        let cursor_style = Style::default().add_modifier(Modifier::UNDERLINED);
        for (element, spans) in &render.highlight_index {
            let style = match element {
                ElementRef::Node(id) if self.connect_source() == Some(id) => {
                    self.theme.connect_source_style()
                }
                ElementRef::Node(id) if selection.contains_node(id) => {
                    self.theme.selection_style()
                }
                ElementRef::Node(id) if self.cursor.as_ref() == Some(id) => cursor_style,
                ElementRef::Edge(id) if selection.contains_edge(id) => {
                    self.theme.selection_style()
                }
                _ => continue,
            };
            apply_style(&mut styles_by_line, spans, style);
        }

        let lines = render
            .text
            .split('\n')
            .zip(&styles_by_line)
            .map(|(line, styles)| styled_line(line, styles))
            .collect::<Vec<_>>();
        Text::from(lines)
    }
}

fn cycle<T: Clone + PartialEq>(ids: &[T], current: Option<&T>, forward: bool) -> Option<T> {
    if ids.is_empty() {
        return None;
    }
    let len = ids.len();
    let idx = match current.and_then(|current| ids.iter().position(|id| id == current)) {
        Some(idx) if forward => (idx + 1) % len,
        Some(idx) => (idx + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    };
    ids.get(idx).cloned()
}

fn apply_style(styles_by_line: &mut [Vec<Option<Style>>], spans: &[LineSpan], style: Style) {
    for &(y, x0, x1) in spans {
        let Some(line) = styles_by_line.get_mut(y) else {
            continue;
        };
        for cell in line.iter_mut().take(x1.saturating_add(1)).skip(x0) {
            *cell = Some(style);
        }
    }
}

fn styled_line(line: &str, styles: &[Option<Style>]) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();
    let mut run = String::new();
    let mut run_style = None::<Style>;
    for (idx, ch) in line.chars().enumerate() {
        let style = styles.get(idx).copied().flatten();
        if style != run_style && !run.is_empty() {
            spans.push(Span::styled(
                std::mem::take(&mut run),
                run_style.unwrap_or_default(),
            ));
        }
        run_style = style;
        run.push(ch);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style.unwrap_or_default()));
    }
    Line::from(spans)
}

/// Cell grid of node markers scaled to fit `width` x `height`.
fn minimap_cells(diagram: &Diagram, width: usize, height: usize) -> Vec<Vec<Option<ShapeKind>>> {
    let mut cells = vec![vec![None; width]; height];
    if width == 0 || height == 0 || diagram.nodes().is_empty() {
        return cells;
    }
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for node in diagram.nodes() {
        let position = node.position();
        min_x = min_x.min(position.x);
        min_y = min_y.min(position.y);
        max_x = max_x.max(position.x);
        max_y = max_y.max(position.y);
    }
    let span_x = (max_x - min_x).max(1.0);
    let span_y = (max_y - min_y).max(1.0);
    for node in diagram.nodes() {
        let position = node.position();
        let col = ((position.x - min_x) / span_x * (width - 1) as f64).round() as usize;
        let row = ((position.y - min_y) / span_y * (height - 1) as f64).round() as usize;
        if let Some(cell) = cells.get_mut(row).and_then(|line| line.get_mut(col)) {
            *cell = Some(node.kind());
        }
    }
    cells
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).inspect_err(|_| teardown_terminal())?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).inspect_err(|_| teardown_terminal())?;
        terminal.clear().inspect_err(|_| teardown_terminal())?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}
