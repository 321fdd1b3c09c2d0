// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Header, palette, sidebar, footer, and modal helpers used by TUI rendering.
fn view_title(label: &str, tail: Option<&str>) -> String {
    let mut title = format!(" {label}");
    if let Some(tail) = tail.map(str::trim).filter(|tail| !tail.is_empty()) {
        title.push(' ');
        title.push_str(tail);
    }
    title.push(' ');
    title
}

/// `Question 2 of 3` plus one dot per slot, the active one filled.
fn question_counter_line(active: usize, total: usize) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("Question {} of {total} ", active + 1),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for idx in 0..total {
        let (dot, color) = if idx == active {
            ("●", Color::LightGreen)
        } else {
            ("○", Color::DarkGray)
        };
        spans.push(Span::styled(dot, Style::default().fg(color)));
    }
    Line::from(spans)
}

fn render_question_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let editor = &app.editor;
    let mut lines = vec![question_counter_line(
        editor.active_index(),
        editor.slot_count(),
    )];
    if let Some(question) = editor.active_question() {
        lines.push(Line::styled(
            question.text.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::styled(
            question.description.clone(),
            Style::default().fg(Color::Gray),
        ));
    }
    let header = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn render_palette(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let active = app.editor.palette();
    let items = ShapeKind::ALL
        .iter()
        .enumerate()
        .map(|(idx, kind)| {
            let line = Line::from(vec![
                Span::styled(
                    format!("{} ", idx + 1),
                    Style::default().fg(FOOTER_KEY_COLOR),
                ),
                Span::raw(format!("{} {}", kind.icon(), kind.palette_label())),
            ]);
            let item = ListItem::new(line);
            if *kind == active {
                item.style(app.theme.selection_style())
            } else {
                item
            }
        })
        .collect::<Vec<_>>();
    let palette = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(view_title("Shapes", None)),
    );
    frame.render_widget(palette, area);
}

fn render_minimap(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let width = area.width.saturating_sub(2) as usize;
    let height = area.height.saturating_sub(2) as usize;
    let lines = minimap_cells(app.editor.diagram(), width, height)
        .into_iter()
        .map(|row| {
            Line::from(
                row.into_iter()
                    .map(|cell| match cell {
                        Some(kind) => {
                            Span::styled("■", Style::default().fg(app.theme.kind_color(kind)))
                        }
                        None => Span::styled("·", Style::default().fg(Color::DarkGray)),
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect::<Vec<_>>();
    let minimap = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(view_title("Minimap", None)),
    );
    frame.render_widget(minimap, area);
}

const TIPS: [(&str, &str); 9] = [
    ("1-5, a", "pick a shape and add it"),
    ("Tab", "select the next node"),
    ("Space", "add or drop it from the selection"),
    ("arrows", "drag, Enter drops"),
    ("c", "connect, Tab to target, Enter"),
    ("r", "edit node text"),
    ("Del", "remove selected connections"),
    ("x / C", "delete selection / clear"),
    ("H J K L", "pan the canvas"),
];

fn render_tips(frame: &mut Frame<'_>, area: Rect) {
    let key_width = TIPS.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let lines = TIPS
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(
                    format!("{key:>key_width$}"),
                    Style::default()
                        .fg(FOOTER_KEY_COLOR)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::raw(*desc),
            ])
        })
        .collect::<Vec<_>>();
    let tips = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(view_title("Tips", None)),
        );
    frame.render_widget(tips, area);
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, key: &str) {
    if !spans.is_empty() {
        spans.push(Span::styled(" | ", Style::default().fg(FOOTER_LABEL_COLOR)));
    }
    spans.push(Span::styled(
        format!("{label} "),
        Style::default().fg(FOOTER_LABEL_COLOR),
    ));
    spans.push(Span::styled(
        key.to_owned(),
        Style::default()
            .fg(FOOTER_KEY_COLOR)
            .add_modifier(Modifier::BOLD),
    ));
}

fn footer_help_line(app: &App, toast: Option<&str>) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();
    if app.chrome.controls {
        let entries: &[(&str, &str)] = match &app.mode {
            Mode::Normal => &[
                ("ADD", "a"),
                ("CONNECT", "c"),
                ("RENAME", "r"),
                ("DELETE", "x"),
                ("QUESTION", "[]"),
                ("SAVE", "s"),
                ("LOAD", "o"),
                ("IMAGE", "i"),
                ("QUIT", "q"),
            ],
            Mode::Connect { .. } => &[("TARGET", "Tab"), ("CONNECT", "Enter"), ("CANCEL", "Esc")],
            Mode::EditLabel { .. } => &[("SAVE", "Enter"), ("CANCEL", "Esc")],
            Mode::Confirm { .. } => &[("YES", "y"), ("NO", "n")],
        };
        for (label, key) in entries {
            push_footer_entry(&mut spans, label, key);
        }
    }
    if let Some(message) = toast {
        if !spans.is_empty() {
            spans.push(Span::styled(" | ", Style::default().fg(FOOTER_LABEL_COLOR)));
        }
        spans.push(Span::raw(message.to_owned()));
    }
    Line::from(spans)
}

fn footer_brand_line() -> Line<'static> {
    Line::from(Span::styled(
        FOOTER_BRAND,
        Style::default().fg(Color::White),
    ))
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent.min(100)) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent.min(100)) / 2),
    ])
    .areas(area);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent.min(100)) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent.min(100)) / 2),
    ])
    .areas(middle);
    center
}

fn render_confirm(frame: &mut Frame<'_>, prompt: &str, main_area: Rect) {
    let area = centered_rect(60, 30, main_area);
    frame.render_widget(Clear, area);
    let text = Text::from(vec![
        Line::raw(prompt.to_owned()),
        Line::raw(""),
        Line::styled(
            "y confirm, n cancel",
            Style::default().fg(FOOTER_KEY_COLOR),
        ),
    ]);
    let modal = Paragraph::new(text).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(view_title("Confirm", None)),
    );
    frame.render_widget(modal, area);
}

fn render_label_editor(frame: &mut Frame<'_>, buffer: &str, main_area: Rect) {
    let area = centered_rect(50, 20, main_area);
    frame.render_widget(Clear, area);
    let editor = Paragraph::new(Line::from(vec![
        Span::raw(buffer.to_owned()),
        Span::styled("▏", Style::default().fg(FOOTER_KEY_COLOR)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(view_title("Node text", None)),
    );
    frame.render_widget(editor, area);
}
