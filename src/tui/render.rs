use std::borrow::Cow;

use super::form::{FieldType, FormField};
use super::state::{AppState, EvResult};
use crate::engine::{clock, field};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Text rows the error box may grow to before pointing at the log view.
const MAX_ERROR_LINES: usize = 10;

pub fn draw(f: &mut Frame, state: &AppState, spinner_frame: u8) {
    if state.log_focus {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(f.area());

        draw_header(f, state, chunks[0], spinner_frame);
        draw_logs(f, state, chunks[1]);
        draw_footer(f, state, chunks[2]);
        return;
    }

    let error_lines = state
        .page_error
        .as_deref()
        .map(|err| error_box_lines(err, f.area().width.saturating_sub(2) as usize))
        .unwrap_or_default();
    let error_height = if error_lines.is_empty() { 0 } else { error_lines.len() as u16 + 2 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(16),
            Constraint::Length(error_height),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    draw_header(f, state, chunks[0], spinner_frame);
    draw_form(f, state, body[0]);
    draw_result(f, state, body[1]);
    if !error_lines.is_empty() {
        draw_page_error(f, error_lines, chunks[2]);
    }
    draw_logs(f, state, chunks[3]);
    draw_footer(f, state, chunks[4]);
}

fn draw_header(f: &mut Frame, state: &AppState, area: Rect, spinner_frame: u8) {
    let activity = if state.loading {
        let ch = SPINNER_FRAMES[(spinner_frame as usize) % SPINNER_FRAMES.len()];
        Span::styled(format!(" {} SENDING", ch), Style::default().fg(Color::Cyan))
    } else {
        Span::styled(" IDLE", Style::default().fg(Color::DarkGray))
    };

    let teams = &state.form.teams;
    let line = Line::from(vec![
        Span::styled(
            format!(" {} @ {}", teams.away, teams.home),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" | {} | Up: {}", state.endpoint, state.uptime())),
        activity,
    ]);
    let block = Block::default().title(" NFL EV ").borders(Borders::ALL);
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn field_value_text<'a>(field: &'a FormField, editing: bool, buffer: &'a str) -> Cow<'a, str> {
    if editing {
        Cow::Owned(format!("{}\u{258f}", buffer)) // show cursor
    } else if let FieldType::Enum(_) = &field.field_type {
        Cow::Owned(format!("\u{25c0} {} \u{25b6}", field.value))
    } else if field.value.is_empty() {
        Cow::Borrowed("(default)")
    } else {
        Cow::Borrowed(field.value.as_str())
    }
}

fn draw_form(f: &mut Frame, state: &AppState, area: Rect) {
    let form = &state.form;
    let value_width = (area.width as usize * 60 / 100).saturating_sub(2);

    let rows: Vec<Row> = form
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let selected = i == form.selected_field;
            let editing = selected && form.editing;
            let value = field_value_text(field, editing, &form.edit_buffer);

            let value_style = if field.error.is_some() {
                Style::default().fg(Color::Red)
            } else if selected {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else if field.value.is_empty() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };

            let mut lines = vec![Line::from(Span::styled(
                truncate_with_ellipsis(&value, value_width).into_owned(),
                value_style,
            ))];
            if let Some(err) = &field.error {
                lines.push(Line::from(Span::styled(
                    truncate_with_ellipsis(err, value_width).into_owned(),
                    Style::default().fg(Color::Red),
                )));
            } else if let (true, Some(hint)) = (selected, &field.hint) {
                lines.push(Line::from(Span::styled(
                    hint.clone(),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            let height = lines.len() as u16;

            Row::new(vec![
                Cell::from(field.label.clone()),
                Cell::from(Text::from(lines)),
            ])
            .height(height)
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Percentage(40), Constraint::Percentage(60)],
    )
    .block(Block::default().borders(Borders::ALL).title(" Game State "))
    .row_highlight_style(Style::default().bg(Color::DarkGray));
    let mut table_state = ratatui::widgets::TableState::default();
    table_state.select(Some(form.selected_field));
    f.render_stateful_widget(table, area, &mut table_state);
}

/// "0.5400 (54.0¢)"
fn format_price(p: f64) -> String {
    format!("{:.4} ({:.1}\u{00a2})", p, p * 100.0)
}

fn format_signed(v: f64) -> String {
    format!("{:+.4}", v)
}

fn signed_color(v: f64) -> Color {
    if v > 0.0 {
        Color::Green
    } else if v < 0.0 {
        Color::Red
    } else {
        Color::White
    }
}

fn ordinal(n: u8) -> String {
    let suffix = match n {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

fn result_lines(result: &EvResult) -> Vec<Line<'static>> {
    let r = &result.response;
    let req = &result.request;
    let label = |s: &str| Span::styled(format!(" {:<17}", s), Style::default().fg(Color::DarkGray));

    let mut lines = vec![
        Line::from(vec![label("Model prob"), Span::raw(format!("{:.1}%", r.p_model * 100.0))]),
        Line::from(vec![label("Fair price"), Span::raw(format_price(r.fair_price))]),
        Line::from(vec![label("Market price"), Span::raw(format_price(r.market_price))]),
        Line::from(vec![label("Fee cost"), Span::raw(format_price(r.fee_cost))]),
        Line::from(vec![
            label("Raw edge"),
            Span::styled(format_signed(r.edge_raw), Style::default().fg(signed_color(r.edge_raw))),
        ]),
        Line::from(vec![
            label("Edge after fees"),
            Span::styled(
                format_signed(r.edge_after_fees),
                Style::default().fg(signed_color(r.edge_after_fees)),
            ),
        ]),
        Line::from(vec![
            label("EV / contract"),
            Span::styled(
                format_signed(r.ev_per_contract),
                Style::default()
                    .fg(signed_color(r.ev_per_contract))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
    ];

    let teams = crate::engine::TeamCodes::from_slug_or_generic(&req.slug);
    let (q, clock_str) = clock::format_game_clock(req.state.seconds_remaining);
    let ball = if req.state.home_has_ball { &teams.home } else { &teams.away };
    let dim = Style::default().fg(Color::DarkGray);
    lines.push(Line::from(Span::styled(format!(" {} | {}", req.slug, req.side.as_str()), dim)));
    lines.push(Line::from(Span::styled(
        format!(
            " Q{} {} ({}s) | {} {} - {} {}",
            q, clock_str, req.state.seconds_remaining,
            teams.home, req.state.home_score, req.state.away_score, teams.away,
        ),
        dim,
    )));
    lines.push(Line::from(Span::styled(
        format!(
            " {} ball, {} & {} at {} (yl100 {}) | {}ms",
            ball,
            ordinal(req.state.down),
            req.state.ydstogo,
            field::format_yardline(req.state.yardline_100, &teams.home, &teams.away),
            req.state.yardline_100,
            result.latency_ms,
        ),
        dim,
    )));
    lines
}

fn draw_result(f: &mut Frame, state: &AppState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Expected Value ");
    let lines = match &state.result {
        Some(result) => result_lines(result),
        None if state.loading => vec![Line::from(Span::styled(
            " Waiting for scoring service...",
            Style::default().fg(Color::Cyan),
        ))],
        None => vec![Line::from(Span::styled(
            " Fill in the game state and press [s] to submit.",
            Style::default().fg(Color::DarkGray),
        ))],
    };
    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Split `s` into rows of at most `width` chars, keeping every character.
/// Embedded newlines start a new row.
fn wrap_chars(s: &str, width: usize) -> Vec<String> {
    let mut rows = Vec::new();
    for line in s.split('\n') {
        let chars: Vec<char> = line.trim_end_matches('\r').chars().collect();
        if chars.is_empty() || width == 0 {
            rows.push(chars.into_iter().collect());
            continue;
        }
        rows.extend(chars.chunks(width).map(|c| c.iter().collect::<String>()));
    }
    rows
}

/// Rows for the error box. Bodies past `MAX_ERROR_LINES` end with a pointer
/// to the log view, which keeps the full text.
fn error_box_lines(err: &str, width: usize) -> Vec<Line<'static>> {
    let red = Style::default().fg(Color::Red);
    let rows = wrap_chars(err, width);
    if rows.len() <= MAX_ERROR_LINES {
        return rows.into_iter().map(|r| Line::from(Span::styled(r, red))).collect();
    }
    let mut lines: Vec<Line> = rows
        .into_iter()
        .take(MAX_ERROR_LINES - 1)
        .map(|r| Line::from(Span::styled(r, red)))
        .collect();
    lines.push(Line::from(Span::styled(
        "... full response in the log view [l]",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

fn draw_page_error(f: &mut Frame, lines: Vec<Line<'static>>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Error ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_logs(f: &mut Frame, state: &AppState, area: Rect) {
    let max_width = area.width.saturating_sub(2) as usize; // borders
    let visible_lines = area.height.saturating_sub(2) as usize;

    let total = state.logs.len();
    let offset = if state.log_focus {
        state.log_scroll_offset.min(total.saturating_sub(visible_lines))
    } else {
        0
    };

    // The focused view wraps each message in full; the dashboard strip keeps
    // one row per entry.
    let mut lines: Vec<Line> = Vec::with_capacity(visible_lines);
    for l in state.logs.iter().rev().skip(offset) {
        if lines.len() >= visible_lines {
            break;
        }
        let color = match l.level.as_str() {
            "ERROR" => Color::Red,
            "WARN" => Color::Yellow,
            _ => Color::DarkGray,
        };
        let prefix = format!(" {} [{}] ", l.time, l.level);
        let prefix_width = prefix.chars().count();
        let msg_max = max_width.saturating_sub(prefix_width);
        if !state.log_focus {
            let msg = truncate_with_ellipsis(&l.message, msg_max);
            lines.push(Line::from(vec![
                Span::styled(prefix, Style::default().fg(color)),
                Span::raw(msg.into_owned()),
            ]));
            continue;
        }
        let mut rows = wrap_chars(&l.message, msg_max).into_iter();
        let first = rows.next().unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled(prefix, Style::default().fg(color)),
            Span::raw(first),
        ]));
        for row in rows.take(visible_lines.saturating_sub(lines.len())) {
            lines.push(Line::from(vec![
                Span::raw(" ".repeat(prefix_width)),
                Span::raw(row),
            ]));
        }
    }

    let title = if state.log_focus {
        format!(" Log [{}/{} lines] ", offset + visible_lines.min(total), total)
    } else {
        " Log ".to_string()
    };

    let block = Block::default().title(title).borders(Borders::ALL);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_footer(f: &mut Frame, state: &AppState, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));
    let line = if state.log_focus {
        Line::from(vec![
            key("  [Esc]"),
            Span::raw(" back  "),
            key("[j/k]"),
            Span::raw(" scroll  "),
            key("[g/G]"),
            Span::raw(" top/bottom  "),
        ])
    } else if state.form.editing {
        Line::from(vec![
            key("  [Enter]"),
            Span::raw(" confirm  "),
            key("[Esc]"),
            Span::raw(" cancel  "),
            Span::raw("type to edit, empty = default"),
        ])
    } else {
        let submit = if state.loading { " (busy)  " } else { "ubmit  " };
        Line::from(vec![
            key("  [q]"),
            Span::raw("uit  "),
            key("[s]"),
            Span::raw(submit),
            key("[\u{2191}\u{2193}]"),
            Span::raw(" fields  "),
            key("[Enter]"),
            Span::raw(" edit  "),
            key("[\u{2190}\u{2192}]"),
            Span::raw(" toggle  "),
            key("[l]"),
            Span::raw("ogs  "),
        ])
    };
    f.render_widget(Paragraph::new(line), area);
}

fn truncate_with_ellipsis(s: &str, max_width: usize) -> Cow<'_, str> {
    let char_count = s.chars().count();
    if char_count <= max_width {
        Cow::Borrowed(s)
    } else if max_width <= 3 {
        Cow::Owned(".".repeat(max_width))
    } else {
        let end = s
            .char_indices()
            .nth(max_width - 3)
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        Cow::Owned(format!("{}...", &s[..end]))
    }
}
