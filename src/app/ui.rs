use std::path::Path;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use super::{App, ThemePalette, APP_VERSION};
use crate::transcript::ModelInfo;

const TOP_BAR_ROWS: u16 = 3;
const PROMPT: &str = "> ";
const HEAVY_RULE: &str = "\u{2501}";
const SEPARATOR: &str = "\u{2502}";
const HINTS: [(&str, &str); 4] = [
    ("/", "commands"),
    ("ctrl+c", "quit"),
    ("pgup/pgdn", "scroll"),
    ("ctrl+l", "clear input"),
];

pub(super) struct Areas {
    pub(super) top: Rect,
    pub(super) chat: Rect,
    pub(super) divider: Rect,
    pub(super) input: Rect,
    pub(super) suggestions: Rect,
    pub(super) hints: Rect,
}

pub(super) fn layout(area: Rect, suggestion_rows: u16) -> Areas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(TOP_BAR_ROWS),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(suggestion_rows),
            Constraint::Length(1),
        ])
        .split(area);
    Areas {
        top: chunks[0],
        chat: chunks[1],
        divider: chunks[2],
        input: chunks[3],
        suggestions: chunks[4],
        hints: chunks[5],
    }
}

pub(super) fn suggestion_rows(app: &App) -> u16 {
    app.input().hints().len() as u16
}

pub(super) fn draw(f: &mut Frame, app: &App) {
    let palette = app.theme_palette();
    let areas = layout(f.area(), suggestion_rows(app));

    let home = dirs::home_dir();
    f.render_widget(
        Paragraph::new(Text::from(top_bar_lines(
            &app.state().model,
            &app.state().work_dir,
            &app.state().repo_label,
            home.as_deref(),
            areas.top.width,
            palette,
        ))),
        areas.top,
    );

    f.render_widget(app.window().paragraph(), areas.chat);

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "\u{2500}".repeat(areas.divider.width as usize),
            palette.divider_style(),
        ))),
        areas.divider,
    );

    draw_input(f, app, areas.input, palette);

    if areas.suggestions.height > 0 {
        let selected = app.input().selected_hint();
        let lines: Vec<Line<'static>> = app
            .input()
            .hints()
            .into_iter()
            .enumerate()
            .map(|(idx, hint)| {
                let style = if idx == selected {
                    palette.prompt_style()
                } else {
                    palette.muted_style()
                };
                Line::from(Span::styled(format!("  {hint}"), style))
            })
            .collect();
        f.render_widget(Paragraph::new(Text::from(lines)), areas.suggestions);
    }

    let mut hint_line = hint_bar_line(palette);
    let window = app.window();
    if !window.at_bottom() {
        hint_line.spans.push(Span::styled(
            format!("   \u{2191} {}/{}", window.offset(), window.max_offset()),
            palette.info_style(),
        ));
    }
    f.render_widget(Paragraph::new(hint_line), areas.hints);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect, palette: ThemePalette) {
    let prompt_width = UnicodeWidthStr::width(PROMPT) as u16;
    let cursor_col = app.input().cursor_column() as u16;
    let visible = area.width.saturating_sub(prompt_width).max(1);
    // Scroll horizontally so the cursor stays on screen.
    let offset = (cursor_col + 1).saturating_sub(visible);

    let prompt = Paragraph::new(Span::styled(PROMPT, palette.prompt_style()));
    f.render_widget(prompt, Rect { width: prompt_width.min(area.width), ..area });

    let text_area = Rect {
        x: area.x + prompt_width.min(area.width),
        width: area.width.saturating_sub(prompt_width),
        ..area
    };
    let text = Paragraph::new(Span::styled(
        app.input().value().to_string(),
        palette.input_style(),
    ))
    .scroll((0, offset));
    f.render_widget(text, text_area);

    if text_area.width > 0 {
        f.set_cursor_position((text_area.x + cursor_col - offset, area.y));
    }
}

pub(super) fn top_bar_lines(
    model: &ModelInfo,
    work_dir: &str,
    repo_label: &str,
    home: Option<&Path>,
    width: u16,
    palette: ThemePalette,
) -> Vec<Line<'static>> {
    let sep = Span::styled(format!(" {SEPARATOR} "), palette.divider_style());
    let right = vec![
        Span::styled(format!("model: {}", model.name), palette.info_style()),
        sep.clone(),
        Span::styled(
            format!(
                "ctx: {}/{}",
                format_tokens(model.context_used),
                format_tokens(model.context_max)
            ),
            palette.info_style(),
        ),
        sep,
        Span::styled(
            format!("tokens: {}", format_tokens(model.tokens_used)),
            palette.info_style(),
        ),
    ];
    let line1 = spread(
        vec![Span::styled(APP_VERSION, palette.brand_style())],
        right,
        width,
    );

    let left2 = vec![
        Span::styled("cwd:", palette.muted_style()),
        Span::raw(" "),
        Span::styled(shorten_path(work_dir, home), palette.input_style()),
    ];
    let right2 = vec![Span::styled(repo_label.to_string(), palette.muted_style())];
    let line2 = spread(left2, right2, width);

    let divider = Line::from(Span::styled(
        HEAVY_RULE.repeat(width as usize),
        palette.divider_style(),
    ));
    vec![line1, line2, divider]
}

/// One-column padding on each edge, `left` flush left, `right` flush right,
/// at least one space between them.
fn spread(left: Vec<Span<'static>>, right: Vec<Span<'static>>, width: u16) -> Line<'static> {
    let span_width =
        |spans: &[Span<'static>]| spans.iter().map(|s| s.width()).sum::<usize>();
    let gap = (width as usize)
        .saturating_sub(span_width(&left) + span_width(&right) + 2)
        .max(1);
    let mut spans = vec![Span::raw(" ")];
    spans.extend(left);
    spans.push(Span::raw(" ".repeat(gap)));
    spans.extend(right);
    Line::from(spans)
}

fn hint_bar_line(palette: ThemePalette) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (idx, (key, desc)) in HINTS.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled(" \u{2022} ", palette.divider_style()));
        }
        spans.push(Span::styled(*key, palette.info_style()));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(*desc, palette.muted_style()));
    }
    Line::from(spans)
}

pub(super) fn format_tokens(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}k", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

pub(super) fn shorten_path(path: &str, home: Option<&Path>) -> String {
    let Some(home) = home.map(|h| h.display().to_string()) else {
        return path.to_string();
    };
    if home.is_empty() {
        return path.to_string();
    }
    match path.strip_prefix(home.as_str()) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => format!("~{rest}"),
        _ => path.to_string(),
    }
}
