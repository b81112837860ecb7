//! Pure transcript renderer: messages plus the current spinner frame in,
//! styled lines out. No state lives here; equal inputs give equal output.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::ThemePalette;
use crate::transcript::{DisplayMode, Message, MessageKind};

const MESSAGE_INDENT: &str = "  ";
const BODY_INDENT: &str = "    ";
const TOOL_ICON: &str = "\u{25B8}";
const ERROR_ICON: &str = "\u{2717}";
const RULE_CHAR: &str = "\u{2500}";
const MAX_RULE_WIDTH: usize = 50;
const THINKING_LABEL: &str = "Thinking...";

pub(crate) fn render_messages(
    messages: &[Message],
    frame: &str,
    palette: ThemePalette,
    width: u16,
) -> Vec<Line<'static>> {
    let mut lines = Vec::<Line<'static>>::new();
    for (idx, message) in messages.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }
        match message.kind {
            MessageKind::User => lines.push(render_user(&message.content, palette)),
            MessageKind::Agent => render_agent(&mut lines, &message.content, palette, width),
            MessageKind::Thinking => lines.push(render_thinking(frame, palette)),
            MessageKind::Tool => render_tool(&mut lines, message, palette, width),
        }
    }
    lines
}

fn render_user(content: &str, palette: ThemePalette) -> Line<'static> {
    let style = palette.user_style();
    Line::from(vec![
        Span::raw(MESSAGE_INDENT),
        Span::styled(">", style),
        Span::raw(" "),
        Span::styled(content.replace('\n', " "), style),
    ])
}

fn render_agent(lines: &mut Vec<Line<'static>>, content: &str, palette: ThemePalette, width: u16) {
    let style = palette.agent_style();
    let content_width = (width as usize).saturating_sub(MESSAGE_INDENT.len());
    for raw in content.split('\n') {
        let spans = vec![Span::styled(raw.to_string(), style)];
        for wrapped in wrap_spans(spans, content_width) {
            let mut row = vec![Span::raw(MESSAGE_INDENT)];
            row.extend(wrapped);
            lines.push(Line::from(row));
        }
    }
}

fn render_thinking(frame: &str, palette: ThemePalette) -> Line<'static> {
    Line::from(vec![
        Span::raw(MESSAGE_INDENT),
        Span::styled(frame.to_string(), Style::default().fg(palette.thinking)),
        Span::raw(" "),
        Span::styled(THINKING_LABEL, palette.thinking_style()),
    ])
}

fn render_tool(
    lines: &mut Vec<Line<'static>>,
    message: &Message,
    palette: ThemePalette,
    width: u16,
) {
    let name = message.tool_name();
    match message.display().unwrap_or(DisplayMode::Expanded) {
        DisplayMode::Collapsed => lines.push(render_collapsed(message, palette)),
        DisplayMode::Expanded => {
            lines.push(header_line(
                TOOL_ICON,
                name.to_string(),
                palette.tool_border_style(),
                palette.tool_header_style(),
                width,
            ));
            let diff = matches!(name, "Edit" | "Write");
            for raw in message.content.split('\n') {
                let style = if diff {
                    diff_line_style(raw, palette)
                } else {
                    palette.tool_text_style()
                };
                lines.push(body_line(raw, style));
            }
        }
        DisplayMode::Error => {
            lines.push(header_line(
                ERROR_ICON,
                format!("{name} failed"),
                palette.error_border_style(),
                palette.error_header_style(),
                width,
            ));
            for raw in message.content.split('\n') {
                lines.push(body_line(raw, palette.error_text_style()));
            }
        }
    }
}

fn render_collapsed(message: &Message, palette: ThemePalette) -> Line<'static> {
    let mut spans = vec![
        Span::raw(MESSAGE_INDENT),
        Span::styled(TOOL_ICON, palette.tool_border_style()),
        Span::raw(" "),
        Span::styled(
            format!("{} {}", message.tool_name(), message.content.replace('\n', " ")),
            palette.collapsed_style(),
        ),
    ];
    let summary = message
        .tool
        .as_ref()
        .map(|t| t.summary.as_str())
        .unwrap_or("");
    if !summary.is_empty() {
        spans.push(Span::styled(" \u{2014} ", palette.collapsed_style()));
        spans.push(Span::styled(
            summary.to_string(),
            palette.collapsed_summary_style(),
        ));
    }
    Line::from(spans)
}

fn header_line(
    icon: &'static str,
    title: String,
    border: Style,
    title_style: Style,
    width: u16,
) -> Line<'static> {
    let used = MESSAGE_INDENT.len() + 2 + UnicodeWidthStr::width(title.as_str()) + 1;
    let rule = (width as usize).saturating_sub(used).min(MAX_RULE_WIDTH);
    Line::from(vec![
        Span::raw(MESSAGE_INDENT),
        Span::styled(icon, border),
        Span::raw(" "),
        Span::styled(title, title_style),
        Span::raw(" "),
        Span::styled(RULE_CHAR.repeat(rule), border),
    ])
}

fn body_line(raw: &str, style: Style) -> Line<'static> {
    Line::from(vec![
        Span::raw(BODY_INDENT),
        Span::styled(raw.to_string(), style),
    ])
}

fn diff_line_style(raw: &str, palette: ThemePalette) -> Style {
    let trimmed = raw.trim();
    if trimmed.starts_with('+') {
        palette.diff_add_style()
    } else if trimmed.starts_with('-') {
        palette.diff_remove_style()
    } else {
        palette.tool_text_style()
    }
}

/// Pre-wrap a list of spans so that each resulting line fits within `max_width`
/// display columns. Returns a Vec of span-lines; if no wrapping is needed,
/// returns a single-element vec with the original spans.
fn wrap_spans(spans: Vec<Span<'static>>, max_width: usize) -> Vec<Vec<Span<'static>>> {
    if max_width == 0 {
        return vec![spans];
    }
    let mut result: Vec<Vec<Span<'static>>> = Vec::new();
    let mut current_line: Vec<Span<'static>> = Vec::new();
    let mut current_width: usize = 0;

    for span in spans {
        let span_width = UnicodeWidthStr::width(span.content.as_ref());
        if current_width + span_width <= max_width {
            current_width += span_width;
            current_line.push(span);
            continue;
        }
        let style = span.style;
        let text = span.content.into_owned();
        let mut remaining = text.as_str();
        while !remaining.is_empty() {
            let avail = max_width.saturating_sub(current_width);
            let mut split_byte = 0;
            let mut cols = 0usize;
            for (byte_idx, ch) in remaining.char_indices() {
                let w = UnicodeWidthChar::width(ch).unwrap_or(0);
                if cols + w > avail {
                    break;
                }
                cols += w;
                split_byte = byte_idx + ch.len_utf8();
            }
            if split_byte == 0 {
                if current_line.is_empty() {
                    // A single glyph wider than the line; emit it alone.
                    let Some(ch) = remaining.chars().next() else {
                        break;
                    };
                    split_byte = ch.len_utf8();
                    cols = UnicodeWidthChar::width(ch).unwrap_or(1);
                } else {
                    result.push(std::mem::take(&mut current_line));
                    current_width = 0;
                    continue;
                }
            }
            current_line.push(Span::styled(remaining[..split_byte].to_string(), style));
            current_width += cols;
            remaining = &remaining[split_byte..];
            if !remaining.is_empty() {
                result.push(std::mem::take(&mut current_line));
                current_width = 0;
            }
        }
    }
    if !current_line.is_empty() || result.is_empty() {
        result.push(current_line);
    }
    result
}

#[cfg(test)]
pub(crate) fn flatten_lines_to_plain(lines: &[Line<'static>]) -> Vec<String> {
    lines.iter().map(flatten_line_to_plain).collect()
}

#[cfg(test)]
pub(crate) fn flatten_line_to_plain(line: &Line<'static>) -> String {
    let mut out = String::new();
    for span in &line.spans {
        out.push_str(span.content.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::types::default_theme;

    fn plain(messages: &[Message], width: u16) -> Vec<String> {
        flatten_lines_to_plain(&render_messages(
            messages,
            "*",
            default_theme().palette(),
            width,
        ))
    }

    #[test]
    fn messages_are_separated_by_blank_lines() {
        let out = plain(&[Message::user("hi"), Message::agent("hello")], 80);
        assert_eq!(out, vec!["  > hi", "", "  hello"]);
    }

    #[test]
    fn thinking_shows_frame_and_label() {
        let out = plain(&[Message::thinking()], 80);
        assert_eq!(out, vec!["  * Thinking..."]);
    }

    #[test]
    fn collapsed_tool_is_one_line_with_optional_summary() {
        let with_summary = Message::tool("Read", DisplayMode::Collapsed, "a.rs", "42 lines");
        let without = Message::tool("Glob", DisplayMode::Collapsed, "**/*.rs", "");
        let out = plain(&[with_summary, without], 80);
        assert_eq!(
            out,
            vec!["  \u{25B8} Read a.rs \u{2014} 42 lines", "", "  \u{25B8} Glob **/*.rs"]
        );
    }

    #[test]
    fn expanded_tool_has_header_and_indented_body() {
        let msg = Message::tool("Shell", DisplayMode::Expanded, "$ ls\na.txt", "");
        let out = plain(&[msg], 30);
        assert!(out[0].starts_with("  \u{25B8} Shell \u{2500}"));
        assert!(UnicodeWidthStr::width(out[0].as_str()) <= 30);
        assert_eq!(&out[1..], ["    $ ls", "    a.txt"]);
    }

    #[test]
    fn diff_lines_are_styled_by_leading_marker() {
        let palette = default_theme().palette();
        let msg = Message::tool("Edit", DisplayMode::Expanded, "f.rs\n  + add\n-  rm\nkeep", "");
        let lines = render_messages(&[msg], "*", palette, 80);
        let body_style = |i: usize| lines[i].spans[1].style;
        assert_eq!(body_style(1), palette.tool_text_style());
        assert_eq!(body_style(2), palette.diff_add_style());
        assert_eq!(body_style(3), palette.diff_remove_style());
        assert_eq!(body_style(4), palette.tool_text_style());
    }

    #[test]
    fn non_diff_tools_never_use_diff_styles() {
        let palette = default_theme().palette();
        let msg = Message::tool("Shell", DisplayMode::Expanded, "+ not a diff", "");
        let lines = render_messages(&[msg], "*", palette, 80);
        assert_eq!(lines[1].spans[1].style, palette.tool_text_style());
    }

    #[test]
    fn error_tool_is_marked_failed() {
        let msg = Message::tool("Engine", DisplayMode::Error, "boom\ntrace", "");
        let out = plain(&[msg], 80);
        assert!(out[0].starts_with("  \u{2717} Engine failed"));
        assert_eq!(&out[1..], ["    boom", "    trace"]);
    }

    #[test]
    fn agent_text_wraps_to_width_with_uniform_indent() {
        let out = plain(&[Message::agent("abcdefghij")], 6);
        assert_eq!(out, vec!["  abcd", "  efgh", "  ij"]);
    }

    #[test]
    fn rendering_is_idempotent() {
        let messages = vec![
            Message::user("run"),
            Message::thinking(),
            Message::tool("Write", DisplayMode::Expanded, "+x\n-y", ""),
            Message::tool("Grep", DisplayMode::Collapsed, "foo", "2 matches"),
        ];
        let palette = default_theme().palette();
        let first = render_messages(&messages, "+", palette, 40);
        let second = render_messages(&messages, "+", palette, 40);
        assert_eq!(first, second);
    }
}
