//! Listing pane rendering with syntax highlighting
//!
//! Shows the lesson's C listing with the line of the current step
//! highlighted (red when that step faulted) and kept at a stable row
//! while stepping.

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Simple syntax highlighting for one line of the listing
fn highlight_line(line: &str, in_block_comment: &mut bool) -> Line<'static> {
    let comment = Style::default().fg(DEFAULT_THEME.comment);
    let trimmed = line.trim_start();

    // Block comments span lines; the listing only opens them at line start
    if *in_block_comment || trimmed.starts_with("/*") {
        *in_block_comment = !trimmed.ends_with("*/");
        return Line::from(Span::styled(line.to_string(), comment));
    }
    if trimmed.starts_with('#') {
        return Line::from(Span::styled(
            line.to_string(),
            Style::default().fg(DEFAULT_THEME.keyword),
        ));
    }

    let mut spans = Vec::new();
    let mut word = String::new();
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '/' && chars.get(i + 1) == Some(&'/') {
            flush_word(&mut spans, &mut word, false);
            spans.push(Span::styled(chars[i..].iter().collect::<String>(), comment));
            break;
        }

        if c == '"' {
            flush_word(&mut spans, &mut word, false);
            let mut end = i + 1;
            while end < chars.len() && chars[end] != '"' {
                end += if chars[end] == '\\' { 2 } else { 1 };
            }
            let end = (end + 1).min(chars.len());
            spans.push(Span::styled(
                chars[i..end].iter().collect::<String>(),
                Style::default().fg(DEFAULT_THEME.string),
            ));
            i = end;
            continue;
        }

        if !c.is_alphanumeric() && c != '_' && c != '.' {
            flush_word(&mut spans, &mut word, c == '(');
            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
                // Address-of and dereference are the point of the lesson
                '&' | '*' => Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };
            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        word.push(c);
        i += 1;
    }
    flush_word(&mut spans, &mut word, false);

    Line::from(spans)
}

fn flush_word(spans: &mut Vec<Span<'static>>, word: &mut String, is_function: bool) {
    if word.is_empty() {
        return;
    }
    let style = keyword_style(word, is_function);
    spans.push(Span::styled(std::mem::take(word), style));
}

fn keyword_style(word: &str, is_function: bool) -> Style {
    match word {
        "int" | "double" | "void" | "Point" => Style::default().fg(DEFAULT_THEME.type_name),
        "typedef" | "struct" | "return" | "if" | "else" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        "NULL" | "PI" => Style::default().fg(DEFAULT_THEME.number),
        _ if word.starts_with(|c: char| c.is_ascii_digit() || c == '.') => {
            Style::default().fg(DEFAULT_THEME.number)
        }
        _ if is_function => Style::default().fg(DEFAULT_THEME.function),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Scroll state for the source pane
pub struct SourceScrollState {
    pub offset: usize,
    pub target_line_row: Option<usize>,
}

/// Render the listing pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    current_line: usize,
    is_error: bool,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Lesson Source ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines: Vec<&str> = source_code.lines().collect();
    let total_lines = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    // Keep the current line at a fixed row, centered at first
    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    if current_line > 0 && current_line <= total_lines {
        let target_line_idx = current_line - 1;
        scroll_state.offset = target_line_idx.saturating_sub(target_row);
        let max_scroll = total_lines.saturating_sub(visible_height);
        scroll_state.offset = scroll_state.offset.min(max_scroll);
    }

    // Comment state has to be tracked from the top, not from the scroll offset
    let mut in_block_comment = false;
    let highlighted: Vec<Line> = lines
        .iter()
        .map(|line| highlight_line(line, &mut in_block_comment))
        .collect();

    let visible_lines: Vec<Line> = highlighted
        .into_iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, mut content)| {
            let line_num = idx + 1;
            let is_current = line_num == current_line;

            let num_style = if is_current && is_error {
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD)
            } else if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            if is_current && is_error {
                let error_style = Style::default()
                    .bg(DEFAULT_THEME.error)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD);
                for span in &mut content.spans {
                    span.style = error_style;
                }
            } else if is_current {
                for span in &mut content.spans {
                    span.style = span
                        .style
                        .patch(Style::default().bg(DEFAULT_THEME.current_line_bg));
                }
            }

            let mut spans = vec![Span::styled(format!("{:4} ", line_num), num_style)];
            spans.extend(content.spans);
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
