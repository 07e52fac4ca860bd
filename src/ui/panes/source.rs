//! Source pane: the traced program with light syntax coloring.
//!
//! The line of the statement behind the current step gets an arrow gutter
//! and a lighter background, and is kept at a fixed visual row while
//! stepping so the text scrolls underneath it.

use super::pane_block;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Character-level coloring for the traced subset
fn highlight_source_code(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut word = String::new();

    for (i, c) in line.char_indices() {
        if c == '#' {
            flush_word(&mut spans, &mut word, false);
            spans.push(Span::styled(
                line[i..].to_string(),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            return Line::from(spans);
        }

        if c.is_alphanumeric() || c == '_' || (c == '.' && is_number(&word)) {
            word.push(c);
            continue;
        }

        flush_word(&mut spans, &mut word, c == '(');
        let style = match c {
            '(' | ')' => Style::default().fg(DEFAULT_THEME.accent),
            _ => Style::default().fg(DEFAULT_THEME.fg),
        };
        spans.push(Span::styled(c.to_string(), style));
    }

    flush_word(&mut spans, &mut word, false);
    Line::from(spans)
}

fn flush_word(spans: &mut Vec<Span<'_>>, word: &mut String, is_call: bool) {
    if word.is_empty() {
        return;
    }
    let style = word_style(word, is_call);
    spans.push(Span::styled(std::mem::take(word), style));
}

fn is_number(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_digit() || c == '.')
}

fn word_style(word: &str, is_call: bool) -> Style {
    match word {
        "for" | "in" | "if" | "elif" | "else" | "def" | "return" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        "True" | "False" | "None" => Style::default().fg(DEFAULT_THEME.number),
        _ if is_number(word) => Style::default().fg(DEFAULT_THEME.number),
        _ if is_call => Style::default().fg(DEFAULT_THEME.function),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Scroll state for the source pane
#[derive(Debug, Default)]
pub struct SourceScrollState {
    pub offset: usize,
    /// Visual row the current line is pinned to; `None` until the first render
    pub target_line_row: Option<usize>,
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    current_line: Option<usize>,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let block = pane_block(" Source Code ", is_focused);

    let lines: Vec<&str> = source_code.lines().collect();
    let total_lines = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    if let Some(line) = current_line.filter(|line| (1..=total_lines).contains(line)) {
        scroll_state.offset = (line - 1).saturating_sub(target_row);
        if total_lines > visible_height {
            scroll_state.offset = scroll_state.offset.min(total_lines - visible_height);
        } else {
            scroll_state.offset = 0;
        }
    }

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_current = current_line == Some(line_num);

            let (gutter, num_style) = if is_current {
                (
                    format!("{:>3} ▶ ", line_num),
                    Style::default()
                        .fg(DEFAULT_THEME.highlight)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                (
                    format!("{:>3}   ", line_num),
                    Style::default().fg(DEFAULT_THEME.comment),
                )
            };

            let mut content = highlight_source_code(line);
            if is_current {
                let background = Style::default().bg(DEFAULT_THEME.current_line_bg);
                for span in &mut content.spans {
                    span.style = span.style.patch(background);
                }
            }

            let mut spans = vec![Span::styled(gutter, num_style)];
            spans.extend(content.spans);
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(visible_lines).block(block), area);
}
