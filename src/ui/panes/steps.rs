//! Step log pane

use super::{follow_offset, pane_block};
use crate::trace::Step;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

fn kind_style(step: &Step) -> Style {
    let color = match step {
        Step::Variable(_) => DEFAULT_THEME.fg,
        Step::For(_) | Step::If(_) => DEFAULT_THEME.keyword,
        Step::Print(_) => DEFAULT_THEME.output,
        Step::Call(_) | Step::Define(_) => DEFAULT_THEME.function,
        Step::Return(_) | Step::EndCall(_) => DEFAULT_THEME.return_value,
    };
    Style::default().fg(color)
}

/// Render the step list, indented by depth, keeping `current` in view
pub fn render_steps_pane(
    frame: &mut Frame,
    area: Rect,
    steps: &[Step],
    current: usize,
    is_focused: bool,
    scroll: &mut usize,
) {
    let title = format!(" Steps ({}) ", steps.len());
    let block = pane_block(&title, is_focused);

    let visible_height = area.height.saturating_sub(2) as usize;
    *scroll = follow_offset(*scroll, current, visible_height);

    let lines: Vec<Line> = steps
        .iter()
        .enumerate()
        .skip(*scroll)
        .take(visible_height)
        .map(|(index, step)| {
            let is_current = index == current;
            let marker = if is_current { "▶" } else { " " };
            let number_style = if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.highlight)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut text_style = kind_style(step);
            if is_current {
                text_style = text_style
                    .bg(DEFAULT_THEME.current_line_bg)
                    .add_modifier(Modifier::BOLD);
            }

            Line::from(vec![
                Span::styled(format!("{:>4} {} ", index + 1, marker), number_style),
                Span::raw("  ".repeat(step.depth())),
                Span::styled(step.to_string(), text_style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
