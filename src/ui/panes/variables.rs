//! Variables pane

use super::pane_block;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the bindings as they stand at the cursor.
///
/// `changed` names the target of the current step when it is a Variable step.
pub fn render_variables_pane(
    frame: &mut Frame,
    area: Rect,
    bindings: &[(String, String)],
    changed: Option<&str>,
    is_focused: bool,
    scroll: &mut usize,
) {
    let block = pane_block(" Variables ", is_focused);

    let visible_height = area.height.saturating_sub(2) as usize;
    *scroll = (*scroll).min(bindings.len().saturating_sub(visible_height));

    let width = bindings
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0);

    let lines: Vec<Line> = if bindings.is_empty() {
        vec![Line::from(Span::styled(
            "(no variables yet)",
            Style::default().fg(DEFAULT_THEME.comment),
        ))]
    } else {
        bindings
            .iter()
            .skip(*scroll)
            .take(visible_height)
            .map(|(name, value)| {
                let value_style = if changed == Some(name.as_str()) {
                    Style::default()
                        .fg(DEFAULT_THEME.highlight)
                        .bg(DEFAULT_THEME.changed_bg)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(DEFAULT_THEME.number)
                };
                Line::from(vec![
                    Span::styled(
                        format!("{:<width$}", name, width = width),
                        Style::default().fg(DEFAULT_THEME.fg),
                    ),
                    Span::styled(" = ", Style::default().fg(DEFAULT_THEME.comment)),
                    Span::styled(value.clone(), value_style),
                ])
            })
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
