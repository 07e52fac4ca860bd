//! Expression pane: the current step with its changed characters marked.
//!
//! Print, If and Return steps carry a character highlight; For steps carry
//! the names of the loop fields that changed. Other kinds have no highlight
//! and are shown as plain text.

use super::pane_block;
use crate::highlight::segments;
use crate::trace::{ConditionField, ForStep, Step};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

fn changed_style() -> Style {
    Style::default()
        .fg(DEFAULT_THEME.highlight)
        .bg(DEFAULT_THEME.changed_bg)
        .add_modifier(Modifier::BOLD)
}

fn label(text: &str) -> Span<'static> {
    Span::styled(
        format!("{:<8}", text),
        Style::default().fg(DEFAULT_THEME.comment),
    )
}

/// Styled runs of `text`, changed positions standing out
fn highlighted_spans(text: &str, highlight: &[usize]) -> Vec<Span<'static>> {
    segments(text, highlight)
        .into_iter()
        .map(|(run, marked)| {
            if marked {
                Span::styled(run, changed_style())
            } else {
                Span::styled(run, Style::default().fg(DEFAULT_THEME.fg))
            }
        })
        .collect()
}

fn condition_lines(step: &ForStep) -> Vec<Line<'static>> {
    let c = &step.condition;
    ConditionField::ALL
        .iter()
        .map(|field| {
            let value = match field {
                ConditionField::Target => c.target.clone(),
                ConditionField::Cur => c.cur.to_string(),
                ConditionField::Start => c.start.to_string(),
                ConditionField::End => c.end.to_string(),
                ConditionField::Step => c.step.to_string(),
            };
            let style = if step.highlight.contains(field) {
                changed_style()
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            };
            Line::from(vec![label(field.name()), Span::styled(value, style)])
        })
        .collect()
}

fn step_lines(step: &Step) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        label("kind"),
        Span::styled(
            step.kind().to_string(),
            Style::default().fg(DEFAULT_THEME.keyword),
        ),
    ])];

    match step {
        Step::For(for_step) => lines.extend(condition_lines(for_step)),
        Step::Variable(var) => lines.push(Line::from(vec![
            label(&var.target),
            Span::styled(var.expr.clone(), Style::default().fg(DEFAULT_THEME.fg)),
        ])),
        Step::Call(call) => {
            lines.push(Line::from(vec![
                label("call"),
                Span::styled(
                    call.signature.clone(),
                    Style::default().fg(DEFAULT_THEME.function),
                ),
            ]));
            lines.extend(call.args.iter().map(|arg| {
                Line::from(vec![
                    label(&arg.name),
                    Span::styled(arg.value.clone(), Style::default().fg(DEFAULT_THEME.fg)),
                ])
            }));
        }
        Step::EndCall(end) => lines.push(Line::from(vec![
            label(&end.name),
            Span::styled(
                end.value.clone(),
                Style::default().fg(DEFAULT_THEME.return_value),
            ),
        ])),
        Step::Define(def) => lines.push(Line::from(vec![
            label("def"),
            Span::styled(
                def.signature.clone(),
                Style::default().fg(DEFAULT_THEME.function),
            ),
        ])),
        Step::If(if_step) => {
            let mut spans = vec![label(&if_step.branch.to_string())];
            spans.extend(highlighted_spans(&if_step.expr, &if_step.highlight));
            lines.push(Line::from(spans));
        }
        Step::Print(_) | Step::Return(_) => {
            if let Some((text, highlight)) = step.highlighted_text() {
                let mut spans = vec![label("expr")];
                spans.extend(highlighted_spans(text, highlight));
                lines.push(Line::from(spans));
            }
        }
    }

    lines
}

/// Render the expression pane for the step under the cursor
pub fn render_expression_pane(frame: &mut Frame, area: Rect, step: Option<&Step>) {
    let block = pane_block(" Expression ", false);

    let lines = match step {
        Some(step) => step_lines(step),
        None => vec![Line::from(Span::styled(
            "(empty trace)",
            Style::default().fg(DEFAULT_THEME.comment),
        ))],
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{Condition, PrintStep};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_highlighted_spans_mark_changed_runs() {
        let spans = highlighted_spans("10 + 20", &[0, 1, 5, 6]);
        let runs: Vec<(String, bool)> = spans
            .iter()
            .map(|span| (span.content.to_string(), span.style == changed_style()))
            .collect();
        assert_eq!(
            runs,
            vec![
                ("10".to_string(), true),
                (" + ".to_string(), false),
                ("20".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_for_step_marks_changed_fields() {
        let step = ForStep {
            id: 1,
            depth: 0,
            condition: Condition::new("i", 0, 6, 2).with_cur(2),
            highlight: vec![ConditionField::Cur],
        };
        let lines = condition_lines(&step);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1].spans[1].content, "2");
        assert_eq!(lines[1].spans[1].style, changed_style());
        assert_ne!(lines[0].spans[1].style, changed_style());
    }

    #[test]
    fn test_print_step_lines() {
        let step = Step::Print(PrintStep {
            id: 1,
            depth: 0,
            expr: "30".to_string(),
            highlight: vec![0, 1],
        });
        let lines = step_lines(&step);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].spans[1].content, "30");
    }
}
