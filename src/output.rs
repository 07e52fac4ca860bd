//! Plain-text rendering of a finished trace.
//!
//! One line per step: a 1-based index, two spaces of indentation per depth
//! level, then the step's summary. Changed characters (and the changed
//! fields of a For step) are either styled with crossterm for a terminal or
//! wrapped in `[` `]` for pipes and files.

use crate::highlight::segments;
use crate::trace::{ConditionField, ForStep, Step, Trace};
use crossterm::style::Stylize;

/// How changed text is marked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marking {
    /// Bold yellow ANSI styling
    Styled,
    /// Square brackets around each changed run
    Brackets,
}

impl Marking {
    fn mark(self, text: &str) -> String {
        match self {
            Marking::Styled => text.yellow().bold().to_string(),
            Marking::Brackets => format!("[{}]", text),
        }
    }
}

/// `text` with the runs selected by `highlight` marked
pub fn marked(text: &str, highlight: &[usize], marking: Marking) -> String {
    segments(text, highlight)
        .into_iter()
        .map(|(run, changed)| if changed { marking.mark(&run) } else { run })
        .collect()
}

fn for_line(step: &ForStep, marking: Marking) -> String {
    let c = &step.condition;
    let field = |name: ConditionField, value: String| {
        if step.highlight.contains(&name) {
            marking.mark(&value)
        } else {
            value
        }
    };
    format!(
        "for {} = {} in range({}, {}, {})",
        field(ConditionField::Target, c.target.clone()),
        field(ConditionField::Cur, c.cur.to_string()),
        field(ConditionField::Start, c.start.to_string()),
        field(ConditionField::End, c.end.to_string()),
        field(ConditionField::Step, c.step.to_string()),
    )
}

/// One step's summary with its highlight applied
pub fn step_line(step: &Step, marking: Marking) -> String {
    match step {
        Step::For(for_step) => for_line(for_step, marking),
        Step::Print(s) => format!("print {}", marked(&s.expr, &s.highlight, marking)),
        Step::Return(s) => format!("return {}", marked(&s.expr, &s.highlight, marking)),
        Step::If(s) if s.expr.is_empty() => s.branch.to_string(),
        Step::If(s) => format!("{} {}", s.branch, marked(&s.expr, &s.highlight, marking)),
        other => other.to_string(),
    }
}

/// The whole trace, one line per step, newline-terminated
pub fn render_text(trace: &Trace, marking: Marking) -> String {
    let width = trace.len().to_string().len();
    let mut out = String::new();
    for (index, step) in trace.steps.iter().enumerate() {
        out.push_str(&format!(
            "{:>width$}  {}{}\n",
            index + 1,
            "  ".repeat(step.depth()),
            step_line(step, marking),
            width = width
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TraceConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_brackets_mark_changed_runs() {
        assert_eq!(marked("10 + 20", &[0, 1], Marking::Brackets), "[10] + 20");
        assert_eq!(marked("30", &[0, 1], Marking::Brackets), "[30]");
        assert_eq!(marked("a + b", &[], Marking::Brackets), "a + b");
    }

    #[test]
    fn test_render_text_indents_and_marks() {
        let trace = crate::trace_source(
            "for i in range(0, 4, 2):\n    print(i)\n",
            TraceConfig::default(),
        )
        .unwrap();
        assert_eq!(
            render_text(&trace, Marking::Brackets),
            "1  for [i] = [0] in range([0], [4], [2])\n\
             2    print [0]\n\
             3  for i = [2] in range(0, 4, 2)\n\
             4    print [2]\n"
        );
    }

    #[test]
    fn test_else_and_variable_lines() {
        let trace = crate::trace_source(
            "a = 1\nif a > 2:\n    b = 1\nelse:\n    b = 2\n",
            TraceConfig::default(),
        )
        .unwrap();
        let lines: Vec<String> = trace
            .steps
            .iter()
            .map(|step| step_line(step, Marking::Brackets))
            .collect();
        assert_eq!(
            lines,
            vec![
                "a = 1",
                "if a > 2",
                "if [1] > 2",
                "if [False]",
                "else",
                "b = 2",
            ]
        );
    }
}
