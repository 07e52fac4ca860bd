//! Step records
//!
//! A trace is a flat, time-ordered log of [`Step`]s. Records are immutable
//! once appended; loop state advances by deriving a new [`Condition`] with
//! [`Condition::with_cur`] rather than mutating the old one.

use crate::highlight::Highlight;
use serde::Serialize;
use std::fmt;

/// A name bound to a value at some depth
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub depth: usize,
    pub target: String,
    pub expr: String,
}

/// Field names of a [`Condition`], used as for-step highlights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionField {
    Target,
    Cur,
    Start,
    End,
    Step,
}

impl ConditionField {
    pub const ALL: [ConditionField; 5] = [
        ConditionField::Target,
        ConditionField::Cur,
        ConditionField::Start,
        ConditionField::End,
        ConditionField::Step,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConditionField::Target => "target",
            ConditionField::Cur => "cur",
            ConditionField::Start => "start",
            ConditionField::End => "end",
            ConditionField::Step => "step",
        }
    }
}

/// State of one `for ... in range(...)` loop at one iteration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Condition {
    pub target: String,
    pub cur: i64,
    pub start: i64,
    pub end: i64,
    pub step: i64,
}

impl Condition {
    /// Initial state, positioned at `start`
    pub fn new(target: impl Into<String>, start: i64, end: i64, step: i64) -> Self {
        Condition {
            target: target.into(),
            cur: start,
            start,
            end,
            step,
        }
    }

    /// Fields that changed since the previous iteration
    pub fn changed_attr(&self) -> Vec<ConditionField> {
        if self.cur == self.start {
            ConditionField::ALL.to_vec()
        } else {
            vec![ConditionField::Cur]
        }
    }

    /// A copy positioned at `cur`
    pub fn with_cur(&self, cur: i64) -> Condition {
        Condition {
            cur,
            ..self.clone()
        }
    }

    /// The condition for the next pass
    pub fn advance(&self) -> Condition {
        self.with_cur(self.cur.saturating_add(self.step))
    }

    /// Whether `cur` is still inside the range
    pub fn in_range(&self) -> bool {
        match self.step.signum() {
            1 => self.cur < self.end,
            -1 => self.cur > self.end,
            _ => false,
        }
    }
}

/// One loop iteration entered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForStep {
    pub id: usize,
    pub depth: usize,
    pub condition: Condition,
    pub highlight: Vec<ConditionField>,
}

/// One evaluation stage of a printed expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintStep {
    pub id: usize,
    pub depth: usize,
    pub expr: String,
    pub highlight: Highlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchKind {
    If,
    Elif,
    Else,
}

impl fmt::Display for BranchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            BranchKind::If => "if",
            BranchKind::Elif => "elif",
            BranchKind::Else => "else",
        };
        write!(f, "{}", keyword)
    }
}

/// One evaluation stage of a branch condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IfStep {
    pub id: usize,
    pub depth: usize,
    pub branch: BranchKind,
    pub expr: String,
    pub highlight: Highlight,
}

/// A call argument as bound to its parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    pub name: String,
    pub value: String,
}

/// Entry into a user-defined function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallStep {
    pub id: usize,
    pub depth: usize,
    pub name: String,
    pub signature: String,
    pub args: Vec<Argument>,
}

/// One evaluation stage of a returned expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnStep {
    pub id: usize,
    pub depth: usize,
    pub expr: String,
    pub highlight: Highlight,
}

/// Exit from a user-defined function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndCallStep {
    pub id: usize,
    pub depth: usize,
    pub name: String,
    pub value: String,
}

/// A `def` statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefineStep {
    pub id: usize,
    pub depth: usize,
    pub name: String,
    pub signature: String,
}

/// A single trace record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Step {
    Variable(Variable),
    For(ForStep),
    Print(PrintStep),
    If(IfStep),
    Call(CallStep),
    Return(ReturnStep),
    EndCall(EndCallStep),
    Define(DefineStep),
}

impl Step {
    pub fn kind(&self) -> &'static str {
        match self {
            Step::Variable(_) => "variable",
            Step::For(_) => "for",
            Step::Print(_) => "print",
            Step::If(_) => "if",
            Step::Call(_) => "call",
            Step::Return(_) => "return",
            Step::EndCall(_) => "endcall",
            Step::Define(_) => "define",
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Step::Variable(s) => s.depth,
            Step::For(s) => s.depth,
            Step::Print(s) => s.depth,
            Step::If(s) => s.depth,
            Step::Call(s) => s.depth,
            Step::Return(s) => s.depth,
            Step::EndCall(s) => s.depth,
            Step::Define(s) => s.depth,
        }
    }

    /// Source-position id; Variable records have none
    pub fn id(&self) -> Option<usize> {
        match self {
            Step::Variable(_) => None,
            Step::For(s) => Some(s.id),
            Step::Print(s) => Some(s.id),
            Step::If(s) => Some(s.id),
            Step::Call(s) => Some(s.id),
            Step::Return(s) => Some(s.id),
            Step::EndCall(s) => Some(s.id),
            Step::Define(s) => Some(s.id),
        }
    }

    /// Expression text and character highlight, for steps that carry one
    pub fn highlighted_text(&self) -> Option<(&str, &[usize])> {
        match self {
            Step::Print(s) => Some((&s.expr, &s.highlight)),
            Step::If(s) => Some((&s.expr, &s.highlight)),
            Step::Return(s) => Some((&s.expr, &s.highlight)),
            _ => None,
        }
    }
}

/// One-line summary used by the text output and the replay list
impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Variable(s) => write!(f, "{} = {}", s.target, s.expr),
            Step::For(s) => {
                let c = &s.condition;
                write!(
                    f,
                    "for {} = {} in range({}, {}, {})",
                    c.target, c.cur, c.start, c.end, c.step
                )
            }
            Step::Print(s) => write!(f, "print {}", s.expr),
            Step::If(s) if s.expr.is_empty() => write!(f, "{}", s.branch),
            Step::If(s) => write!(f, "{} {}", s.branch, s.expr),
            Step::Call(s) => {
                let args: Vec<String> = s
                    .args
                    .iter()
                    .map(|a| format!("{}={}", a.name, a.value))
                    .collect();
                write!(f, "call {}({})", s.name, args.join(", "))
            }
            Step::Return(s) => write!(f, "return {}", s.expr),
            Step::EndCall(s) => write!(f, "{}() -> {}", s.name, s.value),
            Step::Define(s) => write!(f, "def {}", s.signature),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changed_attr_first_iteration() {
        let condition = Condition::new("i", 0, 6, 2);
        assert_eq!(condition.changed_attr(), ConditionField::ALL.to_vec());
    }

    #[test]
    fn test_changed_attr_later_iterations() {
        let condition = Condition::new("i", 0, 6, 2).advance();
        assert_eq!(condition.cur, 2);
        assert_eq!(condition.changed_attr(), vec![ConditionField::Cur]);
    }

    #[test]
    fn test_with_cur_leaves_receiver_untouched() {
        let first = Condition::new("i", 3, 0, -1);
        let second = first.with_cur(2);
        assert_eq!(first.cur, 3);
        assert_eq!(second.cur, 2);
        assert_eq!(second.start, 3);
    }

    #[test]
    fn test_in_range_follows_step_sign() {
        assert!(Condition::new("i", 0, 3, 1).in_range());
        assert!(!Condition::new("i", 5, 0, 1).in_range());
        assert!(Condition::new("i", 5, 0, -1).in_range());
        assert!(!Condition::new("i", 0, 0, -1).in_range());
    }

    #[test]
    fn test_step_serializes_with_kind_tag() {
        let step = Step::For(ForStep {
            id: 1,
            depth: 0,
            condition: Condition::new("i", 0, 3, 1),
            highlight: vec![ConditionField::Cur],
        });
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["kind"], "for");
        assert_eq!(json["condition"]["target"], "i");
        assert_eq!(json["highlight"][0], "cur");

        let step = Step::EndCall(EndCallStep {
            id: 2,
            depth: 0,
            name: "f".to_string(),
            value: "None".to_string(),
        });
        assert_eq!(serde_json::to_value(&step).unwrap()["kind"], "endcall");
    }
}
