//! TUI pane rendering modules
//!
//! - [`source`]: program text with the current statement's line marked
//! - [`steps`]: the step log, indented by depth, with the cursor row marked
//! - [`expression`]: the current step's text with changed tokens highlighted
//! - [`variables`]: bindings as rebuilt from the Variable steps so far
//! - [`status`]: status bar with keybindings and replay position
//!
//! Each pane module exports one `render_*` function; panes that scroll take
//! their scroll state by `&mut`.

pub mod expression;
pub mod source;
pub mod status;
pub mod steps;
pub mod variables;

pub use expression::render_expression_pane;
pub use source::{render_source_pane, SourceScrollState};
pub use status::render_status_bar;
pub use steps::render_steps_pane;
pub use variables::render_variables_pane;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders};

/// Bordered pane block, yellow and bold when focused
fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// First row to draw so that `selected` stays inside a window of `height` rows
fn follow_offset(offset: usize, selected: usize, height: usize) -> usize {
    let height = height.max(1);
    if selected < offset {
        selected
    } else if selected >= offset + height {
        selected + 1 - height
    } else {
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_offset() {
        assert_eq!(follow_offset(0, 3, 10), 0);
        assert_eq!(follow_offset(0, 12, 10), 3);
        assert_eq!(follow_offset(5, 2, 10), 2);
        assert_eq!(follow_offset(0, 0, 0), 0);
    }
}
