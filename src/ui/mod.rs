//! Terminal replay of a finished trace, built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! - **[`app`]**: replay cursor over the trace, keyboard event loop, pane focus
//! - **[`panes`]**: stateless render functions for each visible pane (source,
//!   steps, expression, variables, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The tracer runs to completion before the UI starts; stepping here only
//! moves a cursor over [`Trace::steps`].
//!
//! [`Trace::steps`]: crate::trace::Trace::steps

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
