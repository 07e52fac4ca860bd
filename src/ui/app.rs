//! Replay application state and event loop

use crate::trace::{Step, Trace};
use crate::ui::panes::{self, SourceScrollState};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};
use tracing::debug;

/// Delay between steps while auto-playing
const PLAY_INTERVAL: Duration = Duration::from_secs(1);

/// Minimum gap between two space presses before play is toggled again
const SPACE_DEBOUNCE: Duration = Duration::from_millis(200);

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Steps,
    Variables,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> steps -> variables)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Steps,
            FocusedPane::Steps => FocusedPane::Variables,
            FocusedPane::Variables => FocusedPane::Source,
        }
    }
}

/// The main application state
pub struct App {
    pub trace: Trace,

    /// The traced program's text
    pub source_code: String,

    /// Index of the step under the cursor
    pub position: usize,

    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: SourceScrollState,
    pub steps_scroll: usize,
    pub variables_scroll: usize,

    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

fn instant_ago(gap: Duration) -> Instant {
    let now = Instant::now();
    now.checked_sub(gap).unwrap_or(now)
}

impl App {
    pub fn new(trace: Trace, source_code: String) -> Self {
        App {
            trace,
            source_code,
            position: 0,
            focused_pane: FocusedPane::Steps,
            source_scroll: SourceScrollState::default(),
            steps_scroll: 0,
            variables_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: instant_ago(SPACE_DEBOUNCE),
        }
    }

    /// Run the replay until the user quits
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= PLAY_INTERVAL {
                if self.step_forward() {
                    self.status_message = "Playing...".to_string();
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.trace.steps.get(self.position)
    }

    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Expression (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(columns[0]);

        // Right column: Steps (top) | Variables (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[1]);

        let current_line = self
            .trace
            .location_of(self.position)
            .map(|location| location.line);
        panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            current_line,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_expression_pane(frame, left_rows[1], self.current_step());

        panes::render_steps_pane(
            frame,
            right_rows[0],
            &self.trace.steps,
            self.position,
            self.focused_pane == FocusedPane::Steps,
            &mut self.steps_scroll,
        );

        let bindings = if self.trace.is_empty() {
            Vec::new()
        } else {
            self.trace.bindings_at(self.position)
        };
        let changed = match self.trace.steps.get(self.position) {
            Some(Step::Variable(var)) => Some(var.target.as_str()),
            _ => None,
        };
        panes::render_variables_pane(
            frame,
            right_rows[1],
            &bindings,
            changed,
            self.focused_pane == FocusedPane::Variables,
            &mut self.variables_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.position,
            self.trace.len(),
            self.is_playing,
        );
    }

    pub(crate) fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1);
                let stepped = (0..n).take_while(|_| self.step_forward()).count();
                self.status_message = format!("Stepped forward {} step(s)", stepped);
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.is_playing = false;
                self.status_message = if self.step_backward() {
                    "Stepped backward".to_string()
                } else {
                    "Already at the first step".to_string()
                };
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.is_playing = false;
                self.status_message = if self.step_forward() {
                    "Stepped forward".to_string()
                } else {
                    "Already at the last step".to_string()
                };
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling up makes the current line move down visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Steps => {
                    self.is_playing = false;
                    self.step_backward();
                }
                FocusedPane::Variables => {
                    self.variables_scroll = self.variables_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Steps => {
                    self.is_playing = false;
                    self.step_forward();
                }
                FocusedPane::Variables => {
                    self.variables_scroll = self.variables_scroll.saturating_add(1);
                }
            },
            KeyCode::Char(' ') => {
                if self.last_space_press.elapsed() >= SPACE_DEBOUNCE {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = instant_ago(PLAY_INTERVAL);
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.position = self.trace.len().saturating_sub(1);
                self.status_message = "Jumped to end".to_string();
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.position = 0;
                self.status_message = "Jumped to start".to_string();
            }
            _ => {}
        }
    }

    /// Move the cursor one step forward; false at the last step
    fn step_forward(&mut self) -> bool {
        if self.position + 1 >= self.trace.len() {
            return false;
        }
        self.position += 1;
        debug!(position = self.position, "replay step");
        true
    }

    /// Move the cursor one step back; false at the first step
    fn step_backward(&mut self) -> bool {
        if self.position == 0 {
            return false;
        }
        self.position -= 1;
        debug!(position = self.position, "replay step");
        true
    }
}
