//! Main TUI application state and logic

use crate::interpreter::engine::Interpreter;
use crate::lesson::source::LESSON_SOURCE;
use crate::ui::panes::{self, SourceScrollState};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Terminal,
    Stack,
    Statics,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: source -> terminal -> stack -> statics)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Terminal,
            FocusedPane::Terminal => FocusedPane::Stack,
            FocusedPane::Stack => FocusedPane::Statics,
            FocusedPane::Statics => FocusedPane::Source,
        }
    }
}

/// The main application state
pub struct App {
    /// The interpreter holding the recorded history
    pub interpreter: Interpreter,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    pub source_scroll: SourceScrollState,
    pub stack_scroll: usize,
    pub terminal_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,
}

impl App {
    pub fn new(interpreter: Interpreter) -> Self {
        App {
            interpreter,
            focused_pane: FocusedPane::Source,
            source_scroll: SourceScrollState {
                offset: 0,
                target_line_row: None, // Centered on first render
            },
            stack_scroll: 0,
            terminal_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            last_play_time: Instant::now(),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_secs(1) {
                if self.interpreter.step_forward().is_ok() {
                    self.terminal_scroll = usize::MAX;
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
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

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Console (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        // Right column: Stack (top) | Statics (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(5)])
            .split(columns[1]);

        let at_error = self.interpreter.at_error();
        let fault = if at_error {
            self.interpreter
                .error_state()
                .map(|state| state.error.to_string())
        } else {
            None
        };

        panes::render_source_pane(
            frame,
            left_rows[0],
            LESSON_SOURCE,
            self.interpreter.current_location().line,
            at_error,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_terminal_pane(
            frame,
            left_rows[1],
            self.interpreter.console(),
            fault.as_deref(),
            self.focused_pane == FocusedPane::Terminal,
            &mut self.terminal_scroll,
        );

        panes::render_stack_pane(
            frame,
            right_rows[0],
            self.interpreter.memory(),
            self.focused_pane == FocusedPane::Stack,
            &mut self.stack_scroll,
        );

        panes::render_statics_pane(
            frame,
            right_rows[1],
            self.interpreter.memory(),
            self.focused_pane == FocusedPane::Statics,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.interpreter.history_position(),
            self.interpreter.total_snapshots(),
            at_error,
            self.is_playing,
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1);
                let stepped = (0..n)
                    .take_while(|_| self.interpreter.step_forward().is_ok())
                    .count();
                self.status_message = format!("Stepped forward {} step(s)", stepped);
                self.terminal_scroll = usize::MAX;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Up => self.scroll_focused(-1),
            KeyCode::Down => self.scroll_focused(1),
            KeyCode::Char(' ') => {
                self.is_playing = !self.is_playing;
                if self.is_playing {
                    // Step immediately on the next tick
                    self.last_play_time = Instant::now()
                        .checked_sub(Duration::from_secs(1))
                        .unwrap_or_else(Instant::now);
                    self.status_message = "Playing...".to_string();
                } else {
                    self.status_message = "Paused".to_string();
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                if self.interpreter.jump_to_end().is_ok() {
                    self.status_message = "Jumped to end".to_string();
                }
                self.terminal_scroll = usize::MAX;
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                if self.interpreter.rewind_to_start().is_ok() {
                    self.status_message = "Jumped to start".to_string();
                }
                self.terminal_scroll = usize::MAX;
            }
            _ => {}
        }
    }

    fn scroll_focused(&mut self, delta: isize) {
        let offset = match self.focused_pane {
            FocusedPane::Source => {
                // Scrolling moves the current line's row the opposite way
                if let Some(row) = self.source_scroll.target_line_row {
                    self.source_scroll.target_line_row = Some(row.saturating_add_signed(-delta));
                }
                return;
            }
            FocusedPane::Stack => &mut self.stack_scroll,
            FocusedPane::Terminal => &mut self.terminal_scroll,
            FocusedPane::Statics => return,
        };
        *offset = offset.saturating_add_signed(delta);
    }

    /// Step forward in execution
    fn step_forward(&mut self) {
        match self.interpreter.step_forward() {
            Ok(()) => {
                self.status_message = "Stepped forward".to_string();
                // Auto-scroll terminal to bottom
                self.terminal_scroll = usize::MAX;
            }
            Err(e) => {
                self.status_message = format!("Cannot step forward: {}", e);
            }
        }
    }

    /// Step backward in execution
    fn step_backward(&mut self) {
        match self.interpreter.step_backward() {
            Ok(()) => {
                self.status_message = "Stepped backward".to_string();
                self.terminal_scroll = usize::MAX;
            }
            Err(e) => {
                self.status_message = format!("Cannot step backward: {}", e);
            }
        }
    }
}
