//! Interactive Edit Session
//!
//! Drives a [`TableModel`] and the input decoder against a terminal. The
//! table is printed once; afterwards every handler rewrites only the lines
//! it must, moving the cursor relative to the row awaiting a decision.
//!
//! Screen layout, relative to the current row `c` of `n` rows:
//!
//! ```text
//!      header
//!      row 0 .. row c-1   decided, unlabelled, styled
//!   -> row c              prompt sits at column `line_length`
//!      row c+1 .. n-1     renumbered 2, 3, ...
//!      status line        retry banner, `n - c` lines below the prompt
//! ```
//!
//! Every handler leaves the real cursor on the current row, so the row
//! offsets above stay valid across redraws.

use std::io;

use tracing::{debug, info, warn};

use super::config::EditorConfig;
use super::decoder::{decode, Action, Decision, Decoded};
use super::input::{EventSource, SessionEvent, Subscription};
use super::table::{EditResult, Line, Table, TableModel};
use super::terminal::{Style, Terminal};
use super::utils::pad_right;
use super::validator::ValueValidator;

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Rendering,
    AwaitingInput,
    /// Awaiting input with a retry banner below the table
    MessageShown,
    Applying,
    Done,
    Aborted,
}

/// How a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed(EditResult),
    Aborted,
}

/// State machine reviewing one table row by row
pub struct EditSession<T: Terminal> {
    model: TableModel,
    terminal: T,
    config: EditorConfig,
    validator: Option<Box<dyn ValueValidator + Send>>,
    state: SessionState,
    has_message: bool,
    result: Option<EditResult>,
}

impl<T: Terminal> EditSession<T> {
    pub fn new(table: Table, terminal: T, config: EditorConfig) -> Self {
        Self {
            model: TableModel::new(table, &config.prefix),
            terminal,
            config,
            validator: None,
            state: SessionState::Rendering,
            has_message: false,
            result: None,
        }
    }

    /// Gate free-form replacement values through a validator
    pub fn with_validator(mut self, validator: Box<dyn ValueValidator + Send>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn model(&self) -> &TableModel {
        &self.model
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    /// The result once the session is done
    pub fn result(&self) -> Option<&EditResult> {
        self.result.as_ref()
    }

    /// Subscribe to `source`, print the table and process events until done or aborted
    pub fn run<S: EventSource + ?Sized>(&mut self, source: &mut S) -> io::Result<SessionOutcome> {
        let mut events = Subscription::open(source)?;
        self.start()?;

        loop {
            match self.state {
                SessionState::Done => {
                    let result = self.result.clone().unwrap_or_default();
                    return Ok(SessionOutcome::Completed(result));
                }
                SessionState::Aborted => return Ok(SessionOutcome::Aborted),
                _ => {}
            }

            match events.next_event()? {
                SessionEvent::Line(line) => self.handle_line(&line)?,
                SessionEvent::Interrupt => self.handle_interrupt()?,
                SessionEvent::Closed => {
                    warn!(cursor = self.model.cursor(), "input closed before review finished");
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "input closed before every row was decided",
                    ));
                }
            }
        }
    }

    /// Print the whole table and put the prompt on the first row
    pub fn start(&mut self) -> io::Result<()> {
        if self.state != SessionState::Rendering {
            return Ok(());
        }
        info!(rows = self.model.row_count(), "starting table review");

        let header = self.model.header_line();
        self.write_line(&header)?;
        for i in 0..self.model.row_count() {
            let line = self.model.row_line(i);
            self.write_line(&line)?;
        }

        if self.model.at_end() {
            self.finish();
            return self.terminal.flush();
        }

        self.terminal.move_by(0, -(self.model.row_count() as i32))?;
        self.draw_prompt()?;
        self.state = SessionState::AwaitingInput;
        self.terminal.flush()
    }

    /// Decode a line typed at the prompt and apply it
    pub fn handle_line(&mut self, line: &str) -> io::Result<()> {
        if !matches!(
            self.state,
            SessionState::AwaitingInput | SessionState::MessageShown
        ) {
            debug!(state = ?self.state, "ignoring input line");
            return Ok(());
        }

        let decoded = decode(line, self.validator.as_deref().map(|v| v as &dyn ValueValidator));
        match decoded {
            Decoded::Retry => self.show_retry(line)?,
            Decoded::Decision(decision) => {
                if self.has_message {
                    self.write_status(None)?;
                    self.has_message = false;
                }
                self.apply(decision)?;
            }
        }

        self.terminal.flush()
    }

    /// Move below everything rendered, say goodbye and stop
    pub fn handle_interrupt(&mut self) -> io::Result<()> {
        if matches!(self.state, SessionState::Done | SessionState::Aborted) {
            return Ok(());
        }
        info!(cursor = self.model.cursor(), "table review aborted");

        let below = self.model.remaining_rows() + usize::from(self.has_message);
        self.terminal.move_by(0, below as i32)?;
        self.terminal.move_to_column(0)?;
        self.terminal.new_line()?;
        let farewell = self.config.farewell_message.clone();
        self.terminal.write(&farewell, Style::Plain)?;
        self.terminal.new_line()?;

        self.state = SessionState::Aborted;
        self.terminal.flush()
    }

    fn show_retry(&mut self, line: &str) -> io::Result<()> {
        debug!(input = %line, "input rejected");

        let message = self.config.retry_message_for(line);
        self.write_status(Some(&message))?;

        // Erase the rejected input after the prompt
        self.terminal.move_to_column(self.model.line_length())?;
        self.terminal.clear_line_right()?;

        self.has_message = true;
        self.state = SessionState::MessageShown;
        Ok(())
    }

    fn apply(&mut self, decision: Decision) -> io::Result<()> {
        self.state = SessionState::Applying;

        let count = decision.repeat.rows(self.model.remaining_rows());
        let style = match decision.action {
            Action::Keep => Style::Highlight,
            Action::Remove => Style::Dim,
        };
        debug!(action = ?decision.action, count, value = ?decision.value, "applying decision");

        for _ in 0..count {
            self.model.set_value(decision.value.as_deref());
            if decision.action == Action::Remove {
                self.model.mark_removed();
            }

            let line = self.model.render_current(style);
            self.terminal.move_to_column(0)?;
            self.terminal.clear_line_right()?;
            self.terminal.write(&line.text, line.style)?;
            self.terminal.move_by(0, 1)?;
            self.terminal.move_to_column(0)?;

            self.model.advance();
        }

        if self.model.at_end() {
            self.finish();
            return Ok(());
        }

        self.renumber()?;
        self.draw_prompt()?;
        self.state = SessionState::AwaitingInput;
        Ok(())
    }

    /// Relabel the undecided rows 1..=remaining, ending back on the current row
    fn renumber(&mut self) -> io::Result<()> {
        let remaining = self.model.remaining_rows();
        let width = self.model.index_width();
        let column = self.model.prefix_width();

        for i in 0..remaining {
            self.terminal.move_to_column(column)?;
            self.terminal.write(&pad_right(&(i + 1).to_string(), width), Style::Plain)?;
            self.terminal.move_by(0, 1)?;
        }

        self.terminal.move_by(0, -(remaining as i32))?;
        Ok(())
    }

    fn draw_prompt(&mut self) -> io::Result<()> {
        self.terminal.move_to_column(0)?;
        let marker = self.config.prompt_marker.clone();
        self.terminal.write(&marker, Style::Plain)?;
        self.terminal.move_to_column(self.model.line_length())
    }

    /// Replace the status line below the table, returning to the current row
    fn write_status(&mut self, message: Option<&str>) -> io::Result<()> {
        let offset = self.model.remaining_rows() as i32;

        self.terminal.move_by(0, offset)?;
        self.terminal.move_to_column(0)?;
        self.terminal.clear_line_right()?;
        if let Some(message) = message {
            self.terminal.write(message, Style::Plain)?;
        }
        self.terminal.move_to_column(0)?;
        self.terminal.move_by(0, -offset)
    }

    fn write_line(&mut self, line: &Line) -> io::Result<()> {
        self.terminal.write(&line.text, line.style)?;
        self.terminal.new_line()
    }

    fn finish(&mut self) {
        let result = self.model.collect();
        info!(kept = result.len(), rows = self.model.row_count(), "table review finished");
        self.result = Some(result);
        self.state = SessionState::Done;
    }
}
