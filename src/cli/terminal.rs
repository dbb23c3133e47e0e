//! Terminal Boundary
//!
//! The session only needs a handful of primitives from its host: relative
//! and absolute cursor moves, clearing to the end of the line, and writing
//! styled text. `CrosstermTerminal` drives a real terminal; `VirtualTerminal`
//! keeps an in-memory screen so rendering can be checked without one.

use std::io::{self, Write};

use crossterm::{
    cursor::{MoveDown, MoveLeft, MoveRight, MoveToColumn, MoveUp},
    queue,
    style::{Color, Print, PrintStyledContent, Stylize},
    terminal::{Clear, ClearType},
};

use super::config::EditorConfig;

/// Presentation tag for a written line, interpreted by the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    Plain,
    Dim,
    Highlight,
}

/// Minimal set of terminal operations the session relies on
pub trait Terminal {
    /// Move the cursor relative to its current position
    fn move_by(&mut self, dx: i32, dy: i32) -> io::Result<()>;

    /// Move the cursor to an absolute column on the current row
    fn move_to_column(&mut self, column: usize) -> io::Result<()>;

    /// Clear from the cursor to the end of the line
    fn clear_line_right(&mut self) -> io::Result<()>;

    /// Write text at the cursor, advancing it
    fn write(&mut self, text: &str, style: Style) -> io::Result<()>;

    /// Carriage return plus line feed, scrolling at the bottom of the screen
    fn new_line(&mut self) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;
}

/// Real terminal output through crossterm commands
pub struct CrosstermTerminal<W: Write> {
    out: W,
    highlight: Color,
}

impl CrosstermTerminal<io::Stdout> {
    pub fn stdout(config: &EditorConfig) -> Self {
        Self::new(io::stdout(), config)
    }
}

impl<W: Write> CrosstermTerminal<W> {
    pub fn new(out: W, config: &EditorConfig) -> Self {
        Self {
            out,
            highlight: config.get_highlight_color(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn clamp_u16(n: i32) -> u16 {
    n.unsigned_abs().min(u16::MAX as u32) as u16
}

impl<W: Write> Terminal for CrosstermTerminal<W> {
    fn move_by(&mut self, dx: i32, dy: i32) -> io::Result<()> {
        // A zero count still moves one cell on most terminals
        if dx > 0 {
            queue!(self.out, MoveRight(clamp_u16(dx)))?;
        } else if dx < 0 {
            queue!(self.out, MoveLeft(clamp_u16(dx)))?;
        }
        if dy > 0 {
            queue!(self.out, MoveDown(clamp_u16(dy)))?;
        } else if dy < 0 {
            queue!(self.out, MoveUp(clamp_u16(dy)))?;
        }
        Ok(())
    }

    fn move_to_column(&mut self, column: usize) -> io::Result<()> {
        let column = column.min(u16::MAX as usize) as u16;
        queue!(self.out, MoveToColumn(column))
    }

    fn clear_line_right(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::UntilNewLine))
    }

    fn write(&mut self, text: &str, style: Style) -> io::Result<()> {
        match style {
            Style::Plain => queue!(self.out, Print(text)),
            Style::Dim => queue!(self.out, PrintStyledContent(text.dim())),
            Style::Highlight => queue!(self.out, PrintStyledContent(text.with(self.highlight))),
        }
    }

    fn new_line(&mut self) -> io::Result<()> {
        queue!(self.out, Print("\r\n"))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// In-memory screen applying the same primitives as a real terminal
///
/// The screen has no height limit: moving below the last line extends it.
#[derive(Debug, Clone)]
pub struct VirtualTerminal {
    lines: Vec<Vec<char>>,
    styles: Vec<Style>,
    row: usize,
    column: usize,
    flushes: usize,
}

impl VirtualTerminal {
    pub fn new() -> Self {
        Self {
            lines: vec![Vec::new()],
            styles: vec![Style::Plain],
            row: 0,
            column: 0,
            flushes: 0,
        }
    }

    fn ensure_row(&mut self, row: usize) {
        while self.lines.len() <= row {
            self.lines.push(Vec::new());
            self.styles.push(Style::Plain);
        }
    }

    /// Screen contents with trailing blanks trimmed from every line
    pub fn screen(&self) -> Vec<String> {
        let mut screen: Vec<String> = self
            .lines
            .iter()
            .map(|l| l.iter().collect::<String>().trim_end().to_string())
            .collect();
        while screen.last().is_some_and(|l| l.is_empty()) {
            screen.pop();
        }
        screen
    }

    /// Contents of one row, trailing blanks trimmed
    pub fn line(&self, row: usize) -> String {
        self.lines
            .get(row)
            .map(|l| l.iter().collect::<String>().trim_end().to_string())
            .unwrap_or_default()
    }

    /// Style of the last write on a row
    pub fn style_of(&self, row: usize) -> Style {
        self.styles.get(row).copied().unwrap_or_default()
    }

    /// Cursor as (column, row)
    pub fn cursor(&self) -> (usize, usize) {
        (self.column, self.row)
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl Default for VirtualTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for VirtualTerminal {
    fn move_by(&mut self, dx: i32, dy: i32) -> io::Result<()> {
        self.column = self.column.saturating_add_signed(dx as isize);
        self.row = self.row.saturating_add_signed(dy as isize);
        self.ensure_row(self.row);
        Ok(())
    }

    fn move_to_column(&mut self, column: usize) -> io::Result<()> {
        self.column = column;
        Ok(())
    }

    fn clear_line_right(&mut self) -> io::Result<()> {
        let line = &mut self.lines[self.row];
        line.truncate(self.column);
        Ok(())
    }

    fn write(&mut self, text: &str, style: Style) -> io::Result<()> {
        let line = &mut self.lines[self.row];
        for ch in text.chars() {
            if line.len() < self.column {
                line.resize(self.column, ' ');
            }
            if self.column < line.len() {
                line[self.column] = ch;
            } else {
                line.push(ch);
            }
            self.column += 1;
        }
        self.styles[self.row] = style;
        Ok(())
    }

    fn new_line(&mut self) -> io::Result<()> {
        self.row += 1;
        self.column = 0;
        self.ensure_row(self.row);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
