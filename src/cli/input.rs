//! Input Event Sources
//!
//! A session listens to exactly two kinds of events: completed input lines
//! and an interrupt. Sources are subscribed for the lifetime of one session
//! through a [`Subscription`] guard, which releases them on every exit path.

use std::collections::VecDeque;
use std::io::{self, Write};

use crossterm::{
    cursor::MoveLeft,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use tracing::debug;

/// An event delivered to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A full line of input, without its terminator
    Line(String),
    Interrupt,
    /// The source has no more events
    Closed,
}

/// A source of session events
pub trait EventSource {
    /// Start delivering events
    fn subscribe(&mut self) -> io::Result<()>;

    /// Stop delivering events and release whatever `subscribe` acquired
    fn unsubscribe(&mut self);

    /// Block until the next event
    fn next_event(&mut self) -> io::Result<SessionEvent>;
}

/// Keeps a source subscribed while alive
pub struct Subscription<'a, S: EventSource + ?Sized> {
    source: &'a mut S,
}

impl<'a, S: EventSource + ?Sized> Subscription<'a, S> {
    pub fn open(source: &'a mut S) -> io::Result<Self> {
        source.subscribe()?;
        Ok(Self { source })
    }

    pub fn next_event(&mut self) -> io::Result<SessionEvent> {
        self.source.next_event()
    }
}

impl<S: EventSource + ?Sized> Drop for Subscription<'_, S> {
    fn drop(&mut self) {
        self.source.unsubscribe();
    }
}

/// Line reader over the real terminal in raw mode
///
/// Printable keys are echoed at the cursor, Backspace erases the last
/// character, Enter completes the line and Ctrl+C interrupts.
pub struct TerminalEvents {
    buffer: String,
    subscribed: bool,
}

impl TerminalEvents {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            subscribed: false,
        }
    }

    /// Handle one key event, returning a session event once one is complete
    fn handle_key_event(&mut self, key_event: KeyEvent) -> io::Result<Option<SessionEvent>> {
        let mut stdout = io::stdout();

        match key_event {
            KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => {
                self.buffer.clear();
                return Ok(Some(SessionEvent::Interrupt));
            }

            KeyEvent {
                code: KeyCode::Enter,
                ..
            } => {
                let line = std::mem::take(&mut self.buffer);
                debug!(line = %line, "input line completed");
                return Ok(Some(SessionEvent::Line(line)));
            }

            KeyEvent {
                code: KeyCode::Backspace,
                ..
            } => {
                if self.buffer.pop().is_some() {
                    execute!(stdout, MoveLeft(1), Print(' '), MoveLeft(1))?;
                }
            }

            KeyEvent {
                code: KeyCode::Char(c),
                modifiers: KeyModifiers::NONE,
                ..
            }
            | KeyEvent {
                code: KeyCode::Char(c),
                modifiers: KeyModifiers::SHIFT,
                ..
            } => {
                self.buffer.push(c);
                execute!(stdout, Print(c))?;
            }

            _ => {}
        }

        stdout.flush()?;
        Ok(None)
    }
}

impl Default for TerminalEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for TerminalEvents {
    fn subscribe(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        self.subscribed = true;
        self.buffer.clear();
        Ok(())
    }

    fn unsubscribe(&mut self) {
        if self.subscribed {
            let _ = disable_raw_mode();
            self.subscribed = false;
        }
    }

    fn next_event(&mut self) -> io::Result<SessionEvent> {
        loop {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(session_event) = self.handle_key_event(key_event)? {
                    return Ok(session_event);
                }
            }
        }
    }
}

impl Drop for TerminalEvents {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Pre-recorded events, for tests and non-interactive embedding
#[derive(Debug, Clone, Default)]
pub struct ScriptedEvents {
    events: VecDeque<SessionEvent>,
    subscribed: bool,
    subscribe_count: usize,
    unsubscribe_count: usize,
}

impl ScriptedEvents {
    pub fn new(events: impl IntoIterator<Item = SessionEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Script made only of input lines
    pub fn lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self::new(lines.into_iter().map(|l| SessionEvent::Line(l.into())))
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    pub fn subscribe_count(&self) -> usize {
        self.subscribe_count
    }

    pub fn unsubscribe_count(&self) -> usize {
        self.unsubscribe_count
    }

    /// Events not yet delivered
    pub fn pending(&self) -> usize {
        self.events.len()
    }
}

impl EventSource for ScriptedEvents {
    fn subscribe(&mut self) -> io::Result<()> {
        self.subscribed = true;
        self.subscribe_count += 1;
        Ok(())
    }

    fn unsubscribe(&mut self) {
        self.subscribed = false;
        self.unsubscribe_count += 1;
    }

    fn next_event(&mut self) -> io::Result<SessionEvent> {
        if !self.subscribed {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "event source is not subscribed",
            ));
        }
        Ok(self.events.pop_front().unwrap_or(SessionEvent::Closed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_guard_releases_source() {
        let mut source = ScriptedEvents::lines(["y"]);
        {
            let mut subscription = Subscription::open(&mut source).unwrap();
            assert_eq!(
                subscription.next_event().unwrap(),
                SessionEvent::Line("y".to_string())
            );
        }
        assert!(!source.is_subscribed());
        assert_eq!(source.subscribe_count(), 1);
        assert_eq!(source.unsubscribe_count(), 1);
    }

    #[test]
    fn test_scripted_source_closes_when_drained() {
        let mut source = ScriptedEvents::new([SessionEvent::Interrupt]);
        let mut subscription = Subscription::open(&mut source).unwrap();
        assert_eq!(subscription.next_event().unwrap(), SessionEvent::Interrupt);
        assert_eq!(subscription.next_event().unwrap(), SessionEvent::Closed);
    }

    #[test]
    fn test_unsubscribed_source_refuses_events() {
        let mut source = ScriptedEvents::lines(["n"]);
        let err = source.next_event().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
        assert_eq!(source.pending(), 1);
    }

    #[test]
    fn test_ctrl_c_interrupts() {
        let mut events = TerminalEvents::new();
        events.buffer.push_str("partial");
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(
            events.handle_key_event(key).unwrap(),
            Some(SessionEvent::Interrupt)
        );
        assert!(events.buffer.is_empty());
    }

    #[test]
    fn test_enter_completes_buffered_line() {
        let mut events = TerminalEvents::new();
        events.buffer.push_str("n2");
        let key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(
            events.handle_key_event(key).unwrap(),
            Some(SessionEvent::Line("n2".to_string()))
        );
    }
}
