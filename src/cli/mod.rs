//! Interactive Table Review Module
//!
//! This module provides the terminal-based review of an ordered table of
//! proposed changes: each row is kept, kept with a new value, or removed,
//! with shortcuts to apply one decision to a run of rows.
//!
//! ## Module Structure
//!
//! - `config` - Layout strings, messages and colour theme
//! - `table` - Table input, row model, column widths and the result mapping
//! - `decoder` - Decoding of typed lines into decisions
//! - `validator` - Pluggable validation of replacement values
//! - `terminal` - Terminal primitives, real and in-memory
//! - `input` - Line and interrupt event sources
//! - `session` - The edit session state machine
//! - `utils` - Common text helpers

pub mod config;
pub mod decoder;
pub mod input;
pub mod session;
pub mod table;
pub mod terminal;
pub mod utils;
pub mod validator;

// Re-export main types for convenience
pub use config::EditorConfig;
pub use decoder::{decode, Action, Decision, Decoded, Repeat};
pub use input::{EventSource, ScriptedEvents, SessionEvent, Subscription, TerminalEvents};
pub use session::{EditSession, SessionOutcome, SessionState};
pub use table::{Change, EditResult, Line, Table, TableError, TableModel};
pub use terminal::{CrosstermTerminal, Style, Terminal, VirtualTerminal};
pub use validator::{SemverValidator, ValueValidator};
