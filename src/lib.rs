//! table-review - interactive row-by-row review of proposed changes
//!
//! Prints an ordered table of `(identifier, original value, proposed value)`
//! rows and lets the user decide, row by row, to keep, override or discard
//! each proposal, redrawing rows in place as decisions are made.
//!
//! # Input grammar
//!
//! - *empty line* - keep the proposed value
//! - `y`, `y3`, `ya` - keep one, three, or all remaining rows
//! - `n`, `n3`, `na` - remove one, three, or all remaining rows
//! - anything else - replace the proposed value (validated when a validator is set)
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use table_review::{edit_table, EditorConfig, SemverValidator, SessionOutcome, Table};
//!
//! # async fn demo() -> std::io::Result<()> {
//! let table = Table::from_json(r#"[["pkg","from","to"],["lodash","4.0.0","4.1.0"]]"#)
//!     .expect("valid table");
//! let validator = SemverValidator::new().expect("valid pattern");
//!
//! match edit_table(table, EditorConfig::default(), Some(Box::new(validator))).await? {
//!     SessionOutcome::Completed(result) => println!("{} rows kept", result.len()),
//!     SessionOutcome::Aborted => println!("aborted"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod logging;

use std::io;

pub use cli::{
    EditResult, EditSession, EditorConfig, SemverValidator, SessionOutcome, Table, ValueValidator,
};

use cli::{CrosstermTerminal, TerminalEvents};

/// Review `table` interactively on stdout
///
/// The session runs on the blocking pool; the returned future resolves once
/// every row is decided or the user interrupts.
pub async fn edit_table(
    table: Table,
    config: EditorConfig,
    validator: Option<Box<dyn ValueValidator + Send>>,
) -> io::Result<SessionOutcome> {
    tokio::task::spawn_blocking(move || {
        let terminal = CrosstermTerminal::stdout(&config);
        let mut session = EditSession::new(table, terminal, config);
        if let Some(validator) = validator {
            session = session.with_validator(validator);
        }
        session.run(&mut TerminalEvents::new())
    })
    .await
    .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
}
