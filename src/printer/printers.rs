// src/printer/printers.rs

//! Specialized printer struct [`PrinterQuery`] and helper functions for
//! printing [`Query`s] as a human-readable report.
//!
//! A printed query looks like
//!
//! ```text
//! Started at 2024-01-02 03:04:05 for 1.500s by alice on h1 (Success). (Thread id: 7, query id: q1, txn id: t1):
//! SELECT 1
//!
//! ```
//!
//! A failed query has an additional `Error: …` line before the blank line.
//!
//! [`Query`s]: crate::data::query::Query

use std::io::{Result, Write};

#[doc(hidden)]
pub use ::termcolor::{Color, ColorChoice, ColorSpec, WriteColor};

use crate::data::datetime::FixedOffset;
use crate::data::query::{Query, QueryStatus};
use crate::debug::printers::de_err;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// globals and constants
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// strftime format of a query start
pub const DATETIME_FORMAT_START: &str = "%Y-%m-%d %H:%M:%S";

/// [`Color`] for printing some user-facing error messages.
///
/// [`Color`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.Color.html
pub const COLOR_ERROR: Color = Color::Red;

/// [`Color`] of a printed status, `None` is the terminal default.
///
/// [`Color`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.Color.html
pub const fn status_color(status: &QueryStatus) -> Option<Color> {
    match status {
        QueryStatus::Success => Some(Color::Green),
        QueryStatus::Failed => Some(COLOR_ERROR),
        QueryStatus::Running => Some(Color::Yellow),
        QueryStatus::Unknown => None,
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// formatting
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The report of `query` in three parts; the text before the status, the
/// status, and the text after the status.
///
/// The start is shown at `tz_offset`, the offset of the log timestamps.
pub fn format_query_parts(
    query: &Query,
    tz_offset: &FixedOffset,
) -> (String, String, String) {
    let before: String = format!(
        "Started at {} for {}s by {} on {} (",
        query.start.with_timezone(tz_offset).format(DATETIME_FORMAT_START),
        query.duration_seconds,
        query.user,
        query.host,
    );
    let status: String = query.status.to_string();
    let error: String = match query.error.as_ref() {
        Some(error) => format!("Error: {}\n", error),
        None => String::new(),
    };
    let after: String = format!(
        "). (Thread id: {}, query id: {}, txn id: {}):\n{}\n{}",
        query.worker_id,
        query.query_id,
        query.transaction_id,
        query.query_text.trim(),
        error,
    );

    (before, status, after)
}

/// The uncolored report of `query`, without the trailing blank line.
pub fn format_query(
    query: &Query,
    tz_offset: &FixedOffset,
) -> String {
    let (before, status, after) = format_query_parts(query, tz_offset);

    [before, status, after].concat()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PrinterQuery
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A printer of [`Query`]s to stdout, optionally with a colored status.
pub struct PrinterQuery {
    /// termcolor handle to stdout
    stdout_color: termcolor::StandardStream,
    /// offset to show query starts at
    tz_offset: FixedOffset,
}

impl PrinterQuery {
    pub fn new(
        color_choice: ColorChoice,
        tz_offset: FixedOffset,
    ) -> PrinterQuery {
        PrinterQuery {
            stdout_color: termcolor::StandardStream::stdout(color_choice),
            tz_offset,
        }
    }

    /// Print `query` followed by a blank line.
    pub fn print_query(
        &mut self,
        query: &Query,
    ) -> Result<()> {
        let (before, status, after) = format_query_parts(query, &self.tz_offset);
        let mut out = self.stdout_color.lock();
        out.write_all(before.as_bytes())?;
        match status_color(&query.status) {
            Some(color) => {
                if let Err(err) = out.set_color(ColorSpec::new().set_fg(Some(color))) {
                    de_err!("print_query: set_color({:?}) returned error {}", color, err);
                    return Err(err);
                }
                out.write_all(status.as_bytes())?;
                if let Err(err) = out.reset() {
                    de_err!("print_query: reset() returned error {}", err);
                    return Err(err);
                }
            }
            None => out.write_all(status.as_bytes())?,
        }
        out.write_all(after.as_bytes())?;
        out.write_all(b"\n")?;
        out.flush()?;

        Ok(())
    }
}
