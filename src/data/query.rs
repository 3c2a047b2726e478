// src/data/query.rs

//! The per-identifier [`ParseRecord`] accumulated while reading log lines,
//! and the immutable [`Query`] emitted from it.

use std::fmt;

use crate::common::Count;
use crate::data::datetime::DateTimeL;

/// Rendered in place of any value the logs never revealed.
pub const UNKNOWN: &str = "Unknown";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// WorkerId
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Synthetic sequence number of a handler-pool parse announcement.
pub type HandlerSeq = u64;

/// Key of a [`ParseRecord`] in a [`ThreadTracker`].
///
/// [`ThreadTracker`]: crate::readers::threadtracker::ThreadTracker
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum WorkerId {
    /// Background-pool thread id, e.g. `"123"` from
    /// `HiveServer2-Background-Pool: Thread-123`.
    Thread(String),
    /// Synthetic id allocated to a handler-pool `Parsing command:` line.
    /// These lines carry no usable thread id. Starts at `1`.
    Handler(HandlerSeq),
}

impl WorkerId {
    pub const fn is_handler(&self) -> bool {
        matches!(*self, WorkerId::Handler(_))
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WorkerId::Thread(tid) => write!(f, "{}", tid),
            WorkerId::Handler(seq) => write!(f, "handler-{}", seq),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// QueryStatus, RecordState
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Outcome of a query as far as the logs tell.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum QueryStatus {
    #[default]
    Unknown,
    /// Still open when the logs ran out.
    Running,
    /// Ended with a `Driver.run` duration.
    Success,
    /// Handler pool reported `FAILED: …`.
    Failed,
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QueryStatus::Unknown => write!(f, "{}", UNKNOWN),
            QueryStatus::Running => write!(f, "Running"),
            QueryStatus::Success => write!(f, "Success"),
            QueryStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// Where a live [`ParseRecord`] is in its lifecycle.
///
/// Terminal transitions remove the record, so there are no terminal states
/// here. See [`ThreadTracker`] for the transition table.
///
/// [`ThreadTracker`]: crate::readers::threadtracker::ThreadTracker
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RecordState {
    /// Background-pool thread seen, no command captured yet.
    Opened,
    /// Background-pool thread with a captured command.
    Command,
    /// Handler-pool parse announced, waiting for a `FAILED` line.
    HandlerParsing,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ParseRecord
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Mutable accumulation of one operation, owned by a `ThreadTracker`
/// while the operation is open.
#[derive(Clone, Debug)]
pub struct ParseRecord {
    /// timestamp of the line that opened this record
    pub start: DateTimeL,
    /// command text lines; first from the command-start line, then any
    /// untimestamped continuation lines
    pub query_lines: Vec<String>,
    /// the opening line and continuation lines, background-pool records only
    pub raw_lines: Option<Vec<String>>,
    pub query_id: Option<String>,
    pub transaction_id: Option<String>,
    pub user: Option<String>,
    pub host: Option<String>,
    pub duration_millis: Option<u64>,
    pub status: QueryStatus,
    pub error: Option<String>,
    pub is_error_handler_record: bool,
    pub state: RecordState,
    /// order in which records were opened, for a stable end-of-stream flush
    pub opened: Count,
}

impl ParseRecord {
    /// New record for the first sighting of a background-pool thread.
    pub fn new_thread(
        start: DateTimeL,
        line: &str,
        opened: Count,
    ) -> ParseRecord {
        ParseRecord {
            start,
            query_lines: Vec::new(),
            raw_lines: Some(vec![String::from(line)]),
            query_id: None,
            transaction_id: None,
            user: None,
            host: None,
            duration_millis: None,
            status: QueryStatus::Unknown,
            error: None,
            is_error_handler_record: false,
            state: RecordState::Opened,
            opened,
        }
    }

    /// New record for a handler-pool `Parsing command:` line.
    pub fn new_handler(
        start: DateTimeL,
        command: &str,
        opened: Count,
    ) -> ParseRecord {
        ParseRecord {
            start,
            query_lines: vec![String::from(command)],
            raw_lines: None,
            query_id: None,
            transaction_id: None,
            user: None,
            host: None,
            duration_millis: None,
            status: QueryStatus::Unknown,
            error: None,
            is_error_handler_record: true,
            state: RecordState::HandlerParsing,
            opened,
        }
    }

    /// Has any command text been captured?
    pub fn has_query(&self) -> bool {
        !self.query_lines.is_empty()
    }

    /// Append an untimestamped continuation line.
    pub fn append_continuation(
        &mut self,
        line: &str,
    ) {
        if let Some(raw_lines) = self.raw_lines.as_mut() {
            raw_lines.push(String::from(line));
        }
        self.query_lines.push(String::from(line));
    }

    /// The command text, lines joined by `'\n'`.
    pub fn query_text(&self) -> String {
        self.query_lines.join("\n")
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Query
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A reconstructed query.
///
/// Every `String` field holds a real value or [`UNKNOWN`]; `error` is
/// `None` unless the query failed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Query {
    pub start: DateTimeL,
    pub user: String,
    pub host: String,
    /// seconds with three decimals, e.g. `"1.500"`, or [`UNKNOWN`]
    pub duration_seconds: String,
    /// first word of `query_text`, e.g. `"SELECT"`
    pub query_type: String,
    pub query_text: String,
    pub worker_id: String,
    pub query_id: String,
    pub transaction_id: String,
    pub status: QueryStatus,
    pub error: Option<String>,
}

/// `Some` value or [`UNKNOWN`].
fn or_unknown(value: &Option<String>) -> String {
    match value {
        Some(val) => val.clone(),
        None => String::from(UNKNOWN),
    }
}

/// Milliseconds to seconds with three decimals.
pub fn millis_to_seconds_string(millis: u64) -> String {
    format!("{}.{:03}", millis / 1000, millis % 1000)
}

impl Query {
    /// Render a completed `record` keyed by `worker_id`.
    pub fn from_record(
        record: &ParseRecord,
        worker_id: &WorkerId,
    ) -> Query {
        let query_text: String = record.query_text();
        let query_type: String = match query_text.split_whitespace().next() {
            Some(word) => String::from(word),
            None => String::from(UNKNOWN),
        };
        let duration_seconds: String = match record.duration_millis {
            Some(millis) => millis_to_seconds_string(millis),
            None => String::from(UNKNOWN),
        };

        Query {
            start: record.start,
            user: or_unknown(&record.user),
            host: or_unknown(&record.host),
            duration_seconds,
            query_type,
            query_text,
            worker_id: worker_id.to_string(),
            query_id: or_unknown(&record.query_id),
            transaction_id: or_unknown(&record.transaction_id),
            status: record.status,
            error: record.error.clone(),
        }
    }
}
