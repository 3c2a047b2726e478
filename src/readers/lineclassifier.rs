// src/readers/lineclassifier.rs

//! Stateless classification of HiveServer2 log lines.
//!
//! A line either starts with a `YYYY-MM-DD hh:mm:ss,mmm ` timestamp or it
//! does not. A timestamped line's body belongs to one of two families:
//!
//! * background pool, `[HiveServer2-Background-Pool: Thread-123]: …`,
//!   where queries run
//! * handler pool, `[HiveServer2-Handler-Pool: Thread-45]: …`, where parse
//!   and semantic failures are reported
//!
//! Whether an untimestamped line continues a multi-line command depends on
//! tracker state, so that decision is made by the [`ThreadTracker`].
//!
//! [`ThreadTracker`]: crate::readers::threadtracker::ThreadTracker

use ::const_format::concatcp;
use ::lazy_static::lazy_static;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

use crate::data::datetime::{
    naive_to_datetimel,
    DateTimeL,
    FixedOffset,
    NaiveDateTime,
};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// patterns
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const CGN_DT: &str = "dt";
const CGN_BODY: &str = "body";
const CGN_TID: &str = "tid";
const CGN_REST: &str = "rest";
const CGN_QID: &str = "qid";
const CGN_CMD: &str = "cmd";
const CGN_TXNID: &str = "txnid";
const CGN_USER: &str = "user";
const CGN_HOST: &str = "host";
const CGN_DURATION: &str = "duration";
const CGN_ERROR: &str = "error";

/// strftime pattern of the captured `CGN_DT`; milliseconds are dropped
pub const DTP_LOG_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// `2024-01-02 03:04:05,678 INFO  [main]: …`
pub const RP_LOG_TIMESTAMP: &str = concatcp!(
    r"^(?P<", CGN_DT, r">\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}),\d{3} (?P<", CGN_BODY, ">.*)$"
);

// background pool, happy flow

pub const RP_BACKGROUND_POOL: &str = concatcp!(
    r"HiveServer2-Background-Pool: Thread-(?P<", CGN_TID, r">\d+)\]: (?P<", CGN_REST, ">.*)$"
);
pub const RP_COMMAND_START: &str = concatcp!(
    r"Starting command\(queryId=(?P<", CGN_QID, r">\S*)\): (?P<", CGN_CMD, ">.*)$"
);
pub const RP_METADATA: &str = concatcp!(
    r"txnid:(?P<", CGN_TXNID, r">\S*), user:(?P<", CGN_USER, r">\S*), hostname:(?P<", CGN_HOST, r">\S*),"
);
pub const RP_END_OF_OPERATION: &str = concatcp!(
    r"</PERFLOG method=Driver\.run .* duration=(?P<", CGN_DURATION, r">\d+) from=org\.apache\.hadoop\.hive\.ql\.Driver>"
);

// handler pool, error flow

pub const RP_HANDLER_POOL: &str = concatcp!(r"\[HiveServer2-Handler-Pool.*?\]: (?P<", CGN_REST, ">.*)");
pub const RP_PARSING_COMMAND: &str = concatcp!(r"Parsing command: (?P<", CGN_CMD, ">.*)");
pub const RP_FAILED: &str = concatcp!(r"FAILED: (?P<", CGN_ERROR, ">.*)");

lazy_static! {
    static ref REGEX_LOG_TIMESTAMP: Regex = Regex::new(RP_LOG_TIMESTAMP).unwrap();
    static ref REGEX_BACKGROUND_POOL: Regex = Regex::new(RP_BACKGROUND_POOL).unwrap();
    static ref REGEX_COMMAND_START: Regex = Regex::new(RP_COMMAND_START).unwrap();
    static ref REGEX_METADATA: Regex = Regex::new(RP_METADATA).unwrap();
    static ref REGEX_END_OF_OPERATION: Regex = Regex::new(RP_END_OF_OPERATION).unwrap();
    static ref REGEX_HANDLER_POOL: Regex = Regex::new(RP_HANDLER_POOL).unwrap();
    static ref REGEX_PARSING_COMMAND: Regex = Regex::new(RP_PARSING_COMMAND).unwrap();
    static ref REGEX_FAILED: Regex = Regex::new(RP_FAILED).unwrap();
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// classifications
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// First split of a line.
#[derive(Debug, Eq, PartialEq)]
pub enum LineClass<'a> {
    /// No leading timestamp; maybe a command continuation, maybe a stack
    /// trace. The whole line.
    Untimestamped(&'a str),
    /// Leading timestamp and the remaining log body.
    Timestamped(DateTimeL, &'a str),
}

/// Remainder of a background-pool line. Patterns are tried in the
/// declared order; the first match wins.
#[derive(Debug, Eq, PartialEq)]
pub enum BackgroundMessage<'a> {
    /// `Starting command(queryId=…): <command>`
    CommandStart { query_id: &'a str, command: &'a str },
    /// `txnid:…, user:…, hostname:…,`
    Metadata { transaction_id: &'a str, user: &'a str, host: &'a str },
    /// `</PERFLOG method=Driver.run … duration=… from=org.apache.hadoop.hive.ql.Driver>`
    ///
    /// `duration_millis` is `None` if the digits overflow.
    EndOfOperation { duration_millis: Option<u64> },
    Unmatched,
}

/// Remainder of a handler-pool line.
#[derive(Debug, Eq, PartialEq)]
pub enum HandlerMessage<'a> {
    /// `Parsing command: <command>`
    ParsingCommand { command: &'a str },
    /// `FAILED: <error>`
    Failed { error: &'a str },
    Unmatched,
}

/// Family of a timestamped log body.
#[derive(Debug, Eq, PartialEq)]
pub enum LogBody<'a> {
    BackgroundPool { thread_id: &'a str, message: BackgroundMessage<'a> },
    HandlerPool(HandlerMessage<'a>),
    /// Neither family, e.g. unrelated server chatter.
    Unmatched,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// classifier functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Split a leading log timestamp from `line`. The timestamp is
/// interpreted at `tz_offset`.
///
/// A line that looks timestamped but holds an impossible datetime, e.g.
/// month `13`, is `Untimestamped`.
pub fn classify_line<'a>(
    line: &'a str,
    tz_offset: &FixedOffset,
) -> LineClass<'a> {
    let captures = match REGEX_LOG_TIMESTAMP.captures(line) {
        Some(captures) => captures,
        None => return LineClass::Untimestamped(line),
    };
    let (dt_s, body) = match (captures.name(CGN_DT), captures.name(CGN_BODY)) {
        (Some(dt_m), Some(body_m)) => (dt_m.as_str(), body_m.as_str()),
        _ => return LineClass::Untimestamped(line),
    };
    let dt: DateTimeL = match NaiveDateTime::parse_from_str(dt_s, DTP_LOG_TIMESTAMP) {
        Ok(ndt) => match naive_to_datetimel(&ndt, tz_offset) {
            Some(dt) => dt,
            None => return LineClass::Untimestamped(line),
        },
        Err(_err) => {
            defñ!("parse_from_str({:?}) error {}", dt_s, _err);
            return LineClass::Untimestamped(line);
        }
    };

    LineClass::Timestamped(dt, body)
}

/// Classify a timestamped log body into its family and message.
pub fn classify_body(body: &str) -> LogBody<'_> {
    if let Some(captures) = REGEX_BACKGROUND_POOL.captures(body) {
        let thread_id: &str = captures.name(CGN_TID).map_or("", |m| m.as_str());
        let rest: &str = captures.name(CGN_REST).map_or("", |m| m.as_str());
        return LogBody::BackgroundPool {
            thread_id,
            message: classify_background_rest(rest),
        };
    }
    if let Some(captures) = REGEX_HANDLER_POOL.captures(body) {
        let rest: &str = captures.name(CGN_REST).map_or("", |m| m.as_str());
        return LogBody::HandlerPool(classify_handler_rest(rest));
    }

    LogBody::Unmatched
}

/// Classify the remainder of a background-pool line.
pub fn classify_background_rest(rest: &str) -> BackgroundMessage<'_> {
    if let Some(captures) = REGEX_COMMAND_START.captures(rest) {
        return BackgroundMessage::CommandStart {
            query_id: captures.name(CGN_QID).map_or("", |m| m.as_str()),
            command: captures.name(CGN_CMD).map_or("", |m| m.as_str()),
        };
    }
    if let Some(captures) = REGEX_METADATA.captures(rest) {
        return BackgroundMessage::Metadata {
            transaction_id: captures.name(CGN_TXNID).map_or("", |m| m.as_str()),
            user: captures.name(CGN_USER).map_or("", |m| m.as_str()),
            host: captures.name(CGN_HOST).map_or("", |m| m.as_str()),
        };
    }
    if let Some(captures) = REGEX_END_OF_OPERATION.captures(rest) {
        let duration_millis: Option<u64> = captures
            .name(CGN_DURATION)
            .and_then(|m| m.as_str().parse::<u64>().ok());
        return BackgroundMessage::EndOfOperation { duration_millis };
    }

    BackgroundMessage::Unmatched
}

/// Classify the remainder of a handler-pool line.
pub fn classify_handler_rest(rest: &str) -> HandlerMessage<'_> {
    if let Some(captures) = REGEX_PARSING_COMMAND.captures(rest) {
        return HandlerMessage::ParsingCommand {
            command: captures.name(CGN_CMD).map_or("", |m| m.as_str()),
        };
    }
    if let Some(captures) = REGEX_FAILED.captures(rest) {
        return HandlerMessage::Failed {
            error: captures.name(CGN_ERROR).map_or("", |m| m.as_str()),
        };
    }

    HandlerMessage::Unmatched
}
