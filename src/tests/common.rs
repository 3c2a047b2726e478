// src/tests/common.rs

//! Common data and helpers for tests.

#![allow(non_upper_case_globals)]

use ::chrono::{Duration, FixedOffset, TimeZone, Utc};
use ::lazy_static::lazy_static;

use crate::data::datetime::{DateTimeL, TimeWindow};

lazy_static! {
    pub static ref FO_0: FixedOffset = FixedOffset::east_opt(0).unwrap();
    pub static ref FO_P2: FixedOffset = FixedOffset::east_opt(2 * 3600).unwrap();
    pub static ref FO_M8: FixedOffset = FixedOffset::west_opt(8 * 3600).unwrap();
}

/// UTC instant from parts
pub fn ymdhms(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> DateTimeL {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec).unwrap()
}

/// UTC instant from parts, with milliseconds
pub fn ymdhmsm(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
    milli: i64,
) -> DateTimeL {
    ymdhms(year, month, day, hour, min, sec) + Duration::milliseconds(milli)
}

/// The whole day of 2024-01-02 UTC, both ends inclusive.
pub fn window_20240102() -> TimeWindow {
    TimeWindow::new(
        ymdhms(2024, 1, 2, 0, 0, 0),
        ymdhmsm(2024, 1, 2, 23, 59, 59, 999),
    )
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// HiveServer2 log lines
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A background-pool line of thread `tid` at `ts`, e.g.
/// `"2024-01-02 03:04:05,100"`.
pub fn bg_line(
    ts: &str,
    tid: u32,
    message: &str,
) -> String {
    format!(
        "{} INFO  [HiveServer2-Background-Pool: Thread-{}]: ql.Driver (Driver.java:execute(1500)) - {}",
        ts, tid, message
    )
}

/// Background-pool line that opens a thread's record.
pub fn bg_perflog_begin(
    ts: &str,
    tid: u32,
) -> String {
    bg_line(ts, tid, "<PERFLOG method=Driver.run from=org.apache.hadoop.hive.ql.Driver>")
}

pub fn bg_command_start(
    ts: &str,
    tid: u32,
    query_id: &str,
    command: &str,
) -> String {
    bg_line(ts, tid, format!("Starting command(queryId={}): {}", query_id, command).as_str())
}

pub fn bg_metadata(
    ts: &str,
    tid: u32,
    txnid: &str,
    user: &str,
    host: &str,
) -> String {
    bg_line(
        ts,
        tid,
        format!(
            "Setting lock request transaction to txnid:{}, user:{}, hostname:{}, operation:QUERY",
            txnid, user, host
        )
        .as_str(),
    )
}

pub fn bg_perflog_end(
    ts: &str,
    tid: u32,
    duration: &str,
) -> String {
    bg_line(
        ts,
        tid,
        format!(
            "</PERFLOG method=Driver.run start=1704164645123 end=1704164646623 duration={} from=org.apache.hadoop.hive.ql.Driver>",
            duration
        )
        .as_str(),
    )
}

/// A handler-pool line at `ts`.
pub fn handler_line(
    ts: &str,
    message: &str,
) -> String {
    format!(
        "{} ERROR [HiveServer2-Handler-Pool: Thread-45]: ql.Driver (SessionState.java:printError(1126)) - {}",
        ts, message
    )
}

pub fn handler_parsing(
    ts: &str,
    command: &str,
) -> String {
    handler_line(ts, format!("Parsing command: {}", command).as_str())
}

pub fn handler_failed(
    ts: &str,
    error: &str,
) -> String {
    handler_line(ts, format!("FAILED: {}", error).as_str())
}

/// A line of neither pool.
pub fn other_line(ts: &str) -> String {
    format!("{} INFO  [main]: server.HiveServer2 (HiveServer2.java:start(740)) - Started HiveServer2", ts)
}

/// The lines of one successful query of thread 7, `SELECT 1` by alice.
pub fn lines_select1_success() -> Vec<String> {
    vec![
        bg_perflog_begin("2024-01-02 03:04:05,100", 7),
        bg_command_start("2024-01-02 03:04:05,150", 7, "q1", "SELECT 1"),
        bg_metadata("2024-01-02 03:04:05,200", 7, "t1", "alice", "h1"),
        bg_perflog_end("2024-01-02 03:04:06,623", 7, "1500"),
    ]
}
