// src/tests/threadtracker_tests.rs

//! tests for `threadtracker.rs`

use ::test_case::test_case;

use crate::data::datetime::TimeWindow;
use crate::data::query::{Query, QueryStatus, RecordState, WorkerId, UNKNOWN};
use crate::readers::threadtracker::ThreadTracker;
use crate::tests::common::{
    bg_command_start,
    bg_metadata,
    bg_perflog_begin,
    bg_perflog_end,
    handler_failed,
    handler_parsing,
    lines_select1_success,
    other_line,
    window_20240102,
    ymdhms,
    FO_0,
    FO_P2,
};

fn new_tracker() -> ThreadTracker {
    ThreadTracker::new(window_20240102(), *FO_0)
}

/// Pass every line to `tracker`, return the queries completed along the way.
fn process_lines(
    tracker: &mut ThreadTracker,
    lines: &[String],
) -> Vec<Query> {
    let mut queries: Vec<Query> = Vec::new();
    for line in lines.iter() {
        if let Some(query) = tracker.process_line(line.as_str()) {
            queries.push(query);
        }
    }

    queries
}

#[test]
fn test_success() {
    let mut tracker = new_tracker();
    let queries = process_lines(&mut tracker, &lines_select1_success());
    assert_eq!(queries.len(), 1);
    let query = &queries[0];
    assert_eq!(query.start, ymdhms(2024, 1, 2, 3, 4, 5));
    assert_eq!(query.user, "alice");
    assert_eq!(query.host, "h1");
    assert_eq!(query.duration_seconds, "1.500");
    assert_eq!(query.query_type, "SELECT");
    assert_eq!(query.query_text, "SELECT 1");
    assert_eq!(query.worker_id, "7");
    assert_eq!(query.query_id, "q1");
    assert_eq!(query.transaction_id, "t1");
    assert_eq!(query.status, QueryStatus::Success);
    assert_eq!(query.error, None);
    assert!(tracker.is_empty());
    assert!(tracker.finish().is_empty());
    assert_eq!(tracker.summary().QueryExtractor_queries_success, 1);
}

#[test]
fn test_success_tz_offset() {
    let mut tracker = ThreadTracker::new(window_20240102(), *FO_P2);
    let queries = process_lines(&mut tracker, &lines_select1_success());
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].start, ymdhms(2024, 1, 2, 1, 4, 5));
}

#[test]
fn test_running_at_end_of_stream() {
    let mut tracker = new_tracker();
    let lines = lines_select1_success();
    let queries = process_lines(&mut tracker, &lines[..3]);
    assert!(queries.is_empty());
    assert_eq!(tracker.len(), 1);
    assert_eq!(
        tracker.record(&WorkerId::Thread(String::from("7"))).map(|r| r.state),
        Some(RecordState::Command)
    );

    let queries = tracker.finish();
    assert_eq!(queries.len(), 1);
    let query = &queries[0];
    assert_eq!(query.status, QueryStatus::Running);
    assert_eq!(query.duration_seconds, UNKNOWN);
    assert_eq!(query.user, "alice");
    assert_eq!(query.query_text, "SELECT 1");
    assert!(tracker.is_empty());
    assert_eq!(tracker.summary().QueryExtractor_queries_running, 1);
}

#[test]
fn test_handler_parse_dropped_at_end_of_stream() {
    let mut tracker = new_tracker();
    let lines = vec![handler_parsing("2024-01-02 03:04:05,000", "SELECT 1")];
    assert!(process_lines(&mut tracker, &lines).is_empty());
    assert_eq!(tracker.len(), 1);
    assert!(tracker.finish().is_empty());
    assert!(tracker.is_empty());
    assert_eq!(tracker.summary().QueryExtractor_flush_handler_dropped, 1);
}

#[test]
fn test_failed() {
    let mut tracker = new_tracker();
    let lines = vec![
        handler_parsing("2024-01-02 03:04:05,000", "SELEC 1"),
        handler_failed("2024-01-02 03:04:05,010", "syntax error"),
    ];
    let queries = process_lines(&mut tracker, &lines);
    assert_eq!(queries.len(), 1);
    let query = &queries[0];
    assert_eq!(query.status, QueryStatus::Failed);
    assert_eq!(query.worker_id, "handler-1");
    assert_eq!(query.error, Some(String::from("syntax error")));
    assert_eq!(query.query_type, "SELEC");
    assert_eq!(query.query_text, "SELEC 1");
    assert_eq!(query.start, ymdhms(2024, 1, 2, 3, 4, 5));
    assert_eq!(query.user, UNKNOWN);
    assert_eq!(query.host, UNKNOWN);
    assert_eq!(query.duration_seconds, UNKNOWN);
    assert_eq!(query.query_id, UNKNOWN);
    assert_eq!(query.transaction_id, UNKNOWN);
    assert!(tracker.is_empty());
}

#[test]
fn test_failed_resolves_latest_parse() {
    let mut tracker = new_tracker();
    let lines = vec![
        handler_parsing("2024-01-02 03:04:05,000", "SELEC 1"),
        handler_parsing("2024-01-02 03:04:05,001", "SELEC 2"),
        handler_failed("2024-01-02 03:04:05,002", "syntax error"),
        // no live parse left to resolve
        handler_failed("2024-01-02 03:04:05,003", "syntax error"),
    ];
    let queries = process_lines(&mut tracker, &lines);
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].worker_id, "handler-2");
    assert_eq!(queries[0].query_text, "SELEC 2");
    // the first parse is never resolved
    assert_eq!(tracker.len(), 1);
    assert!(tracker.record(&WorkerId::Handler(1)).is_some());
    assert!(tracker.finish().is_empty());
    assert_eq!(tracker.summary().QueryExtractor_flush_handler_dropped, 1);
    assert_eq!(tracker.summary().QueryExtractor_lines_failed_orphan, 1);
}

#[test]
fn test_failed_without_parse() {
    let mut tracker = new_tracker();
    let lines = vec![handler_failed("2024-01-02 03:04:05,000", "oops")];
    assert!(process_lines(&mut tracker, &lines).is_empty());
    assert!(tracker.is_empty());
    assert_eq!(tracker.summary().QueryExtractor_lines_failed_orphan, 1);
    assert_eq!(tracker.summary().QueryExtractor_lines_handler, 1);
}

#[test]
fn test_records_return_to_empty() {
    let mut tracker = new_tracker();
    let mut lines = lines_select1_success();
    lines.push(handler_parsing("2024-01-02 03:05:00,000", "SELEC 1"));
    lines.push(handler_failed("2024-01-02 03:05:00,001", "syntax error"));
    lines.extend(lines_select1_success());
    let queries = process_lines(&mut tracker, &lines);
    assert_eq!(queries.len(), 3);
    assert!(tracker.is_empty());
    assert_eq!(tracker.summary().QueryExtractor_records_highest, 1);
    assert_eq!(tracker.summary().QueryExtractor_records_opened, 3);
}

#[test]
fn test_continuation_and_orphan() {
    let mut tracker = new_tracker();
    let lines = vec![
        String::from("orphan before anything"),
        bg_perflog_begin("2024-01-02 03:04:05,000", 7),
        bg_command_start("2024-01-02 03:04:05,001", 7, "q1", "SELECT a"),
        String::from("FROM t"),
        String::from("WHERE x = 1"),
        bg_metadata("2024-01-02 03:04:05,002", 7, "t1", "alice", "h1"),
        // metadata ended the multi-line command
        String::from("orphan after metadata"),
        bg_perflog_end("2024-01-02 03:04:05,003", 7, "3"),
    ];
    let queries = process_lines(&mut tracker, &lines);
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].query_text, "SELECT a\nFROM t\nWHERE x = 1");
    assert_eq!(queries[0].query_type, "SELECT");
    assert_eq!(queries[0].duration_seconds, "0.003");
    let summary = tracker.summary();
    assert_eq!(summary.QueryExtractor_lines_orphan, 2);
    assert_eq!(summary.QueryExtractor_lines_continuation, 2);
}

#[test]
fn test_continuation_of_handler_parse() {
    let mut tracker = new_tracker();
    let lines = vec![
        handler_parsing("2024-01-02 03:04:05,000", "SELEC *"),
        String::from("FROM t"),
        handler_failed("2024-01-02 03:04:05,001", "syntax error"),
    ];
    let queries = process_lines(&mut tracker, &lines);
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].query_text, "SELEC *\nFROM t");
}

#[test]
fn test_continuation_ended_by_unmatched_line() {
    let mut tracker = new_tracker();
    let lines = vec![
        bg_perflog_begin("2024-01-02 03:04:05,000", 7),
        bg_command_start("2024-01-02 03:04:05,001", 7, "q1", "SELECT a"),
        other_line("2024-01-02 03:04:05,002"),
        String::from("FROM t"),
    ];
    process_lines(&mut tracker, &lines);
    assert_eq!(tracker.continuation(), None);
    let queries = tracker.finish();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].query_text, "SELECT a");
    assert_eq!(tracker.summary().QueryExtractor_lines_orphan, 1);
}

#[test]
fn test_window_boundaries() {
    let window = TimeWindow::new(ymdhms(2024, 1, 2, 3, 4, 5), ymdhms(2024, 1, 2, 3, 4, 6));
    let mut tracker = ThreadTracker::new(window, *FO_0);
    let lines = vec![
        bg_perflog_begin("2024-01-02 03:04:05,100", 7),
        bg_command_start("2024-01-02 03:04:05,150", 7, "q1", "SELECT 1"),
        bg_metadata("2024-01-02 03:04:04,999", 7, "t0", "mallory", "h0"),
        bg_metadata("2024-01-02 03:04:07,000", 7, "t9", "eve", "h9"),
        bg_metadata("2024-01-02 03:04:06,000", 7, "t1", "alice", "h1"),
        bg_perflog_end("2024-01-02 03:04:06,999", 7, "1500"),
    ];
    let queries = process_lines(&mut tracker, &lines);
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].user, "alice");
    assert_eq!(queries[0].transaction_id, "t1");
    assert_eq!(tracker.summary().QueryExtractor_lines_out_of_window, 2);
}

#[test]
fn test_out_of_window_lines_ignored() {
    let mut tracker = new_tracker();
    let lines = vec![
        bg_perflog_begin("2024-01-01 23:59:59,999", 7),
        bg_command_start("2024-01-01 23:59:59,999", 7, "q0", "SELECT 0"),
        handler_parsing("2024-01-03 00:00:00,000", "SELEC 1"),
    ];
    assert!(process_lines(&mut tracker, &lines).is_empty());
    assert!(tracker.is_empty());
    assert!(tracker.finish().is_empty());
    assert_eq!(tracker.summary().QueryExtractor_lines_out_of_window, 3);
}

#[test]
fn test_end_without_command() {
    let mut tracker = new_tracker();
    let lines = vec![
        bg_perflog_begin("2024-01-02 03:04:05,000", 7),
        bg_metadata("2024-01-02 03:04:05,001", 7, "t1", "alice", "h1"),
        bg_perflog_end("2024-01-02 03:04:05,002", 7, "2"),
    ];
    assert!(process_lines(&mut tracker, &lines).is_empty());
    assert!(tracker.is_empty());
    assert_eq!(tracker.summary().QueryExtractor_records_closed_without_query, 1);
}

#[test]
fn test_first_line_only_opens() {
    let mut tracker = new_tracker();
    let lines = vec![
        bg_command_start("2024-01-02 03:04:05,000", 7, "q1", "SELECT 1"),
        bg_perflog_end("2024-01-02 03:04:05,001", 7, "1"),
    ];
    assert!(process_lines(&mut tracker, &lines).is_empty());
    assert_eq!(tracker.summary().QueryExtractor_records_closed_without_query, 1);
}

#[test]
fn test_opened_without_command_dropped_at_end_of_stream() {
    let mut tracker = new_tracker();
    let lines = vec![bg_perflog_begin("2024-01-02 03:04:05,000", 7)];
    process_lines(&mut tracker, &lines);
    assert_eq!(
        tracker.record(&WorkerId::Thread(String::from("7"))).map(|r| r.state),
        Some(RecordState::Opened)
    );
    assert!(tracker.finish().is_empty());
    assert_eq!(tracker.summary().QueryExtractor_flush_opened_dropped, 1);
}

#[test]
fn test_command_restart() {
    let mut tracker = new_tracker();
    let lines = vec![
        bg_perflog_begin("2024-01-02 03:04:05,000", 7),
        bg_command_start("2024-01-02 03:04:05,001", 7, "q1", "SELECT 1"),
        String::from("FROM dual"),
        bg_command_start("2024-01-02 03:04:05,002", 7, "q2", "INSERT INTO t VALUES (2)"),
        bg_perflog_end("2024-01-02 03:04:05,003", 7, "250"),
    ];
    let queries = process_lines(&mut tracker, &lines);
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].query_id, "q2");
    assert_eq!(queries[0].query_text, "INSERT INTO t VALUES (2)");
    assert_eq!(queries[0].query_type, "INSERT");
    assert_eq!(queries[0].duration_seconds, "0.250");
}

#[test]
fn test_interleaved_threads() {
    let mut tracker = new_tracker();
    let lines = vec![
        bg_perflog_begin("2024-01-02 03:04:05,000", 1),
        bg_perflog_begin("2024-01-02 03:04:06,000", 2),
        bg_command_start("2024-01-02 03:04:06,001", 2, "q2", "SELECT 2"),
        bg_command_start("2024-01-02 03:04:06,002", 1, "q1", "SELECT 1"),
        bg_metadata("2024-01-02 03:04:06,003", 2, "t2", "bob", "h2"),
        bg_metadata("2024-01-02 03:04:06,004", 1, "t1", "alice", "h1"),
        bg_perflog_end("2024-01-02 03:04:07,000", 2, "1000"),
        bg_perflog_end("2024-01-02 03:04:08,000", 1, "3000"),
    ];
    let queries = process_lines(&mut tracker, &lines);
    assert_eq!(queries.len(), 2);
    assert_eq!(
        (queries[0].worker_id.as_str(), queries[0].user.as_str(), queries[0].query_text.as_str()),
        ("2", "bob", "SELECT 2")
    );
    assert_eq!(queries[0].start, ymdhms(2024, 1, 2, 3, 4, 6));
    assert_eq!(
        (queries[1].worker_id.as_str(), queries[1].user.as_str(), queries[1].query_text.as_str()),
        ("1", "alice", "SELECT 1")
    );
    assert_eq!(queries[1].start, ymdhms(2024, 1, 2, 3, 4, 5));
    assert_eq!(queries[1].duration_seconds, "3.000");
}

#[test]
fn test_flush_in_opened_order() {
    let mut tracker = new_tracker();
    let mut lines: Vec<String> = Vec::new();
    for (i, tid) in [3, 1, 2].iter().enumerate() {
        let ts = format!("2024-01-02 03:04:0{},000", i);
        lines.push(bg_perflog_begin(ts.as_str(), *tid));
        lines.push(handler_parsing(ts.as_str(), "SELEC"));
    }
    for tid in [2, 3, 1].iter() {
        lines.push(bg_command_start(
            "2024-01-02 03:04:09,000",
            *tid,
            format!("q{}", tid).as_str(),
            "SELECT 1",
        ));
    }
    assert!(process_lines(&mut tracker, &lines).is_empty());
    let queries = tracker.finish();
    let worker_ids: Vec<&str> = queries
        .iter()
        .map(|q| q.worker_id.as_str())
        .collect();
    assert_eq!(worker_ids, vec!["3", "1", "2"]);
    assert!(queries.iter().all(|q| q.status == QueryStatus::Running));
    assert_eq!(tracker.summary().QueryExtractor_flush_handler_dropped, 3);
}

#[test_case("99999999999999999999999", UNKNOWN; "overflow")]
#[test_case("0", "0.000"; "zero")]
#[test_case("61001", "61.001"; "over a minute")]
fn test_duration(
    duration: &str,
    expect: &str,
) {
    let mut tracker = new_tracker();
    let mut lines = lines_select1_success();
    lines[3] = bg_perflog_end("2024-01-02 03:04:06,623", 7, duration);
    let queries = process_lines(&mut tracker, &lines);
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].status, QueryStatus::Success);
    assert_eq!(queries[0].duration_seconds, expect);
}

#[test]
fn test_every_line_accounted() {
    let mut tracker = new_tracker();
    let mut lines = vec![
        String::from("orphan"),
        other_line("2024-01-02 03:04:00,000"),
        other_line("2023-01-02 03:04:00,000"),
        handler_parsing("2024-01-02 03:04:01,000", "SELEC 1"),
        String::from("continued"),
        handler_failed("2024-01-02 03:04:02,000", "oops"),
        handler_failed("2024-01-02 03:04:03,000", "again"),
        bg_perflog_begin("2024-01-02 03:04:04,000", 9),
        bg_line_unmatched("2024-01-02 03:04:04,500", 9),
    ];
    lines.extend(lines_select1_success());
    process_lines(&mut tracker, &lines);
    tracker.finish();
    let summary = tracker.summary();
    assert_eq!(summary.QueryExtractor_lines, lines.len() as u64);
    assert_eq!(summary.lines_accounted(), summary.QueryExtractor_lines);
    assert_eq!(summary.QueryExtractor_lines_background_unmatched, 1);
    assert_eq!(summary.queries(), 2);
}

fn bg_line_unmatched(
    ts: &str,
    tid: u32,
) -> String {
    crate::tests::common::bg_line(ts, tid, "compile took a while")
}
