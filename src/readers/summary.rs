// src/readers/summary.rs

//! Implements `SummaryQueryExtractor` statistics tracking struct.
//!
//! Every line read lands in exactly one of these line counters:
//! out of window, continuation, orphan, unmatched, background pool,
//! handler pool. See [`SummaryQueryExtractor::lines_accounted`].

#![allow(non_snake_case)]

use std::fmt;

use crate::common::Count;
use crate::data::query::QueryStatus;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SummaryQueryExtractor
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Accumulated statistics about one extraction run.
///
/// For CLI option `--summary`.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct SummaryQueryExtractor {
    /// files opened and read to the end
    pub QueryExtractor_files_opened: Count,
    /// files skipped after an open or read error, `--skip-unreadable`
    pub QueryExtractor_files_skipped: Count,
    /// all lines read
    pub QueryExtractor_lines: Count,
    /// lines with a leading log timestamp, in or out of the window
    pub QueryExtractor_lines_timestamped: Count,
    /// timestamped lines before `since` or after `to`
    pub QueryExtractor_lines_out_of_window: Count,
    /// untimestamped lines appended to a multi-line command
    pub QueryExtractor_lines_continuation: Count,
    /// untimestamped lines with no open multi-line command, e.g. stack traces
    pub QueryExtractor_lines_orphan: Count,
    /// in-window timestamped lines of neither the background nor the
    /// handler pool
    pub QueryExtractor_lines_unmatched: Count,
    /// in-window background-pool lines
    pub QueryExtractor_lines_background: Count,
    /// background-pool lines of a known thread whose remainder matched
    /// no pattern; subset of `QueryExtractor_lines_background`
    pub QueryExtractor_lines_background_unmatched: Count,
    /// in-window handler-pool lines
    pub QueryExtractor_lines_handler: Count,
    /// handler-pool lines whose remainder matched no pattern; subset of
    /// `QueryExtractor_lines_handler`
    pub QueryExtractor_lines_handler_unmatched: Count,
    /// `FAILED:` lines with no open parse announcement; subset of
    /// `QueryExtractor_lines_handler`
    pub QueryExtractor_lines_failed_orphan: Count,
    /// records created, background threads and parse announcements
    pub QueryExtractor_records_opened: Count,
    /// background-pool records that ended before any command was seen
    pub QueryExtractor_records_closed_without_query: Count,
    pub QueryExtractor_queries_success: Count,
    pub QueryExtractor_queries_failed: Count,
    pub QueryExtractor_queries_running: Count,
    /// parse announcements still open at end of stream
    pub QueryExtractor_flush_handler_dropped: Count,
    /// background-pool records without a command still open at end of stream
    pub QueryExtractor_flush_opened_dropped: Count,
    /// most records held at once
    pub QueryExtractor_records_highest: usize,
}

impl SummaryQueryExtractor {
    /// Count one emitted query of `status`.
    pub fn count_query(
        &mut self,
        status: QueryStatus,
    ) {
        match status {
            QueryStatus::Success => self.QueryExtractor_queries_success += 1,
            QueryStatus::Failed => self.QueryExtractor_queries_failed += 1,
            QueryStatus::Running => self.QueryExtractor_queries_running += 1,
            QueryStatus::Unknown => {}
        }
    }

    /// Remember `len` if it is the most records held so far.
    pub fn records_len(
        &mut self,
        len: usize,
    ) {
        self.QueryExtractor_records_highest = std::cmp::max(self.QueryExtractor_records_highest, len);
    }

    /// All queries emitted.
    pub fn queries(&self) -> Count {
        self.QueryExtractor_queries_success + self.QueryExtractor_queries_failed + self.QueryExtractor_queries_running
    }

    /// Sum of the mutually exclusive line counters. Equals
    /// `QueryExtractor_lines` when every line was accounted for.
    pub fn lines_accounted(&self) -> Count {
        self.QueryExtractor_lines_out_of_window
            + self.QueryExtractor_lines_continuation
            + self.QueryExtractor_lines_orphan
            + self.QueryExtractor_lines_unmatched
            + self.QueryExtractor_lines_background
            + self.QueryExtractor_lines_handler
    }
}

impl fmt::Debug for SummaryQueryExtractor {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("")
            .field("files opened", &self.QueryExtractor_files_opened)
            .field("files skipped", &self.QueryExtractor_files_skipped)
            .field("lines", &self.QueryExtractor_lines)
            .field("lines timestamped", &self.QueryExtractor_lines_timestamped)
            .field("lines out of window", &self.QueryExtractor_lines_out_of_window)
            .field("lines continuation", &self.QueryExtractor_lines_continuation)
            .field("lines orphan", &self.QueryExtractor_lines_orphan)
            .field("lines unmatched", &self.QueryExtractor_lines_unmatched)
            .field("lines background", &self.QueryExtractor_lines_background)
            .field("lines background unmatched", &self.QueryExtractor_lines_background_unmatched)
            .field("lines handler", &self.QueryExtractor_lines_handler)
            .field("lines handler unmatched", &self.QueryExtractor_lines_handler_unmatched)
            .field("lines FAILED orphan", &self.QueryExtractor_lines_failed_orphan)
            .field("records opened", &self.QueryExtractor_records_opened)
            .field("records closed without query", &self.QueryExtractor_records_closed_without_query)
            .field("records stored highest", &self.QueryExtractor_records_highest)
            .field("queries success", &self.QueryExtractor_queries_success)
            .field("queries failed", &self.QueryExtractor_queries_failed)
            .field("queries running", &self.QueryExtractor_queries_running)
            .field("flush handler dropped", &self.QueryExtractor_flush_handler_dropped)
            .field("flush without command dropped", &self.QueryExtractor_flush_opened_dropped)
            .finish()
    }
}
