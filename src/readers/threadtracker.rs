// src/readers/threadtracker.rs

//! Implements a [`ThreadTracker`], the per-worker state machine that turns
//! a chronological stream of interleaved HiveServer2 log lines into
//! [`Query`]s.
//!
//! Each worker has at most one live [`ParseRecord`]. A record moves
//! through [`RecordState`]s as lines for its worker arrive and is removed
//! the moment its terminal line is seen.
//!
//! | state            | event            | result                               |
//! |------------------|------------------|--------------------------------------|
//! | `Opened`         | command start    | `Command`, query text and id seeded  |
//! | `Opened`         | metadata         | `Opened`, metadata stored            |
//! | `Opened`         | end of operation | removed, no `Query`                  |
//! | `Command`        | command start    | `Command`, query text and id replaced|
//! | `Command`        | metadata         | `Command`, metadata stored           |
//! | `Command`        | end of operation | `Success` emitted, removed           |
//! | `HandlerParsing` | `FAILED:`        | `Failed` emitted, removed            |
//! | any              | unmatched        | unchanged, counted                   |
//! | `Command`        | end of stream    | `Running` emitted                    |
//! | `Opened`         | end of stream    | dropped, counted                     |
//! | `HandlerParsing` | end of stream    | dropped, counted                     |
//!
//! A background-pool thread's first line only opens its record; the
//! remainder of that first line is not examined.
//!
//! Untimestamped lines are appended to the one worker, if any, that is
//! inside a multi-line command. Any in-window timestamped line ends the
//! multi-line command.

use std::collections::HashMap;

use ::more_asserts::debug_assert_ge;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

use crate::common::Count;
use crate::data::datetime::{
    DateTimeL,
    FixedOffset,
    Result_Filter_DateTime2,
    TimeWindow,
};
use crate::data::query::{
    HandlerSeq,
    ParseRecord,
    Query,
    QueryStatus,
    RecordState,
    WorkerId,
};
use crate::debug::printers::str_to_String_noraw;
use crate::e_dbg;
use crate::readers::lineclassifier::{
    classify_body,
    classify_line,
    BackgroundMessage,
    HandlerMessage,
    LineClass,
    LogBody,
};
use crate::readers::summary::SummaryQueryExtractor;

/// Map of every live [`ParseRecord`].
pub type Records = HashMap<WorkerId, ParseRecord>;

/// Reconstructs [`Query`]s from log lines passed in chronological order.
/// See the module documentation for the state machine.
pub struct ThreadTracker {
    /// lines with a timestamp outside this window are ignored
    window: TimeWindow,
    /// offset of log timestamps
    tz_offset: FixedOffset,
    records: Records,
    /// worker inside a multi-line command
    continuation: Option<WorkerId>,
    /// last allocated handler sequence number, `0` is none allocated
    handler_seq: HandlerSeq,
    /// count of records ever opened, orders the end-of-stream flush
    opened: Count,
    summary: SummaryQueryExtractor,
}

impl std::fmt::Debug for ThreadTracker {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter,
    ) -> std::fmt::Result {
        f.debug_struct("ThreadTracker")
            .field("window", &self.window)
            .field("records", &self.records.len())
            .field("continuation", &self.continuation)
            .field("handler_seq", &self.handler_seq)
            .finish()
    }
}

impl ThreadTracker {
    pub fn new(
        window: TimeWindow,
        tz_offset: FixedOffset,
    ) -> ThreadTracker {
        defñ!("({:?}, {:?})", window, tz_offset);
        ThreadTracker {
            window,
            tz_offset,
            records: Records::new(),
            continuation: None,
            handler_seq: 0,
            opened: 0,
            summary: SummaryQueryExtractor::default(),
        }
    }

    /// Count of live records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Worker inside a multi-line command, if any.
    pub fn continuation(&self) -> Option<&WorkerId> {
        self.continuation.as_ref()
    }

    /// Live record of `worker_id`.
    pub fn record(
        &self,
        worker_id: &WorkerId,
    ) -> Option<&ParseRecord> {
        self.records.get(worker_id)
    }

    pub fn summary(&self) -> &SummaryQueryExtractor {
        &self.summary
    }

    /// Process one log line, without line ending. Returns the `Query`
    /// completed by this line, if any.
    pub fn process_line(
        &mut self,
        line: &str,
    ) -> Option<Query> {
        self.summary.QueryExtractor_lines += 1;

        let (dt, body): (DateTimeL, &str) = match classify_line(line, &self.tz_offset) {
            LineClass::Untimestamped(line_) => {
                self.process_untimestamped(line_);
                return None;
            }
            LineClass::Timestamped(dt, body) => (dt, body),
        };
        self.summary.QueryExtractor_lines_timestamped += 1;

        match self.window.filter(&dt) {
            Result_Filter_DateTime2::InRange => {}
            Result_Filter_DateTime2::BeforeRange | Result_Filter_DateTime2::AfterRange => {
                defñ!("out of window {:?}", dt);
                self.summary.QueryExtractor_lines_out_of_window += 1;
                return None;
            }
        }

        // a timestamped line always ends a multi-line command
        self.continuation = None;

        let query: Option<Query> = match classify_body(body) {
            LogBody::BackgroundPool { thread_id, message } => {
                self.summary.QueryExtractor_lines_background += 1;
                self.process_background(dt, line, thread_id, message)
            }
            LogBody::HandlerPool(message) => {
                self.summary.QueryExtractor_lines_handler += 1;
                self.process_handler(dt, message)
            }
            LogBody::Unmatched => {
                self.summary.QueryExtractor_lines_unmatched += 1;
                None
            }
        };
        self.summary.records_len(self.records.len());
        e_dbg!(
            "line {:?}: continuation: {:?}, records: {}, query: {}",
            str_to_String_noraw(line),
            self.continuation,
            self.records.len(),
            query.is_some()
        );

        query
    }

    /// Route an untimestamped line to the worker inside a multi-line
    /// command, or drop it.
    fn process_untimestamped(
        &mut self,
        line: &str,
    ) {
        let record: &mut ParseRecord = match self.continuation.as_ref() {
            Some(worker_id) => match self.records.get_mut(worker_id) {
                Some(record) => record,
                None => {
                    // records are only removed by timestamped lines which
                    // also end a continuation
                    debug_assert!(false, "continuation {:?} has no record", worker_id);
                    self.continuation = None;
                    self.summary.QueryExtractor_lines_orphan += 1;
                    return;
                }
            },
            None => {
                defñ!("orphan line");
                self.summary.QueryExtractor_lines_orphan += 1;
                return;
            }
        };
        record.append_continuation(line);
        self.summary.QueryExtractor_lines_continuation += 1;
    }

    /// Apply a background-pool line of thread `thread_id`.
    fn process_background(
        &mut self,
        dt: DateTimeL,
        line: &str,
        thread_id: &str,
        message: BackgroundMessage,
    ) -> Option<Query> {
        let worker_id: WorkerId = WorkerId::Thread(String::from(thread_id));

        if !self.records.contains_key(&worker_id) {
            defo!("open {:?} at {:?}", worker_id, dt);
            self.opened += 1;
            self.summary.QueryExtractor_records_opened += 1;
            self.records
                .insert(worker_id, ParseRecord::new_thread(dt, line, self.opened));
            return None;
        }
        let record: &mut ParseRecord = self.records.get_mut(&worker_id)?;
        debug_assert!(!record.is_error_handler_record);

        match message {
            BackgroundMessage::CommandStart { query_id, command } => {
                defo!("{:?} command start {:?}", worker_id, query_id);
                record.query_lines = vec![String::from(command)];
                record.query_id = Some(String::from(query_id));
                record.state = RecordState::Command;
                self.continuation = Some(worker_id);

                None
            }
            BackgroundMessage::Metadata { transaction_id, user, host } => {
                defo!("{:?} metadata {:?} {:?} {:?}", worker_id, transaction_id, user, host);
                record.transaction_id = Some(String::from(transaction_id));
                record.user = Some(String::from(user));
                record.host = Some(String::from(host));

                None
            }
            BackgroundMessage::EndOfOperation { duration_millis } => {
                let mut record: ParseRecord = self.records.remove(&worker_id)?;
                match record.state {
                    RecordState::Command => {
                        defo!("{:?} end of operation, duration {:?}", worker_id, duration_millis);
                        record.duration_millis = duration_millis;
                        record.status = QueryStatus::Success;
                        Some(self.emit(&record, &worker_id))
                    }
                    RecordState::Opened | RecordState::HandlerParsing => {
                        defo!("{:?} end of operation without command", worker_id);
                        self.summary.QueryExtractor_records_closed_without_query += 1;

                        None
                    }
                }
            }
            BackgroundMessage::Unmatched => {
                self.summary.QueryExtractor_lines_background_unmatched += 1;

                None
            }
        }
    }

    /// Apply a handler-pool line.
    fn process_handler(
        &mut self,
        dt: DateTimeL,
        message: HandlerMessage,
    ) -> Option<Query> {
        match message {
            HandlerMessage::ParsingCommand { command } => {
                self.handler_seq += 1;
                let worker_id: WorkerId = WorkerId::Handler(self.handler_seq);
                defo!("open {:?} at {:?}", worker_id, dt);
                self.opened += 1;
                self.summary.QueryExtractor_records_opened += 1;
                self.records
                    .insert(worker_id.clone(), ParseRecord::new_handler(dt, command, self.opened));
                self.continuation = Some(worker_id);

                None
            }
            HandlerMessage::Failed { error } => {
                let worker_id: WorkerId = WorkerId::Handler(self.handler_seq);
                let mut record: ParseRecord = match self.records.remove(&worker_id) {
                    Some(record) => record,
                    None => {
                        defo!("FAILED without open {:?}", worker_id);
                        self.summary.QueryExtractor_lines_failed_orphan += 1;
                        return None;
                    }
                };
                debug_assert_eq!(record.state, RecordState::HandlerParsing);
                defo!("{:?} FAILED {:?}", worker_id, error);
                record.error = Some(String::from(error));
                record.status = QueryStatus::Failed;

                Some(self.emit(&record, &worker_id))
            }
            HandlerMessage::Unmatched => {
                self.summary.QueryExtractor_lines_handler_unmatched += 1;

                None
            }
        }
    }

    /// Render and count a completed `record`. The record must already be
    /// removed from `self.records`.
    fn emit(
        &mut self,
        record: &ParseRecord,
        worker_id: &WorkerId,
    ) -> Query {
        debug_assert!(!self.records.contains_key(worker_id), "{:?} still in records", worker_id);
        defo!("emit {:?} {:?}, raw lines {:?}", worker_id, record.status, record.raw_lines);
        self.summary.count_query(record.status);

        Query::from_record(record, worker_id)
    }

    /// End of stream. Emit every open background-pool record with a
    /// command as `Running`, in the order records were opened. Drop all
    /// other records. Afterwards no record is held.
    pub fn finish(&mut self) -> Vec<Query> {
        defn!("records {}", self.records.len());
        self.continuation = None;
        let mut records: Vec<(WorkerId, ParseRecord)> = self.records.drain().collect();
        records.sort_by_key(|(_worker_id, record)| record.opened);

        let mut queries: Vec<Query> = Vec::with_capacity(records.len());
        for (worker_id, mut record) in records.into_iter() {
            match record.state {
                RecordState::Command => {
                    record.status = QueryStatus::Running;
                    queries.push(self.emit(&record, &worker_id));
                }
                RecordState::HandlerParsing => {
                    defo!("drop unresolved {:?}", worker_id);
                    self.summary.QueryExtractor_flush_handler_dropped += 1;
                }
                RecordState::Opened => {
                    defo!("drop {:?} without command", worker_id);
                    self.summary.QueryExtractor_flush_opened_dropped += 1;
                }
            }
        }
        debug_assert_ge!(self.summary.QueryExtractor_lines, self.summary.lines_accounted());
        defx!("return {} queries", queries.len());

        queries
    }
}
