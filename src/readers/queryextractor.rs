// src/readers/queryextractor.rs

//! Implements a [`QueryExtractor`], the driver that streams the lines of
//! the selected log files, in order, through a [`ThreadTracker`], and
//! [`get_queries`], the complete extraction pipeline.
//!
//! Files are read one at a time, in the order returned by
//! [`find_files_to_parse`]. Tracker state carries over from one file to
//! the next so an operation that starts in one rotated file and ends in
//! the next is reconstructed.

use std::io::BufRead;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

use crate::common::{err_from_err_path, Count, FPath, ResultHqe};
use crate::data::datetime::{fixedoffset_utc, DateTimeL, FixedOffset, TimeWindow};
use crate::data::query::Query;
use crate::readers::fileopener::{open_log_file, read_line_lossy};
use crate::readers::filepreprocessor::{find_files_to_parse, LogFile};
use crate::readers::helpers::basename;
use crate::readers::summary::SummaryQueryExtractor;
use crate::readers::threadtracker::ThreadTracker;
use crate::{e_dbg, e_inf, e_wrn};

/// default `--logdir`
pub const LOGDIR_DEFAULT: &str = "/var/log/hive";
/// default `--glob`
pub const GLOB_DEFAULT: &str = "hiveserver2.log*";
/// default `--since`
pub const SINCE_DEFAULT: &str = "15m";
/// default `--to`
pub const TO_DEFAULT: &str = "now";

/// strftime format of window ends in diagnostics
const DATETIME_FORMAT_WINDOW: &str = "%Y-%m-%d %H:%M:%S%.f";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ExtractConfig
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Settings of one extraction run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExtractConfig {
    /// directory of the log files
    pub logdir: FPath,
    /// shell pattern of log file names inside `logdir`
    pub glob: String,
    /// time spec of the window start
    pub since: String,
    /// time spec of the window end
    pub to: String,
    /// offset of log timestamps, file name dates, and absolute time specs
    pub tz_offset: FixedOffset,
    /// warn about and skip files that cannot be read, instead of failing
    pub skip_unreadable: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        ExtractConfig {
            logdir: FPath::from(LOGDIR_DEFAULT),
            glob: String::from(GLOB_DEFAULT),
            since: String::from(SINCE_DEFAULT),
            to: String::from(TO_DEFAULT),
            tz_offset: fixedoffset_utc(),
            skip_unreadable: false,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// QueryExtractor
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Streams log lines into a [`ThreadTracker`] and collects the emitted
/// [`Query`]s in emission order.
#[derive(Debug)]
pub struct QueryExtractor {
    tracker: ThreadTracker,
    queries: Vec<Query>,
    skip_unreadable: bool,
    files_opened: Count,
    files_skipped: Count,
}

impl QueryExtractor {
    pub fn new(
        window: TimeWindow,
        tz_offset: FixedOffset,
        skip_unreadable: bool,
    ) -> QueryExtractor {
        QueryExtractor {
            tracker: ThreadTracker::new(window, tz_offset),
            queries: Vec::new(),
            skip_unreadable,
            files_opened: 0,
            files_skipped: 0,
        }
    }

    /// Queries emitted so far.
    pub fn queries(&self) -> &[Query] {
        self.queries.as_slice()
    }

    pub fn tracker(&self) -> &ThreadTracker {
        &self.tracker
    }

    /// Pass every line of `reader` to the tracker.
    pub fn process_reader(
        &mut self,
        reader: &mut dyn BufRead,
    ) -> std::io::Result<()> {
        defn!();
        let mut buffer: Vec<u8> = Vec::with_capacity(1024);
        let mut line: String = String::with_capacity(1024);
        while read_line_lossy(reader, &mut buffer, &mut line)? {
            if let Some(query) = self.tracker.process_line(line.as_str()) {
                self.queries.push(query);
            }
        }
        defx!("queries {}", self.queries.len());

        Ok(())
    }

    /// Open and process the log file `logfile`.
    ///
    /// An open or read error is returned, unless `skip_unreadable` was set
    /// in which case it is printed as a warning and the file is skipped.
    /// Lines read before a read error are kept.
    pub fn process_file(
        &mut self,
        logfile: &LogFile,
    ) -> ResultHqe<()> {
        defn!("({:?})", logfile.path);
        e_dbg!("opening {}", logfile.path);
        let result: ResultHqe<()> = match open_log_file(&logfile.path) {
            Ok(mut reader) => self
                .process_reader(reader.as_mut())
                .map_err(|err| err_from_err_path(err, &logfile.path)),
            Err(err) => Err(err),
        };
        match result {
            Ok(()) => {
                self.files_opened += 1;
                defx!("processed {:?}", logfile.path);

                Ok(())
            }
            Err(err) if self.skip_unreadable => {
                e_wrn!("skipping {}", err);
                self.files_skipped += 1;
                defx!("skipped {:?}", logfile.path);

                Ok(())
            }
            Err(err) => {
                defx!("error {}", err);

                Err(err)
            }
        }
    }

    /// End of stream. Flush the tracker and return every query, in
    /// emission order, and the run statistics.
    pub fn finish(mut self) -> (Vec<Query>, SummaryQueryExtractor) {
        defn!();
        let mut flushed: Vec<Query> = self.tracker.finish();
        self.queries.append(&mut flushed);
        let mut summary: SummaryQueryExtractor = self.tracker.summary().clone();
        summary.QueryExtractor_files_opened = self.files_opened;
        summary.QueryExtractor_files_skipped = self.files_skipped;
        defx!("return {} queries", self.queries.len());

        (self.queries, summary)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// pipeline
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Every query run between `config.since` and `config.to`.
///
/// `now` is the current instant; `now` and relative time specs are
/// resolved against it.
pub fn get_queries(
    config: &ExtractConfig,
    now: &DateTimeL,
) -> ResultHqe<(Vec<Query>, SummaryQueryExtractor)> {
    defn!("({:?}, {:?})", config, now);
    let window: TimeWindow = TimeWindow::from_timespecs(
        config.since.as_str(),
        config.to.as_str(),
        now,
        &config.tz_offset,
    )?;
    e_inf!(
        "Looking at queries between {} and {}.",
        window.since.format(DATETIME_FORMAT_WINDOW),
        window.to.format(DATETIME_FORMAT_WINDOW),
    );
    if window.is_inverted() {
        e_wrn!("--since {:?} is after --to {:?}, no queries can match", config.since, config.to);
    }

    let logfiles: Vec<LogFile> = find_files_to_parse(
        &config.logdir,
        config.glob.as_str(),
        &window,
        &config.tz_offset,
    )?;
    let names: Vec<FPath> = logfiles
        .iter()
        .map(|logfile| basename(&logfile.path))
        .collect();
    e_inf!("Looking at files: {:?}", names);

    let mut extractor = QueryExtractor::new(window, config.tz_offset, config.skip_unreadable);
    for logfile in logfiles.iter() {
        extractor.process_file(logfile)?;
    }
    let (queries, summary) = extractor.finish();
    defx!("return {} queries", queries.len());

    Ok((queries, summary))
}
