// src/readers/filepreprocessor.rs

//! Functions to find the rotated HiveServer2 log files that may hold lines
//! of a [`TimeWindow`], in the order their lines must be read.
//!
//! A rotated file is named with the day it covers, e.g.
//! `hiveserver2.log.2024-01-02.gz`. The live file has no date in its name,
//! e.g. `hiveserver2.log`, and is assumed to hold the most recent lines.

use std::path::PathBuf;

use ::glob::glob;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

use crate::common::{FPath, HqeError, ResultHqe};
use crate::data::datetime::{
    date_from_filename,
    date_to_day_range,
    DateTimeL,
    FixedOffset,
    NaiveDate,
    TimeWindow,
};
use crate::e_wrn;
use crate::readers::helpers::{basename, path_to_fpath};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LogFile
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A log file found by [`find_files_to_parse`].
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct LogFile {
    pub path: FPath,
    /// Day embedded in the file name; `None` for the live file.
    pub file_start_date: Option<NaiveDate>,
}

impl LogFile {
    /// `LogFile` for `path`, the date is taken from the file name.
    pub fn new(path: FPath) -> LogFile {
        let file_start_date: Option<NaiveDate> = date_from_filename(basename(&path).as_str());

        LogFile {
            path,
            file_start_date,
        }
    }

    pub const fn is_dated(&self) -> bool {
        self.file_start_date.is_some()
    }

    /// May this file hold lines of `window`?
    ///
    /// A dated file covers `[filestart, fileend)`, the day in its name at
    /// `tz_offset`. It is selected if any of
    /// 1. `since` is inside the file
    /// 2. `to` is inside the file
    /// 3. the window spans the whole file
    ///
    /// An undated file is always selected.
    pub fn covers(
        &self,
        window: &TimeWindow,
        tz_offset: &FixedOffset,
    ) -> bool {
        let date: &NaiveDate = match self.file_start_date.as_ref() {
            Some(date) => date,
            None => return true,
        };
        let (filestart, fileend): (DateTimeL, DateTimeL) = match date_to_day_range(date, tz_offset) {
            Some(range) => range,
            None => {
                // a date at the edge of the chrono range
                defñ!("date_to_day_range({:?}) None; return false", date);
                return false;
            }
        };
        let since: &DateTimeL = &window.since;
        let to: &DateTimeL = &window.to;

        (since >= &filestart && since < &fileend)
            || (to >= &filestart && to < &fileend)
            || (since <= &filestart && to >= &fileend)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file selection
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Join `logdir` and the shell pattern `pattern`.
pub fn resolve_glob(
    logdir: &FPath,
    pattern: &str,
) -> FPath {
    path_to_fpath(PathBuf::from(logdir).join(pattern).as_path())
}

/// Find the files in `logdir` matching shell pattern `pattern` that may
/// hold lines of `window`.
///
/// Returned in reading order: dated files ascending by date then path,
/// then the undated live file, if any. Only one undated file is kept,
/// the last one matched.
///
/// Paths that are not files are ignored.
pub fn find_files_to_parse(
    logdir: &FPath,
    pattern: &str,
    window: &TimeWindow,
    tz_offset: &FixedOffset,
) -> ResultHqe<Vec<LogFile>> {
    defn!("({:?}, {:?}, {:?})", logdir, pattern, window);
    let pattern_: FPath = resolve_glob(logdir, pattern);
    let paths = match glob(pattern_.as_str()) {
        Ok(paths) => paths,
        Err(err) => {
            defx!("glob({:?}) error {}", pattern_, err);
            return Err(HqeError::InvalidGlob(pattern_, err.to_string()));
        }
    };

    let mut selected: Vec<LogFile> = Vec::new();
    let mut current_file: Option<LogFile> = None;
    for path_result in paths {
        let pathbuf: PathBuf = match path_result {
            Ok(pathbuf) => pathbuf,
            Err(err) => {
                let path: FPath = path_to_fpath(err.path());
                defx!("glob entry {:?} error {}", path, err);
                let error = std::io::Error::new(err.error().kind(), err.to_string());
                return Err(HqeError::Io(path, error));
            }
        };
        if !pathbuf.is_file() {
            defo!("not a file {:?}", pathbuf);
            continue;
        }
        let logfile: LogFile = LogFile::new(path_to_fpath(pathbuf.as_path()));
        if !logfile.is_dated() {
            if let Some(previous) = current_file.replace(logfile) {
                e_wrn!("more than one log file without a date, ignoring {:?}", previous.path);
            }
            continue;
        }
        if logfile.covers(window, tz_offset) {
            defo!("selected {:?}", logfile);
            selected.push(logfile);
        } else {
            defo!("not selected {:?}", logfile);
        }
    }

    selected.sort_by(|a, b| {
        (a.file_start_date, &a.path).cmp(&(b.file_start_date, &b.path))
    });
    selected.dedup_by(|a, b| a.path == b.path);
    if let Some(logfile) = current_file {
        selected.push(logfile);
    }
    defx!("return {} files", selected.len());

    Ok(selected)
}
