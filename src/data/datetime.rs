// src/data/datetime.rs

//! Functions and types for instants, time windows, and the user-passed
//! time specs of `--since` and `--to`.
//!
//! A user-passed time spec is matched against these forms, in order; the
//! first match wins:
//! 1. `now`
//! 2. a date and time, e.g. `2024-01-02 03:04:05`, `20240102T030405`,
//!    `2024/01/02-03.04.05`
//! 3. a date, e.g. `2024-01-02`, `20240102`
//! 4. a relative offset back from now, e.g. `15m`, `2h`, `3d`
//!
//! Forms 2 to 4 must match at the start of the time spec. Text after the
//! match is ignored, so `2024-01-02T03:04:05.123Z` is a datetime and
//! `15min` is an offset of 15 minutes.
//!
//! The same date pattern is used to find the date embedded in the name of
//! a rotated log file, see [`date_from_filename`].
//!
//! All instants are [`DateTimeL`], i.e. UTC. Naive datetimes (log
//! timestamps, file name dates, absolute time specs) are placed at the
//! user-passed timezone offset and then converted to UTC.

#![allow(non_camel_case_types)]

use std::fmt;

#[doc(hidden)]
pub use ::chrono::{
    DateTime,
    Datelike,
    Duration,
    FixedOffset,
    NaiveDate,
    NaiveDateTime,
    NaiveTime,
    Offset,
    TimeZone,
    Timelike,
    Utc,
};
use ::const_format::concatcp;
use ::lazy_static::lazy_static;
use ::regex::{Captures, Regex};
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

use crate::common::{HqeError, ResultHqe};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DateTime types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A chrono [`DateTime`] type used in _hqelib_.
///
/// [`DateTime`]: https://docs.rs/chrono/0.4.40/chrono/struct.DateTime.html
pub type DateTimeL = DateTime<Utc>;
pub type DateTimeLOpt = Option<DateTimeL>;

/// Which end of a [`TimeWindow`] a time spec describes.
///
/// Only matters for a bare date: `Since` is the start of that day and
/// `To` is the end of that day.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TimeSpecDirection {
    Since,
    To,
}

impl fmt::Display for TimeSpecDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TimeSpecDirection::Since => write!(f, "since"),
            TimeSpecDirection::To => write!(f, "to"),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Regex patterns
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Regular expression formatting pattern, passed to [`regex::Regex`].
pub type DateTimeRegex_str = str;

/// Regular expression capture group name.
pub type CaptureGroupName = str;

// `regex::Captures` capture group names

pub const CGN_YEAR: &CaptureGroupName = "year";
pub const CGN_DATESEP1: &CaptureGroupName = "datesep1";
pub const CGN_MONTH: &CaptureGroupName = "month";
pub const CGN_DATESEP2: &CaptureGroupName = "datesep2";
pub const CGN_DAY: &CaptureGroupName = "day";
pub const CGN_HOUR: &CaptureGroupName = "hour";
pub const CGN_TIMESEP1: &CaptureGroupName = "timesep1";
pub const CGN_MINUTE: &CaptureGroupName = "minute";
pub const CGN_TIMESEP2: &CaptureGroupName = "timesep2";
pub const CGN_SECOND: &CaptureGroupName = "second";
pub const CGN_OFFSET_COUNT: &CaptureGroupName = "offset_count";
pub const CGN_OFFSET_UNIT: &CaptureGroupName = "offset_unit";

// `regex` crate does not support backreferences so a separator is
// captured twice and compared in `captures_to_date` and `captures_to_time`.

pub const CGP_YEAR: &DateTimeRegex_str = concatcp!("(?P<", CGN_YEAR, r">\d{4})");
pub const CGP_DATESEP1: &DateTimeRegex_str = concatcp!("(?P<", CGN_DATESEP1, r">\D?)");
pub const CGP_MONTH: &DateTimeRegex_str = concatcp!("(?P<", CGN_MONTH, r">\d{2})");
pub const CGP_DATESEP2: &DateTimeRegex_str = concatcp!("(?P<", CGN_DATESEP2, r">\D?)");
pub const CGP_DAY: &DateTimeRegex_str = concatcp!("(?P<", CGN_DAY, r">\d{2})");
pub const CGP_HOUR: &DateTimeRegex_str = concatcp!("(?P<", CGN_HOUR, r">\d{2})");
pub const CGP_TIMESEP1: &DateTimeRegex_str = concatcp!("(?P<", CGN_TIMESEP1, r">\D?)");
pub const CGP_MINUTE: &DateTimeRegex_str = concatcp!("(?P<", CGN_MINUTE, r">\d{2})");
pub const CGP_TIMESEP2: &DateTimeRegex_str = concatcp!("(?P<", CGN_TIMESEP2, r">\D?)");
pub const CGP_SECOND: &DateTimeRegex_str = concatcp!("(?P<", CGN_SECOND, r">\d{2})");
pub const CGP_OFFSET_COUNT: &DateTimeRegex_str = concatcp!("(?P<", CGN_OFFSET_COUNT, r">\d+)");
pub const CGP_OFFSET_UNIT: &DateTimeRegex_str = concatcp!("(?P<", CGN_OFFSET_UNIT, r">[mhd])");

/// `YYYY?MM?DD` where `?` is an optional non-digit separator
pub const RP_DATE: &DateTimeRegex_str = concatcp!(CGP_YEAR, CGP_DATESEP1, CGP_MONTH, CGP_DATESEP2, CGP_DAY);
/// `hh?mm?ss` where `?` is an optional non-digit separator
pub const RP_TIME: &DateTimeRegex_str = concatcp!(CGP_HOUR, CGP_TIMESEP1, CGP_MINUTE, CGP_TIMESEP2, CGP_SECOND);

/// time spec form 2, a date and a time
pub const RP_TIMESPEC_DATETIME: &DateTimeRegex_str = concatcp!("^", RP_DATE, r"\D?", RP_TIME);
/// time spec form 3, a bare date
pub const RP_TIMESPEC_DATE: &DateTimeRegex_str = concatcp!("^", RP_DATE);
/// time spec form 4, a relative offset
pub const RP_TIMESPEC_OFFSET: &DateTimeRegex_str = concatcp!("^", CGP_OFFSET_COUNT, CGP_OFFSET_UNIT);

/// time spec form 1
pub const TIMESPEC_NOW: &str = "now";

lazy_static! {
    static ref REGEX_TIMESPEC_DATETIME: Regex = {
        defñ!("lazy_static! REGEX_TIMESPEC_DATETIME::new()");
        Regex::new(RP_TIMESPEC_DATETIME).unwrap()
    };
    static ref REGEX_TIMESPEC_DATE: Regex = {
        defñ!("lazy_static! REGEX_TIMESPEC_DATE::new()");
        Regex::new(RP_TIMESPEC_DATE).unwrap()
    };
    static ref REGEX_TIMESPEC_OFFSET: Regex = {
        defñ!("lazy_static! REGEX_TIMESPEC_OFFSET::new()");
        Regex::new(RP_TIMESPEC_OFFSET).unwrap()
    };
    /// unanchored, for searching file names
    static ref REGEX_DATE: Regex = {
        defñ!("lazy_static! REGEX_DATE::new()");
        Regex::new(RP_DATE).unwrap()
    };
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Captures to chrono
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Return the `&str` of named capture group `name`, or `""`.
fn capture_str<'a>(
    captures: &Captures<'a>,
    name: &CaptureGroupName,
) -> &'a str {
    match captures.name(name) {
        Some(match_) => match_.as_str(),
        None => "",
    }
}

/// Are the captured separators `sep1` and `sep2` the same?
fn separators_agree(
    captures: &Captures,
    sep1: &CaptureGroupName,
    sep2: &CaptureGroupName,
) -> bool {
    capture_str(captures, sep1) == capture_str(captures, sep2)
}

/// Transform captures of [`RP_DATE`] to a `NaiveDate`.
///
/// Returns `None` if the two date separators differ or the date is not
/// a real calendar date.
fn captures_to_date(captures: &Captures) -> Option<NaiveDate> {
    if !separators_agree(captures, CGN_DATESEP1, CGN_DATESEP2) {
        defñ!("date separators differ; return None");
        return None;
    }
    let year: i32 = capture_str(captures, CGN_YEAR).parse().ok()?;
    let month: u32 = capture_str(captures, CGN_MONTH).parse().ok()?;
    let day: u32 = capture_str(captures, CGN_DAY).parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Transform captures of [`RP_TIME`] to a `NaiveTime`.
fn captures_to_time(captures: &Captures) -> Option<NaiveTime> {
    if !separators_agree(captures, CGN_TIMESEP1, CGN_TIMESEP2) {
        defñ!("time separators differ; return None");
        return None;
    }
    let hour: u32 = capture_str(captures, CGN_HOUR).parse().ok()?;
    let minute: u32 = capture_str(captures, CGN_MINUTE).parse().ok()?;
    let second: u32 = capture_str(captures, CGN_SECOND).parse().ok()?;

    NaiveTime::from_hms_opt(hour, minute, second)
}

/// The UTC offset, `+00:00`.
pub fn fixedoffset_utc() -> FixedOffset {
    Utc.fix()
}

/// Place a naive datetime at `tz_offset` and convert it to UTC.
pub fn naive_to_datetimel(
    ndt: &NaiveDateTime,
    tz_offset: &FixedOffset,
) -> DateTimeLOpt {
    tz_offset
        .from_local_datetime(ndt)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// The `[start, end)` instants of the day `date` at `tz_offset`.
pub fn date_to_day_range(
    date: &NaiveDate,
    tz_offset: &FixedOffset,
) -> Option<(DateTimeL, DateTimeL)> {
    let start: DateTimeL = naive_to_datetimel(&date.and_hms_opt(0, 0, 0)?, tz_offset)?;
    let next_day: NaiveDate = date.succ_opt()?;
    let end: DateTimeL = naive_to_datetimel(&next_day.and_hms_opt(0, 0, 0)?, tz_offset)?;

    Some((start, end))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// time specs
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Transform a user-passed time spec into a [`DateTimeL`].
///
/// `now` is the current instant, passed in so that both ends of a window
/// share one "now" and so tests are deterministic.
/// Absolute dates and datetimes are interpreted at `tz_offset`.
///
/// A bare date becomes `00:00:00` of that day for
/// [`TimeSpecDirection::Since`] and `23:59:59.999` for
/// [`TimeSpecDirection::To`].
///
/// Returns [`HqeError::InvalidTimeSpec`] if no form matches.
pub fn parse_timespec(
    spec: &str,
    direction: TimeSpecDirection,
    now: &DateTimeL,
    tz_offset: &FixedOffset,
) -> ResultHqe<DateTimeL> {
    defn!("({:?}, {:?}, {:?}, {:?})", spec, direction, now, tz_offset);
    let spec_: &str = spec.trim();

    if spec_.eq_ignore_ascii_case(TIMESPEC_NOW) {
        defx!("now; return {:?}", now);
        return Ok(*now);
    }

    if let Some(captures) = REGEX_TIMESPEC_DATETIME.captures(spec_) {
        defo!("matched REGEX_TIMESPEC_DATETIME");
        if let (Some(date), Some(time)) = (captures_to_date(&captures), captures_to_time(&captures)) {
            if let Some(dt) = naive_to_datetimel(&date.and_time(time), tz_offset) {
                defx!("datetime; return {:?}", dt);
                return Ok(dt);
            }
        }
        // a well-formed datetime with impossible values is not retried as a date
        if separators_agree(&captures, CGN_DATESEP1, CGN_DATESEP2)
            && separators_agree(&captures, CGN_TIMESEP1, CGN_TIMESEP2)
        {
            defx!("impossible datetime; return InvalidTimeSpec");
            return Err(HqeError::InvalidTimeSpec(String::from(spec)));
        }
    }

    if let Some(captures) = REGEX_TIMESPEC_DATE.captures(spec_) {
        defo!("matched REGEX_TIMESPEC_DATE");
        if let Some(date) = captures_to_date(&captures) {
            let ndt: Option<NaiveDateTime> = match direction {
                TimeSpecDirection::Since => date.and_hms_opt(0, 0, 0),
                // last millisecond of the day
                TimeSpecDirection::To => date.and_hms_milli_opt(23, 59, 59, 999),
            };
            if let Some(dt) = ndt.and_then(|ndt| naive_to_datetimel(&ndt, tz_offset)) {
                defx!("date; return {:?}", dt);
                return Ok(dt);
            }
        }
    }

    if let Some(captures) = REGEX_TIMESPEC_OFFSET.captures(spec_) {
        defo!("matched REGEX_TIMESPEC_OFFSET");
        if let Ok(count) = capture_str(&captures, CGN_OFFSET_COUNT).parse::<i64>() {
            let duration: Option<Duration> = match capture_str(&captures, CGN_OFFSET_UNIT) {
                "m" => Duration::try_minutes(count),
                "h" => Duration::try_hours(count),
                "d" => Duration::try_days(count),
                _ => None,
            };
            if let Some(dt) = duration.and_then(|d| now.checked_sub_signed(d)) {
                defx!("offset; return {:?}", dt);
                return Ok(dt);
            }
        }
    }

    defx!("no match; return InvalidTimeSpec");

    Err(HqeError::InvalidTimeSpec(String::from(spec)))
}

/// Find the first date embedded in a file name, e.g.
/// `hiveserver2.log.2024-01-02.gz` is `2024-01-02`.
///
/// Only pass a file name; directory components may hold unrelated dates.
pub fn date_from_filename(file_name: &str) -> Option<NaiveDate> {
    for captures in REGEX_DATE.captures_iter(file_name) {
        if let Some(date) = captures_to_date(&captures) {
            defñ!("({:?}) return {:?}", file_name, date);
            return Some(date);
        }
    }
    defñ!("({:?}) return None", file_name);

    None
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TimeWindow
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Describe the result of comparing one [`DateTimeL`] to a [`TimeWindow`].
#[derive(Debug, Eq, PartialEq)]
pub enum Result_Filter_DateTime2 {
    /// like Pass
    InRange,
    /// like Fail
    BeforeRange,
    /// like Fail
    AfterRange,
}

impl Result_Filter_DateTime2 {
    #[inline(always)]
    pub const fn is_pass(&self) -> bool {
        matches!(*self, Result_Filter_DateTime2::InRange)
    }

    #[inline(always)]
    pub const fn is_fail(&self) -> bool {
        matches!(*self, Result_Filter_DateTime2::AfterRange | Result_Filter_DateTime2::BeforeRange)
    }
}

/// The inclusive `[since, to]` range of instants that log lines must fall
/// in to be considered at all.
///
/// `since <= to` is not enforced; an inverted window passes nothing.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TimeWindow {
    pub since: DateTimeL,
    pub to: DateTimeL,
}

impl TimeWindow {
    pub fn new(
        since: DateTimeL,
        to: DateTimeL,
    ) -> TimeWindow {
        TimeWindow { since, to }
    }

    /// Resolve both time specs against one `now`.
    pub fn from_timespecs(
        since: &str,
        to: &str,
        now: &DateTimeL,
        tz_offset: &FixedOffset,
    ) -> ResultHqe<TimeWindow> {
        let since_: DateTimeL = parse_timespec(since, TimeSpecDirection::Since, now, tz_offset)?;
        let to_: DateTimeL = parse_timespec(to, TimeSpecDirection::To, now, tz_offset)?;

        Ok(TimeWindow::new(since_, to_))
    }

    /// Is `dt` before, inside, or after this window? Both ends inclusive.
    pub fn filter(
        &self,
        dt: &DateTimeL,
    ) -> Result_Filter_DateTime2 {
        if dt < &self.since {
            return Result_Filter_DateTime2::BeforeRange;
        }
        if &self.to < dt {
            return Result_Filter_DateTime2::AfterRange;
        }

        Result_Filter_DateTime2::InRange
    }

    pub fn is_inverted(&self) -> bool {
        self.to < self.since
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} and {}", self.since, self.to)
    }
}
