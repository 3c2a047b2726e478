// src/bin/hqe.rs

//! Driver program _hqe_ drives the [_hqelib_].
//!
//! Processes user-passed command-line arguments into an
//! [`ExtractConfig`], runs [`get_queries`], then prints each [`Query`]
//! to stdout in the order the queries completed.
//!
//! Diagnostics are printed to stderr at the user-passed `--loglevel`.
//!
//! [_hqelib_]: hqelib
//! [`ExtractConfig`]: hqelib::readers::queryextractor::ExtractConfig
//! [`get_queries`]: hqelib::readers::queryextractor::get_queries
//! [`Query`]: hqelib::data::query::Query

#![allow(non_camel_case_types)]

use std::process::ExitCode;

use ::anyhow::Context;
use ::chrono::{DateTime, FixedOffset, Utc};
use ::clap::{Parser, ValueEnum};
use ::const_format::concatcp;
use ::si_trace_print::stack::stack_offset_set;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

use ::hqelib::data::query::Query;
use ::hqelib::debug::printers::{log_level_set, LogLevel};
use ::hqelib::printer::printers::{ColorChoice, PrinterQuery};
use ::hqelib::printer::summary::print_summary;
use ::hqelib::readers::queryextractor::{
    get_queries,
    ExtractConfig,
    GLOB_DEFAULT,
    LOGDIR_DEFAULT,
    SINCE_DEFAULT,
    TO_DEFAULT,
};
use ::hqelib::readers::summary::SummaryQueryExtractor;

// --------------------
// command-line parsing

/// general error exit value
const EXIT_ERR: u8 = 1;

/// CLI enum that maps to [`termcolor::ColorChoice`].
///
/// [`termcolor::ColorChoice`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.ColorChoice.html
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    ValueEnum, // from `clap`
)]
enum CLI_Color_Choice {
    always,
    auto,
    never,
}

/// CLI enum that maps to [`LogLevel`].
///
/// [`LogLevel`]: hqelib::debug::printers::LogLevel
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    ValueEnum, // from `clap`
)]
enum CLI_Log_Level {
    DEBUG,
    INFO,
    WARNING,
    ERROR,
    CRITICAL,
}

impl From<CLI_Log_Level> for LogLevel {
    fn from(level: CLI_Log_Level) -> LogLevel {
        match level {
            CLI_Log_Level::DEBUG => LogLevel::Debug,
            CLI_Log_Level::INFO => LogLevel::Info,
            CLI_Log_Level::WARNING => LogLevel::Warning,
            CLI_Log_Level::ERROR => LogLevel::Error,
            CLI_Log_Level::CRITICAL => LogLevel::Critical,
        }
    }
}

const CLI_HELP_AFTER: &str = "\
Time specs for --since and --to may be:
    \"now\"
    a date and time, e.g. \"2024-01-02 03:04:05\", \"20240102T030405\"
    a date, e.g. \"2024-01-02\", \"20240102\"
    an offset back from now in minutes, hours, or days, e.g. \"15m\", \"2h\", \"3d\"

A bare date is the start of that day for --since and the end of that day
for --to.

Rotated log files are selected by the date in their file name, e.g.
\"hiveserver2.log.2024-01-02.gz\". The live log file, without a date in its
name, is always read last.

Log files may be plain text or compressed with gzip (.gz), bzip2 (.bz2),
xz (.xz), or lz4 (.lz4).";

/// Command-line arguments of _hqe_.
#[derive(Parser, Debug)]
#[clap(
    about = "Displays queries ran on Hive.",
    name = "hqe",
    // write expanded information for the `--version` output
    version = concatcp!(
        "(Hive Queries Extractor)\n",
        "Version: ",
        env!("CARGO_PKG_VERSION"), "\n",
        "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
        "License: ", env!("CARGO_PKG_LICENSE"), "\n",
    ),
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// How far to look back.
    #[clap(
        long,
        verbatim_doc_comment,
        default_value = SINCE_DEFAULT,
    )]
    since: String,

    /// How far to look forward.
    #[clap(
        long,
        verbatim_doc_comment,
        default_value = TO_DEFAULT,
    )]
    to: String,

    /// Directory of hive log files.
    #[clap(
        long,
        verbatim_doc_comment,
        default_value = LOGDIR_DEFAULT,
    )]
    logdir: String,

    /// Shell pattern of hive log files inside their LOGDIR.
    #[clap(
        long = "glob",
        verbatim_doc_comment,
        default_value = GLOB_DEFAULT,
    )]
    logfile_glob: String,

    /// Log level of diagnostic messages printed to stderr.
    #[clap(
        short = 'l',
        long = "loglevel",
        verbatim_doc_comment,
        value_enum,
        ignore_case = true,
        default_value_t = CLI_Log_Level::WARNING,
    )]
    loglevel: CLI_Log_Level,

    /// Timezone offset of the log timestamps, of dates in log file names,
    /// and of absolute --since and --to values.
    /// Example values, "Z", "+12", "-0800", "+02:00".
    /// To pass a value with leading "-" use "=" notation, e.g. "-t=-0800".
    #[clap(
        short = 't',
        long,
        verbatim_doc_comment,
        value_parser = cli_process_tz_offset,
        default_value = "+00:00",
    )]
    tz_offset: FixedOffset,

    /// Print a warning and skip log files that cannot be read, instead of
    /// exiting with an error.
    #[clap(
        long = "skip-unreadable",
        verbatim_doc_comment,
    )]
    skip_unreadable: bool,

    /// Print a summary of the extraction to stderr.
    #[clap(
        short,
        long,
        verbatim_doc_comment,
    )]
    summary: bool,

    /// Choose to print the query status using colors.
    #[clap(
        required = false,
        short = 'c',
        long = "color",
        verbatim_doc_comment,
        value_enum,
        default_value_t = CLI_Color_Choice::auto,
    )]
    color_choice: CLI_Color_Choice,
}

/// timezone names that are the UTC offset
const TZ_NAMES_UTC: [&str; 3] = ["Z", "UTC", "GMT"];

/// CLI argument processing
fn cli_process_tz_offset(tzo: &str) -> std::result::Result<FixedOffset, String> {
    let tzo_: &str = tzo.trim();
    if TZ_NAMES_UTC
        .iter()
        .any(|name| name.eq_ignore_ascii_case(tzo_))
    {
        return Ok(hqelib::data::datetime::fixedoffset_utc());
    }
    // transform the timezone string to a `FixedOffset` instance
    // using a dummy datetime
    let mut data: String = String::from("2000-01-02 03:04:05 ");
    data.push_str(tzo_);
    for pattern in [
        "%Y-%m-%d %H:%M:%S %:z",
        "%Y-%m-%d %H:%M:%S %z",
        "%Y-%m-%d %H:%M:%S %#z",
    ] {
        let dt = DateTime::parse_from_str(data.as_str(), pattern);
        defo!("DateTime::parse_from_str({:?}, {:?}) returned {:?}", data, pattern, dt);
        if let Ok(dt_) = dt {
            defx!("return {:?}", dt_.offset());
            return Ok(*dt_.offset());
        }
    }

    Err(format!("Unable to parse a timezone offset for --tz-offset {:?}", tzo))
}

impl CLI_Args {
    /// The library configuration of these arguments.
    fn extract_config(&self) -> ExtractConfig {
        ExtractConfig {
            logdir: self.logdir.clone(),
            glob: self.logfile_glob.clone(),
            since: self.since.clone(),
            to: self.to.clone(),
            tz_offset: self.tz_offset,
            skip_unreadable: self.skip_unreadable,
        }
    }

    fn color_choice(&self) -> ColorChoice {
        match self.color_choice {
            CLI_Color_Choice::always => ColorChoice::Always,
            CLI_Color_Choice::auto => ColorChoice::Auto,
            CLI_Color_Choice::never => ColorChoice::Never,
        }
    }
}

// --------------------
// processing

/// Extract and print the queries.
fn run(args: &CLI_Args) -> anyhow::Result<()> {
    defn!();
    let config: ExtractConfig = args.extract_config();
    let utc_now: DateTime<Utc> = Utc::now();
    let (queries, summary): (Vec<Query>, SummaryQueryExtractor) = get_queries(&config, &utc_now)
        .with_context(|| format!("extracting queries from {:?}", config.logdir))?;

    let mut printer: PrinterQuery = PrinterQuery::new(args.color_choice(), args.tz_offset);
    for query in queries.iter() {
        printer
            .print_query(query)
            .context("printing to stdout")?;
    }
    if args.summary {
        print_summary(&summary);
    }
    defx!("printed {} queries", queries.len());

    Ok(())
}

pub fn main() -> ExitCode {
    if cfg!(debug_assertions) {
        stack_offset_set(Some(0));
    }
    defn!();

    let args: CLI_Args = CLI_Args::parse();
    defo!("args {:?}", args);
    log_level_set(LogLevel::from(args.loglevel));

    let exitcode: ExitCode = match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // always printed, regardless of --loglevel
            eprintln!("ERROR: {:#}", err);
            ExitCode::from(EXIT_ERR)
        }
    };
    defx!("exitcode {:?}", exitcode);

    exitcode
}

// --------------------
// tests
