// src/printer/summary.rs

//! CLI option `--summary` printing functions.
//! Only used by `hqe.rs`.

use std::io::Write;

use crate::common::Count;
use crate::readers::summary::SummaryQueryExtractor;

const OPT_SUMMARY_PRINT_INDENT1: &str = "  ";
const OPT_SUMMARY_PRINT_INDENT2: &str = "    ";

/// `part` as a percentage of `whole`
fn percent64(
    part: Count,
    whole: Count,
) -> f64 {
    if whole == 0 {
        return 0.0;
    }

    (part as f64) / (whole as f64) * 100.0
}

/// Write the `--summary` statistics of an extraction run to `writer`.
pub fn write_summary<W: Write>(
    writer: &mut W,
    summary: &SummaryQueryExtractor,
) -> std::io::Result<()> {
    let indent1 = OPT_SUMMARY_PRINT_INDENT1;
    let indent2 = OPT_SUMMARY_PRINT_INDENT2;
    let lines: Count = summary.QueryExtractor_lines;

    writeln!(writer, "Summary:")?;
    writeln!(writer, "{}Files:", indent1)?;
    writeln!(writer, "{}opened                 : {}", indent2, summary.QueryExtractor_files_opened)?;
    writeln!(writer, "{}skipped                : {}", indent2, summary.QueryExtractor_files_skipped)?;
    writeln!(writer, "{}Lines:", indent1)?;
    writeln!(writer, "{}read                   : {}", indent2, lines)?;
    writeln!(writer, "{}timestamped            : {}", indent2, summary.QueryExtractor_lines_timestamped)?;
    writeln!(
        writer,
        "{}out of window          : {} ({:.1}%)",
        indent2,
        summary.QueryExtractor_lines_out_of_window,
        percent64(summary.QueryExtractor_lines_out_of_window, lines),
    )?;
    writeln!(writer, "{}continuation           : {}", indent2, summary.QueryExtractor_lines_continuation)?;
    writeln!(writer, "{}orphan                 : {}", indent2, summary.QueryExtractor_lines_orphan)?;
    writeln!(writer, "{}unmatched              : {}", indent2, summary.QueryExtractor_lines_unmatched)?;
    writeln!(writer, "{}background pool        : {}", indent2, summary.QueryExtractor_lines_background)?;
    writeln!(writer, "{}background unmatched   : {}", indent2, summary.QueryExtractor_lines_background_unmatched)?;
    writeln!(writer, "{}handler pool           : {}", indent2, summary.QueryExtractor_lines_handler)?;
    writeln!(writer, "{}handler unmatched      : {}", indent2, summary.QueryExtractor_lines_handler_unmatched)?;
    writeln!(writer, "{}FAILED without parse   : {}", indent2, summary.QueryExtractor_lines_failed_orphan)?;
    let unaccounted: Count = lines.saturating_sub(summary.lines_accounted());
    if unaccounted != 0 {
        writeln!(writer, "{}unaccounted            : {}", indent2, unaccounted)?;
    }
    writeln!(writer, "{}Records:", indent1)?;
    writeln!(writer, "{}opened                 : {}", indent2, summary.QueryExtractor_records_opened)?;
    writeln!(writer, "{}stored highest         : {}", indent2, summary.QueryExtractor_records_highest)?;
    writeln!(writer, "{}ended without query    : {}", indent2, summary.QueryExtractor_records_closed_without_query)?;
    writeln!(writer, "{}unresolved parses      : {}", indent2, summary.QueryExtractor_flush_handler_dropped)?;
    writeln!(writer, "{}open without command   : {}", indent2, summary.QueryExtractor_flush_opened_dropped)?;
    writeln!(writer, "{}Queries:", indent1)?;
    writeln!(writer, "{}Success                : {}", indent2, summary.QueryExtractor_queries_success)?;
    writeln!(writer, "{}Failed                 : {}", indent2, summary.QueryExtractor_queries_failed)?;
    writeln!(writer, "{}Running                : {}", indent2, summary.QueryExtractor_queries_running)?;
    writeln!(writer, "{}total                  : {}", indent2, summary.queries())?;

    Ok(())
}

/// Print the `--summary` statistics of an extraction run to stderr.
pub fn print_summary(summary: &SummaryQueryExtractor) {
    let stderr = std::io::stderr();
    let mut stderr_lock = stderr.lock();
    if let Err(_err) = write_summary(&mut stderr_lock, summary) {
        crate::de_err!("write_summary failed {}", _err);
    }
}
