// src/readers/mod.rs

//! "Readers" for _hqelib_.
//!
//! ## Overview of readers
//!
//! * [`find_files_to_parse`] selects the log files of a time window.
//! * [`open_log_file`] opens one plain or compressed file as lines.
//! * A [`QueryExtractor`] drives a [`ThreadTracker`] with those lines.
//! * A `ThreadTracker` classifies each line with the [`lineclassifier`]
//!   and keeps one [`ParseRecord`] per worker until the worker's query
//!   ends.
//!
//! [`find_files_to_parse`]: crate::readers::filepreprocessor::find_files_to_parse
//! [`open_log_file`]: crate::readers::fileopener::open_log_file
//! [`QueryExtractor`]: crate::readers::queryextractor::QueryExtractor
//! [`ThreadTracker`]: crate::readers::threadtracker::ThreadTracker
//! [`lineclassifier`]: crate::readers::lineclassifier
//! [`ParseRecord`]: crate::data::query::ParseRecord

pub mod fileopener;
pub mod filepreprocessor;
pub mod helpers;
pub mod lineclassifier;
pub mod queryextractor;
pub mod summary;
pub mod threadtracker;
