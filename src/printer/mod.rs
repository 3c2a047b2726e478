// src/printer/mod.rs

//! The `printer` module is for printing the user-facing report of
//! [`Query`s], with an optionally colored status, and the `--summary`
//! statistics.
//!
//! [`Query`s]: crate::data::query::Query

pub mod printers;
pub mod summary;
