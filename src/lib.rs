// src/lib.rs

//! _hqelib_ reconstructs the queries a HiveServer2 ran during a time
//! window from its rotated, possibly compressed, log files.
//!
//! The driver program is `hqe`.

pub mod common;
pub mod data;
pub mod debug;
pub mod printer;
pub mod readers;
#[cfg(test)]
pub mod tests;
