// src/data/mod.rs

//! The `data` module is data containers and datetime handling.
//!
//! ## Definitions of data
//!
//! ### Time spec
//!
//! A "time spec" is a user-passed string for one end of a [`TimeWindow`],
//! e.g. `now`, `2024-01-02`, `2024-01-02 03:04:05`, or `15m`.
//!
//! ### Worker
//!
//! A "worker" is a HiveServer2 background-pool thread running a query, or
//! a handler-pool parse announcement, identified by a [`WorkerId`].
//!
//! ### ParseRecord
//!
//! A [`ParseRecord`] is what has been learned so far about the operation
//! of one worker. It lives only while the operation is open.
//!
//! ### Query
//!
//! A [`Query`] is the immutable result emitted when an operation ends,
//! fails, or is still open when the logs run out.
//!
//! [`TimeWindow`]: crate::data::datetime::TimeWindow
//! [`WorkerId`]: crate::data::query::WorkerId
//! [`ParseRecord`]: crate::data::query::ParseRecord
//! [`Query`]: crate::data::query::Query

pub mod datetime;
pub mod query;
