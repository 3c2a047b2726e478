// src/debug/printers.rs

//! Printer macros for diagnostics on stderr, and a few helpers for test
//! and debug builds.
//!
//! Macros `e_err!`, `e_wrn!`, `e_inf!`, and `e_dbg!` print only when the
//! process-wide [`LogLevel`] allows it. The level is set once by the
//! driver program, see [`log_level_set`].
//!
//! Macro `de_err!` prints only in debug and test builds.

use std::sync::RwLock;

use ::lazy_static::lazy_static;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// log level
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity of a diagnostic message. Ordered from least to most severe.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Prefix printed before a message of this level.
    pub const fn prefix(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG: ",
            LogLevel::Info => "INFO: ",
            LogLevel::Warning => "WARNING: ",
            LogLevel::Error => "ERROR: ",
            LogLevel::Critical => "CRITICAL: ",
        }
    }
}

lazy_static! {
    /// Least severe level that is printed.
    static ref LOG_LEVEL_GLOBAL: RwLock<LogLevel> = RwLock::new(LogLevel::default());
}

/// Set the least severe level that is printed.
pub fn log_level_set(level: LogLevel) {
    match LOG_LEVEL_GLOBAL.write() {
        Ok(mut level_) => {
            *level_ = level;
        }
        Err(_err) => {
            crate::de_err!("LOG_LEVEL_GLOBAL.write() failed {:?}", _err);
        }
    }
}

/// The least severe level that is printed.
pub fn log_level() -> LogLevel {
    match LOG_LEVEL_GLOBAL.read() {
        Ok(level) => *level,
        Err(_) => LogLevel::default(),
    }
}

/// Would a message of `level` be printed?
pub fn log_level_enabled(level: LogLevel) -> bool {
    level >= log_level()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// printer macros
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `e`println! at a `LogLevel`
#[macro_export]
macro_rules! e_log {
    (
        $level:expr,
        $($args:tt)*
    ) => {
        {
            let level_: $crate::debug::printers::LogLevel = $level;
            if $crate::debug::printers::log_level_enabled(level_) {
                eprint!("{}", level_.prefix());
                eprintln!($($args)*)
            }
        }
    }
}
pub use e_log;

/// `e`println! an `err`or
#[macro_export]
macro_rules! e_err {
    (
        $($args:tt)*
    ) => {
        $crate::e_log!($crate::debug::printers::LogLevel::Error, $($args)*)
    }
}
pub use e_err;

/// `e`println! a `w`a`rn`ing
#[macro_export]
macro_rules! e_wrn {
    (
        $($args:tt)*
    ) => {
        $crate::e_log!($crate::debug::printers::LogLevel::Warning, $($args)*)
    }
}
pub use e_wrn;

/// `e`println! an `inf`o message
#[macro_export]
macro_rules! e_inf {
    (
        $($args:tt)*
    ) => {
        $crate::e_log!($crate::debug::printers::LogLevel::Info, $($args)*)
    }
}
pub use e_inf;

/// `e`println! a `d`e`b`u`g` message
#[macro_export]
macro_rules! e_dbg {
    (
        $($args:tt)*
    ) => {
        $crate::e_log!($crate::debug::printers::LogLevel::Debug, $($args)*)
    }
}
pub use e_dbg;

/// `d`ebug `e`println! an `err`or
#[macro_export]
macro_rules! de_err {
    (
        $($args:tt)*
    ) => {
        {
            #[cfg(any(debug_assertions,test))]
            eprint!("ERROR: ");
            #[cfg(any(debug_assertions,test))]
            eprintln!($($args)*)
        }
    }
}
pub use de_err;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Turn passed char into a pictoral representation for any control
/// character, e.g. `'\r'` becomes `'␍'`. Keeps the printing width of a
/// control character to 1.
///
/// only intended to aid visual debugging
pub const fn char_to_char_noraw(c: char) -> char {
    // https://en.wikipedia.org/wiki/C0_and_C1_control_codes#C0_controls
    match c as u32 {
        0 => '␀',
        7 => '␇',  // '\a'
        8 => '␈',  // '\b'
        9 => '␉',  // '\t'
        10 => '␊', // '\n'
        11 => '␋', // '\v'
        12 => '␌', // '\f'
        13 => '␍', // '\r'
        27 => '␛', // '\e'
        127 => '␡',
        _ => c,
    }
}

/// Transform `str` to a non-raw `String` version, see
/// [`char_to_char_noraw`].
///
/// only intended to aid visual debugging
#[allow(non_snake_case)]
pub fn str_to_String_noraw(str_buf: &str) -> String {
    str_buf.chars().map(char_to_char_noraw).collect()
}
