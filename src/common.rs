// src/common.rs
//
// common imports, type aliases, and other globals (avoids circular imports)

use std::fmt;
pub use std::fs::File;
pub use std::path::Path;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file-handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `F`ake `Path` or `F`ile `Path`
pub type FPath = String;

/// A general-purpose counting type
pub type Count = u64;

/// How the bytes of a log file are stored.
///
/// Decided by file name extension only; see [`FileType::from_path`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum FileType {
    /// plain text
    #[default]
    Plain,
    /// gzip compressed, `.gz`
    Gz,
    /// bzip2 compressed, `.bz2`
    Bz2,
    /// xz compressed, `.xz`
    Xz,
    /// lz4 frame compressed, `.lz4`
    Lz4,
}

impl FileType {
    /// Map the file name extension of `path` to a `FileType`.
    /// Unknown or missing extensions are `FileType::Plain`, rotated Hive
    /// logs are often named like `hiveserver2.log.2024-01-02`.
    pub fn from_path(path: &Path) -> FileType {
        let ext: String = match path.extension() {
            Some(ext) => ext.to_string_lossy().to_lowercase(),
            None => return FileType::Plain,
        };
        match ext.as_str() {
            "gz" | "gzip" => FileType::Gz,
            "bz2" => FileType::Bz2,
            "xz" => FileType::Xz,
            "lz4" => FileType::Lz4,
            _ => FileType::Plain,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// errors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Errors that end an extraction run.
///
/// Lines that do not match any known pattern, operations still open when
/// the logs run out, and parse announcements that never resolve are not
/// errors; they are counted in [`SummaryQueryExtractor`].
///
/// [`SummaryQueryExtractor`]: crate::readers::summary::SummaryQueryExtractor
#[derive(Debug)]
pub enum HqeError {
    /// A `--since` or `--to` value matched none of the time spec forms.
    InvalidTimeSpec(String),
    /// The file name pattern could not be compiled; `(pattern, reason)`.
    InvalidGlob(String, String),
    /// Enumerating, opening, decompressing, or reading a file failed.
    Io(FPath, std::io::Error),
}

impl fmt::Display for HqeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HqeError::InvalidTimeSpec(spec) => {
                write!(f, "Timestamp not recognised: {:?}", spec)
            }
            HqeError::InvalidGlob(pattern, reason) => {
                write!(f, "Bad file pattern {:?}: {}", pattern, reason)
            }
            HqeError::Io(path, err) => {
                write!(f, "{} for file {:?}", err, path)
            }
        }
    }
}

impl std::error::Error for HqeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HqeError::Io(_, err) => Some(err),
            _ => None,
        }
    }
}

/// `Result` for _hqelib_ functions that can end a run.
pub type ResultHqe<T> = std::result::Result<T, HqeError>;

/// Wrap a `std::io::Error` with the `path` it happened on.
pub fn err_from_err_path(
    error: std::io::Error,
    path: &FPath,
) -> HqeError {
    HqeError::Io(path.clone(), error)
}
