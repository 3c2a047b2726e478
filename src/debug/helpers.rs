// src/debug/helpers.rs

//! Miscellaneous helper functions for testing; temporary log directories
//! and compressed log file contents.

use std::fs::{create_dir_all, File};
use std::io::{Cursor, Write};
use std::path::PathBuf;

use ::flate2::write::GzEncoder;
use ::flate2::Compression;
use ::si_trace_print::defñ;
#[doc(hidden)]
pub use ::tempfile::TempDir;

use crate::common::FPath;
use crate::readers::helpers::path_to_fpath;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// temporary file helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Temporary directories default to this name prefix.
pub const STR_TEMPFILE_PREFIX: &str = "tmp-hqe-test-";

/// Create a temporary directory
pub fn create_temp_dir() -> TempDir {
    defñ!();
    ::tempfile::Builder::new()
        .prefix(STR_TEMPFILE_PREFIX)
        .tempdir()
        .unwrap()
}

/// The `FPath` of a temporary directory.
pub fn tempdir_fpath(tempdir: &TempDir) -> FPath {
    path_to_fpath(tempdir.path())
}

/// Testing helper function to write a `[u8]` to a file in a temporary
/// directory. Will create leading directories in paths, e.g. `name` value
/// `foo/bar` creates directory `foo` and file `bar`.
///
/// Returns the path of the new file.
pub fn create_file_bytes_name_in_tmpdir(
    data: &[u8],
    name: &str,
    tempdir: &TempDir,
) -> FPath {
    let pathb: PathBuf = tempdir.path().join(name);
    if let Some(parent) = pathb.parent() {
        create_dir_all(parent).unwrap();
    }
    defñ!("File::create({:?})", pathb);
    let mut file: File = File::create(&pathb).unwrap();
    file.write_all(data).unwrap();

    path_to_fpath(pathb.as_path())
}

/// Create a temporary directory holding files of `(name, data)`.
pub fn create_files_in_tmpdir(files: &[(&str, &[u8])]) -> TempDir {
    let tempdir: TempDir = create_temp_dir();
    for (name, data) in files.iter() {
        create_file_bytes_name_in_tmpdir(data, name, &tempdir);
    }

    tempdir
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// compression helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `data` as one gzip member.
pub fn gz_bytes(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();

    encoder.finish().unwrap()
}

/// `data` as an xz stream.
pub fn xz_bytes(data: &[u8]) -> Vec<u8> {
    let mut output: Vec<u8> = Vec::new();
    ::lzma_rs::xz_compress(&mut Cursor::new(data), &mut output).unwrap();

    output
}

/// `data` as an lz4 frame.
pub fn lz4_bytes(data: &[u8]) -> Vec<u8> {
    let mut encoder = ::lz4_flex::frame::FrameEncoder::new(Vec::new());
    encoder.write_all(data).unwrap();

    encoder.finish().unwrap()
}
