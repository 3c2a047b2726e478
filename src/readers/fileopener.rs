// src/readers/fileopener.rs

//! The `fileopener` module opens a plain or compressed log file as a
//! stream of text lines.
//!
//! The compression is decided by file name extension, see
//! [`FileType::from_path`].

use std::io::{BufRead, BufReader, Cursor, Error, ErrorKind, Result};

// `bzip2_rs` is for bz2 files.
use ::bzip2_rs::DecoderReader as Bz2DecoderReader;
// `flate2` is for gzip files.
use ::flate2::read::MultiGzDecoder;
// `lz4_flex` is for lz4 files.
use ::lz4_flex::frame::FrameDecoder as Lz4FrameDecoder;
// `lzma_rs` is for xz files.
use ::lzma_rs;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

use crate::common::{err_from_err_path, File, FileType, FPath, Path, ResultHqe};

/// A boxed line-oriented reader of decompressed bytes.
pub type LogReader = Box<dyn BufRead>;

/// Open the file at `path` for reading, decompressing per its
/// [`FileType`].
///
/// A gzip file may hold several members, as written by `cat a.gz b.gz`;
/// all members are read.
///
/// An xz file is decompressed entirely into memory before the first line
/// is returned. The `lzma_rs` crate has no streaming reader.
pub fn open_log_file(path: &FPath) -> ResultHqe<LogReader> {
    defn!("({:?})", path);
    let filetype: FileType = FileType::from_path(Path::new(path));
    let file: File = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            defx!("File::open({:?}) error {}", path, err);
            return Err(err_from_err_path(err, path));
        }
    };
    let reader: LogReader = match filetype {
        FileType::Plain => Box::new(BufReader::new(file)),
        FileType::Gz => Box::new(BufReader::new(MultiGzDecoder::new(file))),
        FileType::Bz2 => Box::new(BufReader::new(Bz2DecoderReader::new(file))),
        FileType::Lz4 => Box::new(BufReader::new(Lz4FrameDecoder::new(file))),
        FileType::Xz => {
            let mut bufreader: BufReader<File> = BufReader::new(file);
            let mut buffer: Vec<u8> = Vec::new();
            if let Err(err) = lzma_rs::xz_decompress(&mut bufreader, &mut buffer) {
                defx!("xz_decompress({:?}) error {:?}", path, err);
                let err_io: Error = match err {
                    lzma_rs::error::Error::IoError(ioerr) => ioerr,
                    err_ => Error::new(ErrorKind::InvalidData, format!("xz decompress failed: {:?}", err_)),
                };
                return Err(err_from_err_path(err_io, path));
            }
            defo!("xz_decompress({:?}) {} bytes", path, buffer.len());
            Box::new(Cursor::new(buffer))
        }
    };
    defx!("({:?}) filetype {:?}", path, filetype);

    Ok(reader)
}

/// Read the next line from `reader` into `line`, replacing its previous
/// contents. Bytes that are not UTF-8 are replaced with `U+FFFD`. The line
/// ending, `"\n"` or `"\r\n"`, is removed.
///
/// Returns `Ok(false)` at end of stream.
pub fn read_line_lossy(
    reader: &mut dyn BufRead,
    buffer: &mut Vec<u8>,
    line: &mut String,
) -> Result<bool> {
    buffer.clear();
    line.clear();
    if reader.read_until(b'\n', buffer)? == 0 {
        return Ok(false);
    }
    if buffer.last() == Some(&b'\n') {
        buffer.pop();
        if buffer.last() == Some(&b'\r') {
            buffer.pop();
        }
    }
    line.push_str(&String::from_utf8_lossy(buffer));

    Ok(true)
}
