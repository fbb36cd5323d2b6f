//! Compression detection and decompression support.
//!
//! Compression is recognised from the file name suffix (`data.csv.gz`),
//! and `FileDecoder` wraps the matching decoder behind a single `Read`
//! implementation using enum dispatch.

use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::Path;

use bzip2::read::BzDecoder;
use flate2::read::MultiGzDecoder;
use xz2::read::XzDecoder;

use crate::error::LoadError;

/// Compression format of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// No compression
    None,
    /// Gzip (.gz)
    Gzip,
    /// Bzip2 (.bz2)
    Bzip2,
    /// XZ/LZMA (.xz)
    Xz,
    /// Zip archive (.zip), first entry only
    Zip,
}

impl Compression {
    /// Match a file name suffix (without the dot) against known compressors.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "gz" => Some(Compression::Gzip),
            "bz2" => Some(Compression::Bzip2),
            "xz" => Some(Compression::Xz),
            "zip" => Some(Compression::Zip),
            _ => None,
        }
    }

    /// Get the file suffix for this compression format.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            Compression::None => None,
            Compression::Gzip => Some("gz"),
            Compression::Bzip2 => Some("bz2"),
            Compression::Xz => Some("xz"),
            Compression::Zip => Some("zip"),
        }
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.extension() {
            Some(ext) => write!(f, "{ext}"),
            None => write!(f, "none"),
        }
    }
}

/// File-based decoder that wraps various decompression formats.
pub enum FileDecoder {
    /// No compression - direct file access
    None(File),

    /// Gzip decompression (multi-member aware)
    Gzip(MultiGzDecoder<File>),

    /// Bzip2 decompression
    Bzip2(BzDecoder<File>),

    /// XZ/LZMA decompression
    Xz(XzDecoder<File>),

    /// First entry of a zip archive, inflated into memory
    Zip(Cursor<Vec<u8>>),
}

impl FileDecoder {
    /// Open `path` and wrap it in the decoder for `compression`.
    pub fn open<P: AsRef<Path>>(path: P, compression: Compression) -> Result<Self, LoadError> {
        let file = File::open(path.as_ref())?;
        Self::new(file, compression)
    }

    /// Create a decoder for the given file with explicit compression format.
    pub fn new(file: File, compression: Compression) -> Result<Self, LoadError> {
        match compression {
            Compression::None => Ok(FileDecoder::None(file)),
            Compression::Gzip => Ok(FileDecoder::Gzip(MultiGzDecoder::new(file))),
            Compression::Bzip2 => Ok(FileDecoder::Bzip2(BzDecoder::new(file))),
            Compression::Xz => Ok(FileDecoder::Xz(XzDecoder::new(file))),
            Compression::Zip => {
                let mut archive = zip::ZipArchive::new(file)?;
                if archive.len() == 0 {
                    return Err(LoadError::Archive {
                        reason: "zip archive has no entries".to_string(),
                    });
                }
                let mut entry = archive.by_index(0)?;
                let mut data = Vec::with_capacity(entry.size() as usize);
                entry.read_to_end(&mut data)?;
                Ok(FileDecoder::Zip(Cursor::new(data)))
            }
        }
    }

    /// Read the whole decompressed stream into memory.
    pub fn into_bytes(mut self) -> io::Result<Vec<u8>> {
        let mut data = Vec::new();
        self.read_to_end(&mut data)?;
        Ok(data)
    }
}

impl Read for FileDecoder {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            FileDecoder::None(r) => r.read(buf),
            FileDecoder::Gzip(r) => r.read(buf),
            FileDecoder::Bzip2(r) => r.read(buf),
            FileDecoder::Xz(r) => r.read(buf),
            FileDecoder::Zip(r) => r.read(buf),
        }
    }
}
