//! File I/O helpers.
//!
//! ## Compression Support
//!
//! Input files may carry one trailing compression suffix, which is
//! decoded transparently:
//! - Gzip (.gz)
//! - Bzip2 (.bz2)
//! - XZ (.xz)
//! - Zip (.zip) - first archive entry

mod decompress;
mod discover;

pub use decompress::{Compression, FileDecoder};
pub use discover::discover_files;
