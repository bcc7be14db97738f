//! GBFS flat file archive
//!
//! A GBFS archive bundles named binary blobs into a single file that can be
//! appended to a ROM image and read in place.
//!
//! # Format Overview
//!
//! - Magic: `PinEightGBFS\r\n\x1a\n` (16 bytes)
//! - Header: 32 bytes (magic, total length, directory offset, entry count,
//!   8 reserved bytes that must be zero)
//! - Directory: 32-byte records (24-byte zero-padded name, file length,
//!   absolute data offset)
//! - File data: contents back to back in directory order, no padding
//! - Integers: one byte order for the whole archive, big-endian by default
//!
//! # Usage
//!
//! ```rust
//! use gbfs_format::archive::{Archive, ArchiveBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let archive = ArchiveBuilder::new()
//!     .add_file("a", vec![0x01, 0x02])
//!     .add_file("bb", vec![])
//!     .build()?;
//!
//! let data = archive.build()?;
//!
//! let parsed = Archive::parse(&data)?;
//! assert_eq!(parsed.len(), 2);
//! assert_eq!(parsed.get("a").map(|e| e.contents.as_slice()), Some(&[0x01, 0x02][..]));
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod entry;
pub mod error;
pub mod file;
pub mod header;

// Re-export main types
pub use builder::ArchiveBuilder;
pub use entry::{ArchiveEntry, DirectoryEntry, validate_name};
pub use error::{GbfsError, Result};
pub use file::Archive;
pub use header::{
    ArchiveHeader, DIRECTORY_ENTRY_SIZE, FILENAME_LEN, GBFS_MAGIC, GBFS_RESERVED, HEADER_SIZE,
    MAX_ENTRIES,
};
