//! Fixed 32-byte GBFS archive header
//!
//! ```text
//! offset  size  field
//!      0    16  magic "PinEightGBFS\r\n\x1a\n"
//!     16     4  total archive length
//!     20     2  directory offset
//!     22     2  entry count
//!     24     8  reserved, all zero
//! ```

use crate::archive::error::{GbfsError, Result};
use crate::codec;
use binrw::{BinRead, BinResult, BinWrite};
use std::io::{Read, Seek, Write};

/// Signature at the start of every archive
pub const GBFS_MAGIC: [u8; 16] = *b"PinEightGBFS\r\n\x1a\n";

/// Reserved bytes of the current format revision
pub const GBFS_RESERVED: [u8; 8] = [0; 8];

/// Size of the fixed header in bytes
pub const HEADER_SIZE: usize = 32;

/// Size of one directory record in bytes (24 name + 4 length + 4 offset)
pub const DIRECTORY_ENTRY_SIZE: usize = 32;

/// Width of the name field in a directory record
pub const FILENAME_LEN: usize = 24;

/// Largest entry count the 16-bit field can hold
pub const MAX_ENTRIES: usize = u16::MAX as usize;

/// GBFS archive header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveHeader {
    /// Signature bytes
    pub magic: [u8; 16],
    /// Total archive length in bytes, as declared
    pub total_length: u32,
    /// Offset from archive start to the first directory record
    pub directory_offset: u16,
    /// Number of directory records
    pub entry_count: u16,
    /// Reserved for future revisions, must be zero
    pub reserved: [u8; 8],
}

impl ArchiveHeader {
    /// Header of an archive with no files: the directory starts right after
    /// the header and the archive is the header alone
    pub fn new() -> Self {
        Self {
            magic: GBFS_MAGIC,
            total_length: HEADER_SIZE as u32,
            directory_offset: HEADER_SIZE as u16,
            entry_count: 0,
            reserved: GBFS_RESERVED,
        }
    }

    /// Offset one past the last directory record
    pub fn directory_end(&self) -> u64 {
        u64::from(self.directory_offset) + u64::from(self.entry_count) * DIRECTORY_ENTRY_SIZE as u64
    }

    /// Check the signature, the reserved bytes and the directory position
    pub fn validate(&self) -> Result<()> {
        if self.magic != GBFS_MAGIC {
            return Err(GbfsError::InvalidMagic(self.magic));
        }

        if self.reserved != GBFS_RESERVED {
            return Err(GbfsError::UnsupportedVersion(self.reserved));
        }

        if usize::from(self.directory_offset) < HEADER_SIZE {
            return Err(GbfsError::InvalidDirectoryOffset(self.directory_offset));
        }

        Ok(())
    }
}

impl Default for ArchiveHeader {
    fn default() -> Self {
        Self::new()
    }
}

impl BinRead for ArchiveHeader {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let pos = reader.stream_position()?;
        read_header(reader, endian).map_err(|e| e.into_binrw(pos))
    }
}

fn read_header<R: Read + Seek>(reader: &mut R, endian: binrw::Endian) -> Result<ArchiveHeader> {
    let magic = codec::read_array::<R, 16>(reader)?;
    let total_length = codec::read_u32_with(reader, endian)?;
    let directory_offset = codec::read_u16_with(reader, endian)?;
    let entry_count = codec::read_u16_with(reader, endian)?;
    let reserved = codec::read_array::<R, 8>(reader)?;

    Ok(ArchiveHeader {
        magic,
        total_length,
        directory_offset,
        entry_count,
        reserved,
    })
}

impl BinWrite for ArchiveHeader {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        let pos = writer.stream_position()?;
        write_header(self, writer, endian).map_err(|e| e.into_binrw(pos))
    }
}

fn write_header<W: Write + Seek>(
    header: &ArchiveHeader,
    writer: &mut W,
    endian: binrw::Endian,
) -> Result<()> {
    writer.write_all(&header.magic)?;
    codec::write_u32_with(writer, header.total_length, endian)?;
    codec::write_u16_with(writer, header.directory_offset, endian)?;
    codec::write_u16_with(writer, header.entry_count, endian)?;
    writer.write_all(&header.reserved)?;
    Ok(())
}
