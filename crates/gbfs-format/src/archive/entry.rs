//! Archive entries and their 32-byte directory records

use crate::archive::error::{GbfsError, Result};
use crate::archive::header::FILENAME_LEN;
use crate::codec;
use binrw::{BinRead, BinResult, BinWrite};
use std::io::{Read, Seek, Write};

/// One named file stored in an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Logical name, at most 24 bytes
    pub name: String,
    /// Raw file contents
    pub contents: Vec<u8>,
}

impl ArchiveEntry {
    /// Create a new entry, checking that the name can be stored
    pub fn new(name: impl Into<String>, contents: Vec<u8>) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            contents,
        })
    }

    /// Length of the contents in bytes
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Whether the entry has no contents
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

/// Check that a name fits the directory field and reads back unchanged
/// from the zero-padded field
pub fn validate_name(name: &str) -> Result<()> {
    if name.len() > FILENAME_LEN {
        return Err(GbfsError::NameTooLong {
            name: name.to_string(),
            len: name.len(),
        });
    }

    if name.bytes().any(|b| b == 0) {
        return Err(GbfsError::InvalidName(format!(
            "{name:?} contains a NUL byte"
        )));
    }

    Ok(())
}

/// Raw directory record as stored on disk
///
/// The name field is zero-padded and is not NUL-terminated when the name
/// uses all 24 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Zero-padded name field
    pub name: [u8; FILENAME_LEN],
    /// Length of the file data in bytes
    pub length: u32,
    /// Absolute offset of the file data from the archive start
    pub data_offset: u32,
}

impl DirectoryEntry {
    /// Build a record for `name`, zero-padding the name field
    pub fn new(name: &str, length: u32, data_offset: u32) -> Result<Self> {
        validate_name(name)?;

        let mut field = [0u8; FILENAME_LEN];
        field[..name.len()].copy_from_slice(name.as_bytes());

        Ok(Self {
            name: field,
            length,
            data_offset,
        })
    }

    /// Name bytes up to the first zero byte, or the whole field when the
    /// name uses all 24 bytes
    pub fn name_bytes(&self) -> &[u8] {
        let end = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(FILENAME_LEN);
        &self.name[..end]
    }

    /// Logical name recovered from the padded field
    pub fn name(&self) -> Result<String> {
        String::from_utf8(self.name_bytes().to_vec())
            .map_err(|e| GbfsError::InvalidName(format!("stored name is not UTF-8: {e}")))
    }

    /// Offset one past the last byte of the file data
    pub fn data_end(&self) -> u64 {
        u64::from(self.data_offset) + u64::from(self.length)
    }
}

impl BinRead for DirectoryEntry {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let pos = reader.stream_position()?;
        read_record(reader, endian).map_err(|e| e.into_binrw(pos))
    }
}

fn read_record<R: Read + Seek>(reader: &mut R, endian: binrw::Endian) -> Result<DirectoryEntry> {
    let name = codec::read_array::<R, FILENAME_LEN>(reader)?;
    let length = codec::read_u32_with(reader, endian)?;
    let data_offset = codec::read_u32_with(reader, endian)?;

    Ok(DirectoryEntry {
        name,
        length,
        data_offset,
    })
}

impl BinWrite for DirectoryEntry {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        let pos = writer.stream_position()?;
        write_record(self, writer, endian).map_err(|e| e.into_binrw(pos))
    }
}

fn write_record<W: Write + Seek>(
    record: &DirectoryEntry,
    writer: &mut W,
    endian: binrw::Endian,
) -> Result<()> {
    writer.write_all(&record.name)?;
    codec::write_u32_with(writer, record.length, endian)?;
    codec::write_u32_with(writer, record.data_offset, endian)?;
    Ok(())
}
