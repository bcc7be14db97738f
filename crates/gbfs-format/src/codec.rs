//! Fixed-width integer codec for GBFS header and directory fields
//!
//! The plain helpers use big-endian order: byte 0 holds the most significant
//! byte. The `*_with` variants take a [`binrw::Endian`] so an archive can be
//! read or written in the byte order its consumer expects. Every multi-byte
//! field of one archive uses the same order.

use crate::archive::error::{GbfsError, Result};
use binrw::{BinRead, BinWrite, Endian};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

/// Encode a `u32` as 4 big-endian bytes
pub const fn encode32(n: u32) -> [u8; 4] {
    n.to_be_bytes()
}

/// Encode a `u16` as 2 big-endian bytes
pub const fn encode16(n: u16) -> [u8; 2] {
    n.to_be_bytes()
}

/// Decode 4 big-endian bytes into a `u32`
pub const fn decode32(bytes: [u8; 4]) -> u32 {
    u32::from_be_bytes(bytes)
}

/// Decode 2 big-endian bytes into a `u16`
pub const fn decode16(bytes: [u8; 2]) -> u16 {
    u16::from_be_bytes(bytes)
}

/// Read a big-endian `u32` from the current stream position
pub fn read_u32<R: Read + Seek>(reader: &mut R) -> Result<u32> {
    read_u32_with(reader, Endian::Big)
}

/// Read a big-endian `u16` from the current stream position
pub fn read_u16<R: Read + Seek>(reader: &mut R) -> Result<u16> {
    read_u16_with(reader, Endian::Big)
}

/// Append a big-endian `u32` to the stream
pub fn write_u32<W: Write + Seek>(writer: &mut W, n: u32) -> Result<()> {
    write_u32_with(writer, n, Endian::Big)
}

/// Append a big-endian `u16` to the stream
pub fn write_u16<W: Write + Seek>(writer: &mut W, n: u16) -> Result<()> {
    write_u16_with(writer, n, Endian::Big)
}

/// Read a `u32` in the given byte order
pub fn read_u32_with<R: Read + Seek>(reader: &mut R, endian: Endian) -> Result<u32> {
    read_value(reader, endian)
}

/// Read a `u16` in the given byte order
pub fn read_u16_with<R: Read + Seek>(reader: &mut R, endian: Endian) -> Result<u16> {
    read_value(reader, endian)
}

/// Write a `u32` in the given byte order
pub fn write_u32_with<W: Write + Seek>(writer: &mut W, n: u32, endian: Endian) -> Result<()> {
    n.write_options(writer, endian, ())?;
    Ok(())
}

/// Write a `u16` in the given byte order
pub fn write_u16_with<W: Write + Seek>(writer: &mut W, n: u16, endian: Endian) -> Result<()> {
    n.write_options(writer, endian, ())?;
    Ok(())
}

/// Read exactly `N` bytes, reporting a short stream as `TruncatedInput`
pub(crate) fn read_array<R: Read + Seek, const N: usize>(reader: &mut R) -> Result<[u8; N]> {
    read_value(reader, Endian::Big)
}

/// Read one fixed-size value through binrw, turning end of stream into
/// `TruncatedInput` with the number of bytes that were left
fn read_value<R, T>(reader: &mut R, endian: Endian) -> Result<T>
where
    R: Read + Seek,
    T: for<'a> BinRead<Args<'a> = ()>,
{
    let start = reader.stream_position()?;
    match T::read_options(reader, endian, ()) {
        Ok(value) => Ok(value),
        Err(binrw::Error::Io(e)) if e.kind() == ErrorKind::UnexpectedEof => {
            let end = reader.seek(SeekFrom::End(0))?;
            Err(GbfsError::TruncatedInput {
                expected: size_of::<T>() as u64,
                actual: end.saturating_sub(start),
            })
        }
        Err(e) => Err(e.into()),
    }
}
