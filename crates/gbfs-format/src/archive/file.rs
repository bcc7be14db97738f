//! In-memory GBFS archive

use crate::archive::entry::{ArchiveEntry, DirectoryEntry, validate_name};
use crate::archive::error::{GbfsError, Result};
use crate::archive::header::{
    ArchiveHeader, DIRECTORY_ENTRY_SIZE, GBFS_MAGIC, HEADER_SIZE, MAX_ENTRIES,
};
use binrw::{BinRead, BinWrite, Endian};
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use tracing::{debug, trace};

/// A GBFS archive: header fields plus entries in directory order
///
/// Binary layout: Header → Directory → File data
///
/// The header is kept consistent with the entries: `entry_count` always
/// equals the number of entries, and every `add_file` grows
/// `total_length` by one directory record plus the new contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    header: ArchiveHeader,
    entries: Vec<ArchiveEntry>,
}

impl Archive {
    /// Create an empty archive
    pub fn new() -> Self {
        Self {
            header: ArchiveHeader::new(),
            entries: Vec::new(),
        }
    }

    /// Parse a big-endian archive from binary data
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_with_endian(data, Endian::Big)
    }

    /// Parse an archive whose integer fields use the given byte order
    pub fn parse_with_endian(data: &[u8], endian: Endian) -> Result<Self> {
        let available = data.len() as u64;
        let (header, records) = Self::parse_directory_with_endian(data, endian)?;

        let mut entries = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let data_end = record.data_end();
            let contents = usize::try_from(record.data_offset)
                .ok()
                .zip(usize::try_from(data_end).ok())
                .and_then(|(start, end)| data.get(start..end))
                .ok_or(GbfsError::TruncatedInput {
                    expected: data_end,
                    actual: available,
                })?;

            let name = record.name()?;
            trace!(
                index,
                name = %name,
                length = record.length,
                offset = record.data_offset,
                "Read GBFS entry"
            );

            entries.push(ArchiveEntry {
                name,
                contents: contents.to_vec(),
            });
        }

        debug!(
            entries = entries.len(),
            total_length = header.total_length,
            directory_offset = header.directory_offset,
            "Parsed GBFS archive"
        );

        Ok(Self { header, entries })
    }

    /// Parse only the header and the directory records of a big-endian
    /// archive, leaving file data untouched
    pub fn parse_directory(data: &[u8]) -> Result<(ArchiveHeader, Vec<DirectoryEntry>)> {
        Self::parse_directory_with_endian(data, Endian::Big)
    }

    /// Parse the header and directory records in the given byte order
    ///
    /// The records keep the data offsets stored in the file, which need
    /// not match the back-to-back layout `build` writes.
    pub fn parse_directory_with_endian(
        data: &[u8],
        endian: Endian,
    ) -> Result<(ArchiveHeader, Vec<DirectoryEntry>)> {
        let available = data.len() as u64;

        if data.len() < HEADER_SIZE {
            // A foreign file is reported as such even when it is short
            if data.len() >= GBFS_MAGIC.len() && data[..GBFS_MAGIC.len()] != GBFS_MAGIC {
                let mut magic = [0u8; 16];
                magic.copy_from_slice(&data[..GBFS_MAGIC.len()]);
                return Err(GbfsError::InvalidMagic(magic));
            }
            return Err(GbfsError::TruncatedInput {
                expected: HEADER_SIZE as u64,
                actual: available,
            });
        }

        let mut cursor = Cursor::new(data);
        let header = ArchiveHeader::read_options(&mut cursor, endian, ())?;
        header.validate()?;

        let directory_end = header.directory_end();
        if directory_end > available {
            return Err(GbfsError::TruncatedInput {
                expected: directory_end,
                actual: available,
            });
        }

        cursor.seek(SeekFrom::Start(u64::from(header.directory_offset)))?;

        let records = (0..header.entry_count)
            .map(|_| DirectoryEntry::read_options(&mut cursor, endian, ()).map_err(GbfsError::from))
            .collect::<Result<Vec<_>>>()?;

        Ok((header, records))
    }

    /// Read a big-endian archive from a stream, consuming it to the end
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        Self::read_from_with_endian(reader, Endian::Big)
    }

    /// Read an archive in the given byte order from a stream
    pub fn read_from_with_endian<R: Read>(reader: &mut R, endian: Endian) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::parse_with_endian(&data, endian)
    }

    /// Append a named file
    ///
    /// The archive is left untouched when the name is longer than 24 bytes
    /// or contains a NUL byte, when the archive already holds 65535 entries,
    /// or when the new length would not fit in 32 bits.
    pub fn add_file(&mut self, name: impl Into<String>, contents: Vec<u8>) -> Result<()> {
        let name = name.into();
        validate_name(&name)?;

        if self.entries.len() >= MAX_ENTRIES {
            return Err(GbfsError::TooManyEntries(self.entries.len() + 1));
        }

        let grown = u64::from(self.header.total_length)
            + DIRECTORY_ENTRY_SIZE as u64
            + contents.len() as u64;
        let total_length =
            u32::try_from(grown).map_err(|_| GbfsError::ArchiveTooLarge { size: grown })?;

        trace!(name = %name, length = contents.len(), "Adding GBFS entry");

        self.header.total_length = total_length;
        self.header.entry_count += 1;
        self.entries.push(ArchiveEntry { name, contents });

        Ok(())
    }

    /// Serialize to big-endian binary data
    pub fn build(&self) -> Result<Vec<u8>> {
        self.build_with_endian(Endian::Big)
    }

    /// Serialize with the given byte order
    pub fn build_with_endian(&self, endian: Endian) -> Result<Vec<u8>> {
        self.header.validate()?;

        let size = self.serialized_len();
        let total_length = u32::try_from(size).map_err(|_| GbfsError::ArchiveTooLarge { size })?;
        let offsets = self.data_offsets()?;

        let records = self
            .entries
            .iter()
            .zip(&offsets)
            .map(|(entry, &offset)| {
                let length = u32::try_from(entry.len()).map_err(|_| GbfsError::ArchiveTooLarge {
                    size: entry.len() as u64,
                })?;
                DirectoryEntry::new(&entry.name, length, offset)
            })
            .collect::<Result<Vec<_>>>()?;

        let header = ArchiveHeader {
            total_length,
            ..self.header.clone()
        };

        let mut cursor = Cursor::new(Vec::with_capacity(size as usize));
        header.write_options(&mut cursor, endian, ())?;

        // Anything between the header and a larger declared directory offset
        let gap = usize::from(header.directory_offset) - HEADER_SIZE;
        cursor.write_all(&vec![0u8; gap])?;

        for record in &records {
            record.write_options(&mut cursor, endian, ())?;
        }

        for entry in &self.entries {
            cursor.write_all(&entry.contents)?;
        }

        debug!(
            entries = self.entries.len(),
            total_length, "Built GBFS archive"
        );

        Ok(cursor.into_inner())
    }

    /// Write the big-endian on-disk layout to a sink in a single write
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.write_to_with_endian(writer, Endian::Big)
    }

    /// Write the on-disk layout in the given byte order
    ///
    /// Nothing reaches the sink unless the whole archive serialized.
    pub fn write_to_with_endian<W: Write>(&self, writer: &mut W, endian: Endian) -> Result<()> {
        let data = self.build_with_endian(endian)?;
        writer.write_all(&data)?;
        Ok(())
    }

    /// The header as it stands, with the declared total length
    pub fn header(&self) -> &ArchiveHeader {
        &self.header
    }

    /// Declared total archive length
    pub fn total_length(&self) -> u32 {
        self.header.total_length
    }

    /// Offset of the first directory record
    pub fn directory_offset(&self) -> u16 {
        self.header.directory_offset
    }

    /// Number of entries as recorded in the header
    pub fn entry_count(&self) -> u16 {
        self.header.entry_count
    }

    /// Offset one past the last directory record
    pub fn directory_end(&self) -> u64 {
        self.header.directory_end()
    }

    /// Absolute data offset of each entry as `build` writes it
    pub fn data_offsets(&self) -> Result<Vec<u32>> {
        let mut next = self.directory_end();
        self.entries
            .iter()
            .map(|entry| {
                let offset =
                    u32::try_from(next).map_err(|_| GbfsError::ArchiveTooLarge { size: next })?;
                next += entry.len() as u64;
                Ok(offset)
            })
            .collect()
    }

    /// Exact length in bytes of the serialized archive
    pub fn serialized_len(&self) -> u64 {
        self.directory_end() + self.entries.iter().map(|e| e.len() as u64).sum::<u64>()
    }

    /// Entries in directory order
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Iterate over entries in directory order
    pub fn iter(&self) -> std::slice::Iter<'_, ArchiveEntry> {
        self.entries.iter()
    }

    /// Entry names in directory order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// First entry with the given name
    pub fn get(&self, name: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Entry at the given directory position
    pub fn get_nth(&self, index: usize) -> Option<&ArchiveEntry> {
        self.entries.get(index)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the archive, yielding its entries in directory order
    pub fn into_entries(self) -> Vec<ArchiveEntry> {
        self.entries
    }
}

impl Default for Archive {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a Archive {
    type Item = &'a ArchiveEntry;
    type IntoIter = std::slice::Iter<'a, ArchiveEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl crate::GbfsFormat for Archive {
    fn parse(data: &[u8]) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        Self::parse(data).map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    }

    fn build(&self) -> std::result::Result<Vec<u8>, Box<dyn std::error::Error>> {
        self.build()
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::GbfsFormat;
    use pretty_assertions::assert_eq;

    fn sample_archive() -> Archive {
        let mut archive = Archive::new();
        archive.add_file("a", vec![0x01, 0x02]).expect("add a");
        archive.add_file("bb", Vec::new()).expect("add bb");
        archive
    }

    fn raw_archive(directory_offset: u16, records: &[(&str, &[u8])]) -> Vec<u8> {
        let directory_end = usize::from(directory_offset) + records.len() * DIRECTORY_ENTRY_SIZE;
        let total = directory_end + records.iter().map(|(_, d)| d.len()).sum::<usize>();

        let mut data = Vec::new();
        data.extend_from_slice(&GBFS_MAGIC);
        data.extend_from_slice(&(total as u32).to_be_bytes());
        data.extend_from_slice(&directory_offset.to_be_bytes());
        data.extend_from_slice(&(records.len() as u16).to_be_bytes());
        data.extend_from_slice(&[0u8; 8]);
        data.resize(usize::from(directory_offset), 0);

        let mut offset = directory_end;
        for (name, contents) in records {
            let mut field = [0u8; 24];
            field[..name.len()].copy_from_slice(name.as_bytes());
            data.extend_from_slice(&field);
            data.extend_from_slice(&(contents.len() as u32).to_be_bytes());
            data.extend_from_slice(&(offset as u32).to_be_bytes());
            offset += contents.len();
        }
        for (_, contents) in records {
            data.extend_from_slice(contents);
        }
        data
    }

    #[test]
    fn test_new_archive_is_header_only() {
        let archive = Archive::new();
        assert_eq!(archive.entry_count(), 0);
        assert_eq!(archive.directory_offset(), 32);
        assert_eq!(archive.total_length(), 32);
        assert!(archive.is_empty());

        let data = archive.build().expect("Should build empty archive");
        assert_eq!(data.len(), HEADER_SIZE);

        let parsed = Archive::parse(&data).expect("Should parse empty archive");
        assert_eq!(parsed.len(), 0);
        assert_eq!(parsed, archive);
    }

    #[test]
    fn test_add_file_updates_header() {
        let archive = sample_archive();
        assert_eq!(archive.entry_count(), 2);
        assert_eq!(archive.total_length(), 32 + 32 + 2 + 32);
        assert_eq!(u64::from(archive.total_length()), archive.serialized_len());
    }

    #[test]
    fn test_two_entry_scenario() {
        let archive = sample_archive();
        let data = archive.build().expect("Should build");

        assert_eq!(&data[22..24], &[0x00, 0x02]);
        // first record: length 2 at offset 32 + 2 * 32
        assert_eq!(&data[32 + 24..32 + 28], &[0, 0, 0, 2]);
        assert_eq!(&data[32 + 28..32 + 32], &[0, 0, 0, 96]);
        // second record: empty, directly after the first file
        assert_eq!(&data[64 + 24..64 + 28], &[0, 0, 0, 0]);
        assert_eq!(&data[64 + 28..64 + 32], &[0, 0, 0, 98]);
        assert_eq!(&data[96..], &[0x01, 0x02]);

        let parsed = Archive::parse(&data).expect("Should parse");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.entries()[0].name, "a");
        assert_eq!(parsed.entries()[0].contents, vec![0x01, 0x02]);
        assert_eq!(parsed.entries()[1].name, "bb");
        assert!(parsed.entries()[1].contents.is_empty());
    }

    #[test]
    fn test_name_length_boundary() {
        let mut archive = Archive::new();
        archive
            .add_file("x".repeat(24), vec![1])
            .expect("24-byte name fits");

        let before = archive.clone();
        let result = archive.add_file("y".repeat(25), vec![1, 2, 3]);
        assert!(matches!(
            result,
            Err(GbfsError::NameTooLong { len: 25, .. })
        ));
        assert_eq!(archive, before);
        assert_eq!(archive.entry_count(), 1);
        assert_eq!(archive.total_length(), 32 + 32 + 1);
    }

    #[test]
    fn test_nul_in_name_rejected() {
        let mut archive = Archive::new();
        assert!(matches!(
            archive.add_file("a\0", vec![1]),
            Err(GbfsError::InvalidName(_))
        ));
        assert!(archive.is_empty());
    }

    #[test]
    fn test_entry_limit() {
        let mut archive = Archive::new();
        for i in 0..MAX_ENTRIES {
            archive.add_file(format!("{i}"), Vec::new()).expect("within limit");
        }
        assert_eq!(archive.entry_count(), u16::MAX);

        let before = archive.total_length();
        assert!(matches!(
            archive.add_file("overflow", Vec::new()),
            Err(GbfsError::TooManyEntries(65536))
        ));
        assert_eq!(archive.total_length(), before);
        assert_eq!(archive.len(), MAX_ENTRIES);
    }

    #[test]
    fn test_duplicate_names_kept_first_wins() {
        let mut archive = Archive::new();
        archive.add_file("dup", vec![1]).expect("first");
        archive.add_file("dup", vec![2]).expect("second");

        let parsed = Archive::parse(&archive.build().expect("build")).expect("parse");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.get("dup").expect("found").contents, vec![1]);
        assert_eq!(parsed.get_nth(1).expect("second").contents, vec![2]);
        assert!(parsed.get("missing").is_none());
    }

    #[test]
    fn test_parse_rejects_bad_magic() {
        let mut data = sample_archive().build().expect("build");
        data[0] = b'X';
        assert!(matches!(
            Archive::parse(&data),
            Err(GbfsError::InvalidMagic(_))
        ));

        // short foreign input is still reported as a magic mismatch
        assert!(matches!(
            Archive::parse(b"this is not a gbfs file"),
            Err(GbfsError::InvalidMagic(_))
        ));
    }

    #[test]
    fn test_parse_rejects_reserved_bytes() {
        let mut data = sample_archive().build().expect("build");
        data[31] = 1;
        assert!(matches!(
            Archive::parse(&data),
            Err(GbfsError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_parse_truncated_header() {
        assert!(matches!(
            Archive::parse(&GBFS_MAGIC[..10]),
            Err(GbfsError::TruncatedInput {
                expected: 32,
                actual: 10
            })
        ));
        assert!(matches!(
            Archive::parse(&GBFS_MAGIC),
            Err(GbfsError::TruncatedInput {
                expected: 32,
                actual: 16
            })
        ));
    }

    #[test]
    fn test_parse_truncated_directory() {
        let data = sample_archive().build().expect("build");
        assert!(matches!(
            Archive::parse(&data[..80]),
            Err(GbfsError::TruncatedInput {
                expected: 96,
                actual: 80
            })
        ));
    }

    #[test]
    fn test_parse_truncated_data() {
        let data = sample_archive().build().expect("build");
        assert!(matches!(
            Archive::parse(&data[..97]),
            Err(GbfsError::TruncatedInput {
                expected: 98,
                actual: 97
            })
        ));
    }

    #[test]
    fn test_parse_padded_directory() {
        let data = raw_archive(48, &[("pal", &[9, 8, 7]), ("map", &[6])]);
        let archive = Archive::parse(&data).expect("Should parse padded archive");

        assert_eq!(archive.directory_offset(), 48);
        assert_eq!(archive.directory_end(), 48 + 64);
        assert_eq!(archive.data_offsets().expect("offsets"), vec![112, 115]);
        assert_eq!(archive.get("pal").expect("pal").contents, vec![9, 8, 7]);

        let rebuilt = archive.build().expect("Should rebuild");
        assert_eq!(rebuilt, data);
    }

    #[test]
    fn test_parse_follows_recorded_offsets() {
        // data blocks stored in reverse order of the directory
        let mut data = Vec::new();
        data.extend_from_slice(&GBFS_MAGIC);
        data.extend_from_slice(&103u32.to_be_bytes());
        data.extend_from_slice(&32u16.to_be_bytes());
        data.extend_from_slice(&2u16.to_be_bytes());
        data.extend_from_slice(&[0u8; 8]);
        for (name, len, offset) in [("first", 2u32, 101u32), ("second", 5, 96)] {
            let mut field = [0u8; 24];
            field[..name.len()].copy_from_slice(name.as_bytes());
            data.extend_from_slice(&field);
            data.extend_from_slice(&len.to_be_bytes());
            data.extend_from_slice(&offset.to_be_bytes());
        }
        data.extend_from_slice(b"22222");
        data.extend_from_slice(b"11");

        let archive = Archive::parse(&data).expect("Should parse");
        assert_eq!(archive.entries()[0].contents, b"11");
        assert_eq!(archive.entries()[1].contents, b"22222");

        let (_, records) = Archive::parse_directory(&data).expect("Should parse directory");
        let offsets: Vec<u32> = records.iter().map(|r| r.data_offset).collect();
        assert_eq!(offsets, vec![101, 96]);
        // a rebuild lays the data out back to back again
        assert_eq!(archive.data_offsets().expect("offsets"), vec![96, 98]);
    }

    #[test]
    fn test_name_field_with_embedded_zero_rebuilds() {
        let mut data = raw_archive(32, &[("abxcd", &[7, 7])]);
        // name field "ab\0cd": everything from the first zero is padding
        data[HEADER_SIZE + 2] = 0;

        let archive = Archive::parse(&data).expect("Should parse");
        assert_eq!(archive.names().collect::<Vec<_>>(), vec!["ab"]);

        let rebuilt = archive.build().expect("Should rebuild");
        let reparsed = Archive::parse(&rebuilt).expect("Should parse rebuilt archive");
        assert_eq!(reparsed.entries(), archive.entries());
        assert_eq!(reparsed.get("ab").expect("ab").contents, vec![7, 7]);
    }

    #[test]
    fn test_parse_directory_keeps_recorded_offsets() {
        let archive = sample_archive();
        let data = archive.build().expect("build");

        let (header, records) = Archive::parse_directory(&data).expect("Should parse directory");
        assert_eq!(header.entry_count, 2);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name().expect("name"), "a");
        assert_eq!((records[0].length, records[0].data_offset), (2, 96));
        assert_eq!((records[1].length, records[1].data_offset), (0, 98));

        // file data is not needed to read the directory
        let (_, records) = Archive::parse_directory(&data[..96]).expect("Should parse directory");
        assert_eq!(records.len(), 2);
        assert!(Archive::parse(&data[..96]).is_err());
    }

    #[test]
    fn test_little_endian_round_trip() {
        let archive = sample_archive();
        let data = archive
            .build_with_endian(Endian::Little)
            .expect("Should build little-endian");

        assert_eq!(&data[22..24], &[0x02, 0x00]);

        let parsed =
            Archive::parse_with_endian(&data, Endian::Little).expect("Should parse little-endian");
        assert_eq!(parsed, archive);
    }

    #[test]
    fn test_write_to_matches_build() {
        let archive = sample_archive();
        let mut sink = Vec::new();
        archive.write_to(&mut sink).expect("Should write");
        assert_eq!(sink, archive.build().expect("Should build"));

        let parsed = Archive::read_from(&mut sink.as_slice()).expect("Should read");
        assert_eq!(parsed, archive);
    }

    #[test]
    fn test_lookup_helpers() {
        let archive = sample_archive();
        assert_eq!(archive.names().collect::<Vec<_>>(), vec!["a", "bb"]);
        assert_eq!(archive.iter().count(), 2);
        assert_eq!((&archive).into_iter().count(), 2);
        assert!(archive.get_nth(2).is_none());

        let entries = archive.into_entries();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_format_trait_round_trip() {
        let data = sample_archive().build().expect("build");
        let parsed = <Archive as GbfsFormat>::parse(&data).expect("GbfsFormat parse");
        let rebuilt = GbfsFormat::build(&parsed).expect("GbfsFormat build");
        assert_eq!(data, rebuilt);
        Archive::verify_round_trip(&data).expect("round trip");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn entry_name() -> impl Strategy<Value = String> {
            "[A-Za-z0-9_.-]{0,24}"
        }

        fn entries() -> impl Strategy<Value = Vec<(String, Vec<u8>)>> {
            prop::collection::vec(
                (entry_name(), prop::collection::vec(any::<u8>(), 0..256)),
                0..16,
            )
        }

        proptest! {
            #[test]
            fn archive_round_trip(files in entries()) {
                let mut archive = Archive::new();
                for (name, contents) in &files {
                    archive.add_file(name.clone(), contents.clone()).unwrap();
                }

                let data = archive.build().unwrap();
                prop_assert_eq!(data.len() as u64, archive.serialized_len());

                let parsed = Archive::parse(&data).unwrap();
                prop_assert_eq!(parsed.len(), files.len());
                for (entry, (name, contents)) in parsed.iter().zip(&files) {
                    prop_assert_eq!(&entry.name, name);
                    prop_assert_eq!(&entry.contents, contents);
                }
                prop_assert_eq!(parsed, archive);
            }

            #[test]
            fn recorded_offsets_point_at_contents(files in entries()) {
                let mut archive = Archive::new();
                for (name, contents) in &files {
                    archive.add_file(name.clone(), contents.clone()).unwrap();
                }
                let data = archive.build().unwrap();

                for (k, (_, contents)) in files.iter().enumerate() {
                    let base = HEADER_SIZE + k * DIRECTORY_ENTRY_SIZE;
                    let length = u32::from_be_bytes(data[base + 24..base + 28].try_into().unwrap()) as usize;
                    let offset = u32::from_be_bytes(data[base + 28..base + 32].try_into().unwrap()) as usize;
                    prop_assert_eq!(length, contents.len());
                    prop_assert_eq!(&data[offset..offset + length], contents.as_slice());
                }
            }
        }
    }
}
