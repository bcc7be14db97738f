use super::{load_file, parse_archive, print_json};
use crate::{CommandContext, OutputFormat};
use anyhow::Result;
use gbfs_format::archive::{Archive, DirectoryEntry};
use serde::Serialize;
use std::path::Path;

/// One row of an archive listing
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct EntryInfo {
    pub index: usize,
    pub name: String,
    pub length: u32,
    pub offset: u32,
}

pub fn handle(archive_path: &Path, ctx: CommandContext) -> Result<()> {
    let data = load_file(archive_path)?;

    // Only list archives whose every entry can be read
    parse_archive(archive_path, &data, ctx.endian())?;
    let (_, records) = Archive::parse_directory_with_endian(&data, ctx.endian())?;
    let rows = entry_infos(&records)?;

    match ctx.format {
        OutputFormat::Text => {
            println!("{:>5}  {:>10}  {:>10}  name", "index", "offset", "length");
            for row in &rows {
                println!(
                    "{:>5}  {:>10}  {:>10}  {}",
                    row.index, row.offset, row.length, row.name
                );
            }
        }
        OutputFormat::Json => print_json(&rows, false)?,
        OutputFormat::JsonPretty => print_json(&rows, true)?,
    }

    Ok(())
}

/// Listing rows in directory order, with the data offsets stored in the file
pub fn entry_infos(records: &[DirectoryEntry]) -> Result<Vec<EntryInfo>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            Ok(EntryInfo {
                index,
                name: record.name()?,
                length: record.length,
                offset: record.data_offset,
            })
        })
        .collect()
}
