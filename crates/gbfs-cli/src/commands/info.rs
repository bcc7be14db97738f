use super::{print_json, read_archive};
use crate::{CommandContext, OutputFormat};
use anyhow::Result;
use gbfs_format::archive::Archive;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct HeaderInfo {
    total_length: u32,
    directory_offset: u16,
    entry_count: u16,
    directory_end: u64,
    data_bytes: u64,
}

impl From<&Archive> for HeaderInfo {
    fn from(archive: &Archive) -> Self {
        Self {
            total_length: archive.total_length(),
            directory_offset: archive.directory_offset(),
            entry_count: archive.entry_count(),
            directory_end: archive.directory_end(),
            data_bytes: archive.serialized_len() - archive.directory_end(),
        }
    }
}

pub fn handle(archive_path: &Path, ctx: CommandContext) -> Result<()> {
    let archive = read_archive(archive_path, ctx.endian())?;
    let info = HeaderInfo::from(&archive);

    match ctx.format {
        OutputFormat::Text => {
            println!("Archive:          {}", archive_path.display());
            println!("Total length:     {}", info.total_length);
            println!("Directory offset: {}", info.directory_offset);
            println!("Entries:          {}", info.entry_count);
            println!("Directory end:    {}", info.directory_end);
            println!("Data bytes:       {}", info.data_bytes);
        }
        OutputFormat::Json => print_json(&info, false)?,
        OutputFormat::JsonPretty => print_json(&info, true)?,
    }

    Ok(())
}
