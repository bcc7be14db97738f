pub mod extract;
pub mod info;
pub mod list;
pub mod pack;

use anyhow::{Context, Result};
use gbfs_format::Endian;
use gbfs_format::archive::Archive;
use std::path::Path;
use tracing::debug;

/// Load and parse an archive file, failing with a user-facing message
pub(crate) fn read_archive(path: &Path, endian: Endian) -> Result<Archive> {
    let data = load_file(path)?;
    parse_archive(path, &data, endian)
}

/// Read the raw bytes of an archive file
pub(crate) fn load_file(path: &Path) -> Result<Vec<u8>> {
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    debug!(path = %path.display(), bytes = data.len(), "Loaded archive file");
    Ok(data)
}

/// Parse archive bytes loaded from `path`
pub(crate) fn parse_archive(path: &Path, data: &[u8], endian: Endian) -> Result<Archive> {
    Archive::parse_with_endian(data, endian)
        .with_context(|| format!("{} is not a valid GBFS archive", path.display()))
}

/// Print a serializable value as JSON
pub(crate) fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{output}");
    Ok(())
}
