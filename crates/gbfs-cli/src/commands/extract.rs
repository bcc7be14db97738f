use super::read_archive;
use crate::CommandContext;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Component, Path};
use tracing::{debug, warn};

pub fn handle(archive_path: &Path, dir: &Path, ctx: CommandContext) -> Result<()> {
    let archive = read_archive(archive_path, ctx.endian())?;

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut seen = HashSet::new();
    let mut written = 0usize;
    for entry in &archive {
        if !is_plain_file_name(&entry.name) {
            warn!(name = %entry.name, "Skipping entry whose name is not a plain file name");
            continue;
        }
        if !seen.insert(entry.name.as_str()) {
            warn!(name = %entry.name, "Skipping duplicate entry, the first one was extracted");
            continue;
        }

        let target = dir.join(&entry.name);
        std::fs::write(&target, &entry.contents)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        debug!(path = %target.display(), bytes = entry.len(), "Extracted entry");
        written += 1;
    }

    println!("Extracted {written} file(s) to {}", dir.display());
    Ok(())
}

/// Whether `name` is a single normal path component, spelled exactly as
/// the path parser would yield it back
fn is_plain_file_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}
