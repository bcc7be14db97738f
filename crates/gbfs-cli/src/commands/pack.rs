use crate::{CommandContext, PackArgs};
use anyhow::{Context, Result, bail};
use gbfs_format::archive::Archive;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

pub fn handle(args: PackArgs, ctx: CommandContext) -> Result<()> {
    let files = collect_inputs(&args.inputs)?;

    let mut archive = Archive::new();
    for path in &files {
        let name = entry_name(path, args.strip_extension)?;
        let contents =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        debug!(path = %path.display(), name = %name, bytes = contents.len(), "Packing file");

        archive
            .add_file(name, contents)
            .with_context(|| format!("Cannot add {} to the archive", path.display()))?;
    }

    let output = output_path(&args.output);
    let data = archive.build_with_endian(ctx.endian())?;
    std::fs::write(&output, &data)
        .with_context(|| format!("Could not open output file ({}) for writing", output.display()))?;

    info!(
        path = %output.display(),
        entries = archive.len(),
        bytes = data.len(),
        "Wrote GBFS archive"
    );
    println!(
        "Packed {} file(s) into {} ({} bytes)",
        archive.len(),
        output.display(),
        data.len()
    );

    Ok(())
}

/// Expand directories into their regular files, sorted by name
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry =
                    entry.with_context(|| format!("Failed to walk {}", input.display()))?;
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            bail!("Input {} does not exist", input.display());
        }
    }
    Ok(files)
}

/// Archive name for a file on disk
pub fn entry_name(path: &Path, strip_extension: bool) -> Result<String> {
    let name = if strip_extension {
        path.file_stem()
    } else {
        path.file_name()
    };

    name.and_then(|n| n.to_str())
        .map(str::to_string)
        .with_context(|| format!("{} has no usable file name", path.display()))
}

/// Output path with ".gbfs" appended when no extension was given
pub fn output_path(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension("gbfs")
    }
}
