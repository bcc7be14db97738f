//! Builder for constructing GBFS archives

use crate::archive::error::Result;
use crate::archive::file::Archive;

/// Builder for constructing `Archive` instances
///
/// Files are collected in call order and applied through
/// [`Archive::add_file`] at build time, so the first invalid file aborts
/// the build.
#[derive(Debug, Default)]
pub struct ArchiveBuilder {
    files: Vec<(String, Vec<u8>)>,
}

impl ArchiveBuilder {
    /// Create a new builder with no files
    #[must_use]
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Add a named file
    #[must_use]
    pub fn add_file(mut self, name: impl Into<String>, contents: Vec<u8>) -> Self {
        self.files.push((name.into(), contents));
        self
    }

    /// Add every (name, contents) pair from an iterator
    #[must_use]
    pub fn add_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: Into<String>,
    {
        self.files
            .extend(files.into_iter().map(|(name, contents)| (name.into(), contents)));
        self
    }

    /// Number of files collected so far
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no files have been collected
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Build the final `Archive`
    pub fn build(self) -> Result<Archive> {
        let mut archive = Archive::new();
        for (name, contents) in self.files {
            archive.add_file(name, contents)?;
        }
        Ok(archive)
    }
}
