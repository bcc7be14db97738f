//! Parser and builder for GBFS flat file archives
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::return_self_not_must_use)] // Builder patterns
#![allow(clippy::use_self)] // Type clarity
//! GBFS is the flat archive format used to bundle converted graphics and
//! data into a single file for resource-constrained handheld hardware. An
//! archive is a fixed header, a directory of fixed-size records, and the
//! file contents.
//!
//! # Modules
//!
//! - [`codec`]: fixed-width integer encode/decode and stream helpers
//! - [`archive`]: archive header, directory records, parser and builder
//!
//! # Design Principles
//!
//! - **Symmetric Operations**: Both parsing and building supported
//! - **Atomic Failures**: A failed parse yields nothing, a failed add leaves
//!   the archive unchanged
//! - **Round-Trip Guarantee**: parse(build(archive)) == archive

#![warn(missing_docs)]

pub mod archive;
pub mod codec;

/// Byte order selector used by the `*_with_endian` entry points
pub use binrw::Endian;

/// Common format trait for GBFS containers
pub trait GbfsFormat: Sized {
    /// Parse from bytes
    fn parse(data: &[u8]) -> Result<Self, Box<dyn std::error::Error>>;

    /// Build to bytes
    fn build(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>>;

    /// Verify round-trip correctness
    fn verify_round_trip(data: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
        let parsed = Self::parse(data)?;
        let rebuilt = parsed.build()?;
        if data != rebuilt.as_slice() {
            return Err("Round-trip verification failed".into());
        }
        Ok(())
    }
}
