//! GBFS command-line tool library
//!
//! Reads files from disk, hands name and contents pairs to
//! [`gbfs_format::archive::Archive`], and writes the serialized archive in a
//! single file write. Also lists, inspects and extracts existing archives.

pub mod commands;

pub use crate::commands::{
    extract::handle as handle_extract, info::handle as handle_info, list::handle as handle_list,
    pack::handle as handle_pack,
};

use clap::{Args, Subcommand};
use gbfs_format::Endian;
use std::path::PathBuf;

/// Subcommands of the `gbfs` tool
#[derive(Subcommand)]
pub enum Commands {
    /// Pack files into a GBFS archive
    Pack(PackArgs),

    /// List the entries of an archive
    List {
        /// Archive to read
        archive: PathBuf,
    },

    /// Show the header fields of an archive
    Info {
        /// Archive to read
        archive: PathBuf,
    },

    /// Extract every entry of an archive into a directory
    Extract {
        /// Archive to read
        archive: PathBuf,

        /// Destination directory
        #[arg(short = 'd', long, default_value = ".")]
        dir: PathBuf,
    },
}

#[derive(Args, Clone, Debug)]
pub struct PackArgs {
    /// Output archive path (".gbfs" is appended when it has no extension)
    pub output: PathBuf,

    /// Files or directories to pack, in order
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Store entries under their file name without the extension
    #[arg(long)]
    pub strip_extension: bool,
}

/// Byte order of header and directory fields
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteOrder {
    /// Most significant byte first
    Big,
    /// Least significant byte first
    Little,
}

impl From<ByteOrder> for Endian {
    fn from(order: ByteOrder) -> Self {
        match order {
            ByteOrder::Big => Endian::Big,
            ByteOrder::Little => Endian::Little,
        }
    }
}

/// How listings and header summaries are printed
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON output
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

/// Context for command execution
#[derive(Clone, Copy, Debug)]
pub struct CommandContext {
    /// Byte order used to read and write archives
    pub byte_order: ByteOrder,
    /// Output format for listings
    pub format: OutputFormat,
}

impl CommandContext {
    /// Byte order as understood by the format crate
    pub fn endian(&self) -> Endian {
        self.byte_order.into()
    }
}
