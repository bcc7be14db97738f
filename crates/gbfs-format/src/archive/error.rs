//! Error types for the GBFS archive format

use thiserror::Error;

/// Errors that can occur when parsing, mutating or building GBFS archives
#[derive(Debug, Error)]
pub enum GbfsError {
    /// The first 16 bytes are not the GBFS signature
    #[error("Invalid magic: expected 'PinEightGBFS', got {0:02x?}")]
    InvalidMagic([u8; 16]),

    /// Reserved header bytes are not zero (newer format revision or corruption)
    #[error("Unsupported archive version: reserved bytes are {0:02x?}")]
    UnsupportedVersion([u8; 8]),

    /// Input ends before a field or record is complete
    #[error("Truncated input: expected {expected} bytes, got {actual} bytes")]
    TruncatedInput {
        /// Number of bytes the field or record needs
        expected: u64,
        /// Number of bytes actually available
        actual: u64,
    },

    /// Entry name does not fit the 24-byte directory field
    #[error("Name '{name}' is {len} bytes long, the limit is 24")]
    NameTooLong {
        /// Rejected name
        name: String,
        /// Length of the name in bytes
        len: usize,
    },

    /// Entry name cannot be stored or recovered unambiguously
    #[error("Invalid entry name: {0}")]
    InvalidName(String),

    /// The 16-bit entry count would overflow
    #[error("Too many entries: {0} exceeds the limit of 65535")]
    TooManyEntries(usize),

    /// A length or offset would not fit the 32-bit fields
    #[error("Archive too large: {size} bytes does not fit a 32-bit length")]
    ArchiveTooLarge {
        /// Size in bytes the archive would reach
        size: u64,
    },

    /// Directory offset points inside the fixed header
    #[error("Invalid directory offset {0}: the directory cannot start inside the header")]
    InvalidDirectoryOffset(u16),

    /// Binary read error
    #[error("Binary parsing error: {0}")]
    BinRead(String),

    /// Binary write error
    #[error("Binary write error: {0}")]
    BinWrite(String),

    /// IO error during parsing or building
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GbfsError {
    /// Wrap this error so it can travel through a `binrw` read or write
    pub(crate) fn into_binrw(self, pos: u64) -> binrw::Error {
        binrw::Error::Custom {
            pos,
            err: Box::new(self),
        }
    }
}

impl From<binrw::Error> for GbfsError {
    fn from(e: binrw::Error) -> Self {
        match e {
            binrw::Error::Custom { err, .. } => match err.downcast::<Self>() {
                Ok(inner) => *inner,
                Err(other) => Self::BinRead(other.to_string()),
            },
            binrw::Error::Io(io) => Self::Io(io),
            other => Self::BinRead(other.to_string()),
        }
    }
}

/// Result type alias for GBFS archive operations
pub type Result<T> = std::result::Result<T, GbfsError>;
