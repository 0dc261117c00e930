//! Error types for binary format parsing.

use thiserror::Error;

/// Broad failure category of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required section is absent.
    NotFound,
    /// The input is not a well-formed container.
    Format,
    /// The underlying stream failed.
    Io,
}

/// Error type for binary format parsing.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Invalid magic number at start of file.
    #[error("invalid magic number: expected {expected}, got {actual:02x?}")]
    InvalidMagic {
        expected: &'static str,
        actual: Vec<u8>,
    },

    /// File is too short to contain required data.
    #[error("file too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },

    /// Truncated data while parsing.
    #[error("truncated data: expected {expected} bytes, got {actual} while parsing {context}")]
    TruncatedData {
        expected: usize,
        actual: usize,
        context: &'static str,
    },

    /// Invalid value encountered during parsing.
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),

    /// Invalid section or table.
    #[error("invalid {kind} at offset {offset:#x}: {reason}")]
    InvalidStructure {
        kind: &'static str,
        offset: u64,
        reason: String,
    },

    /// Invalid string table index.
    #[error("invalid string table index: {index} (table size: {size})")]
    InvalidStringIndex { index: usize, size: usize },

    /// Section header index outside the section table.
    #[error("invalid section index: {index} (section count: {count})")]
    InvalidSectionIndex { index: usize, count: usize },

    /// Integer overflow during parsing.
    #[error("integer overflow while parsing {context}")]
    Overflow { context: &'static str },

    /// Named section does not exist.
    #[error("section not found: {name}")]
    SectionNotFound { name: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Creates a new InvalidMagic error.
    pub fn invalid_magic(expected: &'static str, actual: &[u8]) -> Self {
        Self::InvalidMagic {
            expected,
            actual: actual.to_vec(),
        }
    }

    /// Creates a new TooShort error.
    pub fn too_short(expected: usize, actual: usize) -> Self {
        Self::TooShort { expected, actual }
    }

    /// Creates a new InvalidStructure error.
    pub fn invalid_structure(kind: &'static str, offset: u64, reason: impl Into<String>) -> Self {
        Self::InvalidStructure {
            kind,
            offset,
            reason: reason.into(),
        }
    }

    /// Returns the failure category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SectionNotFound { .. } => ErrorKind::NotFound,
            Self::Io(_) => ErrorKind::Io,
            Self::InvalidMagic { .. }
            | Self::TooShort { .. }
            | Self::TruncatedData { .. }
            | Self::InvalidValue(_)
            | Self::InvalidStructure { .. }
            | Self::InvalidStringIndex { .. }
            | Self::InvalidSectionIndex { .. }
            | Self::Overflow { .. } => ErrorKind::Format,
        }
    }

    /// Returns true if a required section was absent.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
