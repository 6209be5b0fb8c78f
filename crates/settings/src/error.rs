//! Decode errors.
//!
//! Every structural or semantic failure is a [`DecodeError`] variant. The
//! rendered message always contains a stable substring identifying the
//! failing field (for example `'block name' points outside area`), so
//! consumers that only see text can still match on it.

use std::io;

use thiserror::Error;

/// The first failure encountered while decoding a settings blob.
///
/// Offsets are absolute byte positions in the decoded buffer. `end_offset`
/// is the bound of the area the field was read from and `file_size` is the
/// length of the whole buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The buffer does not begin with a complete `DOVECOT-CONFIG` line.
    #[error("File header doesn't begin with DOVECOT-CONFIG line")]
    BadHeader,

    /// The header line is well-formed but names a version we can't read.
    #[error("Unsupported config file version '{version}'")]
    UnsupportedVersion { version: String },

    /// A fixed-size integer field is cut short by its enclosing area.
    #[error(
        "Area too small when reading size of '{field}' \
         (offset={offset}, end_offset={end_offset}, file_size={file_size})"
    )]
    AreaTooSmall {
        field: &'static str,
        offset: u64,
        end_offset: u64,
        file_size: u64,
    },

    /// A declared size or a NUL-terminated string extends past its area.
    #[error(
        "'{field}' points outside area \
         (offset={offset}, end_offset={end_offset}, file_size={file_size})"
    )]
    PointsOutsideArea {
        field: &'static str,
        offset: u64,
        end_offset: u64,
        file_size: u64,
    },

    /// A block body whose last byte is not NUL.
    #[error("Settings block doesn't end with NUL at offset {offset} (reading '{field}')")]
    MissingTerminator { field: &'static str, offset: u64 },

    /// The declared `full size` disagrees with the number of bytes present.
    #[error("Full size mismatch: Expected {header_size} + {full_size}, but file size is {file_size}")]
    FullSizeMismatch {
        header_size: u64,
        full_size: u64,
        file_size: u64,
    },

    /// The filter validator rejected a filter the compiler didn't flag.
    #[error("Received invalid filter '{filter}': {detail}")]
    InvalidFilter { filter: String, detail: String },

    /// Two blocks share a name.
    #[error("Duplicate block name '{name}'")]
    DuplicateBlockName { name: String },

    /// An area was not consumed exactly by its fields.
    #[error(
        "{remaining} unused bytes at the end of '{area}' \
         (offset={offset}, end_offset={end_offset})"
    )]
    UnusedBytes {
        area: &'static str,
        remaining: u64,
        offset: u64,
        end_offset: u64,
    },
}

impl DecodeError {
    /// Name of the field the error is attached to, if any.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            DecodeError::AreaTooSmall { field, .. }
            | DecodeError::PointsOutsideArea { field, .. }
            | DecodeError::MissingTerminator { field, .. } => Some(*field),
            DecodeError::UnusedBytes { area, .. } => Some(*area),
            _ => None,
        }
    }
}

/// Errors from reading a source and decoding its contents.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Reading the source failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The source holds more than the configured limit.
    #[error("config source is larger than {limit} bytes")]
    TooLarge { limit: u64 },

    /// The bytes were read but don't decode.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
