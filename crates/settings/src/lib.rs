//! # Settings - binary settings blob decoder
//!
//! Decodes the binary configuration blob produced by the config compiler
//! into a [`Document`]: a duplicate-free map of named settings blocks. The
//! producer is not trusted. Every length is bounds-checked before use, and
//! failures name the field that was broken.
//!
//! ## File layout (v1.0)
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │ HEADER   "DOVECOT-CONFIG\t1.0\n"                              │
//! ├───────────────────────────────────────────────────────────────┤
//! │ full_size (u64 BE)   bytes following this field               │
//! ├───────────────────────────────────────────────────────────────┤
//! │ BLOCK (repeated until full_size is consumed)                  │
//! │                                                               │
//! │ block_size (u64)                                              │
//! │ name\0                                                        │
//! │ base_settings_size (u64) | base_settings_error\0              │
//! │ filter_settings_size (u64) | filter_string\0 | filter_error\0 │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! All integers are big-endian. Strings are NUL-terminated bytes and need
//! not be UTF-8.
//!
//! ## Errors
//!
//! Decoding stops at the first problem and returns a [`DecodeError`] whose
//! message contains a stable field-identifying substring, for example
//! `Area too small when reading size of 'block size'`.
//!
//! ## Example
//!
//! ```rust
//! use settings::{decode, AcceptAll, BlobWriter};
//!
//! let blob = BlobWriter::new()
//!     .block("imap", "", "protocol=imap", "")
//!     .to_bytes()
//!     .unwrap();
//! let doc = decode(&blob, &AcceptAll).unwrap();
//! assert_eq!(doc.len(), 1);
//! assert!(doc.get(b"imap").is_some());
//! ```

mod block;
mod cursor;
mod document;
mod error;
mod format;
mod segment;
mod source;
mod writer;

pub use block::Block;
pub use document::{decode, Document};
pub use error::{DecodeError, SourceError};
pub use format::{write_header, CONFIG_TAG, CONFIG_VERSION, HEADER_BYTES, MAX_HEADER_LINE};
pub use source::{decode_file, decode_reader, read_source, DEFAULT_MAX_BLOB_BYTES};
pub use writer::BlobWriter;

/// Checks event filter expressions found in the blob.
///
/// Called once per block whose filter the compiler did not already flag as
/// broken. Implementations should be pure; the decoder may call them from
/// any thread through a shared reference.
pub trait FilterValidator {
    /// Returns `Err(detail)` if `filter` is not a valid expression.
    fn validate(&self, filter: &str) -> Result<(), String>;
}

impl<F> FilterValidator for F
where
    F: Fn(&str) -> Result<(), String>,
{
    fn validate(&self, filter: &str) -> Result<(), String> {
        self(filter)
    }
}

/// Validator that accepts every filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl FilterValidator for AcceptAll {
    fn validate(&self, _filter: &str) -> Result<(), String> {
        Ok(())
    }
}

#[cfg(test)]
mod tests;
