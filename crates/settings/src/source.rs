//! Reading a settings blob from an open source.
//!
//! The config compiler hands the blob over as an already-open file (or
//! pipe) positioned at its start. It is read into memory in one go and
//! decoded from there; the decoder itself never touches I/O.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::document::{decode, Document};
use crate::error::SourceError;
use crate::FilterValidator;

/// Default cap on the size of a settings blob (16 MiB).
pub const DEFAULT_MAX_BLOB_BYTES: u64 = 16 * 1024 * 1024;

/// Reads everything from `reader`, refusing sources over `limit` bytes.
///
/// # Errors
///
/// [`SourceError::TooLarge`] if the source holds more than `limit` bytes,
/// [`SourceError::Io`] if reading fails.
pub fn read_source<R: Read>(reader: R, limit: u64) -> Result<Vec<u8>, SourceError> {
    let mut data = Vec::new();
    reader.take(limit.saturating_add(1)).read_to_end(&mut data)?;
    if data.len() as u64 > limit {
        return Err(SourceError::TooLarge { limit });
    }
    Ok(data)
}

/// Reads `reader` to the end and decodes what it held.
pub fn decode_reader<R, V>(reader: R, limit: u64, validator: &V) -> Result<Document, SourceError>
where
    R: Read,
    V: FilterValidator + ?Sized,
{
    let data = read_source(reader, limit)?;
    Ok(decode(&data, validator)?)
}

/// Opens the blob at `path` and decodes it.
pub fn decode_file<P, V>(path: P, limit: u64, validator: &V) -> Result<Document, SourceError>
where
    P: AsRef<Path>,
    V: FilterValidator + ?Sized,
{
    let path = path.as_ref();
    debug!(path = %path.display(), "reading settings blob");
    let file = File::open(path)?;
    decode_reader(BufReader::new(file), limit, validator)
}
