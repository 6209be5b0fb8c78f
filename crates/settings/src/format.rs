//! Settings blob format constants and header read/write helpers.
//!
//! ## Header
//!
//! ```text
//! DOVECOT-CONFIG\t<major>.<minor>\n
//! ```
//!
//! Only version `1.0` is understood. The header is followed by the 8-byte
//! big-endian `full size` field, which counts every byte after itself.

use std::io::{Result as IoResult, Write};

use byteorder::{BigEndian, WriteBytesExt};

use crate::cursor::Cursor;
use crate::error::DecodeError;

/// Tag every settings blob starts with.
pub const CONFIG_TAG: &str = "DOVECOT-CONFIG";

/// The only version this decoder reads and the writer emits.
pub const CONFIG_VERSION: &str = "1.0";

/// Upper bound on the header line length, newline included. A buffer with
/// no newline within this many bytes is rejected without scanning further.
pub const MAX_HEADER_LINE: usize = 256;

/// Length of the header this crate writes: tag, tab, version, newline.
pub const HEADER_BYTES: usize = CONFIG_TAG.len() + 1 + CONFIG_VERSION.len() + 1;

/// Parses the header line and leaves `cursor` just past its newline.
///
/// # Errors
///
/// - [`DecodeError::BadHeader`] if there is no newline within
///   [`MAX_HEADER_LINE`] bytes or the line doesn't start with the tag and a tab.
/// - [`DecodeError::UnsupportedVersion`] if the version isn't `1.0`.
pub(crate) fn read_header(cursor: &mut Cursor<'_>) -> Result<(), DecodeError> {
    let start = cursor.clone();
    let line = cursor
        .read_until(b'\n', MAX_HEADER_LINE)
        .ok_or(DecodeError::BadHeader)?;

    let version = match line
        .strip_prefix(CONFIG_TAG.as_bytes())
        .and_then(|rest| rest.strip_prefix(b"\t"))
    {
        Some(version) => version,
        None => {
            *cursor = start;
            return Err(DecodeError::BadHeader);
        }
    };

    if version != CONFIG_VERSION.as_bytes() {
        *cursor = start;
        return Err(DecodeError::UnsupportedVersion {
            version: String::from_utf8_lossy(version).into_owned(),
        });
    }
    Ok(())
}

/// Writes the header line followed by the `full size` field.
pub fn write_header<W: Write>(w: &mut W, full_size: u64) -> IoResult<()> {
    w.write_all(CONFIG_TAG.as_bytes())?;
    w.write_u8(b'\t')?;
    w.write_all(CONFIG_VERSION.as_bytes())?;
    w.write_u8(b'\n')?;
    w.write_u64::<BigEndian>(full_size)?;
    Ok(())
}
