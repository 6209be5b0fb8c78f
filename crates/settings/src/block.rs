//! Block decoding.
//!
//! ```text
//! u64 block_size
//! cstring name
//! u64 base_settings_size | cstring base_settings_error
//! u64 filter_settings_size | cstring filter_string | cstring filter_error
//! ```
//!
//! Decoding is split in two so that the caller can look at the block name
//! (for duplicate detection) before the rest of the body is read.

use std::borrow::Cow;

use tracing::trace;

use crate::cursor::Cursor;
use crate::error::DecodeError;
use crate::segment::{BASE_SETTINGS, FILTER_SETTINGS};
use crate::FilterValidator;

const BLOCK_SIZE_FIELD: &str = "block size";
const BLOCK_NAME_FIELD: &str = "block name";

/// One named, filter-gated configuration scope.
///
/// All fields are the raw bytes found on the wire, without the NUL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Block {
    /// Block name. Unique within a document; may be empty.
    pub name: Vec<u8>,
    /// Error the compiler hit while building this block's settings. Empty
    /// when the settings compiled cleanly.
    pub base_settings_error: Vec<u8>,
    /// Event filter deciding where this block applies. Empty means always.
    pub filter_string: Vec<u8>,
    /// Error the compiler recorded for `filter_string`. When set, the filter
    /// was accepted without validation.
    pub filter_error: Vec<u8>,
}

impl Block {
    /// The name as text, with invalid UTF-8 replaced.
    #[must_use]
    pub fn name_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    /// The filter as text, with invalid UTF-8 replaced.
    #[must_use]
    pub fn filter_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.filter_string)
    }

    /// `true` if the block applies regardless of the runtime context.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.filter_string.is_empty()
    }

    /// `true` if the compiler recorded an error for the block's settings or
    /// its filter. Such errors are reported when the block is used, not at
    /// decode time.
    #[must_use]
    pub fn has_deferred_error(&self) -> bool {
        !self.base_settings_error.is_empty() || !self.filter_error.is_empty()
    }
}

/// A block whose name has been read but whose body hasn't.
pub(crate) struct PendingBlock<'a> {
    pub name: &'a [u8],
    body: Cursor<'a>,
}

/// Reads the block size, isolates the block body, and reads the name.
pub(crate) fn read_name<'a>(cursor: &mut Cursor<'a>) -> Result<PendingBlock<'a>, DecodeError> {
    let block_size = cursor.read_size(BLOCK_SIZE_FIELD)?;
    let mut body = cursor.sub_area(block_size, BLOCK_SIZE_FIELD)?;
    body.check_nul_terminated(BLOCK_NAME_FIELD)?;

    let name = body.read_cstring(BLOCK_NAME_FIELD)?;
    Ok(PendingBlock { name, body })
}

impl<'a> PendingBlock<'a> {
    /// Reads the two segments, validates the filter when the compiler left
    /// that to us, and checks that nothing is left over in the block.
    pub(crate) fn read_body<V>(mut self, validator: &V) -> Result<Block, DecodeError>
    where
        V: FilterValidator + ?Sized,
    {
        let [base_settings_error] = BASE_SETTINGS.decode(&mut self.body)?;
        let [filter_string, filter_error] = FILTER_SETTINGS.decode(&mut self.body)?;

        if filter_error.is_empty() && !filter_string.is_empty() {
            validate_filter(filter_string, validator)?;
        }
        self.body.finish(BLOCK_SIZE_FIELD)?;

        trace!(
            name = %String::from_utf8_lossy(self.name),
            end_offset = self.body.end(),
            "decoded settings block"
        );
        Ok(Block {
            name: self.name.to_vec(),
            base_settings_error: base_settings_error.to_vec(),
            filter_string: filter_string.to_vec(),
            filter_error: filter_error.to_vec(),
        })
    }
}

fn validate_filter<V>(filter: &[u8], validator: &V) -> Result<(), DecodeError>
where
    V: FilterValidator + ?Sized,
{
    let invalid = |detail: String| DecodeError::InvalidFilter {
        filter: String::from_utf8_lossy(filter).into_owned(),
        detail,
    };
    let text = std::str::from_utf8(filter)
        .map_err(|e| invalid(format!("event filter: invalid UTF-8: {}", e)))?;
    validator.validate(text).map_err(invalid)
}
