//! Top-level decoding driver.

use std::collections::btree_map::{self, BTreeMap, Entry};

use tracing::debug;

use crate::block::{self, Block};
use crate::cursor::Cursor;
use crate::error::DecodeError;
use crate::format::read_header;
use crate::FilterValidator;

/// A fully decoded and validated settings blob.
///
/// Blocks are keyed by name and iterate in ascending byte order of their
/// names. Once decoded, a document can't be modified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    full_size: u64,
    blocks: BTreeMap<Vec<u8>, Block>,
}

impl Document {
    /// The `full size` field: number of bytes after it in the blob.
    #[must_use]
    pub fn full_size(&self) -> u64 {
        self.full_size
    }

    /// Looks up a block by name.
    #[must_use]
    pub fn get(&self, name: &[u8]) -> Option<&Block> {
        self.blocks.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterates over all blocks in name order.
    pub fn blocks(&self) -> btree_map::Values<'_, Vec<u8>, Block> {
        self.blocks.values()
    }

    /// Hands the block map over to the caller.
    #[must_use]
    pub fn into_blocks(self) -> BTreeMap<Vec<u8>, Block> {
        self.blocks
    }
}

impl<'d> IntoIterator for &'d Document {
    type Item = &'d Block;
    type IntoIter = btree_map::Values<'d, Vec<u8>, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks()
    }
}

/// Decodes a complete settings blob.
///
/// Structure is checked first (header, `full size` against the real length,
/// then each block in turn). Filters that the compiler didn't already mark
/// as broken are passed to `validator`. The first problem aborts decoding.
///
/// # Errors
///
/// Returns the first [`DecodeError`] encountered; see its variants for the
/// conditions.
pub fn decode<V>(data: &[u8], validator: &V) -> Result<Document, DecodeError>
where
    V: FilterValidator + ?Sized,
{
    let mut cursor = Cursor::new(data);
    read_header(&mut cursor)?;

    let full_size = cursor.read_u64_be("full size")?;
    let header_size = cursor.offset() as u64;
    if full_size != cursor.remaining() as u64 {
        return Err(DecodeError::FullSizeMismatch {
            header_size,
            full_size,
            file_size: cursor.file_size(),
        });
    }

    let mut blocks = BTreeMap::new();
    while !cursor.is_empty() {
        let pending = block::read_name(&mut cursor)?;
        // Duplicates are rejected as soon as the name is known.
        let slot = match blocks.entry(pending.name.to_vec()) {
            Entry::Occupied(_) => {
                return Err(DecodeError::DuplicateBlockName {
                    name: String::from_utf8_lossy(pending.name).into_owned(),
                })
            }
            Entry::Vacant(slot) => slot,
        };
        slot.insert(pending.read_body(validator)?);
    }

    debug!(
        blocks = blocks.len(),
        full_size,
        file_size = data.len(),
        "decoded settings blob"
    );
    Ok(Document { full_size, blocks })
}
