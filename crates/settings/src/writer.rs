use std::fs::{rename, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use byteorder::{BigEndian, WriteBytesExt};

use crate::block::Block;
use crate::cursor::SIZE_FIELD_BYTES;
use crate::format::write_header;

/// Encodes blocks into a settings blob.
///
/// Blocks are written in insertion order. The writer does not check names
/// for uniqueness, so it can also produce blobs the decoder must reject.
/// Fields are NUL-terminated on the wire, so a field containing NUL fails
/// the write with [`io::ErrorKind::InvalidInput`].
#[derive(Debug, Clone, Default)]
pub struct BlobWriter {
    blocks: Vec<Block>,
}

impl BlobWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a block.
    pub fn push(&mut self, block: Block) -> &mut Self {
        self.blocks.push(block);
        self
    }

    /// Appends a block built from its four fields.
    pub fn block(
        &mut self,
        name: impl Into<Vec<u8>>,
        base_settings_error: impl Into<Vec<u8>>,
        filter_string: impl Into<Vec<u8>>,
        filter_error: impl Into<Vec<u8>>,
    ) -> &mut Self {
        self.push(Block {
            name: name.into(),
            base_settings_error: base_settings_error.into(),
            filter_string: filter_string.into(),
            filter_error: filter_error.into(),
        })
    }

    /// Value of the `full size` field for the current blocks.
    #[must_use]
    pub fn full_size(&self) -> u64 {
        self.blocks
            .iter()
            .map(|b| (SIZE_FIELD_BYTES + block_size(b)) as u64)
            .sum()
    }

    /// Writes the complete blob: header, `full size`, then every block.
    ///
    /// ```text
    /// [block_size][name\0][base_size][base_error\0][filter_size][filter\0][filter_error\0]
    /// ```
    ///
    /// Nothing is written if any field contains NUL.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.blocks.iter().try_for_each(check_fields)?;
        write_header(w, self.full_size())?;
        for block in &self.blocks {
            let base_size = block.base_settings_error.len() + 1;
            let filter_size = block.filter_string.len() + 1 + block.filter_error.len() + 1;

            w.write_u64::<BigEndian>(block_size(block) as u64)?;
            write_cstring(w, &block.name)?;
            w.write_u64::<BigEndian>(base_size as u64)?;
            write_cstring(w, &block.base_settings_error)?;
            w.write_u64::<BigEndian>(filter_size as u64)?;
            write_cstring(w, &block.filter_string)?;
            write_cstring(w, &block.filter_error)?;
        }
        Ok(())
    }

    /// The encoded blob as a byte vector.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Writes the blob to `path` through a temporary file that is synced and
    /// then renamed into place, so readers never see a partial blob.
    pub fn write_file(&self, path: &Path) -> io::Result<()> {
        self.blocks.iter().try_for_each(check_fields)?;
        let tmp_path = path.with_extension("tmp");
        let raw_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)?;
        let mut file = BufWriter::new(raw_file);
        self.write_to(&mut file)?;

        file.flush()?;
        file.into_inner()
            .map_err(|e| e.into_error())?
            .sync_all()?;
        rename(&tmp_path, path)
    }
}

fn check_fields(block: &Block) -> io::Result<()> {
    let fields: [(&str, &[u8]); 4] = [
        ("block name", &block.name),
        ("base settings error", &block.base_settings_error),
        ("filter string", &block.filter_string),
        ("filter settings error", &block.filter_error),
    ];
    match fields.iter().find(|(_, value)| value.contains(&0)) {
        Some((field, _)) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "'{}' of block {:?} contains NUL",
                field,
                block.name_lossy()
            ),
        )),
        None => Ok(()),
    }
}

/// Bytes in a block after its size field.
fn block_size(block: &Block) -> usize {
    let base = block.base_settings_error.len() + 1;
    let filter = block.filter_string.len() + 1 + block.filter_error.len() + 1;
    block.name.len() + 1 + SIZE_FIELD_BYTES + base + SIZE_FIELD_BYTES + filter
}

fn write_cstring<W: Write>(w: &mut W, s: &[u8]) -> io::Result<()> {
    w.write_all(s)?;
    w.write_u8(0)
}
