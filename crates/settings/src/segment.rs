//! Length-prefixed segments of NUL-terminated string fields.

use crate::cursor::Cursor;
use crate::error::DecodeError;

/// Layout of one segment: the name of its size field and the names of the
/// strings it holds, in wire order.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SegmentLayout<const N: usize> {
    pub size_field: &'static str,
    pub fields: [&'static str; N],
}

/// Base settings segment: just the compiler's error string.
pub(crate) const BASE_SETTINGS: SegmentLayout<1> = SegmentLayout {
    size_field: "base settings size",
    fields: ["base settings error"],
};

/// Filter segment: the filter expression and the compiler's error for it.
pub(crate) const FILTER_SETTINGS: SegmentLayout<2> = SegmentLayout {
    size_field: "filter settings size",
    fields: ["filter string", "filter settings error"],
};

impl<const N: usize> SegmentLayout<N> {
    /// Reads the size prefix and then every field from inside the segment.
    ///
    /// The segment has to be used up exactly by its fields.
    pub(crate) fn decode<'a>(&self, cursor: &mut Cursor<'a>) -> Result<[&'a [u8]; N], DecodeError> {
        let size = cursor.read_size(self.size_field)?;
        let mut segment = cursor.sub_area(size, self.size_field)?;

        let mut values: [&'a [u8]; N] = [&[]; N];
        for (value, field) in values.iter_mut().zip(self.fields) {
            *value = segment.read_cstring(field)?;
        }
        segment.finish(self.size_field)?;
        Ok(values)
    }
}
