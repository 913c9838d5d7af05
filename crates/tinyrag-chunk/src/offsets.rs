/// Maps between character offsets and byte offsets of one string.
///
/// `starts[i]` is the byte offset of the i-th char; the final element is
/// `text.len()`, so `starts.len() == char_count + 1`.
pub(crate) struct CharOffsets {
    starts: Vec<usize>,
}

impl CharOffsets {
    pub(crate) fn new(text: &str) -> Self {
        let starts = text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len())).collect();
        Self { starts }
    }

    pub(crate) fn char_len(&self) -> usize {
        self.starts.len() - 1
    }

    /// Byte range covering chars `[start, end)`; both must be `<= char_len()`.
    pub(crate) fn byte_range(&self, start: usize, end: usize) -> std::ops::Range<usize> {
        self.starts[start]..self.starts[end]
    }

    /// Char offset of a byte offset that lies on a char boundary.
    pub(crate) fn char_at(&self, byte: usize) -> usize {
        self.starts.binary_search(&byte).unwrap_or_else(|i| i)
    }
}
