//! A single row of document text.
//!
//! Rows store raw bytes, one byte per on-screen column. There is no
//! grapheme or width handling at this layer: the editor works on
//! single-byte characters and the screen math stays integer-exact.

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One line of text, without its terminator.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Row {
    bytes: Vec<u8>,
}

impl Row {
    /// An empty row.
    #[must_use]
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Build a row from one line of file content.
    ///
    /// Strips a single trailing `\r`, so CRLF input loads the same as
    /// LF input. The line must not contain `\n`.
    #[must_use]
    pub fn from_line(line: &[u8]) -> Self {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        Self {
            bytes: line.to_vec(),
        }
    }

    /// Length in bytes (equal to length in columns).
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Insert one byte at a 0-based column. Clamped to the row end.
    pub fn insert(&mut self, at: usize, byte: u8) {
        let at = at.min(self.bytes.len());
        self.bytes.insert(at, byte);
    }

    /// Insert `count` spaces at a 0-based column. Clamped to the row end.
    pub fn insert_spaces(&mut self, at: usize, count: usize) {
        let at = at.min(self.bytes.len());
        self.bytes.splice(at..at, std::iter::repeat_n(b' ', count));
    }

    /// Remove and return the byte at a 0-based column, if in bounds.
    pub fn remove(&mut self, at: usize) -> Option<u8> {
        if at < self.bytes.len() {
            Some(self.bytes.remove(at))
        } else {
            None
        }
    }

    /// Split the row at a 0-based column, returning the tail.
    ///
    /// The row keeps `[0, at)`; the returned row holds `[at, len)`.
    /// A column past the end returns an empty tail.
    #[must_use]
    pub fn split_off(&mut self, at: usize) -> Self {
        let at = at.min(self.bytes.len());
        Self {
            bytes: self.bytes.split_off(at),
        }
    }

    /// Append another row's content to this one.
    pub fn append(&mut self, mut other: Self) {
        self.bytes.append(&mut other.bytes);
    }

    /// The slice of this row visible through a viewport.
    ///
    /// `offset` is the 0-based first visible column, `width` the number
    /// of columns the viewport spans. Rows shorter than the offset show
    /// as empty.
    #[must_use]
    pub fn visible(&self, offset: usize, width: usize) -> &[u8] {
        let start = offset.min(self.bytes.len());
        let end = offset.saturating_add(width).min(self.bytes.len());
        &self.bytes[start..end]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn from_line_keeps_plain_text() {
        assert_eq!(Row::from_line(b"hello").as_bytes(), b"hello");
    }

    #[test]
    fn from_line_strips_one_carriage_return() {
        assert_eq!(Row::from_line(b"hello\r").as_bytes(), b"hello");
        // Only the terminator is stripped, not interior bytes.
        assert_eq!(Row::from_line(b"a\rb\r").as_bytes(), b"a\rb");
    }

    #[test]
    fn from_line_empty() {
        assert!(Row::from_line(b"").is_empty());
        assert!(Row::from_line(b"\r").is_empty());
    }

    #[test]
    fn insert_at_positions() {
        let mut row = Row::from_line(b"ac");
        row.insert(1, b'b');
        assert_eq!(row.as_bytes(), b"abc");
        row.insert(3, b'd');
        assert_eq!(row.as_bytes(), b"abcd");
        row.insert(99, b'e');
        assert_eq!(row.as_bytes(), b"abcde");
    }

    #[test]
    fn insert_spaces() {
        let mut row = Row::from_line(b"ab");
        row.insert_spaces(1, 3);
        assert_eq!(row.as_bytes(), b"a   b");
    }

    #[test]
    fn remove_in_and_out_of_bounds() {
        let mut row = Row::from_line(b"abc");
        assert_eq!(row.remove(1), Some(b'b'));
        assert_eq!(row.as_bytes(), b"ac");
        assert_eq!(row.remove(5), None);
        assert_eq!(row.as_bytes(), b"ac");
    }

    #[test]
    fn split_off_mid_row() {
        let mut row = Row::from_line(b"abcdef");
        let tail = row.split_off(2);
        assert_eq!(row.as_bytes(), b"ab");
        assert_eq!(tail.as_bytes(), b"cdef");
    }

    #[test]
    fn split_off_past_end_is_empty_tail() {
        let mut row = Row::from_line(b"ab");
        let tail = row.split_off(10);
        assert_eq!(row.as_bytes(), b"ab");
        assert!(tail.is_empty());
    }

    #[test]
    fn append_joins_rows() {
        let mut row = Row::from_line(b"foo");
        row.append(Row::from_line(b"bar"));
        assert_eq!(row.as_bytes(), b"foobar");
    }

    #[test]
    fn visible_window() {
        let row = Row::from_line(b"0123456789");
        assert_eq!(row.visible(0, 4), b"0123");
        assert_eq!(row.visible(3, 4), b"3456");
        assert_eq!(row.visible(8, 4), b"89");
        assert_eq!(row.visible(10, 4), b"");
        assert_eq!(row.visible(99, 4), b"");
    }

    #[test]
    fn visible_window_wider_than_row() {
        let row = Row::from_line(b"ab");
        assert_eq!(row.visible(0, 80), b"ab");
    }
}
