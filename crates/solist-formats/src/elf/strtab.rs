//! ELF string tables.

use std::borrow::Cow;

use crate::ParseError;

/// A table of null-terminated strings addressed by byte offset.
#[derive(Debug, Clone, Copy)]
pub struct StringTable<'a> {
    data: &'a [u8],
}

impl<'a> StringTable<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn empty() -> Self {
        Self { data: &[] }
    }

    /// Size of the table in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the string starting at `offset`.
    ///
    /// An offset equal to the table size yields an empty string; anything
    /// beyond it is an error. A final string missing its terminator runs to
    /// the end of the table. Invalid UTF-8 is replaced, not rejected.
    pub fn get(&self, offset: usize) -> Result<Cow<'a, str>, ParseError> {
        if offset > self.data.len() {
            return Err(ParseError::InvalidStringIndex {
                index: offset,
                size: self.data.len(),
            });
        }
        let remaining = &self.data[offset..];
        let end = remaining
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(remaining.len());
        Ok(String::from_utf8_lossy(&remaining[..end]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &[u8] = b"\0global_function\0weak_function\0tail";

    #[test]
    fn test_get_names() {
        let table = StringTable::new(TABLE);
        assert_eq!(table.get(0).unwrap(), "");
        assert_eq!(table.get(1).unwrap(), "global_function");
        assert_eq!(table.get(17).unwrap(), "weak_function");
        // Offsets may point into the middle of another string
        assert_eq!(table.get(22).unwrap(), "function");
    }

    #[test]
    fn test_unterminated_tail() {
        let table = StringTable::new(TABLE);
        assert_eq!(table.get(31).unwrap(), "tail");
    }

    #[test]
    fn test_offset_at_end_is_empty() {
        let table = StringTable::new(TABLE);
        assert_eq!(table.get(TABLE.len()).unwrap(), "");
        assert_eq!(StringTable::empty().get(0).unwrap(), "");
    }

    #[test]
    fn test_offset_past_end_is_error() {
        let table = StringTable::new(TABLE);
        let err = table.get(TABLE.len() + 1).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidStringIndex { index, size } if index == TABLE.len() + 1 && size == TABLE.len()
        ));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let table = StringTable::new(b"\0bad\xffname\0");
        assert_eq!(table.get(1).unwrap(), "bad\u{fffd}name");
    }
}
