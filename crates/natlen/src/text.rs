use std::fmt;
use std::marker::PhantomData;

use crate::seq::CapacityError;
use crate::span::Span;
use crate::width::LenWidth;

/// UTF-8 string with a fixed byte capacity and a width-typed byte length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedStr<W: LenWidth> {
    text: String,
    capacity: usize,
    _width: PhantomData<W>,
}

impl<W: LenWidth> BoundedStr<W> {
    /// `capacity_bytes` is a byte budget, not a char count.
    pub fn new(capacity_bytes: usize) -> Result<Self, CapacityError> {
        if capacity_bytes > W::MAX_LEN {
            return Err(CapacityError::CapacityTooLarge {
                capacity: capacity_bytes,
                max: W::MAX_LEN,
            });
        }
        Ok(BoundedStr {
            text: String::new(),
            capacity: capacity_bytes,
            _width: PhantomData,
        })
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn typed_len(&self) -> W::Repr {
        match W::repr_from_len(self.text.len()) {
            Some(repr) => repr,
            None => unreachable!("string length {} exceeds {} cap", self.text.len(), W::MODE),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// All-or-nothing append.
    pub fn push_str(&mut self, s: &str) -> Result<(), CapacityError> {
        let len = self.text.len();
        if len + s.len() > self.capacity {
            return Err(CapacityError::WouldOverflow {
                len,
                extra: s.len(),
                capacity: self.capacity,
            });
        }
        self.text.push_str(s);
        Ok(())
    }

    pub fn push(&mut self, c: char) -> Result<(), CapacityError> {
        let len = self.text.len();
        if len + c.len_utf8() > self.capacity {
            return Err(CapacityError::WouldOverflow {
                len,
                extra: c.len_utf8(),
                capacity: self.capacity,
            });
        }
        self.text.push(c);
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Byte view carrying the same width type.
    pub fn as_span(&self) -> Span<'_, u8, W> {
        Span::from_checked_slice(self.text.as_bytes())
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Shortens to `new_len` bytes. Panics when `new_len` is not on a char
    /// boundary (std `String::truncate` semantics). No-op when
    /// `new_len >= len`.
    pub fn truncate(&mut self, new_len: usize) {
        self.text.truncate(new_len);
    }
}

impl<W: LenWidth> fmt::Display for BoundedStr<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::width::{Legacy, Native};

    #[test]
    fn push_str_is_all_or_nothing() {
        let mut s = BoundedStr::<Legacy>::new(5).expect("new");
        s.push_str("ab").expect("push_str");
        let err = s.push_str("cdef").unwrap_err();
        assert_eq!(
            err,
            CapacityError::WouldOverflow {
                len: 2,
                extra: 4,
                capacity: 5,
            }
        );
        assert_eq!(s.as_str(), "ab");
        s.push_str("cde").expect("push_str");
        assert_eq!(s.len(), 5);
    }

    #[test]
    fn capacity_is_bytes_not_chars() {
        let mut s = BoundedStr::<Native>::new(3).expect("new");
        // U+00E9 is two bytes in UTF-8
        s.push('\u{e9}').expect("push");
        assert_eq!(s.len(), 2);
        assert!(s.push('\u{e9}').is_err());
        s.push('x').expect("push");
        assert_eq!(s.as_str(), "\u{e9}x");
    }

    #[test]
    fn typed_len_counts_bytes() {
        let mut s = BoundedStr::<Legacy>::new(8).expect("new");
        s.push_str("héllo").expect("push_str");
        assert_eq!(s.typed_len(), s.len() as u32);
        assert_eq!(s.as_span().len(), s.len());
    }

    #[test]
    fn truncate_keeps_valid_utf8() {
        let mut s = BoundedStr::<Native>::new(8).expect("new");
        s.push_str("abcd").expect("push_str");
        s.truncate(10);
        assert_eq!(s.as_str(), "abcd");
        s.truncate(2);
        assert_eq!(s.as_str(), "ab");
    }

    #[test]
    #[should_panic]
    fn truncate_off_char_boundary_panics() {
        let mut s = BoundedStr::<Native>::new(8).expect("new");
        s.push_str("é").expect("push_str");
        s.truncate(1);
    }
}
