use std::fmt;
use std::marker::PhantomData;
use std::ops::Range;

use crate::seq::{BoundedSeq, CapacityError, IndexError};
use crate::width::LenWidth;

/// Borrowed contiguous view whose length is typed by a width mode.
///
/// The typed length always equals the slice length; a subrange of a valid
/// length is valid, so `subspan`/`split_at` never re-validate against the
/// width cap.
pub struct Span<'a, T, W: LenWidth> {
    items: &'a [T],
    _width: PhantomData<W>,
}

impl<'a, T, W: LenWidth> Span<'a, T, W> {
    /// Rejects slices longer than the mode's width cap. Only reachable for
    /// the legacy mode on 64-bit hosts.
    pub fn from_slice(items: &'a [T]) -> Result<Self, CapacityError> {
        if items.len() > W::MAX_LEN {
            return Err(CapacityError::CapacityTooLarge {
                capacity: items.len(),
                max: W::MAX_LEN,
            });
        }
        Ok(Span {
            items,
            _width: PhantomData,
        })
    }

    pub(crate) fn from_seq(seq: &'a BoundedSeq<T, W>) -> Self {
        Span {
            items: seq.as_slice(),
            _width: PhantomData,
        }
    }

    pub(crate) fn from_checked_slice(items: &'a [T]) -> Self {
        debug_assert!(items.len() <= W::MAX_LEN);
        Span {
            items,
            _width: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn typed_len(&self) -> W::Repr {
        match W::repr_from_len(self.items.len()) {
            Some(repr) => repr,
            // the constructor rejected slices over the cap
            None => unreachable!("span length {} exceeds {} cap", self.items.len(), W::MODE),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a T> {
        self.items.get(index)
    }

    pub fn first(&self) -> Option<&'a T> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&'a T> {
        self.items.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'a, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &'a [T] {
        self.items
    }

    pub fn subspan(&self, range: Range<usize>) -> Result<Span<'a, T, W>, IndexError> {
        if range.start > range.end || range.end > self.items.len() {
            return Err(IndexError::BadRange {
                start: range.start,
                end: range.end,
                len: self.items.len(),
            });
        }
        Ok(Span::from_checked_slice(&self.items[range]))
    }

    pub fn split_at(&self, mid: usize) -> Result<(Span<'a, T, W>, Span<'a, T, W>), IndexError> {
        if mid > self.items.len() {
            return Err(IndexError::OutOfRange {
                index: mid,
                len: self.items.len(),
            });
        }
        let (head, tail) = self.items.split_at(mid);
        Ok((Span::from_checked_slice(head), Span::from_checked_slice(tail)))
    }
}

impl<'a, T, W: LenWidth> Clone for Span<'a, T, W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T, W: LenWidth> Copy for Span<'a, T, W> {}

impl<'a, T: fmt::Debug, W: LenWidth> fmt::Debug for Span<'a, T, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Span")
            .field("mode", &W::MODE)
            .field("items", &self.items)
            .finish()
    }
}

impl<'a, T, W: LenWidth> IntoIterator for Span<'a, T, W> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Mutable counterpart of [`Span`].
pub struct SpanMut<'a, T, W: LenWidth> {
    items: &'a mut [T],
    _width: PhantomData<W>,
}

impl<'a, T, W: LenWidth> SpanMut<'a, T, W> {
    pub fn from_mut_slice(items: &'a mut [T]) -> Result<Self, CapacityError> {
        if items.len() > W::MAX_LEN {
            return Err(CapacityError::CapacityTooLarge {
                capacity: items.len(),
                max: W::MAX_LEN,
            });
        }
        Ok(SpanMut {
            items,
            _width: PhantomData,
        })
    }

    pub(crate) fn from_seq(seq: &'a mut BoundedSeq<T, W>) -> Self {
        SpanMut {
            items: seq.as_mut_slice(),
            _width: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn typed_len(&self) -> W::Repr {
        match W::repr_from_len(self.items.len()) {
            Some(repr) => repr,
            None => unreachable!("span length {} exceeds {} cap", self.items.len(), W::MODE),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn as_slice(&self) -> &[T] {
        self.items
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.items
    }

    /// Reborrows as an immutable span with the same width type.
    pub fn reborrow(&self) -> Span<'_, T, W> {
        Span::from_checked_slice(self.items)
    }
}

impl<'a, T: Clone, W: LenWidth> SpanMut<'a, T, W> {
    pub fn fill(&mut self, value: T) {
        self.items.fill(value);
    }
}

impl<'a, T: fmt::Debug, W: LenWidth> fmt::Debug for SpanMut<'a, T, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpanMut")
            .field("mode", &W::MODE)
            .field("items", &self.items)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::width::{Legacy, Native};

    #[test]
    fn from_slice_and_basic_reads() {
        let data = [1, 2, 3, 4];
        let span = Span::<i32, Legacy>::from_slice(&data).expect("span");
        assert_eq!(span.len(), 4);
        assert_eq!(span.typed_len(), 4u32);
        assert_eq!(span.first(), Some(&1));
        assert_eq!(span.last(), Some(&4));
        assert_eq!(span.get(2), Some(&3));
        assert_eq!(span.get(4), None);
    }

    #[test]
    fn subspan_checks_the_range() {
        let data = [10, 20, 30];
        let span = Span::<i32, Native>::from_slice(&data).expect("span");
        let mid = span.subspan(1..3).expect("subspan");
        assert_eq!(mid.as_slice(), &[20, 30]);
        let empty = span.subspan(3..3).expect("empty subspan");
        assert!(empty.is_empty());
        assert_eq!(
            span.subspan(1..4).unwrap_err(),
            IndexError::BadRange {
                start: 1,
                end: 4,
                len: 3
            }
        );
        assert_eq!(
            span.subspan(2..1).unwrap_err(),
            IndexError::BadRange {
                start: 2,
                end: 1,
                len: 3
            }
        );
    }

    #[test]
    fn split_at_covers_both_halves() {
        let data = [1, 2, 3];
        let span = Span::<i32, Legacy>::from_slice(&data).expect("span");
        let (head, tail) = span.split_at(1).expect("split");
        assert_eq!(head.as_slice(), &[1]);
        assert_eq!(tail.as_slice(), &[2, 3]);
        assert_eq!(
            span.split_at(4).unwrap_err(),
            IndexError::OutOfRange { index: 4, len: 3 }
        );
    }

    #[test]
    fn span_mut_writes_through() {
        let mut data = [0u8; 4];
        let mut span = SpanMut::<u8, Native>::from_mut_slice(&mut data).expect("span");
        span.fill(7);
        *span.get_mut(0).expect("slot") = 1;
        assert_eq!(span.reborrow().as_slice(), &[1, 7, 7, 7]);
        assert_eq!(data, [1, 7, 7, 7]);
    }

    #[test]
    fn seq_views_share_the_width_type() {
        let mut seq = crate::BoundedSeq::<i32, Legacy>::new(2).expect("new");
        seq.push(5).expect("push");
        let span = seq.as_span();
        assert_eq!(span.typed_len(), 1u32);
        assert_eq!(span.as_slice(), &[5]);
    }
}
