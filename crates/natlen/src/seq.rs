use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use crate::span::{Span, SpanMut};
use crate::width::LenWidth;

/// Construction or growth rejected by a capacity bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityError {
    CapacityTooLarge {
        capacity: usize,
        max: usize,
    },
    Full {
        capacity: usize,
    },
    WouldOverflow {
        len: usize,
        extra: usize,
        capacity: usize,
    },
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapacityError::CapacityTooLarge { capacity, max } => {
                write!(f, "capacity {capacity} exceeds width cap {max}")
            }
            CapacityError::Full { capacity } => {
                write!(f, "sequence is full (capacity {capacity})")
            }
            CapacityError::WouldOverflow {
                len,
                extra,
                capacity,
            } => write!(
                f,
                "appending {extra} elements to {len} exceeds capacity {capacity}"
            ),
        }
    }
}

impl std::error::Error for CapacityError {}

/// Range violation within a single width mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexError {
    OutOfRange { index: usize, len: usize },
    BadRange { start: usize, end: usize, len: usize },
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::OutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            IndexError::BadRange { start, end, len } => {
                write!(f, "range {start}..{end} out of range for length {len}")
            }
        }
    }
}

impl std::error::Error for IndexError {}

/// Fixed-capacity contiguous sequence whose length is typed by a width mode.
///
/// The capacity is fixed at construction and validated against
/// `W::MAX_LEN`, so every length the container can reach is representable in
/// `W::Repr`. Storage is contiguous and grows on demand up to the bound;
/// the bound itself never moves.
#[derive(Debug, Clone)]
pub struct BoundedSeq<T, W: LenWidth> {
    items: Vec<T>,
    capacity: usize,
    _width: PhantomData<W>,
}

impl<T, W: LenWidth> BoundedSeq<T, W> {
    /// Rejects `capacity` above the mode's width cap. Zero capacity is
    /// allowed.
    pub fn new(capacity: usize) -> Result<Self, CapacityError> {
        if capacity > W::MAX_LEN {
            return Err(CapacityError::CapacityTooLarge {
                capacity,
                max: W::MAX_LEN,
            });
        }
        Ok(BoundedSeq {
            items: Vec::new(),
            capacity,
            _width: PhantomData,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// The length in the mode's own representation.
    pub fn typed_len(&self) -> W::Repr {
        match W::repr_from_len(self.items.len()) {
            Some(repr) => repr,
            // capacity <= W::MAX_LEN is checked at construction and
            // len <= capacity always holds.
            None => unreachable!("length {} exceeds {} cap", self.items.len(), W::MODE),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    pub fn push(&mut self, value: T) -> Result<(), CapacityError> {
        if self.is_full() {
            return Err(CapacityError::Full {
                capacity: self.capacity,
            });
        }
        self.items.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Replaces the element at `index`, returning the old element.
    pub fn set(&mut self, index: usize, value: T) -> Result<T, IndexError> {
        let len = self.items.len();
        match self.items.get_mut(index) {
            Some(slot) => Ok(std::mem::replace(slot, value)),
            None => Err(IndexError::OutOfRange { index, len }),
        }
    }

    /// No-op when `new_len >= len`. Capacity is unchanged.
    pub fn truncate(&mut self, new_len: usize) {
        self.items.truncate(new_len);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    pub fn as_span(&self) -> Span<'_, T, W> {
        Span::from_seq(self)
    }

    pub fn as_span_mut(&mut self) -> SpanMut<'_, T, W> {
        SpanMut::from_seq(self)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub(crate) fn into_parts(self) -> (Vec<T>, usize) {
        (self.items, self.capacity)
    }

    /// `capacity` must already satisfy the width cap and `items.len()` must
    /// not exceed it.
    pub(crate) fn from_parts(items: Vec<T>, capacity: usize) -> Self {
        debug_assert!(capacity <= W::MAX_LEN);
        debug_assert!(items.len() <= capacity);
        BoundedSeq {
            items,
            capacity,
            _width: PhantomData,
        }
    }
}

impl<T: Clone, W: LenWidth> BoundedSeq<T, W> {
    /// All-or-nothing append of `values`.
    pub fn try_extend_from_slice(&mut self, values: &[T]) -> Result<(), CapacityError> {
        let len = self.items.len();
        if len + values.len() > self.capacity {
            return Err(CapacityError::WouldOverflow {
                len,
                extra: values.len(),
                capacity: self.capacity,
            });
        }
        self.items.extend_from_slice(values);
        Ok(())
    }
}

impl<T, W: LenWidth> Index<usize> for BoundedSeq<T, W> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T, W: LenWidth> IndexMut<usize> for BoundedSeq<T, W> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<'a, T, W: LenWidth> IntoIterator for &'a BoundedSeq<T, W> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T, W: LenWidth> IntoIterator for BoundedSeq<T, W> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T: PartialEq, W: LenWidth> PartialEq for BoundedSeq<T, W> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq, W: LenWidth> Eq for BoundedSeq<T, W> {}
