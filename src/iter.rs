
use std::{
    fmt::{
        self,
        Debug,
        Formatter,
    },
    iter::FusedIterator,
    ptr,
};

use crate::{
    errors::Error,
    Array,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction{
    Forward,
    Reverse,
}

/// A position inside an [`Array`](crate::Array), moving towards the back
/// (`Forward`) or towards the front (`Reverse`).
///
/// The cursor borrows the array, so nothing can reallocate underneath it.
/// Two cursors are only ever equal when they came from the same array.
/// Its bound is the array size: `end()` sits at `size` and `rend()` at
/// `usize::MAX`, the wrapped `-1`.
pub struct Cursor<'a, T>{
    owner: &'a Array<T>,
    elems: &'a [T],
    capacity: usize,
    index: usize,
    direction: Direction,
}

impl<'a, T> Cursor<'a, T> {

    pub(crate) fn new(owner:&'a Array<T>, index:usize, direction:Direction) -> Self {
        Self{
            owner,
            elems: owner.data(),
            capacity: owner.capacity(),
            index,
            direction,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Pre-increment: steps one slot in the cursor's direction.
    pub fn advance(&mut self) -> &mut Self {
        self.index = match self.direction {
            Direction::Forward => self.index.wrapping_add(1),
            Direction::Reverse => self.index.wrapping_sub(1),
        };
        self
    }

    /// Post-increment: steps and hands back the position it left.
    pub fn post_advance(&mut self) -> Self {
        let before = *self;
        self.advance();
        before
    }

    /// Same owning array, same capacity snapshot, same index.
    ///
    /// Owners are compared by address: empty and zero-sized buffers all
    /// share one dangling pointer, so the buffer start cannot tell them apart.
    ///
    /// Cursors running in opposite directions cannot be compared.
    pub fn try_eq(&self, other:&Self) -> Result<bool, Error> {
        if self.direction != other.direction {
            return Err(Error::InvalidComparison);
        }
        Ok(ptr::eq(self.owner, other.owner)
            && self.capacity == other.capacity
            && self.index == other.index)
    }

    pub fn try_ne(&self, other:&Self) -> Result<bool, Error> {
        self.try_eq(other).map(|eq| !eq)
    }

    /// Dereference. Fails outside `[0, size)`, which includes both end sentinels.
    pub fn get(&self) -> Result<&'a T, Error> {
        self.elems.get(self.index).ok_or(Error::OutOfRange{index:self.index, size:self.elems.len()})
    }

    fn remaining(&self) -> usize {
        match self.direction {
            Direction::Forward => self.elems.len().saturating_sub(self.index),
            Direction::Reverse if self.index < self.elems.len() => self.index + 1,
            Direction::Reverse => 0,
        }
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<'a, T> Iterator for Cursor<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let elem = self.get().ok()?;
        self.advance();
        Some(elem)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Cursor<'_, T> {}

impl<T> FusedIterator for Cursor<'_, T> {}

impl<T> Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Cursor")
           .field("owner", &(self.owner as *const Array<T>))
           .field("start", &self.elems.as_ptr())
           .field("size", &self.elems.len())
           .field("capacity", &self.capacity)
           .field("index", &self.index)
           .field("direction", &self.direction)
           .finish()
    }
}
