#[cfg(test)]
mod tests;

mod buffer;
mod iter;
pub mod errors;

use std::{
    cmp::Ordering,
    fmt::{
        self,
        Debug,
        Formatter,
    },
    mem,
    ops::{
        Index,
        IndexMut,
    },
    ptr,
    slice,
};

use buffer::RawBuffer;

pub use errors::{
    AllocError,
    Error,
};
pub use iter::{
    Cursor,
    Direction,
};

/// Capacity multiplier applied on growth and divisor applied on pruning.
pub const GROWTH_FACTOR: usize = 2;

/// `pop_back` never prunes a buffer whose capacity is at or below this.
pub const PRUNE_FLOOR: usize = 1;

/// `shrink_to_fit` only acts once `capacity / SHRINK_SLACK_DIVISOR` slots are spare.
pub const SHRINK_SLACK_DIVISOR: usize = 10;

/// Smallest power of [`GROWTH_FACTOR`], starting at 1, accepted by `fits`.
fn growth_step(fits: impl Fn(usize) -> bool) -> Option<usize> {
    let mut step:usize = 1;
    while !fits(step) {
        step = step.checked_mul(GROWTH_FACTOR)?;
    }
    Some(step)
}

/// A contiguous, growable array backed by an anonymous memory mapping.
///
/// Slots `[0, size)` hold live values; slots `[size, capacity)` are mapped
/// but uninitialized. Every change of capacity maps a fresh buffer, moves the
/// live values over and unmaps the old one.
pub struct Array<T>{
    size: usize,
    buffer: RawBuffer<T>,
}

unsafe impl<T: Send> Send for Array<T> {}
unsafe impl<T: Sync> Sync for Array<T> {}

impl<T> Array<T> {

    /// An empty array with capacity 0. Nothing is mapped until the first push.
    pub fn new() -> Self {
        Self{
            size: 0,
            buffer: RawBuffer::empty(),
        }
    }

    /// An empty array with room for exactly `capacity` elements.
    pub fn with_capacity(capacity:usize) -> Result<Self, Error> {
        Ok(Self{
            size: 0,
            buffer: RawBuffer::allocate(capacity)?,
        })
    }

    /// `n` clones of `value`, with size and capacity both exactly `n`.
    pub fn filled(n:usize, value:T) -> Result<Self, Error>
    where
        T: Clone,
    {
        let mut array = Self::with_capacity(n)?;
        array.fill_with(n, || value.clone());
        Ok(array)
    }

    /// Deep copy that keeps the source capacity.
    pub fn try_clone(&self) -> Result<Self, Error>
    where
        T: Clone,
    {
        let mut copy = Self::with_capacity(self.capacity())?;
        for elem in self.data() {
            unsafe{ptr::write(copy.buffer.as_ptr().add(copy.size), elem.clone())};
            copy.size += 1;
        }
        Ok(copy)
    }

    /// Moves the contents out, leaving `self` empty with capacity 0.
    ///
    /// The buffer changes hands as is: no reallocation, no element copies.
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    pub fn swap(&mut self, other:&mut Self) {
        mem::swap(self, other);
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Grows capacity to exactly `n` when `n` exceeds it. Never shrinks.
    pub fn reserve(&mut self, n:usize) -> Result<(), Error> {
        if n <= self.capacity() {
            return Ok(());
        }
        self.reallocate(n)
    }

    /// Sets the size to `n`, filling new slots with clones of `value`.
    ///
    /// Shrinking the size also shrinks the capacity to exactly `n`, unlike
    /// [`reserve`](Self::reserve) which never gives memory back.
    pub fn resize(&mut self, n:usize, value:T) -> Result<(), Error>
    where
        T: Clone,
    {
        self.resize_with(n, || value.clone())
    }

    /// Like [`resize`](Self::resize), filling new slots with `T::default()`.
    pub fn resize_default(&mut self, n:usize) -> Result<(), Error>
    where
        T: Default,
    {
        self.resize_with(n, T::default)
    }

    pub fn resize_with<F: FnMut() -> T>(&mut self, n:usize, f:F) -> Result<(), Error> {
        match n.cmp(&self.size) {
            Ordering::Equal => Ok(()),
            Ordering::Less => {
                // map first so a failed allocation leaves the tail untouched
                let fresh = RawBuffer::allocate(n)?;
                log::debug!("resizing down from {} to {n}, capacity {} -> {n}", self.size, self.capacity());
                self.truncate(n);
                self.adopt(fresh);
                Ok(())
            }
            Ordering::Greater => {
                self.reserve(n)?;
                self.fill_with(n, f);
                Ok(())
            }
        }
    }

    /// Drops every element. Capacity is kept.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Reallocates down to the smallest power of [`GROWTH_FACTOR`] holding
    /// `size`, once at least a tenth of the capacity is spare.
    pub fn shrink_to_fit(&mut self) -> Result<(), Error> {
        let capacity = self.capacity();
        if self.size > capacity - capacity / SHRINK_SLACK_DIVISOR {
            return Ok(());
        }
        let size = self.size;
        let Some(target) = growth_step(|step| step >= size) else {
            return Ok(());
        };
        if target >= capacity {
            return Ok(());
        }
        log::debug!("shrinking capacity from {capacity} to {target}");
        self.reallocate(target)
    }

    pub fn at(&self, index:usize) -> Result<&T, Error> {
        self.data().get(index).ok_or(Error::OutOfRange{index, size:self.size})
    }

    pub fn at_mut(&mut self, index:usize) -> Result<&mut T, Error> {
        let size = self.size;
        self.data_mut().get_mut(index).ok_or(Error::OutOfRange{index, size})
    }

    pub fn front(&self) -> Result<&T, Error> {
        self.at(0)
    }

    pub fn front_mut(&mut self) -> Result<&mut T, Error> {
        self.at_mut(0)
    }

    pub fn back(&self) -> Result<&T, Error> {
        match self.size.checked_sub(1) {
            Some(last) => self.at(last),
            None => Err(Error::OutOfRange{index:0, size:0}),
        }
    }

    pub fn back_mut(&mut self) -> Result<&mut T, Error> {
        match self.size.checked_sub(1) {
            Some(last) => self.at_mut(last),
            None => Err(Error::OutOfRange{index:0, size:0}),
        }
    }

    /// The live elements as a slice. Only valid until the next reallocation.
    pub fn data(&self) -> &[T] {
        unsafe{slice::from_raw_parts(self.buffer.as_ptr(), self.size)}
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        unsafe{slice::from_raw_parts_mut(self.buffer.as_ptr(), self.size)}
    }

    pub fn as_ptr(&self) -> *const T {
        self.buffer.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buffer.as_ptr()
    }

    /// Appends `value`, doubling capacity first when the array is full.
    ///
    /// On allocation failure `value` is dropped and the array is unchanged.
    pub fn push_back(&mut self, value:T) -> Result<(), Error> {
        if self.size == self.capacity() {
            self.increase_capacity()?;
        }
        unsafe{ptr::write(self.buffer.as_ptr().add(self.size), value)};
        self.size += 1;
        Ok(())
    }

    /// Removes and returns the last element, halving capacity once a quarter
    /// or less of it is in use.
    pub fn pop_back(&mut self) -> Result<T, Error> {
        if self.size == 0 {
            return Err(Error::EmptyContainer);
        }
        self.size -= 1;
        let value = unsafe{ptr::read(self.buffer.as_ptr().add(self.size))};
        self.prune_capacity();
        Ok(value)
    }

    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(self, 0, Direction::Forward)
    }

    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::new(self, self.size, Direction::Forward)
    }

    pub fn rbegin(&self) -> Cursor<'_, T> {
        Cursor::new(self, self.size.wrapping_sub(1), Direction::Reverse)
    }

    pub fn rend(&self) -> Cursor<'_, T> {
        Cursor::new(self, usize::MAX, Direction::Reverse)
    }

    pub fn iter(&self) -> Cursor<'_, T> {
        self.begin()
    }

    fn increase_capacity(&mut self) -> Result<(), Error> {
        let current = self.capacity();
        let target = growth_step(|step| step > current).ok_or(AllocError::CapacityOverflow(current))?;
        log::debug!("growing capacity from {current} to {target}");
        self.reallocate(target)
    }

    fn prune_capacity(&mut self) {
        let capacity = self.capacity();
        if capacity <= PRUNE_FLOOR || self.size > capacity / (GROWTH_FACTOR * GROWTH_FACTOR) {
            return;
        }
        let target = capacity / GROWTH_FACTOR;
        log::debug!("pruning capacity from {capacity} to {target}");
        if let Err(err) = self.reallocate(target) {
            log::warn!("keeping capacity {capacity} after failed prune: {err}");
        }
    }

    /// Maps a buffer of `new_capacity` slots and moves the live elements into it.
    /// `new_capacity` must hold at least `size` elements.
    fn reallocate(&mut self, new_capacity:usize) -> Result<(), Error> {
        debug_assert!(new_capacity >= self.size);
        let fresh = RawBuffer::allocate(new_capacity)?;
        self.adopt(fresh);
        Ok(())
    }

    fn adopt(&mut self, fresh:RawBuffer<T>) {
        log::trace!("reallocating from {} to {} elements, moving {}", self.capacity(), fresh.capacity(), self.size);
        unsafe{ptr::copy_nonoverlapping(self.buffer.as_ptr(), fresh.as_ptr(), self.size)};
        // the old mapping is released here; its slots were moved out bitwise
        drop(mem::replace(&mut self.buffer, fresh));
    }

    /// Writes values from `f` until the array holds `n` elements.
    /// Capacity must already be at least `n`.
    fn fill_with<F: FnMut() -> T>(&mut self, n:usize, mut f:F) {
        debug_assert!(n <= self.capacity());
        while self.size < n {
            unsafe{ptr::write(self.buffer.as_ptr().add(self.size), f())};
            self.size += 1;
        }
    }

    fn truncate(&mut self, n:usize) {
        if n >= self.size {
            return;
        }
        let tail_len = self.size - n;
        self.size = n;
        unsafe{ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.buffer.as_ptr().add(n), tail_len))};
    }
}

impl<T> Default for Array<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Array<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T:Clone> Clone for Array<T> {
    /// # Panics
    ///
    /// When the copy cannot be mapped. Use [`Array::try_clone`] to handle that.
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T:PartialEq> PartialEq for Array<T> {
    fn eq(&self, other:&Self) -> bool {
        self.data() == other.data()
    }
}

impl<T:Eq> Eq for Array<T> {}

impl<T> Index<usize> for Array<T> {
    type Output = T;

    fn index(&self, index:usize) -> &Self::Output {
        match self.at(index) {
            Ok(elem) => elem,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T> IndexMut<usize> for Array<T> {

    fn index_mut(&mut self, index:usize) -> &mut Self::Output {
        match self.at_mut(index) {
            Ok(elem) => elem,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<'a, T> IntoIterator for &'a Array<T> {
    type Item = &'a T;
    type IntoIter = Cursor<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.begin()
    }
}

impl<T:Debug> Debug for Array<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Array")
           .field("size", &self.size)
           .field("capacity", &self.capacity())
           .field("start", &self.buffer.as_ptr())
           .field("content", &self.data())
           .finish()
    }
}
