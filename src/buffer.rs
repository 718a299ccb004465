
use std::{
    ffi::c_void,
    marker::PhantomData,
    mem::{
        align_of,
        size_of,
    },
    num::NonZeroUsize,
    os::fd::BorrowedFd,
    ptr::NonNull,
    sync::OnceLock,
};

use nix::{
    sys::mman::{
        mmap,
        munmap,
    },
    unistd::{
        sysconf,
        SysconfVar,
    },
};

use crate::errors::AllocError;

const FALLBACK_PAGE_SIZE: usize = 4096;

pub(crate) fn page_size() -> usize {
    static PAGE_SIZE: OnceLock<usize> = OnceLock::new();
    *PAGE_SIZE.get_or_init(|| {
        sysconf(SysconfVar::PAGE_SIZE)
            .ok()
            .flatten()
            .and_then(|size| usize::try_from(size).ok())
            .unwrap_or(FALLBACK_PAGE_SIZE)
    })
}

/// Owns one anonymous mapping large enough for `capacity` values of `T`.
///
/// The buffer never reads, writes or drops elements; `Array` decides which
/// slots are initialized. Dropping the buffer only releases the mapping.
pub(crate) struct RawBuffer<T>{
    capacity: usize,
    byte_len: usize,
    start: NonNull<T>,
    phantom: PhantomData<T>,
}

impl<T> RawBuffer<T> {

    /// A buffer with nothing mapped.
    pub(crate) fn empty() -> Self {
        Self{
            capacity: 0,
            byte_len: 0,
            start: NonNull::dangling(),
            phantom: PhantomData,
        }
    }

    pub(crate) fn allocate(capacity:usize) -> Result<Self, AllocError> {
        use nix::sys::mman::ProtFlags;
        use nix::sys::mman::MapFlags;

        let byte_len = capacity.checked_mul(size_of::<T>())
            .filter(|len| *len <= isize::MAX as usize)
            .ok_or(AllocError::CapacityOverflow(capacity))?;

        // zero-sized element types and zero capacity never touch the kernel
        let Some(map_len) = NonZeroUsize::new(byte_len) else {
            return Ok(Self{
                capacity,
                byte_len: 0,
                start: NonNull::dangling(),
                phantom: PhantomData,
            });
        };

        if align_of::<T>() > page_size() {
            return Err(AllocError::Alignment(align_of::<T>()));
        }

        let memory_holder = unsafe{mmap(
            None,
            map_len,
            ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
            MapFlags::MAP_PRIVATE | MapFlags::MAP_ANONYMOUS,
            None::<BorrowedFd>,
            0
        )}.map_err(AllocError::MmapFail)?;

        let start = NonNull::new(memory_holder as *mut T).ok_or(AllocError::MmapFail(nix::errno::Errno::ENOMEM))?;

        log::trace!("mapped {byte_len} bytes for {capacity} elements");

        Ok(Self{
            capacity,
            byte_len,
            start,
            phantom: PhantomData,
        })
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn as_ptr(&self) -> *mut T {
        self.start.as_ptr()
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        if self.byte_len == 0 {
            return;
        }
        let released = unsafe{munmap(self.start.as_ptr() as *mut c_void, self.byte_len)};
        if let Err(errno) = released {
            log::error!("call to munmap failed for {} bytes: {errno}", self.byte_len);
        }
    }
}
