
use nix::errno::Errno;
use thiserror::Error;


#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error{
    #[error("index {index} is out of range for size {size}")]
    OutOfRange{
        index: usize,
        size: usize,
    },
    #[error("container is empty")]
    EmptyContainer,
    #[error("cannot compare a forward cursor with a reverse cursor")]
    InvalidComparison,
    #[error("allocation failed: {0}")]
    AllocationFailure(#[from] AllocError),
}

/// Reasons a buffer could not be mapped.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError{
    #[error("capacity of {0} elements overflows the address space")]
    CapacityOverflow(usize),
    #[error("element alignment {0} exceeds the page size")]
    Alignment(usize),
    #[error("call to mmap failed: {0}")]
    MmapFail(Errno),
}
