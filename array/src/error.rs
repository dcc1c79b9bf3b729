use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArrayError {
    #[error("initial capacity must be at least 1")]
    ZeroCapacity,
    #[error("requested capacity exceeds isize::MAX bytes")]
    CapacityOverflow,
    #[error("allocator refused a request of {bytes} bytes")]
    Alloc { bytes: usize },
    #[error("index {index} out of bounds for array of length {len}")]
    OutOfBounds { index: usize, len: usize },
}
