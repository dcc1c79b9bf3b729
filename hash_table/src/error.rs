use std::collections::TryReserveError;

use array::ArrayError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("bucket count overflows usize")]
    CapacityOverflow,
    #[error("allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
    #[error("key `{key}` not found")]
    NotFound { key: String },
    #[error(transparent)]
    Array(#[from] ArrayError),
}
