//! String-keyed hash table holding a growable array of `i32` values per key.
//!
//! Collisions are resolved by chaining and the bucket array doubles once the
//! load factor reaches the configured maximum. The hash function is supplied
//! by the caller, see [`hash::HashFunction`].

pub mod chaining;
pub mod config;
pub mod error;
pub mod hash;

#[cfg(test)]
mod logger;

pub use array::{ArrayError, GrowableArray};
pub use chaining::linked::HashTable;
pub use config::TableConfig;
pub use error::TableError;
pub use hash::HashFunction;
