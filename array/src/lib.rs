//! Growable array of `i32` values with fallible, doubling growth.

mod error;
mod growable_array;

pub use error::ArrayError;
pub use growable_array::{GrowableArray, Iter};
