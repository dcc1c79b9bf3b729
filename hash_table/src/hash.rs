//! Hash functions the table can be built with.
//!
//! The table only needs a deterministic mapping from the key bytes to a `u64`,
//! anything implementing [`HashFunction`] (including plain functions and closures
//! taking `&[u8]`) will do. Quality only affects how long the chains get.

use core::hash::{BuildHasher, Hasher};
use std::collections::hash_map::RandomState;

pub trait HashFunction {
    fn hash(&self, key: &[u8]) -> u64;
}

impl<F> HashFunction for F
where
    F: Fn(&[u8]) -> u64,
{
    #[inline]
    fn hash(&self, key: &[u8]) -> u64 {
        self(key)
    }
}

/// Value of the first byte, `0` for an empty key.
///
/// Every key sharing a first byte collides, which makes it handy for exercising chains.
pub fn first_byte(key: &[u8]) -> u64 {
    key.first().copied().map_or(0, u64::from)
}

/// `h = h * 31 + byte` over all bytes, in wrapping 32-bit arithmetic.
pub fn polynomial(key: &[u8]) -> u64 {
    let h = key
        .iter()
        .fold(0u32, |h, &b| h.wrapping_mul(31).wrapping_add(u32::from(b)));
    u64::from(h)
}

/// Hashes the key bytes with a [`BuildHasher`].
///
/// Each `BuildHasherFn` is deterministic for its own lifetime, two instances
/// built from different `RandomState`s generally disagree.
#[derive(Debug, Clone, Default)]
pub struct BuildHasherFn<S = RandomState>(pub S);

impl BuildHasherFn {
    pub fn new() -> Self {
        Self(RandomState::new())
    }
}

impl<S> HashFunction for BuildHasherFn<S>
where
    S: BuildHasher,
{
    fn hash(&self, key: &[u8]) -> u64 {
        let mut hasher = self.0.build_hasher();
        hasher.write(key);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_byte_hash() {
        assert_eq!(first_byte(b""), 0);
        assert_eq!(first_byte(b"a"), 97);
        assert_eq!(first_byte(b"abc"), 97);
        assert_eq!(first_byte(&[255, 1]), 255);
    }

    #[test]
    fn polynomial_hash() {
        assert_eq!(polynomial(b""), 0);
        assert_eq!(polynomial(b"a"), 97);
        assert_eq!(polynomial(b"ab"), 97 * 31 + 98);
        assert_eq!(polynomial(b"abc"), (97 * 31 + 98) * 31 + 99);
    }

    #[test]
    fn polynomial_wraps_at_32_bits() {
        let long = [0xffu8; 64];
        assert!(polynomial(&long) <= u64::from(u32::MAX));
    }

    #[test]
    fn build_hasher_is_deterministic() {
        let h = BuildHasherFn::new();
        assert_eq!(h.hash(b"key"), h.hash(b"key"));

        let cloned = h.clone();
        assert_eq!(h.hash(b"other"), cloned.hash(b"other"));
    }

    #[test]
    fn closures_are_hash_functions() {
        fn use_it(h: impl HashFunction) -> u64 {
            h.hash(b"xyz")
        }

        assert_eq!(use_it(|key: &[u8]| key.len() as u64), 3);
        assert_eq!(use_it(polynomial), polynomial(b"xyz"));
    }
}
