extern crate alloc as crate_alloc;

use core::alloc::Layout;
use core::ptr::NonNull;
use core::{fmt, iter, mem, slice};

use crate_alloc::alloc;
use log::trace;

use crate::ArrayError;

pub type Iter<'a> = iter::Copied<slice::Iter<'a, i32>>;

/// Contiguous sequence of `i32` values that doubles its capacity when full.
///
/// Growth is fallible: if the allocator refuses a request the array keeps its
/// previous buffer and contents and the error is handed back to the caller.
pub struct GrowableArray {
    // INVARIANTS:
    //  * `0 < cap` and `len <= cap`
    //  * `buf` was allocated by the global allocator with `Layout::array::<i32>(cap)`
    //  * first `len` values in `buf` are initialized
    //  * `cap * mem::size_of::<i32>() <= isize::MAX`
    buf: NonNull<i32>,
    len: usize,
    cap: usize,
}

// SAFETY: `GrowableArray` uniquely owns its buffer of plain `i32`s, same as `Vec<i32>`.
unsafe impl Send for GrowableArray {}
// SAFETY: shared access only hands out `&[i32]` / copies.
unsafe impl Sync for GrowableArray {}

impl fmt::Debug for GrowableArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrowableArray")
            .field("len", &self.len)
            .field("cap", &self.cap)
            .field("buf", &self.as_slice())
            .finish()
    }
}

impl Drop for GrowableArray {
    fn drop(&mut self) {
        let layout = self.current_layout();
        // SAFETY: `buf` was allocated with `layout` (see INVARIANTS) and is never used again
        unsafe { alloc::dealloc(self.buf.as_ptr().cast::<u8>(), layout) }
    }
}

impl PartialEq for GrowableArray {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for GrowableArray {}

impl PartialEq<[i32]> for GrowableArray {
    fn eq(&self, other: &[i32]) -> bool {
        self.as_slice() == other
    }
}

impl<const N: usize> PartialEq<[i32; N]> for GrowableArray {
    fn eq(&self, other: &[i32; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<'a> IntoIterator for &'a GrowableArray {
    type Item = i32;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl GrowableArray {
    /// Allocates room for `initial_capacity` values.
    ///
    /// `initial_capacity` must be at least 1, the array only ever doubles.
    pub fn with_capacity(initial_capacity: usize) -> Result<Self, ArrayError> {
        if initial_capacity == 0 {
            return Err(ArrayError::ZeroCapacity);
        }

        let layout = Self::layout(initial_capacity)?;
        // SAFETY: `layout.size() > 0` since `initial_capacity > 0` and `i32` is not a ZST
        let buf = unsafe { alloc::alloc(layout) };
        let buf = NonNull::new(buf.cast::<i32>()).ok_or(ArrayError::Alloc {
            bytes: layout.size(),
        })?;

        Ok(Self {
            buf,
            len: 0,
            cap: initial_capacity,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn as_slice(&self) -> &[i32] {
        // SAFETY:
        //  * `self.buf` is non-null, aligned and valid for `self.cap >= self.len` values
        //  * first `self.len` values are initialized
        unsafe { slice::from_raw_parts(self.buf.as_ptr().cast_const(), self.len) }
    }

    pub fn iter(&self) -> Iter<'_> {
        self.as_slice().iter().copied()
    }

    /// Appends `value`, doubling the capacity first if the array is full.
    ///
    /// On error the array is left unchanged.
    pub fn append(&mut self, value: i32) -> Result<(), ArrayError> {
        if self.len == self.cap {
            self.grow()?;
        }

        debug_assert!(self.len < self.cap);
        // SAFETY:
        //  * `self.len < self.cap`, the slot is inside our allocation
        //  * after the write the first `self.len + 1` values are initialized
        unsafe { self.buf.as_ptr().add(self.len).write(value) };
        self.len += 1;
        Ok(())
    }

    pub fn get(&self, index: usize) -> Result<i32, ArrayError> {
        self.as_slice()
            .get(index)
            .copied()
            .ok_or(ArrayError::OutOfBounds {
                index,
                len: self.len,
            })
    }

    fn layout(cap: usize) -> Result<Layout, ArrayError> {
        Layout::array::<i32>(cap).map_err(|_| ArrayError::CapacityOverflow)
    }

    #[inline]
    fn current_layout(&self) -> Layout {
        // SAFETY: `self.cap` passed `Layout::array::<i32>` when it was set,
        // so size doesn't overflow and the alignment is that of `i32`
        unsafe {
            Layout::from_size_align_unchecked(
                self.cap * mem::size_of::<i32>(),
                mem::align_of::<i32>(),
            )
        }
    }

    fn grow(&mut self) -> Result<(), ArrayError> {
        let new_cap = self
            .cap
            .checked_mul(2)
            .ok_or(ArrayError::CapacityOverflow)?;
        self.grow_to(new_cap)
    }

    fn grow_to(&mut self, new_cap: usize) -> Result<(), ArrayError> {
        if new_cap <= self.cap {
            return Ok(());
        }

        let new_layout = Self::layout(new_cap)?;
        // SAFETY:
        //  * `self.buf` was allocated by the global allocator with `self.current_layout()`
        //  * `new_layout.size() > 0` and doesn't exceed `isize::MAX` (checked by `Layout::array`)
        let buf = unsafe {
            alloc::realloc(
                self.buf.as_ptr().cast::<u8>(),
                self.current_layout(),
                new_layout.size(),
            )
        };

        // On failure `realloc` leaves the old block alone, so `self` is still valid as is.
        let new_buf = NonNull::new(buf.cast::<i32>()).ok_or(ArrayError::Alloc {
            bytes: new_layout.size(),
        })?;

        trace!("growable array grew from {} to {}", self.cap, new_cap);
        self.buf = new_buf;
        self.cap = new_cap;
        Ok(())
    }
}
