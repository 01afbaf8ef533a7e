//! Typed access to raw attribute bytes.
//!
//! Everything that reinterprets attribute memory goes through [read] and [write]; the rest of the
//! crate only computes offsets.
#![allow(unsafe_code)]

use crate::attribute::AttributeComponent;

/// Read a `T` from `ptr`, which need not be aligned.
///
/// # Safety
///
/// * `ptr` must be valid for reads of `size_of::<T>()` bytes
#[inline(always)]
pub(crate) unsafe fn read<T: AttributeComponent>(ptr: *const u8) -> T {
    debug_assert_eq!(std::mem::size_of::<T>(), T::TYPE.size());
    // every bit pattern is a valid T, per the AttributeComponent contract
    unsafe { ptr.cast::<T>().read_unaligned() }
}

/// Write `value` to `ptr`, which need not be aligned.
///
/// # Safety
///
/// * `ptr` must be valid for writes of `size_of::<T>()` bytes
#[inline(always)]
pub(crate) unsafe fn write<T: AttributeComponent>(ptr: *mut u8, value: T) {
    debug_assert_eq!(std::mem::size_of::<T>(), T::TYPE.size());
    unsafe { ptr.cast::<T>().write_unaligned(value) }
}
