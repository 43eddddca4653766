//! Byte-level reinterpretation helpers for on-disk structures.

use std::mem::size_of;
use std::slice;

/// Reinterprets the given value as its raw bytes.
///
/// Only meant for `repr(C, packed)` structures mirroring on-disk layouts.
pub fn reinterpret<T>(val: &T) -> &[u8] {
    unsafe { slice::from_raw_parts(val as *const T as *const u8, size_of::<T>()) }
}

/// Mutable variant of [`reinterpret`].
pub fn reinterpret_mut<T>(val: &mut T) -> &mut [u8] {
    unsafe { slice::from_raw_parts_mut(val as *mut T as *mut u8, size_of::<T>()) }
}
