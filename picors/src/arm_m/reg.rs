//! Support for memory-mapped registers.

use core::cell::UnsafeCell;
use core::ptr;

/// A register whose contents can be represented as `T`.  The contents are
/// accessed using `volatile` operations only, so apparently dead loads and
/// stores are neither elided nor reordered against each other.
///
/// Memory-mapped registers are the ultimate ambient authority, and are
/// inherently shared.  Thus, registers (like cells) are mutated through a
/// shared reference `&`, and drivers never hand out `&mut` to them.
#[repr(transparent)]
pub struct Reg<T> {
    value: UnsafeCell<T>,
}

impl<T: Copy> Reg<T> {
    /// Reads the contents of the register using a volatile load.
    #[inline]
    pub fn get(&self) -> T {
        unsafe { ptr::read_volatile(self.value.get()) }
    }

    /// Replaces the contents of the register using a volatile store.
    #[inline]
    pub fn set(&self, value: T) {
        unsafe { ptr::write_volatile(self.value.get(), value) }
    }

    /// Non-atomic read-modify-write.  Only for registers that no interrupt
    /// handler touches; shared registers go through their atomic aliases.
    #[inline]
    pub fn update<F: FnOnce(T) -> T>(&self, f: F) {
        self.set(f(self.get()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_is_read_then_write() {
        let r = Reg { value: UnsafeCell::new(0b1010u32) };
        r.update(|v| v | 1);
        assert_eq!(r.get(), 0b1011);
        r.set(7);
        assert_eq!(r.get(), 7);
    }
}
