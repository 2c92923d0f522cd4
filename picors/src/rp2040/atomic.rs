//! Atomic register access through the RP2040's bus aliases.
//!
//! Every APB and AHB-lite peripheral register on the RP2040 appears four times
//! in the address map.  Writes to the three alias windows are applied by the
//! bus fabric as a single atomic XOR, bit-set or bit-clear of the underlying
//! register, so foreground code and interrupt handlers can share a register
//! without a read-modify-write race.  SIO is not behind the fabric and does not
//! have these aliases; it provides its own SET/CLR/XOR registers instead.
//!
//! The alias windows lie outside the register block proper, so alias addresses
//! are computed from a raw pointer into the driver's whole address range (see
//! `ptr::addr_of!`), never from a reference to a single register.

use crate::arm_m::reg::Reg;

pub const XOR_ALIAS: usize = 0x1000;
pub const SET_ALIAS: usize = 0x2000;
pub const CLR_ALIAS: usize = 0x3000;

/// Additional operations for registers that live behind the bus fabric's
/// atomic aliases.  Each is a single store; none of them reads the register.
///
/// # Safety
///
/// The pointer must address a register behind the bus fabric, and must have
/// been derived from a pointer whose range covers the block's alias windows
/// (a driver's base pointer does).
pub trait AtomicReg {
    /// Sets any bits in the register that are also set in `set`.
    unsafe fn atomic_or(self, set: u32);

    /// Clears any bits in the register that are also set in `clear`.
    unsafe fn atomic_nand(self, clear: u32);

    /// Inverts any bits in the register that are also set in `flip`.
    unsafe fn atomic_xor(self, flip: u32);
}

impl AtomicReg for *const Reg<u32> {
    #[inline]
    unsafe fn atomic_or(self, set: u32) {
        alias_store(self, SET_ALIAS, set)
    }

    #[inline]
    unsafe fn atomic_nand(self, clear: u32) {
        alias_store(self, CLR_ALIAS, clear)
    }

    #[inline]
    unsafe fn atomic_xor(self, flip: u32) {
        alias_store(self, XOR_ALIAS, flip)
    }
}

#[inline]
unsafe fn alias_store(reg: *const Reg<u32>, alias: usize, value: u32) {
    // `Reg<u32>` is a transparent `u32`.
    let alias_reg = reg.cast::<u8>().wrapping_add(alias).cast::<u32>();
    core::ptr::write_volatile(alias_reg.cast_mut(), value)
}
