//! Support for the ARMv6-M Nested Vectored Interrupt Controller, or NVIC.
//!
//! ARMv6-M implements at most 32 external interrupts, so each of the
//! set/clear register families is a single word, and only word access to the
//! priority registers is permitted.

use log::trace;
use static_assertions::const_assert_eq;

use crate::arm_m;
use crate::arm_m::reg::Reg;

/// Address of `ISER`, the first NVIC register.
pub const NVIC_ADDRESS: usize = 0xe000_e100;

/// Number of external interrupt lines ARMv6-M can have.
pub const MAX_IRQS: u32 = 32;

/// ARMv6-M implements the top two bits of each eight-bit priority field.
pub const PRIORITY_BITS: u32 = 2;

#[repr(C)]
struct Registers {
    /// Writing ones enables the corresponding interrupt(s); others remain
    /// unchanged.  Reads return the enable state.
    iser: Reg<u32>, _reserved_after_iser: [u32; 31],

    /// Writing ones disables the corresponding interrupt(s); others remain
    /// unchanged.
    icer: Reg<u32>, _reserved_after_icer: [u32; 31],

    /// Writing ones makes the corresponding interrupt(s) pending.
    ispr: Reg<u32>, _reserved_after_ispr: [u32; 31],

    /// Writing ones makes the corresponding interrupt(s) non-pending.
    icpr: Reg<u32>, _reserved_after_icpr: [u32; 95],

    /// Four eight-bit priority fields per word, lowest-numbered interrupt in
    /// the least significant byte.
    ipr: [Reg<u32>; 8],
}

const_assert_eq!(core::mem::offset_of!(Registers, icer), 0x080);
const_assert_eq!(core::mem::offset_of!(Registers, ispr), 0x100);
const_assert_eq!(core::mem::offset_of!(Registers, icpr), 0x180);
const_assert_eq!(core::mem::offset_of!(Registers, ipr), 0x300);

/// Driver for the NVIC.
///
/// Because operations on the NVIC affect interrupts, which are asynchronous
/// events that can affect program order, the methods on `Nvic` are carefully
/// specified.  All of them take raw interrupt numbers; the SoC layer wraps
/// them with its own interrupt enumeration (see `rp2040::irq::NvicExt`), which
/// is both more ergonomic and avoids the range checks.
pub struct Nvic {
    reg: *const Registers,
}

unsafe impl Sync for Nvic {}

impl Nvic {
    /// Creates a driver for an NVIC at `base`.
    ///
    /// # Safety
    ///
    /// `base` must be the address of an NVIC register block (or, in tests, of
    /// memory standing in for one) that outlives the driver.
    pub const unsafe fn at(base: usize) -> Self {
        Nvic { reg: base as *const Registers }
    }

    /// Ensures that an interrupt is enabled by the time this function returns.
    ///
    /// If the interrupt is pending, and the current execution priority allows
    /// it to preempt, the handler will have run *before this function returns*.
    #[inline]
    pub fn enable_irq_raw(&self, irq: u32) {
        trace!("nvic: enable irq {}", irq);
        self.reg().iser.set(Self::bit(irq));
        Self::write_barriers()
    }

    /// Ensures that an interrupt is disabled by the time this function returns.
    ///
    /// Code appearing after a call to `disable_irq_raw` in program order can
    /// assume it will not be preempted by this interrupt, unless something
    /// else re-enables it.
    #[inline]
    pub fn disable_irq_raw(&self, irq: u32) {
        self.reg().icer.set(Self::bit(irq));
        Self::write_barriers()
    }

    /// Makes an interrupt pending, as though its source had fired.
    #[inline]
    pub fn pend_irq_raw(&self, irq: u32) {
        self.reg().ispr.set(Self::bit(irq));
        Self::write_barriers()
    }

    /// Discards a pending interrupt.  This does not clear the condition at the
    /// peripheral; a level-triggered source will simply pend again.
    #[inline]
    pub fn unpend_irq_raw(&self, irq: u32) {
        self.reg().icpr.set(Self::bit(irq));
        Self::write_barriers()
    }

    #[inline]
    pub fn is_enabled_raw(&self, irq: u32) -> bool {
        self.reg().iser.get() & Self::bit(irq) != 0
    }

    #[inline]
    pub fn is_pending_raw(&self, irq: u32) -> bool {
        self.reg().ispr.get() & Self::bit(irq) != 0
    }

    /// Sets the priority of an interrupt, synchronously.  Only the top
    /// `PRIORITY_BITS` of `priority` are implemented.
    ///
    /// ARMv6-M only permits word access to the priority registers, so this is
    /// a read-modify-write of a word shared with three other interrupts.  Call
    /// it during setup, not from handlers.
    #[inline]
    pub fn set_priority_raw(&self, irq: u32, priority: u8) {
        let (word, shift) = ((irq / 4) as usize, (irq % 4) * 8);
        self.reg().ipr[word].update(|v| {
            (v & !(0xff << shift)) | (u32::from(priority) << shift)
        });
        Self::write_barriers()
    }

    /// Reads the priority of an interrupt.
    #[inline]
    pub fn get_priority_raw(&self, irq: u32) -> u8 {
        let (word, shift) = ((irq / 4) as usize, (irq % 4) * 8);
        (self.reg().ipr[word].get() >> shift) as u8
    }

    /// Runs `f` with `irq` masked at the NVIC, restoring its previous enable
    /// state afterwards.  This is the critical section for data shared between
    /// the foreground and a single interrupt handler: other interrupts still
    /// run, and nothing ever blocks.
    pub fn with_irq_masked_raw<R, F: FnOnce() -> R>(&self, irq: u32, f: F) -> R {
        let was_enabled = self.is_enabled_raw(irq);
        self.disable_irq_raw(irq);
        let r = f();
        if was_enabled {
            self.enable_irq_raw(irq)
        }
        r
    }

    fn reg(&self) -> &Registers {
        unsafe { &*self.reg }
    }

    #[inline]
    fn bit(irq: u32) -> u32 {
        debug_assert!(irq < MAX_IRQS);
        1 << (irq % MAX_IRQS)
    }

    #[inline]
    fn write_barriers() {
        // Make sure the write has reached the NVIC before continuing...
        arm_m::data_synchronization_barrier();
        // ...and that no instruction fetched before it runs with stale state.
        arm_m::instruction_synchronization_barrier()
    }
}

/// Shared static instance of the `Nvic` driver.
pub static NVIC: Nvic = unsafe { Nvic::at(NVIC_ADDRESS) };
