//! Subsystem resets.
//!
//! Most RP2040 peripherals come out of power-on held in reset, and their
//! registers can't be used until software releases them.

use core::ptr;

use bitflags::bitflags;
use log::debug;

use crate::arm_m::reg::Reg;
use crate::rp2040::atomic::AtomicReg;

pub const RESETS_ADDRESS: usize = 0x4000_c000;

#[repr(C)]
struct Registers {
    reset:      Reg<u32>,
    _wdsel:     Reg<u32>,
    reset_done: Reg<u32>,
}

bitflags! {
    /// Names a set of subsystems in the RESET, WDSEL and RESET_DONE registers.
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub struct Subsystems: u32 {
        const ADC        = 1 << 0;
        const BUSCTRL    = 1 << 1;
        const DMA        = 1 << 2;
        const I2C0       = 1 << 3;
        const I2C1       = 1 << 4;
        const IO_BANK0   = 1 << 5;
        const IO_QSPI    = 1 << 6;
        const JTAG       = 1 << 7;
        const PADS_BANK0 = 1 << 8;
        const PADS_QSPI  = 1 << 9;
        const PIO0       = 1 << 10;
        const PIO1       = 1 << 11;
        const PLL_SYS    = 1 << 12;
        const PLL_USB    = 1 << 13;
        const PWM        = 1 << 14;
        const RTC        = 1 << 15;
        const SPI0       = 1 << 16;
        const SPI1       = 1 << 17;
        const SYSCFG     = 1 << 18;
        const SYSINFO    = 1 << 19;
        const TBMAN      = 1 << 20;
        const TIMER      = 1 << 21;
        const UART0      = 1 << 22;
        const UART1      = 1 << 23;
        const USBCTRL    = 1 << 24;
    }
}

/// Reset controller driver.
pub struct Resets {
    reg: *const Registers,
}

unsafe impl Sync for Resets {}

impl Resets {
    /// # Safety
    ///
    /// `base` must address a RESETS block, with its atomic alias windows, that
    /// outlives the driver.
    pub const unsafe fn at(base: usize) -> Self {
        Resets { reg: base as *const Registers }
    }

    fn reg(&self) -> &Registers {
        unsafe { &*self.reg }
    }

    /// Puts `which` into reset.
    pub fn reset(&self, which: Subsystems) {
        unsafe { ptr::addr_of!((*self.reg).reset).atomic_or(which.bits()) }
    }

    /// Takes `which` out of reset and waits until the hardware reports them
    /// ready.  Subsystems already running are unaffected.
    pub fn unreset(&self, which: Subsystems) {
        debug!("resets: releasing {:?}", which);
        unsafe { ptr::addr_of!((*self.reg).reset).atomic_nand(which.bits()) };
        while !self.done().contains(which) {}
    }

    /// Subsystems that are out of reset and ready.
    pub fn done(&self) -> Subsystems {
        Subsystems::from_bits_truncate(self.reg().reset_done.get())
    }
}

pub static RESETS: Resets = unsafe { Resets::at(RESETS_ADDRESS) };

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeWindow;

    #[test]
    fn unreset_clears_through_the_alias_and_waits_for_done() {
        let w = FakeWindow::with_aliases();
        let resets = unsafe { Resets::at(w.base()) };
        let gpio = Subsystems::IO_BANK0 | Subsystems::PADS_BANK0;
        w.set_word(0x8, gpio.bits());

        resets.unreset(gpio);

        assert_eq!(w.word(0x3000), (1 << 5) | (1 << 8));
        assert_eq!(w.touched(), vec![0x8, 0x3000]);
    }

    #[test]
    fn reset_sets_through_the_alias() {
        let w = FakeWindow::with_aliases();
        let resets = unsafe { Resets::at(w.base()) };
        resets.reset(Subsystems::UART0);
        assert_eq!(w.word(0x2000), 1 << 22);
    }
}
