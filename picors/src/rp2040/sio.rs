//! Single-cycle IO (SIO) GPIO support.
//!
//! SIO is attached directly to each core's IOPORT rather than to the bus
//! fabric, so it has no atomic alias windows.  It gives every shared register
//! its own SET, CLR and XOR companions instead, and all output changes made
//! here go through those: a handler and the foreground can drive different
//! pins concurrently without losing each other's updates.

use bitflags::bitflags;

use crate::arm_m::reg::Reg;

pub const SIO_ADDRESS: usize = 0xd000_0000;

#[repr(C)]
struct Registers {
    cpuid:        Reg<u32>,
    gpio_in:      Reg<u32>,
    _gpio_hi_in:  Reg<u32>,
    _unused:      Reg<u32>,
    gpio_out:     Reg<u32>,
    gpio_out_set: Reg<u32>,
    gpio_out_clr: Reg<u32>,
    gpio_out_xor: Reg<u32>,
    gpio_oe:      Reg<u32>,
    gpio_oe_set:  Reg<u32>,
    gpio_oe_clr:  Reg<u32>,
    _gpio_oe_xor: Reg<u32>,
}

bitflags! {
    /// Names a group of user bank pins.  SIO applies most operations to any
    /// subset of pins for the same cost as a single pin, so all pin methods
    /// take a `Pins` mask.
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub struct Pins: u32 {
        const GPIO0 = 1 << 0;
        const GPIO1 = 1 << 1;
        const GPIO2 = 1 << 2;
        const GPIO3 = 1 << 3;
        const GPIO4 = 1 << 4;
        const GPIO5 = 1 << 5;
        const GPIO6 = 1 << 6;
        const GPIO7 = 1 << 7;
        const GPIO8 = 1 << 8;
        const GPIO9 = 1 << 9;
        const GPIO10 = 1 << 10;
        const GPIO11 = 1 << 11;
        const GPIO12 = 1 << 12;
        const GPIO13 = 1 << 13;
        const GPIO14 = 1 << 14;
        const GPIO15 = 1 << 15;
        const GPIO16 = 1 << 16;
        const GPIO17 = 1 << 17;
        const GPIO18 = 1 << 18;
        const GPIO19 = 1 << 19;
        const GPIO20 = 1 << 20;
        const GPIO21 = 1 << 21;
        const GPIO22 = 1 << 22;
        const GPIO23 = 1 << 23;
        const GPIO24 = 1 << 24;
        const GPIO25 = 1 << 25;
        const GPIO26 = 1 << 26;
        const GPIO27 = 1 << 27;
        const GPIO28 = 1 << 28;
        const GPIO29 = 1 << 29;
    }
}

/// SIO GPIO driver.
pub struct Sio {
    reg: *const Registers,
}

unsafe impl Sync for Sio {}

impl Sio {
    /// # Safety
    ///
    /// `base` must address an SIO block that outlives the driver.
    pub const unsafe fn at(base: usize) -> Self {
        Sio { reg: base as *const Registers }
    }

    /// Internal shorthand for dereferencing our raw pointer.
    fn reg(&self) -> &Registers {
        unsafe { &*self.reg }
    }

    /// Which core is asking: 0 or 1.
    pub fn core_id(&self) -> u32 {
        self.reg().cpuid.get()
    }

    /// Reads the input level of pins selected by `pins`.  The returned `Pins`
    /// contains those pins that were observed as logic high.
    #[inline]
    pub fn read(&self, pins: Pins) -> Pins {
        Pins::from_bits_truncate(self.reg().gpio_in.get()) & pins
    }

    /// The output levels SIO is currently driving, whether or not the pins
    /// are enabled as outputs.
    #[inline]
    pub fn outputs(&self) -> Pins {
        Pins::from_bits_truncate(self.reg().gpio_out.get())
    }

    /// Drives pins selected by `pins` to logic high.
    #[inline]
    pub fn set_high(&self, pins: Pins) {
        self.reg().gpio_out_set.set(pins.bits())
    }

    /// Drives pins selected by `pins` to logic low.
    #[inline]
    pub fn set_low(&self, pins: Pins) {
        self.reg().gpio_out_clr.set(pins.bits())
    }

    /// Inverts the output level of pins selected by `pins`.
    #[inline]
    pub fn toggle(&self, pins: Pins) {
        self.reg().gpio_out_xor.set(pins.bits())
    }

    /// Enables the output drivers of `pins`.
    pub fn enable_output(&self, pins: Pins) {
        self.reg().gpio_oe_set.set(pins.bits())
    }

    /// Disables the output drivers of `pins`, leaving them as inputs.
    pub fn disable_output(&self, pins: Pins) {
        self.reg().gpio_oe_clr.set(pins.bits())
    }

    pub fn output_enabled(&self) -> Pins {
        Pins::from_bits_truncate(self.reg().gpio_oe.get())
    }
}

impl Pins {
    /// The mask for pin `n`, empty if there is no such pin.
    pub const fn pin(n: u8) -> Pins {
        if n < 30 {
            Pins::from_bits_truncate(1 << n)
        } else {
            Pins::empty()
        }
    }
}

pub static SIO: Sio = unsafe { Sio::at(SIO_ADDRESS) };
