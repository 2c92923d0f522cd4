//! User bank pad control (PADS_BANK0).
//!
//! The pad is the electrical end of a pin: input buffer, pulls, drive strength
//! and slew.  Function selection lives in IO_BANK0.

use log::debug;
use static_assertions::const_assert_eq;

use crate::arm_m::reg::Reg;
use crate::rp2040::io_bank0::{Pin, PIN_COUNT};

pub const PADS_BANK0_ADDRESS: usize = 0x4001_c000;

#[repr(C)]
struct Registers {
    _voltage_select: Reg<u32>,
    gpio:            [Reg<u32>; PIN_COUNT as usize],
    _swclk:          Reg<u32>,
    _swd:            Reg<u32>,
}

const_assert_eq!(core::mem::offset_of!(Registers, gpio), 0x04);
const_assert_eq!(core::mem::offset_of!(Registers, _swd), 0x80);
const_assert_eq!(core::mem::size_of::<Registers>(), 0x84);

bit_enums! {
    pub bit_enum DriveStrength {
        Ma2 = 0,
        Ma4 = 1,
        Ma8 = 2,
        Ma12 = 3,
    }
}

bit_wrappers! {
    /// GPIOx pad control.
    pub struct PadCtrl(pub u32);
}

impl PadCtrl {
    /// Value at reset: input enabled, pulled down, Schmitt trigger on, 4 mA.
    pub const RESET: PadCtrl = PadCtrl(0x56);

    bitfield_accessors! {
        /// Output disable; overrides the peripheral's output enable.
        pub total [7] get_od / with_od: bool,
        /// Input enable.
        pub total [6] get_ie / with_ie: bool,
        pub [5:4] get_drive / with_drive: DriveStrength,
        /// Pull up enable.
        pub total [3] get_pue / with_pue: bool,
        /// Pull down enable.
        pub total [2] get_pde / with_pde: bool,
        pub total [1] get_schmitt / with_schmitt: bool,
        pub total [0] get_slewfast / with_slewfast: bool,
    }

    /// A pulled-up digital input, for a switch that shorts the pin to ground
    /// when pressed.
    pub const fn pulled_up_input() -> PadCtrl {
        // IE | PUE, everything else off.
        PadCtrl((1 << 6) | (1 << 3))
    }
}

/// PADS_BANK0 driver.
pub struct PadsBank0 {
    reg: *const Registers,
}

unsafe impl Sync for PadsBank0 {}

impl PadsBank0 {
    /// # Safety
    ///
    /// `base` must address a PADS_BANK0 block that outlives the driver.
    pub const unsafe fn at(base: usize) -> Self {
        PadsBank0 { reg: base as *const Registers }
    }

    fn reg(&self) -> &Registers {
        unsafe { &*self.reg }
    }

    pub fn read(&self, pin: Pin) -> PadCtrl {
        PadCtrl(self.reg().gpio[usize::from(pin.number())].get())
    }

    /// Replaces the whole pad configuration of `pin`.
    pub fn configure(&self, pin: Pin, ctrl: PadCtrl) {
        debug!("pads_bank0: gpio{} = {:?}", pin.number(), ctrl);
        self.reg().gpio[usize::from(pin.number())].set(ctrl.0)
    }
}

pub static PADS_BANK0: PadsBank0 = unsafe { PadsBank0::at(PADS_BANK0_ADDRESS) };

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeWindow;

    #[test]
    fn reset_value_decodes() {
        let c = PadCtrl::RESET;
        assert!(c.get_ie());
        assert!(c.get_pde());
        assert!(!c.get_pue());
        assert!(c.get_schmitt());
        assert_eq!(c.get_drive(), Ok(DriveStrength::Ma4));
    }

    #[test]
    fn pull_up_input_matches_builders() {
        let built = PadCtrl(0).with_ie(true).with_pue(true);
        assert_eq!(PadCtrl::pulled_up_input(), built);
        assert_eq!(built.0, 0x48);
    }

    #[test]
    fn configure_writes_the_pins_register() {
        let w = FakeWindow::new(0x84);
        let pads = unsafe { PadsBank0::at(w.base()) };
        pads.configure(Pin::new(16), PadCtrl::pulled_up_input());
        assert_eq!(w.touched(), vec![0x04 + 16 * 4]);
        assert_eq!(pads.read(Pin::new(16)), PadCtrl(0x48));
    }

    #[test]
    fn last_pin_sits_just_before_the_debug_pads() {
        let w = FakeWindow::new(0x84);
        let pads = unsafe { PadsBank0::at(w.base()) };
        pads.configure(Pin::new(29), PadCtrl::RESET);
        // GPIO29 at 0x78, then SWCLK at 0x7c and SWD at 0x80.
        assert_eq!(w.touched(), vec![0x78]);
    }
}
