//! User bank IO (IO_BANK0): pin function selection and GPIO interrupts.
//!
//! Each of the 30 user pins has four interrupt events (level low, level high,
//! edge low, edge high).  Events are packed four bits per pin, eight pins per
//! register, into the raw status (INTR), per-core enable (PROCx_INTE), force
//! (PROCx_INTF) and masked status (PROCx_INTS) registers.  Any asserted,
//! enabled event on any pin raises `IO_IRQ_BANK0` on that core.

use core::ptr;

use bitflags::bitflags;
use log::debug;
use static_assertions::const_assert_eq;

use crate::arm_m::reg::Reg;
use crate::bits::BitsResult;
use crate::rp2040::atomic::AtomicReg;
use crate::rp2040::sio::Pins;

pub const IO_BANK0_ADDRESS: usize = 0x4001_4000;

/// Number of user bank pins.
pub const PIN_COUNT: u8 = 30;

#[repr(C)]
struct GpioRegisters {
    _status: Reg<u32>,
    ctrl:    Reg<u32>,
}

#[repr(C)]
struct Registers {
    gpio:        [GpioRegisters; PIN_COUNT as usize],
    intr:        [Reg<u32>; 4],
    proc0_inte:  [Reg<u32>; 4],
    _proc0_intf: [Reg<u32>; 4],
    proc0_ints:  [Reg<u32>; 4],
}

const_assert_eq!(core::mem::offset_of!(Registers, intr), 0x0f0);
const_assert_eq!(core::mem::offset_of!(Registers, proc0_inte), 0x100);
const_assert_eq!(core::mem::offset_of!(Registers, proc0_ints), 0x120);

/// A user bank pin number, known to be in range.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Pin(u8);

impl Pin {
    /// Names pin `n`.  Panics if there is no such pin, which in a `const`
    /// fails the build.
    pub const fn new(n: u8) -> Pin {
        assert!(n < PIN_COUNT, "no such GPIO");
        Pin(n)
    }

    pub const fn try_new(n: u8) -> Option<Pin> {
        if n < PIN_COUNT { Some(Pin(n)) } else { None }
    }

    pub const fn number(self) -> u8 {
        self.0
    }

    /// This pin as an SIO pin mask.
    pub const fn mask(self) -> Pins {
        Pins::pin(self.0)
    }

    /// Which of the four interrupt registers holds this pin's events, and at
    /// what shift.
    const fn event_position(self) -> (usize, u32) {
        ((self.0 / 8) as usize, 4 * (self.0 % 8) as u32)
    }
}

bitflags! {
    /// The four interrupt events of a single pin.
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub struct Events: u32 {
        const LEVEL_LOW  = 1 << 0;
        const LEVEL_HIGH = 1 << 1;
        const EDGE_LOW   = 1 << 2;
        const EDGE_HIGH  = 1 << 3;
    }
}

impl Events {
    /// The latched events, which software must clear.  Level events follow the
    /// pin and can't be cleared.
    pub const EDGES: Events = Events::EDGE_LOW.union(Events::EDGE_HIGH);
}

bit_enums! {
    /// Peripheral function routed to a pin.  Not every function exists on
    /// every pin; see the datasheet's function table.
    pub bit_enum Function {
        Xip = 0,
        Spi = 1,
        Uart = 2,
        I2c = 3,
        Pwm = 4,
        Sio = 5,
        Pio0 = 6,
        Pio1 = 7,
        Clock = 8,
        Usb = 9,
        Null = 0x1f,
    }

    pub bit_enum Override {
        Normal = 0,
        Invert = 1,
        Low = 2,
        High = 3,
    }
}

bit_wrappers! {
    /// GPIOx_CTRL.
    pub struct GpioCtrl(pub u32);
}

impl GpioCtrl {
    /// Value at reset: no function selected, no overrides.
    pub const RESET: GpioCtrl = GpioCtrl(0x1f);

    bitfield_accessors! {
        pub [29:28] get_irqover / with_irqover: Override,
        pub [17:16] get_inover / with_inover: Override,
        pub [13:12] get_oeover / with_oeover: Override,
        pub [9:8] get_outover / with_outover: Override,
        pub [4:0] get_funcsel / with_funcsel: Function,
    }
}

/// IO_BANK0 driver.
pub struct IoBank0 {
    reg: *const Registers,
}

unsafe impl Sync for IoBank0 {}

impl IoBank0 {
    /// # Safety
    ///
    /// `base` must address an IO_BANK0 block, with its atomic alias windows,
    /// that outlives the driver.
    pub const unsafe fn at(base: usize) -> Self {
        IoBank0 { reg: base as *const Registers }
    }

    fn reg(&self) -> &Registers {
        unsafe { &*self.reg }
    }

    pub fn ctrl(&self, pin: Pin) -> GpioCtrl {
        GpioCtrl(self.reg().gpio[usize::from(pin.0)].ctrl.get())
    }

    /// Routes `function` to `pin`, clearing any overrides.
    pub fn select_function(&self, pin: Pin, function: Function) {
        debug!("io_bank0: gpio{} -> {:?}", pin.0, function);
        self.reg().gpio[usize::from(pin.0)].ctrl
            .set(GpioCtrl(0).with_funcsel(function).0)
    }

    /// The function currently routed to `pin`.
    pub fn function(&self, pin: Pin) -> BitsResult<Function> {
        self.ctrl(pin).get_funcsel()
    }

    /// Lets `events` on `pin` interrupt processor 0.
    pub fn enable_proc0_events(&self, pin: Pin, events: Events) {
        let (bank, shift) = pin.event_position();
        let inte = unsafe { ptr::addr_of!((*self.reg).proc0_inte[bank]) };
        unsafe { inte.atomic_or(events.bits() << shift) }
    }

    /// Stops `events` on `pin` from interrupting processor 0.
    pub fn disable_proc0_events(&self, pin: Pin, events: Events) {
        let (bank, shift) = pin.event_position();
        let inte = unsafe { ptr::addr_of!((*self.reg).proc0_inte[bank]) };
        unsafe { inte.atomic_nand(events.bits() << shift) }
    }

    /// Events on `pin` that are both asserted and enabled for processor 0.
    /// A handler uses this to decide whether its own source fired.
    #[inline]
    pub fn proc0_events(&self, pin: Pin) -> Events {
        let (bank, shift) = pin.event_position();
        Events::from_bits_truncate(self.reg().proc0_ints[bank].get() >> shift)
    }

    /// Raw (unmasked) events on `pin`.
    pub fn raw_events(&self, pin: Pin) -> Events {
        let (bank, shift) = pin.event_position();
        Events::from_bits_truncate(self.reg().intr[bank].get() >> shift)
    }

    /// Clears latched edge `events` on `pin`.  INTR is write-one-to-clear, so
    /// this is a single store that cannot disturb any other pin.
    #[inline]
    pub fn clear_events(&self, pin: Pin, events: Events) {
        let (bank, shift) = pin.event_position();
        self.reg().intr[bank].set((events & Events::EDGES).bits() << shift)
    }
}

pub static IO_BANK0: IoBank0 = unsafe { IoBank0::at(IO_BANK0_ADDRESS) };

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::BadBits;
    use crate::testing::FakeWindow;
    use proptest::prelude::*;

    const BUTTON: Pin = Pin::new(16);

    fn fake() -> (FakeWindow, IoBank0) {
        let w = FakeWindow::with_aliases();
        let io = unsafe { IoBank0::at(w.base()) };
        (w, io)
    }

    #[test]
    fn pin_range() {
        assert_eq!(Pin::try_new(29), Some(Pin::new(29)));
        assert_eq!(Pin::try_new(30), None);
        assert_eq!(BUTTON.mask(), Pins::GPIO16);
    }

    #[test]
    #[should_panic(expected = "no such GPIO")]
    fn out_of_range_pin_panics_at_runtime() {
        let n = std::hint::black_box(30);
        let _ = Pin::new(n);
    }

    #[test]
    fn event_positions() {
        assert_eq!(Pin::new(0).event_position(), (0, 0));
        assert_eq!(Pin::new(7).event_position(), (0, 28));
        assert_eq!(BUTTON.event_position(), (2, 0));
        assert_eq!(Pin::new(25).event_position(), (3, 4));
    }

    #[test]
    fn function_select_writes_ctrl() {
        let (w, io) = fake();
        io.select_function(Pin::new(25), Function::Sio);
        assert_eq!(w.word(25 * 8 + 4), 5);
        assert_eq!(io.function(Pin::new(25)), Ok(Function::Sio));

        w.set_word(4, 0x1e);
        assert_eq!(io.function(Pin::new(0)), Err(BadBits(0x1e)));
    }

    #[test]
    fn enabling_events_uses_the_set_alias() {
        let (w, io) = fake();
        io.enable_proc0_events(BUTTON, Events::EDGE_HIGH);
        io.disable_proc0_events(Pin::new(17), Events::LEVEL_LOW);
        assert_eq!(w.word(0x2000 + 0x108), 0x8);
        assert_eq!(w.word(0x3000 + 0x108), 0x1 << 4);
        assert_eq!(w.word(0x108), 0);
    }

    #[test]
    fn masked_status_is_per_pin() {
        let (w, io) = fake();
        // GPIO16 edge high, GPIO17 level low.
        w.set_word(0x128, 0x8 | (0x1 << 4));
        assert_eq!(io.proc0_events(BUTTON), Events::EDGE_HIGH);
        assert_eq!(io.proc0_events(Pin::new(17)), Events::LEVEL_LOW);
        assert_eq!(io.proc0_events(Pin::new(18)), Events::empty());
    }

    #[test]
    fn clearing_writes_only_the_pins_edge_bits() {
        let (w, io) = fake();
        io.clear_events(Pin::new(17), Events::all());
        assert_eq!(w.word(0xf8), Events::EDGES.bits() << 4);
        assert_eq!(w.touched(), vec![0xf8]);
    }

    #[test]
    fn ctrl_fields() {
        let c = GpioCtrl::RESET.with_funcsel(Function::Sio)
            .with_oeover(Override::High);
        assert_eq!(c.0, 0x3005);
        assert_eq!(c.get_oeover(), Ok(Override::High));
        assert_eq!(c.get_irqover(), Ok(Override::Normal));
    }

    proptest! {
        #[test]
        fn every_pin_owns_a_distinct_nibble(n in 0u8..PIN_COUNT) {
            let (bank, shift) = Pin::new(n).event_position();
            prop_assert!(bank < 4);
            prop_assert!(shift <= 28);
            prop_assert_eq!(bank * 8 + (shift / 4) as usize, usize::from(n));
        }
    }
}
