//! Interrupt support for the RP2040.
//!
//! This module adapts the primitive NVIC support in `arm_m::nvic` to the
//! RP2040.  It provides:
//! - `struct InterruptTable` for the vendor-specific half of the vector table,
//!   and `DEFAULT_TABLE` with every vector bound to the default trap.
//! - `enum Interrupt` naming the 32 NVIC lines.
//! - `trait NvicExt` to extend the NVIC with operations using those names and
//!   the RP2040's two priority bits.
//!
//! # Binding handlers
//!
//! A firmware image binds its handlers by naming the vectors it overrides and
//! taking every other one from `DEFAULT_TABLE`:
//!
//! ```
//! use picors::rp2040::irq::{self, InterruptTable};
//!
//! extern "C" fn on_gpio() {}
//!
//! static TABLE: InterruptTable = InterruptTable {
//!     io_irq_bank0: on_gpio,
//!     .. irq::DEFAULT_TABLE
//! };
//! # let _ = &TABLE;
//! ```
//!
//! Binding is resolved entirely at compile time.  A vector that nobody names
//! gets `trap::default_handler`, and naming a vector twice does not silently
//! pick one of the two; it fails the build:
//!
//! ```compile_fail,E0062
//! use picors::rp2040::irq::{self, InterruptTable};
//!
//! extern "C" fn on_gpio() {}
//! extern "C" fn also_on_gpio() {}
//!
//! static TABLE: InterruptTable = InterruptTable {
//!     io_irq_bank0: on_gpio,
//!     io_irq_bank0: also_on_gpio,
//!     .. irq::DEFAULT_TABLE
//! };
//! ```

use crate::arm_m::nvic::{self, PRIORITY_BITS};
use crate::arm_m::trap::default_handler;

/// Re-export the type used for interrupt vectors on ARMv6-M.
pub use crate::arm_m::exc::Handler;

/// Number of NVIC lines on the RP2040, and words in `InterruptTable`.
pub const INTERRUPT_COUNT: usize = 32;

/// The RP2040's vendor-specific (NVIC) vector table.  This follows the ARMv6-M
/// exception table immediately in memory.
///
/// Lines 26 to 31 have no peripheral attached, but the NVIC implements them,
/// so software can pend them; they are bound like any other vector.
#[repr(C)]
pub struct InterruptTable {
    pub timer_irq_0: Handler,
    pub timer_irq_1: Handler,
    pub timer_irq_2: Handler,
    pub timer_irq_3: Handler,
    pub pwm_irq_wrap: Handler,
    pub usbctrl_irq: Handler,
    pub xip_irq: Handler,
    pub pio0_irq_0: Handler,
    pub pio0_irq_1: Handler,
    pub pio1_irq_0: Handler,
    pub pio1_irq_1: Handler,
    pub dma_irq_0: Handler,
    pub dma_irq_1: Handler,
    pub io_irq_bank0: Handler,
    pub io_irq_qspi: Handler,
    pub sio_irq_proc0: Handler,
    pub sio_irq_proc1: Handler,
    pub clocks_irq: Handler,
    pub spi0_irq: Handler,
    pub spi1_irq: Handler,
    pub uart0_irq: Handler,
    pub uart1_irq: Handler,
    pub adc_irq_fifo: Handler,
    pub i2c0_irq: Handler,
    pub i2c1_irq: Handler,
    pub rtc_irq: Handler,

    pub spare_irq_26: Handler,
    pub spare_irq_27: Handler,
    pub spare_irq_28: Handler,
    pub spare_irq_29: Handler,
    pub spare_irq_30: Handler,
    pub spare_irq_31: Handler,
}

/// An `InterruptTable` with every vector bound to `trap::default_handler`.
/// Use with struct update syntax; see the module documentation.
pub const DEFAULT_TABLE: InterruptTable = InterruptTable {
    timer_irq_0: default_handler,
    timer_irq_1: default_handler,
    timer_irq_2: default_handler,
    timer_irq_3: default_handler,
    pwm_irq_wrap: default_handler,
    usbctrl_irq: default_handler,
    xip_irq: default_handler,
    pio0_irq_0: default_handler,
    pio0_irq_1: default_handler,
    pio1_irq_0: default_handler,
    pio1_irq_1: default_handler,
    dma_irq_0: default_handler,
    dma_irq_1: default_handler,
    io_irq_bank0: default_handler,
    io_irq_qspi: default_handler,
    sio_irq_proc0: default_handler,
    sio_irq_proc1: default_handler,
    clocks_irq: default_handler,
    spi0_irq: default_handler,
    spi1_irq: default_handler,
    uart0_irq: default_handler,
    uart1_irq: default_handler,
    adc_irq_fifo: default_handler,
    i2c0_irq: default_handler,
    i2c1_irq: default_handler,
    rtc_irq: default_handler,

    spare_irq_26: default_handler,
    spare_irq_27: default_handler,
    spare_irq_28: default_handler,
    spare_irq_29: default_handler,
    spare_irq_30: default_handler,
    spare_irq_31: default_handler,
};

/// Enumeration of the RP2040 interrupts.  This can be used to name an
/// interrupt vector, like an integer, but without the risk of receiving
/// out-of-range values.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Interrupt {
    TimerIrq0 = 0,
    TimerIrq1,
    TimerIrq2,
    TimerIrq3,
    PwmIrqWrap,
    UsbctrlIrq,
    XipIrq,
    Pio0Irq0,
    Pio0Irq1,
    Pio1Irq0,
    Pio1Irq1,
    DmaIrq0,
    DmaIrq1,
    IoIrqBank0,
    IoIrqQspi,
    SioIrqProc0,
    SioIrqProc1,
    ClocksIrq,
    Spi0Irq,
    Spi1Irq,
    Uart0Irq,
    Uart1Irq,
    AdcIrqFifo,
    I2c0Irq,
    I2c1Irq,
    RtcIrq,

    SpareIrq26,
    SpareIrq27,
    SpareIrq28,
    SpareIrq29,
    SpareIrq30,
    SpareIrq31,
}

impl Interrupt {
    /// Every interrupt, in NVIC order.
    pub const ALL: [Interrupt; INTERRUPT_COUNT] = [
        Interrupt::TimerIrq0, Interrupt::TimerIrq1,
        Interrupt::TimerIrq2, Interrupt::TimerIrq3,
        Interrupt::PwmIrqWrap, Interrupt::UsbctrlIrq, Interrupt::XipIrq,
        Interrupt::Pio0Irq0, Interrupt::Pio0Irq1,
        Interrupt::Pio1Irq0, Interrupt::Pio1Irq1,
        Interrupt::DmaIrq0, Interrupt::DmaIrq1,
        Interrupt::IoIrqBank0, Interrupt::IoIrqQspi,
        Interrupt::SioIrqProc0, Interrupt::SioIrqProc1,
        Interrupt::ClocksIrq,
        Interrupt::Spi0Irq, Interrupt::Spi1Irq,
        Interrupt::Uart0Irq, Interrupt::Uart1Irq,
        Interrupt::AdcIrqFifo,
        Interrupt::I2c0Irq, Interrupt::I2c1Irq,
        Interrupt::RtcIrq,
        Interrupt::SpareIrq26, Interrupt::SpareIrq27, Interrupt::SpareIrq28,
        Interrupt::SpareIrq29, Interrupt::SpareIrq30, Interrupt::SpareIrq31,
    ];

    /// NVIC line number.
    pub const fn irq(self) -> u32 {
        self as u32
    }

    /// Index of this interrupt's entry in the full vector table.  External
    /// interrupts follow the sixteen architectural exception vectors.
    pub const fn vector_index(self) -> usize {
        crate::arm_m::exc::EXCEPTION_COUNT + self as usize
    }

    /// Name as used in the RP2040 datasheet.
    pub const fn name(self) -> &'static str {
        match self {
            Interrupt::TimerIrq0 => "TIMER_IRQ_0",
            Interrupt::TimerIrq1 => "TIMER_IRQ_1",
            Interrupt::TimerIrq2 => "TIMER_IRQ_2",
            Interrupt::TimerIrq3 => "TIMER_IRQ_3",
            Interrupt::PwmIrqWrap => "PWM_IRQ_WRAP",
            Interrupt::UsbctrlIrq => "USBCTRL_IRQ",
            Interrupt::XipIrq => "XIP_IRQ",
            Interrupt::Pio0Irq0 => "PIO0_IRQ_0",
            Interrupt::Pio0Irq1 => "PIO0_IRQ_1",
            Interrupt::Pio1Irq0 => "PIO1_IRQ_0",
            Interrupt::Pio1Irq1 => "PIO1_IRQ_1",
            Interrupt::DmaIrq0 => "DMA_IRQ_0",
            Interrupt::DmaIrq1 => "DMA_IRQ_1",
            Interrupt::IoIrqBank0 => "IO_IRQ_BANK0",
            Interrupt::IoIrqQspi => "IO_IRQ_QSPI",
            Interrupt::SioIrqProc0 => "SIO_IRQ_PROC0",
            Interrupt::SioIrqProc1 => "SIO_IRQ_PROC1",
            Interrupt::ClocksIrq => "CLOCKS_IRQ",
            Interrupt::Spi0Irq => "SPI0_IRQ",
            Interrupt::Spi1Irq => "SPI1_IRQ",
            Interrupt::Uart0Irq => "UART0_IRQ",
            Interrupt::Uart1Irq => "UART1_IRQ",
            Interrupt::AdcIrqFifo => "ADC_IRQ_FIFO",
            Interrupt::I2c0Irq => "I2C0_IRQ",
            Interrupt::I2c1Irq => "I2C1_IRQ",
            Interrupt::RtcIrq => "RTC_IRQ",
            Interrupt::SpareIrq26 => "SPARE_IRQ_26",
            Interrupt::SpareIrq27 => "SPARE_IRQ_27",
            Interrupt::SpareIrq28 => "SPARE_IRQ_28",
            Interrupt::SpareIrq29 => "SPARE_IRQ_29",
            Interrupt::SpareIrq30 => "SPARE_IRQ_30",
            Interrupt::SpareIrq31 => "SPARE_IRQ_31",
        }
    }
}

const PRIO_SHIFT: u32 = 8 - PRIORITY_BITS;

/// The RP2040 implements two bits of priority, or four levels.  `P0` is the
/// most urgent.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Priority {
    P0 = 0, P1, P2, P3,
}

/// Extension trait for `arm_m::nvic::Nvic` adding operations that deal in
/// RP2040-specific enumerations.  Semantics are those of the corresponding
/// `_raw` methods.
pub trait NvicExt {
    fn enable_irq(&self, irq: Interrupt);
    fn disable_irq(&self, irq: Interrupt);
    fn pend_irq(&self, irq: Interrupt);
    fn unpend_irq(&self, irq: Interrupt);
    fn is_enabled(&self, irq: Interrupt) -> bool;
    fn is_pending(&self, irq: Interrupt) -> bool;
    fn set_priority(&self, irq: Interrupt, priority: Priority);
    fn get_priority(&self, irq: Interrupt) -> Priority;

    /// Runs `f` with `irq` masked.  See `Nvic::with_irq_masked_raw`.
    fn with_irq_masked<R, F: FnOnce() -> R>(&self, irq: Interrupt, f: F) -> R;
}

impl NvicExt for nvic::Nvic {
    fn enable_irq(&self, irq: Interrupt) {
        self.enable_irq_raw(irq.irq())
    }

    fn disable_irq(&self, irq: Interrupt) {
        self.disable_irq_raw(irq.irq())
    }

    fn pend_irq(&self, irq: Interrupt) {
        self.pend_irq_raw(irq.irq())
    }

    fn unpend_irq(&self, irq: Interrupt) {
        self.unpend_irq_raw(irq.irq())
    }

    fn is_enabled(&self, irq: Interrupt) -> bool {
        self.is_enabled_raw(irq.irq())
    }

    fn is_pending(&self, irq: Interrupt) -> bool {
        self.is_pending_raw(irq.irq())
    }

    fn set_priority(&self, irq: Interrupt, priority: Priority) {
        self.set_priority_raw(irq.irq(), (priority as u8) << PRIO_SHIFT)
    }

    fn get_priority(&self, irq: Interrupt) -> Priority {
        match self.get_priority_raw(irq.irq()) >> PRIO_SHIFT {
            0 => Priority::P0,
            1 => Priority::P1,
            2 => Priority::P2,
            _ => Priority::P3,
        }
    }

    fn with_irq_masked<R, F: FnOnce() -> R>(&self, irq: Interrupt, f: F) -> R {
        self.with_irq_masked_raw(irq.irq(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arm_m::nvic::Nvic;
    use crate::testing::FakeWindow;

    fn words(t: &InterruptTable) -> [usize; INTERRUPT_COUNT] {
        unsafe { core::mem::transmute_copy(t) }
    }

    extern "C" fn gpio() {}
    extern "C" fn uart() {}

    #[test]
    fn enumeration_matches_line_numbers() {
        for (n, irq) in Interrupt::ALL.iter().enumerate() {
            assert_eq!(irq.irq() as usize, n);
            assert_eq!(irq.vector_index(), 16 + n);
        }
        assert_eq!(Interrupt::IoIrqBank0.irq(), 13);
        assert_eq!(Interrupt::RtcIrq.irq(), 25);
    }

    #[test]
    fn default_table_is_all_trap() {
        let trap = default_handler as usize;
        assert!(words(&DEFAULT_TABLE).iter().all(|&w| w == trap));
    }

    #[test]
    fn overrides_land_at_their_line_number() {
        let t = InterruptTable {
            io_irq_bank0: gpio,
            uart0_irq: uart,
            .. DEFAULT_TABLE
        };
        let w = words(&t);
        let trap = default_handler as usize;

        for irq in Interrupt::ALL {
            let expected = match irq {
                Interrupt::IoIrqBank0 => gpio as usize,
                Interrupt::Uart0Irq => uart as usize,
                _ => trap,
            };
            assert_eq!(w[irq.irq() as usize], expected, "{}", irq.name());
        }
    }

    #[test]
    fn priorities_use_the_top_two_bits() {
        let w = FakeWindow::new(0x400);
        let nvic = unsafe { Nvic::at(w.base()) };

        nvic.set_priority(Interrupt::IoIrqBank0, Priority::P2);
        assert_eq!(w.word(0x30c), 0x80 << 8);
        assert_eq!(nvic.get_priority(Interrupt::IoIrqBank0), Priority::P2);
        assert_eq!(nvic.get_priority(Interrupt::IoIrqQspi), Priority::P0);
    }

    #[test]
    fn enable_uses_the_line_number() {
        let w = FakeWindow::new(0x400);
        let nvic = unsafe { Nvic::at(w.base()) };

        nvic.enable_irq(Interrupt::IoIrqBank0);
        assert_eq!(w.word(0), 1 << 13);
    }
}
