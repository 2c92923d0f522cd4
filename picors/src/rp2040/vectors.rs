//! The complete RP2040 vector table, and its published layout.
//!
//! The boot stage reads the table from the start of the image (after the
//! 256-byte second-stage bootloader, at `0x1000_0100`), points VTOR at it,
//! loads `sp` from word 0 and jumps to word 1.  From then on the NVIC indexes
//! it by exception number for every exception and interrupt.
//!
//! Nothing here can make the hardware read the table from the right place;
//! that is the linker script's job, and `link.x` asserts it.  What this module
//! does guarantee is the table's shape: its size and the index of every named
//! vector are checked at compile time against `LAYOUT`, which spells out the
//! ARMv6-M exception model followed by the RP2040 datasheet's interrupt list.

use static_assertions::const_assert_eq;

use crate::arm_m::exc::{Exception, ExceptionTable, EXCEPTION_COUNT};
use crate::rp2040::irq::{Interrupt, InterruptTable, INTERRUPT_COUNT};

/// Number of words in the vector table.
pub const VECTOR_COUNT: usize = EXCEPTION_COUNT + INTERRUPT_COUNT;

/// The table must be aligned to its size rounded up to a power of two for
/// VTOR.
pub const VECTOR_TABLE_ALIGN: usize = 256;

/// Offset of the table from the start of flash: the boot ROM loads the first
/// 256 bytes as the second-stage bootloader.
pub const VECTOR_TABLE_FLASH_OFFSET: usize = 0x100;

/// The RP2040 vector table: the ARMv6-M exception table, immediately followed
/// by the NVIC interrupt vectors.
///
/// A firmware image has exactly one of these, as an immutable `static` in the
/// `.vector_table` section:
///
/// ```ignore
/// #[no_mangle]
/// #[link_section = ".vector_table"]
/// pub static VECTORS: VectorTable = VectorTable {
///     exceptions: exc::default_exception_table(stack_top, _reset_vector),
///     interrupts: InterruptTable {
///         io_irq_bank0: on_gpio,
///         .. irq::DEFAULT_TABLE
///     },
/// };
/// ```
#[repr(C)]
pub struct VectorTable {
    pub exceptions: ExceptionTable,
    pub interrupts: InterruptTable,
}

const WORD: usize = core::mem::size_of::<usize>();

const_assert_eq!(core::mem::size_of::<VectorTable>(), VECTOR_COUNT * WORD);
const_assert_eq!(core::mem::offset_of!(VectorTable, interrupts),
                 EXCEPTION_COUNT * WORD);
const_assert_eq!(core::mem::offset_of!(InterruptTable, io_irq_bank0),
                 Interrupt::IoIrqBank0 as usize * WORD);
const_assert_eq!(core::mem::offset_of!(InterruptTable, rtc_irq),
                 Interrupt::RtcIrq as usize * WORD);
const_assert_eq!(core::mem::offset_of!(InterruptTable, spare_irq_31),
                 Interrupt::SpareIrq31 as usize * WORD);

impl VectorTable {
    /// The table as the hardware sees it: one word per vector.
    pub fn words(&self) -> [usize; VECTOR_COUNT] {
        // Every field is a pointer-sized pointer or `Option` of a function
        // pointer, which has the same representation with `None` as zero.
        unsafe { core::mem::transmute_copy(self) }
    }

    /// The word at `index`, or `None` past the end of the table.
    pub fn entry(&self, index: usize) -> Option<usize> {
        self.words().get(index).copied()
    }
}

/// What the hardware expects to find at one index of the vector table.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Vector {
    /// Word 0: the initial main stack pointer.
    StackTop,
    /// Word 1: the reset vector.
    Reset,
    Exception(Exception),
    /// Architecturally reserved; never dispatched, always zero.
    Reserved,
    Interrupt(Interrupt),
}

/// The documented layout, index by index.
pub const LAYOUT: [Vector; VECTOR_COUNT] = build_layout();

const fn build_layout() -> [Vector; VECTOR_COUNT] {
    let mut layout = [Vector::Reserved; VECTOR_COUNT];
    layout[0] = Vector::StackTop;
    layout[1] = Vector::Reset;

    let mut i = 0;
    while i < Exception::ALL.len() {
        let e = Exception::ALL[i];
        layout[e.vector_index()] = Vector::Exception(e);
        i += 1;
    }

    let mut i = 0;
    while i < INTERRUPT_COUNT {
        let irq = Interrupt::ALL[i];
        layout[irq.vector_index()] = Vector::Interrupt(irq);
        i += 1;
    }
    layout
}

impl Vector {
    /// The vector at `index`, or `None` past the end of the table.
    pub fn at(index: usize) -> Option<Vector> {
        LAYOUT.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Vector::StackTop => "initial SP",
            Vector::Reset => "Reset",
            Vector::Exception(e) => e.name(),
            Vector::Reserved => "reserved",
            Vector::Interrupt(irq) => irq.name(),
        }
    }

    /// Whether an application can bind a handler here.
    pub fn is_bindable(self) -> bool {
        matches!(self, Vector::Exception(_) | Vector::Interrupt(_))
    }
}

/// The table is only ever read, by hardware.
unsafe impl Sync for VectorTable {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arm_m::exc;
    use crate::arm_m::trap::default_handler;
    use crate::rp2040::irq;

    static STACK: u32 = 0;

    unsafe extern "C" fn test_reset() -> ! {
        panic!("reset is never called from tests")
    }

    extern "C" fn on_gpio() {}
    extern "C" fn on_hard_fault() {}

    fn table() -> VectorTable {
        VectorTable {
            exceptions: ExceptionTable {
                hard_fault: on_hard_fault,
                .. exc::default_exception_table(&STACK, test_reset)
            },
            interrupts: InterruptTable {
                io_irq_bank0: on_gpio,
                .. irq::DEFAULT_TABLE
            },
        }
    }

    #[test]
    fn layout_matches_the_armv6m_and_rp2040_documentation() {
        assert_eq!(LAYOUT.len(), 48);
        assert_eq!(LAYOUT[0], Vector::StackTop);
        assert_eq!(LAYOUT[1], Vector::Reset);
        assert_eq!(LAYOUT[2], Vector::Exception(Exception::Nmi));
        assert_eq!(LAYOUT[3], Vector::Exception(Exception::HardFault));
        for i in (4..=10).chain(12..=13) {
            assert_eq!(LAYOUT[i], Vector::Reserved, "index {}", i);
        }
        assert_eq!(LAYOUT[11], Vector::Exception(Exception::SvCall));
        assert_eq!(LAYOUT[14], Vector::Exception(Exception::PendSv));
        assert_eq!(LAYOUT[15], Vector::Exception(Exception::SysTick));
        assert_eq!(LAYOUT[16], Vector::Interrupt(Interrupt::TimerIrq0));
        assert_eq!(LAYOUT[29], Vector::Interrupt(Interrupt::IoIrqBank0));
        assert_eq!(LAYOUT[41], Vector::Interrupt(Interrupt::RtcIrq));
        assert_eq!(LAYOUT[47], Vector::Interrupt(Interrupt::SpareIrq31));
    }

    #[test]
    fn every_index_holds_what_the_layout_says() {
        let t = table();
        let words = t.words();
        let trap = default_handler as usize;

        for (index, vector) in LAYOUT.iter().enumerate() {
            let expected = match *vector {
                Vector::StackTop => &STACK as *const u32 as usize,
                Vector::Reset => test_reset as usize,
                Vector::Reserved => 0,
                Vector::Exception(Exception::HardFault) => on_hard_fault as usize,
                Vector::Interrupt(Interrupt::IoIrqBank0) => on_gpio as usize,
                Vector::Exception(_) | Vector::Interrupt(_) => trap,
            };
            assert_eq!(words[index], expected, "{} at {}", vector.name(), index);
        }
    }

    #[test]
    fn no_bindable_slot_is_null() {
        let t = table();
        for (index, vector) in LAYOUT.iter().enumerate() {
            if vector.is_bindable() {
                assert_ne!(t.entry(index), Some(0), "{}", vector.name());
            }
        }
        assert_eq!(t.entry(VECTOR_COUNT), None);
    }

    #[test]
    fn stack_and_reset_do_not_depend_on_bindings() {
        let bare = VectorTable {
            exceptions: exc::default_exception_table(&STACK, test_reset),
            interrupts: irq::DEFAULT_TABLE,
        };
        let bound = table();
        assert_eq!(bare.entry(0), bound.entry(0));
        assert_eq!(bare.entry(1), bound.entry(1));
    }

    #[test]
    fn vector_lookup_and_names() {
        assert_eq!(Vector::at(29).map(Vector::name), Some("IO_IRQ_BANK0"));
        assert_eq!(Vector::at(0).map(Vector::is_bindable), Some(false));
        assert_eq!(Vector::at(48), None);
    }
}
