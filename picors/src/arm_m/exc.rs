//! The ARMv6-M exception table: the architecturally defined first sixteen words
//! of the vector table.

use static_assertions::const_assert_eq;

use crate::arm_m::trap;

/// ARMv6-M interrupt and exception handlers are merely functions conforming to
/// the C ABI.  The processor stacks the caller-saved registers itself, so no
/// special prologue is needed.
///
/// A handler for an edge-triggered source must clear that source before it
/// returns.  If it doesn't, the interrupt is still pending on exception return
/// and the handler is entered again immediately; nothing here can detect that.
pub type Handler = extern "C" fn();

/// The reset vector is special: it must not return.  We model this in the type
/// system as a diverging function.  It is also `unsafe`, because it runs before
/// `.data` and `.bss` are initialized, and calling it from a running program
/// would wipe out every static.
pub type ResetHandler = unsafe extern "C" fn() -> !;

/// Number of words in the architectural part of the vector table.
pub const EXCEPTION_COUNT: usize = 16;

/// Represents the ARMv6-M exception table.
///
/// Bindable vectors use the `Handler` type, which is a function pointer and can
/// never be null, so a slot cannot be left dispatching into address zero.
/// Entries the architecture reserves are `Option<Handler>` and are `None` in
/// every table built here; they are `pub` only so that functional record
/// update works from outside this module.
///
/// On the -M profile the vector table has two parts: the exception vectors
/// (described here), immediately followed by the vendor-specific interrupt
/// vectors handled through the NVIC.  See `rp2040::vectors::VectorTable` for
/// the concatenation.
#[repr(C)]
pub struct ExceptionTable {
    /// ARMv6-M processors load their initial stack pointer from the first word
    /// of the vector table.  This will be the contents of `sp` on entry to
    /// `reset` below.
    ///
    /// ARM uses a "full descending" stack, so the initial `sp` usually points
    /// just past the end of RAM.  We model it as a `const` pointer to
    /// discourage dereferencing it.
    pub initial_stack: *const u32,

    /// Reset vector.  At reset, the processor loads its stack pointer from
    /// `initial_stack` and then enters this function using the AAPCS C ABI.
    pub reset: ResetHandler,

    /// Non-Maskable Interrupt handler.
    pub nmi:          Handler,
    /// Hard Fault handler.  ARMv6-M has no configurable faults; every fault
    /// escalates here.
    pub hard_fault:   Handler,
    pub _reserved0:   [Option<Handler>; 7],
    /// Supervisor Call (`SVC`) handler.
    pub sv_call:      Handler,
    pub _reserved1:   [Option<Handler>; 2],
    /// PendSV handler.
    pub pend_sv:      Handler,
    /// SysTick handler.
    pub sys_tick:     Handler,
}

/// An exception table with the stack pointer and reset vector filled in, and
/// every other bindable vector bound to `trap::default_handler`.  Applications
/// override individual vectors with functional record update syntax:
///
/// ```
/// use picors::arm_m::exc::{self, ExceptionTable};
/// # extern "C" fn my_hard_fault() {}
/// # unsafe extern "C" fn reset() -> ! { loop {} }
/// # static STACK: u32 = 0;
///
/// let table = ExceptionTable {
///     hard_fault: my_hard_fault,
///     .. exc::default_exception_table(&STACK, reset)
/// };
/// # let _ = table;
/// ```
pub const fn default_exception_table(initial_stack: *const u32,
                                     reset: ResetHandler) -> ExceptionTable {
    ExceptionTable {
        initial_stack,
        reset,

        nmi: trap::default_handler,
        hard_fault: trap::default_handler,
        _reserved0: [None; 7],
        sv_call: trap::default_handler,
        _reserved1: [None; 2],
        pend_sv: trap::default_handler,
        sys_tick: trap::default_handler,
    }
}

/// The table is placed in ROM and read by hardware only.  The raw stack
/// pointer keeps the compiler from deriving `Sync`; it is never dereferenced.
unsafe impl Sync for ExceptionTable {}

/// Names the bindable ARMv6-M exceptions by their vector number.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Exception {
    Nmi = 2,
    HardFault = 3,
    SvCall = 11,
    PendSv = 14,
    SysTick = 15,
}

impl Exception {
    pub const ALL: [Exception; 5] = [
        Exception::Nmi,
        Exception::HardFault,
        Exception::SvCall,
        Exception::PendSv,
        Exception::SysTick,
    ];

    /// Index of this exception's entry in the vector table.
    pub const fn vector_index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Exception::Nmi => "NMI",
            Exception::HardFault => "HardFault",
            Exception::SvCall => "SVCall",
            Exception::PendSv => "PendSV",
            Exception::SysTick => "SysTick",
        }
    }
}

const WORD: usize = core::mem::size_of::<usize>();

const_assert_eq!(core::mem::size_of::<ExceptionTable>(), EXCEPTION_COUNT * WORD);
const_assert_eq!(core::mem::offset_of!(ExceptionTable, reset), WORD);
const_assert_eq!(core::mem::offset_of!(ExceptionTable, nmi),
                 Exception::Nmi as usize * WORD);
const_assert_eq!(core::mem::offset_of!(ExceptionTable, hard_fault),
                 Exception::HardFault as usize * WORD);
const_assert_eq!(core::mem::offset_of!(ExceptionTable, sv_call),
                 Exception::SvCall as usize * WORD);
const_assert_eq!(core::mem::offset_of!(ExceptionTable, pend_sv),
                 Exception::PendSv as usize * WORD);
const_assert_eq!(core::mem::offset_of!(ExceptionTable, sys_tick),
                 Exception::SysTick as usize * WORD);

#[cfg(test)]
mod tests {
    use super::*;

    static STACK: u32 = 0;

    unsafe extern "C" fn test_reset() -> ! {
        panic!("reset is never called from tests")
    }

    extern "C" fn fault() {}

    fn words(t: &ExceptionTable) -> [usize; EXCEPTION_COUNT] {
        unsafe { core::mem::transmute_copy(t) }
    }

    #[test]
    fn default_table_binds_everything_to_the_trap() {
        let t = default_exception_table(&STACK, test_reset);
        let w = words(&t);
        let trap = trap::default_handler as usize;

        assert_eq!(w[0], &STACK as *const u32 as usize);
        assert_eq!(w[1], test_reset as usize);
        for e in Exception::ALL {
            assert_eq!(w[e.vector_index()], trap, "{}", e.name());
        }
        for reserved in (4..=10).chain(12..=13) {
            assert_eq!(w[reserved], 0, "entry {}", reserved);
        }
    }

    #[test]
    fn override_replaces_only_its_own_slot() {
        let t = ExceptionTable {
            hard_fault: fault,
            .. default_exception_table(&STACK, test_reset)
        };
        let w = words(&t);

        assert_eq!(w[Exception::HardFault.vector_index()], fault as usize);
        assert_eq!(w[Exception::Nmi.vector_index()],
                   trap::default_handler as usize);
        assert_eq!(w[Exception::SysTick.vector_index()],
                   trap::default_handler as usize);
    }
}
