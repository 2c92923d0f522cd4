//! The transmitter's vector table: the button handler on `IO_IRQ_BANK0`,
//! the default trap everywhere else.

use picors::arm_m::exc::{self, ResetHandler};
use picors::rp2040::irq::{self, InterruptTable};
use picors::rp2040::vectors::VectorTable;

use crate::button;

/// Builds the table around the given initial stack pointer and reset vector.
/// The firmware image passes the linker's stack top and `_reset_vector`.
pub const fn vector_table(initial_stack: *const u32, reset: ResetHandler)
    -> VectorTable
{
    VectorTable {
        exceptions: exc::default_exception_table(initial_stack, reset),
        interrupts: InterruptTable {
            io_irq_bank0: button::io_irq_bank0,
            .. irq::DEFAULT_TABLE
        },
    }
}

/// Names the handler a table word points at, for the layout listing.
#[cfg(any(test, not(target_os = "none")))]
pub fn handler_name(word: usize) -> Option<&'static str> {
    if word == picors::arm_m::trap::default_handler as usize {
        Some("default trap")
    } else if word == button::io_irq_bank0 as usize {
        Some("button::io_irq_bank0")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picors::rp2040::irq::Interrupt;
    use picors::rp2040::vectors::{Vector, LAYOUT, VECTOR_COUNT};

    static STACK: u32 = 0;

    unsafe extern "C" fn reset() -> ! {
        panic!("not called")
    }

    #[test]
    fn button_is_the_only_override() {
        let words = vector_table(&STACK, reset).words();
        let gpio = Interrupt::IoIrqBank0.vector_index();
        assert_eq!(gpio, 29);

        for index in 0..VECTOR_COUNT {
            let name = match LAYOUT[index] {
                Vector::StackTop | Vector::Reset | Vector::Reserved => continue,
                _ => handler_name(words[index]),
            };
            if index == gpio {
                assert_eq!(name, Some("button::io_irq_bank0"));
            } else {
                assert_eq!(name, Some("default trap"), "index {}", index);
            }
        }
    }

    #[test]
    fn fixed_slots() {
        let t = vector_table(&STACK, reset);
        assert_eq!(t.entry(0), Some(&STACK as *const u32 as usize));
        assert_eq!(t.entry(1), Some(reset as usize));
        for index in (4..=10).chain(12..=13) {
            assert_eq!(t.entry(index), Some(0));
        }
    }
}
