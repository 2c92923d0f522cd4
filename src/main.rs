//! Button-triggered transmitter for the Raspberry Pi Pico.
//!
//! Every press of the button on GPIO16 sends one pulse on the LED and the
//! speaker.  The foreground sets the board up and then sleeps; the work is
//! done by the `IO_IRQ_BANK0` handler.
//!
//! Built for the host, this prints the vector table's layout and bindings
//! instead.

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

// The host build only lists the vector table.
#[cfg(any(test, target_os = "none"))]
mod app;
mod button;
mod config;
mod vectors;

#[cfg(test)]
mod fake;

#[cfg(target_os = "none")]
mod image {
    use picors::arm_m::startup::_reset_vector;
    use picors::picors_entry;
    use picors::rp2040::vectors::VectorTable;

    extern "C" {
        /// Top of the stack, defined by the linker script.
        static __STACK_BASE: u32;
    }

    /// Stage-2 bootloader for the Pico's W25Q080 flash.  The boot ROM runs
    /// this to set up execute-in-place before reading `VECTORS`.
    #[no_mangle]
    #[used]
    #[link_section = ".boot2"]
    pub static BOOT2: [u8; 256] = rp2040_boot2::BOOT_LOADER_W25Q080;

    /// The ROM vector table.  Placed directly after `BOOT2` by the linker
    /// script, which also checks that it lands there.  Note that it is not
    /// `mut`.
    #[no_mangle]
    #[link_section = ".vector_table"]
    pub static VECTORS: VectorTable =
        crate::vectors::vector_table(unsafe { &__STACK_BASE }, _reset_vector);

    picors_entry!(crate::app::run);
}

#[cfg(not(target_os = "none"))]
fn main() {
    use picors::arm_m::trap;
    use picors::rp2040::vectors::{Vector, LAYOUT};

    // Stand-ins for the two words only the linker can fill in.
    static STACK: u32 = 0;
    unsafe extern "C" fn parked() -> ! {
        trap::halt()
    }

    let table = vectors::vector_table(&STACK, parked);
    for (index, vector) in LAYOUT.iter().enumerate() {
        let word = table.entry(index).unwrap_or(0);
        let binding = match vector {
            Vector::StackTop => "__STACK_BASE",
            Vector::Reset => "_reset_vector",
            Vector::Reserved => "-",
            _ => vectors::handler_name(word).unwrap_or("?"),
        };
        println!("{:>2}  {:#05x}  {:<14} {}",
                 index, index * 4, vector.name(), binding);
    }
}
