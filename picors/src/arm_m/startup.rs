//! Rust runtime startup for ARMv6-M bare metal targets.
//!
//! Use `_reset_vector` as the reset vector, and declare the application entry
//! point with `picors_entry!`.  The linker script must define `_data_load`,
//! `_data`, `_edata`, `_bss` and `_ebss`, word-aligned.

use core::arch::global_asm;

use crate::arm_m::{boot, trap};

extern "C" {
    /// The reset vector.  Copies initialized data out of flash, zeroes BSS,
    /// then calls `picors_boot`.  Written in assembly because no Rust code
    /// that touches a static is sound before this has finished.
    pub fn _reset_vector() -> !;
}

// Thumb-1 only: ARMv6-M has no post-indexed loads and stores, so the copy
// loops walk the pointers with `ldm`/`stm` writeback.
global_asm!(r#"
    .section .text._reset_vector, "ax", %progbits
    .global _reset_vector
    .type _reset_vector, %function
    .thumb_func
_reset_vector:
    @ Initialize data.
    ldr r0, =_data_load
    ldr r1, =_data
    ldr r2, =_edata
    b 1f
0:  ldm r0!, {{r3}}
    stm r1!, {{r3}}
1:  cmp r1, r2
    bne 0b

    @ Zero BSS.
    ldr r0, =_bss
    ldr r1, =_ebss
    movs r2, #0
    b 1f
0:  stm r0!, {{r2}}
1:  cmp r0, r1
    bne 0b

    bl picors_boot
    udf #0
    .ltorg
    .size _reset_vector, . - _reset_vector
"#);

/// The boot sequencer proper.  Called exactly once, by `_reset_vector`.
#[no_mangle]
extern "C" fn picors_boot() -> ! {
    extern "C" {
        fn picors_main();
    }

    boot::run(|| unsafe { picors_main() }, &trap::Wfi)
}
