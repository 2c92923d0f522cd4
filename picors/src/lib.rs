//! Boot and interrupt-dispatch support for ARMv6-M microcontrollers, with an
//! SoC layer for the Raspberry Pi RP2040.
//!
//! The crate is split the way the hardware is: `arm_m` covers what ARM
//! specifies (exception table, NVIC, SysTick, reset and the default trap),
//! while `rp2040` covers what the vendor adds (the interrupt half of the
//! vector table and the peripherals needed to service a GPIO edge).

#![cfg_attr(not(any(test, feature = "testing")), no_std)]

#![deny(
    unused_import_braces,
    trivial_numeric_casts,
    unused_extern_crates,
    )]

#[macro_use]
pub mod bits;

pub mod arm_m;
pub mod delay;

#[cfg(feature = "soc-rp2040")]
pub mod rp2040;

#[cfg(all(target_os = "none", not(feature = "app_panic_handler")))]
mod lang;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
