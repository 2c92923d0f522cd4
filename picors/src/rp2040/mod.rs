//! Support for the Raspberry Pi RP2040.
//!
//! Only the pieces needed to boot and to service a GPIO edge interrupt are
//! here: the vector table, the NVIC interrupt numbering, and the RESETS, SIO,
//! IO_BANK0 and PADS_BANK0 blocks.

pub mod atomic;
pub mod io_bank0;
pub mod irq;
pub mod pads_bank0;
pub mod resets;
pub mod sio;
pub mod vectors;
