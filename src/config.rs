//! Board wiring and timing for the transmitter.

use picors::rp2040::io_bank0::Pin;
use picors::rp2040::sio::Pins;

/// Push button to ground; the pad's pull-up holds the pin high otherwise.
pub const BUTTON: Pin = Pin::new(16);
/// Piezo speaker, driven high for the length of a pulse.
pub const SPEAKER: Pin = Pin::new(21);
/// The Pico's on-board LED.
pub const LED: Pin = Pin::new(25);

/// Nominal frequency of the ring oscillator the RP2040 runs from out of reset.
/// It varies from part to part, so delays derived from it are approximate.
pub const CORE_CLOCK_HZ: u32 = 6_500_000;

/// One transmitted pulse: LED and speaker on for `hold_us`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Pulse {
    pub hold_us: u32,
}

pub const PULSE: Pulse = Pulse { hold_us: 50_000 };

/// Everything a pulse drives.
pub const OUTPUTS: Pins = LED.mask().union(SPEAKER.mask());
