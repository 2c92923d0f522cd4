//! Foreground: bring the board up, show that it's alive, arm the button, and
//! then sleep.  Everything after that happens in `button::io_irq_bank0`.

use picors::arm_m::nvic::Nvic;
use picors::delay::Delay;
use picors::rp2040::io_bank0::{Events, Function, IoBank0};
use picors::rp2040::irq::{Interrupt, NvicExt};
use picors::rp2040::pads_bank0::{PadCtrl, PadsBank0};
use picors::rp2040::resets::{Resets, Subsystems};
use picors::rp2040::sio::Sio;

use crate::config::{self, BUTTON, LED, OUTPUTS, SPEAKER};

/// Number of pulses in the startup pattern.
const STARTUP_PULSES: u32 = 3;
/// Gap between pulses of the startup pattern.
const STARTUP_GAP_US: u32 = 50_000;
/// The LED-only flash that ends the startup pattern.
const READY_FLASH_US: u32 = 250_000;

/// The peripherals the foreground touches.
pub struct Board<'a, D> {
    pub resets: &'a Resets,
    pub io: &'a IoBank0,
    pub pads: &'a PadsBank0,
    pub sio: &'a Sio,
    pub nvic: &'a Nvic,
    pub delay: &'a D,
}

impl<D: Delay> Board<'_, D> {
    /// Releases the GPIO blocks from reset and routes the three pins to SIO:
    /// the button as a pulled-up input, the LED and speaker as outputs that
    /// start low.
    pub fn bring_up(&self) {
        self.resets.unreset(Subsystems::IO_BANK0 | Subsystems::PADS_BANK0);

        self.sio.disable_output(BUTTON.mask());
        self.pads.configure(BUTTON, PadCtrl::pulled_up_input());
        self.io.select_function(BUTTON, Function::Sio);

        self.sio.set_low(OUTPUTS);
        self.sio.enable_output(OUTPUTS);
        for pin in [LED, SPEAKER] {
            self.io.select_function(pin, Function::Sio);
        }
    }

    /// A few pulses, then a long LED-only flash.
    pub fn startup_pattern(&self) {
        for _ in 0..STARTUP_PULSES {
            self.sio.set_high(OUTPUTS);
            self.delay.delay_us(config::PULSE.hold_us);
            self.sio.set_low(OUTPUTS);
            self.delay.delay_us(STARTUP_GAP_US);
        }

        self.sio.set_high(LED.mask());
        self.delay.delay_us(READY_FLASH_US);
        self.sio.set_low(LED.mask());
    }

    /// Lets button presses interrupt.  Any edge latched during bring-up is
    /// discarded first, so the handler only sees presses from here on.
    ///
    /// After this the foreground must not use the delay timer; it belongs to
    /// the handler.
    pub fn arm_button(&self) {
        self.io.clear_events(BUTTON, Events::EDGES);
        self.io.enable_proc0_events(BUTTON, Events::EDGE_HIGH);
        self.nvic.enable_irq(Interrupt::IoIrqBank0);
    }
}

/// Application entry.
#[cfg(target_os = "none")]
pub fn run() {
    use log::info;

    use picors::arm_m::{self, nvic::NVIC};
    use picors::rp2040::io_bank0::IO_BANK0;
    use picors::rp2040::pads_bank0::PADS_BANK0;
    use picors::rp2040::resets::RESETS;
    use picors::rp2040::sio::SIO;

    use crate::button;

    let board = Board {
        resets: &RESETS,
        io: &IO_BANK0,
        pads: &PADS_BANK0,
        sio: &SIO,
        nvic: &NVIC,
        delay: &button::PULSE_TIMER,
    };

    info!("transmitter: core {}", board.sio.core_id());
    board.bring_up();
    board.startup_pattern();
    board.arm_button();
    info!("transmitter: armed");

    loop {
        arm_m::wait_for_interrupt()
    }
}
