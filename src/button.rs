//! The button edge handler: one rising edge on the button pin, one pulse on
//! the LED and speaker.

use picors::arm_m::sys_tick::SYS_TICK;
use picors::delay::{Delay, SysTickDelay};
use picors::rp2040::io_bank0::{Events, IoBank0, IO_BANK0};
use picors::rp2040::sio::{Sio, SIO};

use crate::config::{self, Pulse, BUTTON, OUTPUTS};

/// Times pulses.  Shared by the foreground's startup pattern and the handler,
/// which never run at the same time: the foreground is finished with it before
/// it enables `IO_IRQ_BANK0`.
pub static PULSE_TIMER: SysTickDelay =
    SysTickDelay::new(&SYS_TICK, config::CORE_CLOCK_HZ);

/// Sends one pulse if the button's rising edge is pending for this core, then
/// clears that edge.  Returns whether it did.
///
/// Only the button's own INTR bits are cleared, so other pins' events sharing
/// `IO_IRQ_BANK0` stay pending.  Edges that arrive during the pulse are folded
/// into the one being serviced.
pub fn service<D: Delay>(io: &IoBank0, sio: &Sio, delay: &D, pulse: Pulse)
    -> bool
{
    if !io.proc0_events(BUTTON).contains(Events::EDGE_HIGH) {
        return false
    }

    sio.set_high(OUTPUTS);
    delay.delay_us(pulse.hold_us);
    sio.set_low(OUTPUTS);

    io.clear_events(BUTTON, Events::EDGES);
    true
}

/// Bound to `IO_IRQ_BANK0`.
pub extern "C" fn io_irq_bank0() {
    service(&IO_BANK0, &SIO, &PULSE_TIMER, config::PULSE);
}
