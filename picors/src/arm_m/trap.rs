//! The default trap: where the processor goes when an interrupt fires that
//! nobody bound a handler for, and where it parks when there is nothing left
//! to run.

use crate::arm_m;

/// The capability to suspend execution until the next interrupt.  There is no
/// timeout and no cancellation: the only way out is another interrupt.
pub trait Idle {
    fn wait_for_interrupt(&self);
}

/// `Idle` backed by the `WFI` instruction.
#[derive(Copy, Clone, Debug, Default)]
pub struct Wfi;

impl Idle for Wfi {
    #[inline]
    fn wait_for_interrupt(&self) {
        arm_m::wait_for_interrupt()
    }
}

/// Waits for interrupts forever.
///
/// An interrupt that wakes the processor is dispatched through the vector
/// table as usual; when its handler returns, execution resumes here and goes
/// straight back to sleep.
pub fn halt_on<I: Idle>(idle: &I) -> ! {
    loop {
        idle.wait_for_interrupt()
    }
}

/// `halt_on` the real processor.
#[inline]
pub fn halt() -> ! {
    halt_on(&Wfi)
}

/// Handler for every vector the application did not bind.
///
/// This never returns, though its type says otherwise: every vector shares
/// the `Handler` signature, and a diverging function pointer doesn't coerce to
/// it.  Entering the handler leaves the processor in handler mode at the
/// priority of the unhandled exception, asleep, so only higher-priority
/// exceptions can run from here on.
pub extern "C" fn default_handler() {
    halt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CountingIdle;
    use std::panic::{self, AssertUnwindSafe};

    #[test]
    fn halt_keeps_waiting_after_every_wake() {
        let idle = CountingIdle::new(5);
        let r = panic::catch_unwind(AssertUnwindSafe(|| halt_on(&idle)));

        // The only way out was the test's own panic, after five waits.
        assert!(r.is_err());
        assert_eq!(idle.waits(), 5);
    }
}
