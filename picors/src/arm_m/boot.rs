//! The boot sequencer: what runs once the reset vector has established the
//! Rust runtime, up to and (should it ever return) past application entry.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::arm_m::trap::{self, Idle};

/// Where the boot sequencer is.  There are only two states, and the only
/// transition is `Running` to `Halted`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BootState {
    /// Application entry has been called and has not returned.
    Running = 0,
    /// Application entry returned.  Correct firmware never gets here; the
    /// processor waits for interrupts forever and nothing else is attempted.
    Halted = 1,
}

// ARMv6-M has no atomic read-modify-write, but byte loads and stores are
// atomic, which is all this needs.
static STATE: AtomicU8 = AtomicU8::new(BootState::Running as u8);

/// Reports the boot state.  Mostly useful from a debugger, or from an interrupt
/// handler that wants to know whether the foreground is still alive.
pub fn state() -> BootState {
    match STATE.load(Ordering::Relaxed) {
        0 => BootState::Running,
        _ => BootState::Halted,
    }
}

/// Runs application `entry`.  If it returns, parks the processor on `idle`.
///
/// No recovery, reset or reporting is attempted: there is no I/O channel
/// assumed at this layer, and returning from entry means the firmware's own
/// logic is broken.
pub fn run<F: FnOnce(), I: Idle>(entry: F, idle: &I) -> ! {
    STATE.store(BootState::Running as u8, Ordering::Relaxed);
    entry();
    STATE.store(BootState::Halted as u8, Ordering::Relaxed);
    trap::halt_on(idle)
}

/// Declares the application entry point.  The reset vector calls it once the
/// runtime is initialized, with interrupts enabled at the processor and all
/// peripherals in their reset state.
///
/// ```ignore
/// fn app() {
///     // set things up, then
///     loop { picors::arm_m::wait_for_interrupt() }
/// }
///
/// picors_entry!(app);
/// ```
///
/// The function must have type `fn()`.  It is not expected to return.
#[macro_export]
macro_rules! picors_entry {
    ($path:path) => {
        #[no_mangle]
        pub extern "C" fn picors_main() {
            let entry: fn() = $path;
            entry()
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CountingIdle;
    use std::panic::{self, AssertUnwindSafe};
    use std::cell::Cell;

    // `STATE` is a process-wide static; keep the assertions that depend on
    // it in a single test.
    #[test]
    fn returning_entry_halts_and_stays_halted() {
        let calls = Cell::new(0);
        let seen_while_running = Cell::new(None);
        let idle = CountingIdle::new(3);

        let r = panic::catch_unwind(AssertUnwindSafe(|| {
            run(|| {
                calls.set(calls.get() + 1);
                seen_while_running.set(Some(state()));
            }, &idle)
        }));

        assert!(r.is_err());
        assert_eq!(calls.get(), 1);
        assert_eq!(seen_while_running.get(), Some(BootState::Running));
        assert_eq!(state(), BootState::Halted);
        // Nothing but waiting happened after entry returned.
        assert_eq!(idle.waits(), 3);
    }
}
