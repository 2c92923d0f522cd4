//! Bounded busy-wait delays.
//!
//! Delays are expressed in microseconds and converted to cycles from a core
//! clock frequency the caller supplies.  Nothing here measures the clock, so a
//! delay is only as accurate as that figure.

use crate::arm_m::sys_tick::SysTick;

/// Something that can hold the processor for a bounded time.
pub trait Delay {
    fn delay_us(&self, us: u32);
}

/// `Delay` timed by the SysTick counter.
pub struct SysTickDelay {
    timer: &'static SysTick,
    core_hz: u32,
}

impl SysTickDelay {
    pub const fn new(timer: &'static SysTick, core_hz: u32) -> Self {
        SysTickDelay { timer, core_hz }
    }

    /// Cycles in `us` microseconds, saturating at `u32::MAX`.
    pub fn cycles_for(&self, us: u32) -> u32 {
        let cycles = u64::from(us) * u64::from(self.core_hz) / 1_000_000;
        u32::try_from(cycles).unwrap_or(u32::MAX)
    }
}

impl Delay for SysTickDelay {
    fn delay_us(&self, us: u32) {
        self.timer.delay_cycles(self.cycles_for(us))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arm_m::sys_tick::SYS_TICK;

    #[test]
    fn converts_microseconds_to_cycles() {
        let d = SysTickDelay::new(&SYS_TICK, 6_500_000);
        assert_eq!(d.cycles_for(0), 0);
        assert_eq!(d.cycles_for(1_000), 6_500);
        assert_eq!(d.cycles_for(150_000), 975_000);
    }

    #[test]
    fn long_delays_saturate() {
        let d = SysTickDelay::new(&SYS_TICK, 125_000_000);
        assert_eq!(d.cycles_for(u32::MAX), u32::MAX);
    }
}
