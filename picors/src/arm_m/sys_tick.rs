//! ARMv6-M SysTick timer support.

use crate::arm_m::reg::Reg;

#[repr(C)]
struct Registers {
    csr:   Reg<u32>,
    rvr:   Reg<u32>,
    cvr:   Reg<u32>,
    calib: Reg<u32>,
}

pub const SYS_TICK_ADDRESS: usize = 0xe000_e010;

/// The reload value register is 24 bits wide.
pub const MAX_RELOAD: u32 = 0x00ff_ffff;

bit_wrappers! {
    /// Control and Status Register.
    pub struct Csr(pub u32);
}

bit_enums! {
    pub bit_enum ClkSource {
        /// The vendor's reference clock.
        ExternalReference = 0,
        ProcessorClock = 1,
    }
}

impl Csr {
    bitfield_accessors! {
        /// Set when the counter has reached zero since the last read.  Cleared
        /// by reading CSR or writing CVR.
        pub total [16] get_countflag / with_countflag: bool,
        pub [2] get_clksource / with_clksource: ClkSource,
        pub total [1] get_tickint / with_tickint: bool,
        pub total [0] get_enable / with_enable: bool,
    }
}

pub struct SysTick {
    reg: *const Registers,
}

unsafe impl Sync for SysTick {}

impl SysTick {
    /// # Safety
    ///
    /// `base` must address a SysTick register block that outlives the driver.
    pub const unsafe fn at(base: usize) -> Self {
        SysTick { reg: base as *const Registers }
    }

    fn reg(&self) -> &Registers {
        unsafe { &*self.reg }
    }

    pub fn read_csr(&self) -> Csr {
        Csr(self.reg().csr.get())
    }

    pub fn write_csr(&self, v: Csr) {
        self.reg().csr.set(v.0)
    }

    pub fn read_rvr(&self) -> u32 {
        self.reg().rvr.get()
    }

    pub fn write_rvr(&self, v: u32) {
        self.reg().rvr.set(v & MAX_RELOAD)
    }

    pub fn read_cvr(&self) -> u32 {
        self.reg().cvr.get()
    }

    /// Any write clears the counter to zero (and clears COUNTFLAG).
    pub fn clear_cvr(&self) {
        self.reg().cvr.set(0)
    }

    pub fn read_calib(&self) -> u32 {
        self.reg().calib.get()
    }

    /// Busy-waits for `cycles` processor clock cycles, using the counter
    /// without its interrupt.  Overwrites any configuration the timer had and
    /// leaves it stopped.
    ///
    /// The timer is a single shared resource: a handler that delays must not
    /// preempt foreground code that is also delaying.
    pub fn delay_cycles(&self, cycles: u32) {
        let (chunks, rest) = split_cycles(cycles);
        for _ in 0..chunks {
            self.count_down(MAX_RELOAD + 1);
        }
        // A reload value of zero never wraps, so a single leftover cycle is
        // dropped.
        if rest > 1 {
            self.count_down(rest);
        }
    }

    /// Counts down `ticks` (2 ..= `MAX_RELOAD + 1`) cycles and waits for the
    /// wrap.
    fn count_down(&self, ticks: u32) {
        self.write_csr(Csr(0));
        self.write_rvr(ticks - 1);
        self.clear_cvr();
        self.write_csr(Csr(0)
                       .with_clksource(ClkSource::ProcessorClock)
                       .with_enable(true));
        while !self.read_csr().get_countflag() {}
        self.write_csr(Csr(0));
    }
}

/// Splits a delay into whole periods of the 24-bit counter plus a remainder.
fn split_cycles(cycles: u32) -> (u32, u32) {
    (cycles / (MAX_RELOAD + 1), cycles % (MAX_RELOAD + 1))
}

pub static SYS_TICK: SysTick = unsafe { SysTick::at(SYS_TICK_ADDRESS) };

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csr_fields() {
        let csr = Csr(0).with_enable(true).with_clksource(ClkSource::ProcessorClock);
        assert_eq!(csr.0, 0b101);
        assert!(!csr.get_tickint());
        assert_eq!(csr.get_clksource(), Ok(ClkSource::ProcessorClock));
        assert!(Csr(1 << 16).get_countflag());
        assert_eq!(Csr(0).get_clksource(), Ok(ClkSource::ExternalReference));
    }

    #[test]
    fn long_delays_are_split_over_reloads() {
        assert_eq!(split_cycles(0), (0, 0));
        assert_eq!(split_cycles(1000), (0, 1000));
        assert_eq!(split_cycles(1 << 24), (1, 0));
        assert_eq!(split_cycles((3 << 24) + 5), (3, 5));
    }

    #[test]
    fn reload_is_truncated_to_24_bits() {
        let w = crate::testing::FakeWindow::new(16);
        let st = unsafe { SysTick::at(w.base()) };
        st.write_rvr(0xffff_ffff);
        assert_eq!(w.word(4), MAX_RELOAD);
    }
}
