//! Host stand-ins for hardware, used by the unit tests here and, through the
//! `testing` feature, by firmware crates' own tests.

use std::cell::Cell;
use std::ptr;

use crate::arm_m::trap::Idle;

/// Counts waits, and breaks out of an otherwise endless wait loop by
/// panicking once `limit` is reached.  Tests catch the panic.
pub struct CountingIdle {
    waits: Cell<u32>,
    limit: u32,
}

impl CountingIdle {
    pub fn new(limit: u32) -> Self {
        CountingIdle { waits: Cell::new(0), limit }
    }

    pub fn waits(&self) -> u32 {
        self.waits.get()
    }
}

impl Idle for CountingIdle {
    fn wait_for_interrupt(&self) {
        self.waits.set(self.waits.get() + 1);
        if self.waits.get() >= self.limit {
            panic!("wait limit reached");
        }
    }
}

/// A zero-filled block of ordinary memory standing in for a peripheral's
/// register window.  Drivers are pointed at `base()`; the test then inspects
/// what landed where.  It does not model any register side effects (W1C,
/// read-only bits, alias windows), so a write to an alias shows up as a plain
/// word at the alias offset.
pub struct FakeWindow {
    mem: Vec<Cell<u32>>,
}

impl FakeWindow {
    /// A window covering `bytes` bytes.
    pub fn new(bytes: usize) -> Self {
        FakeWindow { mem: vec![Cell::new(0); bytes / 4] }
    }

    /// A window large enough for an RP2040 APB peripheral and its three
    /// atomic alias windows.
    pub fn with_aliases() -> Self {
        Self::new(0x4000)
    }

    pub fn base(&self) -> usize {
        self.mem.as_ptr() as usize
    }

    pub fn word(&self, offset: usize) -> u32 {
        assert_eq!(offset % 4, 0);
        unsafe { ptr::read_volatile(self.mem[offset / 4].as_ptr()) }
    }

    pub fn set_word(&self, offset: usize, value: u32) {
        assert_eq!(offset % 4, 0);
        unsafe { ptr::write_volatile(self.mem[offset / 4].as_ptr(), value) }
    }

    /// Offsets of every non-zero word, for asserting that nothing else was
    /// touched.
    pub fn touched(&self) -> Vec<usize> {
        (0..self.mem.len())
            .map(|i| i * 4)
            .filter(|&off| self.word(off) != 0)
            .collect()
    }
}
