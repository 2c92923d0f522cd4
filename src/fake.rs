//! A host stand-in for the pulse timer.

use std::cell::RefCell;

use picors::delay::Delay;
use picors::testing::FakeWindow;

/// A `Delay` that returns at once, noting how long it was asked to wait and
/// what SIO's set and clear registers held at the time.
pub struct Recorder<'a> {
    sio: &'a FakeWindow,
    pub delays: RefCell<Vec<Snapshot>>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Snapshot {
    pub us: u32,
    pub out_set: u32,
    pub out_clr: u32,
}

impl<'a> Recorder<'a> {
    pub fn new(sio: &'a FakeWindow) -> Self {
        Recorder { sio, delays: RefCell::new(Vec::new()) }
    }
}

impl Delay for Recorder<'_> {
    fn delay_us(&self, us: u32) {
        self.delays.borrow_mut().push(Snapshot {
            us,
            out_set: self.sio.word(0x14),
            out_clr: self.sio.word(0x18),
        });
        // Each pulse edge should be visible on its own.
        self.sio.set_word(0x14, 0);
        self.sio.set_word(0x18, 0);
    }
}
