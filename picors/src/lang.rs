use core::panic::PanicInfo;

/// This will be invoked on `panic!`.  There is no I/O channel at this layer,
/// so a panic parks the processor in the same low-power wait as an unhandled
/// interrupt.  Applications can supply their own by enabling the
/// `app_panic_handler` feature.
#[panic_handler]
fn panic(_info: &PanicInfo) -> ! {
    crate::arm_m::trap::halt()
}
