//! ARMv6-M architecture support: the exception model, NVIC, SysTick, and the
//! code that runs from reset.
//!
//! Instructions are issued through the `cortex-m` crate when building for an
//! ARM target.  Elsewhere (host builds and tests) they degrade to portable
//! equivalents, so the rest of the crate can be exercised off-target.

pub mod boot;
pub mod exc;
pub mod nvic;
pub mod reg;
pub mod sys_tick;
pub mod trap;

#[cfg(all(target_arch = "arm", target_os = "none"))]
pub mod startup;

/// Suspends the processor until the next interrupt (`WFI`).
#[inline]
pub fn wait_for_interrupt() {
    #[cfg(target_arch = "arm")]
    cortex_m::asm::wfi();
    #[cfg(not(target_arch = "arm"))]
    core::hint::spin_loop();
}

/// A single `NOP`.  Not optimized out.
#[inline]
pub fn nop() {
    #[cfg(target_arch = "arm")]
    cortex_m::asm::nop();
    #[cfg(not(target_arch = "arm"))]
    core::hint::spin_loop();
}

/// Generates an instruction synchronization barrier (`ISB`).
#[inline]
pub fn instruction_synchronization_barrier() {
    #[cfg(target_arch = "arm")]
    cortex_m::asm::isb();
    #[cfg(not(target_arch = "arm"))]
    core::sync::atomic::compiler_fence(core::sync::atomic::Ordering::SeqCst);
}

/// Generates a data synchronization barrier (`DSB`): every explicit memory
/// access before it has completed when it retires.
#[inline]
pub fn data_synchronization_barrier() {
    #[cfg(target_arch = "arm")]
    cortex_m::asm::dsb();
    #[cfg(not(target_arch = "arm"))]
    core::sync::atomic::fence(core::sync::atomic::Ordering::SeqCst);
}
