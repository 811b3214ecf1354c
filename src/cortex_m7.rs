//! Cortex-M7 cache control
//!
//! These routines used to go through the cortex-m crate's `SCB` and `CBP`
//! peripherals. But, cortex-m only lets you access them when you have the
//! `cortex_m::Peripherals` collection, and we neither want to steal the
//! peripheral(s), nor own them. So, we describe the registers we need in
//! [`ral`](crate::ral), and only use cortex-m for the barriers.
//!
//! cortex-m crate available at <https://github.com/rust-embedded/cortex-m>.

use crate::{control::CacheControl, ral};

/// The L1 data cache of the running Cortex-M7 core
///
/// `CortexM7` is a handle to the System Control Block cache maintenance
/// registers. It doesn't own them; cache maintenance is inherently global.
/// Exclusive access to the *memory* being maintained is the caller's job,
/// and it's expressed on the unsafe invalidation functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct CortexM7 {
    _private: (),
}

impl CortexM7 {
    /// Create a handle to the core's data cache
    pub const fn new() -> Self {
        CortexM7 { _private: () }
    }
}

unsafe impl CacheControl for CortexM7 {
    fn read_identification(&self) -> u32 {
        // Safety: pointer to static memory, and CPUID is read-only except
        // for the cache selection, which we always set to the L1 data cache
        // before reading.
        let cpuid = unsafe { &*ral::cpuid::CPUID };
        ral::write_reg!(ral::cpuid, cpuid, CSSELR, LEVEL: 0, IND: 0);
        // CCSIDR reflects CSSELR only after the selection completes
        cortex_m::asm::dsb();
        ral::read_reg!(ral::cpuid, cpuid, CCSIDR)
    }
    fn write_set_way(&self, operand: u32) {
        // Safety: write-only register, pointer to static memory
        let cbp = unsafe { &*ral::cbp::CBP };
        ral::write_reg!(ral::cbp, cbp, DCISW, operand);
    }
    fn write_address(&self, address: usize) {
        // Safety: write-only register, pointer to static memory
        let cbp = unsafe { &*ral::cbp::CBP };
        ral::write_reg!(ral::cbp, cbp, DCIMVAC, address as u32);
    }
    fn data_barrier(&self) {
        cortex_m::asm::dsb();
    }
    fn instruction_barrier(&self) {
        cortex_m::asm::isb();
    }
}
