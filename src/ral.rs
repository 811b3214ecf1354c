//! Register access for the Cortex-M7 cache maintenance registers
//!
//! These are RAL-compatible definitions of the two System Control Block
//! register blocks that we need. cortex-m exposes the same registers
//! through `CPUID` and `CBP`, but only when you own the `Peripherals`
//! collection. Like the rest of this crate, we'd rather not steal or
//! own them, so the blocks are described here and accessed through the
//! `ral-registers` macros.

#![allow(non_snake_case, non_upper_case_globals)]
// Only the Cortex-M7 binding touches the register blocks.
#![cfg_attr(not(target_arch = "arm"), allow(dead_code, unused_imports))]

pub use ral_registers::{read_reg, write_reg, RORegister, RWRegister, WORegister};

/// Cache identification registers
pub mod cpuid {
    use super::{RORegister, RWRegister};

    #[repr(C)]
    pub struct RegisterBlock {
        /// Cache Size ID Register
        pub CCSIDR: RORegister<u32>,
        /// Cache Size Selection Register
        pub CSSELR: RWRegister<u32>,
    }

    /// The CCSIDR / CSSELR pair in the System Control Block
    pub const CPUID: *const RegisterBlock = 0xE000_ED80 as *const _;

    /// Cache Size ID Register fields
    pub mod CCSIDR {
        /// log2(words per line) - 2, so log2(bytes per line) - 4
        pub mod LINESIZE {
            pub const offset: u32 = 0;
            pub const mask: u32 = 0x7 << offset;
            pub mod RW {}
            pub mod R {}
            pub mod W {}
        }
        /// Number of ways, minus one
        pub mod ASSOCIATIVITY {
            pub const offset: u32 = 3;
            pub const mask: u32 = 0x3FF << offset;
            pub mod RW {}
            pub mod R {}
            pub mod W {}
        }
        /// Number of sets, minus one
        pub mod NUMSETS {
            pub const offset: u32 = 13;
            pub const mask: u32 = 0x7FFF << offset;
            pub mod RW {}
            pub mod R {}
            pub mod W {}
        }
        /// Write-policy and allocation support, WA:RA:WB:WT
        pub mod SUPPORT {
            pub const offset: u32 = 28;
            pub const mask: u32 = 0xF << offset;
            pub mod RW {}
            pub mod R {}
            pub mod W {}
        }
    }

    /// Cache Size Selection Register fields
    pub mod CSSELR {
        /// Instruction (1) or data / unified (0) cache
        pub mod IND {
            pub const offset: u32 = 0;
            pub const mask: u32 = 1 << offset;
            pub mod RW {}
            pub mod R {}
            pub mod W {}
        }
        /// Cache level, minus one
        pub mod LEVEL {
            pub const offset: u32 = 1;
            pub const mask: u32 = 0x7 << offset;
            pub mod RW {}
            pub mod R {}
            pub mod W {}
        }
    }

    const _: [(); 1] = [(); (core::mem::size_of::<RegisterBlock>() == 8) as usize];
}

/// Cache maintenance operations (write-only)
pub mod cbp {
    use super::WORegister;

    #[repr(C)]
    pub struct RegisterBlock {
        /// D-cache invalidate by MVA to PoC
        pub DCIMVAC: WORegister<u32>,
        /// D-cache invalidate by set / way
        pub DCISW: WORegister<u32>,
    }

    /// DCIMVAC and DCISW in the System Control Block
    pub const CBP: *const RegisterBlock = 0xE000_EF5C as *const _;

    const _: [(); 1] = [(); (core::mem::size_of::<RegisterBlock>() == 8) as usize];
}

/// Extract a field from a raw register value, given the field's RAL mask and offset
#[inline(always)]
pub const fn field(value: u32, mask: u32, offset: u32) -> u32 {
    (value & mask) >> offset
}
