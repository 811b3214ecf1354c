//! Data cache invalidation for ARMv7-M DMA buffers
//!
//! Before a DMA engine writes into memory, the CPU's data cache may still
//! hold lines for that memory. If those lines survive the transfer, the CPU
//! reads stale data. `armv7m-dcache` invalidates the D-cache lines that back
//! an address range, so that the next CPU access fetches from memory.
//!
//! The crate derives the cache geometry at runtime from the Cache Size ID
//! Register, and brackets every operation with the DSB / ISB barriers that
//! the architecture requires.
//!
//! # Usage
//!
//! On a Cortex-M7, use [`invalidate_dcache`] or [`invalidate_dcache_by_address`]
//! after your DMA transfer completes, and before the CPU reads the buffer.
//!
//! ```no_run
//! # #[cfg(target_arch = "arm")] {
//! static mut RX_BUFFER: [u8; 512] = [0; 512];
//!
//! // DMA transfer into RX_BUFFER completes...
//!
//! let start = unsafe { core::ptr::addr_of!(RX_BUFFER) } as usize;
//! // Safety: the DMA transfer is complete, and we own the buffer.
//! unsafe { armv7m_dcache::invalidate_dcache_by_address(start, start + 512) };
//! # }
//! ```
//!
//! Both functions are thin wrappers around the generic routines in this crate,
//! which work with any [`CacheControl`]. Use the generic routines with a
//! [`Recorder`](recorder::Recorder) to test your driver off-target.
//!
//! # Choosing an invalidation
//!
//! - Invalidating *by address* only drops lines that hold data from your
//!   range. Prefer this one.
//! - Invalidating *by set / way* drops every way of every set that your range
//!   maps to, whether or not it holds your data. It may discard unrelated,
//!   dirty lines. Use it only when you know that's acceptable.
//!
//! Cache *cleaning*, instruction cache maintenance, and multi-core coherency are
//! out of scope.
//!
//! # Features
//!
//! Enable `defmt-03` to log cache geometry and invalidation ranges through
//! `defmt` 0.3.

#![no_std]

#[cfg(feature = "defmt-03")]
extern crate defmt_03 as defmt;

#[macro_use]
mod log;

mod control;
#[cfg(target_arch = "arm")]
mod cortex_m7;
mod geometry;
mod ral;
mod range;
pub mod recorder;
mod sweep;

pub use control::CacheControl;
#[cfg(target_arch = "arm")]
pub use cortex_m7::CortexM7;
pub use geometry::{CacheGeometry, Support};
pub use range::AddressRange;
pub use sweep::{invalidate, invalidate_by_address, invalidate_range, Strategy};

/// Invalidate the D-cache for all sets associated with `start..end`
///
/// `end` is one past the last address. This invalidates every way of each
/// set, regardless of whether the set holds data from the range. See
/// [`invalidate_range`] for details.
///
/// # Safety
///
/// Invalidating discards dirty data without writing it back, including data
/// outside the range that shares a set. Caller must have exclusive access to
/// the range for the duration of the call.
#[cfg(target_arch = "arm")]
pub unsafe fn invalidate_dcache(start: usize, end: usize) {
    invalidate_range(&CortexM7::new(), AddressRange::new(start, end))
}

/// Invalidate the D-cache lines that hold data from `start..end`
///
/// `end` is one past the last address. Only lines holding data from the
/// range are invalidated. See [`invalidate_by_address`] for details.
///
/// # Safety
///
/// Invalidating discards dirty data without writing it back. If the range
/// doesn't start and end on cache line boundaries, neighboring data sharing
/// the first or last line is discarded, too. Caller must have exclusive access
/// to the range for the duration of the call.
#[cfg(target_arch = "arm")]
pub unsafe fn invalidate_dcache_by_address(start: usize, end: usize) {
    invalidate_by_address(&CortexM7::new(), AddressRange::new(start, end))
}
