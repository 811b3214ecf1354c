//! D-cache invalidation over address ranges
//!
//! There are two ways to invalidate the lines backing a range of memory:
//!
//! - [`invalidate_range`] invalidates, by set and way, every way of every
//!   set that the range maps to. It doesn't check tags, so it may also
//!   discard unrelated lines that share those sets.
//! - [`invalidate_by_address`] invalidates by address. The cache checks
//!   its tags, and only drops the line if it holds that address.
//!
//! Both share the same shape. Round `start` down to a line, synchronize,
//! step through the lines until reaching the (unrounded) `end`, then
//! synchronize again. That shape lives in `sweep()`, and it's the only
//! place that issues barriers.

use crate::{control::CacheControl, geometry::CacheGeometry, range::AddressRange};

/// Cache maintenance strategy
///
/// See the module documentation for the trade-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Strategy {
    /// Invalidate all ways of each set, by set / way
    AllWays,
    /// Invalidate matching lines, by address
    ByAddress,
}

/// Step through every line of `range`, calling `step` with the line address
///
/// The DSB before the first line orders earlier memory accesses against the
/// maintenance. The DSB and ISB after the last line make sure the maintenance
/// completes before anything that follows. Both happen even if the range is
/// empty.
///
/// The sweep stops at the last line of the address space, rather than
/// wrapping around to zero.
fn sweep<C, F>(cache: &C, range: AddressRange, line_size_log2: u32, mut step: F)
where
    C: CacheControl + ?Sized,
    F: FnMut(&C, usize),
{
    let line_size = 1usize << line_size_log2;
    let mut line = range.start & !(line_size - 1);

    cache.data_barrier();
    // Rounding could pull `start` below `end` for an empty range.
    if !range.is_empty() {
        while line < range.end {
            step(cache, line);
            line = match line.checked_add(line_size) {
                Some(next) => next,
                None => break,
            };
        }
    }
    cache.data_barrier();
    cache.instruction_barrier();
}

/// Invalidate the D-cache by set / way, for all sets associated with `range`
///
/// Every way of each set is invalidated, whether or not it holds data from
/// `range`. A range of `N` lines issues `N * ways` set / way operations.
///
/// # Safety
///
/// Invalidating discards cached data without writing it back. Any dirty line
/// in the affected sets is lost, including lines outside of `range` that map
/// to the same sets. Caller must ensure that's acceptable.
///
/// The operation isn't atomic. Caller must have exclusive access to `range`
/// for the duration of the call, so that no CPU writes or DMA transfers touch
/// it while the invalidation is in progress. Preemption is fine.
pub unsafe fn invalidate_range<C: CacheControl + ?Sized>(cache: &C, range: AddressRange) {
    let geometry = CacheGeometry::read(cache);
    debug!("INVALIDATE SET/WAY {=usize:#x}..{=usize:#x}", range.start, range.end);

    sweep(cache, range, geometry.line_size_log2(), |cache, line| {
        let set = geometry.set_of(line);
        for way in (0..=geometry.way_count()).rev() {
            cache.write_set_way(geometry.set_way(set, way));
        }
    });
}

/// Invalidate the D-cache by address, for all lines in `range`
///
/// Only lines that actually hold data from `range` are invalidated. A range
/// of `N` lines issues `N` operations.
///
/// # Safety
///
/// Invalidating discards cached data without writing it back. If the first
/// or last line of `range` isn't fully covered by `range`, the rest of that
/// line is discarded, too. Caller must ensure that's acceptable.
///
/// The operation isn't atomic. Caller must have exclusive access to `range`
/// for the duration of the call. Preemption is fine.
pub unsafe fn invalidate_by_address<C: CacheControl + ?Sized>(cache: &C, range: AddressRange) {
    let geometry = CacheGeometry::read(cache);
    debug!("INVALIDATE MVA {=usize:#x}..{=usize:#x}", range.start, range.end);

    sweep(cache, range, geometry.line_size_log2(), |cache, line| {
        cache.write_address(line);
    });
}

/// Invalidate the D-cache for `range`, using `strategy`
///
/// # Safety
///
/// See [`invalidate_range`] and [`invalidate_by_address`].
pub unsafe fn invalidate<C: CacheControl + ?Sized>(
    cache: &C,
    strategy: Strategy,
    range: AddressRange,
) {
    match strategy {
        Strategy::AllWays => invalidate_range(cache, range),
        Strategy::ByAddress => invalidate_by_address(cache, range),
    }
}
