//! The cache control capability
//!
//! Everything that touches the cache hardware goes through a [`CacheControl`].
//! On a Cortex-M7, that's `CortexM7`. In tests, it's a
//! [`Recorder`](crate::recorder::Recorder), which keeps the issued operations
//! so that you can inspect them.

/// A type that can issue D-cache maintenance operations
///
/// The invalidation routines in this crate are written against this trait.
/// They decide *what* to write and *when* to synchronize; the implementation
/// decides *how* those writes reach the hardware.
///
/// # Safety
///
/// An implementation must either
///
/// - forward each call to the cache hardware described by the method, in
///   program order, or
/// - have no effect on any hardware at all (a test double).
///
/// The invalidation routines rely on the barrier methods actually ordering
/// the surrounding maintenance operations. An implementation that drops or
/// reorders barriers while still touching hardware breaks the guarantees of
/// every routine that uses it.
pub unsafe trait CacheControl {
    /// Returns the raw cache identification word (CCSIDR) of the L1 data cache
    fn read_identification(&self) -> u32;
    /// Invalidate one cache line, addressed by its packed set / way operand
    fn write_set_way(&self, operand: u32);
    /// Invalidate the line holding `address`, if it's resident in the cache
    fn write_address(&self, address: usize);
    /// Data synchronization barrier
    fn data_barrier(&self);
    /// Instruction synchronization barrier
    fn instruction_barrier(&self);
}
