//! L1 data cache geometry
//!
//! The Cortex-M7 D-cache size is an implementation option, so we can't
//! hard-code the number of sets and ways. Instead, we decode them from
//! the Cache Size ID Register (CCSIDR) each time we need them.

use crate::{
    control::CacheControl,
    ral::{self, cpuid::CCSIDR},
};

bitflags::bitflags! {
    /// Write policies and allocation modes supported by the cache
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Support: u32 {
        /// Write-through
        const WRITE_THROUGH = 1 << 0;
        /// Write-back
        const WRITE_BACK = 1 << 1;
        /// Read-allocate
        const READ_ALLOCATE = 1 << 2;
        /// Write-allocate
        const WRITE_ALLOCATE = 1 << 3;
    }
}

#[cfg(feature = "defmt-03")]
impl defmt::Format for Support {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Support({=u32:#b})", self.bits())
    }
}

/// Architectural offset between the CCSIDR line size field and
/// log2(bytes per line)
const LINESIZE_OFFSET: u32 = 4;

/// Data cache geometry, decoded from one CCSIDR snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct CacheGeometry {
    line_size_log2: u32,
    set_mask: u32,
    way_count: u32,
    way_field_shift: u32,
    support: Support,
}

impl CacheGeometry {
    /// Decode the geometry from a raw CCSIDR value
    ///
    /// ```
    /// use armv7m_dcache::CacheGeometry;
    ///
    /// // 16 KiB, 4-way, 32 byte lines
    /// let geometry = CacheGeometry::decode(0xF00F_E019);
    /// assert_eq!(geometry.line_size(), 32);
    /// assert_eq!(geometry.sets(), 128);
    /// assert_eq!(geometry.ways(), 4);
    /// assert_eq!(geometry.way_field_shift(), 30);
    /// assert_eq!(geometry.size(), 16 * 1024);
    /// ```
    pub const fn decode(ccsidr: u32) -> Self {
        let line_size_log2 = ral::field(ccsidr, CCSIDR::LINESIZE::mask, CCSIDR::LINESIZE::offset)
            + LINESIZE_OFFSET;
        let set_mask = ral::field(ccsidr, CCSIDR::NUMSETS::mask, CCSIDR::NUMSETS::offset);
        let way_count = ral::field(
            ccsidr,
            CCSIDR::ASSOCIATIVITY::mask,
            CCSIDR::ASSOCIATIVITY::offset,
        );
        // The way selector sits in the top bits of the DCISW operand, and
        // it's only as wide as it needs to be. A direct-mapped cache has
        // no way field, so the shift wraps to zero.
        let way_field_shift = way_count.leading_zeros() & 0x1F;
        // CCSIDR orders these WT:WB:RA:WA from bit 31 down. Reverse into
        // the flag layout.
        let raw = ral::field(ccsidr, CCSIDR::SUPPORT::mask, CCSIDR::SUPPORT::offset);
        let support = Support::from_bits_truncate(raw.reverse_bits() >> 28);
        CacheGeometry {
            line_size_log2,
            set_mask,
            way_count,
            way_field_shift,
            support,
        }
    }

    /// Read and decode the geometry of the L1 data cache
    pub fn read<C: CacheControl + ?Sized>(cache: &C) -> Self {
        let ccsidr = cache.read_identification();
        let geometry = Self::decode(ccsidr);
        trace!(
            "CCSIDR {=u32:#x}: {=u32} sets, {=u32} ways, {=usize} byte lines",
            ccsidr,
            geometry.sets(),
            geometry.ways(),
            geometry.line_size()
        );
        geometry
    }

    /// log2 of the cache line size, in bytes
    pub const fn line_size_log2(&self) -> u32 {
        self.line_size_log2
    }

    /// Number of sets, minus one
    ///
    /// Use this to mask a line index into a set number.
    pub const fn set_mask(&self) -> u32 {
        self.set_mask
    }

    /// Number of ways, minus one
    pub const fn way_count(&self) -> u32 {
        self.way_count
    }

    /// Bit offset of the way selector in a set / way operand
    pub const fn way_field_shift(&self) -> u32 {
        self.way_field_shift
    }

    /// Cache line size, in bytes
    pub const fn line_size(&self) -> usize {
        1 << self.line_size_log2
    }

    pub const fn sets(&self) -> u32 {
        self.set_mask + 1
    }

    pub const fn ways(&self) -> u32 {
        self.way_count + 1
    }

    /// Total cache size, in bytes
    pub const fn size(&self) -> usize {
        self.line_size()
            .saturating_mul(self.sets() as usize)
            .saturating_mul(self.ways() as usize)
    }

    /// Write policies and allocation modes reported by the cache
    pub const fn support(&self) -> Support {
        self.support
    }

    /// The set that holds `address`
    pub const fn set_of(&self, address: usize) -> u32 {
        ((address >> self.line_size_log2) as u32) & self.set_mask
    }

    /// Pack a set / way operand for a DCISW write
    pub const fn set_way(&self, set: u32, way: u32) -> u32 {
        (way << self.way_field_shift) | (set << self.line_size_log2)
    }
}

#[cfg(test)]
mod test {
    use super::{CacheGeometry, Support};

    /// Build a CCSIDR value from sets, ways and line size
    const fn ccsidr(sets: u32, ways: u32, line_size_log2: u32) -> u32 {
        ((sets - 1) << 13) | ((ways - 1) << 3) | (line_size_log2 - 4)
    }

    #[test]
    fn cortex_m7_16k() {
        let geometry = CacheGeometry::decode(0xF00F_E019);
        assert_eq!(geometry.line_size_log2(), 5);
        assert_eq!(geometry.set_mask(), 0x7F);
        assert_eq!(geometry.way_count(), 3);
        assert_eq!(geometry.way_field_shift(), 30);
        assert_eq!(geometry.support(), Support::all());
    }

    #[test]
    fn decode_table() {
        // (sets, ways, line_size_log2, way_field_shift)
        const TABLE: &[(u32, u32, u32, u32)] = &[
            (128, 4, 5, 30),
            (256, 8, 6, 29),
            (256, 4, 5, 30),
            (64, 2, 5, 31),
            (512, 2, 4, 31),
            (32, 16, 7, 28),
        ];
        for &(sets, ways, line_size_log2, way_field_shift) in TABLE {
            let geometry = CacheGeometry::decode(ccsidr(sets, ways, line_size_log2));
            assert_eq!(geometry.line_size_log2(), line_size_log2);
            assert_eq!(geometry.set_mask(), sets - 1);
            assert_eq!(geometry.way_count(), ways - 1);
            assert_eq!(geometry.way_field_shift(), way_field_shift);
            assert_eq!(geometry.sets(), sets);
            assert_eq!(geometry.ways(), ways);
            assert_eq!(geometry.line_size(), 1 << line_size_log2);
            assert_eq!(geometry.support(), Support::empty());
        }
    }

    #[test]
    fn direct_mapped() {
        let geometry = CacheGeometry::decode(ccsidr(128, 1, 5));
        assert_eq!(geometry.way_count(), 0);
        assert_eq!(geometry.way_field_shift(), 0);
        assert_eq!(geometry.set_way(0x7F, 0), 0x7F << 5);
    }

    #[test]
    fn minimum_line_size() {
        let geometry = CacheGeometry::decode(0);
        assert_eq!(geometry.line_size_log2(), 4);
        assert_eq!(geometry.line_size(), 16);
        assert_eq!(geometry.sets(), 1);
        assert_eq!(geometry.ways(), 1);
    }

    #[test]
    fn size() {
        assert_eq!(CacheGeometry::decode(ccsidr(256, 4, 5)).size(), 32 * 1024);
        assert_eq!(CacheGeometry::decode(ccsidr(256, 8, 6)).size(), 128 * 1024);
    }

    #[test]
    fn support_flags() {
        // WT only
        let geometry = CacheGeometry::decode(1 << 31);
        assert_eq!(geometry.support(), Support::WRITE_THROUGH);
        // WB and WA
        let geometry = CacheGeometry::decode((1 << 30) | (1 << 28));
        assert_eq!(
            geometry.support(),
            Support::WRITE_BACK | Support::WRITE_ALLOCATE
        );
    }

    #[test]
    fn set_of_address() {
        let geometry = CacheGeometry::decode(ccsidr(128, 4, 5));
        assert_eq!(geometry.set_of(0x2020_0000), 0);
        assert_eq!(geometry.set_of(0x2020_0020), 1);
        assert_eq!(geometry.set_of(0x2020_003F), 1);
        // Wraps after 128 sets * 32 bytes
        assert_eq!(geometry.set_of(0x2020_0000 + 4096), 0);
        assert_eq!(geometry.set_of(0x2020_0000 + 4096 - 32), 127);
    }

    #[test]
    fn set_way_operand() {
        let geometry = CacheGeometry::decode(ccsidr(128, 4, 5));
        assert_eq!(geometry.set_way(0, 0), 0);
        assert_eq!(geometry.set_way(1, 0), 1 << 5);
        assert_eq!(geometry.set_way(0, 3), 3 << 30);
        assert_eq!(geometry.set_way(0x7F, 3), (3 << 30) | (0x7F << 5));

        let geometry = CacheGeometry::decode(ccsidr(256, 8, 6));
        assert_eq!(geometry.set_way(0xFF, 7), (7 << 29) | (0xFF << 6));
    }
}
