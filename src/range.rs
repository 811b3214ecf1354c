//! Address ranges for cache maintenance

/// A range of virtual addresses, `start` inclusive, `end` exclusive
///
/// The invalidation routines round `start` down to the containing cache
/// line. They never round `end`; the last line processed is the line that
/// contains `end - 1`.
///
/// A range where `start >= end` is empty. Invalidating an empty range
/// touches no cache lines, but still synchronizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct AddressRange {
    pub start: usize,
    pub end: usize,
}

impl AddressRange {
    /// Create a range from `start` up to, but not including, `end`
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a range of `len` bytes starting at `start`
    ///
    /// The end saturates at the top of the address space.
    pub const fn from_len(start: usize, len: usize) -> Self {
        Self::new(start, start.saturating_add(len))
    }

    /// The memory backing `object`
    pub fn from_ref<T>(object: &T) -> Self {
        Self::from_len(object as *const T as usize, core::mem::size_of_val(object))
    }

    /// The memory backing `slice`
    ///
    /// ```
    /// use armv7m_dcache::AddressRange;
    ///
    /// let buffer = [0u32; 16];
    /// let range = AddressRange::from_slice(&buffer);
    /// assert_eq!(range.len(), 64);
    /// assert_eq!(range.start, buffer.as_ptr() as usize);
    /// ```
    pub fn from_slice<T>(slice: &[T]) -> Self {
        Self::from_len(slice.as_ptr() as usize, core::mem::size_of_val(slice))
    }

    /// Returns `true` if there are no addresses in this range
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Number of bytes covered by the range
    ///
    /// Zero for an empty range.
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}
