//! A cache control double that records what it's asked to do
//!
//! Use a [`Recorder`] to test DMA driver code on your development host,
//! or to check the exact maintenance sequence produced for a buffer.
//!
//! ```
//! use armv7m_dcache::{invalidate_by_address, AddressRange};
//! use armv7m_dcache::recorder::{Op, Recorder};
//!
//! // 16 KiB, 4-way, 32 byte lines
//! let recorder: Recorder<8> = Recorder::new(0xF00F_E019);
//! unsafe { invalidate_by_address(&recorder, AddressRange::new(0x2020_0010, 0x2020_0030)) };
//!
//! assert_eq!(
//!     &*recorder.ops(),
//!     &[
//!         Op::DataBarrier,
//!         Op::Address(0x2020_0000),
//!         Op::Address(0x2020_0020),
//!         Op::DataBarrier,
//!         Op::InstructionBarrier,
//!     ]
//! );
//! ```

use core::cell::{Cell, Ref, RefCell};

use crate::control::CacheControl;

/// A recorded cache control operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Op {
    /// A DCISW write, with its operand
    SetWay(u32),
    /// A DCIMVAC write, with its address
    Address(usize),
    /// DSB
    DataBarrier,
    /// ISB
    InstructionBarrier,
}

/// Records up to `N` cache control operations
///
/// Reads of the identification register always return the word given to
/// [`new()`](Recorder::new). They're not recorded.
///
/// Operations issued beyond the capacity are counted, but not kept.
pub struct Recorder<const N: usize> {
    ccsidr: u32,
    ops: RefCell<[Op; N]>,
    len: Cell<usize>,
}

impl<const N: usize> Recorder<N> {
    /// Create a recorder for a cache that identifies as `ccsidr`
    pub const fn new(ccsidr: u32) -> Self {
        Recorder {
            ccsidr,
            ops: RefCell::new([Op::DataBarrier; N]),
            len: Cell::new(0),
        }
    }

    /// The kept operations, in the order they were issued
    pub fn ops(&self) -> Ref<'_, [Op]> {
        let kept = self.len.get().min(N);
        Ref::map(self.ops.borrow(), |ops| &ops[..kept])
    }

    /// Number of operations issued since creation, or since the last
    /// [`clear()`](Recorder::clear)
    ///
    /// This may exceed the capacity.
    pub fn len(&self) -> usize {
        self.len.get()
    }

    pub fn is_empty(&self) -> bool {
        self.len.get() == 0
    }

    /// Returns `true` if some operations weren't kept
    pub fn overflowed(&self) -> bool {
        self.len.get() > N
    }

    /// Forget all operations
    pub fn clear(&self) {
        self.len.set(0);
    }

    /// Iterate over the kept set / way operands
    pub fn set_way_writes(&self) -> impl Iterator<Item = u32> + '_ {
        let ops = self.ops();
        (0..ops.len()).filter_map(move |idx| match ops[idx] {
            Op::SetWay(operand) => Some(operand),
            _ => None,
        })
    }

    /// Iterate over the kept invalidate-by-address addresses
    pub fn address_writes(&self) -> impl Iterator<Item = usize> + '_ {
        let ops = self.ops();
        (0..ops.len()).filter_map(move |idx| match ops[idx] {
            Op::Address(address) => Some(address),
            _ => None,
        })
    }

    fn record(&self, op: Op) {
        let len = self.len.get();
        if len < N {
            self.ops.borrow_mut()[len] = op;
        }
        self.len.set(len.saturating_add(1));
    }
}

unsafe impl<const N: usize> CacheControl for Recorder<N> {
    fn read_identification(&self) -> u32 {
        self.ccsidr
    }
    fn write_set_way(&self, operand: u32) {
        self.record(Op::SetWay(operand));
    }
    fn write_address(&self, address: usize) {
        self.record(Op::Address(address));
    }
    fn data_barrier(&self) {
        self.record(Op::DataBarrier);
    }
    fn instruction_barrier(&self) {
        self.record(Op::InstructionBarrier);
    }
}
