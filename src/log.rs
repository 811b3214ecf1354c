//! Logging interface, contingent on the `defmt-03` feature
//!
//! Only enable logging when debugging. Cache maintenance often runs right
//! before or after DMA, and your logger may be the one doing the DMA!

macro_rules! trace {
    ($($args:tt)*) => {
        #[cfg(feature = "defmt-03")]
        defmt::trace!($($args)*)
    };
}

macro_rules! debug {
    ($($args:tt)*) => {
        #[cfg(feature = "defmt-03")]
        defmt::debug!($($args)*)
    };
}
