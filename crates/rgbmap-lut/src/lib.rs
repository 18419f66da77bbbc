//! # rgbmap-lut
//!
//! Lookup tables for turning scaled pixel indices into display colors.
//!
//! # Table Types
//!
//! - [`ColorTable`] / [`IntensityTable`] - Named color map and intensity map input
//! - [`ColorArray`] - 3 x 256 8-bit channel tables derived from them
//! - [`DistributionTable`] - `hashsize`-entry index-to-band map ([`HashAlgorithm`])
//! - [`ShiftTable`] - 256-entry contrast/brightness curve
//!
//! # Usage
//!
//! ```rust
//! use rgbmap_lut::{ColorTable, DistributionTable, HashAlgorithm, ShiftTable};
//!
//! let hash = DistributionTable::generate(HashAlgorithm::Logarithmic, 65536, 10.0).unwrap();
//! let curve = ShiftTable::scale_and_shift(1.5, -0.1).unwrap();
//! let colors = ColorTable::ramp().composite();
//!
//! let band = hash.lookup(40_000);
//! let rgb = colors.rgb(curve.get(band));
//! assert_eq!(rgb[0], rgb[1]);
//! ```
//!
//! # Dependencies
//!
//! - [`rgbmap-core`] - Error types
//! - [`tracing`] - Table generation events

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod color;
pub mod distribution;
pub mod shift;

pub use color::{ColorArray, ColorTable, IntensityTable, TABLE_SIZE};
pub use distribution::{
    DistributionTable, HashAlgorithm, DEFAULT_EXPONENT, DEFAULT_HASH_SIZE, MAX_HASH_SIZE,
    MIN_HASH_SIZE,
};
pub use shift::{ShiftTable, MIN_SCALE};
