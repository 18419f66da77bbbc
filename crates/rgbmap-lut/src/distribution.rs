//! Color distribution ("hash") tables.
//!
//! The rendering pipeline scales cut-levelled pixel data into
//! `0..hashsize`. A distribution table folds that wide range down to the
//! 256 brightness bands of the color map through a nonlinear curve, so a
//! logarithmic table, for instance, spends more bands on faint pixels.
//!
//! All algorithms follow the skycat convention: walk the 257 band edges,
//! compute how many table slots lie below each edge, and fill the slots
//! between consecutive edges with the band number.
//!
//! ```rust
//! use rgbmap_lut::{DistributionTable, HashAlgorithm};
//!
//! let table = DistributionTable::generate(HashAlgorithm::Linear, 1024, 10.0).unwrap();
//! assert_eq!(table.len(), 1024);
//! assert_eq!(table.lookup(512), 128);
//! ```

use std::fmt;
use std::str::FromStr;

use rgbmap_core::{Error, Result};
use tracing::trace;

/// Smallest permitted table size.
pub const MIN_HASH_SIZE: usize = 256;
/// Largest permitted table size.
pub const MAX_HASH_SIZE: usize = 1024 * 1024;
/// Table size used by a fresh mapper.
pub const DEFAULT_HASH_SIZE: usize = 65536;
/// Exponent used by a fresh mapper.
pub const DEFAULT_EXPONENT: f64 = 10.0;

/// Number of brightness bands. Band edges run `0..=BANDS`.
const BANDS: usize = 256;

/// Distribution curve used to build the hash table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    /// Equal-width bands.
    #[default]
    Linear,
    /// Bands grow as `exp(t * E)`; emphasises low values for `E > 0`.
    Logarithmic,
    /// Band edges at `t^E`.
    Exponential,
}

impl HashAlgorithm {
    /// All algorithms, in display order.
    pub const ALL: [HashAlgorithm; 3] = [Self::Linear, Self::Logarithmic, Self::Exponential];

    /// Canonical lower-case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Logarithmic => "logarithmic",
            Self::Exponential => "exponential",
        }
    }

    /// Canonical names of all algorithms.
    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().map(Self::name)
    }

    /// Checks that `exponent` is usable with this algorithm.
    pub fn validate_exponent(self, exponent: f64) -> Result<()> {
        if !exponent.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "exponent must be finite, got {exponent}"
            )));
        }
        if self == Self::Logarithmic && exponent == 0.0 {
            return Err(Error::InvalidParameter(
                "logarithmic distribution needs a nonzero exponent".into(),
            ));
        }
        Ok(())
    }

    /// Builds a table of `size` entries with this algorithm.
    pub fn generate(self, size: usize, exponent: f64) -> Result<Vec<u8>> {
        match self {
            Self::Linear => linear_hash(size),
            Self::Logarithmic => logarithmic_hash(size, exponent),
            Self::Exponential => exponential_hash(size, exponent),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_string()))
    }
}

fn check_size(size: usize) -> Result<()> {
    if !(MIN_HASH_SIZE..=MAX_HASH_SIZE).contains(&size) {
        return Err(Error::InvalidHashSize {
            size,
            min: MIN_HASH_SIZE,
            max: MAX_HASH_SIZE,
        });
    }
    Ok(())
}

fn check_length(table: Vec<u8>, size: usize) -> Result<Vec<u8>> {
    if table.len() != size {
        return Err(Error::table_length("hash table", size, table.len()));
    }
    Ok(table)
}

/// Fills bands `0..=256` up to the cumulative slot count `cumulative(t)`,
/// `t = band / 256`. Band 256 is folded into 255.
fn fill_bands(size: usize, cumulative: impl Fn(f64) -> f64) -> Result<Vec<u8>> {
    let mut table = Vec::with_capacity(size);
    let mut prev = 0usize;
    for band in 0..=BANDS {
        let t = band as f64 / BANDS as f64;
        let edge = (cumulative(t) + 0.5).floor();
        let edge = if edge.is_nan() {
            prev
        } else {
            edge.clamp(0.0, size as f64) as usize
        };
        if edge > prev {
            table.resize(table.len() + (edge - prev), band.min(BANDS - 1) as u8);
            prev = edge;
        }
    }
    table.truncate(size);
    check_length(table, size)
}

fn linear_entries(size: usize) -> Vec<u8> {
    let step = ((size as f64 / BANDS as f64).round() as usize).max(1);
    (0..size).map(|k| (k / step).min(BANDS - 1) as u8).collect()
}

/// Equal-width bands of `round(size / 256)` slots.
pub fn linear_hash(size: usize) -> Result<Vec<u8>> {
    check_size(size)?;
    check_length(linear_entries(size), size)
}

/// Logarithmic bands: edge `i` at `(exp(i/256 * E) - 1) * scale`.
///
/// For negative exponents the mirrored curve `(1 - exp(i/256 * E)) * scale`
/// is used, which bunches bands toward the top of the range.
pub fn logarithmic_hash(size: usize, exponent: f64) -> Result<Vec<u8>> {
    check_size(size)?;
    HashAlgorithm::Logarithmic.validate_exponent(exponent)?;
    let scale = if exponent >= 0.0 {
        size as f64 / (exponent.exp() - 1.0)
    } else {
        size as f64 / (1.0 - exponent.exp())
    };
    if !scale.is_finite() || scale <= 0.0 {
        return Err(Error::InvalidParameter(format!(
            "exponent {exponent} gives a degenerate logarithmic scale"
        )));
    }
    if exponent > 0.0 {
        fill_bands(size, |t| ((t * exponent).exp() - 1.0) * scale)
    } else {
        fill_bands(size, |t| (1.0 - (t * exponent).exp()) * scale)
    }
}

/// Power-law bands: edge `i` at `(i/256)^E * size`.
pub fn exponential_hash(size: usize, exponent: f64) -> Result<Vec<u8>> {
    check_size(size)?;
    HashAlgorithm::Exponential.validate_exponent(exponent)?;
    fill_bands(size, |t| t.powf(exponent) * size as f64)
}

/// A generated distribution table together with the parameters used.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionTable {
    algorithm: HashAlgorithm,
    exponent: f64,
    table: Vec<u8>,
}

impl Default for DistributionTable {
    /// Linear table of [`DEFAULT_HASH_SIZE`] entries.
    fn default() -> Self {
        Self::linear_unchecked(DEFAULT_HASH_SIZE)
    }
}

impl DistributionTable {
    fn linear_unchecked(size: usize) -> Self {
        Self {
            algorithm: HashAlgorithm::Linear,
            exponent: DEFAULT_EXPONENT,
            table: linear_entries(size),
        }
    }

    /// The 256-entry identity table used for 8-bit pass-through.
    pub fn identity() -> Self {
        Self::linear_unchecked(MIN_HASH_SIZE)
    }

    /// Generates a table.
    ///
    /// # Errors
    ///
    /// Configuration errors for a size outside `256..=1048576` or an
    /// unusable exponent; [`Error::Internal`] if generation produced the
    /// wrong length.
    pub fn generate(algorithm: HashAlgorithm, size: usize, exponent: f64) -> Result<Self> {
        let table = algorithm.generate(size, exponent)?;
        trace!(algorithm = %algorithm, size, exponent, "generated distribution table");
        Ok(Self {
            algorithm,
            exponent,
            table,
        })
    }

    /// Algorithm used.
    #[inline]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Exponent used (ignored by the linear algorithm).
    #[inline]
    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    /// Number of entries (the hash size).
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Always `false`; tables hold at least 256 entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The table entries.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.table
    }

    /// Band for `index`, clamped to the table range.
    #[inline]
    pub fn lookup(&self, index: u32) -> u8 {
        let i = (index as usize).min(self.table.len() - 1);
        self.table[i]
    }
}
