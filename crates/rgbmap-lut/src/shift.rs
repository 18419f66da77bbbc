//! Shift tables: the interactive contrast/brightness curve.
//!
//! A shift table is a 256-entry map applied between the distribution table
//! and the color lookup. Dragging the colormap in a viewer shifts it
//! (brightness); stretching or squeezing it changes contrast.
//!
//! [`ShiftTable::scale_and_shift`] reproduces the ds9 stretch-and-shift
//! behaviour: the identity curve is stretched, the centre 256 entries are
//! cut out, and only then is the window shifted with saturating edges.
//!
//! ```rust
//! use rgbmap_lut::ShiftTable;
//!
//! let curve = ShiftTable::scale_and_shift(2.0, 0.0).unwrap();
//! // doubling the contrast maps the middle half of the range onto 0..255
//! assert_eq!(curve.get(0), 64);
//! assert_eq!(curve.get(255), 191);
//! ```

use std::ops::Range;

use rgbmap_core::{Error, Result};

use crate::TABLE_SIZE;

/// Smallest contrast scale accepted by [`ShiftTable::scale_and_shift`].
pub const MIN_SCALE: f64 = 0.05;

/// Rolls `table` right by `round(len * fraction)` positions.
///
/// Without `rotate`, positions vacated by the roll keep the edge value that
/// was there before: the first value for a right shift, the last value for a
/// left shift.
pub fn shift(table: &[u8], fraction: f64, rotate: bool) -> Vec<u8> {
    let n = table.len();
    if n == 0 {
        return Vec::new();
    }
    let num = (n as f64 * fraction).round() as i64;
    let k = num.rem_euclid(n as i64) as usize;

    let mut out = Vec::with_capacity(n);
    out.extend_from_slice(&table[n - k..]);
    out.extend_from_slice(&table[..n - k]);

    if !rotate {
        let m = (num.unsigned_abs() as usize).min(n);
        if num > 0 {
            out[..m].fill(table[0]);
        } else if num < 0 {
            out[n - m..].fill(table[n - 1]);
        }
    }
    out
}

/// Nearest-neighbour entries `range` of `table` resampled to `new_len`.
fn resample(table: &[u8], new_len: usize, range: Range<usize>) -> Vec<u8> {
    let old_len = table.len();
    if old_len == 0 || new_len == 0 {
        return Vec::new();
    }
    let iscale = old_len as f64 / new_len as f64;
    range
        .map(|i| table[((i as f64 * iscale) as usize).min(old_len - 1)])
        .collect()
}

fn scaled_len(len: usize, scale: f64) -> usize {
    (scale * len as f64).round().max(0.0) as usize
}

/// Resamples `table` to `round(scale * len)` entries.
pub fn stretch(table: &[u8], scale: f64) -> Vec<u8> {
    let new_len = scaled_len(table.len(), scale);
    resample(table, new_len, 0..new_len)
}

/// The 256 entries around the middle of `table`.
fn center_window(table: &[u8]) -> Result<Vec<u8>> {
    let half = TABLE_SIZE / 2;
    let n = table.len() / 2;
    let window = n
        .checked_sub(half)
        .and_then(|start| table.get(start..n + half))
        .ok_or_else(|| Error::table_length("scaled shift table", TABLE_SIZE, table.len()))?;
    Ok(window.to_vec())
}

fn into_array(table: Vec<u8>, what: &str) -> Result<[u8; TABLE_SIZE]> {
    let len = table.len();
    table
        .try_into()
        .map_err(|_| Error::table_length(what, TABLE_SIZE, len))
}

/// 256-entry contrast/brightness curve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftTable {
    table: [u8; TABLE_SIZE],
}

impl Default for ShiftTable {
    fn default() -> Self {
        Self::identity()
    }
}

impl ShiftTable {
    /// The identity curve `0, 1, ..., 255`.
    pub fn identity() -> Self {
        let mut table = [0u8; TABLE_SIZE];
        for (i, v) in table.iter_mut().enumerate() {
            *v = i as u8;
        }
        Self { table }
    }

    /// Builds a curve from caller-supplied values.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTable`] unless `values` has exactly 256 entries.
    pub fn from_slice(values: &[u8]) -> Result<Self> {
        let table = values.try_into().map_err(|_| {
            Error::InvalidTable(format!(
                "shift table length {} != {TABLE_SIZE}",
                values.len()
            ))
        })?;
        Ok(Self { table })
    }

    /// Resets to identity.
    pub fn reset(&mut self) {
        *self = Self::identity();
    }

    /// Returns `true` if this is the identity curve.
    pub fn is_identity(&self) -> bool {
        self.table.iter().enumerate().all(|(i, &v)| v as usize == i)
    }

    /// Curve entries.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.table
    }

    /// Output for input band `index`.
    #[inline]
    pub fn get(&self, index: u8) -> u8 {
        self.table[index as usize]
    }

    /// Shifts the current curve by `fraction` of its length.
    pub fn shift(&mut self, fraction: f64, rotate: bool) -> Result<()> {
        let work = shift(&self.table, fraction, rotate);
        self.table = into_array(work, "shifted shift table")?;
        Ok(())
    }

    /// ds9-style contrast (`scale`, 1.0 = unchanged) and brightness
    /// (`shift`, fraction of the range) curve.
    ///
    /// The identity curve is stretched by `max(scale, 0.05)`. A curve shorter
    /// than 256 is padded with 0 on the left and 255 on the right; the centre
    /// 256 entries are then cut out and shifted without rotation.
    pub fn scale_and_shift(scale: f64, shift_fraction: f64) -> Result<Self> {
        let scale = scale.max(MIN_SCALE);
        if !scale.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "contrast scale must be finite, got {scale}"
            )));
        }
        let identity = Self::identity();
        let new_len = scaled_len(TABLE_SIZE, scale);

        let window = if new_len < TABLE_SIZE {
            let work = resample(&identity.table, new_len, 0..new_len);
            let pad = (TABLE_SIZE - work.len()) / 2 + 1;
            let mut padded = Vec::with_capacity(work.len() + 2 * pad);
            padded.resize(pad, identity.table[0]);
            padded.extend_from_slice(&work);
            padded.resize(padded.len() + pad, identity.table[TABLE_SIZE - 1]);
            padded.truncate(TABLE_SIZE);
            center_window(&padded)?
        } else {
            // only the centre of a long stretch survives the cut
            let mid = new_len / 2;
            let half = TABLE_SIZE / 2;
            resample(&identity.table, new_len, mid - half..mid + half)
        };
        let window = into_array(window, "scaled shift table")?;

        let shifted = shift(&window, shift_fraction, false);
        Ok(Self {
            table: into_array(shifted, "shifted shift table")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let t = ShiftTable::identity();
        assert!(t.is_identity());
        assert_eq!(t.as_slice().len(), 256);
        assert_eq!(ShiftTable::default(), t);
    }

    #[test]
    fn test_shift_saturates() {
        let table = [10u8, 20, 30, 40];
        assert_eq!(shift(&table, 0.25, false), vec![10, 10, 20, 30]);
        assert_eq!(shift(&table, -0.5, false), vec![30, 40, 40, 40]);
        assert_eq!(shift(&table, 0.25, true), vec![40, 10, 20, 30]);
        assert_eq!(shift(&table, -0.25, true), vec![20, 30, 40, 10]);
    }

    #[test]
    fn test_shift_full_length() {
        let table = [1u8, 2, 3];
        assert_eq!(shift(&table, 1.0, false), vec![1, 1, 1]);
        assert_eq!(shift(&table, -2.0, false), vec![3, 3, 3]);
        assert_eq!(shift(&table, 1.0, true), vec![1, 2, 3]);
    }

    #[test]
    fn test_zero_shift_is_noop() {
        let stretched = stretch(ShiftTable::identity().as_slice(), 3.0);
        let window = center_window(&stretched).unwrap();
        assert_eq!(shift(&window, 0.0, false), window);
    }

    #[test]
    fn test_stretch() {
        let table = [0u8, 10, 20, 30];
        assert_eq!(stretch(&table, 2.0), vec![0, 0, 10, 10, 20, 20, 30, 30]);
        assert_eq!(stretch(&table, 0.5), vec![0, 20]);
        assert!(stretch(&table, 0.0).is_empty());
    }

    #[test]
    fn test_scale_and_shift_identity() {
        let t = ShiftTable::scale_and_shift(1.0, 0.0).unwrap();
        assert!(t.is_identity());
    }

    #[test]
    fn test_scale_and_shift_squeeze() {
        // half contrast: 128 entries padded with 65 zeros / 65 x 255, cut to 256
        let t = ShiftTable::scale_and_shift(0.5, 0.0).unwrap();
        assert_eq!(t.get(0), 0);
        assert_eq!(t.get(64), 0);
        assert_eq!(t.get(65), 0);
        assert_eq!(t.get(66), 2);
        assert_eq!(t.get(191), 252);
        assert_eq!(t.get(192), 254);
        assert_eq!(t.get(193), 255);
        assert_eq!(t.get(255), 255);
        assert!(t.as_slice().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_scale_and_shift_low_contrast_darker() {
        // 84 stretched entries, padded, centred, then rolled left by 64
        let t = ShiftTable::scale_and_shift(0.33, -0.25).unwrap();
        assert!(t.as_slice()[..24].iter().all(|&v| v == 0));
        let points = [(24, 3), (43, 60), (44, 64), (65, 128), (86, 192), (106, 252), (107, 255)];
        for (i, want) in points {
            assert_eq!(t.get(i), want, "entry {i}");
        }
        assert!(t.as_slice()[107..].iter().all(|&v| v == 255));
    }

    #[test]
    fn test_scale_and_shift_high_contrast_brighter() {
        // 691-entry stretch cut to its centre, then rolled right by 95
        let t = ShiftTable::scale_and_shift(2.7, 0.37).unwrap();
        assert!(t.as_slice()[..97].iter().all(|&v| v == 80));
        let points = [(97, 81), (128, 92), (160, 104), (200, 119), (224, 128), (255, 139)];
        for (i, want) in points {
            assert_eq!(t.get(i), want, "entry {i}");
        }
    }

    #[test]
    fn test_scale_clamped() {
        assert_eq!(
            ShiftTable::scale_and_shift(0.0, 0.0).unwrap(),
            ShiftTable::scale_and_shift(MIN_SCALE, 0.0).unwrap()
        );
        assert!(ShiftTable::scale_and_shift(f64::INFINITY, 0.0).is_err());
    }

    #[test]
    fn test_scale_and_shift_with_shift() {
        let base = ShiftTable::scale_and_shift(2.0, 0.0).unwrap();
        let moved = ShiftTable::scale_and_shift(2.0, 0.25).unwrap();
        assert_eq!(moved.as_slice(), shift(base.as_slice(), 0.25, false).as_slice());
        assert!(moved.as_slice()[..64].iter().all(|&v| v == base.get(0)));
    }

    #[test]
    fn test_large_scale_is_bounded() {
        let t = ShiftTable::scale_and_shift(1.0e6, 0.0).unwrap();
        assert!(t.as_slice().iter().all(|&v| v == 127 || v == 128));
    }

    #[test]
    fn test_from_slice() {
        assert!(ShiftTable::from_slice(&[0u8; 255]).unwrap_err().is_configuration());
        let t = ShiftTable::from_slice(&[7u8; 256]).unwrap();
        assert_eq!(t.get(200), 7);
    }

    #[test]
    fn test_table_shift_method() {
        let mut t = ShiftTable::identity();
        t.shift(0.5, false).unwrap();
        assert_eq!(t.get(127), 0);
        assert_eq!(t.get(128), 0);
        assert_eq!(t.get(255), 127);
    }
}
