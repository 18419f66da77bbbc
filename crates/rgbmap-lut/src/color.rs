//! Color and intensity tables.
//!
//! A [`ColorTable`] is a named color map: an ordered list of RGB triples in
//! `[0, 1]`. An [`IntensityTable`] is 256 fractions in `[0, 1]` that permute
//! the 0..255 brightness domain before colors are looked up. Both are opaque
//! input here; authoring them is someone else's job.
//!
//! The mapper consumes them as 8-bit arrays:
//!
//! ```text
//! ColorTable (N triples) --resample+round--> composite [3][256]
//! IntensityTable (256)   --round-----------> intensity index [256]
//! active[c][i] = composite[c][index[i]]
//! ```

use rgbmap_core::{Error, Result};

/// Entries in every 8-bit lookup stage.
pub const TABLE_SIZE: usize = 256;

fn check_unit(value: f32, what: &str, at: usize) -> Result<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(Error::InvalidTable(format!(
            "{what} entry {at} = {value} is outside [0, 1]"
        )));
    }
    Ok(())
}

/// Scales a unit fraction to `0..=255` with round-to-nearest.
#[inline]
fn to_byte(value: f32) -> u8 {
    (value as f64 * 255.0).round().clamp(0.0, 255.0) as u8
}

/// A named color map of N RGB triples.
///
/// # Example
///
/// ```rust
/// use rgbmap_lut::ColorTable;
///
/// let bw = ColorTable::new("bw", vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]).unwrap();
/// let composite = bw.composite();
/// assert_eq!(composite.rgb(0), [0, 0, 0]);
/// assert_eq!(composite.rgb(255), [255, 255, 255]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ColorTable {
    name: String,
    colors: Vec<[f32; 3]>,
}

impl ColorTable {
    /// Creates a color table.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTable`] if `colors` is empty or a component is outside `[0, 1]`.
    pub fn new(name: impl Into<String>, colors: Vec<[f32; 3]>) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::InvalidTable("color table has no entries".into()));
        }
        for (i, rgb) in colors.iter().enumerate() {
            for &c in rgb {
                check_unit(c, "color table", i)?;
            }
        }
        Ok(Self {
            name: name.into(),
            colors,
        })
    }

    /// Linear gray ramp, black to white, 256 entries.
    pub fn ramp() -> Self {
        let colors = (0..TABLE_SIZE)
            .map(|i| {
                let v = i as f32 / 255.0;
                [v, v, v]
            })
            .collect();
        Self {
            name: "ramp".into(),
            colors,
        }
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of RGB entries.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; construction rejects empty tables.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The RGB triples.
    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    /// Builds the 8-bit composite color array.
    ///
    /// Tables that are not 256 long are resampled by nearest neighbour so
    /// that the first and last entries land on 0 and 255.
    pub fn composite(&self) -> ColorArray {
        let n = self.colors.len();
        let mut channels = [[0u8; TABLE_SIZE]; 3];
        for j in 0..TABLE_SIZE {
            let src = if n == TABLE_SIZE {
                j
            } else {
                ((j * (n - 1)) as f64 / 255.0).round() as usize
            };
            let rgb = self.colors[src.min(n - 1)];
            for c in 0..3 {
                channels[c][j] = to_byte(rgb[c]);
            }
        }
        ColorArray { channels }
    }
}

/// 256 fractional intensity values.
///
/// # Example
///
/// ```rust
/// use rgbmap_lut::IntensityTable;
///
/// let ramp = IntensityTable::ramp();
/// let idx = ramp.indexes();
/// assert_eq!(idx[0], 0);
/// assert_eq!(idx[200], 200);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityTable {
    name: String,
    values: Vec<f32>,
}

impl IntensityTable {
    /// Creates an intensity table.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTable`] unless there are exactly 256 values in `[0, 1]`.
    pub fn new(name: impl Into<String>, values: Vec<f32>) -> Result<Self> {
        if values.len() != TABLE_SIZE {
            return Err(Error::InvalidTable(format!(
                "intensity table length {} != {TABLE_SIZE}",
                values.len()
            )));
        }
        for (i, &v) in values.iter().enumerate() {
            check_unit(v, "intensity table", i)?;
        }
        Ok(Self {
            name: name.into(),
            values,
        })
    }

    /// Identity intensity map.
    pub fn ramp() -> Self {
        Self {
            name: "ramp".into(),
            values: (0..TABLE_SIZE).map(|i| i as f32 / 255.0).collect(),
        }
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The fractional values.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Intensity index array: each value scaled to 0..=255 and rounded.
    pub fn indexes(&self) -> [u8; TABLE_SIZE] {
        let mut idx = [0u8; TABLE_SIZE];
        for (dst, &v) in idx.iter_mut().zip(&self.values) {
            *dst = to_byte(v);
        }
        idx
    }
}

/// Three 256-entry 8-bit channel tables (R, G, B).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorArray {
    channels: [[u8; TABLE_SIZE]; 3],
}

impl ColorArray {
    /// One channel table (0 = R, 1 = G, 2 = B).
    #[inline]
    pub fn channel(&self, c: usize) -> &[u8; TABLE_SIZE] {
        &self.channels[c]
    }

    /// All three channel tables.
    #[inline]
    pub fn channels(&self) -> &[[u8; TABLE_SIZE]; 3] {
        &self.channels
    }

    /// RGB triple at `index`.
    #[inline]
    pub fn rgb(&self, index: u8) -> [u8; 3] {
        let i = index as usize;
        [self.channels[0][i], self.channels[1][i], self.channels[2][i]]
    }

    /// Rearranges entries so `out[c][i] = self[c][index[i]]`.
    pub fn permute(&self, index: &[u8; TABLE_SIZE]) -> ColorArray {
        let mut channels = [[0u8; TABLE_SIZE]; 3];
        for (dst, src) in channels.iter_mut().zip(&self.channels) {
            for (d, &i) in dst.iter_mut().zip(index) {
                *d = src[i as usize];
            }
        }
        ColorArray { channels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ramp_composite_is_identity() {
        let composite = ColorTable::ramp().composite();
        for i in 0..=255u8 {
            assert_eq!(composite.rgb(i), [i, i, i]);
        }
    }

    #[test]
    fn test_rounding() {
        let table = ColorTable::new("half", vec![[0.5, 0.2, 1.0]]).unwrap();
        // 127.5 rounds up, 51.0 stays
        assert_eq!(table.composite().rgb(17), [128, 51, 255]);
    }

    #[test]
    fn test_two_entry_resample() {
        let bw = ColorTable::new("bw", vec![[0.0; 3], [1.0; 3]]).unwrap().composite();
        assert_eq!(bw.rgb(127), [0, 0, 0]);
        assert_eq!(bw.rgb(128), [255, 255, 255]);
    }

    #[test]
    fn test_rejects_bad_tables() {
        assert!(ColorTable::new("empty", vec![]).is_err());
        assert!(ColorTable::new("nan", vec![[f32::NAN, 0.0, 0.0]]).is_err());
        assert!(ColorTable::new("big", vec![[1.5, 0.0, 0.0]]).is_err());
        assert!(IntensityTable::new("short", vec![0.5; 10]).is_err());
        let mut vals = vec![0.0; 256];
        vals[3] = -0.1;
        assert!(IntensityTable::new("neg", vals).unwrap_err().is_configuration());
    }

    #[test]
    fn test_intensity_ramp() {
        let ramp = IntensityTable::ramp();
        assert_relative_eq!(ramp.values()[255], 1.0);
        let idx = ramp.indexes();
        assert!(idx.iter().enumerate().all(|(i, &v)| v as usize == i));
    }

    #[test]
    fn test_permute() {
        let composite = ColorTable::ramp().composite();
        let mut reversed = [0u8; TABLE_SIZE];
        for (i, v) in reversed.iter_mut().enumerate() {
            *v = (255 - i) as u8;
        }
        let active = composite.permute(&reversed);
        assert_eq!(active.rgb(0), [255, 255, 255]);
        assert_eq!(active.rgb(255), [0, 0, 0]);
    }
}
