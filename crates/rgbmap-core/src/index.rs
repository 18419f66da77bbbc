//! Borrowed index arrays fed into the mapper.
//!
//! The rendering pipeline upstream of the mapper cuts and scales raw image
//! data into integer indices in `0..hashsize`. Scalar images arrive with one
//! index per pixel; pre-colored sources (RGB photos, overlays) arrive with
//! three or four interleaved indices per pixel.

use crate::{Error, Result, MAX_CHANNELS};

/// Row-major, interleaved view over `rows * cols * channels` indices.
///
/// # Example
///
/// ```rust
/// use rgbmap_core::IndexArray;
///
/// let data = vec![0u32; 4 * 3];
/// let idx = IndexArray::new(&data, 4, 3).unwrap();
/// assert_eq!(idx.shape(), (4, 3, 1));
/// assert!(!idx.is_multichannel());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct IndexArray<'a> {
    data: &'a [u32],
    rows: usize,
    cols: usize,
    channels: usize,
}

impl<'a> IndexArray<'a> {
    /// Wraps a scalar (one index per pixel) array.
    pub fn new(data: &'a [u32], rows: usize, cols: usize) -> Result<Self> {
        Self::with_channels(data, rows, cols, 1)
    }

    /// Wraps an interleaved array with `channels` indices per pixel.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if `channels` is not 1, 3 or 4, or if the
    /// data length does not equal `rows * cols * channels`.
    pub fn with_channels(data: &'a [u32], rows: usize, cols: usize, channels: usize) -> Result<Self> {
        if channels != 1 && !(3..=MAX_CHANNELS).contains(&channels) {
            return Err(Error::InvalidParameter(format!(
                "index arrays carry 1, 3 or 4 channels, got {channels}"
            )));
        }
        let expected = rows
            .checked_mul(cols)
            .and_then(|v| v.checked_mul(channels))
            .ok_or_else(|| Error::InvalidParameter("index array dimensions overflow".into()))?;
        if data.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "index data has {} elements, expected {rows}x{cols}x{channels} = {expected}",
                data.len()
            )));
        }
        Ok(Self { data, rows, cols, channels })
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Indices per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// `(rows, cols, channels)`
    #[inline]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.rows, self.cols, self.channels)
    }

    /// Returns `true` for pre-colored sources with 3+ channels.
    #[inline]
    pub fn is_multichannel(&self) -> bool {
        self.channels > 1
    }

    /// Returns `true` if the array holds no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw interleaved data.
    #[inline]
    pub fn data(&self) -> &'a [u32] {
        self.data
    }
}
