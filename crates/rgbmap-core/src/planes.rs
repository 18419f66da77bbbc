//! Interleaved output buffers with a named channel order.
//!
//! [`PixelPlanes`] owns a row-major `u8` buffer of shape
//! `(rows, cols, order.len())` and lets consumers address single channels
//! by name regardless of memory layout:
//!
//! ```text
//! order "BGRA":  [B G R A B G R A ...]  <- row 0
//!                [B G R A B G R A ...]  <- row 1
//! ```
//!
//! # Example
//!
//! ```rust
//! use rgbmap_core::{ChannelOrder, PixelPlanes};
//!
//! let planes = PixelPlanes::from_vec(vec![1, 2, 3, 255], 1, 1, ChannelOrder::BGRA).unwrap();
//! assert_eq!(planes.slice('r').unwrap().get(0, 0), Some(3));
//! assert!(planes.has_alpha());
//!
//! let rgb = planes.to_order(ChannelOrder::RGB).unwrap();
//! assert_eq!(rgb.as_bytes(), &[3, 2, 1]);
//! ```

use rayon::prelude::*;

use crate::{Channel, ChannelOrder, Error, Result};

/// Owned interleaved pixel buffer with a channel order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelPlanes {
    data: Vec<u8>,
    rows: usize,
    cols: usize,
    order: ChannelOrder,
}

impl PixelPlanes {
    /// Allocates a zeroed buffer.
    ///
    /// # Errors
    ///
    /// [`Error::ShapeMismatch`] if the byte count does not fit in `usize`.
    pub fn new(rows: usize, cols: usize, order: ChannelOrder) -> Result<Self> {
        let len = Self::byte_len(rows, cols, order.len())?;
        Ok(Self {
            data: vec![0; len],
            rows,
            cols,
            order,
        })
    }

    fn byte_len(rows: usize, cols: usize, depth: usize) -> Result<usize> {
        rows.checked_mul(cols)
            .and_then(|v| v.checked_mul(depth))
            .ok_or(Error::ShapeMismatch {
                expected: (rows, cols, depth),
                got: (rows, cols, 0),
            })
    }

    /// Wraps an existing buffer.
    ///
    /// # Errors
    ///
    /// [`Error::ShapeMismatch`] if `data.len() != rows * cols * order.len()`.
    pub fn from_vec(data: Vec<u8>, rows: usize, cols: usize, order: ChannelOrder) -> Result<Self> {
        let depth = order.len();
        if data.len() != Self::byte_len(rows, cols, depth)? {
            let area = (rows * cols).max(1);
            return Err(Error::ShapeMismatch {
                expected: (rows, cols, depth),
                got: (rows, cols, data.len() / area),
            });
        }
        Ok(Self { data, rows, cols, order })
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

    /// Bytes per pixel.
    #[inline]
    pub fn depth(&self) -> usize {
        self.order.len()
    }

    /// `(rows, cols)` of each channel slice.
    #[inline]
    pub fn size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// `(rows, cols, depth)`
    #[inline]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.rows, self.cols, self.depth())
    }

    /// Channel order of the buffer.
    #[inline]
    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    /// Returns `true` if the buffer carries an alpha channel.
    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.order.has_alpha()
    }

    /// Raw interleaved bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw interleaved bytes.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the planes, returning the buffer.
    #[inline]
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Returns one pixel's bytes, or `None` if out of bounds.
    pub fn pixel(&self, row: usize, col: usize) -> Option<&[u8]> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let depth = self.depth();
        let start = (row * self.cols + col) * depth;
        Some(&self.data[start..start + depth])
    }

    /// Positions of each channel of `wanted` (e.g. `"RGB"`) in this buffer.
    pub fn order_indexes(&self, wanted: &str) -> Result<Vec<usize>> {
        self.order.indexes_of(&ChannelOrder::parse(wanted)?)
    }

    /// Strided view of one channel.
    pub fn channel(&self, channel: Channel) -> Result<ChannelSlice<'_>> {
        let offset = self.order.index_of(channel)?;
        Ok(ChannelSlice {
            data: &self.data,
            rows: self.rows,
            cols: self.cols,
            depth: self.depth(),
            offset,
        })
    }

    /// Strided view of one channel by case-insensitive name.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidChannelOrder`] for a name outside `{R, G, B, A}`,
    /// [`Error::ChannelNotFound`] for a channel absent from the order.
    pub fn slice(&self, name: char) -> Result<ChannelSlice<'_>> {
        self.channel(Channel::try_from(name)?)
    }

    /// Sets every sample of `channel` to `value`.
    pub fn fill_channel(&mut self, channel: Channel, value: u8) -> Result<()> {
        let offset = self.order.index_of(channel)?;
        let depth = self.depth();
        if self.data.is_empty() {
            return Ok(());
        }
        self.data
            .par_chunks_mut(depth * self.cols)
            .for_each(|row| {
                for px in row.chunks_exact_mut(depth) {
                    px[offset] = value;
                }
            });
        Ok(())
    }

    /// Copies the buffer into a different channel order.
    ///
    /// Every channel of `order` must exist in this buffer.
    pub fn to_order(&self, order: ChannelOrder) -> Result<PixelPlanes> {
        if order == self.order {
            return Ok(self.clone());
        }
        let src_idx = self.order.indexes_of(&order)?;
        let mut out = PixelPlanes::new(self.rows, self.cols, order)?;
        if self.data.is_empty() {
            return Ok(out);
        }
        let (src_depth, dst_depth) = (self.depth(), order.len());
        out.data
            .par_chunks_mut(dst_depth * self.cols)
            .zip(self.data.par_chunks(src_depth * self.cols))
            .for_each(|(dst_row, src_row)| {
                for (dst, src) in dst_row
                    .chunks_exact_mut(dst_depth)
                    .zip(src_row.chunks_exact(src_depth))
                {
                    for (d, &s) in dst.iter_mut().zip(&src_idx) {
                        *d = src[s];
                    }
                }
            });
        Ok(out)
    }
}

/// Read-only strided view of a single channel.
#[derive(Debug, Clone, Copy)]
pub struct ChannelSlice<'a> {
    data: &'a [u8],
    rows: usize,
    cols: usize,
    depth: usize,
    offset: usize,
}

impl<'a> ChannelSlice<'a> {
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

    /// Sample at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.data[(row * self.cols + col) * self.depth + self.offset])
    }

    /// Iterates samples in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + 'a {
        let data = self.data;
        data.iter().skip(self.offset).step_by(self.depth).copied()
    }

    /// Collects the channel into a dense row-major vector.
    pub fn to_vec(&self) -> Vec<u8> {
        self.iter().collect()
    }
}
