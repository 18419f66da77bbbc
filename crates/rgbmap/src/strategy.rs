//! Pixel mapping kernels.
//!
//! Two strategies share one output contract: write R, G and B at the
//! positions named by the output order, leave alpha to the caller.
//!
//! - [`MappingStrategy::LookupTable`]: `index -> hash -> shift -> color`
//! - [`MappingStrategy::PassThrough`]: indices are already 8-bit values
//!
//! The lookup path fuses shift and color tables into one 256-entry table per
//! channel before touching pixels, so the inner loop is two array reads.

use rayon::prelude::*;

use rgbmap_core::{ChannelOrder, Error, IndexArray, PixelPlanes, Result};
use rgbmap_lut::{ColorArray, ShiftTable, TABLE_SIZE};

/// How indices become colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MappingStrategy {
    /// Full distribution/shift/color lookup.
    #[default]
    LookupTable,
    /// Indices are copied to the output, clamped to 255.
    PassThrough,
}

/// Tables consulted by [`MappingStrategy::LookupTable`].
pub(crate) struct Lookup<'a> {
    pub hash: &'a [u8],
    pub shift: &'a ShiftTable,
    pub colors: &'a ColorArray,
}

impl Lookup<'_> {
    /// `fused[c][band] = colors[c][shift[band]]`
    fn fuse(&self) -> [[u8; TABLE_SIZE]; 3] {
        let mut fused = [[0u8; TABLE_SIZE]; 3];
        for (dst, src) in fused.iter_mut().zip(self.colors.channels()) {
            for (d, &s) in dst.iter_mut().zip(self.shift.as_slice()) {
                *d = src[s as usize];
            }
        }
        fused
    }
}

/// Positions of R, G and B in `order`, as a configuration error if missing.
pub(crate) fn rgb_positions(order: ChannelOrder, role: &str) -> Result<[usize; 3]> {
    order
        .rgb_indexes()
        .map_err(|_| Error::invalid_order(order.to_string(), format!("{role} order must contain R, G and B")))
}

#[inline]
fn clamp_byte(v: u32) -> u8 {
    v.min(255) as u8
}

impl MappingStrategy {
    /// Writes RGB for every pixel of `index` into `out`.
    ///
    /// `source_order` names the channels of a multi-channel `index`; it is
    /// ignored for scalar input. Shapes must already agree.
    pub(crate) fn fill(
        self,
        tables: &Lookup<'_>,
        index: &IndexArray<'_>,
        out: &mut PixelPlanes,
        source_order: ChannelOrder,
    ) -> Result<()> {
        let dst = rgb_positions(out.order(), "output")?;
        let src = if index.is_multichannel() {
            if source_order.len() != index.channels() {
                return Err(Error::invalid_order(
                    source_order.to_string(),
                    format!("index array has {} channels", index.channels()),
                ));
            }
            Some(rgb_positions(source_order, "source")?)
        } else {
            None
        };

        if index.is_empty() {
            return Ok(());
        }

        let depth = out.depth();
        let channels = index.channels();
        let cols = index.cols();
        let rows = out
            .as_bytes_mut()
            .par_chunks_mut(cols * depth)
            .zip(index.data().par_chunks(cols * channels));

        match (self, src) {
            (Self::LookupTable, None) => {
                let fused = tables.fuse();
                let hash = tables.hash;
                let last = hash.len() - 1;
                rows.for_each(|(out_row, idx_row)| {
                    for (px, &v) in out_row.chunks_exact_mut(depth).zip(idx_row) {
                        let band = hash[(v as usize).min(last)] as usize;
                        for c in 0..3 {
                            px[dst[c]] = fused[c][band];
                        }
                    }
                });
            }
            (Self::LookupTable, Some(src)) => {
                let fused = tables.fuse();
                let hash = tables.hash;
                let last = hash.len() - 1;
                rows.for_each(|(out_row, idx_row)| {
                    for (px, ipx) in out_row
                        .chunks_exact_mut(depth)
                        .zip(idx_row.chunks_exact(channels))
                    {
                        for c in 0..3 {
                            let band = hash[(ipx[src[c]] as usize).min(last)] as usize;
                            px[dst[c]] = fused[c][band];
                        }
                    }
                });
            }
            (Self::PassThrough, None) => {
                rows.for_each(|(out_row, idx_row)| {
                    for (px, &v) in out_row.chunks_exact_mut(depth).zip(idx_row) {
                        let v = clamp_byte(v);
                        for &d in &dst {
                            px[d] = v;
                        }
                    }
                });
            }
            (Self::PassThrough, Some(src)) => {
                rows.for_each(|(out_row, idx_row)| {
                    for (px, ipx) in out_row
                        .chunks_exact_mut(depth)
                        .zip(idx_row.chunks_exact(channels))
                    {
                        for c in 0..3 {
                            px[dst[c]] = clamp_byte(ipx[src[c]]);
                        }
                    }
                });
            }
        }
        Ok(())
    }
}
