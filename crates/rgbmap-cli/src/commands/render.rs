//! Preview rendering.
//!
//! Builds a horizontal index ramp spanning the whole distribution table
//! and maps it through a configured mapper.

use anyhow::{bail, Context, Result};
use std::time::Instant;
use tracing::{debug, info};

use rgbmap::{ChannelOrder, ColorMapper, HashAlgorithm, IndexArray, MapperSettings, PixelPlanes};

use super::save_png;
use crate::RenderArgs;

/// Index ramp `0..=top` across `width`, repeated on every row.
pub fn ramp_indices(width: usize, height: usize, top: u32) -> Vec<u32> {
    let span = width.saturating_sub(1).max(1) as u64;
    let row: Vec<u32> = (0..width)
        .map(|x| (x as u64 * top as u64 / span) as u32)
        .collect();
    let mut data = Vec::with_capacity(width * height);
    for _ in 0..height {
        data.extend_from_slice(&row);
    }
    data
}

/// Three-channel source: R rises, G falls, B stays at mid range.
fn rgb_indices(width: usize, height: usize, top: u32) -> Vec<u32> {
    ramp_indices(width, height, top)
        .into_iter()
        .flat_map(|v| [v, top - v, top / 2])
        .collect()
}

fn build_mapper(args: &RenderArgs) -> Result<ColorMapper> {
    let mut mapper = if args.pass_through {
        ColorMapper::pass_through()
    } else {
        ColorMapper::new()
    };

    if let Some(path) = &args.settings {
        let settings = MapperSettings::from_file(path)
            .with_context(|| format!("Failed to load settings: {}", path.display()))?;
        mapper
            .apply_settings(&settings, false)
            .with_context(|| format!("Invalid settings: {}", path.display()))?;
    }
    if let Some(name) = &args.algorithm {
        let algorithm: HashAlgorithm = name.parse()?;
        mapper.set_hash_algorithm(algorithm, false)?;
    }
    mapper
        .scale_and_shift(args.scale, args.shift, false)
        .context("Invalid contrast curve")?;

    if let Some(path) = &args.monitor_profile {
        attach_profile(&mut mapper, path)?;
    }
    Ok(mapper)
}

#[cfg(feature = "icc")]
fn attach_profile(mapper: &mut ColorMapper, path: &std::path::Path) -> Result<()> {
    use std::sync::Arc;

    let profile = rgbmap::IccProfileCorrection::srgb_to_file(path, rgbmap::RenderingIntent::Perceptual)
        .with_context(|| format!("Failed to load monitor profile: {}", path.display()))?;
    mapper.set_profile_correction(Some(Arc::new(profile)));
    Ok(())
}

#[cfg(not(feature = "icc"))]
fn attach_profile(_mapper: &mut ColorMapper, path: &std::path::Path) -> Result<()> {
    bail!(
        "Cannot use monitor profile {}: rebuild with the `icc` feature",
        path.display()
    )
}

pub fn render(args: &RenderArgs) -> Result<PixelPlanes> {
    if args.width == 0 || args.height == 0 {
        bail!("Image size must be non-zero, got {}x{}", args.width, args.height);
    }
    let order: ChannelOrder = args.order.parse()?;
    let mapper = build_mapper(args)?;
    debug!(?mapper, "configured mapper");

    let top = (mapper.hash_size() - 1) as u32;
    let start = Instant::now();
    let planes = if args.rgb_source {
        let data = rgb_indices(args.width, args.height, top);
        let index = IndexArray::with_channels(&data, args.height, args.width, 3)?;
        mapper.map_pixels(&index, order, ChannelOrder::RGB)?
    } else {
        let data = ramp_indices(args.width, args.height, top);
        let index = IndexArray::new(&data, args.height, args.width)?;
        mapper.map_pixels(&index, order, ChannelOrder::RGB)?
    };
    info!(
        width = args.width,
        height = args.height,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "rendered preview"
    );
    Ok(planes)
}

pub fn run(args: RenderArgs, verbose: u8) -> Result<()> {
    let planes = render(&args)?;
    save_png(&args.output, &planes)?;
    if verbose > 0 {
        println!(
            "Wrote {}x{} {} preview to {}",
            planes.cols(),
            planes.rows(),
            planes.order(),
            args.output.display()
        );
    }
    Ok(())
}
