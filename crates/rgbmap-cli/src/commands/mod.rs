//! CLI command implementations

pub mod curve;
pub mod hash;
pub mod render;

use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use rgbmap::{ChannelOrder, PixelPlanes};

/// Writes `planes` as an 8-bit PNG.
///
/// Buffers with alpha are stored as RGBA, everything else as RGB.
pub fn save_png(path: &Path, planes: &PixelPlanes) -> Result<()> {
    let (order, color_type) = if planes.has_alpha() {
        (ChannelOrder::RGBA, png::ColorType::Rgba)
    } else {
        (ChannelOrder::RGB, png::ColorType::Rgb)
    };
    let width = u32::try_from(planes.cols()).context("Image too wide for PNG")?;
    let height = u32::try_from(planes.rows()).context("Image too tall for PNG")?;
    let data = planes
        .to_order(order)
        .context("Failed to reorder channels")?
        .into_vec();

    let file = File::create(path)
        .with_context(|| format!("Failed to create: {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(color_type);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());
    encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

    let mut writer = encoder
        .write_header()
        .with_context(|| format!("Failed to write PNG header: {}", path.display()))?;
    writer
        .write_image_data(&data)
        .with_context(|| format!("Failed to save: {}", path.display()))?;
    writer.finish()?;
    Ok(())
}

/// Formats `values` in rows of `per_line`.
pub fn format_table(values: &[u8], per_line: usize) -> String {
    let mut text = String::new();
    for (i, chunk) in values.chunks(per_line).enumerate() {
        let row: Vec<String> = chunk.iter().map(|v| format!("{v:3}")).collect();
        text.push_str(&format!("{:7}: {}\n", i * per_line, row.join(" ")));
    }
    text
}
