//! Distribution table listing.

use anyhow::{Context, Result};
use tracing::info;

use rgbmap::{DistributionTable, HashAlgorithm};

use super::format_table;
use crate::HashArgs;

/// First index and slot count of every non-empty band.
pub fn band_layout(table: &[u8]) -> Vec<(u8, usize, usize)> {
    let mut layout: Vec<(u8, usize, usize)> = Vec::new();
    for (i, &band) in table.iter().enumerate() {
        if let Some((b, _, count)) = layout.last_mut() {
            if *b == band {
                *count += 1;
                continue;
            }
        }
        layout.push((band, i, 1));
    }
    layout
}

pub fn run(args: HashArgs, verbose: u8) -> Result<()> {
    let algorithm: HashAlgorithm = args
        .algorithm
        .parse()
        .with_context(|| format!("Known algorithms: {}", HashAlgorithm::names().collect::<Vec<_>>().join(", ")))?;
    let table = DistributionTable::generate(algorithm, args.size, args.exponent)
        .context("Failed to generate distribution table")?;
    info!(%algorithm, size = args.size, exponent = args.exponent, "distribution table");

    if verbose > 0 {
        println!(
            "# {} size={} exponent={}",
            table.algorithm(),
            table.len(),
            table.exponent()
        );
    }

    if args.all {
        print!("{}", format_table(table.as_slice(), 16));
        return Ok(());
    }

    println!("{:>4} {:>8} {:>8}", "band", "first", "count");
    for (band, first, count) in band_layout(table.as_slice()) {
        println!("{band:>4} {first:>8} {count:>8}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_layout() {
        let layout = band_layout(&[0, 0, 1, 3, 3, 3]);
        assert_eq!(layout, vec![(0, 0, 2), (1, 2, 1), (3, 3, 3)]);
    }

    #[test]
    fn test_linear_layout_has_256_bands() {
        let table = DistributionTable::generate(HashAlgorithm::Linear, 1024, 1.0).unwrap();
        let layout = band_layout(table.as_slice());
        assert_eq!(layout.len(), 256);
        assert!(layout.iter().all(|&(_, _, count)| count == 4));
        assert_eq!(layout[128], (128, 512, 4));
    }
}
