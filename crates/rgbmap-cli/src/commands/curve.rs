//! Contrast curve listing.

use anyhow::{Context, Result};

use rgbmap::ShiftTable;

use super::format_table;
use crate::CurveArgs;

pub fn run(args: CurveArgs, verbose: u8) -> Result<()> {
    let curve = ShiftTable::scale_and_shift(args.scale, args.shift)
        .context("Failed to build contrast curve")?;
    if verbose > 0 {
        println!("# scale={} shift={}", args.scale, args.shift);
    }
    print!("{}", format_table(curve.as_slice(), 16));
    Ok(())
}
