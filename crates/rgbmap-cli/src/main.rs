//! rgbmap - color map inspection and preview
//!
//! Prints distribution tables and contrast curves, and renders synthetic
//! index ramps through a configured mapper.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "rgbmap")]
#[command(author, version, about = "Color map inspection and preview")]
#[command(long_about = "
Inspect the lookup tables behind index-to-RGB color mapping.

Examples:
  rgbmap hash -a logarithmic -s 65536 -e 10     # Band boundaries
  rgbmap curve --scale 1.5 --shift -0.1          # Contrast curve
  rgbmap render -W 512 -H 64 -o ramp.png         # Preview ramp
  rgbmap render --settings mapper.yaml -o out.png --order BGRA
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the band layout of a distribution table
    #[command(visible_alias = "h")]
    Hash(HashArgs),

    /// Print a contrast/brightness curve
    #[command(visible_alias = "c")]
    Curve(CurveArgs),

    /// Map a synthetic index ramp and write a PNG preview
    #[command(visible_alias = "r")]
    Render(RenderArgs),
}

#[derive(Args)]
pub struct HashArgs {
    /// Distribution algorithm (linear, logarithmic, exponential)
    #[arg(short, long, default_value = "linear")]
    pub algorithm: String,

    /// Table size
    #[arg(short, long, default_value_t = rgbmap::DEFAULT_HASH_SIZE)]
    pub size: usize,

    /// Curve exponent
    #[arg(short, long, default_value_t = rgbmap::DEFAULT_EXPONENT, allow_hyphen_values = true)]
    pub exponent: f64,

    /// Print every table entry instead of band boundaries
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct CurveArgs {
    /// Contrast scale (1.0 = unchanged)
    #[arg(long, default_value = "1.0")]
    pub scale: f64,

    /// Brightness shift as a fraction of the range
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    pub shift: f64,
}

#[derive(Args)]
pub struct RenderArgs {
    /// Output image (PNG)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Image width
    #[arg(short = 'W', long, default_value = "512")]
    pub width: usize,

    /// Image height
    #[arg(short = 'H', long, default_value = "64")]
    pub height: usize,

    /// Mapper settings (YAML)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Override the distribution algorithm
    #[arg(short, long)]
    pub algorithm: Option<String>,

    /// Channel order of the mapped buffer
    #[arg(long, default_value = "RGB")]
    pub order: String,

    /// Contrast scale
    #[arg(long, default_value = "1.0")]
    pub scale: f64,

    /// Brightness shift
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    pub shift: f64,

    /// Treat indices as 8-bit display values
    #[arg(long)]
    pub pass_through: bool,

    /// Monitor ICC profile applied to multi-channel renders (needs `icc`)
    #[arg(long)]
    pub monitor_profile: Option<PathBuf>,

    /// Render a three-channel source (R ramp, G reversed, B constant)
    #[arg(long)]
    pub rgb_source: bool,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Hash(args) => commands::hash::run(args, cli.verbose),
        Commands::Curve(args) => commands::curve::run(args, cli.verbose),
        Commands::Render(args) => commands::render::run(args, cli.verbose),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render() {
        let cli = Cli::try_parse_from([
            "rgbmap", "-vv", "render", "-o", "x.png", "-W", "8", "--shift", "-0.2",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Render(args) => {
                assert_eq!(args.width, 8);
                assert_eq!(args.height, 64);
                assert_eq!(args.shift, -0.2);
            }
            _ => panic!("expected render"),
        }
    }
}
