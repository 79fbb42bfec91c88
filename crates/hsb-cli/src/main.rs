//! hsb - hue/saturation/brightness adjustment from the command line
//!
//! Loads an image, runs the two-stage adjustment pipeline once or in a
//! simulated display loop, and writes PNG output.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use hsb_compute::Backend;
use hsb_core::Origin;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

#[derive(Parser)]
#[command(name = "hsb")]
#[command(author, version, about = "Hue/saturation/brightness image adjustment")]
#[command(long_about = "
Applies saturation and brightness, then a hue rotation, to an image.

Examples:
  hsb info photo.png                          # Show image info
  hsb backends                                # List compute backends
  hsb adjust photo.png -o out.png --hue 1.2 --saturation 1.5
  hsb adjust photo.jpg -o out.png --brightness -0.2 --backend wgpu
  hsb play photo.png --frames 240 --fps 60 --skip-every 7 -o last.png
  hsb -vv play photo.png --config render.yaml --reset-at 120
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Display image information
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// List compute backends
    Backends,

    /// Adjust an image once and save it
    #[command(visible_alias = "a")]
    Adjust(AdjustArgs),

    /// Run the render loop over a headless surface
    Play(PlayArgs),
}

/// Row order of the source asset.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OriginArg {
    /// Row 0 is the top
    TopLeft,
    /// Row 0 is the bottom
    BottomLeft,
}

impl From<OriginArg> for Origin {
    fn from(value: OriginArg) -> Self {
        match value {
            OriginArg::TopLeft => Origin::TopLeft,
            OriginArg::BottomLeft => Origin::BottomLeft,
        }
    }
}

#[derive(Args)]
struct InfoArgs {
    /// Input image(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Declared origin of the asset
    #[arg(long, value_enum, default_value = "bottom-left")]
    origin: OriginArg,
}

#[derive(Args)]
struct AdjustArgs {
    /// Input image (PNG or JPEG)
    input: PathBuf,

    /// Output PNG
    #[arg(short, long)]
    output: PathBuf,

    /// Hue rotation in radians
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    hue: f32,

    /// Saturation multiplier
    #[arg(short, long, default_value_t = 1.0, allow_negative_numbers = true)]
    saturation: f32,

    /// Brightness offset
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    brightness: f32,

    /// Compute backend (auto, cpu, wgpu)
    #[arg(long, default_value = "cpu")]
    backend: Backend,

    /// Declared origin of the asset
    #[arg(long, value_enum, default_value = "bottom-left")]
    origin: OriginArg,
}

#[derive(Args)]
struct PlayArgs {
    /// Input image (PNG or JPEG)
    input: PathBuf,

    /// Ticks to run
    #[arg(short = 'n', long, default_value = "120")]
    frames: u64,

    /// Tick rate (overrides config)
    #[arg(long)]
    fps: Option<u32>,

    /// YAML render config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Compute backend (overrides config)
    #[arg(long)]
    backend: Option<Backend>,

    /// Withhold the drawable every K ticks (0 = never)
    #[arg(long, default_value = "0")]
    skip_every: u32,

    /// Stop the slider sweep and reset parameters at this tick
    #[arg(long)]
    reset_at: Option<u64>,

    /// Run ticks back to back instead of at the frame rate
    #[arg(long)]
    unpaced: bool,

    /// Save the last presented frame as PNG
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
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

    let verbose = cli.verbose > 0;
    match cli.command {
        Commands::Info(args) => commands::info::run(args, verbose),
        Commands::Backends => commands::backends::run(verbose),
        Commands::Adjust(args) => commands::adjust::run(args, verbose),
        Commands::Play(args) => commands::play::run(args, verbose),
    }
}
