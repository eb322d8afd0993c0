//! The `prism retinify` command for retina/standard pairs.

use clap::Args;
use prism_core::{ColorPolicy, Config, ImagePipeline};
use std::path::PathBuf;

use super::{create_spinner, print_report};

/// Arguments for the `retinify` command.
#[derive(Args, Debug)]
pub struct RetinifyArgs {
    /// Source image: local path or URL
    #[arg(required = true)]
    pub source: String,

    /// Base width in pixels; the retina rendition doubles it
    #[arg(short = 'W', long)]
    pub width: u32,

    /// Base height in pixels; the retina rendition doubles it
    #[arg(short = 'H', long)]
    pub height: u32,

    /// Output directory
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Output name for both renditions
    #[arg(short, long)]
    pub name: Option<String>,

    /// Primary output format (defaults to the source extension)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Also emit .webp siblings
    #[arg(long)]
    pub webp: bool,

    /// Suppress progress reporting
    #[arg(long)]
    pub silent: bool,

    /// Skip dominant color extraction
    #[arg(long)]
    pub no_color: bool,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the retinify command.
pub async fn execute(args: RetinifyArgs) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    config.pipeline.dir = match &args.dir {
        Some(dir) => {
            let dir_str = dir.to_string_lossy().into_owned();
            let expanded = shellexpand::tilde(&dir_str);
            PathBuf::from(expanded.into_owned())
        }
        None => config.output_dir(),
    };
    if let Some(name) = &args.name {
        config.pipeline.name = Some(name.clone());
    }
    if let Some(format) = &args.format {
        config.pipeline.format = Some(format.clone());
    }
    if args.webp {
        config.pipeline.webp = true;
    }
    if args.silent {
        config.pipeline.silent = true;
    }
    if args.no_color {
        config.pipeline.color = ColorPolicy::Skip;
    }

    let spinner = (!config.pipeline.silent && !args.json)
        .then(|| create_spinner(format!("Retinifying {}", args.source)));

    let pipeline = ImagePipeline::new(&config);
    let result = pipeline.retinify(&args.source, (args.width, args.height)).await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let report = result?;
    print_report(&report, args.json)
}
