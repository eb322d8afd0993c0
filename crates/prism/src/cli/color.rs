//! The `prism color` command for standalone dominant color extraction.

use clap::Args;
use prism_core::{Config, ImagePipeline};

use super::{create_spinner, print_color};

/// Arguments for the `color` command.
#[derive(Args, Debug)]
pub struct ColorArgs {
    /// Source image: local path or URL
    #[arg(required = true)]
    pub source: String,

    /// Print the color as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the color command.
pub async fn execute(args: ColorArgs) -> anyhow::Result<()> {
    let config = Config::load()?;

    let spinner =
        (!args.json).then(|| create_spinner(format!("Extracting color from {}", args.source)));

    let pipeline = ImagePipeline::new(&config);
    let result = pipeline.color(&args.source).await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let color = result?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&color)?);
    } else {
        print_color(&color);
    }
    Ok(())
}
