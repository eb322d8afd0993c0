//! CLI command implementations.

pub mod color;
pub mod config;
pub mod process;
pub mod retinify;

use indicatif::{ProgressBar, ProgressStyle};
use prism_core::{DominantColor, PipelineReport, StepOutcome};
use std::time::Duration;

/// Create the progress spinner shown while a run is in flight.
pub(crate) fn create_spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message(message.into());
    pb
}

/// Print a run report: JSON when requested, otherwise a human summary.
pub(crate) fn print_report(report: &PipelineReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    for step in &report.steps {
        match &step.outcome {
            StepOutcome::Written { path, webp } => {
                let sibling = if webp.is_some() { " (+ webp)" } else { "" };
                println!("  + {}{}", path.display(), sibling);
            }
            StepOutcome::Failed { reason } => {
                println!("  ! {}: {}", step.label, reason);
            }
        }
    }
    println!("{} variant(s) written", report.artifacts.len());

    if let Some(color) = &report.dominant_color {
        print_color(color);
    }
    Ok(())
}

/// Print the three representations of a dominant color on one line.
pub(crate) fn print_color(color: &DominantColor) {
    let [r, g, b] = color.rgb;
    println!(
        "Dominant color: {}  rgb({}, {}, {})  hsl({}, {}%, {}%)",
        color.hex, r, g, b, color.hsl.hue, color.hsl.saturation, color.hsl.lightness
    );
}
