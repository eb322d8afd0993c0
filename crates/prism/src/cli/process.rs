//! The `prism process` command for deriving variants.

use clap::Args;
use prism_core::{ColorPolicy, Config, ImagePipeline, StepSpec};
use serde::Deserialize;
use std::path::PathBuf;

use super::{create_spinner, print_report};

/// Arguments for the `process` command.
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Source image: local path or URL
    #[arg(required = true)]
    pub source: String,

    /// Output directory
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Default output name for steps that don't set one
    #[arg(short, long)]
    pub name: Option<String>,

    /// Primary output format (defaults to the source extension)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Also emit a .webp sibling for every step
    #[arg(long)]
    pub webp: bool,

    /// TOML file with a [[steps]] list replacing the configured steps
    #[arg(long)]
    pub steps: Option<PathBuf>,

    /// Suppress progress reporting
    #[arg(long)]
    pub silent: bool,

    /// Extract the dominant color only; write no files
    #[arg(long)]
    pub skip_write: bool,

    /// Skip dominant color extraction
    #[arg(long)]
    pub no_color: bool,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Shape of a `--steps` file.
#[derive(Debug, Deserialize)]
struct StepsFile {
    steps: Vec<StepSpec>,
}

/// Execute the process command.
pub async fn execute(args: ProcessArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let config = apply_overrides(config, &args)?;

    let spinner = (!config.pipeline.silent && !args.json)
        .then(|| create_spinner(format!("Processing {}", args.source)));

    let pipeline = ImagePipeline::new(&config);
    let result = pipeline.run(&args.source).await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let report = result?;
    print_report(&report, args.json)
}

/// Merge CLI flags over the loaded configuration.
fn apply_overrides(mut config: Config, args: &ProcessArgs) -> anyhow::Result<Config> {
    config.pipeline.dir = match &args.dir {
        Some(dir) => expand(dir),
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
    if args.skip_write {
        config.pipeline.skip_write = true;
    }
    if args.no_color {
        config.pipeline.color = ColorPolicy::Skip;
    }

    if let Some(path) = &args.steps {
        let content = std::fs::read_to_string(path)?;
        let file: StepsFile = toml::from_str(&content)?;
        anyhow::ensure!(!file.steps.is_empty(), "Steps file {path:?} declares no steps");
        config.pipeline.steps = file.steps;
    }

    Ok(config)
}

/// Expand a leading `~` in a user-supplied path.
fn expand(path: &std::path::Path) -> PathBuf {
    let path_str = path.to_string_lossy().into_owned();
    let expanded = shellexpand::tilde(&path_str);
    PathBuf::from(expanded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::SizeSpec;

    fn args(source: &str) -> ProcessArgs {
        ProcessArgs {
            source: source.to_string(),
            dir: None,
            name: None,
            format: None,
            webp: false,
            steps: None,
            silent: false,
            skip_write: false,
            no_color: false,
            json: false,
        }
    }

    #[test]
    fn test_apply_overrides_flags() {
        let mut a = args("photo.jpg");
        a.dir = Some(PathBuf::from("/tmp/out"));
        a.name = Some("hero".to_string());
        a.webp = true;
        a.no_color = true;

        let config = apply_overrides(Config::default(), &a).unwrap();
        assert_eq!(config.pipeline.dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.pipeline.name.as_deref(), Some("hero"));
        assert!(config.pipeline.webp);
        assert_eq!(config.pipeline.color, ColorPolicy::Skip);
        // Untouched fields keep config values
        assert!(!config.pipeline.skip_write);
        assert_eq!(config.pipeline.steps.len(), 4);
    }

    #[test]
    fn test_apply_overrides_steps_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("steps.toml");
        std::fs::write(
            &path,
            r#"
[[steps]]
label = "banner"
size = [1200, 400]

[[steps]]
label = "thumb"
size = [256]
folder = "thumbs"
"#,
        )
        .unwrap();

        let mut a = args("photo.jpg");
        a.steps = Some(path);
        let config = apply_overrides(Config::default(), &a).unwrap();

        assert_eq!(config.pipeline.steps.len(), 2);
        assert_eq!(
            config.pipeline.steps[0].size,
            Some(SizeSpec::exact(1200, 400))
        );
        assert_eq!(config.pipeline.steps[1].folder.as_deref(), Some("thumbs"));
    }

    #[test]
    fn test_apply_overrides_rejects_empty_steps_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("steps.toml");
        std::fs::write(&path, "steps = []").unwrap();

        let mut a = args("photo.jpg");
        a.steps = Some(path);
        assert!(apply_overrides(Config::default(), &a).is_err());
    }
}
