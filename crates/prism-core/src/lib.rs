//! Prism Core - Embeddable image variant pipeline.
//!
//! Prism takes a single source image (local path or URL) and derives a set
//! of resized, re-encoded variants from it - retina and standard renditions,
//! optionally with `.webp` siblings - plus the image's dominant color.
//!
//! # Architecture
//!
//! ```text
//! Source (path | URL) → Resolve → Color → Decode once → Steps (resize → encode → write)
//! ```
//!
//! The source is decoded exactly once and shared read-only across all steps;
//! each step clones before transforming and writes a distinct path, so steps
//! run concurrently. A failing step never aborts its siblings - it is
//! recorded in the report instead.
//!
//! # Usage
//!
//! ```rust,ignore
//! use prism_core::Prism;
//!
//! #[tokio::main]
//! async fn main() -> prism_core::Result<()> {
//!     let prism = Prism::with_defaults()?;
//!     let report = prism.process("./hero.jpg").await?;
//!     println!("{} variants written", report.artifacts.len());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod color;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use color::{ColorExtractor, MedianCut};
pub use config::{default_steps, ColorPolicy, Config, LimitsConfig, PipelineOptions};
pub use error::{ConfigError, PipelineError, PrismError, Result, StepError, StepResult};
pub use pipeline::{retinify_steps, ImagePipeline, StepArtifact};
pub use types::{
    DominantColor, Hsl, PipelineReport, SizeSpec, StepOutcome, StepReport, StepSpec,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prism processor - the main entry point for variant derivation.
pub struct Prism {
    config: Config,
    pipeline: ImagePipeline,
}

impl Prism {
    /// Create a new Prism instance with the given configuration.
    pub fn new(config: Config) -> Self {
        tracing::debug!("Initializing Prism v{}", VERSION);
        let pipeline = ImagePipeline::new(&config);
        Self { config, pipeline }
    }

    /// Create a new Prism instance with configuration from the default
    /// location.
    pub fn with_defaults() -> Result<Self> {
        let config = Config::load()?;
        Ok(Self::new(config))
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Derive the configured variants from a source descriptor.
    pub async fn process(&self, source: &str) -> Result<PipelineReport> {
        self.pipeline.run(source).await
    }

    /// Derive exactly two variants: `2×base_size` suffixed `_retina` and
    /// `base_size` unsuffixed.
    pub async fn retinify(&self, source: &str, base_size: (u32, u32)) -> Result<PipelineReport> {
        self.pipeline.retinify(source, base_size).await
    }

    /// Extract the dominant color without writing anything.
    pub async fn color(&self, source: &str) -> Result<DominantColor> {
        self.pipeline.color(source).await
    }
}

/// Derive variants from a source with the given options.
pub async fn process_image(source: &str, options: PipelineOptions) -> Result<PipelineReport> {
    ImagePipeline::with_options(options).run(source).await
}

/// Derive a retina/standard pair from a source with the given options.
pub async fn retinify(
    source: &str,
    base_size: (u32, u32),
    options: PipelineOptions,
) -> Result<PipelineReport> {
    ImagePipeline::with_options(options)
        .retinify(source, base_size)
        .await
}

/// Extract the dominant color of a source, bypassing the write pipeline.
pub async fn get_color(source: &str, options: PipelineOptions) -> Result<DominantColor> {
    ImagePipeline::with_options(options).color(source).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_prism_new() {
        let prism = Prism::new(Config::default());
        assert_eq!(prism.config().pipeline.steps.len(), 4);
        assert!(!prism.config().pipeline.skip_write);
    }
}
