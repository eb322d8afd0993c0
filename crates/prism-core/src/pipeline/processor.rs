//! Pipeline orchestration - wires together source, color, decode, and steps.

use regex::Regex;
use std::sync::{Arc, LazyLock};

use crate::color::{ColorExtractor, MedianCut};
use crate::config::{ColorPolicy, Config, LimitsConfig, PipelineOptions};
use crate::error::{PipelineError, Result};
use crate::types::{DominantColor, PipelineReport, SizeSpec, StepOutcome, StepReport, StepSpec};

use super::decode::ImageDecoder;
use super::provision;
use super::source::SourceResolver;
use super::step::StepExecutor;

/// Trailing `.extension` of a path or URL descriptor.
static EXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(\w+)$").expect("Invalid extension regex"));

/// The main pipeline: decodes a source once and fans the steps out over it.
pub struct ImagePipeline {
    options: PipelineOptions,
    resolver: SourceResolver,
    decoder: ImageDecoder,
    extractor: Arc<dyn ColorExtractor>,
}

impl ImagePipeline {
    /// Create a pipeline from the full configuration.
    pub fn new(config: &Config) -> Self {
        Self::build(config.pipeline.clone(), config.limits.clone())
    }

    /// Create a pipeline from options alone, with default limits.
    pub fn with_options(options: PipelineOptions) -> Self {
        Self::build(options, LimitsConfig::default())
    }

    fn build(options: PipelineOptions, limits: LimitsConfig) -> Self {
        Self {
            resolver: SourceResolver::new(&limits),
            decoder: ImageDecoder::new(limits),
            options,
            extractor: Arc::new(MedianCut::default()),
        }
    }

    /// Substitute the dominant color extraction algorithm.
    pub fn with_extractor(mut self, extractor: Arc<dyn ColorExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// The options this pipeline runs with.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Run the configured steps against a source descriptor.
    pub async fn run(&self, source: &str) -> Result<PipelineReport> {
        self.run_steps(source, &self.options.steps).await
    }

    /// Run exactly two synthesized steps: a `_retina`-suffixed rendition at
    /// double the base size and an unsuffixed one at the base size.
    pub async fn retinify(&self, source: &str, base_size: (u32, u32)) -> Result<PipelineReport> {
        let steps = retinify_steps(base_size);
        self.run_steps(source, &steps).await
    }

    /// Standalone dominant color extraction, bypassing the write path
    /// entirely.
    pub async fn color(&self, source: &str) -> Result<DominantColor> {
        let bytes = self.resolver.resolve(source).await?.into_bytes().await?;
        Ok(self.extract_color(bytes).await?)
    }

    async fn run_steps(&self, source: &str, steps: &[StepSpec]) -> Result<PipelineReport> {
        let opts = &self.options;
        let bytes = self.resolver.resolve(source).await?.into_bytes().await?;
        if !opts.silent {
            tracing::info!(source, bytes = bytes.len(), "source resolved");
        }

        // The dominant color comes from the raw source bytes, before any
        // decode for resizing, so it is available under skip_write too.
        let dominant_color = match opts.color {
            ColorPolicy::Skip => None,
            ColorPolicy::Required => Some(self.extract_color(bytes.clone()).await?),
            ColorPolicy::BestEffort => match self.extract_color(bytes.clone()).await {
                Ok(color) => Some(color),
                Err(e) => {
                    tracing::warn!("dominant color extraction failed: {e}");
                    None
                }
            },
        };

        if opts.skip_write {
            return Ok(PipelineReport {
                source: source.to_string(),
                artifacts: Vec::new(),
                dominant_color,
                steps: Vec::new(),
            });
        }

        let format_token = self.format_token(source)?;
        let state = provision::ensure_dir(&opts.dir).await.map_err(|e| {
            PipelineError::DirectoryUnwritable {
                path: opts.dir.clone(),
                message: e.to_string(),
            }
        })?;
        if !opts.silent {
            tracing::info!(dir = %opts.dir.display(), ?state, "output directory ready");
        }

        let decoded = self.decoder.decode_from_bytes(bytes, source).await?;
        if !opts.silent {
            tracing::info!(
                width = decoded.width,
                height = decoded.height,
                format = ?decoded.format,
                "source decoded"
            );
        }
        let shared = Arc::new(decoded.image);

        // Concurrent fan-out; join_all preserves declaration order. Each
        // step clones the shared image before transforming it.
        let executor = StepExecutor::new(opts, &format_token);
        let outcomes = futures_util::future::join_all(
            steps.iter().map(|step| executor.execute(&shared, step)),
        )
        .await;

        let mut artifacts = Vec::new();
        let mut reports = Vec::with_capacity(steps.len());
        for (step, outcome) in steps.iter().zip(outcomes) {
            let label = step.display_label().to_string();
            match outcome {
                Ok(artifact) => {
                    if !opts.silent {
                        tracing::info!(step = %label, path = %artifact.path.display(), "step written");
                    }
                    artifacts.push(artifact.path.clone());
                    reports.push(StepReport {
                        label,
                        outcome: StepOutcome::Written {
                            path: artifact.path,
                            webp: artifact.webp,
                        },
                    });
                }
                Err(e) => {
                    tracing::warn!(step = %label, "step failed: {e}");
                    reports.push(StepReport {
                        label,
                        outcome: StepOutcome::Failed {
                            reason: e.to_string(),
                        },
                    });
                }
            }
        }

        Ok(PipelineReport {
            source: source.to_string(),
            artifacts,
            dominant_color,
            steps: reports,
        })
    }

    async fn extract_color(&self, bytes: Vec<u8>) -> std::result::Result<DominantColor, PipelineError> {
        let extractor = Arc::clone(&self.extractor);
        let rgb = tokio::task::spawn_blocking(move || extractor.extract(&bytes))
            .await
            .map_err(|e| PipelineError::ColorExtraction {
                message: format!("Task join error: {}", e),
            })??;
        Ok(DominantColor::from_rgb(rgb[0], rgb[1], rgb[2]))
    }

    /// The run's format token: explicit configuration wins, else the source
    /// descriptor's trailing extension.
    fn format_token(&self, source: &str) -> std::result::Result<String, PipelineError> {
        if let Some(format) = self.options.format.as_deref().filter(|f| !f.is_empty()) {
            return Ok(format.to_string());
        }
        EXT_RE
            .captures(source)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| PipelineError::MissingFormat {
                src: source.to_string(),
            })
    }
}

/// The two steps `retinify` synthesizes from a base size.
pub fn retinify_steps((width, height): (u32, u32)) -> Vec<StepSpec> {
    vec![
        StepSpec::sized("2x Image", SizeSpec::exact(width * 2, height * 2)).with_suffix("_retina"),
        StepSpec::sized("1x Image", SizeSpec::exact(width, height)),
    ]
}
