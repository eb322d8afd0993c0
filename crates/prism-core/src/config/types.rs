//! Sub-configuration structs with defaults matching the preset pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::{SizeSpec, StepSpec};

/// Options for one pipeline run.
///
/// Everything here is a pipeline-level default that individual steps may
/// override. Steps must target distinct `{name}{suffix}` combinations within
/// one run; colliding steps overwrite each other's files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Output directory, provisioned before the first write
    pub dir: PathBuf,

    /// Default output name for steps that don't set one
    pub name: Option<String>,

    /// Default primary format; `None` derives it from the source
    /// descriptor's trailing extension
    pub format: Option<String>,

    /// Emit a `.webp` sibling for every step (overridable per step)
    pub webp: bool,

    /// Suppress progress reporting
    pub silent: bool,

    /// Extract the dominant color only; produce no files
    pub skip_write: bool,

    /// What to do about dominant color extraction
    pub color: ColorPolicy,

    /// Ordered steps to execute
    pub steps: Vec<StepSpec>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./"),
            name: None,
            format: None,
            webp: false,
            silent: false,
            skip_write: false,
            color: ColorPolicy::default(),
            steps: default_steps(),
        }
    }
}

/// Dominant color extraction policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorPolicy {
    /// Extract; a failure aborts the run
    #[default]
    Required,

    /// Extract; a failure is logged and the color is omitted
    BestEffort,

    /// Don't extract
    Skip,
}

/// The four preset steps: retina and standard renditions at two base sizes.
pub fn default_steps() -> Vec<StepSpec> {
    vec![
        StepSpec::sized("2x BIG Images", SizeSpec::exact(960, 836)).with_suffix("_retina"),
        StepSpec::sized("1x BIG Images", SizeSpec::exact(540, 470)),
        StepSpec::sized("2x SMALL Images", SizeSpec::exact(750, 653)).with_suffix("_small_retina"),
        StepSpec::sized("1x SMALL Images", SizeSpec::exact(375, 326)).with_suffix("_small"),
    ]
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Remote fetch timeout in milliseconds
    pub fetch_timeout_ms: u64,

    /// Decode timeout in milliseconds
    pub decode_timeout_ms: u64,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: 30_000,
            decode_timeout_ms: 5_000,
            max_image_dimension: 10_000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
