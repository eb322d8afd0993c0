//! Error types for the Prism variant pipeline.
//!
//! Errors are split by blast radius: `PipelineError` is fatal to a run and
//! propagates to the caller, `StepError` is scoped to a single step and is
//! recorded in the report instead of raised.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Prism operations.
#[derive(Error, Debug)]
pub enum PrismError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Run-fatal pipeline errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors that abort the whole run.
///
/// Anything a single step can survive lives in [`StepError`] instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Source bytes could not be obtained (fetch or read failure)
    #[error("Source unavailable: {src}: {message}")]
    SourceUnavailable { src: String, message: String },

    /// Image decoding failed
    #[error("Decode error for {src}: {message}")]
    Decode { src: String, message: String },

    /// Decoding exceeded the configured time budget
    #[error("Decode timed out for {src} after {timeout_ms}ms")]
    DecodeTimeout { src: String, timeout_ms: u64 },

    /// Image dimensions exceed the configured limit
    #[error("Image too large: {src} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        src: String,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Output directory could not be created
    #[error("Directory unwritable: {path}: {message}")]
    DirectoryUnwritable { path: PathBuf, message: String },

    /// No output format configured and none derivable from the source
    #[error("No output format: none configured and no extension on '{src}'")]
    MissingFormat { src: String },

    /// Dominant color extraction failed
    #[error("Color extraction failed: {message}")]
    ColorExtraction { message: String },
}

/// Errors isolated to a single step.
///
/// A failed step contributes no artifact but never aborts its siblings;
/// the orchestrator records these in the report.
#[derive(Error, Debug)]
pub enum StepError {
    /// The step could not resolve a usable name or size
    #[error("Invalid step '{label}': {message}")]
    InvalidStep { label: String, message: String },

    /// The step's subfolder could not be created
    #[error("Directory unwritable: {path}: {message}")]
    DirectoryUnwritable { path: PathBuf, message: String },

    /// Resize, encode, or write failed
    #[error("Encode/write failed for {path}: {message}")]
    EncodeOrWrite { path: PathBuf, message: String },
}

/// Convenience type alias for Prism results.
pub type Result<T> = std::result::Result<T, PrismError>;

/// Convenience type alias for step-scoped results.
pub type StepResult<T> = std::result::Result<T, StepError>;
