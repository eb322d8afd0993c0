//! Image variant pipeline components.
//!
//! This module contains all the stages of a pipeline run:
//! - **source**: resolve a path-or-URL descriptor into raw bytes
//! - **provision**: idempotent output directory creation
//! - **decode**: decode the source once, with limits and timeout
//! - **step**: resolve, resize, encode, and write one variant
//! - **processor**: orchestrates the full run

pub mod decode;
pub mod processor;
pub mod provision;
pub mod source;
pub mod step;

// Re-exports for convenient access
pub use decode::{DecodedImage, ImageDecoder};
pub use processor::{retinify_steps, ImagePipeline};
pub use provision::{ensure_dir, DirState};
pub use source::{is_remote, ResolvedSource, SourceResolver};
pub use step::{StepArtifact, StepExecutor};
