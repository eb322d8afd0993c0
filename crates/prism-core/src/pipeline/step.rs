//! Step execution: resolve overrides, resize, encode, write.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::PipelineOptions;
use crate::error::{StepError, StepResult};
use crate::types::{SizeSpec, StepSpec};

use super::provision;

/// Built-in format fallback when neither the step nor the pipeline sets one.
const DEFAULT_FORMAT: &str = "jpg";

/// Fixed secondary format for sibling output.
const SECONDARY_FORMAT: &str = "webp";

/// Executes individual steps against the shared decoded source.
///
/// Holds the pipeline-level defaults; each step's effective values are
/// resolved per execution (step field → pipeline default → built-in
/// default) without mutating anything shared.
pub struct StepExecutor {
    dir: PathBuf,
    default_name: Option<String>,
    format: String,
    webp: bool,
}

/// The files one successful step produced.
#[derive(Debug, Clone)]
pub struct StepArtifact {
    /// Primary output path
    pub path: PathBuf,
    /// Secondary sibling path, when enabled
    pub webp: Option<PathBuf>,
}

/// A step's effective values after override resolution.
#[derive(Debug)]
struct ResolvedStep {
    name: String,
    suffix: String,
    format: String,
    webp: bool,
    dir: PathBuf,
    size: SizeSpec,
}

impl StepExecutor {
    /// Create an executor from pipeline options and the run's format token.
    pub fn new(options: &PipelineOptions, format_token: &str) -> Self {
        Self {
            dir: options.dir.clone(),
            default_name: options.name.clone(),
            format: if format_token.is_empty() {
                DEFAULT_FORMAT.to_string()
            } else {
                format_token.to_string()
            },
            webp: options.webp,
        }
    }

    /// Execute one step against the shared decoded image.
    ///
    /// The shared handle is never transformed; the step clones it before
    /// resizing. Failures are scoped to this step.
    pub async fn execute(
        &self,
        shared: &Arc<DynamicImage>,
        step: &StepSpec,
    ) -> StepResult<StepArtifact> {
        let resolved = self.resolve(step)?;

        // Lazy subfolder provisioning, scoped to this step on failure
        if step.folder.is_some() {
            provision::ensure_dir(&resolved.dir).await.map_err(|e| {
                StepError::DirectoryUnwritable {
                    path: resolved.dir.clone(),
                    message: e.to_string(),
                }
            })?;
        }

        let primary_path = resolved.dir.join(format!(
            "{}{}.{}",
            resolved.name, resolved.suffix, resolved.format
        ));
        let sibling_path = resolved
            .webp
            .then(|| {
                resolved.dir.join(format!(
                    "{}{}.{}",
                    resolved.name, resolved.suffix, SECONDARY_FORMAT
                ))
            });

        // Resize and encode off the async runtime
        let image = Arc::clone(shared);
        let size = resolved.size.clone();
        let format = resolved.format.clone();
        let encode_sibling = resolved.webp;
        let (primary, sibling) = tokio::task::spawn_blocking(move || {
            let (width, height) = image.dimensions();
            let variant = match size.target_for(width, height) {
                Some((w, h)) => image.resize_exact(w, h, image::imageops::FilterType::Lanczos3),
                None => (*image).clone(),
            };
            let primary = encode(&variant, &format);
            let sibling = encode_sibling.then(|| encode(&variant, SECONDARY_FORMAT));
            (primary, sibling)
        })
        .await
        .map_err(|e| StepError::EncodeOrWrite {
            path: primary_path.clone(),
            message: format!("Task join error: {}", e),
        })?;

        let primary = primary.map_err(|message| StepError::EncodeOrWrite {
            path: primary_path.clone(),
            message,
        })?;
        tokio::fs::write(&primary_path, primary)
            .await
            .map_err(|e| StepError::EncodeOrWrite {
                path: primary_path.clone(),
                message: e.to_string(),
            })?;

        // A sibling failure leaves the primary file in place but still fails
        // the step for reporting.
        let mut written_sibling = None;
        if let (Some(path), Some(result)) = (sibling_path, sibling) {
            let bytes = result.map_err(|message| StepError::EncodeOrWrite {
                path: path.clone(),
                message,
            })?;
            tokio::fs::write(&path, bytes)
                .await
                .map_err(|e| StepError::EncodeOrWrite {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
            written_sibling = Some(path);
        }

        Ok(StepArtifact {
            path: primary_path,
            webp: written_sibling,
        })
    }

    /// Three-tier override resolution into an owned value set.
    fn resolve(&self, step: &StepSpec) -> StepResult<ResolvedStep> {
        let label = step.display_label();
        let invalid = |message: &str| StepError::InvalidStep {
            label: label.to_string(),
            message: message.to_string(),
        };

        let name = step
            .name
            .clone()
            .or_else(|| self.default_name.clone())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| invalid("no resolvable output name"))?;
        let size = step
            .size
            .clone()
            .ok_or_else(|| invalid("no size specification"))?;
        let format = step
            .format
            .clone()
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| self.format.clone());
        let dir = match &step.folder {
            Some(folder) => self.dir.join(folder),
            None => self.dir.clone(),
        };

        Ok(ResolvedStep {
            name,
            suffix: step.suffix.clone().unwrap_or_default(),
            format,
            webp: step.webp.unwrap_or(self.webp),
            dir,
            size,
        })
    }
}

/// Encode a variant at the given format token.
///
/// JPEG has no alpha channel, so RGBA sources are flattened first.
pub fn encode(image: &DynamicImage, format: &str) -> Result<Vec<u8>, String> {
    let target = ImageFormat::from_extension(format)
        .ok_or_else(|| format!("unsupported output format '{format}'"))?;

    let flattened;
    let source = if target == ImageFormat::Jpeg && image.color().has_alpha() {
        flattened = DynamicImage::ImageRgb8(image.to_rgb8());
        &flattened
    } else {
        image
    };

    let mut buffer = Cursor::new(Vec::new());
    source
        .write_to(&mut buffer, target)
        .map_err(|e| e.to_string())?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options_with(name: Option<&str>, webp: bool) -> PipelineOptions {
        PipelineOptions {
            name: name.map(String::from),
            webp,
            ..PipelineOptions::default()
        }
    }

    fn shared(width: u32, height: u32) -> Arc<DynamicImage> {
        Arc::new(DynamicImage::new_rgb8(width, height))
    }

    #[test]
    fn test_resolve_step_fields_win() {
        let executor = StepExecutor::new(&options_with(Some("fallback"), false), "jpg");
        let step = StepSpec::sized("step", SizeSpec::exact(10, 10))
            .with_name("override")
            .with_format("png")
            .with_webp(true);

        let resolved = executor.resolve(&step).unwrap();
        assert_eq!(resolved.name, "override");
        assert_eq!(resolved.format, "png");
        assert!(resolved.webp);
    }

    #[test]
    fn test_resolve_falls_back_to_pipeline_defaults() {
        let executor = StepExecutor::new(&options_with(Some("fallback"), true), "png");
        let step = StepSpec::sized("step", SizeSpec::exact(10, 10));

        let resolved = executor.resolve(&step).unwrap();
        assert_eq!(resolved.name, "fallback");
        assert_eq!(resolved.format, "png");
        assert!(resolved.webp);
        assert_eq!(resolved.suffix, "");
    }

    #[test]
    fn test_resolve_builtin_format_fallback() {
        let executor = StepExecutor::new(&options_with(Some("img"), false), "");
        let step = StepSpec::sized("step", SizeSpec::exact(10, 10));
        assert_eq!(executor.resolve(&step).unwrap().format, "jpg");
    }

    #[test]
    fn test_resolve_rejects_missing_name() {
        let executor = StepExecutor::new(&options_with(None, false), "jpg");
        let step = StepSpec::sized("unnamed", SizeSpec::exact(10, 10));
        assert!(matches!(
            executor.resolve(&step),
            Err(StepError::InvalidStep { .. })
        ));
    }

    #[test]
    fn test_resolve_rejects_missing_size() {
        let executor = StepExecutor::new(&options_with(Some("img"), false), "jpg");
        let step = StepSpec {
            label: Some("sizeless".to_string()),
            ..StepSpec::default()
        };
        let err = executor.resolve(&step).unwrap_err();
        assert!(err.to_string().contains("size"));
    }

    #[test]
    fn test_resolve_folder_nests_under_dir() {
        let mut options = options_with(Some("img"), false);
        options.dir = PathBuf::from("/out");
        let executor = StepExecutor::new(&options, "jpg");
        let step = StepSpec::sized("step", SizeSpec::exact(10, 10)).with_folder("thumbs");
        assert_eq!(executor.resolve(&step).unwrap().dir, PathBuf::from("/out/thumbs"));
    }

    #[test]
    fn test_encode_jpeg_flattens_alpha() {
        let rgba = DynamicImage::new_rgba8(8, 8);
        let bytes = encode(&rgba, "jpg").unwrap();
        // JPEG SOI marker
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_webp() {
        let img = DynamicImage::new_rgb8(8, 8);
        let bytes = encode(&img, "webp").unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
    }

    #[test]
    fn test_encode_rejects_unknown_format() {
        let img = DynamicImage::new_rgb8(8, 8);
        assert!(encode(&img, "not-a-format").is_err());
    }

    #[tokio::test]
    async fn test_execute_writes_primary() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = options_with(Some("photo"), false);
        options.dir = dir.path().to_path_buf();
        let executor = StepExecutor::new(&options, "png");

        let step = StepSpec::sized("step", SizeSpec::exact(20, 10)).with_suffix("_v");
        let artifact = executor.execute(&shared(40, 20), &step).await.unwrap();

        assert_eq!(artifact.path, dir.path().join("photo_v.png"));
        assert!(artifact.path.is_file());
        assert!(artifact.webp.is_none());
    }

    #[tokio::test]
    async fn test_execute_writes_webp_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = options_with(Some("photo"), true);
        options.dir = dir.path().to_path_buf();
        let executor = StepExecutor::new(&options, "jpg");

        let step = StepSpec::sized("step", SizeSpec::exact(16, 16));
        let artifact = executor.execute(&shared(32, 32), &step).await.unwrap();

        assert!(artifact.path.is_file());
        let sibling = artifact.webp.expect("webp sibling expected");
        assert_eq!(sibling, dir.path().join("photo.webp"));
        assert!(sibling.is_file());
    }

    #[tokio::test]
    async fn test_execute_provisions_subfolder() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = options_with(Some("photo"), false);
        options.dir = dir.path().to_path_buf();
        let executor = StepExecutor::new(&options, "png");

        let step = StepSpec::sized("step", SizeSpec::exact(8, 8)).with_folder("thumbs");
        let artifact = executor.execute(&shared(16, 16), &step).await.unwrap();

        assert_eq!(artifact.path, dir.path().join("thumbs/photo.png"));
        assert!(artifact.path.is_file());
    }

    #[tokio::test]
    async fn test_execute_leaves_shared_image_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = options_with(Some("photo"), false);
        options.dir = dir.path().to_path_buf();
        let executor = StepExecutor::new(&options, "png");

        let image = shared(64, 48);
        let step = StepSpec::sized("step", SizeSpec::exact(8, 8));
        executor.execute(&image, &step).await.unwrap();

        assert_eq!(image.dimensions(), (64, 48));
    }
}
