//! Core data types for the Prism variant pipeline.
//!
//! These types describe the work (step specifications) and the outcome
//! (artifact report plus extracted dominant color) of a pipeline run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Target size for one step.
///
/// The serde form is an array of `u32` where `0` means "derive from the
/// aspect ratio" (TOML arrays cannot hold nulls): `[]`, `[960]`,
/// `[960, 836]`, `[0, 470]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<u32>", into = "Vec<u32>")]
pub enum SizeSpec {
    /// Pass through at the source's original dimensions.
    Original,
    /// Resize to the given bounds; a missing bound is derived from the
    /// source aspect ratio.
    Bounds {
        width: Option<u32>,
        height: Option<u32>,
    },
}

impl SizeSpec {
    /// Exact target dimensions.
    pub fn exact(width: u32, height: u32) -> Self {
        Self::Bounds {
            width: Some(width),
            height: Some(height),
        }
    }

    /// Fixed width, height derived from the aspect ratio.
    pub fn width(width: u32) -> Self {
        Self::Bounds {
            width: Some(width),
            height: None,
        }
    }

    /// Fixed height, width derived from the aspect ratio.
    pub fn height(height: u32) -> Self {
        Self::Bounds {
            width: None,
            height: Some(height),
        }
    }

    /// No resize.
    pub fn original() -> Self {
        Self::Original
    }

    /// Resolve the target dimensions against the source dimensions.
    ///
    /// Returns `None` when the step should pass the image through unresized.
    pub fn target_for(&self, source_width: u32, source_height: u32) -> Option<(u32, u32)> {
        let derive = |bound: u32, from: u32, against: u32| {
            ((from as f64 * bound as f64 / against as f64).round() as u32).max(1)
        };
        match self {
            Self::Original
            | Self::Bounds {
                width: None,
                height: None,
            } => None,
            Self::Bounds {
                width: Some(w),
                height: Some(h),
            } => Some((*w, *h)),
            Self::Bounds {
                width: Some(w),
                height: None,
            } => Some((*w, derive(*w, source_height, source_width))),
            Self::Bounds {
                width: None,
                height: Some(h),
            } => Some((derive(*h, source_width, source_height), *h)),
        }
    }
}

impl From<Vec<u32>> for SizeSpec {
    fn from(values: Vec<u32>) -> Self {
        let bound = |v: u32| if v == 0 { None } else { Some(v) };
        match values.as_slice() {
            [] => Self::Original,
            [w] => Self::Bounds {
                width: bound(*w),
                height: None,
            },
            [w, h, ..] => Self::Bounds {
                width: bound(*w),
                height: bound(*h),
            },
        }
    }
}

impl From<SizeSpec> for Vec<u32> {
    fn from(size: SizeSpec) -> Self {
        match size {
            SizeSpec::Original => Vec::new(),
            SizeSpec::Bounds { width, height } => {
                vec![width.unwrap_or(0), height.unwrap_or(0)]
            }
        }
    }
}

/// One resize+encode+write unit of work.
///
/// Unset fields fall back to the pipeline-level defaults at execution time
/// (step field → pipeline default → built-in default); the defaults object
/// is never mutated. A step with no resolvable name, or with no `size`
/// field at all, is invalid and fails in isolation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepSpec {
    /// Display name used in progress reporting
    pub label: Option<String>,

    /// Target size; absent means the step is invalid
    pub size: Option<SizeSpec>,

    /// Output name override
    pub name: Option<String>,

    /// Filename suffix (e.g. "_retina"), default empty
    pub suffix: Option<String>,

    /// Primary format override (e.g. "png")
    pub format: Option<String>,

    /// Emit an additional `.webp` sibling; overrides the pipeline flag
    pub webp: Option<bool>,

    /// Subdirectory under the output directory, provisioned lazily
    pub folder: Option<String>,
}

impl StepSpec {
    /// Create a step with a label and a target size.
    pub fn sized(label: impl Into<String>, size: SizeSpec) -> Self {
        Self {
            label: Some(label.into()),
            size: Some(size),
            ..Self::default()
        }
    }

    /// Set the filename suffix.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Set the output name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the primary format.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Set the subdirectory.
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    /// Set the webp sibling flag.
    pub fn with_webp(mut self, webp: bool) -> Self {
        self.webp = Some(webp);
        self
    }

    /// The label shown in progress output and reports.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or("image step")
    }
}

/// The dominant color extracted from the source, in three representations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominantColor {
    /// Red, green, blue in 0–255
    pub rgb: [u8; 3],

    /// Lowercase hex string with leading '#'
    pub hex: String,

    /// Hue/saturation/lightness form
    pub hsl: Hsl,
}

/// HSL representation: integer hue in 0..360, saturation and lightness as
/// percentages rounded to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub hue: u16,
    pub saturation: f32,
    pub lightness: f32,
}

impl DominantColor {
    /// Build all three representations from an RGB triple.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            rgb: [r, g, b],
            hex: format!("#{r:02x}{g:02x}{b:02x}"),
            hsl: rgb_to_hsl(r, g, b),
        }
    }
}

fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) / 2.0;

    let (hue, saturation) = if max == min {
        (0.0, 0.0)
    } else {
        let d = max - min;
        let s = if lightness > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h * 60.0, s)
    };

    let round1 = |v: f64| ((v * 10.0).round() / 10.0) as f32;
    Hsl {
        hue: (hue.round() as u16) % 360,
        saturation: round1(saturation * 100.0),
        lightness: round1(lightness * 100.0),
    }
}

/// The aggregate outcome of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    /// The source descriptor the run was given
    pub source: String,

    /// Primary artifact paths, one per step that ran and wrote its primary
    /// file, in step declaration order
    pub artifacts: Vec<PathBuf>,

    /// Extracted dominant color, unless extraction was skipped (or failed
    /// under the best-effort policy)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant_color: Option<DominantColor>,

    /// Advisory per-step record, in declaration order (empty under
    /// skip-write)
    pub steps: Vec<StepReport>,
}

/// Advisory record for one executed step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    /// The step's display label
    pub label: String,

    /// What happened
    pub outcome: StepOutcome,
}

/// Outcome of one step. Internally tagged: `{"status":"written",...}` or
/// `{"status":"failed",...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StepOutcome {
    Written {
        path: PathBuf,
        #[serde(skip_serializing_if = "Option::is_none")]
        webp: Option<PathBuf>,
    },
    Failed {
        reason: String,
    },
}
