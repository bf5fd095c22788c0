//! Tunable parameters for the analysis pipeline.
//!
//! Defaults reproduce the fixed constants the pipeline was tuned with. A configuration can be
//! round-tripped through JSON for reproducible runs:
//!
//! ```no_run
//! use plant_growth::AnalyzerConfig;
//! use std::path::Path;
//!
//! let config = AnalyzerConfig::from_json_file(Path::new("analyzer.json"))?;
//! # Ok::<(), plant_growth::AnalysisError>(())
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Default location of the persisted growth-data document.
pub const DEFAULT_DATA_PATH: &str = "growth_data.json";

/// Complete analyzer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Growth-data document path
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Real length of the reference object in millimetres.
    /// Accepted for compatibility; measurements stay in pixels.
    #[serde(default = "default_reference_length")]
    pub reference_length_mm: f64,

    #[serde(default)]
    pub preprocess: PreprocessConfig,

    #[serde(default)]
    pub segmentation: SegmentationConfig,
}

/// Intensity-threshold preprocessing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Smoothing kernel size (odd)
    pub blur_kernel_size: u32,
    pub morphology: MorphologyConfig,
}

/// Green-band segmentation parameters, on the 8-bit HSV scale (hue 0..180).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// Inclusive lower bound `[h, s, v]`
    pub lower: [u8; 3],
    /// Inclusive upper bound `[h, s, v]`
    pub upper: [u8; 3],
    pub morphology: MorphologyConfig,
}

/// Opening/closing cleanup with a square kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphologyConfig {
    /// Side of the square structuring element (odd)
    pub kernel_size: u32,
    pub open_iterations: u32,
    pub close_iterations: u32,
}

impl MorphologyConfig {
    /// Chebyshev radius equivalent to `iterations` passes of the square kernel.
    pub fn radius(&self, iterations: u32) -> u8 {
        let radius = (self.kernel_size / 2).saturating_mul(iterations);
        u8::try_from(radius).unwrap_or(u8::MAX)
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_PATH)
}

fn default_reference_length() -> f64 {
    50.0
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            reference_length_mm: default_reference_length(),
            preprocess: PreprocessConfig::default(),
            segmentation: SegmentationConfig::default(),
        }
    }
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            blur_kernel_size: 5,
            morphology: MorphologyConfig {
                kernel_size: 5,
                open_iterations: 2,
                close_iterations: 2,
            },
        }
    }
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            lower: [25, 40, 40],
            upper: [85, 255, 255],
            morphology: MorphologyConfig {
                kernel_size: 5,
                open_iterations: 1,
                close_iterations: 2,
            },
        }
    }
}

impl SegmentationConfig {
    /// Whether an 8-bit HSV triple falls inside the inclusive band.
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        hsv.iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .all(|(v, (lo, hi))| lo <= v && v <= hi)
    }
}

impl AnalyzerConfig {
    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| AnalysisError::json(path, e))
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| AnalysisError::json(path, e))?;
        std::fs::write(path, json).map_err(|e| AnalysisError::io(path, e))
    }
}
