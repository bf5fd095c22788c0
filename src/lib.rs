//! Plant growth measurement from time-series photographs.
//!
//! Each photograph is segmented on a green HSV band; the largest external region gives the
//! plant's area and bounding geometry, and the mean HSV over the plant mask gives its color
//! signature. Results are kept in a timestamp-keyed [`GrowthDataStore`] persisted as JSON.
//!
//! ```no_run
//! use plant_growth::{AnalyzerConfig, PlantGrowthAnalyzer};
//! use std::path::Path;
//!
//! let mut analyzer = PlantGrowthAnalyzer::new(AnalyzerConfig::default())?;
//! let record = analyzer.analyze(Path::new("day01.jpg"), None)?;
//! println!("area: {} px², aspect: {:.2}", record.area_px, record.aspect_ratio);
//! # Ok::<(), plant_growth::AnalysisError>(())
//! ```

pub mod analyzer;
pub mod colors;
pub mod config;
pub mod contours;
pub mod error;
pub mod preprocess;
pub mod record;
pub mod rect;
pub mod segmentation;
pub mod source;
pub mod store;

pub use analyzer::{PlantGrowthAnalyzer, measure};
pub use config::AnalyzerConfig;
pub use error::{AnalysisError, ErrorKind, Result};
pub use record::{ColorSignature, GrowthRecord};
pub use store::GrowthDataStore;
