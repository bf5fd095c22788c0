//! Single-image analysis, batch runs and result visualization.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use imageproc::{
    drawing::{draw_hollow_rect_mut, draw_line_segment_mut},
    point::Point,
    rect::Rect,
};

use crate::{
    colors::color_profile,
    config::AnalyzerConfig,
    contours::select_largest_region,
    error::{AnalysisError, ErrorKind, Result},
    preprocess::preprocess,
    record::{GrowthRecord, now_timestamp},
    rect::bounding_rect,
    segmentation::{foreground_count, segment_plant},
    source::{FileImageSource, ImageSource, validate},
    store::GrowthDataStore,
};

const CONTOUR_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const BOX_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
/// Extra passes that widen contour strokes to 2 px in every direction.
const STROKE_OFFSETS: [(f32, f32); 3] = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)];

/// Measures plant photographs and records the results in a [`GrowthDataStore`].
pub struct PlantGrowthAnalyzer<S = FileImageSource> {
    config: AnalyzerConfig,
    source: S,
    store: GrowthDataStore,
}

impl PlantGrowthAnalyzer<FileImageSource> {
    /// Reads images from disk and opens the store at `config.data_path`.
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        Self::with_source(config, FileImageSource)
    }
}

impl<S: ImageSource> PlantGrowthAnalyzer<S> {
    pub fn with_source(config: AnalyzerConfig, source: S) -> Result<Self> {
        let store = GrowthDataStore::open(&config.data_path)?;
        Ok(Self::with_store(config, source, store))
    }

    pub fn with_store(config: AnalyzerConfig, source: S, store: GrowthDataStore) -> Self {
        Self {
            config,
            source,
            store,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn store(&self) -> &GrowthDataStore {
        &self.store
    }

    pub fn into_store(self) -> GrowthDataStore {
        self.store
    }

    /// Loads and analyzes the image at `path`.
    ///
    /// `timestamp` defaults to the current local time. The record is stored unless one already
    /// exists for that timestamp; either way the freshly measured record is returned.
    pub fn analyze(&mut self, path: &Path, timestamp: Option<&str>) -> Result<GrowthRecord> {
        let raster = self.source.load(path)?;
        self.analyze_raster(&raster, timestamp)
    }

    /// Analyzes an already decoded raster.
    pub fn analyze_raster(
        &mut self,
        raster: &RgbImage,
        timestamp: Option<&str>,
    ) -> Result<GrowthRecord> {
        let record = measure(raster, &self.config, timestamp)?;
        self.store.insert(record.clone())?;
        Ok(record)
    }

    /// Analyzes every path in order, isolating failures.
    ///
    /// The outcome of each image is reported in input order.
    pub fn analyze_batch<P: AsRef<Path>>(
        &mut self,
        paths: &[P],
    ) -> Vec<(PathBuf, Result<GrowthRecord>)> {
        paths
            .iter()
            .map(|path| {
                let path = path.as_ref();
                (path.to_path_buf(), self.analyze(path, None))
            })
            .collect()
    }

    /// Analyzes every path in order and returns the successful records, skipping (and logging)
    /// images that fail.
    pub fn analyze_growth<P: AsRef<Path>>(&mut self, paths: &[P]) -> Vec<GrowthRecord> {
        self.analyze_batch(paths)
            .into_iter()
            .filter_map(|(path, outcome)| match outcome {
                Ok(record) => Some(record),
                Err(e) => {
                    match e.kind() {
                        ErrorKind::NoRegionFound => {
                            tracing::warn!(path = %path.display(), "no plant region found, skipping")
                        }
                        ErrorKind::ImageNotFound | ErrorKind::MalformedInput => {
                            tracing::warn!(path = %path.display(), error = %e, "unreadable image, skipping")
                        }
                        ErrorKind::Persistence => {
                            tracing::error!(path = %path.display(), error = %e, "could not store record")
                        }
                    }
                    None
                }
            })
            .collect()
    }

    /// Analyzes the image at `path` and draws the selected contour and its bounding box on a
    /// copy of it, saving to `output` when given.
    pub fn visualize(&mut self, path: &Path, output: Option<&Path>) -> Result<RgbImage> {
        let raster = self.source.load(path)?;
        let record = self.analyze_raster(&raster, None)?;

        let annotated = annotate(&raster, &record);
        if let Some(output) = output {
            annotated
                .save(output)
                .map_err(|e| AnalysisError::malformed(format!("cannot write {}", output.display()), e))?;
            tracing::info!(output = %output.display(), "saved visualization");
        }
        Ok(annotated)
    }
}

/// Runs the full measurement pipeline on `raster` without touching any store.
pub fn measure(
    raster: &RgbImage,
    config: &AnalyzerConfig,
    timestamp: Option<&str>,
) -> Result<GrowthRecord> {
    validate(raster)?;

    // Intensity mask, kept for parity; region selection uses the plant mask only.
    let intensity_mask = preprocess(raster, &config.preprocess);
    tracing::trace!(
        foreground = foreground_count(&intensity_mask),
        "intensity mask"
    );

    let plant_mask = segment_plant(raster, &config.segmentation);
    let region = select_largest_region(&plant_mask)?;
    tracing::debug!(
        area = region.area,
        width = region.bounding_box.width,
        height = region.bounding_box.height,
        "selected plant region"
    );

    let color = color_profile(raster, &plant_mask);
    let timestamp = timestamp.map_or_else(now_timestamp, str::to_string);
    Ok(GrowthRecord::build(&region, color, timestamp))
}

/// Draws the record's contour polygon and bounding box, 2 px wide, onto a copy of `raster`.
pub fn annotate(raster: &RgbImage, record: &GrowthRecord) -> RgbImage {
    let mut canvas = raster.clone();
    let points: Vec<Point<i32>> = record
        .contour
        .iter()
        .map(|&[x, y]| Point::new(x, y))
        .collect();

    for (p1, p2) in points.iter().zip(points.iter().cycle().skip(1)) {
        for (dx, dy) in STROKE_OFFSETS {
            draw_line_segment_mut(
                &mut canvas,
                (p1.x as f32 + dx, p1.y as f32 + dy),
                (p2.x as f32 + dx, p2.y as f32 + dy),
                CONTOUR_COLOR,
            );
        }
    }

    if let Some(aabb) = bounding_rect(&points) {
        let (x, y) = (aabb.x as i32, aabb.y as i32);
        draw_hollow_rect_mut(&mut canvas, Rect::at(x, y).of_size(aabb.width, aabb.height), BOX_COLOR);
        if aabb.width > 2 && aabb.height > 2 {
            let inner = Rect::at(x + 1, y + 1).of_size(aabb.width - 2, aabb.height - 2);
            draw_hollow_rect_mut(&mut canvas, inner, BOX_COLOR);
        }
    }

    canvas
}
