//! Where rasters come from.

use std::path::Path;

use image::{ImageError, RgbImage};

use crate::error::{AnalysisError, Result};

/// Supplies a decoded RGB raster for a path.
pub trait ImageSource {
    fn load(&self, path: &Path) -> Result<RgbImage>;
}

/// Decodes images from the file system with whatever formats `image` supports.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileImageSource;

impl ImageSource for FileImageSource {
    fn load(&self, path: &Path) -> Result<RgbImage> {
        if !path.is_file() {
            return Err(AnalysisError::image_not_found(path));
        }

        let image = image::open(path).map_err(|e| match e {
            ImageError::IoError(source) => AnalysisError::ImageNotFound {
                path: path.to_path_buf(),
                source: Some(source),
            },
            other => AnalysisError::malformed(format!("cannot decode {}", path.display()), other),
        })?;

        let raster = image.to_rgb8();
        validate(&raster)?;
        Ok(raster)
    }
}

/// Rejects rasters with a zero dimension.
pub fn validate(raster: &RgbImage) -> Result<()> {
    if raster.width() == 0 || raster.height() == 0 {
        return Err(AnalysisError::MalformedInput {
            message: format!("empty raster {}x{}", raster.width(), raster.height()),
            source: None,
        });
    }
    Ok(())
}
