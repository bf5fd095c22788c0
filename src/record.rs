//! Growth records: one timestamped measurement of a plant.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::contours::PlantRegion;

/// Mean 8-bit HSV of a pixel population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorSignature {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
}

/// One observation of a plant, keyed by its timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRecord {
    pub timestamp: String,
    pub area_px: f64,
    pub width_px: f64,
    pub height_px: f64,
    pub aspect_ratio: f64,
    pub color: ColorSignature,
    /// Boundary polygon of the selected region as `[x, y]` pairs
    pub contour: Vec<[i32; 2]>,
}

impl GrowthRecord {
    /// Assembles a record from the selected region and the color profile.
    pub fn build(region: &PlantRegion, color: ColorSignature, timestamp: String) -> Self {
        let width_px = f64::from(region.bounding_box.width);
        let height_px = f64::from(region.bounding_box.height);

        Self {
            timestamp,
            area_px: region.area,
            width_px,
            height_px,
            aspect_ratio: aspect_ratio(width_px, height_px),
            color,
            contour: region.contour.iter().map(|p| [p.x, p.y]).collect(),
        }
    }
}

/// `width / height`, or `0` for a zero height.
pub fn aspect_ratio(width: f64, height: f64) -> f64 {
    if height > 0.0 { width / height } else { 0.0 }
}

/// Current local time, ISO-8601 with microseconds and no offset.
pub fn now_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::math::Rect;
    use imageproc::point::Point;

    fn region() -> PlantRegion {
        PlantRegion {
            contour: vec![
                Point::new(10, 10),
                Point::new(49, 10),
                Point::new(49, 39),
                Point::new(10, 39),
            ],
            area: 1131.0,
            bounding_box: Rect {
                x: 10,
                y: 10,
                width: 40,
                height: 30,
            },
        }
    }

    #[test]
    fn build_copies_geometry_and_contour() {
        let color = ColorSignature {
            hue: 60.0,
            saturation: 255.0,
            value: 255.0,
        };
        let record = GrowthRecord::build(&region(), color, "2024-05-01T08:00:00".to_string());
        assert_eq!(record.timestamp, "2024-05-01T08:00:00");
        assert_eq!(record.area_px, 1131.0);
        assert_eq!(record.width_px, 40.0);
        assert_eq!(record.height_px, 30.0);
        assert_eq!(record.aspect_ratio, 40.0 / 30.0);
        assert_eq!(record.color, color);
        assert_eq!(record.contour, vec![[10, 10], [49, 10], [49, 39], [10, 39]]);
    }

    #[test]
    fn aspect_ratio_of_zero_height_is_zero() {
        assert_eq!(aspect_ratio(12.0, 0.0), 0.0);
        assert_eq!(aspect_ratio(12.0, 4.0), 3.0);
    }

    #[test]
    fn default_timestamp_is_iso_8601() {
        let ts = now_timestamp();
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, "%Y-%m-%dT%H:%M:%S%.f").is_ok());
        assert_eq!(ts.len(), "2024-05-01T08:00:00.000000".len());
    }

    #[test]
    fn serialized_field_names() {
        let record = GrowthRecord::build(&region(), ColorSignature::default(), "t0".to_string());
        let json = serde_json::to_value(&record).unwrap();
        for field in [
            "timestamp",
            "area_px",
            "width_px",
            "height_px",
            "aspect_ratio",
            "color",
            "contour",
        ] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
        assert_eq!(json["color"]["saturation"], 0.0);
        assert_eq!(json["contour"][1], serde_json::json!([49, 10]));
    }
}
