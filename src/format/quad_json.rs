//! Quad JSON annotation files.
//!
//! One JSON document per image, next to nothing beyond the quads themselves:
//!
//! ```json
//! {
//!   "version": "1.1.0",
//!   "path": "image1.jpg",
//!   "width": 640,
//!   "height": 480,
//!   "shapes": [
//!     { "label": "plate", "p1x": 10.0, "p1y": 10.0, "p2x": 60.0, "p2y": 10.0,
//!       "p3x": 60.0, "p3y": 60.0, "p4x": 10.0, "p4y": 60.0 }
//!   ]
//! }
//! ```
//!
//! Coordinates are rounded to two decimals on save. An optional `image_data`
//! field can embed the raw image bytes as base64 for self-contained files.

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::format::error::FormatError;
use crate::model::{Point, PointLabel, Shape, ShapeKind};

/// Version written into new documents.
pub const FORMAT_VERSION: &str = "1.1.0";

/// File extension for quad annotation files.
pub const SUFFIX: &str = ".json";

/// One labeled quad, with its four corners flattened into scalar fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadEntry {
    pub label: String,
    pub p1x: f32,
    pub p1y: f32,
    pub p2x: f32,
    pub p2y: f32,
    pub p3x: f32,
    pub p3y: f32,
    pub p4x: f32,
    pub p4y: f32,
}

impl QuadEntry {
    /// Convert a canvas shape into a file entry. The shape must be a labeled
    /// four-point quad.
    pub fn from_shape(shape: &Shape) -> Result<Self, FormatError> {
        if shape.len() != 4 {
            return Err(FormatError::NotAQuad {
                points: shape.len(),
            });
        }
        let label = shape
            .label
            .clone()
            .ok_or_else(|| FormatError::missing_field("label"))?;
        let p = shape.points();
        Ok(Self {
            label,
            p1x: round2(p[0].x),
            p1y: round2(p[0].y),
            p2x: round2(p[1].x),
            p2y: round2(p[1].y),
            p3x: round2(p[2].x),
            p3y: round2(p[2].y),
            p4x: round2(p[3].x),
            p4y: round2(p[3].y),
        })
    }

    /// Rebuild the closed canvas shape for this entry.
    pub fn to_shape(&self) -> Shape {
        let mut shape = Shape::new(ShapeKind::Polygon).with_label(self.label.clone());
        for (x, y) in [
            (self.p1x, self.p1y),
            (self.p2x, self.p2y),
            (self.p3x, self.p3y),
            (self.p4x, self.p4y),
        ] {
            shape.add_point(Point::new(x, y), PointLabel::Positive);
        }
        shape.close();
        shape
    }
}

/// A quad annotation document for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadDocument {
    pub version: String,
    /// Image path, relative to the annotation file.
    pub path: String,
    pub width: u32,
    pub height: u32,
    pub shapes: Vec<QuadEntry>,
    /// Base64-encoded raw image bytes, for self-contained files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
}

impl QuadDocument {
    pub fn new(path: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            path: path.into(),
            width,
            height,
            shapes: Vec::new(),
            image_data: None,
        }
    }

    /// Build a document from canvas shapes. Fails on any shape that is not a
    /// labeled quad.
    pub fn from_shapes(
        path: impl Into<String>,
        width: u32,
        height: u32,
        shapes: &[Shape],
    ) -> Result<Self, FormatError> {
        let mut doc = Self::new(path, width, height);
        doc.shapes = shapes
            .iter()
            .map(QuadEntry::from_shape)
            .collect::<Result<_, _>>()?;
        Ok(doc)
    }

    /// Embed raw image bytes as base64.
    pub fn with_image_data(mut self, bytes: &[u8]) -> Self {
        self.image_data = Some(BASE64.encode(bytes));
        self
    }

    /// Decode the embedded image bytes, if present.
    pub fn decode_image_data(&self) -> Result<Option<Vec<u8>>, FormatError> {
        self.image_data
            .as_deref()
            .map(|data| BASE64.decode(data))
            .transpose()
            .map_err(Into::into)
    }

    /// Canvas shapes for every entry, in file order.
    pub fn to_shapes(&self) -> Vec<Shape> {
        self.shapes.iter().map(QuadEntry::to_shape).collect()
    }
}

/// Write a document as pretty-printed JSON.
pub fn save(path: &Path, document: &QuadDocument) -> Result<(), FormatError> {
    let json = serde_json::to_string_pretty(document)?;
    fs::write(path, json)?;
    log::info!(
        "saved {} shapes to {}",
        document.shapes.len(),
        path.display()
    );
    Ok(())
}

/// Read a document from disk.
pub fn load(path: &Path) -> Result<QuadDocument, FormatError> {
    let data = fs::read_to_string(path)?;
    let document: QuadDocument = serde_json::from_str(&data)?;
    log::info!(
        "loaded {} shapes from {}",
        document.shapes.len(),
        path.display()
    );
    Ok(document)
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(label: &str) -> Shape {
        let mut shape = Shape::new(ShapeKind::Polygon).with_label(label);
        for p in [
            Point::new(10.0, 10.0),
            Point::new(60.0, 10.0),
            Point::new(60.0, 60.0),
            Point::new(10.0, 60.0),
        ] {
            shape.add_point(p, PointLabel::Positive);
        }
        shape.close();
        shape
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("image1.json");

        let doc =
            QuadDocument::from_shapes("image1.jpg", 640, 480, &[quad("plate")]).unwrap();
        save(&file, &doc).unwrap();

        let loaded = load(&file).unwrap();
        assert_eq!(loaded, doc);
        assert_eq!(loaded.version, FORMAT_VERSION);

        let shapes = loaded.to_shapes();
        assert_eq!(shapes.len(), 1);
        assert!(shapes[0].is_closed());
        assert_eq!(shapes[0].len(), 4);
        assert_eq!(shapes[0].label.as_deref(), Some("plate"));
        assert_eq!(shapes[0].point(2), Point::new(60.0, 60.0));
    }

    #[test]
    fn test_coordinates_are_rounded_to_two_decimals() {
        let mut shape = quad("q");
        shape.set_point(0, Point::new(10.12345, 9.9999));
        let entry = QuadEntry::from_shape(&shape).unwrap();
        assert_eq!(entry.p1x, 10.12);
        assert_eq!(entry.p1y, 10.0);
        // Other corners untouched.
        assert_eq!(entry.p2x, 60.0);
    }

    #[test]
    fn test_non_quad_shape_is_rejected() {
        let mut shape = quad("q");
        shape.pop_point();
        let err = QuadEntry::from_shape(&shape).unwrap_err();
        assert!(matches!(err, FormatError::NotAQuad { points: 3 }));
    }

    #[test]
    fn test_unlabeled_shape_is_rejected() {
        let mut shape = quad("q");
        shape.label = None;
        let err = QuadEntry::from_shape(&shape).unwrap_err();
        assert!(matches!(err, FormatError::MissingField { .. }));
    }

    #[test]
    fn test_load_reports_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("broken.json");
        fs::write(&file, "{\"version\": ").unwrap();
        assert!(matches!(load(&file), Err(FormatError::Json(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("nope.json");
        assert!(matches!(load(&file), Err(FormatError::Io(_))));
    }

    #[test]
    fn test_image_data_round_trip() {
        let bytes = b"\x89PNG\r\n\x1a\nfake";
        let doc = QuadDocument::new("a.png", 1, 1).with_image_data(bytes);
        let json = serde_json::to_string(&doc).unwrap();
        let back: QuadDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back.decode_image_data().unwrap().unwrap(), bytes);
    }

    #[test]
    fn test_image_data_field_is_omitted_when_absent() {
        let doc = QuadDocument::new("a.png", 1, 1);
        let json = serde_json::to_string(&doc).unwrap();
        assert!(!json.contains("image_data"));

        let back: QuadDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back.decode_image_data().unwrap(), None);
    }
}
