//! Data model for the annotation canvas.

pub mod geometry;
pub mod shape;

pub use geometry::{distance_to_segment, Point, Rect};
pub use shape::{HighlightMode, PointLabel, Shape, ShapeKind};
