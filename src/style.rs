//! Rendering style for shapes.
//!
//! Style is an explicit value passed into rendering calls, never shared
//! mutable state: given the same (shape, style, transform) a render call
//! always produces the same output.

use serde::{Deserialize, Serialize};

use crate::model::HighlightMode;

/// An RGBA color with components in 0-1.
pub type Color = [f32; 4];

/// Marker glyph used for a vertex handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexShape {
    Round,
    Square,
}

/// Colors and sizes used to draw a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub line_color: Color,
    pub fill_color: Color,
    pub select_line_color: Color,
    pub select_fill_color: Color,
    pub vertex_fill_color: Color,
    /// Vertex fill while any vertex of the shape is highlighted.
    pub highlight_vertex_fill_color: Color,
    /// Color for negative point-label vertices.
    pub negative_vertex_color: Color,
    /// Vertex handle diameter in device pixels.
    pub point_size: f32,
    /// Outline width in device pixels.
    pub pen_width: f32,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            line_color: [0.0, 1.0, 0.0, 0.5],
            fill_color: [0.0, 1.0, 0.0, 0.25],
            select_line_color: [1.0, 1.0, 1.0, 1.0],
            select_fill_color: [0.0, 1.0, 0.0, 0.6],
            vertex_fill_color: [0.0, 1.0, 0.0, 1.0],
            highlight_vertex_fill_color: [1.0, 1.0, 1.0, 1.0],
            negative_vertex_color: [1.0, 0.0, 0.0, 1.0],
            point_size: 8.0,
            pen_width: 2.0,
        }
    }
}

impl ShapeStyle {
    /// Size multiplier and glyph for a highlighted vertex. A near-vertex
    /// highlight (snap target) is drawn much larger than a move target.
    pub fn highlight_settings(mode: HighlightMode) -> (f32, VertexShape) {
        match mode {
            HighlightMode::NearVertex => (4.0, VertexShape::Round),
            HighlightMode::MoveVertex => (1.5, VertexShape::Square),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_settings() {
        let (near_scale, near_shape) = ShapeStyle::highlight_settings(HighlightMode::NearVertex);
        assert_eq!(near_scale, 4.0);
        assert_eq!(near_shape, VertexShape::Round);

        let (move_scale, move_shape) = ShapeStyle::highlight_settings(HighlightMode::MoveVertex);
        assert_eq!(move_scale, 1.5);
        assert_eq!(move_shape, VertexShape::Square);
    }
}
