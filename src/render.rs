//! Shape rendering against an abstract drawing surface.
//!
//! The canvas stays backend-agnostic: it translates shapes into a handful of
//! device-space primitives and hands them to a [`DrawSurface`] implemented by
//! the host (a GPU pass, a software rasterizer, an SVG writer in tests).

use crate::model::{Point, PointLabel, Shape, ShapeKind};
use crate::style::{Color, ShapeStyle, VertexShape};
use crate::transform::CanvasTransform;

/// Device-space drawing primitives a rendering backend must provide.
pub trait DrawSurface {
    fn line(&mut self, from: Point, to: Point, color: Color, width: f32);

    /// A closed path. `fill` of `None` means stroke only.
    fn polygon(&mut self, points: &[Point], stroke: Color, width: f32, fill: Option<Color>);

    fn circle(&mut self, center: Point, radius: f32, stroke: Color, width: f32, fill: Option<Color>);

    /// A vertex marker centered on `center`.
    fn vertex(&mut self, center: Point, radius: f32, shape: VertexShape, color: Color);
}

/// Draw one shape in device coordinates. `fill` requests the interior wash
/// used for selected and hovered shapes.
pub fn render_shape(
    shape: &Shape,
    fill: bool,
    style: &ShapeStyle,
    transform: &CanvasTransform,
    surface: &mut dyn DrawSurface,
) {
    if shape.is_empty() {
        return;
    }
    let points: Vec<Point> = shape
        .points()
        .iter()
        .map(|&p| transform.to_device(p))
        .collect();

    let stroke = if shape.selected {
        style.select_line_color
    } else {
        style.line_color
    };
    let wash = if shape.selected {
        style.select_fill_color
    } else {
        style.fill_color
    };
    let fill_color = (fill || shape.fill).then_some(wash);
    let width = style.pen_width;

    match shape.kind {
        ShapeKind::Polygon => {
            if shape.is_closed() && points.len() >= 3 {
                surface.polygon(&points, stroke, width, fill_color);
            } else {
                for pair in points.windows(2) {
                    surface.line(pair[0], pair[1], stroke, width);
                }
            }
        }
        ShapeKind::Rectangle => {
            if let [a, c] = points[..] {
                let corners = [a, Point::new(c.x, a.y), c, Point::new(a.x, c.y)];
                surface.polygon(&corners, stroke, width, fill_color);
            }
        }
        ShapeKind::Circle => {
            if let [center, rim] = points[..] {
                surface.circle(center, center.distance_to(&rim), stroke, width, fill_color);
            }
        }
        ShapeKind::Line => {
            if let [a, b] = points[..] {
                surface.line(a, b, stroke, width);
            }
        }
        ShapeKind::Point | ShapeKind::Points => {}
    }

    for (index, &device) in points.iter().enumerate() {
        let (factor, vertex_shape) = match shape.highlighted_vertex() {
            Some((i, mode)) if i == index => ShapeStyle::highlight_settings(mode),
            _ => (1.0, VertexShape::Round),
        };
        let color = if shape.point_labels().get(index) == Some(&PointLabel::Negative) {
            style.negative_vertex_color
        } else if shape.highlighted_vertex().map(|(i, _)| i) == Some(index) {
            style.highlight_vertex_fill_color
        } else {
            style.vertex_fill_color
        };
        surface.vertex(device, style.point_size / 2.0 * factor, vertex_shape, color);
    }
}
