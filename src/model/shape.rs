//! Shape model: one polygonal (or point-set) annotation entity.
//!
//! A shape owns its geometry as a value: cloning a shape yields a fully
//! independent copy, which is what the canvas relies on for undo snapshots
//! and copy/paste shadows. Shapes know nothing about input devices or
//! application state; the canvas drives all mutation.
//!
//! Mutations that would break an invariant (removing below the minimum point
//! count, popping from an empty shape) are refused with a logged warning
//! rather than an error: these calls originate in interactive event handlers
//! where failing loudly would destabilize the session.

use crate::model::geometry::{distance_to_segment, Point, Rect};

/// Per-vertex label used by point-set shape kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointLabel {
    /// A negative/background vertex.
    Negative,
    /// A normal vertex.
    #[default]
    Positive,
}

/// How a highlighted vertex should be emphasized when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightMode {
    /// The vertex is the current drag target.
    MoveVertex,
    /// The pointer is near the vertex (e.g. snapping to close a polygon).
    NearVertex,
}

/// The geometric kind of a shape.
///
/// This deployment persists only 4-point polygons ("quads"), but the geometry
/// queries are dispatched per kind so the other kinds behave correctly when
/// they appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeKind {
    #[default]
    Polygon,
    Rectangle,
    Circle,
    Line,
    Point,
    /// A set of labeled points (positive/negative markers).
    Points,
}

impl ShapeKind {
    /// Get the display name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Polygon => "polygon",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Line => "line",
            ShapeKind::Point => "point",
            ShapeKind::Points => "points",
        }
    }

    /// Minimum number of points a shape of this kind may keep.
    pub fn min_points(&self) -> usize {
        match self {
            ShapeKind::Polygon => 3,
            ShapeKind::Rectangle | ShapeKind::Circle | ShapeKind::Line => 2,
            ShapeKind::Point | ShapeKind::Points => 1,
        }
    }
}

/// A single annotation shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    /// Geometric kind; selects the containment/bounds behavior.
    pub kind: ShapeKind,
    /// Semantic class label; unset while the shape is being drawn.
    pub label: Option<String>,
    /// Whether this shape is part of the active selection.
    pub selected: bool,
    /// Whether the interior should be filled when rendered.
    pub fill: bool,
    points: Vec<Point>,
    point_labels: Vec<PointLabel>,
    closed: bool,
    highlight: Option<(usize, HighlightMode)>,
}

impl Shape {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn point_labels(&self) -> &[PointLabel] {
        &self.point_labels
    }

    /// Get the point at `index`. Panics on out-of-range access: indices come
    /// from this shape's own queries, so a bad index is a caller bug.
    pub fn point(&self, index: usize) -> Point {
        self.points[index]
    }

    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Overwrite the point at `index` in place.
    pub fn set_point(&mut self, index: usize, point: Point) {
        self.points[index] = point;
    }

    /// Replace the whole point sequence. Lengths must match.
    pub(crate) fn set_points(&mut self, points: Vec<Point>, labels: Vec<PointLabel>) {
        assert_eq!(points.len(), labels.len());
        self.points = points;
        self.point_labels = labels;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Mark the boundary as closed. Does not validate the point count;
    /// callers only close shapes with enough points to be meaningful.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn set_open(&mut self) {
        self.closed = false;
    }

    /// Append a point, or close the shape if `point` equals the first point.
    ///
    /// The equality closure is exact on purpose: the canvas snaps the pointer
    /// to the stored first point before calling this, so a click near the
    /// start arrives here bit-identical to `points[0]`.
    pub fn add_point(&mut self, point: Point, label: PointLabel) {
        if !self.points.is_empty() && point == self.points[0] {
            self.close();
        } else {
            self.points.push(point);
            self.point_labels.push(label);
        }
        debug_assert_eq!(self.points.len(), self.point_labels.len());
    }

    /// Remove and return the last point, or `None` if the shape is empty.
    pub fn pop_point(&mut self) -> Option<Point> {
        let point = self.points.pop();
        if point.is_some() {
            self.point_labels.pop();
        }
        point
    }

    /// Insert a point before `index` (used for "add point on edge").
    pub fn insert_point(&mut self, index: usize, point: Point, label: PointLabel) {
        if index > self.points.len() {
            log::warn!(
                "cannot insert point at {} into shape with {} points",
                index,
                self.points.len()
            );
            return;
        }
        self.points.insert(index, point);
        self.point_labels.insert(index, label);
    }

    /// Remove the point at `index`, refusing to drop below the kind's
    /// minimum point count.
    pub fn remove_point(&mut self, index: usize) {
        if self.points.len() <= self.kind.min_points() {
            log::warn!(
                "cannot remove point from {} shape: len(points)={}",
                self.kind.name(),
                self.points.len()
            );
            return;
        }
        if index >= self.points.len() {
            log::warn!(
                "cannot remove point {} from shape with {} points",
                index,
                self.points.len()
            );
            return;
        }
        self.points.remove(index);
        self.point_labels.remove(index);
    }

    /// Index of the closest vertex within `epsilon` device pixels of `point`,
    /// with both sides scaled by the current zoom factor. Strictly closer
    /// wins; ties keep the first vertex found.
    pub fn nearest_vertex(&self, point: Point, epsilon: f32, scale: f32) -> Option<usize> {
        let target = point * scale;
        let mut min_distance = f32::INFINITY;
        let mut min_index = None;
        for (i, p) in self.points.iter().enumerate() {
            let dist = (*p * scale).distance_to(&target);
            if dist <= epsilon && dist < min_distance {
                min_distance = dist;
                min_index = Some(i);
            }
        }
        min_index
    }

    /// Index of the closest edge within `epsilon` device pixels of `point`.
    /// Edge `i` runs from vertex `i - 1` to vertex `i`, wrapping from the
    /// last vertex back to the first, so the returned index is where a new
    /// point would be inserted onto that edge.
    pub fn nearest_edge(&self, point: Point, epsilon: f32, scale: f32) -> Option<usize> {
        if self.points.len() < 2 {
            return None;
        }
        let target = point * scale;
        let mut min_distance = f32::INFINITY;
        let mut min_index = None;
        for i in 0..self.points.len() {
            let a = self.points[(i + self.points.len() - 1) % self.points.len()] * scale;
            let b = self.points[i] * scale;
            let dist = distance_to_segment(target, a, b);
            if dist <= epsilon && dist < min_distance {
                min_distance = dist;
                min_index = Some(i);
            }
        }
        min_index
    }

    /// Check if an image-space point lies inside this shape. Kinds without
    /// an interior (lines, point markers) never contain anything.
    pub fn contains_point(&self, point: Point) -> bool {
        match self.kind {
            ShapeKind::Polygon => self.polygon_contains(point),
            ShapeKind::Rectangle => {
                if self.points.len() < 2 {
                    return false;
                }
                Rect::from_corners(self.points[0], self.points[1]).contains(&point)
            }
            ShapeKind::Circle => {
                if self.points.len() < 2 {
                    return false;
                }
                let radius = self.points[0].distance_to(&self.points[1]);
                self.points[0].distance_to(&point) <= radius
            }
            ShapeKind::Line | ShapeKind::Point | ShapeKind::Points => false,
        }
    }

    /// Axis-aligned bounds of all points, or `None` for an empty shape.
    pub fn bounding_rect(&self) -> Option<Rect> {
        let first = self.points.first()?;
        let mut min_x = first.x;
        let mut min_y = first.y;
        let mut max_x = first.x;
        let mut max_y = first.y;
        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// Translate every point by `offset`.
    pub fn move_by(&mut self, offset: Point) {
        for p in &mut self.points {
            *p += offset;
        }
    }

    /// Translate a single point by `offset`.
    pub fn move_vertex_by(&mut self, index: usize, offset: Point) {
        if index >= self.points.len() {
            log::warn!(
                "cannot move vertex {} of shape with {} points",
                index,
                self.points.len()
            );
            return;
        }
        self.points[index] += offset;
    }

    pub fn highlight_vertex(&mut self, index: usize, mode: HighlightMode) {
        self.highlight = Some((index, mode));
    }

    pub fn highlight_clear(&mut self) {
        self.highlight = None;
    }

    pub fn highlighted_vertex(&self) -> Option<(usize, HighlightMode)> {
        self.highlight
    }

    // Ray casting over the boundary path. The path is treated as implicitly
    // closed, so an open polygon with 3+ points still has an interior for
    // hit testing.
    fn polygon_contains(&self, point: Point) -> bool {
        if self.points.len() < 3 {
            return false;
        }
        let mut inside = false;
        let n = self.points.len();
        let mut j = n - 1;
        for i in 0..n {
            let vi = &self.points[i];
            let vj = &self.points[j];
            if ((vi.y > point.y) != (vj.y > point.y))
                && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}
