//! The interactive editing canvas.
//!
//! The canvas owns the authoritative shape collection for the current image,
//! the in-progress shape while drawing, the selection, the undo history, and
//! the viewport transform. All mutation is driven by the pointer/keyboard
//! handlers in [`input`]; external callers load shapes in, read them out for
//! persistence, and react to the events queued in between.
//!
//! Everything here is single-threaded and synchronous: each input call
//! completes all state changes before returning, and the host drains the
//! event queue afterwards.

pub mod input;

use std::collections::HashMap;

use crate::config::CanvasConfig;
use crate::message::CanvasEvent;
use crate::model::{HighlightMode, Point, PointLabel, Shape};
use crate::render::{render_shape, DrawSurface};
use crate::style::ShapeStyle;
use crate::transform::CanvasTransform;
use crate::undo::SnapshotStack;

use self::input::DragState;

/// Interaction mode of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Pointer actions build a new shape point by point.
    Create,
    /// Pointer actions select, move, or reshape existing shapes.
    #[default]
    Edit,
}

/// The shape-editing engine.
pub struct Canvas {
    config: CanvasConfig,
    mode: Mode,
    shapes: Vec<Shape>,
    backups: SnapshotStack,
    /// The in-progress shape while drawing.
    current: Option<Shape>,
    /// Rubber-band preview from the last committed vertex to the pointer.
    line: Shape,
    /// Indices into `shapes`, in selection order.
    selection: Vec<usize>,
    /// Shadow copies moved during a right-button copy drag.
    shadow_copies: Vec<Shape>,
    /// Anchor for drag deltas, set on press and advanced by each move.
    prev_point: Point,
    /// Distances from the drag anchor to the selection bounds, captured at
    /// selection time and used to clamp shape drags to the image.
    offsets: (Point, Point),
    transform: CanvasTransform,
    /// Per-shape visibility overrides, keyed by index. Reset whenever the
    /// shape list changes structurally.
    visible: HashMap<usize, bool>,
    /// Host request to hide unselected shapes.
    hide_background: bool,
    /// Effective hiding state (suppressed while nothing is selected).
    hiding: bool,
    highlighted_shape: Option<usize>,
    highlighted_vertex: Option<usize>,
    /// Whether the highlighted shape was already selected when it was
    /// clicked; a click-without-drag on it removes it from the selection.
    highlighted_shape_is_selected: bool,
    drag: DragState,
    /// Runtime snap toggle (Alt disables it while held).
    snapping_enabled: bool,
    fill_drawing: bool,
    events: Vec<CanvasEvent>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl Canvas {
    pub fn new(config: CanvasConfig) -> Self {
        let backups = SnapshotStack::new(config.num_backups);
        let snapping_enabled = config.snapping;
        Self {
            config,
            mode: Mode::Edit,
            shapes: Vec::new(),
            backups,
            current: None,
            line: Shape::default(),
            selection: Vec::new(),
            shadow_copies: Vec::new(),
            prev_point: Point::ZERO,
            offsets: (Point::ZERO, Point::ZERO),
            transform: CanvasTransform::default(),
            visible: HashMap::new(),
            hide_background: false,
            hiding: false,
            highlighted_shape: None,
            highlighted_vertex: None,
            highlighted_shape_is_selected: false,
            drag: DragState::Idle,
            snapping_enabled,
            fill_drawing: false,
            events: Vec::new(),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_drawing(&self) -> bool {
        self.mode == Mode::Create
    }

    pub fn is_editing(&self) -> bool {
        self.mode == Mode::Edit
    }

    /// The committed shape collection, in presentation order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// The in-progress shape, if any.
    pub fn current_shape(&self) -> Option<&Shape> {
        self.current.as_ref()
    }

    /// Selected shape indices, in selection order.
    pub fn selected_indices(&self) -> &[usize] {
        &self.selection
    }

    pub fn shadow_copies(&self) -> &[Shape] {
        &self.shadow_copies
    }

    pub fn transform(&self) -> &CanvasTransform {
        &self.transform
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Whether a vertex is currently highlighted as the drag target.
    pub fn selected_vertex(&self) -> bool {
        self.highlighted_vertex.is_some()
    }

    pub fn highlighted_shape(&self) -> Option<usize> {
        self.highlighted_shape
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.visible.get(&index).copied().unwrap_or(true)
    }

    /// Whether the in-progress shape has enough points to be closed.
    pub fn can_close_shape(&self) -> bool {
        self.is_drawing() && self.current.as_ref().is_some_and(|c| c.len() > 2)
    }

    pub fn fill_drawing(&self) -> bool {
        self.fill_drawing
    }

    /// Drain all events queued since the last call.
    pub fn take_events(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: CanvasEvent) {
        self.events.push(event);
    }

    // ========================================================================
    // Mode and viewport
    // ========================================================================

    /// Switch between EDIT (`true`) and CREATE (`false`). Entering EDIT
    /// discards any abandoned in-progress shape; entering CREATE clears
    /// highlight and selection.
    pub fn set_editing(&mut self, editing: bool) {
        self.mode = if editing { Mode::Edit } else { Mode::Create };
        if editing {
            if self.current.take().is_some() {
                self.push_event(CanvasEvent::DrawingChanged(false));
            }
        } else {
            self.un_highlight();
            self.deselect_all();
        }
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.transform.scale = scale;
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.transform.viewport = (width, height);
    }

    /// Register the dimensions of the loaded image, optionally clearing the
    /// shape collection for a fresh document.
    pub fn load_image(&mut self, width: u32, height: u32, clear_shapes: bool) {
        self.transform.image_size = (width as f32, height as f32);
        if clear_shapes {
            self.shapes.clear();
            self.selection.clear();
            self.visible.clear();
            self.un_highlight();
        }
    }

    pub fn set_fill_drawing(&mut self, value: bool) {
        self.fill_drawing = value;
    }

    /// Forget everything about the open document.
    pub fn reset_state(&mut self) {
        self.shapes.clear();
        self.backups.clear();
        self.current = None;
        self.selection.clear();
        self.shadow_copies.clear();
        self.visible.clear();
        self.un_highlight();
        self.highlighted_shape_is_selected = false;
        self.drag = DragState::Idle;
        self.transform.image_size = (0.0, 0.0);
    }

    // ========================================================================
    // Undo
    // ========================================================================

    /// Snapshot the whole shape collection onto the undo stack.
    pub(crate) fn store_shapes(&mut self) {
        self.backups.push(self.shapes.clone());
    }

    pub fn is_shape_restorable(&self) -> bool {
        self.backups.is_restorable()
    }

    /// Undo the most recent committed mutation. Returns false when there is
    /// nothing to restore.
    pub fn restore_shape(&mut self) -> bool {
        let Some(mut shapes) = self.backups.restore() else {
            return false;
        };
        for shape in &mut shapes {
            shape.selected = false;
            shape.highlight_clear();
        }
        self.shapes = shapes;
        self.selection.clear();
        self.visible.clear();
        self.highlighted_shape = None;
        self.highlighted_vertex = None;
        true
    }

    /// Pop the top undo snapshot without restoring. Part of the label-cancel
    /// rollback together with [`Canvas::undo_last_line`].
    pub fn discard_backup(&mut self) {
        self.backups.discard_top();
    }

    pub(crate) fn backups_len(&self) -> usize {
        self.backups.len()
    }

    // ========================================================================
    // Shape collection operations
    // ========================================================================

    /// Close the in-progress shape and commit it to the collection.
    /// Calling this with no in-progress shape is a caller bug.
    pub fn finalise(&mut self) {
        let mut shape = self
            .current
            .take()
            .expect("finalise called with no in-progress shape");
        shape.close();
        self.shapes.push(shape);
        self.store_shapes();
        self.set_hiding(false);
        self.push_event(CanvasEvent::NewShape);
    }

    /// Second phase of shape creation: assign the label the host prompted
    /// for, replacing the finalize snapshot so undo restores the labeled
    /// shape.
    pub fn set_last_label(&mut self, text: &str) -> &Shape {
        assert!(!text.is_empty(), "label must be non-empty");
        assert!(!self.shapes.is_empty(), "set_last_label with no shapes");
        let last = self.shapes.len() - 1;
        self.shapes[last].label = Some(text.to_string());
        self.backups.discard_top();
        self.store_shapes();
        &self.shapes[last]
    }

    /// Pull the most recently committed shape back into drawing state.
    /// Used when the label prompt for a new shape is cancelled.
    pub fn undo_last_line(&mut self) {
        assert!(!self.shapes.is_empty(), "undo_last_line with no shapes");
        let mut shape = self.shapes.pop().expect("shapes is non-empty");
        shape.set_open();
        if let Some(last) = shape.last_point() {
            self.line.set_points(
                vec![last, shape.point(0)],
                vec![PointLabel::Positive, PointLabel::Positive],
            );
        }
        self.current = Some(shape);
        self.push_event(CanvasEvent::DrawingChanged(true));
    }

    /// Remove the last committed vertex of the in-progress shape. Ends the
    /// drawing when the last vertex goes.
    pub fn undo_last_point(&mut self) {
        if self.current.as_ref().is_none_or(|c| c.is_closed()) {
            return;
        }
        if let Some(current) = self.current.as_mut() {
            current.pop_point();
        }
        match self.current.as_ref().and_then(|c| c.last_point()) {
            Some(last) if self.line.len() == 2 => self.line.set_point(0, last),
            Some(_) => {}
            None => {
                self.current = None;
                self.push_event(CanvasEvent::DrawingChanged(false));
            }
        }
    }

    /// Delete all selected shapes, returning them.
    pub fn delete_selected(&mut self) -> Vec<Shape> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        let mut indices = self.selection.clone();
        indices.sort_unstable();
        indices.dedup();
        let mut deleted = Vec::new();
        for index in indices.into_iter().rev() {
            if index < self.shapes.len() {
                deleted.push(self.shapes.remove(index));
            }
        }
        deleted.reverse();
        self.selection.clear();
        self.visible.clear();
        self.highlighted_shape = None;
        self.highlighted_vertex = None;
        self.store_shapes();
        self.push_event(CanvasEvent::ShapeMoved);
        deleted
    }

    /// Replace (or extend) the shape collection, e.g. when opening a saved
    /// annotation. Pushes the initial undo snapshot.
    pub fn load_shapes(&mut self, shapes: Vec<Shape>, replace: bool) {
        if replace {
            self.shapes = shapes;
            self.selection.clear();
        } else {
            self.shapes.extend(shapes);
        }
        self.store_shapes();
        self.current = None;
        self.visible.clear();
        self.highlighted_shape = None;
        self.highlighted_vertex = None;
    }

    pub fn set_shape_visible(&mut self, index: usize, value: bool) {
        self.visible.insert(index, value);
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Select shapes by index (e.g. from the host's shape list widget).
    pub fn select_shapes(&mut self, indices: Vec<usize>) {
        self.set_hiding(true);
        self.apply_selection(indices);
    }

    pub fn deselect_all(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.set_hiding(false);
        self.highlighted_shape_is_selected = false;
        self.apply_selection(Vec::new());
    }

    /// Select the topmost visible shape containing `point`, or clear the
    /// selection when the point hits empty space. With `multiple`, the hit
    /// shape is added to the selection instead of replacing it.
    pub(crate) fn select_shape_point(&mut self, point: Point, multiple: bool) {
        if self.selected_vertex() {
            if let (Some(index), Some(vertex)) = (self.highlighted_shape, self.highlighted_vertex)
            {
                if let Some(shape) = self.shapes.get_mut(index) {
                    shape.highlight_vertex(vertex, HighlightMode::MoveVertex);
                }
            }
            return;
        }
        for index in (0..self.shapes.len()).rev() {
            if !self.is_visible(index) || !self.shapes[index].contains_point(point) {
                continue;
            }
            self.set_hiding(true);
            if !self.selection.contains(&index) {
                let new_selection = if multiple {
                    let mut selection = self.selection.clone();
                    selection.push(index);
                    selection
                } else {
                    vec![index]
                };
                self.apply_selection(new_selection);
                self.highlighted_shape_is_selected = false;
            } else {
                self.highlighted_shape_is_selected = true;
            }
            self.calculate_offsets(point);
            return;
        }
        self.deselect_all();
    }

    pub(crate) fn apply_selection(&mut self, indices: Vec<usize>) {
        for shape in &mut self.shapes {
            shape.selected = false;
        }
        let indices: Vec<usize> = indices
            .into_iter()
            .filter(|&i| i < self.shapes.len())
            .collect();
        for &i in &indices {
            self.shapes[i].selected = true;
        }
        self.selection = indices;
        self.push_event(CanvasEvent::SelectionChanged(self.selection.clone()));
    }

    /// Ask the canvas to hide unselected shapes. Only takes effect while a
    /// selection exists, so the user can still pick a shape.
    pub fn hide_background_shapes(&mut self, value: bool) {
        self.hide_background = value;
        if !self.selection.is_empty() {
            self.set_hiding(true);
        }
    }

    pub(crate) fn set_hiding(&mut self, enable: bool) {
        self.hiding = enable && self.hide_background;
    }

    pub(crate) fn un_highlight(&mut self) {
        if let Some(index) = self.highlighted_shape {
            if let Some(shape) = self.shapes.get_mut(index) {
                shape.highlight_clear();
            }
        }
        self.highlighted_shape = None;
        self.highlighted_vertex = None;
    }

    // ========================================================================
    // Copy drag
    // ========================================================================

    /// Merge the shadow copies from a right-drag into the collection; the
    /// copies become the new selection.
    pub fn commit_copy_move(&mut self) {
        if self.shadow_copies.is_empty() || self.shadow_copies.len() != self.selection.len() {
            log::warn!("copy move state inconsistent; discarding");
            self.shadow_copies.clear();
            self.apply_selection(Vec::new());
            return;
        }
        let mut new_indices = Vec::with_capacity(self.shadow_copies.len());
        for shadow in std::mem::take(&mut self.shadow_copies) {
            new_indices.push(self.shapes.len());
            self.shapes.push(shadow);
        }
        self.apply_selection(new_indices);
        self.store_shapes();
        self.push_event(CanvasEvent::ShapeMoved);
    }

    /// Discard the shadow copies without committing.
    pub fn cancel_copy_move(&mut self) {
        self.shadow_copies.clear();
    }

    // ========================================================================
    // Geometry helpers
    // ========================================================================

    fn out_of_image(&self, point: Point) -> bool {
        let (w, h) = self.transform.image_size;
        if w <= 0.0 || h <= 0.0 {
            return false;
        }
        !(0.0..=w - 1.0).contains(&point.x) || !(0.0..=h - 1.0).contains(&point.y)
    }

    /// Capture the distances from the drag anchor to the selection bounds,
    /// used to keep a shape drag inside the image.
    pub(crate) fn calculate_offsets(&mut self, point: Point) {
        let (iw, ih) = self.transform.image_size;
        let mut left = iw - 1.0;
        let mut right = 0.0f32;
        let mut top = ih - 1.0;
        let mut bottom = 0.0f32;
        for &index in &self.selection {
            if let Some(rect) = self.shapes.get(index).and_then(|s| s.bounding_rect()) {
                left = left.min(rect.left());
                right = right.max(rect.right());
                top = top.min(rect.top());
                bottom = bottom.max(rect.bottom());
            }
        }
        self.offsets = (
            Point::new(left - point.x, top - point.y),
            Point::new(right - point.x, bottom - point.y),
        );
    }

    /// Clamp a drag target so the selection bounds stay inside the image.
    /// Returns `None` when the pointer itself has left the image.
    fn clamp_move_position(&self, mut pos: Point) -> Option<Point> {
        if self.out_of_image(pos) {
            return None;
        }
        let (w, h) = self.transform.image_size;
        if w <= 0.0 || h <= 0.0 {
            return Some(pos);
        }
        let o1 = pos + self.offsets.0;
        if self.out_of_image(o1) {
            pos = pos - Point::new(o1.x.min(0.0), o1.y.min(0.0));
        }
        let o2 = pos + self.offsets.1;
        if self.out_of_image(o2) {
            pos = pos + Point::new((w - o2.x).min(0.0), (h - o2.y).min(0.0));
        }
        Some(pos)
    }

    /// Translate all selected shapes toward `pos`, clamped to the image.
    /// Returns whether anything moved.
    pub(crate) fn move_selected_shapes(&mut self, pos: Point) -> bool {
        let Some(pos) = self.clamp_move_position(pos) else {
            return false;
        };
        let dp = pos - self.prev_point;
        if dp == Point::ZERO {
            return false;
        }
        let indices = self.selection.clone();
        for index in indices {
            if let Some(shape) = self.shapes.get_mut(index) {
                shape.move_by(dp);
            }
        }
        self.prev_point = pos;
        true
    }

    /// Translate the shadow copies toward `pos` (right-drag copy preview).
    pub(crate) fn move_shadow_copies(&mut self, pos: Point) -> bool {
        let Some(pos) = self.clamp_move_position(pos) else {
            return false;
        };
        let dp = pos - self.prev_point;
        if dp == Point::ZERO {
            return false;
        }
        for shape in &mut self.shadow_copies {
            shape.move_by(dp);
        }
        self.prev_point = pos;
        true
    }

    /// Move the highlighted vertex to `pos`, clamped to the image rect.
    pub(crate) fn move_highlighted_vertex(&mut self, mut pos: Point) {
        let (Some(index), Some(vertex)) = (self.highlighted_shape, self.highlighted_vertex)
        else {
            return;
        };
        let (w, h) = self.transform.image_size;
        if w > 0.0 && h > 0.0 {
            pos = Point::new(pos.x.clamp(0.0, w), pos.y.clamp(0.0, h));
        }
        if let Some(shape) = self.shapes.get_mut(index) {
            let Some(&point) = shape.points().get(vertex) else {
                return;
            };
            shape.move_vertex_by(vertex, pos - point);
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Draw the full annotation overlay: committed shapes (honoring
    /// visibility and hiding), the in-progress shape with its rubber band,
    /// shadow copies, and the fill-drawing preview.
    pub fn render(&self, style: &ShapeStyle, surface: &mut dyn DrawSurface) {
        for (index, shape) in self.shapes.iter().enumerate() {
            if (shape.selected || !self.hiding) && self.is_visible(index) {
                let fill = shape.selected || self.highlighted_shape == Some(index);
                render_shape(shape, fill, style, &self.transform, surface);
            }
        }
        if let Some(current) = &self.current {
            render_shape(current, false, style, &self.transform, surface);
            render_shape(&self.line, false, style, &self.transform, surface);
        }
        for shadow in &self.shadow_copies {
            render_shape(shadow, shadow.selected, style, &self.transform, surface);
        }
        if self.fill_drawing {
            if let Some(current) = &self.current {
                if current.len() >= 2 && self.line.len() == 2 {
                    let mut preview = current.clone();
                    preview.add_point(self.line.point(1), PointLabel::Positive);
                    render_shape(&preview, true, style, &self.transform, surface);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ShapeKind;

    fn quad_at(x: f32, y: f32) -> Shape {
        let mut shape = Shape::new(ShapeKind::Polygon).with_label("quad");
        shape.add_point(Point::new(x, y), PointLabel::Positive);
        shape.add_point(Point::new(x + 50.0, y), PointLabel::Positive);
        shape.add_point(Point::new(x + 50.0, y + 50.0), PointLabel::Positive);
        shape.add_point(Point::new(x, y + 50.0), PointLabel::Positive);
        shape.close();
        shape
    }

    fn canvas_with_shapes(shapes: Vec<Shape>) -> Canvas {
        let mut canvas = Canvas::default();
        canvas.load_image(640, 480, true);
        canvas.set_viewport(640.0, 480.0);
        canvas.load_shapes(shapes, true);
        canvas.take_events();
        canvas
    }

    #[test]
    fn test_load_shapes_pushes_initial_snapshot() {
        let canvas = canvas_with_shapes(vec![quad_at(10.0, 10.0)]);
        assert_eq!(canvas.backups_len(), 1);
        assert!(!canvas.is_shape_restorable());
    }

    #[test]
    fn test_undo_round_trip() {
        let mut canvas = canvas_with_shapes(vec![quad_at(10.0, 10.0)]);
        canvas.select_shapes(vec![0]);
        canvas.prev_point = Point::new(20.0, 20.0);
        canvas.calculate_offsets(Point::new(20.0, 20.0));
        assert!(canvas.move_selected_shapes(Point::new(30.0, 25.0)));
        canvas.store_shapes();

        assert!(canvas.is_shape_restorable());
        assert!(canvas.restore_shape());
        assert_eq!(canvas.shapes()[0].point(0), Point::new(10.0, 10.0));
        assert!(canvas.selected_indices().is_empty());
        assert!(!canvas.shapes()[0].selected);

        // Nothing left to restore.
        assert!(!canvas.is_shape_restorable());
        assert!(!canvas.restore_shape());
    }

    #[test]
    fn test_select_shape_point_picks_topmost_of_overlap() {
        let mut canvas =
            canvas_with_shapes(vec![quad_at(10.0, 10.0), quad_at(30.0, 30.0)]);
        // (40, 40) is inside both quads; the later shape wins.
        canvas.select_shape_point(Point::new(40.0, 40.0), false);
        assert_eq!(canvas.selected_indices(), &[1]);
        assert!(canvas.shapes()[1].selected);
        assert!(!canvas.shapes()[0].selected);
    }

    #[test]
    fn test_select_shape_point_skips_invisible() {
        let mut canvas =
            canvas_with_shapes(vec![quad_at(10.0, 10.0), quad_at(30.0, 30.0)]);
        canvas.set_shape_visible(1, false);
        canvas.select_shape_point(Point::new(40.0, 40.0), false);
        assert_eq!(canvas.selected_indices(), &[0]);
    }

    #[test]
    fn test_select_shape_point_in_empty_space_deselects() {
        let mut canvas = canvas_with_shapes(vec![quad_at(10.0, 10.0)]);
        canvas.select_shape_point(Point::new(30.0, 30.0), false);
        assert_eq!(canvas.selected_indices(), &[0]);

        canvas.select_shape_point(Point::new(300.0, 300.0), false);
        assert!(canvas.selected_indices().is_empty());
        assert!(!canvas.shapes()[0].selected);
    }

    #[test]
    fn test_multi_select_appends_in_selection_order() {
        let mut canvas =
            canvas_with_shapes(vec![quad_at(10.0, 10.0), quad_at(200.0, 200.0)]);
        canvas.select_shape_point(Point::new(220.0, 220.0), false);
        canvas.select_shape_point(Point::new(30.0, 30.0), true);
        assert_eq!(canvas.selected_indices(), &[1, 0]);
    }

    #[test]
    fn test_delete_selected_snapshots_and_returns_shapes() {
        let mut canvas =
            canvas_with_shapes(vec![quad_at(10.0, 10.0), quad_at(200.0, 200.0)]);
        canvas.select_shapes(vec![0]);
        let deleted = canvas.delete_selected();
        assert_eq!(deleted.len(), 1);
        assert_eq!(canvas.shapes().len(), 1);
        assert_eq!(canvas.backups_len(), 2);
        assert!(canvas.selected_indices().is_empty());
        assert!(canvas
            .take_events()
            .contains(&CanvasEvent::ShapeMoved));
    }

    #[test]
    fn test_delete_with_no_selection_is_a_noop() {
        let mut canvas = canvas_with_shapes(vec![quad_at(10.0, 10.0)]);
        assert!(canvas.delete_selected().is_empty());
        assert_eq!(canvas.backups_len(), 1);
    }

    #[test]
    fn test_set_last_label_replaces_top_snapshot() {
        let mut canvas = canvas_with_shapes(vec![quad_at(10.0, 10.0)]);
        let shape = canvas.set_last_label("car");
        assert_eq!(shape.label.as_deref(), Some("car"));
        assert_eq!(canvas.backups_len(), 1);
    }

    #[test]
    fn test_label_cancel_rolls_back_finalized_shape() {
        let mut canvas = canvas_with_shapes(vec![]);
        canvas.set_editing(false);
        let mut shape = Shape::new(ShapeKind::Polygon);
        for p in [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ] {
            shape.add_point(p, PointLabel::Positive);
        }
        canvas.current = Some(shape);
        canvas.finalise();
        assert_eq!(canvas.shapes().len(), 1);
        assert_eq!(canvas.backups_len(), 2);

        // Host's label prompt was cancelled.
        canvas.undo_last_line();
        canvas.discard_backup();
        assert!(canvas.shapes().is_empty());
        assert_eq!(canvas.backups_len(), 1);
        let current = canvas.current_shape().expect("shape back in drawing state");
        assert!(!current.is_closed());
    }

    #[test]
    fn test_move_selected_shapes_is_clamped_to_image() {
        let mut canvas = canvas_with_shapes(vec![quad_at(10.0, 10.0)]);
        canvas.select_shapes(vec![0]);
        canvas.prev_point = Point::new(20.0, 20.0);
        canvas.calculate_offsets(Point::new(20.0, 20.0));

        // Dragging far left: the shape stops at the image edge instead of
        // leaving it.
        assert!(canvas.move_selected_shapes(Point::new(0.0, 20.0)));
        assert_eq!(canvas.shapes()[0].point(0), Point::new(0.0, 10.0));
    }

    #[test]
    fn test_move_with_pointer_outside_image_is_a_noop() {
        let mut canvas = canvas_with_shapes(vec![quad_at(10.0, 10.0)]);
        canvas.select_shapes(vec![0]);
        canvas.prev_point = Point::new(20.0, 20.0);
        canvas.calculate_offsets(Point::new(20.0, 20.0));
        assert!(!canvas.move_selected_shapes(Point::new(-50.0, 20.0)));
        assert_eq!(canvas.shapes()[0].point(0), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_commit_copy_move_merges_shadows() {
        let mut canvas = canvas_with_shapes(vec![quad_at(10.0, 10.0)]);
        canvas.select_shapes(vec![0]);
        canvas.shadow_copies = vec![canvas.shapes()[0].clone()];
        canvas.shadow_copies[0].move_by(Point::new(100.0, 0.0));
        canvas.take_events();

        canvas.commit_copy_move();
        assert_eq!(canvas.shapes().len(), 2);
        assert_eq!(canvas.selected_indices(), &[1]);
        assert_eq!(canvas.shapes()[1].point(0), Point::new(110.0, 10.0));
        assert!(!canvas.shapes()[0].selected);
        assert_eq!(canvas.backups_len(), 2);
    }

    #[test]
    fn test_cancel_copy_move_discards_shadows() {
        let mut canvas = canvas_with_shapes(vec![quad_at(10.0, 10.0)]);
        canvas.select_shapes(vec![0]);
        canvas.shadow_copies = vec![canvas.shapes()[0].clone()];
        canvas.cancel_copy_move();
        assert!(canvas.shadow_copies().is_empty());
        assert_eq!(canvas.shapes().len(), 1);
        assert_eq!(canvas.backups_len(), 1);
    }

    #[test]
    fn test_hiding_requires_backgrounds_hidden_and_selection() {
        let mut canvas =
            canvas_with_shapes(vec![quad_at(10.0, 10.0), quad_at(200.0, 200.0)]);
        canvas.hide_background_shapes(true);
        assert!(!canvas.hiding);

        canvas.select_shapes(vec![0]);
        assert!(canvas.hiding);

        canvas.deselect_all();
        assert!(!canvas.hiding);
    }

    #[test]
    fn test_undo_last_point() {
        let mut canvas = canvas_with_shapes(vec![]);
        canvas.set_editing(false);
        let mut shape = Shape::new(ShapeKind::Polygon);
        shape.add_point(Point::new(0.0, 0.0), PointLabel::Positive);
        shape.add_point(Point::new(10.0, 0.0), PointLabel::Positive);
        canvas.current = Some(shape);
        canvas
            .line
            .set_points(vec![Point::new(10.0, 0.0), Point::new(20.0, 0.0)], vec![
                PointLabel::Positive,
                PointLabel::Positive,
            ]);

        canvas.undo_last_point();
        assert_eq!(canvas.current_shape().map(Shape::len), Some(1));
        assert_eq!(canvas.line.point(0), Point::new(0.0, 0.0));

        canvas.undo_last_point();
        assert!(canvas.current_shape().is_none());
        assert!(canvas
            .take_events()
            .contains(&CanvasEvent::DrawingChanged(false)));
    }
}
