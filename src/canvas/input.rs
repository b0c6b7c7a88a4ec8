//! Pointer and keyboard handling for the canvas.
//!
//! The handlers take positions in device coordinates and convert them to
//! image coordinates up front; all interaction logic below that point works
//! in image space.

use crate::config::DoubleClickAction;
use crate::message::{CanvasEvent, Orientation};
use crate::model::{HighlightMode, Point, PointLabel, Shape, ShapeKind};

use super::Canvas;

/// Pointer buttons the canvas reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
}

/// Buttons held during a pointer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    pub left: bool,
    pub right: bool,
}

impl ButtonState {
    pub const NONE: Self = Self {
        left: false,
        right: false,
    };
    pub const LEFT: Self = Self {
        left: true,
        right: false,
    };
    pub const RIGHT: Self = Self {
        left: false,
        right: true,
    };
}

/// Modifier keys held during an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };
    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
    };
}

/// Keys with canvas-level behavior. Everything else stays with the host's
/// keybinding layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Return,
    Up,
    Down,
    Left,
    Right,
}

/// What an in-flight drag is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Vertex,
    Shapes,
    Keyboard,
}

/// Tracks an in-flight move gesture so release can decide whether anything
/// actually changed before committing an undo snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) enum DragState {
    #[default]
    Idle,
    Dragging {
        kind: DragKind,
        /// Vertex positions of each affected shape at drag start.
        start_points: Vec<(usize, Vec<Point>)>,
    },
}

impl Canvas {
    // ========================================================================
    // Pointer
    // ========================================================================

    pub fn mouse_move(&mut self, device_pos: Point, buttons: ButtonState, _modifiers: Modifiers) {
        let pos = self.transform.to_image(device_pos);
        self.push_event(CanvasEvent::MouseMoved(pos));

        if self.is_drawing() {
            self.drawing_move(pos);
            return;
        }

        // Right-drag clones the selection and moves the clones.
        if buttons.right {
            if !self.shadow_copies.is_empty() {
                self.move_shadow_copies(pos);
            } else if !self.selection.is_empty() {
                self.shadow_copies = self
                    .selection
                    .iter()
                    .filter_map(|&i| self.shapes.get(i).cloned())
                    .collect();
            }
            return;
        }

        // Left-drag moves the highlighted vertex, or the whole selection.
        if buttons.left {
            if self.selected_vertex() {
                self.begin_drag(DragKind::Vertex);
                self.move_highlighted_vertex(pos);
            } else if !self.selection.is_empty() {
                self.begin_drag(DragKind::Shapes);
                self.move_selected_shapes(pos);
            }
            return;
        }

        self.hover(pos);
        self.push_event(CanvasEvent::VertexSelected(self.selected_vertex()));
    }

    pub fn mouse_press(&mut self, device_pos: Point, button: PointerButton, modifiers: Modifiers) {
        let pos = self.transform.to_image(device_pos);
        match button {
            PointerButton::Left => {
                if self.is_drawing() {
                    self.drawing_press(pos, modifiers);
                } else {
                    self.select_shape_point(pos, modifiers.ctrl);
                    self.prev_point = pos;
                }
            }
            PointerButton::Right => {
                if self.is_editing() {
                    let outside_selection = self
                        .highlighted_shape
                        .is_some_and(|h| !self.selection.contains(&h));
                    if self.selection.is_empty() || outside_selection {
                        self.select_shape_point(pos, modifiers.ctrl);
                    }
                    self.prev_point = pos;
                }
            }
        }
    }

    pub fn mouse_release(&mut self, _device_pos: Point, button: PointerButton) {
        match button {
            PointerButton::Right => {
                if self.shadow_copies.is_empty() {
                    self.push_event(CanvasEvent::ContextMenuRequested);
                } else {
                    // The host decides between copy-here and cancel.
                    self.push_event(CanvasEvent::CopyMovePending);
                }
            }
            PointerButton::Left => {
                if self.is_editing() {
                    // Click-without-drag on an already selected shape drops
                    // it from the selection.
                    if let Some(index) = self.highlighted_shape {
                        if self.highlighted_shape_is_selected
                            && matches!(self.drag, DragState::Idle)
                        {
                            let remaining: Vec<usize> = self
                                .selection
                                .iter()
                                .copied()
                                .filter(|&i| i != index)
                                .collect();
                            self.apply_selection(remaining);
                        }
                    }
                }
            }
        }
        self.end_drag();
    }

    pub fn mouse_double_click(&mut self, _device_pos: Point) {
        if self.config.double_click != Some(DoubleClickAction::Close) {
            return;
        }
        if self.can_close_shape() {
            self.finalise();
        }
    }

    pub fn mouse_leave(&mut self) {
        self.un_highlight();
    }

    /// Wheel input: Ctrl+wheel is a zoom request, anything else scrolls.
    /// Both are forwarded to the host, which owns scale and scroll position.
    pub fn wheel(&mut self, device_pos: Point, delta: (f32, f32), modifiers: Modifiers) {
        if modifiers.ctrl {
            self.push_event(CanvasEvent::ZoomRequest {
                delta: delta.1,
                pos: device_pos,
            });
        } else {
            if delta.0 != 0.0 {
                self.push_event(CanvasEvent::ScrollRequest {
                    delta: delta.0,
                    orientation: Orientation::Horizontal,
                });
            }
            if delta.1 != 0.0 {
                self.push_event(CanvasEvent::ScrollRequest {
                    delta: delta.1,
                    orientation: Orientation::Vertical,
                });
            }
        }
    }

    // ========================================================================
    // Keyboard
    // ========================================================================

    pub fn key_press(&mut self, key: Key, modifiers: Modifiers) {
        if self.is_drawing() {
            match key {
                Key::Escape if self.current.is_some() => {
                    self.current = None;
                    self.push_event(CanvasEvent::DrawingChanged(false));
                }
                Key::Return if self.can_close_shape() => self.finalise(),
                _ => {}
            }
            if modifiers.alt {
                self.snapping_enabled = false;
            }
        } else {
            let speed = self.config.move_speed;
            let offset = match key {
                Key::Up => Some(Point::new(0.0, -speed)),
                Key::Down => Some(Point::new(0.0, speed)),
                Key::Left => Some(Point::new(-speed, 0.0)),
                Key::Right => Some(Point::new(speed, 0.0)),
                _ => None,
            };
            if let Some(offset) = offset {
                self.move_by_keyboard(offset);
            }
        }
    }

    pub fn key_release(&mut self, modifiers: Modifiers) {
        if self.is_drawing() {
            if modifiers == Modifiers::NONE {
                self.snapping_enabled = self.config.snapping;
            }
        } else {
            // Commits a pending arrow-key nudge.
            self.end_drag();
        }
    }

    fn move_by_keyboard(&mut self, offset: Point) {
        if self.selection.is_empty() {
            return;
        }
        self.begin_drag(DragKind::Keyboard);
        let target = self.prev_point + offset;
        self.move_selected_shapes(target);
    }

    // ========================================================================
    // Drawing gestures
    // ========================================================================

    fn drawing_move(&mut self, mut pos: Point) {
        let Some(current) = self.current.as_mut() else {
            return;
        };
        // Snap to the first vertex so the closing click lands exactly on it.
        if self.snapping_enabled && current.len() > 1 {
            let first = current.point(0);
            if pos.distance_to(&first) < self.transform.image_tolerance(self.config.epsilon) {
                pos = first;
                current.highlight_vertex(0, HighlightMode::NearVertex);
            } else {
                current.highlight_clear();
            }
        } else {
            current.highlight_clear();
        }
        let last = current.last_point().unwrap_or(pos);
        self.line.set_points(
            vec![last, pos],
            vec![PointLabel::Positive, PointLabel::Positive],
        );
    }

    fn drawing_press(&mut self, pos: Point, modifiers: Modifiers) {
        if self.current.is_some() {
            // Commit the rubber-band endpoint, which is the snapped pointer
            // position. When it equals the first vertex the shape closes.
            let p = if self.line.len() == 2 {
                self.line.point(1)
            } else {
                pos
            };
            if let Some(current) = self.current.as_mut() {
                current.add_point(p, PointLabel::Positive);
            }
            if let Some(last) = self.current.as_ref().and_then(Shape::last_point) {
                if self.line.len() == 2 {
                    self.line.set_point(0, last);
                }
            }
            if self.current.as_ref().is_some_and(|c| c.len() == 4) {
                self.finalise();
            }
        } else {
            let mut shape = Shape::new(ShapeKind::Polygon);
            let label = if modifiers.shift {
                PointLabel::Negative
            } else {
                PointLabel::Positive
            };
            shape.add_point(pos, label);
            self.current = Some(shape);
            self.line.set_points(
                vec![pos, pos],
                vec![PointLabel::Positive, PointLabel::Positive],
            );
            self.set_hiding(true);
            self.push_event(CanvasEvent::DrawingChanged(true));
        }
    }

    // ========================================================================
    // Hover and drag bookkeeping
    // ========================================================================

    /// Scan shapes in reverse presentation order for a vertex within
    /// tolerance, then for shape containment. The first hit wins.
    fn hover(&mut self, pos: Point) {
        let epsilon = self.config.epsilon;
        let scale = self.transform.scale;
        for index in (0..self.shapes.len()).rev() {
            if !self.is_visible(index) {
                continue;
            }
            if let Some(vertex) = self.shapes[index].nearest_vertex(pos, epsilon, scale) {
                self.clear_previous_highlight();
                self.highlighted_shape = Some(index);
                self.highlighted_vertex = Some(vertex);
                self.shapes[index].highlight_vertex(vertex, HighlightMode::MoveVertex);
                return;
            }
            if self.shapes[index].contains_point(pos) {
                self.clear_previous_highlight();
                self.highlighted_shape = Some(index);
                self.highlighted_vertex = None;
                return;
            }
        }
        self.un_highlight();
    }

    fn clear_previous_highlight(&mut self) {
        if let Some(previous) = self.highlighted_shape {
            if let Some(shape) = self.shapes.get_mut(previous) {
                shape.highlight_clear();
            }
        }
    }

    /// Capture pre-move vertex positions the first time a gesture qualifies
    /// as a drag. No-op while a drag is already in flight.
    fn begin_drag(&mut self, kind: DragKind) {
        if !matches!(self.drag, DragState::Idle) {
            return;
        }
        let affected: Vec<usize> = match kind {
            DragKind::Vertex => self.highlighted_shape.into_iter().collect(),
            DragKind::Shapes | DragKind::Keyboard => self.selection.clone(),
        };
        let start_points = affected
            .into_iter()
            .filter_map(|i| self.shapes.get(i).map(|s| (i, s.points().to_vec())))
            .collect();
        self.drag = DragState::Dragging { kind, start_points };
    }

    /// Close the drag gesture: snapshot only when geometry actually changed.
    pub(crate) fn end_drag(&mut self) {
        let DragState::Dragging { start_points, .. } = std::mem::take(&mut self.drag) else {
            return;
        };
        let changed = start_points.iter().any(|(index, points)| {
            self.shapes
                .get(*index)
                .is_none_or(|s| s.points() != points.as_slice())
        });
        if changed {
            self.store_shapes();
            self.push_event(CanvasEvent::ShapeMoved);
        }
    }
}
