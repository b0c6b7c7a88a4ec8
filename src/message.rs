//! Outbound canvas events.
//!
//! The canvas mutates its own state synchronously and reports what happened
//! as events queued for the host to drain after each input call. This is the
//! only channel from the core to the surrounding application; the host reacts
//! by prompting for labels, flagging the document dirty, adjusting zoom, and
//! so on.

use crate::model::Point;

/// Scroll axis for [`CanvasEvent::ScrollRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Events emitted by the canvas for the host application.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// A shape was finalized. The host must assign a label via
    /// `set_last_label`, or roll the shape back with `undo_last_line` +
    /// `discard_backup` if the user cancels.
    NewShape,
    /// The active selection changed. Indices into the shape list, in
    /// selection order.
    SelectionChanged(Vec<usize>),
    /// A committing mutation changed shape geometry; the document is dirty.
    ShapeMoved,
    /// Drawing of an in-progress shape started (true) or ended (false).
    DrawingChanged(bool),
    /// Whether a vertex is currently highlighted as the drag target.
    VertexSelected(bool),
    /// Pointer position in image coordinates, for status display.
    MouseMoved(Point),
    /// Ctrl+wheel: the host should zoom around `pos` (device coordinates).
    ZoomRequest { delta: f32, pos: Point },
    /// Plain wheel: the host should scroll its viewport.
    ScrollRequest { delta: f32, orientation: Orientation },
    /// A right-drag copy was released with shadow copies pending. The host
    /// should offer commit (`commit_copy_move`) or cancel
    /// (`cancel_copy_move`).
    CopyMovePending,
    /// Plain right-click release; the host may show its shape context menu.
    ContextMenuRequested,
}
