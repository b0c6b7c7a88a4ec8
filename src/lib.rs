//! quadlabel - quad annotation editing core
//!
//! The interaction engine behind a quad labeling tool: shapes, the
//! direct-manipulation canvas state machine, snapshot undo, and the quad
//! JSON annotation format. Windowing, widgets, and image decoding stay in
//! the host application.

pub mod canvas;
pub mod config;
pub mod format;
pub mod message;
pub mod model;
pub mod render;
pub mod style;
pub mod transform;
pub mod undo;

pub use canvas::input::{ButtonState, DragKind, Key, Modifiers, PointerButton};
pub use canvas::{Canvas, Mode};
pub use config::{CanvasConfig, DoubleClickAction};
pub use format::{FormatError, QuadDocument, QuadEntry};
pub use message::{CanvasEvent, Orientation};
pub use model::{HighlightMode, Point, PointLabel, Rect, Shape, ShapeKind};
pub use render::DrawSurface;
pub use style::{ShapeStyle, VertexShape};
pub use transform::CanvasTransform;
