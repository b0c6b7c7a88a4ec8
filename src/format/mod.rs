//! Annotation persistence.

pub mod error;
pub mod quad_json;

pub use error::FormatError;
pub use quad_json::{QuadDocument, QuadEntry};
