//! Glyph data model: shapes, evaluations and the glyph entity itself.

pub mod entity;
pub mod evaluation;
pub mod shape;

pub use entity::{Glyph, GlyphId};
pub use evaluation::Evaluation;
pub use shape::Shape;
