//! Glyph refinement patterns that rework a system's population after the
//! first classification pass.

pub mod compound;

pub use compound::CompoundPatternEngine;
