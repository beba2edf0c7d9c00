//! # OMR Engine
//!
//! A Rust engine for optical music recognition on scanned sheet-music
//! pages: glyph classification against a trained shape model, compound
//! symbol formation, filament curve reconstruction, and parallel
//! per-system step execution.
//!
//! ## Components
//!
//! - **Shape Classification**: Grade candidate shapes for a glyph against
//!   a trained model, with optional blacklist and structural-check gates
//! - **Compound Formation**: Merge adjacent incomplete glyphs into larger
//!   symbols when the classifier confirms the merged result
//! - **Filament Reconstruction**: Fit natural splines through filament
//!   points and fill holes by interpolating between sibling filaments
//! - **Step Execution**: Fan a processing step out over the independent
//!   systems of a page, with per-system failure isolation and cooperative
//!   cancellation
//!
//! ## Modules
//!
//! * [`core`] - Error handling and shared result types
//! * [`geometry`] - Points and rectangles on the scanned page
//! * [`glyph`] - Glyphs, shapes, and shape evaluations
//! * [`sheet`] - The page model: scale, systems, glyph populations
//! * [`classifier`] - The shape evaluator contract and the trained classifier
//! * [`filament`] - Spline fitting and cross-sibling hole filling
//! * [`patterns`] - Population refinement heuristics such as compound formation
//! * [`step`] - Processing steps and their parallel runner
//!
//! ## Quick Start
//!
//! ```rust
//! use omr_engine::prelude::*;
//!
//! # fn main() -> OmrResult<()> {
//! // A page at 16 pixels of interline, with one system.
//! let mut sheet = Sheet::new(Scale::new(16));
//! let system = sheet.add_system();
//!
//! // Register a glyph and ask the trained classifier for its best shape.
//! let id = system.add_glyph(Glyph::new(Rectangle::new(120, 80, 20, 16), 230, 16));
//! let classifier = GlyphClassifier::global()?;
//!
//! let glyph = system.glyph(id).ok_or_else(|| OmrError::invalid_input("unknown glyph"))?;
//! if let Some(best) = classifier.vote(glyph, system, 0.1) {
//!     println!("{best}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod core;
pub mod filament;
pub mod geometry;
pub mod glyph;
pub mod patterns;
pub mod sheet;
pub mod step;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use omr_engine::prelude::*;
/// ```
///
/// Included items focus on the most common tasks: the sheet model, glyph
/// types, the trained classifier, and the step runner. For advanced
/// customization (descriptor parsing, filament reconstruction, pattern
/// engines), import directly from the respective modules.
pub mod prelude {
    pub use crate::classifier::{Condition, Conditions, GlyphClassifier, ShapeEvaluator};
    pub use crate::core::{OmrError, OmrResult};
    pub use crate::geometry::{Point2, Rectangle};
    pub use crate::glyph::{Evaluation, Glyph, GlyphId, Shape};
    pub use crate::sheet::{Scale, Sheet, SystemInfo};
    pub use crate::step::{CancelToken, StepReport, StepRunner, SystemStep};
}
