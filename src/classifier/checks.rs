//! Shape-specific structural validators behind the `Checked` gate.

use crate::glyph::{Glyph, Shape};
use crate::sheet::SystemInfo;

/// Runs the structural checks of `shape` against the glyph.
///
/// Returns the rejection reason on failure. Shapes without specific checks
/// always pass.
pub(crate) fn structural_check(
    shape: Shape,
    glyph: &Glyph,
    _system: &SystemInfo,
) -> Result<(), &'static str> {
    let bounds = glyph.bounds();
    match shape {
        Shape::Stem => {
            // A stem is a thin vertical segment.
            if bounds.height < 4 * bounds.width.max(1) {
                return Err("stem not slender enough");
            }
        }
        Shape::Beam | Shape::BeamTwo | Shape::BeamThree | Shape::BeamHook => {
            if glyph.stem_count() == 0 {
                return Err("beam without attached stem");
            }
        }
        Shape::NoteheadBlack | Shape::NoteheadVoid | Shape::WholeNote => {
            let aspect = f64::from(bounds.width) / f64::from(bounds.height.max(1));
            if !(0.5..=2.5).contains(&aspect) {
                return Err("notehead aspect out of range");
            }
        }
        _ => {}
    }
    Ok(())
}
