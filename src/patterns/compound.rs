//! Greedy compound formation around incomplete trigger glyphs.

use tracing::debug;

use crate::classifier::{grades, Conditions, ShapeEvaluator};
use crate::glyph::{GlyphId, Shape};
use crate::sheet::SystemInfo;

/// Per-system heuristic that merges a trigger glyph in a known incomplete
/// structural state with a geometrically adjacent glyph of the same
/// elementary shape, when the classifier confirms the merged symbol.
///
/// The scan is deliberately greedy: candidates are visited in ascending id
/// order and the first one the classifier accepts wins, without ranking the
/// alternatives. That enumeration order is part of the contract; switching
/// to a best-of-N policy would change observable merge outcomes.
pub struct CompoundPatternEngine<'a> {
    /// The elementary shape of triggers and candidates.
    target: Shape,
    evaluator: &'a dyn ShapeEvaluator,
}

impl<'a> CompoundPatternEngine<'a> {
    /// Creates an engine for the given elementary shape.
    pub fn new(target: Shape, evaluator: &'a dyn ShapeEvaluator) -> Self {
        Self { target, evaluator }
    }

    /// Runs the pattern over one system and returns the number of
    /// successful merges.
    ///
    /// Triggers are glyphs of the target shape, not manually assigned,
    /// with exactly one attached stem. For each trigger, every other glyph
    /// of the same shape whose bounding box intersects the trigger box
    /// inflated by one pixel is a candidate, excluding the trigger's own
    /// stem. The first candidate whose transient compound gets a
    /// non-rejecting plausibility vote is committed into the population
    /// with the vote attached; the constituents are left in place.
    ///
    /// A trigger with no candidates and a trigger whose candidates were
    /// all rejected both contribute zero; neither is an error.
    pub fn run_pattern(&self, system: &mut SystemInfo) -> usize {
        let mut merges = 0;

        let triggers: Vec<GlyphId> = system
            .glyphs()
            .filter(|g| {
                g.shape() == Some(self.target) && !g.is_manual() && g.stem_count() == 1
            })
            .filter_map(|g| g.id())
            .collect();

        for trigger_id in triggers {
            let Some(trigger) = system.glyph(trigger_id) else {
                continue;
            };
            debug!(trigger = trigger_id, shape = %self.target, "checking single-stem trigger");

            let stem = trigger.first_stem();
            let inflated = trigger.bounds().grown(1, 1);

            let candidates: Vec<GlyphId> = system
                .glyphs()
                .filter(|g| {
                    g.id() != Some(trigger_id)
                        && g.id() != stem
                        && g.shape() == Some(self.target)
                        && g.bounds().intersects(&inflated)
                })
                .filter_map(|g| g.id())
                .collect();

            for candidate in candidates {
                let Some(mut compound) =
                    system.build_transient_compound(&[trigger_id, candidate])
                else {
                    continue;
                };

                // A loose plausibility vote: no minimum grade, no gates.
                let vote = self.evaluator.vote_with(
                    &compound,
                    system,
                    grades::NO_MIN_GRADE,
                    Conditions::none(),
                    None,
                );

                if let Some(eval) = vote {
                    compound.set_evaluation(eval);
                    let id = system.add_glyph(compound);
                    let committed = system.glyph(id).expect("compound was just committed");
                    debug!(
                        compound = id,
                        shape = %committed.shape().expect("evaluation assigns a shape"),
                        "compound committed"
                    );
                    merges += 1;
                    break;
                }
            }
        }

        merges
    }
}
