//! Shape classification: the evaluator contract and its trained
//! implementation.
//!
//! The [`ShapeEvaluator`] trait is the only boundary through which shape
//! knowledge enters the engine. It answers three query forms over one
//! trained model: a ranked evaluation list (`evaluate`), a cheap best guess
//! under the `Allowed` gate only (`raw_vote`), and a gated best guess
//! (`vote` and variants). Upstream heuristics such as compound formation
//! reuse this single oracle instead of re-implementing thresholds.

mod checks;
pub mod descriptor;
pub mod model;
pub mod network;

pub use descriptor::{parse_descriptors, RefPoint, ShapeDescriptor};
pub use model::ShapeModel;
pub use network::GlyphClassifier;

use crate::glyph::{Evaluation, Glyph, Shape};
use crate::sheet::SystemInfo;

/// Grade thresholds shared by classifier callers.
pub mod grades {
    /// Accept any grade; used by loose plausibility checks such as
    /// compound confirmation.
    pub const NO_MIN_GRADE: f64 = 0.0;
}

/// Optional gates a caller can request on an evaluation query.
///
/// Neither gate is ever implied: a bare `evaluate` or `raw_vote` call
/// applies exactly what the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// The shape is not blacklisted by the glyph at hand.
    Allowed,
    /// All shape-specific structural checks passed.
    Checked,
}

/// A set of requested [`Condition`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Conditions {
    allowed: bool,
    checked: bool,
}

impl Conditions {
    /// The empty condition set.
    pub fn none() -> Self {
        Self::default()
    }

    /// Both `Allowed` and `Checked`.
    pub fn all() -> Self {
        Self {
            allowed: true,
            checked: true,
        }
    }

    /// Returns this set with the given condition added.
    pub fn with(mut self, condition: Condition) -> Self {
        match condition {
            Condition::Allowed => self.allowed = true,
            Condition::Checked => self.checked = true,
        }
        self
    }

    /// Whether the set contains the given condition.
    pub fn contains(&self, condition: Condition) -> bool {
        match condition {
            Condition::Allowed => self.allowed,
            Condition::Checked => self.checked,
        }
    }
}

/// A caller-supplied acceptance test over shapes; absence means accept all.
pub type ShapePredicate<'a> = &'a dyn Fn(Shape) -> bool;

/// The features of a glyph shape evaluator.
///
/// Implementations are read-only and safely shared across concurrent
/// callers once their trained model is loaded.
pub trait ShapeEvaluator: Sync {
    /// The declared name of this evaluator, for provenance.
    fn name(&self) -> &str;

    /// Weight-threshold test: glyphs below the threshold are just
    /// [`Shape::Noise`] and never reach the model.
    fn is_big_enough(&self, glyph: &Glyph) -> bool;

    /// Reports the sorted sequence of best evaluations for the glyph.
    ///
    /// Every returned evaluation has a grade at least `min_grade`, passes
    /// every requested condition, and passes `predicate` when supplied.
    /// The list is sorted by grade descending (ties broken by shape
    /// declaration order), never exceeds `count` entries, and is empty
    /// when nothing qualifies.
    fn evaluate(
        &self,
        glyph: &Glyph,
        system: &SystemInfo,
        count: usize,
        min_grade: f64,
        conditions: Conditions,
        predicate: Option<ShapePredicate>,
    ) -> Vec<Evaluation>;

    /// Best single evaluation considering only the `Allowed` gate (not
    /// `Checked`); the cheap screening path before expensive structural
    /// validation. Returns `None` when no shape clears `min_grade`.
    fn raw_vote(
        &self,
        glyph: &Glyph,
        min_grade: f64,
        predicate: Option<ShapePredicate>,
    ) -> Option<Evaluation>;

    /// Best evaluation under the default `Allowed` and `Checked` gates.
    fn vote(&self, glyph: &Glyph, system: &SystemInfo, min_grade: f64) -> Option<Evaluation> {
        self.vote_with(glyph, system, min_grade, Conditions::all(), None)
    }

    /// Best evaluation under the default gates, restricted to shapes
    /// matching `predicate`.
    fn vote_filtered(
        &self,
        glyph: &Glyph,
        system: &SystemInfo,
        min_grade: f64,
        predicate: Option<ShapePredicate>,
    ) -> Option<Evaluation> {
        self.vote_with(glyph, system, min_grade, Conditions::all(), predicate)
    }

    /// Best evaluation under explicit conditions and predicate.
    ///
    /// Returns `None` exactly when the equivalent single-entry `evaluate`
    /// call returns an empty list.
    fn vote_with(
        &self,
        glyph: &Glyph,
        system: &SystemInfo,
        min_grade: f64,
        conditions: Conditions,
        predicate: Option<ShapePredicate>,
    ) -> Option<Evaluation> {
        self.evaluate(glyph, system, 1, min_grade, conditions, predicate)
            .into_iter()
            .next()
    }
}
