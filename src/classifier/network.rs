//! The trained glyph classifier and its process-wide shared instance.

use itertools::Itertools;
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::core::OmrResult;
use crate::glyph::{Evaluation, Glyph, Shape};
use crate::sheet::SystemInfo;

use super::checks::structural_check;
use super::descriptor::{parse_descriptors, ShapeDescriptor};
use super::model::{glyph_features, ShapeModel};
use super::{Condition, Conditions, ShapeEvaluator, ShapePredicate};

/// Minimum glyph weight, as a fraction of the squared interline. Anything
/// lighter is just noise.
const MIN_WEIGHT_FRACTION: f64 = 0.19;

/// Training descriptors bundled with the crate.
const BUILTIN_DESCRIPTORS: &str = include_str!("builtin_model.json");

/// The shared classifier, loaded once on first use and immutable for the
/// process lifetime.
static GLOBAL: OnceCell<GlyphClassifier> = OnceCell::new();

/// Shape classifier backed by a trained [`ShapeModel`].
///
/// Read-only once built; a single instance serves all concurrent system
/// tasks without locking.
#[derive(Debug)]
pub struct GlyphClassifier {
    name: String,
    model: ShapeModel,
}

impl GlyphClassifier {
    /// Builds a classifier from training descriptors.
    pub fn from_descriptors(descriptors: &[ShapeDescriptor]) -> OmrResult<Self> {
        let model = ShapeModel::from_descriptors(descriptors)?;
        debug!(prototypes = model.len(), "glyph classifier ready");
        Ok(Self {
            name: "glyph-network".to_string(),
            model,
        })
    }

    /// The process-wide classifier, built from the bundled descriptors.
    ///
    /// Initialization happens once, lazily, on first call; a corrupt
    /// descriptor set surfaces immediately as an error and is never
    /// replaced by a silent default.
    pub fn global() -> OmrResult<&'static GlyphClassifier> {
        GLOBAL.get_or_try_init(|| {
            let descriptors = parse_descriptors(BUILTIN_DESCRIPTORS)?;
            Self::from_descriptors(&descriptors)
        })
    }

    /// Grades per shape, predicate applied, in shape declaration order.
    fn graded_shapes(
        &self,
        glyph: &Glyph,
        predicate: Option<ShapePredicate>,
    ) -> Vec<(Shape, f64)> {
        self.model
            .shape_grades(&glyph_features(glyph))
            .into_iter()
            .filter(|&(shape, _)| predicate.map_or(true, |accepts| accepts(shape)))
            .collect()
    }
}

impl ShapeEvaluator for GlyphClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_big_enough(&self, glyph: &Glyph) -> bool {
        let il = f64::from(glyph.interline().max(1));
        f64::from(glyph.weight()) >= MIN_WEIGHT_FRACTION * il * il
    }

    fn evaluate(
        &self,
        glyph: &Glyph,
        system: &SystemInfo,
        count: usize,
        min_grade: f64,
        conditions: Conditions,
        predicate: Option<ShapePredicate>,
    ) -> Vec<Evaluation> {
        if !self.is_big_enough(glyph) {
            return Vec::new();
        }

        self.graded_shapes(glyph, predicate)
            .into_iter()
            .filter(|&(shape, _)| {
                !conditions.contains(Condition::Allowed) || glyph.is_allowed(shape)
            })
            .map(|(shape, grade)| {
                let mut eval = Evaluation::new(shape, grade);
                eval.failure = structural_check(shape, glyph, system).err();
                eval
            })
            .filter(|eval| !conditions.contains(Condition::Checked) || eval.failure.is_none())
            .filter(|eval| eval.grade >= min_grade)
            .sorted_by(Evaluation::order)
            .take(count)
            .collect()
    }

    fn raw_vote(
        &self,
        glyph: &Glyph,
        min_grade: f64,
        predicate: Option<ShapePredicate>,
    ) -> Option<Evaluation> {
        if !self.is_big_enough(glyph) {
            return None;
        }

        self.graded_shapes(glyph, predicate)
            .into_iter()
            .filter(|&(shape, _)| glyph.is_allowed(shape))
            .map(|(shape, grade)| Evaluation::new(shape, grade))
            .filter(|eval| eval.grade >= min_grade)
            .min_by(Evaluation::order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rectangle;

    fn classifier() -> GlyphClassifier {
        let descriptors = parse_descriptors(BUILTIN_DESCRIPTORS).unwrap();
        GlyphClassifier::from_descriptors(&descriptors).unwrap()
    }

    /// A glyph shaped like a black notehead at interline 16.
    fn notehead() -> Glyph {
        let mut g = Glyph::new(Rectangle::new(0, 0, 21, 16), 256, 16);
        g.add_stem(42);
        g
    }

    #[test]
    fn test_evaluate_contract() {
        let classifier = classifier();
        let system = SystemInfo::new(1);
        let glyph = notehead();

        let evals = classifier.evaluate(&glyph, &system, 3, 0.01, Conditions::none(), None);
        assert!(!evals.is_empty());
        assert!(evals.len() <= 3);
        for pair in evals.windows(2) {
            assert!(pair[0].grade >= pair[1].grade);
        }
        for eval in &evals {
            assert!(eval.grade >= 0.01);
            assert!((0.0..=1.0).contains(&eval.grade));
        }
        assert_eq!(evals[0].shape, Shape::NoteheadBlack);
    }

    #[test]
    fn test_evaluate_honors_predicate() {
        let classifier = classifier();
        let system = SystemInfo::new(1);
        let glyph = notehead();

        let only_rests: ShapePredicate =
            &|s| matches!(s, Shape::QuarterRest | Shape::EighthRest);
        let evals =
            classifier.evaluate(&glyph, &system, 10, 0.0, Conditions::none(), Some(only_rests));
        assert!(evals
            .iter()
            .all(|e| matches!(e.shape, Shape::QuarterRest | Shape::EighthRest)));
    }

    #[test]
    fn test_allowed_gate_excludes_blacklisted_shape() {
        let classifier = classifier();
        let system = SystemInfo::new(1);
        let mut glyph = notehead();
        glyph.forbid_shape(Shape::NoteheadBlack);

        let conditions = Conditions::none().with(Condition::Allowed);
        let evals = classifier.evaluate(&glyph, &system, 5, 0.0, conditions, None);
        assert!(evals.iter().all(|e| e.shape != Shape::NoteheadBlack));

        // Without the gate the blacklist is ignored.
        let evals = classifier.evaluate(&glyph, &system, 5, 0.0, Conditions::none(), None);
        assert!(evals.iter().any(|e| e.shape == Shape::NoteheadBlack));
    }

    #[test]
    fn test_checked_gate_excludes_structural_failures() {
        let classifier = classifier();
        let system = SystemInfo::new(1);
        // A beam-sized glyph with no attached stem.
        let glyph = Glyph::new(Rectangle::new(0, 0, 40, 13), 512, 16);

        let unchecked = classifier.evaluate(&glyph, &system, 21, 0.0, Conditions::none(), None);
        let beam = unchecked.iter().find(|e| e.shape == Shape::Beam).unwrap();
        assert_eq!(beam.failure, Some("beam without attached stem"));

        let checked = classifier.evaluate(
            &glyph,
            &system,
            21,
            0.0,
            Conditions::none().with(Condition::Checked),
            None,
        );
        assert!(checked.iter().all(|e| e.shape != Shape::Beam));
    }

    #[test]
    fn test_vote_none_iff_evaluate_empty() {
        let classifier = classifier();
        let system = SystemInfo::new(1);
        let glyph = notehead();

        // Plausible query: both answer.
        let vote = classifier.vote(&glyph, &system, 0.01);
        let evals = classifier.evaluate(&glyph, &system, 1, 0.01, Conditions::all(), None);
        assert_eq!(vote.is_some(), !evals.is_empty());
        assert_eq!(vote.unwrap(), evals[0].clone());

        // Impossible grade: both refuse.
        let vote = classifier.vote(&glyph, &system, 1.1);
        let evals = classifier.evaluate(&glyph, &system, 1, 1.1, Conditions::all(), None);
        assert!(vote.is_none());
        assert!(evals.is_empty());
    }

    #[test]
    fn test_raw_vote_ignores_checked_gate() {
        let classifier = classifier();
        // Beam-sized glyph without stem: the Checked gate would reject the
        // beam shapes, the raw screening path must not.
        let glyph = Glyph::new(Rectangle::new(0, 0, 40, 13), 512, 16);
        let raw = classifier.raw_vote(&glyph, 0.0, None);
        assert!(raw.is_some());
        assert!(raw.unwrap().failure.is_none());
    }

    #[test]
    fn test_noise_never_reaches_the_model() {
        let classifier = classifier();
        let system = SystemInfo::new(1);
        // Weight 10 is far below 0.19 * 16^2.
        let speck = Glyph::new(Rectangle::new(0, 0, 3, 3), 10, 16);
        assert!(!classifier.is_big_enough(&speck));
        assert!(classifier
            .evaluate(&speck, &system, 5, 0.0, Conditions::none(), None)
            .is_empty());
        assert!(classifier.raw_vote(&speck, 0.0, None).is_none());
    }

    #[test]
    fn test_global_is_shared_and_stable() {
        let a = GlyphClassifier::global().unwrap();
        let b = GlyphClassifier::global().unwrap();
        assert!(std::ptr::eq(a, b));
        assert_eq!(a.name(), "glyph-network");
    }
}
