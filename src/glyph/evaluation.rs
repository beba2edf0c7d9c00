//! Classifier verdicts: a shape paired with a confidence grade.

use std::cmp::Ordering;

use super::Shape;

/// An immutable (shape, grade) pair produced by a shape evaluator.
///
/// The grade lies in `[0, 1]`. When a structural check rejected the shape
/// for the glyph at hand, `failure` carries the reason; such evaluations are
/// excluded from queries that request the `Checked` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// The candidate shape.
    pub shape: Shape,
    /// Confidence grade in `[0, 1]`.
    pub grade: f64,
    /// Reason a structural check rejected this shape, if any.
    pub failure: Option<&'static str>,
}

impl Evaluation {
    /// Creates an evaluation with no structural failure attached.
    pub fn new(shape: Shape, grade: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&grade));
        Self {
            shape,
            grade,
            failure: None,
        }
    }

    /// Total ordering for evaluation lists: grade descending, then shape
    /// declaration order. Deterministic for equal grades.
    pub fn order(a: &Evaluation, b: &Evaluation) -> Ordering {
        b.grade
            .total_cmp(&a.grade)
            .then_with(|| a.shape.cmp(&b.shape))
    }
}

impl std::fmt::Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:.3}", self.shape, self.grade)?;
        if let Some(failure) = self.failure {
            write!(f, " (failed: {})", failure)?;
        }
        Ok(())
    }
}
