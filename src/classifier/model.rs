//! The trained shape model: per-shape feature prototypes.
//!
//! Each training descriptor contributes one prototype row. Glyph features
//! are normalized by the glyph's own interline, so the model is resolution
//! independent. Grading is a Gaussian falloff on the squared feature
//! distance, collapsed to the best variant per shape.

use ndarray::{Array1, Array2};

use crate::core::{OmrError, OmrResult};
use crate::glyph::{Glyph, Shape};

use super::descriptor::ShapeDescriptor;

/// Number of features per prototype row.
pub const FEATURE_LEN: usize = 4;

/// Gaussian width of the grade falloff, in feature units.
const SIGMA: f64 = 1.0;

/// Computes the feature vector of a glyph: width, height (in interline
/// units), weight (in squared-interline units) and attached stem count.
pub fn glyph_features(glyph: &Glyph) -> Array1<f64> {
    let il = f64::from(glyph.interline().max(1));
    let bounds = glyph.bounds();
    Array1::from(vec![
        f64::from(bounds.width) / il,
        f64::from(bounds.height) / il,
        f64::from(glyph.weight()) / (il * il),
        glyph.stem_count() as f64,
    ])
}

/// Trained model mapping glyph features to graded shape candidates.
#[derive(Debug, Clone)]
pub struct ShapeModel {
    /// Shape of each prototype row.
    shapes: Vec<Shape>,
    /// One prototype row per training descriptor.
    prototypes: Array2<f64>,
}

impl ShapeModel {
    /// Builds a model from training descriptors.
    ///
    /// Fails when the descriptor set is empty, names an unknown shape,
    /// names the reserved noise shape, or carries a null interline. There
    /// is no fallback model.
    pub fn from_descriptors(descriptors: &[ShapeDescriptor]) -> OmrResult<Self> {
        if descriptors.is_empty() {
            return Err(OmrError::model_init("empty descriptor set"));
        }

        let mut shapes = Vec::with_capacity(descriptors.len());
        let mut flat = Vec::with_capacity(descriptors.len() * FEATURE_LEN);
        for descriptor in descriptors {
            let shape = descriptor.shape().ok_or_else(|| {
                OmrError::model_init(format!("unknown shape name '{}'", descriptor.name))
            })?;
            if shape == Shape::Noise {
                return Err(OmrError::model_init("NOISE is reserved, not trainable"));
            }
            if descriptor.interline == 0 {
                return Err(OmrError::model_init(format!(
                    "descriptor '{}' has a null interline",
                    descriptor.name
                )));
            }
            let (width, height, weight) = base_dimensions(shape);
            let stems = descriptor
                .stem_number
                .unwrap_or_else(|| default_stems(shape));
            shapes.push(shape);
            flat.extend_from_slice(&[width, height, weight, f64::from(stems)]);
        }

        let prototypes = Array2::from_shape_vec((shapes.len(), FEATURE_LEN), flat)
            .map_err(|e| OmrError::model_init(format!("prototype matrix: {e}")))?;
        Ok(Self { shapes, prototypes })
    }

    /// Number of prototype rows.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the model holds no prototypes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Grades every known shape against the glyph features.
    ///
    /// Variants of one shape collapse to their best grade. The result is
    /// in shape declaration order; each grade lies in `(0, 1]`.
    pub fn shape_grades(&self, features: &Array1<f64>) -> Vec<(Shape, f64)> {
        let mut best: std::collections::BTreeMap<Shape, f64> = std::collections::BTreeMap::new();
        for (row, &shape) in self.shapes.iter().enumerate() {
            let proto = self.prototypes.row(row);
            let diff = features - &proto;
            let dist2 = diff.dot(&diff);
            let grade = (-dist2 / (2.0 * SIGMA * SIGMA)).exp();
            let entry = best.entry(shape).or_insert(0.0);
            if grade > *entry {
                *entry = grade;
            }
        }
        best.into_iter().collect()
    }
}

/// Typical dimensions of a shape, in interline units: width, height and
/// pixel weight (the latter in squared-interline units).
fn base_dimensions(shape: Shape) -> (f64, f64, f64) {
    match shape {
        Shape::GClef => (2.0, 7.0, 6.0),
        Shape::FClef => (2.2, 3.0, 4.0),
        Shape::CClef => (2.0, 4.0, 5.0),
        Shape::Flat => (1.0, 2.5, 1.6),
        Shape::Sharp => (1.2, 3.0, 2.0),
        Shape::Natural => (1.0, 3.0, 1.8),
        Shape::CommonTime => (1.8, 2.0, 2.2),
        Shape::NoteheadBlack => (1.3, 1.0, 1.0),
        Shape::NoteheadVoid => (1.3, 1.0, 0.6),
        Shape::WholeNote => (1.7, 1.1, 0.8),
        Shape::QuarterRest => (1.0, 3.0, 1.5),
        Shape::EighthRest => (1.0, 2.0, 1.0),
        Shape::Flag => (1.0, 2.5, 1.0),
        Shape::AugmentationDot => (0.5, 0.5, 0.2),
        Shape::Stem => (0.25, 3.5, 0.9),
        Shape::Beam => (2.5, 0.8, 2.0),
        Shape::BeamTwo => (2.5, 2.0, 4.0),
        Shape::BeamThree => (2.5, 3.2, 6.0),
        Shape::BeamHook => (1.2, 0.8, 0.9),
        Shape::Text => (4.0, 1.5, 3.0),
        Shape::Noise => (0.0, 0.0, 0.0),
    }
}

/// Default attached-stem count when the descriptor does not say.
fn default_stems(shape: Shape) -> u32 {
    match shape {
        Shape::NoteheadBlack | Shape::NoteheadVoid | Shape::Flag => 1,
        Shape::Beam | Shape::BeamTwo | Shape::BeamThree => 2,
        Shape::BeamHook => 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rectangle;

    fn descriptor(name: &str, stems: Option<u32>) -> ShapeDescriptor {
        ShapeDescriptor {
            name: name.to_string(),
            interline: 16,
            stem_number: stems,
            with_ledger: None,
            pitch_position: None,
            ref_point: None,
        }
    }

    #[test]
    fn test_empty_descriptor_set_fails() {
        let err = ShapeModel::from_descriptors(&[]).unwrap_err();
        assert!(err.to_string().contains("empty descriptor set"));
    }

    #[test]
    fn test_unknown_name_fails() {
        let err = ShapeModel::from_descriptors(&[descriptor("WHAT", None)]).unwrap_err();
        assert!(err.to_string().contains("unknown shape name"));
    }

    #[test]
    fn test_noise_is_not_trainable() {
        assert!(ShapeModel::from_descriptors(&[descriptor("NOISE", None)]).is_err());
    }

    #[test]
    fn test_variants_collapse_to_best_grade() {
        let model = ShapeModel::from_descriptors(&[
            descriptor("BEAM", Some(1)),
            descriptor("BEAM", Some(2)),
        ])
        .unwrap();
        assert_eq!(model.len(), 2);

        // A one-stem beam glyph: the one-stem variant must dominate.
        let mut glyph = Glyph::new(Rectangle::new(0, 0, 40, 13), 512, 16);
        glyph.add_stem(9);
        let grades = model.shape_grades(&glyph_features(&glyph));
        assert_eq!(grades.len(), 1);
        let (shape, grade) = grades[0];
        assert_eq!(shape, Shape::Beam);
        assert!(grade > 0.9, "grade was {grade}");
    }

    #[test]
    fn test_grades_stay_in_unit_interval() {
        let model = ShapeModel::from_descriptors(&[
            descriptor("G_CLEF", None),
            descriptor("AUGMENTATION_DOT", None),
        ])
        .unwrap();
        let glyph = Glyph::new(Rectangle::new(0, 0, 30, 100), 1500, 16);
        for (_, grade) in model.shape_grades(&glyph_features(&glyph)) {
            assert!((0.0..=1.0).contains(&grade));
        }
    }
}
