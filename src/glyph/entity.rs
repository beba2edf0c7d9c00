//! The glyph entity: an identifiable connected pixel cluster.

use std::collections::HashSet;

use crate::geometry::Rectangle;

use super::{Evaluation, Shape};

/// Identifier of a glyph, unique within its owning system.
pub type GlyphId = u32;

/// A connected cluster of foreground pixels treated as one recognizable
/// unit.
///
/// A glyph is created either from raw segmentation or synthetically as a
/// transient compound built from constituent glyphs. A transient glyph has
/// no id; it receives one when committed into a system's population, and
/// that id is stable for the glyph's lifetime.
#[derive(Debug, Clone)]
pub struct Glyph {
    /// Population id, `None` while the glyph is transient.
    id: Option<GlyphId>,
    /// Bounding box in sheet pixel coordinates.
    bounds: Rectangle,
    /// Pixel count (or equivalent mass).
    weight: u32,
    /// Interline value of the containing image, in pixels.
    interline: u32,
    /// Assigned shape, if any.
    shape: Option<Shape>,
    /// Evaluation that produced the assigned shape, if any.
    evaluation: Option<Evaluation>,
    /// Operator-assigned shapes are never auto-reclassified.
    manual: bool,
    /// Marked for later visual inspection.
    flagged: bool,
    /// Ids of attached stem glyphs.
    stems: Vec<GlyphId>,
    /// Ids of constituents, for compounds only.
    parts: Vec<GlyphId>,
    /// Shapes blacklisted for this specific glyph instance.
    forbidden: HashSet<Shape>,
}

impl Glyph {
    /// Creates a transient glyph from segmentation data.
    pub fn new(bounds: Rectangle, weight: u32, interline: u32) -> Self {
        Self {
            id: None,
            bounds,
            weight,
            interline,
            shape: None,
            evaluation: None,
            manual: false,
            flagged: false,
            stems: Vec::new(),
            parts: Vec::new(),
            forbidden: HashSet::new(),
        }
    }

    /// Builds a transient compound from constituent glyphs.
    ///
    /// The bounding box is the union of the constituents, the weight their
    /// sum, and the attached stems the union of their stems. The compound
    /// carries no id until committed.
    pub fn compound_of(parts: &[(GlyphId, &Glyph)]) -> Option<Self> {
        let (&(_, first), rest) = parts.split_first()?;
        let mut bounds = first.bounds;
        let mut weight = first.weight;
        let mut stems: Vec<GlyphId> = first.stems.clone();
        for &(_, part) in rest {
            bounds = bounds.union(&part.bounds);
            weight += part.weight;
            for &stem in &part.stems {
                if !stems.contains(&stem) {
                    stems.push(stem);
                }
            }
        }
        let part_ids: Vec<GlyphId> = parts.iter().map(|&(id, _)| id).collect();
        // A constituent cannot also be an attached stem of the compound.
        stems.retain(|stem| !part_ids.contains(stem));
        let mut compound = Glyph::new(bounds, weight, first.interline);
        compound.stems = stems;
        compound.parts = part_ids;
        Some(compound)
    }

    /// The population id, `None` while transient.
    pub fn id(&self) -> Option<GlyphId> {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: GlyphId) {
        debug_assert!(self.id.is_none(), "glyph id is assigned exactly once");
        self.id = Some(id);
    }

    /// The bounding box of this glyph.
    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    /// The pixel count (or equivalent mass) of this glyph.
    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// The interline value of the containing image, in pixels.
    pub fn interline(&self) -> u32 {
        self.interline
    }

    /// The assigned shape, if any.
    pub fn shape(&self) -> Option<Shape> {
        self.shape
    }

    /// Assigns a shape without marking it manual.
    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = Some(shape);
    }

    /// Assigns an operator-chosen shape; such glyphs are never
    /// auto-reclassified.
    pub fn set_manual_shape(&mut self, shape: Shape) {
        self.shape = Some(shape);
        self.manual = true;
    }

    /// Whether the shape was assigned by an operator.
    pub fn is_manual(&self) -> bool {
        self.manual
    }

    /// The evaluation that produced the assigned shape, if any.
    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.evaluation.as_ref()
    }

    /// Records an evaluation and assigns its shape.
    pub fn set_evaluation(&mut self, evaluation: Evaluation) {
        self.shape = Some(evaluation.shape);
        self.evaluation = Some(evaluation);
    }

    /// Marks this glyph for later visual inspection.
    pub fn flag_for_inspection(&mut self) {
        self.flagged = true;
    }

    /// Whether this glyph is marked for inspection.
    pub fn is_flagged(&self) -> bool {
        self.flagged
    }

    /// Attaches a stem glyph reference.
    pub fn add_stem(&mut self, stem: GlyphId) {
        if !self.stems.contains(&stem) {
            self.stems.push(stem);
        }
    }

    /// Number of attached stems.
    pub fn stem_count(&self) -> usize {
        self.stems.len()
    }

    /// The first attached stem, if any.
    pub fn first_stem(&self) -> Option<GlyphId> {
        self.stems.first().copied()
    }

    /// Ids of the constituent glyphs, empty for elementary glyphs.
    pub fn parts(&self) -> &[GlyphId] {
        &self.parts
    }

    /// Blacklists a shape for this specific glyph instance.
    pub fn forbid_shape(&mut self, shape: Shape) {
        self.forbidden.insert(shape);
    }

    /// Whether the given shape is not blacklisted for this glyph.
    pub fn is_allowed(&self, shape: Shape) -> bool {
        !self.forbidden.contains(&shape)
    }
}
