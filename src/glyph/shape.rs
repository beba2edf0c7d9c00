//! The closed set of recognized musical symbol categories.

use serde::{Deserialize, Serialize};

/// A recognizable musical symbol category.
///
/// The declaration order is meaningful: when two evaluations carry the exact
/// same grade, the shape declared first wins. `Noise` is reserved for pixel
/// clusters too small to be classified and never appears in the trained
/// model.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Shape {
    GClef,
    FClef,
    CClef,
    Flat,
    Sharp,
    Natural,
    CommonTime,
    NoteheadBlack,
    NoteheadVoid,
    WholeNote,
    QuarterRest,
    EighthRest,
    Flag,
    AugmentationDot,
    Stem,
    Beam,
    BeamTwo,
    BeamThree,
    BeamHook,
    Text,
    /// Reserved for clusters below the classification weight threshold.
    Noise,
}

impl Shape {
    /// All shapes, in declaration order.
    pub const ALL: [Shape; 21] = [
        Shape::GClef,
        Shape::FClef,
        Shape::CClef,
        Shape::Flat,
        Shape::Sharp,
        Shape::Natural,
        Shape::CommonTime,
        Shape::NoteheadBlack,
        Shape::NoteheadVoid,
        Shape::WholeNote,
        Shape::QuarterRest,
        Shape::EighthRest,
        Shape::Flag,
        Shape::AugmentationDot,
        Shape::Stem,
        Shape::Beam,
        Shape::BeamTwo,
        Shape::BeamThree,
        Shape::BeamHook,
        Shape::Text,
        Shape::Noise,
    ];

    /// Parses a shape from its descriptor name.
    ///
    /// Returns `None` for unknown names; the caller decides whether that is
    /// an error (model building) or simply ignorable.
    pub fn parse(name: &str) -> Option<Shape> {
        let shape = match name {
            "G_CLEF" => Shape::GClef,
            "F_CLEF" => Shape::FClef,
            "C_CLEF" => Shape::CClef,
            "FLAT" => Shape::Flat,
            "SHARP" => Shape::Sharp,
            "NATURAL" => Shape::Natural,
            "COMMON_TIME" => Shape::CommonTime,
            "NOTEHEAD_BLACK" => Shape::NoteheadBlack,
            "NOTEHEAD_VOID" => Shape::NoteheadVoid,
            "WHOLE_NOTE" => Shape::WholeNote,
            "QUARTER_REST" => Shape::QuarterRest,
            "EIGHTH_REST" => Shape::EighthRest,
            "FLAG" => Shape::Flag,
            "AUGMENTATION_DOT" => Shape::AugmentationDot,
            "STEM" => Shape::Stem,
            "BEAM" => Shape::Beam,
            "BEAM_2" => Shape::BeamTwo,
            "BEAM_3" => Shape::BeamThree,
            "BEAM_HOOK" => Shape::BeamHook,
            "TEXT" => Shape::Text,
            "NOISE" => Shape::Noise,
            _ => return None,
        };
        Some(shape)
    }

    /// The descriptor name of this shape.
    pub fn name(&self) -> &'static str {
        match self {
            Shape::GClef => "G_CLEF",
            Shape::FClef => "F_CLEF",
            Shape::CClef => "C_CLEF",
            Shape::Flat => "FLAT",
            Shape::Sharp => "SHARP",
            Shape::Natural => "NATURAL",
            Shape::CommonTime => "COMMON_TIME",
            Shape::NoteheadBlack => "NOTEHEAD_BLACK",
            Shape::NoteheadVoid => "NOTEHEAD_VOID",
            Shape::WholeNote => "WHOLE_NOTE",
            Shape::QuarterRest => "QUARTER_REST",
            Shape::EighthRest => "EIGHTH_REST",
            Shape::Flag => "FLAG",
            Shape::AugmentationDot => "AUGMENTATION_DOT",
            Shape::Stem => "STEM",
            Shape::Beam => "BEAM",
            Shape::BeamTwo => "BEAM_2",
            Shape::BeamThree => "BEAM_3",
            Shape::BeamHook => "BEAM_HOOK",
            Shape::Text => "TEXT",
            Shape::Noise => "NOISE",
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
