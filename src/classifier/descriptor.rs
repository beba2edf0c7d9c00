//! Training descriptor records.
//!
//! A descriptor annotates one training sample: the shape name, the
//! interline of the source image, and optional structural details. Several
//! descriptors may share the same name to express shape variants (for
//! example one or two attached stems for the same beam shape).

use serde::{Deserialize, Serialize};

use crate::core::OmrResult;
use crate::glyph::Shape;

/// An integer reference point within a training sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefPoint {
    pub x: i32,
    pub y: i32,
}

/// One training descriptor record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeDescriptor {
    /// Related name, generally the name of the related shape.
    pub name: String,

    /// Interline value of the source image, in pixels.
    pub interline: u32,

    /// How many stems the sample is connected to.
    #[serde(
        rename = "stem-number",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub stem_number: Option<u32>,

    /// Whether the sample touches at least one ledger.
    #[serde(
        rename = "with-ledger",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub with_ledger: Option<bool>,

    /// Pitch position within the staff lines.
    #[serde(
        rename = "pitch-position",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub pitch_position: Option<f64>,

    /// Reference point of the sample.
    #[serde(rename = "ref-point", default, skip_serializing_if = "Option::is_none")]
    pub ref_point: Option<RefPoint>,
}

impl ShapeDescriptor {
    /// The shape this descriptor refers to, if its name is a known shape.
    pub fn shape(&self) -> Option<Shape> {
        Shape::parse(&self.name)
    }
}

/// Parses a JSON array of descriptor records.
pub fn parse_descriptors(json: &str) -> OmrResult<Vec<ShapeDescriptor>> {
    Ok(serde_json::from_str(json)?)
}
