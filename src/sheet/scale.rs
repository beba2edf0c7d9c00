//! Interline-based scaling of geometric thresholds.
//!
//! All length thresholds in the engine are expressed as fractions of the
//! interline value, never in raw pixels, so they follow the image
//! resolution.

use serde::{Deserialize, Serialize};

/// A length expressed in interline fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fraction(pub f64);

/// Per-image resolution unit: the vertical distance between two staff
/// lines, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scale {
    interline: u32,
}

impl Scale {
    /// Creates a scale from the measured interline value.
    pub fn new(interline: u32) -> Self {
        Self { interline }
    }

    /// The interline value in pixels.
    pub fn interline(&self) -> u32 {
        self.interline
    }

    /// Converts an interline fraction to a rounded pixel count.
    pub fn to_pixels(&self, fraction: Fraction) -> i32 {
        self.to_pixels_f64(fraction).round() as i32
    }

    /// Converts an interline fraction to an exact pixel length.
    pub fn to_pixels_f64(&self, fraction: Fraction) -> f64 {
        fraction.0 * f64::from(self.interline)
    }
}
