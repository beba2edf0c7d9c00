//! Filaments: sampled staff-line curves and cross-sibling hole filling.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{OmrError, OmrResult};
use crate::geometry::Point2;
use crate::sheet::{Fraction, Scale};

use super::spline::NaturalSpline;

/// Interline-scaled tuning of the hole-filling pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FilamentParams {
    /// Maximum length for holes without intermediate points, in pixels.
    pub max_hole_length: f64,
    /// Typical length used for virtual intermediate points, in pixels.
    pub virtual_segment_length: f64,
}

impl FilamentParams {
    /// Maximum hole length, in interline units.
    pub const MAX_HOLE_LENGTH: Fraction = Fraction(8.0);
    /// Virtual segment length, in interline units.
    pub const VIRTUAL_SEGMENT_LENGTH: Fraction = Fraction(6.0);

    /// Derives pixel thresholds from the sheet scale.
    pub fn from_scale(scale: &Scale) -> Self {
        Self {
            max_hole_length: scale.to_pixels_f64(Self::MAX_HOLE_LENGTH),
            virtual_segment_length: scale.to_pixels_f64(Self::VIRTUAL_SEGMENT_LENGTH),
        }
    }
}

/// An ordered sequence of 2-D samples approximating a long thin curve (a
/// staff line or a stem), plus its fitted smooth curve.
///
/// The cluster position is the filament's rank among the roughly parallel
/// sibling filaments of one staff; it drives interpolation only, never
/// identity.
#[derive(Debug, Clone)]
pub struct Filament {
    points: Vec<Point2>,
    spline: NaturalSpline,
    cluster_pos: i32,
}

impl Filament {
    /// Creates a filament from its recorded samples.
    ///
    /// The samples must be non-empty and strictly increasing in x.
    pub fn new(cluster_pos: i32, points: Vec<Point2>) -> OmrResult<Self> {
        if points.is_empty() {
            return Err(OmrError::invalid_input("filament needs at least one point"));
        }
        if points.windows(2).any(|w| w[1].x <= w[0].x) {
            return Err(OmrError::invalid_input(
                "filament points must be strictly increasing in x",
            ));
        }
        let spline = NaturalSpline::interpolate(&points);
        Ok(Self {
            points,
            spline,
            cluster_pos,
        })
    }

    /// The recorded samples, in x order.
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// The rank of this filament within its cluster of siblings.
    pub fn cluster_pos(&self) -> i32 {
        self.cluster_pos
    }

    /// The fitted curve ordinate at the given abscissa.
    pub fn position_at(&self, x: f64) -> f64 {
        self.spline.y_at(x)
    }

    /// The recorded sample closest to `x`, if one lies within `margin`.
    pub fn find_point(&self, x: f64, margin: f64) -> Option<Point2> {
        let mut best: Option<(f64, Point2)> = None;
        for point in &self.points {
            let distance = (point.x - x).abs();
            if distance <= margin && best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, *point));
            }
        }
        best.map(|(_, point)| point)
    }

    /// Fills large holes in this filament by interpolating between sibling
    /// filaments of the same cluster.
    ///
    /// A hole is the x-span between two consecutive recorded points; it is
    /// filled with evenly spaced virtual points when longer than
    /// `params.max_hole_length`. Each virtual point is interpolated between
    /// the nearest sibling above and the nearest sibling below that carry a
    /// recorded point near the candidate abscissa, weighted by cluster
    /// rank. Both references are required: extrapolating from one side is
    /// not reliable, so a one-sided candidate falls back to this filament's
    /// own current fitted curve.
    ///
    /// The spans before the first and after the last recorded point are
    /// never treated as holes. When at least one point was inserted, the
    /// curve is refit over the augmented samples; otherwise both samples
    /// and curve are left untouched, making the call idempotent.
    ///
    /// `above` holds the siblings ranked strictly above this filament, in
    /// rank order; `below` those ranked strictly below, in rank order.
    /// Returns the number of inserted points.
    pub fn fill_holes(
        &mut self,
        params: &FilamentParams,
        above: &[Filament],
        below: &[Filament],
    ) -> usize {
        let margin = params.virtual_segment_length / 2.0;
        let mut inserted = 0usize;
        let mut hole_start: Option<f64> = None;
        let mut ip = 0;

        while ip < self.points.len() {
            let hole_stop = self.points[ip].x;
            if let Some(start) = hole_start {
                let hole_length = hole_stop - start;
                if hole_length > params.max_hole_length {
                    let insert =
                        (hole_length / params.virtual_segment_length).round() as i64 - 1;
                    if insert > 0 {
                        debug!(
                            before = ip,
                            insert,
                            pos = self.cluster_pos,
                            "filling filament hole"
                        );
                        let dx = hole_length / (insert as f64 + 1.0);
                        for i in 1..=insert {
                            let x = (start + i as f64 * dx).round();
                            let point = self
                                .find_insertion(x, margin, above, below)
                                .unwrap_or_else(|| Point2::new(x, self.position_at(x)));
                            self.points.insert(ip, point);
                            ip += 1;
                            inserted += 1;
                        }
                    }
                }
            }
            hole_start = Some(self.points[ip].x);
            ip += 1;
        }

        if inserted > 0 {
            // Regenerate the underlying curve over the augmented samples.
            self.spline = NaturalSpline::interpolate(&self.points);
        }
        inserted
    }

    /// Interpolates a virtual point at the preferred abscissa from sibling
    /// references above and below, or refuses with `None` when either side
    /// lacks a reference within the margin.
    fn find_insertion(
        &self,
        x: f64,
        margin: f64,
        above: &[Filament],
        below: &[Filament],
    ) -> Option<Point2> {
        // Nearest ranked sibling first, on each side.
        let (above_pos, above_ref) = above
            .iter()
            .rev()
            .find_map(|f| f.find_point(x, margin).map(|p| (f.cluster_pos, p)))?;
        let (below_pos, below_ref) = below
            .iter()
            .find_map(|f| f.find_point(x, margin).map(|p| (f.cluster_pos, p)))?;

        let ratio = f64::from(self.cluster_pos - above_pos) / f64::from(below_pos - above_pos);
        Some(Point2::new(
            (1.0 - ratio) * above_ref.x + ratio * below_ref.x,
            (1.0 - ratio) * above_ref.y + ratio * below_ref.y,
        ))
    }
}

/// Runs the hole-filling pass over a whole cluster of parallel filaments,
/// ordered by rank. Returns the total number of inserted points.
pub fn fill_cluster_holes(filaments: &mut [Filament], params: &FilamentParams) -> usize {
    let mut inserted = 0;
    for i in 0..filaments.len() {
        let (above, rest) = filaments.split_at_mut(i);
        let (filament, below) = rest.split_first_mut().expect("index is in range");
        inserted += filament.fill_holes(params, above, below);
    }
    inserted
}
