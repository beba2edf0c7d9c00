//! Filament curve reconstruction: spline fitting and cross-sibling hole
//! filling for staff-line and stem filaments.

pub mod curve;
pub mod spline;

pub use curve::{fill_cluster_holes, Filament, FilamentParams};
pub use spline::NaturalSpline;
