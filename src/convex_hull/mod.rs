//! 3D convex hull computation.

pub use self::convex_hull::{convex_hull, try_convex_hull};
pub use self::error::ConvexHullError;
pub use self::validation::check_convex_hull;

mod convex_hull;
mod error;
mod face;
mod initial_hull;
mod validation;

/// Minimal signed distance (in normalized coordinates) for a point to be
/// considered strictly above a face plane.
pub(crate) const VISIBILITY_EPSILON: crate::math::Real = 1.0e-10;

/// Threshold (in normalized coordinates) below which an extent is considered
/// collapsed when detecting degenerate point sets.
pub(crate) const DEGENERACY_EPSILON: crate::math::Real = 1.0e-9;
