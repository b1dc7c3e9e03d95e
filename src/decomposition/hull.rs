use crate::math::{Point, Real};
use crate::shape::Tetrahedron;
use crate::utils;

/// A convex hull produced by a decomposition.
///
/// The triangles are counter-clockwise seen from outside and form a closed
/// surface. Degenerate clusters can produce flat (zero-volume) hulls.
pub struct ConvexHull {
    points: Vec<Point<Real>>,
    triangles: Vec<[u32; 3]>,
    volume: Real,
    center: Point<Real>,
}

impl ConvexHull {
    /// Creates a hull from its points and triangles, caching its volume and
    /// centroid.
    pub(super) fn new(points: Vec<Point<Real>>, triangles: Vec<[u32; 3]>) -> Self {
        let volume = convex_volume(&points, &triangles);
        let center = if points.is_empty() {
            Point::origin()
        } else {
            utils::center(&points)
        };

        Self {
            points,
            triangles,
            volume,
            center,
        }
    }

    /// The points of this hull.
    pub fn points(&self) -> &[Point<Real>] {
        &self.points
    }

    /// The triangles of this hull, as indices into [`points`](Self::points).
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// The volume enclosed by this hull.
    pub fn volume(&self) -> Real {
        self.volume
    }

    /// The centroid of the points of this hull.
    pub fn center(&self) -> Point<Real> {
        self.center
    }

    /// The points of this hull as a flat array of coordinates, three per
    /// point.
    pub fn flat_points(&self) -> Vec<Real> {
        self.points
            .iter()
            .flat_map(|pt| [pt.x, pt.y, pt.z])
            .collect()
    }

    /// The triangles of this hull as a flat array of indices, three per
    /// triangle.
    pub fn flat_triangles(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }
}

/// The volume enclosed by a closed convex triangulated surface, computed as a
/// tetrahedron fan from the centroid.
pub(super) fn convex_volume(points: &[Point<Real>], triangles: &[[u32; 3]]) -> Real {
    if points.is_empty() || triangles.is_empty() {
        return 0.0;
    }

    let barycenter = utils::center(points);
    let mut total_volume = 0.0;

    for tri in triangles {
        let tetra = Tetrahedron::new(
            points[tri[0] as usize],
            points[tri[1] as usize],
            points[tri[2] as usize],
            barycenter,
        );
        total_volume += tetra.volume();
    }

    total_volume
}
