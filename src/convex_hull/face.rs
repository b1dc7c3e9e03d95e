use crate::math::{Point, Real, Vector};
use crate::shape::Triangle;

/// A triangular face of the hull being built, with the set of points that lie
/// strictly above its supporting plane (its conflict list).
pub(super) struct HullFace {
    pub pts: [u32; 3],
    pub normal: Vector<Real>,
    pub offset: Real,
    pub alive: bool,
    /// A face whose three vertices are (nearly) collinear. It carries no
    /// usable plane, so it is considered visible from every point.
    pub degenerate: bool,
    pub conflicts: Vec<u32>,
    pub furthest: u32,
    pub furthest_dist: Real,
}

impl HullFace {
    pub fn new(a: u32, b: u32, c: u32, points: &[Point<Real>]) -> Self {
        let tri = Triangle::new(
            points[a as usize],
            points[b as usize],
            points[c as usize],
        );
        let scaled = tri.scaled_normal();
        let norm = scaled.norm();
        let degenerate = norm < 1.0e-14;

        let (normal, offset) = if degenerate {
            (Vector::zeros(), 0.0)
        } else {
            let normal = scaled / norm;
            (normal, normal.dot(&points[a as usize].coords))
        };

        Self {
            pts: [a, b, c],
            normal,
            offset,
            alive: true,
            degenerate,
            conflicts: Vec::new(),
            furthest: u32::MAX,
            furthest_dist: 0.0,
        }
    }

    /// Signed distance from the supporting plane to `pt`.
    pub fn distance_to(&self, pt: &Point<Real>) -> Real {
        self.normal.dot(&pt.coords) - self.offset
    }

    /// Can this face be seen from `pt`?
    ///
    /// A degenerate face can be seen from every point so that it never
    /// survives an insertion happening next to it.
    pub fn can_be_seen_from(&self, pt: &Point<Real>) -> bool {
        self.degenerate || self.distance_to(pt) > super::VISIBILITY_EPSILON
    }

    /// Adds `id` to the conflict list if it lies strictly above this face.
    /// Returns `true` on success.
    pub fn try_add_conflict(&mut self, id: u32, points: &[Point<Real>]) -> bool {
        if self.degenerate {
            return false;
        }

        let dist = self.distance_to(&points[id as usize]);

        if dist > super::VISIBILITY_EPSILON {
            if dist > self.furthest_dist {
                self.furthest_dist = dist;
                self.furthest = id;
            }

            self.conflicts.push(id);
            true
        } else {
            false
        }
    }

    /// The three directed edges of this face, in winding order.
    pub fn edges(&self) -> [(u32, u32); 3] {
        let [a, b, c] = self.pts;
        [(a, b), (b, c), (c, a)]
    }
}
