//! Axis-aligned bounding boxes.

use crate::math::{Point, Real, Vector};

/// An axis-aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    /// The minimal coordinates of this AABB.
    pub mins: Point<Real>,
    /// The maximal coordinates of this AABB.
    pub maxs: Point<Real>,
}

impl Aabb {
    /// Creates an AABB from its extremal coordinates.
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Self {
        Self { mins, maxs }
    }

    /// Creates an AABB centered at `center` with the given half-extents.
    pub fn from_half_extents(center: Point<Real>, half_extents: Vector<Real>) -> Self {
        Self {
            mins: center - half_extents,
            maxs: center + half_extents,
        }
    }

    /// The smallest AABB containing all the given points.
    ///
    /// Returns `None` if `points` is empty.
    pub fn from_points(points: &[Point<Real>]) -> Option<Self> {
        let first = *points.first()?;
        let mut result = Self::new(first, first);

        for pt in &points[1..] {
            result.mins = result.mins.inf(pt);
            result.maxs = result.maxs.sup(pt);
        }

        Some(result)
    }

    /// The center of this AABB.
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// The extents of this AABB along each axis.
    pub fn extents(&self) -> Vector<Real> {
        self.maxs - self.mins
    }

    /// The half-extents of this AABB along each axis.
    pub fn half_extents(&self) -> Vector<Real> {
        self.extents() / 2.0
    }

    /// The length of the diagonal of this AABB.
    pub fn diagonal_length(&self) -> Real {
        self.extents().norm()
    }

    /// The volume enclosed by this AABB.
    pub fn volume(&self) -> Real {
        let e = self.extents();
        e.x * e.y * e.z
    }

    /// Does this AABB have finite coordinates and a non-negative extent on
    /// every axis?
    pub fn is_valid(&self) -> bool {
        self.mins.iter().chain(self.maxs.iter()).all(|e| e.is_finite())
            && self.extents().iter().all(|e| *e >= 0.0)
    }
}

#[cfg(test)]
mod test {
    use super::Aabb;
    use crate::math::Point;

    #[test]
    fn aabb_from_points() {
        let pts = [
            Point::new(1.0, -1.0, 0.5),
            Point::new(-2.0, 3.0, 0.0),
            Point::new(0.0, 0.0, 4.0),
        ];
        let aabb = Aabb::from_points(&pts).unwrap();
        assert_eq!(aabb.mins, Point::new(-2.0, -1.0, 0.0));
        assert_eq!(aabb.maxs, Point::new(1.0, 3.0, 4.0));
        assert!(aabb.is_valid());
        assert_eq!(Aabb::from_points(&[]), None);
    }

    #[test]
    fn aabb_volume() {
        let aabb = Aabb::new(Point::new(0.0, 0.0, 0.0), Point::new(2.0, 3.0, 4.0));
        assert_eq!(aabb.volume(), 24.0);
        assert_eq!(aabb.half_extents(), na::Vector3::new(1.0, 1.5, 2.0));
    }
}
