//! Simple value shapes used by the decomposition pipeline.

use crate::math::{Matrix, Point, Real, Vector};

/// A triangle defined by its three vertices.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Triangle {
    /// The first vertex of the triangle.
    pub a: Point<Real>,
    /// The second vertex of the triangle.
    pub b: Point<Real>,
    /// The third vertex of the triangle.
    pub c: Point<Real>,
}

impl Triangle {
    /// Creates a triangle from its three vertices.
    pub fn new(a: Point<Real>, b: Point<Real>, c: Point<Real>) -> Self {
        Self { a, b, c }
    }

    /// The non-normalized counter-clockwise normal of this triangle.
    pub fn scaled_normal(&self) -> Vector<Real> {
        let ab = self.b - self.a;
        let ac = self.c - self.a;
        ab.cross(&ac)
    }

    /// The unit counter-clockwise normal of this triangle, if it is not
    /// degenerate.
    pub fn normal(&self) -> Option<Vector<Real>> {
        let n = self.scaled_normal();
        let norm = n.norm();

        if norm > 0.0 {
            Some(n / norm)
        } else {
            None
        }
    }

    /// The area of this triangle.
    pub fn area(&self) -> Real {
        self.scaled_normal().norm() / 2.0
    }
}

impl From<[Point<Real>; 3]> for Triangle {
    fn from(pts: [Point<Real>; 3]) -> Self {
        Self::new(pts[0], pts[1], pts[2])
    }
}

/// A tetrahedron defined by its four vertices.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tetrahedron {
    /// The first vertex of the tetrahedron.
    pub a: Point<Real>,
    /// The second vertex of the tetrahedron.
    pub b: Point<Real>,
    /// The third vertex of the tetrahedron.
    pub c: Point<Real>,
    /// The fourth vertex of the tetrahedron.
    pub d: Point<Real>,
}

impl Tetrahedron {
    /// Creates a tetrahedron from its four vertices.
    pub fn new(a: Point<Real>, b: Point<Real>, c: Point<Real>, d: Point<Real>) -> Self {
        Self { a, b, c, d }
    }

    /// The signed volume of this tetrahedron.
    ///
    /// Positive if `d` lies on the positive side of the plane oriented by the
    /// counter-clockwise triangle `(a, b, c)`.
    pub fn signed_volume(&self) -> Real {
        let ab = self.b - self.a;
        let ac = self.c - self.a;
        let ad = self.d - self.a;

        let mat = Matrix::new(
            ab[0], ac[0], ad[0], ab[1], ac[1], ad[1], ab[2], ac[2], ad[2],
        );

        mat.determinant() / 6.0
    }

    /// The volume of this tetrahedron.
    pub fn volume(&self) -> Real {
        self.signed_volume().abs()
    }
}
