//! Geometric predicates used by the voxelizer and the post-processor.

use crate::math::{Point, Real, Vector};
use crate::shape::Triangle;

/// Tests whether a triangle intersects an axis-aligned box.
///
/// This is a separating-axis test over the three box axes, the triangle plane
/// normal, and the nine edge cross-products. It is conservative in the sense
/// required by voxel rasterization: a triangle touching the box boundary is
/// reported as intersecting.
pub fn triangle_aabb_overlap(
    center: &Point<Real>,
    half_extents: &Vector<Real>,
    triangle: &Triangle,
) -> bool {
    // Work in the box local frame.
    let v0 = triangle.a - center;
    let v1 = triangle.b - center;
    let v2 = triangle.c - center;

    let e0 = v1 - v0;
    let e1 = v2 - v1;
    let e2 = v0 - v2;

    // Box axes.
    for dim in 0..3 {
        let min = v0[dim].min(v1[dim]).min(v2[dim]);
        let max = v0[dim].max(v1[dim]).max(v2[dim]);

        if min > half_extents[dim] || max < -half_extents[dim] {
            return false;
        }
    }

    // Edge cross-product axes.
    for edge in [e0, e1, e2] {
        for dim in 0..3 {
            let axis = Vector::ith_axis(dim).cross(&edge);
            let p0 = axis.dot(&v0);
            let p1 = axis.dot(&v1);
            let p2 = axis.dot(&v2);

            let radius = half_extents[0] * axis[0].abs()
                + half_extents[1] * axis[1].abs()
                + half_extents[2] * axis[2].abs();

            let min = p0.min(p1).min(p2);
            let max = p0.max(p1).max(p2);

            if min > radius || max < -radius {
                return false;
            }
        }
    }

    // Triangle plane.
    let normal = e0.cross(&e1);
    let dist = normal.dot(&v0);
    let radius = half_extents[0] * normal[0].abs()
        + half_extents[1] * normal[1].abs()
        + half_extents[2] * normal[2].abs();

    dist.abs() <= radius
}

/// Casts a ray on a triangle and returns the parameter `t` such that
/// `origin + dir * t` is the intersection point.
///
/// Only hits with `t >= 0` are reported. Rays lying in the triangle plane
/// report no hit.
pub fn cast_ray_on_triangle(
    origin: &Point<Real>,
    dir: &Vector<Real>,
    triangle: &Triangle,
) -> Option<Real> {
    let ab = triangle.b - triangle.a;
    let ac = triangle.c - triangle.a;

    let pvec = dir.cross(&ac);
    let det = ab.dot(&pvec);

    if det.abs() < 1.0e-30 {
        return None;
    }

    let inv_det = 1.0 / det;
    let tvec = origin - triangle.a;
    let u = tvec.dot(&pvec) * inv_det;

    if u < 0.0 || u > 1.0 {
        return None;
    }

    let qvec = tvec.cross(&ab);
    let v = dir.dot(&qvec) * inv_det;

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = ac.dot(&qvec) * inv_det;
    (t >= 0.0).then_some(t)
}

/// Projects a point on a triangle and returns the closest point on the
/// triangle.
pub fn project_point_on_triangle(pt: &Point<Real>, triangle: &Triangle) -> Point<Real> {
    let a = triangle.a;
    let b = triangle.b;
    let c = triangle.c;

    let ab = b - a;
    let ac = c - a;
    let ap = pt - a;

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);

    if d1 <= 0.0 && d2 <= 0.0 {
        return a; // Vertex region A.
    }

    let bp = pt - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);

    if d3 >= 0.0 && d4 <= d3 {
        return b; // Vertex region B.
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v; // Edge region AB.
    }

    let cp = pt - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);

    if d6 >= 0.0 && d5 <= d6 {
        return c; // Vertex region C.
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w; // Edge region AC.
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w; // Edge region BC.
    }

    // Interior region.
    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::{Point, Vector};
    use crate::shape::Triangle;

    fn unit_triangle() -> Triangle {
        Triangle::new(
            Point::origin(),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn triangle_aabb_overlap_basic() {
        let tri = unit_triangle();

        assert!(triangle_aabb_overlap(
            &Point::new(0.25, 0.25, 0.0),
            &Vector::repeat(0.5),
            &tri
        ));
        // Box above the triangle plane.
        assert!(!triangle_aabb_overlap(
            &Point::new(0.25, 0.25, 1.0),
            &Vector::repeat(0.5),
            &tri
        ));
        // Box beyond the hypotenuse, but still inside the triangle AABB.
        assert!(!triangle_aabb_overlap(
            &Point::new(0.9, 0.9, 0.0),
            &Vector::repeat(0.05),
            &tri
        ));
        // Box touching a vertex.
        assert!(triangle_aabb_overlap(
            &Point::new(1.5, 0.0, 0.0),
            &Vector::repeat(0.5),
            &tri
        ));
    }

    #[test]
    fn ray_cast_hits_and_misses() {
        let tri = unit_triangle();
        let dir = Vector::new(0.0, 0.0, -1.0);

        let t = cast_ray_on_triangle(&Point::new(0.25, 0.25, 2.0), &dir, &tri);
        assert_eq!(t, Some(2.0));

        // Pointing away.
        assert_eq!(
            cast_ray_on_triangle(&Point::new(0.25, 0.25, 2.0), &-dir, &tri),
            None
        );
        // Outside of the triangle.
        assert_eq!(
            cast_ray_on_triangle(&Point::new(2.0, 2.0, 2.0), &dir, &tri),
            None
        );
    }

    #[test]
    fn point_projection_regions() {
        let tri = unit_triangle();

        // Interior projects along the normal.
        let p = project_point_on_triangle(&Point::new(0.2, 0.2, 3.0), &tri);
        assert_relative_eq!(p, Point::new(0.2, 0.2, 0.0));

        // Vertex region.
        let p = project_point_on_triangle(&Point::new(-1.0, -1.0, 0.0), &tri);
        assert_relative_eq!(p, Point::origin());

        // Edge region.
        let p = project_point_on_triangle(&Point::new(0.5, -2.0, 0.0), &tri);
        assert_relative_eq!(p, Point::new(0.5, 0.0, 0.0));
    }
}
