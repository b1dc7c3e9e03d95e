use super::ConvexHullError;
use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use crate::shape::Triangle;
use std::collections::HashMap;

/// Checks that the given triangulated mesh is a closed convex polytope.
///
/// The check verifies that:
/// - every directed edge appears exactly once (no t-junction);
/// - every directed edge has an opposite half-edge (the surface is closed);
/// - no point lies outside the supporting plane of any triangle, within a
///   tolerance relative to the hull size.
///
/// Degenerate (zero-area) triangles are skipped by the convexity check since
/// they carry no usable plane.
pub fn check_convex_hull(
    points: &[Point<Real>],
    triangles: &[[u32; 3]],
) -> Result<(), ConvexHullError> {
    if points.is_empty() || triangles.is_empty() {
        return Err(ConvexHullError::IncompleteInput);
    }

    let mut edges = HashMap::new();

    for (tid, tri) in triangles.iter().enumerate() {
        for i in 0..3 {
            let edge = (tri[i], tri[(i + 1) % 3]);

            if edges.insert(edge, tid).is_some() {
                return Err(ConvexHullError::TJunction(tid, edge.0, edge.1));
            }
        }
    }

    for (a, b) in edges.keys() {
        if !edges.contains_key(&(*b, *a)) {
            return Err(ConvexHullError::OpenEdge(*a, *b));
        }
    }

    // `points` is non-empty here.
    let aabb = Aabb::from_points(points).expect("empty point set");
    let tolerance = (aabb.diagonal_length() * 1.0e-7).max(1.0e-12);

    for (tid, tri) in triangles.iter().enumerate() {
        let triangle = Triangle::new(
            points[tri[0] as usize],
            points[tri[1] as usize],
            points[tri[2] as usize],
        );

        let Some(normal) = triangle.normal() else {
            continue;
        };

        for (pid, pt) in points.iter().enumerate() {
            if normal.dot(&(pt - triangle.a)) > tolerance {
                return Err(ConvexHullError::NonConvex {
                    triangle: tid,
                    point: pid,
                });
            }
        }
    }

    Ok(())
}
