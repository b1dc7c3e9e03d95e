use super::face::HullFace;
use super::initial_hull::{initial_hull, InitialHull};
use super::ConvexHullError;
use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use crate::utils;
use std::collections::HashMap;

/// Computes the convex hull of a set of 3D points.
///
/// The returned triangles are counter-clockwise seen from outside the hull.
/// Degenerate inputs (empty, single point, collinear, coplanar) degrade to the
/// lowest-dimensional valid hull (a point, a segment, or a zero-thickness
/// polygon) instead of failing.
pub fn convex_hull(points: &[Point<Real>]) -> (Vec<Point<Real>>, Vec<[u32; 3]>) {
    // `try_convex_hull` only fails on empty inputs.
    try_convex_hull(points).unwrap_or_default()
}

/// Computes the convex hull of a set of 3D points, or an error if the input
/// is empty.
///
/// See [`convex_hull`] for the properties of the result.
pub fn try_convex_hull(
    points: &[Point<Real>],
) -> Result<(Vec<Point<Real>>, Vec<[u32; 3]>), ConvexHullError> {
    if points.is_empty() {
        return Err(ConvexHullError::IncompleteInput);
    }

    // All the plane classifications run on normalized points so the epsilons
    // are scale-independent. The output is assembled from the original points.
    let mut normalized = points.to_vec();
    normalize(&mut normalized);

    let simplex = match initial_hull(points, &normalized) {
        InitialHull::Degenerate(vtx, idx) => return Ok((vtx, idx)),
        InitialHull::Tetrahedron(ids) => ids,
    };

    let [a, b, c, d] = simplex;
    let mut faces = vec![
        HullFace::new(a, b, c, &normalized),
        HullFace::new(a, c, d, &normalized),
        HullFace::new(a, d, b, &normalized),
        HullFace::new(b, d, c, &normalized),
    ];

    for id in 0..points.len() as u32 {
        if id != a && id != b && id != c && id != d {
            assign_to_best_face(id, &mut faces, &normalized);
        }
    }

    // Insert conflict points one by one, furthest first. Every iteration
    // removes at least one face whose conflict list contains the inserted
    // point, so the loop terminates; the explicit bound protects against
    // pathological numerical cycles.
    let max_iterations = 4 * points.len() + 1024;

    for _ in 0..max_iterations {
        let Some(face_id) = next_conflicting_face(&faces) else {
            break;
        };

        let apex = faces[face_id].furthest;
        let apex_pt = normalized[apex as usize];

        // Map each directed edge of the current hull to its face.
        let mut edge_face = HashMap::new();

        for (i, face) in faces.iter().enumerate() {
            if face.alive {
                for edge in face.edges() {
                    let _ = edge_face.insert(edge, i);
                }
            }
        }

        // Faces visible from the apex, as a connected region grown from
        // `face_id` so the horizon is a single closed loop.
        let mut visible = vec![face_id];
        let mut is_visible = vec![false; faces.len()];
        is_visible[face_id] = true;

        let mut cursor = 0;
        while cursor < visible.len() {
            for (ea, eb) in faces[visible[cursor]].edges() {
                if let Some(&neighbor) = edge_face.get(&(eb, ea)) {
                    if !is_visible[neighbor] && faces[neighbor].can_be_seen_from(&apex_pt) {
                        is_visible[neighbor] = true;
                        visible.push(neighbor);
                    }
                }
            }
            cursor += 1;
        }

        // Horizon: directed edges of visible faces whose neighbor is kept.
        let mut horizon = Vec::new();

        for &fid in &visible {
            for (ea, eb) in faces[fid].edges() {
                let keep_neighbor = match edge_face.get(&(eb, ea)) {
                    Some(&neighbor) => !is_visible[neighbor],
                    None => true,
                };

                if keep_neighbor {
                    horizon.push((ea, eb));
                }
            }
        }

        // Remove the visible faces and collect their orphaned conflicts.
        let mut orphans = Vec::new();

        for &fid in &visible {
            faces[fid].alive = false;
            orphans.append(&mut faces[fid].conflicts);
        }

        // One new face per horizon edge, sharing the apex.
        for &(ea, eb) in &horizon {
            faces.push(HullFace::new(ea, eb, apex, &normalized));
        }

        // Re-home the orphans over every alive face, not only the new ones: a
        // point may be above a kept face alone, and dropping it would lose a
        // hull vertex.
        for id in orphans {
            if id != apex {
                assign_to_best_face(id, &mut faces, &normalized);
            }
        }
    }

    extract_hull(points, &faces)
}

/// Scales the points so they fit in the unit box centered at the origin.
fn normalize(points: &mut [Point<Real>]) {
    // `points` is non-empty here.
    let aabb = Aabb::from_points(points).expect("empty point set");
    let center = aabb.center();
    let mut diag = aabb.diagonal_length();

    if diag <= 0.0 || !diag.is_finite() {
        diag = 1.0;
    }

    for pt in points {
        *pt = (*pt - center.coords) / diag;
    }
}

/// Assigns `id` to the conflict list of the face it is the furthest above,
/// if any.
fn assign_to_best_face(id: u32, faces: &mut [HullFace], points: &[Point<Real>]) {
    let pt = &points[id as usize];
    let mut best = usize::MAX;
    let mut best_dist = super::VISIBILITY_EPSILON;

    for (i, face) in faces.iter().enumerate() {
        if face.alive && !face.degenerate {
            let dist = face.distance_to(pt);

            if dist > best_dist {
                best = i;
                best_dist = dist;
            }
        }
    }

    if best != usize::MAX {
        let added = faces[best].try_add_conflict(id, points);
        debug_assert!(added);
    }
}

/// The face whose furthest conflict point is the furthest overall.
fn next_conflicting_face(faces: &[HullFace]) -> Option<usize> {
    let mut best = None;
    let mut best_dist = 0.0;

    for (i, face) in faces.iter().enumerate() {
        if face.alive && !face.conflicts.is_empty() && face.furthest_dist > best_dist {
            best = Some(i);
            best_dist = face.furthest_dist;
        }
    }

    best
}

fn extract_hull(
    points: &[Point<Real>],
    faces: &[HullFace],
) -> Result<(Vec<Point<Real>>, Vec<[u32; 3]>), ConvexHullError> {
    let mut idx = Vec::new();

    for face in faces {
        if face.alive {
            idx.push(face.pts);
        }
    }

    let mut out_points = points.to_vec();
    utils::remove_unused_points(&mut out_points, &mut idx);

    if out_points.is_empty() {
        return Err(ConvexHullError::IncompleteInput);
    }

    Ok((out_points, idx))
}

#[cfg(test)]
mod test {
    use super::{convex_hull, try_convex_hull};
    use crate::convex_hull::check_convex_hull;
    use crate::math::Point;

    #[test]
    fn hull_of_tetrahedron() {
        let points = vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(0.0, 0.0, 1.0),
        ];

        let (vtx, idx) = convex_hull(&points);
        assert_eq!(vtx.len(), 4);
        assert_eq!(idx.len(), 4);
        assert_eq!(check_convex_hull(&vtx, &idx), Ok(()));
    }

    #[test]
    fn hull_of_cube_with_interior_points() {
        let mut points = Vec::new();

        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    points.push(Point::new(i as f64, j as f64, k as f64));
                }
            }
        }

        // Strictly interior points must not appear in the hull.
        points.push(Point::new(0.5, 0.5, 0.5));
        points.push(Point::new(0.25, 0.75, 0.5));

        let (vtx, idx) = convex_hull(&points);
        assert_eq!(vtx.len(), 8);
        assert_eq!(idx.len(), 12);
        assert_eq!(check_convex_hull(&vtx, &idx), Ok(()));
    }

    #[test]
    fn hull_of_empty_input() {
        assert!(try_convex_hull(&[]).is_err());
        let (vtx, idx) = convex_hull(&[]);
        assert!(vtx.is_empty() && idx.is_empty());
    }

    #[test]
    fn hull_of_coplanar_points() {
        let points = vec![
            Point::new(0.0, 0.0, 1.0),
            Point::new(1.0, 0.0, 1.0),
            Point::new(1.0, 1.0, 1.0),
            Point::new(0.0, 1.0, 1.0),
            Point::new(0.5, 0.5, 1.0),
        ];

        let (vtx, idx) = convex_hull(&points);
        assert_eq!(vtx.len(), 4);
        // Both sides of the flat polygon are triangulated.
        assert_eq!(idx.len(), 4);
    }

    #[test]
    fn hull_of_random_sphere_points_is_convex() {
        let mut rng = oorandom::Rand64::new(42);
        let mut points = Vec::new();

        for _ in 0..512 {
            let dir = na::Vector3::new(
                rng.rand_float() * 2.0 - 1.0,
                rng.rand_float() * 2.0 - 1.0,
                rng.rand_float() * 2.0 - 1.0,
            );

            if dir.norm() > 1.0e-3 {
                points.push(Point::origin() + dir.normalize() * 10.0);
            }
        }

        let (vtx, idx) = convex_hull(&points);
        assert!(vtx.len() > 4);
        assert_eq!(check_convex_hull(&vtx, &idx), Ok(()));
    }
}
