use super::DEGENERACY_EPSILON;
use crate::math::{Point, Real};

/// Outcome of the initial-simplex search.
pub(super) enum InitialHull {
    /// The point set spans fewer than 3 dimensions; the returned mesh (in
    /// original coordinates) is the final, possibly flat, hull.
    Degenerate(Vec<Point<Real>>, Vec<[u32; 3]>),
    /// Four affinely independent point indices forming a tetrahedron whose
    /// first triangle `(a, b, c)` is counter-clockwise seen from outside.
    Tetrahedron([u32; 4]),
}

/// Finds an initial simplex for the hull construction, degrading to a
/// point/segment/polygon mesh whenever the input spans fewer than 3
/// dimensions.
///
/// All the decisions are taken on `normalized` (centered, scaled by the AABB
/// diagonal); the returned meshes use `original` coordinates.
pub(super) fn initial_hull(
    original: &[Point<Real>],
    normalized: &[Point<Real>],
) -> InitialHull {
    // Extreme points along each coordinate axis.
    let mut arg_min = [0usize; 3];
    let mut arg_max = [0usize; 3];

    for (i, pt) in normalized.iter().enumerate() {
        for dim in 0..3 {
            if pt[dim] < normalized[arg_min[dim]][dim] {
                arg_min[dim] = i;
            }
            if pt[dim] > normalized[arg_max[dim]][dim] {
                arg_max[dim] = i;
            }
        }
    }

    let spread =
        |dim: usize| normalized[arg_max[dim]][dim] - normalized[arg_min[dim]][dim];
    let mut best_dim = 0;

    for dim in 1..3 {
        if spread(dim) > spread(best_dim) {
            best_dim = dim;
        }
    }

    if spread(best_dim) <= DEGENERACY_EPSILON {
        // All the points coincide: the hull is a single point.
        return InitialHull::Degenerate(vec![original[0]], vec![[0; 3], [0; 3]]);
    }

    let p0 = arg_min[best_dim] as u32;
    let p1 = arg_max[best_dim] as u32;
    let dir = normalized[p1 as usize] - normalized[p0 as usize];

    // Third point: furthest from the (p0, p1) line.
    let mut p2 = u32::MAX;
    let mut max_line_dist = DEGENERACY_EPSILON * dir.norm();

    for (i, pt) in normalized.iter().enumerate() {
        let dist = dir.cross(&(pt - normalized[p0 as usize])).norm();

        if dist > max_line_dist {
            max_line_dist = dist;
            p2 = i as u32;
        }
    }

    if p2 == u32::MAX {
        // Collinear input: the hull is a segment between the two extremes.
        let vtx = vec![original[p0 as usize], original[p1 as usize]];
        return InitialHull::Degenerate(vtx, vec![[0, 1, 0], [1, 0, 0]]);
    }

    let normal = dir
        .cross(&(normalized[p2 as usize] - normalized[p0 as usize]))
        .normalize();

    // Fourth point: furthest from the (p0, p1, p2) plane.
    let mut p3 = u32::MAX;
    let mut max_plane_dist = DEGENERACY_EPSILON;

    for (i, pt) in normalized.iter().enumerate() {
        let dist = normal.dot(&(pt - normalized[p0 as usize])).abs();

        if dist > max_plane_dist {
            max_plane_dist = dist;
            p3 = i as u32;
        }
    }

    if p3 == u32::MAX {
        // Coplanar input: compute a 2D hull in the plane and triangulate it
        // on both sides so the result is a closed, zero-thickness surface.
        return planar_hull(original, normalized, p0, &dir, &normal);
    }

    // Make sure p3 lies below the (p0, p1, p2) plane so that every face of
    // the initial tetrahedron is counter-clockwise seen from outside.
    let d3 = normal.dot(&(normalized[p3 as usize] - normalized[p0 as usize]));

    if d3 > 0.0 {
        InitialHull::Tetrahedron([p1, p0, p2, p3])
    } else {
        InitialHull::Tetrahedron([p0, p1, p2, p3])
    }
}

fn planar_hull(
    original: &[Point<Real>],
    normalized: &[Point<Real>],
    origin_id: u32,
    dir: &na::Vector3<Real>,
    normal: &na::Vector3<Real>,
) -> InitialHull {
    let basis_u = dir.normalize();
    let basis_v = normal.cross(&basis_u);
    let origin = normalized[origin_id as usize];

    let planar: Vec<(Real, Real)> = normalized
        .iter()
        .map(|pt| ((pt - origin).dot(&basis_u), (pt - origin).dot(&basis_v)))
        .collect();

    let polygon = convex_hull2(&planar);
    let npoints = polygon.len();
    let coords: Vec<_> = polygon
        .iter()
        .map(|i| original[*i as usize])
        .collect();

    let mut triangles = Vec::with_capacity(2 * npoints.saturating_sub(2));

    for id in 1..npoints as u32 - 1 {
        triangles.push([0, id, id + 1]);
    }

    // The bottom fan starts from a different apex so that no edge ends up
    // shared by more than two triangles.
    for id in 0..npoints as u32 - 2 {
        triangles.push([npoints as u32 - 1, id + 1, id]);
    }

    InitialHull::Degenerate(coords, triangles)
}

/// Computes the counter-clockwise convex hull of a 2D point set with the
/// monotone chain algorithm. Returns indices into `points`.
fn convex_hull2(points: &[(Real, Real)]) -> Vec<u32> {
    let mut ids: Vec<u32> = (0..points.len() as u32).collect();
    ids.sort_by(|a, b| {
        let pa = points[*a as usize];
        let pb = points[*b as usize];
        pa.partial_cmp(&pb).expect("non-finite 2D coordinates")
    });

    let cross = |o: u32, a: u32, b: u32| {
        let po = points[o as usize];
        let pa = points[a as usize];
        let pb = points[b as usize];
        (pa.0 - po.0) * (pb.1 - po.1) - (pa.1 - po.1) * (pb.0 - po.0)
    };

    let mut hull: Vec<u32> = Vec::with_capacity(points.len() + 1);

    // Lower hull, then upper hull.
    for pass in 0..2 {
        let start = hull.len();

        let mut push = |hull: &mut Vec<u32>, id: u32| {
            while hull.len() >= start + 2
                && cross(hull[hull.len() - 2], hull[hull.len() - 1], id) <= 0.0
            {
                let _ = hull.pop();
            }
            hull.push(id);
        };

        if pass == 0 {
            for &id in &ids {
                push(&mut hull, id);
            }
        } else {
            for &id in ids.iter().rev() {
                push(&mut hull, id);
            }
        }

        // The last point of each pass is the first point of the next one.
        let _ = hull.pop();
    }

    hull
}

#[cfg(test)]
mod test {
    use super::{convex_hull2, initial_hull, InitialHull};
    use crate::math::Point;

    #[test]
    fn hull2_of_square_with_interior_point() {
        let pts = [
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 1.0),
            (0.5, 0.5),
            (0.5, 0.0),
        ];
        let hull = convex_hull2(&pts);
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&4));
        assert!(!hull.contains(&5));
    }

    #[test]
    fn initial_hull_detects_dimension() {
        let single = vec![Point::new(1.0, 2.0, 3.0); 4];
        assert!(matches!(
            initial_hull(&single, &vec![Point::origin(); 4]),
            InitialHull::Degenerate(v, _) if v.len() == 1
        ));

        let collinear = vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(0.5, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
        ];
        let mut normalized = collinear.clone();
        for p in &mut normalized {
            *p = Point::new(p.x - 0.5, p.y, p.z);
        }
        match initial_hull(&collinear, &normalized) {
            InitialHull::Degenerate(v, _) => {
                assert_eq!(v, vec![collinear[0], collinear[2]]);
            }
            _ => panic!("expected a segment hull"),
        }

        let tetra = vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(0.0, 0.0, 1.0),
        ];
        assert!(matches!(
            initial_hull(&tetra, &tetra),
            InitialHull::Tetrahedron(_)
        ));
    }
}
