use super::context::{ComputationContext, Stage};
use super::hull::ConvexHull;
use crate::bounding_volume::Aabb;
use crate::convex_hull::convex_hull;
use crate::math::{Point, Real, Vector};
use crate::query;
use crate::shape::{Tetrahedron, Triangle};

/// Merges hulls pairwise, cheapest first, until the hull count fits the
/// configured budget.
///
/// The cost of merging two hulls is the volume their combined convex hull
/// adds over the two hulls taken separately.
pub(super) fn merge_hulls_to_budget(ctx: &ComputationContext, hulls: &mut Vec<ConvexHull>) {
    let budget = ctx.params.max_convex_hulls as usize;

    if hulls.len() <= budget {
        return;
    }

    ctx.report(Stage::MergeHulls, 0.0);
    let excess = (hulls.len() - budget) as f32;

    // Symmetric pairwise cost matrix. Only the off-diagonal entries are ever
    // read.
    let n = hulls.len();
    let mut costs = vec![vec![0.0 as Real; n]; n];

    for i in 0..n {
        for j in 0..i {
            let cost = merge_cost(&hulls[i], &hulls[j]);
            costs[i][j] = cost;
            costs[j][i] = cost;
        }
    }

    while hulls.len() > budget && !ctx.is_cancelled() {
        let n = hulls.len();
        let mut best = Real::MAX;
        let (mut bi, mut bj) = (usize::MAX, usize::MAX);

        for i in 1..n {
            for j in 0..i {
                if costs[i][j] < best {
                    best = costs[i][j];
                    bi = i;
                    bj = j;
                }
            }
        }

        if bi == usize::MAX {
            return;
        }

        // Replace `bj` with the merged hull and remove `bi` (with `bj < bi`),
        // mirroring the swap-remove in the cost matrix.
        hulls[bj] = merged_hull(&hulls[bi], &hulls[bj]);
        let last = n - 1;
        let _ = hulls.swap_remove(bi);

        if bi != last {
            for k in 0..n {
                costs[bi][k] = costs[last][k];
            }
            for row in costs.iter_mut() {
                row[bi] = row[last];
            }
        }

        costs.truncate(last);
        for row in &mut costs {
            row.truncate(last);
        }

        for k in 0..hulls.len() {
            if k != bj {
                let cost = merge_cost(&hulls[bj], &hulls[k]);
                costs[bj][k] = cost;
                costs[k][bj] = cost;
            }
        }

        ctx.report(
            Stage::MergeHulls,
            1.0 - (hulls.len() - budget) as f32 / excess,
        );
    }
}

fn merge_cost(a: &ConvexHull, b: &ConvexHull) -> Real {
    merged_hull(a, b).volume() - a.volume() - b.volume()
}

fn merged_hull(a: &ConvexHull, b: &ConvexHull) -> ConvexHull {
    let mut points = Vec::with_capacity(a.points().len() + b.points().len());
    points.extend_from_slice(a.points());
    points.extend_from_slice(b.points());

    let (vtx, idx) = convex_hull(&points);
    ConvexHull::new(vtx, idx)
}

/// Caps the vertex count of every hull by greedily removing the vertex whose
/// removal changes the hull volume the least, rebuilding the hull after each
/// removal so convexity stays exact.
pub(super) fn simplify_hulls(ctx: &ComputationContext, hulls: &mut [ConvexHull]) {
    let budget = ctx.params.max_vertices_per_hull as usize;
    ctx.report(Stage::SimplifyHulls, 0.0);
    let num_hulls = hulls.len();

    for (i, hull) in hulls.iter_mut().enumerate() {
        if ctx.is_cancelled() {
            return;
        }

        while hull.points().len() > budget {
            let Some(simplified) = remove_cheapest_vertex(hull) else {
                break;
            };

            if simplified.points().len() >= hull.points().len() {
                // The rebuild did not shrink the hull; give up on this one.
                break;
            }

            *hull = simplified;
        }

        ctx.report(Stage::SimplifyHulls, (i + 1) as f32 / num_hulls as f32);
    }
}

/// Removes the vertex with the smallest removal cost and rebuilds the hull
/// from the remaining vertices.
///
/// The cost of a vertex approximates the volume of the cap spanned by its
/// incident faces: the summed volumes of the tetrahedra between each incident
/// face and the centroid of the vertex's neighbors.
fn remove_cheapest_vertex(hull: &ConvexHull) -> Option<ConvexHull> {
    let points = hull.points();
    let triangles = hull.triangles();
    let n = points.len();

    if n <= 4 {
        return None;
    }

    let mut neighbor_sum = vec![Vector::<Real>::zeros(); n];
    let mut neighbor_count = vec![0u32; n];

    for tri in triangles {
        for c in 0..3 {
            let v = tri[c] as usize;
            let a = tri[(c + 1) % 3] as usize;
            let b = tri[(c + 2) % 3] as usize;
            neighbor_sum[v] += points[a].coords + points[b].coords;
            neighbor_count[v] += 2;
        }
    }

    let mut cost = vec![0.0 as Real; n];

    for tri in triangles {
        for c in 0..3 {
            let v = tri[c] as usize;

            if neighbor_count[v] != 0 {
                let ring_centroid = Point::from(neighbor_sum[v] / neighbor_count[v] as Real);
                cost[v] += Tetrahedron::new(
                    points[tri[0] as usize],
                    points[tri[1] as usize],
                    points[tri[2] as usize],
                    ring_centroid,
                )
                .volume();
            }
        }
    }

    let mut victim = 0;

    for v in 1..n {
        if cost[v] < cost[victim] {
            victim = v;
        }
    }

    let remaining: Vec<Point<Real>> = points
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != victim)
        .map(|(_, pt)| *pt)
        .collect();

    let (vtx, idx) = convex_hull(&remaining);
    Some(ConvexHull::new(vtx, idx))
}

/// Projects the vertices of every hull onto the closest point of the source
/// mesh, when that point is within `snap_distance`, then rebuilds each hull
/// from the projected vertices.
///
/// Rebuilding clips any outward numerical drift, so the hulls stay strictly
/// convex and their vertex count cannot grow.
pub(super) fn shrink_wrap_hulls(
    ctx: &ComputationContext,
    hulls: &mut [ConvexHull],
    mesh_points: &[Point<Real>],
    mesh_triangles: &[[u32; 3]],
    snap_distance: Real,
) {
    ctx.report(Stage::ShrinkWrap, 0.0);
    let max_dist_sq = snap_distance * snap_distance;
    let num_hulls = hulls.len();

    for (i, hull) in hulls.iter_mut().enumerate() {
        if ctx.is_cancelled() {
            return;
        }

        if hull.points().len() >= 4 {
            // `points()` is non-empty here.
            let aabb = Aabb::from_points(hull.points()).expect("empty hull");
            // Snapped vertices landing almost on top of each other would
            // produce sliver triangles; such duplicates are dropped before
            // the rebuild.
            let near_duplicate_sq = (aabb.diagonal_length() * 0.01).powi(2);
            let mut projected: Vec<Point<Real>> = Vec::with_capacity(hull.points().len());

            for pt in hull.points() {
                let mut best = *pt;
                let mut best_sq = max_dist_sq;

                for tri in mesh_triangles {
                    let triangle = Triangle::new(
                        mesh_points[tri[0] as usize],
                        mesh_points[tri[1] as usize],
                        mesh_points[tri[2] as usize],
                    );
                    let candidate = query::project_point_on_triangle(pt, &triangle);
                    let dist_sq = (candidate - pt).norm_squared();

                    if dist_sq < best_sq {
                        best_sq = dist_sq;
                        best = candidate;
                    }
                }

                if !projected
                    .iter()
                    .any(|q| (q - best).norm_squared() < near_duplicate_sq)
                {
                    projected.push(best);
                }
            }

            let (vtx, idx) = convex_hull(&projected);
            let rebuilt = ConvexHull::new(vtx, idx);

            if rebuilt.points().len() >= 4 && rebuilt.volume() > 0.0 {
                *hull = rebuilt;
            }
        }

        ctx.report(Stage::ShrinkWrap, (i + 1) as f32 / num_hulls as f32);
    }
}
