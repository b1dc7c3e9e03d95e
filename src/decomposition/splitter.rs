use super::context::{ComputationContext, Stage};
use super::evaluation::{evaluate_cluster, ClusterEvaluation};
use super::hull::ConvexHull;
use crate::voxelization::VoxelSet;

/// Number of candidate positions sampled per axis by the best-plane search.
const BEST_PLANE_SAMPLES: u32 = 8;

/// Recursively splits the root cluster until every terminal cluster is convex
/// enough, and returns the terminal hulls in depth-first order (lower child
/// first), which makes the output order independent from thread scheduling.
pub(super) fn decompose_voxel_set(ctx: &ComputationContext, root: VoxelSet) -> Vec<ConvexHull> {
    ctx.report(Stage::Decomposition, 0.0);

    #[cfg(feature = "parallel")]
    if ctx.params.async_acd {
        return split_parallel(ctx, root, 0);
    }

    let mut hulls = Vec::new();
    split_sequential(ctx, root, 0, &mut hulls);
    hulls
}

fn split_sequential(
    ctx: &ComputationContext,
    cluster: VoxelSet,
    depth: u32,
    hulls: &mut Vec<ConvexHull>,
) {
    let Some((lower, upper)) = process_cluster(ctx, cluster, depth, hulls) else {
        return;
    };

    split_sequential(ctx, lower, depth + 1, hulls);
    split_sequential(ctx, upper, depth + 1, hulls);
}

#[cfg(feature = "parallel")]
fn split_parallel(ctx: &ComputationContext, cluster: VoxelSet, depth: u32) -> Vec<ConvexHull> {
    let mut hulls = Vec::new();

    let Some((lower, upper)) = process_cluster(ctx, cluster, depth, &mut hulls) else {
        return hulls;
    };

    let (mut lower_hulls, mut upper_hulls) = rayon::join(
        || split_parallel(ctx, lower, depth + 1),
        || split_parallel(ctx, upper, depth + 1),
    );

    hulls.append(&mut lower_hulls);
    hulls.append(&mut upper_hulls);
    hulls
}

/// Evaluates one cluster. Returns its two children if it must be split, or
/// `None` if it is terminal (in which case its hull is pushed to `hulls`) or
/// the run was cancelled.
fn process_cluster(
    ctx: &ComputationContext,
    cluster: VoxelSet,
    depth: u32,
    hulls: &mut Vec<ConvexHull>,
) -> Option<(VoxelSet, VoxelSet)> {
    if ctx.is_cancelled() || cluster.is_empty() {
        return None;
    }

    ctx.note_depth(depth);
    let eval = evaluate_cluster(&cluster);

    let accepted = eval.error_percent <= ctx.params.min_volume_percent_error;
    let too_deep = depth >= ctx.params.max_recursion_depth;
    let too_small = cluster.extents().max() <= ctx.params.min_edge_length;

    if accepted || too_deep || too_small {
        ctx.note_processed_voxels(cluster.len() as u64);
        hulls.push(eval.into_hull());
        return None;
    }

    let Some((axis, index)) = choose_plane(ctx, &cluster, &eval) else {
        // No usable split plane: accept the cluster as-is.
        ctx.note_processed_voxels(cluster.len() as u64);
        hulls.push(eval.into_hull());
        return None;
    };

    Some(cluster.clip(axis, index))
}

/// Chooses the split plane for a cluster, as `(axis, index)`: the cut runs
/// between the grid slices `index` and `index + 1`.
fn choose_plane(
    ctx: &ComputationContext,
    cluster: &VoxelSet,
    eval: &ClusterEvaluation,
) -> Option<(usize, u32)> {
    if ctx.params.find_best_plane {
        if let Some(best) = search_best_plane(cluster, eval) {
            return Some(best);
        }
    }

    midpoint_plane(cluster)
}

/// The default policy: cut the longest axis of the cluster bounding box at
/// its midpoint.
fn midpoint_plane(cluster: &VoxelSet) -> Option<(usize, u32)> {
    let extents = cluster.extents();
    let mut axis = 0;

    for dim in 1..3 {
        if extents[dim] > extents[axis] {
            axis = dim;
        }
    }

    if extents[axis] < 2 {
        return None;
    }

    let index = cluster.min_bb()[axis] + (extents[axis] - 1) / 2;
    Some((axis, index))
}

/// The quality policy: sample candidate cuts on all three axes and keep the
/// one minimizing the combined volume error of both children. The first
/// candidate wins ties, so the search is order-deterministic.
fn search_best_plane(cluster: &VoxelSet, eval: &ClusterEvaluation) -> Option<(usize, u32)> {
    let extents = cluster.extents();
    let mut best = None;
    let mut best_score = eval.hull_volume - eval.voxel_volume;

    for axis in 0..3 {
        if extents[axis] < 2 {
            continue;
        }

        let min = cluster.min_bb()[axis];
        let max = cluster.max_bb()[axis];
        let stride = (extents[axis] / (BEST_PLANE_SAMPLES + 1)).max(1);
        let mut index = min;

        while index < max {
            let (lower, upper) = cluster.clip(axis, index);
            let lower_eval = evaluate_cluster(&lower);
            let upper_eval = evaluate_cluster(&upper);
            let score = (lower_eval.hull_volume - lower_eval.voxel_volume).max(0.0)
                + (upper_eval.hull_volume - upper_eval.voxel_volume).max(0.0);

            if score < best_score {
                best_score = score;
                best = Some((axis, index));
            }

            index += stride;
        }
    }

    best
}
