use super::hull::{convex_volume, ConvexHull};
use crate::convex_hull::convex_hull;
use crate::math::{Point, Real};
use crate::voxelization::VoxelSet;

/// The convex hull of a voxel cluster, together with the volume discrepancy
/// between the hull and the cluster.
pub(super) struct ClusterEvaluation {
    pub hull_points: Vec<Point<Real>>,
    pub hull_triangles: Vec<[u32; 3]>,
    pub hull_volume: Real,
    pub voxel_volume: Real,
    /// `(hull_volume - voxel_volume) / voxel_volume`, as a percentage,
    /// clamped to zero when the hull volume numerically undershoots the voxel
    /// volume.
    pub error_percent: Real,
}

impl ClusterEvaluation {
    pub fn into_hull(self) -> ConvexHull {
        ConvexHull::new(self.hull_points, self.hull_triangles)
    }
}

/// Builds the convex hull of a cluster and measures how much volume the hull
/// adds over the voxels themselves. This drives the splitter's stopping
/// criterion.
pub(super) fn evaluate_cluster(cluster: &VoxelSet) -> ClusterEvaluation {
    let corners = cluster.surface_corner_points();
    let (hull_points, hull_triangles) = convex_hull(&corners);
    let hull_volume = convex_volume(&hull_points, &hull_triangles);
    let voxel_volume = cluster.volume();

    let error_percent = if voxel_volume > 0.0 {
        ((hull_volume - voxel_volume) / voxel_volume * 100.0).max(0.0)
    } else {
        0.0
    };

    ClusterEvaluation {
        hull_points,
        hull_triangles,
        hull_volume,
        voxel_volume,
        error_percent,
    }
}
