use super::DecompositionError;
use crate::math::Real;
use crate::voxelization::FillMode;

/// Parameters of an approximate convex decomposition.
///
/// All the fields can be set independently; the defaults are a good starting
/// point for collision geometry generation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameters {
    /// The maximum number of convex hulls to produce.
    ///
    /// Downstream consumers typically pay a per-hull cost (one collision
    /// shape per hull), so this is the main performance/quality trade-off.
    ///
    /// Default: 32. Range: 1..=2048.
    pub max_convex_hulls: u32,
    /// The maximum number of voxels generated during the voxelization stage.
    ///
    /// Higher values increase the decomposition time but capture finer
    /// features of the input surface.
    ///
    /// Default: 100_000. Range: 10_000..=64_000_000.
    pub resolution: u32,
    /// If the volume of a voxel cluster is within this percentage of the
    /// volume of its convex hull, the cluster is considered a close enough
    /// approximation and is not split further.
    ///
    /// Default: 1.0. Range: 0.001..=10.0.
    pub min_volume_percent_error: Real,
    /// The maximum recursion depth of the splitter.
    ///
    /// Default: 10. Range: 1..=15.
    pub max_recursion_depth: u32,
    /// Project the output hull vertices onto the original source mesh to
    /// increase the accuracy of the results.
    ///
    /// Default: `true`.
    pub shrink_wrap: bool,
    /// How to fill the interior of the voxelized mesh.
    ///
    /// Default: [`FillMode::FloodFill`].
    pub fill_mode: FillMode,
    /// The maximum number of vertices of each convex hull.
    ///
    /// Default: 64. Range: 4..=1024.
    pub max_vertices_per_hull: u32,
    /// Run the decomposition on multiple threads.
    ///
    /// Only has an effect when the `parallel` cargo feature is enabled;
    /// otherwise the run is strictly sequential. Sequential runs are
    /// bit-reproducible; parallel runs produce the same hulls in the same
    /// order, scheduled across threads.
    ///
    /// Default: `true`.
    pub async_acd: bool,
    /// The minimum number of voxels spanned by a cluster edge for the cluster
    /// to be split further.
    ///
    /// Default: 2. Range: 1..=16.
    pub min_edge_length: u32,
    /// If `false`, clusters are split at the middle of their longest axis.
    /// If `true`, candidate split positions are searched on all three axes
    /// for the one minimizing the combined volume error of both children.
    /// Slower, for quality-sensitive runs.
    ///
    /// Default: `false`.
    pub find_best_plane: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            max_convex_hulls: 32,
            resolution: 100_000,
            min_volume_percent_error: 1.0,
            max_recursion_depth: 10,
            shrink_wrap: true,
            fill_mode: FillMode::FloodFill,
            max_vertices_per_hull: 64,
            async_acd: true,
            min_edge_length: 2,
            find_best_plane: false,
        }
    }
}

impl Parameters {
    /// Checks that every parameter lies within its documented range.
    pub fn validate(&self) -> Result<(), DecompositionError> {
        let check = |ok: bool, name: &'static str, reason: &'static str| {
            if ok {
                Ok(())
            } else {
                Err(DecompositionError::InvalidParameter { name, reason })
            }
        };

        check(
            self.max_convex_hulls >= 1 && self.max_convex_hulls <= 2048,
            "max_convex_hulls",
            "must be in 1..=2048",
        )?;
        check(
            self.resolution >= 10_000 && self.resolution <= 64_000_000,
            "resolution",
            "must be in 10_000..=64_000_000",
        )?;
        check(
            self.min_volume_percent_error >= 0.001 && self.min_volume_percent_error <= 10.0,
            "min_volume_percent_error",
            "must be in 0.001..=10.0",
        )?;
        check(
            self.max_recursion_depth >= 1 && self.max_recursion_depth <= 15,
            "max_recursion_depth",
            "must be in 1..=15",
        )?;
        check(
            self.max_vertices_per_hull >= 4 && self.max_vertices_per_hull <= 1024,
            "max_vertices_per_hull",
            "must be in 4..=1024",
        )?;
        check(
            self.min_edge_length >= 1 && self.min_edge_length <= 16,
            "min_edge_length",
            "must be in 1..=16",
        )?;

        Ok(())
    }
}
