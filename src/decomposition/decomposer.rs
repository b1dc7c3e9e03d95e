use super::context::{CancellationToken, ComputationContext, ProgressCallback, Stage, Stats};
use super::hull::ConvexHull;
use super::post_processing;
use super::splitter;
use super::{DecompositionError, Parameters};
use crate::math::{Point, Real};
use crate::voxelization::{VoxelSet, VoxelizedVolume};

/// Distance threshold (in voxel cell sizes) within which a shrink-wrapped
/// hull vertex snaps onto the source mesh.
const SHRINK_WRAP_SNAP_CELLS: Real = 4.0;

/// The result of a decomposition run.
pub struct Decomposition {
    hulls: Vec<ConvexHull>,
    interrupted: bool,
    stats: Stats,
}

impl Decomposition {
    /// The convex hulls approximating the input mesh.
    ///
    /// The order is stable: identical inputs and parameters yield the hulls
    /// in the same order, whether or not the run was parallel.
    pub fn hulls(&self) -> &[ConvexHull] {
        &self.hulls
    }

    /// Consumes this decomposition and returns its hulls.
    pub fn into_hulls(self) -> Vec<ConvexHull> {
        self.hulls
    }

    /// `true` when the run was cancelled: the hulls are a valid but partial
    /// result.
    pub fn interrupted(&self) -> bool {
        self.interrupted
    }

    /// Statistics accumulated during the run.
    pub fn stats(&self) -> Stats {
        self.stats
    }
}

/// An approximate convex decomposition runner.
///
/// The decomposer owns the validated parameters, the cancellation token and
/// the optional progress sink; every per-run state (the voxel grid, the
/// cluster work-list, the hull list) lives and dies inside
/// [`decompose`](Self::decompose).
pub struct Decomposer {
    params: Parameters,
    cancel: CancellationToken,
    progress: Option<Box<ProgressCallback>>,
}

impl Decomposer {
    /// Creates a decomposer, validating the parameters eagerly.
    pub fn new(params: Parameters) -> Result<Self, DecompositionError> {
        params.validate()?;
        Ok(Self {
            params,
            cancel: CancellationToken::new(),
            progress: None,
        })
    }

    /// The parameters of this decomposer.
    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Sets a progress callback.
    ///
    /// The callback is invoked with the current [`Stage`] and a fraction in
    /// `[0, 1]`, from whichever thread completed a unit of work.
    pub fn with_progress(
        mut self,
        progress: impl Fn(Stage, f32) + Send + Sync + 'static,
    ) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// A token that can be used to cancel, from any thread, the runs started
    /// by this decomposer.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Decomposes a triangle mesh into convex hulls.
    ///
    /// A malformed mesh (no triangles, non-finite coordinates, out-of-range
    /// indices) yields an empty `Ok` result. Only configuration and resource
    /// errors are reported as `Err`, before any heavy work starts.
    pub fn decompose(
        &self,
        points: &[Point<Real>],
        triangles: &[[u32; 3]],
    ) -> Result<Decomposition, DecompositionError> {
        let mut stats = Stats::default();

        if !validate_mesh(points, triangles) {
            return Ok(Decomposition {
                hulls: Vec::new(),
                interrupted: false,
                stats,
            });
        }

        let grid = VoxelizedVolume::voxelize(
            points,
            triangles,
            self.params.resolution,
            self.params.fill_mode,
            self.params.min_edge_length,
        )?;

        if let Some(progress) = &self.progress {
            progress(Stage::Voxelization, 1.0);
        }

        log::debug!(
            "voxelized mesh: {:?} cells, {} on surface, {} interior",
            grid.resolution(),
            grid.num_surface_cells(),
            grid.num_interior_cells(),
        );

        let cell_size = grid.scale();
        let root = VoxelSet::from(grid);

        if root.is_empty() {
            log::warn!("voxelization produced no occupied cell, yielding no hull");
            return Ok(Decomposition {
                hulls: Vec::new(),
                interrupted: false,
                stats,
            });
        }

        stats.voxel_count = root.len();

        let ctx = ComputationContext::new(
            &self.params,
            &self.cancel,
            self.progress.as_deref(),
            root.len() as u64,
        );

        let mut hulls = splitter::decompose_voxel_set(&ctx, root);
        stats.terminal_clusters = hulls.len();
        stats.max_depth_reached = ctx.max_depth_reached();

        log::debug!(
            "decomposed volume into {} clusters (max depth {})",
            stats.terminal_clusters,
            stats.max_depth_reached,
        );

        post_processing::merge_hulls_to_budget(&ctx, &mut hulls);
        post_processing::simplify_hulls(&ctx, &mut hulls);

        if self.params.shrink_wrap {
            post_processing::shrink_wrap_hulls(
                &ctx,
                &mut hulls,
                points,
                triangles,
                cell_size * SHRINK_WRAP_SNAP_CELLS,
            );
        }

        Ok(Decomposition {
            hulls,
            interrupted: ctx.is_cancelled(),
            stats,
        })
    }

    /// Decomposes a mesh given as flat buffers: three coordinates per vertex
    /// and three indices per triangle.
    pub fn decompose_buffers(
        &self,
        vertices: &[Real],
        indices: &[u32],
    ) -> Result<Decomposition, DecompositionError> {
        if vertices.len() % 3 != 0 || indices.len() % 3 != 0 {
            log::warn!("flat mesh buffers must have a length multiple of 3, yielding no hull");
            return Ok(Decomposition {
                hulls: Vec::new(),
                interrupted: false,
                stats: Stats::default(),
            });
        }

        let points: Vec<Point<Real>> = vertices
            .chunks_exact(3)
            .map(|c| Point::new(c[0], c[1], c[2]))
            .collect();
        let triangles: Vec<[u32; 3]> = indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();

        self.decompose(&points, &triangles)
    }
}

/// Decomposes a triangle mesh into convex hulls with the given parameters.
///
/// This is a one-shot convenience for [`Decomposer::decompose`].
pub fn decompose(
    params: &Parameters,
    points: &[Point<Real>],
    triangles: &[[u32; 3]],
) -> Result<Decomposition, DecompositionError> {
    Decomposer::new(params.clone())?.decompose(points, triangles)
}

/// Checks that the mesh is usable; a rejected mesh is reported and yields an
/// empty decomposition.
fn validate_mesh(points: &[Point<Real>], triangles: &[[u32; 3]]) -> bool {
    if points.is_empty() || triangles.is_empty() {
        log::warn!("empty input mesh, yielding no hull");
        return false;
    }

    if points
        .iter()
        .any(|pt| !pt.iter().all(|coord| coord.is_finite()))
    {
        log::warn!("non-finite vertex coordinate, yielding no hull");
        return false;
    }

    let num_points = points.len() as u32;

    if triangles
        .iter()
        .any(|tri| tri.iter().any(|idx| *idx >= num_points))
    {
        log::warn!("triangle index out of bounds, yielding no hull");
        return false;
    }

    true
}
