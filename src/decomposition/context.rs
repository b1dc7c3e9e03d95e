use super::Parameters;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

/// A shareable handle used to cancel a decomposition run cooperatively.
///
/// Workers poll the token between cluster-processing steps; once cancelled,
/// outstanding work is abandoned and the run returns the hulls completed so
/// far, flagged as interrupted.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates a new, non-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the cancellation of the run sharing this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Has this token been cancelled?
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The pipeline stage a progress notification refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    /// The input surface is rasterized into a voxel grid.
    Voxelization,
    /// The voxel volume is recursively split into convex-enough clusters and
    /// their hulls are computed.
    Decomposition,
    /// Hulls are merged pairwise down to the configured budget.
    MergeHulls,
    /// Hull vertex counts are reduced to the configured budget.
    SimplifyHulls,
    /// Hull vertices are projected back onto the source surface.
    ShrinkWrap,
}

/// Statistics accumulated during a decomposition run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// The number of occupied voxels of the root cluster.
    pub voxel_count: usize,
    /// The number of terminal clusters produced by the splitter.
    pub terminal_clusters: usize,
    /// The deepest recursion level reached by the splitter.
    pub max_depth_reached: u32,
}

pub(super) type ProgressCallback = dyn Fn(Stage, f32) + Send + Sync;

/// Per-run shared state: configuration, cancellation, progress reporting and
/// counters. Created when a run starts and dropped when it completes.
pub(super) struct ComputationContext<'a> {
    pub params: &'a Parameters,
    cancel: &'a CancellationToken,
    progress: Option<&'a ProgressCallback>,
    max_depth_reached: AtomicU32,
    processed_voxels: AtomicU64,
    total_voxels: u64,
}

impl<'a> ComputationContext<'a> {
    pub fn new(
        params: &'a Parameters,
        cancel: &'a CancellationToken,
        progress: Option<&'a ProgressCallback>,
        total_voxels: u64,
    ) -> Self {
        Self {
            params,
            cancel,
            progress,
            max_depth_reached: AtomicU32::new(0),
            processed_voxels: AtomicU64::new(0),
            total_voxels,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Invokes the progress callback, from whatever thread completed the
    /// corresponding unit of work.
    pub fn report(&self, stage: Stage, fraction: f32) {
        if let Some(progress) = self.progress {
            progress(stage, fraction.clamp(0.0, 1.0));
        }
    }

    pub fn note_depth(&self, depth: u32) {
        self.max_depth_reached.fetch_max(depth, Ordering::Relaxed);
    }

    pub fn max_depth_reached(&self) -> u32 {
        self.max_depth_reached.load(Ordering::Relaxed)
    }

    /// Records that `voxels` voxels reached a terminal cluster and reports
    /// the decomposition progress accordingly.
    pub fn note_processed_voxels(&self, voxels: u64) {
        let done = self.processed_voxels.fetch_add(voxels, Ordering::Relaxed) + voxels;

        if self.total_voxels > 0 {
            self.report(
                Stage::Decomposition,
                done as f32 / self.total_voxels as f32,
            );
        }
    }
}
