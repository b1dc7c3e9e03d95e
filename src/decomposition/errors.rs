/// Errors surfaced by a decomposition run.
///
/// Only configuration and resource problems are reported this way, before any
/// heavy work starts. Malformed meshes yield an empty (but `Ok`) result, and
/// geometric degeneracies encountered mid-pipeline are absorbed by the hull
/// builder's fallbacks.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecompositionError {
    /// A parameter lies outside of its documented range.
    #[error("parameter `{name}` is out of range: {reason}")]
    InvalidParameter {
        /// The name of the offending parameter field.
        name: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
    /// The requested resolution implies a voxel grid too large to allocate.
    #[error("the voxel grid would need {requested} cells (limit: {limit})")]
    ResourceLimit {
        /// The number of cells the grid would need.
        requested: u64,
        /// The hard cap on grid cells.
        limit: u64,
    },
}
