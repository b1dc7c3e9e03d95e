//! Voxelization of a 3D triangle mesh.

pub use self::voxel_set::{Voxel, VoxelSet};
pub use self::voxelized_volume::{FillMode, VoxelState, VoxelizedVolume};

mod voxel_set;
mod voxelized_volume;
