//! Type aliases for the mathematical types used throughout this crate.

/// The scalar type used throughout this crate.
///
/// Decomposition runs in double precision: voxel volume sums and hull volume
/// comparisons at high resolutions lose too much accuracy in single precision.
pub type Real = f64;

/// The point type.
pub use na::Point3 as Point;

/// The vector type.
pub use na::Vector3 as Vector;

/// The 3x3 matrix type.
pub use na::Matrix3 as Matrix;

/// The default tolerance used for geometric operations.
pub const DEFAULT_EPSILON: Real = Real::EPSILON;

/// The dimension of the space.
pub const DIM: usize = 3;
