//! Approximate convex decomposition of a triangle mesh.

pub use self::context::{CancellationToken, Stage, Stats};
pub use self::decomposer::{decompose, Decomposer, Decomposition};
pub use self::errors::DecompositionError;
pub use self::hull::ConvexHull;
pub use self::parameters::Parameters;

mod context;
mod decomposer;
mod errors;
mod evaluation;
mod hull;
mod parameters;
mod post_processing;
mod splitter;
