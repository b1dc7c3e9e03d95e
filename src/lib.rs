/*!
vhacd3d
========

**vhacd3d** computes an approximate convex decomposition of an arbitrary 3D
triangle mesh: the input surface is voxelized, the voxel volume is recursively
split along axis-aligned planes until every piece is convex enough, and the
resulting pieces are turned into convex hulls that are merged, simplified and
optionally shrink-wrapped back onto the source surface.

The decomposition is a pure in-memory transform: it borrows a vertex and index
buffer and returns an ordered sequence of [`ConvexHull`]s.

```
use vhacd3d::{decompose, Parameters};
use vhacd3d::na::Point3;

let points = vec![
    Point3::new(0.0, 0.0, 0.0),
    Point3::new(1.0, 0.0, 0.0),
    Point3::new(0.0, 1.0, 0.0),
    Point3::new(0.0, 0.0, 1.0),
];
let triangles = vec![[0u32, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];

let params = Parameters {
    resolution: 10_000,
    ..Parameters::default()
};
let decomposition = decompose(&params, &points, &triangles).unwrap();
assert!(!decomposition.hulls().is_empty());
```
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.

#[macro_use]
extern crate approx;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod convex_hull;
mod decomposition;
pub mod math;
pub mod query;
pub mod shape;
pub mod utils;
pub mod voxelization;

pub use crate::convex_hull::{check_convex_hull, convex_hull, try_convex_hull, ConvexHullError};
pub use crate::decomposition::{
    decompose, CancellationToken, ConvexHull, Decomposer, Decomposition, DecompositionError,
    Parameters, Stage, Stats,
};
pub use crate::voxelization::FillMode;
