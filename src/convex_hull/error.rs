/// Errors that can be detected on a convex hull, either while computing it or
/// while validating one with [`check_convex_hull`](super::check_convex_hull).
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConvexHullError {
    /// No point was given to the convex-hull algorithm.
    #[error("less than 1 point was given to the convex-hull algorithm")]
    IncompleteInput,
    /// An edge of the triangulated surface is shared by more than two triangles.
    #[error("detected t-junction for triangle {0}, edge ({1}, {2})")]
    TJunction(usize, u32, u32),
    /// An edge of the triangulated surface has no opposite half-edge: the
    /// surface is not closed.
    #[error("edge ({0}, {1}) has no opposite half-edge")]
    OpenEdge(u32, u32),
    /// A point of the hull lies outside the plane of one of its triangles.
    #[error("point {point} lies outside the plane of triangle {triangle}")]
    NonConvex {
        /// The index of the offending triangle.
        triangle: usize,
        /// The index of the point found outside the triangle's plane.
        point: usize,
    },
}
