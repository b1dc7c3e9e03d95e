use crate::bounding_volume::Aabb;
use crate::decomposition::DecompositionError;
use crate::math::{Point, Real, Vector};
use crate::query;
use crate::shape::Triangle;

/// Hard cap on the number of cells a voxel grid may allocate.
///
/// One cell is one byte, so this bounds the grid at 2GiB. The cap is checked
/// before any allocation happens.
pub(crate) const MAX_GRID_CELLS: u64 = 1 << 31;

/// Maximum number of cells marked ahead of the raster-scan exterior
/// propagation in each direction. Bounding the walk keeps it inside the
/// cache; convergence is reached by re-scanning.
const WALK_DISTANCE: u32 = 64;

/// Controls how the interior of the voxelized mesh is filled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum FillMode {
    /// Classify the exterior by propagating from the grid boundary, without
    /// crossing surface cells; everything unreached becomes interior.
    FloodFill,
    /// Only the cells intersecting the surface are occupied.
    SurfaceOnly,
    /// Classify each cell by counting surface crossings along a ray (even-odd
    /// rule). Slower than the flood fill, but robust against non-manifold
    /// geometry that lets a flood fill leak inside.
    RaycastFill,
}

/// The classification of a single grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VoxelState {
    /// Not classified yet.
    Unclassified,
    /// Scheduled to be converted to `Exterior` by the flood fill.
    ExteriorPending,
    /// Outside of the mesh.
    Exterior,
    /// Inside of the mesh.
    Interior,
    /// Intersecting the mesh surface.
    Surface,
}

/// A dense voxelization of a triangle mesh.
///
/// The cell with integer coordinates `(i, j, k)` is the cube of edge
/// [`scale`](Self::scale) centered at `origin + (i, j, k) * scale`. The grid
/// covers the mesh bounding box plus at least half a cell of margin on every
/// side.
pub struct VoxelizedVolume {
    origin: Point<Real>,
    scale: Real,
    resolution: Vector<u32>,
    data: Vec<VoxelState>,
    num_surface_cells: u32,
    num_interior_cells: u32,
    num_exterior_cells: u32,
}

impl VoxelizedVolume {
    /// Voxelizes a triangle mesh.
    ///
    /// The cell size is chosen so that the total cell count of the grid does
    /// not exceed `resolution`, with every axis subdivided at least
    /// `min_edge_length` times.
    ///
    /// A degenerate mesh (no triangles, non-finite coordinates, or a
    /// zero-volume bounding box) yields an empty grid.
    pub fn voxelize(
        points: &[Point<Real>],
        triangles: &[[u32; 3]],
        resolution: u32,
        fill_mode: FillMode,
        min_edge_length: u32,
    ) -> Result<Self, DecompositionError> {
        let mut result = VoxelizedVolume {
            origin: Point::origin(),
            scale: 1.0,
            resolution: Vector::zeros(),
            data: Vec::new(),
            num_surface_cells: 0,
            num_interior_cells: 0,
            num_exterior_cells: 0,
        };

        if resolution as u64 > MAX_GRID_CELLS {
            return Err(DecompositionError::ResourceLimit {
                requested: resolution as u64,
                limit: MAX_GRID_CELLS,
            });
        }

        if points.is_empty() || triangles.is_empty() {
            return Ok(result);
        }

        // `points` is non-empty here.
        let aabb = Aabb::from_points(points).expect("empty point set");

        if !aabb.is_valid() || aabb.extents().iter().any(|e| *e <= 0.0) {
            log::warn!("degenerate mesh bounding box, yielding an empty voxel grid");
            return Ok(result);
        }

        result.origin = aabb.mins;
        result.fit_cell_size(&aabb, resolution, min_edge_length.max(1));
        result.allocate();

        // Rasterize the surface.
        let inv_scale = 1.0 / result.scale;
        let scaled_triangles: Vec<Triangle> = triangles
            .iter()
            .map(|tri| {
                Triangle::new(
                    (points[tri[0] as usize] - result.origin.coords) * inv_scale,
                    (points[tri[1] as usize] - result.origin.coords) * inv_scale,
                    (points[tri[2] as usize] - result.origin.coords) * inv_scale,
                )
            })
            .collect();

        let box_half_extents = Vector::repeat(0.5);

        for tri in &scaled_triangles {
            let tri_aabb = Aabb::from_points(&[tri.a, tri.b, tri.c]).expect("empty point set");
            let range0 = result.cell_range_start(&tri_aabb.mins);
            let range1 = result.cell_range_end(&tri_aabb.maxs);

            for i in range0.x..range1.x {
                for j in range0.y..range1.y {
                    for k in range0.z..range1.z {
                        let id = result.cell_id(i, j, k);

                        if result.data[id] != VoxelState::Surface {
                            let center = Point::new(i as Real, j as Real, k as Real);

                            if query::triangle_aabb_overlap(&center, &box_half_extents, tri) {
                                result.data[id] = VoxelState::Surface;
                                result.num_surface_cells += 1;
                            }
                        }
                    }
                }
            }
        }

        match fill_mode {
            FillMode::SurfaceOnly => {
                for state in &mut result.data {
                    if *state != VoxelState::Surface {
                        *state = VoxelState::Exterior;
                        result.num_exterior_cells += 1;
                    }
                }
            }
            FillMode::FloodFill => {
                result.seed_exterior();
                result.propagate_exterior();
                result.fill_interior();
            }
            FillMode::RaycastFill => {
                result.raycast_fill(&scaled_triangles);
            }
        }

        Ok(result)
    }

    /// Picks a cell size fitting the total cell budget, and the matching grid
    /// dimensions.
    fn fit_cell_size(&mut self, aabb: &Aabb, resolution: u32, min_edge_length: u32) {
        let extents = aabb.extents();
        let volume = extents.x * extents.y * extents.z;
        let mut cell = (volume / resolution as Real).cbrt();
        let min_dim = min_edge_length.max(2);

        loop {
            let dims = Vector::new(
                ((extents.x / cell).ceil() as u32 + 1).max(min_dim),
                ((extents.y / cell).ceil() as u32 + 1).max(min_dim),
                ((extents.z / cell).ceil() as u32 + 1).max(min_dim),
            );
            let total = dims.x as u64 * dims.y as u64 * dims.z as u64;

            if total <= resolution as u64 || dims.iter().all(|d| *d == min_dim) {
                self.scale = cell;
                self.resolution = dims;
                return;
            }

            cell *= 1.05;
        }
    }

    fn allocate(&mut self) {
        let len = self.resolution.x as usize * self.resolution.y as usize
            * self.resolution.z as usize;
        self.data.resize(len, VoxelState::Unclassified);
    }

    /// The number of cells along each axis.
    pub fn resolution(&self) -> Vector<u32> {
        self.resolution
    }

    /// The edge length of one cell.
    pub fn scale(&self) -> Real {
        self.scale
    }

    /// The world-space position of the center of the cell `(0, 0, 0)`.
    pub fn origin(&self) -> Point<Real> {
        self.origin
    }

    /// Is this grid empty?
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The state of the given cell.
    pub fn voxel(&self, i: u32, j: u32, k: u32) -> VoxelState {
        self.data[self.cell_id(i, j, k)]
    }

    /// The number of cells intersecting the input surface.
    pub fn num_surface_cells(&self) -> u32 {
        self.num_surface_cells
    }

    /// The number of cells classified as interior.
    pub fn num_interior_cells(&self) -> u32 {
        self.num_interior_cells
    }

    /// The number of cells classified as exterior.
    pub fn num_exterior_cells(&self) -> u32 {
        self.num_exterior_cells
    }

    fn cell_id(&self, i: u32, j: u32, k: u32) -> usize {
        (i + j * self.resolution.x + k * self.resolution.x * self.resolution.y) as usize
    }

    /// First cell possibly covering `pt` (in grid coordinates), with a
    /// one-cell cushion.
    fn cell_range_start(&self, pt: &Point<Real>) -> Vector<u32> {
        let clamp = |v: Real, dim: u32| ((v + 0.5).floor() as i64 - 1).clamp(0, dim as i64) as u32;

        Vector::new(
            clamp(pt.x, self.resolution.x),
            clamp(pt.y, self.resolution.y),
            clamp(pt.z, self.resolution.z),
        )
    }

    /// One-past-the-last cell possibly covering `pt`, with a one-cell cushion.
    fn cell_range_end(&self, pt: &Point<Real>) -> Vector<u32> {
        let clamp = |v: Real, dim: u32| ((v + 0.5).ceil() as i64 + 2).clamp(0, dim as i64) as u32;

        Vector::new(
            clamp(pt.x, self.resolution.x),
            clamp(pt.y, self.resolution.y),
            clamp(pt.z, self.resolution.z),
        )
    }

    /// Marks every unclassified cell on the six boundary slabs of the grid as
    /// pending exterior.
    fn seed_exterior(&mut self) {
        let [nx, ny, nz] = [self.resolution.x, self.resolution.y, self.resolution.z];

        self.mark_exterior_pending(0, nx, 0, ny, 0, 1);
        self.mark_exterior_pending(0, nx, 0, ny, nz - 1, nz);
        self.mark_exterior_pending(0, nx, 0, 1, 0, nz);
        self.mark_exterior_pending(0, nx, ny - 1, ny, 0, nz);
        self.mark_exterior_pending(0, 1, 0, ny, 0, nz);
        self.mark_exterior_pending(nx - 1, nx, 0, ny, 0, nz);
    }

    fn mark_exterior_pending(&mut self, i0: u32, i1: u32, j0: u32, j1: u32, k0: u32, k1: u32) {
        for k in k0..k1 {
            for j in j0..j1 {
                for i in i0..i1 {
                    let id = self.cell_id(i, j, k);

                    if self.data[id] == VoxelState::Unclassified {
                        self.data[id] = VoxelState::ExteriorPending;
                    }
                }
            }
        }
    }

    /// Converts pending-exterior cells to exterior, walking a bounded
    /// distance along each axis to schedule neighbors.
    ///
    /// Scanning the whole grid repeatedly, in memory order, converges much
    /// faster than a BFS here: the sweeps are cache-friendly and there is no
    /// queue to maintain.
    fn propagate_exterior(&mut self) {
        let [nx, ny, nz] = [self.resolution.x, self.resolution.y, self.resolution.z];
        let istride = 1usize;
        let jstride = nx as usize;
        let kstride = (nx * ny) as usize;

        loop {
            let mut converted = 0;

            for k in 0..nz {
                for j in 0..ny {
                    for i in 0..nx {
                        let id = self.cell_id(i, j, k);

                        if self.data[id] == VoxelState::ExteriorPending {
                            self.data[id] = VoxelState::Exterior;
                            converted += 1;

                            Self::walk(&mut self.data, id, istride, nx - 1 - i);
                            Self::walk_back(&mut self.data, id, istride, i);
                            Self::walk(&mut self.data, id, jstride, ny - 1 - j);
                            Self::walk_back(&mut self.data, id, jstride, j);
                            Self::walk(&mut self.data, id, kstride, nz - 1 - k);
                            Self::walk_back(&mut self.data, id, kstride, k);
                        }
                    }
                }
            }

            self.num_exterior_cells += converted;

            if converted == 0 {
                return;
            }
        }
    }

    fn walk(data: &mut [VoxelState], mut id: usize, stride: usize, cells_left: u32) {
        for _ in 0..cells_left.min(WALK_DISTANCE) {
            id += stride;

            if data[id] != VoxelState::Unclassified {
                return;
            }

            data[id] = VoxelState::ExteriorPending;
        }
    }

    fn walk_back(data: &mut [VoxelState], mut id: usize, stride: usize, cells_left: u32) {
        for _ in 0..cells_left.min(WALK_DISTANCE) {
            id -= stride;

            if data[id] != VoxelState::Unclassified {
                return;
            }

            data[id] = VoxelState::ExteriorPending;
        }
    }

    /// Everything the exterior propagation could not reach is interior.
    fn fill_interior(&mut self) {
        for state in &mut self.data {
            if *state == VoxelState::Unclassified {
                *state = VoxelState::Interior;
                self.num_interior_cells += 1;
            }
        }
    }

    /// Classifies every non-surface cell with the even-odd rule: one +X ray
    /// per (y, z) column, counting surface crossings.
    fn raycast_fill(&mut self, scaled_triangles: &[Triangle]) {
        let [nx, ny, nz] = [self.resolution.x, self.resolution.y, self.resolution.z];

        // Triangles overlapping each column, by their (y, z) extents.
        let mut buckets: Vec<Vec<u32>> = vec![Vec::new(); (ny * nz) as usize];

        for (tid, tri) in scaled_triangles.iter().enumerate() {
            let tri_aabb = Aabb::from_points(&[tri.a, tri.b, tri.c]).expect("empty point set");
            let start = self.cell_range_start(&tri_aabb.mins);
            let end = self.cell_range_end(&tri_aabb.maxs);

            for k in start.z..end.z {
                for j in start.y..end.y {
                    buckets[(j + k * ny) as usize].push(tid as u32);
                }
            }
        }

        let dir = Vector::x();
        let mut crossings: Vec<Real> = Vec::new();

        for k in 0..nz {
            for j in 0..ny {
                crossings.clear();
                let ray_origin = Point::new(-1.0, j as Real, k as Real);

                for tid in &buckets[(j + k * ny) as usize] {
                    let tri = &scaled_triangles[*tid as usize];

                    if let Some(toi) = query::cast_ray_on_triangle(&ray_origin, &dir, tri) {
                        crossings.push(ray_origin.x + toi);
                    }
                }

                crossings.sort_unstable_by(|a, b| a.total_cmp(b));

                for i in 0..nx {
                    let id = self.cell_id(i, j, k);

                    if self.data[id] != VoxelState::Surface {
                        let x = i as Real;
                        let below = crossings.partition_point(|c| *c < x);

                        if below % 2 == 1 {
                            self.data[id] = VoxelState::Interior;
                            self.num_interior_cells += 1;
                        } else {
                            self.data[id] = VoxelState::Exterior;
                            self.num_exterior_cells += 1;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::{FillMode, VoxelState, VoxelizedVolume};
    use crate::math::{Point, Real};

    /// An axis-aligned cuboid mesh (12 triangles).
    pub(crate) fn cuboid_mesh(extents: [Real; 3]) -> (Vec<Point<Real>>, Vec<[u32; 3]>) {
        let [dx, dy, dz] = extents;
        let points = vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(dx, 0.0, 0.0),
            Point::new(dx, dy, 0.0),
            Point::new(0.0, dy, 0.0),
            Point::new(0.0, 0.0, dz),
            Point::new(dx, 0.0, dz),
            Point::new(dx, dy, dz),
            Point::new(0.0, dy, dz),
        ];
        let triangles = vec![
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [1, 2, 6],
            [1, 6, 5],
            [2, 3, 7],
            [2, 7, 6],
            [3, 0, 4],
            [3, 4, 7],
        ];
        (points, triangles)
    }

    #[test]
    fn empty_mesh_yields_empty_grid() {
        let grid =
            VoxelizedVolume::voxelize(&[], &[], 100_000, FillMode::FloodFill, 2).unwrap();
        assert!(grid.is_empty());

        // Zero-volume bounding box.
        let flat = vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
        ];
        let grid = VoxelizedVolume::voxelize(
            &flat,
            &[[0, 1, 2]],
            100_000,
            FillMode::FloodFill,
            2,
        )
        .unwrap();
        assert!(grid.is_empty());
    }

    #[test]
    fn oversized_resolution_is_rejected() {
        let (points, triangles) = cuboid_mesh([1.0, 1.0, 1.0]);
        assert!(VoxelizedVolume::voxelize(
            &points,
            &triangles,
            u32::MAX,
            FillMode::FloodFill,
            2
        )
        .is_err());
    }

    #[test]
    fn grid_fits_the_cell_budget() {
        let (points, triangles) = cuboid_mesh([1.0, 2.0, 4.0]);
        let grid =
            VoxelizedVolume::voxelize(&points, &triangles, 50_000, FillMode::FloodFill, 2)
                .unwrap();

        let dims = grid.resolution();
        assert!(dims.x as u64 * dims.y as u64 * dims.z as u64 <= 50_000);
        assert!(dims.iter().all(|d| *d >= 2));
    }

    #[test]
    fn cube_fill_modes_classify_the_center() {
        let (points, triangles) = cuboid_mesh([1.0, 1.0, 1.0]);

        for fill_mode in [FillMode::FloodFill, FillMode::RaycastFill] {
            let grid =
                VoxelizedVolume::voxelize(&points, &triangles, 100_000, fill_mode, 2).unwrap();
            assert!(grid.num_surface_cells() > 0);
            assert!(grid.num_interior_cells() > 0);

            let dims = grid.resolution();
            let center = grid.voxel(dims.x / 2, dims.y / 2, dims.z / 2);
            assert!(center == VoxelState::Interior);
        }

        let grid = VoxelizedVolume::voxelize(
            &points,
            &triangles,
            100_000,
            FillMode::SurfaceOnly,
            2,
        )
        .unwrap();
        assert_eq!(grid.num_interior_cells(), 0);
        assert!(grid.num_surface_cells() > 0);
    }
}
