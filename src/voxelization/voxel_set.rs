use super::{VoxelState, VoxelizedVolume};
use crate::math::{Point, Real, Vector};

/// A single occupied voxel of a [`VoxelSet`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Voxel {
    /// The integer coordinates of the voxel on the voxel grid.
    pub coords: Point<u32>,
    /// Is this voxel on the surface of the volume (i.e. not strictly inside
    /// of it)?
    pub is_on_surface: bool,
}

/// A sparse set of voxels.
///
/// It only contains the voxels considered as "full" after a voxelization: the
/// root set groups every surface and interior cell of a [`VoxelizedVolume`],
/// and the recursive splitter produces sub-sets of it.
pub struct VoxelSet {
    /// The world-space position of the center of the voxel with integer
    /// coordinates `(0, 0, 0)`.
    pub origin: Point<Real>,
    /// The edge length of one voxel.
    pub scale: Real,
    voxels: Vec<Voxel>,
    min_bb: Point<u32>,
    max_bb: Point<u32>,
}

impl VoxelSet {
    /// Creates a voxel set from a list of voxels, caching its integer
    /// bounding box.
    pub(crate) fn with_voxels(origin: Point<Real>, scale: Real, voxels: Vec<Voxel>) -> Self {
        let mut result = Self {
            origin,
            scale,
            voxels,
            min_bb: Point::origin(),
            max_bb: Point::origin(),
        };
        result.compute_bb();
        result
    }

    fn compute_bb(&mut self) {
        if self.voxels.is_empty() {
            return;
        }

        self.min_bb = self.voxels[0].coords;
        self.max_bb = self.voxels[0].coords;

        for voxel in &self.voxels {
            self.min_bb = self.min_bb.inf(&voxel.coords);
            self.max_bb = self.max_bb.sup(&voxel.coords);
        }
    }

    /// The number of voxels in this set.
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// Is this voxel set empty?
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// The voxels of this set.
    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    /// The minimal integer coordinates of the voxels of this set.
    pub fn min_bb(&self) -> Point<u32> {
        self.min_bb
    }

    /// The maximal integer coordinates of the voxels of this set.
    pub fn max_bb(&self) -> Point<u32> {
        self.max_bb
    }

    /// The number of voxels spanned by the bounding box of this set along
    /// each axis.
    pub fn extents(&self) -> Vector<u32> {
        if self.is_empty() {
            Vector::zeros()
        } else {
            self.max_bb - self.min_bb + Vector::repeat(1)
        }
    }

    /// The volume of a single voxel of this set.
    pub fn voxel_volume(&self) -> Real {
        self.scale * self.scale * self.scale
    }

    /// The total volume of the voxels contained by this set.
    pub fn volume(&self) -> Real {
        self.voxel_volume() * self.voxels.len() as Real
    }

    /// The world-space center of the given voxel.
    pub fn voxel_center(&self, voxel: &Voxel) -> Point<Real> {
        self.origin + voxel.coords.map(|e| e as Real).coords * self.scale
    }

    /// Applies `f` to the eight world-space corners of the given voxel.
    pub(crate) fn map_voxel_corners(&self, voxel: &Voxel, mut f: impl FnMut(Point<Real>)) {
        let center = self.voxel_center(voxel);
        let half = self.scale / 2.0;

        for shift in [
            Vector::new(-half, -half, -half),
            Vector::new(half, -half, -half),
            Vector::new(half, half, -half),
            Vector::new(-half, half, -half),
            Vector::new(-half, -half, half),
            Vector::new(half, -half, half),
            Vector::new(half, half, half),
            Vector::new(-half, half, half),
        ] {
            f(center + shift)
        }
    }

    /// The corner points of the on-surface voxels of this set; these are the
    /// points the cluster convex hull is computed from.
    ///
    /// Falls back to the corners of every voxel if none is flagged on-surface.
    pub fn surface_corner_points(&self) -> Vec<Point<Real>> {
        let num_on_surface = self.voxels.iter().filter(|v| v.is_on_surface).count();
        let mut points = Vec::with_capacity(8 * num_on_surface.max(1));

        if num_on_surface != 0 {
            for voxel in self.voxels.iter().filter(|v| v.is_on_surface) {
                self.map_voxel_corners(voxel, |pt| points.push(pt));
            }
        } else {
            for voxel in &self.voxels {
                self.map_voxel_corners(voxel, |pt| points.push(pt));
            }
        }

        points
    }

    /// Splits this voxel set in two along the axis-aligned plane between the
    /// grid slices `index` and `index + 1` of the given axis.
    ///
    /// A voxel goes to the lower part iff `coords[axis] <= index`, so the
    /// assignment is exact and run-independent. Voxels touching the cut are
    /// flagged on-surface in their respective parts so that the cut faces
    /// contribute points to the sub-hulls.
    pub fn clip(&self, axis: usize, index: u32) -> (VoxelSet, VoxelSet) {
        let mut lower = Vec::with_capacity(self.voxels.len());
        let mut upper = Vec::with_capacity(self.voxels.len());

        for voxel in &self.voxels {
            let mut voxel = *voxel;

            if voxel.coords[axis] <= index {
                voxel.is_on_surface = voxel.is_on_surface || voxel.coords[axis] == index;
                lower.push(voxel);
            } else {
                voxel.is_on_surface = voxel.is_on_surface || voxel.coords[axis] == index + 1;
                upper.push(voxel);
            }
        }

        (
            VoxelSet::with_voxels(self.origin, self.scale, lower),
            VoxelSet::with_voxels(self.origin, self.scale, upper),
        )
    }
}

impl From<VoxelizedVolume> for VoxelSet {
    fn from(volume: VoxelizedVolume) -> Self {
        let mut voxels = Vec::new();

        if !volume.is_empty() {
            let dims = volume.resolution();
            voxels.reserve(
                (volume.num_surface_cells() + volume.num_interior_cells()) as usize,
            );

            for i in 0..dims.x {
                for j in 0..dims.y {
                    for k in 0..dims.z {
                        match volume.voxel(i, j, k) {
                            VoxelState::Surface => voxels.push(Voxel {
                                coords: Point::new(i, j, k),
                                is_on_surface: true,
                            }),
                            VoxelState::Interior => voxels.push(Voxel {
                                coords: Point::new(i, j, k),
                                is_on_surface: false,
                            }),
                            _ => {}
                        }
                    }
                }
            }
        }

        VoxelSet::with_voxels(volume.origin(), volume.scale(), voxels)
    }
}
