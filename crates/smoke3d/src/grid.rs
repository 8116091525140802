//! 3D MAC (Marker-and-Cell) staggered grid storage for smoke simulation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Dense 3D scalar sample storage with a fixed world-space sample offset.
///
/// One instance backs each simulation field. Cell-centered fields (pressure,
/// density, temperature) sample at cell midpoints; staggered velocity
/// components sample at face centers, with one extra sample along their own
/// axis. The offset encodes where sample (0,0,0) sits in world space, so the
/// same interpolation code serves every field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridData3 {
    nx: usize,
    ny: usize,
    nz: usize,
    cell_size: f32,
    #[serde(
        serialize_with = "crate::serde_utils::serialize_vec3",
        deserialize_with = "crate::serde_utils::deserialize_vec3"
    )]
    offset: Vec3,
    data: Vec<f32>,
}

impl GridData3 {
    fn new(nx: usize, ny: usize, nz: usize, cell_size: f32, offset: Vec3, fill: f32) -> Self {
        Self {
            nx,
            ny,
            nz,
            cell_size,
            offset,
            data: vec![fill; nx * ny * nz],
        }
    }

    /// Cell-centered field: width x height x depth samples at cell midpoints.
    pub fn cell_centered(width: usize, height: usize, depth: usize, cell_size: f32, fill: f32) -> Self {
        let half = 0.5 * cell_size;
        Self::new(width, height, depth, cell_size, Vec3::new(half, half, half), fill)
    }

    /// U component: (width+1) x height x depth samples on YZ face centers.
    pub fn u_faces(width: usize, height: usize, depth: usize, cell_size: f32) -> Self {
        let half = 0.5 * cell_size;
        Self::new(width + 1, height, depth, cell_size, Vec3::new(0.0, half, half), 0.0)
    }

    /// V component: width x (height+1) x depth samples on XZ face centers.
    pub fn v_faces(width: usize, height: usize, depth: usize, cell_size: f32) -> Self {
        let half = 0.5 * cell_size;
        Self::new(width, height + 1, depth, cell_size, Vec3::new(half, 0.0, half), 0.0)
    }

    /// W component: width x height x (depth+1) samples on XY face centers.
    pub fn w_faces(width: usize, height: usize, depth: usize, cell_size: f32) -> Self {
        let half = 0.5 * cell_size;
        Self::new(width, height, depth + 1, cell_size, Vec3::new(half, half, 0.0), 0.0)
    }

    /// Sample counts along each axis.
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    /// Flat index, i innermost then j then k.
    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        k * self.nx * self.ny + j * self.nx + i
    }

    #[inline]
    pub fn at(&self, i: usize, j: usize, k: usize) -> f32 {
        self.data[self.index(i, j, k)]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, k: usize, value: f32) {
        let idx = self.index(i, j, k);
        self.data[idx] = value;
    }

    /// World position of the sample at grid indices (i, j, k).
    #[inline]
    pub fn position(&self, i: usize, j: usize, k: usize) -> Vec3 {
        self.offset
            + Vec3::new(
                i as f32 * self.cell_size,
                j as f32 * self.cell_size,
                k as f32 * self.cell_size,
            )
    }

    /// Trilinear interpolation at an arbitrary world-space point.
    ///
    /// Out-of-domain positions clamp to the nearest stored sample region
    /// rather than extrapolating, so samples never blow up near walls.
    pub fn interpolate(&self, pt: Vec3) -> f32 {
        let local = (pt - self.offset) / self.cell_size;

        let fx = local.x.clamp(0.0, (self.nx - 1) as f32);
        let fy = local.y.clamp(0.0, (self.ny - 1) as f32);
        let fz = local.z.clamp(0.0, (self.nz - 1) as f32);

        let i0 = fx.floor() as usize;
        let j0 = fy.floor() as usize;
        let k0 = fz.floor() as usize;
        let i1 = (i0 + 1).min(self.nx - 1);
        let j1 = (j0 + 1).min(self.ny - 1);
        let k1 = (k0 + 1).min(self.nz - 1);

        let tx = fx - i0 as f32;
        let ty = fy - j0 as f32;
        let tz = fz - k0 as f32;

        let c000 = self.at(i0, j0, k0);
        let c100 = self.at(i1, j0, k0);
        let c010 = self.at(i0, j1, k0);
        let c110 = self.at(i1, j1, k0);
        let c001 = self.at(i0, j0, k1);
        let c101 = self.at(i1, j0, k1);
        let c011 = self.at(i0, j1, k1);
        let c111 = self.at(i1, j1, k1);

        let c00 = c000 * (1.0 - tx) + c100 * tx;
        let c10 = c010 * (1.0 - tx) + c110 * tx;
        let c01 = c001 * (1.0 - tx) + c101 * tx;
        let c11 = c011 * (1.0 - tx) + c111 * tx;

        let c0 = c00 * (1.0 - ty) + c10 * ty;
        let c1 = c01 * (1.0 - ty) + c11 * ty;

        c0 * (1.0 - tz) + c1 * tz
    }

    /// Overwrite every sample.
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Sum of all samples.
    pub fn sum(&self) -> f32 {
        self.data.iter().map(|&v| v as f64).sum::<f64>() as f32
    }

    /// Largest absolute sample value.
    pub fn max_abs(&self) -> f32 {
        self.data.iter().fold(0.0f32, |acc, &v| acc.max(v.abs()))
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }
}

/// 3D MAC grid with staggered velocities.
///
/// Velocity components are stored on cell faces:
/// - u (X-velocity) on YZ faces at x = i * dx
/// - v (Y-velocity) on XZ faces at y = j * dx
/// - w (Z-velocity) on XY faces at z = k * dx
///
/// Pressure, density, and temperature are stored at cell centers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MacGrid3D {
    /// Number of cells in X direction
    pub width: usize,
    /// Number of cells in Y direction
    pub height: usize,
    /// Number of cells in Z direction
    pub depth: usize,
    /// Size of each cell in world units
    pub cell_size: f32,

    /// U velocity (X-component) on left YZ faces
    pub u: GridData3,
    /// V velocity (Y-component) on bottom XZ faces
    pub v: GridData3,
    /// W velocity (Z-component) on back XY faces
    pub w: GridData3,
    /// Pressure at cell centers
    pub pressure: GridData3,
    /// Smoke density at cell centers
    pub density: GridData3,
    /// Temperature at cell centers
    pub temperature: GridData3,
}

impl MacGrid3D {
    /// Create a new grid with the given dimensions, all fields at their
    /// defaults (zero, except temperature which fills with `ambient`).
    pub fn new(width: usize, height: usize, depth: usize, cell_size: f32, ambient: f32) -> Self {
        assert!(cell_size > 0.0, "cell_size must be positive, got {}", cell_size);
        assert!(
            width > 0 && height > 0 && depth > 0,
            "grid dimensions must be positive, got {}x{}x{}",
            width,
            height,
            depth
        );

        Self {
            width,
            height,
            depth,
            cell_size,
            u: GridData3::u_faces(width, height, depth, cell_size),
            v: GridData3::v_faces(width, height, depth, cell_size),
            w: GridData3::w_faces(width, height, depth, cell_size),
            pressure: GridData3::cell_centered(width, height, depth, cell_size, 0.0),
            density: GridData3::cell_centered(width, height, depth, cell_size, 0.0),
            temperature: GridData3::cell_centered(width, height, depth, cell_size, ambient),
        }
    }

    /// Refill every field with its default value.
    pub fn clear(&mut self, ambient: f32) {
        self.u.fill(0.0);
        self.v.fill(0.0);
        self.w.fill(0.0);
        self.pressure.fill(0.0);
        self.density.fill(0.0);
        self.temperature.fill(ambient);
    }

    /// Total cell count.
    pub fn cell_count(&self) -> usize {
        self.width * self.height * self.depth
    }

    /// Flat index into cell-centered fields.
    #[inline]
    pub fn cell_index(&self, i: usize, j: usize, k: usize) -> usize {
        k * self.width * self.height + j * self.width + i
    }

    /// World position of cell center at grid indices (i, j, k).
    #[inline]
    pub fn cell_center(&self, i: usize, j: usize, k: usize) -> Vec3 {
        Vec3::new(
            (i as f32 + 0.5) * self.cell_size,
            (j as f32 + 0.5) * self.cell_size,
            (k as f32 + 0.5) * self.cell_size,
        )
    }

    /// Total world size in each direction.
    pub fn world_size(&self) -> Vec3 {
        Vec3::new(
            self.width as f32 * self.cell_size,
            self.height as f32 * self.cell_size,
            self.depth as f32 * self.cell_size,
        )
    }

    /// Interpolated velocity at an arbitrary world point.
    ///
    /// Each staggered component is interpolated independently on its own
    /// face grid. Every stage that needs velocity samples goes through here.
    #[inline]
    pub fn velocity_at(&self, pt: Vec3) -> Vec3 {
        Vec3::new(
            self.u.interpolate(pt),
            self.v.interpolate(pt),
            self.w.interpolate(pt),
        )
    }

    /// Interpolated smoke density at an arbitrary world point.
    #[inline]
    pub fn density_at(&self, pt: Vec3) -> f32 {
        self.density.interpolate(pt)
    }

    /// Interpolated temperature at an arbitrary world point.
    #[inline]
    pub fn temperature_at(&self, pt: Vec3) -> f32 {
        self.temperature.interpolate(pt)
    }

    /// Discrete divergence of the velocity field at cell (i, j, k).
    #[inline]
    pub fn divergence(&self, i: usize, j: usize, k: usize) -> f32 {
        let du = self.u.at(i + 1, j, k) - self.u.at(i, j, k);
        let dv = self.v.at(i, j + 1, k) - self.v.at(i, j, k);
        let dw = self.w.at(i, j, k + 1) - self.w.at(i, j, k);
        (du + dv + dw) / self.cell_size
    }
}
