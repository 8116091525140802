//! 3D Eulerian smoke simulation on a staggered MAC grid.
//!
//! Advances a smoke-like incompressible continuum by injecting sources,
//! semi-Lagrangian advection of velocity and scalars, buoyancy and
//! vorticity-confinement forces, and a pressure projection solved with
//! conjugate gradient.
//!
//! # Example
//!
//! ```
//! use smoke3d::SmokeSimulation3D;
//! use glam::Vec3;
//!
//! let mut sim = SmokeSimulation3D::new(8, 8, 8, 0.5);
//!
//! // Run a few steps of the default corner plume.
//! for _ in 0..5 {
//!     sim.simulate(1.0 / 30.0);
//! }
//!
//! let density = sim.density_at(Vec3::new(0.25, 0.75, 0.25));
//! assert!(density.is_finite());
//! ```

pub mod advection;
pub mod export;
pub mod forces;
pub mod grid;
pub mod operator;
pub mod projection;
pub mod serde_utils;
pub mod solver;
pub mod source;

use std::io::{self, Write};
use std::mem;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use glam::Vec3;
pub use grid::{GridData3, MacGrid3D};
pub use operator::StencilMatrix;
pub use solver::{PcgSolver, SolveReport};
pub use source::SmokeSource;

/// Physical and solver parameters for one simulation instance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SmokeParams {
    /// Constant fluid density used by the pressure projection.
    pub fluid_density: f32,
    /// Temperature the domain relaxes toward; buoyancy measures against it.
    pub ambient_temperature: f32,
    /// Buoyancy weight on smoke density (pulls heavy smoke down).
    pub buoyancy_alpha: f32,
    /// Buoyancy weight on temperature deviation (pushes hot gas up).
    pub buoyancy_beta: f32,
    /// Vorticity confinement strength; 0 disables the stage.
    pub vorticity_epsilon: f32,
    /// Hard cap on conjugate-gradient iterations per projection.
    pub solver_max_iterations: usize,
    /// Infinity-norm residual threshold for the pressure solve.
    pub solver_tolerance: f32,
}

impl Default for SmokeParams {
    fn default() -> Self {
        Self {
            fluid_density: 1.0,
            ambient_temperature: 0.0,
            buoyancy_alpha: 0.08,
            buoyancy_beta: 0.37,
            vorticity_epsilon: 0.10,
            solver_max_iterations: 10_000,
            solver_tolerance: 1e-3,
        }
    }
}

/// 3D smoke simulation driver.
///
/// Owns the full field set and advances it with a fixed five-stage pipeline
/// per step: sources, advection, external forces, pressure projection.
/// Single-threaded and synchronous; `simulate` runs to completion before
/// returning.
pub struct SmokeSimulation3D {
    /// The staggered grid holding all live fields.
    pub grid: MacGrid3D,
    /// Driver-owned shadow grid; stages write here, then commit by swap.
    target: MacGrid3D,
    /// Pressure operator, rebuilt only by `reset()`.
    operator: StencilMatrix,
    solver: PcgSolver,
    /// Physics and solver configuration.
    pub params: SmokeParams,
    /// Deterministic emitters applied at the start of every step.
    pub sources: Vec<SmokeSource>,
    /// Steps taken since creation or the last reset.
    pub frame: u32,
    last_solve: Option<SolveReport>,
}

impl SmokeSimulation3D {
    /// Create a simulation with the given grid dimensions and cell size,
    /// default parameters, and the classic corner plume source.
    pub fn new(width: usize, height: usize, depth: usize, cell_size: f32) -> Self {
        let params = SmokeParams::default();
        let grid = MacGrid3D::new(width, height, depth, cell_size, params.ambient_temperature);
        let target = grid.clone();
        let operator = StencilMatrix::build(width, height, depth);
        let solver = PcgSolver::new(grid.cell_count());

        Self {
            grid,
            target,
            operator,
            solver,
            params,
            sources: vec![SmokeSource::corner_plume()],
            frame: 0,
            last_solve: None,
        }
    }

    /// Advance the simulation by one step of `dt` seconds.
    pub fn simulate(&mut self, dt: f32) {
        assert!(dt > 0.0, "dt must be positive, got {}", dt);

        self.update_sources();
        self.advect_velocity(dt);
        self.advect_temperature(dt);
        self.advect_density(dt);
        self.commit_advection();
        self.add_external_forces(dt);
        self.project(dt);

        self.frame += 1;
        log::debug!(
            "frame {}: total density {:.4}, solve {:?}",
            self.frame,
            self.grid.density.sum(),
            self.last_solve
        );
    }

    /// Reinitialize all fields and rebuild the pressure operator.
    ///
    /// Call after changing grid topology, never otherwise; the operator is
    /// static per run.
    pub fn reset(&mut self) {
        self.grid.clear(self.params.ambient_temperature);
        self.target.clear(self.params.ambient_temperature);
        self.operator = StencilMatrix::build(self.grid.width, self.grid.height, self.grid.depth);
        self.solver.resize(self.grid.cell_count());
        self.frame = 0;
        self.last_solve = None;
    }

    /// Re-assert every configured emitter.
    fn update_sources(&mut self) {
        source::apply_sources(&mut self.grid, &self.sources);
    }

    fn advect_velocity(&mut self, dt: f32) {
        advection::advect_velocity(&self.grid, &mut self.target, dt);
    }

    fn advect_temperature(&mut self, dt: f32) {
        advection::advect_scalar(
            &self.grid,
            &self.grid.temperature,
            &mut self.target.temperature,
            dt,
        );
    }

    fn advect_density(&mut self, dt: f32) {
        advection::advect_scalar(&self.grid, &self.grid.density, &mut self.target.density, dt);
    }

    /// Commit every advected field at once, so velocity and scalars all
    /// traced through the same frozen pre-step velocity.
    fn commit_advection(&mut self) {
        mem::swap(&mut self.grid.u, &mut self.target.u);
        mem::swap(&mut self.grid.v, &mut self.target.v);
        mem::swap(&mut self.grid.w, &mut self.target.w);
        mem::swap(&mut self.grid.temperature, &mut self.target.temperature);
        mem::swap(&mut self.grid.density, &mut self.target.density);
    }

    /// Buoyancy, then vorticity confinement, each committing at its own
    /// stage boundary.
    fn add_external_forces(&mut self, dt: f32) {
        forces::apply_buoyancy(&self.grid, &mut self.target, dt, &self.params);
        mem::swap(&mut self.grid.v, &mut self.target.v);

        forces::apply_vorticity_confinement(&self.grid, &mut self.target, dt, &self.params);
        mem::swap(&mut self.grid.u, &mut self.target.u);
        mem::swap(&mut self.grid.v, &mut self.target.v);
        mem::swap(&mut self.grid.w, &mut self.target.w);
    }

    /// Pressure projection; non-convergence degrades to best effort.
    fn project(&mut self, dt: f32) {
        let report = projection::project(
            &self.grid,
            &mut self.target,
            &self.operator,
            &mut self.solver,
            &self.params,
            dt,
        );
        mem::swap(&mut self.grid.pressure, &mut self.target.pressure);
        mem::swap(&mut self.grid.u, &mut self.target.u);
        mem::swap(&mut self.grid.v, &mut self.target.v);
        mem::swap(&mut self.grid.w, &mut self.target.w);
        self.last_solve = Some(report);
    }

    // ========== Read-only collaborator interface ==========

    /// Interpolated velocity at an arbitrary world point.
    pub fn velocity_at(&self, pt: Vec3) -> Vec3 {
        self.grid.velocity_at(pt)
    }

    /// Interpolated smoke density at an arbitrary world point.
    pub fn density_at(&self, pt: Vec3) -> f32 {
        self.grid.density_at(pt)
    }

    /// Interpolated temperature at an arbitrary world point.
    pub fn temperature_at(&self, pt: Vec3) -> f32 {
        self.grid.temperature_at(pt)
    }

    /// RGBA render color of a cell: white with density as opacity.
    pub fn render_color(&self, i: usize, j: usize, k: usize) -> [f32; 4] {
        [1.0, 1.0, 1.0, self.grid.density.at(i, j, k)]
    }

    /// RGBA render color at an arbitrary world point.
    pub fn render_color_at(&self, pt: Vec3) -> [f32; 4] {
        [1.0, 1.0, 1.0, self.grid.density_at(pt)]
    }

    /// Outcome of the most recent pressure solve, if any step has run.
    pub fn last_projection(&self) -> Option<SolveReport> {
        self.last_solve
    }

    /// World bounds as (min, max) corners.
    pub fn world_bounds(&self) -> (Vec3, Vec3) {
        (Vec3::ZERO, self.grid.world_size())
    }

    /// Write the density snapshot to any writer, one value per line.
    pub fn write_density_snapshot<W: Write>(&self, out: W) -> io::Result<()> {
        export::write_density_snapshot(&self.grid, out)
    }

    /// Save the density snapshot to a file.
    pub fn save_smoke<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        export::save_smoke(&self.grid, path)
    }
}
