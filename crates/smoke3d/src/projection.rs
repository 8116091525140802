//! Pressure projection: make the velocity field divergence-free.

use crate::grid::MacGrid3D;
use crate::operator::StencilMatrix;
use crate::solver::{PcgSolver, SolveReport};
use crate::SmokeParams;

/// Right-hand side of the pressure system: `d = -(rho * h^2 / dt) * div`.
pub fn compute_rhs(grid: &MacGrid3D, fluid_density: f32, dt: f32, rhs: &mut [f32]) {
    debug_assert_eq!(rhs.len(), grid.cell_count());
    let scale = -fluid_density * grid.cell_size * grid.cell_size / dt;

    for k in 0..grid.depth {
        for j in 0..grid.height {
            for i in 0..grid.width {
                rhs[grid.cell_index(i, j, k)] = scale * grid.divergence(i, j, k);
            }
        }
    }
}

/// Solve for pressure and subtract its gradient from the velocity field.
///
/// New pressure and velocities land in `target`; the caller commits by
/// swapping. Only faces strictly between two cells are updated; the
/// outermost boundary faces keep their value, which is what enforces the
/// zero-penetration wall condition.
pub fn project(
    grid: &MacGrid3D,
    target: &mut MacGrid3D,
    a: &StencilMatrix,
    solver: &mut PcgSolver,
    params: &SmokeParams,
    dt: f32,
) -> SolveReport {
    let mut rhs = vec![0.0; grid.cell_count()];
    compute_rhs(grid, params.fluid_density, dt, &mut rhs);

    let report = solver.solve(
        a,
        target.pressure.data_mut(),
        &rhs,
        params.solver_max_iterations,
        params.solver_tolerance,
    );

    // v_new = v - dt * grad(p) / (rho * h), interior faces only.
    let scale = dt / (params.fluid_density * grid.cell_size);
    let pressure = &target.pressure;

    let (unx, uny, unz) = grid.u.dims();
    for k in 0..unz {
        for j in 0..uny {
            for i in 0..unx {
                let old = grid.u.at(i, j, k);
                if i == 0 || i == unx - 1 {
                    target.u.set(i, j, k, old);
                } else {
                    let grad = pressure.at(i, j, k) - pressure.at(i - 1, j, k);
                    target.u.set(i, j, k, old - scale * grad);
                }
            }
        }
    }

    let (vnx, vny, vnz) = grid.v.dims();
    for k in 0..vnz {
        for j in 0..vny {
            for i in 0..vnx {
                let old = grid.v.at(i, j, k);
                if j == 0 || j == vny - 1 {
                    target.v.set(i, j, k, old);
                } else {
                    let grad = pressure.at(i, j, k) - pressure.at(i, j - 1, k);
                    target.v.set(i, j, k, old - scale * grad);
                }
            }
        }
    }

    let (wnx, wny, wnz) = grid.w.dims();
    for k in 0..wnz {
        for j in 0..wny {
            for i in 0..wnx {
                let old = grid.w.at(i, j, k);
                if k == 0 || k == wnz - 1 {
                    target.w.set(i, j, k, old);
                } else {
                    let grad = pressure.at(i, j, k) - pressure.at(i, j, k - 1);
                    target.w.set(i, j, k, old - scale * grad);
                }
            }
        }
    }

    report
}
