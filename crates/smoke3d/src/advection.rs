//! Semi-Lagrangian advection for the staggered smoke fields.
//!
//! Every stored sample traces one backward Euler step through the frozen
//! pre-step velocity field and picks up the old field value at the traced
//! position. Unconditionally stable (no CFL restriction) at the price of
//! numerical dissipation; that tradeoff is deliberate.

use crate::grid::{GridData3, MacGrid3D};

/// Advect all three velocity components into the target grids.
///
/// Reads only `grid`; writes only `target.u/v/w`. The caller commits by
/// swapping once every advected field has been produced, so all fields see
/// the same frozen pre-step velocity.
pub fn advect_velocity(grid: &MacGrid3D, target: &mut MacGrid3D, dt: f32) {
    let (unx, uny, unz) = grid.u.dims();
    for k in 0..unz {
        for j in 0..uny {
            for i in 0..unx {
                let pt = grid.u.position(i, j, k);
                let traced = pt - dt * grid.velocity_at(pt);
                target.u.set(i, j, k, grid.u.interpolate(traced));
            }
        }
    }

    let (vnx, vny, vnz) = grid.v.dims();
    for k in 0..vnz {
        for j in 0..vny {
            for i in 0..vnx {
                let pt = grid.v.position(i, j, k);
                let traced = pt - dt * grid.velocity_at(pt);
                target.v.set(i, j, k, grid.v.interpolate(traced));
            }
        }
    }

    let (wnx, wny, wnz) = grid.w.dims();
    for k in 0..wnz {
        for j in 0..wny {
            for i in 0..wnx {
                let pt = grid.w.position(i, j, k);
                let traced = pt - dt * grid.velocity_at(pt);
                target.w.set(i, j, k, grid.w.interpolate(traced));
            }
        }
    }
}

/// Advect one cell-centered scalar field into its target buffer.
///
/// Used for both temperature and density; the velocity is sampled from
/// `grid`, the values from `field`.
pub fn advect_scalar(grid: &MacGrid3D, field: &GridData3, target: &mut GridData3, dt: f32) {
    let (nx, ny, nz) = field.dims();
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let pt = field.position(i, j, k);
                let traced = pt - dt * grid.velocity_at(pt);
                target.set(i, j, k, field.interpolate(traced));
            }
        }
    }
}
