//! External force stages: buoyancy and vorticity confinement.
//!
//! Both run after advection and before projection, so the pressure solve
//! sees the forced velocity field and makes it divergence-free. Boundary
//! faces are never touched; the projection leaves them fixed as well, which
//! together keeps the solid-wall condition intact. Setting the coefficients
//! to zero turns either stage into the plain copy-through it replaces.

use glam::Vec3;

use crate::grid::MacGrid3D;
use crate::SmokeParams;

/// Buoyancy on interior V faces: `f = -alpha * density + beta * (T - T_ambient)`.
///
/// Density and temperature are interpolated at the face position. Hot, thin
/// smoke rises; cold, heavy smoke sinks.
pub fn apply_buoyancy(grid: &MacGrid3D, target: &mut MacGrid3D, dt: f32, params: &SmokeParams) {
    let (nx, ny, nz) = grid.v.dims();
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let old = grid.v.at(i, j, k);
                if j == 0 || j == ny - 1 {
                    target.v.set(i, j, k, old);
                    continue;
                }
                let pt = grid.v.position(i, j, k);
                let smoke = grid.density.interpolate(pt);
                let warmth = grid.temperature.interpolate(pt) - params.ambient_temperature;
                let force = -params.buoyancy_alpha * smoke + params.buoyancy_beta * warmth;
                target.v.set(i, j, k, old + dt * force);
            }
        }
    }
}

/// Vorticity confinement: re-inject the small-scale rotation that
/// semi-Lagrangian advection smears out.
///
/// Computes cell-centered vorticity `w = curl(u)`, a confinement force
/// `f = epsilon * h * (N x w)` with `N = grad |w| / ||grad |w|||`, and adds
/// the face-averaged force to interior faces only.
pub fn apply_vorticity_confinement(
    grid: &MacGrid3D,
    target: &mut MacGrid3D,
    dt: f32,
    params: &SmokeParams,
) {
    let w = grid.width;
    let h = grid.height;
    let d = grid.depth;
    let dx = grid.cell_size;
    let cells = w * h * d;
    let idx = |i: usize, j: usize, k: usize| k * w * h + j * w + i;

    // Cell-centered velocity from face averages.
    let mut vel = vec![Vec3::ZERO; cells];
    for k in 0..d {
        for j in 0..h {
            for i in 0..w {
                vel[idx(i, j, k)] = Vec3::new(
                    0.5 * (grid.u.at(i, j, k) + grid.u.at(i + 1, j, k)),
                    0.5 * (grid.v.at(i, j, k) + grid.v.at(i, j + 1, k)),
                    0.5 * (grid.w.at(i, j, k) + grid.w.at(i, j, k + 1)),
                );
            }
        }
    }

    // Vorticity by central differences; zero on the boundary shell where the
    // stencil has no room.
    let mut omega = vec![Vec3::ZERO; cells];
    if w > 2 && h > 2 && d > 2 {
        let inv2 = 1.0 / (2.0 * dx);
        for k in 1..d - 1 {
            for j in 1..h - 1 {
                for i in 1..w - 1 {
                    let dv_dx = (vel[idx(i + 1, j, k)].y - vel[idx(i - 1, j, k)].y) * inv2;
                    let dw_dx = (vel[idx(i + 1, j, k)].z - vel[idx(i - 1, j, k)].z) * inv2;
                    let du_dy = (vel[idx(i, j + 1, k)].x - vel[idx(i, j - 1, k)].x) * inv2;
                    let dw_dy = (vel[idx(i, j + 1, k)].z - vel[idx(i, j - 1, k)].z) * inv2;
                    let du_dz = (vel[idx(i, j, k + 1)].x - vel[idx(i, j, k - 1)].x) * inv2;
                    let dv_dz = (vel[idx(i, j, k + 1)].y - vel[idx(i, j, k - 1)].y) * inv2;

                    omega[idx(i, j, k)] =
                        Vec3::new(dw_dy - dv_dz, du_dz - dw_dx, dv_dx - du_dy);
                }
            }
        }
    }

    // Confinement force per cell.
    let mut force = vec![Vec3::ZERO; cells];
    if params.vorticity_epsilon != 0.0 && w > 2 && h > 2 && d > 2 {
        let inv2 = 1.0 / (2.0 * dx);
        for k in 1..d - 1 {
            for j in 1..h - 1 {
                for i in 1..w - 1 {
                    let eta = Vec3::new(
                        (omega[idx(i + 1, j, k)].length() - omega[idx(i - 1, j, k)].length())
                            * inv2,
                        (omega[idx(i, j + 1, k)].length() - omega[idx(i, j - 1, k)].length())
                            * inv2,
                        (omega[idx(i, j, k + 1)].length() - omega[idx(i, j, k - 1)].length())
                            * inv2,
                    );
                    let len = eta.length();
                    if len < 1e-6 {
                        // Degenerate gradient: skip instead of producing NaN.
                        continue;
                    }
                    let normal = eta / len;
                    force[idx(i, j, k)] =
                        params.vorticity_epsilon * dx * normal.cross(omega[idx(i, j, k)]);
                }
            }
        }
    }

    // Face update: average the two adjacent cell forces; interior faces only.
    let (unx, uny, unz) = grid.u.dims();
    for k in 0..unz {
        for j in 0..uny {
            for i in 0..unx {
                let old = grid.u.at(i, j, k);
                if i == 0 || i == unx - 1 {
                    target.u.set(i, j, k, old);
                } else {
                    let f = 0.5 * (force[idx(i - 1, j, k)].x + force[idx(i, j, k)].x);
                    target.u.set(i, j, k, old + dt * f);
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
                    let f = 0.5 * (force[idx(i, j - 1, k)].y + force[idx(i, j, k)].y);
                    target.v.set(i, j, k, old + dt * f);
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
                    let f = 0.5 * (force[idx(i, j, k - 1)].z + force[idx(i, j, k)].z);
                    target.w.set(i, j, k, old + dt * f);
                }
            }
        }
    }
}
