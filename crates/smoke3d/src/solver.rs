//! Preconditioned conjugate gradient for the pressure system.
//!
//! Solves `A * p = d` with the matrix-free stencil operator. The
//! preconditioner is the identity for now; `precondition` is the seam where
//! incomplete-Cholesky or multigrid would slot in without changing the
//! solver contract.

use serde::{Deserialize, Serialize};

use crate::operator::StencilMatrix;

/// Outcome of one pressure solve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolveReport {
    /// Whether the residual dropped below tolerance within the iteration cap.
    pub converged: bool,
    /// Iterations actually spent.
    pub iterations: usize,
    /// Infinity norm of the final residual.
    pub residual: f32,
}

/// Conjugate-gradient solver with preallocated scratch vectors.
pub struct PcgSolver {
    residual: Vec<f32>,
    auxiliary: Vec<f32>,
    search: Vec<f32>,
}

impl PcgSolver {
    /// Create a solver sized for `cells` unknowns.
    pub fn new(cells: usize) -> Self {
        Self {
            residual: vec![0.0; cells],
            auxiliary: vec![0.0; cells],
            search: vec![0.0; cells],
        }
    }

    /// Resize scratch storage after a grid topology change.
    pub fn resize(&mut self, cells: usize) {
        self.residual.resize(cells, 0.0);
        self.auxiliary.resize(cells, 0.0);
        self.search.resize(cells, 0.0);
    }

    /// Solve `a * pressure = rhs` starting from an all-zero guess.
    ///
    /// Non-convergence is not an error: the best pressure found so far is
    /// left in `pressure` and the report says so, letting the caller proceed
    /// with a best-effort projection.
    pub fn solve(
        &mut self,
        a: &StencilMatrix,
        pressure: &mut [f32],
        rhs: &[f32],
        max_iterations: usize,
        tolerance: f32,
    ) -> SolveReport {
        debug_assert_eq!(pressure.len(), a.cell_count());
        debug_assert_eq!(rhs.len(), a.cell_count());

        pressure.fill(0.0);

        // With a zero initial guess the first residual is the RHS itself.
        self.residual.copy_from_slice(rhs);

        let start = max_abs(&self.residual);
        if start <= tolerance {
            return SolveReport {
                converged: true,
                iterations: 0,
                residual: start,
            };
        }

        precondition(&self.residual, &mut self.auxiliary);
        self.search.copy_from_slice(&self.auxiliary);

        let mut sigma = dot(&self.auxiliary, &self.residual);

        for iteration in 0..max_iterations {
            let rho = sigma;

            a.apply(&self.search, &mut self.auxiliary);

            let zs = dot(&self.auxiliary, &self.search);
            if zs == 0.0 {
                // Degenerate search direction; stop rather than divide by zero.
                let residual = max_abs(&self.residual);
                return SolveReport {
                    converged: residual <= tolerance,
                    iterations: iteration,
                    residual,
                };
            }
            let alpha = rho / zs;

            for (p, s) in pressure.iter_mut().zip(&self.search) {
                *p += alpha * s;
            }
            for (r, z) in self.residual.iter_mut().zip(&self.auxiliary) {
                *r -= alpha * z;
            }

            let residual = max_abs(&self.residual);
            if residual <= tolerance {
                return SolveReport {
                    converged: true,
                    iterations: iteration + 1,
                    residual,
                };
            }

            precondition(&self.residual, &mut self.auxiliary);

            let sigma_new = dot(&self.auxiliary, &self.residual);
            let beta = sigma_new / rho;

            for (s, z) in self.search.iter_mut().zip(&self.auxiliary) {
                *s = z + beta * *s;
            }

            sigma = sigma_new;
        }

        let residual = max_abs(&self.residual);
        log::warn!(
            "pressure solve did not converge after {} iterations (residual {:.3e})",
            max_iterations,
            residual
        );
        SolveReport {
            converged: false,
            iterations: max_iterations,
            residual,
        }
    }
}

/// Identity preconditioner placeholder: `z = r`.
fn precondition(r: &[f32], z: &mut [f32]) {
    z.copy_from_slice(r);
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| x as f64 * y as f64)
        .sum::<f64>() as f32
}

fn max_abs(v: &[f32]) -> f32 {
    v.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
}
