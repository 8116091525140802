//! Sparse 7-point stencil operator for the pressure Poisson equation.
//!
//! The discrete Laplacian on the cell lattice with solid outer walls
//! (Neumann boundaries) is symmetric, so each off-diagonal coefficient is
//! stored once at the smaller-index cell of its edge and mirrored on
//! application. No general sparse-matrix format is involved; the stencil
//! shape is fixed.

use serde::{Deserialize, Serialize};

/// Per-cell coefficient arrays for the pressure operator.
///
/// `diag` holds the number of in-grid axis neighbors (0-6); `plus_i`,
/// `plus_j`, `plus_k` hold the coefficient toward the +X/+Y/+Z neighbor,
/// -1 when that neighbor exists and 0 otherwise. Built once from grid
/// topology and immutable until the next `reset()`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StencilMatrix {
    width: usize,
    height: usize,
    depth: usize,
    diag: Vec<f32>,
    plus_i: Vec<f32>,
    plus_j: Vec<f32>,
    plus_k: Vec<f32>,
}

impl StencilMatrix {
    /// Build the operator from grid dimensions alone.
    pub fn build(width: usize, height: usize, depth: usize) -> Self {
        let cells = width * height * depth;
        let mut m = Self {
            width,
            height,
            depth,
            diag: vec![0.0; cells],
            plus_i: vec![0.0; cells],
            plus_j: vec![0.0; cells],
            plus_k: vec![0.0; cells],
        };

        for k in 0..depth {
            for j in 0..height {
                for i in 0..width {
                    let idx = m.cell_index(i, j, k);
                    let mut neighbors = 0;

                    if i > 0 {
                        neighbors += 1;
                    }
                    if i + 1 < width {
                        m.plus_i[idx] = -1.0;
                        neighbors += 1;
                    }
                    if j > 0 {
                        neighbors += 1;
                    }
                    if j + 1 < height {
                        m.plus_j[idx] = -1.0;
                        neighbors += 1;
                    }
                    if k > 0 {
                        neighbors += 1;
                    }
                    if k + 1 < depth {
                        m.plus_k[idx] = -1.0;
                        neighbors += 1;
                    }

                    m.diag[idx] = neighbors as f32;
                }
            }
        }

        m
    }

    /// Number of matrix rows (= grid cells).
    pub fn cell_count(&self) -> usize {
        self.diag.len()
    }

    #[inline]
    fn cell_index(&self, i: usize, j: usize, k: usize) -> usize {
        k * self.width * self.height + j * self.width + i
    }

    /// Matrix-vector product `out = A * s`, matrix-free.
    ///
    /// Each row combines the diagonal with up to six neighbor terms. A
    /// neighbor in the minus direction reuses the coefficient stored at the
    /// neighbor itself, which is what keeps the operator symmetric.
    pub fn apply(&self, s: &[f32], out: &mut [f32]) {
        debug_assert_eq!(s.len(), self.cell_count());
        debug_assert_eq!(out.len(), self.cell_count());

        let sx = 1;
        let sy = self.width;
        let sz = self.width * self.height;

        for k in 0..self.depth {
            for j in 0..self.height {
                for i in 0..self.width {
                    let idx = self.cell_index(i, j, k);
                    let mut acc = self.diag[idx] * s[idx];

                    if i + 1 < self.width {
                        acc += self.plus_i[idx] * s[idx + sx];
                    }
                    if i > 0 {
                        acc += self.plus_i[idx - sx] * s[idx - sx];
                    }
                    if j + 1 < self.height {
                        acc += self.plus_j[idx] * s[idx + sy];
                    }
                    if j > 0 {
                        acc += self.plus_j[idx - sy] * s[idx - sy];
                    }
                    if k + 1 < self.depth {
                        acc += self.plus_k[idx] * s[idx + sz];
                    }
                    if k > 0 {
                        acc += self.plus_k[idx - sz] * s[idx - sz];
                    }

                    out[idx] = acc;
                }
            }
        }
    }

    /// Coefficient of cell `b` in the matrix row of cell `a`.
    ///
    /// Only `a == b` and axis-adjacent pairs have nonzero entries.
    pub fn coefficient(&self, a: (usize, usize, usize), b: (usize, usize, usize)) -> f32 {
        let (ai, aj, ak) = a;
        let (bi, bj, bk) = b;

        if a == b {
            return self.diag[self.cell_index(ai, aj, ak)];
        }

        let di = bi as isize - ai as isize;
        let dj = bj as isize - aj as isize;
        let dk = bk as isize - ak as isize;

        match (di, dj, dk) {
            (1, 0, 0) => self.plus_i[self.cell_index(ai, aj, ak)],
            (-1, 0, 0) => self.plus_i[self.cell_index(bi, bj, bk)],
            (0, 1, 0) => self.plus_j[self.cell_index(ai, aj, ak)],
            (0, -1, 0) => self.plus_j[self.cell_index(bi, bj, bk)],
            (0, 0, 1) => self.plus_k[self.cell_index(ai, aj, ak)],
            (0, 0, -1) => self.plus_k[self.cell_index(bi, bj, bk)],
            _ => 0.0,
        }
    }
}
