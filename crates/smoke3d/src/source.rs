//! Deterministic smoke emitters.
//!
//! Sources model a continuous inflow: every step each emitter re-asserts a
//! fixed density, temperature, and vertical face velocity at its cell. No
//! randomness anywhere.

use serde::{Deserialize, Serialize};

use crate::grid::MacGrid3D;

/// A fixed emitter at one cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SmokeSource {
    /// Cell coordinate (i, j, k) receiving the injection.
    pub cell: [usize; 3],
    /// Density written into the cell each step.
    pub density: f32,
    /// Temperature written into the cell each step.
    pub temperature: f32,
    /// Vertical inflow written to the V face above the cell each step.
    pub velocity: f32,
}

impl SmokeSource {
    /// The classic corner plume: density 1 at cell (0,0,0) with an upward
    /// inflow of 1 through the face above it.
    pub fn corner_plume() -> Self {
        Self {
            cell: [0, 0, 0],
            density: 1.0,
            temperature: 0.0,
            velocity: 1.0,
        }
    }
}

/// Inject every source into the grid. Emitters whose cell falls outside the
/// grid are skipped rather than treated as an error.
pub fn apply_sources(grid: &mut MacGrid3D, sources: &[SmokeSource]) {
    for source in sources {
        let [i, j, k] = source.cell;
        if i >= grid.width || j >= grid.height || k >= grid.depth {
            continue;
        }
        grid.density.set(i, j, k, source.density);
        grid.temperature.set(i, j, k, source.temperature);
        // V face above the cell, so the plume flows upward out of it.
        grid.v.set(i, j + 1, k, source.velocity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_plume_matches_reference_injection() {
        let mut grid = MacGrid3D::new(4, 4, 4, 1.0, 0.0);
        apply_sources(&mut grid, &[SmokeSource::corner_plume()]);

        assert_eq!(grid.density.at(0, 0, 0), 1.0);
        assert_eq!(grid.v.at(0, 1, 0), 1.0);
        assert_eq!(grid.v.at(0, 0, 0), 0.0);
    }

    #[test]
    fn test_injection_is_idempotent() {
        let mut grid = MacGrid3D::new(4, 4, 4, 1.0, 0.0);
        let sources = [SmokeSource::corner_plume()];
        apply_sources(&mut grid, &sources);
        let once = grid.clone();
        apply_sources(&mut grid, &sources);
        assert_eq!(grid, once);
    }

    #[test]
    fn test_out_of_bounds_source_is_skipped() {
        let mut grid = MacGrid3D::new(2, 2, 2, 1.0, 0.0);
        let rogue = SmokeSource {
            cell: [5, 0, 0],
            density: 9.0,
            temperature: 0.0,
            velocity: 9.0,
        };
        let before = grid.clone();
        apply_sources(&mut grid, &[rogue]);
        assert_eq!(grid, before);
    }
}
