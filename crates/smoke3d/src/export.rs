//! One-way density snapshot export for persistence collaborators.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::grid::MacGrid3D;

/// Write one density value per line, i innermost, then j, then k.
pub fn write_density_snapshot<W: Write>(grid: &MacGrid3D, mut out: W) -> io::Result<()> {
    for k in 0..grid.depth {
        for j in 0..grid.height {
            for i in 0..grid.width {
                writeln!(out, "{}", grid.density.at(i, j, k))?;
            }
        }
    }
    Ok(())
}

/// Convenience wrapper that writes the snapshot to a file.
pub fn save_smoke<P: AsRef<Path>>(grid: &MacGrid3D, path: P) -> io::Result<()> {
    let file = File::create(path)?;
    write_density_snapshot(grid, BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_order_and_format() {
        let mut grid = MacGrid3D::new(2, 2, 1, 1.0, 0.0);
        grid.density.set(0, 0, 0, 0.25);
        grid.density.set(1, 0, 0, 0.5);
        grid.density.set(0, 1, 0, 0.75);
        grid.density.set(1, 1, 0, 1.0);

        let mut buf = Vec::new();
        write_density_snapshot(&grid, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let values: Vec<f32> = text.lines().map(|l| l.parse().unwrap()).collect();
        assert_eq!(values, vec![0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_snapshot_line_count() {
        let grid = MacGrid3D::new(3, 4, 5, 1.0, 0.0);
        let mut buf = Vec::new();
        write_density_snapshot(&grid, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 3 * 4 * 5);
    }
}
