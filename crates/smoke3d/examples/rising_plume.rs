//! Headless plume run with per-frame diagnostics.

use smoke3d::{SmokeSimulation3D, SmokeSource, Vec3};

fn main() {
    env_logger::init();

    let mut sim = SmokeSimulation3D::new(16, 32, 16, 0.25);
    sim.sources = vec![SmokeSource {
        cell: [8, 0, 8],
        density: 1.0,
        temperature: 1.0,
        velocity: 1.0,
    }];

    println!(
        "Grid: {}x{}x{} (h = {})",
        sim.grid.width, sim.grid.height, sim.grid.depth, sim.grid.cell_size
    );

    let dt = 1.0 / 30.0;

    for frame in 0..240u32 {
        sim.simulate(dt);

        if frame % 30 == 0 {
            let total = sim.grid.density.sum();
            let max_u = sim.grid.u.max_abs();
            let max_v = sim.grid.v.max_abs();
            let max_w = sim.grid.w.max_abs();
            let solve = sim.last_projection().unwrap();

            println!(
                "F{:3}: mass={:7.3}, max_vel=({:.3},{:.3},{:.3}), cg_iters={:4}, residual={:.2e}{}",
                frame,
                total,
                max_u,
                max_v,
                max_w,
                solve.iterations,
                solve.residual,
                if solve.converged { "" } else { " (NOT CONVERGED)" },
            );
        }
    }

    // Vertical density profile through the plume column.
    println!("\nPlume column (x=2.125, z=2.125):");
    for j in (0..32).step_by(4) {
        let pt = Vec3::new(2.125, (j as f32 + 0.5) * 0.25, 2.125);
        println!("  y={:5.2}: density={:.4}", pt.y, sim.density_at(pt));
    }
}
