//! Advection behavior through the full pipeline.

use smoke3d::SmokeSimulation3D;

fn quiet_sim(n: usize, cell_size: f32) -> SmokeSimulation3D {
    let mut sim = SmokeSimulation3D::new(n, n, n, cell_size);
    sim.sources.clear();
    sim.params.buoyancy_alpha = 0.0;
    sim.params.buoyancy_beta = 0.0;
    sim.params.vorticity_epsilon = 0.0;
    sim
}

#[test]
fn test_mass_non_increasing_without_sources_or_forces() {
    let mut sim = quiet_sim(8, 0.5);

    // Interior smoke blob carried by a uniform current: every step is pure
    // transport, so total mass must never grow.
    for j in 1..4 {
        for i in 1..4 {
            sim.grid.density.set(i, j, 2, 1.0);
        }
    }

    let mut mass = sim.grid.density.sum();
    for _ in 0..10 {
        let (unx, uny, unz) = sim.grid.u.dims();
        for k in 0..unz {
            for j in 0..uny {
                for i in 0..unx {
                    sim.grid.u.set(i, j, k, 0.3);
                }
            }
        }
        sim.simulate(0.05);
        let next = sim.grid.density.sum();
        assert!(
            next <= mass + 1e-4,
            "density mass grew from {} to {}",
            mass,
            next
        );
        mass = next;
    }
}

#[test]
fn test_swirling_flow_keeps_mass_bounded() {
    let mut sim = quiet_sim(8, 0.5);
    for j in 1..4 {
        for i in 1..4 {
            sim.grid.density.set(i, j, 2, 1.0);
        }
    }
    sim.grid.u.set(3, 2, 2, 0.8);
    sim.grid.v.set(2, 3, 2, -0.4);

    let initial = sim.grid.density.sum();
    for _ in 0..20 {
        sim.simulate(0.05);
    }

    let mass = sim.grid.density.sum();
    assert!(mass >= 0.0 && mass.is_finite());
    assert!(
        mass <= initial * 1.05,
        "advection must not spontaneously create mass: {} -> {}",
        initial,
        mass
    );
}

#[test]
fn test_still_fluid_stays_still() {
    let mut sim = quiet_sim(6, 1.0);
    sim.grid.density.set(2, 2, 2, 1.0);

    for _ in 0..5 {
        sim.simulate(0.1);
    }

    // Nothing drives the fluid, so the blob must not move.
    assert!(sim.grid.density.at(2, 2, 2) > 0.99);
    assert!(sim.grid.u.max_abs() < 1e-6);
    assert!(sim.grid.v.max_abs() < 1e-6);
    assert!(sim.grid.w.max_abs() < 1e-6);
}

#[test]
fn test_smoke_drifts_with_imposed_flow() {
    let mut sim = quiet_sim(8, 1.0);
    sim.grid.density.set(1, 4, 4, 1.0);

    // Impose a uniform rightward current every step; it is divergence-free,
    // so projection leaves it alone and advection carries the smoke.
    for _ in 0..10 {
        for k in 0..8 {
            for j in 0..8 {
                for i in 0..=8 {
                    sim.grid.u.set(i, j, k, 0.5);
                }
            }
        }
        sim.simulate(0.2);
    }

    // One cell of travel expected (10 * 0.2 * 0.5 = 1.0 world units).
    let upstream = sim.grid.density.at(1, 4, 4);
    let downstream = sim.grid.density.at(2, 4, 4);
    assert!(
        downstream > upstream,
        "smoke should drift downstream: upstream {}, downstream {}",
        upstream,
        downstream
    );
}
