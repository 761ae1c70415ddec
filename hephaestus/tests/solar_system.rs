// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Integration tests for N-body gravity and its conservation laws

use hephaestus::integration::{ForceModel, IntegratorKind};
use hephaestus::state::IntegrationState;
use hephaestus::state::Vector3;
use hephaestus::systems::solar_system::{AU, DAY, GRAVITATIONAL_CONSTANT};
use hephaestus::systems::{CelestialBody, SolarSystem};
use hephaestus::Error;
use std::sync::Arc;

const SUN_MASS: f64 = 1.989e30;

/// Light planet on a circular orbit around a fixed-ish star
fn circular_orbit(steps: usize, dt: f64) -> SolarSystem {
    let speed = (GRAVITATIONAL_CONSTANT * SUN_MASS / AU).sqrt();
    let bodies = vec![
        CelestialBody::new("Star", SUN_MASS, Vector3::zero(), Vector3::zero()),
        CelestialBody::new(
            "Planet",
            1.0e20,
            Vector3::new(AU, 0.0, 0.0),
            Vector3::new(0.0, speed, 0.0),
        ),
    ];
    SolarSystem::new(bodies, steps, dt).unwrap()
}

#[test]
fn test_circular_orbit_keeps_radius() {
    let system = circular_orbit(401, DAY / 4.0);

    for kind in [IntegratorKind::VelocityVerlet, IntegratorKind::RungeKutta] {
        let run = system.run_simulation(kind).unwrap();
        let planet = run.body_positions("Planet").unwrap();
        let star = run.body_positions("Star").unwrap();

        for (p, s) in planet.iter().zip(&star) {
            let r = (*p - *s).norm();
            assert!(
                (r - AU).abs() < 1e-3 * AU,
                "{kind}: radius drifted to {:.6} AU",
                r / AU
            );
        }
    }
}

#[test]
fn test_quarter_orbit_reaches_y_axis() {
    // Period of a circular orbit: 2π √(r³ / GM)
    let period = 2.0 * std::f64::consts::PI * (AU.powi(3) / (GRAVITATIONAL_CONSTANT * SUN_MASS)).sqrt();
    let steps = 1000;
    let dt = period / 4.0 / (steps - 1) as f64;

    let run = circular_orbit(steps, dt)
        .run_simulation(IntegratorKind::RungeKutta)
        .unwrap();
    let end = run.body_positions("Planet").unwrap()[steps - 1];

    assert!(end.x.abs() < 1e-4 * AU, "x = {:.3e}", end.x);
    assert!((end.y - AU).abs() < 1e-4 * AU, "y = {:.3e}", end.y);
}

#[test]
fn test_momentum_is_conserved() {
    let system = SolarSystem::inner_planets(181, DAY).unwrap();
    // Earth's orbital momentum sets the scale
    let scale = 5.972e24 * 29780.0;

    for kind in IntegratorKind::ALL {
        let run = system.run_simulation(kind).unwrap();
        for velocities in &run.velocities {
            let p = system.total_momentum(velocities).unwrap();
            assert!(p.norm() < 1e-9 * scale, "{kind}: momentum {p}");
        }
    }
}

#[test]
fn test_forces_obey_third_law() {
    let system = SolarSystem::inner_planets(20, DAY).unwrap();
    let run = system.run_simulation(IntegratorKind::VelocityVerlet).unwrap();
    let scale = run.forces[0].iter().map(|f| f.norm()).fold(0.0, f64::max);

    for forces in &run.forces {
        let net = forces.iter().fold(Vector3::zero(), |acc, f| acc + *f);
        assert!(net.norm() < 1e-10 * scale, "net force {net}");
    }
}

#[test]
fn test_verlet_energy_drift_beats_euler() {
    let system = SolarSystem::inner_planets(366, DAY).unwrap();

    let verlet = system.run_simulation(IntegratorKind::VelocityVerlet).unwrap();
    let euler = system.run_simulation(IntegratorKind::Euler).unwrap();
    let rk4 = system.run_simulation(IntegratorKind::RungeKutta).unwrap();

    assert!(verlet.max_relative_energy_drift() < 1e-3);
    assert!(rk4.max_relative_energy_drift() < 1e-3);
    assert!(euler.max_relative_energy_drift() > verlet.max_relative_energy_drift());
}

#[test]
fn test_energy_tables_match_system() {
    let system = SolarSystem::inner_planets(5, DAY).unwrap();
    let run = system.run_simulation(IntegratorKind::RungeKutta).unwrap();

    for step in 0..run.len() {
        let potential: f64 = run.potential[step].iter().sum();
        let expected = system.potential_energy(&run.positions[step]).unwrap();
        assert!((potential - expected).abs() <= 1e-12 * expected.abs());

        let kinetic = system.kinetic_energies(&run.velocities[step]).unwrap();
        assert_eq!(kinetic, run.kinetic[step]);
    }
}

#[test]
fn test_single_body_drifts_freely() {
    let body = CelestialBody::new("Lonely", 1.0, Vector3::zero(), Vector3::new(1.0, 2.0, 3.0));
    let system = SolarSystem::new(vec![body], 11, 1.0).unwrap();

    for kind in IntegratorKind::ALL {
        let run = system.run_simulation(kind).unwrap();
        let end = run.positions[10][0];
        assert!((end - Vector3::new(10.0, 20.0, 30.0)).norm() < 1e-12);
        assert_eq!(run.potential[10][0], 0.0);
    }
}

#[test]
fn test_state_with_wrong_body_count_is_rejected() {
    let bodies = vec![
        CelestialBody::new("A", 1.0, Vector3::zero(), Vector3::zero()),
        CelestialBody::new("B", 1.0, Vector3::new(1.0, 0.0, 0.0), Vector3::zero()),
    ];
    let system = SolarSystem::new(bodies, 10, 1.0).unwrap();
    let model: Arc<dyn ForceModel<Vec<Vector3>>> = Arc::new(system);
    let lonely = IntegrationState::new(vec![Vector3::zero()], vec![Vector3::zero()], vec![Vector3::zero()]);

    for kind in IntegratorKind::ALL {
        let integrator = kind.build(1.0, Some(model.clone())).unwrap();
        let result = integrator.perform_step(&lonely);
        assert!(
            matches!(result, Err(Error::InvalidParameter { name: "bodies", .. })),
            "{kind} stepped a mismatched state"
        );
    }
}

#[test]
fn test_ragged_state_is_rejected() {
    let system = SolarSystem::new(
        vec![CelestialBody::new("A", 1.0, Vector3::zero(), Vector3::zero())],
        10,
        1.0,
    )
    .unwrap();
    let model: Arc<dyn ForceModel<Vec<Vector3>>> = Arc::new(system);
    let ragged = IntegrationState::new(vec![Vector3::zero()], vec![], vec![Vector3::zero()]);

    for kind in IntegratorKind::ALL {
        let integrator = kind.build(1.0, Some(model.clone())).unwrap();
        let result = integrator.perform_step(&ragged);
        assert!(matches!(result, Err(Error::InvalidParameter { name: "state", .. })));
    }
}
