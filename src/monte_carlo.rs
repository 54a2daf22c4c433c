//! Shot-to-shot dispersion analysis.
//!
//! Real launchers do not repeat perfectly: flywheel speed recovers
//! slightly differently each cycle, hood and turret servos settle with
//! finite precision, and ball-to-ball variation moves the transfer
//! efficiency. This module samples those variations as independent normal
//! perturbations, solves each perturbed shot in parallel, and reports the
//! impact scatter around the unperturbed baseline.

use nalgebra::Vector3;
use rand::thread_rng;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;

use crate::error::SimulationError;
use crate::shot_force::LauncherParameters;
use crate::simulation::{FlightSolver, PhysicalConstants};

/// Standard deviations of the perturbed launcher inputs
#[derive(Debug, Clone)]
pub struct DispersionParams {
    pub num_simulations: usize,
    /// Flywheel speed variation (RPM)
    pub rpm_std_dev: f64,
    /// Hood angle variation (degrees)
    pub hood_angle_std_dev: f64,
    /// Turret angle variation (degrees)
    pub turret_angle_std_dev: f64,
    /// Transfer efficiency variation (absolute)
    pub efficiency_std_dev: f64,
}

impl Default for DispersionParams {
    fn default() -> Self {
        Self {
            num_simulations: 1000,
            rpm_std_dev: 25.0,
            hood_angle_std_dev: 0.25,
            turret_angle_std_dev: 0.25,
            efficiency_std_dev: 0.01,
        }
    }
}

/// Per-shot outcomes of a dispersion run
#[derive(Debug, Clone)]
pub struct DispersionResults {
    pub ranges: Vec<f64>,
    pub impact_velocities: Vec<f64>,
    /// Impact point deviation from the unperturbed baseline shot
    pub impact_deviations: Vec<Vector3<f64>>,
}

impl DispersionResults {
    pub fn mean_range(&self) -> f64 {
        self.ranges.iter().sum::<f64>() / self.ranges.len() as f64
    }

    pub fn range_std_dev(&self) -> f64 {
        let mean = self.mean_range();
        let variance = self
            .ranges
            .iter()
            .map(|r| (r - mean) * (r - mean))
            .sum::<f64>()
            / self.ranges.len() as f64;
        variance.sqrt()
    }
}

/// One sampled set of perturbed launcher inputs
#[derive(Debug, Clone)]
struct PerturbedShot {
    params: LauncherParameters,
    turret_angle_deg: f64,
    hood_angle_deg: f64,
}

/// Run a dispersion analysis around the given nominal shot
pub fn run_dispersion(
    base_params: &LauncherParameters,
    constants: &PhysicalConstants,
    turret_angle_deg: f64,
    hood_angle_deg: f64,
    spin_rate_rad_s: f64,
    initial_position: Vector3<f64>,
    dispersion: &DispersionParams,
) -> Result<DispersionResults, SimulationError> {
    if dispersion.num_simulations == 0 {
        return Err("num_simulations must be greater than 0".into());
    }

    let solve_one = |params: LauncherParameters, turret: f64, hood: f64| {
        let mut solver = FlightSolver::new(params, constants.clone())?;
        solver.set_aim(turret, hood);
        solver.set_spin_rate(spin_rate_rad_s);
        solver.set_initial_position(initial_position);
        solver.solve()
    };

    // Baseline first: deviations are measured against the unperturbed shot
    let baseline = solve_one(base_params.clone(), turret_angle_deg, hood_angle_deg)?;
    let baseline_impact = baseline
        .points
        .last()
        .ok_or("no baseline trajectory points")?
        .position;

    let rpm_dist = Normal::new(base_params.shooter_rpm, dispersion.rpm_std_dev)
        .map_err(|e| format!("invalid rpm distribution: {}", e))?;
    let hood_dist = Normal::new(hood_angle_deg, dispersion.hood_angle_std_dev)
        .map_err(|e| format!("invalid hood angle distribution: {}", e))?;
    let turret_dist = Normal::new(turret_angle_deg, dispersion.turret_angle_std_dev)
        .map_err(|e| format!("invalid turret angle distribution: {}", e))?;
    let efficiency_dist = Normal::new(base_params.transfer_efficiency, dispersion.efficiency_std_dev)
        .map_err(|e| format!("invalid efficiency distribution: {}", e))?;

    // Sample sequentially, solve in parallel
    let mut rng = thread_rng();
    let shots: Vec<PerturbedShot> = (0..dispersion.num_simulations)
        .map(|_| {
            let mut params = base_params.clone();
            params.shooter_rpm = rpm_dist.sample(&mut rng).max(0.0);
            params.transfer_efficiency = efficiency_dist.sample(&mut rng).clamp(1e-3, 1.0);
            PerturbedShot {
                params,
                turret_angle_deg: turret_dist.sample(&mut rng),
                hood_angle_deg: hood_dist.sample(&mut rng),
            }
        })
        .collect();

    let outcomes: Vec<_> = shots
        .into_par_iter()
        .filter_map(|shot| {
            solve_one(shot.params, shot.turret_angle_deg, shot.hood_angle_deg).ok()
        })
        .collect();

    if outcomes.is_empty() {
        return Err("no successful simulations".into());
    }
    if outcomes.len() < dispersion.num_simulations {
        log::warn!(
            "{} of {} dispersion shots failed to solve",
            dispersion.num_simulations - outcomes.len(),
            dispersion.num_simulations
        );
    }

    let mut ranges = Vec::with_capacity(outcomes.len());
    let mut impact_velocities = Vec::with_capacity(outcomes.len());
    let mut impact_deviations = Vec::with_capacity(outcomes.len());

    for result in &outcomes {
        ranges.push(result.max_range);
        impact_velocities.push(result.impact_velocity);
        if let Some(last) = result.points.last() {
            impact_deviations.push(last.position - baseline_impact);
        }
    }

    Ok(DispersionResults {
        ranges,
        impact_velocities,
        impact_deviations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_constants() -> PhysicalConstants {
        PhysicalConstants {
            time_step: 1e-3,
            ..PhysicalConstants::default()
        }
    }

    #[test]
    fn test_dispersion_returns_every_shot() {
        let dispersion = DispersionParams {
            num_simulations: 25,
            ..DispersionParams::default()
        };

        let results = run_dispersion(
            &LauncherParameters::default(),
            &fast_constants(),
            0.0,
            45.0,
            0.0,
            Vector3::new(0.0, 0.0, 0.5),
            &dispersion,
        )
        .unwrap();

        assert_eq!(results.ranges.len(), 25);
        assert_eq!(results.impact_velocities.len(), 25);
        assert_eq!(results.impact_deviations.len(), 25);
        assert!(results.mean_range() > 0.0);
    }

    #[test]
    fn test_zero_variation_collapses_to_baseline() {
        let dispersion = DispersionParams {
            num_simulations: 8,
            rpm_std_dev: 0.0,
            hood_angle_std_dev: 0.0,
            turret_angle_std_dev: 0.0,
            efficiency_std_dev: 0.0,
        };

        let results = run_dispersion(
            &LauncherParameters::default(),
            &fast_constants(),
            0.0,
            45.0,
            0.0,
            Vector3::new(0.0, 0.0, 0.5),
            &dispersion,
        )
        .unwrap();

        for deviation in &results.impact_deviations {
            assert!(deviation.norm() < 1e-9);
        }
        assert!(results.range_std_dev() < 1e-9);
    }

    #[test]
    fn test_spread_grows_with_rpm_variation() {
        let tight = DispersionParams {
            num_simulations: 60,
            rpm_std_dev: 1.0,
            hood_angle_std_dev: 0.0,
            turret_angle_std_dev: 0.0,
            efficiency_std_dev: 0.0,
        };
        let loose = DispersionParams {
            rpm_std_dev: 400.0,
            ..tight.clone()
        };

        let run = |d: &DispersionParams| {
            run_dispersion(
                &LauncherParameters::default(),
                &fast_constants(),
                0.0,
                45.0,
                0.0,
                Vector3::new(0.0, 0.0, 0.5),
                d,
            )
            .unwrap()
        };

        assert!(run(&loose).range_std_dev() > run(&tight).range_std_dev());
    }

    #[test]
    fn test_rejects_empty_run() {
        let dispersion = DispersionParams {
            num_simulations: 0,
            ..DispersionParams::default()
        };
        let err = run_dispersion(
            &LauncherParameters::default(),
            &fast_constants(),
            0.0,
            45.0,
            0.0,
            Vector3::zeros(),
            &dispersion,
        );
        assert!(err.is_err());
    }
}
