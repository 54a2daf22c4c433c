//! Trajectory integration for a launched ball.
//!
//! The frame is z-up: x/y span the floor plane and gravity points along
//! -z. [`step`] advances a [`SimulationState`] by one fixed timestep using
//! semi-implicit Euler (velocity first, then position from the updated
//! velocity), which holds energy noticeably better than the naive explicit
//! form over ballistic arcs. [`FlightSolver`] wraps the stepper into a
//! complete launch-to-ground run.

use nalgebra::Vector3;
use serde::Serialize;

use crate::aerodynamics::{cross_sectional_area, drag_force, magnus_force};
use crate::constants::{
    DEFAULT_BALL_MASS_KG, DEFAULT_BALL_RADIUS_M, DEFAULT_MAGNUS_COEFFICIENT, DEFAULT_TIME_STEP_S,
    G_ACCEL_MPS2, SPHERE_DRAG_COEFFICIENT, STANDARD_AIR_DENSITY,
};
use crate::error::SimulationError;
use crate::shot_force::{shot_force_vector, LauncherParameters};
use crate::units::degrees_to_radians;

/// Process-wide physical configuration, read-only during a run
#[derive(Debug, Clone)]
pub struct PhysicalConstants {
    /// Ball mass (kg)
    pub ball_mass: f64,
    /// Ball radius (m)
    pub ball_radius: f64,
    /// Air density (kg/m³)
    pub air_density: f64,
    /// Drag coefficient (dimensionless)
    pub drag_coefficient: f64,
    /// Magnus coefficient (dimensionless)
    pub magnus_coefficient: f64,
    /// Gravitational acceleration vector (m/s²)
    pub gravity: Vector3<f64>,
    /// Integration timestep (s)
    pub time_step: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            ball_mass: DEFAULT_BALL_MASS_KG,
            ball_radius: DEFAULT_BALL_RADIUS_M,
            air_density: STANDARD_AIR_DENSITY,
            drag_coefficient: SPHERE_DRAG_COEFFICIENT,
            magnus_coefficient: DEFAULT_MAGNUS_COEFFICIENT,
            gravity: Vector3::new(0.0, 0.0, -G_ACCEL_MPS2),
            time_step: DEFAULT_TIME_STEP_S,
        }
    }
}

impl PhysicalConstants {
    /// Check every constraint, naming the first violation
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.ball_mass <= 0.0 {
            return Err(format!("ball_mass must be positive, got {}", self.ball_mass).into());
        }
        if self.ball_radius <= 0.0 {
            return Err(format!("ball_radius must be positive, got {}", self.ball_radius).into());
        }
        if self.air_density < 0.0 {
            return Err(format!("air_density must be non-negative, got {}", self.air_density).into());
        }
        if self.drag_coefficient < 0.0 {
            return Err(format!(
                "drag_coefficient must be non-negative, got {}",
                self.drag_coefficient
            )
            .into());
        }
        if self.magnus_coefficient < 0.0 {
            return Err(format!(
                "magnus_coefficient must be non-negative, got {}",
                self.magnus_coefficient
            )
            .into());
        }
        if self.time_step <= 0.0 {
            return Err(format!("time_step must be positive, got {}", self.time_step).into());
        }
        Ok(())
    }
}

/// Mutable state of one simulated flight
///
/// Owned exclusively by whichever context drives the integration loop;
/// `elapsed_time` only ever increases, by one timestep per [`step`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    /// Ball position (m)
    pub position: Vector3<f64>,
    /// Ball velocity (m/s)
    pub velocity: Vector3<f64>,
    /// Spin axis scaled by spin rate (rad/s)
    pub spin_vector: Vector3<f64>,
    /// Time since the shot began (s)
    pub elapsed_time: f64,
}

impl SimulationState {
    /// State at t = 0 with caller-supplied initial conditions
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>, spin_vector: Vector3<f64>) -> Self {
        Self {
            position,
            velocity,
            spin_vector,
            elapsed_time: 0.0,
        }
    }
}

/// Unit vector out of the muzzle for the given turret and hood angles
///
/// Turret yaws the shot in the floor plane (0° along +x), hood pitches it
/// up from horizontal.
pub fn launch_direction(turret_angle_deg: f64, hood_angle_deg: f64) -> Vector3<f64> {
    let yaw = degrees_to_radians(turret_angle_deg);
    let pitch = degrees_to_radians(hood_angle_deg);
    Vector3::new(
        pitch.cos() * yaw.cos(),
        pitch.cos() * yaw.sin(),
        pitch.sin(),
    )
}

/// Horizontal spin axis for a shot at the given turret angle
///
/// The wheel-speed differential spins the ball about the horizontal axis
/// perpendicular to the shot heading. Scaled by a positive spin rate this
/// is backspin: the resulting Magnus lift points up.
pub fn spin_axis(turret_angle_deg: f64) -> Vector3<f64> {
    let yaw = degrees_to_radians(turret_angle_deg);
    Vector3::new(yaw.sin(), -yaw.cos(), 0.0)
}

/// Advance the state by one timestep
///
/// Sums shot force (nonzero only inside the contact window), drag, Magnus
/// and weight, converts to acceleration, then applies the semi-implicit
/// Euler update. `launch_direction` is the unit vector the shot force acts
/// along while the ball is in contact with the wheels.
pub fn step(
    state: &mut SimulationState,
    constants: &PhysicalConstants,
    params: &LauncherParameters,
    launch_direction: &Vector3<f64>,
) {
    let area = cross_sectional_area(constants.ball_radius);

    let shot = shot_force_vector(params, launch_direction, state.elapsed_time);
    let drag = drag_force(
        &state.velocity,
        constants.air_density,
        constants.drag_coefficient,
        area,
    );
    let magnus = magnus_force(
        &state.spin_vector,
        &state.velocity,
        constants.air_density,
        constants.ball_radius,
        constants.magnus_coefficient,
        area,
    );
    let weight = constants.gravity * constants.ball_mass;

    let total_force = weight + drag + magnus + shot;
    let acceleration = total_force / constants.ball_mass;

    // Velocity first, position from the updated velocity
    state.velocity += acceleration * constants.time_step;
    state.position += state.velocity * constants.time_step;
    state.elapsed_time += constants.time_step;
}

/// One recorded sample of a flight
#[derive(Debug, Clone, Serialize)]
pub struct FlightPoint {
    pub time: f64,
    pub position: Vector3<f64>,
    pub velocity_magnitude: f64,
    pub kinetic_energy: f64,
}

/// Summary of a complete launch-to-ground flight
#[derive(Debug, Clone, Serialize)]
pub struct FlightResult {
    /// Horizontal distance from the launch point at impact (m)
    pub max_range: f64,
    /// Highest point of the arc (m)
    pub max_height: f64,
    pub time_of_flight: f64,
    pub impact_velocity: f64,
    pub impact_energy: f64,
    pub points: Vec<FlightPoint>,
}

/// Runs one shot from launch through ballistic flight to the ground plane
#[derive(Debug)]
pub struct FlightSolver {
    params: LauncherParameters,
    constants: PhysicalConstants,
    turret_angle_deg: f64,
    hood_angle_deg: f64,
    spin_rate_rad_s: f64,
    initial_position: Vector3<f64>,
    ground_height: f64,
    max_flight_time: f64,
}

impl FlightSolver {
    /// Build a solver, rejecting malformed configuration up front
    pub fn new(
        params: LauncherParameters,
        constants: PhysicalConstants,
    ) -> Result<Self, SimulationError> {
        params.validate()?;
        constants.validate()?;

        Ok(Self {
            params,
            constants,
            turret_angle_deg: 0.0,
            hood_angle_deg: 45.0,
            spin_rate_rad_s: 0.0,
            initial_position: Vector3::zeros(),
            ground_height: 0.0,
            max_flight_time: 10.0,
        })
    }

    pub fn set_aim(&mut self, turret_angle_deg: f64, hood_angle_deg: f64) {
        self.turret_angle_deg = turret_angle_deg;
        self.hood_angle_deg = hood_angle_deg;
    }

    pub fn set_spin_rate(&mut self, spin_rate_rad_s: f64) {
        self.spin_rate_rad_s = spin_rate_rad_s;
    }

    pub fn set_initial_position(&mut self, position: Vector3<f64>) {
        self.initial_position = position;
    }

    pub fn set_ground_height(&mut self, height: f64) {
        self.ground_height = height;
    }

    pub fn set_max_flight_time(&mut self, seconds: f64) {
        self.max_flight_time = seconds;
    }

    /// Integrate the shot until the ball falls back through the ground
    /// plane or the flight time cap elapses
    pub fn solve(&self) -> Result<FlightResult, SimulationError> {
        let direction = launch_direction(self.turret_angle_deg, self.hood_angle_deg);
        let spin = spin_axis(self.turret_angle_deg) * self.spin_rate_rad_s;

        log::debug!(
            "launching: muzzle velocity {:.2} m/s, impulse {:.4} N*s, turret {:.1} deg, hood {:.1} deg",
            self.params.muzzle_velocity(),
            self.params.total_impulse(),
            self.turret_angle_deg,
            self.hood_angle_deg,
        );

        let mut state = SimulationState::new(self.initial_position, Vector3::zeros(), spin);

        let mut points = Vec::new();
        let mut max_height = state.position.z;

        while state.elapsed_time < self.max_flight_time {
            let speed = state.velocity.norm();
            points.push(FlightPoint {
                time: state.elapsed_time,
                position: state.position,
                velocity_magnitude: speed,
                kinetic_energy: 0.5 * self.constants.ball_mass * speed * speed,
            });

            if state.position.z > max_height {
                max_height = state.position.z;
            }

            step(&mut state, &self.constants, &self.params, &direction);

            // Only terminate on the ground plane once the ball is clear of
            // the mechanism; inside the contact window it may still sit at
            // or below launch height
            if state.elapsed_time > self.params.contact_time
                && state.position.z < self.ground_height
            {
                break;
            }
        }

        if state.position.z >= self.ground_height && state.elapsed_time >= self.max_flight_time {
            log::warn!(
                "flight time cap of {} s reached before ground contact",
                self.max_flight_time
            );
        }

        // Terminal sample, at or just below the ground crossing
        let speed = state.velocity.norm();
        points.push(FlightPoint {
            time: state.elapsed_time,
            position: state.position,
            velocity_magnitude: speed,
            kinetic_energy: 0.5 * self.constants.ball_mass * speed * speed,
        });
        if state.position.z > max_height {
            max_height = state.position.z;
        }

        let last = points.last().ok_or("no trajectory points generated")?;
        let time_of_flight = last.time;
        let impact_velocity = last.velocity_magnitude;
        let impact_energy = last.kinetic_energy;
        let horizontal = last.position - self.initial_position;

        Ok(FlightResult {
            max_range: (horizontal.x * horizontal.x + horizontal.y * horizontal.y).sqrt(),
            max_height,
            time_of_flight,
            impact_velocity,
            impact_energy,
            points,
        })
    }
}
