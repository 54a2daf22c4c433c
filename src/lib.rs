//! # Flywheel Ballistics
//!
//! Flight model for a spinning ball launched by a two-wheel flywheel
//! mechanism. The launcher's kinematic and compression parameters shape a
//! finite-window shot-force impulse; drag, Magnus lift and gravity then
//! carry the ball through a fixed-timestep semi-implicit Euler flight.

// Re-export the main types and functions
pub use aerodynamics::{cross_sectional_area, drag_force, magnus_force};
pub use error::SimulationError;
pub use monte_carlo::{run_dispersion, DispersionParams, DispersionResults};
pub use shot_force::{shot_force_magnitude, shot_force_vector, LauncherParameters};
pub use simulation::{
    launch_direction, spin_axis, step, FlightPoint, FlightResult, FlightSolver,
    PhysicalConstants, SimulationState,
};

// Module declarations
pub mod aerodynamics;
pub mod constants;
mod error;
mod monte_carlo;
pub mod shot_force;
pub mod simulation;
pub mod units;
