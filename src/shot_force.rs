//! Shot-force model for a two-wheel flywheel launcher.
//!
//! Converts the launcher's kinematic and compression parameters into a
//! time-varying force delivered to the ball while it is in contact with
//! the wheels. The total impulse is fixed by the mechanism (transfer
//! efficiency × ball mass × muzzle velocity) and is shaped in time as a
//! Gaussian centered on the midpoint of the contact window, truncated to
//! the window and renormalized so the shaped profile still integrates to
//! the full impulse.

use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::constants::{MIN_DIVISION_THRESHOLD, SIGMA_MIN};
use crate::error::SimulationError;
use crate::units::rpm_to_rad_per_s;

/// Kinematic and compression parameters of the launcher mechanism
///
/// Immutable per shot; fully determines the shot-force time profile.
#[derive(Debug, Clone)]
pub struct LauncherParameters {
    /// Fraction of wheel surface speed transferred to the ball, (0, 1]
    pub transfer_efficiency: f64,
    /// Ball mass (kg)
    pub ball_mass: f64,
    /// Bottom wheel speed (RPM)
    pub shooter_rpm: f64,
    /// Bottom wheel radius (m)
    pub bottom_wheel_radius: f64,
    /// Speed ratio of the top wheel relative to the bottom wheel
    pub gear_ratio: f64,
    /// Top wheel radius (m)
    pub top_wheel_radius: f64,
    /// Ball compression between the wheels (m)
    pub compression: f64,
    /// Scaling from compression to the Gaussian width of the force pulse
    pub compression_ratio: f64,
    /// Duration the ball stays in contact with the wheels (s)
    pub contact_time: f64,
}

impl Default for LauncherParameters {
    fn default() -> Self {
        Self {
            transfer_efficiency: 0.8,
            ball_mass: crate::constants::DEFAULT_BALL_MASS_KG,
            shooter_rpm: 4000.0,
            bottom_wheel_radius: 0.05,
            gear_ratio: 1.0,
            top_wheel_radius: 0.05,
            compression: 0.01,
            compression_ratio: 0.5,
            contact_time: 0.02,
        }
    }
}

impl LauncherParameters {
    /// Check every parameter constraint, naming the first violation
    ///
    /// Called by solver construction so that malformed configuration is
    /// rejected before any stepping begins.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(self.transfer_efficiency > 0.0 && self.transfer_efficiency <= 1.0) {
            return Err(format!(
                "transfer_efficiency must be in (0, 1], got {}",
                self.transfer_efficiency
            )
            .into());
        }
        if self.ball_mass <= 0.0 {
            return Err(format!("ball_mass must be positive, got {}", self.ball_mass).into());
        }
        if self.shooter_rpm < 0.0 {
            return Err(format!("shooter_rpm must be non-negative, got {}", self.shooter_rpm).into());
        }
        if self.bottom_wheel_radius <= 0.0 {
            return Err(format!(
                "bottom_wheel_radius must be positive, got {}",
                self.bottom_wheel_radius
            )
            .into());
        }
        if self.gear_ratio <= 0.0 {
            return Err(format!("gear_ratio must be positive, got {}", self.gear_ratio).into());
        }
        if self.top_wheel_radius <= 0.0 {
            return Err(format!(
                "top_wheel_radius must be positive, got {}",
                self.top_wheel_radius
            )
            .into());
        }
        if self.compression < 0.0 {
            return Err(format!("compression must be non-negative, got {}", self.compression).into());
        }
        if self.compression_ratio < 0.0 {
            return Err(format!(
                "compression_ratio must be non-negative, got {}",
                self.compression_ratio
            )
            .into());
        }
        if self.contact_time <= 0.0 {
            return Err(format!("contact_time must be positive, got {}", self.contact_time).into());
        }
        Ok(())
    }

    /// Ball exit speed imparted by the mechanism (m/s)
    ///
    /// The two wheels run off one shaft through a gear stage, so both rim
    /// speeds derive from the same angular rate. A two-wheel compression
    /// launcher exits the ball at roughly the mean of the two contact
    /// surface speeds.
    pub fn muzzle_velocity(&self) -> f64 {
        let omega = rpm_to_rad_per_s(self.shooter_rpm);
        let rim_speed_bottom = omega * self.bottom_wheel_radius;
        let rim_speed_top = omega * self.gear_ratio * self.top_wheel_radius;
        (rim_speed_bottom + rim_speed_top) / 2.0
    }

    /// Total impulse delivered over the contact window (N·s)
    pub fn total_impulse(&self) -> f64 {
        self.transfer_efficiency * self.ball_mass * self.muzzle_velocity()
    }
}

/// Standard normal cumulative distribution function
fn standard_normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + libm::erf(x / std::f64::consts::SQRT_2))
}

/// Instantaneous shot force magnitude at `time` seconds into the shot (N)
///
/// Returns 0 outside the contact window `[0, contact_time]`: the ball is
/// simply not touching the wheels there, so zero is the expected steady
/// value, not an error.
///
/// Inside the window the fixed total impulse is shaped as a Gaussian
/// centered at `contact_time / 2` with σ = `compression_ratio ×
/// compression` (floored at [`SIGMA_MIN`]). Because the Gaussian is only
/// evaluated over the finite window, the delivered impulse is divided by
/// `CDF(contact_time) - CDF(0)` so the truncated profile still integrates
/// to the full impulse. A normalization denominator below
/// [`MIN_DIVISION_THRESHOLD`] (σ pathologically small relative to the
/// window) yields 0 instead of a near-zero division.
pub fn shot_force_magnitude(params: &LauncherParameters, time: f64) -> f64 {
    if time < 0.0 || time > params.contact_time {
        return 0.0;
    }

    let impulse = params.total_impulse();

    let t0 = params.contact_time / 2.0;
    let sigma = (params.compression_ratio * params.compression).max(SIGMA_MIN);

    let cdf_lo = standard_normal_cdf((0.0 - t0) / sigma);
    let cdf_hi = standard_normal_cdf((params.contact_time - t0) / sigma);
    let norm = cdf_hi - cdf_lo;

    if norm < MIN_DIVISION_THRESHOLD {
        return 0.0;
    }

    let exponent = -0.5 * ((time - t0) / sigma).powi(2);
    let gaussian = (1.0 / (sigma * (2.0 * PI).sqrt())) * exponent.exp();

    (impulse / norm) * gaussian
}

/// Shot force as a vector along the launch direction
///
/// `direction` is the unit vector out of the muzzle, derived from the
/// turret and hood angles (see [`crate::simulation::launch_direction`]).
pub fn shot_force_vector(
    params: &LauncherParameters,
    direction: &Vector3<f64>,
    time: f64,
) -> Vector3<f64> {
    direction * shot_force_magnitude(params, time)
}
