//! Explicit unit conversions.
//!
//! Launcher parameters arrive in mechanism-native units (RPM, degrees);
//! the force model works in SI. Keeping the conversions as named functions
//! avoids inline magic constants at the call sites.

use std::f64::consts::PI;

/// Conversion factor: revolutions per minute to radians per second
pub const RPM_TO_RAD_PER_S: f64 = 2.0 * PI / 60.0;

/// Convert a wheel speed in RPM to an angular rate in rad/s
pub fn rpm_to_rad_per_s(rpm: f64) -> f64 {
    rpm * RPM_TO_RAD_PER_S
}

/// Convert degrees to radians
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Convert radians to degrees
pub fn radians_to_degrees(radians: f64) -> f64 {
    radians * 180.0 / PI
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpm_conversion() {
        // 60 RPM is one revolution per second
        assert!((rpm_to_rad_per_s(60.0) - 2.0 * PI).abs() < 1e-12);
        assert_eq!(rpm_to_rad_per_s(0.0), 0.0);
        // 4000 RPM, typical flywheel speed
        assert!((rpm_to_rad_per_s(4000.0) - 418.8790204786391).abs() < 1e-9);
    }

    #[test]
    fn test_angle_conversions() {
        assert!((degrees_to_radians(180.0) - PI).abs() < 1e-12);
        assert!((degrees_to_radians(-90.0) + PI / 2.0).abs() < 1e-12);
        assert!((radians_to_degrees(PI) - 180.0).abs() < 1e-12);
    }

    #[test]
    fn test_round_trip() {
        for angle in [0.0, 12.5, 45.0, 270.0, -33.0] {
            let back = radians_to_degrees(degrees_to_radians(angle));
            assert!((back - angle).abs() < 1e-10);
        }
    }
}
