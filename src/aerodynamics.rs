//! Aerodynamic forces on the ball in flight: quadratic drag opposing
//! motion and Magnus lift from spin.

use nalgebra::Vector3;

use crate::constants::MIN_VELOCITY_THRESHOLD;

/// Cross-sectional area of the ball (m²)
pub fn cross_sectional_area(radius: f64) -> f64 {
    std::f64::consts::PI * radius * radius
}

/// Aerodynamic drag force (N)
///
/// Magnitude ½·ρ·v²·C_d·A, directed against the velocity. At rest the
/// drag direction is undefined (normalizing a zero vector), so speeds
/// below [`MIN_VELOCITY_THRESHOLD`] return the zero vector.
pub fn drag_force(
    velocity: &Vector3<f64>,
    air_density: f64,
    drag_coefficient: f64,
    area: f64,
) -> Vector3<f64> {
    let speed = velocity.norm();
    if speed < MIN_VELOCITY_THRESHOLD {
        return Vector3::zeros();
    }

    let magnitude = 0.5 * air_density * speed * speed * drag_coefficient * area;
    velocity * (-magnitude / speed)
}

/// Magnus force from spin (N)
///
/// Magnitude ½·ρ·v·A·r·C_m applied along spin × velocity, giving lift
/// perpendicular to both the spin axis and the direction of motion. The
/// cross product vanishes with either factor, so no zero-speed guard is
/// needed here.
pub fn magnus_force(
    spin: &Vector3<f64>,
    velocity: &Vector3<f64>,
    air_density: f64,
    ball_radius: f64,
    magnus_coefficient: f64,
    area: f64,
) -> Vector3<f64> {
    let speed = velocity.norm();
    let magnitude = 0.5 * air_density * speed * area * ball_radius * magnus_coefficient;
    spin.cross(velocity) * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{
        DEFAULT_BALL_RADIUS_M, DEFAULT_MAGNUS_COEFFICIENT, SPHERE_DRAG_COEFFICIENT,
        STANDARD_AIR_DENSITY,
    };

    fn ball_area() -> f64 {
        cross_sectional_area(DEFAULT_BALL_RADIUS_M)
    }

    #[test]
    fn test_cross_sectional_area() {
        assert!((cross_sectional_area(1.0) - std::f64::consts::PI).abs() < 1e-12);
        assert!((ball_area() - 0.00143201).abs() < 1e-7);
    }

    #[test]
    fn test_drag_zero_at_rest() {
        let force = drag_force(
            &Vector3::zeros(),
            STANDARD_AIR_DENSITY,
            SPHERE_DRAG_COEFFICIENT,
            ball_area(),
        );
        assert_eq!(force, Vector3::zeros());
    }

    #[test]
    fn test_drag_opposes_motion() {
        let velocity = Vector3::new(3.0, -4.0, 12.0);
        let force = drag_force(
            &velocity,
            STANDARD_AIR_DENSITY,
            SPHERE_DRAG_COEFFICIENT,
            ball_area(),
        );

        // Anti-parallel: negative dot product, vanishing cross product
        assert!(force.dot(&velocity) < 0.0);
        assert!(force.cross(&velocity).norm() < 1e-9);
    }

    #[test]
    fn test_drag_scales_with_speed_squared() {
        let v1 = Vector3::new(10.0, 0.0, 0.0);
        let v2 = Vector3::new(20.0, 0.0, 0.0);

        let f1 = drag_force(&v1, STANDARD_AIR_DENSITY, SPHERE_DRAG_COEFFICIENT, ball_area());
        let f2 = drag_force(&v2, STANDARD_AIR_DENSITY, SPHERE_DRAG_COEFFICIENT, ball_area());

        let ratio = f2.norm() / f1.norm();
        assert!((ratio - 4.0).abs() < 1e-9);

        // Spot-check the magnitude at 10 m/s
        let expected = 0.5 * STANDARD_AIR_DENSITY * 100.0 * SPHERE_DRAG_COEFFICIENT * ball_area();
        assert!((f1.norm() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_magnus_zero_without_spin() {
        let force = magnus_force(
            &Vector3::zeros(),
            &Vector3::new(15.0, 2.0, 5.0),
            STANDARD_AIR_DENSITY,
            DEFAULT_BALL_RADIUS_M,
            DEFAULT_MAGNUS_COEFFICIENT,
            ball_area(),
        );
        assert_eq!(force, Vector3::zeros());
    }

    #[test]
    fn test_magnus_zero_without_velocity() {
        let force = magnus_force(
            &Vector3::new(0.0, 100.0, 0.0),
            &Vector3::zeros(),
            STANDARD_AIR_DENSITY,
            DEFAULT_BALL_RADIUS_M,
            DEFAULT_MAGNUS_COEFFICIENT,
            ball_area(),
        );
        assert_eq!(force, Vector3::zeros());
    }

    #[test]
    fn test_magnus_orthogonal_to_spin_and_velocity() {
        // Backspin about y while moving forward along x lifts along +z
        let spin = Vector3::new(0.0, 200.0, 0.0);
        let velocity = Vector3::new(12.0, 0.0, 3.0);
        let force = magnus_force(
            &spin,
            &velocity,
            STANDARD_AIR_DENSITY,
            DEFAULT_BALL_RADIUS_M,
            DEFAULT_MAGNUS_COEFFICIENT,
            ball_area(),
        );

        assert!(force.norm() > 0.0);
        assert!(force.dot(&spin).abs() < 1e-9 * force.norm() * spin.norm());
        assert!(force.dot(&velocity).abs() < 1e-9 * force.norm() * velocity.norm());
    }

    #[test]
    fn test_backspin_lifts_against_gravity() {
        // Ball heading +x with backspin (spin axis -y): spin x velocity
        // points up
        let spin = Vector3::new(0.0, -150.0, 0.0);
        let velocity = Vector3::new(18.0, 0.0, 0.0);
        let force = magnus_force(
            &spin,
            &velocity,
            STANDARD_AIR_DENSITY,
            DEFAULT_BALL_RADIUS_M,
            DEFAULT_MAGNUS_COEFFICIENT,
            ball_area(),
        );

        assert!(force.z > 0.0);
        assert!(force.x.abs() < 1e-12);
    }
}
