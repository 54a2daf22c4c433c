/// Physical constants used in launcher flight calculations

/// Gravitational acceleration in m/s²
pub const G_ACCEL_MPS2: f64 = 9.80665;

/// Standard air density at sea level (kg/m³)
pub const STANDARD_AIR_DENSITY: f64 = 1.225;

/// Drag coefficient for a smooth sphere in the subcritical Reynolds regime
///
/// Value: 0.47 (dimensionless)
/// Regime: Re ≈ 10³-10⁵, well below the drag crisis. Launcher exit speeds
/// of 5-25 m/s for a ball a few centimetres across sit inside it.
/// A dimpled or felt-covered ball shifts this value, which is why the
/// coefficient is configuration rather than a property baked into the
/// force functions.
pub const SPHERE_DRAG_COEFFICIENT: f64 = 0.47;

/// Default Magnus (lift) coefficient for a spinning smooth sphere
///
/// Value: 0.1 (dimensionless)
/// Couples spin-induced circulation to lift. For the spin ratios a
/// flywheel launcher produces from its wheel-speed differential this is a
/// representative mid-range value; measured sphere data spans roughly
/// 0.05-0.25 depending on spin ratio and surface texture.
pub const DEFAULT_MAGNUS_COEFFICIENT: f64 = 0.1;

/// Default ball mass (kg)
pub const DEFAULT_BALL_MASS_KG: f64 = 0.045;

/// Default ball radius (m)
pub const DEFAULT_BALL_RADIUS_M: f64 = 0.02135;

/// Default integration timestep (s)
///
/// 10 ms keeps the explicit stepper stable for the accelerations this
/// system produces. Callers who want a smoother force profile across a
/// 20 ms contact window should drop to 1 ms or below.
pub const DEFAULT_TIME_STEP_S: f64 = 0.01;

// Numerical stability constants

/// Floor for the shot-force Gaussian standard deviation (s)
///
/// A zero compression input would otherwise collapse the Gaussian into an
/// infinite spike (division by σ in the density). Inputs below this floor
/// are clamped, not rejected.
pub const SIGMA_MIN: f64 = 1e-6;

/// Minimum threshold for velocity magnitude to avoid division by zero
pub const MIN_VELOCITY_THRESHOLD: f64 = 1e-6;

/// Minimum threshold for preventing division by zero in general calculations
pub const MIN_DIVISION_THRESHOLD: f64 = 1e-12;

/// General numerical tolerance for floating point comparisons
pub const NUMERICAL_TOLERANCE: f64 = 1e-9;
