/// Speed of light in m.s⁻¹
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Earth gravitational constant (m^3 s-2), as broadcast in the GPS ICD
pub const EARTH_GRAVITATION_MU_M3_S2: f64 = 3.986005E14;

/// Earth angular velocity, in WGS84 frame rad/s
pub const EARTH_ANGULAR_VEL_RAD: f64 = 7.2921151467E-5;

/// Relativistic clock correction constant F = -2√μ/c² (s.m^-1/2)
pub const RELATIVISTIC_F: f64 = -4.442807633E-10;

/// Duration of one GPS week, in seconds
pub const GPS_WEEK_SECONDS: f64 = 604_800.0;

/// Half a GPS week, in seconds. Time differences are wrapped into
/// [-HALF_WEEK_SECONDS, HALF_WEEK_SECONDS].
pub const HALF_WEEK_SECONDS: f64 = 302_400.0;

/// Broadcast ephemeris validity, in seconds, on either side of ToE
pub const EPHEMERIS_VALIDITY_SECONDS: f64 = 14_400.0;

/// Solver convergence criterion on the position update (meters)
pub const CONVERGENCE_TOLERANCE_M: f64 = 1.0E-4;

/// Maximal number of Gauss-Newton rounds per epoch
pub const MAX_SOLVER_ITERATIONS: usize = 10;

/// Maximal number of Newton-Raphson rounds on Kepler's equation
pub const MAX_KEPLER_ITERATIONS: usize = 10;

/// Kepler solver convergence criterion on the anomaly update (rad)
pub const KEPLER_TOLERANCE_RAD: f64 = 1.0E-12;

/// Minimal number of vehicles to resolve (x, y, z, c.dt)
pub const MIN_SV: usize = 4;
