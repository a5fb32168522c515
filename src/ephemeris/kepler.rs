use log::{debug, warn};
use nalgebra::{Rotation3, Vector3};

use crate::{
    constants::{EARTH_ANGULAR_VEL_RAD, EARTH_GRAVITATION_MU_M3_S2, RELATIVISTIC_F},
    prelude::{Config, Ephemeris, Error},
    time::wrap_week_seconds,
};

/// Above this eccentricity, the Newton-Raphson iteration
/// is not started at the mean anomaly (see [solve_kepler]).
const HIGH_ECCENTRICITY: f64 = 0.8;

/// Starting point offset for highly eccentric orbits (Danby, 1987).
const DANBY_K: f64 = 0.85;

/// Derivative magnitude below which the Newton-Raphson iteration is aborted.
const MIN_DERIVATIVE: f64 = 1.0E-15;

/// Outcome of [solve_kepler].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct KeplerSolution {
    /// Eccentric anomaly (rad)
    pub eccentric_anomaly: f64,
    /// Number of Newton-Raphson updates performed
    pub iterations: usize,
    /// True when the last update was below tolerance
    pub converged: bool,
}

/// Solves Kepler's equation E = M + e.sin(E) by Newton-Raphson iteration.
///
/// The iteration starts at E₀ = M, except for highly eccentric orbits (e ≥ 0.8)
/// where E₀ = M + 0.85.e.sign(sin M), which guarantees convergence.
/// GNSS orbits are nearly circular and always start at the mean anomaly.
/// When the iteration budget is exhausted, the last value is returned
/// with `converged` unset.
pub fn solve_kepler(
    m: f64,
    e: f64,
    max_iterations: usize,
    tolerance_rad: f64,
) -> KeplerSolution {
    let mut e_k = if e < HIGH_ECCENTRICITY {
        m
    } else {
        m + DANBY_K * e * m.sin().signum()
    };

    let mut iterations = 0;
    let mut converged = false;

    while iterations < max_iterations {
        let f = e_k - e * e_k.sin() - m;
        let f_prime = 1.0 - e * e_k.cos();

        if f_prime.abs() < MIN_DERIVATIVE {
            break;
        }

        let de = f / f_prime;
        e_k -= de;
        iterations += 1;

        if de.abs() < tolerance_rad {
            converged = true;
            break;
        }
    }

    KeplerSolution {
        eccentric_anomaly: e_k,
        iterations,
        converged,
    }
}

/// Satellite state, resolved at transmission time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SatelliteState {
    /// ECEF position (m), in the frame attached to the Earth at transmission time.
    pub position_m: Vector3<f64>,
    /// Total clock bias (s): polynomial and relativistic terms.
    /// Total group delay is not included.
    pub clock_bias_s: f64,
    /// Relativistic term of the clock bias (s)
    pub relativistic_s: f64,
    /// Eccentric anomaly (rad)
    pub eccentric_anomaly_rad: f64,
    /// Time elapsed since ToE (s), week rollover accounted for
    pub t_k_s: f64,
}

impl SatelliteState {
    /// Clock bias expressed as range (m)
    pub fn clock_bias_m(&self) -> f64 {
        self.clock_bias_s * crate::constants::SPEED_OF_LIGHT_M_S
    }
}

impl Ephemeris {
    /// Resolves Kepler equations from [Ephemeris], at transmission
    /// instant `t_tx_s` (GPS seconds of week).
    pub fn satellite_state(&self, t_tx_s: f64, cfg: &Config) -> Result<SatelliteState, Error> {
        self.validate()?;

        if !t_tx_s.is_finite() {
            return Err(Error::EphemerisInvalid(self.sv, "t_tx"));
        }

        let e = self.eccentricity;
        let a = self.semi_major_axis_m();

        let (cus, cuc) = self.cus_cuc_rad;
        let (cis, cic) = self.cis_cic_rad;
        let (crs, crc) = self.crs_crc_m;

        let t_k = wrap_week_seconds(t_tx_s - self.toe_s);

        let n0 = (EARTH_GRAVITATION_MU_M3_S2 / a.powi(3)).sqrt();
        let n = n0 + self.dn_rad_s;
        let m_k = self.m0_rad + n * t_k;

        let kepler = solve_kepler(m_k, e, cfg.kepler_max_iterations, cfg.kepler_tolerance_rad);

        if !kepler.converged {
            warn!(
                "{}({}) - kepler solver did not converge after {} iterations",
                self.sv, t_tx_s, kepler.iterations
            );
        }

        let e_k = kepler.eccentric_anomaly;
        let (sin_e_k, cos_e_k) = e_k.sin_cos();

        let v_k = ((1.0 - e.powi(2)).sqrt() * sin_e_k).atan2(cos_e_k - e);

        let phi = v_k + self.omega_rad;
        let (sin_2phi, cos_2phi) = (2.0 * phi).sin_cos();

        let u_k = phi + cus * sin_2phi + cuc * cos_2phi;
        let r_k = a * (1.0 - e * cos_e_k) + crs * sin_2phi + crc * cos_2phi;
        let i_k = self.i0_rad + cis * sin_2phi + cic * cos_2phi + self.idot_rad_s * t_k;

        let omega_k = self.omega0_rad + (self.omega_dot_rad_s - EARTH_ANGULAR_VEL_RAD) * t_k
            - EARTH_ANGULAR_VEL_RAD * self.toe_s;

        // orbital plane to ECEF
        let rot_x = Rotation3::from_axis_angle(&Vector3::x_axis(), i_k);
        let rot_z = Rotation3::from_axis_angle(&Vector3::z_axis(), omega_k);
        let position_m = rot_z * rot_x * Vector3::new(r_k * u_k.cos(), r_k * u_k.sin(), 0.0);

        let dt_oc = wrap_week_seconds(t_tx_s - self.toc_s);
        let (a0, a1, a2) = self.clock_polynomials;
        let polynomial_s = a0 + a1 * dt_oc + a2 * dt_oc.powi(2);
        let relativistic_s = RELATIVISTIC_F * e * self.sqrt_a * sin_e_k;

        debug!(
            "{}({}) - kepler solving x_km={} y_km={} z_km={} t_k={}",
            self.sv,
            t_tx_s,
            position_m[0] / 1.0E3,
            position_m[1] / 1.0E3,
            position_m[2] / 1.0E3,
            t_k
        );

        Ok(SatelliteState {
            position_m,
            clock_bias_s: polynomial_s + relativistic_s,
            relativistic_s,
            eccentric_anomaly_rad: e_k,
            t_k_s: t_k,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::SmallRng, Rng, SeedableRng};
    use std::f64::consts::PI;

    #[test]
    fn circular_orbit() {
        for m in [-3.0, -0.5, 0.0, 0.1, 1.0, 2.5] {
            let kepler = solve_kepler(m, 0.0, 10, 1.0E-12);
            assert!(kepler.converged);
            assert_eq!(kepler.iterations, 1);
            assert_eq!(kepler.eccentric_anomaly, m);
        }
    }

    #[test]
    fn newton_raphson_convergence() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        for _ in 0..5_000 {
            let e = rng.random_range(0.0..0.99);
            let m = rng.random_range(-PI..PI);
            let kepler = solve_kepler(m, e, 10, 1.0E-12);
            let e_k = kepler.eccentric_anomaly;
            let residual = (e_k - e * e_k.sin() - m).abs();
            assert!(
                residual < 1.0E-9,
                "e={} m={} E={} residual={} ({} iter)",
                e,
                m,
                e_k,
                residual,
                kepler.iterations
            );
            assert!(kepler.iterations <= 10);
        }
    }

    #[test]
    fn exhausted_budget_keeps_last_value() {
        let kepler = solve_kepler(1.0, 0.5, 1, 1.0E-12);
        assert!(!kepler.converged);
        assert_eq!(kepler.iterations, 1);
        assert!(kepler.eccentric_anomaly.is_finite());
        assert!(kepler.eccentric_anomaly != 1.0);
    }
}
