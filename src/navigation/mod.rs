use log::{debug, warn};
use nalgebra::{DVector, Matrix4, MatrixXx4, Vector3, Vector4};

mod dop;
pub(crate) use dop::DilutionOfPrecision;

use crate::prelude::{Config, Epoch, Error, ReceiverSolution, SolverInput};

/// Below this distance (m) to a vehicle, the line of sight is undefined.
const MIN_RANGE_M: f64 = 1.0;

/// Linearized navigation system, at one estimate.
#[derive(Debug, Clone)]
pub(crate) struct Navigation {
    /// design matrix
    h: MatrixXx4<f64>,
    /// pre-fit residuals
    b: DVector<f64>,
}

impl Navigation {
    /// Forms the design matrix and residual vector around `x` = (x, y, z, c.dt).
    ///
    /// The pseudo range is modeled as ρ = r + c.dt - c.dt_sv.
    pub fn new(inputs: &[SolverInput], x: &Vector4<f64>) -> Result<Self, Error> {
        let size = inputs.len();
        let rx = Vector3::new(x[0], x[1], x[2]);

        let mut h = MatrixXx4::<f64>::zeros(size);
        let mut b = DVector::<f64>::zeros(size);

        for (i, input) in inputs.iter().enumerate() {
            let los = rx - input.position_m;
            let r = los.norm();

            if !r.is_finite() || r < MIN_RANGE_M {
                return Err(Error::SingularGeometry);
            }

            let predicted = r + x[3] - input.clock_bias_m;

            h[(i, 0)] = los[0] / r;
            h[(i, 1)] = los[1] / r;
            h[(i, 2)] = los[2] / r;
            h[(i, 3)] = 1.0;
            b[i] = input.pseudo_range_m - predicted;
        }

        Ok(Self { h, b })
    }

    /// Least squares correction Δ = (HᵗH)⁻¹Hᵗb, obtained from
    /// the QR factorization of H. Geometry is declared singular when the
    /// smallest pivot is `threshold` times smaller than the largest one.
    pub fn correction(&self, threshold: f64) -> Result<Vector4<f64>, Error> {
        let qr = self.h.clone().qr();
        let (q, r) = (qr.q(), qr.r());

        let r = Matrix4::from_fn(|i, j| r[(i, j)]);
        let qtb = q.transpose() * &self.b;
        let qtb = Vector4::new(qtb[0], qtb[1], qtb[2], qtb[3]);

        let pivots = r.diagonal().abs();
        let (min, max) = (pivots.min(), pivots.max());

        if min.is_nan() || min <= threshold * max {
            debug!("rejected geometry: pivots {}", pivots.transpose());
            return Err(Error::SingularGeometry);
        }

        r.solve_upper_triangular(&qtb)
            .filter(|dx| dx.iter().all(|v| v.is_finite()))
            .ok_or(Error::SingularGeometry)
    }

    /// (HᵗH)⁻¹
    pub fn covariance(&self) -> Result<Matrix4<f64>, Error> {
        let ht = self.h.transpose();
        (ht * &self.h).try_inverse().ok_or(Error::SingularGeometry)
    }

    /// Residuals root mean square (m)
    pub fn residual_rms(&self) -> f64 {
        (self.b.norm_squared() / self.b.len() as f64).sqrt()
    }
}

/// Iterative (Gauss-Newton) least squares position solver.
#[derive(Debug, Clone, Default)]
pub struct PositionSolver {
    cfg: Config,
}

impl PositionSolver {
    pub fn new(cfg: &Config) -> Self {
        Self { cfg: cfg.clone() }
    }

    /// Resolves (x, y, z, c.dt) at reception [Epoch] `t`, starting from `initial`.
    /// ## Inputs
    /// - t: reception [Epoch], only used to tag the solution
    /// - inputs: at least 4 [SolverInput]s
    /// - initial: (x, y, z, c.dt) initial guess, in meters.
    ///   Use zeros for a cold start.
    /// ## Returns
    /// - [ReceiverSolution] once the position update fell below the
    ///   convergence criterion.
    /// - [Error::NotConverged] with the terminal estimate, when the iteration
    ///   budget is exhausted.
    /// - [Error::SingularGeometry] when the geometry is degenerate.
    pub fn solve(
        &self,
        t: Epoch,
        inputs: &[SolverInput],
        initial: &Vector4<f64>,
    ) -> Result<ReceiverSolution, Error> {
        if inputs.len() < self.cfg.min_sv() {
            return Err(Error::InsufficientSatellites(inputs.len()));
        }

        let mut x = *initial;

        for iteration in 1..=self.cfg.max_iterations {
            let nav = Navigation::new(inputs, &x)?;
            let dx = nav.correction(self.cfg.singularity_threshold)?;

            x += dx;

            let dx_norm = Vector3::new(dx[0], dx[1], dx[2]).norm();
            debug!("{} - iteration #{}: |dx|={:.6E}m dx={}", t, iteration, dx_norm, dx.transpose());

            if dx_norm < self.cfg.convergence_m {
                return Ok(self.solution(t, inputs, &x, iteration));
            }
        }

        warn!("{} - not converged after {} iterations", t, self.cfg.max_iterations);
        let solution = self.solution(t, inputs, &x, self.cfg.max_iterations);
        Err(Error::NotConverged(solution))
    }

    /// Forms [ReceiverSolution] at the final estimate.
    /// DOPs and residuals are left undefined when the geometry
    /// degenerates at that estimate: the estimate itself is always kept.
    fn solution(
        &self,
        t: Epoch,
        inputs: &[SolverInput],
        x: &Vector4<f64>,
        iterations: usize,
    ) -> ReceiverSolution {
        let (dop, residual_rms_m) = match Navigation::new(inputs, x) {
            Ok(nav) => {
                let dop = match nav.covariance() {
                    Ok(q) => DilutionOfPrecision::new(&q),
                    Err(e) => {
                        warn!("{} - undefined dilution of precision: {}", t, e);
                        DilutionOfPrecision::undefined()
                    },
                };
                (dop, nav.residual_rms())
            },
            Err(e) => {
                warn!("{} - undefined final residuals: {}", t, e);
                (DilutionOfPrecision::undefined(), f64::NAN)
            },
        };

        ReceiverSolution::new(
            t,
            x,
            inputs.iter().map(|input| input.sv).collect(),
            iterations,
            &dop,
            residual_rms_m,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prelude::{Constellation, SV};

    fn equatorial(size: u8) -> Vec<SolverInput> {
        (0..size)
            .map(|i| {
                let angle = i as f64 * 0.6;
                SolverInput {
                    sv: SV::new(Constellation::GPS, i + 1),
                    pseudo_range_m: 2.2E7,
                    position_m: Vector3::new(2.6E7 * angle.cos(), 2.6E7 * angle.sin(), 0.0),
                    clock_bias_m: 0.0,
                    travel_time_s: 0.07,
                }
            })
            .collect()
    }

    #[test]
    fn degenerate_final_estimate_is_kept() {
        let solver = PositionSolver::new(&Config::default());
        let inputs = equatorial(5);

        // rank deficient at this estimate
        let x = Vector4::new(1.0E3, -2.0E3, 0.0, 10.0);
        assert!(Navigation::new(&inputs, &x).unwrap().covariance().is_err());

        let solution = solver.solution(Epoch::default(), &inputs, &x, 10);
        assert_eq!(solution.state(), x);
        assert_eq!(solution.iterations, 10);
        assert_eq!(solution.sv.len(), 5);
        assert!(solution.gdop.is_nan() && solution.pdop.is_nan() && solution.tdop.is_nan());
        assert!(solution.residual_rms_m.is_finite());

        // estimate sitting on a vehicle
        let x = Vector4::new(2.6E7, 0.0, 0.0, 0.0);
        let solution = solver.solution(Epoch::default(), &inputs, &x, 3);
        assert_eq!(solution.state(), x);
        assert!(solution.residual_rms_m.is_nan());
    }
}
