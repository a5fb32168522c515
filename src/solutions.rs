//! Receiver solutions
use nalgebra::{Vector3, Vector4};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::SPEED_OF_LIGHT_M_S,
    navigation::DilutionOfPrecision,
    prelude::{Duration, Epoch, SV},
};

/// Receiver position and clock, resolved at one epoch.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReceiverSolution {
    /// Reception [Epoch]
    pub epoch: Epoch,
    /// Position in meters ECEF.
    pub pos_m: (f64, f64, f64),
    /// Receiver clock bias, expressed as range (m)
    pub clock_bias_m: f64,
    /// Receiver clock offset to GPST
    pub clock_offset: Duration,
    /// Space Vehicles that helped form this solution
    pub sv: Vec<SV>,
    /// Number of iterations performed
    pub iterations: usize,
    /// Geometric Dilution of Precision
    pub gdop: f64,
    /// Position Dilution of Precision
    pub pdop: f64,
    /// Temporal Dilution of Precision
    pub tdop: f64,
    /// Post-fit residuals root mean square (m)
    pub residual_rms_m: f64,
}

impl ReceiverSolution {
    pub(crate) fn new(
        epoch: Epoch,
        x: &Vector4<f64>,
        sv: Vec<SV>,
        iterations: usize,
        dop: &DilutionOfPrecision,
        residual_rms_m: f64,
    ) -> Self {
        Self {
            epoch,
            sv,
            iterations,
            residual_rms_m,
            gdop: dop.gdop,
            pdop: dop.pdop,
            tdop: dop.tdop,
            pos_m: (x[0], x[1], x[2]),
            clock_bias_m: x[3],
            // nearest nanosecond
            clock_offset: Duration::from_nanoseconds(
                (x[3] / SPEED_OF_LIGHT_M_S * 1.0E9).round(),
            ),
        }
    }

    /// Position as ECEF [Vector3] (m)
    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.pos_m.0, self.pos_m.1, self.pos_m.2)
    }

    /// (x, y, z, c.dt) state vector (m), used to seed the next epoch.
    pub fn state(&self) -> Vector4<f64> {
        Vector4::new(self.pos_m.0, self.pos_m.1, self.pos_m.2, self.clock_bias_m)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn clock_offset_rounding() {
        let dop = DilutionOfPrecision::default();
        for (bias_s, expected_ns) in [
            (74948.11449999921 / SPEED_OF_LIGHT_M_S, 250_000.0),
            (2.5E-4 + 1.0E-17, 250_000.0),
            (-1.2E-6 + 4.0E-10, -1_200.0),
            (0.0, 0.0),
        ] {
            let x = Vector4::new(1.0, 2.0, 3.0, bias_s * SPEED_OF_LIGHT_M_S);
            let solution = ReceiverSolution::new(Epoch::default(), &x, vec![], 1, &dop, 0.0);
            assert_eq!(
                solution.clock_offset,
                Duration::from_nanoseconds(expected_ns),
                "bias={}s",
                bias_s
            );
        }
    }
}
