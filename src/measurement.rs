//! Pseudo range preparation
use log::debug;
use nalgebra::Vector3;

use crate::{
    constants::SPEED_OF_LIGHT_M_S,
    prelude::{Config, Constellation, EphemerisStore, Error, Observation, SV},
    rotation::earth_rotation,
};

/// Solver-ready measurement, for one [SV] and one epoch.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SolverInput {
    /// [SV]
    pub sv: SV,
    /// Pseudo range corrected for total group delay (m)
    pub pseudo_range_m: f64,
    /// [SV] ECEF position (m), expressed in the reception-time frame
    pub position_m: Vector3<f64>,
    /// [SV] clock bias, expressed as range (m)
    pub clock_bias_m: f64,
    /// Signal time of flight (s)
    pub travel_time_s: f64,
}

/// Prepares one raw pseudo range [Observation] of this [SV],
/// received at `t_rx_s` (GPS seconds of week).
///
/// Total group delay is applied to the pseudo range here and only here:
/// the satellite clock bias never includes it.
pub fn prepare(
    sv: SV,
    observation: &Observation,
    t_rx_s: f64,
    store: &EphemerisStore,
    cfg: &Config,
) -> Result<SolverInput, Error> {
    if sv.constellation != Constellation::GPS {
        return Err(Error::UnsupportedConstellation(sv));
    }

    // coarse selection, at reception time: only used to read TGD
    let tgd_s = store.select(sv, t_rx_s, cfg)?.tgd_s;

    let pseudo_range_m = observation.pseudo_range_m - SPEED_OF_LIGHT_M_S * tgd_s;

    if !pseudo_range_m.is_finite() || pseudo_range_m <= 0.0 {
        return Err(Error::PhysicalNonSense(sv));
    }

    let travel_time_s = pseudo_range_m / SPEED_OF_LIGHT_M_S;
    let t_tx_s = t_rx_s - travel_time_s;

    // selection may differ from coarse selection near frame boundaries
    let eph = store.select(sv, t_tx_s, cfg)?;
    let state = eph.satellite_state(t_tx_s, cfg)?;

    let position_m = earth_rotation(state.position_m, travel_time_s);

    debug!(
        "{}({}) - time of flight: {:.6}s clock bias: {:.3}m",
        sv,
        t_rx_s,
        travel_time_s,
        state.clock_bias_m()
    );

    Ok(SolverInput {
        sv,
        pseudo_range_m,
        position_m,
        clock_bias_m: state.clock_bias_m(),
        travel_time_s,
    })
}
