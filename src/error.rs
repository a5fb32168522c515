use thiserror::Error;

use crate::prelude::{ReceiverSolution, SV};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// No [Ephemeris] frame lies within the validity window of the
    /// requested instant, for this [SV].
    ///
    /// [Ephemeris]: crate::prelude::Ephemeris
    #[error("{0}: no ephemeris within validity window")]
    EphemerisUnavailable(SV),

    /// A required [Ephemeris] field is missing or physically invalid.
    /// The second member names the offending field.
    ///
    /// [Ephemeris]: crate::prelude::Ephemeris
    #[error("{0}: invalid ephemeris ({1})")]
    EphemerisInvalid(SV, &'static str),

    /// Only GPS vehicles may contribute: the engine is single frequency GPS.
    #[error("{0}: constellation not supported")]
    UnsupportedConstellation(SV),

    /// Corrected pseudo range is not a positive finite distance,
    /// which would place transmission after reception.
    #[error("{0}: physical non sense: rx prior tx")]
    PhysicalNonSense(SV),

    /// The design matrix is rank deficient: collinear or coplanar
    /// geometry between the vehicles and the receiver.
    #[error("singular geometry: failed to invert normal matrix")]
    SingularGeometry,

    /// Iteration budget exhausted without meeting the convergence criterion.
    /// The terminal estimate is preserved.
    #[error("solver did not converge")]
    NotConverged(ReceiverSolution),

    /// Less than 4 usable vehicles for this epoch.
    /// The member indicates how many were usable.
    #[error("not enough satellites: {0} usable")]
    InsufficientSatellites(usize),
}
