use crate::prelude::{Epoch, Error, SV};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::GPS_WEEK_SECONDS;

pub(crate) mod kepler;
pub(crate) mod selector;
mod store;

pub use kepler::{solve_kepler, KeplerSolution, SatelliteState};
pub use store::EphemerisStore;

/// Broadcast [Ephemeris] frame, fully validated.
/// Angles are expressed in radians, ToE and ToC in GPS seconds of week.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ephemeris {
    /// [SV]
    pub sv: SV,

    /// Reference [Epoch] of this frame, as published
    pub epoch: Epoch,

    /// Time of Ephemeris (s of week)
    pub toe_s: f64,

    /// Time of Clock (s of week)
    pub toc_s: f64,

    /// Square root of the semi-major axis (m^1/2)
    pub sqrt_a: f64,

    /// Eccentricity
    pub eccentricity: f64,

    /// Mean anomaly at ToE
    pub m0_rad: f64,

    /// Argument of perigee
    pub omega_rad: f64,

    /// Inclination at ToE
    pub i0_rad: f64,

    /// Longitude of ascending node at weekly epoch
    pub omega0_rad: f64,

    /// Mean motion difference (rad/s)
    pub dn_rad_s: f64,

    /// Inclination rate (rad/s)
    pub idot_rad_s: f64,

    /// Right ascension rate (rad/s)
    pub omega_dot_rad_s: f64,

    /// Sine / Cosine (in radians)
    pub cus_cuc_rad: (f64, f64),

    /// Sine / Cosine (in meters)
    pub crs_crc_m: (f64, f64),

    /// Sine / Cosine (in radians)
    pub cis_cic_rad: (f64, f64),

    /// Clock polynomial (a0 [s], a1 [s/s], a2 [s/s²])
    pub clock_polynomials: (f64, f64, f64),

    /// Total group delay (s)
    pub tgd_s: f64,
}

impl Ephemeris {
    /// Semi-major axis (m)
    pub fn semi_major_axis_m(&self) -> f64 {
        self.sqrt_a.powi(2)
    }

    /// Verifies this frame is physically usable.
    pub fn validate(&self) -> Result<(), Error> {
        let finite = [
            (self.sqrt_a, "sqrt_a"),
            (self.eccentricity, "e"),
            (self.m0_rad, "m0"),
            (self.omega_rad, "omega"),
            (self.i0_rad, "i0"),
            (self.omega0_rad, "omega0"),
            (self.dn_rad_s, "dn"),
            (self.idot_rad_s, "idot"),
            (self.omega_dot_rad_s, "omega_dot"),
            (self.cus_cuc_rad.0, "cus"),
            (self.cus_cuc_rad.1, "cuc"),
            (self.crs_crc_m.0, "crs"),
            (self.crs_crc_m.1, "crc"),
            (self.cis_cic_rad.0, "cis"),
            (self.cis_cic_rad.1, "cic"),
            (self.clock_polynomials.0, "a0"),
            (self.clock_polynomials.1, "a1"),
            (self.clock_polynomials.2, "a2"),
            (self.tgd_s, "tgd"),
        ];

        if let Some((_, field)) = finite.iter().find(|(value, _)| !value.is_finite()) {
            return Err(Error::EphemerisInvalid(self.sv, *field));
        }

        if self.sqrt_a <= 0.0 {
            return Err(Error::EphemerisInvalid(self.sv, "sqrt_a"));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(Error::EphemerisInvalid(self.sv, "e"));
        }
        if !(0.0..GPS_WEEK_SECONDS).contains(&self.toe_s) {
            return Err(Error::EphemerisInvalid(self.sv, "toe"));
        }
        if !(0.0..GPS_WEEK_SECONDS).contains(&self.toc_s) {
            return Err(Error::EphemerisInvalid(self.sv, "toc"));
        }
        Ok(())
    }
}

/// Loosely typed ephemeris frame, as produced by a text decoder
/// where any field may be missing. Convert it with [Ephemeris::try_from],
/// so the rest of the pipeline never deals with absent fields.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawEphemeris {
    pub sv: SV,
    pub epoch: Epoch,
    pub toe: Option<f64>,
    pub toc: Option<f64>,
    pub sqrt_a: Option<f64>,
    pub e: Option<f64>,
    pub m0: Option<f64>,
    pub omega: Option<f64>,
    pub i0: Option<f64>,
    pub omega0: Option<f64>,
    pub delta_n: Option<f64>,
    pub i_dot: Option<f64>,
    pub omega_dot: Option<f64>,
    pub cuc: Option<f64>,
    pub cus: Option<f64>,
    pub crc: Option<f64>,
    pub crs: Option<f64>,
    pub cic: Option<f64>,
    pub cis: Option<f64>,
    pub a0: Option<f64>,
    pub a1: Option<f64>,
    pub a2: Option<f64>,
    pub tgd: Option<f64>,
}

impl TryFrom<RawEphemeris> for Ephemeris {
    type Error = Error;

    fn try_from(raw: RawEphemeris) -> Result<Self, Self::Error> {
        let sv = raw.sv;
        let required = |value: Option<f64>, field: &'static str| {
            value.ok_or(Error::EphemerisInvalid(sv, field))
        };

        let eph = Self {
            sv,
            epoch: raw.epoch,
            toe_s: required(raw.toe, "toe")?,
            toc_s: required(raw.toc, "toc")?,
            sqrt_a: required(raw.sqrt_a, "sqrt_a")?,
            eccentricity: required(raw.e, "e")?,
            m0_rad: required(raw.m0, "m0")?,
            omega_rad: required(raw.omega, "omega")?,
            i0_rad: required(raw.i0, "i0")?,
            omega0_rad: required(raw.omega0, "omega0")?,
            dn_rad_s: required(raw.delta_n, "dn")?,
            idot_rad_s: required(raw.i_dot, "idot")?,
            omega_dot_rad_s: required(raw.omega_dot, "omega_dot")?,
            cus_cuc_rad: (required(raw.cus, "cus")?, required(raw.cuc, "cuc")?),
            crs_crc_m: (required(raw.crs, "crs")?, required(raw.crc, "crc")?),
            cis_cic_rad: (required(raw.cis, "cis")?, required(raw.cic, "cic")?),
            clock_polynomials: (
                required(raw.a0, "a0")?,
                required(raw.a1, "a1")?,
                required(raw.a2, "a2")?,
            ),
            // not all decoders publish TGD
            tgd_s: raw.tgd.unwrap_or_default(),
        };

        eph.validate()?;
        Ok(eph)
    }
}
