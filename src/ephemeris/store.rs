use std::collections::HashMap;

use log::{debug, warn};

use crate::prelude::{Config, Ephemeris, Error, SV};

/// Read-only collection of [Ephemeris] frames, indexed by [SV].
/// Frames are kept in the order they were loaded in.
#[derive(Debug, Clone, Default)]
pub struct EphemerisStore {
    frames: HashMap<SV, Vec<Ephemeris>>,
}

impl EphemerisStore {
    /// Builds a new [EphemerisStore]. Frames that do not pass
    /// [Ephemeris::validate] are dropped.
    pub fn from_records<I: IntoIterator<Item = Ephemeris>>(records: I) -> Self {
        let mut frames = HashMap::<SV, Vec<Ephemeris>>::new();
        for eph in records {
            match eph.validate() {
                Ok(_) => frames.entry(eph.sv).or_default().push(eph),
                Err(e) => warn!("{}({}) - dropped ephemeris: {}", eph.epoch, eph.sv, e),
            }
        }
        debug!("ephemeris store: {} vehicles", frames.len());
        Self { frames }
    }

    /// Returns all [Ephemeris] frames for this [SV], in loading order.
    pub fn records(&self, sv: SV) -> &[Ephemeris] {
        self.frames.get(&sv).map(|v| v.as_slice()).unwrap_or_default()
    }

    /// Iterates over all [SV] we have data for, in no particular order.
    pub fn satellites(&self) -> impl Iterator<Item = SV> + '_ {
        self.frames.keys().copied()
    }

    /// Total number of frames
    pub fn len(&self) -> usize {
        self.frames.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Selects the [Ephemeris] frame to use for this [SV] at `t_s` (GPS seconds of week).
    pub fn select(&self, sv: SV, t_s: f64, cfg: &Config) -> Result<&Ephemeris, Error> {
        super::selector::select(self.records(sv), t_s, cfg.ephemeris_validity_s)
            .ok_or(Error::EphemerisUnavailable(sv))
    }
}

impl FromIterator<Ephemeris> for EphemerisStore {
    fn from_iter<T: IntoIterator<Item = Ephemeris>>(iter: T) -> Self {
        Self::from_records(iter)
    }
}
