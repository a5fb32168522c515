//! Raw measurements
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    prelude::{Epoch, SV},
    time::{gpst_epoch, gpst_seconds_of_week},
};

/// Single frequency code [Observation]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Observation {
    /// Raw pseudo range, expressed in meters.
    pub pseudo_range_m: f64,
    /// Possible SNR indication (in dB/Hz).
    pub snr_dbhz: Option<f64>,
}

impl Observation {
    /// Creates new pseudo range [Observation] (in meters), with possible
    /// SNR in dB/Hz.
    pub fn pseudo_range(range_m: f64, snr_dbhz: Option<f64>) -> Self {
        Self {
            snr_dbhz,
            pseudo_range_m: range_m,
        }
    }
}

/// All [Observation]s sampled at the same reception instant.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObservationEpoch {
    /// Reception [Epoch]. Leap seconds must already be resolved:
    /// it is converted to GPST internally.
    pub epoch: Epoch,
    /// [Observation]s, per [SV]
    pub observations: BTreeMap<SV, Observation>,
}

impl ObservationEpoch {
    /// Creates new empty [ObservationEpoch]
    pub fn new(epoch: Epoch) -> Self {
        Self {
            epoch,
            observations: Default::default(),
        }
    }

    /// Creates new empty [ObservationEpoch] from a GPS (week, seconds of week) pair,
    /// as streamed by most receivers.
    pub fn from_time_of_week(week: u32, sow: f64) -> Self {
        Self::new(gpst_epoch(week, sow))
    }

    /// Copies and returns [Self] with one more [Observation].
    /// Any previous [Observation] of this [SV] is replaced.
    pub fn with_observation(&self, sv: SV, observation: Observation) -> Self {
        let mut s = self.clone();
        s.observations.insert(sv, observation);
        s
    }

    /// Reception instant in GPS seconds of week.
    pub fn seconds_of_week(&self) -> f64 {
        gpst_seconds_of_week(self.epoch)
    }

    /// Number of observed vehicles
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
