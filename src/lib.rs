#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

// private modules
mod cfg;
mod constants;
mod ephemeris;
mod error;
mod measurement;
mod navigation;
mod observation;
mod pipeline;
mod realtime;
mod rotation;
mod solutions;
mod time;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::cfg::{BacklogPolicy, Config, RealtimeOpts};
    pub use crate::ephemeris::{
        solve_kepler, Ephemeris, EphemerisStore, KeplerSolution, RawEphemeris, SatelliteState,
    };
    pub use crate::error::Error;
    pub use crate::measurement::{prepare, SolverInput};
    pub use crate::navigation::PositionSolver;
    pub use crate::observation::{Observation, ObservationEpoch};
    pub use crate::pipeline::EpochPipeline;
    pub use crate::realtime::{feed, EpochFeed, EpochStream, Realtime};
    pub use crate::rotation::earth_rotation;
    pub use crate::solutions::ReceiverSolution;
    // re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
    pub use nalgebra::Vector3;
}

// pub export
pub use error::Error;
