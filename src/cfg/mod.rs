//! Solver configuration preset
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{
    CONVERGENCE_TOLERANCE_M, EPHEMERIS_VALIDITY_SECONDS, KEPLER_TOLERANCE_RAD,
    MAX_KEPLER_ITERATIONS, MAX_SOLVER_ITERATIONS, MIN_SV,
};

mod realtime;
pub use realtime::{BacklogPolicy, RealtimeOpts};

const fn default_max_iterations() -> usize {
    MAX_SOLVER_ITERATIONS
}

const fn default_convergence_m() -> f64 {
    CONVERGENCE_TOLERANCE_M
}

const fn default_kepler_max_iterations() -> usize {
    MAX_KEPLER_ITERATIONS
}

const fn default_kepler_tolerance() -> f64 {
    KEPLER_TOLERANCE_RAD
}

const fn default_ephemeris_validity() -> f64 {
    EPHEMERIS_VALIDITY_SECONDS
}

const fn default_min_sv() -> usize {
    MIN_SV
}

const fn default_singularity_threshold() -> f64 {
    1.0E-9
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Maximal number of Gauss-Newton rounds, per epoch.
    #[cfg_attr(feature = "serde", serde(default = "default_max_iterations"))]
    pub max_iterations: usize,

    /// The solver has converged once the position update
    /// norm is below this value (meters).
    #[cfg_attr(feature = "serde", serde(default = "default_convergence_m"))]
    pub convergence_m: f64,

    /// Maximal number of Newton-Raphson rounds on Kepler's equation.
    #[cfg_attr(feature = "serde", serde(default = "default_kepler_max_iterations"))]
    pub kepler_max_iterations: usize,

    /// Kepler's equation is solved once the anomaly update is below this value (rad).
    #[cfg_attr(feature = "serde", serde(default = "default_kepler_tolerance"))]
    pub kepler_tolerance_rad: f64,

    /// Ephemeris frames are only used up to this many seconds away from ToE.
    #[cfg_attr(feature = "serde", serde(default = "default_ephemeris_validity"))]
    pub ephemeris_validity_s: f64,

    /// Minimal number of usable vehicles to attempt a solution.
    /// Cannot be lower than 4.
    #[cfg_attr(feature = "serde", serde(default = "default_min_sv"))]
    pub min_sv: usize,

    /// Geometry is declared singular when the smallest pivot of
    /// the QR factorization is this small, relative to the largest one.
    #[cfg_attr(feature = "serde", serde(default = "default_singularity_threshold"))]
    pub singularity_threshold: f64,

    /// Live stream options
    #[cfg_attr(feature = "serde", serde(default))]
    pub realtime: RealtimeOpts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            convergence_m: default_convergence_m(),
            kepler_max_iterations: default_kepler_max_iterations(),
            kepler_tolerance_rad: default_kepler_tolerance(),
            ephemeris_validity_s: default_ephemeris_validity(),
            min_sv: default_min_sv(),
            singularity_threshold: default_singularity_threshold(),
            realtime: RealtimeOpts::default(),
        }
    }
}

impl Config {
    /// Preset for post processing of recorded files: every epoch is processed.
    pub fn static_preset() -> Self {
        Self::default().with_realtime_opts(RealtimeOpts {
            backlog: BacklogPolicy::Sequential,
            ..Default::default()
        })
    }

    /// Preset for a live receiver: we always skip to the most recent epoch,
    /// with a short backlog.
    pub fn kinematic_preset() -> Self {
        Self::default().with_realtime_opts(RealtimeOpts {
            backlog: BacklogPolicy::SkipToLatest,
            queue_capacity: 4,
            ..Default::default()
        })
    }

    /// Copies and returns [Config] with updated iteration budget
    pub fn with_max_iterations(&self, max_iterations: usize) -> Self {
        let mut s = self.clone();
        s.max_iterations = max_iterations;
        s
    }

    /// Copies and returns [Config] with updated convergence criterion (meters)
    pub fn with_convergence_m(&self, convergence_m: f64) -> Self {
        let mut s = self.clone();
        s.convergence_m = convergence_m;
        s
    }

    /// Copies and returns [Config] with updated ephemeris validity (seconds)
    pub fn with_ephemeris_validity_s(&self, validity_s: f64) -> Self {
        let mut s = self.clone();
        s.ephemeris_validity_s = validity_s;
        s
    }

    /// Copies and returns [Config] with minimal number of vehicles.
    /// Values below 4 are raised to 4.
    pub fn with_min_sv(&self, min_sv: usize) -> Self {
        let mut s = self.clone();
        s.min_sv = min_sv.max(MIN_SV);
        s
    }

    /// Copies and returns [Config] with updated [RealtimeOpts]
    pub fn with_realtime_opts(&self, opts: RealtimeOpts) -> Self {
        let mut s = self.clone();
        s.realtime = opts;
        s
    }

    /// Minimal number of vehicles, never lower than 4.
    pub(crate) fn min_sv(&self) -> usize {
        self.min_sv.max(MIN_SV)
    }
}
