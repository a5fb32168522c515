//! Epoch processing
use std::sync::Arc;

use itertools::{Either, Itertools};
use log::{debug, info, warn};
use nalgebra::{Vector3, Vector4};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    measurement::prepare,
    prelude::{
        Config, Epoch, EphemerisStore, Error, ObservationEpoch, PositionSolver, ReceiverSolution,
        SolverInput,
    },
};

/// [EpochPipeline] turns [ObservationEpoch]s into [ReceiverSolution]s,
/// one epoch at a time. It owns the warm start seed: the last converged
/// solution. Epochs must be presented in chronological order.
#[derive(Debug, Clone)]
pub struct EpochPipeline {
    /// [Config] preset
    cfg: Config,
    /// Shared [EphemerisStore]
    store: Arc<EphemerisStore>,
    /// [PositionSolver]
    solver: PositionSolver,
    /// (x, y, z, c.dt) seed, from the last converged epoch
    seed: Option<Vector4<f64>>,
}

impl EpochPipeline {
    /// Creates a new [EpochPipeline], that will cold start on its first epoch.
    pub fn new(cfg: &Config, store: Arc<EphemerisStore>) -> Self {
        info!("pipeline deployed: {} ephemeris frames", store.len());
        Self {
            store,
            cfg: cfg.clone(),
            solver: PositionSolver::new(cfg),
            seed: None,
        }
    }

    /// Copies and returns [Self] warm started from an a-priori ECEF position (m),
    /// for example a file header position.
    pub fn with_seed(&self, position_m: Vector3<f64>) -> Self {
        let mut s = self.clone();
        s.seed = Some(Vector4::new(position_m[0], position_m[1], position_m[2], 0.0));
        s
    }

    /// Current (x, y, z, c.dt) seed, if any.
    pub fn seed(&self) -> Option<Vector4<f64>> {
        self.seed
    }

    /// Forgets the current seed: next epoch is a cold start.
    pub fn reset(&mut self) {
        debug!("pipeline reset");
        self.seed = None;
    }

    /// [Config] in use
    pub fn cfg(&self) -> &Config {
        &self.cfg
    }

    /// Prepares every [SolverInput] of this [ObservationEpoch].
    /// Vehicles that could not be prepared are returned as [Error]s,
    /// they never invalidate the rest of the epoch.
    pub fn prepare(&self, epoch: &ObservationEpoch) -> (Vec<SolverInput>, Vec<Error>) {
        let t_rx_s = epoch.seconds_of_week();

        #[cfg(feature = "parallel")]
        let results = epoch
            .observations
            .par_iter()
            .map(|(sv, obs)| prepare(*sv, obs, t_rx_s, &self.store, &self.cfg))
            .collect::<Vec<_>>();

        #[cfg(not(feature = "parallel"))]
        let results = epoch
            .observations
            .iter()
            .map(|(sv, obs)| prepare(*sv, obs, t_rx_s, &self.store, &self.cfg))
            .collect::<Vec<_>>();

        results.into_iter().partition_map(|result| match result {
            Ok(input) => Either::Left(input),
            Err(e) => Either::Right(e),
        })
    }

    /// Resolves this [ObservationEpoch].
    ///
    /// The seed is only replaced by a converged solution. On any
    /// error, including [Error::NotConverged], it is left untouched.
    pub fn process(&mut self, epoch: &ObservationEpoch) -> Result<ReceiverSolution, Error> {
        let t = epoch.epoch;
        let (inputs, rejections) = self.prepare(epoch);

        for e in rejections.iter() {
            warn!("{} - rejected: {}", t, e);
        }

        if inputs.len() < self.cfg.min_sv() {
            warn!("{} - {} usable vehicles, skipping epoch", t, inputs.len());
            return Err(Error::InsufficientSatellites(inputs.len()));
        }

        let initial = self.seed.unwrap_or_else(Vector4::zeros);

        match self.solver.solve(t, &inputs, &initial) {
            Ok(solution) => {
                debug!(
                    "{} - solved in {} iterations: {:?} (gdop={:.2})",
                    t, solution.iterations, solution.pos_m, solution.gdop
                );
                self.seed = Some(solution.state());
                Ok(solution)
            },
            Err(e) => {
                warn!("{} - no solution: {}", t, e);
                Err(e)
            },
        }
    }

    /// Processes a complete sequence of [ObservationEpoch]s, in order.
    /// Returns one result per input epoch.
    pub fn run<'a, I>(&mut self, epochs: I) -> Vec<(Epoch, Result<ReceiverSolution, Error>)>
    where
        I: IntoIterator<Item = &'a ObservationEpoch>,
    {
        let results = epochs
            .into_iter()
            .map(|epoch| (epoch.epoch, self.process(epoch)))
            .collect::<Vec<_>>();

        info!(
            "{}/{} epochs resolved",
            results.iter().filter(|(_, r)| r.is_ok()).count(),
            results.len()
        );

        results
    }
}
