//! Configuration for the simulation engine

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

use super::ensemble::{run_ensemble, run_ensemble_parallel, SimulationResult};
use super::error::Result;
use super::params::SimulationParameters;
use crate::gate::SimulationRequest;

/// How trials are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scheduling {
    /// One trial after another on the calling thread
    Sequential,
    /// Trials spread across the rayon thread pool
    Parallel,
}

impl Default for Scheduling {
    fn default() -> Self {
        Self::Parallel
    }
}

impl std::fmt::Display for Scheduling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sequential => write!(f, "Sequential"),
            Self::Parallel => write!(f, "Parallel"),
        }
    }
}

/// Configuration for the simulation engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seed for reproducible runs; a fresh one is drawn when unset
    pub seed: Option<u64>,

    /// Sequential or parallel trial scheduling (same results either way)
    pub scheduling: Scheduling,
}

impl SimulationConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    pub fn with_scheduling(mut self, scheduling: Scheduling) -> Self {
        self.scheduling = scheduling;
        self
    }
}

/// Stateless entry point that runs one ensemble per call
#[derive(Debug, Clone, Default)]
pub struct SimulationEngine {
    config: SimulationConfig,
}

impl SimulationEngine {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run an ensemble for `params`
    pub fn run(&self, params: &SimulationParameters) -> Result<SimulationResult> {
        let seed = self
            .config
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen());

        info!(
            "Simulating {} paths x {} trades ({}, seed {})",
            params.num_simulations, params.num_trades, self.config.scheduling, seed
        );

        let started = Instant::now();
        let result = match self.config.scheduling {
            Scheduling::Sequential => run_ensemble(params, seed)?,
            Scheduling::Parallel => run_ensemble_parallel(params, seed)?,
        };

        info!(
            "Simulation finished in {:.1?}: median end balance {:.2}",
            started.elapsed(),
            result.median_end_balance
        );

        Ok(result)
    }

    /// Run a request admitted by an access gate
    pub fn execute(&self, request: SimulationRequest) -> Result<SimulationResult> {
        debug!(
            with_contact = request.permit().contact().is_some(),
            "Running admitted request"
        );
        self.run(request.params())
    }
}
