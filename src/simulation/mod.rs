//! Monte Carlo simulation of fixed-risk win/loss trade sequences
//!
//! Each trial compounds the balance trade by trade and tracks drawdown and
//! streaks as it goes; the ensemble is then reduced to best, worst and
//! median paths plus averaged statistics.

mod config;
mod ensemble;
mod error;
mod params;
mod source;
mod trial;

pub use config::{Scheduling, SimulationConfig, SimulationEngine};
pub use ensemble::{
    expectancy, run_ensemble, run_ensemble_parallel, run_ensemble_with, summarize,
    SimulationResult,
};
pub use error::{Result, SimulationError};
pub use params::{InputLimits, SimulationParameters, DEFAULT_SIMULATIONS};
pub use source::{DrawSource, RngSource, ScriptedDraws, LOSS_DRAW, WIN_DRAW};
pub use trial::{run_single_trial, PathStatistics, Trial};
