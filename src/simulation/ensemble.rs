//! Ensemble of independent trials and its reduction to summary metrics

use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

use super::error::{Result, SimulationError};
use super::params::SimulationParameters;
use super::source::{DrawSource, RngSource};
use super::trial::{simulate_path, Trial};

/// Aggregate outcome of one ensemble
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub best_path: Vec<f64>,
    pub worst_path: Vec<f64>,
    /// Path at sorted rank floor(n/2) by final balance
    pub median_path: Vec<f64>,

    /// Returns in percent of the initial capital
    pub best_return: f64,
    pub worst_return: f64,
    pub median_return: f64,

    pub initial_capital: f64,
    /// Interpolated median of all final balances
    pub median_end_balance: f64,
    /// Expected profit per trade in units of risk (R)
    pub expectancy: f64,
    /// Mean of per-path max drawdowns, in percent
    pub average_max_drawdown: f64,
    pub average_max_consecutive_wins: usize,
    pub average_max_consecutive_losses: usize,

    pub num_simulations: usize,
    pub num_trades: usize,
}

/// Expected profit per trade in R: a win pays `risk_reward_ratio`, a loss costs 1
pub fn expectancy(win_rate: f64, risk_reward_ratio: f64) -> f64 {
    win_rate * risk_reward_ratio - (1.0 - win_rate)
}

/// Run the ensemble sequentially, trial `i` drawing from stream `i` of `seed`
pub fn run_ensemble(params: &SimulationParameters, seed: u64) -> Result<SimulationResult> {
    params.validate()?;
    debug!(
        simulations = params.num_simulations,
        trades = params.num_trades,
        seed,
        "Running ensemble"
    );

    let trials = (0..params.num_simulations)
        .map(|index| simulate_path(params, &mut RngSource::for_trial(seed, index)))
        .collect::<Result<Vec<_>>>()?;

    summarize(params, trials)
}

/// Same as [`run_ensemble`] but spreads trials over the rayon pool
///
/// Per-trial streams make the result bit-identical to the sequential run.
pub fn run_ensemble_parallel(params: &SimulationParameters, seed: u64) -> Result<SimulationResult> {
    params.validate()?;
    debug!(
        simulations = params.num_simulations,
        trades = params.num_trades,
        seed,
        threads = rayon::current_num_threads(),
        "Running ensemble in parallel"
    );

    let trials = (0..params.num_simulations)
        .into_par_iter()
        .map(|index| simulate_path(params, &mut RngSource::for_trial(seed, index)))
        .collect::<Result<Vec<_>>>()?;

    summarize(params, trials)
}

/// Run every trial in order from one shared source
///
/// Any source failure aborts the whole ensemble; no partial result is produced.
pub fn run_ensemble_with<S: DrawSource + ?Sized>(
    params: &SimulationParameters,
    source: &mut S,
) -> Result<SimulationResult> {
    params.validate()?;

    let mut trials = Vec::with_capacity(params.num_simulations);
    for _ in 0..params.num_simulations {
        trials.push(simulate_path(params, source)?);
    }

    summarize(params, trials)
}

/// Reduce a set of trials to a [`SimulationResult`]
pub fn summarize(params: &SimulationParameters, trials: Vec<Trial>) -> Result<SimulationResult> {
    if trials.is_empty() {
        return Err(SimulationError::invalid_parameter(
            "cannot summarize an empty ensemble",
        ));
    }
    if let Some(bad) = trials.iter().find(|t| t.path.len() != params.num_trades + 1) {
        return Err(SimulationError::invalid_parameter(format!(
            "path has {} balances, expected {}",
            bad.path.len(),
            params.num_trades + 1
        )));
    }

    let n = trials.len();
    let by_final = |a: &usize, b: &usize| -> Ordering {
        trials[*a].final_balance().total_cmp(&trials[*b].final_balance())
    };

    // Stable sort: ties keep index order
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(by_final);

    let worst = order[0];
    let best = order[n - 1];
    let median = order[n / 2];

    let finals: Vec<f64> = order.iter().map(|&i| trials[i].final_balance()).collect();
    let median_end_balance = median_of_sorted(&finals);

    let pct_return = |balance: f64| (balance / params.initial_capital - 1.0) * 100.0;

    let average_max_drawdown =
        trials.iter().map(|t| t.stats.max_drawdown).sum::<f64>() / n as f64 * 100.0;
    let total_wins: usize = trials.iter().map(|t| t.stats.max_consecutive_wins).sum();
    let total_losses: usize = trials.iter().map(|t| t.stats.max_consecutive_losses).sum();

    Ok(SimulationResult {
        best_return: pct_return(trials[best].final_balance()),
        worst_return: pct_return(trials[worst].final_balance()),
        median_return: pct_return(median_end_balance),
        best_path: trials[best].path.clone(),
        worst_path: trials[worst].path.clone(),
        median_path: trials[median].path.clone(),
        initial_capital: params.initial_capital,
        median_end_balance,
        expectancy: expectancy(params.win_rate, params.risk_reward_ratio),
        average_max_drawdown,
        // Integer division truncates the non-negative mean
        average_max_consecutive_wins: total_wins / n,
        average_max_consecutive_losses: total_losses / n,
        num_simulations: n,
        num_trades: params.num_trades,
    })
}

/// Statistical median of an ascending, non-empty slice
fn median_of_sorted(values: &[f64]) -> f64 {
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
