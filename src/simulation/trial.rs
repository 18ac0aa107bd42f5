//! A single simulated path of compounding win/loss trades

use serde::{Deserialize, Serialize};

use super::error::{Result, SimulationError};
use super::params::SimulationParameters;
use super::source::DrawSource;

/// Statistics gathered while a path is generated
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PathStatistics {
    pub final_balance: f64,
    /// Largest peak-to-trough decline as a fraction of the peak
    pub max_drawdown: f64,
    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,
}

/// One simulated balance trajectory and its statistics
#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    /// Balances, starting with the initial capital (`num_trades + 1` entries)
    pub path: Vec<f64>,
    pub stats: PathStatistics,
}

impl Trial {
    pub fn final_balance(&self) -> f64 {
        self.stats.final_balance
    }
}

/// Running peak / drawdown / streak tracking for one path
struct PathTracker {
    peak: f64,
    max_drawdown: f64,
    wins: usize,
    losses: usize,
    max_wins: usize,
    max_losses: usize,
}

impl PathTracker {
    fn new(initial_balance: f64) -> Self {
        Self {
            peak: initial_balance,
            max_drawdown: 0.0,
            wins: 0,
            losses: 0,
            max_wins: 0,
            max_losses: 0,
        }
    }

    fn record(&mut self, won: bool, balance: f64) {
        if balance > self.peak {
            self.peak = balance;
        }
        let drawdown = (self.peak - balance) / self.peak;
        self.max_drawdown = self.max_drawdown.max(drawdown);

        if won {
            self.wins += 1;
            self.losses = 0;
            self.max_wins = self.max_wins.max(self.wins);
        } else {
            self.losses += 1;
            self.wins = 0;
            self.max_losses = self.max_losses.max(self.losses);
        }
    }

    fn finish(self, final_balance: f64) -> PathStatistics {
        PathStatistics {
            final_balance,
            max_drawdown: self.max_drawdown,
            max_consecutive_wins: self.max_wins,
            max_consecutive_losses: self.max_losses,
        }
    }
}

/// Simulate one path of `num_trades` trades
///
/// Each trade consumes one draw: below `win_rate` is a win and the balance
/// grows by `risk_per_trade * risk_reward_ratio`, otherwise it shrinks by
/// `risk_per_trade`. A balance that underflows to zero or overflows to
/// infinity fails the trial with `InvalidParameter`.
pub fn run_single_trial<S: DrawSource + ?Sized>(
    params: &SimulationParameters,
    source: &mut S,
) -> Result<Trial> {
    params.validate()?;
    simulate_path(params, source)
}

/// Path generation without re-validating; callers validate once per ensemble
pub(crate) fn simulate_path<S: DrawSource + ?Sized>(
    params: &SimulationParameters,
    source: &mut S,
) -> Result<Trial> {
    let win_factor = params.win_factor();
    let loss_factor = params.loss_factor();

    let mut balance = params.initial_capital;
    let mut path = Vec::with_capacity(params.num_trades + 1);
    path.push(balance);

    let mut tracker = PathTracker::new(balance);

    for step in 1..=params.num_trades {
        let won = source.next_draw()? < params.win_rate;
        if won {
            balance *= win_factor;
        } else {
            balance *= loss_factor;
        }
        // Compounding must not underflow to zero or overflow to infinity
        if !balance.is_finite() || balance <= 0.0 {
            return Err(SimulationError::invalid_parameter(format!(
                "balance left the representable range at trade {} ({}); \
                 initial_capital {}, risk_per_trade {}, risk_reward_ratio {}",
                step,
                balance,
                params.initial_capital,
                params.risk_per_trade,
                params.risk_reward_ratio
            )));
        }
        path.push(balance);
        tracker.record(won, balance);
    }

    Ok(Trial {
        path,
        stats: tracker.finish(balance),
    })
}
