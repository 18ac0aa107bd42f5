//! Simulation parameters and input bounds

use serde::{Deserialize, Serialize};

use super::error::{Result, SimulationError};

/// Number of paths simulated when the caller doesn't say otherwise
pub const DEFAULT_SIMULATIONS: usize = 1000;

/// Parameters of a fixed-risk strategy
///
/// Rates are fractions (0.45 = 45%). Use [`SimulationParameters::from_percentages`]
/// when the inputs come from a form that speaks in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Probability that a trade is a win
    pub win_rate: f64,

    /// Multiple of the risked amount earned on a win (1:X)
    pub risk_reward_ratio: f64,

    /// Fraction of the current balance lost on a loss
    pub risk_per_trade: f64,

    /// Trades per simulated path
    pub num_trades: usize,

    /// Starting balance of every path
    pub initial_capital: f64,

    /// Number of independent paths
    pub num_simulations: usize,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            win_rate: 0.45,
            risk_reward_ratio: 2.0,
            risk_per_trade: 0.01,
            num_trades: 100,
            initial_capital: 10_000.0,
            num_simulations: DEFAULT_SIMULATIONS,
        }
    }
}

impl SimulationParameters {
    pub fn new(
        win_rate: f64,
        risk_reward_ratio: f64,
        risk_per_trade: f64,
        num_trades: usize,
        initial_capital: f64,
    ) -> Self {
        Self {
            win_rate,
            risk_reward_ratio,
            risk_per_trade,
            num_trades,
            initial_capital,
            num_simulations: DEFAULT_SIMULATIONS,
        }
    }

    /// Build from percent inputs (win rate 45.0, risk 1.0)
    pub fn from_percentages(
        win_rate_pct: f64,
        risk_reward_ratio: f64,
        risk_pct: f64,
        num_trades: usize,
        initial_capital: f64,
    ) -> Self {
        Self::new(
            win_rate_pct / 100.0,
            risk_reward_ratio,
            risk_pct / 100.0,
            num_trades,
            initial_capital,
        )
    }

    pub fn with_simulations(mut self, num_simulations: usize) -> Self {
        self.num_simulations = num_simulations;
        self
    }

    /// Multiplier applied to the balance on a winning trade
    pub fn win_factor(&self) -> f64 {
        1.0 + self.risk_per_trade * self.risk_reward_ratio
    }

    /// Multiplier applied to the balance on a losing trade
    pub fn loss_factor(&self) -> f64 {
        1.0 - self.risk_per_trade
    }

    /// Reject values that make the compounding or drawdown arithmetic undefined
    pub fn validate(&self) -> Result<()> {
        if !self.win_rate.is_finite() || !(0.0..=1.0).contains(&self.win_rate) {
            return Err(SimulationError::invalid_parameter(format!(
                "win_rate must be within [0, 1], got {}",
                self.win_rate
            )));
        }
        if !self.risk_reward_ratio.is_finite() || self.risk_reward_ratio <= 0.0 {
            return Err(SimulationError::invalid_parameter(format!(
                "risk_reward_ratio must be positive, got {}",
                self.risk_reward_ratio
            )));
        }
        if !self.risk_per_trade.is_finite()
            || self.risk_per_trade <= 0.0
            || self.risk_per_trade >= 1.0
        {
            return Err(SimulationError::invalid_parameter(format!(
                "risk_per_trade must be within (0, 1), got {}",
                self.risk_per_trade
            )));
        }
        if self.num_trades == 0 {
            return Err(SimulationError::invalid_parameter(
                "num_trades must be a positive integer",
            ));
        }
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(SimulationError::invalid_parameter(format!(
                "initial_capital must be positive, got {}",
                self.initial_capital
            )));
        }
        if self.num_simulations == 0 {
            return Err(SimulationError::invalid_parameter(
                "num_simulations must be a positive integer",
            ));
        }
        Ok(())
    }
}

/// Bounds enforced by the input surface before a run is requested
///
/// These are tighter than what the engine accepts and exist to keep
/// requests in a sensible range and bound latency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputLimits {
    pub min_risk_reward: f64,
    pub max_risk_reward: f64,
    /// Fraction, 0.001 = 0.1%
    pub min_risk_per_trade: f64,
    pub max_risk_per_trade: f64,
    pub max_trades: usize,
    pub min_capital: f64,
    pub max_simulations: usize,
    /// Cap on simulations x trades
    pub max_total_trades: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            min_risk_reward: 0.1,
            max_risk_reward: 10.0,
            min_risk_per_trade: 0.001,
            max_risk_per_trade: 0.10,
            max_trades: 1000,
            min_capital: 100.0,
            max_simulations: 100_000,
            max_total_trades: 100_000_000,
        }
    }
}

impl InputLimits {
    pub fn check(&self, params: &SimulationParameters) -> Result<()> {
        params.validate()?;

        // Small tolerance so percent inputs like 0.1% survive the /100 conversion
        const EPS: f64 = 1e-12;

        if params.risk_reward_ratio < self.min_risk_reward - EPS
            || params.risk_reward_ratio > self.max_risk_reward + EPS
        {
            return Err(SimulationError::invalid_parameter(format!(
                "risk/reward must be between {} and {}, got {}",
                self.min_risk_reward, self.max_risk_reward, params.risk_reward_ratio
            )));
        }
        if params.risk_per_trade < self.min_risk_per_trade - EPS
            || params.risk_per_trade > self.max_risk_per_trade + EPS
        {
            return Err(SimulationError::invalid_parameter(format!(
                "risk per trade must be between {:.1}% and {:.1}%, got {:.2}%",
                self.min_risk_per_trade * 100.0,
                self.max_risk_per_trade * 100.0,
                params.risk_per_trade * 100.0
            )));
        }
        if params.num_trades > self.max_trades {
            return Err(SimulationError::invalid_parameter(format!(
                "number of trades must be at most {}, got {}",
                self.max_trades, params.num_trades
            )));
        }
        if params.initial_capital < self.min_capital {
            return Err(SimulationError::invalid_parameter(format!(
                "initial capital must be at least {}, got {}",
                self.min_capital, params.initial_capital
            )));
        }
        if params.num_simulations > self.max_simulations {
            return Err(SimulationError::invalid_parameter(format!(
                "number of simulations must be at most {}, got {}",
                self.max_simulations, params.num_simulations
            )));
        }
        let total = params.num_simulations.saturating_mul(params.num_trades);
        if total > self.max_total_trades {
            return Err(SimulationError::invalid_parameter(format!(
                "simulations x trades must be at most {}, got {}",
                self.max_total_trades, total
            )));
        }
        Ok(())
    }
}
