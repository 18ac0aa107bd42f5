//! Sources of uniform draws for trade outcomes

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::error::{Result, SimulationError};

/// Supplies uniform values in [0, 1), one per trade
pub trait DrawSource {
    fn next_draw(&mut self) -> Result<f64>;
}

impl<S: DrawSource + ?Sized> DrawSource for &mut S {
    fn next_draw(&mut self) -> Result<f64> {
        (**self).next_draw()
    }
}

/// Unbounded source backed by any `rand` generator
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<ChaCha8Rng> {
    /// Generator for trial `index` of an ensemble seeded with `seed`
    ///
    /// Every trial gets its own ChaCha stream, so draws never overlap
    /// between trials and the order trials run in doesn't matter.
    pub fn for_trial(seed: u64, index: usize) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(index as u64);
        Self { rng }
    }
}

impl<R: Rng> DrawSource for RngSource<R> {
    fn next_draw(&mut self) -> Result<f64> {
        Ok(self.rng.gen::<f64>())
    }
}

/// Draw that always produces a win (any win rate > 0)
pub const WIN_DRAW: f64 = 0.0;

/// Largest f64 below 1.0; always produces a loss for win rates < 1
pub const LOSS_DRAW: f64 = 1.0 - f64::EPSILON / 2.0;

/// Finite, fixed sequence of draws
///
/// Fails with `RandomSourceExhausted` once the sequence is used up
/// instead of wrapping around.
#[derive(Debug, Clone)]
pub struct ScriptedDraws {
    draws: Vec<f64>,
    pos: usize,
}

impl ScriptedDraws {
    pub fn new(draws: Vec<f64>) -> Self {
        Self { draws, pos: 0 }
    }

    /// Sequence producing the given win/loss outcomes
    pub fn from_outcomes(outcomes: &[bool]) -> Self {
        Self::new(
            outcomes
                .iter()
                .map(|&win| if win { WIN_DRAW } else { LOSS_DRAW })
                .collect(),
        )
    }

    /// `count` draws that all produce the same outcome
    pub fn repeated(win: bool, count: usize) -> Self {
        Self::from_outcomes(&vec![win; count])
    }

    pub fn remaining(&self) -> usize {
        self.draws.len() - self.pos
    }
}

impl DrawSource for ScriptedDraws {
    fn next_draw(&mut self) -> Result<f64> {
        let value = *self
            .draws
            .get(self.pos)
            .ok_or_else(|| SimulationError::exhausted(self.pos))?;

        if !(0.0..1.0).contains(&value) {
            return Err(SimulationError::invalid_parameter(format!(
                "scripted draw #{} must be within [0, 1), got {}",
                self.pos, value
            )));
        }

        self.pos += 1;
        Ok(value)
    }
}
