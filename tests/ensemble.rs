//! Integration tests for the ensemble engine through the public API.

use equity_montecarlo::simulation::{
    expectancy, run_ensemble, run_ensemble_with, run_single_trial, RngSource, ScriptedDraws,
    SimulationError, SimulationParameters, LOSS_DRAW,
};
use equity_montecarlo::{SimulationConfig, SimulationEngine};

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0)
}

#[test]
fn test_every_path_has_expected_length_and_positive_balances() {
    let params = SimulationParameters::new(0.3, 1.5, 0.09, 250, 1_000.0).with_simulations(50);

    for index in 0..params.num_simulations {
        let mut source = RngSource::for_trial(99, index);
        let trial = run_single_trial(&params, &mut source).unwrap();
        assert_eq!(trial.path.len(), 251);
        assert!(trial.path.iter().all(|&b| b > 0.0));
        assert_eq!(trial.path[0], 1_000.0);
    }
}

#[test]
fn test_forced_losses_match_closed_form() {
    let params = SimulationParameters::new(0.0, 2.0, 0.01, 30, 10_000.0).with_simulations(4);
    let mut source = ScriptedDraws::new(vec![LOSS_DRAW; 30 * 4]);

    let result = run_ensemble_with(&params, &mut source).unwrap();
    let expected = 10_000.0 * 0.99f64.powi(30);

    for path in [&result.best_path, &result.worst_path, &result.median_path] {
        assert!(path.windows(2).all(|w| w[1] < w[0]));
        assert!(close(*path.last().unwrap(), expected));
    }
    assert!(close(result.median_end_balance, expected));
    assert_eq!(result.average_max_consecutive_losses, 30);
    assert_eq!(result.average_max_consecutive_wins, 0);
}

#[test]
fn test_forced_wins_match_closed_form() {
    let params = SimulationParameters::new(1.0, 2.0, 0.01, 30, 10_000.0).with_simulations(10);

    let result = run_ensemble(&params, 3).unwrap();
    let expected = 10_000.0 * 1.02f64.powi(30);

    assert!(result.best_path.windows(2).all(|w| w[1] > w[0]));
    assert!(close(*result.worst_path.last().unwrap(), expected));
    assert!(close(result.best_return, (expected / 10_000.0 - 1.0) * 100.0));
    assert_eq!(result.average_max_drawdown, 0.0);
}

#[test]
fn test_expectancy_independent_of_run() {
    let small = SimulationParameters::new(0.45, 2.0, 0.01, 10, 10_000.0).with_simulations(5);
    let large = SimulationParameters::new(0.45, 2.0, 0.05, 400, 500.0).with_simulations(300);

    let a = run_ensemble(&small, 1).unwrap();
    let b = run_ensemble(&large, 2).unwrap();

    assert_eq!(a.expectancy, b.expectancy);
    assert_eq!(a.expectancy, expectancy(0.45, 2.0));
}

#[test]
fn test_concrete_win_loss_scenario() {
    let params = SimulationParameters::from_percentages(50.0, 1.0, 1.0, 2, 10_000.0)
        .with_simulations(1);
    let mut source = ScriptedDraws::from_outcomes(&[true, false]);

    let result = run_ensemble_with(&params, &mut source).unwrap();

    assert!(close(result.best_path[1], 10_100.0));
    assert!(close(result.best_path[2], 9_999.0));
    assert!(close(result.average_max_drawdown, 1.0));
    assert_eq!(result.average_max_consecutive_wins, 1);
    assert_eq!(result.average_max_consecutive_losses, 1);
}

#[test]
fn test_representative_paths_bracket_the_ensemble() {
    let params = SimulationParameters::new(0.5, 1.2, 0.02, 80, 10_000.0).with_simulations(100);
    let result = run_ensemble(&params, 8).unwrap();

    // Rebuild every final balance from the same per-trial streams
    let mut finals: Vec<f64> = (0..params.num_simulations)
        .map(|i| {
            let mut source = RngSource::for_trial(8, i);
            run_single_trial(&params, &mut source).unwrap().stats.final_balance
        })
        .collect();
    finals.sort_by(|a, b| a.total_cmp(b));

    assert_eq!(*result.worst_path.last().unwrap(), finals[0]);
    assert_eq!(*result.best_path.last().unwrap(), finals[99]);
    assert_eq!(*result.median_path.last().unwrap(), finals[50]);
    assert_eq!(result.median_end_balance, (finals[49] + finals[50]) / 2.0);
}

#[test]
fn test_engine_is_reproducible_under_seed() {
    let params = SimulationParameters::default();
    let engine = SimulationEngine::new(SimulationConfig::seeded(20_240_101));

    let first = engine.run(&params).unwrap();
    let second = engine.run(&params).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.num_simulations, 1000);
    assert_eq!(first.median_path.len(), 101);
}

#[test]
fn test_invalid_risk_fails_fast() {
    let params = SimulationParameters::new(0.5, 1.0, 1.0, 10, 10_000.0);
    let engine = SimulationEngine::new(SimulationConfig::seeded(1));

    assert!(matches!(
        engine.run(&params),
        Err(SimulationError::InvalidParameter { .. })
    ));
}

#[test]
fn test_serialized_result_uses_camel_case() {
    let params = SimulationParameters::new(0.5, 1.0, 0.01, 3, 1_000.0).with_simulations(3);
    let result = run_ensemble(&params, 4).unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert!(json.get("medianEndBalance").is_some());
    assert!(json.get("averageMaxConsecutiveWins").is_some());
    assert_eq!(json["bestPath"].as_array().unwrap().len(), 4);
}

#[test]
fn test_compounding_underflow_aborts_ensemble() {
    let params = SimulationParameters::new(0.0, 1.0, 0.6, 1000, 10_000.0).with_simulations(2);
    let mut source = ScriptedDraws::new(vec![LOSS_DRAW; 2000]);

    assert!(matches!(
        run_ensemble_with(&params, &mut source),
        Err(SimulationError::InvalidParameter { .. })
    ));
}

#[test]
fn test_compounding_overflow_aborts_ensemble() {
    let params = SimulationParameters::new(1.0, 1.0e6, 0.5, 100, 10_000.0).with_simulations(5);

    assert!(matches!(
        run_ensemble(&params, 6),
        Err(SimulationError::InvalidParameter { .. })
    ));
}
