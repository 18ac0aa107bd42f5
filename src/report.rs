//! Human-readable metrics and chart data for a finished simulation

use anyhow::{Context, Result};
use std::io::Write;

use crate::simulation::SimulationResult;

/// Format a dollar amount as `$12,345.67`
pub fn format_money(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, cents) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}

/// Render the metric panel for a result
pub fn render_summary(result: &SimulationResult) -> String {
    let rows = [
        ("Start Balance", format_money(result.initial_capital)),
        ("Return (Compounded)", format!("{:.2}%", result.median_return)),
        ("Expectancy (R)", format!("{:.2}R", result.expectancy)),
        ("Most Probable End Balance", format_money(result.median_end_balance)),
        ("Best Case Return", format!("{:.2}%", result.best_return)),
        ("Worst Case Return", format!("{:.2}%", result.worst_return)),
        ("Avg Max Drawdown", format!("{:.2}%", result.average_max_drawdown)),
        ("Avg Max Consecutive Wins", result.average_max_consecutive_wins.to_string()),
        ("Avg Max Consecutive Losses", result.average_max_consecutive_losses.to_string()),
        ("Simulations Run", result.num_simulations.to_string()),
        ("Number of Trades", result.num_trades.to_string()),
    ];

    let mut out = String::new();
    out.push_str(&"=".repeat(50));
    out.push_str("\nEQUITY CURVE SIMULATION RESULTS\n");
    out.push_str(&"=".repeat(50));
    out.push('\n');
    for (label, value) in rows {
        out.push_str(&format!("  {:28} {:>18}\n", label, value));
    }
    out.push_str(&"-".repeat(50));
    out.push('\n');
    out
}

/// Write the best, median and worst paths as CSV, one row per trade
pub fn write_paths_csv<W: Write>(result: &SimulationResult, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["trade", "best", "median", "worst"])
        .context("Failed to write CSV header")?;

    let steps = result
        .best_path
        .len()
        .min(result.median_path.len())
        .min(result.worst_path.len());

    for step in 0..steps {
        csv.write_record([
            step.to_string(),
            result.best_path[step].to_string(),
            result.median_path[step].to_string(),
            result.worst_path[step].to_string(),
        ])
        .with_context(|| format!("Failed to write CSV row {}", step))?;
    }

    csv.flush().context("Failed to flush CSV output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> SimulationResult {
        SimulationResult {
            best_path: vec![10_000.0, 10_200.0, 10_404.0],
            worst_path: vec![10_000.0, 9_900.0, 9_801.0],
            median_path: vec![10_000.0, 10_200.0, 10_098.0],
            best_return: 4.04,
            worst_return: -1.99,
            median_return: 0.98,
            initial_capital: 10_000.0,
            median_end_balance: 10_098.0,
            expectancy: 0.35,
            average_max_drawdown: 1.25,
            average_max_consecutive_wins: 1,
            average_max_consecutive_losses: 2,
            num_simulations: 3,
            num_trades: 2,
        }
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(999.5), "$999.50");
        assert_eq!(format_money(1_000.0), "$1,000.00");
        assert_eq!(format_money(10_098.456), "$10,098.46");
        assert_eq!(format_money(1_234_567.0), "$1,234,567.00");
        assert_eq!(format_money(-2_500.0), "-$2,500.00");
    }

    #[test]
    fn test_render_summary() {
        let text = render_summary(&sample_result());

        assert!(text.contains("Start Balance"));
        assert!(text.contains("$10,000.00"));
        assert!(text.contains("0.35R"));
        assert!(text.contains("$10,098.00"));
        assert!(text.contains("-1.99%"));
        assert!(text.contains("1.25%"));
        assert!(text.contains("Simulations Run"));
    }

    #[test]
    fn test_write_paths_csv() {
        let mut buffer = Vec::new();
        write_paths_csv(&sample_result(), &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "trade,best,median,worst");
        assert_eq!(lines[1], "0,10000,10000,10000");
        assert_eq!(lines[2], "1,10200,10200,9900");
    }
}
