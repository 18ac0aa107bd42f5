use anyhow::{Context, Result};
use clap::Parser;
use equity_montecarlo::{
    gate::{AccessGate, ContactGate, OpenGate},
    report,
    simulation::{InputLimits, Scheduling},
    SimulationConfig, SimulationEngine, SimulationParameters, SimulationRequest,
};
use std::{fs::File, io::BufWriter, path::PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Monte Carlo equity curve simulation for fixed-risk strategies")]
struct Args {
    /// Win rate in percent
    #[arg(short, long, default_value = "45.0")]
    win_rate: f64,

    /// Risk reward ratio (1:X)
    #[arg(short = 'r', long, default_value = "2.0")]
    risk_reward: f64,

    /// Risk per trade in percent of the current balance
    #[arg(long, default_value = "1.0")]
    risk: f64,

    /// Number of trades per simulated path
    #[arg(short, long, default_value = "100")]
    trades: usize,

    /// Initial capital in dollars
    #[arg(short, long, default_value = "10000.0")]
    capital: f64,

    /// Number of simulated paths
    #[arg(short, long, default_value = "1000")]
    simulations: usize,

    /// Seed for a reproducible run
    #[arg(long, env = "EQUITY_SIM_SEED")]
    seed: Option<u64>,

    /// Run trials on the calling thread instead of the thread pool
    #[arg(long)]
    sequential: bool,

    /// Print the full result as JSON instead of the metric panel
    #[arg(long)]
    json: bool,

    /// Write best/median/worst paths to this CSV file for charting
    #[arg(long)]
    paths_csv: Option<PathBuf>,

    /// Contact email address offered to the access gate
    #[arg(long, env = "EQUITY_SIM_CONTACT")]
    contact: Option<String>,

    /// Refuse to run without a valid contact address
    #[arg(long, env = "EQUITY_SIM_REQUIRE_CONTACT")]
    require_contact: bool,

    /// Comma-separated domains accepted by the contact gate
    #[arg(long, env = "EQUITY_SIM_ALLOWED_DOMAINS", value_delimiter = ',')]
    allowed_domains: Vec<String>,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("equity_montecarlo={}", level).parse()?)
                .add_directive(format!("equity_sim={}", level).parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let params = SimulationParameters::from_percentages(
        args.win_rate,
        args.risk_reward,
        args.risk,
        args.trades,
        args.capital,
    )
    .with_simulations(args.simulations);

    InputLimits::default()
        .check(&params)
        .context("Simulation parameters rejected")?;

    let permit = if args.require_contact {
        ContactGate::new()
            .with_allowed_domains(&args.allowed_domains)
            .admit(args.contact.as_deref())?
    } else {
        OpenGate.admit(args.contact.as_deref())?
    };

    let scheduling = if args.sequential {
        Scheduling::Sequential
    } else {
        Scheduling::Parallel
    };
    let engine = SimulationEngine::new(SimulationConfig {
        seed: args.seed,
        scheduling,
    });

    info!(
        "Win rate {:.1}% | 1:{} | risk {:.2}% | {} trades | start {}",
        args.win_rate,
        args.risk_reward,
        args.risk,
        args.trades,
        report::format_money(args.capital)
    );

    let result = engine.execute(SimulationRequest::new(permit, params))?;

    if result.expectancy <= 0.0 {
        warn!("Non-positive expectancy ({:.2}R): the strategy loses on average", result.expectancy);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", report::render_summary(&result));
    }

    if let Some(path) = &args.paths_csv {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        report::write_paths_csv(&result, BufWriter::new(file))?;
        info!("Wrote representative paths to {}", path.display());
    }

    Ok(())
}
