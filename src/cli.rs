//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::prelude::*;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::next_open_broker::NextOpenBroker;
use crate::domain::config_validation::{
    validate_backtest_config, validate_config, validate_strategy_config, validate_volatility_config,
};
use crate::domain::error::SmacrossError;
use crate::domain::evaluator::SignalEvaluator;
use crate::domain::order::OrderIntent;
use crate::domain::runner::{RunReport, compute_indicators, run_strategy};
use crate::domain::strategy::StrategyParams;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "smacross", about = "Moving-average crossover strategy runner")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the strategy over a price file
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Override [data] prices
        #[arg(long)]
        prices: Option<PathBuf>,
        /// Override [data] trends
        #[arg(long)]
        trends: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Install the global fmt subscriber. Bar dates are part of every strategy
/// log line, so wall-clock timestamps are left out.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let fmt_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(false)
        .with_filter(Targets::new().with_default(level));
    tracing_subscriber::registry().with(fmt_layer).init();
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Run {
            config,
            prices,
            trends,
        } => run_backtest(&config, prices, trends),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn build_params(config: &dyn ConfigPort) -> StrategyParams {
    let defaults = StrategyParams::default();
    let period = |key: &str, default: usize| {
        config
            .get_int("strategy", key, default as i64)
            .try_into()
            .unwrap_or(default)
    };

    StrategyParams {
        name: config
            .get_non_empty("strategy", "name")
            .unwrap_or(defaults.name),
        fast_period: period("fast_period", defaults.fast_period),
        slow_period: period("slow_period", defaults.slow_period),
        hold_bars: period("hold_bars", defaults.hold_bars),
        submit_close: config.get_bool("strategy", "submit_close", defaults.submit_close),
        volatility_window: config
            .get_int("volatility", "window", defaults.volatility_window as i64)
            .try_into()
            .unwrap_or(defaults.volatility_window),
        volatility_threshold: config.get_double(
            "volatility",
            "threshold",
            defaults.volatility_threshold,
        ),
    }
}

pub fn build_date_range(
    config: &dyn ConfigPort,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), SmacrossError> {
    let date = |key: &str| match config.get_date("backtest", key) {
        None => Ok(None),
        Some(Ok(d)) => Ok(Some(d)),
        Some(Err(raw)) => Err(SmacrossError::ConfigInvalid {
            section: "backtest".into(),
            key: key.into(),
            reason: format!("invalid date '{raw}' (expected YYYY-MM-DD)"),
        }),
    };
    Ok((date("start_date")?, date("end_date")?))
}

/// Resolve a path from the config file relative to the file's directory.
pub fn resolve_data_path(config_path: &Path, raw: &str) -> PathBuf {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        return path;
    }
    match config_path.parent() {
        Some(dir) => dir.join(path),
        None => path,
    }
}

fn run_backtest(
    config_path: &Path,
    prices_override: Option<PathBuf>,
    trends_override: Option<PathBuf>,
) -> Result<(), SmacrossError> {
    info!("Loading config from {}", config_path.display());
    let config = FileConfigAdapter::from_file(config_path)?;

    if prices_override.is_none() {
        validate_config(&config)?;
    } else {
        validate_backtest_config(&config)?;
        validate_strategy_config(&config)?;
        validate_volatility_config(&config)?;
    }

    let prices = match prices_override {
        Some(p) => p,
        None => config
            .get_non_empty("data", "prices")
            .map(|raw| resolve_data_path(config_path, &raw))
            .ok_or_else(|| SmacrossError::ConfigMissing {
                section: "data".into(),
                key: "prices".into(),
            })?,
    };
    let trends = trends_override.or_else(|| {
        config
            .get_non_empty("data", "trends")
            .map(|raw| resolve_data_path(config_path, &raw))
    });

    let params = build_params(&config);
    let (start, end) = build_date_range(&config)?;
    info!("Strategy: {}", params.name);

    let data_port = CsvAdapter::new(prices, trends);
    let report = run_backtest_pipeline(&data_port, &params, start, end)?;
    print_summary(&params, &report);
    Ok(())
}

pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    params: &StrategyParams,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<RunReport, SmacrossError> {
    let bars = data_port.fetch_ohlcv(start, end)?;
    if bars.is_empty() {
        return Err(SmacrossError::NoData {
            source_name: "prices".into(),
        });
    }
    if bars.len() < params.required_bars() {
        return Err(SmacrossError::InsufficientData {
            bars: bars.len(),
            minimum: params.required_bars(),
        });
    }

    let trends = data_port.fetch_trends()?;
    if trends.is_none() {
        info!("No trends feed configured; volatility flag disabled");
    }

    let indicators = compute_indicators(&bars, trends.as_deref(), params);
    let mut evaluator = SignalEvaluator::new(params.evaluator_config());
    let mut broker = NextOpenBroker::new();

    info!(
        "Running {} over {} bars, {} to {}",
        params.name,
        bars.len(),
        bars[0].date,
        bars[bars.len() - 1].date
    );

    Ok(run_strategy(&bars, &indicators, &mut evaluator, &mut broker))
}

fn print_summary(params: &StrategyParams, report: &RunReport) {
    eprintln!("\n=== {} ===", params.name);
    eprintln!(
        "Parameters:       SMA({}) / SMA({}), hold {} bars, TVI({}, {})",
        params.fast_period,
        params.slow_period,
        params.hold_bars,
        params.volatility_window,
        params.volatility_threshold
    );
    eprintln!("Bars:             {}", report.bars);
    eprintln!("Evaluated:        {}", report.evaluated);
    eprintln!("Buy signals:      {}", report.count(OrderIntent::Buy));
    eprintln!("Sell signals:     {}", report.count(OrderIntent::Sell));
    eprintln!("Close signals:    {}", report.count(OrderIntent::Close));
    eprintln!("Fills:            {}", report.fills.len());
    eprintln!("Failed orders:    {}", report.failures.len());
}

fn run_validate(config_path: &Path) -> Result<(), SmacrossError> {
    info!("Validating config: {}", config_path.display());
    let config = FileConfigAdapter::from_file(config_path)?;
    validate_config(&config)?;

    let params = build_params(&config);
    let (start, end) = build_date_range(&config)?;

    eprintln!("\nStrategy: {}", params.name);
    eprintln!("  fast:        SMA({})", params.fast_period);
    eprintln!("  slow:        SMA({})", params.slow_period);
    eprintln!("  hold_bars:   {}", params.hold_bars);
    eprintln!("  submit_close: {}", params.submit_close);
    eprintln!(
        "  volatility:  window {}, threshold {}",
        params.volatility_window, params.volatility_threshold
    );
    eprintln!(
        "  range:       {} to {}",
        start.map_or_else(|| "start".to_string(), |d| d.to_string()),
        end.map_or_else(|| "end".to_string(), |d| d.to_string())
    );
    eprintln!("\nConfiguration is valid.");
    Ok(())
}
