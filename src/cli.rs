//! CLI definition and dispatch.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::synthetic_adapter::{SyntheticDataAdapter, load_bars_or_synthetic};
use crate::domain::classifier::FilterConfig;
use crate::domain::config_validation::{
    validate_config, validate_filter_config, validate_reward_config, validate_risk_config,
    validate_strategy_config,
};
use crate::domain::error::ScalperError;
use crate::domain::execution::{ExecutionParams, TradeProposal};
use crate::domain::indicator::IndicatorParams;
use crate::domain::pipeline::{StrategyParams, generate_signals};
use crate::domain::reward::{ChallengeRules, RewardEvaluator, RewardOutcome, ScoringParams};
use crate::domain::signal::SignalParams;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::trade_log_port::TradeLogPort;

#[derive(Parser, Debug)]
#[command(name = "scalptrader", about = "FX scalping signals and funding-challenge reward")]
pub struct Cli {
    /// Log pipeline details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate trade proposals from price bars
    Signals {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// CSV price table; synthetic bars are used when absent or unreadable
        #[arg(long)]
        data: Option<PathBuf>,
        /// Seed for synthetic bars
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Score a closed-trade log against the funding challenge
    Evaluate {
        #[arg(short, long)]
        trades: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    init_tracing(cli.verbose);
    match cli.command {
        Command::Signals { config, data, seed } => {
            run_signals(config.as_deref(), data.as_deref(), seed)
        }
        Command::Evaluate { trades, config } => run_evaluate(&trades, config.as_deref()),
        Command::Validate { config } => run_validate(&config),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, ExitCode> {
    let Some(path) = path else {
        return Ok(FileConfigAdapter::empty());
    };
    eprintln!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(|e| report(&e))
}

fn report(err: &ScalperError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(err)
}

fn run_signals(config_path: Option<&Path>, data: Option<&Path>, seed: Option<u64>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let params = match build_strategy_params(&adapter) {
        Ok(p) => p,
        Err(e) => return report(&e),
    };
    let synthetic = match build_synthetic_adapter(&adapter, seed) {
        Ok(s) => s,
        Err(e) => return report(&e),
    };

    let data_path = data
        .map(Path::to_path_buf)
        .or_else(|| adapter.get_string("data", "path").map(PathBuf::from));
    let csv = data_path.map(CsvAdapter::new);
    let primary = csv.as_ref().map(|c| c as &dyn DataPort);

    let bars = match load_bars_or_synthetic(primary, &synthetic) {
        Ok(b) => b,
        Err(e) => return report(&e),
    };
    eprintln!("Running pipeline over {} bars", bars.len());

    let proposals = generate_signals(&bars, &params);
    if let Err(e) = write_output(&mut std::io::stdout().lock(), &format_proposals(&proposals)) {
        return report(&e);
    }
    eprintln!("{} trade proposals", proposals.len());
    ExitCode::SUCCESS
}

fn run_evaluate(trades_path: &Path, config_path: Option<&Path>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let evaluator = match build_reward_evaluator(&adapter) {
        Ok(e) => e,
        Err(e) => return report(&e),
    };

    eprintln!("Loading trades from {}", trades_path.display());
    let trades = match CsvAdapter::new(trades_path).fetch_trades() {
        Ok(t) => t,
        Err(e) => return report(&e),
    };

    let outcome = evaluator.score(&trades);
    eprint!("{}", describe_outcome(&outcome));
    let reward = format!("{:.4}\n", outcome.reward());
    if let Err(e) = write_output(&mut std::io::stdout().lock(), &reward) {
        return report(&e);
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(Some(config_path)) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_config(&adapter) {
        return report(&e);
    }
    if let Err(e) = build_synthetic_adapter(&adapter, None) {
        return report(&e);
    }
    eprintln!("Configuration is valid.");
    ExitCode::SUCCESS
}

/// `[strategy]`, `[risk]` and `[filter]` sections, validated.
pub fn build_strategy_params(config: &dyn ConfigPort) -> Result<StrategyParams, ScalperError> {
    validate_strategy_config(config)?;
    validate_risk_config(config)?;
    validate_filter_config(config)?;

    let int = |section: &str, key: &str, default: i64| config.get_int(section, key, default) as usize;
    let double = |section: &str, key: &str, default: f64| config.get_double(section, key, default);

    let signal = SignalParams {
        indicators: IndicatorParams {
            ema_fast: int("strategy", "ema_fast", 5),
            ema_slow: int("strategy", "ema_slow", 10),
            rsi_period: int("strategy", "rsi_period", 14),
            atr_period: int("strategy", "atr_period", 14),
        },
        rsi_hi: double("strategy", "rsi_hi", 70.0),
        rsi_lo: double("strategy", "rsi_lo", 30.0),
    };

    let defaults = ExecutionParams::default();
    let execution = ExecutionParams {
        atr_sl_mult: double("risk", "atr_sl_mult", defaults.atr_sl_mult),
        atr_tp_mult: double("risk", "atr_tp_mult", defaults.atr_tp_mult),
        equity: double("risk", "equity", defaults.equity),
        risk_per_trade: double("risk", "risk_per_trade", defaults.risk_per_trade),
        max_trades: int("risk", "max_trades", defaults.max_trades as i64),
        start_equity: double("risk", "start_equity", defaults.start_equity),
        max_dd: double("risk", "max_dd", defaults.max_dd),
        pip_value: double("risk", "pip_value", defaults.pip_value),
    };

    let defaults = FilterConfig::default();
    let filter = FilterConfig {
        enabled: config.get_bool("filter", "enabled", defaults.enabled),
        train_size: int("filter", "train_size", defaults.train_size as i64),
        n_estimators: int("filter", "n_estimators", defaults.n_estimators as i64),
        random_state: config.get_int("filter", "random_state", defaults.random_state as i64) as u64,
        max_depth: int("filter", "max_depth", defaults.max_depth as i64),
    };

    Ok(StrategyParams {
        signal,
        execution,
        filter,
    })
}

/// `[reward]` section, validated. Scoring weights keep their defaults.
pub fn build_reward_evaluator(config: &dyn ConfigPort) -> Result<RewardEvaluator, ScalperError> {
    validate_reward_config(config)?;
    let defaults = ChallengeRules::default();
    let rules = ChallengeRules {
        min_trades: config.get_int("reward", "min_trades", defaults.min_trades as i64) as usize,
        min_days: config.get_int("reward", "min_days", defaults.min_days as i64) as usize,
        min_profit_pct: config.get_double("reward", "min_profit_pct", defaults.min_profit_pct),
        max_drawdown: config.get_double("reward", "max_dd", defaults.max_drawdown),
        max_daily_drawdown: config.get_double(
            "reward",
            "max_daily_dd",
            defaults.max_daily_drawdown,
        ),
        default_start_equity: config.get_double(
            "reward",
            "default_start_equity",
            defaults.default_start_equity,
        ),
    };
    Ok(RewardEvaluator::new(rules, ScoringParams::default()))
}

/// `[data]` synthetic settings; `seed` overrides `synthetic_seed`.
pub fn build_synthetic_adapter(
    config: &dyn ConfigPort,
    seed: Option<u64>,
) -> Result<SyntheticDataAdapter, ScalperError> {
    let defaults = SyntheticDataAdapter::default();

    let count = config.get_int("data", "synthetic_bars", defaults.count as i64);
    if count < 0 {
        return Err(ScalperError::invalid(
            "data",
            "synthetic_bars",
            "synthetic_bars must be non-negative",
        ));
    }
    let bar_minutes = config.get_int("data", "bar_minutes", defaults.bar_minutes);
    if bar_minutes <= 0 {
        return Err(ScalperError::invalid(
            "data",
            "bar_minutes",
            "bar_minutes must be positive",
        ));
    }
    let config_seed = config.get_int("data", "synthetic_seed", defaults.seed as i64);
    if config_seed < 0 {
        return Err(ScalperError::invalid(
            "data",
            "synthetic_seed",
            "synthetic_seed must be non-negative",
        ));
    }
    let start = match config.get_string("data", "synthetic_start") {
        Some(s) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                ScalperError::invalid("data", "synthetic_start", format!("invalid RFC 3339 time: {e}"))
            })?,
        None => defaults.start,
    };

    let adapter = SyntheticDataAdapter {
        seed: seed.unwrap_or(config_seed as u64),
        count: count as usize,
        start,
        bar_minutes,
    };
    if !adapter.timestamps_fit() {
        return Err(ScalperError::invalid(
            "data",
            "bar_minutes",
            format!("{count} bars of {bar_minutes} minutes run past the supported time range"),
        ));
    }
    Ok(adapter)
}

/// Results go to stdout; a closed or full stream is an I/O error.
pub fn write_output<W: Write>(out: &mut W, text: &str) -> Result<(), ScalperError> {
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// CSV with header `time,signal,sl,tp,size`.
pub fn format_proposals(proposals: &[TradeProposal]) -> String {
    let mut out = String::from("time,signal,sl,tp,size\n");
    for p in proposals {
        out.push_str(&format!(
            "{},{},{:.5},{:.5},{:.2}\n",
            p.time.to_rfc3339(),
            p.signal,
            p.stop_loss,
            p.take_profit,
            p.size
        ));
    }
    out
}

pub fn describe_outcome(outcome: &RewardOutcome) -> String {
    match outcome {
        RewardOutcome::NoData => "No trades to evaluate.\n".to_string(),
        RewardOutcome::Rejected {
            challenge,
            violations,
        } => {
            let mut out = format!(
                "Challenge failed ({} trades over {} days, net {:.2}%):\n",
                challenge.trades, challenge.trading_days, challenge.net_profit_pct
            );
            for v in violations {
                out.push_str(&format!("  - {v}\n"));
            }
            out
        }
        RewardOutcome::Scored(b) => format!(
            "Challenge passed\n\
             \x20 Trades:          {}\n\
             \x20 Trading days:    {}\n\
             \x20 Net profit:      {:.2}%\n\
             \x20 Max drawdown:    {:.2}%\n\
             \x20 Daily drawdown:  {:.2}%\n\
             \x20 Sharpe:          {:.3}\n\
             \x20 Win rate:        {:.1}%\n\
             \x20 Volatility:      {:.4}\n\
             \x20 Penalty:         {:.4}\n\
             \x20 Bonus:           {:.4}\n",
            b.challenge.trades,
            b.challenge.trading_days,
            b.challenge.net_profit_pct,
            b.challenge.max_drawdown * 100.0,
            b.challenge.max_daily_drawdown * 100.0,
            b.performance.sharpe,
            b.performance.win_rate,
            b.performance.volatility,
            b.penalty,
            b.bonus,
        ),
    }
}
