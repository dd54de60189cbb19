//! Funding-challenge thresholds and the reward's penalty/bonus weights.

use std::fmt;

pub const DEFAULT_START_EQUITY: f64 = 10_000.0;

/// Reward returned when a log fails any hard constraint.
pub const REJECTED_REWARD: f64 = -1000.0;

/// Reward for an empty or absent trade log.
pub const NO_DATA_REWARD: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChallengeRules {
    pub min_trades: usize,
    pub min_days: usize,
    /// Percent of start equity.
    pub min_profit_pct: f64,
    /// Fraction of the running peak.
    pub max_drawdown: f64,
    pub max_daily_drawdown: f64,
    /// Used when the first record carries no start equity.
    pub default_start_equity: f64,
}

impl Default for ChallengeRules {
    fn default() -> Self {
        ChallengeRules {
            min_trades: 35,
            min_days: 5,
            min_profit_pct: 10.0,
            max_drawdown: 0.06,
            max_daily_drawdown: 0.03,
            default_start_equity: DEFAULT_START_EQUITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParams {
    pub drawdown_soft_cap: f64,
    /// Reward points per unit of drawdown above the soft cap.
    pub drawdown_penalty: f64,
    pub volatility_cap: f64,
    pub volatility_penalty: f64,
    pub target_trades: usize,
    /// Reward points per trade short of `target_trades`.
    pub trade_shortfall_penalty: f64,
    pub sharpe_floor: f64,
    pub sharpe_bonus: f64,
    /// Percent.
    pub win_rate_floor: f64,
    pub win_rate_bonus: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        ScoringParams {
            drawdown_soft_cap: 0.04,
            drawdown_penalty: 10.0 * 100.0,
            volatility_cap: 0.005,
            volatility_penalty: 1000.0,
            target_trades: 40,
            trade_shortfall_penalty: 5.0,
            sharpe_floor: 1.5,
            sharpe_bonus: 10.0,
            win_rate_floor: 60.0,
            win_rate_bonus: 0.5,
        }
    }
}

/// A failed hard constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Violation {
    TooFewTrades { trades: usize, min: usize },
    TooFewDays { days: usize, min: usize },
    ProfitBelowTarget { profit_pct: f64, min: f64 },
    Drawdown { drawdown: f64, max: f64 },
    DailyDrawdown { drawdown: f64, max: f64 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::TooFewTrades { trades, min } => {
                write!(f, "{} trades, need at least {}", trades, min)
            }
            Violation::TooFewDays { days, min } => {
                write!(f, "{} trading days, need at least {}", days, min)
            }
            Violation::ProfitBelowTarget { profit_pct, min } => {
                write!(f, "net profit {:.2}%, need at least {:.2}%", profit_pct, min)
            }
            Violation::Drawdown { drawdown, max } => write!(
                f,
                "max drawdown {:.2}% exceeds {:.2}%",
                drawdown * 100.0,
                max * 100.0
            ),
            Violation::DailyDrawdown { drawdown, max } => write!(
                f,
                "daily drawdown {:.2}% exceeds {:.2}%",
                drawdown * 100.0,
                max * 100.0
            ),
        }
    }
}
