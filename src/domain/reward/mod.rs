//! Funding-challenge reward for a closed-trade log.
//!
//! A log is first checked against the challenge's hard constraints
//! (trade count, trading days, profit target, overall and daily drawdown).
//! Any failure yields a flat [`REJECTED_REWARD`]. A passing log is scored as
//! net profit percent minus risk penalties plus quality bonuses.

pub mod metrics;
pub mod rules;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

pub use metrics::{ChallengeMetrics, PerformanceMetrics};
pub use rules::{
    ChallengeRules, DEFAULT_START_EQUITY, NO_DATA_REWARD, REJECTED_REWARD, ScoringParams,
    Violation,
};

/// One closed trade, in log order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TradeRecord {
    pub timestamp: DateTime<Utc>,
    /// Signed, in account currency.
    pub pnl: f64,
    /// Only read from the first record of a log.
    #[serde(default)]
    pub start_equity: Option<f64>,
}

impl TradeRecord {
    pub fn new(timestamp: DateTime<Utc>, pnl: f64) -> Self {
        TradeRecord {
            timestamp,
            pnl,
            start_equity: None,
        }
    }

    pub fn day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardBreakdown {
    pub challenge: ChallengeMetrics,
    pub performance: PerformanceMetrics,
    pub penalty: f64,
    pub bonus: f64,
    pub reward: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RewardOutcome {
    NoData,
    Rejected {
        challenge: ChallengeMetrics,
        violations: Vec<Violation>,
    },
    Scored(RewardBreakdown),
}

impl RewardOutcome {
    pub fn reward(&self) -> f64 {
        match self {
            RewardOutcome::NoData => NO_DATA_REWARD,
            RewardOutcome::Rejected { .. } => REJECTED_REWARD,
            RewardOutcome::Scored(breakdown) => breakdown.reward,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RewardEvaluator {
    pub rules: ChallengeRules,
    pub scoring: ScoringParams,
}

impl RewardEvaluator {
    pub fn new(rules: ChallengeRules, scoring: ScoringParams) -> Self {
        RewardEvaluator { rules, scoring }
    }

    pub fn score(&self, trades: &[TradeRecord]) -> RewardOutcome {
        if trades.is_empty() {
            return RewardOutcome::NoData;
        }

        let challenge = ChallengeMetrics::compute(trades, self.rules.default_start_equity);
        let violations = self.violations(&challenge);
        if !violations.is_empty() {
            tracing::debug!(violations = violations.len(), "trade log rejected");
            return RewardOutcome::Rejected {
                challenge,
                violations,
            };
        }

        let performance = PerformanceMetrics::compute(trades, challenge.start_equity);
        let penalty = self.penalty(&challenge, &performance);
        let bonus = self.bonus(&performance);
        RewardOutcome::Scored(RewardBreakdown {
            challenge,
            performance,
            penalty,
            bonus,
            reward: challenge.net_profit_pct - penalty + bonus,
        })
    }

    /// Scalar reward; `None` and empty logs score zero.
    pub fn evaluate(&self, trades: Option<&[TradeRecord]>) -> f64 {
        trades.map_or(NO_DATA_REWARD, |t| self.score(t).reward())
    }

    pub fn violations(&self, m: &ChallengeMetrics) -> Vec<Violation> {
        let rules = &self.rules;
        let mut out = Vec::new();
        if m.trades < rules.min_trades {
            out.push(Violation::TooFewTrades {
                trades: m.trades,
                min: rules.min_trades,
            });
        }
        if m.trading_days < rules.min_days {
            out.push(Violation::TooFewDays {
                days: m.trading_days,
                min: rules.min_days,
            });
        }
        if m.net_profit_pct < rules.min_profit_pct {
            out.push(Violation::ProfitBelowTarget {
                profit_pct: m.net_profit_pct,
                min: rules.min_profit_pct,
            });
        }
        if m.max_drawdown > rules.max_drawdown {
            out.push(Violation::Drawdown {
                drawdown: m.max_drawdown,
                max: rules.max_drawdown,
            });
        }
        if m.max_daily_drawdown > rules.max_daily_drawdown {
            out.push(Violation::DailyDrawdown {
                drawdown: m.max_daily_drawdown,
                max: rules.max_daily_drawdown,
            });
        }
        out
    }

    pub fn penalty(&self, c: &ChallengeMetrics, p: &PerformanceMetrics) -> f64 {
        let s = &self.scoring;
        let mut penalty = 0.0;
        if c.max_drawdown > s.drawdown_soft_cap {
            penalty += s.drawdown_penalty * (c.max_drawdown - s.drawdown_soft_cap);
        }
        if p.volatility > s.volatility_cap {
            penalty += s.volatility_penalty * (p.volatility - s.volatility_cap);
        }
        if c.trades < s.target_trades {
            penalty += s.trade_shortfall_penalty * (s.target_trades - c.trades) as f64;
        }
        penalty
    }

    pub fn bonus(&self, p: &PerformanceMetrics) -> f64 {
        let s = &self.scoring;
        let mut bonus = 0.0;
        if p.sharpe > s.sharpe_floor {
            bonus += s.sharpe_bonus * (p.sharpe - s.sharpe_floor);
        }
        if p.win_rate > s.win_rate_floor {
            bonus += s.win_rate_bonus * (p.win_rate - s.win_rate_floor);
        }
        bonus
    }
}

/// Reward under the default challenge rules and scoring.
pub fn evaluate(trades: Option<&[TradeRecord]>) -> f64 {
    RewardEvaluator::default().evaluate(trades)
}
