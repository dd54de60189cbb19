//! Reward evaluator tests over trade logs read from disk.
//!
//! Tests cover:
//! - Hard-constraint rejections
//! - Scored logs with bonuses and penalties
//! - Loading logs through the CSV adapter and the trade-log port

mod common;

use approx::assert_relative_eq;
use common::*;
use scalptrader::adapters::csv_adapter::CsvAdapter;
use scalptrader::domain::reward::{
    ChallengeRules, REJECTED_REWARD, RewardEvaluator, RewardOutcome, ScoringParams, Violation,
    evaluate,
};
use scalptrader::ports::trade_log_port::TradeLogPort;

fn scored(trades: &[TradeRecord]) -> scalptrader::domain::reward::RewardBreakdown {
    match RewardEvaluator::default().score(trades) {
        RewardOutcome::Scored(b) => b,
        other => panic!("expected a score, got {other:?}"),
    }
}

fn violations(trades: &[TradeRecord]) -> Vec<Violation> {
    match RewardEvaluator::default().score(trades) {
        RewardOutcome::Rejected { violations, .. } => violations,
        other => panic!("expected rejection, got {other:?}"),
    }
}

mod gates {
    use super::*;

    #[test]
    fn thirty_trades_rejected() {
        let trades = trade_log(&[40.0; 30], 5);
        assert_eq!(evaluate(Some(trades.as_slice())), REJECTED_REWARD);
    }

    #[test]
    fn thirty_trades_rejected_despite_passing_the_rest() {
        // 12% net over 7 days with a single 2% dip
        let mut pnl = vec![100.0; 10];
        pnl.push(-220.0);
        pnl.extend([20.0; 18]);
        pnl.push(60.0);
        let trades = trade_log_over_days(&pnl, 7);

        let outcome = RewardEvaluator::default().score(&trades);
        let RewardOutcome::Rejected {
            challenge,
            violations,
        } = &outcome
        else {
            panic!("expected rejection, got {outcome:?}");
        };
        assert_eq!(challenge.trades, 30);
        assert_eq!(challenge.trading_days, 7);
        assert_relative_eq!(challenge.net_profit_pct, 12.0, epsilon = 1e-9);
        assert_relative_eq!(challenge.max_drawdown, 0.02, epsilon = 1e-12);
        assert_eq!(
            violations,
            &vec![Violation::TooFewTrades { trades: 30, min: 35 }]
        );
        assert_eq!(outcome.reward(), REJECTED_REWARD);
    }

    #[test]
    fn one_bad_day_rejects_forty_trades() {
        // 12% net over 7 days, but the first day gives back 10%
        let mut pnl = vec![1_000.0, -1_100.0];
        pnl.extend([35.0; 36]);
        pnl.extend([20.0; 2]);
        let trades = trade_log_over_days(&pnl, 7);

        let outcome = RewardEvaluator::default().score(&trades);
        let RewardOutcome::Rejected { challenge, .. } = &outcome else {
            panic!("expected rejection, got {outcome:?}");
        };
        assert_eq!(challenge.trades, 40);
        assert_eq!(challenge.trading_days, 7);
        assert_relative_eq!(challenge.net_profit_pct, 12.0, epsilon = 1e-9);
        assert_relative_eq!(challenge.max_daily_drawdown, 0.1, epsilon = 1e-12);
        assert_eq!(evaluate(Some(trades.as_slice())), REJECTED_REWARD);
    }

    #[test]
    fn four_days_rejected() {
        let trades = trade_log(&[40.0; 40], 10);
        assert_eq!(
            violations(&trades),
            vec![Violation::TooFewDays { days: 4, min: 5 }]
        );
    }

    #[test]
    fn nine_percent_rejected() {
        let trades = trade_log(&[22.5; 40], 5);
        let v = violations(&trades);
        assert_eq!(v.len(), 1);
        assert!(matches!(v[0], Violation::ProfitBelowTarget { .. }));
    }

    #[test]
    fn ten_percent_daily_drawdown_rejected() {
        let mut pnl = vec![1_000.0, -1_100.0];
        pnl.extend([40.0; 38]);
        let trades = trade_log(&pnl, 5);
        assert_eq!(evaluate(Some(trades.as_slice())), REJECTED_REWARD);
        assert!(
            violations(&trades)
                .iter()
                .any(|v| matches!(v, Violation::DailyDrawdown { .. }))
        );
    }

    #[test]
    fn overnight_dip_is_not_daily_drawdown() {
        // the 3.5% loss is the first trade of day two, so each day's own peak
        // is never undercut
        let mut pnl = vec![30.0; 5];
        pnl.push(-360.0);
        pnl.extend([50.0; 34]);
        let trades = trade_log(&pnl, 5);
        let b = scored(&trades);
        assert_eq!(b.challenge.max_daily_drawdown, 0.0);
        assert_relative_eq!(b.challenge.max_drawdown, 360.0 / 10_150.0);
    }
}

mod scoring {
    use super::*;

    #[test]
    fn steady_log_earns_bonus() {
        let trades = trade_log(&[30.0; 40], 5);
        let b = scored(&trades);
        assert_relative_eq!(b.challenge.net_profit_pct, 12.0, epsilon = 1e-9);
        assert!(b.performance.sharpe > 1.5);
        assert_eq!(b.penalty, 0.0);
        // win-rate bonus alone is (100 - 60) / 2
        assert!(b.bonus > 20.0);
        assert!(b.reward > 12.0);
    }

    #[test]
    fn reward_is_profit_minus_penalty_plus_bonus() {
        let mut pnl: Vec<f64> = (0..45).map(|i| if i % 3 == 0 { -20.0 } else { 50.0 }).collect();
        pnl.push(100.0);
        let trades = trade_log(&pnl, 6);
        let b = scored(&trades);
        assert_relative_eq!(b.reward, b.challenge.net_profit_pct - b.penalty + b.bonus);
        assert!(b.penalty > 0.0, "raw PnL spread triggers the volatility penalty");
    }

    #[test]
    fn same_log_same_reward() {
        let trades = trade_log(&[30.0; 40], 5);
        assert_eq!(
            evaluate(Some(trades.as_slice())),
            evaluate(Some(trades.as_slice()))
        );
    }

    #[test]
    fn relaxed_rules_score_short_logs() {
        let evaluator = RewardEvaluator::new(
            ChallengeRules {
                min_trades: 10,
                min_days: 2,
                ..ChallengeRules::default()
            },
            ScoringParams::default(),
        );
        let trades = trade_log(&[120.0; 10], 5);
        let outcome = evaluator.score(&trades);
        let RewardOutcome::Scored(b) = &outcome else {
            panic!("expected a score");
        };
        // 30 trades short of the 40 target
        assert!(b.penalty >= 150.0);
        assert_eq!(outcome.reward(), b.reward);
    }
}

mod loading {
    use super::*;

    #[test]
    fn csv_log_round_trip_scores_like_memory() {
        let trades = trade_log(&[30.0; 40], 5);
        let file = write_temp(&trades_csv(&trades));
        let loaded = CsvAdapter::new(file.path()).fetch_trades().unwrap();
        assert_eq!(loaded, trades);
        assert_eq!(
            evaluate(Some(loaded.as_slice())),
            evaluate(Some(trades.as_slice()))
        );
    }

    #[test]
    fn start_equity_column_changes_scale() {
        let file = write_temp(
            "timestamp,pnl,start_equity\n\
             2024-03-01T09:00:00Z,100,1000\n\
             2024-03-01T10:00:00Z,50,\n",
        );
        let trades = CsvAdapter::new(file.path()).fetch_trades().unwrap();
        let outcome = RewardEvaluator::default().score(&trades);
        let RewardOutcome::Rejected { challenge, .. } = outcome else {
            panic!("two trades cannot pass");
        };
        assert_eq!(challenge.start_equity, 1_000.0);
        assert_relative_eq!(challenge.net_profit_pct, 15.0);
    }

    #[test]
    fn header_only_log_scores_zero() {
        let file = write_temp("timestamp,pnl\n");
        let trades = CsvAdapter::new(file.path()).fetch_trades().unwrap();
        assert!(trades.is_empty());
        assert_eq!(evaluate(Some(trades.as_slice())), 0.0);
    }

    #[test]
    fn mock_trade_log_port() {
        let port = MockTradeLog {
            trades: trade_log(&[30.0; 40], 5),
        };
        let trades = port.fetch_trades().unwrap();
        assert!(evaluate(Some(trades.as_slice())) > 12.0);
    }
}
