//! End-to-end backtest runs against an in-memory market data port.

mod common;

use approx::assert_abs_diff_eq;
use common::*;
use sentitrader::domain::backtest::{evaluate, run_backtest, BacktestConfig};
use sentitrader::domain::daily_record::Observation;
use sentitrader::domain::error::SentitraderError;
use sentitrader::domain::series_builder::{
    DEFAULT_EPS, DEFAULT_VOLATILITY, DEFAULT_YIELD_SPREAD,
};
use sentitrader::domain::signal::Signal;
use sentitrader::domain::simulator::{TradeKind, DEFAULT_TRANSACTION_COST};

fn config(start: chrono::NaiveDate, end: chrono::NaiveDate) -> BacktestConfig {
    let mut c = BacktestConfig::new("SPY", start);
    c.end_date = Some(end);
    c
}

mod rising_market {
    use super::*;

    fn port() -> MockMarketDataPort {
        init_logging();
        let start = date(2024, 3, 1);
        let prices = rising_prices(start);
        let earnings = prices
            .iter()
            .map(|o| Observation::new(o.date, o.value / 25.0))
            .collect();
        MockMarketDataPort::new()
            .with_prices(prices)
            .with_earnings(earnings)
            .with_volatility(constant_series(start, 20, 15.0))
            .with_yield_spread(constant_series(start, 20, 0.5))
    }

    #[test]
    fn buys_every_day_and_trades_once() {
        let start = date(2024, 3, 1);
        let report = run_backtest(&port(), &config(start, date(2024, 4, 1))).unwrap();

        assert_eq!(report.rows.len(), 20);
        assert!(report.rows.iter().all(|r| r.signal == Signal::Buy));
        assert!(report.rows.iter().all(|r| r.momentum == 50.0));
        for row in &report.rows {
            assert_abs_diff_eq!(row.valuation_ratio, 25.0, epsilon = 1e-9);
        }

        assert_eq!(report.metrics.trade_count, 1);
        assert_eq!(report.trades.len(), 1);
        assert_eq!(report.trades[0].kind, TradeKind::Entry);
        assert_eq!(report.trades[0].date, date(2024, 3, 2));
    }

    #[test]
    fn strategy_tracks_market_within_cost() {
        let report = run_backtest(&port(), &config(date(2024, 3, 1), date(2024, 4, 1))).unwrap();

        let last = report.rows.last().unwrap();
        assert!(last.cumulative_market > 0.0);
        assert!(last.cumulative_strategy > 0.0);
        let gap = last.cumulative_market - last.cumulative_strategy;
        assert!(gap >= 0.0);
        assert!(gap <= DEFAULT_TRANSACTION_COST * last.cumulative_market + 1e-12);

        assert_abs_diff_eq!(report.metrics.market_return, 0.2, epsilon = 1e-9);
        assert_eq!(report.rows[0].strategy_return, 0.0);
        assert_eq!(report.metrics.max_drawdown, 0.0);
        assert!(report.metrics.risk_adjusted_ratio > 0.0);
    }

    #[test]
    fn latest_reading_matches_last_row() {
        let report = run_backtest(&port(), &config(date(2024, 3, 1), date(2024, 4, 1))).unwrap();
        let latest = report.metrics.latest.unwrap();
        let last = report.rows.last().unwrap();

        assert_eq!(latest.signal, last.signal);
        assert_eq!(latest.valuation_ratio, last.valuation_ratio);
        assert_eq!(latest.momentum, last.momentum);
        assert_eq!(report.end_date, last.date);
    }

    #[test]
    fn end_date_truncates_calendar() {
        let report = run_backtest(&port(), &config(date(2024, 3, 1), date(2024, 3, 11))).unwrap();
        assert_eq!(report.rows.len(), 10);
        assert_eq!(report.end_date, date(2024, 3, 10));
    }
}

mod price_failures {
    use super::*;

    #[test]
    fn price_feed_error_is_data_unavailable() {
        let port = MockMarketDataPort::new()
            .with_prices(rising_prices(date(2024, 1, 1)))
            .with_error("prices");
        let err = run_backtest(&port, &config(date(2024, 1, 1), date(2024, 2, 1))).unwrap_err();
        assert!(err.to_string().contains("offline"));
        assert!(matches!(err, SentitraderError::DataUnavailable { ticker, .. } if ticker == "SPY"));
    }

    #[test]
    fn empty_price_series_is_data_unavailable() {
        let port = MockMarketDataPort::new()
            .with_volatility(constant_series(date(2024, 1, 1), 5, 15.0));
        let err = run_backtest(&port, &config(date(2024, 1, 1), date(2024, 2, 1))).unwrap_err();
        assert!(matches!(err, SentitraderError::DataUnavailable { .. }));
    }
}

mod degraded_inputs {
    use super::*;

    #[test]
    fn failing_optional_sources_use_defaults() {
        init_logging();
        let start = date(2024, 1, 1);
        let port = MockMarketDataPort::new()
            .with_prices(constant_series(start, 5, 120.0))
            .with_error("earnings")
            .with_error("volatility")
            .with_error("yield_spread");
        let report = run_backtest(&port, &config(start, date(2024, 2, 1))).unwrap();

        assert_eq!(report.rows.len(), 5);
        for row in &report.rows {
            assert_eq!(row.eps, DEFAULT_EPS);
            assert_eq!(row.volatility, DEFAULT_VOLATILITY);
            assert_eq!(row.yield_spread, DEFAULT_YIELD_SPREAD);
            assert_eq!(row.valuation_ratio, 20.0);
            // valuation 20 (+1) and yield 0.5 (+1)
            assert_eq!(row.signal, Signal::Buy);
        }
    }

    #[test]
    fn one_failing_source_leaves_others_intact() {
        let start = date(2024, 1, 1);
        let port = MockMarketDataPort::new()
            .with_prices(constant_series(start, 3, 100.0))
            .with_volatility(constant_series(start, 3, 33.0))
            .with_error("yield_spread");
        let report = run_backtest(&port, &config(start, date(2024, 2, 1))).unwrap();

        assert!(report.rows.iter().all(|r| r.volatility == 33.0));
        assert!(report.rows.iter().all(|r| r.yield_spread == DEFAULT_YIELD_SPREAD));
    }

    #[test]
    fn quarterly_earnings_carried_forward() {
        let start = date(2024, 1, 1);
        let port = MockMarketDataPort::new()
            .with_prices(constant_series(start, 10, 100.0))
            .with_earnings(vec![
                Observation::new(date(2023, 10, 1), 2.0),
                Observation::new(date(2024, 1, 6), 4.0),
            ]);
        let report = run_backtest(&port, &config(start, date(2024, 2, 1))).unwrap();

        let ratios: Vec<f64> = report.rows.iter().map(|r| r.valuation_ratio).collect();
        assert_eq!(&ratios[..5], &[50.0; 5]);
        assert_eq!(&ratios[5..], &[25.0; 5]);
    }
}

mod positions {
    use super::*;

    #[test]
    fn stop_loss_exits_and_reenters() {
        let start = date(2024, 5, 1);
        let prices = series(start, &[100.0, 101.0, 102.0, 95.0, 96.0]);
        let port = MockMarketDataPort::new()
            .with_prices(prices)
            .with_earnings(constant_series(start, 5, 4.0))
            .with_volatility(constant_series(start, 5, 15.0));
        let report = run_backtest(&port, &config(start, date(2024, 6, 1))).unwrap();

        let kinds: Vec<TradeKind> = report.trades.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TradeKind::Entry, TradeKind::StopLoss, TradeKind::Entry]);
        assert_eq!(report.trades[1].date, date(2024, 5, 4));
        assert_eq!(report.metrics.trade_count, 3);

        let drop = 95.0 / 102.0 - 1.0;
        assert_abs_diff_eq!(
            report.rows[3].strategy_return,
            drop - DEFAULT_TRANSACTION_COST,
            epsilon = 1e-12
        );
        assert!(report.metrics.max_drawdown < 0.0);
    }

    #[test]
    fn sell_signals_keep_strategy_flat() {
        let start = date(2024, 1, 1);
        let records: Vec<_> = [100.0, 90.0, 80.0]
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let mut r = make_record(start + chrono::Duration::days(i as i64), p);
                r.valuation_ratio = 50.0;
                r.volatility = 35.0;
                r
            })
            .collect();
        let report = evaluate(records, &BacktestConfig::new("SPY", start));

        assert!(report.rows.iter().all(|r| r.signal == Signal::Sell));
        assert!(report.trades.is_empty());
        assert_eq!(report.metrics.total_return, 0.0);
        assert_eq!(report.metrics.risk_adjusted_ratio, 0.0);
        assert_abs_diff_eq!(report.metrics.market_return, -0.2, epsilon = 1e-12);
    }

    #[test]
    fn custom_cost_applied_on_entry() {
        let start = date(2024, 1, 1);
        let records = vec![make_record(start, 100.0), make_record(date(2024, 1, 2), 110.0)];
        let mut cfg = BacktestConfig::new("SPY", start);
        cfg.simulation.transaction_cost = 0.01;
        // valuation 25 is the only scoring clause
        cfg.rules.buy_score = 1;
        let report = evaluate(records, &cfg);

        assert_eq!(report.rows[0].signal, Signal::Buy);
        assert_abs_diff_eq!(report.rows[1].strategy_return, 0.09, epsilon = 1e-12);
    }
}
