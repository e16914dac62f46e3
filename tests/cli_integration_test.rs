//! CLI integration tests.
//!
//! Tests cover:
//! - Argument parsing for each subcommand
//! - Config loading (build_market_settings, build_engine_config)
//! - Price resolution against CSV files on disk
//! - Holdings round trip through `run`
//! - Text rendering of signals, evaluations and timelines

mod common;

use clap::Parser;
use common::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use vixbooster::adapters::csv_adapter::CsvMarketData;
use vixbooster::adapters::file_config_adapter::FileConfigAdapter;
use vixbooster::adapters::json_holdings_adapter::JsonHoldingsStore;
use vixbooster::cli::{
    self, Cli, Command, HoldingsAction, PriceOverrides, build_market_settings, evaluate_with_ports,
    format_evaluation, format_signal, format_timeline, resolve_prices,
};
use vixbooster::domain::config_validation::build_engine_config;
use vixbooster::domain::engine::SignalEngine;
use vixbooster::domain::error::VixboosterError;
use vixbooster::domain::holdings::Holdings;
use vixbooster::domain::indicator::OscillatorMethod;
use vixbooster::domain::price_series::PricePoint;
use vixbooster::domain::regime::Regime;
use vixbooster::domain::sentiment::Sentiment;
use vixbooster::ports::holdings_port::HoldingsPort;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn write_csv(dir: &Path, symbol: &str, closes: &[f64]) {
    let mut content = String::from("date,close\n");
    for p in points(closes) {
        content.push_str(&format!("{},{}\n", p.date, p.close));
    }
    fs::write(dir.join(format!("{symbol}.csv")), content).unwrap();
}

/// Data dir with SPY/VIX/TQQQ/SHY files and a config pointing at it.
fn workspace(spy: &[f64], vix: &[f64]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    write_csv(dir.path(), "SPY", spy);
    write_csv(dir.path(), "VIX", vix);
    write_csv(dir.path(), "TQQQ", &[48.0, 50.0]);
    write_csv(dir.path(), "SHY", &[82.5]);

    let ini = format!(
        r#"
[indicators]
long_window = 5
short_window = 4

[market]
data_dir = {data}
risk_asset = TQQQ
defensive_asset = SHY

[portfolio]
holdings_path = {holdings}
"#,
        data = dir.path().display(),
        holdings = dir.path().join("portfolio.json").display(),
    );
    let config_path = dir.path().join("vixbooster.ini");
    fs::write(&config_path, ini).unwrap();
    (dir, config_path)
}

fn engine_and_market(config_path: &Path) -> (SignalEngine, cli::MarketSettings) {
    let adapter = cli::load_config(config_path).unwrap();
    let engine = SignalEngine::new(build_engine_config(&adapter).unwrap()).unwrap();
    (engine, build_market_settings(&adapter).unwrap())
}

// ── Argument parsing ─────────────────────────────────────────────

#[test]
fn parse_classify_arguments() {
    let cli = Cli::try_parse_from([
        "vixbooster",
        "classify",
        "--price",
        "450",
        "--moving-average",
        "400",
        "--oscillator",
        "65",
        "--volatility",
        "35",
        "--json",
    ])
    .unwrap();
    match cli.command {
        Command::Classify {
            price,
            moving_average,
            oscillator,
            volatility,
            config,
            json,
        } => {
            assert_eq!(price, 450.0);
            assert_eq!(moving_average, 400.0);
            assert_eq!(oscillator, 65.0);
            assert_eq!(volatility, 35.0);
            assert!(config.is_none());
            assert!(json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_rebalance_rejects_out_of_range_sentiment() {
    let result = Cli::try_parse_from([
        "vixbooster",
        "rebalance",
        "-c",
        "x.ini",
        "--sentiment-score",
        "140",
    ]);
    assert!(result.is_err());
}

#[test]
fn parse_history_defaults_to_twenty_days() {
    let cli = Cli::try_parse_from(["vixbooster", "history", "-c", "x.ini"]).unwrap();
    assert!(matches!(cli.command, Command::History { days: 20, json: false, .. }));
}

#[test]
fn parse_holdings_set() {
    let cli = Cli::try_parse_from([
        "vixbooster",
        "holdings",
        "set",
        "-c",
        "x.ini",
        "--risk",
        "50",
        "--defensive",
        "10",
        "--cash",
        "2500.5",
    ])
    .unwrap();
    match cli.command {
        Command::Holdings {
            action:
                HoldingsAction::Set {
                    risk,
                    defensive,
                    cash,
                    ..
                },
        } => {
            assert_eq!((risk, defensive), (50, 10));
            assert_eq!(cash, 2500.5);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

// ── Config loading ───────────────────────────────────────────────

#[test]
fn market_settings_defaults() {
    let adapter = FileConfigAdapter::from_string("[market]\ndata_dir = /srv/prices\n").unwrap();
    let market = build_market_settings(&adapter).unwrap();
    assert_eq!(market.data_dir, PathBuf::from("/srv/prices"));
    assert_eq!(market.risk_proxy, "SPY");
    assert_eq!(market.volatility_index, "VIX");
    assert_eq!(market.risk_asset, None);
    assert_eq!(market.defensive_asset, None);
    assert_eq!(market.holdings_path, PathBuf::from("portfolio.json"));
}

#[test]
fn market_settings_require_data_dir() {
    let adapter = FileConfigAdapter::from_string("[market]\nrisk_proxy = QQQ\n").unwrap();
    let err = build_market_settings(&adapter).unwrap_err();
    assert!(
        matches!(&err, VixboosterError::ConfigMissing { section, key } if section == "market" && key == "data_dir")
    );
    assert_eq!(err.exit_status(), 2);
}

#[test]
fn config_file_on_disk_is_loaded() {
    let file = write_temp_ini(
        "[indicators]\nlong_window = 120\noscillator_method = wilder\n[market]\ndata_dir = /tmp\nvolatility_index = VXN\n",
    );
    let adapter = cli::load_config(file.path()).unwrap();
    let engine = build_engine_config(&adapter).unwrap();
    assert_eq!(engine.indicators.long_window, 120);
    assert_eq!(engine.indicators.method, OscillatorMethod::Wilder);
    assert_eq!(build_market_settings(&adapter).unwrap().volatility_index, "VXN");
}

#[test]
fn missing_config_file_is_config_error() {
    let err = cli::load_config(Path::new("/nonexistent/vixbooster.ini")).unwrap_err();
    assert!(matches!(err, VixboosterError::ConfigParse { .. }));
    assert_eq!(err.exit_status(), 2);
}

// ── Prices and evaluation from disk ──────────────────────────────

#[test]
fn resolve_prices_reads_latest_closes() {
    let (_dir, config_path) = workspace(&BULL_PULLBACK, &flat(35.0, 6));
    let (_, market) = engine_and_market(&config_path);
    let data = CsvMarketData::new(market.data_dir.clone());

    let prices = resolve_prices(&data, &market, PriceOverrides::default()).unwrap();
    assert_eq!(prices.risk_asset, 50.0);
    assert_eq!(prices.defensive_asset, 82.5);

    let overridden = resolve_prices(
        &data,
        &market,
        PriceOverrides {
            risk_asset: Some(51.25),
            defensive_asset: None,
        },
    )
    .unwrap();
    assert_eq!(overridden.risk_asset, 51.25);
    assert_eq!(overridden.defensive_asset, 82.5);
}

#[test]
fn resolve_prices_without_risk_asset_needs_override() {
    let adapter = FileConfigAdapter::from_string("[market]\ndata_dir = /tmp\n").unwrap();
    let market = build_market_settings(&adapter).unwrap();
    let data = MockMarketData::new();

    let err = resolve_prices(&data, &market, PriceOverrides::default()).unwrap_err();
    assert!(matches!(err, VixboosterError::ConfigMissing { key, .. } if key == "risk_asset"));

    let prices = resolve_prices(
        &data,
        &market,
        PriceOverrides {
            risk_asset: Some(20.0),
            defensive_asset: None,
        },
    )
    .unwrap();
    assert_eq!(prices.defensive_asset, 0.0);
}

#[test]
fn evaluation_from_disk_files() {
    let (dir, config_path) = workspace(&BEAR_CAPITULATION, &flat(40.0, 6));
    let (engine, market) = engine_and_market(&config_path);
    let store = JsonHoldingsStore::new(market.holdings_path.clone());
    store.save(&Holdings::new(0, 20, 8_350.0)).unwrap();

    let eval = evaluate_with_ports(
        &engine,
        &market,
        &CsvMarketData::new(dir.path().to_path_buf()),
        &store,
        PriceOverrides::default(),
        Sentiment::default(),
    )
    .unwrap();

    // 20 * 82.5 + 8350 = 10000 total, 20% target at 50 a share
    assert_eq!(eval.decision.regime, Regime::ContrarianEntry);
    assert_eq!(eval.valuation.total_assets, 10_000.0);
    assert_eq!(eval.trade.quantity, 40);
}

// ── run() side effects ───────────────────────────────────────────

#[test]
fn holdings_set_persists_through_run() {
    let (_dir, config_path) = workspace(&BULL_PULLBACK, &flat(35.0, 6));
    let config = config_path.to_string_lossy().to_string();
    let cli = Cli::try_parse_from([
        "vixbooster",
        "holdings",
        "set",
        "-c",
        config.as_str(),
        "--risk",
        "12",
        "--defensive",
        "3",
        "--cash",
        "1500",
    ])
    .unwrap();
    cli::run(cli);

    let (_, market) = engine_and_market(&config_path);
    let stored = JsonHoldingsStore::new(market.holdings_path).load().unwrap();
    assert_eq!(stored, Some(Holdings::new(12, 3, 1_500.0)));
}

#[test]
fn failed_rebalance_does_not_touch_holdings() {
    let (_dir, config_path) = workspace(&[100.0, 101.0], &flat(35.0, 2));
    let (_, market) = engine_and_market(&config_path);
    let store = JsonHoldingsStore::new(market.holdings_path.clone());
    store.save(&Holdings::new(5, 0, 100.0)).unwrap();

    let config = config_path.to_string_lossy().to_string();
    cli::run(Cli::try_parse_from(["vixbooster", "rebalance", "-c", config.as_str()]).unwrap());

    assert_eq!(store.load().unwrap(), Some(Holdings::new(5, 0, 100.0)));
}

// ── Rendering ────────────────────────────────────────────────────

#[test]
fn signal_text_names_regime_and_trend() {
    let signal = short_engine()
        .signal(&series("SPY", &BULL_PULLBACK), &series("VIX", &flat(35.0, 6)))
        .unwrap();
    let text = format_signal(&signal);
    assert!(text.contains("Signal as of 2024-01-07"));
    assert!(text.contains("(bull)"));
    assert!(text.contains("StrongAttack"));
    assert!(text.contains("60%"));
}

#[test]
fn signal_text_shows_stale_volatility_date() {
    let vix = vec![
        PricePoint::new(date(2024, 1, 2), 30.0),
        PricePoint::new(date(2024, 1, 5), 35.0),
    ];
    let data = MockMarketData::new()
        .with_closes("SPY", &BULL_PULLBACK)
        .with_points("VIX", vix);
    let signal = cli::signal_with_ports(&short_engine(), &market_for_mock(), &data).unwrap();
    assert!(format_signal(&signal).contains("(as of 2024-01-05)"));
}

#[test]
fn evaluation_text_describes_hold_and_sentiment() {
    let engine = short_engine();
    let data = MockMarketData::new()
        .with_closes("SPY", &BULL_PULLBACK)
        .with_closes("VIX", &flat(15.0, 6));
    // routine attack: 20% of 10000 = 2000, already holding 40 * 50
    let store = MemoryHoldings::with(Holdings::new(40, 0, 8_000.0));
    let overrides = PriceOverrides {
        risk_asset: Some(50.0),
        defensive_asset: None,
    };
    let eval = evaluate_with_ports(
        &engine,
        &market_for_mock(),
        &data,
        &store,
        overrides,
        Sentiment::new(Some(55), Some("Neutral".into())).unwrap(),
    )
    .unwrap();

    let text = format_evaluation(&eval, 1_000.0);
    assert!(text.contains("RoutineAttack"));
    assert!(text.contains("Trade: HOLD"));
    assert!(text.contains("Sentiment: 55 (Neutral)"));
}

#[test]
fn timeline_text_has_one_row_per_day() {
    let entries = short_engine()
        .timeline(
            &series("SPY", &ramp(100.0, 1.0, 12)),
            &series("VIX", &flat(20.0, 12)),
            4,
        )
        .unwrap();
    let text = format_timeline(&entries);
    assert_eq!(text.lines().count(), 5);
    assert!(text.lines().last().unwrap().contains("ProfitTaking"));
}

fn market_for_mock() -> cli::MarketSettings {
    cli::MarketSettings {
        data_dir: PathBuf::from("/unused"),
        risk_proxy: "SPY".into(),
        volatility_index: "VIX".into(),
        risk_asset: None,
        defensive_asset: None,
        holdings_path: PathBuf::from("portfolio.json"),
    }
}
