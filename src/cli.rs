//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::CsvMarketData;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_holdings_adapter::JsonHoldingsStore;
use crate::domain::config_validation::build_engine_config;
use crate::domain::engine::{Evaluation, Signal, SignalEngine, TimelineEntry};
use crate::domain::error::VixboosterError;
use crate::domain::holdings::{AssetPrices, Holdings};
use crate::domain::rebalance::TradeDirection;
use crate::domain::regime::{RegimeDecision, SignalInputs};
use crate::domain::sentiment::Sentiment;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;
use crate::ports::holdings_port::HoldingsPort;

#[derive(Parser, Debug)]
#[command(name = "vixbooster", about = "Market-regime signal and rebalancing calculator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify the current market regime from stored price history
    Signal {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Classify hand-entered indicator values
    Classify {
        #[arg(long)]
        price: f64,
        #[arg(long)]
        moving_average: f64,
        #[arg(long)]
        oscillator: f64,
        #[arg(long)]
        volatility: f64,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Compute the trade that moves holdings to the current target
    Rebalance {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        risk_price: Option<f64>,
        #[arg(long)]
        defensive_price: Option<f64>,
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        sentiment_score: Option<u8>,
        #[arg(long)]
        sentiment_rating: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show the regime for each of the last N trading days
    History {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long, default_value_t = 20)]
        days: usize,
        #[arg(long)]
        json: bool,
    },
    /// Show or replace stored holdings
    Holdings {
        #[command(subcommand)]
        action: HoldingsAction,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum HoldingsAction {
    Show {
        #[arg(short, long)]
        config: PathBuf,
    },
    Set {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        risk: u64,
        #[arg(long)]
        defensive: u64,
        #[arg(long)]
        cash: f64,
    },
}

/// Where market data and holdings live, from the `[market]` and
/// `[portfolio]` sections.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSettings {
    pub data_dir: PathBuf,
    pub risk_proxy: String,
    pub volatility_index: String,
    pub risk_asset: Option<String>,
    pub defensive_asset: Option<String>,
    pub holdings_path: PathBuf,
}

/// Prices supplied on the command line instead of from market data.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceOverrides {
    pub risk_asset: Option<f64>,
    pub defensive_asset: Option<f64>,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Signal { config, json } => run_signal(&config, json),
        Command::Classify {
            price,
            moving_average,
            oscillator,
            volatility,
            config,
            json,
        } => {
            let inputs = SignalInputs {
                price,
                moving_average,
                oscillator,
                volatility_level: volatility,
            };
            run_classify(inputs, config.as_deref(), json)
        }
        Command::Rebalance {
            config,
            risk_price,
            defensive_price,
            sentiment_score,
            sentiment_rating,
            json,
        } => {
            let overrides = PriceOverrides {
                risk_asset: risk_price,
                defensive_asset: defensive_price,
            };
            Sentiment::new(sentiment_score, sentiment_rating)
                .and_then(|sentiment| run_rebalance(&config, overrides, sentiment, json))
        }
        Command::History { config, days, json } => run_history(&config, days, json),
        Command::Holdings { action } => match action {
            HoldingsAction::Show { config } => run_holdings_show(&config),
            HoldingsAction::Set {
                config,
                risk,
                defensive,
                cash,
            } => run_holdings_set(&config, Holdings::new(risk, defensive, cash)),
        },
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, VixboosterError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

pub fn build_market_settings(config: &dyn ConfigPort) -> Result<MarketSettings, VixboosterError> {
    let data_dir = non_empty(config, "market", "data_dir").ok_or_else(|| {
        VixboosterError::ConfigMissing {
            section: "market".into(),
            key: "data_dir".into(),
        }
    })?;

    Ok(MarketSettings {
        data_dir: PathBuf::from(data_dir),
        risk_proxy: non_empty(config, "market", "risk_proxy").unwrap_or_else(|| "SPY".into()),
        volatility_index: non_empty(config, "market", "volatility_index")
            .unwrap_or_else(|| "VIX".into()),
        risk_asset: non_empty(config, "market", "risk_asset"),
        defensive_asset: non_empty(config, "market", "defensive_asset"),
        holdings_path: non_empty(config, "portfolio", "holdings_path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("portfolio.json")),
    })
}

fn non_empty(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Override first, else the latest stored close. A missing close becomes a
/// zero price, which the rebalancer rejects.
pub fn resolve_prices(
    data: &dyn MarketDataPort,
    market: &MarketSettings,
    overrides: PriceOverrides,
) -> Result<AssetPrices, VixboosterError> {
    let risk_asset = match (overrides.risk_asset, &market.risk_asset) {
        (Some(p), _) => p,
        (None, Some(symbol)) => data.latest_close(symbol)?.map_or(0.0, |p| p.close),
        (None, None) => {
            return Err(VixboosterError::ConfigMissing {
                section: "market".into(),
                key: "risk_asset".into(),
            });
        }
    };
    let defensive_asset = match (overrides.defensive_asset, &market.defensive_asset) {
        (Some(p), _) => p,
        (None, Some(symbol)) => data.latest_close(symbol)?.map_or(0.0, |p| p.close),
        (None, None) => 0.0,
    };
    Ok(AssetPrices::new(risk_asset, defensive_asset))
}

pub fn signal_with_ports(
    engine: &SignalEngine,
    market: &MarketSettings,
    data: &dyn MarketDataPort,
) -> Result<Signal, VixboosterError> {
    let risk_proxy = data.fetch_closes(&market.risk_proxy)?;
    let volatility = data.fetch_closes(&market.volatility_index)?;
    engine.signal(&risk_proxy, &volatility)
}

pub fn evaluate_with_ports(
    engine: &SignalEngine,
    market: &MarketSettings,
    data: &dyn MarketDataPort,
    store: &dyn HoldingsPort,
    overrides: PriceOverrides,
    sentiment: Sentiment,
) -> Result<Evaluation, VixboosterError> {
    let holdings = store.load()?.ok_or_else(|| VixboosterError::InvalidHoldings {
        reason: format!(
            "no holdings stored at {}; run `vixbooster holdings set` first",
            market.holdings_path.display()
        ),
    })?;
    let risk_proxy = data.fetch_closes(&market.risk_proxy)?;
    let volatility = data.fetch_closes(&market.volatility_index)?;
    let prices = resolve_prices(data, market, overrides)?;
    engine.evaluate(&risk_proxy, &volatility, &holdings, &prices, sentiment)
}

fn load_engine_and_market(
    config_path: &Path,
) -> Result<(SignalEngine, MarketSettings), VixboosterError> {
    let adapter = load_config(config_path)?;
    let engine = SignalEngine::new(build_engine_config(&adapter)?)?;
    let market = build_market_settings(&adapter)?;
    Ok((engine, market))
}

fn run_signal(config_path: &Path, json: bool) -> Result<(), VixboosterError> {
    let (engine, market) = load_engine_and_market(config_path)?;
    let data = CsvMarketData::new(market.data_dir.clone());
    let signal = signal_with_ports(&engine, &market, &data)?;
    emit(&signal, json, || format_signal(&signal))
}

fn run_classify(
    inputs: SignalInputs,
    config_path: Option<&Path>,
    json: bool,
) -> Result<(), VixboosterError> {
    let engine_config = match config_path {
        Some(path) => build_engine_config(&load_config(path)?)?,
        None => Default::default(),
    };
    let engine = SignalEngine::new(engine_config)?;
    let decision = engine.classifier().classify(&inputs)?;
    emit(&decision, json, || format_decision(&decision))
}

fn run_rebalance(
    config_path: &Path,
    overrides: PriceOverrides,
    sentiment: Sentiment,
    json: bool,
) -> Result<(), VixboosterError> {
    let (engine, market) = load_engine_and_market(config_path)?;
    let data = CsvMarketData::new(market.data_dir.clone());
    let store = JsonHoldingsStore::new(market.holdings_path.clone());
    let evaluation = evaluate_with_ports(&engine, &market, &data, &store, overrides, sentiment)?;
    emit(&evaluation, json, || {
        format_evaluation(&evaluation, engine.rebalancer().settings().minimum_trade_notional)
    })
}

fn run_history(config_path: &Path, days: usize, json: bool) -> Result<(), VixboosterError> {
    let (engine, market) = load_engine_and_market(config_path)?;
    let data = CsvMarketData::new(market.data_dir.clone());
    let risk_proxy = data.fetch_closes(&market.risk_proxy)?;
    let volatility = data.fetch_closes(&market.volatility_index)?;
    let entries = engine.timeline(&risk_proxy, &volatility, days)?;
    emit(&entries, json, || format_timeline(&entries))
}

fn run_holdings_show(config_path: &Path) -> Result<(), VixboosterError> {
    let market = build_market_settings(&load_config(config_path)?)?;
    let store = JsonHoldingsStore::new(market.holdings_path.clone());
    match store.load()? {
        Some(h) => {
            println!("{}", format_holdings(&h));
            Ok(())
        }
        None => Err(VixboosterError::InvalidHoldings {
            reason: format!("no holdings stored at {}", market.holdings_path.display()),
        }),
    }
}

fn run_holdings_set(config_path: &Path, holdings: Holdings) -> Result<(), VixboosterError> {
    let market = build_market_settings(&load_config(config_path)?)?;
    JsonHoldingsStore::new(market.holdings_path.clone()).save(&holdings)?;
    println!("{}", format_holdings(&holdings));
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), VixboosterError> {
    let adapter = load_config(config_path)?;
    let engine_config = build_engine_config(&adapter)?;
    let market = build_market_settings(&adapter)?;

    let t = &engine_config.thresholds;
    eprintln!("Indicators:");
    eprintln!(
        "  moving average window: {}, oscillator window: {} ({})",
        engine_config.indicators.long_window,
        engine_config.indicators.short_window,
        engine_config.indicators.method
    );
    eprintln!("Thresholds:");
    eprintln!(
        "  bull enter < {}, profit exit > {}",
        t.bull_enter_oscillator, t.exit_profit_oscillator
    );
    eprintln!(
        "  bear enter < {} with volatility > {}, bear exit > {}",
        t.bear_enter_oscillator, t.panic_volatility, t.bear_exit_oscillator
    );
    eprintln!(
        "  volatility tiers {} / {} → allocations {} / {} / {}",
        t.volatility_tier1,
        t.volatility_tier2,
        t.base_allocation,
        t.boost_allocation1,
        t.boost_allocation2
    );
    eprintln!(
        "Rebalance deadband: {:.2}",
        engine_config.rebalance.minimum_trade_notional
    );
    eprintln!("Market:");
    eprintln!("  data dir: {}", market.data_dir.display());
    eprintln!(
        "  signal: {}, volatility: {}",
        market.risk_proxy, market.volatility_index
    );
    eprintln!("\nConfiguration is valid.");
    Ok(())
}

fn emit<T: Serialize>(
    value: &T,
    json: bool,
    text: impl FnOnce() -> String,
) -> Result<(), VixboosterError> {
    if json {
        let out = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
        println!("{out}");
    } else {
        print!("{}", text());
    }
    Ok(())
}

fn percent(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

pub fn format_decision(decision: &RegimeDecision) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Regime:            {}", decision.regime);
    let _ = writeln!(out, "Target allocation: {}", percent(decision.target_allocation));
    let _ = writeln!(out, "Rationale:         {}", decision.rationale);
    out
}

pub fn format_signal(signal: &Signal) -> String {
    let s = &signal.snapshot;
    let trend = if s.price > s.moving_average { "bull" } else { "bear" };
    let mut out = String::new();
    let _ = writeln!(out, "Signal as of {}", s.date);
    let _ = writeln!(out, "  price:          {:.2}", s.price);
    let _ = writeln!(out, "  moving average: {:.2} ({})", s.moving_average, trend);
    let _ = writeln!(out, "  oscillator:     {:.2}", s.oscillator);
    if s.volatility_date == s.date {
        let _ = writeln!(out, "  volatility:     {:.2}", s.volatility_level);
    } else {
        let _ = writeln!(
            out,
            "  volatility:     {:.2} (as of {})",
            s.volatility_level, s.volatility_date
        );
    }
    out.push_str(&format_decision(&signal.decision));
    out
}

pub fn format_evaluation(evaluation: &Evaluation, deadband: f64) -> String {
    let mut out = format_signal(&Signal {
        snapshot: evaluation.snapshot.clone(),
        decision: evaluation.decision.clone(),
    });
    let v = &evaluation.valuation;
    let _ = writeln!(out, "Portfolio");
    let _ = writeln!(out, "  total assets:   {:.2}", v.total_assets);
    let _ = writeln!(out, "  target value:   {:.2}", v.target_value);
    let _ = writeln!(out, "  current value:  {:.2}", v.current_value);

    let trade = &evaluation.trade;
    match trade.direction {
        TradeDirection::Hold => {
            let _ = writeln!(
                out,
                "Trade: HOLD (delta {:.2} within {:.2} deadband)",
                v.delta, deadband
            );
        }
        direction => {
            let _ = writeln!(
                out,
                "Trade: {} {} ({:.2})",
                direction, trade.quantity, trade.notional_amount
            );
        }
    }

    let sentiment = &evaluation.sentiment;
    match (sentiment.score, sentiment.rating.as_deref()) {
        (Some(score), Some(rating)) => {
            let _ = writeln!(out, "Sentiment: {} ({})", score, rating);
        }
        (Some(score), None) => {
            let _ = writeln!(out, "Sentiment: {}", score);
        }
        (None, Some(rating)) => {
            let _ = writeln!(out, "Sentiment: {}", rating);
        }
        (None, None) => {}
    }
    out
}

pub fn format_timeline(entries: &[TimelineEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10}  {:>10}  {:>10}  {:>6}  {:>6}  {:<15}  {:>6}",
        "date", "price", "average", "osc", "vol", "regime", "target"
    );
    for e in entries {
        let _ = writeln!(
            out,
            "{:<10}  {:>10.2}  {:>10.2}  {:>6.1}  {:>6.1}  {:<15}  {:>6}",
            e.date.to_string(),
            e.price,
            e.moving_average,
            e.oscillator,
            e.volatility_level,
            e.regime.tag(),
            percent(e.target_allocation)
        );
    }
    out
}

pub fn format_holdings(holdings: &Holdings) -> String {
    format!(
        "risk asset: {}, defensive asset: {}, cash: {:.2}",
        holdings.risk_asset_quantity, holdings.defensive_asset_quantity, holdings.cash_amount
    )
}
