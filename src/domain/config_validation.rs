//! Engine configuration loading and validation.
//!
//! Reads `[indicators]`, `[thresholds]` and `[rebalance]` into an
//! `EngineConfig`. Absent keys take the built-in defaults; malformed values
//! and threshold tables that break the ordering rules fail here, before any
//! evaluation runs.

use crate::domain::engine::EngineConfig;
use crate::domain::error::VixboosterError;
use crate::domain::indicator::OscillatorMethod;
use crate::domain::rebalance::RebalanceSettings;
use crate::domain::regime::RegimeThresholds;
use crate::domain::snapshot::IndicatorSettings;
use crate::ports::config_port::ConfigPort;

pub fn build_engine_config(config: &dyn ConfigPort) -> Result<EngineConfig, VixboosterError> {
    let engine = EngineConfig {
        indicators: build_indicator_settings(config)?,
        thresholds: build_thresholds(config)?,
        rebalance: build_rebalance_settings(config)?,
    };
    engine.validate()?;
    Ok(engine)
}

fn build_indicator_settings(config: &dyn ConfigPort) -> Result<IndicatorSettings, VixboosterError> {
    let defaults = IndicatorSettings::default();
    let method = match config.get_string("indicators", "oscillator_method") {
        Some(s) if !s.trim().is_empty() => {
            s.parse::<OscillatorMethod>()
                .map_err(|reason| VixboosterError::ConfigInvalid {
                    section: "indicators".into(),
                    key: "oscillator_method".into(),
                    reason,
                })?
        }
        _ => defaults.method,
    };

    Ok(IndicatorSettings {
        long_window: config.get_usize("indicators", "long_window", defaults.long_window)?,
        short_window: config.get_usize("indicators", "short_window", defaults.short_window)?,
        method,
    })
}

fn build_thresholds(config: &dyn ConfigPort) -> Result<RegimeThresholds, VixboosterError> {
    let d = RegimeThresholds::default();
    let get = |key: &str, default: f64| config.get_double("thresholds", key, default);

    Ok(RegimeThresholds {
        bull_enter_oscillator: get("bull_enter_oscillator", d.bull_enter_oscillator)?,
        bear_enter_oscillator: get("bear_enter_oscillator", d.bear_enter_oscillator)?,
        exit_profit_oscillator: get("exit_profit_oscillator", d.exit_profit_oscillator)?,
        bear_exit_oscillator: get("bear_exit_oscillator", d.bear_exit_oscillator)?,
        volatility_tier1: get("volatility_tier1", d.volatility_tier1)?,
        volatility_tier2: get("volatility_tier2", d.volatility_tier2)?,
        panic_volatility: get("panic_volatility", d.panic_volatility)?,
        base_allocation: get("base_allocation", d.base_allocation)?,
        boost_allocation1: get("boost_allocation1", d.boost_allocation1)?,
        boost_allocation2: get("boost_allocation2", d.boost_allocation2)?,
    })
}

fn build_rebalance_settings(config: &dyn ConfigPort) -> Result<RebalanceSettings, VixboosterError> {
    Ok(RebalanceSettings {
        minimum_trade_notional: config.get_double(
            "rebalance",
            "minimum_trade_notional",
            RebalanceSettings::default().minimum_trade_notional,
        )?,
    })
}
