//! Indicator preprocessing: reduces raw series to the four classifier inputs.

use crate::domain::error::VixboosterError;
use crate::domain::indicator::OscillatorMethod;
use crate::domain::indicator::rsi::{calculate_rsi, window_rsi};
use crate::domain::indicator::sma::mean_close;
use crate::domain::price_series::PriceSeries;
use crate::domain::regime::SignalInputs;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSettings {
    pub long_window: usize,
    pub short_window: usize,
    pub method: OscillatorMethod,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            long_window: 200,
            short_window: 14,
            method: OscillatorMethod::Window,
        }
    }
}

impl IndicatorSettings {
    pub fn validate(&self) -> Result<(), VixboosterError> {
        if self.long_window == 0 {
            return Err(VixboosterError::invalid_configuration(
                "long_window",
                "must be at least 1",
            ));
        }
        if self.short_window == 0 {
            return Err(VixboosterError::invalid_configuration(
                "short_window",
                "must be at least 1",
            ));
        }
        if self.short_window.checked_add(1).is_none() {
            return Err(VixboosterError::invalid_configuration(
                "short_window",
                format!("{} leaves no room for the extra close", self.short_window),
            ));
        }
        Ok(())
    }

    /// Observations needed before both indicators are defined.
    pub fn required_history(&self) -> usize {
        self.long_window.max(self.short_window.saturating_add(1))
    }
}

/// Classifier inputs evaluated at a single date. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub date: NaiveDate,
    pub price: f64,
    pub moving_average: f64,
    pub oscillator: f64,
    pub volatility_date: NaiveDate,
    pub volatility_level: f64,
}

impl IndicatorSnapshot {
    pub fn signal_inputs(&self) -> SignalInputs {
        SignalInputs {
            price: self.price,
            moving_average: self.moving_average,
            oscillator: self.oscillator,
            volatility_level: self.volatility_level,
        }
    }
}

/// Trailing mean of the last `window` closes.
pub fn moving_average(series: &PriceSeries, window: usize) -> Result<f64, VixboosterError> {
    series.require(window)?;
    Ok(mean_close(series.tail(window)))
}

/// Relative-strength oscillator at the latest close.
pub fn oscillator(
    series: &PriceSeries,
    window: usize,
    method: OscillatorMethod,
) -> Result<f64, VixboosterError> {
    let needed = window.saturating_add(1);
    series.require(needed)?;
    match method {
        OscillatorMethod::Window => {
            let closes: Vec<f64> = series.tail(needed).iter().map(|p| p.close).collect();
            Ok(window_rsi(&closes))
        }
        OscillatorMethod::Wilder => calculate_rsi(series.points(), window, method)
            .latest()
            .filter(|p| p.valid)
            .map(|p| p.value)
            .ok_or_else(|| VixboosterError::MissingIndicator {
                name: "oscillator".into(),
                reason: format!("no valid value for {}", series.name()),
            }),
    }
}

/// Build the snapshot from the risk-proxy series and the volatility series.
///
/// Each series contributes its own most recent observation; the dates are
/// recorded separately and need not match.
pub fn compute_snapshot(
    risk_proxy: &PriceSeries,
    volatility: &PriceSeries,
    settings: &IndicatorSettings,
) -> Result<IndicatorSnapshot, VixboosterError> {
    risk_proxy.require(settings.required_history())?;

    let latest = *risk_proxy.latest().ok_or_else(|| VixboosterError::InsufficientHistory {
        series: risk_proxy.name().to_string(),
        bars: 0,
        minimum: settings.required_history(),
    })?;
    let vol = *volatility
        .latest()
        .ok_or_else(|| VixboosterError::MissingIndicator {
            name: "volatility_level".into(),
            reason: format!("{} series is empty", volatility.name()),
        })?;

    if vol.date != latest.date {
        warn!(
            risk_date = %latest.date,
            volatility_date = %vol.date,
            "volatility close is not from the same date as the risk proxy"
        );
    }

    Ok(IndicatorSnapshot {
        date: latest.date,
        price: latest.close,
        moving_average: moving_average(risk_proxy, settings.long_window)?,
        oscillator: oscillator(risk_proxy, settings.short_window, settings.method)?,
        volatility_date: vol.date,
        volatility_level: vol.close,
    })
}
