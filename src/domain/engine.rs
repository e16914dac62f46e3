//! End-to-end evaluation: series → snapshot → decision → trade.

use crate::domain::error::VixboosterError;
use crate::domain::holdings::{AssetPrices, Holdings};
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::price_series::PriceSeries;
use crate::domain::rebalance::{RebalanceSettings, Rebalancer, TradeInstruction, Valuation};
use crate::domain::regime::{Regime, RegimeClassifier, RegimeDecision, RegimeThresholds, SignalInputs};
use crate::domain::sentiment::Sentiment;
use crate::domain::snapshot::{IndicatorSettings, IndicatorSnapshot, compute_snapshot};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// Everything tunable about one engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineConfig {
    pub indicators: IndicatorSettings,
    pub thresholds: RegimeThresholds,
    pub rebalance: RebalanceSettings,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), VixboosterError> {
        self.indicators.validate()?;
        self.thresholds.validate()?;
        self.rebalance.validate()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Signal {
    pub snapshot: IndicatorSnapshot,
    pub decision: RegimeDecision,
}

#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub snapshot: IndicatorSnapshot,
    pub decision: RegimeDecision,
    pub valuation: Valuation,
    pub trade: TradeInstruction,
    #[serde(skip_serializing_if = "Sentiment::is_empty")]
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub date: NaiveDate,
    pub price: f64,
    pub moving_average: f64,
    pub oscillator: f64,
    pub volatility_level: f64,
    pub regime: Regime,
    pub target_allocation: f64,
}

#[derive(Debug, Clone)]
pub struct SignalEngine {
    indicators: IndicatorSettings,
    classifier: RegimeClassifier,
    rebalancer: Rebalancer,
}

impl SignalEngine {
    pub fn new(config: EngineConfig) -> Result<Self, VixboosterError> {
        config.indicators.validate()?;
        Ok(Self {
            indicators: config.indicators,
            classifier: RegimeClassifier::new(config.thresholds)?,
            rebalancer: Rebalancer::new(config.rebalance)?,
        })
    }

    pub fn indicators(&self) -> &IndicatorSettings {
        &self.indicators
    }

    pub fn classifier(&self) -> &RegimeClassifier {
        &self.classifier
    }

    pub fn rebalancer(&self) -> &Rebalancer {
        &self.rebalancer
    }

    pub fn signal(
        &self,
        risk_proxy: &PriceSeries,
        volatility: &PriceSeries,
    ) -> Result<Signal, VixboosterError> {
        let snapshot = compute_snapshot(risk_proxy, volatility, &self.indicators)?;
        let decision = self.classifier.classify(&snapshot.signal_inputs())?;
        Ok(Signal { snapshot, decision })
    }

    pub fn evaluate(
        &self,
        risk_proxy: &PriceSeries,
        volatility: &PriceSeries,
        holdings: &Holdings,
        prices: &AssetPrices,
        sentiment: Sentiment,
    ) -> Result<Evaluation, VixboosterError> {
        let Signal { snapshot, decision } = self.signal(risk_proxy, volatility)?;
        let (valuation, trade) =
            self.rebalancer
                .plan(decision.target_allocation, holdings, prices)?;
        Ok(Evaluation {
            snapshot,
            decision,
            valuation,
            trade,
            sentiment,
        })
    }

    /// Regime for each of the last `days` risk-proxy dates with full history.
    ///
    /// Volatility is the latest close on or before each date. Dates that
    /// precede the volatility series are skipped.
    pub fn timeline(
        &self,
        risk_proxy: &PriceSeries,
        volatility: &PriceSeries,
        days: usize,
    ) -> Result<Vec<TimelineEntry>, VixboosterError> {
        risk_proxy.require(self.indicators.required_history())?;

        let points = risk_proxy.points();
        let sma = calculate_sma(points, self.indicators.long_window);
        let rsi = calculate_rsi(points, self.indicators.short_window, self.indicators.method);
        let start = points.len().saturating_sub(days);

        let mut entries = Vec::with_capacity(points.len() - start);
        for i in start..points.len() {
            let (ma, osc) = (sma.values[i], rsi.values[i]);
            if !(ma.valid && osc.valid) {
                continue;
            }
            let Some(vol) = volatility.as_of(points[i].date) else {
                debug!(date = %points[i].date, "no volatility close yet, skipping");
                continue;
            };

            let inputs = SignalInputs {
                price: points[i].close,
                moving_average: ma.value,
                oscillator: osc.value,
                volatility_level: vol.close,
            };
            let decision = self.classifier.classify(&inputs)?;
            entries.push(TimelineEntry {
                date: points[i].date,
                price: inputs.price,
                moving_average: inputs.moving_average,
                oscillator: inputs.oscillator,
                volatility_level: inputs.volatility_level,
                regime: decision.regime,
                target_allocation: decision.target_allocation,
            });
        }

        if entries.is_empty() && days > 0 {
            return Err(VixboosterError::MissingIndicator {
                name: "volatility_level".into(),
                reason: format!("{} has no closes in the requested window", volatility.name()),
            });
        }
        Ok(entries)
    }
}
