//! Turns a target allocation fraction into a whole-share trade.
//!
//! total   = risk_qty * risk_px + defensive_qty * defensive_px + cash
//! target  = total * fraction
//! current = risk_qty * risk_px
//! delta   = target - current
//!
//! |delta| <= deadband → Hold; otherwise Buy/Sell floor(|delta| / risk_px).

use crate::domain::error::VixboosterError;
use crate::domain::holdings::{AssetPrices, Holdings};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeDirection {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeDirection::Buy => write!(f, "BUY"),
            TradeDirection::Sell => write!(f, "SELL"),
            TradeDirection::Hold => write!(f, "HOLD"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradeInstruction {
    pub direction: TradeDirection,
    pub quantity: u64,
    pub notional_amount: f64,
}

impl TradeInstruction {
    pub fn hold() -> Self {
        Self {
            direction: TradeDirection::Hold,
            quantity: 0,
            notional_amount: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Valuation {
    pub total_assets: f64,
    pub target_value: f64,
    pub current_value: f64,
    pub delta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RebalanceSettings {
    pub minimum_trade_notional: f64,
}

impl Default for RebalanceSettings {
    fn default() -> Self {
        Self {
            minimum_trade_notional: 1_000.0,
        }
    }
}

impl RebalanceSettings {
    pub fn validate(&self) -> Result<(), VixboosterError> {
        let v = self.minimum_trade_notional;
        if !(v.is_finite() && v >= 0.0) {
            return Err(VixboosterError::invalid_configuration(
                "minimum_trade_notional",
                format!("{v} must be a non-negative number"),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Rebalancer {
    settings: RebalanceSettings,
}

impl Rebalancer {
    pub fn new(settings: RebalanceSettings) -> Result<Self, VixboosterError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &RebalanceSettings {
        &self.settings
    }

    pub fn valuation(
        &self,
        target_allocation: f64,
        holdings: &Holdings,
        prices: &AssetPrices,
    ) -> Result<Valuation, VixboosterError> {
        if !(0.0..=1.0).contains(&target_allocation) {
            return Err(VixboosterError::invalid_configuration(
                "target_allocation",
                format!("{target_allocation} is outside [0, 1]"),
            ));
        }
        holdings.validate()?;
        prices.validate(holdings)?;

        let current_value = holdings.risk_asset_quantity as f64 * prices.risk_asset;
        let total_assets = current_value
            + holdings.defensive_asset_quantity as f64 * prices.defensive_asset
            + holdings.cash_amount;
        let target_value = total_assets * target_allocation;

        Ok(Valuation {
            total_assets,
            target_value,
            current_value,
            delta: target_value - current_value,
        })
    }

    pub fn rebalance(
        &self,
        target_allocation: f64,
        holdings: &Holdings,
        prices: &AssetPrices,
    ) -> Result<TradeInstruction, VixboosterError> {
        self.plan(target_allocation, holdings, prices)
            .map(|(_, instruction)| instruction)
    }

    /// Valuation and the resulting instruction together.
    pub fn plan(
        &self,
        target_allocation: f64,
        holdings: &Holdings,
        prices: &AssetPrices,
    ) -> Result<(Valuation, TradeInstruction), VixboosterError> {
        let valuation = self.valuation(target_allocation, holdings, prices)?;
        let instruction = self.instruction_for(valuation.delta, prices.risk_asset);
        Ok((valuation, instruction))
    }

    fn instruction_for(&self, delta: f64, risk_price: f64) -> TradeInstruction {
        if delta.abs() <= self.settings.minimum_trade_notional {
            return TradeInstruction::hold();
        }
        let direction = if delta > 0.0 {
            TradeDirection::Buy
        } else {
            TradeDirection::Sell
        };
        TradeInstruction {
            direction,
            quantity: (delta.abs() / risk_price).floor() as u64,
            notional_amount: delta.abs(),
        }
    }
}
