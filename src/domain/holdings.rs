//! User holdings snapshot and the prices used to value it.

use crate::domain::error::VixboosterError;
use serde::{Deserialize, Serialize};

/// Read-only view of what the user owns. The core never writes it back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Holdings {
    pub risk_asset_quantity: u64,
    /// Informational; only contributes to total assets.
    pub defensive_asset_quantity: u64,
    #[serde(rename = "cash")]
    pub cash_amount: f64,
}

impl Holdings {
    pub fn new(risk_asset_quantity: u64, defensive_asset_quantity: u64, cash_amount: f64) -> Self {
        Self {
            risk_asset_quantity,
            defensive_asset_quantity,
            cash_amount,
        }
    }

    pub fn validate(&self) -> Result<(), VixboosterError> {
        if !self.cash_amount.is_finite() {
            return Err(VixboosterError::InvalidHoldings {
                reason: format!("cash {} is not a finite number", self.cash_amount),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetPrices {
    pub risk_asset: f64,
    pub defensive_asset: f64,
}

impl AssetPrices {
    pub fn new(risk_asset: f64, defensive_asset: f64) -> Self {
        Self {
            risk_asset,
            defensive_asset,
        }
    }

    /// The risk-asset price must be positive. The defensive price may be zero
    /// only when nothing of it is held.
    pub fn validate(&self, holdings: &Holdings) -> Result<(), VixboosterError> {
        if !(self.risk_asset.is_finite() && self.risk_asset > 0.0) {
            return Err(VixboosterError::InvalidPrice {
                asset: "risk_asset".into(),
                price: self.risk_asset,
            });
        }
        let defensive_ok = self.defensive_asset.is_finite()
            && (self.defensive_asset > 0.0
                || (self.defensive_asset == 0.0 && holdings.defensive_asset_quantity == 0));
        if !defensive_ok {
            return Err(VixboosterError::InvalidPrice {
                asset: "defensive_asset".into(),
                price: self.defensive_asset,
            });
        }
        Ok(())
    }
}
