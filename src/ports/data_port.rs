//! Market data port trait.

use crate::domain::error::VixboosterError;
use crate::domain::price_series::{PricePoint, PriceSeries};

pub trait MarketDataPort {
    /// Full available close history for `symbol`, oldest first.
    fn fetch_closes(&self, symbol: &str) -> Result<PriceSeries, VixboosterError>;

    fn latest_close(&self, symbol: &str) -> Result<Option<PricePoint>, VixboosterError> {
        Ok(self.fetch_closes(symbol)?.latest().copied())
    }
}
