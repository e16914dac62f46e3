#![allow(dead_code)]

use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::HashMap;
use vixbooster::domain::engine::{EngineConfig, SignalEngine};
use vixbooster::domain::error::VixboosterError;
use vixbooster::domain::holdings::Holdings;
use vixbooster::domain::indicator::OscillatorMethod;
use vixbooster::domain::price_series::{PricePoint, PriceSeries};
use vixbooster::domain::snapshot::IndicatorSettings;
use vixbooster::ports::data_port::MarketDataPort;
use vixbooster::ports::holdings_port::HoldingsPort;

pub struct MockMarketData {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_closes(mut self, symbol: &str, closes: &[f64]) -> Self {
        self.data.insert(symbol.to_string(), points(closes));
        self
    }

    pub fn with_points(mut self, symbol: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), points);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockMarketData {
    fn fetch_closes(&self, symbol: &str) -> Result<PriceSeries, VixboosterError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(VixboosterError::DataSource {
                reason: reason.clone(),
            });
        }
        PriceSeries::new(symbol, self.data.get(symbol).cloned().unwrap_or_default())
    }
}

/// In-memory holdings store.
pub struct MemoryHoldings {
    pub stored: RefCell<Option<Holdings>>,
}

impl MemoryHoldings {
    pub fn empty() -> Self {
        Self {
            stored: RefCell::new(None),
        }
    }

    pub fn with(holdings: Holdings) -> Self {
        Self {
            stored: RefCell::new(Some(holdings)),
        }
    }
}

impl HoldingsPort for MemoryHoldings {
    fn load(&self) -> Result<Option<Holdings>, VixboosterError> {
        Ok(*self.stored.borrow())
    }

    fn save(&self, holdings: &Holdings) -> Result<(), VixboosterError> {
        *self.stored.borrow_mut() = Some(*holdings);
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive calendar days starting 2024-01-02.
pub fn points(closes: &[f64]) -> Vec<PricePoint> {
    let start = date(2024, 1, 2);
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PricePoint::new(start + chrono::Duration::days(i as i64), c))
        .collect()
}

pub fn series(name: &str, closes: &[f64]) -> PriceSeries {
    PriceSeries::new(name, points(closes)).unwrap()
}

pub fn flat(level: f64, n: usize) -> Vec<f64> {
    vec![level; n]
}

pub fn ramp(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Engine with a 5-day moving average and 4-day oscillator so scenarios fit
/// in a handful of closes. Thresholds are the defaults.
pub fn short_engine() -> SignalEngine {
    SignalEngine::new(short_config()).unwrap()
}

pub fn short_config() -> EngineConfig {
    EngineConfig {
        indicators: IndicatorSettings {
            long_window: 5,
            short_window: 4,
            method: OscillatorMethod::Window,
        },
        ..EngineConfig::default()
    }
}

// Last five closes 104,101,105,103,106: average 103.8, oscillator 58.33.
pub const BULL_PULLBACK: [f64; 6] = [100.0, 104.0, 101.0, 105.0, 103.0, 106.0];

// Last five closes 110,104,108,103,105: average 106, oscillator 35.29.
pub const BEAR_RALLY: [f64; 6] = [112.0, 110.0, 104.0, 108.0, 103.0, 105.0];

// Last five closes 110,106,108,104,103: average 106.2, oscillator 18.18.
pub const BEAR_CAPITULATION: [f64; 6] = [112.0, 110.0, 106.0, 108.0, 104.0, 103.0];
