//! CSV file market data adapter.
//!
//! One file per symbol: `<base_path>/<SYMBOL>.csv`, with a header row that
//! contains `date` and `close` columns. Any other columns are ignored, so
//! OHLCV exports load unchanged.

use crate::domain::error::VixboosterError;
use crate::domain::price_series::{PricePoint, PriceSeries};
use crate::ports::data_port::MarketDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

pub struct CsvMarketData {
    base_path: PathBuf,
}

impl CsvMarketData {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn column(headers: &csv::StringRecord, name: &str) -> Result<usize, VixboosterError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| VixboosterError::DataSource {
            reason: format!("missing {} column", name),
        })
}

impl MarketDataPort for CsvMarketData {
    fn fetch_closes(&self, symbol: &str) -> Result<PriceSeries, VixboosterError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| VixboosterError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| VixboosterError::DataSource {
            reason: format!("CSV header error in {}: {}", path.display(), e),
        })?;
        let date_col = column(headers, "date")?;
        let close_col = column(headers, "close")?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| VixboosterError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_col).unwrap_or_default().trim();
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                VixboosterError::DataSource {
                    reason: format!("invalid date '{}': {}", date_str, e),
                }
            })?;

            let close_str = record.get(close_col).unwrap_or_default().trim();
            if close_str.is_empty() {
                debug!(symbol, %date, "blank close, skipping row");
                continue;
            }
            let close: f64 = close_str.parse().map_err(|e| VixboosterError::DataSource {
                reason: format!("invalid close value '{}' on {}: {}", close_str, date, e),
            })?;

            points.push(PricePoint::new(date, close));
        }

        points.sort_by_key(|p| p.date);
        info!(symbol, observations = points.len(), "loaded closes");
        PriceSeries::new(symbol, points)
    }
}
