//! Close-price series for a single instrument.

use crate::domain::error::VixboosterError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Chronologically increasing closes with no duplicate dates.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    name: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(name: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, VixboosterError> {
        let name = name.into();

        if let Some(bad) = points.iter().find(|p| !p.close.is_finite()) {
            return Err(VixboosterError::InvalidSeries {
                series: name,
                reason: format!("non-finite close on {}", bad.date),
            });
        }

        if let Some(pair) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            let reason = if pair[1].date == pair[0].date {
                format!("duplicate date {}", pair[1].date)
            } else {
                format!("{} follows {}", pair[1].date, pair[0].date)
            };
            return Err(VixboosterError::InvalidSeries {
                series: name,
                reason,
            });
        }

        Ok(Self { name, points })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// The last `n` points (or all of them if the series is shorter).
    pub fn tail(&self, n: usize) -> &[PricePoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }

    /// The latest point dated on or before `date`.
    pub fn as_of(&self, date: NaiveDate) -> Option<&PricePoint> {
        let idx = self.points.partition_point(|p| p.date <= date);
        idx.checked_sub(1).map(|i| &self.points[i])
    }

    /// Fails with `InsufficientHistory` unless at least `minimum` points exist.
    pub fn require(&self, minimum: usize) -> Result<(), VixboosterError> {
        if self.points.len() < minimum {
            return Err(VixboosterError::InsufficientHistory {
                series: self.name.clone(),
                bars: self.points.len(),
                minimum,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn sample() -> PriceSeries {
        PriceSeries::new(
            "SPY",
            vec![
                PricePoint::new(date(2), 100.0),
                PricePoint::new(date(3), 101.0),
                PricePoint::new(date(5), 99.5),
            ],
        )
        .unwrap()
    }

    #[test]
    fn accessors() {
        let series = sample();
        assert_eq!(series.name(), "SPY");
        assert_eq!(series.len(), 3);
        assert_eq!(series.latest().unwrap().date, date(5));
        assert_eq!(series.closes(), vec![100.0, 101.0, 99.5]);
    }

    #[test]
    fn tail_clamps_to_length() {
        let series = sample();
        assert_eq!(series.tail(2).len(), 2);
        assert_eq!(series.tail(2)[0].date, date(3));
        assert_eq!(series.tail(10).len(), 3);
    }

    #[test]
    fn as_of_picks_latest_not_after() {
        let series = sample();
        assert_eq!(series.as_of(date(4)).unwrap().date, date(3));
        assert_eq!(series.as_of(date(5)).unwrap().date, date(5));
        assert_eq!(series.as_of(date(31)).unwrap().date, date(5));
        assert!(series.as_of(date(1)).is_none());
    }

    #[test]
    fn rejects_duplicate_dates() {
        let err = PriceSeries::new(
            "SPY",
            vec![PricePoint::new(date(2), 1.0), PricePoint::new(date(2), 2.0)],
        )
        .unwrap_err();
        assert!(
            matches!(err, VixboosterError::InvalidSeries { reason, .. } if reason.contains("duplicate"))
        );
    }

    #[test]
    fn rejects_unordered_dates() {
        let err = PriceSeries::new(
            "SPY",
            vec![PricePoint::new(date(3), 1.0), PricePoint::new(date(2), 2.0)],
        )
        .unwrap_err();
        assert!(matches!(err, VixboosterError::InvalidSeries { .. }));
    }

    #[test]
    fn rejects_non_finite_close() {
        let err = PriceSeries::new("VIX", vec![PricePoint::new(date(2), f64::NAN)]).unwrap_err();
        assert!(matches!(err, VixboosterError::InvalidSeries { series, .. } if series == "VIX"));
    }

    #[test]
    fn require_reports_shortfall() {
        let series = sample();
        assert!(series.require(3).is_ok());
        let err = series.require(200).unwrap_err();
        assert!(matches!(
            err,
            VixboosterError::InsufficientHistory {
                bars: 3,
                minimum: 200,
                ..
            }
        ));
    }

    #[test]
    fn empty_series_is_allowed() {
        let series = PriceSeries::new("SPY", vec![]).unwrap();
        assert!(series.is_empty());
        assert!(series.latest().is_none());
    }
}
