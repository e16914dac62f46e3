//! Simple moving average.
//!
//! Each valid point is the arithmetic mean of the `period` closes ending at
//! that date. The first `period - 1` points are warmup.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price_series::PricePoint;

pub fn calculate_sma(points: &[PricePoint], period: usize) -> IndicatorSeries {
    let values = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            if period == 0 || i + 1 < period {
                IndicatorPoint::warmup(p.date)
            } else {
                IndicatorPoint::ready(p.date, mean_close(&points[i + 1 - period..=i]))
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}

pub(crate) fn mean_close(window: &[PricePoint]) -> f64 {
    window.iter().map(|p| p.close).sum::<f64>() / window.len() as f64
}
