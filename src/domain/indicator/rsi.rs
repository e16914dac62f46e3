//! RSI (Relative Strength Index) oscillator.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100. Else if avg_gain == 0: RSI = 0.
//!
//! Two averaging methods:
//! - Window: simple mean of the last n gains/losses (needs n + 1 closes)
//! - Wilder: first average is the simple mean of the first n changes,
//!   subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Warmup: first n points are invalid under either method.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, OscillatorMethod};
use crate::domain::price_series::PricePoint;

pub fn calculate_rsi(
    points: &[PricePoint],
    period: usize,
    method: OscillatorMethod,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Rsi { period, method };

    if period == 0 || points.len() < 2 {
        return IndicatorSeries {
            indicator_type,
            values: points.iter().map(|p| IndicatorPoint::warmup(p.date)).collect(),
        };
    }

    let (gains, losses) = split_changes(points);

    let mut values = Vec::with_capacity(points.len());
    values.push(IndicatorPoint::warmup(points[0].date));

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for (i, point) in points.iter().enumerate().skip(1) {
        let change_idx = i - 1;

        if change_idx + 1 < period {
            values.push(IndicatorPoint::warmup(point.date));
            continue;
        }

        let window = change_idx + 1 - period..=change_idx;
        match method {
            OscillatorMethod::Window => {
                avg_gain = gains[window.clone()].iter().sum::<f64>() / period as f64;
                avg_loss = losses[window].iter().sum::<f64>() / period as f64;
            }
            OscillatorMethod::Wilder if change_idx + 1 == period => {
                avg_gain = gains[window.clone()].iter().sum::<f64>() / period as f64;
                avg_loss = losses[window].iter().sum::<f64>() / period as f64;
            }
            OscillatorMethod::Wilder => {
                avg_gain = (avg_gain * (period - 1) as f64 + gains[change_idx]) / period as f64;
                avg_loss = (avg_loss * (period - 1) as f64 + losses[change_idx]) / period as f64;
            }
        }

        values.push(IndicatorPoint::ready(
            point.date,
            rsi_from_averages(avg_gain, avg_loss),
        ));
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}

/// Oscillator over exactly the closes given, treating them as one window.
///
/// `closes` must hold at least two values; the window length is
/// `closes.len() - 1` day-over-day changes.
pub fn window_rsi(closes: &[f64]) -> f64 {
    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for pair in closes.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gain_sum += change;
        } else if change < 0.0 {
            loss_sum -= change;
        }
    }
    let n = closes.len().saturating_sub(1).max(1) as f64;
    rsi_from_averages(gain_sum / n, loss_sum / n)
}

pub(crate) fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}

fn split_changes(points: &[PricePoint]) -> (Vec<f64>, Vec<f64>) {
    points
        .windows(2)
        .map(|w| {
            let change = w[1].close - w[0].close;
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip()
}
