//! Technical indicators over close-price series.
//!
//! - `IndicatorPoint`: one dated value plus a warmup flag
//! - `IndicatorType`: indicator identity and parameters
//! - `IndicatorSeries`: a dated series of indicator values
//! - `OscillatorMethod`: how the relative-strength averages are formed

pub mod rsi;
pub mod sma;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: f64,
}

impl IndicatorPoint {
    pub(crate) fn warmup(date: NaiveDate) -> Self {
        Self {
            date,
            valid: false,
            value: 0.0,
        }
    }

    pub(crate) fn ready(date: NaiveDate, value: f64) -> Self {
        Self {
            date,
            valid: true,
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OscillatorMethod {
    /// Simple averages of gains and losses over the trailing window.
    #[default]
    Window,
    /// Wilder smoothing seeded by the first full window.
    Wilder,
}

impl fmt::Display for OscillatorMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OscillatorMethod::Window => write!(f, "window"),
            OscillatorMethod::Wilder => write!(f, "wilder"),
        }
    }
}

impl FromStr for OscillatorMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "window" | "simple" => Ok(OscillatorMethod::Window),
            "wilder" => Ok(OscillatorMethod::Wilder),
            other => Err(format!("unknown oscillator method '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Rsi {
        period: usize,
        method: OscillatorMethod,
    },
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Rsi {
                period,
                method: OscillatorMethod::Window,
            } => write!(f, "RSI({})", period),
            IndicatorType::Rsi { period, method } => write!(f, "RSI({},{})", period, method),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn latest(&self) -> Option<&IndicatorPoint> {
        self.values.last()
    }

    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|p| p.valid).count()
    }
}
