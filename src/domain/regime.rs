//! Regime classification: a fixed decision table over price, moving average,
//! oscillator and volatility.
//!
//! Precedence (first match wins):
//! 1. bear (`price <= moving_average`):
//!    - oscillator > bear_exit → `RedAlert`, 0
//!    - oscillator < bear_enter and volatility > panic → `ContrarianEntry`, base
//!    - otherwise → `BearDefense`, 0
//! 2. bull and oscillator > exit_profit → `ProfitTaking`, base
//! 3. bull and oscillator < bull_enter:
//!    - volatility > tier2 → `StrongAttack`, boost2
//!    - volatility > tier1 → `ModerateAttack`, boost1
//!    - otherwise → `RoutineAttack`, base
//! 4. otherwise → `Rest`, 0
//!
//! There is no memory between evaluations.

use crate::domain::error::VixboosterError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regime {
    RedAlert,
    ContrarianEntry,
    BearDefense,
    ProfitTaking,
    StrongAttack,
    ModerateAttack,
    RoutineAttack,
    Rest,
}

impl Regime {
    pub const ALL: [Regime; 8] = [
        Regime::RedAlert,
        Regime::ContrarianEntry,
        Regime::BearDefense,
        Regime::ProfitTaking,
        Regime::StrongAttack,
        Regime::ModerateAttack,
        Regime::RoutineAttack,
        Regime::Rest,
    ];

    /// Stable tag used in serialized output.
    pub fn tag(&self) -> &'static str {
        match self {
            Regime::RedAlert => "RedAlert",
            Regime::ContrarianEntry => "ContrarianEntry",
            Regime::BearDefense => "BearDefense",
            Regime::ProfitTaking => "ProfitTaking",
            Regime::StrongAttack => "StrongAttack",
            Regime::ModerateAttack => "ModerateAttack",
            Regime::RoutineAttack => "RoutineAttack",
            Regime::Rest => "Rest",
        }
    }

    pub fn is_bull(&self) -> bool {
        !matches!(
            self,
            Regime::RedAlert | Regime::ContrarianEntry | Regime::BearDefense
        )
    }

    fn rationale(&self) -> &'static str {
        match self {
            Regime::RedAlert => "bear rally exhausted, liquidate risk asset",
            Regime::ContrarianEntry => "extreme panic, speculative rebound buy",
            Regime::BearDefense => "avoid bear market",
            Regime::ProfitTaking => "overheated, take profit back to base",
            Regime::StrongAttack => "bull pullback under heavy fear, maximum boost",
            Regime::ModerateAttack => "bull pullback under elevated fear, moderate boost",
            Regime::RoutineAttack => "bull trend with calm volatility, base position",
            Regime::Rest => "short-term overheated, stay out",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Threshold table for the classifier. Validated once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeThresholds {
    pub bull_enter_oscillator: f64,
    pub bear_enter_oscillator: f64,
    pub exit_profit_oscillator: f64,
    pub bear_exit_oscillator: f64,
    pub volatility_tier1: f64,
    pub volatility_tier2: f64,
    pub panic_volatility: f64,
    pub base_allocation: f64,
    pub boost_allocation1: f64,
    pub boost_allocation2: f64,
}

impl Default for RegimeThresholds {
    fn default() -> Self {
        Self {
            bull_enter_oscillator: 70.0,
            bear_enter_oscillator: 35.0,
            exit_profit_oscillator: 80.0,
            bear_exit_oscillator: 35.0,
            volatility_tier1: 20.0,
            volatility_tier2: 30.0,
            panic_volatility: 33.0,
            base_allocation: 0.20,
            boost_allocation1: 0.40,
            boost_allocation2: 0.60,
        }
    }
}

impl RegimeThresholds {
    pub fn validate(&self) -> Result<(), VixboosterError> {
        let levels = [
            ("bull_enter_oscillator", self.bull_enter_oscillator),
            ("bear_enter_oscillator", self.bear_enter_oscillator),
            ("exit_profit_oscillator", self.exit_profit_oscillator),
            ("bear_exit_oscillator", self.bear_exit_oscillator),
            ("volatility_tier1", self.volatility_tier1),
            ("volatility_tier2", self.volatility_tier2),
            ("panic_volatility", self.panic_volatility),
        ];
        for (key, value) in levels {
            if !value.is_finite() {
                return Err(VixboosterError::invalid_configuration(key, "must be a finite number"));
            }
        }

        let allocations = [
            ("base_allocation", self.base_allocation),
            ("boost_allocation1", self.boost_allocation1),
            ("boost_allocation2", self.boost_allocation2),
        ];
        for (key, value) in allocations {
            if !(0.0..=1.0).contains(&value) {
                return Err(VixboosterError::invalid_configuration(
                    key,
                    format!("{value} is outside [0, 1]"),
                ));
            }
        }

        if self.bear_exit_oscillator < self.bear_enter_oscillator {
            return Err(VixboosterError::invalid_configuration(
                "bear_exit_oscillator",
                format!(
                    "{} is below bear_enter_oscillator {}",
                    self.bear_exit_oscillator, self.bear_enter_oscillator
                ),
            ));
        }

        Ok(())
    }

    /// Target fraction attached to a regime under these thresholds.
    pub fn allocation_for(&self, regime: Regime) -> f64 {
        match regime {
            Regime::RedAlert | Regime::BearDefense | Regime::Rest => 0.0,
            Regime::ContrarianEntry | Regime::ProfitTaking | Regime::RoutineAttack => {
                self.base_allocation
            }
            Regime::ModerateAttack => self.boost_allocation1,
            Regime::StrongAttack => self.boost_allocation2,
        }
    }
}

/// The four numbers the classifier reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalInputs {
    pub price: f64,
    pub moving_average: f64,
    pub oscillator: f64,
    pub volatility_level: f64,
}

impl SignalInputs {
    fn check_finite(&self) -> Result<(), VixboosterError> {
        let fields = [
            ("price", self.price),
            ("moving_average", self.moving_average),
            ("oscillator", self.oscillator),
            ("volatility_level", self.volatility_level),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(VixboosterError::MissingIndicator {
                    name: name.to_string(),
                    reason: format!("{value} is not a finite number"),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegimeDecision {
    pub regime: Regime,
    pub target_allocation: f64,
    /// Display text only.
    pub rationale: String,
}

#[derive(Debug, Clone)]
pub struct RegimeClassifier {
    thresholds: RegimeThresholds,
}

impl RegimeClassifier {
    pub fn new(thresholds: RegimeThresholds) -> Result<Self, VixboosterError> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    pub fn thresholds(&self) -> &RegimeThresholds {
        &self.thresholds
    }

    pub fn classify(&self, inputs: &SignalInputs) -> Result<RegimeDecision, VixboosterError> {
        inputs.check_finite()?;

        let regime = self.regime_for(inputs);
        let decision = RegimeDecision {
            regime,
            target_allocation: self.thresholds.allocation_for(regime),
            rationale: regime.rationale().to_string(),
        };

        debug!(
            price = inputs.price,
            moving_average = inputs.moving_average,
            oscillator = inputs.oscillator,
            volatility = inputs.volatility_level,
            regime = %decision.regime,
            target = decision.target_allocation,
            "classified"
        );
        Ok(decision)
    }

    fn regime_for(&self, inputs: &SignalInputs) -> Regime {
        let t = &self.thresholds;
        let osc = inputs.oscillator;
        let vol = inputs.volatility_level;

        if inputs.price <= inputs.moving_average {
            return if osc > t.bear_exit_oscillator {
                Regime::RedAlert
            } else if osc < t.bear_enter_oscillator && vol > t.panic_volatility {
                Regime::ContrarianEntry
            } else {
                Regime::BearDefense
            };
        }

        if osc > t.exit_profit_oscillator {
            Regime::ProfitTaking
        } else if osc < t.bull_enter_oscillator {
            if vol > t.volatility_tier2 {
                Regime::StrongAttack
            } else if vol > t.volatility_tier1 {
                Regime::ModerateAttack
            } else {
                Regime::RoutineAttack
            }
        } else {
            Regime::Rest
        }
    }
}
