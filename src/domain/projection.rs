//! Demand projection over the planning horizon

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Smallest accepted planning horizon, in years.
pub const MIN_HORIZON: i32 = 1;
/// Largest accepted planning horizon, in years.
pub const MAX_HORIZON: i32 = 20;

/// Demand-growth forecast of a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Projection {
    pub initial_demand: f64,
    /// Annual growth rate in percent (e.g. `10.0` for 10 %)
    pub growth_rate: f64,
    pub years: i32,
    /// Rounded demand per projected year
    pub results: Vec<i64>,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            initial_demand: 0.0,
            growth_rate: 0.0,
            years: 5,
            results: Vec::new(),
        }
    }
}

impl Projection {
    pub fn new(initial_demand: f64, growth_rate: f64, years: i32) -> Self {
        let mut projection = Self {
            initial_demand,
            growth_rate,
            years,
            results: Vec::new(),
        };
        projection.recompute();
        projection
    }

    /// Rebuild `results` from the current inputs.
    pub fn recompute(&mut self) {
        self.results = project(self.initial_demand, self.growth_rate, self.years);
    }
}

/// Accept horizons in `MIN_HORIZON..=MAX_HORIZON`.
pub fn validate_horizon(years: i32) -> Result<usize, DomainError> {
    if (MIN_HORIZON..=MAX_HORIZON).contains(&years) {
        Ok(years as usize)
    } else {
        Err(DomainError::InvalidHorizon(i64::from(years)))
    }
}

/// Project demand over `years` periods with compound growth.
///
/// The first period is `initial_demand` itself. Every following period grows the
/// *unrounded* previous value by `growth_rate_pct` percent; only the emitted values
/// are rounded (half to even). A non-positive horizon yields an empty sequence.
pub fn project(initial_demand: f64, growth_rate_pct: f64, years: i32) -> Vec<i64> {
    if years <= 0 {
        return Vec::new();
    }
    let factor = 1.0 + growth_rate_pct / 100.0;

    let mut results = Vec::with_capacity(years as usize);
    let mut current = initial_demand;
    for year in 0..years {
        if year > 0 {
            current *= factor;
        }
        results.push(current.round_ties_even() as i64);
    }
    results
}
