//! Financing split, WACC input tables and loan amortization settings

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Own capital vs. external financing, in percent; the two always sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Financing {
    own_pct: f64,
    external_pct: f64,
}

impl Default for Financing {
    fn default() -> Self {
        Self {
            own_pct: Self::DEFAULT_OWN_PCT,
            external_pct: 100.0 - Self::DEFAULT_OWN_PCT,
        }
    }
}

impl Financing {
    /// Own-capital share used when the caller supplies none.
    pub const DEFAULT_OWN_PCT: f64 = 75.0;

    pub fn own_pct(&self) -> f64 {
        self.own_pct
    }

    pub fn external_pct(&self) -> f64 {
        self.external_pct
    }

    /// Set the own-capital share; the external share becomes the remainder to 100.
    pub fn set_own_pct(&mut self, own_pct: f64) -> Result<(), DomainError> {
        if !(0.0..=100.0).contains(&own_pct) {
            return Err(DomainError::InvalidPercentage(own_pct));
        }
        self.own_pct = own_pct;
        self.external_pct = 100.0 - own_pct;
        Ok(())
    }

    /// Rederive the external share from the stored own share.
    pub fn recompute(&mut self) {
        self.own_pct = self.own_pct.clamp(0.0, 100.0);
        self.external_pct = 100.0 - self.own_pct;
    }
}

/// Named series of yearly values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaccRow {
    pub name: String,
    pub values: Vec<f64>,
}

impl WaccRow {
    pub fn total(&self) -> f64 {
        self.values.iter().fold(0.0, |acc, v| acc + v)
    }
}

/// Which WACC table a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaccTable {
    Profit,
    Equity,
}

impl fmt::Display for WaccTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaccTable::Profit => write!(f, "profit"),
            WaccTable::Equity => write!(f, "equity"),
        }
    }
}

/// WACC input tables (profit and equity series per source entity).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaccData {
    pub profit_table: Vec<WaccRow>,
    pub equity_table: Vec<WaccRow>,
    /// Entered value; no rule derives it from the tables
    pub grand_total: f64,
}

impl WaccData {
    pub fn table(&self, table: WaccTable) -> &[WaccRow] {
        match table {
            WaccTable::Profit => &self.profit_table,
            WaccTable::Equity => &self.equity_table,
        }
    }

    pub fn add_row(
        &mut self,
        table: WaccTable,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<&WaccRow, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::invalid_input("wacc row", "name must not be empty"));
        }
        let rows = match table {
            WaccTable::Profit => &mut self.profit_table,
            WaccTable::Equity => &mut self.equity_table,
        };
        rows.push(WaccRow { name, values });
        Ok(&rows[rows.len() - 1])
    }
}

/// Loan repayment configuration for the external financing share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmortizationData {
    /// Annual interest rate in percent
    pub annual_rate: f64,
    pub institution: String,
    pub years: u32,
}

impl Default for AmortizationData {
    fn default() -> Self {
        Self {
            annual_rate: 0.0,
            institution: String::new(),
            years: 5,
        }
    }
}
