//! Initial investment: fixed assets, deferred investment, working capital, energy
//!
//! Derived values (`total`, `cost`, the working-capital scalar) are private and only
//! written by the recompute methods, so they cannot drift from their inputs.

use serde::{Deserialize, Serialize};

use crate::domain::{require_finite, DomainError};

/// Fixed price per kWh applied to monthly consumption records.
pub const KWH_UNIT_PRICE: f64 = 100.0;
/// Days per year used to annualize daily consumption.
pub const DAYS_PER_YEAR: f64 = 365.0;
/// Description of the working-capital row created from the first monthly consumption.
pub const ELECTRICITY_ITEM_DESCRIPTION: &str = "Electricity consumption";

pub(crate) fn require_description(
    collection: &'static str,
    description: &str,
) -> Result<(), DomainError> {
    if description.trim().is_empty() {
        Err(DomainError::EmptyDescription { collection })
    } else {
        Ok(())
    }
}

/// Machinery and equipment row (annex 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedAsset {
    pub description: String,
    pub measure: String,
    unit_value: f64,
    quantity: i64,
    total: f64,
    /// Legacy mirror of `total`
    cost: f64,
    pub comment: String,
    pub depreciation: Depreciation,
}

/// Depreciation settings of a fixed asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Depreciation {
    /// Method tag, e.g. "straight-line"; empty when not configured
    pub method: String,
    pub residual_pct: f64,
    pub residual_amount_pct: f64,
}

impl Default for Depreciation {
    fn default() -> Self {
        Self {
            method: String::new(),
            residual_pct: 10.0,
            residual_amount_pct: 100.0,
        }
    }
}

impl Default for FixedAsset {
    fn default() -> Self {
        Self {
            description: String::new(),
            measure: String::new(),
            unit_value: 0.0,
            quantity: 0,
            total: 0.0,
            cost: 0.0,
            comment: String::new(),
            depreciation: Depreciation::default(),
        }
    }
}

impl FixedAsset {
    pub fn new(
        description: impl Into<String>,
        measure: impl Into<String>,
        unit_value: f64,
        quantity: i64,
    ) -> Result<Self, DomainError> {
        let description = description.into();
        require_description("fixed assets", &description)?;
        require_finite("unit value", unit_value)?;
        let mut asset = Self {
            description,
            measure: measure.into(),
            unit_value,
            quantity,
            ..Self::default()
        };
        asset.recompute_total();
        Ok(asset)
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// `total = unit_value × quantity`; `cost` follows `total`.
    pub fn recompute_total(&mut self) -> f64 {
        self.total = self.unit_value * self.quantity as f64;
        self.cost = self.total;
        self.total
    }

    pub fn unit_value(&self) -> f64 {
        self.unit_value
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn set_unit_value(&mut self, unit_value: f64) {
        self.unit_value = unit_value;
        self.recompute_total();
    }

    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
        self.recompute_total();
    }
}

/// Deferred (intangible) investment row (annex 2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeferredInvestmentItem {
    pub description: String,
    unit_value: f64,
    quantity: i64,
    total: f64,
    /// Legacy mirror of `total`
    cost: f64,
    pub comment: String,
    pub amortization_years: u32,
}

impl Default for DeferredInvestmentItem {
    fn default() -> Self {
        Self {
            description: String::new(),
            unit_value: 0.0,
            quantity: 0,
            total: 0.0,
            cost: 0.0,
            comment: String::new(),
            amortization_years: 5,
        }
    }
}

impl DeferredInvestmentItem {
    pub fn new(
        description: impl Into<String>,
        unit_value: f64,
        quantity: i64,
    ) -> Result<Self, DomainError> {
        let description = description.into();
        require_description("deferred investment", &description)?;
        require_finite("unit value", unit_value)?;
        let mut item = Self {
            description,
            unit_value,
            quantity,
            ..Self::default()
        };
        item.recompute_total();
        Ok(item)
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn recompute_total(&mut self) -> f64 {
        self.total = self.unit_value * self.quantity as f64;
        self.cost = self.total;
        self.total
    }

    pub fn unit_value(&self) -> f64 {
        self.unit_value
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn set_unit_value(&mut self, unit_value: f64) {
        self.unit_value = unit_value;
        self.recompute_total();
    }

    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
        self.recompute_total();
    }
}

/// Working-capital row (annex 3).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkingCapitalItem {
    pub description: String,
    unit_value: f64,
    quantity: i64,
    total: f64,
}

impl WorkingCapitalItem {
    pub fn new(
        description: impl Into<String>,
        unit_value: f64,
        quantity: i64,
    ) -> Result<Self, DomainError> {
        let description = description.into();
        require_description("working capital", &description)?;
        require_finite("unit value", unit_value)?;
        let mut item = Self {
            description,
            unit_value,
            quantity,
            total: 0.0,
        };
        item.recompute_total();
        Ok(item)
    }

    pub fn recompute_total(&mut self) -> f64 {
        self.total = self.unit_value * self.quantity as f64;
        self.total
    }

    pub fn unit_value(&self) -> f64 {
        self.unit_value
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn set_unit_value(&mut self, unit_value: f64) {
        self.unit_value = unit_value;
        self.recompute_total();
    }

    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
        self.recompute_total();
    }
}

/// Free-form energy analysis row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyAnalysisItem {
    pub description: String,
    pub value: f64,
}

impl EnergyAnalysisItem {
    pub fn new(description: impl Into<String>, value: f64) -> Result<Self, DomainError> {
        let description = description.into();
        require_description("energy analysis", &description)?;
        require_finite("energy value", value)?;
        Ok(Self { description, value })
    }
}

/// Monthly electricity consumption; cost is billed at [`KWH_UNIT_PRICE`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthlyConsumptionRecord {
    kwh: f64,
    cost: f64,
}

impl MonthlyConsumptionRecord {
    pub fn new(kwh: f64) -> Self {
        let mut record = Self { kwh, cost: 0.0 };
        record.recompute();
        record
    }

    pub fn recompute(&mut self) {
        self.cost = self.kwh * KWH_UNIT_PRICE;
    }

    pub fn kwh(&self) -> f64 {
        self.kwh
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn set_kwh(&mut self, kwh: f64) {
        self.kwh = kwh;
        self.recompute();
    }
}

/// Daily electricity consumption, annualized over [`DAYS_PER_YEAR`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyConsumptionRecord {
    daily_kwh: f64,
    annual_kwh: f64,
    unit_cost: f64,
    total: f64,
}

impl DailyConsumptionRecord {
    pub fn new(daily_kwh: f64, unit_cost: f64) -> Self {
        let mut record = Self {
            daily_kwh,
            unit_cost,
            ..Self::default()
        };
        record.recompute();
        record
    }

    pub fn recompute(&mut self) {
        self.annual_kwh = self.daily_kwh * DAYS_PER_YEAR;
        self.total = self.annual_kwh * self.unit_cost;
    }

    pub fn daily_kwh(&self) -> f64 {
        self.daily_kwh
    }

    pub fn annual_kwh(&self) -> f64 {
        self.annual_kwh
    }

    pub fn unit_cost(&self) -> f64 {
        self.unit_cost
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn set_daily_kwh(&mut self, daily_kwh: f64) {
        self.daily_kwh = daily_kwh;
        self.recompute();
    }

    pub fn set_unit_cost(&mut self, unit_cost: f64) {
        self.unit_cost = unit_cost;
        self.recompute();
    }
}

/// All initial-investment inputs of a case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Investment {
    pub fixed_assets: Vec<FixedAsset>,
    pub deferred_items: Vec<DeferredInvestmentItem>,
    working_capital_items: Vec<WorkingCapitalItem>,
    pub energy_items: Vec<EnergyAnalysisItem>,
    pub monthly_consumption: Vec<MonthlyConsumptionRecord>,
    pub daily_consumption: Vec<DailyConsumptionRecord>,
    /// Legacy scalar mirror of [`Investment::total_working_capital`]
    working_capital: f64,
}

impl Investment {
    pub fn total_fixed_assets(&self) -> f64 {
        self.fixed_assets
            .iter()
            .map(FixedAsset::total)
            .fold(0.0, |acc, total| acc + total)
    }

    pub fn total_deferred(&self) -> f64 {
        self.deferred_items
            .iter()
            .map(DeferredInvestmentItem::total)
            .fold(0.0, |acc, total| acc + total)
    }

    pub fn total_working_capital(&self) -> f64 {
        self.working_capital_items
            .iter()
            .map(WorkingCapitalItem::total)
            .fold(0.0, |acc, total| acc + total)
    }

    /// Fixed assets + deferred investment + working capital.
    pub fn total_investment(&self) -> f64 {
        self.total_fixed_assets() + self.total_deferred() + self.total_working_capital()
    }

    /// Copy the summed working-capital rows into the legacy scalar.
    pub fn sync_working_capital_aggregate(&mut self) -> f64 {
        self.working_capital = self.total_working_capital();
        self.working_capital
    }

    /// Legacy working-capital scalar as last synchronized.
    pub fn working_capital(&self) -> f64 {
        self.working_capital
    }

    pub fn working_capital_items(&self) -> &[WorkingCapitalItem] {
        &self.working_capital_items
    }

    pub fn add_working_capital_item(&mut self, item: WorkingCapitalItem) {
        self.working_capital_items.push(item);
        self.sync_working_capital_aggregate();
    }

    pub fn remove_working_capital_item(
        &mut self,
        index: usize,
    ) -> Result<WorkingCapitalItem, DomainError> {
        let len = self.working_capital_items.len();
        if index >= len {
            return Err(DomainError::IndexOutOfRange {
                collection: "working capital",
                index,
                len,
            });
        }
        let removed = self.working_capital_items.remove(index);
        self.sync_working_capital_aggregate();
        Ok(removed)
    }

    /// Append a monthly record; the first one also seeds an electricity row in
    /// working capital priced at that month's cost.
    pub fn add_monthly_consumption(&mut self, record: MonthlyConsumptionRecord) {
        let cost = record.cost();
        self.monthly_consumption.push(record);
        if self.monthly_consumption.len() == 1 {
            let mut electricity = WorkingCapitalItem {
                description: ELECTRICITY_ITEM_DESCRIPTION.to_string(),
                unit_value: cost,
                quantity: 1,
                total: 0.0,
            };
            electricity.recompute_total();
            self.add_working_capital_item(electricity);
        }
    }

    pub fn update_depreciation(
        &mut self,
        index: usize,
        depreciation: Depreciation,
    ) -> Result<&FixedAsset, DomainError> {
        let len = self.fixed_assets.len();
        let asset = self
            .fixed_assets
            .get_mut(index)
            .ok_or(DomainError::IndexOutOfRange {
                collection: "fixed assets",
                index,
                len,
            })?;
        asset.depreciation = depreciation;
        Ok(asset)
    }

    /// Recompute every derived value from inputs and resync the legacy scalar.
    pub fn recompute_all(&mut self) {
        self.fixed_assets.iter_mut().for_each(|a| {
            a.recompute_total();
        });
        self.deferred_items.iter_mut().for_each(|i| {
            i.recompute_total();
        });
        self.working_capital_items.iter_mut().for_each(|i| {
            i.recompute_total();
        });
        self.monthly_consumption
            .iter_mut()
            .for_each(MonthlyConsumptionRecord::recompute);
        self.daily_consumption
            .iter_mut()
            .for_each(DailyConsumptionRecord::recompute);
        self.sync_working_capital_aggregate();
    }
}
