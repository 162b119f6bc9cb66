//! Active-case session
//!
//! Holds at most one case in memory. Every mutation recomputes the derived values
//! it affects before returning, so callers only ever observe a consistent case.

use tracing::{debug, info, instrument, warn};

use crate::application::services::CaseStore;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::investment::require_description;
use crate::domain::{
    regenerate_projection, require_finite, validate_horizon, AmortizationData, Case,
    DailyConsumptionRecord, DeferredInvestmentItem, Depreciation, DomainError,
    EnergyAnalysisItem, FixedAsset, MonthlyConsumptionRecord, PayrollRole, Projection, WaccRow,
    WaccTable, WorkingCapitalItem,
};

/// Explicit context for the single active case and its store.
pub struct CaseSession {
    store: CaseStore,
    active: Option<Case>,
}

impl CaseSession {
    /// Create a session without an active case.
    pub fn new(store: CaseStore) -> Self {
        Self {
            store,
            active: None,
        }
    }

    pub fn store(&self) -> &CaseStore {
        &self.store
    }

    /// Replace the active case with a fresh one named `name`.
    #[instrument(skip(self))]
    pub fn start_new_case(&mut self, name: &str) -> ApplicationResult<&Case> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::invalid_input("case name", "must not be empty").into());
        }
        let case = Case::new(name);
        info!("started case '{}' ({})", case.name, case.filename);
        Ok(self.active.insert(case))
    }

    /// Drop the active case from memory and return it.
    pub fn close_case(&mut self) -> Option<Case> {
        let closed = self.active.take();
        if let Some(case) = &closed {
            debug!("closed case '{}'", case.name);
        }
        closed
    }

    pub fn has_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> ApplicationResult<&Case> {
        self.active.as_ref().ok_or(ApplicationError::NoActiveCase)
    }

    pub fn active_mut(&mut self) -> ApplicationResult<&mut Case> {
        self.active.as_mut().ok_or(ApplicationError::NoActiveCase)
    }

    /// Persist the active case; the in-memory case stays usable if this fails.
    #[instrument(skip(self))]
    pub fn save_active(&mut self) -> ApplicationResult<String> {
        let case = self.active.as_mut().ok_or(ApplicationError::NoActiveCase)?;
        self.store.save(case).inspect_err(|e| {
            warn!("save failed, keeping case '{}' in memory: {}", case.name, e);
        })
    }

    /// Load `filename` and make it the active case; on failure nothing changes.
    #[instrument(skip(self))]
    pub fn load_case(&mut self, filename: &str) -> ApplicationResult<&Case> {
        let case = self.store.load(filename)?;
        info!("opened case '{}'", case.name);
        Ok(self.active.insert(case))
    }

    pub fn list_cases(&self) -> ApplicationResult<Vec<String>> {
        self.store.list()
    }

    // ---------------------------------------------------------------
    // Demand projection
    // ---------------------------------------------------------------

    /// Replace the projection inputs (1 to 20 years) and return the yearly demand.
    pub fn set_projection(
        &mut self,
        initial_demand: f64,
        growth_rate: f64,
        years: i32,
    ) -> ApplicationResult<&[i64]> {
        let case = self.active_mut()?;
        require_finite("initial demand", initial_demand)?;
        require_finite("growth rate", growth_rate)?;
        validate_horizon(years)?;
        case.projection = Projection::new(initial_demand, growth_rate, years);
        Ok(&case.projection.results)
    }

    // ---------------------------------------------------------------
    // Investment
    // ---------------------------------------------------------------

    pub fn add_fixed_asset(&mut self, mut asset: FixedAsset) -> ApplicationResult<&FixedAsset> {
        let investment = &mut self.active_mut()?.investment;
        require_description("fixed assets", &asset.description)?;
        require_finite("unit value", asset.unit_value())?;
        require_finite_depreciation(&asset.depreciation)?;
        asset.recompute_total();
        investment.fixed_assets.push(asset);
        Ok(&investment.fixed_assets[investment.fixed_assets.len() - 1])
    }

    pub fn update_depreciation(
        &mut self,
        index: usize,
        depreciation: Depreciation,
    ) -> ApplicationResult<&FixedAsset> {
        let investment = &mut self.active_mut()?.investment;
        require_finite_depreciation(&depreciation)?;
        Ok(investment.update_depreciation(index, depreciation)?)
    }

    pub fn add_deferred_item(
        &mut self,
        mut item: DeferredInvestmentItem,
    ) -> ApplicationResult<&DeferredInvestmentItem> {
        let investment = &mut self.active_mut()?.investment;
        require_description("deferred investment", &item.description)?;
        require_finite("unit value", item.unit_value())?;
        item.recompute_total();
        investment.deferred_items.push(item);
        Ok(&investment.deferred_items[investment.deferred_items.len() - 1])
    }

    /// Add a working-capital row; the legacy scalar is resynced.
    pub fn add_working_capital_item(
        &mut self,
        mut item: WorkingCapitalItem,
    ) -> ApplicationResult<f64> {
        let investment = &mut self.active_mut()?.investment;
        require_description("working capital", &item.description)?;
        require_finite("unit value", item.unit_value())?;
        item.recompute_total();
        investment.add_working_capital_item(item);
        Ok(investment.working_capital())
    }

    /// Remove the working-capital row at `index`; returns the new aggregate.
    pub fn remove_working_capital_item(&mut self, index: usize) -> ApplicationResult<f64> {
        let investment = &mut self.active_mut()?.investment;
        investment.remove_working_capital_item(index)?;
        Ok(investment.working_capital())
    }

    pub fn add_energy_item(&mut self, item: EnergyAnalysisItem) -> ApplicationResult<()> {
        let investment = &mut self.active_mut()?.investment;
        require_description("energy analysis", &item.description)?;
        require_finite("energy value", item.value)?;
        investment.energy_items.push(item);
        Ok(())
    }

    /// Record a month of consumption; returns its cost.
    pub fn add_monthly_consumption(&mut self, kwh: f64) -> ApplicationResult<f64> {
        let investment = &mut self.active_mut()?.investment;
        require_finite("kwh", kwh)?;
        let record = MonthlyConsumptionRecord::new(kwh);
        let cost = record.cost();
        investment.add_monthly_consumption(record);
        Ok(cost)
    }

    /// Record a daily consumption profile; returns its annual total.
    pub fn add_daily_consumption(
        &mut self,
        daily_kwh: f64,
        unit_cost: f64,
    ) -> ApplicationResult<f64> {
        let investment = &mut self.active_mut()?.investment;
        require_finite("daily kwh", daily_kwh)?;
        require_finite("unit cost", unit_cost)?;
        let record = DailyConsumptionRecord::new(daily_kwh, unit_cost);
        let total = record.total();
        investment.daily_consumption.push(record);
        Ok(total)
    }

    // ---------------------------------------------------------------
    // Payroll
    // ---------------------------------------------------------------

    /// Change the planning horizon and rebuild the payroll projection for it.
    #[instrument(skip(self))]
    pub fn set_payroll_horizon(&mut self, years: i32) -> ApplicationResult<()> {
        let case = self.active_mut()?;
        let horizon = validate_horizon(years)?;
        case.projection.years = years;
        case.projection.recompute();
        regenerate_projection(&mut case.payroll, horizon);
        Ok(())
    }

    /// Add a role to the base roster and rebuild every projected year.
    #[instrument(skip(self, role), fields(title = %role.title))]
    pub fn add_payroll_role(&mut self, role: PayrollRole) -> ApplicationResult<()> {
        let case = self.active_mut()?;
        require_finite_role(&role)?;
        let horizon = validate_horizon(case.projection.years)?;
        case.payroll.push_base_role(role);
        regenerate_projection(&mut case.payroll, horizon);
        Ok(())
    }

    // ---------------------------------------------------------------
    // Financing, WACC, amortization
    // ---------------------------------------------------------------

    /// Set the own-capital share; returns `(own, external)`.
    pub fn set_financing(&mut self, own_pct: f64) -> ApplicationResult<(f64, f64)> {
        let financing = &mut self.active_mut()?.financing;
        financing.set_own_pct(own_pct)?;
        Ok((financing.own_pct(), financing.external_pct()))
    }

    pub fn add_wacc_row(
        &mut self,
        table: WaccTable,
        name: &str,
        values: Vec<f64>,
    ) -> ApplicationResult<&WaccRow> {
        let wacc = &mut self.active_mut()?.wacc;
        for value in &values {
            require_finite("wacc value", *value)?;
        }
        Ok(wacc.add_row(table, name, values)?)
    }

    pub fn set_amortization(&mut self, amortization: AmortizationData) -> ApplicationResult<()> {
        let case = self.active_mut()?;
        if amortization.years == 0 {
            return Err(
                DomainError::invalid_input("amortization years", "must be at least 1").into(),
            );
        }
        require_finite("annual rate", amortization.annual_rate)?;
        case.amortization = amortization;
        Ok(())
    }
}

fn require_finite_depreciation(depreciation: &Depreciation) -> Result<(), DomainError> {
    require_finite("residual pct", depreciation.residual_pct)?;
    require_finite("residual amount pct", depreciation.residual_amount_pct)?;
    Ok(())
}

fn require_finite_role(role: &PayrollRole) -> Result<(), DomainError> {
    let inputs = [
        ("nominal salary", role.nominal_salary()),
        ("overtime", role.overtime),
        ("supplemental hours", role.supplemental_hours),
        ("night shift", role.night_shift),
        ("commissions", role.commissions),
        ("advances", role.advances),
        ("deductions", role.deductions),
        ("biweekly advance", role.biweekly_advance),
    ];
    for (field, value) in inputs {
        require_finite(field, value)?;
    }
    Ok(())
}
