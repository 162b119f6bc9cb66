//! Payroll roles and their multi-year projection
//!
//! Year 0 of the projection is the base roster. Every other year is derived from it
//! by [`regenerate_projection`], so edits to later years do not survive a rebuild.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Reference salary for the 14th-month bonus.
pub const REFERENCE_SALARY: f64 = 470.0;
/// Days in the reference year for the 14th-month bonus.
pub const REFERENCE_YEAR_DAYS: f64 = 360.0;
/// Employee social-security rate (9.45 %).
pub const EMPLOYEE_CONTRIBUTION_RATE: f64 = 0.0945;
/// Employer social-security rate (12.15 %).
pub const EMPLOYER_CONTRIBUTION_RATE: f64 = 0.1215;
/// Nominal annual salary increase applied to projected years.
pub const SALARY_ESCALATION: f64 = 1.03;

/// One job position's compensation line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollRole {
    pub title: String,
    nominal_salary: f64,
    pub days_worked: u32,
    /// Fixed overtime amount
    pub overtime: f64,
    /// Fixed supplemental-hours amount
    pub supplemental_hours: f64,
    /// Fixed night-shift amount
    pub night_shift: f64,
    pub commissions: f64,
    pub advances: f64,
    pub deductions: f64,
    pub biweekly_advance: f64,
    breakdown: RoleBreakdown,
}

/// Values derived from a role's inputs by [`recompute_role`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleBreakdown {
    pub prorated_salary: f64,
    pub remuneration: f64,
    pub thirteenth_month: f64,
    pub fourteenth_month: f64,
    pub reserve_fund: f64,
    pub total_income: f64,
    pub employee_contribution: f64,
    pub net_to_receive: f64,
    pub employer_contribution: f64,
    pub vacation_accrual: f64,
    pub total_employer_cost: f64,
}

impl Default for PayrollRole {
    fn default() -> Self {
        Self {
            title: String::new(),
            nominal_salary: 0.0,
            days_worked: 30,
            overtime: 0.0,
            supplemental_hours: 0.0,
            night_shift: 0.0,
            commissions: 0.0,
            advances: 0.0,
            deductions: 0.0,
            biweekly_advance: 0.0,
            breakdown: RoleBreakdown::default(),
        }
    }
}

impl PayrollRole {
    /// Full-month role with the given nominal salary; derived values are computed.
    pub fn new(title: impl Into<String>, nominal_salary: f64) -> Self {
        let mut role = Self {
            title: title.into(),
            nominal_salary,
            ..Self::default()
        };
        role.recompute();
        role
    }

    pub fn recompute(&mut self) {
        recompute_role(self);
    }

    pub fn nominal_salary(&self) -> f64 {
        self.nominal_salary
    }

    pub fn set_nominal_salary(&mut self, nominal_salary: f64) {
        self.nominal_salary = nominal_salary;
        self.recompute();
    }

    pub fn breakdown(&self) -> &RoleBreakdown {
        &self.breakdown
    }
}

/// Recompute every derived field of `role` from its inputs.
///
/// Steps run in a fixed order; each one only reads inputs or earlier steps.
pub fn recompute_role(role: &mut PayrollRole) {
    let days = f64::from(role.days_worked);
    let b = &mut role.breakdown;

    b.prorated_salary = role.nominal_salary / 30.0 * days;
    b.remuneration = b.prorated_salary
        + role.overtime
        + role.supplemental_hours
        + role.night_shift
        + role.commissions;
    b.thirteenth_month = b.remuneration / 12.0;
    // flat reference rate, independent of salary
    b.fourteenth_month = (REFERENCE_SALARY / REFERENCE_YEAR_DAYS) * days;
    b.employee_contribution = b.remuneration * EMPLOYEE_CONTRIBUTION_RATE;
    b.reserve_fund = 0.0;
    b.total_income = b.remuneration + b.thirteenth_month + b.fourteenth_month + b.reserve_fund;
    b.net_to_receive =
        b.total_income - b.employee_contribution - role.deductions - role.biweekly_advance;
    b.employer_contribution = b.remuneration * EMPLOYER_CONTRIBUTION_RATE;
    b.vacation_accrual = b.remuneration / 24.0;
    b.total_employer_cost = b.prorated_salary
        + b.thirteenth_month
        + b.fourteenth_month
        + b.reserve_fund
        + b.employer_contribution
        + b.vacation_accrual;
}

/// Roles of one projected year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollYear {
    pub roles: Vec<PayrollRole>,
    annual_total: f64,
}

impl PayrollYear {
    /// Sum of `total_employer_cost` as of the last regeneration.
    pub fn annual_total(&self) -> f64 {
        self.annual_total
    }

    fn recompute_total(&mut self) -> f64 {
        self.annual_total = self
            .roles
            .iter()
            .map(|r| r.breakdown.total_employer_cost)
            .fold(0.0, |acc, cost| acc + cost);
        self.annual_total
    }
}

/// Payroll projection of a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollData {
    pub years: usize,
    projection: Vec<PayrollYear>,
    grand_total: f64,
}

impl Default for PayrollData {
    fn default() -> Self {
        Self {
            years: 5,
            projection: Vec::new(),
            grand_total: 0.0,
        }
    }
}

impl PayrollData {
    pub fn projection(&self) -> &[PayrollYear] {
        &self.projection
    }

    /// Roles of the first projected year, the source for every other year.
    pub fn base_roster(&self) -> &[PayrollRole] {
        self.projection
            .first()
            .map(|y| y.roles.as_slice())
            .unwrap_or_default()
    }

    /// Append a role to the base roster, creating year 0 when missing.
    ///
    /// Other years are stale until [`regenerate_projection`] runs.
    pub fn push_base_role(&mut self, mut role: PayrollRole) {
        role.recompute();
        if self.projection.is_empty() {
            self.projection.push(PayrollYear::default());
        }
        self.projection[0].roles.push(role);
    }

    /// Direct access to year `index`; edits to year 0 become the new base.
    pub fn year_mut(&mut self, index: usize) -> Option<&mut PayrollYear> {
        self.projection.get_mut(index)
    }

    pub fn grand_total(&self) -> f64 {
        self.grand_total
    }

    /// Refresh every year's total and the grand total.
    pub fn recompute_totals(&mut self) -> f64 {
        self.grand_total = self
            .projection
            .iter_mut()
            .map(PayrollYear::recompute_total)
            .fold(0.0, |acc, total| acc + total);
        self.grand_total
    }

    /// Recompute every stored role in place, then the totals.
    ///
    /// Unlike [`regenerate_projection`] this keeps each year's roster and
    /// salaries as they are.
    pub fn recompute_roles(&mut self) -> f64 {
        self.projection
            .iter_mut()
            .flat_map(|year| year.roles.iter_mut())
            .for_each(recompute_role);
        self.recompute_totals()
    }
}

/// Rebuild the projection for `years` years from the base roster (year 0).
///
/// Year `y` holds a copy of every base role with its nominal salary set to
/// `base × 1.03^y`, always anchored to the base value. Without a base roster the
/// projection becomes `years` empty slots.
pub fn regenerate_projection(payroll: &mut PayrollData, years: usize) {
    payroll.years = years;

    let base: Vec<PayrollRole> = payroll.base_roster().to_vec();
    if base.is_empty() {
        debug!("regenerate_projection: no base roster, {} empty years", years);
        payroll.projection = vec![PayrollYear::default(); years];
        payroll.recompute_totals();
        return;
    }

    let projection = (0..years)
        .map(|year| {
            let roles = base
                .iter()
                .map(|base_role| {
                    let mut role = base_role.clone();
                    if year > 0 {
                        role.nominal_salary =
                            base_role.nominal_salary * SALARY_ESCALATION.powi(year as i32);
                    }
                    recompute_role(&mut role);
                    role
                })
                .collect();
            PayrollYear {
                roles,
                annual_total: 0.0,
            }
        })
        .collect();

    payroll.projection = projection;
    let total = payroll.recompute_totals();
    debug!(
        "regenerate_projection: {} roles over {} years, grand total {:.2}",
        base.len(),
        years,
        total
    );
}
