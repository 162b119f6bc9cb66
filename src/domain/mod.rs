//! Domain layer: case records and their derived-value rules
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod case;
pub mod error;
pub mod financing;
pub mod investment;
pub mod payroll;
pub mod projection;

pub use case::{case_filename, slugify, Case};
pub use error::{require_finite, DomainError};
pub use financing::{AmortizationData, Financing, WaccData, WaccRow, WaccTable};
pub use investment::{
    DailyConsumptionRecord, DeferredInvestmentItem, Depreciation, EnergyAnalysisItem, FixedAsset,
    Investment, MonthlyConsumptionRecord, WorkingCapitalItem,
};
pub use payroll::{
    recompute_role, regenerate_projection, PayrollData, PayrollRole, PayrollYear, RoleBreakdown,
};
pub use projection::{project, validate_horizon, Projection, MAX_HORIZON, MIN_HORIZON};
