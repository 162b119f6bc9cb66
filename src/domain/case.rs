//! Case aggregate: one complete feasibility study

use std::sync::LazyLock;

use chrono::{Local, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::{AmortizationData, Financing, Investment, PayrollData, Projection, WaccData};

/// Timestamp format embedded in case filenames; sorts lexicographically by time.
pub const FILENAME_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";
/// Extension of persisted case documents.
pub const CASE_EXTENSION: &str = "json";

/// Root aggregate; owns every input table of the study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Case {
    pub name: String,
    pub created_at: NaiveDateTime,
    /// Name of the persisted file; empty until first generated
    pub filename: String,
    pub projection: Projection,
    pub investment: Investment,
    pub payroll: PayrollData,
    pub financing: Financing,
    pub wacc: WaccData,
    pub amortization: AmortizationData,
}

impl Default for Case {
    fn default() -> Self {
        Self {
            name: "Untitled".to_string(),
            created_at: NaiveDateTime::default(),
            filename: String::new(),
            projection: Projection::default(),
            investment: Investment::default(),
            payroll: PayrollData::default(),
            financing: Financing::default(),
            wacc: WaccData::default(),
            amortization: AmortizationData::default(),
        }
    }
}

impl Case {
    /// New case stamped with the current local time and a fresh filename.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Local::now().naive_local();
        let name = name.into();
        let filename = case_filename(&name, &now);
        Self {
            name,
            created_at: now,
            filename,
            ..Self::default()
        }
    }

    /// Assign a filename stamped with the current time if none is set yet.
    pub fn ensure_filename(&mut self) -> &str {
        if self.filename.is_empty() {
            self.filename = case_filename(&self.name, &Local::now().naive_local());
        }
        &self.filename
    }

    /// Refresh per-row derived values after loading.
    ///
    /// Stored sequences (demand results, payroll years) are kept exactly as
    /// persisted; only line totals, role breakdowns and their sums are rederived.
    pub fn rehydrate(&mut self) {
        self.investment.recompute_all();
        self.payroll.recompute_roles();
        self.financing.recompute();
    }
}

// literal pattern, always compiles
static SLUG_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s/\\]+").expect("valid slug pattern"));

/// Lower-cased name with whitespace and path separators collapsed to `_`.
pub fn slugify(name: &str) -> String {
    SLUG_SEPARATORS
        .replace_all(name.trim(), "_")
        .to_lowercase()
}

/// `<slug>_<YYYYMMDDHHMMSS>.json`
pub fn case_filename(name: &str, at: &NaiveDateTime) -> String {
    format!(
        "{}_{}.{}",
        slugify(name),
        at.format(FILENAME_TIMESTAMP_FORMAT),
        CASE_EXTENSION
    )
}
