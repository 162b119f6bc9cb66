//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::{Financing, WaccTable};

/// Parse an `f64`, rejecting NaN and infinities.
fn finite_f64(s: &str) -> Result<f64, String> {
    let value: f64 = s.trim().parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("'{s}' is not a finite number"))
    }
}

/// Feasibility-study case builder: demand, investment, payroll and financing inputs
#[derive(Parser, Debug)]
#[command(name = "feasibility")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding case documents
    #[arg(long, global = true, env = "FEASIBILITY_CASES_DIR", value_hint = ValueHint::DirPath)]
    pub cases_dir: Option<PathBuf>,

    /// Case file to operate on (default: most recent case)
    #[arg(short, long, global = true)]
    pub case: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create, list and inspect cases
    Case {
        #[command(subcommand)]
        command: CaseCommands,
    },

    /// Demand projection
    Projection {
        #[command(subcommand)]
        command: ProjectionCommands,
    },

    /// Fixed assets, deferred investment, working capital and energy
    Investment {
        #[command(subcommand)]
        command: InvestmentCommands,
    },

    /// Payroll roles and their projection
    Payroll {
        #[command(subcommand)]
        command: PayrollCommands,
    },

    /// Own capital vs. external financing split
    Financing {
        #[command(subcommand)]
        command: FinancingCommands,
    },

    /// WACC profit and equity tables
    Wacc {
        #[command(subcommand)]
        command: WaccCommands,
    },

    /// Loan amortization settings
    Amortization {
        #[command(subcommand)]
        command: AmortizationCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum CaseCommands {
    /// Start a new case and save it
    New {
        /// Case name
        name: String,
    },
    /// List saved cases, newest first
    List,
    /// Show the case as a tree
    Show {
        /// Print the raw JSON document instead
        #[arg(long)]
        json: bool,
    },
    /// Print the path of the case file
    Path,
}

#[derive(Subcommand, Debug)]
pub enum ProjectionCommands {
    /// Set projection inputs and recompute yearly demand
    Set {
        #[arg(long, value_parser = finite_f64)]
        initial_demand: f64,
        /// Annual growth in percent
        #[arg(long, value_parser = finite_f64, allow_negative_numbers = true)]
        growth_rate: f64,
        /// Number of projected years (1-20)
        #[arg(long, default_value_t = 5)]
        years: i32,
    },
    /// Show yearly demand
    Show,
}

#[derive(Subcommand, Debug)]
pub enum InvestmentCommands {
    /// Add a machinery/equipment row
    AddAsset {
        description: String,
        #[arg(long, default_value = "")]
        measure: String,
        #[arg(long, value_parser = finite_f64, allow_negative_numbers = true)]
        unit_value: f64,
        #[arg(long, allow_negative_numbers = true)]
        quantity: i64,
        #[arg(long, default_value = "")]
        comment: String,
    },
    /// Set depreciation of the fixed asset at INDEX (0-based)
    Depreciation {
        index: usize,
        /// Method tag, e.g. straight-line
        #[arg(long, default_value = "")]
        method: String,
        #[arg(long, value_parser = finite_f64, default_value_t = 10.0)]
        residual_pct: f64,
        #[arg(long, value_parser = finite_f64, default_value_t = 100.0)]
        residual_amount_pct: f64,
    },
    /// Add a deferred investment row
    AddDeferred {
        description: String,
        #[arg(long, value_parser = finite_f64, allow_negative_numbers = true)]
        unit_value: f64,
        #[arg(long, allow_negative_numbers = true)]
        quantity: i64,
        #[arg(long, default_value = "")]
        comment: String,
        #[arg(long, default_value_t = 5)]
        amortization_years: u32,
    },
    /// Add a working-capital row
    AddCapital {
        description: String,
        #[arg(long, value_parser = finite_f64, allow_negative_numbers = true)]
        unit_value: f64,
        #[arg(long, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove the working-capital row at INDEX (0-based)
    RemoveCapital { index: usize },
    /// Add an energy analysis row
    AddEnergy {
        description: String,
        #[arg(long, value_parser = finite_f64, allow_negative_numbers = true)]
        value: f64,
    },
    /// Record monthly consumption in kWh
    AddMonthly {
        #[arg(long, value_parser = finite_f64)]
        kwh: f64,
    },
    /// Record daily consumption in kWh with its unit cost
    AddDaily {
        #[arg(long, value_parser = finite_f64)]
        kwh: f64,
        #[arg(long, value_parser = finite_f64)]
        unit_cost: f64,
    },
    /// Show investment totals
    Totals,
}

#[derive(Subcommand, Debug)]
pub enum PayrollCommands {
    /// Set the projection horizon and rebuild payroll years
    Horizon {
        /// Number of projected years (1-20)
        years: i32,
    },
    /// Add a role to the base year and rebuild payroll years
    AddRole {
        title: String,
        /// Nominal monthly salary
        #[arg(long, value_parser = finite_f64)]
        salary: f64,
        #[arg(long, default_value_t = 30)]
        days: u32,
        #[arg(long, value_parser = finite_f64, default_value_t = 0.0)]
        overtime: f64,
        #[arg(long, value_parser = finite_f64, default_value_t = 0.0)]
        supplemental_hours: f64,
        #[arg(long, value_parser = finite_f64, default_value_t = 0.0)]
        night_shift: f64,
        #[arg(long, value_parser = finite_f64, default_value_t = 0.0)]
        commissions: f64,
        #[arg(long, value_parser = finite_f64, default_value_t = 0.0)]
        advances: f64,
        #[arg(long, value_parser = finite_f64, default_value_t = 0.0)]
        deductions: f64,
        #[arg(long, value_parser = finite_f64, default_value_t = 0.0)]
        biweekly_advance: f64,
    },
    /// Show the payroll projection
    Show {
        /// Only this year (1-based)
        #[arg(long)]
        year: Option<usize>,
    },
}

#[derive(Subcommand, Debug)]
pub enum FinancingCommands {
    /// Set the own-capital percentage; external is the remainder
    Set {
        #[arg(value_parser = finite_f64, default_value_t = Financing::DEFAULT_OWN_PCT)]
        own_pct: f64,
    },
    /// Show the split
    Show,
}

/// WACC table selector.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableArg {
    Profit,
    Equity,
}

impl From<TableArg> for WaccTable {
    fn from(arg: TableArg) -> Self {
        match arg {
            TableArg::Profit => WaccTable::Profit,
            TableArg::Equity => WaccTable::Equity,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum WaccCommands {
    /// Add a named row of yearly values
    AddRow {
        #[arg(long, value_enum)]
        table: TableArg,
        name: String,
        /// Comma-separated yearly values
        #[arg(
            long,
            value_parser = finite_f64,
            value_delimiter = ',',
            allow_negative_numbers = true
        )]
        values: Vec<f64>,
    },
    /// Show both tables
    Show,
}

#[derive(Subcommand, Debug)]
pub enum AmortizationCommands {
    /// Set loan rate, institution and term
    Set {
        /// Annual interest rate in percent
        #[arg(long, value_parser = finite_f64)]
        rate: f64,
        #[arg(long)]
        institution: String,
        #[arg(long, default_value_t = 5)]
        years: u32,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a template config file
    Template,
    /// Print the global config file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_numbers_are_rejected_at_parse_time() {
        for bad in ["NaN", "inf", "-inf"] {
            let parsed = Cli::try_parse_from([
                "feasibility",
                "investment",
                "add-capital",
                "Flour",
                "--unit-value",
                bad,
                "--quantity",
                "1",
            ]);
            assert!(parsed.is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_delimited_values_are_checked_one_by_one() {
        let parsed = Cli::try_parse_from([
            "feasibility",
            "wacc",
            "add-row",
            "--table",
            "profit",
            "Net income",
            "--values",
            "1.5,NaN",
        ]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from([
            "feasibility",
            "wacc",
            "add-row",
            "--table",
            "profit",
            "Net income",
            "--values",
            "1.5,-2",
        ]);
        assert!(parsed.is_ok());
    }
}
