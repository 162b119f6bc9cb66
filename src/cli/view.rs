//! Text rendering of a case for the terminal

use itertools::Itertools;
use termtree::Tree;

use crate::domain::{Case, Investment, PayrollData, WaccData, WaccRow};

fn money(value: f64) -> String {
    format!("{value:.2}")
}

fn leaf(label: impl Into<String>) -> Tree<String> {
    Tree::new(label.into())
}

/// Whole case as a tree, one branch per input area.
pub fn case_tree(case: &Case) -> Tree<String> {
    let header = format!(
        "{} ({}, created {})",
        case.name,
        case.filename,
        case.created_at.format("%Y-%m-%d %H:%M")
    );

    let projection = Tree::new(format!(
        "Projection: demand {} growing {}% over {} years",
        case.projection.initial_demand, case.projection.growth_rate, case.projection.years
    ))
    .with_leaves(
        case.projection
            .results
            .iter()
            .enumerate()
            .map(|(i, v)| leaf(format!("year {}: {}", i + 1, v))),
    );

    let financing = leaf(format!(
        "Financing: own {}% / external {}%",
        case.financing.own_pct(),
        case.financing.external_pct()
    ));

    let amortization = leaf(format!(
        "Amortization: {}% at '{}' over {} years",
        case.amortization.annual_rate, case.amortization.institution, case.amortization.years
    ));

    Tree::new(header).with_leaves([
        projection,
        investment_tree(&case.investment),
        payroll_tree(&case.payroll),
        financing,
        wacc_tree(&case.wacc),
        amortization,
    ])
}

/// Investment rows grouped by category, with category totals.
pub fn investment_tree(investment: &Investment) -> Tree<String> {
    let assets = Tree::new(format!(
        "Fixed assets: {}",
        money(investment.total_fixed_assets())
    ))
    .with_leaves(investment.fixed_assets.iter().map(|a| {
        let depreciation = if a.depreciation.method.is_empty() {
            String::new()
        } else {
            format!(
                " [{} residual {}% of {}%]",
                a.depreciation.method,
                a.depreciation.residual_pct,
                a.depreciation.residual_amount_pct
            )
        };
        leaf(format!(
            "{} {} x {} = {}{}",
            a.description,
            a.quantity(),
            money(a.unit_value()),
            money(a.total()),
            depreciation
        ))
    }));

    let deferred = Tree::new(format!(
        "Deferred investment: {}",
        money(investment.total_deferred())
    ))
    .with_leaves(investment.deferred_items.iter().map(|i| {
        leaf(format!(
            "{} {} x {} = {} (amortized over {} years)",
            i.description,
            i.quantity(),
            money(i.unit_value()),
            money(i.total()),
            i.amortization_years
        ))
    }));

    let capital = Tree::new(format!(
        "Working capital: {}",
        money(investment.working_capital())
    ))
    .with_leaves(investment.working_capital_items().iter().map(|i| {
        leaf(format!(
            "{} {} x {} = {}",
            i.description,
            i.quantity(),
            money(i.unit_value()),
            money(i.total())
        ))
    }));

    let energy = Tree::new("Energy".to_string())
        .with_leaves(
            investment
                .energy_items
                .iter()
                .map(|e| leaf(format!("{}: {}", e.description, e.value))),
        )
        .with_leaves(
            investment
                .monthly_consumption
                .iter()
                .map(|m| leaf(format!("monthly {} kWh -> {}", m.kwh(), money(m.cost())))),
        )
        .with_leaves(investment.daily_consumption.iter().map(|d| {
            leaf(format!(
                "daily {} kWh ({} kWh/year) x {} -> {}",
                d.daily_kwh(),
                d.annual_kwh(),
                d.unit_cost(),
                money(d.total())
            ))
        }));

    Tree::new(format!(
        "Investment: {}",
        money(investment.total_investment())
    ))
    .with_leaves([assets, deferred, capital, energy])
}

/// Payroll years with each role's key figures.
pub fn payroll_tree(payroll: &PayrollData) -> Tree<String> {
    Tree::new(format!(
        "Payroll: {} years, grand total {}",
        payroll.years,
        money(payroll.grand_total())
    ))
    .with_leaves(payroll.projection().iter().enumerate().map(|(i, year)| {
        Tree::new(format!(
            "year {}: {}",
            i + 1,
            money(year.annual_total())
        ))
        .with_leaves(year.roles.iter().map(|role| {
            let b = role.breakdown();
            leaf(format!(
                "{}: salary {} | remuneration {} | net {} | employer cost {}",
                role.title,
                money(role.nominal_salary()),
                money(b.remuneration),
                money(b.net_to_receive),
                money(b.total_employer_cost)
            ))
        }))
    }))
}

fn wacc_row(row: &WaccRow) -> Tree<String> {
    leaf(format!(
        "{}: [{}] total {}",
        row.name,
        row.values.iter().join(", "),
        row.total()
    ))
}

pub fn wacc_tree(wacc: &WaccData) -> Tree<String> {
    Tree::new(format!("WACC: grand total {}", wacc.grand_total)).with_leaves([
        Tree::new("profit".to_string()).with_leaves(wacc.profit_table.iter().map(wacc_row)),
        Tree::new("equity".to_string()).with_leaves(wacc.equity_table.iter().map(wacc_row)),
    ])
}
