//! Tests for the payroll role calculator and projection regenerator

use std::sync::Arc;

use rstest::rstest;
use tempfile::TempDir;

use feasibility::application::services::{CaseSession, CaseStore};
use feasibility::application::ApplicationError;
use feasibility::domain::payroll::SALARY_ESCALATION;
use feasibility::domain::{regenerate_projection, DomainError, PayrollData, PayrollRole};
use feasibility::infrastructure::traits::RealFileSystem;
use feasibility::util::testing;

const TOLERANCE: f64 = 1e-9;

fn payroll_with_roster() -> PayrollData {
    testing::init_test_setup();
    let mut payroll = PayrollData::default();
    payroll.push_base_role(PayrollRole::new("Manager", 1200.0));
    let mut operator = PayrollRole::new("Operator", 500.0);
    operator.days_worked = 15;
    operator.overtime = 40.0;
    payroll.push_base_role(operator);
    payroll
}

// ============================================================
// recompute_role()
// ============================================================

#[test]
fn given_full_month_role_when_recomputed_then_breakdown_matches_rules() {
    let role = PayrollRole::new("Baker", 600.0);
    let b = role.breakdown();

    assert_eq!(b.prorated_salary, 600.0);
    assert_eq!(b.remuneration, 600.0);
    assert_eq!(b.thirteenth_month, 50.0);
    assert!((b.fourteenth_month - 470.0 / 360.0 * 30.0).abs() < TOLERANCE);
    assert!((b.employee_contribution - 56.7).abs() < TOLERANCE);
    assert!((b.employer_contribution - 72.9).abs() < TOLERANCE);
    assert_eq!(b.vacation_accrual, 25.0);
    assert_eq!(b.reserve_fund, 0.0);
    assert!((b.net_to_receive - (b.total_income - b.employee_contribution)).abs() < TOLERANCE);
    assert!(
        (b.total_employer_cost
            - (600.0 + 50.0 + b.fourteenth_month + 72.9 + 25.0))
            .abs()
            < TOLERANCE
    );
}

#[test]
fn given_same_inputs_when_recomputed_in_any_context_then_identical() {
    // Arrange
    let mut alone = PayrollRole::new("Operator", 500.0);
    alone.commissions = 30.0;
    let mut among_others = alone.clone();
    let mut payroll = payroll_with_roster();

    // Act
    alone.recompute();
    alone.recompute();
    payroll.push_base_role(among_others.clone());
    among_others.recompute();

    // Assert
    assert_eq!(alone, among_others);
    assert_eq!(payroll.base_roster()[2].breakdown(), alone.breakdown());
}

// ============================================================
// regenerate_projection()
// ============================================================

#[test]
fn given_roster_when_regenerated_twice_then_identical() {
    let mut payroll = payroll_with_roster();

    regenerate_projection(&mut payroll, 6);
    let first = payroll.clone();
    regenerate_projection(&mut payroll, 6);

    assert_eq!(payroll, first);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(4)]
fn given_base_salary_when_regenerated_then_year_salary_escalates(#[case] year: usize) {
    let mut payroll = payroll_with_roster();

    regenerate_projection(&mut payroll, 5);

    let role = &payroll.projection()[year].roles[0];
    let expected = 1200.0 * SALARY_ESCALATION.powi(year as i32);
    if year == 0 {
        assert_eq!(role.nominal_salary(), 1200.0);
    } else {
        assert!((role.nominal_salary() - expected).abs() < TOLERANCE);
    }
}

#[test]
fn given_horizon_shrink_then_grow_when_regenerated_then_truncates_and_restores() {
    // Arrange
    let mut payroll = payroll_with_roster();
    regenerate_projection(&mut payroll, 6);
    let original = payroll.projection().to_vec();

    // Act
    regenerate_projection(&mut payroll, 3);
    let truncated = payroll.projection().to_vec();
    regenerate_projection(&mut payroll, 6);

    // Assert
    assert_eq!(truncated.len(), 3);
    assert_eq!(truncated.as_slice(), &original[..3]);
    assert_eq!(payroll.projection(), original.as_slice());
}

#[test]
fn given_no_roster_when_regenerated_then_empty_years() {
    let mut payroll = PayrollData::default();

    regenerate_projection(&mut payroll, 4);

    assert_eq!(payroll.projection().len(), 4);
    assert!(payroll.projection().iter().all(|y| y.roles.is_empty()));
    assert_eq!(payroll.grand_total(), 0.0);
}

#[test]
fn given_projection_when_regenerated_then_totals_sum_employer_cost() {
    let mut payroll = payroll_with_roster();

    regenerate_projection(&mut payroll, 3);

    let mut grand = 0.0;
    for year in payroll.projection() {
        let sum: f64 = year
            .roles
            .iter()
            .map(|r| r.breakdown().total_employer_cost)
            .sum();
        assert_eq!(year.annual_total(), sum);
        grand += year.annual_total();
    }
    assert_eq!(payroll.grand_total(), grand);
}

#[test]
fn given_edited_later_year_when_regenerated_then_edit_discarded() {
    let mut payroll = payroll_with_roster();
    regenerate_projection(&mut payroll, 3);
    let expected = payroll.projection()[2].clone();

    payroll.year_mut(2).unwrap().roles[0].set_nominal_salary(1.0);
    regenerate_projection(&mut payroll, 3);

    assert_eq!(payroll.projection()[2], expected);
}

#[test]
fn given_edited_base_year_when_regenerated_then_edit_becomes_new_base() {
    // Arrange
    let mut payroll = payroll_with_roster();
    regenerate_projection(&mut payroll, 4);

    // Act
    payroll.year_mut(0).unwrap().roles[0].set_nominal_salary(800.0);
    regenerate_projection(&mut payroll, 4);

    // Assert
    let years = payroll.projection();
    assert_eq!(years[0].roles[0].nominal_salary(), 800.0);
    for (y, year) in years.iter().enumerate().skip(1) {
        let expected = 800.0 * SALARY_ESCALATION.powi(y as i32);
        assert!((year.roles[0].nominal_salary() - expected).abs() < TOLERANCE);
    }
    // untouched role still escalates from its own base
    let operator = years[3].roles[1].nominal_salary();
    assert!((operator - 500.0 * SALARY_ESCALATION.powi(3)).abs() < TOLERANCE);
}

// ============================================================
// CaseSession payroll operations
// ============================================================

#[test]
fn given_case_when_adding_role_then_projection_follows_case_horizon() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let mut session = CaseSession::new(CaseStore::new(Arc::new(RealFileSystem), temp.path()));
    session.start_new_case("Bakery").unwrap();
    session.set_payroll_horizon(7).unwrap();

    // Act
    session
        .add_payroll_role(PayrollRole::new("Baker", 500.0))
        .unwrap();

    // Assert
    let case = session.active().unwrap();
    assert_eq!(case.projection.years, 7);
    assert_eq!(case.payroll.years, 7);
    assert_eq!(case.payroll.projection().len(), 7);
    assert!(case.payroll.projection().iter().all(|y| y.roles.len() == 1));
}

#[test]
fn given_invalid_horizon_when_setting_payroll_horizon_then_unchanged() {
    let temp = TempDir::new().unwrap();
    let mut session = CaseSession::new(CaseStore::new(Arc::new(RealFileSystem), temp.path()));
    session.start_new_case("Bakery").unwrap();

    assert!(session.set_payroll_horizon(25).is_err());

    assert_eq!(session.active().unwrap().projection.years, 5);
}

#[test]
fn given_non_finite_overtime_when_adding_role_then_rejected_and_roster_unchanged() {
    // Arrange
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();
    let mut session = CaseSession::new(CaseStore::new(Arc::new(RealFileSystem), temp.path()));
    session.start_new_case("Bakery").unwrap();
    let mut role = PayrollRole::new("Baker", 500.0);
    role.overtime = f64::NAN;

    // Act
    let result = session.add_payroll_role(role);

    // Assert
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::InvalidInput { .. }))
    ));
    assert!(session.active().unwrap().payroll.projection().is_empty());
}
