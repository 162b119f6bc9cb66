//! Tests for CaseStore persistence and CaseSession load/save behavior

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use feasibility::application::services::{CaseSession, CaseStore};
use feasibility::application::ApplicationError;
use feasibility::domain::{
    AmortizationData, DeferredInvestmentItem, DomainError, EnergyAnalysisItem, FixedAsset,
    PayrollRole, WaccTable, WorkingCapitalItem,
};
use feasibility::infrastructure::traits::RealFileSystem;
use feasibility::util::testing;

fn store_at(dir: &Path) -> CaseStore {
    testing::init_test_setup();
    CaseStore::new(Arc::new(RealFileSystem), dir)
}

/// Session holding a case with at least one row in every collection.
fn populated_session(dir: &Path) -> CaseSession {
    let mut session = CaseSession::new(store_at(dir));
    session.start_new_case("Corner Bakery").unwrap();
    session.set_projection(1000.0, 10.0, 4).unwrap();
    session
        .add_fixed_asset(
            FixedAsset::new("Oven", "unit", 1500.25, 2)
                .unwrap()
                .with_comment("gas"),
        )
        .unwrap();
    session
        .add_deferred_item(DeferredInvestmentItem::new("Permits", 300.0, 1).unwrap())
        .unwrap();
    session
        .add_working_capital_item(WorkingCapitalItem::new("Flour", 0.7, 500).unwrap())
        .unwrap();
    session
        .add_energy_item(EnergyAnalysisItem::new("Peak load kW", 12.5).unwrap())
        .unwrap();
    session.add_monthly_consumption(321.5).unwrap();
    session.add_daily_consumption(10.7, 0.11).unwrap();
    session.set_payroll_horizon(4).unwrap();
    session
        .add_payroll_role(PayrollRole::new("Baker", 537.33))
        .unwrap();
    session.set_financing(62.5).unwrap();
    session
        .add_wacc_row(WaccTable::Profit, "Net income", vec![1.5, 2.25])
        .unwrap();
    session
        .add_wacc_row(WaccTable::Equity, "Shareholders", vec![100.0])
        .unwrap();
    session
        .set_amortization(AmortizationData {
            annual_rate: 9.5,
            institution: "Coop Bank".into(),
            years: 3,
        })
        .unwrap();
    session
}

#[test]
fn given_populated_case_when_saved_and_loaded_then_equal() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let mut session = populated_session(temp.path());

    // Act
    let filename = session.save_active().unwrap();
    let loaded = store_at(temp.path()).load(&filename).unwrap();

    // Assert
    assert_eq!(&loaded, session.active().unwrap());
    assert!(filename.starts_with("corner_bakery_"));
    assert!(filename.ends_with(".json"));
}

#[test]
fn given_fresh_case_when_saved_and_loaded_then_equal() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let mut session = CaseSession::new(store_at(temp.path()));
    session.start_new_case("Fresh").unwrap();

    // Act
    let filename = session.save_active().unwrap();
    let loaded = store_at(temp.path()).load(&filename).unwrap();

    // Assert
    assert_eq!(&loaded, session.active().unwrap());
    assert!(loaded.payroll.projection().is_empty());
    assert!(loaded.projection.results.is_empty());
}

#[test]
fn given_edited_base_year_when_saved_and_loaded_then_later_years_kept() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let mut session = CaseSession::new(store_at(temp.path()));
    session.start_new_case("Bakery").unwrap();
    session
        .add_payroll_role(PayrollRole::new("Baker", 500.0))
        .unwrap();
    let payroll = &mut session.active_mut().unwrap().payroll;
    payroll.year_mut(0).unwrap().roles[0].set_nominal_salary(800.0);
    payroll.recompute_totals();

    // Act
    let filename = session.save_active().unwrap();
    let loaded = store_at(temp.path()).load(&filename).unwrap();

    // Assert
    assert_eq!(&loaded, session.active().unwrap());
    let years = loaded.payroll.projection();
    assert_eq!(years[0].roles[0].nominal_salary(), 800.0);
    assert!((years[2].roles[0].nominal_salary() - 500.0 * 1.03 * 1.03).abs() < 1e-9);
}

#[test]
fn given_non_finite_value_when_adding_then_rejected_and_case_still_loads() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let mut session = CaseSession::new(store_at(temp.path()));
    session.start_new_case("Bakery").unwrap();

    // Act
    let monthly = session.add_monthly_consumption(f64::NAN);
    let rate = session.set_projection(f64::INFINITY, 10.0, 3).map(<[i64]>::to_vec);
    let filename = session.save_active().unwrap();

    // Assert
    assert!(matches!(
        monthly,
        Err(ApplicationError::Domain(DomainError::InvalidInput { .. }))
    ));
    assert!(matches!(
        rate,
        Err(ApplicationError::Domain(DomainError::InvalidInput { .. }))
    ));
    assert!(session.load_case(&filename).is_ok());
}

#[test]
fn given_saved_case_when_saved_again_then_same_file_overwritten() {
    let temp = TempDir::new().unwrap();
    let mut session = populated_session(temp.path());

    let first = session.save_active().unwrap();
    session.set_financing(10.0).unwrap();
    let second = session.save_active().unwrap();

    assert_eq!(first, second);
    assert_eq!(session.list_cases().unwrap(), vec![first.clone()]);
    let reloaded = store_at(temp.path()).load(&first).unwrap();
    assert_eq!(reloaded.financing.external_pct(), 90.0);
}

#[test]
fn given_document_with_missing_fields_when_loaded_then_defaults_applied() {
    // Arrange
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("legacy.json"),
        r#"{"name": "Legacy", "projection": {"initial_demand": 100.0, "growth_rate": 0.0}}"#,
    )
    .unwrap();

    // Act
    let case = store_at(temp.path()).load("legacy.json").unwrap();

    // Assert
    assert_eq!(case.name, "Legacy");
    assert_eq!(case.filename, "legacy.json");
    assert_eq!(case.projection.years, 5);
    assert!(case.projection.results.is_empty(), "stored results are not rebuilt");
    assert_eq!(case.payroll.years, 5);
    assert!(case.payroll.projection().is_empty());
    assert_eq!(case.financing.own_pct(), 75.0);
    assert_eq!(case.financing.external_pct(), 25.0);
    assert_eq!(case.amortization.years, 5);
}

#[test]
fn given_stale_derived_values_when_loaded_then_recomputed() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("stale.json"),
        r#"{"investment": {"fixed_assets": [
            {"description": "Oven", "unit_value": 10.0, "quantity": 3, "total": 1.0, "cost": 2.0}
        ]}}"#,
    )
    .unwrap();

    let case = store_at(temp.path()).load("stale.json").unwrap();

    let asset = &case.investment.fixed_assets[0];
    assert_eq!(asset.total(), 30.0);
    assert_eq!(asset.cost(), 30.0);
}

#[test]
fn given_corrupt_file_when_loading_then_load_failed_and_active_unchanged() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let mut session = populated_session(temp.path());
    let before = session.active().unwrap().clone();
    std::fs::write(temp.path().join("broken.json"), "{ not json").unwrap();

    // Act
    let result = session.load_case("broken.json");

    // Assert
    assert!(matches!(result, Err(ApplicationError::LoadFailed { .. })));
    assert_eq!(session.active().unwrap(), &before);
}

#[test]
fn given_missing_file_when_loading_then_load_failed() {
    let temp = TempDir::new().unwrap();

    let result = store_at(temp.path()).load("absent.json");

    assert!(matches!(
        result,
        Err(ApplicationError::LoadFailed { ref filename, .. }) if filename == "absent.json"
    ));
}

#[test]
fn given_mixed_directory_when_listing_then_json_newest_first() {
    // Arrange
    let temp = TempDir::new().unwrap();
    for name in [
        "shop_20240101120000.json",
        "shop_20250301080000.json",
        "notes.txt",
        "shop_20240615000000.json",
    ] {
        std::fs::write(temp.path().join(name), "{}").unwrap();
    }
    std::fs::create_dir(temp.path().join("archive.json")).unwrap();

    // Act
    let listed = store_at(temp.path()).list().unwrap();

    // Assert
    assert_eq!(
        listed,
        vec![
            "shop_20250301080000.json",
            "shop_20240615000000.json",
            "shop_20240101120000.json",
        ]
    );
}

#[test]
fn given_missing_directory_when_listing_then_empty() {
    let temp = TempDir::new().unwrap();

    let store = store_at(&temp.path().join("nowhere"));

    assert!(store.list().unwrap().is_empty());
    assert_eq!(store.latest().unwrap(), None);
}

#[test]
fn given_unwritable_location_when_saving_then_error_and_case_kept() {
    // Arrange: cases dir path is occupied by a regular file
    let temp = TempDir::new().unwrap();
    let blocked = temp.path().join("blocked");
    std::fs::write(&blocked, "").unwrap();
    let mut session = populated_session(&blocked);
    let before = session.active().unwrap().clone();

    // Act
    let result = session.save_active();

    // Assert
    assert!(matches!(result, Err(ApplicationError::OperationFailed { .. })));
    assert_eq!(session.active().unwrap(), &before);
}

#[test]
fn given_successful_save_when_done_then_no_temp_file_left() {
    let temp = TempDir::new().unwrap();
    let mut session = populated_session(temp.path());

    let filename = session.save_active().unwrap();

    let entries: Vec<_> = std::fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec![filename]);
}
