//! Command dispatch
//!
//! Every editing command runs load -> mutate/recompute -> save against one case file.

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::CaseSession;
use crate::application::{ApplicationError, ApplicationResult};
use crate::cli::args::{
    AmortizationCommands, CaseCommands, Cli, Commands, ConfigCommands, FinancingCommands,
    InvestmentCommands, PayrollCommands, ProjectionCommands, WaccCommands,
};
use crate::cli::error::{CliError, CliResult};
use crate::cli::{output, view};
use crate::config::{global_config_path, Settings};
use crate::domain::{
    AmortizationData, DeferredInvestmentItem, Depreciation, EnergyAnalysisItem, FixedAsset,
    PayrollRole, WaccTable, WorkingCapitalItem,
};
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load()?.with_cases_dir(cli.cases_dir.clone());
    debug!("cases_dir: {}", settings.cases_dir.display());
    let container = ServiceContainer::new(settings);
    let mut session = container.case_session();
    let case = cli.case.as_deref();

    match &cli.command {
        Some(Commands::Case { command }) => case_command(&mut session, case, command),
        Some(Commands::Projection { command }) => projection_command(&mut session, case, command),
        Some(Commands::Investment { command }) => investment_command(&mut session, case, command),
        Some(Commands::Payroll { command }) => payroll_command(&mut session, case, command),
        Some(Commands::Financing { command }) => financing_command(&mut session, case, command),
        Some(Commands::Wacc { command }) => wacc_command(&mut session, case, command),
        Some(Commands::Amortization { command }) => {
            amortization_command(&mut session, case, command)
        }
        Some(Commands::Config { command }) => config_command(&container.settings, command),
        Some(Commands::Completion { shell }) => {
            print_completions(*shell);
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, run with --help for usage".to_string(),
        )),
    }
}

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

/// Make `case` (or the newest saved case) the active case.
fn open_case(session: &mut CaseSession, case: Option<&str>) -> CliResult<()> {
    let filename = match case {
        Some(name) => name.to_string(),
        None => session
            .store()
            .latest()?
            .ok_or(ApplicationError::NoActiveCase)?,
    };
    session.load_case(&filename)?;
    Ok(())
}

/// Open the case, apply `edit`, and save it back.
fn edit_case<F>(session: &mut CaseSession, case: Option<&str>, edit: F) -> CliResult<()>
where
    F: FnOnce(&mut CaseSession) -> ApplicationResult<()>,
{
    open_case(session, case)?;
    edit(session)?;
    let filename = session.save_active()?;
    output::action("Saved", &filename);
    Ok(())
}

#[instrument(skip(session))]
fn case_command(
    session: &mut CaseSession,
    case: Option<&str>,
    command: &CaseCommands,
) -> CliResult<()> {
    match command {
        CaseCommands::New { name } => {
            session.start_new_case(name)?;
            let filename = session.save_active()?;
            output::success(&format!(
                "created case '{}': {}",
                name.trim(),
                session.store().case_path(&filename).display()
            ));
            Ok(())
        }
        CaseCommands::List => {
            let cases = session.list_cases()?;
            if cases.is_empty() {
                output::warning(&format!(
                    "no cases in {}",
                    session.store().cases_dir().display()
                ));
            }
            for filename in cases {
                output::info(&filename);
            }
            Ok(())
        }
        CaseCommands::Show { json } => {
            open_case(session, case)?;
            let active = session.active()?;
            if *json {
                let document = serde_json::to_string_pretty(active).map_err(|e| {
                    ApplicationError::OperationFailed {
                        context: format!("serialize case {}", active.filename),
                        source: Box::new(e),
                    }
                })?;
                output::info(&document);
            } else {
                output::info(&view::case_tree(active));
            }
            Ok(())
        }
        CaseCommands::Path => {
            open_case(session, case)?;
            let path = session.store().case_path(&session.active()?.filename);
            output::info(&path.display());
            Ok(())
        }
    }
}

fn projection_command(
    session: &mut CaseSession,
    case: Option<&str>,
    command: &ProjectionCommands,
) -> CliResult<()> {
    match command {
        ProjectionCommands::Set {
            initial_demand,
            growth_rate,
            years,
        } => edit_case(session, case, |s| {
            let results = s.set_projection(*initial_demand, *growth_rate, *years)?;
            print_demand(results);
            Ok(())
        }),
        ProjectionCommands::Show => {
            open_case(session, case)?;
            print_demand(&session.active()?.projection.results);
            Ok(())
        }
    }
}

fn print_demand(results: &[i64]) {
    output::header("Demand");
    for (i, value) in results.iter().enumerate() {
        output::detail(&format!("year {}: {}", i + 1, value));
    }
}

fn investment_command(
    session: &mut CaseSession,
    case: Option<&str>,
    command: &InvestmentCommands,
) -> CliResult<()> {
    match command {
        InvestmentCommands::AddAsset {
            description,
            measure,
            unit_value,
            quantity,
            comment,
        } => edit_case(session, case, |s| {
            let asset =
                FixedAsset::new(description.as_str(), measure.as_str(), *unit_value, *quantity)?
                    .with_comment(comment.as_str());
            let added = s.add_fixed_asset(asset)?;
            output::action(
                "Fixed asset",
                &format!("{} = {:.2}", added.description, added.total()),
            );
            Ok(())
        }),
        InvestmentCommands::Depreciation {
            index,
            method,
            residual_pct,
            residual_amount_pct,
        } => edit_case(session, case, |s| {
            let depreciation = Depreciation {
                method: method.clone(),
                residual_pct: *residual_pct,
                residual_amount_pct: *residual_amount_pct,
            };
            let asset = s.update_depreciation(*index, depreciation)?;
            output::action("Depreciation", &asset.description);
            Ok(())
        }),
        InvestmentCommands::AddDeferred {
            description,
            unit_value,
            quantity,
            comment,
            amortization_years,
        } => edit_case(session, case, |s| {
            let mut item =
                DeferredInvestmentItem::new(description.as_str(), *unit_value, *quantity)?
                    .with_comment(comment.as_str());
            item.amortization_years = *amortization_years;
            let added = s.add_deferred_item(item)?;
            output::action(
                "Deferred",
                &format!("{} = {:.2}", added.description, added.total()),
            );
            Ok(())
        }),
        InvestmentCommands::AddCapital {
            description,
            unit_value,
            quantity,
        } => edit_case(session, case, |s| {
            let item = WorkingCapitalItem::new(description.as_str(), *unit_value, *quantity)?;
            let total = s.add_working_capital_item(item)?;
            output::action("Working capital", &format!("{total:.2}"));
            Ok(())
        }),
        InvestmentCommands::RemoveCapital { index } => edit_case(session, case, |s| {
            let total = s.remove_working_capital_item(*index)?;
            output::action("Working capital", &format!("{total:.2}"));
            Ok(())
        }),
        InvestmentCommands::AddEnergy { description, value } => edit_case(session, case, |s| {
            s.add_energy_item(EnergyAnalysisItem::new(description.as_str(), *value)?)?;
            output::action("Energy", description);
            Ok(())
        }),
        InvestmentCommands::AddMonthly { kwh } => edit_case(session, case, |s| {
            let cost = s.add_monthly_consumption(*kwh)?;
            output::action("Monthly consumption", &format!("{kwh} kWh -> {cost:.2}"));
            Ok(())
        }),
        InvestmentCommands::AddDaily { kwh, unit_cost } => edit_case(session, case, |s| {
            let total = s.add_daily_consumption(*kwh, *unit_cost)?;
            output::action("Daily consumption", &format!("{kwh} kWh/day -> {total:.2}/year"));
            Ok(())
        }),
        InvestmentCommands::Totals => {
            open_case(session, case)?;
            let investment = &session.active()?.investment;
            output::header("Investment");
            output::detail(&format!("fixed assets:    {:.2}", investment.total_fixed_assets()));
            output::detail(&format!("deferred:        {:.2}", investment.total_deferred()));
            output::detail(&format!("working capital: {:.2}", investment.total_working_capital()));
            output::detail(&format!("total:           {:.2}", investment.total_investment()));
            Ok(())
        }
    }
}

fn payroll_command(
    session: &mut CaseSession,
    case: Option<&str>,
    command: &PayrollCommands,
) -> CliResult<()> {
    match command {
        PayrollCommands::Horizon { years } => edit_case(session, case, |s| {
            s.set_payroll_horizon(*years)?;
            output::action("Payroll horizon", &format!("{years} years"));
            Ok(())
        }),
        PayrollCommands::AddRole {
            title,
            salary,
            days,
            overtime,
            supplemental_hours,
            night_shift,
            commissions,
            advances,
            deductions,
            biweekly_advance,
        } => edit_case(session, case, |s| {
            let mut role = PayrollRole::new(title.as_str(), *salary);
            role.days_worked = *days;
            role.overtime = *overtime;
            role.supplemental_hours = *supplemental_hours;
            role.night_shift = *night_shift;
            role.commissions = *commissions;
            role.advances = *advances;
            role.deductions = *deductions;
            role.biweekly_advance = *biweekly_advance;
            s.add_payroll_role(role)?;
            output::action(
                "Payroll",
                &format!("{} added, grand total {:.2}", title, s.active()?.payroll.grand_total()),
            );
            Ok(())
        }),
        PayrollCommands::Show { year } => {
            open_case(session, case)?;
            let payroll = &session.active()?.payroll;
            match year {
                None => output::info(&view::payroll_tree(payroll)),
                Some(n) => {
                    let slot = n
                        .checked_sub(1)
                        .and_then(|i| payroll.projection().get(i))
                        .ok_or_else(|| {
                            CliError::InvalidArgs(format!(
                                "year {} outside 1..={}",
                                n,
                                payroll.projection().len()
                            ))
                        })?;
                    output::header(&format!("Year {n}: {:.2}", slot.annual_total()));
                    for role in &slot.roles {
                        let b = role.breakdown();
                        output::detail(&format!(
                            "{}: salary {:.2}, 13th {:.2}, 14th {:.2}, net {:.2}, cost {:.2}",
                            role.title,
                            role.nominal_salary(),
                            b.thirteenth_month,
                            b.fourteenth_month,
                            b.net_to_receive,
                            b.total_employer_cost
                        ));
                    }
                }
            }
            Ok(())
        }
    }
}

fn financing_command(
    session: &mut CaseSession,
    case: Option<&str>,
    command: &FinancingCommands,
) -> CliResult<()> {
    match command {
        FinancingCommands::Set { own_pct } => edit_case(session, case, |s| {
            let (own, external) = s.set_financing(*own_pct)?;
            output::action("Financing", &format!("own {own}% / external {external}%"));
            Ok(())
        }),
        FinancingCommands::Show => {
            open_case(session, case)?;
            let financing = &session.active()?.financing;
            output::info(&format!(
                "own {}% / external {}%",
                financing.own_pct(),
                financing.external_pct()
            ));
            Ok(())
        }
    }
}

fn wacc_command(
    session: &mut CaseSession,
    case: Option<&str>,
    command: &WaccCommands,
) -> CliResult<()> {
    match command {
        WaccCommands::AddRow {
            table,
            name,
            values,
        } => edit_case(session, case, |s| {
            let table = WaccTable::from(*table);
            let row = s.add_wacc_row(table, name, values.clone())?;
            output::action(
                &format!("WACC {table}"),
                &format!("{} total {}", row.name, row.total()),
            );
            Ok(())
        }),
        WaccCommands::Show => {
            open_case(session, case)?;
            output::info(&view::wacc_tree(&session.active()?.wacc));
            Ok(())
        }
    }
}

fn amortization_command(
    session: &mut CaseSession,
    case: Option<&str>,
    command: &AmortizationCommands,
) -> CliResult<()> {
    match command {
        AmortizationCommands::Set {
            rate,
            institution,
            years,
        } => edit_case(session, case, |s| {
            s.set_amortization(AmortizationData {
                annual_rate: *rate,
                institution: institution.clone(),
                years: *years,
            })?;
            output::action("Amortization", &format!("{rate}% at {institution} over {years} years"));
            Ok(())
        }),
    }
}

fn config_command(settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
            Ok(())
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => {
                output::info(&path.display());
                Ok(())
            }
            None => Err(CliError::Usage(
                "cannot determine config directory".to_string(),
            )),
        },
    }
}
