use crate::infra::open_repository;
use chrono::{NaiveDate, Utc};
use clap::Args;
use household_eligibility::config::AppConfig;
use household_eligibility::eligibility::{EligibilityService, HouseholdId, HouseholdImporter};
use household_eligibility::error::AppError;
use household_eligibility::telemetry;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Household identifier to evaluate
    pub(crate) household_id: String,
    /// Evaluation date (YYYY-MM-DD). Defaults to today (UTC).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Print the full decision trail instead of the API response body
    #[arg(long)]
    pub(crate) explain: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// Households CSV export
    #[arg(long)]
    pub(crate) households: PathBuf,
    /// Recipients CSV export
    #[arg(long)]
    pub(crate) recipients: PathBuf,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let repository = open_repository(&config.database)?;
    let service = EligibilityService::new(repository, config.eligibility);

    let as_of = args.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let assessment = service.evaluate(&HouseholdId(args.household_id), as_of)?;

    let rendered = if args.explain {
        serde_json::to_string_pretty(&assessment)
    } else {
        serde_json::to_string_pretty(&assessment.result)
    }
    .map_err(|err| AppError::Io(err.into()))?;

    println!("{rendered}");
    eprintln!("{}", assessment.result.summary());
    Ok(())
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let repository = open_repository(&config.database)?;

    let summary =
        HouseholdImporter::from_paths(&repository, &args.households, &args.recipients)?;

    println!(
        "Imported {} household(s) and {} recipient(s) into {} ({} income)",
        summary.households,
        summary.recipients,
        config.database.path.display(),
        config.database.income_basis.label(),
    );
    Ok(())
}
