use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clinic_core::config::{approver_policy_from_env_value, lookback_days_from_env_value};
use clinic_core::constants::{APPROVER_ROLES_ENV, DATA_FILE_ENV, LOOKBACK_DAYS_ENV};
use clinic_core::{ClinicService, CoreConfig};

/// Resolves the engine configuration from the environment.
///
/// # Environment Variables
/// - `CLINIC_LOOKBACK_DAYS`: reporting window in days (default: 365)
/// - `CLINIC_APPROVER_ROLES`: comma-separated roles allowed to send patients home
///   (default: any clinical staff)
fn config_from_env() -> anyhow::Result<CoreConfig> {
    let lookback_days = lookback_days_from_env_value(std::env::var(LOOKBACK_DAYS_ENV).ok())?;
    let policy = approver_policy_from_env_value(std::env::var(APPROVER_ROLES_ENV).ok())?;
    Ok(CoreConfig::new(lookback_days, policy)?)
}

/// Main entry point for the clinic runner
///
/// Loads one clinic data file into a fresh engine, logging every refresh notification, then
/// prints the seating chart and the standard reports.
///
/// # Environment Variables
/// - `CLINIC_DATA_FILE`: clinic data file to load (required)
/// - `RUST_LOG`: tracing filter (default adds `clinic_core=info`)
///
/// # Returns
/// * `Ok(())` - If the file loads and the reports print
/// * `Err(anyhow::Error)` - If configuration is invalid or the file cannot be read
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let data_file = std::env::var(DATA_FILE_ENV)
        .with_context(|| format!("{DATA_FILE_ENV} must point at a clinic data file"))?;
    let cfg = Arc::new(config_from_env()?);

    tracing::info!("++ Loading clinic data from {}", data_file);

    let mut clinic = ClinicService::new(cfg);
    let mut refreshes: u64 = 0;
    clinic.set_refresh_hook(move || {
        refreshes += 1;
        tracing::debug!(refreshes, "clinic view refresh");
    });

    let report = clinic.load_from_file(&data_file)?;
    for skipped in &report.skipped {
        tracing::warn!("line {} skipped: {}", skipped.line, skipped.reason);
    }

    let now = chrono::Local::now().naive_local();

    println!("== Seating chart ==");
    println!("{}", clinic.seating_chart());

    println!("== Inactive patients ==");
    for patient in clinic.list_inactive_patients_at(now) {
        println!("{}", patient.full_name());
    }

    println!("== Visits in the last {} days ==", clinic.config().lookback_days());
    for entry in clinic.patient_visit_summary_past_year_at(now) {
        println!("{}: {}", entry.patient.full_name(), entry.visits);
    }

    println!("== Clinical staff with waiting patients ==");
    for entry in clinic.list_active_staff_with_patients() {
        let names: Vec<String> = entry.patients.iter().map(|p| p.full_name()).collect();
        println!("{}: {}", entry.staff.display_name(), names.join(", "));
    }

    println!("== Staff patient counts ==");
    for entry in clinic.list_staff_patient_counts() {
        println!("{}: {}", entry.staff.full_name(), entry.patients);
    }

    Ok(())
}
