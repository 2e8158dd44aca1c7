use anyhow::{bail, Context};
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use clinic_core::{
    config::approver_policy_from_env_value, constants::DEFAULT_LOOKBACK_DAYS,
    ingest::parse_timestamp,
    ApproverPolicy, ClinicService, CoreConfig, IngestReport,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "clinic")]
#[command(about = "Clinic records CLI")]
struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    /// Reporting lookback window in days (default 365)
    #[arg(long, global = true)]
    lookback_days: Option<i64>,
    /// Roles allowed to approve sending a patient home (comma-separated; any clinical role if unset)
    #[arg(long, global = true)]
    approver_roles: Option<String>,
    /// Evaluate reports as of this local time (YYYY-MM-DDTHH:MM[:SS]) instead of now
    #[arg(long, global = true)]
    now: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct Source {
    /// Clinic data file to load
    file: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a data file and report skipped lines
    Check {
        #[command(flatten)]
        source: Source,
    },
    /// Show every room with its occupants
    SeatingChart {
        #[command(flatten)]
        source: Source,
    },
    /// Show one room by registration index
    Room {
        #[command(flatten)]
        source: Source,
        /// Zero-based room index
        index: usize,
    },
    /// List patients with no visit inside the lookback window
    Inactive {
        #[command(flatten)]
        source: Source,
    },
    /// Count each patient's visits inside the lookback window
    VisitSummary {
        #[command(flatten)]
        source: Source,
    },
    /// List active clinical staff with patients awaiting care
    ActiveStaff {
        #[command(flatten)]
        source: Source,
    },
    /// Group patients awaiting care under their clinical staff
    StaffPatients {
        #[command(flatten)]
        source: Source,
    },
    /// Count current patients for every staff member
    StaffCounts {
        #[command(flatten)]
        source: Source,
    },
    /// List staff with their credentials
    Staff {
        #[command(flatten)]
        source: Source,
    },
    /// List patients with their room and visits
    Patients {
        #[command(flatten)]
        source: Source,
    },
}

impl Commands {
    fn source(&self) -> &Source {
        match self {
            Commands::Check { source }
            | Commands::SeatingChart { source }
            | Commands::Room { source, .. }
            | Commands::Inactive { source }
            | Commands::VisitSummary { source }
            | Commands::ActiveStaff { source }
            | Commands::StaffPatients { source }
            | Commands::StaffCounts { source }
            | Commands::Staff { source }
            | Commands::Patients { source } => source,
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn build_config(cli: &Cli) -> anyhow::Result<CoreConfig> {
    let policy: ApproverPolicy = approver_policy_from_env_value(cli.approver_roles.clone())?;
    Ok(CoreConfig::new(
        cli.lookback_days.unwrap_or(DEFAULT_LOOKBACK_DAYS),
        policy,
    )?)
}

fn load(cfg: Arc<CoreConfig>, source: &Source) -> anyhow::Result<(ClinicService, IngestReport)> {
    let mut clinic = ClinicService::new(cfg);
    let report = clinic
        .load_from_file(&source.file)
        .with_context(|| format!("loading {}", source.file.display()))?;
    Ok((clinic, report))
}

fn print_report(report: &IngestReport) {
    println!(
        "Applied {} line(s), skipped {}, dropped {} visit(s)",
        report.applied,
        report.skipped.len(),
        report.visits_dropped
    );
    for skipped in &report.skipped {
        println!("  line {}: {}", skipped.line, skipped.reason);
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command.as_ref() else {
        println!("Use 'clinic --help' for commands");
        return Ok(());
    };

    let now: NaiveDateTime = match cli.now.as_deref() {
        Some(value) => parse_timestamp(value)?,
        None => chrono::Local::now().naive_local(),
    };
    let cfg = Arc::new(build_config(&cli)?);
    let (clinic, report) = load(cfg, command.source())?;

    match command {
        Commands::Check { .. } => {
            if cli.json {
                print_json(&report)?;
            } else {
                print_report(&report);
            }
            if !report.skipped.is_empty() {
                bail!("{} line(s) could not be applied", report.skipped.len());
            }
        }
        Commands::SeatingChart { .. } => {
            if cli.json {
                let rooms: Vec<_> = clinic.rooms().collect();
                print_json(&rooms)?;
            } else {
                println!("{}", clinic.seating_chart());
            }
        }
        Commands::Room { index, .. } => {
            if cli.json {
                print_json(&clinic.room_by_index(*index)?)?;
            } else {
                println!("{}", clinic.room_details(*index));
                if let Ok(room) = clinic.room_by_index(*index) {
                    if let Some(info) = clinic.room_info(room.id()) {
                        print!("{}", info);
                    }
                }
            }
        }
        Commands::Inactive { .. } => {
            let patients = clinic.list_inactive_patients_at(now);
            if cli.json {
                print_json(&patients)?;
            } else if patients.is_empty() {
                println!("No inactive patients.");
            } else {
                for patient in patients {
                    println!("{}", patient.full_name());
                }
            }
        }
        Commands::VisitSummary { .. } => {
            let summary = clinic.patient_visit_summary_past_year_at(now);
            if cli.json {
                print_json(&summary)?;
            } else {
                for entry in summary {
                    println!("{}: {} visit(s)", entry.patient.full_name(), entry.visits);
                }
            }
        }
        Commands::ActiveStaff { .. } => {
            let staff = clinic.list_active_clinical_staff();
            if cli.json {
                print_json(&staff)?;
            } else if staff.is_empty() {
                println!("No active clinical staff with waiting patients.");
            } else {
                for member in staff {
                    println!("{}", member.display_name());
                }
            }
        }
        Commands::StaffPatients { .. } => {
            let grouped = clinic.list_active_staff_with_patients();
            if cli.json {
                print_json(&grouped)?;
            } else {
                for entry in grouped {
                    let names: Vec<String> =
                        entry.patients.iter().map(|p| p.full_name()).collect();
                    println!("{}: {}", entry.staff.display_name(), names.join(", "));
                }
            }
        }
        Commands::StaffCounts { .. } => {
            let counts = clinic.list_staff_patient_counts();
            if cli.json {
                print_json(&counts)?;
            } else {
                for entry in counts {
                    println!("{}: {} patient(s)", entry.staff.full_name(), entry.patients);
                }
            }
        }
        Commands::Staff { .. } => {
            if cli.json {
                let staff: Vec<_> = clinic.staff().collect();
                print_json(&staff)?;
            } else {
                for member in clinic.staff() {
                    println!(
                        "{} [{}]{}",
                        member.staff_details(),
                        member.department(),
                        if member.is_active() { "" } else { " (inactive)" }
                    );
                }
            }
        }
        Commands::Patients { .. } => {
            if cli.json {
                let patients: Vec<_> = clinic.patients().collect();
                print_json(&patients)?;
            } else {
                for patient in clinic.patients() {
                    let room = patient
                        .assigned_room()
                        .and_then(|id| clinic.room(id))
                        .map(|r| r.name())
                        .unwrap_or("no room");
                    println!("{} ({})", patient, room);
                    for visit in patient.visits() {
                        println!("  {}", visit);
                    }
                }
            }
        }
    }

    Ok(())
}
