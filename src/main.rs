use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod api;
mod badges;
mod enrich;
mod models;
mod profile;
mod report;
mod roster;
mod sanitize;
mod settings;
mod stats;

use api::{AppState, StudentListing, StudentResponse, StudentsResponse};
use settings::Settings;

#[derive(Parser)]
#[command(name = "badge-dashboard")]
#[command(about = "Student roster enriched with LeetCode stats and HackerRank badges", long_about = None)]
struct Cli {
    /// Roster CSV file
    #[arg(
        long,
        env = "ROSTER_CSV",
        default_value = "data/student_profiles.csv",
        global = true
    )]
    roster: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long, env = "DASHBOARD_HOST", default_value = "0.0.0.0")]
        host: String,
        #[arg(long, env = "DASHBOARD_PORT", default_value_t = 8000)]
        port: u16,
    },
    /// Look up and enrich a single student
    Student { roll: String },
    /// List the roster without external lookups
    Students,
    /// Enrich every student and write the CSV export
    Export {
        #[arg(long, default_value = "student_data_enhanced.csv")]
        out: PathBuf,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("badge_dashboard=info,tower_http=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let state = AppState::from_settings(&cli.roster, Settings::from_env())?;

    match cli.command {
        Commands::Serve { host, port } => {
            let addr: SocketAddr = format!("{host}:{port}")
                .parse()
                .with_context(|| format!("invalid listen address {host}:{port}"))?;
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;

            tracing::info!(%addr, roster = %cli.roster.display(), "dashboard API listening");
            axum::serve(listener, api::router(state))
                .await
                .context("server error")?;
        }
        Commands::Student { roll } => {
            let roster = state.roster.snapshot().await?;
            let record = state.enricher.get_student(&roster, &roll).await?;
            let response = StudentResponse::from_record(record, state.enricher.settings());
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Students => {
            let roster = state.roster.snapshot().await?;
            let students: Vec<StudentListing> =
                roster.all().iter().map(StudentListing::from).collect();
            let total = students.len();
            println!(
                "{}",
                serde_json::to_string_pretty(&StudentsResponse { students, total })?
            );
        }
        Commands::Export { out } => {
            let roster = state.roster.snapshot().await?;
            if roster.is_empty() {
                println!("No students found in {}.", cli.roster.display());
            }
            let report = state.enricher.bulk_enrich(&roster).await;
            let csv = report::render_csv(&report)?;
            std::fs::write(&out, csv)
                .with_context(|| format!("failed to write {}", out.display()))?;

            let summary = &report.summary;
            println!("Export written to {}.", out.display());
            println!(
                "- {} students, {} with LeetCode stats, {} with HackerRank badges",
                summary.total_students, summary.leetcode_success, summary.hackerrank_success
            );
            println!(
                "- average CGPA {:.2}, {} with backlogs",
                summary.avg_cgpa, summary.students_with_backlogs
            );
        }
    }

    Ok(())
}
