use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;

use boosterdash_lib::AppState;

#[derive(Parser)]
#[command(
    name = "boosterdash",
    version,
    about = "Board reporting over the booster club's synced Drive folder",
    long_about = "Reads the treasurer's workbooks, rosters, volunteer sheets and board \
                  documents from a locally synced folder and prints them as JSON."
)]
struct Cli {
    /// Root of the synced folder tree (overrides config and BOOSTERDASH_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Current fiscal-year budget
    Budget,
    /// Monthly income and expenses
    Monthly,
    /// Checking and savings balances
    Balances,
    /// Year-over-year budget totals
    Historical,
    /// Revenue line items per fiscal year
    RevenueHistory,
    /// Square transactions
    #[command(alias = "txn")]
    Transactions,
    /// Transaction totals by month and category
    TransactionSummary,
    /// Coach's fund ledger
    CoachsFund,
    /// Team rosters
    Rosters,
    /// Uniform inventory
    Uniforms,
    /// Volunteer needs by team
    Volunteers,
    /// Board meeting agendas
    Agendas,
    /// Organization bylaws
    Bylaws,
    /// Meeting minutes archive
    Minutes,
    /// Compliance filings on record
    ComplianceDocs,
    /// Upcoming and overdue deadlines
    Notifications,
    /// Search pages, alumni, sponsors and compliance items
    Search {
        /// Search terms (all must match)
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Time of the most recent Drive sync
    SyncTime,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let state = AppState::new(cli.data_dir);
    let dashboard = state.dashboard;

    match cli.command {
        Commands::Budget => print_json(&*dashboard.current_budget().await),
        Commands::Monthly => print_json(&*dashboard.monthly_budget().await),
        Commands::Balances => print_json(&*dashboard.fund_balances().await),
        Commands::Historical => print_json(&*dashboard.historical_budgets().await),
        Commands::RevenueHistory => print_json(&*dashboard.historical_revenue().await),
        Commands::Transactions => print_json(&*dashboard.transactions().await),
        Commands::TransactionSummary => print_json(&*dashboard.transaction_summary().await),
        Commands::CoachsFund => print_json(&*dashboard.coachs_fund().await),
        Commands::Rosters => print_json(&*dashboard.rosters().await),
        Commands::Uniforms => print_json(&*dashboard.uniform_inventory().await),
        Commands::Volunteers => print_json(&*dashboard.volunteer_summary().await),
        Commands::Agendas => print_json(&*dashboard.board_meetings().await),
        Commands::Bylaws => print_json(&*dashboard.bylaws().await),
        Commands::Minutes => print_json(&*dashboard.meeting_minutes().await),
        Commands::ComplianceDocs => print_json(&*dashboard.compliance_documents().await),
        Commands::Notifications => print_json(&dashboard.notifications()),
        Commands::Search { query } => print_json(&dashboard.search(&query.join(" "))),
        Commands::SyncTime => print_json(&dashboard.last_sync_time().await),
    }
}
