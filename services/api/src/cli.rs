use crate::server;
use clap::{Args, Parser, Subcommand};
use lms::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "lms-api",
    about = "Serve and seed the loan management ledger",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Create the tables if needed and load the seed files, then exit
    Seed(SeedArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Start without loading the seed files
    #[arg(long)]
    pub(crate) skip_seed: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SeedArgs {
    /// Directory holding applicants.json, submissions.json and payments.json
    #[arg(long)]
    pub(crate) dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Seed(args) => server::seed(args).await,
    }
}
