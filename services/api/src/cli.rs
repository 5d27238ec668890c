use crate::commands::{run_evaluate, run_import, EvaluateArgs, ImportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use household_eligibility::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Household Eligibility Service",
    about = "Evaluate households for resident assistance and reduced transit fare",
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
    /// Evaluate a single household against the configured database
    Evaluate(EvaluateArgs),
    /// Load households and recipients from CSV exports into the configured database
    Import(ImportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args),
        Command::Import(args) => run_import(args),
    }
}
