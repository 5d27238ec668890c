mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use household_eligibility::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
