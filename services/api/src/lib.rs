mod cli;
mod infra;
mod process;
mod routes;
mod server;

use payroll_summary::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
