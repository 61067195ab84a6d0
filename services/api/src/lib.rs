mod cli;
mod infra;
mod rank;
mod routes;
mod server;

use resident_rank::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
