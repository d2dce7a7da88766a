mod cli;
mod infra;
mod report;
mod routes;
mod server;

use classroom_grades::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
