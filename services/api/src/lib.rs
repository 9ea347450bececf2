mod applications;
mod assets;
mod cli;
mod infra;
mod routes;
mod server;

use registration_intake::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
