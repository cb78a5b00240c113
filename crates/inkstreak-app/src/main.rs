mod application;
mod presentation;

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    presentation::cli::run().await
}
