use anyhow::Result;
use domain::services::PassengerReportService;
use tracing::info;

use passenger_report::{config, logging, runner};

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging
    logging::init_logging(&config.logging);

    info!("Starting passenger report v{}", env!("CARGO_PKG_VERSION"));

    let service = PassengerReportService::new();
    let report = runner::run(&config, &service)?;

    info!(
        source_records = report.source_records,
        matched_records = report.matched_records,
        "Report completed"
    );

    Ok(())
}
