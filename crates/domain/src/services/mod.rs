//! Domain services for the passenger report service.
//!
//! Services contain reporting logic that operates on domain models.

pub mod export;
pub mod report;

pub use export::{records_to_csv, to_json, ReportFormat};
pub use report::{
    access_metrics, calculate_payment_distribution, records_until_hour, total_failed_purchases,
    total_internet_activations, PassengerReportService, ReportService,
};
