//! Domain models for the passenger report service.

pub mod passenger_record;
pub mod report_filter;
pub mod report_summary;

pub use passenger_record::{is_not_applicable, PassengerRecord, NOT_APPLICABLE};
pub use report_filter::{
    Criterion, FieldKind, FieldRef, FieldValue, FilterCriteria, FlightDateRange, RecordField,
};
pub use report_summary::{
    rank_counts, rank_usage, AccessMetrics, CountItem, PassengerReportSummary, UsageItem,
};
