//! Domain layer for the passenger report service.
//!
//! This crate contains:
//! - Domain models (PassengerRecord, FilterCriteria, report summaries)
//! - Reporting and export services
//! - Domain error types

pub mod errors;
pub mod models;
pub mod services;

pub use errors::ReportError;
