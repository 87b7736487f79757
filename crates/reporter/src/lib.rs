//! Runner for passenger reports.
//!
//! Loads configuration, reads a JSON extract of passenger records and renders
//! the filtered report as JSON or CSV.

pub mod config;
pub mod logging;
pub mod runner;
