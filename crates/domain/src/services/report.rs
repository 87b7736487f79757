//! Passenger report service.
//!
//! Filters passenger records and computes the aggregates shown on the
//! passenger analysis dashboard: unique devices, usage per package and app,
//! payment method distribution, access totals and internet service
//! activations.
//!
//! Every operation is a pure function of its input. Records are only read;
//! filtered results are clones in their original order.

use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::errors::ReportError;
use crate::models::{
    rank_counts, rank_usage, AccessMetrics, FilterCriteria, PassengerRecord,
    PassengerReportSummary,
};

/// Reporting operations over passenger records.
pub trait ReportService: Send + Sync {
    /// Returns the records matching every `field -> value` filter.
    ///
    /// Unknown keys and badly typed values are rejected before any record is
    /// examined.
    fn filter_records(
        &self,
        records: &[PassengerRecord],
        filters: &HashMap<String, Value>,
    ) -> Result<Vec<PassengerRecord>, ReportError> {
        let criteria = FilterCriteria::from_entries(filters).inspect_err(|e| {
            warn!(error = %e, "Rejected filter criteria");
        })?;
        Ok(self.filter_with(records, &criteria))
    }

    /// Returns the records matching already validated criteria.
    fn filter_with(
        &self,
        records: &[PassengerRecord],
        criteria: &FilterCriteria,
    ) -> Vec<PassengerRecord>;

    /// Counts distinct MAC addresses.
    fn count_unique_devices(&self, records: &[PassengerRecord]) -> usize;

    /// Sums data usage (MB) per package, skipping records without one.
    fn calculate_usage_by_package(&self, records: &[PassengerRecord]) -> HashMap<String, f64>;

    /// Sums data usage (MB) per app, skipping records without one.
    fn calculate_usage_by_app(&self, records: &[PassengerRecord]) -> HashMap<String, f64>;

    /// Builds the dashboard summary for a set of records.
    fn summarize(&self, records: &[PassengerRecord]) -> PassengerReportSummary {
        let total_usage: u64 = records.iter().map(|r| u64::from(r.data_usage_mb)).sum();

        PassengerReportSummary {
            record_count: records.len(),
            unique_devices: self.count_unique_devices(records),
            access: access_metrics(records),
            failed_purchases: total_failed_purchases(records),
            internet_activations: total_internet_activations(records),
            total_usage_mb: total_usage as f64,
            usage_by_package: rank_usage(self.calculate_usage_by_package(records)),
            usage_by_app: rank_usage(self.calculate_usage_by_app(records)),
            payment_methods: rank_counts(calculate_payment_distribution(records)),
        }
    }
}

/// Stateless [`ReportService`] implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassengerReportService;

impl PassengerReportService {
    pub fn new() -> Self {
        Self
    }
}

impl ReportService for PassengerReportService {
    fn filter_with(
        &self,
        records: &[PassengerRecord],
        criteria: &FilterCriteria,
    ) -> Vec<PassengerRecord> {
        let matched: Vec<PassengerRecord> = records
            .iter()
            .filter(|record| criteria.matches(record))
            .cloned()
            .collect();

        debug!(
            records = records.len(),
            criteria = criteria.len(),
            matched = matched.len(),
            "Filtered passenger records"
        );
        matched
    }

    fn count_unique_devices(&self, records: &[PassengerRecord]) -> usize {
        let devices: HashSet<&str> = records.iter().map(|r| r.mac.as_str()).collect();
        devices.len()
    }

    fn calculate_usage_by_package(&self, records: &[PassengerRecord]) -> HashMap<String, f64> {
        let usage = sum_usage_by(records, PassengerRecord::used_package);
        debug!(
            records = records.len(),
            packages = usage.len(),
            "Calculated usage by package"
        );
        usage
    }

    fn calculate_usage_by_app(&self, records: &[PassengerRecord]) -> HashMap<String, f64> {
        let usage = sum_usage_by(records, PassengerRecord::used_app);
        debug!(
            records = records.len(),
            apps = usage.len(),
            "Calculated usage by app"
        );
        usage
    }
}

/// Totals are kept as integers until the end so sums stay exact.
fn sum_usage_by<'a, F>(records: &'a [PassengerRecord], key: F) -> HashMap<String, f64>
where
    F: Fn(&'a PassengerRecord) -> Option<&'a str>,
{
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for record in records {
        if let Some(name) = key(record) {
            *totals.entry(name).or_default() += u64::from(record.data_usage_mb);
        }
    }

    totals
        .into_iter()
        .map(|(name, total)| (name.to_string(), total as f64))
        .collect()
}

/// Records up to and including `hour`, for the cumulative timeline view.
pub fn records_until_hour(records: &[PassengerRecord], hour: u8) -> Vec<PassengerRecord> {
    records
        .iter()
        .filter(|r| r.time_hour <= hour)
        .cloned()
        .collect()
}

/// Counts records per payment method, skipping records without one.
pub fn calculate_payment_distribution(records: &[PassengerRecord]) -> HashMap<String, u64> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for method in records.iter().filter_map(PassengerRecord::payment) {
        *counts.entry(method.to_string()).or_default() += 1;
    }
    counts
}

/// Sums session and login counters.
pub fn access_metrics(records: &[PassengerRecord]) -> AccessMetrics {
    records
        .iter()
        .fold(AccessMetrics::default(), |mut acc, record| {
            acc.sessions += u64::from(record.session_count);
            acc.logins += u64::from(record.login_count);
            acc
        })
}

pub fn total_failed_purchases(records: &[PassengerRecord]) -> u64 {
    records
        .iter()
        .map(|r| u64::from(r.failed_purchase_count))
        .sum()
}

/// Sums internet service activations; non-numeric statuses count as zero.
pub fn total_internet_activations(records: &[PassengerRecord]) -> i64 {
    records
        .iter()
        .map(PassengerRecord::internet_activations)
        .fold(0i64, i64::saturating_add)
}
