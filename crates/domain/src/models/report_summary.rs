//! Report summary domain models.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Data usage attributed to one package or app.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageItem {
    pub name: String,
    #[serde(rename = "usageMB")]
    pub usage_mb: f64,
}

/// Number of records attributed to one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountItem {
    pub name: String,
    pub count: u64,
}

/// Access totals across records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessMetrics {
    pub sessions: u64,
    pub logins: u64,
}

/// Dashboard view of a set of passenger records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerReportSummary {
    pub record_count: usize,
    /// Distinct MAC addresses
    pub unique_devices: usize,
    pub access: AccessMetrics,
    pub failed_purchases: u64,
    /// Sum of numeric internet usage statuses
    pub internet_activations: i64,
    /// All usage, including records without a package or app
    #[serde(rename = "totalUsageMB")]
    pub total_usage_mb: f64,
    /// Ranked by usage, highest first
    pub usage_by_package: Vec<UsageItem>,
    /// Ranked by usage, highest first
    pub usage_by_app: Vec<UsageItem>,
    /// Ranked by count, highest first
    pub payment_methods: Vec<CountItem>,
}

/// Orders a usage mapping by value descending, then name ascending.
pub fn rank_usage(usage: HashMap<String, f64>) -> Vec<UsageItem> {
    let mut items: Vec<UsageItem> = usage
        .into_iter()
        .map(|(name, usage_mb)| UsageItem { name, usage_mb })
        .collect();
    items.sort_by(|a, b| {
        b.usage_mb
            .partial_cmp(&a.usage_mb)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    items
}

/// Orders a count mapping by count descending, then name ascending.
pub fn rank_counts(counts: HashMap<String, u64>) -> Vec<CountItem> {
    let mut items: Vec<CountItem> = counts
        .into_iter()
        .map(|(name, count)| CountItem { name, count })
        .collect();
    items.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_usage_orders_descending() {
        let usage = HashMap::from([
            ("Surf".to_string(), 20.0),
            ("Stream".to_string(), 300.0),
            ("Messaging".to_string(), 5.0),
        ]);
        let ranked = rank_usage(usage);
        let names: Vec<&str> = ranked.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Stream", "Surf", "Messaging"]);
    }

    #[test]
    fn test_rank_usage_breaks_ties_by_name() {
        let usage = HashMap::from([("b".to_string(), 1.0), ("a".to_string(), 1.0)]);
        let ranked = rank_usage(usage);
        assert_eq!(ranked[0].name, "a");
        assert_eq!(ranked[1].name, "b");
    }

    #[test]
    fn test_rank_counts() {
        let counts = HashMap::from([
            ("Miles".to_string(), 2),
            ("Credit Card".to_string(), 7),
            ("Voucher".to_string(), 2),
        ]);
        let ranked = rank_counts(counts);
        assert_eq!(
            ranked,
            vec![
                CountItem { name: "Credit Card".to_string(), count: 7 },
                CountItem { name: "Miles".to_string(), count: 2 },
                CountItem { name: "Voucher".to_string(), count: 2 },
            ]
        );
    }

    #[test]
    fn test_summary_serialization() {
        let summary = PassengerReportSummary {
            record_count: 1,
            unique_devices: 1,
            access: AccessMetrics { sessions: 3, logins: 2 },
            failed_purchases: 0,
            internet_activations: 1,
            total_usage_mb: 50.0,
            usage_by_package: vec![UsageItem { name: "Surf".to_string(), usage_mb: 50.0 }],
            usage_by_app: vec![],
            payment_methods: vec![],
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"uniqueDevices\":1"));
        assert!(json.contains("\"internetActivations\":1"));
        assert!(json.contains("\"totalUsageMB\":50.0"));
        assert!(json.contains("\"usageMB\":50.0"));
        assert!(json.contains("\"access\":{\"sessions\":3,\"logins\":2}"));
    }
}
