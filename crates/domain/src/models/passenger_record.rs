//! Passenger analysis record domain model.

use serde::{Deserialize, Deserializer, Serialize};
use shared::validation::parse_leading_integer;
use validator::Validate;

/// Marker used by source extracts for "not applicable".
pub const NOT_APPLICABLE: &str = "N/A";

/// Returns true if a raw value means "not applicable".
///
/// Only the exact marker counts; an empty name is a name of its own.
pub fn is_not_applicable(value: &str) -> bool {
    value == NOT_APPLICABLE
}

/// One observation of a passenger's network, session and usage data.
///
/// Optional names (package, app, payment method) are `None` when the source
/// marked them as not applicable or sent `null`. Flight fields also accept
/// the field names of the dashboard's own extracts (`kuyrukNumarasi`,
/// `ucusNumarasi`, `ucusTarihi`, `kabinTipi`, `ucusSahasi`, `ucusTipi`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PassengerRecord {
    pub id: String,

    #[validate(range(max = 23, message = "Hour must be between 0 and 23"))]
    pub time_hour: u8,

    pub user_name: String,
    pub name: String,
    pub surname: String,
    pub ip: String,

    /// Device identity key, compared as-is
    pub mac: String,

    #[serde(default)]
    pub nationality: String,

    pub flight_id: String,

    #[serde(alias = "kuyrukNumarasi")]
    pub tail_number: String,

    #[serde(alias = "ucusNumarasi")]
    pub flight_number: String,

    /// Flight date, expected as `YYYY-MM-DD`
    #[serde(alias = "ucusTarihi")]
    pub flight_date: String,

    #[serde(alias = "kabinTipi")]
    pub cabin_type: String,

    /// Domestic or international
    #[serde(default, alias = "ucusSahasi")]
    pub flight_scope: String,

    /// Short, medium or long haul
    #[serde(default, alias = "ucusTipi")]
    pub flight_type: String,

    pub user_segment: String,
    pub connection_status: String,

    #[serde(rename = "dataUsageMB")]
    pub data_usage_mb: u32,

    #[serde(default, deserialize_with = "deserialize_applicable")]
    pub used_package_name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_applicable")]
    pub used_app_name: Option<String>,

    pub session_count: u32,
    pub login_count: u32,
    pub failed_purchase_count: u32,

    #[serde(default)]
    pub origin: String,

    #[serde(default)]
    pub destination: String,

    #[serde(default)]
    pub purchase_status: String,

    #[serde(default)]
    pub failed_purchase_reason: String,

    #[serde(default, deserialize_with = "deserialize_applicable")]
    pub payment_method: Option<String>,

    #[serde(default)]
    pub package_assignment_status: String,

    /// Number of internet service activations, as text ("0", "1", ...)
    #[serde(default)]
    pub internet_usage_status: String,
}

impl PassengerRecord {
    /// Package name, if one applies.
    pub fn used_package(&self) -> Option<&str> {
        applicable(self.used_package_name.as_deref())
    }

    /// App name, if one applies.
    pub fn used_app(&self) -> Option<&str> {
        applicable(self.used_app_name.as_deref())
    }

    /// Payment method, if one applies.
    pub fn payment(&self) -> Option<&str> {
        applicable(self.payment_method.as_deref())
    }

    /// Internet service activations; zero when the status is not numeric.
    pub fn internet_activations(&self) -> i64 {
        parse_leading_integer(&self.internet_usage_status).unwrap_or(0)
    }
}

// Records built in code may still carry the raw marker.
fn applicable(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !is_not_applicable(v))
}

fn deserialize_applicable<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !is_not_applicable(v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source_json() -> serde_json::Value {
        json!({
            "id": "P-0001",
            "timeHour": 3,
            "userName": "jdoe",
            "name": "Jane",
            "surname": "Doe",
            "ip": "10.0.0.12",
            "mac": "00:1A:2B:3C:4D:5E",
            "nationality": "TR",
            "flightId": "FL-100",
            "tailNumber": "TC-JJA",
            "flightNumber": "TK1",
            "flightDate": "2025-06-01",
            "cabinType": "Business",
            "userSegment": "ELIT",
            "connectionStatus": "connected",
            "dataUsageMB": 120,
            "usedPackageName": "Stream",
            "usedAppName": "N/A",
            "sessionCount": 2,
            "loginCount": 1,
            "failedPurchaseCount": 0
        })
    }

    #[test]
    fn test_deserialize_source_record() {
        let record: PassengerRecord = serde_json::from_value(source_json()).unwrap();
        assert_eq!(record.id, "P-0001");
        assert_eq!(record.time_hour, 3);
        assert_eq!(record.data_usage_mb, 120);
        assert_eq!(record.used_package_name.as_deref(), Some("Stream"));
        assert_eq!(record.used_app_name, None);
        assert_eq!(record.payment_method, None);
        assert!(record.origin.is_empty());
    }

    #[test]
    fn test_not_applicable_values_become_none() {
        let mut value = source_json();
        value["usedPackageName"] = json!(null);
        value["usedAppName"] = json!("N/A");
        value["paymentMethod"] = json!("N/A");

        let record: PassengerRecord = serde_json::from_value(value).unwrap();
        assert!(record.used_package_name.is_none());
        assert!(record.used_app_name.is_none());
        assert!(record.payment_method.is_none());
    }

    #[test]
    fn test_empty_names_are_kept() {
        let mut value = source_json();
        value["usedPackageName"] = json!("");
        value["usedAppName"] = json!("");

        let record: PassengerRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.used_package_name.as_deref(), Some(""));
        assert_eq!(record.used_package(), Some(""));
        assert_eq!(record.used_app(), Some(""));
    }

    #[test]
    fn test_deserialize_dashboard_field_names() {
        let value = json!({
            "id": "PAX-7",
            "timeHour": 8,
            "userName": "TK_USER_0007",
            "name": "Yolcu",
            "surname": "Soyadi 7",
            "ip": "192.168.1.7",
            "mac": "C2:DB:20:BA:F3:7",
            "flightId": "TK1007",
            "kuyrukNumarasi": "TC-LGA",
            "ucusNumarasi": "TK1007",
            "ucusTarihi": "2025-05-15",
            "origin": "IST",
            "destination": "JFK",
            "kabinTipi": "Economy",
            "userSegment": "CLSC",
            "ucusSahasi": "Yurtdisi",
            "ucusTipi": "Long",
            "connectionStatus": "Success",
            "purchaseStatus": "Failed",
            "failedPurchaseReason": "Card declined",
            "paymentMethod": "N/A",
            "failedPurchaseCount": 1,
            "usedPackageName": "N/A",
            "packageAssignmentStatus": "Failed",
            "dataUsageMB": 0,
            "usedAppName": "N/A",
            "sessionCount": 3,
            "internetUsageStatus": "0",
            "loginCount": 1
        });

        let record: PassengerRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.tail_number, "TC-LGA");
        assert_eq!(record.flight_number, "TK1007");
        assert_eq!(record.flight_date, "2025-05-15");
        assert_eq!(record.cabin_type, "Economy");
        assert_eq!(record.flight_scope, "Yurtdisi");
        assert_eq!(record.flight_type, "Long");
        assert_eq!(record.failed_purchase_reason, "Card declined");
        assert_eq!(record.package_assignment_status, "Failed");
        assert!(record.nationality.is_empty());
        assert_eq!(record.internet_activations(), 0);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_internet_activations() {
        let mut record = PassengerRecord {
            internet_usage_status: "1".to_string(),
            ..Default::default()
        };
        assert_eq!(record.internet_activations(), 1);

        record.internet_usage_status = "3 times".to_string();
        assert_eq!(record.internet_activations(), 3);

        record.internet_usage_status = "unknown".to_string();
        assert_eq!(record.internet_activations(), 0);

        record.internet_usage_status.clear();
        assert_eq!(record.internet_activations(), 0);
    }

    #[test]
    fn test_accessors_hide_raw_marker() {
        let record = PassengerRecord {
            used_package_name: Some(NOT_APPLICABLE.to_string()),
            used_app_name: Some("YouTube".to_string()),
            ..Default::default()
        };
        assert_eq!(record.used_package(), None);
        assert_eq!(record.used_app(), Some("YouTube"));
        assert_eq!(record.payment(), None);
    }

    #[test]
    fn test_serialize_uses_source_field_names() {
        let record: PassengerRecord = serde_json::from_value(source_json()).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"dataUsageMB\":120"));
        assert!(json.contains("\"timeHour\":3"));
        assert!(json.contains("\"usedAppName\":null"));
    }

    #[test]
    fn test_equality_requires_all_fields() {
        let a: PassengerRecord = serde_json::from_value(source_json()).unwrap();
        let mut b = a.clone();
        assert_eq!(a, b);
        b.login_count += 1;
        assert_ne!(a, b);
    }

    #[test]
    fn test_validate_record() {
        let record: PassengerRecord = serde_json::from_value(source_json()).unwrap();
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_hour_out_of_range() {
        let record = PassengerRecord {
            time_hour: 24,
            ..Default::default()
        };
        let errors = record.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("time_hour"));
    }

    #[test]
    fn test_validate_accepts_free_form_strings() {
        for mac in ["A1", "", "C2:DB:20:BA:F3:A"] {
            let record = PassengerRecord {
                mac: mac.to_string(),
                flight_date: "15.05.2025".to_string(),
                ..Default::default()
            };
            assert!(record.validate().is_ok(), "mac {:?} rejected", mac);
        }
    }

    #[test]
    fn test_is_not_applicable() {
        assert!(is_not_applicable("N/A"));
        assert!(!is_not_applicable(""));
        assert!(!is_not_applicable("n/a"));
        assert!(!is_not_applicable("n/a pack"));
        assert!(!is_not_applicable("Netflix"));
    }
}
