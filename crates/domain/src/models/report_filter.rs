//! Filter criteria for passenger records.
//!
//! Criteria arrive as a `field name -> value` mapping (usually JSON). Each key
//! names a record field; a scalar value must equal the field, an array value
//! must contain it. All criteria must hold for a record to match. The special
//! keys `startDate` and `endDate` bound the flight date, inclusively, and
//! `flightIdContains` keeps flights whose id contains the given text,
//! ignoring case.

use chrono::NaiveDate;
use serde_json::Value;
use shared::validation::parse_flight_date;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::passenger_record::{is_not_applicable, PassengerRecord};
use crate::errors::ReportError;

const START_DATE_KEY: &str = "startDate";
const END_DATE_KEY: &str = "endDate";
const FLIGHT_ID_SEARCH_KEY: &str = "flightIdContains";

/// Filterable record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordField {
    Id,
    TimeHour,
    UserName,
    Name,
    Surname,
    Ip,
    Mac,
    Nationality,
    FlightId,
    TailNumber,
    FlightNumber,
    FlightDate,
    CabinType,
    FlightScope,
    FlightType,
    UserSegment,
    ConnectionStatus,
    DataUsageMb,
    UsedPackageName,
    UsedAppName,
    SessionCount,
    LoginCount,
    FailedPurchaseCount,
    Origin,
    Destination,
    PurchaseStatus,
    FailedPurchaseReason,
    PaymentMethod,
    PackageAssignmentStatus,
    InternetUsageStatus,
}

/// Value shape of a field, used to check filter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    /// Text that may be "not applicable"
    Optional,
}

/// Borrowed view of a field on a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef<'a> {
    Text(&'a str),
    Integer(u64),
    Optional(Option<&'a str>),
}

impl fmt::Display for FieldRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Text(value) => write!(f, "{}", value),
            FieldRef::Integer(value) => write!(f, "{}", value),
            FieldRef::Optional(Some(value)) => write!(f, "{}", value),
            FieldRef::Optional(None) => write!(f, "{}", super::passenger_record::NOT_APPLICABLE),
        }
    }
}

impl RecordField {
    /// Every field, in export column order.
    pub const ALL: [RecordField; 30] = [
        RecordField::Id,
        RecordField::TimeHour,
        RecordField::UserName,
        RecordField::Name,
        RecordField::Surname,
        RecordField::Ip,
        RecordField::Mac,
        RecordField::Nationality,
        RecordField::FlightId,
        RecordField::TailNumber,
        RecordField::FlightNumber,
        RecordField::FlightDate,
        RecordField::CabinType,
        RecordField::FlightScope,
        RecordField::FlightType,
        RecordField::UserSegment,
        RecordField::ConnectionStatus,
        RecordField::DataUsageMb,
        RecordField::UsedPackageName,
        RecordField::UsedAppName,
        RecordField::SessionCount,
        RecordField::LoginCount,
        RecordField::FailedPurchaseCount,
        RecordField::Origin,
        RecordField::Destination,
        RecordField::PurchaseStatus,
        RecordField::FailedPurchaseReason,
        RecordField::PaymentMethod,
        RecordField::PackageAssignmentStatus,
        RecordField::InternetUsageStatus,
    ];

    /// Serialized (camelCase) field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::TimeHour => "timeHour",
            Self::UserName => "userName",
            Self::Name => "name",
            Self::Surname => "surname",
            Self::Ip => "ip",
            Self::Mac => "mac",
            Self::Nationality => "nationality",
            Self::FlightId => "flightId",
            Self::TailNumber => "tailNumber",
            Self::FlightNumber => "flightNumber",
            Self::FlightDate => "flightDate",
            Self::CabinType => "cabinType",
            Self::FlightScope => "flightScope",
            Self::FlightType => "flightType",
            Self::UserSegment => "userSegment",
            Self::ConnectionStatus => "connectionStatus",
            Self::DataUsageMb => "dataUsageMB",
            Self::UsedPackageName => "usedPackageName",
            Self::UsedAppName => "usedAppName",
            Self::SessionCount => "sessionCount",
            Self::LoginCount => "loginCount",
            Self::FailedPurchaseCount => "failedPurchaseCount",
            Self::Origin => "origin",
            Self::Destination => "destination",
            Self::PurchaseStatus => "purchaseStatus",
            Self::FailedPurchaseReason => "failedPurchaseReason",
            Self::PaymentMethod => "paymentMethod",
            Self::PackageAssignmentStatus => "packageAssignmentStatus",
            Self::InternetUsageStatus => "internetUsageStatus",
        }
    }

    /// Other accepted names, as used by the dashboard's own extracts.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::TailNumber => &["kuyrukNumarasi"],
            Self::FlightNumber => &["ucusNumarasi"],
            Self::FlightDate => &["ucusTarihi"],
            Self::CabinType => &["kabinTipi"],
            Self::FlightScope => &["ucusSahasi"],
            Self::FlightType => &["ucusTipi"],
            _ => &[],
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::TimeHour
            | Self::DataUsageMb
            | Self::SessionCount
            | Self::LoginCount
            | Self::FailedPurchaseCount => FieldKind::Integer,
            Self::UsedPackageName | Self::UsedAppName | Self::PaymentMethod => FieldKind::Optional,
            _ => FieldKind::Text,
        }
    }

    /// Reads this field from a record.
    pub fn value_of<'a>(&self, record: &'a PassengerRecord) -> FieldRef<'a> {
        match self {
            Self::Id => FieldRef::Text(&record.id),
            Self::TimeHour => FieldRef::Integer(u64::from(record.time_hour)),
            Self::UserName => FieldRef::Text(&record.user_name),
            Self::Name => FieldRef::Text(&record.name),
            Self::Surname => FieldRef::Text(&record.surname),
            Self::Ip => FieldRef::Text(&record.ip),
            Self::Mac => FieldRef::Text(&record.mac),
            Self::Nationality => FieldRef::Text(&record.nationality),
            Self::FlightId => FieldRef::Text(&record.flight_id),
            Self::TailNumber => FieldRef::Text(&record.tail_number),
            Self::FlightNumber => FieldRef::Text(&record.flight_number),
            Self::FlightDate => FieldRef::Text(&record.flight_date),
            Self::CabinType => FieldRef::Text(&record.cabin_type),
            Self::FlightScope => FieldRef::Text(&record.flight_scope),
            Self::FlightType => FieldRef::Text(&record.flight_type),
            Self::UserSegment => FieldRef::Text(&record.user_segment),
            Self::ConnectionStatus => FieldRef::Text(&record.connection_status),
            Self::DataUsageMb => FieldRef::Integer(u64::from(record.data_usage_mb)),
            Self::UsedPackageName => FieldRef::Optional(record.used_package()),
            Self::UsedAppName => FieldRef::Optional(record.used_app()),
            Self::SessionCount => FieldRef::Integer(u64::from(record.session_count)),
            Self::LoginCount => FieldRef::Integer(u64::from(record.login_count)),
            Self::FailedPurchaseCount => FieldRef::Integer(u64::from(record.failed_purchase_count)),
            Self::Origin => FieldRef::Text(&record.origin),
            Self::Destination => FieldRef::Text(&record.destination),
            Self::PurchaseStatus => FieldRef::Text(&record.purchase_status),
            Self::FailedPurchaseReason => FieldRef::Text(&record.failed_purchase_reason),
            Self::PaymentMethod => FieldRef::Optional(record.payment()),
            Self::PackageAssignmentStatus => FieldRef::Text(&record.package_assignment_status),
            Self::InternetUsageStatus => FieldRef::Text(&record.internet_usage_status),
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Folds `dataUsageMB`, `data_usage_mb` and `DATAUSAGEMB` to one spelling.
fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for RecordField {
    type Err = ReportError;

    /// Accepts camelCase or snake_case names and aliases, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_key(s);
        Self::ALL
            .into_iter()
            .find(|field| {
                std::iter::once(field.as_str())
                    .chain(field.aliases().iter().copied())
                    .any(|name| normalize_key(name) == wanted)
            })
            .ok_or_else(|| ReportError::InvalidFilterKey(s.to_string()))
    }
}

/// Expected value of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(u64),
    /// Matches only "not applicable"
    Absent,
}

impl FieldValue {
    fn matches(&self, actual: FieldRef<'_>) -> bool {
        match (self, actual) {
            (Self::Text(expected), FieldRef::Text(value)) => expected == value,
            (Self::Text(expected), FieldRef::Optional(Some(value))) => expected == value,
            (Self::Integer(expected), FieldRef::Integer(value)) => *expected == value,
            (Self::Absent, FieldRef::Optional(None)) => true,
            _ => false,
        }
    }

    /// Checks that this value can ever match `field`.
    fn check_kind(&self, field: RecordField) -> Result<(), ReportError> {
        match (self, field.kind()) {
            (Self::Text(_), FieldKind::Text | FieldKind::Optional)
            | (Self::Integer(_), FieldKind::Integer)
            | (Self::Absent, FieldKind::Optional) => Ok(()),
            (_, FieldKind::Integer) => Err(ReportError::invalid_value(
                field.as_str(),
                "expected a non-negative integer",
            )),
            (Self::Absent, FieldKind::Text) => Err(ReportError::invalid_value(
                field.as_str(),
                "field is never not applicable",
            )),
            (_, _) => Err(ReportError::invalid_value(field.as_str(), "expected a string")),
        }
    }

    fn from_json(field: RecordField, value: &Value) -> Result<Self, ReportError> {
        match (field.kind(), value) {
            (FieldKind::Text, Value::String(s)) => Ok(Self::Text(s.clone())),
            (FieldKind::Optional, Value::String(s)) if is_not_applicable(s) => Ok(Self::Absent),
            (FieldKind::Optional, Value::String(s)) => Ok(Self::Text(s.clone())),
            (FieldKind::Optional, Value::Null) => Ok(Self::Absent),
            (FieldKind::Integer, Value::Number(n)) => n.as_u64().map(Self::Integer).ok_or_else(|| {
                ReportError::invalid_value(field.as_str(), "expected a non-negative integer")
            }),
            (FieldKind::Integer, _) => Err(ReportError::invalid_value(
                field.as_str(),
                "expected a non-negative integer",
            )),
            (_, _) => Err(ReportError::invalid_value(field.as_str(), "expected a string")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Integer(value)
    }
}

/// Constraint placed on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    Equals(FieldValue),
    /// Any listed value matches; an empty list places no constraint.
    AnyOf(Vec<FieldValue>),
}

impl Criterion {
    pub fn matches(&self, actual: FieldRef<'_>) -> bool {
        match self {
            Criterion::Equals(expected) => expected.matches(actual),
            Criterion::AnyOf(options) => {
                options.is_empty() || options.iter().any(|option| option.matches(actual))
            }
        }
    }

    fn from_json(field: RecordField, value: &Value) -> Result<Self, ReportError> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Array(_) => Err(ReportError::invalid_value(
                        field.as_str(),
                        "nested lists are not supported",
                    )),
                    _ => FieldValue::from_json(field, item),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Criterion::AnyOf),
            _ => FieldValue::from_json(field, value).map(Criterion::Equals),
        }
    }
}

/// Inclusive flight date window; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlightDateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl FlightDateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, ReportError> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(ReportError::invalid_value(
                    START_DATE_KEY,
                    format!("start date {} is after end date {}", start, end),
                ));
            }
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// Unparseable dates are never inside a window.
    pub fn contains(&self, flight_date: &str) -> bool {
        let Some(date) = parse_flight_date(flight_date) else {
            return false;
        };
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

/// A validated set of record criteria, combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    criteria: BTreeMap<RecordField, Criterion>,
    flight_dates: Option<FlightDateRange>,
    /// Lowercased, never empty
    flight_id_search: Option<String>,
}

impl FilterCriteria {
    /// Criteria that match every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires `field` to equal `value`, replacing any earlier criterion.
    ///
    /// Fails if the value has the wrong type for the field.
    pub fn with_equals(
        mut self,
        field: RecordField,
        value: impl Into<FieldValue>,
    ) -> Result<Self, ReportError> {
        let value = value.into();
        value.check_kind(field)?;
        self.criteria.insert(field, Criterion::Equals(value));
        Ok(self)
    }

    /// Requires `field` to equal one of `values`, replacing any earlier criterion.
    pub fn with_any_of<I, V>(mut self, field: RecordField, values: I) -> Result<Self, ReportError>
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        let options: Vec<FieldValue> = values.into_iter().map(Into::into).collect();
        for option in &options {
            option.check_kind(field)?;
        }
        self.criteria.insert(field, Criterion::AnyOf(options));
        Ok(self)
    }

    pub fn with_flight_dates(mut self, range: FlightDateRange) -> Self {
        self.flight_dates = Some(range);
        self
    }

    /// Keeps flights whose id contains `needle`, ignoring case. Empty text
    /// places no constraint.
    pub fn with_flight_id_search(mut self, needle: &str) -> Self {
        self.flight_id_search = Some(needle.to_lowercase()).filter(|n| !n.is_empty());
        self
    }

    /// Number of constrained fields, counting a date window as one.
    pub fn len(&self) -> usize {
        self.criteria.len()
            + usize::from(self.flight_dates.is_some())
            + usize::from(self.flight_id_search.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, field: RecordField) -> Option<&Criterion> {
        self.criteria.get(&field)
    }

    pub fn flight_dates(&self) -> Option<&FlightDateRange> {
        self.flight_dates.as_ref()
    }

    pub fn flight_id_search(&self) -> Option<&str> {
        self.flight_id_search.as_deref()
    }

    /// Checks a record against every criterion.
    pub fn matches(&self, record: &PassengerRecord) -> bool {
        if let Some(range) = &self.flight_dates {
            if !range.contains(&record.flight_date) {
                return false;
            }
        }
        if let Some(needle) = &self.flight_id_search {
            if !record.flight_id.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        self.criteria
            .iter()
            .all(|(field, criterion)| criterion.matches(field.value_of(record)))
    }

    /// Builds criteria from `key -> value` entries.
    ///
    /// Fails on the first unknown key, badly typed value, or a key named
    /// twice under different spellings.
    pub fn from_entries<'a, I>(entries: I) -> Result<Self, ReportError>
    where
        I: IntoIterator<Item = (&'a String, &'a Value)>,
    {
        let mut result = Self::new();
        let mut start = None;
        let mut end = None;
        let mut search: Option<&str> = None;

        for (key, value) in entries {
            let normalized = normalize_key(key);
            if normalized == normalize_key(START_DATE_KEY) {
                let date = parse_date_value(START_DATE_KEY, value)?;
                set_once(&mut start, date, START_DATE_KEY)?;
                continue;
            }
            if normalized == normalize_key(END_DATE_KEY) {
                let date = parse_date_value(END_DATE_KEY, value)?;
                set_once(&mut end, date, END_DATE_KEY)?;
                continue;
            }
            if normalized == normalize_key(FLIGHT_ID_SEARCH_KEY) {
                let needle = value.as_str().ok_or_else(|| {
                    ReportError::invalid_value(FLIGHT_ID_SEARCH_KEY, "expected a string")
                })?;
                set_once(&mut search, needle, FLIGHT_ID_SEARCH_KEY)?;
                continue;
            }

            let field: RecordField = key.parse()?;
            let criterion = Criterion::from_json(field, value)?;
            if result.criteria.insert(field, criterion).is_some() {
                return Err(ReportError::invalid_value(
                    field.as_str(),
                    "field is specified more than once",
                ));
            }
        }

        if start.is_some() || end.is_some() {
            result.flight_dates = Some(FlightDateRange::new(start, end)?);
        }
        if let Some(needle) = search {
            result = result.with_flight_id_search(needle);
        }

        Ok(result)
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, key: &str) -> Result<(), ReportError> {
    if slot.replace(value).is_some() {
        return Err(ReportError::invalid_value(key, "field is specified more than once"));
    }
    Ok(())
}

fn parse_date_value(key: &str, value: &Value) -> Result<NaiveDate, ReportError> {
    value
        .as_str()
        .and_then(parse_flight_date)
        .ok_or_else(|| ReportError::invalid_value(key, "expected a date in YYYY-MM-DD format"))
}

impl TryFrom<&serde_json::Map<String, Value>> for FilterCriteria {
    type Error = ReportError;

    fn try_from(map: &serde_json::Map<String, Value>) -> Result<Self, Self::Error> {
        Self::from_entries(map)
    }
}
