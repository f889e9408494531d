//! Canonical record shape and the normalization adapter for API payloads.
//!
//! The backing API is loose about field naming (`id` vs `Id`) and about how
//! attachments are delivered (comma-joined string or array). Everything is
//! normalized here, once, before records reach the list engines.

use crate::error::RecordError;
use crate::Date;
use chrono::DateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

const ID_KEYS: &[&str] = &["id", "Id", "ID", "_id"];
const ATTACHMENT_KEYS: &[&str] = &[
    "attachments",
    "documentPath",
    "document_path",
    "files",
    "documents",
];
const STATUS_KEY: &str = "status";

/// Ordered `(column, value)` pairs handed to exporters.
pub type FlatRow = Vec<(String, String)>;

// ============================================================================
// IDENTITY
// ============================================================================

/// Record identifier as issued by the backing API (numeric ids are stringified).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(Self(s.trim().to_string())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        RecordId::from_json(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid record id: {}", value)))
    }
}

// ============================================================================
// KIND
// ============================================================================

/// The three record families managed by the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Case,
    Land,
    Miscellaneous,
}

impl RecordKind {
    pub fn all() -> &'static [RecordKind] {
        &[RecordKind::Case, RecordKind::Land, RecordKind::Miscellaneous]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Case => "case",
            RecordKind::Land => "land",
            RecordKind::Miscellaneous => "miscellaneous",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RecordKind::Case => "Cases",
            RecordKind::Land => "Land Records",
            RecordKind::Miscellaneous => "Miscellaneous Records",
        }
    }

    /// Display/export column order. `status` is carried separately on [`Record`].
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            RecordKind::Case => &[
                "caseNo",
                "title",
                "caseDate",
                "caseType",
                "court",
                "forum",
                "plaintiff",
                "defender",
                "address",
                "shortDescription",
            ],
            RecordKind::Land => &[
                "landId",
                "location",
                "area",
                "ownershipDetails",
                "land_type",
                "state_id",
                "district_id",
                "tehsil_id",
                "rural_urban_area_id",
                "khasra_number",
                "marketValue",
                "remarks",
            ],
            RecordKind::Miscellaneous => &[
                "unit_name",
                "description",
                "url",
                "noc_date",
                "valid_till",
                "notification_days",
            ],
        }
    }

    /// Fields whose string payloads are parsed as calendar dates.
    pub fn date_fields(&self) -> &'static [&'static str] {
        match self {
            RecordKind::Case => &["caseDate"],
            RecordKind::Land => &[],
            RecordKind::Miscellaneous => &["noc_date", "valid_till"],
        }
    }

    fn is_date_field(&self, name: &str) -> bool {
        self.date_fields().contains(&name)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "case" | "cases" => Ok(RecordKind::Case),
            "land" | "land_record" | "landrecord" => Ok(RecordKind::Land),
            "miscellaneous" | "misc" | "other" => Ok(RecordKind::Miscellaneous),
            _ => Err(format!("Invalid RecordKind: {}", s)),
        }
    }
}

// ============================================================================
// STATUS
// ============================================================================

/// Workflow status of a record. Unknown wire values are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum RecordStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
    Other(String),
}

impl RecordStatus {
    /// Statuses a user may pick from the status dropdown.
    pub fn choices() -> [RecordStatus; 4] {
        [
            RecordStatus::Pending,
            RecordStatus::Completed,
            RecordStatus::InProgress,
            RecordStatus::Cancelled,
        ]
    }

    pub fn parse(s: &str) -> Self {
        let token: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();
        match token.as_str() {
            "pending" => RecordStatus::Pending,
            "inprogress" => RecordStatus::InProgress,
            "completed" | "complete" | "done" => RecordStatus::Completed,
            "cancelled" | "canceled" => RecordStatus::Cancelled,
            _ => RecordStatus::Other(s.trim().to_string()),
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RecordStatus::Pending => "Pending",
            RecordStatus::InProgress => "In Progress",
            RecordStatus::Completed => "Completed",
            RecordStatus::Cancelled => "Cancelled",
            RecordStatus::Other(other) => other.as_str(),
        };
        write!(f, "{}", value)
    }
}

impl FromStr for RecordStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RecordStatus::parse(s))
    }
}

impl From<String> for RecordStatus {
    fn from(value: String) -> Self {
        RecordStatus::parse(&value)
    }
}

impl From<RecordStatus> for String {
    fn from(value: RecordStatus) -> Self {
        value.to_string()
    }
}

// ============================================================================
// FIELD VALUES
// ============================================================================

/// Scalar value of a record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Date(Date),
    Text(String),
}

impl FieldValue {
    fn from_json(kind: RecordKind, field: &str, value: &Value) -> Result<Self, RecordError> {
        match value {
            Value::Null => Ok(FieldValue::Null),
            Value::Bool(b) => Ok(FieldValue::Bool(*b)),
            Value::Number(n) => n.as_f64().map(FieldValue::Number).ok_or_else(|| {
                RecordError::UnsupportedValue {
                    field: field.to_string(),
                    reason: format!("number out of range: {}", n),
                }
            }),
            Value::String(s) if kind.is_date_field(field) => Ok(parse_date(s)
                .map(FieldValue::Date)
                .unwrap_or_else(|| FieldValue::Text(s.clone()))),
            Value::String(s) => Ok(FieldValue::Text(s.clone())),
            // Embedded relations stay searchable as their compact JSON text.
            Value::Array(_) | Value::Object(_) => Ok(FieldValue::Text(value.to_string())),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::Text(s) => write!(f, "{}", s),
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

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<Date> for FieldValue {
    fn from(value: Date) -> Self {
        FieldValue::Date(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp into a calendar date.
pub(crate) fn parse_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    if let Ok(date) = Date::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

// ============================================================================
// RECORD
// ============================================================================

/// One row of domain data in canonical shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: RecordId,
    pub kind: RecordKind,
    pub fields: BTreeMap<String, FieldValue>,
    pub attachments: Vec<String>,
    pub status: Option<RecordStatus>,
}

impl Record {
    pub fn new(id: impl Into<String>, kind: RecordKind) -> Self {
        Self {
            id: RecordId::new(id),
            kind,
            fields: BTreeMap::new(),
            attachments: Vec::new(),
            status: None,
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_attachments<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attachments = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Normalize one API payload into the canonical shape.
    pub fn from_json(kind: RecordKind, value: &Value) -> Result<Self, RecordError> {
        let object = value.as_object().ok_or_else(|| RecordError::NotAnObject {
            found: json_type_name(value).to_string(),
        })?;

        let id = ID_KEYS
            .iter()
            .find_map(|key| object.get(*key).and_then(RecordId::from_json))
            .ok_or(RecordError::MissingId)?;

        let attachments = ATTACHMENT_KEYS
            .iter()
            .find_map(|key| object.get(*key))
            .map(normalize_attachments)
            .unwrap_or_default();

        let status = match object.get(STATUS_KEY) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(RecordStatus::parse(s)),
            _ => None,
        };

        let mut fields = BTreeMap::new();
        for (name, raw) in object {
            let name = name.as_str();
            if ID_KEYS.contains(&name) || ATTACHMENT_KEYS.contains(&name) || name == STATUS_KEY {
                continue;
            }
            fields.insert(name.to_string(), FieldValue::from_json(kind, name, raw)?);
        }

        Ok(Self {
            id,
            kind,
            fields,
            attachments,
            status,
        })
    }

    /// Normalize a JSON array response. A non-array body is treated as one record.
    ///
    /// Array entries that cannot be normalized are skipped with a warning so one
    /// malformed row does not hide the rest of the list.
    pub fn list_from_json(kind: RecordKind, value: &Value) -> Result<Vec<Self>, RecordError> {
        match value {
            Value::Array(items) => Ok(items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| match Record::from_json(kind, item) {
                    Ok(record) => Some(record),
                    Err(err) => {
                        tracing::warn!(kind = %kind, index, error = %err, "skipping record");
                        None
                    }
                })
                .collect()),
            other => Ok(vec![Record::from_json(kind, other)?]),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Display text of a field; empty when absent.
    pub fn text(&self, name: &str) -> String {
        self.fields
            .get(name)
            .map(|value| value.to_string())
            .unwrap_or_default()
    }

    /// Flatten into ordered export columns: id, kind columns, extra fields,
    /// status and attachments.
    pub fn to_row(&self) -> FlatRow {
        let columns = self.kind.columns();
        let mut row: FlatRow = Vec::with_capacity(self.fields.len() + 3);
        row.push(("id".to_string(), self.id.to_string()));
        for column in columns {
            if let Some(value) = self.fields.get(*column) {
                row.push((column.to_string(), value.to_string()));
            }
        }
        for (name, value) in &self.fields {
            if !columns.contains(&name.as_str()) {
                row.push((name.clone(), value.to_string()));
            }
        }
        if let Some(status) = &self.status {
            row.push((STATUS_KEY.to_string(), status.to_string()));
        }
        if !self.attachments.is_empty() {
            row.push(("attachments".to_string(), self.attachments.join(", ")));
        }
        row
    }
}

/// Flatten records, preserving their order, for a spreadsheet exporter.
pub fn flatten<'a, I>(records: I) -> Vec<FlatRow>
where
    I: IntoIterator<Item = &'a Record>,
{
    records.into_iter().map(Record::to_row).collect()
}

/// Accept a comma-joined string or an array of references and produce an
/// ordered list of trimmed, non-empty references.
pub fn normalize_attachments(value: &Value) -> Vec<String> {
    match value {
        Value::String(joined) => split_attachments(joined),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

pub(crate) fn split_attachments(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// HEARINGS
// ============================================================================

/// A scheduled or past hearing of a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hearing {
    #[serde(alias = "Id")]
    pub id: RecordId,
    #[serde(default, alias = "caseId")]
    pub case_id: Option<RecordId>,
    #[serde(rename = "hearingDate", alias = "hearing_date", deserialize_with = "deserialize_date")]
    pub hearing_date: Date,
}

fn deserialize_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attachments_from_joined_string() {
        let files = normalize_attachments(&json!("uploads/a.pdf, uploads/b.png ,, "));
        assert_eq!(files, vec!["uploads/a.pdf", "uploads/b.png"]);
    }

    #[test]
    fn test_attachments_from_array() {
        let files = normalize_attachments(&json!([" a.jpg", "b.pdf", ""]));
        assert_eq!(files, vec!["a.jpg", "b.pdf"]);
    }

    #[test]
    fn test_attachments_null_is_empty() {
        assert!(normalize_attachments(&Value::Null).is_empty());
    }

    #[test]
    fn test_record_accepts_capitalized_id_and_numeric_id() {
        let a = Record::from_json(RecordKind::Case, &json!({"Id": 7, "title": "A"})).unwrap();
        assert_eq!(a.id.as_str(), "7");
        let b = Record::from_json(RecordKind::Case, &json!({"id": "c-1"})).unwrap();
        assert_eq!(b.id.as_str(), "c-1");
    }

    #[test]
    fn test_record_without_id_is_rejected() {
        let err = Record::from_json(RecordKind::Land, &json!({"landId": "L1"})).unwrap_err();
        assert_eq!(err, RecordError::MissingId);
    }

    #[test]
    fn test_record_non_object_is_rejected() {
        let err = Record::from_json(RecordKind::Land, &json!([1, 2])).unwrap_err();
        assert!(matches!(err, RecordError::NotAnObject { .. }));
    }

    #[test]
    fn test_record_normalizes_status_dates_and_attachments() {
        let record = Record::from_json(
            RecordKind::Case,
            &json!({
                "id": 3,
                "title": "Smith v. State",
                "caseDate": "2024-02-10T00:00:00.000Z",
                "status": "in progress",
                "documentPath": "x.pdf,y.png"
            }),
        )
        .unwrap();
        assert_eq!(record.status, Some(RecordStatus::InProgress));
        assert_eq!(
            record.field("caseDate"),
            Some(&FieldValue::Date(Date::from_ymd_opt(2024, 2, 10).unwrap()))
        );
        assert_eq!(record.attachments, vec!["x.pdf", "y.png"]);
        assert!(record.field("documentPath").is_none());
        assert!(record.field("status").is_none());
    }

    #[test]
    fn test_unparseable_date_is_kept_as_text() {
        let record =
            Record::from_json(RecordKind::Miscellaneous, &json!({"id": 1, "noc_date": "soon"}))
                .unwrap();
        assert_eq!(record.field("noc_date"), Some(&FieldValue::Text("soon".into())));
    }

    #[test]
    fn test_nested_field_is_kept_as_json_text() {
        let record = Record::from_json(RecordKind::Land, &json!({"id": 1, "owner": {"a": 1}}))
            .unwrap();
        assert_eq!(record.text("owner"), r#"{"a":1}"#);
    }

    #[test]
    fn test_nested_field_does_not_reject_the_list() {
        let records = Record::list_from_json(
            RecordKind::Case,
            &json!([{"id": 1, "title": "A"}, {"id": 2, "user": {"name": "x"}}]),
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].text("user"), r#"{"name":"x"}"#);
    }

    #[test]
    fn test_list_skips_rows_without_id() {
        let records = Record::list_from_json(
            RecordKind::Land,
            &json!([{"id": 1}, {"landId": "L2"}, "junk", {"Id": 3}]),
        )
        .unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_status_parse_is_lenient() {
        assert_eq!(RecordStatus::parse("In_Progress"), RecordStatus::InProgress);
        assert_eq!(RecordStatus::parse("canceled"), RecordStatus::Cancelled);
        assert_eq!(
            RecordStatus::parse(" Adjourned "),
            RecordStatus::Other("Adjourned".to_string())
        );
        assert_eq!(RecordStatus::InProgress.to_string(), "In Progress");
    }

    #[test]
    fn test_number_display_drops_integral_fraction() {
        assert_eq!(FieldValue::Number(1200.0).to_string(), "1200");
        assert_eq!(FieldValue::Number(12.5).to_string(), "12.5");
        assert_eq!(FieldValue::Null.to_string(), "");
    }

    #[test]
    fn test_to_row_orders_columns() {
        let record = Record::new("9", RecordKind::Case)
            .with_field("zeta", "z")
            .with_field("title", "T")
            .with_field("caseNo", "WP/1")
            .with_status(RecordStatus::Pending)
            .with_attachments(["a.pdf", "b.pdf"]);
        let row = record.to_row();
        let columns: Vec<&str> = row.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(
            columns,
            vec!["id", "caseNo", "title", "zeta", "status", "attachments"]
        );
        assert_eq!(record.to_row().last().unwrap().1, "a.pdf, b.pdf");
    }

    #[test]
    fn test_hearing_deserializes_numeric_ids_and_timestamps() {
        let hearing: Hearing = serde_json::from_value(json!({
            "id": 4,
            "caseId": 11,
            "hearingDate": "2024-06-01T00:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(hearing.id.as_str(), "4");
        assert_eq!(hearing.case_id.unwrap().as_str(), "11");
        assert_eq!(hearing.hearing_date, Date::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn test_list_from_json() {
        let records =
            Record::list_from_json(RecordKind::Land, &json!([{"id": 1}, {"id": 2}])).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id.as_str(), "2");
    }
}
