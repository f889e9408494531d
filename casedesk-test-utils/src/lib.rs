//! CaseDesk Test Utilities
//!
//! Shared test infrastructure for the CaseDesk workspace:
//! - Proptest generators for records, statuses and attachment lists
//! - A scripted option source with per-parent latency
//! - Fixtures for common scenarios and API payloads
//! - Assertions for selector and filter invariants

pub use casedesk_core::{
    CascadingSelector, FieldValue, OptionSource, OptionSourceError, Record, RecordId, RecordKind,
    RecordStatus, SelectOption, Session, StaticSession,
};

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

type LevelKey = (String, Option<String>);

fn level_key(level: &str, parent: Option<&str>) -> LevelKey {
    (level.to_string(), parent.map(str::to_string))
}

// ============================================================================
// MOCK OPTION SOURCE
// ============================================================================

/// Option source answering from a script.
///
/// Unscripted `(level, parent)` pairs answer with an empty list. Delays are
/// keyed by parent value so a test can make one parent's response arrive after
/// another's.
#[derive(Debug, Default)]
pub struct MockOptionSource {
    options: HashMap<LevelKey, Vec<SelectOption>>,
    failures: HashSet<LevelKey>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<LevelKey>>,
}

impl MockOptionSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, level: &str, parent: Option<&str>, ids: &[&str]) -> Self {
        let options = ids.iter().map(|id| SelectOption::new(*id, *id)).collect();
        self.options.insert(level_key(level, parent), options);
        self
    }

    pub fn failing(mut self, level: &str, parent: Option<&str>) -> Self {
        self.failures.insert(level_key(level, parent));
        self
    }

    /// Delay every response whose parent value is `parent`.
    pub fn delayed(mut self, parent: &str, delay: Duration) -> Self {
        self.delays.insert(parent.to_string(), delay);
        self
    }

    /// Requests seen so far, in arrival order.
    pub fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl OptionSource for MockOptionSource {
    async fn fetch_options(
        &self,
        level: &str,
        parent: Option<&str>,
    ) -> Result<Vec<SelectOption>, OptionSourceError> {
        let key = level_key(level, parent);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(key.clone());
        }
        if let Some(delay) = parent.and_then(|p| self.delays.get(p)) {
            tokio::time::sleep(*delay).await;
        }
        if self.failures.contains(&key) {
            return Err(OptionSourceError::Unavailable {
                level: level.to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        Ok(self.options.get(&key).cloned().unwrap_or_default())
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for CaseDesk domain types.

    use super::*;
    use casedesk_core::Date;
    use proptest::prelude::*;

    pub fn arb_status() -> impl Strategy<Value = RecordStatus> {
        prop_oneof![
            Just(RecordStatus::Pending),
            Just(RecordStatus::InProgress),
            Just(RecordStatus::Completed),
            Just(RecordStatus::Cancelled),
            "[A-Z][a-z]{3,10}".prop_map(RecordStatus::Other),
        ]
    }

    pub fn arb_date() -> impl Strategy<Value = Date> {
        (2000i32..2030, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| {
            Date::from_ymd_opt(y, m, d).unwrap_or_default()
        })
    }

    pub fn arb_field_value() -> impl Strategy<Value = FieldValue> {
        prop_oneof![
            Just(FieldValue::Null),
            any::<bool>().prop_map(FieldValue::Bool),
            (0i64..1_000_000).prop_map(FieldValue::from),
            arb_date().prop_map(FieldValue::Date),
            "[a-zA-Z0-9 ./-]{0,24}".prop_map(FieldValue::Text),
        ]
    }

    /// Attachment references with a mix of image, pdf and other extensions.
    pub fn arb_attachments() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(
            ("[a-z]{1,8}", prop::sample::select(vec!["pdf", "PNG", "jpg", "docx", "gif"]))
                .prop_map(|(stem, ext)| format!("uploads/{}.{}", stem, ext)),
            0..5,
        )
    }

    /// A record of `kind` with random values for the kind's columns.
    pub fn arb_record(kind: RecordKind, id: usize) -> impl Strategy<Value = Record> {
        let columns = kind.columns();
        (
            prop::collection::vec(arb_field_value(), columns.len()),
            prop::option::of(arb_status()),
            arb_attachments(),
        )
            .prop_map(move |(values, status, attachments)| {
                let mut record = Record::new(id.to_string(), kind).with_attachments(attachments);
                for (column, value) in columns.iter().zip(values) {
                    record = record.with_field(*column, value);
                }
                record.status = status;
                record
            })
    }

    /// Up to `max` records with distinct ids.
    pub fn arb_records(kind: RecordKind, max: usize) -> impl Strategy<Value = Vec<Record>> {
        (0..=max).prop_flat_map(move |len| {
            (0..len)
                .map(|i| arb_record(kind, i + 1))
                .collect::<Vec<_>>()
        })
    }

    /// Short search queries, biased toward substrings that actually occur.
    pub fn arb_query() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            Just("  ".to_string()),
            "[a-zA-Z0-9]{1,3}",
            "[a-z ]{0,8}",
        ]
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built records, sessions and payloads.

    use super::*;
    use serde_json::{json, Value};

    /// Positions in [`smith_cases`] whose plaintiff contains "Smith".
    pub const SMITH_POSITIONS: [usize; 3] = [4, 17, 38];

    pub fn signed_in() -> StaticSession {
        StaticSession::new(Session::new("42", "test-token"))
    }

    /// Fifty cases, three of which name a Smith.
    pub fn smith_cases() -> Vec<Record> {
        (0..50)
            .map(|i| {
                let plaintiff = if SMITH_POSITIONS.contains(&i) {
                    format!("John Smith {}", i)
                } else {
                    format!("Plaintiff {}", i)
                };
                Record::new((i + 1).to_string(), RecordKind::Case)
                    .with_field("caseNo", format!("WP/{}/2024", i + 1))
                    .with_field("title", format!("Matter {}", i + 1))
                    .with_field("plaintiff", plaintiff)
                    .with_field("defender", "State")
                    .with_status(RecordStatus::Pending)
            })
            .collect()
    }

    /// `count` land records named `Plot 1..=count`.
    pub fn land_records(count: usize) -> Vec<Record> {
        (1..=count)
            .map(|i| {
                Record::new(i.to_string(), RecordKind::Land)
                    .with_field("landId", format!("L-{}", i))
                    .with_field("location", format!("Plot {}", i))
                    .with_field("area", "2 acres")
            })
            .collect()
    }

    /// Case payload as the API sends it: capitalized id, joined attachments.
    pub fn case_payload(id: u64, title: &str) -> Value {
        json!({
            "Id": id,
            "caseNo": format!("WP/{}/2024", id),
            "title": title,
            "caseDate": "2024-01-15T00:00:00.000Z",
            "plaintiff": "A. Kumar",
            "defender": "State",
            "status": "Pending",
            "documentPath": "uploads/order.pdf, uploads/photo.JPG"
        })
    }

    /// Land payload with attachments as an array.
    pub fn land_payload(id: u64) -> Value {
        json!({
            "id": id.to_string(),
            "landId": format!("L-{}", id),
            "location": "Jabalpur",
            "marketValue": 1_250_000,
            "files": ["uploads/deed.pdf", "uploads/map.png"]
        })
    }

    /// Four-level location script with two states.
    pub fn location_source() -> MockOptionSource {
        MockOptionSource::new()
            .with_options("state_id", None, &["MP", "UP"])
            .with_options("district_id", Some("MP"), &["Jabalpur", "Indore"])
            .with_options("district_id", Some("UP"), &["Lucknow"])
            .with_options("tehsil_id", Some("Jabalpur"), &["Sihora", "Patan"])
            .with_options("rural_urban_area_id", Some("Sihora"), &["Rural", "Urban"])
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Invariant checks shared by property tests.

    use super::*;

    /// Every level below an unset parent is unset and has no options.
    #[track_caller]
    pub fn assert_cascade_consistent(selector: &CascadingSelector) {
        for level in selector.levels() {
            let Some(parent) = level.depends_on.as_deref() else {
                continue;
            };
            if selector.selected(parent).is_none() {
                assert!(
                    level.selected.is_none(),
                    "{} has a selection while {} is unset",
                    level.key,
                    parent
                );
                assert!(
                    level.options.is_empty(),
                    "{} kept options while {} is unset",
                    level.key,
                    parent
                );
            }
        }
    }

    /// `subset` appears in `all` in the same relative order.
    #[track_caller]
    pub fn assert_ordered_subset(subset: &[&Record], all: &[Record]) {
        let mut cursor = all.iter();
        for wanted in subset {
            assert!(
                cursor.any(|r| std::ptr::eq(r, *wanted)),
                "record {} is out of order or not from the source list",
                wanted.id
            );
        }
    }

    pub fn ids(records: &[&Record]) -> Vec<String> {
        records.iter().map(|r| r.id.to_string()).collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
