//! Level layouts for the two cascades used by the record forms, and the static
//! court catalog that feeds the case form.

use crate::cascade::{CascadingSelector, OptionSource, SelectOption};
use crate::error::OptionSourceError;
use async_trait::async_trait;

/// State → district → tehsil → rural/urban area. Keys double as form field names.
pub const LOCATION_LEVELS: [&str; 4] = ["state_id", "district_id", "tehsil_id", "rural_urban_area_id"];

/// Court → forum → case type. Keys double as form field names.
pub const COURT_LEVELS: [&str; 3] = ["court", "forum", "caseType"];

const COURTS: &[&str] = &[
    "Supreme Court",
    "High Court",
    "District Court",
    "Family Court",
    "Consumer Court",
    "Labour Court",
    "Tribunal",
];

const FORUMS: &[(&str, &[&str])] = &[
    (
        "High Court",
        &["MP High Court at Jabalpur", "Indore Bench", "Gwalior Bench"],
    ),
    ("District Court", &["District Court Jabalpur"]),
    ("Family Court", &["Family Court Jabalpur"]),
    ("Consumer Court", &["Consumer Court Jabalpur"]),
    ("Labour Court", &["Labour Court Jabalpur"]),
    ("Tribunal", &["Tribunal Jabalpur"]),
    ("Supreme Court", &["Supreme Court of India"]),
];

const CASE_TYPES: &[(&str, &[&str])] = &[
    (
        "MP High Court at Jabalpur",
        &["WP", "MA", "FA", "SA", "CONT", "CRR", "MCRC", "MCC", "ARB", "WA"],
    ),
    ("District Court Jabalpur", &["Civil", "Criminal", "Property"]),
    ("Family Court Jabalpur", &["Divorce", "Child Custody"]),
    ("Consumer Court Jabalpur", &["Consumer Complaint"]),
    ("Labour Court Jabalpur", &["Wages", "Termination"]),
    ("Tribunal Jabalpur", &["Tax Appeal"]),
    ("Supreme Court of India", &["SLP", "Writ", "Appeal"]),
];

/// Selector laid out for location levels.
pub fn location_selector() -> CascadingSelector {
    CascadingSelector::chain(&LOCATION_LEVELS)
}

/// Selector laid out for court levels.
pub fn court_selector() -> CascadingSelector {
    CascadingSelector::chain(&COURT_LEVELS)
}

/// In-memory option source for the court cascade.
///
/// Forums without a case-type table (e.g. the Indore and Gwalior benches)
/// yield an empty list, which leaves the case type as free text.
#[derive(Debug, Clone, Copy, Default)]
pub struct CourtCatalog;

impl CourtCatalog {
    pub fn options(&self, level: &str, parent: Option<&str>) -> Result<Vec<SelectOption>, OptionSourceError> {
        let names: &[&str] = match (level, parent) {
            ("court", _) => COURTS,
            ("forum", Some(court)) => lookup(FORUMS, court),
            ("caseType", Some(forum)) => lookup(CASE_TYPES, forum),
            ("forum", None) | ("caseType", None) => &[],
            _ => {
                return Err(OptionSourceError::UnknownLevel {
                    level: level.to_string(),
                })
            }
        };
        Ok(names.iter().map(|n| SelectOption::new(*n, *n)).collect())
    }
}

fn lookup(table: &'static [(&'static str, &'static [&'static str])], key: &str) -> &'static [&'static str] {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, values)| *values)
        .unwrap_or(&[])
}

#[async_trait]
impl OptionSource for CourtCatalog {
    async fn fetch_options(
        &self,
        level: &str,
        parent: Option<&str>,
    ) -> Result<Vec<SelectOption>, OptionSourceError> {
        self.options(level, parent)
    }
}
