//! Record drafts and client-side validation.
//!
//! A draft holds raw text input for one record kind. `validate` turns it into
//! a [`Submission`] ready for the gateway, or reports the first offending
//! field. Nothing here touches the network, so validation failures never
//! reach the API.

use crate::cascade::CascadingSelector;
use crate::error::ValidationError;
use crate::record::{parse_date, RecordKind};
use crate::session::SessionProvider;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// How a field is entered and checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldInput {
    Text,
    LongText,
    /// `YYYY-MM-DD`.
    Date,
    Number,
    /// Filled from a cascading selector level with the same key.
    Cascade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub input: FieldInput,
}

const fn required(name: &'static str, label: &'static str, input: FieldInput) -> FieldSpec {
    FieldSpec {
        name,
        label,
        required: true,
        input,
    }
}

const fn optional(name: &'static str, label: &'static str, input: FieldInput) -> FieldSpec {
    FieldSpec {
        name,
        label,
        required: false,
        input,
    }
}

const CASE_FIELDS: &[FieldSpec] = &[
    required("court", "Court", FieldInput::Cascade),
    required("forum", "Forum", FieldInput::Cascade),
    required("caseType", "Case Type", FieldInput::Cascade),
    required("caseNo", "Case No", FieldInput::Text),
    required("caseDate", "Case Date", FieldInput::Date),
    required("title", "Title", FieldInput::Text),
    required("shortDescription", "Short Description", FieldInput::LongText),
    required("plaintiff", "Plaintiff", FieldInput::Text),
    required("defender", "Defendant", FieldInput::Text),
    required("address", "Defendant Address", FieldInput::LongText),
];

const LAND_FIELDS: &[FieldSpec] = &[
    required("landId", "Land ID", FieldInput::Text),
    required("location", "Location", FieldInput::Text),
    required("area", "Area", FieldInput::Text),
    required("ownershipDetails", "Ownership Details", FieldInput::Text),
    required("land_type", "Land Type", FieldInput::Text),
    required("state_id", "State", FieldInput::Cascade),
    required("district_id", "District", FieldInput::Cascade),
    required("tehsil_id", "Tehsil", FieldInput::Cascade),
    required("rural_urban_area_id", "Area Type", FieldInput::Cascade),
    required("khasra_number", "Khasra Number", FieldInput::Text),
    required("status", "Status", FieldInput::Text),
    required("marketValue", "Market Value", FieldInput::Number),
    optional("remarks", "Remarks", FieldInput::LongText),
];

const MISC_FIELDS: &[FieldSpec] = &[
    optional("unit_name", "Unit Name", FieldInput::Text),
    optional("description", "Description", FieldInput::LongText),
    optional("url", "URL", FieldInput::Text),
    optional("noc_date", "NOC Date", FieldInput::Date),
    optional("valid_till", "Valid Till", FieldInput::Date),
    optional("notification_days", "Notification Days", FieldInput::Number),
];

/// Multipart slot for attached files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSlot {
    /// Multipart part name.
    pub part: &'static str,
    pub required: bool,
    pub multiple: bool,
}

impl RecordKind {
    /// Form fields in display order.
    pub fn form_fields(&self) -> &'static [FieldSpec] {
        match self {
            RecordKind::Case => CASE_FIELDS,
            RecordKind::Land => LAND_FIELDS,
            RecordKind::Miscellaneous => MISC_FIELDS,
        }
    }

    pub fn file_slot(&self) -> FileSlot {
        match self {
            RecordKind::Case => FileSlot {
                part: "documents",
                required: false,
                multiple: true,
            },
            RecordKind::Land => FileSlot {
                part: "files",
                required: true,
                multiple: true,
            },
            RecordKind::Miscellaneous => FileSlot {
                part: "documents",
                required: false,
                multiple: false,
            },
        }
    }

    /// Form field that carries the signed-in user's id, if the kind has one.
    pub fn owner_field(&self) -> Option<&'static str> {
        match self {
            RecordKind::Case => Some("userId"),
            RecordKind::Land => Some("user_id"),
            RecordKind::Miscellaneous => None,
        }
    }
}

/// Validated payload for a create-record call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub kind: RecordKind,
    pub fields: Vec<(String, String)>,
    pub file_part: &'static str,
    pub files: Vec<PathBuf>,
}

/// Raw input for one new record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDraft {
    kind: RecordKind,
    values: BTreeMap<&'static str, String>,
    files: Vec<PathBuf>,
}

impl FormDraft {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            values: BTreeMap::new(),
            files: Vec::new(),
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.kind.form_fields()
    }

    pub fn spec(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|spec| spec.name == name)
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), ValidationError> {
        let spec = self.spec(name).ok_or_else(|| ValidationError::UnknownField {
            field: name.to_string(),
        })?;
        self.values.insert(spec.name, value.into());
        Ok(())
    }

    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Attach a file. Single-file slots keep only the latest one.
    pub fn add_file(&mut self, path: impl Into<PathBuf>) {
        if !self.kind.file_slot().multiple {
            self.files.clear();
        }
        self.files.push(path.into());
    }

    pub fn remove_file(&mut self, index: usize) -> Option<PathBuf> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    /// Copy cascade selections into the matching fields. Levels without a
    /// selection blank their field.
    pub fn apply_cascade(&mut self, selector: &CascadingSelector) {
        for level in selector.levels() {
            let Some(spec) = self.spec(&level.key) else {
                continue;
            };
            if spec.input != FieldInput::Cascade {
                continue;
            }
            let value = level.selected.clone().unwrap_or_default();
            self.values.insert(spec.name, value);
        }
    }

    /// Check the draft and build a submission stamped with the session owner.
    pub fn validate(&self, session: &dyn SessionProvider) -> Result<Submission, ValidationError> {
        let session = session
            .current_session()
            .ok_or(ValidationError::MissingSession)?;

        let mut fields = Vec::with_capacity(self.fields().len() + 1);
        if let Some(owner) = self.kind.owner_field() {
            fields.push((owner.to_string(), session.user_id.clone()));
        }

        for spec in self.fields() {
            let value = self.get(spec.name).trim();
            if value.is_empty() {
                if spec.required {
                    return Err(ValidationError::RequiredFieldMissing {
                        field: spec.name.to_string(),
                    });
                }
            } else {
                check_input(spec, value)?;
            }
            fields.push((spec.name.to_string(), value.to_string()));
        }

        if self.kind == RecordKind::Miscellaneous {
            self.check_validity_window()?;
            self.check_notification_days()?;
        }

        let slot = self.kind.file_slot();
        if slot.required && self.files.is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: slot.part.to_string(),
            });
        }

        Ok(Submission {
            kind: self.kind,
            fields,
            file_part: slot.part,
            files: self.files.clone(),
        })
    }

    /// Clear every value and file.
    pub fn reset(&mut self) {
        self.values.clear();
        self.files.clear();
    }

    fn check_validity_window(&self) -> Result<(), ValidationError> {
        let start = parse_date(self.get("noc_date"));
        let end = parse_date(self.get("valid_till"));
        if let (Some(start), Some(end)) = (start, end) {
            if end <= start {
                return Err(ValidationError::InvalidDateRange {
                    start_field: "noc_date".to_string(),
                    end_field: "valid_till".to_string(),
                });
            }
        }
        Ok(())
    }

    fn check_notification_days(&self) -> Result<(), ValidationError> {
        let raw = self.get("notification_days").trim();
        if raw.is_empty() || raw.parse::<u32>().is_ok() {
            return Ok(());
        }
        Err(ValidationError::InvalidValue {
            field: "notification_days".to_string(),
            reason: "must be a whole number of days, zero or more".to_string(),
        })
    }
}

fn check_input(spec: &FieldSpec, value: &str) -> Result<(), ValidationError> {
    match spec.input {
        FieldInput::Date if parse_date(value).is_none() => Err(ValidationError::InvalidValue {
            field: spec.name.to_string(),
            reason: format!("expected a date as YYYY-MM-DD, got {}", value),
        }),
        FieldInput::Number if value.parse::<f64>().map_or(true, |n| !n.is_finite()) => {
            Err(ValidationError::InvalidValue {
                field: spec.name.to_string(),
                reason: format!("expected a number, got {}", value),
            })
        }
        _ => Ok(()),
    }
}
