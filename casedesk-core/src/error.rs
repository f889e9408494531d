//! Error types for CaseDesk core operations

use thiserror::Error;

/// Cascading selector errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CascadeError {
    #[error("Unknown selection level: {key}")]
    UnknownLevel { key: String },

    #[error("Option {value} is not available for level {key}")]
    UnknownOption { key: String, value: String },

    #[error("Level {key} depends on {parent}, which is not declared before it")]
    InvalidDependency { key: String, parent: String },

    #[error("Duplicate selection level: {key}")]
    DuplicateLevel { key: String },

    #[error("Cannot select {key} before {parent}")]
    ParentNotSelected { key: String, parent: String },
}

/// Failure reported by an option source. Always fail-soft for the selector.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OptionSourceError {
    #[error("Options unavailable for {level}: {reason}")]
    Unavailable { level: String, reason: String },

    #[error("Option source has no level named {level}")]
    UnknownLevel { level: String },
}

/// Pagination configuration errors.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("Page size must be at least 1")]
    ZeroPageSize,

    #[error("Page window must be at least 1")]
    ZeroWindow,
}

/// Client-side validation errors, raised before any network call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("{end_field} must be after {start_field}")]
    InvalidDateRange {
        start_field: String,
        end_field: String,
    },

    #[error("Invalid user session, please sign in again")]
    MissingSession,

    #[error("Unknown form field: {field}")]
    UnknownField { field: String },
}

/// Record normalization errors at the gateway boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("Record payload must be a JSON object, got {found}")]
    NotAnObject { found: String },

    #[error("Record is missing an id field")]
    MissingId,

    #[error("Unsupported value for field {field}: {reason}")]
    UnsupportedValue { field: String, reason: String },
}
