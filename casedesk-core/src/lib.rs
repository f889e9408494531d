//! CaseDesk Core - Records and List/Form Engines
//!
//! Headless state for the CaseDesk client. Nothing in this crate performs I/O
//! directly: remote calls go through the [`OptionSource`] capability and the
//! caller's gateway, and session identity comes from a [`SessionProvider`].
//!
//! - [`cascade`]: dependent selection levels with stale-fetch discard
//! - [`filter`]: case-insensitive substring search over record fields
//! - [`pagination`]: clamped page slicing and page-button windows
//! - [`table`]: filter and pagination composed over one record list
//! - [`viewer`]: attachment viewer state machine
//! - [`form`]: record drafts and client-side validation

pub mod cascade;
pub mod catalog;
pub mod error;
pub mod filter;
pub mod form;
pub mod pagination;
pub mod record;
pub mod session;
pub mod table;
pub mod viewer;

pub use cascade::{
    Applied, CascadingSelector, FetchTicket, OptionSource, SelectOption, SelectionLevel,
};
pub use catalog::{court_selector, location_selector, CourtCatalog, COURT_LEVELS, LOCATION_LEVELS};
pub use error::{CascadeError, OptionSourceError, PaginationError, RecordError, ValidationError};
pub use filter::{filter, matching_indices, SearchFields};
pub use form::{FieldInput, FieldSpec, FileSlot, FormDraft, Submission};
pub use pagination::{get_page, page_window, total_pages, Page, PageState};
pub use record::{
    flatten, normalize_attachments, FieldValue, FlatRow, Hearing, Record, RecordId, RecordKind,
    RecordStatus,
};
pub use session::{Session, SessionProvider, StaticSession};
pub use table::{RecordTable, TablePage};
pub use viewer::{classify, resolve_url, FileKind, FileViewer};

/// Calendar date used for case dates, hearing dates and validity windows.
pub type Date = chrono::NaiveDate;
