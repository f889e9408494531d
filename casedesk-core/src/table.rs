//! Record table: one record list with search and pagination composed.
//!
//! A query change always refilters from the full list and returns to page 1;
//! there is no way to change the query without resetting the page.

use crate::error::PaginationError;
use crate::filter::{matching_indices, SearchFields};
use crate::pagination::PageState;
use crate::record::{FlatRow, Record, RecordId, RecordKind, RecordStatus};

/// Rows of the current page plus page metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage<'a> {
    pub rows: Vec<&'a Record>,
    pub total_pages: usize,
    pub current_page: usize,
    pub filtered_len: usize,
}

#[derive(Debug, Clone)]
pub struct RecordTable {
    kind: RecordKind,
    records: Vec<Record>,
    search_fields: SearchFields,
    query: String,
    visible: Vec<usize>,
    pages: PageState,
}

impl RecordTable {
    pub fn new(kind: RecordKind, page_size: usize) -> Result<Self, PaginationError> {
        Ok(Self {
            kind,
            records: Vec::new(),
            search_fields: SearchFields::for_kind(kind),
            query: String::new(),
            visible: Vec::new(),
            pages: PageState::new(page_size)?,
        })
    }

    pub fn with_search_fields(mut self, fields: SearchFields) -> Self {
        self.search_fields = fields;
        self.refilter();
        self
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn pages(&self) -> &PageState {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn filtered_len(&self) -> usize {
        self.visible.len()
    }

    /// Replace the record list, keeping the query and clamping the page.
    pub fn replace_records(&mut self, records: Vec<Record>) {
        self.records = records;
        self.refilter();
    }

    /// Apply a new query and return to the first page.
    pub fn search(&mut self, query: &str) {
        self.query = query.to_string();
        self.refilter();
        self.pages.first();
        tracing::debug!(
            kind = %self.kind,
            query = %self.query,
            matches = self.visible.len(),
            "search applied"
        );
    }

    pub fn next_page(&mut self) {
        self.pages.next();
    }

    pub fn previous_page(&mut self) {
        self.pages.previous();
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.pages.go_to(page);
    }

    pub fn page(&self) -> TablePage<'_> {
        let slice = self.pages.slice(&self.visible);
        TablePage {
            rows: slice.items.iter().map(|&i| &self.records[i]).collect(),
            total_pages: slice.total_pages,
            current_page: slice.current_page,
            filtered_len: self.visible.len(),
        }
    }

    /// Filtered records in original order.
    pub fn filtered(&self) -> Vec<&Record> {
        self.visible.iter().map(|&i| &self.records[i]).collect()
    }

    /// Filtered records flattened for export.
    pub fn export_rows(&self) -> Vec<FlatRow> {
        self.visible.iter().map(|&i| self.records[i].to_row()).collect()
    }

    pub fn record(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Optimistically set a record's status locally and return the previous one.
    ///
    /// The change is not rolled back if the server later rejects it. The
    /// filtered view is recomputed because status is searchable for some kinds.
    pub fn set_status(
        &mut self,
        id: &RecordId,
        status: RecordStatus,
    ) -> Option<Option<RecordStatus>> {
        let record = self.records.iter_mut().find(|r| &r.id == id)?;
        let previous = record.status.replace(status);
        self.refilter();
        Some(previous)
    }

    fn refilter(&mut self) {
        self.visible = matching_indices(&self.records, &self.query, &self.search_fields);
        self.pages.set_len(self.visible.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cases(n: usize) -> Vec<Record> {
        (1..=n)
            .map(|i| {
                Record::new(i.to_string(), RecordKind::Case)
                    .with_field("title", format!("Case {}", i))
                    .with_status(RecordStatus::Pending)
            })
            .collect()
    }

    #[test]
    fn test_search_resets_to_first_page() {
        let mut table = RecordTable::new(RecordKind::Case, 10).unwrap();
        table.replace_records(cases(35));
        table.go_to_page(3);
        assert_eq!(table.page().current_page, 3);

        table.search("case");
        assert_eq!(table.page().current_page, 1);
        assert_eq!(table.filtered_len(), 35);
    }

    #[test]
    fn test_replace_records_keeps_query_and_clamps() {
        let mut table = RecordTable::new(RecordKind::Case, 10).unwrap();
        table.replace_records(cases(35));
        table.go_to_page(4);
        table.replace_records(cases(12));
        assert_eq!(table.page().current_page, 2);
        assert_eq!(table.page().rows.len(), 2);
    }

    #[test]
    fn test_page_rows_follow_filter_order() {
        let mut table = RecordTable::new(RecordKind::Case, 2).unwrap();
        table.replace_records(cases(12));
        table.search("1");
        let ids: Vec<&str> = table.filtered().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "10", "11", "12"]);
        table.next_page();
        let page = table.page();
        assert_eq!(page.rows[0].id.as_str(), "11");
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_set_status_is_optimistic_and_reports_previous() {
        let mut table = RecordTable::new(RecordKind::Case, 10).unwrap();
        table.replace_records(cases(3));
        let id = RecordId::new("2");
        let previous = table.set_status(&id, RecordStatus::Completed);
        assert_eq!(previous, Some(Some(RecordStatus::Pending)));
        assert_eq!(
            table.record(&id).unwrap().status,
            Some(RecordStatus::Completed)
        );
        assert_eq!(table.set_status(&RecordId::new("99"), RecordStatus::Completed), None);
    }

    #[test]
    fn test_empty_table_has_one_page() {
        let table = RecordTable::new(RecordKind::Land, 6).unwrap();
        let page = table.page();
        assert!(page.rows.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 1);
    }
}
