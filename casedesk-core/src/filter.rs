//! Free-text record search.
//!
//! A record matches when at least one searchable field contains the query as
//! a case-insensitive substring. Filtering is stable and always runs over the
//! full record set.

use crate::record::{Record, RecordKind};

/// Which fields a query is matched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFields {
    /// Only the named fields.
    Designated(Vec<String>),
    /// Every field value, plus id, status and attachment references.
    All,
}

impl SearchFields {
    pub fn designated<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SearchFields::Designated(fields.into_iter().map(Into::into).collect())
    }

    /// Default search scope for each list screen.
    pub fn for_kind(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Case => SearchFields::designated([
                "caseNo",
                "title",
                "plaintiff",
                "defender",
                "court",
                "caseType",
            ]),
            RecordKind::Land | RecordKind::Miscellaneous => SearchFields::All,
        }
    }

    fn matches(&self, record: &Record, needle: &str) -> bool {
        match self {
            SearchFields::Designated(names) => names.iter().any(|name| {
                record
                    .field(name)
                    .is_some_and(|value| contains_folded(&value.to_string(), needle))
            }),
            SearchFields::All => {
                contains_folded(record.id.as_str(), needle)
                    || record
                        .fields
                        .values()
                        .any(|value| !value.is_null() && contains_folded(&value.to_string(), needle))
                    || record
                        .status
                        .as_ref()
                        .is_some_and(|status| contains_folded(&status.to_string(), needle))
                    || record
                        .attachments
                        .iter()
                        .any(|file| contains_folded(file, needle))
            }
        }
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Positions of matching records, in input order.
pub fn matching_indices(records: &[Record], query: &str, fields: &SearchFields) -> Vec<usize> {
    if query.trim().is_empty() {
        return (0..records.len()).collect();
    }
    let needle = query.to_lowercase();
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| fields.matches(record, &needle))
        .map(|(i, _)| i)
        .collect()
}

/// Matching records, in input order. An empty query returns every record.
pub fn filter<'a>(records: &'a [Record], query: &str, fields: &SearchFields) -> Vec<&'a Record> {
    matching_indices(records, query, fields)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordStatus;

    fn case(id: &str, title: &str, plaintiff: &str) -> Record {
        Record::new(id, RecordKind::Case)
            .with_field("title", title)
            .with_field("plaintiff", plaintiff)
            .with_field("shortDescription", "contains smith too")
    }

    #[test]
    fn test_empty_query_is_identity() {
        let records = vec![case("1", "A", "p"), case("2", "B", "q")];
        let out = filter(&records, "", &SearchFields::All);
        assert_eq!(out.len(), 2);
        assert!(std::ptr::eq(out[0], &records[0]));
    }

    #[test]
    fn test_whitespace_query_is_identity() {
        let records = vec![case("1", "A", "p")];
        assert_eq!(matching_indices(&records, "   ", &SearchFields::All), vec![0]);
    }

    #[test]
    fn test_match_is_case_insensitive_substring() {
        let records = vec![
            case("1", "Land dispute", "John SMITHERS"),
            case("2", "Tax", "Jane Doe"),
        ];
        let fields = SearchFields::designated(["plaintiff"]);
        assert_eq!(matching_indices(&records, "smith", &fields), vec![0]);
        assert_eq!(matching_indices(&records, "SMITH", &fields), vec![0]);
    }

    #[test]
    fn test_only_designated_fields_are_searched() {
        let records = vec![case("1", "A", "p")];
        let fields = SearchFields::for_kind(RecordKind::Case);
        assert!(matching_indices(&records, "smith", &fields).is_empty());
        assert_eq!(
            matching_indices(&records, "smith", &SearchFields::All),
            vec![0]
        );
    }

    #[test]
    fn test_all_fields_include_status_and_attachments() {
        let records = vec![
            Record::new("7", RecordKind::Land).with_status(RecordStatus::Completed),
            Record::new("8", RecordKind::Land).with_attachments(["deed.pdf"]),
        ];
        assert_eq!(
            matching_indices(&records, "complete", &SearchFields::All),
            vec![0]
        );
        assert_eq!(
            matching_indices(&records, "deed", &SearchFields::All),
            vec![1]
        );
    }

    #[test]
    fn test_null_values_never_match() {
        let records = vec![Record::new("1", RecordKind::Land).with_field("remarks", crate::FieldValue::Null)];
        assert!(matching_indices(&records, "null", &SearchFields::All).is_empty());
    }

    #[test]
    fn test_surrounding_whitespace_is_part_of_the_query() {
        let records = vec![
            case("1", "A", "J. Smith"),
            case("2", "B", "Smith Jones"),
        ];
        let fields = SearchFields::designated(["plaintiff"]);
        assert_eq!(matching_indices(&records, "smith ", &fields), vec![1]);
        assert_eq!(matching_indices(&records, " smith", &fields), vec![0]);
    }

    #[test]
    fn test_no_fuzzy_matching() {
        let records = vec![case("1", "Smith", "x")];
        let fields = SearchFields::designated(["title"]);
        assert!(matching_indices(&records, "smoth", &fields).is_empty());
    }
}
