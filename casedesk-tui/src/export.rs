//! CSV export of flattened record rows.

use casedesk_core::{FlatRow, RecordKind};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Nothing to export")]
    Empty,
}

/// Union of row columns in first-seen order.
pub fn columns(rows: &[FlatRow]) -> Vec<&str> {
    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        for (column, _) in row {
            if !columns.contains(&column.as_str()) {
                columns.push(column);
            }
        }
    }
    columns
}

/// Write `rows` as CSV with a header line. Missing cells are left empty.
pub fn write_csv(path: &Path, rows: &[FlatRow]) -> Result<usize, ExportError> {
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let header = columns(rows);
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&header)?;
    for row in rows {
        let cells = header.iter().map(|column| {
            row.iter()
                .find(|(name, _)| name.as_str() == *column)
                .map(|(_, value)| value.as_str())
                .unwrap_or("")
        });
        writer.write_record(cells)?;
    }
    writer.flush()?;
    Ok(rows.len())
}

pub fn file_name(kind: RecordKind, at: DateTime<Local>) -> String {
    format!("{}-{}.csv", kind.as_str(), at.format("%Y%m%d-%H%M%S"))
}

/// Export into `dir` under a timestamped name and return the written path.
pub fn export_rows(dir: &Path, kind: RecordKind, rows: &[FlatRow]) -> Result<PathBuf, ExportError> {
    let path = dir.join(file_name(kind, Local::now()));
    let count = write_csv(&path, rows)?;
    tracing::info!(kind = %kind, rows = count, path = %path.display(), "export written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(pairs: &[(&str, &str)]) -> FlatRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_columns_are_unioned_in_order() {
        let rows = vec![
            row(&[("id", "1"), ("title", "A")]),
            row(&[("id", "2"), ("remarks", "r"), ("title", "B")]),
        ];
        assert_eq!(columns(&rows), vec!["id", "title", "remarks"]);
    }

    #[test]
    fn test_write_csv_fills_missing_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/cases.csv");
        let rows = vec![
            row(&[("id", "1"), ("title", "Smith, J.")]),
            row(&[("id", "2"), ("status", "Pending")]),
        ];
        assert_eq!(write_csv(&path, &rows).unwrap(), 2);
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "id,title,status\n1,\"Smith, J.\",\n2,,Pending\n"
        );
    }

    #[test]
    fn test_empty_export_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_csv(&dir.path().join("x.csv"), &[]).unwrap_err();
        assert!(matches!(err, ExportError::Empty));
    }

    #[test]
    fn test_file_name_is_timestamped() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        assert_eq!(file_name(RecordKind::Land, at), "land-20240309-140500.csv");
    }
}
