//! Attachment viewer state machine.

use serde::{Deserialize, Serialize};

/// Render class of an attachment, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    Image,
    Pdf,
    Other,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Classify a file reference by extension, ignoring case, query and fragment.
pub fn classify(file: &str) -> FileKind {
    let path = file
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    let name = path.rsplit('/').next().unwrap_or(path);
    let Some((_, extension)) = name.rsplit_once('.') else {
        return FileKind::Other;
    };
    let extension = extension.to_ascii_lowercase();
    if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        FileKind::Image
    } else if extension == "pdf" {
        FileKind::Pdf
    } else {
        FileKind::Other
    }
}

/// Join a relative attachment reference onto the upload base URL.
/// Absolute `http(s)://` references are returned unchanged.
pub fn resolve_url(base: &str, file: &str) -> String {
    let file = file.trim();
    if file.starts_with("http://") || file.starts_with("https://") {
        return file.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        file.trim_start_matches('/')
    )
}

/// `Closed`, or `Open` over a non-empty file list with a cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FileViewer {
    #[default]
    Closed,
    Open {
        files: Vec<String>,
        current_index: usize,
    },
}

impl FileViewer {
    /// Open on `files` at `start_index` (clamped). Empty lists are ignored.
    pub fn open(&mut self, files: Vec<String>, start_index: usize) {
        if files.is_empty() {
            return;
        }
        let current_index = start_index.min(files.len() - 1);
        *self = FileViewer::Open {
            files,
            current_index,
        };
    }

    pub fn close(&mut self) {
        *self = FileViewer::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, FileViewer::Open { .. })
    }

    /// Advance one file; no-op at the last file or when closed.
    pub fn next(&mut self) {
        if let FileViewer::Open {
            files,
            current_index,
        } = self
        {
            if *current_index + 1 < files.len() {
                *current_index += 1;
            }
        }
    }

    /// Step back one file; no-op at the first file or when closed.
    pub fn previous(&mut self) {
        if let FileViewer::Open { current_index, .. } = self {
            *current_index = current_index.saturating_sub(1);
        }
    }

    pub fn current(&self) -> Option<&str> {
        match self {
            FileViewer::Open {
                files,
                current_index,
            } => files.get(*current_index).map(String::as_str),
            FileViewer::Closed => None,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        match self {
            FileViewer::Open { current_index, .. } => Some(*current_index),
            FileViewer::Closed => None,
        }
    }

    /// 1-based position and file count, for an "n / m" counter.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            FileViewer::Open {
                files,
                current_index,
            } => Some((current_index + 1, files.len())),
            FileViewer::Closed => None,
        }
    }

    pub fn current_kind(&self) -> Option<FileKind> {
        self.current().map(classify)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> Vec<String> {
        vec!["a.pdf".into(), "b.png".into(), "c.docx".into()]
    }

    #[test]
    fn test_next_clamps_at_last_file() {
        let mut viewer = FileViewer::default();
        viewer.open(three(), 0);
        viewer.next();
        viewer.next();
        viewer.next();
        assert_eq!(viewer.current_index(), Some(2));
        assert_eq!(viewer.current(), Some("c.docx"));
    }

    #[test]
    fn test_previous_clamps_at_first_file() {
        let mut viewer = FileViewer::default();
        viewer.open(three(), 0);
        viewer.previous();
        assert_eq!(viewer.current_index(), Some(0));
    }

    #[test]
    fn test_open_with_no_files_is_ignored() {
        let mut viewer = FileViewer::default();
        viewer.open(Vec::new(), 0);
        assert!(!viewer.is_open());
    }

    #[test]
    fn test_open_clamps_start_index() {
        let mut viewer = FileViewer::default();
        viewer.open(three(), 10);
        assert_eq!(viewer.position(), Some((3, 3)));
    }

    #[test]
    fn test_close_discards_state() {
        let mut viewer = FileViewer::default();
        viewer.open(three(), 1);
        viewer.close();
        assert_eq!(viewer, FileViewer::Closed);
        viewer.next();
        assert_eq!(viewer.current(), None);
    }

    #[test]
    fn test_classify_by_extension() {
        assert_eq!(classify("uploads/scan.JPG"), FileKind::Image);
        assert_eq!(classify("x.jpeg"), FileKind::Image);
        assert_eq!(classify("x.gif"), FileKind::Image);
        assert_eq!(classify("order.pdf?download=1"), FileKind::Pdf);
        assert_eq!(classify("notes.docx"), FileKind::Other);
        assert_eq!(classify("README"), FileKind::Other);
        assert_eq!(classify("dir.v2/README"), FileKind::Other);
    }

    #[test]
    fn test_resolve_url() {
        assert_eq!(
            resolve_url("http://host/uploads/", "/a.pdf"),
            "http://host/uploads/a.pdf"
        );
        assert_eq!(resolve_url("http://host", "https://cdn/x.png"), "https://cdn/x.png");
    }
}
