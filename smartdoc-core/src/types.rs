//! Shared data types for documents, sessions and service results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Kind of uploaded document. Decides which extractor produced the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocType {
    #[serde(rename = "PDF")]
    Pdf,
    #[serde(rename = "Spreadsheet")]
    Spreadsheet,
}

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

const PDF_MAGIC: &[u8] = b"%PDF-";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE2_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

impl DocType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocType::Pdf => "PDF",
            DocType::Spreadsheet => "Spreadsheet",
        }
    }

    /// Resolve the document kind from the filename extension.
    ///
    /// Only a filename without any extension falls back to sniffing the
    /// leading bytes; an unknown extension is never second-guessed.
    pub fn detect(filename: &str, bytes: &[u8]) -> Option<DocType> {
        match Path::new(filename).extension().and_then(|e| e.to_str()) {
            Some(ext) => Self::from_extension(ext),
            None => Self::sniff(bytes),
        }
    }

    pub fn from_extension(ext: &str) -> Option<DocType> {
        let ext = ext.to_ascii_lowercase();
        if ext == "pdf" {
            Some(DocType::Pdf)
        } else if SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) {
            Some(DocType::Spreadsheet)
        } else {
            None
        }
    }

    fn sniff(bytes: &[u8]) -> Option<DocType> {
        if bytes.starts_with(PDF_MAGIC) {
            Some(DocType::Pdf)
        } else if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE2_MAGIC) {
            Some(DocType::Spreadsheet)
        } else {
            None
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One question/answer pair in a session's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
}

/// Snapshot of a stored session.
#[derive(Debug, Clone)]
pub struct DocumentSession {
    pub id: String,
    pub filename: String,
    pub doc_type: DocType,
    /// Normalized and truncated document text
    pub content: String,
    /// Exchanges in chronological order
    pub history: Vec<Exchange>,
    pub created_at: DateTime<Utc>,
}

impl DocumentSession {
    /// The last `n` exchanges, oldest first.
    pub fn recent_history(&self, n: usize) -> &[Exchange] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }
}

/// Result of ingesting an upload.
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub session_id: String,
    pub filename: String,
    pub doc_type: DocType,
    /// Initial summary, or the canned fallback when generation failed
    #[serde(rename = "initial_summary")]
    pub summary: String,
    /// Character count of the extracted text before truncation
    pub content_length: usize,
    pub truncated: bool,
}

/// Result of answering a question.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerOutcome {
    pub session_id: String,
    pub answer: String,
}

/// Document metadata plus its conversation so far.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryView {
    pub filename: String,
    pub doc_type: DocType,
    pub history: Vec<Exchange>,
}
