//! Content extraction for uploaded documents.
//!
//! Each supported kind is rendered into one plain-text form:
//! - PDF: page texts, each prefixed with a `--- Page N ---` marker
//! - Spreadsheet: one block per sheet with counts, column names and a
//!   preview table of the leading rows

mod pdf;
mod spreadsheet;

pub use pdf::{extract_pdf, render_pages};
pub use spreadsheet::{
    extract_spreadsheet, render_sheet, render_sheet_error, render_sheets, MAX_PREVIEW_ROWS,
};

use crate::error::{CoreError, Result};
use crate::types::DocType;

/// Determine the document kind of an upload.
pub fn detect(filename: &str, bytes: &[u8]) -> Result<DocType> {
    DocType::detect(filename, bytes).ok_or_else(|| CoreError::UnsupportedFormat {
        filename: filename.to_string(),
    })
}

/// Extract normalized text from `bytes` of the given kind.
pub fn extract(bytes: &[u8], doc_type: DocType) -> Result<String> {
    match doc_type {
        DocType::Pdf => extract_pdf(bytes),
        DocType::Spreadsheet => extract_spreadsheet(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_rejects_unknown() {
        let err = detect("photo.png", b"\x89PNG").unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedFormat { filename } if filename == "photo.png"));
    }

    #[test]
    fn test_garbage_pdf_is_extraction_error() {
        let err = extract(b"definitely not a pdf", DocType::Pdf).unwrap_err();
        assert!(matches!(err, CoreError::Extraction { kind: DocType::Pdf, .. }));
    }

    #[test]
    fn test_garbage_spreadsheet_is_extraction_error() {
        let err = extract(b"not a workbook either", DocType::Spreadsheet).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Extraction {
                kind: DocType::Spreadsheet,
                ..
            }
        ));
    }
}
