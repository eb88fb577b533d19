//! Error types for smartdoc-core.

use thiserror::Error;

use crate::generator::GenerationError;
use crate::types::DocType;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Every failure the core can surface to its callers.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The uploaded file is neither a PDF nor a spreadsheet.
    #[error("Unsupported file type: {filename}. Please upload PDF or Excel files.")]
    UnsupportedFormat {
        /// Name of the rejected upload.
        filename: String,
    },

    /// The parser for a recognized document kind failed.
    #[error("Error reading {kind}: {message}")]
    Extraction {
        /// Kind that was being parsed.
        kind: DocType,
        /// Underlying parser error text.
        message: String,
    },

    /// No session with this id exists (never created, deleted or evicted).
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// The answer-generation collaborator failed.
    #[error("Answer generation failed: {0}")]
    Generation(#[from] GenerationError),
}

impl CoreError {
    pub(crate) fn extraction(kind: DocType, err: impl ToString) -> Self {
        CoreError::Extraction {
            kind,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::UnsupportedFormat {
            filename: "notes.docx".to_string(),
        };
        assert!(err.to_string().contains("notes.docx"));

        let err = CoreError::extraction(DocType::Pdf, "invalid xref table");
        assert_eq!(err.to_string(), "Error reading PDF: invalid xref table");

        let err = CoreError::from(GenerationError::Timeout(30));
        assert!(err.to_string().contains("30"));
    }
}
