//! PDF text extraction.

use lopdf::Document;
use tracing::{debug, warn};

use crate::error::{CoreError, Result};
use crate::types::DocType;

/// Extract the text of every page, in page order.
///
/// A page whose text cannot be extracted keeps its marker but contributes no
/// text; only a document that cannot be opened at all is an error.
pub fn extract_pdf(bytes: &[u8]) -> Result<String> {
    let document = Document::load_mem(bytes).map_err(|e| CoreError::extraction(DocType::Pdf, e))?;

    let pages = document.get_pages();
    debug!("Extracting text from {} PDF pages", pages.len());

    let texts = pages.keys().map(|&page_number| {
        document.extract_text(&[page_number]).map_err(|e| {
            warn!("Failed to extract text from page {}: {}", page_number, e);
            e.to_string()
        })
    });

    Ok(render_pages(texts))
}

/// Join per-page extraction results into the normalized page-marked form.
pub fn render_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = std::result::Result<String, String>>,
{
    let mut out = String::new();
    for (index, page) in pages.into_iter().enumerate() {
        out.push_str(&format!("--- Page {} ---\n", index + 1));
        let text = page.unwrap_or_default();
        out.push_str(&text);
        if !text.is_empty() && !text.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_pages() {
        let pages = vec![Ok("Hello\n".to_string()), Ok("World".to_string())];
        assert_eq!(
            render_pages(pages),
            "--- Page 1 ---\nHello\n--- Page 2 ---\nWorld\n"
        );
    }

    #[test]
    fn test_failed_page_is_empty_segment() {
        let pages = vec![
            Ok("first".to_string()),
            Err("unsupported font".to_string()),
            Ok("third".to_string()),
        ];
        assert_eq!(
            render_pages(pages),
            "--- Page 1 ---\nfirst\n--- Page 2 ---\n--- Page 3 ---\nthird\n"
        );
    }

    #[test]
    fn test_no_pages() {
        assert_eq!(render_pages(Vec::new()), "");
    }
}
