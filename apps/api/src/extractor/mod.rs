//! Text Extractor — turns an uploaded resume PDF into a single string.
//!
//! Pages are visited in page-number order and their text is concatenated with no
//! separator beyond whatever the content stream itself yields. A page without an
//! extractable text layer (scanned image, broken content stream or font
//! dictionary) contributes an empty fragment; only a document that cannot be
//! loaded at all is an error.
//!
//! Extraction is CPU-bound. Async callers run it via `tokio::task::spawn_blocking`.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;
use thiserror::Error;
use tracing::debug;

const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("document is not a readable PDF: {0}")]
    Format(#[from] lopdf::Error),

    /// The parser gave up on the document structure instead of returning an error.
    #[error("document structure is malformed: {0}")]
    Malformed(String),
}

/// Extracts the text of every page of an in-memory PDF, in page order.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let doc = panic::catch_unwind(|| Document::load_mem(bytes))
        .map_err(|payload| ExtractError::Malformed(panic_message(payload.as_ref())))??;
    let pages = doc.get_pages();

    let mut text = String::new();
    let mut empty_pages = 0usize;

    // get_pages() is a BTreeMap keyed by page number, so iteration is document order.
    for page_number in pages.keys() {
        match page_text(&doc, *page_number) {
            Ok(fragment) => {
                if fragment.trim().is_empty() {
                    empty_pages += 1;
                }
                text.push_str(&fragment);
            }
            Err(reason) => {
                empty_pages += 1;
                debug!("No extractable text on page {page_number}: {reason}");
            }
        }
    }

    debug!(
        "Extracted {} chars from {} pages ({} without text)",
        text.chars().count(),
        pages.len(),
        empty_pages
    );

    Ok(text)
}

/// One page's text. A parser panic on a malformed page (bad font or resource
/// dictionaries) is caught here and reported like any other page failure.
fn page_text(doc: &Document, page_number: u32) -> Result<String, String> {
    match panic::catch_unwind(AssertUnwindSafe(|| doc.extract_text(&[page_number]))) {
        Ok(Ok(fragment)) => Ok(fragment),
        Ok(Err(e)) => Err(e.to_string()),
        Err(payload) => Err(format!("parser panicked: {}", panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Returns true if the upload looks like a PDF.
/// - Content-Type: application/pdf (case-insensitive, parameters ignored)
/// - File name: *.pdf (case-insensitive)
/// - Magic bytes: %PDF-
pub fn is_pdf(content_type: Option<&str>, file_name: Option<&str>, head: &[u8]) -> bool {
    let declared = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
        .unwrap_or(false);

    let named = file_name
        .map(|name| name.to_ascii_lowercase().ends_with(".pdf"))
        .unwrap_or(false);

    declared || named || head.starts_with(PDF_MAGIC)
}


#[cfg(test)]
mod tests {
    use super::fixtures::{build_pdf, build_pdf_with_font_types};
    use super::*;

    #[test]
    fn test_single_page_text_is_extracted() {
        let pdf = build_pdf(&["Experienced Python developer with AWS skills"]);
        let text = extract_text(&pdf).unwrap();
        assert!(
            text.contains("Experienced Python developer with AWS skills"),
            "Expected page text in output, got {text:?}"
        );
    }

    #[test]
    fn test_pages_are_concatenated_in_order() {
        let pdf = build_pdf(&["First page alpha", "Second page beta", "Third page gamma"]);
        let text = extract_text(&pdf).unwrap();

        let first = text.find("First page alpha").unwrap();
        let second = text.find("Second page beta").unwrap();
        let third = text.find("Third page gamma").unwrap();
        assert!(first < second && second < third, "Out of order: {text:?}");
    }

    #[test]
    fn test_output_never_shorter_than_single_page() {
        let page = "Rust Go Kubernetes";
        let text = extract_text(&build_pdf(&[page])).unwrap();
        assert!(text.len() >= page.len());
    }

    #[test]
    fn test_document_without_text_yields_empty_string() {
        let text = extract_text(&build_pdf(&["", ""])).unwrap();
        assert!(text.is_empty(), "Expected empty text, got {text:?}");
    }

    #[test]
    fn test_textless_page_does_not_fail_the_document() {
        let pdf = build_pdf(&["", "Only the second page has text"]);
        let text = extract_text(&pdf).unwrap();
        assert!(text.contains("Only the second page has text"));
    }

    #[test]
    fn test_corrupt_font_entry_does_not_fail_the_document() {
        // A font resource whose /Type is not /Font trips an assertion inside the parser.
        let pdf = build_pdf_with_font_types(&[
            ("Page with a corrupt font entry", "XObject"),
            ("Readable second page", "Font"),
        ]);
        let text = extract_text(&pdf).unwrap();
        assert!(text.contains("Readable second page"), "Got {text:?}");
    }

    #[test]
    fn test_missing_page_is_a_page_failure() {
        let doc = Document::load_mem(&build_pdf(&["Only page"])).unwrap();
        assert!(page_text(&doc, 7).is_err());
    }

    #[test]
    fn test_panic_message_reads_both_payload_kinds() {
        let literal = panic::catch_unwind(|| -> String { panic!("bad font") }).unwrap_err();
        assert_eq!(panic_message(literal.as_ref()), "bad font");

        let formatted =
            panic::catch_unwind(|| -> String { panic!("bad font {}", 2) }).unwrap_err();
        assert_eq!(panic_message(formatted.as_ref()), "bad font 2");
    }

    #[test]
    fn test_garbage_bytes_are_a_format_error() {
        let result = extract_text(b"definitely not a pdf");
        assert!(matches!(result, Err(ExtractError::Format(_))));
    }

    #[test]
    fn test_empty_bytes_are_a_format_error() {
        assert!(extract_text(&[]).is_err());
    }

    #[test]
    fn test_is_pdf_by_content_type() {
        assert!(is_pdf(Some("application/pdf"), None, b""));
        assert!(is_pdf(Some("Application/PDF; charset=binary"), None, b""));
        assert!(!is_pdf(Some("text/plain"), None, b"hello"));
    }

    #[test]
    fn test_is_pdf_by_file_name() {
        assert!(is_pdf(None, Some("Resume.PDF"), b""));
        assert!(!is_pdf(
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
            Some("resume.docx"),
            b"PK\x03\x04"
        ));
    }

    #[test]
    fn test_is_pdf_by_magic_bytes() {
        assert!(is_pdf(
            Some("application/octet-stream"),
            Some("upload"),
            b"%PDF-1.7\n"
        ));
    }
}
