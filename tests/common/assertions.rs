//! Custom assertions for PDF redaction testing.
//!
//! Text checks go through MuPDF's text layer, the same view the redactor
//! searches. Raw checks inspect every object in the file with lopdf,
//! independently of MuPDF.

use anyhow::Result;
use std::path::Path;

/// Asserts that `term` no longer appears anywhere in the PDF, in any letter
/// case, neither in the text layer nor anywhere in the file's objects.
///
/// # Panics
/// Panics if the term is still present.
pub fn assert_redacted(pdf_path: &Path, term: &str) {
    let text = extract_text_or_panic(pdf_path).to_lowercase();
    assert!(
        !text.contains(&term.to_lowercase()),
        "Term '{}' should be redacted but was found in the text layer of '{}'",
        term,
        pdf_path.display()
    );

    let raw = raw_content_contains(pdf_path, term)
        .unwrap_or_else(|e| panic!("Failed to read content of '{}': {}", pdf_path.display(), e));
    assert!(
        !raw,
        "Term '{}' should be redacted but was found in the raw objects of '{}'",
        term,
        pdf_path.display()
    );
}

/// Asserts that `text` is still present in the PDF's text layer.
///
/// # Panics
/// Panics if the text is not found.
pub fn assert_preserved(pdf_path: &Path, text: &str) {
    let extracted = extract_text_or_panic(pdf_path);
    assert!(
        extracted.contains(text),
        "Text '{}' should be preserved but was not found in '{}'",
        text,
        pdf_path.display()
    );
}

/// Asserts that the PDF loads and has the expected number of pages.
///
/// # Panics
/// Panics if the file is missing, unreadable or has a different page count.
pub fn assert_valid_pdf(pdf_path: &Path, expected_pages: usize) {
    assert!(
        pdf_path.exists(),
        "PDF should exist at '{}'",
        pdf_path.display()
    );

    let doc = ::lopdf::Document::load(pdf_path)
        .unwrap_or_else(|e| panic!("PDF at '{}' should load: {}", pdf_path.display(), e));
    assert_eq!(
        doc.get_pages().len(),
        expected_pages,
        "Unexpected page count in '{}'",
        pdf_path.display()
    );
}

/// Text layer of every page, in page order.
pub fn extract_pages(pdf_path: &Path) -> Result<Vec<String>> {
    let text = pdf_redactor::extract_text_from_pdf(pdf_path)?;
    Ok(text.split("\n\x0c").map(str::to_string).collect())
}

/// Checks every object in the file for `term`, as a literal string in
/// either letter case or as a hex string. Streams are decompressed where
/// possible; unreferenced objects are included.
pub fn raw_content_contains(pdf_path: &Path, term: &str) -> Result<bool> {
    let doc = ::lopdf::Document::load(pdf_path)?;
    let needles = [
        term.to_string(),
        term.to_lowercase(),
        term.to_uppercase(),
        hex(term, false),
        hex(term, true),
    ];

    for object in doc.objects.values() {
        let bytes = match object {
            ::lopdf::Object::Stream(stream) => stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone()),
            ::lopdf::Object::String(bytes, _) => bytes.clone(),
            _ => continue,
        };
        let text = String::from_utf8_lossy(&bytes);
        if needles.iter().any(|needle| text.contains(needle.as_str())) {
            return Ok(true);
        }
    }
    Ok(false)
}

fn hex(text: &str, upper: bool) -> String {
    text.bytes()
        .map(|b| {
            if upper {
                format!("{:02X}", b)
            } else {
                format!("{:02x}", b)
            }
        })
        .collect()
}

fn extract_text_or_panic(pdf_path: &Path) -> String {
    pdf_redactor::extract_text_from_pdf(pdf_path)
        .unwrap_or_else(|e| panic!("Failed to extract text from PDF '{}': {}", pdf_path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_encoding() {
        assert_eq!(hex("Ab", false), "4162");
        assert_eq!(hex("z", true), "7A");
    }
}
