//! Test fixtures and PDF builders.
//!
//! Every line of text is drawn with its own text operation so that MuPDF
//! reports one text line per fixture line.

use anyhow::Result;
use printpdf::*;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

const FONT_SIZE: f32 = 12.0;
const LINE_SPACING: f32 = 10.0;
const LEFT_MARGIN: f32 = 20.0;
const TOP_LINE: f32 = 270.0;

/// Builder for multi-page test PDFs.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// # use anyhow::Result;
/// # fn main() -> Result<()> {
/// let pdf = TestPdfBuilder::new()
///     .with_page(&["Quarterly report", "Contact: John Smith"])
///     .with_page(&["Appendix"])
///     .build(Path::new("/tmp/test.pdf"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TestPdfBuilder {
    title: String,
    pages: Vec<Vec<String>>,
    page_width: Mm,
    page_height: Mm,
}

impl TestPdfBuilder {
    pub fn new() -> Self {
        Self {
            title: "Test Document".to_string(),
            pages: Vec::new(),
            page_width: Mm(210.0),  // A4 width
            page_height: Mm(297.0), // A4 height
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Appends a page holding `lines`, top to bottom.
    pub fn with_page(mut self, lines: &[&str]) -> Self {
        self.pages.push(lines.iter().map(|l| l.to_string()).collect());
        self
    }

    /// Appends a line to the last page, starting one if needed.
    pub fn with_line(mut self, line: &str) -> Self {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        if let Some(page) = self.pages.last_mut() {
            page.push(line.to_string());
        }
        self
    }

    pub fn page_count(&self) -> usize {
        self.pages.len().max(1)
    }

    /// Builds the PDF and writes it to the specified path.
    pub fn build(self, output_path: &Path) -> Result<PathBuf> {
        let (doc, first_page, first_layer) =
            PdfDocument::new(&self.title, self.page_width, self.page_height, "Layer 1");
        let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

        let mut pages = self.pages.iter();
        let first_lines = pages.next().cloned().unwrap_or_default();
        let layer = doc.get_page(first_page).get_layer(first_layer);
        draw_lines(&layer, &first_lines, &font);

        for lines in pages {
            let (page, layer) = doc.add_page(self.page_width, self.page_height, "Layer 1");
            let layer = doc.get_page(page).get_layer(layer);
            draw_lines(&layer, lines, &font);
        }

        doc.save(&mut BufWriter::new(fs::File::create(output_path)?))?;
        Ok(output_path.to_path_buf())
    }
}

impl Default for TestPdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn draw_lines(layer: &PdfLayerReference, lines: &[String], font: &IndirectFontRef) {
    for (i, line) in lines.iter().enumerate() {
        let y = TOP_LINE - LINE_SPACING * i as f32;
        layer.use_text(line.as_str(), FONT_SIZE, Mm(LEFT_MARGIN), Mm(y), font);
    }
}

/// The three-page document with adjacent repeated terms on page 2.
pub fn create_overlap_document(path: &Path) -> Result<PathBuf> {
    TestPdfBuilder::new()
        .with_title("Overlap")
        .with_page(&["Introduction", "Nothing to hide here"])
        .with_page(&["Codeword: secretsecret", "Plain line"])
        .with_page(&["Closing remarks"])
        .build(path)
}

/// A short memo mentioning a person and a project in several spellings.
pub fn create_memo(path: &Path) -> Result<PathBuf> {
    TestPdfBuilder::new()
        .with_title("Memo")
        .with_page(&[
            "INTERNAL MEMO",
            "From: John Smith",
            "Re: Project Falcon budget",
            "Distribution: all staff",
        ])
        .with_page(&[
            "project falcon milestones",
            "Reviewed by john smith",
            "Status: on track",
        ])
        .build(path)
}

/// Rewrites `path` so that each page's `/Contents` is an array of two
/// streams, split between text operations.
pub fn split_page_contents(path: &Path) -> Result<()> {
    let mut doc = ::lopdf::Document::load(path)?;
    let page_ids: Vec<_> = doc.get_pages().values().copied().collect();

    for page_id in page_ids {
        let content = doc.get_page_content(page_id)?;
        let lines: Vec<&[u8]> = content.split(|&b| b == b'\n').collect();
        let (head, tail) = lines.split_at(lines.len() / 2);

        let parts = [head.join(&b'\n'), tail.join(&b'\n')];
        let refs = parts
            .into_iter()
            .map(|bytes| {
                let stream = ::lopdf::Stream::new(::lopdf::Dictionary::new(), bytes);
                ::lopdf::Object::Reference(doc.add_object(stream))
            })
            .collect();

        doc.get_object_mut(page_id)?
            .as_dict_mut()?
            .set("Contents", ::lopdf::Object::Array(refs));
    }

    doc.save(path)?;
    Ok(())
}

/// Adds a standard security handler whose user password is not empty, so
/// the document cannot be opened without one.
pub fn encrypt_document(path: &Path) -> Result<()> {
    use ::lopdf::{Dictionary, Object, StringFormat};

    let mut doc = ::lopdf::Document::load(path)?;
    let key = |fill: u8| Object::String(vec![fill; 32], StringFormat::Hexadecimal);

    let mut encrypt = Dictionary::new();
    encrypt.set("Filter", Object::Name(b"Standard".to_vec()));
    encrypt.set("V", Object::Integer(1));
    encrypt.set("R", Object::Integer(2));
    encrypt.set("O", key(0x4f));
    encrypt.set("U", key(0x55));
    encrypt.set("P", Object::Integer(-4));
    let encrypt_id = doc.add_object(encrypt);

    let file_id = Object::String(vec![0x42; 16], StringFormat::Hexadecimal);
    doc.trailer.set("Encrypt", Object::Reference(encrypt_id));
    doc.trailer
        .set("ID", Object::Array(vec![file_id.clone(), file_id]));

    doc.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builder_pattern() {
        let builder = TestPdfBuilder::new()
            .with_title("Test")
            .with_line("first")
            .with_page(&["second page"]);

        assert_eq!(builder.title, "Test");
        assert_eq!(builder.page_count(), 2);
        assert_eq!(builder.pages[0], ["first"]);
    }

    #[test]
    fn test_build_writes_every_page() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let pdf_path = temp_dir.path().join("pages.pdf");

        create_overlap_document(&pdf_path)?;

        let doc = ::lopdf::Document::load(&pdf_path)?;
        assert_eq!(doc.get_pages().len(), 3);
        Ok(())
    }

    #[test]
    fn test_split_contents_become_arrays() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let pdf_path = create_memo(&temp_dir.path().join("split.pdf"))?;

        split_page_contents(&pdf_path)?;

        let doc = ::lopdf::Document::load(&pdf_path)?;
        for page_id in doc.get_pages().values() {
            let page = doc.get_object(*page_id)?.as_dict()?;
            assert_eq!(page.get(b"Contents")?.as_array()?.len(), 2);
        }
        Ok(())
    }
}
