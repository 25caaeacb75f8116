use std::path::Path;

use crate::error::{DocqaError, Result};
use crate::ingest::DocumentReader;
use crate::models::DocumentPage;

/// PDF format reader
///
/// Pages are read individually through `lopdf`. When the document structure
/// cannot be parsed that way, the whole text is extracted with `pdf-extract`
/// and split on form feeds.
pub struct PdfReader;

impl DocumentReader for PdfReader {
    fn read_pages(&self, path: &Path) -> Result<Vec<DocumentPage>> {
        let document_path = path.display().to_string();

        match lopdf::Document::load(path) {
            Ok(doc) => {
                let pages = doc.get_pages();
                let mut result = Vec::with_capacity(pages.len());

                for (position, page_number) in pages.keys().enumerate() {
                    let text = doc.extract_text(&[*page_number]).map_err(|e| {
                        DocqaError::DocumentExtraction {
                            path: path.to_path_buf(),
                            reason: format!("page {}: {}", page_number, e),
                        }
                    })?;
                    result.push(DocumentPage::new(text, document_path.clone(), position + 1));
                }

                Ok(result)
            }
            Err(e) => {
                tracing::debug!("lopdf could not parse {}: {}; falling back to pdf-extract", document_path, e);

                let text =
                    pdf_extract::extract_text(path).map_err(|e| DocqaError::DocumentExtraction {
                        path: path.to_path_buf(),
                        reason: format!("Failed to extract text: {}", e),
                    })?;

                Ok(split_form_feeds(&text, &document_path))
            }
        }
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn format_name(&self) -> &str {
        "PDF"
    }
}

/// Split extracted text into pages on form feed characters
pub(crate) fn split_form_feeds(text: &str, document_path: &str) -> Vec<DocumentPage> {
    text.split('\x0C')
        .enumerate()
        .map(|(i, page)| DocumentPage::new(page, document_path, i + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};
    use std::fs;
    use tempfile::TempDir;

    /// Write a PDF with one page per entry; `None` gives a page without content
    fn write_pdf(path: &Path, pages: &[Option<&str>]) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for text in pages {
            let mut page = dictionary! { "Type" => "Page", "Parent" => pages_id };
            if let Some(text) = text {
                let content = Content {
                    operations: vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 12.into()]),
                        Operation::new("Td", vec![72.into(), 720.into()]),
                        Operation::new("Tj", vec![Object::string_literal(*text)]),
                        Operation::new("ET", vec![]),
                    ],
                };
                let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
                page.set("Contents", content_id);
            }
            kids.push(Object::from(doc.add_object(page)));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_reads_each_page_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("handbook.pdf");
        write_pdf(&path, &[Some("Hello first"), Some("Second page")]);

        let pages = PdfReader.read_pages(&path).unwrap();

        let read: Vec<(usize, &str)> = pages.iter().map(|p| (p.source.page, p.text.trim())).collect();
        assert_eq!(read, vec![(1, "Hello first"), (2, "Second page")]);
        assert!(pages.iter().all(|p| p.source.document_path == path.display().to_string()));
    }

    #[test]
    fn test_blank_page_is_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scan.pdf");
        write_pdf(&path, &[Some("Cover"), None]);

        let pages = PdfReader.read_pages(&path).unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].text.trim(), "Cover");
        assert_eq!(pages[1].source.page, 2);
        assert!(pages[1].text.trim().is_empty());
    }

    #[test]
    fn test_supported_extensions() {
        let reader = PdfReader;
        assert_eq!(reader.supported_extensions(), &["pdf"]);
        assert_eq!(reader.format_name(), "PDF");
    }

    #[test]
    fn test_split_form_feeds() {
        let pages = split_form_feeds("Page 1\x0CPage 2\x0CPage 3", "doc.pdf");

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[2].text, "Page 3");
        assert_eq!(pages[2].source.page, 3);
        assert_eq!(pages[0].source.document_path, "doc.pdf");
    }

    #[test]
    fn test_split_form_feeds_without_breaks() {
        let pages = split_form_feeds("single page", "doc.pdf");
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].source.page, 1);
    }

    #[test]
    fn test_corrupted_pdf_is_extraction_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.pdf");
        fs::write(&path, b"this is not a pdf").unwrap();

        let err = PdfReader.read_pages(&path).unwrap_err();
        assert!(matches!(err, DocqaError::DocumentExtraction { .. }));
    }
}
