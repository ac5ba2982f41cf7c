//! PDF text extraction backed by lopdf

use crate::scanner::{PagedText, ScanError};
use lopdf::{Document, ObjectId};
use std::collections::BTreeMap;

/// A parsed PDF whose pages can be read concurrently
pub struct PdfDocument {
    document: Document,
    pages: BTreeMap<u32, ObjectId>,
}

impl PdfDocument {
    /// Parses a PDF held in memory
    ///
    /// # Returns
    ///
    /// * `Ok(PdfDocument)` - The document structure was read
    /// * `Err(ScanError::Open)` - The bytes are not a readable PDF
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ScanError> {
        let document = Document::load_mem(bytes).map_err(|e| ScanError::Open(e.to_string()))?;
        let pages = document.get_pages();
        Ok(Self { document, pages })
    }
}

impl PagedText for PdfDocument {
    fn page_count(&self) -> u32 {
        u32::try_from(self.pages.len()).unwrap_or(u32::MAX)
    }

    fn page_text(&self, page: u32) -> Result<Option<String>, ScanError> {
        if !self.pages.contains_key(&page) {
            return Ok(None);
        }

        let text = self
            .document
            .extract_text(&[page])
            .map_err(|e| ScanError::Page {
                page,
                message: e.to_string(),
            })?;

        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }
}
