//! Text block sources.
//!
//! A [`BlockSource`] hands the extractor the raw material it needs: per-page
//! text blocks carrying layout metrics, and per-page plain-text lines (used
//! only for the last page). Pages are 0-indexed here.

use std::io::Read;
use std::path::Path;

use lopdf::Document as LopdfDocument;

use super::layout::LayoutAnalyzer;
use crate::detect::{pdf_version_from_bytes, pdf_version_from_path};
use crate::error::{Error, Result};

/// A text block as extracted from a page, before heading classification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBlock {
    /// Block text, lines separated by `\n`
    pub text: String,
    /// Dominant font size in points
    pub font_size: f32,
    /// Left edge
    pub x: f32,
    /// Baseline of the first line
    pub y: f32,
}

impl RawBlock {
    /// Create a block with no layout metrics.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Set the font size.
    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    /// Set the position.
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }
}

/// Paginated access to a document's text.
pub trait BlockSource {
    /// Document name, used as the course name fallback.
    fn name(&self) -> &str;

    /// Number of pages.
    fn page_count(&self) -> u32;

    /// Text blocks of `page`, in reading order.
    fn page_blocks(&self, page: u32) -> Result<Vec<RawBlock>>;

    /// Plain-text lines of `page`, in reading order.
    fn page_lines(&self, page: u32) -> Result<Vec<String>>;
}

/// One page of a [`MemorySource`].
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    pub blocks: Vec<RawBlock>,
    pub lines: Vec<String>,
}

/// In-memory [`BlockSource`] for tests and pre-extracted documents.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    name: String,
    pages: Vec<MemoryPage>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pages: Vec::new(),
        }
    }

    /// Append a page of blocks. Its plain-text lines are the blocks' lines.
    pub fn with_page(mut self, blocks: Vec<RawBlock>) -> Self {
        let lines = blocks
            .iter()
            .flat_map(|b| b.text.lines().map(str::to_string))
            .collect();
        self.pages.push(MemoryPage { blocks, lines });
        self
    }

    /// Append a page with explicit plain-text lines.
    pub fn with_page_lines(mut self, blocks: Vec<RawBlock>, lines: Vec<String>) -> Self {
        self.pages.push(MemoryPage { blocks, lines });
        self
    }

    fn page(&self, page: u32) -> Result<&MemoryPage> {
        self.pages
            .get(page as usize)
            .ok_or(Error::PageOutOfRange(page, self.page_count()))
    }
}

impl BlockSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_blocks(&self, page: u32) -> Result<Vec<RawBlock>> {
        Ok(self.page(page)?.blocks.clone())
    }

    fn page_lines(&self, page: u32) -> Result<Vec<String>> {
        Ok(self.page(page)?.lines.clone())
    }
}

/// lopdf-backed [`BlockSource`].
pub struct PdfSource {
    doc: LopdfDocument,
    name: String,
    /// lopdf page numbers (1-indexed) in document order
    page_numbers: Vec<u32>,
}

impl PdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let version = pdf_version_from_path(path)?;
        log::debug!("Opening {} (PDF {})", path.display(), version);

        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc, path.display().to_string()))
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8], name: impl Into<String>) -> Result<Self> {
        pdf_version_from_bytes(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc, name))
    }

    /// Load a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R, name: impl Into<String>) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data, name)
    }

    fn from_document(doc: LopdfDocument, name: impl Into<String>) -> Self {
        if doc.is_encrypted() {
            log::warn!("Document is encrypted; extracted text may be unreadable");
        }
        let page_numbers = doc.get_pages().keys().copied().collect();
        Self {
            doc,
            name: name.into(),
            page_numbers,
        }
    }

    fn page_number(&self, page: u32) -> Result<u32> {
        self.page_numbers
            .get(page as usize)
            .copied()
            .ok_or(Error::PageOutOfRange(page, self.page_count()))
    }
}

impl BlockSource for PdfSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn page_count(&self) -> u32 {
        self.page_numbers.len() as u32
    }

    fn page_blocks(&self, page: u32) -> Result<Vec<RawBlock>> {
        let page_num = self.page_number(page)?;
        LayoutAnalyzer::new(&self.doc).extract_page_blocks(page_num)
    }

    fn page_lines(&self, page: u32) -> Result<Vec<String>> {
        let page_num = self.page_number(page)?;
        let lines = LayoutAnalyzer::new(&self.doc).extract_page_lines(page_num)?;
        Ok(lines.iter().map(|l| l.text()).collect())
    }
}
