//! Layout analysis for PDF pages.
//!
//! Decodes a page's content stream into positioned text spans, groups spans
//! into lines and lines into blocks. Table cells sharing a baseline but
//! separated by a wide horizontal gap become separate lines of one block,
//! which is how discipline headings end up as one multi-line block.

use std::collections::BTreeMap;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use super::source::RawBlock;
use crate::error::{Error, Result};

/// Gap between spans on one baseline (in multiples of the font size) that
/// starts a new line.
const CELL_GAP_RATIO: f32 = 2.0;

/// A text span with position and font size.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Font size in points
    pub font_size: f32,
}

impl TextSpan {
    /// Create a new text span.
    pub fn new(text: String, x: f32, y: f32, font_size: f32) -> Self {
        Self {
            text,
            x,
            y,
            font_size,
        }
    }

    /// Estimated width; content streams don't carry glyph widths we decode.
    pub fn approx_width(&self) -> f32 {
        self.text.chars().count() as f32 * self.font_size * 0.5
    }

    /// Estimated right edge.
    pub fn right(&self) -> f32 {
        self.x + self.approx_width()
    }
}

/// Spans sharing a baseline and adjacent horizontally.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// The spans in this line, sorted by X position
    pub spans: Vec<TextSpan>,
    /// Y position (baseline)
    pub y: f32,
    /// Leftmost X position
    pub x: f32,
    /// Dominant font size in this line
    pub font_size: f32,
}

impl TextLine {
    /// Create a new text line from spans.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        if spans.is_empty() {
            return Self {
                spans,
                y: 0.0,
                x: 0.0,
                font_size: 0.0,
            };
        }

        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

        // Dominant font size, weighted by text length
        let total_chars: usize = spans.iter().map(|s| s.text.len()).sum();
        let weighted_size: f32 = spans
            .iter()
            .map(|s| s.font_size * s.text.len() as f32)
            .sum();
        let font_size = if total_chars > 0 {
            weighted_size / total_chars as f32
        } else {
            spans[0].font_size
        };

        Self {
            y: spans[0].y,
            x: spans[0].x,
            font_size,
            spans,
        }
    }

    /// Combined text of all spans, with a space where spans don't touch.
    pub fn text(&self) -> String {
        let mut result = String::new();
        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                let prev = &self.spans[i - 1];
                let gap = span.x - prev.right();
                if gap > span.font_size * 0.1
                    && !prev.text.ends_with(' ')
                    && !span.text.starts_with(' ')
                {
                    result.push(' ');
                }
            }
            result.push_str(&span.text);
        }
        result
    }
}

/// Layout analyzer for one lopdf document.
pub struct LayoutAnalyzer<'a> {
    doc: &'a LopdfDocument,
}

impl<'a> LayoutAnalyzer<'a> {
    /// Create a new layout analyzer.
    pub fn new(doc: &'a LopdfDocument) -> Self {
        Self { doc }
    }

    /// Extract text spans from a page (1-indexed) with position and font size.
    pub fn extract_page_spans(&self, page_num: u32) -> Result<Vec<TextSpan>> {
        let pages = self.doc.get_pages();
        let page_id = pages
            .get(&page_num)
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))?;

        let fonts = self
            .doc
            .get_page_fonts(*page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let content = self.get_page_content(*page_id)?;
        self.parse_content_stream(&content, &fonts)
    }

    /// Extract the text lines of a page in reading order.
    pub fn extract_page_lines(&self, page_num: u32) -> Result<Vec<TextLine>> {
        let spans = self.extract_page_spans(page_num)?;
        Ok(group_spans_into_lines(spans))
    }

    /// Extract the text blocks of a page in reading order.
    pub fn extract_page_blocks(&self, page_num: u32) -> Result<Vec<RawBlock>> {
        let lines = self.extract_page_lines(page_num)?;
        Ok(group_lines_into_blocks(lines))
    }

    /// Get page content stream.
    fn get_page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page_id)?;
        let contents = page_dict.get(b"Contents")?;

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(Object::Stream(s)) => stream_content(s),
                _ => Err(Error::PdfParse("Invalid content stream".to_string())),
            },
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            match stream_content(s) {
                                Ok(data) => {
                                    content.extend_from_slice(&data);
                                    content.push(b' ');
                                }
                                Err(e) => log::warn!("Skipping undecodable content stream: {}", e),
                            }
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn decode(&self, fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>, font: &[u8], bytes: &[u8]) -> String {
        fonts
            .get(font)
            .and_then(|f| f.get_font_encoding(self.doc).ok())
            .and_then(|enc| LopdfDocument::decode_text(&enc, bytes).ok())
            .unwrap_or_else(|| decode_text_simple(bytes))
    }

    /// Walk the content stream operators, emitting one span per text show.
    fn parse_content_stream(
        &self,
        content: &[u8],
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    ) -> Result<Vec<TextSpan>> {
        let content = lopdf::content::Content::decode(content)?;

        let mut spans = Vec::new();
        let mut font_name: Vec<u8> = Vec::new();
        let mut font_size: f32 = 12.0;
        let mut matrix = TextMatrix::default();
        let mut in_text = false;

        for op in content.operations {
            let text = match op.operator.as_str() {
                "BT" => {
                    in_text = true;
                    matrix = TextMatrix::default();
                    None
                }
                "ET" => {
                    in_text = false;
                    None
                }
                "Tf" => {
                    if let [Object::Name(name), size, ..] = op.operands.as_slice() {
                        font_name = name.clone();
                        font_size = get_number(size).unwrap_or(12.0);
                    }
                    None
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(get_number) {
                        matrix.leading = leading;
                    }
                    None
                }
                "Td" | "TD" => {
                    if let [tx, ty, ..] = op.operands.as_slice() {
                        let ty = get_number(ty).unwrap_or(0.0);
                        if op.operator == "TD" {
                            matrix.leading = -ty;
                        }
                        matrix.translate(get_number(tx).unwrap_or(0.0), ty);
                    }
                    None
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        let n: Vec<f32> = op
                            .operands
                            .iter()
                            .take(6)
                            .map(|o| get_number(o).unwrap_or(0.0))
                            .collect();
                        matrix.set(n[0], n[1], n[2], n[3], n[4], n[5]);
                    }
                    None
                }
                "T*" => {
                    matrix.next_line();
                    None
                }
                "Tj" => match op.operands.first() {
                    Some(Object::String(bytes, _)) => Some(self.decode(fonts, &font_name, bytes)),
                    _ => None,
                },
                "TJ" => match op.operands.first() {
                    Some(Object::Array(items)) => {
                        let mut combined = String::new();
                        for item in items {
                            match item {
                                Object::String(bytes, _) => {
                                    combined.push_str(&self.decode(fonts, &font_name, bytes))
                                }
                                // Large negative kerning is a word space
                                other => {
                                    if get_number(other).map(|n| -n > 200.0).unwrap_or(false)
                                        && !combined.is_empty()
                                        && !combined.ends_with(' ')
                                    {
                                        combined.push(' ');
                                    }
                                }
                            }
                        }
                        Some(combined)
                    }
                    _ => None,
                },
                "'" | "\"" => {
                    matrix.next_line();
                    let idx = if op.operator == "\"" { 2 } else { 0 };
                    match op.operands.get(idx) {
                        Some(Object::String(bytes, _)) => Some(self.decode(fonts, &font_name, bytes)),
                        _ => None,
                    }
                }
                _ => None,
            };

            if let Some(text) = text {
                if in_text && !text.trim().is_empty() {
                    let (x, y) = matrix.position();
                    spans.push(TextSpan::new(text, x, y, font_size * matrix.scale()));
                }
            }
        }

        Ok(spans)
    }
}

/// Group spans into lines: same baseline, no wide horizontal gap.
pub fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    // PDF Y grows upwards, so sort descending for top-to-bottom order
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<TextLine> = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();

    for span in spans {
        let same_line = current.last().is_some_and(|prev: &TextSpan| {
            (span.y - prev.y).abs() <= span.font_size * 0.3
                && span.x - prev.right() <= span.font_size * CELL_GAP_RATIO
        });
        if !same_line && !current.is_empty() {
            lines.push(TextLine::from_spans(std::mem::take(&mut current)));
        }
        current.push(span);
    }

    if !current.is_empty() {
        lines.push(TextLine::from_spans(current));
    }

    lines
}

/// Group lines into blocks on vertical spacing and font size changes.
pub fn group_lines_into_blocks(lines: Vec<TextLine>) -> Vec<RawBlock> {
    let avg_spacing = average_line_spacing(&lines);
    let mut blocks = Vec::new();
    let mut current: Vec<TextLine> = Vec::new();

    for line in lines {
        if let Some(prev) = current.last() {
            let spacing = (prev.y - line.y).abs();
            let breaks = spacing > avg_spacing * 1.5 || (prev.font_size - line.font_size).abs() > 1.0;
            if breaks {
                blocks.push(lines_to_block(std::mem::take(&mut current)));
            }
        }
        current.push(line);
    }

    if !current.is_empty() {
        blocks.push(lines_to_block(current));
    }

    blocks
}

fn lines_to_block(lines: Vec<TextLine>) -> RawBlock {
    let text = lines.iter().map(TextLine::text).collect::<Vec<_>>().join("\n");
    let x = lines.iter().map(|l| l.x).fold(f32::INFINITY, f32::min);
    let y = lines.first().map(|l| l.y).unwrap_or(0.0);

    // Dominant size, weighted by line length
    let total: usize = lines.iter().map(|l| l.text().len()).sum();
    let font_size = if total > 0 {
        lines
            .iter()
            .map(|l| l.font_size * l.text().len() as f32)
            .sum::<f32>()
            / total as f32
    } else {
        lines.first().map(|l| l.font_size).unwrap_or(0.0)
    };

    RawBlock {
        text,
        font_size,
        x,
        y,
    }
}

/// Average distance between consecutive distinct baselines.
fn average_line_spacing(lines: &[TextLine]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].y - w[1].y).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }

    spacings.iter().sum::<f32>() / spacings.len() as f32
}

/// Text matrix for tracking position in content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // X translation
    f: f32, // Y translation
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            leading: 12.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Content bytes of a stream. Streams without a `/Filter` are stored as is.
fn stream_content(stream: &lopdf::Stream) -> Result<Vec<u8>> {
    if stream.dict.get(b"Filter").is_err() {
        return Ok(stream.content.clone());
    }
    Ok(stream.decompressed_content()?)
}

/// Helper to extract number from PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Simple text decoding fallback when no encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Stream};

    /// One page whose `Contents` are the given unfiltered streams.
    fn document_with_contents(streams: &[&str]) -> LopdfDocument {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let stream_ids: Vec<ObjectId> = streams
            .iter()
            .map(|content| doc.add_object(Stream::new(dictionary! {}, content.as_bytes().to_vec())))
            .collect();
        let contents: Object = match stream_ids.as_slice() {
            [single] => (*single).into(),
            many => many.iter().map(|id| Object::from(*id)).collect::<Vec<_>>().into(),
        };
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => contents,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn test_unfiltered_content_stream() {
        let doc = document_with_contents(&["BT /F1 9 Tf 72 700 Td (IF101- ALGORITMOS) Tj ET"]);
        let spans = LayoutAnalyzer::new(&doc).extract_page_spans(1).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "IF101- ALGORITMOS");
        assert_eq!((spans[0].x, spans[0].y), (72.0, 700.0));
        assert_eq!(spans[0].font_size, 9.0);
    }

    #[test]
    fn test_unfiltered_content_array_keeps_every_stream() {
        let doc = document_with_contents(&[
            "BT /F1 9 Tf 72 700 Td (PRIMEIRA) Tj ET",
            "BT /F1 9 Tf 72 600 Td (SEGUNDA) Tj ET",
        ]);
        let lines = LayoutAnalyzer::new(&doc).extract_page_lines(1).unwrap();
        let texts: Vec<String> = lines.iter().map(TextLine::text).collect();
        assert_eq!(texts, vec!["PRIMEIRA", "SEGUNDA"]);
    }

    #[test]
    fn test_stream_content_without_filter() {
        let stream = Stream::new(dictionary! {}, b"BT ET".to_vec());
        assert_eq!(stream_content(&stream).unwrap(), b"BT ET".to_vec());
    }

    fn span(text: &str, x: f32, y: f32) -> TextSpan {
        TextSpan::new(text.to_string(), x, y, 10.0)
    }

    #[test]
    fn test_table_cells_become_separate_lines() {
        let spans = vec![
            span("IF101- ALGORITMOS", 59.8, 700.0),
            span("OBRIGATÓRIA", 300.0, 700.0),
            span("4.0", 500.0, 700.0),
        ];
        let lines = group_spans_into_lines(spans);
        let texts: Vec<String> = lines.iter().map(TextLine::text).collect();
        assert_eq!(texts, vec!["IF101- ALGORITMOS", "OBRIGATÓRIA", "4.0"]);
    }

    #[test]
    fn test_adjacent_spans_join_with_space() {
        let spans = vec![span("EMENTA:", 60.0, 600.0), span("ESTUDO", 100.0, 600.0)];
        let lines = group_spans_into_lines(spans);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "EMENTA: ESTUDO");
    }

    #[test]
    fn test_blocks_split_on_large_spacing() {
        let lines = group_spans_into_lines(vec![
            span("PRIMEIRA LINHA", 60.0, 700.0),
            span("SEGUNDA LINHA", 60.0, 688.0),
            span("TERCEIRA LINHA", 60.0, 676.0),
            span("OUTRO BLOCO", 80.0, 600.0),
        ]);
        let blocks = group_lines_into_blocks(lines);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text, "PRIMEIRA LINHA\nSEGUNDA LINHA\nTERCEIRA LINHA");
        assert!((blocks[0].x - 60.0).abs() < f32::EPSILON);
        assert_eq!(blocks[1].text, "OUTRO BLOCO");
    }

    #[test]
    fn test_decode_text_simple() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
        assert_eq!(decode_text_simple(&[0x4E, 0xC3]), "NÃ");
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]), "Hi");
    }

    #[test]
    fn test_text_matrix_leading() {
        let mut m = TextMatrix::default();
        m.set(1.0, 0.0, 0.0, 1.0, 50.0, 700.0);
        m.leading = 14.0;
        m.next_line();
        assert_eq!(m.position(), (50.0, 686.0));
    }
}
