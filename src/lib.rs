//! # curriculum-pdf
//!
//! Extracts a structured curriculum (university, course, semester plan and
//! disciplines with prerequisites and equivalences) from institutional
//! curriculum PDFs, and serializes it to JSON.
//!
//! ## Quick Start
//!
//! ```no_run
//! use curriculum_pdf::{parse_file, render, Layout, ParseOptions};
//!
//! fn main() -> curriculum_pdf::Result<()> {
//!     let options = ParseOptions::new().with_layout(Layout::ComputerScience);
//!     let curriculum = parse_file("grade.pdf", options)?;
//!
//!     let json = render::to_json(&curriculum, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!     Ok(())
//! }
//! ```
//!
//! The parser is tuned to two document layouts (see [`Layout`]). Heading
//! detection is pluggable through [`HeadingClassifier`], and every marker
//! token lives in a [`Vocabulary`].

pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use error::{Error, Result};
pub use extract::{derive_dependents, CurriculumExtractor, DisciplineMachine, TaggedBlock};
pub use model::{CourseSummary, Curriculum, Discipline, DisciplineRef};
pub use parser::{
    BlockSource, HeadingClassifier, HeadingRule, Layout, MemorySource, ParseOptions, PdfSource,
    RawBlock, Vocabulary,
};
pub use render::JsonFormat;

use std::io::Read;
use std::path::Path;

/// Extract a curriculum from a PDF file.
///
/// # Example
///
/// ```no_run
/// use curriculum_pdf::{parse_file, Layout, ParseOptions};
///
/// let options = ParseOptions::new().with_layout(Layout::ComputerEngineering);
/// let curriculum = parse_file("grade_ec.pdf", options).unwrap();
/// println!("{} disciplines", curriculum.disciplines.len());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Curriculum> {
    let source = PdfSource::open(path)?;
    parse_source(&source, options)
}

/// Extract a curriculum from PDF bytes. `name` is the course name fallback.
pub fn parse_bytes(data: &[u8], name: &str, options: ParseOptions) -> Result<Curriculum> {
    let source = PdfSource::from_bytes(data, name)?;
    parse_source(&source, options)
}

/// Extract a curriculum from a reader.
pub fn parse_reader<R: Read>(reader: R, name: &str, options: ParseOptions) -> Result<Curriculum> {
    let source = PdfSource::from_reader(reader, name)?;
    parse_source(&source, options)
}

/// Extract a curriculum from any block source.
pub fn parse_source(source: &dyn BlockSource, options: ParseOptions) -> Result<Curriculum> {
    CurriculumExtractor::new(options).extract(source)
}

/// Extract a PDF file and write the JSON record to `output`.
///
/// Nothing is written if extraction fails.
///
/// # Example
///
/// ```no_run
/// use curriculum_pdf::{convert_file, JsonFormat, ParseOptions};
///
/// convert_file("grade.pdf", "grade.json", ParseOptions::default(), JsonFormat::Pretty)?;
/// # Ok::<(), curriculum_pdf::Error>(())
/// ```
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: ParseOptions,
    format: JsonFormat,
) -> Result<Curriculum> {
    let curriculum = parse_file(input, options)?;
    render::write_json(&curriculum, output, format)?;
    Ok(curriculum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bytes_empty_data() {
        let result = parse_bytes(&[], "empty.pdf", ParseOptions::default());
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_parse_bytes_not_a_pdf() {
        let result = parse_bytes(b"<!DOCTYPE html><html></html>", "x", ParseOptions::default());
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_parse_file_missing() {
        let result = parse_file("/nonexistent/grade.pdf", ParseOptions::default());
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_convert_file_writes_nothing_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("not-a-pdf.pdf");
        std::fs::write(&input, "plain text").unwrap();
        let output = dir.path().join("out.json");

        let result = convert_file(&input, &output, ParseOptions::default(), JsonFormat::Pretty);
        assert!(result.is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_parse_source_memory() {
        let source = MemorySource::new("grade.pdf").with_page(vec![
            RawBlock::new("IF101- ALGORITMOS\nOBRIGATÓRIA\n60\n4\n64\n4.0").with_position(59.809, 700.0),
        ]);
        let curriculum = parse_source(&source, ParseOptions::default()).unwrap();
        assert_eq!(curriculum.disciplines[0].code, "IF101");
    }
}
