//! Document access: text block sources, layout analysis and heading
//! classification.

mod classify;
mod layout;
mod options;
mod source;

pub use classify::{ends_with_number, HeadingClassifier, HeadingRule};
pub use layout::{LayoutAnalyzer, TextLine, TextSpan};
pub use options::{DuplicatePolicy, Layout, LayoutConfig, ParseOptions, SemesterRule, Vocabulary};
pub use source::{BlockSource, MemoryPage, MemorySource, PdfSource, RawBlock};
