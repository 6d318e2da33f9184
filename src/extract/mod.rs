//! Curriculum extraction pipeline.
//!
//! Runs a [`BlockSource`] through the summary aggregator (last page only),
//! the discipline state machine (every page, in order) and the dependents
//! deriver, producing a [`Curriculum`].

mod dependents;
mod fields;
mod machine;
mod summary;

pub use dependents::derive_dependents;
pub use fields::{extract_equivalences, extract_hours, extract_semester, normalize};
pub use machine::{DisciplineMachine, DisciplineSet, Mode, TaggedBlock};
pub use summary::aggregate_summary;

use crate::error::Result;
use crate::model::{CourseSummary, Curriculum};
use crate::parser::{BlockSource, HeadingClassifier, ParseOptions};

/// Extracts a [`Curriculum`] from any [`BlockSource`].
pub struct CurriculumExtractor {
    options: ParseOptions,
    classifier: Box<dyn HeadingClassifier>,
}

impl CurriculumExtractor {
    /// Create an extractor using the heading rule from `options`.
    pub fn new(options: ParseOptions) -> Self {
        let classifier = Box::new(options.heading);
        Self {
            options,
            classifier,
        }
    }

    /// Replace the heading classifier.
    pub fn with_classifier(mut self, classifier: impl HeadingClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    /// The options in use.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Run the full pipeline. Fails without partial output on any fatal error.
    pub fn extract(&self, source: &dyn BlockSource) -> Result<Curriculum> {
        let vocab = &self.options.vocabulary;
        let page_count = source.page_count();

        let mut summary = match page_count.checked_sub(1) {
            Some(last_page) => aggregate_summary(source.page_lines(last_page)?, vocab, source.name()),
            None => CourseSummary {
                course: source.name().to_string(),
                ..Default::default()
            },
        };

        let mut machine = DisciplineMachine::new(self.options.layout.config(), vocab);
        for page in 0..page_count {
            let blocks = source.page_blocks(page)?;
            log::debug!("Page {}: {} blocks", page, blocks.len());
            for block in &blocks {
                machine.feed(&TaggedBlock::classify(block, self.classifier.as_ref()))?;
            }
        }

        let DisciplineSet {
            mut disciplines,
            semesters,
        } = machine.finish();
        derive_dependents(&mut disciplines);
        summary.semesters = semesters;

        log::info!(
            "Extracted {} disciplines over {} semesters from {}",
            disciplines.len(),
            semesters,
            source.name()
        );

        Ok(Curriculum::new(summary, disciplines))
    }
}

impl Default for CurriculumExtractor {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}
