//! Discipline state machine.
//!
//! Consumes the document's tagged blocks in order and rebuilds discipline
//! records. A record is opened by a heading block, filled in by the body
//! blocks that follow (syllabus, equivalences, prerequisites) and closed when
//! the next heading arrives or the document ends.
//!
//! Transition priority for every block:
//!
//! 1. equivalence marker: await an equivalence list
//! 2. prerequisite marker (without negation): await a prerequisite list
//! 3. syllabus marker: equivalences before it, ementa after it
//! 4. period marker (period-marker layouts only): semester bookkeeping
//! 5. heading: close the in-progress record, open a new one
//! 6. body text: consumed by whichever list is awaited, otherwise ignored

use std::collections::HashSet;

use super::fields::{extract_equivalences, extract_semester, normalize, CODE_SEPARATOR};
use crate::error::{Error, Result};
use crate::model::{Discipline, DisciplineRef};
use crate::parser::{
    DuplicatePolicy, HeadingClassifier, LayoutConfig, RawBlock, SemesterRule, Vocabulary,
};

/// A normalized block with its heading flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedBlock {
    pub is_heading: bool,
    /// Uppercased, trimmed text
    pub text: String,
}

impl TaggedBlock {
    /// A heading block. `text` is normalized.
    pub fn heading(text: &str) -> Self {
        Self {
            is_heading: true,
            text: normalize(text),
        }
    }

    /// A body block. `text` is normalized.
    pub fn body(text: &str) -> Self {
        Self {
            is_heading: false,
            text: normalize(text),
        }
    }

    /// Classify and normalize a raw block.
    pub fn classify(block: &RawBlock, classifier: &dyn HeadingClassifier) -> Self {
        Self {
            is_heading: classifier.is_heading(block),
            text: normalize(&block.text),
        }
    }
}

/// Which list, if any, the next body block fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    AwaitingEquivalence,
    AwaitingPrerequisite,
}

/// Output of a completed pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisciplineSet {
    /// Closed records in document order; dependents not yet derived
    pub disciplines: Vec<Discipline>,
    /// Highest semester seen
    pub semesters: u32,
}

/// Heading fields parsed from the trailing window of a heading block.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HeadingFields {
    code: String,
    name: String,
    is_obligatory: bool,
    period: Option<u32>,
    hours: u32,
    credits: u32,
}

/// State for one parsing pass over a document.
#[derive(Debug)]
pub struct DisciplineMachine<'v> {
    config: LayoutConfig,
    vocab: &'v Vocabulary,
    mode: Mode,
    /// In-progress record; an empty code means none is open
    current: Discipline,
    current_semester: u32,
    pending_semester: u32,
    max_semester: u32,
    closed: Vec<Discipline>,
    seen: HashSet<String>,
}

impl<'v> DisciplineMachine<'v> {
    /// Create a machine for one document.
    pub fn new(config: LayoutConfig, vocab: &'v Vocabulary) -> Self {
        Self {
            config,
            vocab,
            mode: Mode::Normal,
            current: Discipline::default(),
            current_semester: 0,
            pending_semester: 0,
            max_semester: 0,
            closed: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Records closed so far.
    pub fn closed(&self) -> &[Discipline] {
        &self.closed
    }

    /// The in-progress record, if a heading has been seen.
    pub fn in_progress(&self) -> Option<&Discipline> {
        (!self.current.code.is_empty()).then_some(&self.current)
    }

    /// Consume one block.
    pub fn feed(&mut self, block: &TaggedBlock) -> Result<()> {
        let text = block.text.as_str();
        let vocab = self.vocab;

        if text.contains(&vocab.equivalence) {
            self.mode = Mode::AwaitingEquivalence;
        } else if text.contains(&vocab.prerequisite) && !text.contains(&vocab.negation) {
            self.mode = Mode::AwaitingPrerequisite;
        } else if let Some((before, after)) = text.split_once(vocab.syllabus.as_str()) {
            if !before.is_empty() {
                self.current.equivalences = extract_equivalences(before, &vocab.negation);
            }
            self.current.ementa = after.replace('\n', " ").trim().to_string();
            if self.mode == Mode::AwaitingEquivalence {
                self.mode = Mode::Normal;
            }
        } else if self.config.semester_rule == SemesterRule::PeriodMarker
            && text.contains(&vocab.period)
        {
            self.observe_period(text)?;
        } else if block.is_heading {
            self.start_discipline(text)?;
        } else {
            self.consume_body(text);
        }

        Ok(())
    }

    /// Close the last record and return everything collected.
    pub fn finish(mut self) -> DisciplineSet {
        self.close_current();
        DisciplineSet {
            disciplines: self.closed,
            semesters: self.max_semester,
        }
    }

    /// Feed every block, then finish.
    pub fn run<'b, I>(mut self, blocks: I) -> Result<DisciplineSet>
    where
        I: IntoIterator<Item = &'b TaggedBlock>,
    {
        for block in blocks {
            self.feed(block)?;
        }
        Ok(self.finish())
    }

    fn observe_period(&mut self, text: &str) -> Result<()> {
        let semester = extract_semester(text)?;
        match self.closed.last() {
            // A new period seen mid-record belongs to the next discipline
            Some(last) if last.code != self.current.code => {
                log::debug!("Semester {} pending after {}", semester, self.current.code);
                self.pending_semester = semester;
            }
            _ => {
                self.current_semester = semester;
                self.pending_semester = semester;
            }
        }
        self.max_semester = self.max_semester.max(self.current_semester);
        Ok(())
    }

    fn start_discipline(&mut self, text: &str) -> Result<()> {
        let lines: Vec<&str> = text.split('\n').collect();
        let window_start = lines.len().saturating_sub(self.config.heading_window);
        let (preamble, window) = lines.split_at(window_start);

        // Equivalence lines that ran into this heading belong to the open record
        if self.mode == Mode::AwaitingEquivalence {
            let negated = preamble
                .first()
                .is_some_and(|line| line.contains(&self.vocab.negation));
            if !negated {
                self.current.equivalences =
                    preamble.iter().filter_map(|l| parse_preamble_ref(l)).collect();
            }
            self.mode = Mode::Normal;
        }

        self.close_current();

        let fields = self.parse_heading_window(window)?;
        log::debug!("Discipline {} ({})", fields.code, fields.name);

        if let Some(period) = fields.period {
            self.max_semester = self.max_semester.max(period);
        }
        self.current = Discipline {
            code: fields.code,
            name: fields.name,
            hours: fields.hours,
            credits: fields.credits,
            is_obligatory: fields.is_obligatory,
            semester: fields.period.unwrap_or(0),
            ..Default::default()
        };
        Ok(())
    }

    fn consume_body(&mut self, text: &str) {
        match self.mode {
            Mode::AwaitingEquivalence => {
                self.current.equivalences = extract_equivalences(text, &self.vocab.negation);
                self.mode = Mode::Normal;
            }
            Mode::AwaitingPrerequisite => {
                // Co-requisites are not tracked
                let prerequisites = text
                    .split(self.vocab.co_requisite.as_str())
                    .next()
                    .unwrap_or(text);
                self.current.prerequisites =
                    extract_equivalences(prerequisites, &self.vocab.negation);
                self.mode = Mode::Normal;
            }
            Mode::Normal => {}
        }
    }

    fn close_current(&mut self) {
        if self.current.code.is_empty() {
            return;
        }

        let mut discipline = std::mem::take(&mut self.current);
        if self.config.semester_rule == SemesterRule::PeriodMarker {
            discipline.semester = self.current_semester;
            self.current_semester = self.pending_semester;
        }

        match self.config.duplicates {
            DuplicatePolicy::KeepAll => self.closed.push(discipline),
            DuplicatePolicy::FirstWins => {
                if self.seen.insert(discipline.code.clone()) {
                    self.closed.push(discipline);
                } else {
                    log::debug!("Dropping repeated discipline {}", discipline.code);
                }
            }
        }
    }

    /// Parse `name-code`, `type`, [`period`], filler lines, `hours`, `credits`.
    fn parse_heading_window(&self, window: &[&str]) -> Result<HeadingFields> {
        if window.len() != self.config.heading_window {
            return Err(Error::Format(format!(
                "expected {} heading lines, found {}",
                self.config.heading_window,
                window.len()
            )));
        }

        let [name_line, kind, middle @ .., hours, credits] = window else {
            return Err(Error::Format(format!(
                "heading window of {} lines has no room for name, type, hours and credits",
                window.len()
            )));
        };
        let period = match (self.config.semester_rule, middle) {
            (SemesterRule::PeriodMarker, _) => None,
            (SemesterRule::HeadingField, [period, ..]) => Some(parse_number::<u32>(period, "period")?),
            (SemesterRule::HeadingField, []) => {
                return Err(Error::Format("heading window has no period line".to_string()))
            }
        };
        let hours = parse_number::<u32>(hours, "hours")?;
        let credits = parse_number::<f64>(credits, "credits")?;

        let parts: Vec<&str> = name_line.split(CODE_SEPARATOR).collect();
        let [code, name] = parts.as_slice() else {
            return Err(Error::Format(format!(
                "expected `CODE- NAME`, found {:?}",
                name_line
            )));
        };

        Ok(HeadingFields {
            code: code.trim().to_string(),
            name: name.to_string(),
            is_obligatory: kind.contains(&self.vocab.obligatory),
            period,
            hours,
            credits: credits as u32,
        })
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, what: &str) -> Result<T> {
    field
        .trim()
        .parse()
        .map_err(|_| Error::Parse(format!("invalid {} field {:?}", what, field)))
}

/// Parse an equivalence line that preceded a heading window.
fn parse_preamble_ref(line: &str) -> Option<DisciplineRef> {
    let mut parts = line.split(CODE_SEPARATOR);
    match (parts.next(), parts.next()) {
        (Some(code), Some(name)) => Some(DisciplineRef::new(code.trim(), name.trim())),
        _ => {
            log::debug!("Dropping equivalence line {:?}", line);
            None
        }
    }
}
