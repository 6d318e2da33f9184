//! Parsing options and configuration.

use serde::{Deserialize, Serialize};

use super::classify::HeadingRule;

/// Institutional document layout the extractor is tuned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Computer Science / Information Systems layout (`cc`, `si`)
    #[default]
    ComputerScience,
    /// Computer Engineering layout (`ec`)
    ComputerEngineering,
}

impl Layout {
    /// Resolve a command-line alias (case-insensitive).
    pub fn from_alias(alias: &str) -> Option<Self> {
        match alias.to_ascii_lowercase().as_str() {
            "cc" | "si" => Some(Layout::ComputerScience),
            "ec" => Some(Layout::ComputerEngineering),
            _ => None,
        }
    }

    /// State machine parameters for this layout.
    pub fn config(self) -> LayoutConfig {
        match self {
            Layout::ComputerScience => LayoutConfig {
                heading_window: 6,
                semester_rule: SemesterRule::PeriodMarker,
                duplicates: DuplicatePolicy::KeepAll,
            },
            Layout::ComputerEngineering => LayoutConfig {
                heading_window: 7,
                semester_rule: SemesterRule::HeadingField,
                duplicates: DuplicatePolicy::FirstWins,
            },
        }
    }
}

/// Where a discipline's semester comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemesterRule {
    /// Standalone "PERÍODO" blocks set the semester for following headings.
    PeriodMarker,
    /// The heading window carries its own period line (third field).
    HeadingField,
}

/// What happens when a discipline code shows up again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Append every closed record.
    KeepAll,
    /// Append only the first record per code; later ones are dropped.
    FirstWins,
}

/// Parameters of the discipline state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Number of trailing heading lines that carry structured fields
    pub heading_window: usize,
    pub semester_rule: SemesterRule,
    pub duplicates: DuplicatePolicy,
}

/// Marker tokens matched against uppercased text.
///
/// Matching is exact substring search, so every token must be uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    /// Explicit "none" marker in equivalence/prerequisite sections
    pub negation: String,
    pub equivalence: String,
    pub prerequisite: String,
    pub co_requisite: String,
    pub syllabus: String,
    pub period: String,
    /// Substring of a heading's type field marking a mandatory discipline
    pub obligatory: String,
    /// Last-page line carrying the full course workload
    pub full_load: String,
    pub course: String,
    pub university: String,
    /// Elective/obligatory workload line: both tokens must be present
    pub elective_hours: String,
    pub obligatory_hours: String,
}

impl Vocabulary {
    /// Brazilian Portuguese institutional vocabulary.
    pub fn portuguese() -> Self {
        Self {
            negation: "NÃO".to_string(),
            equivalence: "EQUIVALÊNCIA".to_string(),
            prerequisite: "PRÉ-REQUISITO:".to_string(),
            co_requisite: "CO-REQUISITO:".to_string(),
            syllabus: "EMENTA:".to_string(),
            period: "PERÍODO".to_string(),
            obligatory: "OBRIG".to_string(),
            full_load: "PLENA".to_string(),
            course: "CURSO:".to_string(),
            university: "UNIVERSIDADE".to_string(),
            elective_hours: "ELETIVOS".to_string(),
            obligatory_hours: "OBRIGATÓRIOS".to_string(),
        }
    }

    /// Load a vocabulary from JSON. Missing keys keep their Portuguese defaults.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| crate::Error::Other(format!("Invalid vocabulary: {}", e)))
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::portuguese()
    }
}

/// Options for extracting a curriculum.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Document layout variant
    pub layout: Layout,

    /// Marker tokens
    pub vocabulary: Vocabulary,

    /// Heading detection heuristic
    pub heading: HeadingRule,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout variant.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the marker vocabulary.
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Set the heading detection heuristic.
    pub fn with_heading_rule(mut self, rule: HeadingRule) -> Self {
        self.heading = rule;
        self
    }
}
