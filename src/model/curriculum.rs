//! Curriculum-level types.

use super::Discipline;
use serde::{Deserialize, Serialize};

/// Document-wide course information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    /// University name, as printed on the last page
    pub university: String,

    /// Course name
    pub course: String,

    /// Highest semester index seen
    pub semesters: u32,

    /// Full course workload in hours
    pub total_hours: u64,

    /// Elective workload in hours
    pub total_hours_elective: u64,

    /// Obligatory workload in hours
    pub total_hours_obligatory: u64,
}

/// A full curriculum: the course summary plus its ordered disciplines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curriculum {
    #[serde(flatten)]
    pub summary: CourseSummary,

    /// Disciplines in document order
    pub disciplines: Vec<Discipline>,
}

impl Curriculum {
    /// Create a curriculum from its parts.
    pub fn new(summary: CourseSummary, disciplines: Vec<Discipline>) -> Self {
        Self {
            summary,
            disciplines,
        }
    }

    /// Get a discipline by code.
    pub fn discipline(&self, code: &str) -> Option<&Discipline> {
        self.disciplines.iter().find(|d| d.code == code)
    }

    /// Number of obligatory disciplines.
    pub fn obligatory_count(&self) -> usize {
        self.disciplines.iter().filter(|d| d.is_obligatory).count()
    }
}
