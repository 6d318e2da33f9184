//! Discipline records.

use serde::{Deserialize, Serialize};

/// A `{code, name}` reference to another discipline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisciplineRef {
    pub code: String,
    pub name: String,
}

impl DisciplineRef {
    /// Create a new reference.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// One curriculum unit with its hour, credit and relationship metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discipline {
    /// Display name, as printed after the code in the heading
    pub name: String,

    /// Short identifier, unique within a curriculum
    pub code: String,

    /// Free-text syllabus (may be empty)
    pub ementa: String,

    /// Total workload in hours
    pub hours: u32,

    /// Credits, truncated to an integer
    pub credits: u32,

    /// Whether the discipline is mandatory
    pub is_obligatory: bool,

    /// Semester the discipline belongs to (0 if unassigned)
    pub semester: u32,

    /// Disciplines this one may substitute for
    pub equivalences: Vec<DisciplineRef>,

    /// Disciplines required before this one
    pub prerequisites: Vec<DisciplineRef>,

    /// Disciplines listing this one as a prerequisite.
    ///
    /// Derived by [`crate::extract::derive_dependents`]; never authored.
    pub dependents: Vec<DisciplineRef>,
}

impl Discipline {
    /// Create an empty discipline with the given code and name.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// A `{code, name}` reference pointing at this discipline.
    pub fn to_ref(&self) -> DisciplineRef {
        DisciplineRef::new(self.code.clone(), self.name.clone())
    }
}
