//! Curriculum model types.
//!
//! These are the records the extraction pipeline produces and the serializer
//! persists. Field order matches the persisted JSON layout.

mod curriculum;
mod discipline;

pub use curriculum::{CourseSummary, Curriculum};
pub use discipline::{Discipline, DisciplineRef};
