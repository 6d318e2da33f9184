//! Course-level summary from the last page's plain text.

use super::fields::{extract_hours, normalize};
use crate::model::CourseSummary;
use crate::parser::Vocabulary;

/// Scan plain-text lines for university, course and workload totals.
///
/// Each normalized line is matched against the first applicable rule.
/// `default_course` is used when no course line is present. `semesters` is
/// left at 0; it comes from the discipline pass.
pub fn aggregate_summary<I, S>(lines: I, vocab: &Vocabulary, default_course: &str) -> CourseSummary
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut summary = CourseSummary {
        course: default_course.to_string(),
        ..Default::default()
    };

    for line in lines {
        let line = normalize(line.as_ref());

        if line.contains(&vocab.full_load) {
            match extract_hours(&line).first() {
                Some(&total) => summary.total_hours = total,
                None => log::warn!("No total hours in {:?}", line),
            }
        } else if let Some((_, course)) = line.split_once(vocab.course.as_str()) {
            summary.course = course.trim().to_string();
        } else if line.contains(&vocab.university) {
            summary.university = line;
        } else if line.contains(&vocab.elective_hours) && line.contains(&vocab.obligatory_hours) {
            match extract_hours(&line).as_slice() {
                [obligatory, elective] => {
                    summary.total_hours_obligatory = *obligatory;
                    summary.total_hours_elective = *elective;
                }
                other => log::warn!(
                    "Could not get elective and obligatory hours: expected 2 values, found {}",
                    other.len()
                ),
            }
        }
    }

    summary
}
