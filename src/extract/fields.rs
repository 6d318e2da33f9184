//! Field extractors over normalized (uppercased, trimmed) text.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::DisciplineRef;

/// Hour values at or below this are list markers or page numbers.
const MIN_HOURS: u64 = 10;

/// Separator between a discipline code and its name.
pub(crate) const CODE_SEPARATOR: &str = "- ";

fn digit_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+").expect("valid regex"))
}

/// NFC-normalize, uppercase and trim a block of extracted text.
pub fn normalize(text: &str) -> String {
    text.nfc().collect::<String>().to_uppercase().trim().to_string()
}

/// Extract hour counts: every digit run greater than 10, in order.
///
/// Spaces and periods are removed first, so `"3.210 HORAS"` yields `3210`.
/// A run too long for `u64` saturates instead of being skipped.
pub fn extract_hours(s: &str) -> Vec<u64> {
    let compact: String = s.chars().filter(|c| *c != ' ' && *c != '.').collect();
    digit_runs()
        .find_iter(&compact)
        .map(|m| {
            m.as_str().parse::<u64>().unwrap_or_else(|_| {
                log::warn!("Hour value {} out of range", m.as_str());
                u64::MAX
            })
        })
        .filter(|n| *n > MIN_HOURS)
        .collect()
}

/// Extract a semester number: the first digit run in `s`.
pub fn extract_semester(s: &str) -> Result<u32> {
    let run = digit_runs()
        .find(s)
        .ok_or_else(|| Error::Parse(format!("no semester number in {:?}", s)))?;
    run.as_str()
        .parse()
        .map_err(|e| Error::Parse(format!("invalid semester number {:?}: {}", run.as_str(), e)))
}

/// Extract `CODE- NAME` references, one per line.
///
/// Any occurrence of `negation` marks an explicit empty list. Lines that do
/// not split into exactly one code and one name are dropped.
pub fn extract_equivalences(s: &str, negation: &str) -> Vec<DisciplineRef> {
    if s.contains(negation) {
        return Vec::new();
    }

    s.trim()
        .split('\n')
        .filter_map(|line| {
            let parts: Vec<&str> = line.split(CODE_SEPARATOR).collect();
            match parts.as_slice() {
                [code, name] => Some(DisciplineRef::new(code.trim(), *name)),
                _ => {
                    log::debug!("Dropping reference line {:?}", line);
                    None
                }
            }
        })
        .collect()
}
