//! JSON rendering for curricula.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::Curriculum;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with 2-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a curriculum to JSON. Non-ASCII text is written verbatim.
pub fn to_json(curriculum: &Curriculum, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(curriculum),
        JsonFormat::Compact => serde_json::to_string(curriculum),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Serialize a curriculum and write it to `path` as UTF-8.
///
/// The file is only created once serialization has succeeded.
pub fn write_json<P: AsRef<Path>>(curriculum: &Curriculum, path: P, format: JsonFormat) -> Result<()> {
    let json = to_json(curriculum, format)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CourseSummary, Discipline};

    fn sample() -> Curriculum {
        Curriculum::new(
            CourseSummary {
                course: "CIÊNCIA DA COMPUTAÇÃO".to_string(),
                ..Default::default()
            },
            vec![Discipline::new("IF101", "ALGORITMOS")],
        )
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.starts_with("{\n  \"university\": \"\",\n  \"course\""));
        assert!(json.contains("CIÊNCIA DA COMPUTAÇÃO")); // not \u-escaped
        assert!(json.contains("\n    {\n      \"name\": \"ALGORITMOS\""));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grade.json");
        write_json(&sample(), &path, JsonFormat::Pretty).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: Curriculum = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, sample());
    }
}
