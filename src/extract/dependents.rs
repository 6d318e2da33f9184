//! Reverse prerequisite edges.

use std::collections::HashMap;

use crate::model::{Discipline, DisciplineRef};

/// Fill every discipline's `dependents` from the prerequisites of the set.
///
/// Dependents are listed in discipline order. Prerequisites naming a code
/// outside the set are tolerated and simply produce no edge. Running this
/// again on the same list yields the same result.
pub fn derive_dependents(disciplines: &mut [Discipline]) {
    let mut index: HashMap<String, Vec<DisciplineRef>> = HashMap::new();
    for discipline in disciplines.iter() {
        for prerequisite in &discipline.prerequisites {
            index
                .entry(prerequisite.code.clone())
                .or_default()
                .push(discipline.to_ref());
        }
    }

    for discipline in disciplines.iter_mut() {
        discipline.dependents = index.get(&discipline.code).cloned().unwrap_or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discipline(code: &str, prerequisites: &[&str]) -> Discipline {
        let mut disc = Discipline::new(code, format!("DISCIPLINA {}", code));
        disc.prerequisites = prerequisites
            .iter()
            .map(|p| DisciplineRef::new(*p, format!("DISCIPLINA {}", p)))
            .collect();
        disc
    }

    #[test]
    fn test_derive_dependents() {
        let mut list = vec![
            discipline("IF100", &[]),
            discipline("IF101", &["IF100"]),
            discipline("IF102", &["IF100", "IF101"]),
        ];
        derive_dependents(&mut list);

        let codes = |d: &Discipline| d.dependents.iter().map(|r| r.code.clone()).collect::<Vec<_>>();
        assert_eq!(codes(&list[0]), vec!["IF101", "IF102"]);
        assert_eq!(codes(&list[1]), vec!["IF102"]);
        assert!(list[2].dependents.is_empty());
        assert_eq!(list[0].dependents[0].name, "DISCIPLINA IF101");
    }

    #[test]
    fn test_dangling_prerequisite_is_tolerated() {
        let mut list = vec![discipline("IF101", &["XX999"])];
        derive_dependents(&mut list);
        assert!(list[0].dependents.is_empty());
    }

    #[test]
    fn test_idempotent() {
        let mut list = vec![
            discipline("IF100", &[]),
            discipline("IF101", &["IF100"]),
            discipline("IF102", &["IF101"]),
        ];
        derive_dependents(&mut list);
        let first = list.clone();
        derive_dependents(&mut list);
        assert_eq!(list, first);
    }

    #[test]
    fn test_stale_dependents_are_replaced() {
        let mut list = vec![discipline("IF100", &[])];
        list[0].dependents.push(DisciplineRef::new("OLD", "STALE"));
        derive_dependents(&mut list);
        assert!(list[0].dependents.is_empty());
    }
}
