//! Program catalogue: named programs and their historical reaction records.

pub mod handlers;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::program::ReactionRecord;

/// Selection info for a single program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramSummary {
    pub name: String,
    pub total_records: usize,
    /// Records with participation and a non-empty note (uncapped).
    pub usable_reactions: usize,
}

/// Program name → ordered records. Names iterate in sorted order.
#[derive(Debug, Clone, Default)]
pub struct ProgramLibrary {
    programs: BTreeMap<String, Vec<ReactionRecord>>,
}

impl ProgramLibrary {
    pub fn new(programs: BTreeMap<String, Vec<ReactionRecord>>) -> Self {
        Self { programs }
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.programs.contains_key(name)
    }

    /// Case-insensitive substring match over program names. An empty query
    /// returns every program.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let needle = query.trim().to_lowercase();
        self.programs
            .keys()
            .filter(|name| needle.is_empty() || name.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    pub fn summary(&self, name: &str) -> Option<ProgramSummary> {
        let records = self.programs.get(name)?;
        Some(ProgramSummary {
            name: name.to_string(),
            total_records: records.len(),
            usable_reactions: records.iter().filter_map(ReactionRecord::usable_note).count(),
        })
    }

    /// The program's example set: usable notes in source order, capped.
    /// Unknown programs yield an empty set.
    pub fn example_set(&self, name: &str, cap: usize) -> Vec<String> {
        self.programs
            .get(name)
            .map(|records| {
                records
                    .iter()
                    .filter_map(ReactionRecord::usable_note)
                    .take(cap)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::program::EXAMPLE_SCAN_CAP;

    fn record(participation: &str, note: &str) -> ReactionRecord {
        ReactionRecord {
            participation: Some(participation.to_string()),
            note: Some(note.to_string()),
        }
    }

    fn library() -> ProgramLibrary {
        let mut programs = BTreeMap::new();
        programs.insert(
            "노래교실".to_string(),
            vec![
                record("O", "따라 부르심"),
                record("X", "병원 진료"),
                record("O", ""),
                record("O", "박자 맞추시며 웃으심"),
            ],
        );
        programs.insert("Balloon Volley".to_string(), vec![record("O", "laughing")]);
        programs.insert("색칠하기".to_string(), vec![]);
        ProgramLibrary::new(programs)
    }

    #[test]
    fn test_search_empty_query_returns_all_sorted() {
        let lib = library();
        assert_eq!(lib.search(""), vec!["Balloon Volley", "노래교실", "색칠하기"]);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let lib = library();
        assert_eq!(lib.search("volley"), vec!["Balloon Volley"]);
        assert_eq!(lib.search("노래"), vec!["노래교실"]);
        assert!(lib.search("없는프로그램").is_empty());
    }

    #[test]
    fn test_summary_counts_usable_reactions() {
        let summary = library().summary("노래교실").unwrap();
        assert_eq!(summary.total_records, 4);
        assert_eq!(summary.usable_reactions, 2);
        assert!(library().summary("unknown").is_none());
    }

    #[test]
    fn test_example_set_preserves_source_order() {
        let examples = library().example_set("노래교실", EXAMPLE_SCAN_CAP);
        assert_eq!(examples, vec!["따라 부르심", "박자 맞추시며 웃으심"]);
    }

    #[test]
    fn test_example_set_is_capped() {
        let records = (0..40).map(|i| record("O", &format!("반응 {i}"))).collect();
        let mut programs = BTreeMap::new();
        programs.insert("체조".to_string(), records);
        let lib = ProgramLibrary::new(programs);

        let examples = lib.example_set("체조", EXAMPLE_SCAN_CAP);
        assert_eq!(examples.len(), 30);
        assert_eq!(examples[0], "반응 0");
        assert_eq!(examples[29], "반응 29");
    }

    #[test]
    fn test_example_set_empty_for_unknown_or_unusable() {
        assert!(library().example_set("unknown", 30).is_empty());
        assert!(library().example_set("색칠하기", 30).is_empty());
    }
}
