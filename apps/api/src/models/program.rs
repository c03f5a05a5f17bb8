use serde::{Deserialize, Serialize};

/// Participation flag value meaning "took part".
pub const PARTICIPATED: &str = "O";

/// Historical cap when scanning a program's notes.
pub const EXAMPLE_SCAN_CAP: usize = 30;

/// One historical entry for a program, as recorded by staff.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReactionRecord {
    #[serde(rename = "참여", default)]
    pub participation: Option<String>,
    #[serde(rename = "반응 및 특이사항(미참여사유)", default)]
    pub note: Option<String>,
}

impl ReactionRecord {
    pub fn participated(&self) -> bool {
        self.participation.as_deref() == Some(PARTICIPATED)
    }

    /// The trimmed note, if the participant took part and something was written.
    pub fn usable_note(&self) -> Option<&str> {
        if !self.participated() {
            return None;
        }
        self.note
            .as_deref()
            .map(str::trim)
            .filter(|note| !note.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(participation: Option<&str>, note: Option<&str>) -> ReactionRecord {
        ReactionRecord {
            participation: participation.map(str::to_string),
            note: note.map(str::to_string),
        }
    }

    #[test]
    fn test_usable_note_requires_participation() {
        assert_eq!(record(Some("X"), Some("웃으심")).usable_note(), None);
        assert_eq!(record(None, Some("웃으심")).usable_note(), None);
        assert_eq!(record(Some("O"), Some("  웃으심 ")).usable_note(), Some("웃으심"));
    }

    #[test]
    fn test_blank_note_is_not_usable() {
        assert_eq!(record(Some("O"), Some("   ")).usable_note(), None);
        assert_eq!(record(Some("O"), None).usable_note(), None);
    }

    #[test]
    fn test_record_deserializes_from_source_keys() {
        let json = r#"{"참여": "O", "반응 및 특이사항(미참여사유)": "박수 치심", "날짜": "2024-03-01"}"#;
        let parsed: ReactionRecord = serde_json::from_str(json).unwrap();
        assert!(parsed.participated());
        assert_eq!(parsed.usable_note(), Some("박수 치심"));
    }

    #[test]
    fn test_missing_keys_default_to_none() {
        let parsed: ReactionRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, ReactionRecord::default());
    }
}
