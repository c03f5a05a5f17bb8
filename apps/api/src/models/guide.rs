//! Expression guide: the read-only knowledge base of example phrasing.
//!
//! The raw JSON mixes three shapes. Each section is resolved into a
//! [`GuideSection`] exactly once, when the guide is loaded, so formatting code
//! never has to probe shapes again.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Key carrying a level's share of participants (0.0 – 1.0).
pub const RATIO_KEY: &str = "비율";
/// Key carrying a level's expression list.
pub const EXPRESSIONS_KEY: &str = "표현";

/// A labelled list of expressions inside a flat section.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub label: String,
    pub expressions: Vec<String>,
}

/// A level inside a leveled section (e.g. cognitive level "높음").
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub label: String,
    pub ratio: Option<f64>,
    pub expressions: Vec<String>,
}

/// One guide section, resolved to its shape.
#[derive(Debug, Clone, PartialEq)]
pub enum GuideSection {
    /// category label → expressions
    Flat(Vec<Category>),
    /// level label → { ratio?, expressions }
    Leveled(Vec<Level>),
    /// whole-sentence phrases (time-flow section)
    Phrases(Vec<String>),
}

impl GuideSection {
    /// Resolves a raw JSON value into a section. Returns `None` when the value
    /// has none of the known shapes.
    ///
    /// An object is leveled as soon as one of its values is an object carrying
    /// an expression list; otherwise it is flat. Entries that don't fit the
    /// chosen shape are skipped.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(GuideSection::Phrases(strings(items))),
            Value::Object(map) if is_leveled(map) => Some(GuideSection::Leveled(
                map.iter()
                    .filter_map(|(label, entry)| {
                        let expressions = entry.get(EXPRESSIONS_KEY)?.as_array()?;
                        Some(Level {
                            label: label.clone(),
                            ratio: entry.get(RATIO_KEY).and_then(Value::as_f64),
                            expressions: strings(expressions),
                        })
                    })
                    .collect(),
            )),
            Value::Object(map) => Some(GuideSection::Flat(
                map.iter()
                    .filter_map(|(label, entry)| {
                        Some(Category {
                            label: label.clone(),
                            expressions: strings(entry.as_array()?),
                        })
                    })
                    .collect(),
            )),
            _ => None,
        }
    }
}

fn is_leveled(map: &Map<String, Value>) -> bool {
    map.values()
        .any(|entry| entry.get(EXPRESSIONS_KEY).is_some_and(Value::is_array))
}

fn strings(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

/// The whole guide: section name → resolved section.
/// Loaded once per session and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct ExpressionGuide {
    sections: HashMap<String, GuideSection>,
}

impl ExpressionGuide {
    /// Builds a guide from parsed JSON. Anything that is not an object yields
    /// an empty guide, which makes every prompt block fall back to defaults.
    pub fn from_value(value: &Value) -> Self {
        let Some(root) = value.as_object() else {
            warn!("Expression guide root is not a JSON object; using built-in defaults");
            return Self::default();
        };

        let mut sections = HashMap::with_capacity(root.len());
        for (name, raw) in root {
            match GuideSection::from_value(raw) {
                Some(section) => {
                    debug!("Guide section '{name}' resolved");
                    sections.insert(name.clone(), section);
                }
                None => warn!("Guide section '{name}' has an unsupported shape, skipped"),
            }
        }

        Self { sections }
    }

    pub fn section(&self, name: &str) -> Option<&GuideSection> {
        self.sections.get(name)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_resolves_to_phrases() {
        let section = GuideSection::from_value(&json!(["처음엔 망설이시다가", 3, "끝까지 집중하심"]));
        assert_eq!(
            section,
            Some(GuideSection::Phrases(vec![
                "처음엔 망설이시다가".to_string(),
                "끝까지 집중하심".to_string()
            ]))
        );
    }

    #[test]
    fn test_object_of_lists_resolves_to_flat_in_source_order() {
        let section = GuideSection::from_value(&json!({
            "즐거움": ["웃으시며"],
            "만족감": ["뿌듯해하심"],
            "메모": "not a list"
        }))
        .unwrap();

        let GuideSection::Flat(categories) = section else {
            panic!("expected flat section");
        };
        let labels: Vec<_> = categories.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["즐거움", "만족감"]);
    }

    #[test]
    fn test_object_of_levels_resolves_to_leveled() {
        let section = GuideSection::from_value(&json!({
            "높음": {"비율": 0.3, "표현": ["스스로"]},
            "낮음": {"표현": ["지켜보시며"]}
        }))
        .unwrap();

        let GuideSection::Leveled(levels) = section else {
            panic!("expected leveled section");
        };
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].ratio, Some(0.3));
        assert_eq!(levels[1].ratio, None);
        assert_eq!(levels[1].expressions, vec!["지켜보시며".to_string()]);
    }

    #[test]
    fn test_scalar_section_is_rejected() {
        assert!(GuideSection::from_value(&json!("text")).is_none());
        assert!(GuideSection::from_value(&json!(42)).is_none());
    }

    #[test]
    fn test_guide_skips_unsupported_sections() {
        let guide = ExpressionGuide::from_value(&json!({
            "긍정적_감정": {"즐거움": ["웃으시며"]},
            "버전": 2
        }));
        assert_eq!(guide.len(), 1);
        assert!(guide.section("긍정적_감정").is_some());
        assert!(guide.section("버전").is_none());
    }

    #[test]
    fn test_non_object_root_is_empty_guide() {
        assert!(ExpressionGuide::from_value(&json!([1, 2, 3])).is_empty());
    }
}
