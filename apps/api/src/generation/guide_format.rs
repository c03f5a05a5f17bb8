//! Guide formatter: renders expression-guide sections into bounded prompt blocks.
//!
//! Each of the eight blocks falls back to its own built-in text independently,
//! so a partially populated guide still yields a complete prompt.

use crate::generation::prompts::{
    FALLBACK_BEHAVIORS, FALLBACK_COGNITIVE, FALLBACK_NEUTRAL, FALLBACK_PHYSICAL,
    FALLBACK_POSITIVE, FALLBACK_REDUCED, FALLBACK_SOCIAL, FALLBACK_TIME_FLOW,
};
use crate::models::guide::{Category, ExpressionGuide, GuideSection, Level};

/// The eight prompt blocks fed by the guide, in prompt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideBlock {
    PositiveEmotions,
    NeutralEmotions,
    ReducedEmotions,
    CognitiveLevels,
    PhysicalLevels,
    SocialLevels,
    ProgramBehaviors,
    TimeFlow,
}

impl GuideBlock {
    /// Section name in the guide JSON.
    pub fn section_key(self) -> &'static str {
        match self {
            GuideBlock::PositiveEmotions => "긍정적_감정",
            GuideBlock::NeutralEmotions => "중립적_감정",
            GuideBlock::ReducedEmotions => "소극적_피로_감정",
            GuideBlock::CognitiveLevels => "인지_수준별_표현",
            GuideBlock::PhysicalLevels => "신체_능력별_표현",
            GuideBlock::SocialLevels => "사회성_표현",
            GuideBlock::ProgramBehaviors => "프로그램_특성별_행동",
            GuideBlock::TimeFlow => "시간_흐름_표현",
        }
    }

    /// Max expressions taken per category / level / phrase list.
    pub fn cap(self) -> usize {
        match self {
            GuideBlock::PositiveEmotions
            | GuideBlock::NeutralEmotions
            | GuideBlock::ReducedEmotions
            | GuideBlock::TimeFlow => 4,
            GuideBlock::CognitiveLevels
            | GuideBlock::PhysicalLevels
            | GuideBlock::SocialLevels
            | GuideBlock::ProgramBehaviors => 3,
        }
    }

    pub fn fallback(self) -> &'static str {
        match self {
            GuideBlock::PositiveEmotions => FALLBACK_POSITIVE,
            GuideBlock::NeutralEmotions => FALLBACK_NEUTRAL,
            GuideBlock::ReducedEmotions => FALLBACK_REDUCED,
            GuideBlock::CognitiveLevels => FALLBACK_COGNITIVE,
            GuideBlock::PhysicalLevels => FALLBACK_PHYSICAL,
            GuideBlock::SocialLevels => FALLBACK_SOCIAL,
            GuideBlock::ProgramBehaviors => FALLBACK_BEHAVIORS,
            GuideBlock::TimeFlow => FALLBACK_TIME_FLOW,
        }
    }
}

/// `- <category>: "<a>", "<b>"` per non-empty category.
pub fn format_flat(categories: &[Category], cap: usize) -> String {
    categories
        .iter()
        .filter(|c| !c.expressions.is_empty())
        .map(|c| format!("- {}: {}", c.label, quoted_list(&c.expressions, cap)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `- <level> (<ratio>%): "<a>", "<b>"` per non-empty level. The percentage is
/// truncated, and the parenthetical is omitted for a missing or zero ratio.
pub fn format_leveled(levels: &[Level], cap: usize) -> String {
    levels
        .iter()
        .filter(|l| !l.expressions.is_empty())
        .map(|l| {
            let ratio = l
                .ratio
                .filter(|r| *r != 0.0)
                .map(|r| format!(" ({}%)", (r * 100.0) as i64))
                .unwrap_or_default();
            format!("- {}{}: {}", l.label, ratio, quoted_list(&l.expressions, cap))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `- "<phrase>"` per line for the first `cap` phrases, taken as they are.
pub fn format_phrases(phrases: &[String], cap: usize) -> String {
    phrases
        .iter()
        .take(cap)
        .map(|p| format!("- \"{p}\""))
        .collect::<Vec<_>>()
        .join("\n")
}

fn quoted_list(items: &[String], cap: usize) -> String {
    items
        .iter()
        .take(cap)
        .map(|item| format!("\"{item}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders a resolved section with its shape's algorithm.
pub fn render_section(section: &GuideSection, cap: usize) -> String {
    match section {
        GuideSection::Flat(categories) => format_flat(categories, cap),
        GuideSection::Leveled(levels) => format_leveled(levels, cap),
        GuideSection::Phrases(phrases) => format_phrases(phrases, cap),
    }
}

/// Formats one block from the guide, substituting the block's default when the
/// section is missing or renders to nothing.
pub fn format_block(guide: &ExpressionGuide, block: GuideBlock) -> String {
    guide
        .section(block.section_key())
        .map(|section| render_section(section, block.cap()))
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| block.fallback().to_string())
}

/// All eight formatted blocks. The guide is immutable for the session, so this
/// is computed once at startup and shared by every request.
#[derive(Debug, Clone, PartialEq)]
pub struct GuideBlocks {
    pub positive: String,
    pub neutral: String,
    pub reduced: String,
    pub cognitive: String,
    pub physical: String,
    pub social: String,
    pub behaviors: String,
    pub time_flow: String,
}

impl GuideBlocks {
    pub fn from_guide(guide: &ExpressionGuide) -> Self {
        Self {
            positive: format_block(guide, GuideBlock::PositiveEmotions),
            neutral: format_block(guide, GuideBlock::NeutralEmotions),
            reduced: format_block(guide, GuideBlock::ReducedEmotions),
            cognitive: format_block(guide, GuideBlock::CognitiveLevels),
            physical: format_block(guide, GuideBlock::PhysicalLevels),
            social: format_block(guide, GuideBlock::SocialLevels),
            behaviors: format_block(guide, GuideBlock::ProgramBehaviors),
            time_flow: format_block(guide, GuideBlock::TimeFlow),
        }
    }

}

impl Default for GuideBlocks {
    fn default() -> Self {
        Self::from_guide(&ExpressionGuide::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn guide(value: serde_json::Value) -> ExpressionGuide {
        ExpressionGuide::from_value(&value)
    }

    #[test]
    fn test_flat_section_caps_items_per_category() {
        let g = guide(json!({
            "긍정적_감정": {
                "즐거움": ["a", "b", "c", "d", "e"],
                "만족감": ["f"]
            }
        }));
        assert_eq!(
            format_block(&g, GuideBlock::PositiveEmotions),
            "- 즐거움: \"a\", \"b\", \"c\", \"d\"\n- 만족감: \"f\""
        );
    }

    #[test]
    fn test_behavior_section_uses_cap_of_three() {
        let g = guide(json!({"프로그램_특성별_행동": {"음악": ["a", "b", "c", "d"]}}));
        assert_eq!(
            format_block(&g, GuideBlock::ProgramBehaviors),
            "- 음악: \"a\", \"b\", \"c\""
        );
    }

    #[test]
    fn test_flat_section_skips_empty_categories() {
        let g = guide(json!({"중립적_감정": {"집중": [], "관찰": ["지켜보시며"]}}));
        assert_eq!(
            format_block(&g, GuideBlock::NeutralEmotions),
            "- 관찰: \"지켜보시며\""
        );
    }

    #[test]
    fn test_all_empty_categories_yield_default() {
        let g = guide(json!({"긍정적_감정": {"즐거움": [], "만족감": []}}));
        assert_eq!(format_block(&g, GuideBlock::PositiveEmotions), FALLBACK_POSITIVE);

        let g = guide(json!({"인지_수준별_표현": {"높음": {"비율": 0.3, "표현": []}}}));
        assert_eq!(format_block(&g, GuideBlock::CognitiveLevels), FALLBACK_COGNITIVE);
    }

    #[test]
    fn test_missing_sections_fall_back_individually() {
        let g = guide(json!({"시간_흐름_표현": ["끝까지 집중하심"]}));
        let blocks = GuideBlocks::from_guide(&g);
        assert_eq!(blocks.time_flow, "- \"끝까지 집중하심\"");
        assert_eq!(blocks.positive, FALLBACK_POSITIVE);
        assert_eq!(blocks.behaviors, FALLBACK_BEHAVIORS);
    }

    #[test]
    fn test_leveled_section_renders_ratio_percent() {
        let g = guide(json!({
            "신체_능력별_표현": {
                "활동적": {"비율": 0.4, "표현": ["a", "b", "c", "d"]},
                "제한적": {"표현": ["e"]}
            }
        }));
        assert_eq!(
            format_block(&g, GuideBlock::PhysicalLevels),
            "- 활동적 (40%): \"a\", \"b\", \"c\"\n- 제한적: \"e\""
        );
    }

    #[test]
    fn test_leveled_ratio_is_truncated_and_zero_omitted() {
        let level = |label: &str, ratio: f64, expr: &str| Level {
            label: label.to_string(),
            ratio: Some(ratio),
            expressions: vec![expr.to_string()],
        };
        let levels = vec![level("높음", 0.29, "x"), level("낮음", 0.0, "y")];
        assert_eq!(
            format_leveled(&levels, 3),
            "- 높음 (28%): \"x\"\n- 낮음: \"y\""
        );
    }

    #[test]
    fn test_time_flow_takes_first_four() {
        let g = guide(json!({"시간_흐름_표현": ["1", "2", "", "3", "4", "5"]}));
        assert_eq!(
            format_block(&g, GuideBlock::TimeFlow),
            "- \"1\"\n- \"2\"\n- \"\"\n- \"3\""
        );
    }

    #[test]
    fn test_empty_guide_is_all_defaults() {
        let blocks = GuideBlocks::default();
        assert_eq!(blocks.positive, FALLBACK_POSITIVE);
        assert_eq!(blocks.neutral, FALLBACK_NEUTRAL);
        assert_eq!(blocks.reduced, FALLBACK_REDUCED);
        assert_eq!(blocks.cognitive, FALLBACK_COGNITIVE);
        assert_eq!(blocks.physical, FALLBACK_PHYSICAL);
        assert_eq!(blocks.social, FALLBACK_SOCIAL);
        assert_eq!(blocks.behaviors, FALLBACK_BEHAVIORS);
        assert_eq!(blocks.time_flow, FALLBACK_TIME_FLOW);
    }
}
