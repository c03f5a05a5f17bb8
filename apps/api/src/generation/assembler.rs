//! Prompt assembler: one parameterised path for both program variants.
//!
//! Pure string composition: identical inputs always produce byte-identical text.

use crate::generation::decoder::{Section, SectionMarkers};
use crate::generation::distribution::EmotionDistribution;
use crate::generation::guide_format::GuideBlocks;
use crate::generation::prompts::{
    EXISTING_CONCRETE_EXAMPLES, EXISTING_CONCRETE_HEADING, EXISTING_CONCRETE_INTRO,
    EXISTING_CONTEXT_TEMPLATE, EXISTING_GOAL_TEMPLATE, EXISTING_MIN_LENGTH_RULE, EXISTING_RULES,
    FORMAL_REGISTER_RULE, HEADERS_REQUIRED_RULE, NEW_CONCRETE_EXAMPLES, NEW_CONCRETE_HEADING,
    NEW_CONCRETE_INTRO, NEW_CONTEXT_TEMPLATE, NEW_GOAL, NEW_MIN_LENGTH_RULE, NEW_RULES,
    NO_PREAMBLE_RULE, RECONCILE_COUNTS_RULE, REACTION_PROMPT_TEMPLATE,
};

/// Max anchor examples embedded in an existing-program prompt.
pub const PROMPT_EXAMPLE_CAP: usize = 20;
pub const EXISTING_MIN_CHARS: usize = 25;
pub const NEW_MIN_CHARS: usize = 30;

/// What the generator is writing for.
#[derive(Debug, Clone, Copy)]
pub enum PromptVariant<'a> {
    /// A known program, imitated through its anchor examples.
    Existing {
        program_name: &'a str,
        examples: &'a [String],
    },
    /// A program with no history: title plus free-text description.
    New {
        title: &'a str,
        description: &'a str,
    },
}

/// Everything that differs between the two variants.
struct VariantConfig {
    program_context: String,
    goal: String,
    min_chars: usize,
    min_length_rule: &'static str,
    concrete_heading: &'static str,
    concrete_intro: &'static str,
    concrete_examples: &'static [&'static str],
    rules: &'static [&'static str],
}

impl PromptVariant<'_> {
    fn config(&self) -> VariantConfig {
        match *self {
            PromptVariant::Existing {
                program_name,
                examples,
            } => VariantConfig {
                program_context: fill_template(
                    EXISTING_CONTEXT_TEMPLATE,
                    &[
                        ("program_name", program_name),
                        ("examples", numbered_examples(examples).as_str()),
                    ],
                ),
                goal: fill_template(EXISTING_GOAL_TEMPLATE, &[("program_name", program_name)]),
                min_chars: EXISTING_MIN_CHARS,
                min_length_rule: EXISTING_MIN_LENGTH_RULE,
                concrete_heading: EXISTING_CONCRETE_HEADING,
                concrete_intro: EXISTING_CONCRETE_INTRO,
                concrete_examples: EXISTING_CONCRETE_EXAMPLES,
                rules: EXISTING_RULES,
            },
            PromptVariant::New { title, description } => VariantConfig {
                program_context: fill_template(
                    NEW_CONTEXT_TEMPLATE,
                    &[("title", title), ("description", description)],
                ),
                goal: NEW_GOAL.to_string(),
                min_chars: NEW_MIN_CHARS,
                min_length_rule: NEW_MIN_LENGTH_RULE,
                concrete_heading: NEW_CONCRETE_HEADING,
                concrete_intro: NEW_CONCRETE_INTRO,
                concrete_examples: NEW_CONCRETE_EXAMPLES,
                rules: NEW_RULES,
            },
        }
    }
}

/// Inputs to [`assemble_prompt`].
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    pub variant: PromptVariant<'a>,
    pub distribution: EmotionDistribution,
    pub blocks: &'a GuideBlocks,
    pub markers: &'a SectionMarkers,
}

/// Builds the full instruction document for the generator.
pub fn assemble_prompt(input: &PromptInput<'_>) -> String {
    let config = input.variant.config();
    let d = input.distribution;

    let count = d.total().to_string();
    let positive_count = d.positive.to_string();
    let neutral_count = d.neutral.to_string();
    let reduced_count = d.reduced.to_string();
    let concrete_examples = config.concrete_examples.join("\n");
    let rules = writing_rules(&config, input.markers);

    fill_template(
        REACTION_PROMPT_TEMPLATE,
        &[
            ("program_context", config.program_context.as_str()),
            ("goal", config.goal.as_str()),
            ("count", count.as_str()),
            ("positive_count", positive_count.as_str()),
            ("neutral_count", neutral_count.as_str()),
            ("reduced_count", reduced_count.as_str()),
            ("positive_block", input.blocks.positive.as_str()),
            ("neutral_block", input.blocks.neutral.as_str()),
            ("reduced_block", input.blocks.reduced.as_str()),
            ("cognitive_block", input.blocks.cognitive.as_str()),
            ("physical_block", input.blocks.physical.as_str()),
            ("social_block", input.blocks.social.as_str()),
            ("behavior_block", input.blocks.behaviors.as_str()),
            ("time_flow_block", input.blocks.time_flow.as_str()),
            ("concrete_heading", config.concrete_heading),
            ("concrete_intro", config.concrete_intro),
            ("concrete_examples", concrete_examples.as_str()),
            ("positive_header", input.markers.header(Section::Positive)),
            ("neutral_header", input.markers.header(Section::Neutral)),
            ("reduced_header", input.markers.header(Section::Reduced)),
            ("rules", rules.as_str()),
        ],
    )
}

fn numbered_examples(examples: &[String]) -> String {
    examples
        .iter()
        .take(PROMPT_EXAMPLE_CAP)
        .enumerate()
        .map(|(i, example)| format!("{}. {}", i + 1, example))
        .collect::<Vec<_>>()
        .join("\n")
}

fn writing_rules(config: &VariantConfig, markers: &SectionMarkers) -> String {
    let min_chars = config.min_chars.to_string();
    let headers = Section::ORDER
        .into_iter()
        .map(|s| markers.header(s))
        .collect::<Vec<_>>()
        .join(", ");

    let mut rules = vec![
        FORMAL_REGISTER_RULE.to_string(),
        fill_template(config.min_length_rule, &[("min_chars", min_chars.as_str())]),
    ];
    rules.extend(config.rules.iter().map(|r| r.to_string()));
    rules.push(fill_template(HEADERS_REQUIRED_RULE, &[("headers", headers.as_str())]));
    rules.push(RECONCILE_COUNTS_RULE.to_string());
    rules.push(NO_PREAMBLE_RULE.to_string());

    rules
        .iter()
        .enumerate()
        .map(|(i, rule)| format!("{}. {}", i + 1, rule))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replaces `{key}` tokens in one left-to-right pass. Substituted values are
/// never rescanned, and unknown tokens are left as written.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let token = after
            .find('}')
            .map(|close| &after[..close])
            .and_then(|key| values.iter().find(|(k, _)| *k == key));

        match token {
            Some((key, value)) => {
                out.push_str(value);
                rest = &after[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::distribution::{allocate, DEFAULT_POLICY};

    fn examples(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("예시 반응 {i}")).collect()
    }

    fn existing_prompt(examples: &[String]) -> String {
        let blocks = GuideBlocks::default();
        let markers = SectionMarkers::default();
        assemble_prompt(&PromptInput {
            variant: PromptVariant::Existing {
                program_name: "노래교실",
                examples,
            },
            distribution: allocate(10, DEFAULT_POLICY),
            blocks: &blocks,
            markers: &markers,
        })
    }

    fn new_prompt(description: &str) -> String {
        let blocks = GuideBlocks::default();
        let markers = SectionMarkers::default();
        assemble_prompt(&PromptInput {
            variant: PromptVariant::New {
                title: "풍선 배구",
                description,
            },
            distribution: allocate(10, DEFAULT_POLICY),
            blocks: &blocks,
            markers: &markers,
        })
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let ex = examples(5);
        assert_eq!(existing_prompt(&ex), existing_prompt(&ex));
        assert_eq!(new_prompt("풍선을 주고받는 활동"), new_prompt("풍선을 주고받는 활동"));
    }

    #[test]
    fn test_existing_prompt_embeds_counts_and_examples() {
        let prompt = existing_prompt(&examples(3));
        assert!(prompt.contains("프로그램명: \"노래교실\""));
        assert!(prompt.contains("1. 예시 반응 1\n2. 예시 반응 2\n3. 예시 반응 3"));
        assert!(prompt.contains("반응은 총 10개"));
        assert!(prompt.contains("- 긍정: 5개\n- 중립: 3개\n- 소극/피로: 2개"));
        assert!(prompt.contains("(총 5개)"));
        assert!(prompt.contains("(총 3개)"));
        assert!(prompt.contains("(총 2개)"));
        assert!(prompt.contains("25자 이상"));
        assert!(!prompt.contains("프로그램 설명:"));
    }

    #[test]
    fn test_existing_prompt_caps_examples_at_twenty() {
        let prompt = existing_prompt(&examples(30));
        assert!(prompt.contains("20. 예시 반응 20"));
        assert!(!prompt.contains("예시 반응 21"));
    }

    #[test]
    fn test_examples_precede_distribution_and_guide() {
        let prompt = existing_prompt(&examples(2));
        let examples_at = prompt.find("1. 예시 반응 1").unwrap();
        let distribution_at = prompt.find("# 감정 분포").unwrap();
        let guide_at = prompt.find("# 감정 표현 가이드").unwrap();
        assert!(examples_at < distribution_at && distribution_at < guide_at);
    }

    #[test]
    fn test_guide_blocks_appear_in_fixed_order() {
        let mut blocks = GuideBlocks::default();
        blocks.positive = "<B1>".into();
        blocks.neutral = "<B2>".into();
        blocks.reduced = "<B3>".into();
        blocks.cognitive = "<B4>".into();
        blocks.physical = "<B5>".into();
        blocks.social = "<B6>".into();
        blocks.behaviors = "<B7>".into();
        blocks.time_flow = "<B8>".into();
        let markers = SectionMarkers::default();

        let prompt = assemble_prompt(&PromptInput {
            variant: PromptVariant::New {
                title: "t",
                description: "d",
            },
            distribution: allocate(4, DEFAULT_POLICY),
            blocks: &blocks,
            markers: &markers,
        });

        let positions: Vec<usize> = (1..=8)
            .map(|i| prompt.find(&format!("<B{i}>")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_new_prompt_embeds_description_verbatim() {
        let description = "- 풍선 주고받기\n- 목적: 소근육 운동 {count}";
        let prompt = new_prompt(description);
        assert!(prompt.contains("프로그램명: \"풍선 배구\""));
        assert!(prompt.contains(description), "user braces must not be expanded");
        assert!(prompt.contains("30자 이상"));
        assert!(!prompt.contains("실제 참여자 반응 예시"));
    }

    #[test]
    fn test_output_format_headers_in_order() {
        let prompt = new_prompt("설명");
        let format_at = prompt.find("# 출력 형식").unwrap();
        let tail = &prompt[format_at..];
        let p = tail.find("\n[긍정]\n").unwrap();
        let n = tail.find("\n[중립]\n").unwrap();
        let r = tail.find("\n[소극/피로]\n").unwrap();
        assert!(p < n && n < r);
    }

    #[test]
    fn test_rules_are_numbered_and_close_with_reconcile() {
        let prompt = existing_prompt(&examples(1));
        let rules = &prompt[prompt.find("# 작성 규칙").unwrap()..];
        assert!(rules.contains("1. 존댓말"));
        assert!(rules.contains("섹션 제목([긍정], [중립], [소극/피로])은 반드시 포함"));
        assert!(rules.contains("스스로 수정해서 맞춘 뒤 최종 출력"));
        assert!(rules.trim_end().ends_with("10. 다른 설명/서문 금지"));
    }

    #[test]
    fn test_no_unfilled_placeholders() {
        for prompt in [existing_prompt(&examples(2)), new_prompt("설명")] {
            for key in ["{count}", "{rules}", "{goal}", "{positive_block}", "{min_chars}"] {
                assert!(!prompt.contains(key), "{key} left in prompt");
            }
        }
    }

    #[test]
    fn test_fill_template_single_pass() {
        assert_eq!(
            fill_template("{a}-{b}-{missing}-{", &[("a", "{b}"), ("b", "2")]),
            "{b}-2-{missing}-{"
        );
    }
}
