// Prompt text for reaction generation.
// Placeholders are `{name}` tokens filled in a single pass by the assembler,
// so user text containing braces is never re-expanded.

/// The instruction document shared by both program variants.
/// Placeholders: {program_context}, {goal}, {count}, {positive_count},
/// {neutral_count}, {reduced_count}, the eight guide blocks, {concrete_heading},
/// {concrete_intro}, {concrete_examples}, {positive_header}, {neutral_header},
/// {reduced_header}, {rules}
pub const REACTION_PROMPT_TEMPLATE: &str = r#"당신은 요양원 프로그램 운영 기록 작성 전문가입니다.

{program_context}

# 생성 목표
{goal}

# 감정 분포 (고정)
반응은 총 {count}개 생성하되, 아래 개수를 반드시 정확히 지키세요.
- 긍정: {positive_count}개
- 중립: {neutral_count}개
- 소극/피로: {reduced_count}개

# 감정 표현 가이드

**긍정적 감정:**
{positive_block}

**중립적 감정:**
{neutral_block}

**소극적/피로 표현:**
{reduced_block}

# 개인별 특성 반영 패턴
어르신의 다양한 특성을 자연스럽게 반영하세요:

**인지 수준별:**
{cognitive_block}

**신체 능력별:**
{physical_block}

**사회성별:**
{social_block}

# 프로그램 특성별 구체적 행동 표현
{behavior_block}

# 시간 흐름 및 변화 표현
프로그램 진행에 따른 자연스러운 변화:
{time_flow_block}

# {concrete_heading}
{concrete_intro}
{concrete_examples}

# 출력 형식 (필수)
아래 3개 섹션으로 나누어 출력하세요. 각 섹션에는 해당 개수만큼만 숫자 리스트로 작성하세요.

{positive_header}
1. ...
2. ...
(총 {positive_count}개)

{neutral_header}
1. ...
2. ...
(총 {neutral_count}개)

{reduced_header}
1. ...
2. ...
(총 {reduced_count}개)

# 작성 규칙
{rules}"#;

// ── Variant text ────────────────────────────────────────────────────────────

pub const EXISTING_CONTEXT_TEMPLATE: &str = r#"# 프로그램 정보
프로그램명: "{program_name}"

# 실제 참여자 반응 예시
{examples}"#;

pub const EXISTING_GOAL_TEMPLATE: &str =
    r#"위 예시들의 스타일을 참고하여, "{program_name}" 프로그램에 참여한 어르신들의 반응 및 특이사항을 생성하세요."#;

pub const NEW_CONTEXT_TEMPLATE: &str = r#"# 신규 프로그램 정보
프로그램명: "{title}"

프로그램 설명:
{description}"#;

pub const NEW_GOAL: &str =
    "위 프로그램의 특성을 깊이 이해하고, 어르신들의 현실적이고 다양한 반응을 생성하세요.";

pub const EXISTING_CONCRETE_HEADING: &str = "구체적 행동 표현 원칙";
pub const EXISTING_CONCRETE_INTRO: &str = "추상적 표현보다 관찰 가능한 구체적 행동으로:";
pub const EXISTING_CONCRETE_EXAMPLES: &[&str] = &[
    r#"- ❌ "좋아하심" → ✅ "박수를 치시며 즐거워하심""#,
    r#"- ❌ "열심히 함" → ✅ "끝까지 집중하여 완성하심""#,
    r#"- ❌ "관심 있음" → ✅ "질문하시며 적극적으로 참여하심""#,
];

pub const NEW_CONCRETE_HEADING: &str = "실제 관찰 느낌의 표현";
pub const NEW_CONCRETE_INTRO: &str = "추상적 표현보다 구체적 관찰:";
pub const NEW_CONCRETE_EXAMPLES: &[&str] = &[
    r#"- ❌ "좋아하심" → ✅ "박수 치시며 '좋다'고 말씀하심""#,
    r#"- ❌ "열심히 함" → ✅ "땀 흘리시며 끝까지 집중하심""#,
    r#"- ❌ "즐거워함" → ✅ "환하게 웃으시며 다른 어르신과 이야기 나누심""#,
    r#"- ❌ "어려워함" → ✅ "고개 갸우뚱하시며 요양쌤에게 도움 요청하심""#,
];

// ── Writing rules ───────────────────────────────────────────────────────────
// Rules are numbered in order: FORMAL_REGISTER_RULE, the min-length rule,
// the variant's own rules, then the closing rules.

pub const FORMAL_REGISTER_RULE: &str = r#"존댓말 "~하심" 형태로 작성"#;

/// Placeholder: {min_chars}
pub const EXISTING_MIN_LENGTH_RULE: &str =
    "**각 반응은 {min_chars}자 이상 작성 (구체적 상황, 세부 동작, 표정 변화 등 포함)**";
/// Placeholder: {min_chars}
pub const NEW_MIN_LENGTH_RULE: &str =
    "**각 반응은 {min_chars}자 이상 작성 (구체적 상황, 세부 동작, 표정 변화, 말씀 등 포함)**";

pub const EXISTING_RULES: &[&str] = &[
    "예시와 유사한 자연스러운 톤 유지하되, 더 풍부하고 생동감 있게",
    "다양한 특성이 골고루 분포되도록 (인지 수준, 신체 능력, 사회성 모두 활용)",
    "중복되는 표현 최소화 - 각 반응마다 다른 동작, 다른 감정 표현 사용",
    r#"**구체성 강화**: "즐거워하심" → "박수 치시며 '재미있다'고 말씀하시며 웃으심""#,
    "**세부 묘사 추가**: 어르신의 말, 표정, 몸짓, 다른 사람과의 상호작용 포함",
];

pub const NEW_RULES: &[&str] = &[
    "자연스럽고 실제 관찰한 듯한 표현 - 생동감과 현장감 최대화",
    "다양한 인지수준, 신체능력, 사회성이 골고루 분포",
    "프로그램 특성이 반영된 구체적 행동 (도구 사용, 재료 다루기, 신체 움직임 등)",
    "중복 표현 최소화 - 각 반응이 독특하고 차별화되게",
    "**풍부한 디테일**: 어르신의 구체적 말씀, 표정 변화, 손동작, 다른 어르신과의 대화/상호작용",
    r#"**감정 표현 다양화**: 같은 긍정이라도 "기쁨/흥미/만족/자랑스러움" 등 세분화"#,
];

/// Placeholder: {headers}
pub const HEADERS_REQUIRED_RULE: &str = "섹션 제목({headers})은 반드시 포함";
pub const RECONCILE_COUNTS_RULE: &str = "섹션별 개수 불일치 시, 스스로 수정해서 맞춘 뒤 최종 출력";
pub const NO_PREAMBLE_RULE: &str = "다른 설명/서문 금지";

// ── Built-in guide blocks ───────────────────────────────────────────────────
// Used per block whenever the guide lacks the section or it formats to nothing.

pub const FALLBACK_POSITIVE: &str = r#"- 즐거움: "즐거워하심", "웃으시며", "기쁜 표정으로", "밝은 미소 지으심", "환하게 웃으심"
- 만족감: "만족스러워하심", "뿌듯해하심", "흡족한 표정으로", "성취감을 느끼심"
- 흥미/호기심: "흥미롭게 보심", "호기심 가지심", "신기해하심", "관심 보이심"
- 열정: "적극적으로", "열심히", "집중하여", "몰입하심""#;

pub const FALLBACK_NEUTRAL: &str = r#"- 집중: "조용히 집중하심", "묵묵히 임하심", "차분하게 참여하심", "꾸준히 하심"
- 관찰: "지켜보시며", "주의 깊게 살피심", "관심 있게 보심"
- 적응: "점차 익숙해지심", "천천히 따라하심", "자신의 속도로 하심""#;

pub const FALLBACK_REDUCED: &str = r#"- 조심스러움: "망설이시다가", "처음엔 주저하셨으나", "소극적이시다가"
- 피로: "다소 피곤해하심", "중간에 휴식 취하심", "짧게 참여하심"
- 제한적 참여: "일부만 참여하심", "관람만 하심", "보조 받아 참여하심""#;

pub const FALLBACK_COGNITIVE: &str = r#"- 높음 (30%): "정확히 이해하시고 능숙하게 하심", "스스로 방법을 찾아 진행하심", "이전 활동을 기억하시며 참여하심"
- 보통 (50%): "설명 듣고 잘 따라하심", "도움받아 완성하심", "요양쌤과 함께 진행하심"
- 낮음 (20%): "간단한 활동만 참여하심", "지켜보시며 즐거워하심", "부분적으로 참여하심""#;

pub const FALLBACK_PHYSICAL: &str = r#"- 활동적 (40%): "적극적으로 움직이심", "빠르게 완성하심", "활발히 참여하심"
- 보통 (40%): "천천히 조심스럽게 하심", "자신의 페이스로 진행하심", "안정적으로 참여하심"
- 제한적 (20%): "손동작만 참여하심", "앉아서 할 수 있는 부분만 하심", "보조 도구 사용하여 참여하심""#;

pub const FALLBACK_SOCIAL: &str = r#"- 사교적 (40%): "다른 어르신들과 즐겁게 대화하시며 참여하심", "옆 어르신을 도우시며 함께하심"
- 보통 (40%): "가끔 옆 어르신과 이야기 나누심", "조용히 개별적으로 참여하심"
- 내향적 (20%): "혼자 조용히 집중하심", "묵묵히 자신의 활동에만 몰두하심""#;

pub const FALLBACK_BEHAVIORS: &str = r#"- 신체_활동: "스트레칭하시며", "박수 치심", "율동 따라하심", "걸으시며"
- 인지_활동: "문제 풀어보시며", "기억하시며", "답 맞히시고 기뻐하심", "생각하는 표정"
- 미술_만들기: "색칠하시며", "오리시며", "붙이시며", "완성작 보시고 만족하심"
- 음악: "노래 부르심", "박자 맞추심", "따라 부르심", "손뼉 치시며"
- 게임: "승부욕 보이심", "이기시고 즐거워하심", "열심히 도전하심""#;

pub const FALLBACK_TIME_FLOW: &str = r#"- "초반엔 망설이시다가 점차 자신감 있게 참여하심"
- "처음엔 어려워하셨으나 익숙해지시며 즐거워하심"
- "중반부터 피곤해하시며 속도 늦추심"
- "끝까지 집중력 유지하며 완성하심"
- "마지막에 다소 지치셨으나 만족스러워하심""#;
