//! Response decoder: recovers the three ordered reaction buckets from free text.
//!
//! Header detection is a small line classifier: literal markers are tried for
//! every section first, then a bracketed line naming a section keyword. Content
//! before the first header is dropped. Decoding never fails; if the structural
//! pass panics the whole raw text lands in the positive bucket.

use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Positive,
    Neutral,
    Reduced,
}

impl Section {
    pub const ORDER: [Section; 3] = [Section::Positive, Section::Neutral, Section::Reduced];
}

/// How one section's header is recognised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionPattern {
    /// Canonical header, used in prompts and exports (e.g. `[긍정]`).
    pub header: String,
    /// Extra literal markers accepted as this header.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Word that identifies the section on a `[`-prefixed line when no literal
    /// marker matched.
    pub keyword: String,
}

impl SectionPattern {
    fn new(header: &str, aliases: &[&str], keyword: &str) -> Self {
        Self {
            header: header.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            keyword: keyword.to_string(),
        }
    }

    fn matches_literal(&self, line: &str) -> bool {
        line.contains(self.header.as_str()) || self.aliases.iter().any(|a| line.contains(a.as_str()))
    }
}

/// Header markers for all three sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMarkers {
    pub positive: SectionPattern,
    pub neutral: SectionPattern,
    pub reduced: SectionPattern,
}

impl Default for SectionMarkers {
    fn default() -> Self {
        Self {
            positive: SectionPattern::new("[긍정]", &["[긍정 반응]"], "긍정"),
            neutral: SectionPattern::new("[중립]", &["[중립 반응]"], "중립"),
            reduced: SectionPattern::new("[소극/피로]", &["[소극·피로]", "[소극 / 피로]"], "소극"),
        }
    }
}

impl SectionMarkers {
    pub fn pattern(&self, section: Section) -> &SectionPattern {
        match section {
            Section::Positive => &self.positive,
            Section::Neutral => &self.neutral,
            Section::Reduced => &self.reduced,
        }
    }

    pub fn header(&self, section: Section) -> &str {
        &self.pattern(section).header
    }

    /// Classifies a trimmed line as a section header, or `None` for content.
    pub fn classify(&self, line: &str) -> Option<Section> {
        if let Some(section) = Section::ORDER
            .into_iter()
            .find(|s| self.pattern(*s).matches_literal(line))
        {
            return Some(section);
        }

        if !line.starts_with('[') {
            return None;
        }
        Section::ORDER
            .into_iter()
            .find(|s| line.contains(self.pattern(*s).keyword.as_str()))
    }
}

/// The three decoded buckets; each is newline-joined lines, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedReactions {
    pub positive: String,
    pub neutral: String,
    pub reduced: String,
}

impl DecodedReactions {
    pub fn bucket(&self, section: Section) -> &str {
        match section {
            Section::Positive => &self.positive,
            Section::Neutral => &self.neutral,
            Section::Reduced => &self.reduced,
        }
    }

    fn bucket_mut(&mut self, section: Section) -> &mut String {
        match section {
            Section::Positive => &mut self.positive,
            Section::Neutral => &mut self.neutral,
            Section::Reduced => &mut self.reduced,
        }
    }

    pub fn line_count(&self, section: Section) -> usize {
        self.bucket(section).lines().count()
    }

    pub fn is_empty(&self) -> bool {
        Section::ORDER
            .into_iter()
            .all(|s| self.bucket(s).trim().is_empty())
    }

    /// Concatenates the non-empty buckets under their headers, in section order,
    /// separated by a blank line.
    pub fn export(&self, markers: &SectionMarkers) -> String {
        Section::ORDER
            .into_iter()
            .filter_map(|section| {
                let body = self.bucket(section).trim();
                (!body.is_empty()).then(|| format!("{}\n{}", markers.header(section), body))
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Decodes raw generator output with the given markers.
pub fn decode(raw: &str, markers: &SectionMarkers) -> DecodedReactions {
    decode_with(raw, |line| markers.classify(line))
}

/// Decodes with an arbitrary header classifier, falling back to the whole raw
/// text in the positive bucket if classification panics.
pub(crate) fn decode_with<F>(raw: &str, classify: F) -> DecodedReactions
where
    F: Fn(&str) -> Option<Section>,
{
    match panic::catch_unwind(AssertUnwindSafe(|| split_sections(raw, &classify))) {
        Ok(decoded) => decoded,
        Err(_) => {
            warn!("Section parsing failed, returning raw output in the positive bucket");
            DecodedReactions {
                positive: raw.trim().to_string(),
                ..Default::default()
            }
        }
    }
}

fn split_sections<F>(raw: &str, classify: &F) -> DecodedReactions
where
    F: Fn(&str) -> Option<Section>,
{
    let mut decoded = DecodedReactions::default();
    let mut current: Option<Section> = None;

    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(section) = classify(line) {
            current = Some(section);
            continue;
        }
        if let Some(section) = current {
            let bucket = decoded.bucket_mut(section);
            bucket.push_str(line);
            bucket.push('\n');
        }
    }

    for section in Section::ORDER {
        let bucket = decoded.bucket_mut(section);
        let trimmed_len = bucket.trim_end().len();
        bucket.truncate(trimmed_len);
    }
    decoded
}
