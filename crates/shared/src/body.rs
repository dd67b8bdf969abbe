//! Narrative body types for Roster
//!
//! A body is the prose that follows the metadata header, kept as an ordered
//! list of sections. Section text is opaque: code fences, shell snippets and
//! script references are never interpreted.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static INLINE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]\n]+)\]\(([^)\s]+)(?:\s+[^)]*)?\)").expect("valid link pattern")
});

/// Well-known section headings found in agent documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Preamble,
    Purpose,
    SkillIntegration,
    Workflows,
    Examples,
    IntegrationExamples,
    SuccessMetrics,
    RelatedAgents,
    References,
    Other,
}

impl SectionKind {
    /// Classify a heading title
    pub fn classify(title: &str) -> Self {
        let normalized = title
            .trim()
            .trim_end_matches(':')
            .to_ascii_lowercase()
            .replace(['-', '_'], " ");

        match normalized.as_str() {
            "" => SectionKind::Preamble,
            "purpose" | "overview" => SectionKind::Purpose,
            "skill integration" => SectionKind::SkillIntegration,
            "workflows" | "workflow" => SectionKind::Workflows,
            "examples" | "example" => SectionKind::Examples,
            "integration examples" => SectionKind::IntegrationExamples,
            "success metrics" => SectionKind::SuccessMetrics,
            "related agents" => SectionKind::RelatedAgents,
            "references" => SectionKind::References,
            _ => SectionKind::Other,
        }
    }
}

/// One heading-delimited part of a body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Heading depth (1-6), 0 for text preceding the first heading
    pub level: u8,

    /// Heading text without markers
    pub title: String,

    /// Raw heading line including its line ending (empty for the preamble)
    pub heading: String,

    /// Raw text up to the next heading
    pub content: String,
}

impl Section {
    /// Text preceding the first heading
    pub fn preamble(content: impl Into<String>) -> Self {
        Self {
            level: 0,
            title: String::new(),
            heading: String::new(),
            content: content.into(),
        }
    }

    /// Classify this section by its title
    pub fn kind(&self) -> SectionKind {
        if self.level == 0 {
            SectionKind::Preamble
        } else {
            SectionKind::classify(&self.title)
        }
    }

    /// Inline Markdown links in this section, skipping fenced code
    pub fn links(&self) -> Vec<Link> {
        let mut links = Vec::new();
        let mut in_fence = false;

        for line in self.content.lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
                in_fence = !in_fence;
                continue;
            }
            if in_fence {
                continue;
            }

            for cap in INLINE_LINK.captures_iter(line) {
                links.push(Link {
                    text: cap[1].to_string(),
                    target: cap[2].to_string(),
                });
            }
        }

        links
    }

    /// Byte length of heading and content
    pub fn len(&self) -> usize {
        self.heading.len() + self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An inline Markdown link, kept as opaque strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub target: String,
}

impl Link {
    /// Whether the target points outside the repository (http, mailto, ...)
    pub fn is_external(&self) -> bool {
        self.target.contains("://") || self.target.starts_with("mailto:")
    }
}

/// Ordered sections of a document body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    sections: Vec<Section>,
}

impl Body {
    /// Build a body from sections in source order
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// All sections in source order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Heading titles in source order (the preamble is skipped)
    pub fn titles(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter(|s| s.level > 0)
            .map(|s| s.title.as_str())
            .collect()
    }

    /// First section whose title matches, ignoring ASCII case
    pub fn get(&self, title: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| s.level > 0 && s.title.eq_ignore_ascii_case(title))
    }

    /// First section of the given kind
    pub fn find_kind(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind() == kind)
    }

    /// A section plus every following section nested deeper than it
    pub fn subtree(&self, title: &str) -> Option<&[Section]> {
        let start = self
            .sections
            .iter()
            .position(|s| s.level > 0 && s.title.eq_ignore_ascii_case(title))?;
        let level = self.sections[start].level;
        let end = self.sections[start + 1..]
            .iter()
            .position(|s| s.level > 0 && s.level <= level)
            .map(|offset| start + 1 + offset)
            .unwrap_or(self.sections.len());
        Some(&self.sections[start..end])
    }

    /// Inline links across all sections
    pub fn links(&self) -> Vec<Link> {
        self.sections.iter().flat_map(|s| s.links()).collect()
    }

    /// Reassemble the original body text
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity(self.sections.iter().map(Section::len).sum());
        for section in &self.sections {
            text.push_str(&section.heading);
            text.push_str(&section.content);
        }
        text
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
