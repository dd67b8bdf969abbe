//! Document - Parse a complete agent document
//!
//! Combines header splitting, metadata decoding and body segmentation into
//! one [`AgentDefinition`].

use crate::frontmatter;
use crate::metadata::{self, dedup_in_order};
use crate::segment::segment;
use regex::Regex;
use shared::{AgentDefinition, Body, DefinitionError, ParseFailure, ParseOptions, SectionKind};
use std::path::Path;
use std::sync::LazyLock;

/// Identifiers accepted when harvesting related agents from prose
static AGENT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("valid name pattern"));

/// A parsed definition plus non-fatal findings
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub definition: AgentDefinition,
    pub warnings: Vec<DefinitionError>,
}

/// Parse document text into an [`AgentDefinition`].
pub fn parse_document(text: &str, options: &ParseOptions) -> Result<ParsedDocument, ParseFailure> {
    let document = frontmatter::split(text)?;
    let decoded = metadata::decode(document.header, options)?;
    let body = segment(document.body);
    let metadata = decoded.metadata;

    let mut related_agents = metadata.related_agents;
    related_agents.extend(related_agents_in_body(&body));
    let related_agents = dedup_in_order(related_agents);

    let definition = AgentDefinition {
        name: metadata.name,
        description: metadata.description,
        domain: metadata.domain,
        subdomain: metadata.subdomain,
        skills: metadata.skills,
        tools: metadata.tools,
        model: metadata.model,
        examples: metadata.examples,
        related_agents,
        extra: metadata.extra,
        body,
        source: None,
    };

    Ok(ParsedDocument {
        definition,
        warnings: decoded.warnings,
    })
}

/// Read and parse one document, recording its path as the source.
pub fn load_document(path: &Path, options: &ParseOptions) -> Result<ParsedDocument, ParseFailure> {
    let text = std::fs::read_to_string(path).map_err(|e| DefinitionError::Unreadable {
        message: e.to_string(),
    })?;

    let mut parsed = parse_document(&text, options)?;
    parsed.definition = parsed.definition.with_source(path);
    tracing::debug!(
        path = %path.display(),
        name = %parsed.definition.name,
        sections = parsed.definition.body.len(),
        "parsed agent document"
    );
    Ok(parsed)
}

/// Agent names listed under a "Related Agents" heading.
///
/// Each list item contributes one name: the stem of a linked `.md` file,
/// else the first code span or bold span, else a leading hyphenated
/// identifier such as `release-manager - App Store submissions`.
pub fn related_agents_in_body(body: &Body) -> Vec<String> {
    let Some(section) = body.find_kind(SectionKind::RelatedAgents) else {
        return Vec::new();
    };
    let sections = body.subtree(&section.title).unwrap_or_default();

    sections
        .iter()
        .flat_map(|s| s.content.lines())
        .filter_map(list_item)
        .filter_map(agent_name)
        .collect()
}

fn list_item(line: &str) -> Option<&str> {
    let line = line.trim_start();
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Some(rest.trim());
    }
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(". ") {
            return Some(rest.trim());
        }
    }
    None
}

fn agent_name(item: &str) -> Option<String> {
    let candidate = linked_stem(item)
        .or_else(|| delimited(item, "`", "`"))
        .or_else(|| delimited(item, "**", "**"))
        .or_else(|| bare_name(item))?;

    AGENT_NAME
        .is_match(candidate)
        .then(|| candidate.to_string())
}

/// Leading hyphenated identifier followed by a dash separator or nothing
fn bare_name(item: &str) -> Option<&str> {
    let end = [" - ", " – "]
        .iter()
        .filter_map(|sep| item.find(sep))
        .min()
        .unwrap_or(item.len());
    let token = item[..end].trim();
    (token.contains('-') && !token.contains(':')).then_some(token)
}

fn linked_stem(item: &str) -> Option<&str> {
    let start = item.find("](")? + 2;
    let end = start + item[start..].find(')')?;
    let target = item[start..end].split('#').next()?;
    if target.contains("://") {
        return None;
    }
    let file = target.rsplit('/').next()?;
    file.strip_suffix(".md")
}

fn delimited<'a>(item: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = item.find(open)? + open.len();
    let end = start + item[start..].find(close)?;
    Some(item[start..end].trim())
}
