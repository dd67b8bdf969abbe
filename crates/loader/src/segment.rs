//! Segment - Split a document body into heading-delimited sections
//!
//! Splitting is lossless: concatenating every section's heading and content
//! in order reproduces the input exactly.

use shared::{Body, Section};

/// An open fenced code block: fence character and run length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    marker: char,
    len: usize,
}

/// Split `body` into sections at ATX headings outside fenced code.
pub fn segment(body: &str) -> Body {
    let mut sections = Vec::new();
    let mut current = Section::preamble(String::new());
    let mut fence: Option<Fence> = None;

    for line in body.split_inclusive('\n') {
        if let Some(open) = fence {
            if closes_fence(line, open) {
                fence = None;
            }
            current.content.push_str(line);
            continue;
        }

        if let Some(opened) = opens_fence(line) {
            fence = Some(opened);
            current.content.push_str(line);
            continue;
        }

        match heading(line) {
            Some((level, title)) => {
                if !current.is_empty() {
                    sections.push(current);
                }
                current = Section {
                    level,
                    title,
                    heading: line.to_string(),
                    content: String::new(),
                };
            }
            None => current.content.push_str(line),
        }
    }

    if !current.is_empty() {
        sections.push(current);
    }

    Body::new(sections)
}

/// Strip up to three leading spaces; `None` when the line is indented further
fn strip_indent(line: &str) -> Option<&str> {
    let spaces = line.bytes().take_while(|b| *b == b' ').count();
    (spaces <= 3).then(|| &line[spaces..])
}

fn opens_fence(line: &str) -> Option<Fence> {
    let rest = strip_indent(line)?;
    let marker = rest.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = rest.chars().take_while(|c| *c == marker).count();
    if len < 3 {
        return None;
    }
    // Backtick fences may not carry backticks in their info string
    if marker == '`' && rest[len..].contains('`') {
        return None;
    }
    Some(Fence { marker, len })
}

fn closes_fence(line: &str, open: Fence) -> bool {
    let Some(rest) = strip_indent(line) else {
        return false;
    };
    let len = rest.chars().take_while(|c| *c == open.marker).count();
    len >= open.len && rest[len..].trim().is_empty()
}

/// Parse an ATX heading into its level and title
fn heading(line: &str) -> Option<(u8, String)> {
    let rest = strip_indent(line)?;
    let level = rest.bytes().take_while(|b| *b == b'#').count();
    if !(1..=6).contains(&level) {
        return None;
    }

    let after = &rest[level..];
    let text = after.trim_end_matches(['\n', '\r']);
    if !text.is_empty() && !text.starts_with([' ', '\t']) {
        return None;
    }

    let mut title = text.trim();
    // Optional closing sequence: `## Title ##`
    let without_closing = title.trim_end_matches('#');
    if without_closing.is_empty() || without_closing.ends_with([' ', '\t']) {
        title = without_closing.trim_end();
    }

    Some((level as u8, title.to_string()))
}
