//! Frontmatter - Split a document into its metadata header and body

use shared::DefinitionError;

const OPEN_FENCE: &str = "---";
const CLOSE_FENCES: [&str; 2] = ["---", "..."];

/// A document split at its header delimiters; both parts borrow the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Document<'a> {
    /// YAML text between the delimiter lines
    pub header: &'a str,

    /// Everything after the closing delimiter line, byte-for-byte
    pub body: &'a str,
}

/// Split `text` into header and body.
///
/// A UTF-8 byte order mark and blank lines before the opening `---` are
/// skipped. The header closes at the next line reading `---` or `...`.
pub fn split(text: &str) -> Result<Document<'_>, DefinitionError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut offset = 0;
    let mut header_start = None;
    let mut header_line = 0;

    for (index, line) in text.split_inclusive('\n').enumerate() {
        let line_no = index + 1;
        let line_end = offset + line.len();
        let trimmed = line.trim_end();

        match header_start {
            None => {
                if trimmed.trim_start().is_empty() {
                    offset = line_end;
                    continue;
                }
                if trimmed != OPEN_FENCE {
                    return Err(DefinitionError::MissingHeader);
                }
                header_start = Some(line_end);
                header_line = line_no;
            }
            Some(start) => {
                if CLOSE_FENCES.contains(&trimmed) {
                    return Ok(Document {
                        header: &text[start..offset],
                        body: &text[line_end..],
                    });
                }
            }
        }

        offset = line_end;
    }

    match header_start {
        None => Err(DefinitionError::MissingHeader),
        Some(_) => Err(DefinitionError::UnterminatedHeader { line: header_line }),
    }
}
