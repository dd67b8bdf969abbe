//! Metadata - Decode the YAML header of an agent document into typed fields
//!
//! Decoding is a pure function of the header text. Every field problem is
//! collected; decoding does not stop at the first bad field.

use regex::Regex;
use serde_yaml::{Mapping, Value};
use shared::{DefinitionError, Example, ParseFailure, ParseOptions, Tool, UnknownFieldPolicy};
use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;
use std::sync::LazyLock;

/// A line that opens a top-level `key:` entry
static TOP_LEVEL_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:"([^"]+)"|'([^']+)'|([A-Za-z0-9_][A-Za-z0-9_.\-]*))[ \t]*:(?:[ \t]|\r?\n|$)"#)
        .expect("valid key pattern")
});

/// Typed header fields of an agent document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub name: String,
    pub description: String,
    pub domain: Option<String>,
    pub subdomain: Option<String>,
    pub skills: Vec<String>,
    pub tools: Vec<Tool>,
    pub model: Option<String>,
    pub examples: Vec<Example>,
    pub related_agents: Vec<String>,
    pub extra: BTreeMap<String, Value>,
}

/// Successfully decoded header plus non-fatal findings
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedHeader {
    pub metadata: Metadata,
    pub warnings: Vec<DefinitionError>,
}

/// Header field names understood by the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Field {
    Name,
    Description,
    Domain,
    Subdomain,
    Skills,
    Tools,
    Model,
    Examples,
    RelatedAgents,
}

impl Field {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "name" => Some(Field::Name),
            "description" => Some(Field::Description),
            "domain" => Some(Field::Domain),
            "subdomain" => Some(Field::Subdomain),
            "skills" | "skill" => Some(Field::Skills),
            "tools" => Some(Field::Tools),
            "model" => Some(Field::Model),
            "examples" => Some(Field::Examples),
            "relatedAgents" | "related_agents" | "related-agents" => Some(Field::RelatedAgents),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Description => "description",
            Field::Domain => "domain",
            Field::Subdomain => "subdomain",
            Field::Skills => "skills",
            Field::Tools => "tools",
            Field::Model => "model",
            Field::Examples => "examples",
            Field::RelatedAgents => "relatedAgents",
        }
    }
}

/// Decode header text into [`Metadata`].
pub fn decode(header: &str, options: &ParseOptions) -> Result<DecodedHeader, ParseFailure> {
    let (header, duplicates) = drop_shadowed_keys(header);
    let mut warnings: Vec<DefinitionError> = duplicates
        .into_iter()
        .map(|key| DefinitionError::DuplicateKey { key })
        .collect();

    let mapping = match parse_mapping(&header) {
        Ok(mapping) => mapping,
        Err(error) => {
            return Err(ParseFailure {
                errors: vec![error],
                warnings,
            })
        }
    };

    let mut errors = Vec::new();
    let mut fields: Vec<(Field, &Value)> = Vec::new();
    let mut seen = HashSet::new();
    let mut extra = BTreeMap::new();

    for (key, value) in &mapping {
        let key = match scalar(key) {
            Some(key) => key,
            None => {
                errors.push(DefinitionError::invalid(
                    format!("{:?}", key),
                    "field names must be plain strings",
                ));
                continue;
            }
        };

        match Field::from_key(&key) {
            Some(field) => {
                // Aliases of the same field behave like repeated keys
                if !seen.insert(field) {
                    warnings.push(DefinitionError::DuplicateKey {
                        key: field.as_str().to_string(),
                    });
                    fields.retain(|(f, _)| *f != field);
                }
                fields.push((field, value));
            }
            None => {
                match options.unknown_fields {
                    UnknownFieldPolicy::Preserve => {}
                    UnknownFieldPolicy::Warn => warnings.push(DefinitionError::UnknownField {
                        field: key.clone(),
                        rejected: false,
                    }),
                    UnknownFieldPolicy::Reject => errors.push(DefinitionError::UnknownField {
                        field: key.clone(),
                        rejected: true,
                    }),
                }
                extra.insert(key, value.clone());
            }
        }
    }

    let mut metadata = Metadata {
        extra,
        ..Metadata::default()
    };
    let mut has_name = false;
    let mut has_description = false;

    for (field, value) in fields {
        let name = field.as_str();
        match field {
            Field::Name => match required_string(name, value) {
                Ok(Some(n)) if n.chars().any(char::is_whitespace) => {
                    errors.push(DefinitionError::invalid(name, "must not contain whitespace"))
                }
                Ok(Some(n)) => {
                    metadata.name = n;
                    has_name = true;
                }
                Ok(None) => {}
                Err(e) => errors.push(e),
            },
            Field::Description => match required_string(name, value) {
                Ok(Some(d)) => {
                    metadata.description = d.trim().to_string();
                    has_description = true;
                }
                Ok(None) => {}
                Err(e) => errors.push(e),
            },
            Field::Domain => record(optional_string(name, value), &mut metadata.domain, &mut errors),
            Field::Subdomain => {
                record(optional_string(name, value), &mut metadata.subdomain, &mut errors)
            }
            Field::Model => record(optional_string(name, value), &mut metadata.model, &mut errors),
            Field::Skills => match string_list(name, value) {
                Ok(skills) => metadata.skills = dedup_in_order(skills),
                Err(mut e) => errors.append(&mut e),
            },
            Field::RelatedAgents => match string_list(name, value) {
                Ok(related) => metadata.related_agents = dedup_in_order(related),
                Err(mut e) => errors.append(&mut e),
            },
            Field::Tools => match tools(value, &options.extra_tools) {
                Ok(tools) => metadata.tools = tools,
                Err(mut e) => errors.append(&mut e),
            },
            Field::Examples => match examples(value) {
                Ok(examples) => metadata.examples = examples,
                Err(mut e) => errors.append(&mut e),
            },
        }
    }

    let name_invalid = errors
        .iter()
        .any(|e| matches!(e, DefinitionError::InvalidFieldType { field, .. } if field == "name"));
    if !has_name && !name_invalid {
        errors.insert(0, DefinitionError::missing("name"));
    }
    let description_invalid = errors.iter().any(
        |e| matches!(e, DefinitionError::InvalidFieldType { field, .. } if field == "description"),
    );
    if !has_description && !description_invalid {
        let at = usize::from(!has_name && !name_invalid);
        errors.insert(at, DefinitionError::missing("description"));
    }

    if errors.is_empty() {
        Ok(DecodedHeader { metadata, warnings })
    } else {
        Err(ParseFailure { errors, warnings })
    }
}

/// Remove earlier occurrences of repeated top-level keys.
///
/// Returns the rewritten header and the repeated keys in order of first
/// appearance. Runs before YAML decoding, which refuses duplicate keys.
fn drop_shadowed_keys(header: &str) -> (String, Vec<String>) {
    let mut entries: Vec<(Option<String>, String)> = Vec::new();

    for line in header.split_inclusive('\n') {
        match TOP_LEVEL_KEY.captures(line) {
            Some(cap) => {
                let key = cap
                    .get(1)
                    .or_else(|| cap.get(2))
                    .or_else(|| cap.get(3))
                    .map(|m| m.as_str().to_string());
                entries.push((key, line.to_string()));
            }
            None => match entries.last_mut() {
                Some((_, text)) => text.push_str(line),
                None => entries.push((None, line.to_string())),
            },
        }
    }

    let mut last_index = std::collections::HashMap::new();
    for (index, (key, _)) in entries.iter().enumerate() {
        if let Some(key) = key {
            last_index.insert(key.clone(), index);
        }
    }

    let mut duplicates = Vec::new();
    let mut rewritten = String::with_capacity(header.len());
    for (index, (key, text)) in entries.iter().enumerate() {
        match key {
            Some(key) if last_index[key] != index => {
                if !duplicates.contains(key) {
                    duplicates.push(key.clone());
                }
            }
            _ => rewritten.push_str(text),
        }
    }

    (rewritten, duplicates)
}

fn parse_mapping(header: &str) -> Result<Mapping, DefinitionError> {
    let blank = header
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#'));
    if blank {
        return Ok(Mapping::new());
    }

    let value: Value = serde_yaml::from_str(header).map_err(|e| DefinitionError::MalformedHeader {
        message: e.to_string(),
    })?;

    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        other => Err(DefinitionError::MalformedHeader {
            message: format!("expected a mapping of fields, found {}", kind_of(&other)),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Render a scalar as a string
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn record(
    result: Result<Option<String>, DefinitionError>,
    slot: &mut Option<String>,
    errors: &mut Vec<DefinitionError>,
) {
    match result {
        Ok(value) => *slot = value,
        Err(e) => errors.push(e),
    }
}

fn optional_string(field: &str, value: &Value) -> Result<Option<String>, DefinitionError> {
    match value {
        Value::Null => Ok(None),
        other => scalar(other).map(Some).ok_or_else(|| {
            DefinitionError::invalid(field, format!("expected a string, found {}", kind_of(other)))
        }),
    }
}

/// Like [`optional_string`], but blank strings count as absent
fn required_string(field: &str, value: &Value) -> Result<Option<String>, DefinitionError> {
    Ok(optional_string(field, value)?.filter(|s| !s.trim().is_empty()))
}

/// Accept a single string, a comma-separated string, or a list of strings
fn string_list(field: &str, value: &Value) -> Result<Vec<String>, Vec<DefinitionError>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()),
        Value::Sequence(items) => {
            let mut values = Vec::with_capacity(items.len());
            let mut errors = Vec::new();
            for (index, item) in items.iter().enumerate() {
                match scalar(item) {
                    Some(s) if !s.trim().is_empty() => values.push(s.trim().to_string()),
                    Some(_) => {}
                    None => errors.push(DefinitionError::invalid(
                        format!("{}[{}]", field, index),
                        format!("expected a string, found {}", kind_of(item)),
                    )),
                }
            }
            if errors.is_empty() {
                Ok(values)
            } else {
                Err(errors)
            }
        }
        other => match scalar(other) {
            Some(s) => Ok(vec![s]),
            None => Err(vec![DefinitionError::invalid(
                field,
                format!("expected a string or a list of strings, found {}", kind_of(other)),
            )]),
        },
    }
}

fn tools(value: &Value, extra_tools: &[String]) -> Result<Vec<Tool>, Vec<DefinitionError>> {
    let names = string_list("tools", value)?;
    let mut tools = Vec::with_capacity(names.len());
    let mut errors = Vec::new();

    for name in names {
        match Tool::resolve(&name, extra_tools) {
            Some(tool) => tools.push(tool),
            None => errors.push(DefinitionError::invalid(
                "tools",
                format!("unrecognized tool '{}'", name),
            )),
        }
    }

    if errors.is_empty() {
        Ok(dedup_in_order(tools))
    } else {
        Err(errors)
    }
}

fn examples(value: &Value) -> Result<Vec<Example>, Vec<DefinitionError>> {
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Sequence(items) => items,
        other => {
            return Err(vec![DefinitionError::invalid(
                "examples",
                format!("expected a list of examples, found {}", kind_of(other)),
            )])
        }
    };

    let mut examples = Vec::with_capacity(items.len());
    let mut errors = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let path = format!("examples[{}]", index);
        let entry = match item {
            Value::Mapping(entry) => entry,
            other => {
                errors.push(DefinitionError::invalid(
                    &path,
                    format!("expected a mapping with title, input and output, found {}", kind_of(other)),
                ));
                continue;
            }
        };

        let mut text = |key: &str| -> Option<String> {
            match entry.get(key) {
                None | Some(Value::Null) => None,
                Some(v) => match scalar(v) {
                    Some(s) => Some(s),
                    None => {
                        errors.push(DefinitionError::invalid(
                            format!("{}.{}", path, key),
                            format!("expected a string, found {}", kind_of(v)),
                        ));
                        None
                    }
                },
            }
        };

        let title = text("title");
        let input = text("input");
        let output = text("output");

        match (input, output) {
            (Some(input), Some(output)) => examples.push(Example {
                title: title.unwrap_or_else(|| format!("Example {}", index + 1)),
                input,
                output,
            }),
            (input, output) => {
                for (key, present) in [("input", input.is_some()), ("output", output.is_some())] {
                    let field = format!("{}.{}", path, key);
                    let already_reported = errors.iter().any(
                        |e| matches!(e, DefinitionError::InvalidFieldType { field: f, .. } if *f == field),
                    );
                    if !present && !already_reported {
                        errors.push(DefinitionError::missing(field));
                    }
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(examples)
    } else {
        Err(errors)
    }
}

/// Remove repeated values, keeping first occurrences in order
pub(crate) fn dedup_in_order<T: Eq + Hash + Clone>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
