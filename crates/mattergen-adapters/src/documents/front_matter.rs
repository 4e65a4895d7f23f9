//! Front-matter extraction.
//!
//! Supports `---` (YAML) and `+++` (TOML) delimiters. The opening delimiter
//! must be the first line; the block ends at the next line consisting of the
//! same delimiter. Documents without a complete block are all body.

use mattergen_core::domain::{DomainError, FrontMatter};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy)]
enum Format {
    Yaml,
    Toml,
}

/// Split `text` into front-matter data and body.
pub fn parse_front_matter(text: &str) -> Result<FrontMatter, DomainError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    for (delimiter, format) in [("---", Format::Yaml), ("+++", Format::Toml)] {
        if let Some((raw, body)) = split_block(text, delimiter) {
            return Ok(FrontMatter {
                data: decode(raw, format)?,
                content: body.to_string(),
            });
        }
    }

    Ok(FrontMatter::body_only(text))
}

fn split_block<'a>(text: &'a str, delimiter: &str) -> Option<(&'a str, &'a str)> {
    let rest = text.strip_prefix(delimiter)?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == delimiter {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

fn decode(raw: &str, format: Format) -> Result<Value, DomainError> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    let value = match format {
        Format::Yaml => serde_yaml::from_str::<Value>(raw).map_err(malformed)?,
        Format::Toml => toml_to_json(raw.parse::<toml::Table>().map_err(malformed)?.into()),
    };

    match value {
        Value::Object(_) => Ok(value),
        Value::Null => Ok(Value::Object(Map::new())),
        _ => Err(DomainError::MalformedFrontMatter {
            reason: "front-matter must be a mapping".into(),
        }),
    }
}

fn malformed(e: impl std::fmt::Display) -> DomainError {
    DomainError::MalformedFrontMatter {
        reason: e.to_string(),
    }
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(d) => Value::String(d.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}
