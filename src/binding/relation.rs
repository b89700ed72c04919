// Mon Oct 12 2026 - Alex

use crate::binding::error::RelationParseError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

static INVOCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z][A-Za-z0-9_-]*)\s*\((.*)\)\s*$").unwrap()
});

/// How one element's value is derived from another element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Relation {
    /// This element holds the element count of the named sibling.
    Length(String),
    /// This element always carries a fixed expression.
    ConstantValue(String),
    /// This element holds the native byte size of its owning aggregate.
    StructSize,
}

impl Relation {
    pub fn length_target(&self) -> Option<&str> {
        match self {
            Self::Length(target) => Some(target),
            _ => None,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length(target) => write!(f, "length({})", target),
            Self::ConstantValue(value) => write!(f, "const({})", value),
            Self::StructSize => write!(f, "struct-size()"),
        }
    }
}

/// Parses a comma-separated relation list such as `length(items), const(4)`.
pub fn parse_relations(text: &str) -> Result<Vec<Relation>, RelationParseError> {
    split_top_level(text)
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .map(parse_relation)
        .collect()
}

fn parse_relation(part: &str) -> Result<Relation, RelationParseError> {
    let captures = INVOCATION
        .captures(part)
        .ok_or_else(|| RelationParseError::Malformed(part.trim().to_string()))?;
    let kind = captures[1].to_ascii_lowercase();
    let argument = captures[2].trim();

    match kind.as_str() {
        "length" => {
            if argument.is_empty() || argument.contains(',') {
                return Err(RelationParseError::ArgumentCount { kind, expected: 1 });
            }
            Ok(Relation::Length(argument.to_string()))
        }
        "const" => {
            if argument.is_empty() {
                return Err(RelationParseError::ArgumentCount { kind, expected: 1 });
            }
            Ok(Relation::ConstantValue(argument.to_string()))
        }
        "struct-size" => {
            if !argument.is_empty() {
                return Err(RelationParseError::ArgumentCount { kind, expected: 0 });
            }
            Ok(Relation::StructSize)
        }
        _ => Err(RelationParseError::UnknownKind(captures[1].to_string())),
    }
}

fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}
