//! Compound selectors: `tag`, `*`, `#id`, `.class`, `[attr]`, `[attr=value]`
//! and comma separated lists of those.

use std::fmt;
use std::str::FromStr;

use super::Element;
use crate::error::SelectorError;

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Compound>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Id(String),
    Class(String),
    Attribute { name: String, value: Option<String> },
}

impl Selector {
    /// Parse a selector list.
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let mut alternatives = Vec::new();
        let mut offset = 0;
        for alternative in split_list(source) {
            let trimmed_start = alternative.len() - alternative.trim_start().len();
            let compound = parse_compound(source, alternative.trim(), offset + trimmed_start)?;
            alternatives.push(compound);
            offset += alternative.len() + 1;
        }
        Ok(Self {
            source: source.trim().to_string(),
            alternatives,
        })
    }

    /// Whether the element matches any alternative.
    pub fn matches(&self, el: &Element) -> bool {
        self.alternatives.iter().any(|compound| compound.matches(el))
    }

    /// The selector as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Compound {
    fn matches(&self, el: &Element) -> bool {
        if let Some(tag) = &self.tag
            && !el.is(tag)
        {
            return false;
        }
        self.parts.iter().all(|part| match part {
            Part::Id(id) => el.attribute("id") == Some(id.as_str()),
            Part::Class(class) => el.has_class(class),
            Part::Attribute { name, value: None } => el.has_attribute(name),
            Part::Attribute {
                name,
                value: Some(value),
            } => el.attribute(name) == Some(value.as_str()),
        })
    }
}

/// Split on commas outside attribute brackets and quotes.
fn split_list(source: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in source.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                pieces.push(&source[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&source[start..]);
    pieces
}

fn parse_compound(source: &str, text: &str, base: usize) -> Result<Compound, SelectorError> {
    if text.is_empty() {
        return Err(SelectorError::Empty);
    }
    let unexpected = |found: char, at: usize| SelectorError::Unexpected {
        selector: source.to_string(),
        found,
        offset: base + at,
    };

    let mut compound = Compound::default();
    let mut chars = text.char_indices().peekable();

    match chars.peek() {
        Some(&(_, '*')) => {
            chars.next();
        }
        Some(&(_, c)) if is_ident_char(c) => {
            compound.tag = Some(take_ident(text, &mut chars));
        }
        _ => {}
    }

    while let Some((at, c)) = chars.next() {
        match c {
            '#' | '.' => {
                let ident = take_ident(text, &mut chars);
                if ident.is_empty() {
                    let (next_at, next) = chars.peek().copied().unwrap_or((text.len(), c));
                    return Err(unexpected(next, next_at));
                }
                compound.parts.push(if c == '#' {
                    Part::Id(ident)
                } else {
                    Part::Class(ident)
                });
            }
            '[' => {
                let rest = &text[at + 1..];
                let close = find_closing_bracket(rest)
                    .ok_or_else(|| SelectorError::UnterminatedAttribute(source.to_string()))?;
                let body = &rest[..close];
                compound
                    .parts
                    .push(parse_attribute(body).ok_or_else(|| unexpected('[', at))?);
                let end = at + 1 + close;
                while chars.peek().is_some_and(|&(i, _)| i <= end) {
                    chars.next();
                }
            }
            other => return Err(unexpected(other, at)),
        }
    }

    Ok(compound)
}

fn find_closing_bracket(rest: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in rest.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, ']') => return Some(i),
            _ => {}
        }
    }
    None
}

fn parse_attribute(body: &str) -> Option<Part> {
    let (name, value) = match body.split_once('=') {
        Some((name, value)) => {
            let value = value.trim();
            let unquoted = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            (name.trim(), Some(unquoted.to_string()))
        }
        None => (body.trim(), None),
    };
    if name.is_empty() || !name.chars().all(is_ident_char) {
        return None;
    }
    Some(Part::Attribute {
        name: name.to_string(),
        value,
    })
}

fn take_ident(
    text: &str,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> String {
    let Some(&(start, _)) = chars.peek() else {
        return String::new();
    };
    let mut end = start;
    while let Some(&(i, c)) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        end = i + c.len_utf8();
        chars.next();
    }
    text[start..end].to_string()
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_')
}
