//! CalculiX/Abaqus `.inp` deck tokenizer.
//!
//! A deck is split into cards. Each card carries its upper-cased keyword, its
//! header parameters and the data lines that follow it, every data line already
//! split into at most [`MAX_FIELDS`] comma-separated fields and tagged with its
//! 1-based line number for error messages.

use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

/// Maximum number of comma-separated fields on one data line.
pub const MAX_FIELDS: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub keyword: String,
    pub parameters: Vec<Parameter>,
    pub data_lines: Vec<DataLine>,
    pub line_start: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub key: String,
    pub value: Option<String>,
}

/// One tokenized data line of a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLine {
    /// 1-based line number in the source text
    pub line: usize,
    /// Trimmed fields; a trailing comma does not produce an empty field
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

impl Card {
    /// Looks up a header parameter by (upper-case) key.
    pub fn parameter(&self, key: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.key == key)
    }

    /// Value of `KEY=value`, if the parameter is present with a value.
    pub fn value_of(&self, key: &str) -> Option<&str> {
        self.parameter(key).and_then(|p| p.value.as_deref())
    }

    /// True when the bare flag (or `KEY=...`) is present.
    pub fn has(&self, key: &str) -> bool {
        self.parameter(key).is_some()
    }
}

impl DataLine {
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Deck {
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| ParseError {
            line: 0,
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        Self::parse_str(&raw)
    }

    pub fn parse_str(raw: &str) -> Result<Self, ParseError> {
        let lines: Vec<&str> = raw.lines().collect();
        let mut cards = Vec::new();
        let mut i = 0usize;

        while i < lines.len() {
            let trimmed = lines[i].trim();

            if trimmed.is_empty() || is_comment(trimmed) {
                i += 1;
                continue;
            }

            if !trimmed.starts_with('*') {
                return Err(ParseError {
                    line: i + 1,
                    message: "expected card starting with '*'".to_string(),
                });
            }

            let line_start = i + 1;
            let mut header = trimmed.trim_start_matches('*').trim().to_string();
            i += 1;

            // Abaqus-style header continuation with a leading comma.
            while i < lines.len() {
                let next = lines[i].trim();
                if next.starts_with(',') {
                    header.push_str(next);
                    i += 1;
                    continue;
                }
                break;
            }

            let (keyword, parameters) = parse_header(&header, line_start)?;

            let mut data_lines = Vec::new();
            while i < lines.len() {
                let candidate = lines[i].trim();
                if candidate.is_empty() || is_comment(candidate) {
                    i += 1;
                    continue;
                }
                if candidate.starts_with('*') {
                    break;
                }
                data_lines.push(split_data_line(candidate, i + 1)?);
                i += 1;
            }

            cards.push(Card {
                keyword,
                parameters,
                data_lines,
                line_start,
            });
        }

        Ok(Deck { cards })
    }

    /// Cards with the given keyword, in deck order.
    pub fn cards_named<'a>(&'a self, keyword: &'a str) -> impl Iterator<Item = &'a Card> + 'a {
        self.cards.iter().filter(move |c| c.keyword == keyword)
    }
}

fn is_comment(line: &str) -> bool {
    line.starts_with("**")
}

/// Upper-cases and collapses internal whitespace so `*beam   section` matches `BEAM SECTION`.
fn canonical_key(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}

fn parse_header(header: &str, line: usize) -> Result<(String, Vec<Parameter>), ParseError> {
    let mut parts = header.split(',');
    let keyword_raw = parts.next().unwrap_or_default().trim();
    if keyword_raw.is_empty() {
        return Err(ParseError {
            line,
            message: "empty card keyword".to_string(),
        });
    }
    let keyword = canonical_key(keyword_raw);
    let mut parameters = Vec::new();

    for part in parts {
        let item = part.trim();
        if item.is_empty() {
            continue;
        }
        if let Some((k, v)) = item.split_once('=') {
            parameters.push(Parameter {
                key: canonical_key(k),
                value: Some(v.trim().to_string()),
            });
        } else {
            parameters.push(Parameter {
                key: canonical_key(item),
                value: None,
            });
        }
    }

    Ok((keyword, parameters))
}

fn split_data_line(raw: &str, line: usize) -> Result<DataLine, ParseError> {
    let mut fields: Vec<String> = raw.split(',').map(|f| f.trim().to_string()).collect();
    if fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    if fields.len() > MAX_FIELDS {
        return Err(ParseError {
            line,
            message: format!(
                "data line has {} fields, at most {MAX_FIELDS} are allowed",
                fields.len()
            ),
        });
    }
    Ok(DataLine { line, fields })
}
