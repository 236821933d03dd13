// src/domain/field.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A named key/value pair attached to a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Field {
    pub name: String,
    pub value: String,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl From<String> for Field {
    fn from(raw: String) -> Self {
        parse_field(&raw)
    }
}

impl From<&str> for Field {
    fn from(raw: &str) -> Self {
        parse_field(raw)
    }
}

impl From<Field> for String {
    fn from(field: Field) -> Self {
        field.to_string()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.value)
    }
}

/// Split a raw `name:value` string on the first colon.
///
/// Both halves are trimmed; colons after the first stay in the value.
/// A string without a colon becomes a field with an empty value.
///
/// ```
/// use tana_cli::domain::field::parse_field;
///
/// let field = parse_field("url: https://example.com");
/// assert_eq!(field.name, "url");
/// assert_eq!(field.value, "https://example.com");
/// ```
pub fn parse_field(raw: &str) -> Field {
    match raw.split_once(':') {
        Some((name, value)) => Field::new(name.trim(), value.trim()),
        None => Field::new(raw, ""),
    }
}

/// Wrap tags containing a space or hyphen in `[[...]]`.
pub fn format_tag(tag: &str) -> Cow<'_, str> {
    if tag.contains(' ') || tag.contains('-') {
        Cow::Owned(format!("[[{tag}]]"))
    } else {
        Cow::Borrowed(tag)
    }
}

pub fn format_reference(text: &str, node_id: Option<&str>) -> String {
    match node_id {
        Some(id) => format!("[[{text}^{id}]]"),
        None => format!("[[{text}]]"),
    }
}

pub fn format_date(date: NaiveDate) -> String {
    format!("[[date:{}]]", date.format("%Y-%m-%d"))
}

pub fn format_url(text: &str, url: &str) -> String {
    format!("[{text}]({url})")
}

pub fn format_checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}
