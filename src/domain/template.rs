// src/domain/template.rs
use std::collections::HashMap;

use super::error::DomainError;
use super::field::Field;
use super::note::Note;

/// Template names accepted on the command line.
pub const KNOWN_TEMPLATES: &[&str] = &["note", "meeting", "task", "person", "article", "idea"];

/// Default supertags and field names for a built-in template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub name: &'static str,
    pub default_tags: &'static [&'static str],
    pub field_names: &'static [&'static str],
}

const TEMPLATES: &[Template] = &[
    Template {
        name: "meeting",
        default_tags: &["meeting"],
        field_names: &["date", "attendees", "agenda"],
    },
    Template {
        name: "task",
        default_tags: &["task"],
        field_names: &["status", "priority", "due_date"],
    },
    Template {
        name: "note",
        default_tags: &["note"],
        field_names: &[],
    },
];

impl Template {
    /// Look up a template with a definition. `person`, `article` and `idea` are
    /// recognised names without one and fail like any unknown name.
    pub fn lookup(name: &str) -> Result<&'static Template, DomainError> {
        TEMPLATES
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| DomainError::TemplateNotFound(name.to_string()))
    }

    pub fn is_known(name: &str) -> bool {
        KNOWN_TEMPLATES.contains(&name)
    }

    /// Template fields in definition order, dropping those without a value.
    pub fn fields(&self, data: &HashMap<String, String>) -> Vec<Field> {
        self.field_names
            .iter()
            .filter_map(|name| {
                data.get(*name)
                    .filter(|value| !value.is_empty())
                    .map(|value| Field::new(*name, value.as_str()))
            })
            .collect()
    }
}

/// Expand `content` with the named template's tags and the non-empty fields from `data`.
pub fn apply_template(
    content: &str,
    template_name: &str,
    data: &HashMap<String, String>,
) -> Result<Note, DomainError> {
    let template = Template::lookup(template_name)?;
    Ok(Note::new(content)
        .with_tags(template.default_tags.iter().copied())
        .with_fields(template.fields(data)))
}
