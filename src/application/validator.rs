// src/application/validator.rs
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::constants::{API_DATA_TYPES, API_MAX_NODES_PER_CALL, API_MAX_PAYLOAD_CHARS, PASTE_HEADER};
use crate::domain::Template;

static NODE_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*-\s+").unwrap());
static DIRECTIVE_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*%%").unwrap());
static FIELD_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*-\s+.*::").unwrap());

/// Problems found in a paste file, API file or template name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Check a Tana Paste document for the header and bullet/field line shapes.
pub fn validate_paste(content: &str) -> ValidationReport {
    let mut report = ValidationReport::default();

    if !content.trim().starts_with(PASTE_HEADER) {
        report
            .errors
            .push(format!("File must start with \"{PASTE_HEADER}\""));
    }

    let mut in_block = false;
    for (index, line) in content.lines().enumerate() {
        let line_num = index + 1;
        if line.trim() == PASTE_HEADER {
            in_block = true;
            continue;
        }
        if !in_block {
            continue;
        }

        if !line.trim().is_empty() && !NODE_LINE.is_match(line) && !DIRECTIVE_LINE.is_match(line) {
            report.warnings.push(format!(
                "Line {line_num}: Content should start with \"- \" for nodes"
            ));
        }
        if line.contains("::") && !FIELD_LINE.is_match(line) {
            report.warnings.push(format!(
                "Line {line_num}: Fields should be formatted as \"- Field Name:: Value\""
            ));
        }
    }
    report
}

/// Check API JSON: overall shape, per-node `name`/`dataType`, and API size limits.
pub fn validate_api_json(content: &str) -> ValidationReport {
    let mut report = ValidationReport::default();

    let data: Value = match serde_json::from_str(content) {
        Ok(data) => data,
        Err(e) => {
            report.errors.push(format!("Invalid JSON format: {e}"));
            return report;
        }
    };

    let nodes = data.get("nodes");
    if nodes.is_none() && data.get("targetNodeId").is_none() {
        report.errors.push(
            "JSON must contain either \"nodes\" array or be a complete API payload with \"targetNodeId\""
                .to_string(),
        );
    }

    match nodes {
        Some(Value::Array(nodes)) => {
            if nodes.len() > API_MAX_NODES_PER_CALL {
                report.warnings.push(format!(
                    "Large batch: {} nodes (API limit is {API_MAX_NODES_PER_CALL} per call)",
                    nodes.len()
                ));
            }
            for (index, node) in nodes.iter().enumerate() {
                validate_node(index, node, &mut report);
            }
        }
        Some(_) => report.errors.push("\"nodes\" must be an array".to_string()),
        None => {}
    }

    let size = data.to_string().chars().count();
    if size > API_MAX_PAYLOAD_CHARS {
        report.warnings.push(format!(
            "Large payload: {size} characters (API limit is {API_MAX_PAYLOAD_CHARS})"
        ));
    }
    report
}

fn validate_node(index: usize, node: &Value, report: &mut ValidationReport) {
    let data_type = node.get("dataType");
    if node.get("name").is_none() && data_type.is_none() {
        report
            .errors
            .push(format!("Node {index}: Must have either \"name\" or \"dataType\""));
    }
    if let Some(data_type) = data_type {
        let known = data_type
            .as_str()
            .is_some_and(|t| API_DATA_TYPES.contains(&t));
        if !known {
            report
                .errors
                .push(format!("Node {index}: Invalid dataType {data_type}"));
        }
    }
}

/// Known template names only warn when missing; templates never block a run.
pub fn validate_template(name: &str) -> ValidationReport {
    let mut report = ValidationReport::default();
    if !Template::is_known(name) {
        report.warnings.push(format!(
            "Template \"{name}\" is not a built-in template. Available templates: {}",
            crate::domain::template::KNOWN_TEMPLATES.join(", ")
        ));
    }
    report
}
