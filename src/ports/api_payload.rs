// src/ports/api_payload.rs
//! JSON shapes for the Tana Input API and the builder that projects notes into them.
//!
//! Tag and field names are passed through as given: `supertags[].id` and
//! `attributeId` carry the literal names, not remote schema ids. Resolving them
//! is left to the caller.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_TARGET, MAX_RENDER_DEPTH};
use crate::domain::{Child, DomainError, Field, Note, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Plain,
    Field,
    Url,
    Date,
    Reference,
    Boolean,
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Field,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supertag {
    pub id: String,
}

/// One node of an API payload. Members not set for a node kind are omitted from the JSON.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supertags: Vec<Supertag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ApiNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub target_node_id: String,
    pub nodes: Vec<ApiNode>,
}

impl Payload {
    /// The target is upper-cased, so `inbox` and `INBOX` address the same node.
    pub fn new(target: &str, nodes: Vec<ApiNode>) -> Self {
        Self {
            target_node_id: target.to_uppercase(),
            nodes,
        }
    }
}

impl ApiNode {
    /// A node carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            data_type: Some(DataType::Plain),
            ..Self::named(name)
        }
    }

    /// Field node; `attribute_id` is the raw field name.
    pub fn field(attribute_id: impl Into<String>, values: Vec<ApiNode>) -> Self {
        Self {
            node_type: Some(NodeType::Field),
            attribute_id: Some(attribute_id.into()),
            children: values,
            ..Default::default()
        }
    }

    pub fn reference(node_id: impl Into<String>) -> Self {
        Self {
            data_type: Some(DataType::Reference),
            id: Some(node_id.into()),
            ..Default::default()
        }
    }

    pub fn date(date: NaiveDate) -> Self {
        Self {
            data_type: Some(DataType::Date),
            ..Self::named(date.format("%Y-%m-%d").to_string())
        }
    }

    pub fn url(name: impl Into<String>, url: impl Into<String>) -> Self {
        let link = Self {
            data_type: Some(DataType::Url),
            ..Self::named(url)
        };
        Self {
            children: vec![Self::field("URL", vec![link])],
            ..Self::named(name)
        }
    }

    pub fn checkbox(name: impl Into<String>, checked: bool) -> Self {
        Self {
            data_type: Some(DataType::Boolean),
            value: Some(checked),
            ..Self::named(name)
        }
    }

    pub fn file(
        filename: impl Into<String>,
        base64_data: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            data_type: Some(DataType::File),
            file: Some(base64_data.into()),
            filename: Some(filename.into()),
            content_type: Some(content_type.into()),
            ..Default::default()
        }
    }
}

impl From<&Field> for ApiNode {
    fn from(field: &Field) -> Self {
        ApiNode::field(field.name.clone(), vec![ApiNode::named(field.value.clone())])
    }
}

/// Projects notes into API nodes and payloads.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    max_depth: usize,
}

impl PayloadBuilder {
    pub fn new() -> Self {
        Self {
            max_depth: MAX_RENDER_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Single-note payload for `target` (defaults to `INBOX`).
    pub fn create_payload(&self, note: &Note, target: Option<&str>) -> Result<Payload, DomainError> {
        if note.content.is_empty() {
            return Err(DomainError::Render("note content must not be empty".to_string()));
        }
        let node = self.create_node(note)?;
        Ok(Payload::new(target.unwrap_or(DEFAULT_TARGET), vec![node]))
    }

    pub fn create_node(&self, note: &Note) -> Result<ApiNode, DomainError> {
        self.node_at(note, 0)
    }

    fn node_at(&self, note: &Note, depth: usize) -> Result<ApiNode, DomainError> {
        if depth >= self.max_depth {
            return Err(DomainError::Render(format!(
                "note nesting exceeds the maximum depth of {}",
                self.max_depth
            )));
        }

        let mut node = ApiNode::plain(note.content.clone());
        node.supertags = note
            .tags
            .iter()
            .map(|tag| Supertag { id: tag.clone() })
            .collect();

        node.children.extend(note.fields.iter().map(ApiNode::from));
        for child in &note.children {
            let child_node = match child {
                Child::Text(text) => ApiNode::named(text.clone()),
                Child::Note(inner) => self.node_at(inner, depth + 1)?,
            };
            node.children.push(child_node);
        }
        Ok(node)
    }
}

impl Default for PayloadBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Split `nodes` into consecutive payloads of at most `batch_size` nodes each.
pub fn batch_payloads(
    nodes: Vec<ApiNode>,
    target: &str,
    batch_size: usize,
) -> Result<Vec<Payload>, TransportError> {
    if batch_size == 0 {
        return Err(TransportError::Request(
            "batch size must be greater than zero".to_string(),
        ));
    }
    Ok(nodes
        .chunks(batch_size)
        .map(|chunk| Payload::new(target, chunk.to_vec()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_note_with_tag_and_field_when_creating_payload_then_matches_api_shape() {
        // Arrange
        let note = Note::new("Buy milk")
            .with_tags(["errand"])
            .with_fields(["priority:high"]);

        // Act
        let payload = PayloadBuilder::new().create_payload(&note, None).unwrap();

        // Assert
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "targetNodeId": "INBOX",
                "nodes": [{
                    "name": "Buy milk",
                    "dataType": "plain",
                    "supertags": [{"id": "errand"}],
                    "children": [{
                        "type": "field",
                        "attributeId": "priority",
                        "children": [{"name": "high"}]
                    }]
                }]
            })
        );
    }

    #[test]
    fn given_lowercase_target_when_creating_payload_then_upper_cases() {
        let payload = PayloadBuilder::new()
            .create_payload(&Note::new("x"), Some("schema"))
            .unwrap();

        assert_eq!(payload.target_node_id, "SCHEMA");
    }

    #[test]
    fn given_plain_note_when_creating_node_then_omits_supertags_and_children() {
        let node = PayloadBuilder::new().create_node(&Note::new("Just text")).unwrap();

        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({"name": "Just text", "dataType": "plain"})
        );
    }

    #[test]
    fn given_fields_and_children_when_creating_node_then_fields_come_first() {
        let note = Note::new("Parent")
            .with_child("text child")
            .with_child(Note::new("note child").with_tags(["task"]))
            .with_fields(["status:open"]);

        let node = PayloadBuilder::new().create_node(&note).unwrap();

        assert_eq!(node.children.len(), 3);
        assert_eq!(node.children[0].attribute_id.as_deref(), Some("status"));
        assert_eq!(node.children[1], ApiNode::named("text child"));
        assert_eq!(node.children[2].data_type, Some(DataType::Plain));
        assert_eq!(node.children[2].supertags, vec![Supertag { id: "task".into() }]);
    }

    #[test]
    fn given_empty_content_when_creating_payload_then_returns_render_error() {
        let result = PayloadBuilder::new().create_payload(&Note::new(""), None);

        assert!(matches!(result, Err(DomainError::Render(_))));
    }

    #[test]
    fn given_tree_deeper_than_limit_when_creating_node_then_returns_render_error() {
        let note = Note::new("a").with_child(Note::new("b").with_child(Note::new("c")));

        let result = PayloadBuilder::new().with_max_depth(2).create_node(&note);

        assert!(matches!(result, Err(DomainError::Render(_))));
    }

    #[test]
    fn given_specialised_constructors_when_serializing_then_set_type_specific_members() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

        assert_eq!(
            serde_json::to_value(ApiNode::reference("abc")).unwrap(),
            json!({"dataType": "reference", "id": "abc"})
        );
        assert_eq!(
            serde_json::to_value(ApiNode::date(date)).unwrap(),
            json!({"dataType": "date", "name": "2024-03-09"})
        );
        assert_eq!(
            serde_json::to_value(ApiNode::checkbox("Done", true)).unwrap(),
            json!({"dataType": "boolean", "name": "Done", "value": true})
        );
        assert_eq!(
            serde_json::to_value(ApiNode::file("a.png", "aGk=", "image/png")).unwrap(),
            json!({"dataType": "file", "file": "aGk=", "filename": "a.png", "contentType": "image/png"})
        );
        assert_eq!(
            serde_json::to_value(ApiNode::url("Rust", "https://rust-lang.org")).unwrap(),
            json!({
                "name": "Rust",
                "children": [{
                    "type": "field",
                    "attributeId": "URL",
                    "children": [{"dataType": "url", "name": "https://rust-lang.org"}]
                }]
            })
        );
    }

    #[test]
    fn given_120_nodes_when_batching_by_50_then_splits_50_50_20() {
        let nodes: Vec<ApiNode> = (0..120).map(|i| ApiNode::plain(format!("n{i}"))).collect();

        let payloads = batch_payloads(nodes, "inbox", 50).unwrap();

        let sizes: Vec<usize> = payloads.iter().map(|p| p.nodes.len()).collect();
        assert_eq!(sizes, vec![50, 50, 20]);
        assert!(payloads.iter().all(|p| p.target_node_id == "INBOX"));
        assert_eq!(payloads[2].nodes[0].name.as_deref(), Some("n100"));
    }

    #[test]
    fn given_no_nodes_when_batching_then_returns_no_payloads() {
        assert!(batch_payloads(Vec::new(), "INBOX", 50).unwrap().is_empty());
    }

    #[test]
    fn given_zero_batch_size_when_batching_then_returns_request_error() {
        let nodes = vec![ApiNode::plain("a"), ApiNode::plain("b")];

        assert!(matches!(
            batch_payloads(nodes, "INBOX", 0),
            Err(TransportError::Request(_))
        ));
    }

    #[test]
    fn given_payload_json_when_deserializing_then_reads_camel_case() {
        let json = r#"{"targetNodeId":"INBOX","nodes":[{"name":"n","dataType":"plain"}]}"#;

        let payload: Payload = serde_json::from_str(json).unwrap();

        assert_eq!(payload.nodes, vec![ApiNode::plain("n")]);
    }
}
