//! Request payloads.
//!
//! # Design
//! Most endpoints take a single JSON document. The bulk and multi-search
//! endpoints take newline-delimited JSON instead, so `Body` keeps the two
//! apart and knows its own content type.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    /// One JSON document per line; encoded with a trailing newline.
    Lines(Vec<Value>),
    Text(String),
}

impl Body {
    /// Serialize any `Serialize` value into a JSON body.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ApiError> {
        serde_json::to_value(value)
            .map(Body::Json)
            .map_err(|e| ApiError::Serialization(e.to_string()))
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Body::Json(_) => "application/json",
            Body::Lines(_) => "application/x-ndjson",
            Body::Text(_) => "text/plain",
        }
    }

    pub fn encode(&self) -> Result<String, ApiError> {
        match self {
            Body::Json(value) => {
                serde_json::to_string(value).map_err(|e| ApiError::Serialization(e.to_string()))
            }
            Body::Lines(lines) => {
                let mut out = String::new();
                for line in lines {
                    let encoded = serde_json::to_string(line)
                        .map_err(|e| ApiError::Serialization(e.to_string()))?;
                    out.push_str(&encoded);
                    out.push('\n');
                }
                Ok(out)
            }
            Body::Text(text) => Ok(text.clone()),
        }
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Json(value)
    }
}

impl From<Vec<BulkAction>> for Body {
    fn from(actions: Vec<BulkAction>) -> Self {
        Body::Lines(actions.iter().flat_map(BulkAction::lines).collect())
    }
}

/// Target of a bulk action. Fields left `None` fall back to the index and
/// type given in the bulk request path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkMeta {
    #[serde(rename = "_index", skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(rename = "_type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "_routing", skip_serializing_if = "Option::is_none")]
    pub routing: Option<String>,
}

impl BulkMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    pub fn id(mut self, id: impl ToString) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }
}

/// A single line pair (or line, for deletes) of a bulk request.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkAction {
    Index(BulkMeta, Value),
    Create(BulkMeta, Value),
    /// The payload is the full update body, e.g. `{"doc": {...}}`.
    Update(BulkMeta, Value),
    Delete(BulkMeta),
}

impl BulkAction {
    fn lines(&self) -> Vec<Value> {
        match self {
            BulkAction::Index(meta, source) => vec![json!({ "index": meta }), source.clone()],
            BulkAction::Create(meta, source) => vec![json!({ "create": meta }), source.clone()],
            BulkAction::Update(meta, body) => vec![json!({ "update": meta }), body.clone()],
            BulkAction::Delete(meta) => vec![json!({ "delete": meta })],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_body_encodes_compactly() {
        let body = Body::from(json!({"query": {"match_all": {}}}));
        assert_eq!(body.content_type(), "application/json");
        assert_eq!(body.encode().unwrap(), r#"{"query":{"match_all":{}}}"#);
    }

    #[test]
    fn lines_end_with_newline() {
        let body = Body::Lines(vec![json!({}), json!({"query": {"match_all": {}}})]);
        assert_eq!(body.content_type(), "application/x-ndjson");
        assert_eq!(body.encode().unwrap(), "{}\n{\"query\":{\"match_all\":{}}}\n");
    }

    #[test]
    fn bulk_actions_expand_to_lines() {
        let body = Body::from(vec![
            BulkAction::Index(
                BulkMeta::new().index("books").doc_type("book").id(1),
                json!({"title": "Dune"}),
            ),
            BulkAction::Update(BulkMeta::new().id("2"), json!({"doc": {"title": "Emma"}})),
            BulkAction::Delete(BulkMeta::new().id(3).routing("shard-a")),
        ]);
        let encoded = body.encode().unwrap();
        let lines: Vec<Value> = encoded
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], json!({"index": {"_index": "books", "_type": "book", "_id": "1"}}));
        assert_eq!(lines[1], json!({"title": "Dune"}));
        assert_eq!(lines[2], json!({"update": {"_id": "2"}}));
        assert_eq!(lines[4], json!({"delete": {"_id": "3", "_routing": "shard-a"}}));
    }

    #[test]
    fn body_from_serializable_struct() {
        #[derive(Serialize)]
        struct Doc {
            title: &'static str,
        }
        let body = Body::json(&Doc { title: "Dune" }).unwrap();
        assert_eq!(body, Body::Json(json!({"title": "Dune"})));
    }
}
