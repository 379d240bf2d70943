//! Search API response model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub root: ResultRoot,
}

impl QueryResponse {
    #[must_use]
    pub fn hits(&self) -> &[Hit] {
        &self.root.children
    }

    #[must_use]
    pub fn into_hits(self) -> Vec<Hit> {
        self.root.children
    }

    #[must_use]
    pub fn total_count(&self) -> Option<u64> {
        self.root.fields.as_ref().and_then(|f| f.total_count)
    }

    #[must_use]
    pub fn errors(&self) -> &[ResponseError] {
        &self.root.errors
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ResultRoot {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub fields: Option<RootFields>,
    #[serde(default)]
    pub children: Vec<Hit>,
    #[serde(default)]
    pub errors: Vec<ResponseError>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RootFields {
    #[serde(rename = "totalCount", default)]
    pub total_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ResponseError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl std::fmt::Display for ResponseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let summary = self.summary.as_deref().unwrap_or("error");
        match (self.code, self.message.as_deref()) {
            (Some(code), Some(message)) => write!(f, "{summary} ({code}): {message}"),
            (Some(code), None) => write!(f, "{summary} ({code})"),
            (None, Some(message)) => write!(f, "{summary}: {message}"),
            (None, None) => f.write_str(summary),
        }
    }
}

/// One result with its field map.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Hit {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub relevance: Option<f64>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Hit {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Read a tensor field as a dense vector.
    ///
    /// Accepts a plain array, the short `{"values": [...]}` form, and the
    /// verbose `{"cells": [{"address": {..}, "value": ..}]}` form. Cells are
    /// taken in response order.
    #[must_use]
    pub fn vector(&self, name: &str) -> Option<Vec<f32>> {
        let value = self.fields.get(name)?;
        match value {
            Value::Array(items) => numbers(items),
            Value::Object(obj) => {
                if let Some(Value::Array(items)) = obj.get("values") {
                    return numbers(items);
                }
                let Some(Value::Array(cells)) = obj.get("cells") else {
                    return None;
                };
                cells
                    .iter()
                    .map(|cell| cell.get("value").and_then(as_f32))
                    .collect()
            }
            _ => None,
        }
    }
}

fn numbers(items: &[Value]) -> Option<Vec<f32>> {
    items.iter().map(as_f32).collect()
}

#[allow(clippy::cast_possible_truncation)]
fn as_f32(value: &Value) -> Option<f32> {
    value.as_f64().map(|v| v as f32)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn hit_with(field: Value) -> Hit {
        serde_json::from_value(json!({
            "id": "id:hybrid-search:doc::a",
            "relevance": 0.5,
            "fields": {"embedding": field}
        }))
        .unwrap()
    }

    #[test]
    fn parses_search_response() {
        let response: QueryResponse = serde_json::from_value(json!({
            "root": {
                "id": "toplevel",
                "relevance": 1.0,
                "fields": {"totalCount": 2},
                "coverage": {"coverage": 100, "documents": 40949, "full": true, "nodes": 1},
                "children": [
                    {"id": "id:hybrid-search:doc::a", "relevance": 12.5, "source": "content",
                     "fields": {"doc_id": "a", "views": 10}},
                    {"id": "id:hybrid-search:doc::b", "relevance": 11.0, "fields": {"doc_id": "b"}}
                ]
            }
        }))
        .unwrap();

        assert_eq!(response.total_count(), Some(2));
        assert_eq!(response.hits().len(), 2);
        assert_eq!(response.hits()[0].field("views"), Some(&json!(10)));
        assert!(response.errors().is_empty());
    }

    #[test]
    fn zero_hit_response_has_no_children() {
        let response: QueryResponse = serde_json::from_value(json!({
            "root": {"id": "toplevel", "relevance": 1.0, "fields": {"totalCount": 0}}
        }))
        .unwrap();
        assert!(response.hits().is_empty());
    }

    #[test]
    fn response_error_display() {
        let err = ResponseError {
            code: Some(4),
            summary: Some("Invalid query parameter".to_string()),
            message: Some("Could not parse".to_string()),
        };
        assert_eq!(err.to_string(), "Invalid query parameter (4): Could not parse");
    }

    #[test]
    fn vector_from_each_tensor_form() {
        assert_eq!(hit_with(json!([1.0, 2.0])).vector("embedding"), Some(vec![1.0, 2.0]));
        assert_eq!(
            hit_with(json!({"type": "tensor<float>(x[2])", "values": [0.5, 0.25]})).vector("embedding"),
            Some(vec![0.5, 0.25])
        );
        assert_eq!(
            hit_with(json!({"cells": [
                {"address": {"x": "0"}, "value": 3.0},
                {"address": {"x": "1"}, "value": 4.0}
            ]}))
            .vector("embedding"),
            Some(vec![3.0, 4.0])
        );
    }

    #[test]
    fn vector_rejects_non_numeric() {
        assert_eq!(hit_with(json!(["a"])).vector("embedding"), None);
        assert_eq!(hit_with(json!("nope")).vector("embedding"), None);
        assert_eq!(hit_with(json!([1.0])).vector("missing"), None);
    }
}
