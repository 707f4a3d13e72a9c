//! Collection and environment definition types
//!
//! Defines the data structures for deserializing YAML collection and
//! environment files.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

use crate::common::{Error, Result};

/// A collection of requests loaded from a YAML file
#[derive(Deserialize, Debug)]
pub struct Collection {
    /// Display name of the collection
    pub name: String,
    /// Optional description of what the collection covers
    pub description: Option<String>,
    /// Requests, executed in order
    pub requests: Vec<RequestItem>,
}

/// A key/value pair, used for query parameters and environment values
#[derive(Deserialize, Debug, Clone)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

/// HTTP methods a request item may use
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Options => reqwest::Method::OPTIONS,
        }
    }
}

/// A single request and the expectations on its response
#[derive(Deserialize, Debug)]
pub struct RequestItem {
    /// Name shown in reports
    pub name: String,
    /// HTTP method (default: GET)
    #[serde(default)]
    pub method: HttpMethod,
    /// Request URL; may contain `{{variable}}` placeholders
    pub url: String,
    /// Query parameters appended to the URL, values may be templated
    #[serde(default)]
    pub query: Vec<KeyValue>,
    /// Expectations for the response
    #[serde(default)]
    pub expect: ResponseExpectation,
}

/// Expectations for a response
#[derive(Deserialize, Debug, Default)]
pub struct ResponseExpectation {
    /// Expected status code
    pub status: Option<u16>,
    /// Substring expected in the Content-Type header
    pub content_type: Option<String>,
    /// Assertions on the JSON body
    #[serde(default)]
    pub json: Vec<JsonAssertion>,
}

/// JSON value kinds for `type` assertions
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    String,
    Number,
    Boolean,
    Array,
    Object,
    Null,
}

impl JsonType {
    /// Kind of a JSON value
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => JsonType::String,
            Value::Number(_) => JsonType::Number,
            Value::Bool(_) => JsonType::Boolean,
            Value::Array(_) => JsonType::Array,
            Value::Object(_) => JsonType::Object,
            Value::Null => JsonType::Null,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JsonType::String => "string",
            JsonType::Number => "number",
            JsonType::Boolean => "boolean",
            JsonType::Array => "array",
            JsonType::Object => "object",
            JsonType::Null => "null",
        }
    }
}

/// Assertion on the value at a path in the JSON body
///
/// Every check that is set must hold.
#[derive(Deserialize, Debug, Default)]
pub struct JsonAssertion {
    /// Dotted path with `[n]` indexing; `$` is the root. May be templated.
    pub path: String,
    /// Whether the path should resolve (default: true)
    pub exists: Option<bool>,
    /// Expected value kind
    #[serde(rename = "type")]
    pub type_name: Option<JsonType>,
    /// Expected value (exact match, strings templated)
    pub equals: Option<Value>,
    /// Substring expected in a string value
    pub contains: Option<String>,
    /// Regex a string value must match
    pub matches: Option<String>,
    /// Exact length of an array, object or string
    pub length: Option<usize>,
    /// Minimum length of an array, object or string
    pub min_length: Option<usize>,
    /// Exact key set of an object, templated
    pub keys: Option<Vec<String>>,
}

impl Collection {
    /// Load and validate a collection from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::collection_load(path, e))?;
        let collection: Collection =
            serde_yaml::from_str(&content).map_err(|e| Error::collection_load(path, e))?;
        collection
            .validate()
            .map_err(|e| Error::collection_load(path, e))?;
        Ok(collection)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.requests.is_empty() {
            return Err(format!("collection '{}' has no requests", self.name));
        }
        for request in &self.requests {
            for assertion in &request.expect.json {
                if let Some(pattern) = &assertion.matches {
                    Regex::new(pattern).map_err(|e| {
                        format!(
                            "request '{}': invalid pattern for '{}': {}",
                            request.name, assertion.path, e
                        )
                    })?;
                }
            }
        }
        Ok(())
    }
}

/// A named set of variables loaded from a YAML file
#[derive(Deserialize, Debug)]
pub struct Environment {
    pub name: String,
    #[serde(default)]
    pub values: Vec<KeyValue>,
}

impl Environment {
    /// Load an environment from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::collection_load(path, e))?;
        serde_yaml::from_str(&content).map_err(|e| Error::collection_load(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
name: Sample
requests:
  - name: APOD
    url: "{{baseUrl}}/planetary/apod"
    query:
      - key: api_key
        value: "{{api_key}}"
    expect:
      status: 200
      json:
        - path: date
          type: string
          matches: '^\d{4}-\d{2}-\d{2}$'
        - path: media_type
          equals: image
  - name: Delete is rejected
    method: DELETE
    url: "{{baseUrl}}/planetary/apod"
    expect:
      status: 405
"#;

    #[test]
    fn test_parse_collection() {
        let collection: Collection = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(collection.name, "Sample");
        assert_eq!(collection.requests.len(), 2);

        let apod = &collection.requests[0];
        assert_eq!(apod.method, HttpMethod::Get);
        assert_eq!(apod.query[0].key, "api_key");
        assert_eq!(apod.expect.status, Some(200));
        assert_eq!(apod.expect.json[0].type_name, Some(JsonType::String));
        assert_eq!(apod.expect.json[1].equals, Some(Value::from("image")));

        assert_eq!(collection.requests[1].method, HttpMethod::Delete);
        assert!(collection.validate().is_ok());
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        let yaml = "name: x\nrequests:\n  - name: a\n    method: FETCH\n    url: /\n";
        assert!(serde_yaml::from_str::<Collection>(yaml).is_err());
    }

    #[test]
    fn test_invalid_pattern_fails_validation() {
        let yaml = r#"
name: x
requests:
  - name: a
    url: /
    expect:
      json:
        - path: date
          matches: "(unclosed"
"#;
        let collection: Collection = serde_yaml::from_str(yaml).unwrap();
        let err = collection.validate().unwrap_err();
        assert!(err.contains("invalid pattern"));
    }

    #[test]
    fn test_load_reports_path_on_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("missing.collection.yaml");
        let err = Collection::load(&path).unwrap_err();
        assert!(err.to_string().contains("missing.collection.yaml"));
    }

    #[test]
    fn test_json_type_of() {
        assert_eq!(JsonType::of(&serde_json::json!(1.5)), JsonType::Number);
        assert_eq!(JsonType::of(&serde_json::json!([])), JsonType::Array);
        assert_eq!(JsonType::of(&serde_json::json!(null)), JsonType::Null);
    }
}
