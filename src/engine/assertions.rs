//! Response assertion evaluation
//!
//! Checks a response against a [`ResponseExpectation`] and produces one
//! [`AssertionOutcome`] per check.

use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;

use super::collection::{JsonAssertion, JsonType, ResponseExpectation};
use super::variables::Variables;

/// Result of a single check
#[derive(Debug, Clone)]
pub struct AssertionOutcome {
    /// Human-readable description of the check
    pub name: String,
    /// Failure message, `None` when the check passed
    pub error: Option<String>,
}

impl AssertionOutcome {
    fn pass(name: String) -> Self {
        Self { name, error: None }
    }

    fn fail(name: String, error: String) -> Self {
        Self {
            name,
            error: Some(error),
        }
    }

    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

/// The parts of a response the assertions look at
#[derive(Debug)]
pub struct ObservedResponse<'a> {
    pub status: u16,
    pub content_type: Option<&'a str>,
    pub body: &'a str,
}

/// Evaluate every expectation against a response
pub fn evaluate(
    expect: &ResponseExpectation,
    response: &ObservedResponse<'_>,
    vars: &Variables,
) -> Vec<AssertionOutcome> {
    let mut outcomes = Vec::new();

    if let Some(expected) = expect.status {
        let name = format!("status is {expected}");
        outcomes.push(if response.status == expected {
            AssertionOutcome::pass(name)
        } else {
            AssertionOutcome::fail(
                name,
                format!("expected status {}, got {}", expected, response.status),
            )
        });
    }

    if let Some(expected) = &expect.content_type {
        let name = format!("content type contains '{expected}'");
        let actual = response.content_type.unwrap_or("");
        outcomes.push(if actual.contains(expected.as_str()) {
            AssertionOutcome::pass(name)
        } else {
            AssertionOutcome::fail(
                name,
                format!("expected content type containing '{expected}', got '{actual}'"),
            )
        });
    }

    if expect.json.is_empty() {
        return outcomes;
    }

    let body: Option<Value> = serde_json::from_str(response.body).ok();
    for assertion in &expect.json {
        let path = vars.resolve(&assertion.path);
        let name = format!("json {path}");
        let outcome = match &body {
            Some(root) => match check(assertion, lookup(root, &path), vars) {
                Ok(()) => AssertionOutcome::pass(name),
                Err(e) => AssertionOutcome::fail(name, format!("'{path}': {e}")),
            },
            None => AssertionOutcome::fail(name, "response body is not valid JSON".to_string()),
        };
        outcomes.push(outcome);
    }

    outcomes
}

/// Resolve a dotted path such as `photos[0].camera.name`
///
/// `$` or an empty path is the root. Returns `None` when any step is missing.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix('$').unwrap_or(path);
    let mut current = root;

    for segment in path.split('.').filter(|s| !s.is_empty()) {
        let (key, mut rest) = match segment.find('[') {
            Some(idx) => (&segment[..idx], &segment[idx..]),
            None => (segment, ""),
        };

        if !key.is_empty() {
            current = current.get(key)?;
        }

        while let Some(stripped) = rest.strip_prefix('[') {
            let end = stripped.find(']')?;
            let index: usize = stripped[..end].parse().ok()?;
            current = current.get(index)?;
            rest = &stripped[end + 1..];
        }

        if !rest.is_empty() {
            return None;
        }
    }

    Some(current)
}

fn check(
    assertion: &JsonAssertion,
    value: Option<&Value>,
    vars: &Variables,
) -> std::result::Result<(), String> {
    let should_exist = assertion.exists.unwrap_or(true);
    let value = match (value, should_exist) {
        (Some(_), false) => return Err("expected path to be absent".to_string()),
        (None, false) => return Ok(()),
        (None, true) => return Err("path not found".to_string()),
        (Some(value), true) => value,
    };

    if let Some(expected) = assertion.type_name {
        let actual = JsonType::of(value);
        if actual != expected {
            return Err(format!(
                "expected type {}, got {}",
                expected.as_str(),
                actual.as_str()
            ));
        }
    }

    if let Some(expected) = &assertion.equals {
        let expected = vars.resolve_value(expected);
        if !json_equals(value, &expected) {
            return Err(format!("expected {expected}, got {value}"));
        }
    }

    if let Some(needle) = &assertion.contains {
        let needle = vars.resolve(needle);
        let haystack = value
            .as_str()
            .ok_or_else(|| format!("expected a string to search for '{needle}', got {value}"))?;
        if !haystack.contains(&needle) {
            return Err(format!("expected '{haystack}' to contain '{needle}'"));
        }
    }

    if let Some(pattern) = &assertion.matches {
        let re = Regex::new(pattern).map_err(|e| format!("invalid pattern: {e}"))?;
        let text = value
            .as_str()
            .ok_or_else(|| format!("expected a string to match /{pattern}/, got {value}"))?;
        if !re.is_match(text) {
            return Err(format!("expected '{text}' to match /{pattern}/"));
        }
    }

    if assertion.length.is_some() || assertion.min_length.is_some() {
        let len = length_of(value).ok_or_else(|| format!("{value} has no length"))?;
        if let Some(expected) = assertion.length {
            if len != expected {
                return Err(format!("expected length {expected}, got {len}"));
            }
        }
        if let Some(min) = assertion.min_length {
            if len < min {
                return Err(format!("expected length of at least {min}, got {len}"));
            }
        }
    }

    if let Some(keys) = &assertion.keys {
        let object = value
            .as_object()
            .ok_or_else(|| format!("expected an object, got {value}"))?;
        let expected: BTreeSet<String> = keys.iter().map(|k| vars.resolve(k)).collect();
        let actual: BTreeSet<String> = object.keys().cloned().collect();
        if expected != actual {
            return Err(format!("expected keys {expected:?}, got {actual:?}"));
        }
    }

    Ok(())
}

/// Equality that treats `1` and `1.0` as the same number
fn json_equals(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => actual == expected,
    }
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::Array(items) => Some(items.len()),
        Value::Object(map) => Some(map.len()),
        Value::String(s) => Some(s.chars().count()),
        _ => None,
    }
}
