//! Run variables and `{{name}}` template resolution

use regex::{Captures, Regex};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::fixture::{Clock, SystemClock};

use super::collection::Environment;

/// Dynamic variable holding the fixture server's default date
pub const DEFAULT_DATE_VAR: &str = "$defaultDate";

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").expect("placeholder pattern is valid")
    })
}

/// Variables visible to a collection run
///
/// Environment values are overridden by injected values. Dynamic variables
/// such as `$defaultDate` are computed from the clock each time they are
/// resolved, unless a value of the same name was set explicitly.
#[derive(Clone)]
pub struct Variables {
    clock: Arc<dyn Clock>,
    values: HashMap<String, String>,
}

impl Default for Variables {
    fn default() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }
}

impl Variables {
    /// Empty variable set reading dynamic values from `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            values: HashMap::new(),
        }
    }

    /// Build the variable set for a run
    pub fn new(
        clock: Arc<dyn Clock>,
        environment: Option<&Environment>,
        injected: &[(String, String)],
    ) -> Self {
        let mut vars = Self::with_clock(clock);

        if let Some(env) = environment {
            for kv in &env.values {
                vars.set(&kv.key, kv.value.clone());
            }
        }
        for (key, value) in injected {
            vars.set(key, value.clone());
        }
        vars
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        if let Some(value) = self.values.get(key) {
            return Some(Cow::Borrowed(value.as_str()));
        }
        match key {
            DEFAULT_DATE_VAR => Some(Cow::Owned(self.clock.default_date())),
            _ => None,
        }
    }

    /// Replace `{{name}}` placeholders with variable values
    ///
    /// Unknown variables are left in place, braces included.
    pub fn resolve(&self, template: &str) -> String {
        placeholder()
            .replace_all(template, |caps: &Captures| match self.get(&caps[1]) {
                Some(value) => value.into_owned(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Resolve placeholders inside every string of a JSON value
    pub fn resolve_value(&self, value: &Value) -> Value {
        match value {
            Value::String(s) => Value::String(self.resolve(s)),
            Value::Array(items) => Value::Array(items.iter().map(|v| self.resolve_value(v)).collect()),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.resolve_value(v)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::collection::KeyValue;
    use crate::fixture::FixedClock;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::sync::Mutex;

    /// Clock whose date can be moved forward while a run is in progress
    struct SteppingClock(Mutex<NaiveDate>);

    impl Clock for SteppingClock {
        fn today(&self) -> NaiveDate {
            *self.0.lock().unwrap()
        }
    }

    fn fixed(y: i32, m: u32, d: u32) -> Arc<dyn Clock> {
        Arc::new(FixedClock(NaiveDate::from_ymd_opt(y, m, d).unwrap()))
    }

    fn env(values: &[(&str, &str)]) -> Environment {
        Environment {
            name: "test".to_string(),
            values: values
                .iter()
                .map(|(k, v)| KeyValue {
                    key: k.to_string(),
                    value: v.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_resolve_known_and_unknown() {
        let vars = Variables::new(
            fixed(2024, 3, 15),
            None,
            &[("baseUrl".to_string(), "http://127.0.0.1:3050".to_string())],
        );
        assert_eq!(
            vars.resolve("{{baseUrl}}/DONKI/FLR?x={{missing}}"),
            "http://127.0.0.1:3050/DONKI/FLR?x={{missing}}"
        );
        assert_eq!(vars.resolve("{{ baseUrl }}"), "http://127.0.0.1:3050");
        assert_eq!(vars.resolve("no placeholders"), "no placeholders");
    }

    #[test]
    fn test_injected_overrides_environment() {
        let environment = env(&[("baseUrl", "https://api.nasa.gov"), ("start_date", "2024-01-01")]);
        let vars = Variables::new(
            fixed(2024, 3, 15),
            Some(&environment),
            &[("baseUrl".to_string(), "http://127.0.0.1:9999".to_string())],
        );
        assert_eq!(vars.get("baseUrl").as_deref(), Some("http://127.0.0.1:9999"));
        assert_eq!(vars.get("start_date").as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn test_default_date_follows_injected_clock() {
        let vars = Variables::new(fixed(2024, 3, 15), None, &[]);
        assert_eq!(vars.resolve("{{$defaultDate}} 00:00:00"), "2024-03-13 00:00:00");
    }

    #[test]
    fn test_default_date_is_recomputed_on_each_resolve() {
        let clock = Arc::new(SteppingClock(Mutex::new(
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        )));
        let vars = Variables::new(clock.clone(), None, &[]);
        assert_eq!(vars.resolve("{{$defaultDate}}"), "2024-03-13");

        *clock.0.lock().unwrap() = NaiveDate::from_ymd_opt(2024, 3, 16).unwrap();
        assert_eq!(vars.resolve("{{$defaultDate}}"), "2024-03-14");
    }

    #[test]
    fn test_explicit_default_date_wins() {
        let vars = Variables::new(fixed(2024, 3, 15), Some(&env(&[("$defaultDate", "2020-01-01")])), &[]);
        assert_eq!(vars.resolve("{{$defaultDate}}"), "2020-01-01");
    }

    #[test]
    fn test_resolve_value_recurses() {
        let vars = Variables::new(fixed(2024, 3, 15), Some(&env(&[("d", "2024-01-03")])), &[]);
        let value = json!({ "keys": ["{{d}}", 3], "nested": { "v": "{{d}}" } });
        assert_eq!(
            vars.resolve_value(&value),
            json!({ "keys": ["2024-01-03", 3], "nested": { "v": "2024-01-03" } })
        );
    }
}
