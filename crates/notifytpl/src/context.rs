//! Substitution environment for template previews
//!
//! A [`RenderContext`] is built fresh for every render call by merging the
//! sample defaults with whatever data the caller supplies. Values stay as
//! JSON scalars and are only turned into text when a directive uses them.

use std::collections::HashMap;

use serde_json::Value;
use time::OffsetDateTime;
use time::macros::format_description;

/// Sample values used when the caller does not supply a variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDefaults {
    pub title: String,
    pub content: String,
    pub level: String,
    pub message: String,
    pub timestamp: String,
    pub image: String,
    pub url: String,
}

impl TemplateDefaults {
    /// The standard preview samples, stamped with the current local time
    pub fn sample() -> Self {
        Self {
            title: "示例标题".to_string(),
            content: "示例内容".to_string(),
            level: "info".to_string(),
            message: "示例消息".to_string(),
            timestamp: local_timestamp(),
            image: String::new(),
            url: String::new(),
        }
    }

    /// Pin the timestamp, mostly useful for reproducible output
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("title", &self.title),
            ("content", &self.content),
            ("level", &self.level),
            ("message", &self.message),
            ("timestamp", &self.timestamp),
            ("image", &self.image),
            ("url", &self.url),
        ]
    }
}

impl Default for TemplateDefaults {
    fn default() -> Self {
        Self::sample()
    }
}

/// Variable name to scalar value mapping consulted by the interpreter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderContext {
    vars: HashMap<String, Value>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for RenderContext {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

/// Merge defaults with caller data
///
/// Caller keys win over defaults, caller-only keys are added verbatim.
/// Anything other than a JSON object is treated as "no caller data".
pub fn resolve(defaults: &TemplateDefaults, caller_data: &Value) -> RenderContext {
    let mut context: RenderContext = defaults
        .entries()
        .into_iter()
        .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
        .collect();

    if let Value::Object(data) = caller_data {
        for (key, value) in data {
            context.insert(key.clone(), value.clone());
        }
    }

    context
}

/// Text form of a context value as it appears in rendered output
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            // f64 Display drops a zero fraction: 3.0 -> "3"
            (_, _, Some(f)) => f.to_string(),
            _ => n.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Whether a conditional block on this value keeps its body
///
/// Empty strings, numeric zero, `false` and `null` are falsy.
/// Collections are always truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Current local time in the console's `YYYY/M/D HH:MM:SS` style
///
/// Falls back to UTC when the local offset cannot be determined.
fn local_timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(format_description!(
        "[year]/[month padding:none]/[day padding:none] [hour]:[minute]:[second]"
    ))
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defaults() -> TemplateDefaults {
        TemplateDefaults::sample().with_timestamp("2024/1/2 03:04:05")
    }

    #[test]
    fn test_defaults_fill_missing_keys() {
        let context = resolve(&defaults(), &json!({}));
        assert_eq!(context.len(), 7);
        assert_eq!(context.get("title"), Some(&json!("示例标题")));
        assert_eq!(context.get("level"), Some(&json!("info")));
        assert_eq!(context.get("image"), Some(&json!("")));
        assert_eq!(context.get("timestamp"), Some(&json!("2024/1/2 03:04:05")));
    }

    #[test]
    fn test_caller_data_overrides_and_extends() {
        let context = resolve(
            &defaults(),
            &json!({ "title": "Disk full", "host": "db-1", "level": "" }),
        );
        assert_eq!(context.get("title"), Some(&json!("Disk full")));
        assert_eq!(context.get("host"), Some(&json!("db-1")));
        // An explicit empty value still overrides the sample
        assert_eq!(context.get("level"), Some(&json!("")));
        assert_eq!(context.get("content"), Some(&json!("示例内容")));
    }

    #[test]
    fn test_non_object_caller_data_is_ignored() {
        let context = resolve(&defaults(), &json!(["title"]));
        assert_eq!(context, resolve(&defaults(), &Value::Null));
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&json!("x")), "x");
        assert_eq!(value_to_string(&json!(42)), "42");
        assert_eq!(value_to_string(&json!(3.0)), "3");
        assert_eq!(value_to_string(&json!(2.5)), "2.5");
        assert_eq!(value_to_string(&json!(true)), "true");
        assert_eq!(value_to_string(&Value::Null), "null");
        assert_eq!(value_to_string(&json!(["a", 1])), "a,1");
        assert_eq!(value_to_string(&json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&Value::Null));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!([])));
    }

    #[test]
    fn test_sample_timestamp_is_populated() {
        assert!(!TemplateDefaults::sample().timestamp.is_empty());
    }
}
