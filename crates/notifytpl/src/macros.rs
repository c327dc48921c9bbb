//! Macros for ergonomic preview data

/// Build a caller-data object for previews
///
/// # Examples
///
/// ```rust
/// use notifytpl::{context, render::preview, Template};
///
/// let template = Template::new("alert", "Alert", "[{{ .level | upper }}] {{ .host }}");
/// let data = context! {
///     level: "warn",
///     host: "db-1",
///     retries: 3,
/// };
///
/// assert_eq!(preview(&template, &data).content, "[WARN] db-1");
/// ```
#[macro_export]
macro_rules! context {
    {} => {
        $crate::__serde_json::Value::Object($crate::__serde_json::Map::new())
    };

    { $($key:ident : $value:expr),+ $(,)? } => {
        {
            let mut map = $crate::__serde_json::Map::new();
            $(
                map.insert(
                    stringify!($key).to_string(),
                    $crate::__serde_json::json!($value),
                );
            )+
            $crate::__serde_json::Value::Object(map)
        }
    };
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    #[test]
    fn test_empty_context() {
        assert_eq!(context! {}, json!({}));
    }

    #[test]
    fn test_context_values() {
        let host = "db-1";
        let data = context! {
            host: host,
            level: "warn",
            count: 2,
            muted: false,
        };
        assert_eq!(
            data,
            json!({ "host": "db-1", "level": "warn", "count": 2, "muted": false })
        );
    }
}
