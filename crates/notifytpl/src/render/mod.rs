//! Template preview rendering
//!
//! This module renders message template bodies against a [`RenderContext`].
//! The body is tokenized and parsed into a flat node sequence which is then
//! evaluated once, so text inserted for one directive is never re-expanded
//! by another.
//!
//! Rendering is permissive: directives the interpreter does not understand,
//! and directives on variables missing from the context, are copied to the
//! output verbatim. The only failure the public [`Interpreter::render`]
//! entry point can observe is replaced by a fixed fallback text.

pub mod lexer;
pub mod parser;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::config::EngineConfig;
use crate::context::{RenderContext, TemplateDefaults, is_truthy, resolve, value_to_string};
use crate::error::RenderError;
use crate::template::Template;
use parser::{Node, parse};

/// Text shown in place of a preview that could not be rendered
pub const FALLBACK_TEXT: &str = "模板预览失败";

/// Size guard used unless one is configured: bodies of any length render
pub const DEFAULT_MAX_TEMPLATE_BYTES: usize = usize::MAX;

/// A rendered template record, as the relay would dispatch it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub title: String,
    pub content: String,
    pub image: String,
    pub url: String,
    pub targets: Vec<String>,
}

/// Template interpreter with its limits and fallback text
#[derive(Debug, Clone)]
pub struct Interpreter {
    max_template_bytes: usize,
    fallback: String,
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            max_template_bytes: DEFAULT_MAX_TEMPLATE_BYTES,
            fallback: FALLBACK_TEXT.to_string(),
        }
    }

    /// Build an interpreter from engine configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            max_template_bytes: config.max_template_bytes,
            fallback: config.fallback_text.clone(),
        }
    }

    pub fn with_max_template_bytes(mut self, limit: usize) -> Self {
        self.max_template_bytes = limit;
        self
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Render a template body, reporting internal failures
    pub fn try_render(&self, body: &str, context: &RenderContext) -> Result<String, RenderError> {
        if body.len() > self.max_template_bytes {
            return Err(RenderError::TooLarge {
                size: body.len(),
                limit: self.max_template_bytes,
            });
        }

        let nodes = parse(body);
        let mut out = String::with_capacity(body.len());
        evaluate(&nodes, context, &mut out);
        Ok(out)
    }

    /// Render a template body
    ///
    /// Never fails: internal errors are logged and the fallback text is
    /// returned instead.
    pub fn render(&self, body: &str, context: &RenderContext) -> String {
        match self.try_render(body, context) {
            Ok(rendered) => rendered,
            Err(e) => {
                warn!(error = %e, "template preview failed");
                self.fallback.clone()
            }
        }
    }

    /// Render every field of a template record against caller data
    pub fn preview(
        &self,
        template: &Template,
        caller_data: &Value,
        defaults: &TemplateDefaults,
    ) -> Preview {
        let context = resolve(defaults, caller_data);
        let targets = self.render(&template.targets, &context);

        Preview {
            title: self.render(&template.title, &context),
            content: self.render(&template.content, &context),
            image: self.render(&template.image, &context),
            url: self.render(&template.url, &context),
            targets: if targets.is_empty() {
                Vec::new()
            } else {
                targets.split(',').map(str::to_string).collect()
            },
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a template body with the default interpreter
pub fn render(body: &str, context: &RenderContext) -> String {
    Interpreter::default().render(body, context)
}

/// Preview a template record with the default interpreter and sample defaults
pub fn preview(template: &Template, caller_data: &Value) -> Preview {
    Interpreter::default().preview(template, caller_data, &TemplateDefaults::sample())
}

fn evaluate(nodes: &[Node<'_>], context: &RenderContext, out: &mut String) {
    for node in nodes {
        match node {
            Node::Literal(text) => out.push_str(text),
            Node::Var { key, source } => match context.get(key) {
                Some(value) => out.push_str(&value_to_string(value)),
                None => out.push_str(source),
            },
            Node::Filter { key, name, source } => {
                match (context.get(key), apply_filter(name)) {
                    (Some(value), Some(filter)) => out.push_str(&filter(&value_to_string(value))),
                    _ => out.push_str(source),
                }
            }
            Node::Conditional { key, body, source } => match context.get(key) {
                Some(value) if is_truthy(value) => evaluate(body, context, out),
                Some(_) => {}
                None => out.push_str(source),
            },
        }
    }
}

fn apply_filter(name: &str) -> Option<fn(&str) -> String> {
    match name {
        "upper" => Some(str::to_uppercase),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context(data: Value) -> RenderContext {
        resolve(&TemplateDefaults::sample().with_timestamp("2024/1/2 03:04:05"), &data)
    }

    #[test]
    fn test_substitution_and_defaults() {
        let ctx = context(json!({ "title": "Disk full" }));
        assert_eq!(
            render("[{{ .level }}] {{.title}}: {{ .content }}", &ctx),
            "[info] Disk full: 示例内容"
        );
    }

    #[test]
    fn test_inserted_text_is_not_reexpanded() {
        let ctx = context(json!({ "title": "{{ .level }}" }));
        assert_eq!(render("{{ .title }}", &ctx), "{{ .level }}");
    }

    #[test]
    fn test_upper_filter_variants() {
        let ctx = context(json!({ "host": "db-1" }));
        assert_eq!(render("{{ .host | upper }}", &ctx), "DB-1");
        assert_eq!(render("{{ .missing | upper }}", &ctx), "{{ .missing | upper }}");
        assert_eq!(render("{{ .host | lower }}", &ctx), "{{ .host | lower }}");
    }

    #[test]
    fn test_too_large_falls_back() {
        let interpreter = Interpreter::new().with_max_template_bytes(4);
        let ctx = RenderContext::new();
        assert_eq!(
            interpreter.try_render("{{ .title }}", &ctx),
            Err(RenderError::TooLarge { size: 12, limit: 4 })
        );
        assert_eq!(interpreter.render("{{ .title }}", &ctx), FALLBACK_TEXT);
    }

    #[test]
    fn test_no_size_limit_unless_configured() {
        let body = "{{ .host }}".repeat(8_000);
        let ctx = context(json!({ "host": "h" }));
        assert_eq!(Interpreter::new().try_render(&body, &ctx), Ok("h".repeat(8_000)));
    }

    #[test]
    fn test_custom_fallback() {
        let interpreter = Interpreter::new()
            .with_max_template_bytes(0)
            .with_fallback("preview unavailable");
        assert_eq!(interpreter.render("x", &RenderContext::new()), "preview unavailable");
    }

    #[test]
    fn test_preview_splits_targets() {
        let template = Template::builder("alert")
            .title("{{ .title | upper }}")
            .content("{{ .content }}")
            .image("{{ .image }}")
            .targets("{{ .owner }},ops")
            .build();
        let preview = preview(&template, &json!({ "title": "cpu", "owner": "alice" }));
        assert_eq!(preview.title, "CPU");
        assert_eq!(preview.content, "示例内容");
        assert_eq!(preview.image, "");
        assert_eq!(preview.targets, vec!["alice".to_string(), "ops".to_string()]);
    }

    #[test]
    fn test_preview_empty_targets() {
        let template = Template::new("alert", "Alert", "{{ .content }}");
        assert!(preview(&template, &json!({})).targets.is_empty());
    }
}
