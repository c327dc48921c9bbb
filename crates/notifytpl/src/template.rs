//! Message template records

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a template
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TemplateId(pub String);

impl From<String> for TemplateId {
    fn from(s: String) -> Self {
        TemplateId(s)
    }
}

impl From<&str> for TemplateId {
    fn from(s: &str) -> Self {
        TemplateId(s.to_string())
    }
}

impl AsRef<str> for TemplateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets id-keyed maps be queried with a plain `&str`.
impl Borrow<str> for TemplateId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored message blueprint
///
/// Every field except `id` is a template body that the relay renders
/// before dispatching a notification. Missing fields decode as empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Template {
    /// Unique identifier, immutable once created
    pub id: TemplateId,

    /// Human-readable name
    pub name: String,

    /// Message body
    pub content: String,

    /// Message title
    pub title: String,

    /// Image URL, may be empty
    pub image: String,

    /// Link URL, may be empty
    pub url: String,

    /// Destination selector (comma separated once rendered)
    pub targets: String,
}

impl Template {
    /// Create a new template with a name and content body
    pub fn new(id: impl Into<TemplateId>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Template {
            id: id.into(),
            name: name.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    /// Create a new template builder
    pub fn builder(id: impl Into<TemplateId>) -> TemplateBuilder {
        TemplateBuilder::new(id.into())
    }

    /// Copy of this template stored under a different id
    pub fn renamed(&self, id: impl Into<TemplateId>) -> Self {
        Template {
            id: id.into(),
            ..self.clone()
        }
    }
}

/// Builder for creating templates with a fluent API
#[derive(Debug)]
pub struct TemplateBuilder {
    template: Template,
}

impl TemplateBuilder {
    pub fn new(id: TemplateId) -> Self {
        TemplateBuilder {
            template: Template {
                id,
                ..Default::default()
            },
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.template.name = name.into();
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.template.content = content.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.template.title = title.into();
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.template.image = image.into();
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.template.url = url.into();
        self
    }

    pub fn targets(mut self, targets: impl Into<String>) -> Self {
        self.template.targets = targets.into();
        self
    }

    pub fn build(self) -> Template {
        self.template
    }
}
