//! Shareable template bundles
//!
//! The console copies templates to the clipboard as a JSON document:
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "exportTime": "2024-05-01T08:00:00Z",
//!   "exportType": "templates",
//!   "templates": [{ "id": "alert", "name": "Alert", "content": "..." }]
//! }
//! ```

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::{PayloadError, Result};
use crate::template::Template;

/// Bundle format version written on export
pub const EXPORT_VERSION: &str = "1.0";

/// The only `exportType` this crate reads or writes
pub const EXPORT_TYPE: &str = "templates";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateBundle {
    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub export_time: String,

    #[serde(default = "default_export_type")]
    pub export_type: String,

    pub templates: Vec<Template>,
}

fn default_export_type() -> String {
    EXPORT_TYPE.to_string()
}

impl TemplateBundle {
    /// Bundle templates for export, ordered by id
    pub fn export(templates: impl IntoIterator<Item = Template>) -> Self {
        let mut templates: Vec<Template> = templates.into_iter().collect();
        templates.sort_by(|a, b| a.id.cmp(&b.id));

        Self {
            version: EXPORT_VERSION.to_string(),
            export_time: OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .unwrap_or_default(),
            export_type: EXPORT_TYPE.to_string(),
            templates,
        }
    }

    /// Parse a pasted bundle
    pub fn from_json(payload: &str) -> std::result::Result<Self, PayloadError> {
        let bundle: TemplateBundle = serde_json::from_str(payload.trim())?;

        if bundle.export_type != EXPORT_TYPE {
            return Err(PayloadError::UnsupportedType(bundle.export_type));
        }
        if bundle.templates.is_empty() {
            return Err(PayloadError::NoTemplates);
        }
        Ok(bundle)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn into_templates(self) -> Vec<Template> {
        self.templates
    }
}
