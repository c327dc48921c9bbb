//! notifytpl renders notification message template previews and reconciles
//! batch template imports against an existing template store.

pub mod config;
pub mod context;
pub mod error;
pub mod import;
pub mod macros;
pub mod render;
pub mod storage;
pub mod template;

// Re-export core types
pub use config::EngineConfig;
pub use context::{RenderContext, TemplateDefaults, resolve};
pub use error::{
    ConfigError, NotifyTplError, PayloadError, RenderError, Result, StoreError,
};
pub use import::{
    ImportDecision, ImportPolicy, ImportSummary, Importer, PlannedImport, Reconciler,
    TemplateBundle, plan_import,
};
pub use render::{FALLBACK_TEXT, Interpreter, Preview, render};
pub use storage::{MemoryTemplateStore, TemplateStore};
pub use template::{Template, TemplateBuilder, TemplateId};

#[doc(hidden)]
pub use serde_json as __serde_json;

/// Get the library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
