//! Error types for the notifytpl library
//!
//! Errors are organized by domain. Rendering errors never escape
//! [`Interpreter::render`](crate::render::Interpreter::render); store errors are
//! counted per item by the importer and only surface directly when the initial
//! store snapshot cannot be taken.

use thiserror::Error;

/// Main error type for the notifytpl library
#[derive(Error, Debug)]
pub enum NotifyTplError {
    /// Template interpretation errors
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Template store operations (create, update, delete, list)
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Import/export payload decoding errors
    #[error("Payload error: {0}")]
    Payload(#[from] PayloadError),

    /// Configuration loading errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while evaluating a template body
///
/// These are recovered inside the interpreter, which degrades to its
/// fallback text. `try_render` exposes them for callers that want details.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Template body is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },
}

/// Template store errors
///
/// Mirrors the failure classes of the relay backend's template endpoints.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Errors decoding an import payload
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("Malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unsupported export type: {0}")]
    UnsupportedType(String),

    #[error("Payload contains no templates")]
    NoTemplates,
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },
}

/// Shorthand result type for notifytpl operations
pub type Result<T> = std::result::Result<T, NotifyTplError>;

// ============================================================================
// Error Helper Functions
// ============================================================================

impl NotifyTplError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            NotifyTplError::Store(e) => match e {
                StoreError::NotFound(id) => format!("Template {} does not exist", id),
                StoreError::AlreadyExists(id) => format!("Template ID {} already exists", id),
                _ => format!("Template store error: {}", e),
            },
            NotifyTplError::Payload(PayloadError::Malformed(_))
            | NotifyTplError::Serialization(_) => {
                "Failed to parse data. Please check your JSON format.".to_string()
            }
            NotifyTplError::Payload(e) => format!("Import payload rejected: {}", e),
            NotifyTplError::Render(_) => "Template preview failed".to_string(),
            NotifyTplError::Config(e) => format!("Configuration error: {}", e),
        }
    }

    /// Check if retrying the same operation could succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, NotifyTplError::Store(StoreError::Backend(_)))
    }
}
