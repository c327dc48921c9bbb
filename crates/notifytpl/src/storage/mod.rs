//! Template store abstraction
//!
//! The relay keeps templates behind a REST API; the engine only needs the
//! operations below and treats every one of them as fallible.

mod memory;

pub use memory::MemoryTemplateStore;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::template::{Template, TemplateId};

/// Storage trait for template persistence
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// All templates keyed by id
    async fn list(&self) -> Result<HashMap<TemplateId, Template>, StoreError>;

    /// Get a template by id
    async fn get(&self, id: &TemplateId) -> Result<Template, StoreError>;

    /// Create a template; fails if the id is already taken
    async fn create(&self, template: &Template) -> Result<(), StoreError>;

    /// Replace the template stored under `id`
    async fn update(&self, id: &TemplateId, template: &Template) -> Result<(), StoreError>;

    /// Delete a template
    async fn delete(&self, id: &TemplateId) -> Result<(), StoreError>;
}
