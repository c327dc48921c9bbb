//! In-memory template store
//!
//! Enforces the same rules as the relay's template endpoints, which makes it
//! the reference collaborator for tests and for the command-line tool.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::TemplateStore;
use crate::error::StoreError;
use crate::template::{Template, TemplateId};

#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
    templates: Mutex<HashMap<TemplateId, Template>>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing templates
    pub fn with_templates(templates: HashMap<TemplateId, Template>) -> Self {
        Self {
            templates: Mutex::new(templates),
        }
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> HashMap<TemplateId, Template> {
        self.templates
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.templates.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<TemplateId, Template>>, StoreError> {
        self.templates
            .lock()
            .map_err(|_| StoreError::Backend("Lock poisoned".into()))
    }
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
    async fn list(&self) -> Result<HashMap<TemplateId, Template>, StoreError> {
        Ok(self.lock()?.clone())
    }

    async fn get(&self, id: &TemplateId) -> Result<Template, StoreError> {
        self.lock()?
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create(&self, template: &Template) -> Result<(), StoreError> {
        if template.id.as_ref().is_empty() {
            return Err(StoreError::InvalidTemplate("template id must not be empty".into()));
        }

        let mut templates = self.lock()?;
        if templates.contains_key(&template.id) {
            return Err(StoreError::AlreadyExists(template.id.to_string()));
        }
        templates.insert(template.id.clone(), template.clone());
        Ok(())
    }

    async fn update(&self, id: &TemplateId, template: &Template) -> Result<(), StoreError> {
        let mut templates = self.lock()?;
        match templates.get_mut(id) {
            Some(existing) => {
                // Stored under the path id, whatever the body says
                *existing = Template {
                    id: id.clone(),
                    ..template.clone()
                };
                Ok(())
            }
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    async fn delete(&self, id: &TemplateId) -> Result<(), StoreError> {
        self.lock()?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_basic_operations() {
        let store = MemoryTemplateStore::new();
        let template = Template::new("alert", "Alert", "{{ .content }}");

        store.create(&template).await.unwrap();
        assert_eq!(store.get(&template.id).await.unwrap(), template);
        assert_eq!(store.len(), 1);

        let mut changed = template.clone();
        changed.content = "{{ .message }}".to_string();
        store.update(&template.id, &changed).await.unwrap();
        assert_eq!(store.get(&template.id).await.unwrap().content, "{{ .message }}");

        store.delete(&template.id).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_rejects_duplicates_and_empty_ids() {
        let store = MemoryTemplateStore::new();
        let template = Template::new("alert", "Alert", "");
        store.create(&template).await.unwrap();

        assert_eq!(
            store.create(&template).await,
            Err(StoreError::AlreadyExists("alert".to_string()))
        );
        assert!(matches!(
            store.create(&Template::new("", "Nameless", "")).await,
            Err(StoreError::InvalidTemplate(_))
        ));
    }

    #[tokio::test]
    async fn test_memory_store_not_found() {
        let store = MemoryTemplateStore::new();
        let id = TemplateId::from("missing");
        let template = Template::new("missing", "Missing", "");

        assert_eq!(store.get(&id).await, Err(StoreError::NotFound("missing".to_string())));
        assert_eq!(
            store.update(&id, &template).await,
            Err(StoreError::NotFound("missing".to_string()))
        );
        assert!(store.delete(&id).await.is_err());
    }

    #[tokio::test]
    async fn test_update_keeps_path_id() {
        let store = MemoryTemplateStore::new();
        store.create(&Template::new("alert", "Alert", "")).await.unwrap();
        store
            .update(&"alert".into(), &Template::new("other", "Renamed", "body"))
            .await
            .unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot["alert"].name, "Renamed");
        assert_eq!(snapshot["alert"].id.as_ref(), "alert");
    }
}
