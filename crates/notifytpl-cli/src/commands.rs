//! Subcommand implementations
//!
//! Each command returns the text to print so it can be tested without a
//! terminal. Store files hold a JSON object mapping template ids to
//! templates, the shape the relay's template listing endpoint returns.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use notifytpl::import::SystemIdSource;
use notifytpl::{
    ImportPolicy, Importer, Interpreter, MemoryTemplateStore, NotifyTplError, Template,
    TemplateBundle, TemplateDefaults, TemplateId, TemplateStore, plan_import, resolve,
};
use serde_json::Value;
use tracing::info;

use crate::error::{CliError, Result};

/// Render a template file against optional preview data
///
/// With `raw` the file is a bare template body; otherwise it is a JSON
/// template record and every field is rendered.
pub fn preview(
    interpreter: &Interpreter,
    template_path: &Path,
    data_path: Option<&Path>,
    raw: bool,
) -> Result<String> {
    let data = match data_path {
        Some(path) => read_json::<Value>(path)?,
        None => Value::Object(Default::default()),
    };
    let defaults = TemplateDefaults::sample();

    if raw {
        let body = read_text(template_path)?;
        let context = resolve(&defaults, &data);
        return Ok(interpreter.render(&body, &context));
    }

    let template: Template = read_json(template_path)?;
    let preview = interpreter.preview(&template, &data, &defaults);
    Ok(serde_json::to_string_pretty(&preview)?)
}

/// Show the decision each payload template would get, without writing
pub fn plan(payload_path: &Path, store_path: &Path, policy: ImportPolicy) -> Result<String> {
    let templates = read_bundle(payload_path)?;
    let existing = read_store(store_path)?;

    let lines: Vec<String> = plan_import(&templates, &existing, policy, SystemIdSource)
        .into_iter()
        .map(|planned| format!("{}: {}", planned.original_id, planned.decision))
        .collect();
    Ok(lines.join("\n"))
}

/// Import a payload into a store file
///
/// The updated store is written to `output`, or back to `store_path`.
pub async fn import(
    payload_path: &Path,
    store_path: &Path,
    output: Option<&Path>,
    policy: ImportPolicy,
) -> Result<String> {
    let templates = read_bundle(payload_path)?;
    let store = Arc::new(MemoryTemplateStore::with_templates(read_store(store_path)?));

    let importer = Importer::new(store.clone());
    let summary = importer.run(&templates, policy).await?;

    let destination = output.unwrap_or(store_path);
    write_store(destination, store.list().await.map_err(NotifyTplError::from)?)?;
    info!(path = %destination.display(), "store written");

    Ok(summary.to_string())
}

/// Export every template in a store file as a shareable bundle
pub fn export(store_path: &Path, output: Option<&Path>) -> Result<String> {
    let bundle = TemplateBundle::export(read_store(store_path)?.into_values());
    let json = bundle.to_json_pretty()?;

    match output {
        Some(path) => {
            write_text(path, &json)?;
            Ok(format!("Exported {} templates to {}", bundle.templates.len(), path.display()))
        }
        None => Ok(json),
    }
}

fn read_bundle(path: &Path) -> Result<Vec<Template>> {
    let payload = read_text(path)?;
    Ok(TemplateBundle::from_json(&payload)?.into_templates())
}

fn read_store(path: &Path) -> Result<HashMap<TemplateId, Template>> {
    read_json(path)
}

fn write_store(path: &Path, templates: HashMap<TemplateId, Template>) -> Result<()> {
    // Sorted for stable diffs
    let sorted: BTreeMap<TemplateId, Template> = templates.into_iter().collect();
    write_text(path, &serde_json::to_string_pretty(&sorted)?)
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write_text(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const STORE: &str = r#"{
        "alert": {"id": "alert", "name": "Alert", "content": "old"}
    }"#;

    const PAYLOAD: &str = r#"{
        "version": "1.0",
        "exportTime": "2024-05-01T08:00:00Z",
        "exportType": "templates",
        "templates": [
            {"id": "alert", "name": "Alert", "content": "new"},
            {"id": "digest", "name": "Digest", "content": "{{ .message }}"}
        ]
    }"#;

    #[test]
    fn test_preview_raw_body() {
        let dir = tempdir().unwrap();
        let body = dir.path().join("body.tmpl");
        let data = dir.path().join("data.json");
        fs::write(&body, "[{{ .level | upper }}] {{ .host }}").unwrap();
        fs::write(&data, r#"{"level": "warn", "host": "db-1"}"#).unwrap();

        let out = preview(&Interpreter::new(), &body, Some(&data), true).unwrap();
        assert_eq!(out, "[WARN] db-1");
    }

    #[test]
    fn test_preview_template_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("template.json");
        fs::write(&path, r#"{"id": "a", "title": "{{ .title }}", "targets": "ops"}"#).unwrap();

        let out = preview(&Interpreter::new(), &path, None, false).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["title"], "示例标题");
        assert_eq!(value["targets"], serde_json::json!(["ops"]));
    }

    #[test]
    fn test_plan_lists_decisions() {
        let dir = tempdir().unwrap();
        let payload = dir.path().join("payload.json");
        let store = dir.path().join("store.json");
        fs::write(&payload, PAYLOAD).unwrap();
        fs::write(&store, STORE).unwrap();

        let out = plan(&payload, &store, ImportPolicy::skip()).unwrap();
        assert_eq!(out, "alert: skip\ndigest: create");
    }

    #[tokio::test]
    async fn test_import_writes_store() {
        let dir = tempdir().unwrap();
        let payload = dir.path().join("payload.json");
        let store = dir.path().join("store.json");
        fs::write(&payload, PAYLOAD).unwrap();
        fs::write(&store, STORE).unwrap();

        let out = import(&payload, &store, None, ImportPolicy::overwrite())
            .await
            .unwrap();
        assert_eq!(out, "Import finished: 1 created, 1 overwritten, 0 skipped, 0 failed");

        let written: HashMap<TemplateId, Template> = read_json(&store).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(written["alert"].content, "new");
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempdir().unwrap();
        let store = dir.path().join("store.json");
        let output = dir.path().join("bundle.json");
        fs::write(&store, STORE).unwrap();

        let out = export(&store, Some(&output)).unwrap();
        assert!(out.starts_with("Exported 1 templates"));
        let bundle = TemplateBundle::from_json(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(bundle.templates[0].content, "old");
    }

    #[test]
    fn test_missing_file_error() {
        let err = export(Path::new("/nonexistent/store.json"), None).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }
}
