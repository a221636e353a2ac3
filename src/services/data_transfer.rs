use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::database::LocalStore;
use crate::error::{LifeError, LifeResult};
use crate::models::{ExportBundle, ImportSummary};

pub const EXPORT_FORMAT_VERSION: &str = "1.0.0";
pub const EXPORTS_DIR: &str = "exports";

pub fn export_bundle(store: &LocalStore, at: DateTime<Utc>) -> LifeResult<ExportBundle> {
    Ok(ExportBundle {
        version: Some(EXPORT_FORMAT_VERSION.to_string()),
        exported_at: Some(at.to_rfc3339()),
        tasks: store.list_tasks()?,
        habits: store.list_habits()?,
        calendar: store.list_events()?,
    })
}

/// Writes a pretty-printed bundle to `<data_dir>/exports/lifeos_export_<stamp>.json`.
pub fn export_to_dir(store: &LocalStore, data_dir: &Path, at: DateTime<Utc>) -> LifeResult<PathBuf> {
    let bundle = export_bundle(store, at)?;
    let export_dir = data_dir.join(EXPORTS_DIR);
    std::fs::create_dir_all(&export_dir)?;

    let export_path = export_dir.join(format!(
        "lifeos_export_{}.json",
        at.format("%Y%m%d_%H%M%S")
    ));
    std::fs::write(&export_path, serde_json::to_string_pretty(&bundle)?)?;
    log::info!(
        "exported {} task(s), {} habit(s), {} event(s) to {}",
        bundle.tasks.len(),
        bundle.habits.len(),
        bundle.calendar.len(),
        export_path.display()
    );
    Ok(export_path)
}

fn collection<T: DeserializeOwned>(root: &Map<String, Value>, key: &str) -> LifeResult<Vec<T>> {
    match root.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                serde_json::from_value(item.clone())
                    .map_err(|e| LifeError::ImportFormat(format!("{}[{}]: {}", key, i, e)))
            })
            .collect(),
        Some(_) => Err(LifeError::ImportFormat(format!("`{}` must be an array", key))),
    }
}

/// Parses a backup file. Everything is validated before the store is touched.
pub fn parse_import(json: &str) -> LifeResult<ExportBundle> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| LifeError::ImportFormat(format!("not valid JSON: {}", e)))?;
    let root = value
        .as_object()
        .ok_or_else(|| LifeError::ImportFormat("top level must be an object".to_string()))?;

    Ok(ExportBundle {
        version: root.get("version").and_then(Value::as_str).map(str::to_string),
        exported_at: root.get("exportedAt").and_then(Value::as_str).map(str::to_string),
        tasks: collection(root, "tasks")?,
        habits: collection(root, "habits")?,
        calendar: collection(root, "calendar")?,
    })
}

/// Replaces tasks, habits and calendar with the file's contents. A key that is
/// absent still empties its collection. Routines and finance are untouched.
pub fn import_json(store: &LocalStore, json: &str) -> LifeResult<ImportSummary> {
    let bundle = parse_import(json)?;
    store.replace_collections(&bundle.tasks, &bundle.habits, &bundle.calendar)?;

    let summary = ImportSummary {
        tasks: bundle.tasks.len(),
        habits: bundle.habits.len(),
        calendar: bundle.calendar.len(),
    };
    log::info!(
        "imported {} task(s), {} habit(s), {} event(s)",
        summary.tasks,
        summary.habits,
        summary.calendar
    );
    Ok(summary)
}

pub fn import_file(store: &LocalStore, path: &Path) -> LifeResult<ImportSummary> {
    let content = std::fs::read_to_string(path)?;
    import_json(store, &content)
}
