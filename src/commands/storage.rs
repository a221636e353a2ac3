use std::path::PathBuf;

use crate::models::{ImportSummary, StorageStats};
use crate::services::data_transfer;
use crate::state::AppState;

pub async fn get_storage_stats(state: &AppState) -> Result<StorageStats, String> {
    state.store.stats().map_err(|e| e.to_string())
}

pub async fn export_data(state: &AppState) -> Result<String, String> {
    let path = data_transfer::export_to_dir(&state.store, &state.data_dir, chrono::Utc::now())
        .map_err(|e| e.to_string())?;
    Ok(path.to_string_lossy().to_string())
}

/// Replaces tasks, habits and calendar from a backup file. On any error the
/// store is left as it was and the message is meant for a status line.
pub async fn import_data(state: &AppState, path: PathBuf) -> Result<ImportSummary, String> {
    data_transfer::import_file(&state.store, &path).map_err(|e| {
        log::warn!("import of {} failed: {}", path.display(), e);
        e.to_string()
    })
}
