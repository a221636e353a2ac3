use serde::{Deserialize, Serialize};

use crate::models::{CalendarEvent, Habit, Task};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageStats {
    pub total_size_bytes: i64,
    pub schema_version: i64,
    pub tasks_count: i64,
    pub habits_count: i64,
    pub calendar_count: i64,
    pub routines_count: i64,
}

/// Backup file shape shared with the browser client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub habits: Vec<Habit>,
    #[serde(default)]
    pub calendar: Vec<CalendarEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub tasks: usize,
    pub habits: usize,
    pub calendar: usize,
}
