use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Essential,
    Important,
    Optional,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Essential => "essential",
            Priority::Important => "important",
            Priority::Optional => "optional",
        }
    }

    pub fn parse(value: &str) -> Option<Priority> {
        match value.trim().to_lowercase().as_str() {
            "essential" => Some(Priority::Essential),
            "important" => Some(Priority::Important),
            "optional" => Some(Priority::Optional),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub done: bool,
    // Older records carry no priority; they count as essential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl Task {
    pub fn effective_priority(&self) -> Priority {
        self.priority.unwrap_or(Priority::Essential)
    }

    /// Creation time in ms. Legacy tasks used their creation timestamp as id.
    pub fn created_at_ms(&self) -> i64 {
        self.created_at.unwrap_or(self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub done: Option<bool>,
    pub priority: Option<Priority>,
}

/// Open tasks grouped the way the task page shows them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskBoard {
    pub essential: Vec<Task>,
    pub important: Vec<Task>,
    pub optional: Vec<Task>,
    pub done: Vec<Task>,
}
