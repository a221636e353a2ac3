use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoutineOrigin {
    Chat,
    Manual,
}

impl RoutineOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutineOrigin::Chat => "chat",
            RoutineOrigin::Manual => "manual",
        }
    }

    pub fn parse(value: &str) -> Option<RoutineOrigin> {
        match value.trim().to_lowercase().as_str() {
            "chat" => Some(RoutineOrigin::Chat),
            "manual" => Some(RoutineOrigin::Manual),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoutineRecord {
    pub id: i64,
    pub text: String,
    pub date: i64,
    pub origin: RoutineOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed: Option<bool>,
}

impl RoutineRecord {
    /// Manual entries always count; chat entries only after explicit confirmation.
    pub fn is_context_eligible(&self) -> bool {
        match self.origin {
            RoutineOrigin::Manual => true,
            RoutineOrigin::Chat => self.confirmed == Some(true),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutinePatch {
    pub text: Option<String>,
    pub confirmed: Option<bool>,
}
