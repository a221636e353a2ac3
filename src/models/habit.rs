use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
        }
    }

    pub fn parse(value: &str) -> Option<Frequency> {
        match value.trim().to_lowercase().as_str() {
            "daily" => Some(Frequency::Daily),
            "weekly" => Some(Frequency::Weekly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: i64,
    pub title: String,
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_done_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// 0 = Sunday .. 6 = Saturday; only meaningful for weekly habits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_weekday: Option<u8>,
}

impl Habit {
    pub fn effective_frequency(&self) -> Frequency {
        self.frequency.unwrap_or(Frequency::Daily)
    }

    pub fn is_scheduled_on(&self, weekday: u8) -> bool {
        match self.effective_frequency() {
            Frequency::Daily => true,
            Frequency::Weekly => self.scheduled_weekday == Some(weekday),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHabitRequest {
    pub title: String,
    pub frequency: Option<Frequency>,
    pub scheduled_weekday: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HabitPatch {
    pub title: Option<String>,
    pub done: Option<bool>,
    pub frequency: Option<Frequency>,
    /// `Some(None)` clears the completion timestamp.
    pub last_done_at: Option<Option<i64>>,
    pub scheduled_weekday: Option<Option<u8>>,
}
